use std::collections::{BTreeMap, BTreeSet};

use crate::models::{ActualResult, DEFAULT_COHORT, Prediction};
use crate::store::LeagueStore;

use super::ScoringError;
use super::outcome::Scoreline;

/// Immutable view of everything a week's scoring reads.
///
/// All maps are ordered so that scoring never depends on load order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekSnapshot {
    pub week: i32,
    /// fixture -> official score
    pub results: BTreeMap<String, Scoreline>,
    /// fixture -> username -> predicted score
    pub predictions: BTreeMap<String, BTreeMap<String, Scoreline>>,
    /// username -> cohort
    pub cohorts: BTreeMap<String, String>,
    /// Registered members, who receive a week entry even without predictions.
    pub roster: BTreeSet<String>,
}

impl WeekSnapshot {
    pub fn new(week: i32) -> Self {
        Self {
            week,
            ..Self::default()
        }
    }

    pub fn with_member(mut self, username: &str, cohort: &str) -> Self {
        self.roster.insert(username.to_string());
        self.cohorts.insert(username.to_string(), cohort.to_string());
        self
    }

    pub fn with_result(mut self, fixture_id: &str, home: u32, away: u32) -> Self {
        self.results
            .insert(fixture_id.to_string(), Scoreline::new(home, away));
        self
    }

    pub fn with_prediction(mut self, username: &str, fixture_id: &str, home: u32, away: u32) -> Self {
        self.predictions
            .entry(fixture_id.to_string())
            .or_default()
            .insert(username.to_string(), Scoreline::new(home, away));
        self
    }

    /// Members without a resolvable cohort share the implicit default cohort.
    pub fn cohort_of(&self, username: &str) -> &str {
        self.cohorts
            .get(username)
            .map(String::as_str)
            .unwrap_or(DEFAULT_COHORT)
    }

    /// Everyone who gets a week entry: the roster plus anyone who predicted.
    pub fn participants(&self) -> BTreeSet<&str> {
        self.roster
            .iter()
            .map(String::as_str)
            .chain(
                self.predictions
                    .values()
                    .flat_map(|by_user| by_user.keys().map(String::as_str)),
            )
            .collect()
    }

    /// Validates raw rows into a snapshot. Malformed rows are returned
    /// alongside instead of failing the whole week.
    pub fn from_records(
        week: i32,
        predictions: impl IntoIterator<Item = Prediction>,
        results: impl IntoIterator<Item = ActualResult>,
    ) -> (Self, Vec<ScoringError>) {
        let mut snapshot = Self::new(week);
        let mut rejected = Vec::new();

        for result in results {
            match Scoreline::from_columns(result.home_score, result.away_score) {
                Some(scoreline) => {
                    snapshot.results.insert(result.fixture_id, scoreline);
                }
                None => rejected.push(ScoringError::MalformedResult {
                    fixture_id: result.fixture_id,
                    home: result.home_score,
                    away: result.away_score,
                }),
            }
        }

        for prediction in predictions {
            match Scoreline::from_columns(prediction.home_score, prediction.away_score) {
                Some(scoreline) => {
                    snapshot
                        .predictions
                        .entry(prediction.fixture_id)
                        .or_default()
                        .insert(prediction.username, scoreline);
                }
                None => rejected.push(ScoringError::MalformedPrediction {
                    username: prediction.username,
                    fixture_id: prediction.fixture_id,
                    home: prediction.home_score,
                    away: prediction.away_score,
                }),
            }
        }

        (snapshot, rejected)
    }

    /// Reads a consistent view of the week from the store in one call.
    pub async fn load<S>(store: &S, week: i32) -> Result<Self, ScoringError>
    where
        S: LeagueStore + ?Sized,
    {
        let records = store.load_week(week).await?;

        let (mut snapshot, rejected) =
            Self::from_records(week, records.predictions, records.results);
        for error in &rejected {
            tracing::warn!(week, error = %error, "Skipping malformed scoring input");
        }

        snapshot.roster = records.members.keys().cloned().collect();
        snapshot.cohorts = records.members;

        let unregistered: Vec<String> = snapshot
            .participants()
            .into_iter()
            .filter(|username| !snapshot.cohorts.contains_key(*username))
            .map(String::from)
            .collect();

        for username in unregistered {
            tracing::debug!(
                week,
                username = %username,
                "No cohort on record, using default cohort {}",
                DEFAULT_COHORT
            );
            snapshot
                .cohorts
                .insert(username, DEFAULT_COHORT.to_string());
        }

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::store::WeekRecords;
    use crate::store::memory::MemoryStore;
    use chrono::NaiveDateTime;

    fn prediction(username: &str, fixture_id: &str, home: i32, away: i32) -> Prediction {
        Prediction {
            username: username.to_string(),
            week: 1,
            fixture_id: fixture_id.to_string(),
            home_score: home,
            away_score: away,
            submitted_at: NaiveDateTime::default(),
        }
    }

    fn result(fixture_id: &str, home: i32, away: i32) -> ActualResult {
        ActualResult {
            week: 1,
            fixture_id: fixture_id.to_string(),
            home_score: home,
            away_score: away,
            recorded_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_malformed_rows_are_rejected_individually() {
        let (snapshot, rejected) = WeekSnapshot::from_records(
            1,
            vec![
                prediction("ana", "A vs B", 2, 1),
                prediction("bob", "A vs B", -1, 0),
            ],
            vec![result("A vs B", 2, 1), result("C vs D", 0, -2)],
        );

        assert_eq!(snapshot.results.len(), 1);
        assert_eq!(snapshot.predictions["A vs B"].len(), 1);
        assert_eq!(rejected.len(), 2);
        assert!(rejected.iter().any(|e| matches!(
            e,
            ScoringError::MalformedPrediction { username, .. } if username == "bob"
        )));
        assert!(rejected.iter().any(|e| matches!(
            e,
            ScoringError::MalformedResult { fixture_id, .. } if fixture_id == "C vs D"
        )));
    }

    #[test]
    fn test_later_prediction_overwrites_earlier() {
        let (snapshot, _) = WeekSnapshot::from_records(
            1,
            vec![
                prediction("ana", "A vs B", 0, 0),
                prediction("ana", "A vs B", 3, 1),
            ],
            vec![],
        );
        assert_eq!(snapshot.predictions["A vs B"]["ana"], Scoreline::new(3, 1));
    }

    #[test]
    fn test_unknown_cohort_defaults() {
        let snapshot = WeekSnapshot::new(1).with_member("ana", "B");
        assert_eq!(snapshot.cohort_of("ana"), "B");
        assert_eq!(snapshot.cohort_of("ghost"), DEFAULT_COHORT);
    }

    #[test]
    fn test_participants_include_unregistered_predictors() {
        let snapshot = WeekSnapshot::new(1)
            .with_member("ana", "A")
            .with_prediction("ghost", "A vs B", 1, 0);
        let participants: Vec<&str> = snapshot.participants().into_iter().collect();
        assert_eq!(participants, vec!["ana", "ghost"]);
    }

    /// Serves a fixed week through `load_week` and fails every other read.
    struct SingleReadStore(WeekRecords);

    #[async_trait::async_trait]
    impl LeagueStore for SingleReadStore {
        async fn load_predictions(&self, _week: i32) -> crate::error::Result<Vec<Prediction>> {
            Err(StorageError::Persistence("split read".to_string()))
        }

        async fn load_actual_results(&self, _week: i32) -> crate::error::Result<Vec<ActualResult>> {
            Err(StorageError::Persistence("split read".to_string()))
        }

        async fn load_roster(&self) -> crate::error::Result<Vec<String>> {
            Err(StorageError::Persistence("split read".to_string()))
        }

        async fn load_cohort_of(&self, _username: &str) -> crate::error::Result<Option<String>> {
            Err(StorageError::Persistence("split read".to_string()))
        }

        async fn load_week(&self, _week: i32) -> crate::error::Result<WeekRecords> {
            Ok(self.0.clone())
        }

        async fn commit_week(
            &self,
            _week: i32,
            points: &BTreeMap<String, u32>,
        ) -> crate::error::Result<BTreeMap<String, i64>> {
            Ok(points.iter().map(|(u, p)| (u.clone(), i64::from(*p))).collect())
        }
    }

    #[tokio::test]
    async fn test_load_reads_week_in_one_call() {
        let store = SingleReadStore(WeekRecords {
            predictions: vec![
                prediction("ana", "A vs B", 2, 1),
                prediction("ghost", "A vs B", 0, 0),
            ],
            results: vec![result("A vs B", 2, 1)],
            members: BTreeMap::from([
                ("ana".to_string(), "B".to_string()),
                ("idle".to_string(), "A".to_string()),
            ]),
        });

        let snapshot = WeekSnapshot::load(&store, 1).await.unwrap();

        assert_eq!(snapshot.cohort_of("ana"), "B");
        assert_eq!(snapshot.cohorts["ghost"], DEFAULT_COHORT);
        assert!(snapshot.roster.contains("idle"));
        assert!(!snapshot.roster.contains("ghost"));
        assert_eq!(snapshot.results.len(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_week_records_match_single_loaders() {
        let store = MemoryStore::new();
        store.add_member("ana", "B").await;
        store.record_result(1, "A vs B", 1, 0).await;
        store.upsert_prediction("ana", 1, "A vs B", 1, 0).await;
        store.upsert_prediction("ana", 2, "C vs D", 1, 0).await;

        let records = store.load_week(1).await.unwrap();

        assert_eq!(records.predictions.len(), 1);
        assert_eq!(records.results.len(), 1);
        assert_eq!(records.members["ana"], "B");
    }
}
