use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::{ActualResult, Prediction};

use super::{LeagueStore, WeekRecords};

#[derive(Debug, Default)]
struct MemoryState {
    cohorts: BTreeMap<String, String>,
    /// (username, week, fixture) -> (home, away)
    predictions: BTreeMap<(String, i32, String), (i32, i32)>,
    /// (week, fixture) -> (home, away)
    results: BTreeMap<(i32, String), (i32, i32)>,
    week_points: BTreeMap<String, BTreeMap<i32, i64>>,
    totals: BTreeMap<String, i64>,
}

impl MemoryState {
    fn predictions_of(&self, week: i32) -> Vec<Prediction> {
        self.predictions
            .iter()
            .filter(|((_, w, _), _)| *w == week)
            .map(|((username, week, fixture_id), (home, away))| Prediction {
                username: username.clone(),
                week: *week,
                fixture_id: fixture_id.clone(),
                home_score: *home,
                away_score: *away,
                submitted_at: NaiveDateTime::default(),
            })
            .collect()
    }

    fn results_of(&self, week: i32) -> Vec<ActualResult> {
        self.results
            .iter()
            .filter(|((w, _), _)| *w == week)
            .map(|((week, fixture_id), (home, away))| ActualResult {
                week: *week,
                fixture_id: fixture_id.clone(),
                home_score: *home,
                away_score: *away,
                recorded_at: NaiveDateTime::default(),
            })
            .collect()
    }
}

/// In-process store. Commits replace the state under one write lock, so
/// readers never observe half a week.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_member(&self, username: &str, cohort: &str) {
        self.state
            .write()
            .await
            .cohorts
            .insert(username.to_string(), cohort.to_string());
    }

    pub async fn upsert_prediction(&self, username: &str, week: i32, fixture_id: &str, home: i32, away: i32) {
        self.state.write().await.predictions.insert(
            (username.to_string(), week, fixture_id.to_string()),
            (home, away),
        );
    }

    pub async fn record_result(&self, week: i32, fixture_id: &str, home: i32, away: i32) {
        self.state
            .write()
            .await
            .results
            .insert((week, fixture_id.to_string()), (home, away));
    }

    pub async fn week_points(&self, username: &str) -> BTreeMap<i32, i64> {
        self.state
            .read()
            .await
            .week_points
            .get(username)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn total(&self, username: &str) -> Option<i64> {
        self.state.read().await.totals.get(username).copied()
    }
}

#[async_trait::async_trait]
impl LeagueStore for MemoryStore {
    async fn load_predictions(&self, week: i32) -> Result<Vec<Prediction>> {
        Ok(self.state.read().await.predictions_of(week))
    }

    async fn load_actual_results(&self, week: i32) -> Result<Vec<ActualResult>> {
        Ok(self.state.read().await.results_of(week))
    }

    async fn load_roster(&self) -> Result<Vec<String>> {
        Ok(self.state.read().await.cohorts.keys().cloned().collect())
    }

    async fn load_cohort_of(&self, username: &str) -> Result<Option<String>> {
        Ok(self.state.read().await.cohorts.get(username).cloned())
    }

    async fn load_week(&self, week: i32) -> Result<WeekRecords> {
        let state = self.state.read().await;
        Ok(WeekRecords {
            predictions: state.predictions_of(week),
            results: state.results_of(week),
            members: state.cohorts.clone(),
        })
    }

    async fn commit_week(
        &self,
        week: i32,
        points: &BTreeMap<String, u32>,
    ) -> Result<BTreeMap<String, i64>> {
        let mut state = self.state.write().await;
        let mut totals = BTreeMap::new();

        for (username, earned) in points {
            let weeks = state.week_points.entry(username.clone()).or_default();
            weeks.insert(week, i64::from(*earned));
            let total: i64 = weeks.values().sum();
            totals.insert(username.clone(), total);
        }

        state
            .totals
            .extend(totals.iter().map(|(u, t)| (u.clone(), *t)));

        Ok(totals)
    }
}
