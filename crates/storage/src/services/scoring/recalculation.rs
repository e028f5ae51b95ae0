use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::LeagueStore;

use super::ScoringError;
use super::match_score::score_match;
use super::snapshot::WeekSnapshot;
use super::uniqueness::CohortTally;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MemberWeekScore {
    pub username: String,
    pub week_points: u32,
    pub total_points: i64,
}

/// Outcome of rescoring one week, returned to the administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WeekRecalculation {
    pub week: i32,
    pub fixtures_scored: usize,
    pub users_rescored: usize,
    pub scores: Vec<MemberWeekScore>,
}

impl WeekRecalculation {
    pub fn summary(&self) -> String {
        format!(
            "{} users rescored for week {} ({} fixtures with results)",
            self.users_rescored, self.week, self.fixtures_scored
        )
    }
}

/// Computes every participant's points for the snapshot's week.
///
/// Pure: the same snapshot always yields the same map. Fixtures without a
/// result are never visited, so their predictions neither score nor affect
/// uniqueness elsewhere.
pub fn score_week(snapshot: &WeekSnapshot) -> BTreeMap<String, u32> {
    let mut points: BTreeMap<String, u32> = snapshot
        .participants()
        .into_iter()
        .map(|username| (username.to_string(), 0))
        .collect();

    for (fixture_id, actual) in &snapshot.results {
        let Some(by_user) = snapshot.predictions.get(fixture_id) else {
            tracing::debug!(week = snapshot.week, fixture = %fixture_id, "No predictions for fixture");
            continue;
        };

        let tally = CohortTally::new(
            *actual,
            by_user
                .iter()
                .map(|(username, predicted)| (snapshot.cohort_of(username), *predicted)),
        );

        for (username, predicted) in by_user {
            let cohort = snapshot.cohort_of(username);
            let unique = tally.is_unique_correct(cohort, *predicted);
            let earned = score_match(*predicted, Some(*actual), unique);

            *points.entry(username.clone()).or_default() += earned;
        }
    }

    points
}

/// Rescores a whole week from scratch and commits the result atomically.
///
/// On a persistence failure nothing of this run is visible and the caller
/// should retry the whole week. Running it again with unchanged inputs
/// writes identical values.
pub async fn recalculate_week<S>(store: &S, week: i32) -> Result<WeekRecalculation, ScoringError>
where
    S: LeagueStore + ?Sized,
{
    let snapshot = WeekSnapshot::load(store, week).await?;
    let week_points = score_week(&snapshot);

    let totals = store.commit_week(week, &week_points).await.map_err(|e| {
        tracing::error!(week, error = %e, "Week recalculation aborted");
        ScoringError::Persistence(e)
    })?;

    let scores: Vec<MemberWeekScore> = week_points
        .iter()
        .map(|(username, points)| MemberWeekScore {
            username: username.clone(),
            week_points: *points,
            total_points: totals.get(username).copied().unwrap_or(i64::from(*points)),
        })
        .collect();

    let recalculation = WeekRecalculation {
        week,
        fixtures_scored: snapshot.results.len(),
        users_rescored: scores.len(),
        scores,
    };

    tracing::info!("{}", recalculation.summary());

    Ok(recalculation)
}

/// Rescores several weeks in ascending order, stopping at the first failure.
/// Weeks committed before the failure stay committed; each is complete on its own.
pub async fn recalculate_weeks<S>(
    store: &S,
    weeks: &[i32],
) -> Result<Vec<WeekRecalculation>, ScoringError>
where
    S: LeagueStore + ?Sized,
{
    let mut ordered = weeks.to_vec();
    ordered.sort_unstable();
    ordered.dedup();

    let mut recalculations = Vec::with_capacity(ordered.len());
    for week in ordered {
        recalculations.push(recalculate_week(store, week).await?);
    }

    Ok(recalculations)
}
