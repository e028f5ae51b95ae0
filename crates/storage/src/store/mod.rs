//! Persistence seam consumed by the scoring engine.

pub mod memory;

use std::collections::BTreeMap;

use sqlx::PgPool;

use crate::error::Result;
use crate::models::{ActualResult, DEFAULT_COHORT, Prediction};
use crate::repository::member::{self, MemberRepository};
use crate::repository::prediction::{self, PredictionRepository};
use crate::repository::result::{self, ResultRepository};
use crate::repository::standings::StandingsRepository;

/// Everything one week's scoring reads, as of a single point in time.
#[derive(Debug, Clone, Default)]
pub struct WeekRecords {
    pub predictions: Vec<Prediction>,
    pub results: Vec<ActualResult>,
    /// username -> cohort of every registered member
    pub members: BTreeMap<String, String>,
}

/// What week recalculation reads from and writes to.
///
/// `commit_week` must be atomic: either every member's week points and
/// recomputed cumulative total become visible, or none do.
#[async_trait::async_trait]
pub trait LeagueStore: Send + Sync {
    async fn load_predictions(&self, week: i32) -> Result<Vec<Prediction>>;

    async fn load_actual_results(&self, week: i32) -> Result<Vec<ActualResult>>;

    /// Usernames of every registered member.
    async fn load_roster(&self) -> Result<Vec<String>>;

    async fn load_cohort_of(&self, username: &str) -> Result<Option<String>>;

    /// Reads predictions, results and cohorts of a week as one consistent
    /// view. The default composes the single loaders and is only consistent
    /// when nothing writes concurrently; stores with concurrent writers
    /// override it.
    async fn load_week(&self, week: i32) -> Result<WeekRecords> {
        let predictions = self.load_predictions(week).await?;
        let results = self.load_actual_results(week).await?;

        let mut members = BTreeMap::new();
        for username in self.load_roster().await? {
            let cohort = self
                .load_cohort_of(&username)
                .await?
                .unwrap_or_else(|| DEFAULT_COHORT.to_string());
            members.insert(username, cohort);
        }

        Ok(WeekRecords {
            predictions,
            results,
            members,
        })
    }

    /// Stores `points` under `week` for each user, then rewrites each user's
    /// cumulative total as the sum of their stored weeks. Returns the totals.
    async fn commit_week(
        &self,
        week: i32,
        points: &BTreeMap<String, u32>,
    ) -> Result<BTreeMap<String, i64>>;
}

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgLeagueStore {
    pool: PgPool,
}

impl PgLeagueStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl LeagueStore for PgLeagueStore {
    async fn load_predictions(&self, week: i32) -> Result<Vec<Prediction>> {
        PredictionRepository::new(&self.pool).list_for_week(week).await
    }

    async fn load_actual_results(&self, week: i32) -> Result<Vec<ActualResult>> {
        ResultRepository::new(&self.pool).list_for_week(week).await
    }

    async fn load_roster(&self) -> Result<Vec<String>> {
        MemberRepository::new(&self.pool).list_usernames().await
    }

    async fn load_cohort_of(&self, username: &str) -> Result<Option<String>> {
        MemberRepository::new(&self.pool).cohort_of(username).await
    }

    /// One read-only REPEATABLE READ transaction, so all three reads see the
    /// same committed state.
    async fn load_week(&self, week: i32) -> Result<WeekRecords> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;

        let predictions = prediction::fetch_week(&mut *tx, week).await?;
        let results = result::fetch_week(&mut *tx, week).await?;
        let members = member::fetch_cohorts(&mut *tx).await?;

        tx.commit().await?;

        Ok(WeekRecords {
            predictions,
            results,
            members,
        })
    }

    async fn commit_week(
        &self,
        week: i32,
        points: &BTreeMap<String, u32>,
    ) -> Result<BTreeMap<String, i64>> {
        StandingsRepository::new(&self.pool)
            .commit_week(week, points)
            .await
    }
}
