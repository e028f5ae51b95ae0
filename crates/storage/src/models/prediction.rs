use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A member's predicted score for one fixture of one week.
///
/// Scores are kept as raw column values; the scoring engine rejects
/// negative values instead of trusting the store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Prediction {
    pub username: String,
    pub week: i32,
    pub fixture_id: String,
    pub home_score: i32,
    pub away_score: i32,
    pub submitted_at: NaiveDateTime,
}
