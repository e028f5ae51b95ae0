use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Official score of a fixture, entered by an administrator.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ActualResult {
    pub week: i32,
    pub fixture_id: String,
    pub home_score: i32,
    pub away_score: i32,
    pub recorded_at: NaiveDateTime,
}
