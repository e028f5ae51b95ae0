use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Cohort every member belongs to unless an administrator reassigns them.
pub const DEFAULT_COHORT: &str = "A";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Member {
    pub username: String,
    pub cohort: String,
    /// Sum of the member's stored week points, rewritten on every recalculation.
    pub total_points: i64,
    pub created_at: NaiveDateTime,
}
