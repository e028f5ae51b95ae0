use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentWeekResponse {
    pub week: i32,
    pub prediction_deadline: Option<NaiveDateTime>,
    pub accepting_predictions: bool,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SetCurrentWeekRequest {
    #[validate(range(min = 1, message = "Week must be at least 1"))]
    pub week: i32,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetDeadlineRequest {
    /// `null` removes the deadline.
    pub prediction_deadline: Option<NaiveDateTime>,
}
