use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::Member;
use crate::services::scoring::WeekRecalculation;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateMemberRequest {
    #[validate(length(min = 1, max = 80, message = "Username must be between 1 and 80 characters"))]
    pub username: String,

    /// Defaults to the league's single cohort when omitted.
    #[validate(length(min = 1, max = 40))]
    pub cohort: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCohortRequest {
    #[validate(length(min = 1, max = 40, message = "Cohort must be between 1 and 40 characters"))]
    pub cohort: String,
}

/// A cohort change and the weeks rescored because of it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CohortChangeResponse {
    pub member: Member,
    pub recalculations: Vec<WeekRecalculation>,
}
