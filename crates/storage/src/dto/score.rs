use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{ActualResult, Prediction};
use crate::services::scoring::WeekRecalculation;

/// One submitted score line. Both sides are optional in the payload so that a
/// half-filled line can be reported back instead of failing the request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScoreInput {
    pub fixture_id: String,
    pub home: Option<i64>,
    pub away: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RejectedScore {
    pub fixture_id: String,
    pub reason: String,
}

/// Splits submitted lines into storable `(fixture, home, away)` triples and
/// rejected lines. A rejected line never invalidates the others.
pub fn partition_scores(inputs: &[ScoreInput]) -> (Vec<(String, i32, i32)>, Vec<RejectedScore>) {
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for input in inputs {
        let reject = |reason: &str| RejectedScore {
            fixture_id: input.fixture_id.clone(),
            reason: reason.to_string(),
        };

        match (input.home, input.away) {
            (Some(home), Some(away)) => match (i32::try_from(home), i32::try_from(away)) {
                (Ok(home), Ok(away)) if home >= 0 && away >= 0 => {
                    accepted.push((input.fixture_id.trim().to_string(), home, away));
                }
                _ => rejected.push(reject("scores must be non-negative integers")),
            },
            (None, None) => {}
            _ => rejected.push(reject("both home and away scores are required")),
        }
    }

    (accepted, rejected)
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SubmitPredictionsRequest {
    #[validate(length(min = 1, max = 80, message = "Username must be between 1 and 80 characters"))]
    pub username: String,

    #[validate(length(min = 1, message = "At least one prediction is required"))]
    pub predictions: Vec<ScoreInput>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubmitPredictionsResponse {
    pub saved: Vec<Prediction>,
    pub rejected: Vec<RejectedScore>,
    /// Present when the week already had results and was rescored.
    pub recalculation: Option<WeekRecalculation>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RecordResultsRequest {
    #[validate(length(min = 1, message = "At least one result is required"))]
    pub results: Vec<ScoreInput>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecordResultsResponse {
    pub results: Vec<ActualResult>,
    pub rejected: Vec<RejectedScore>,
    pub recalculation: WeekRecalculation,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(fixture_id: &str, home: Option<i64>, away: Option<i64>) -> ScoreInput {
        ScoreInput {
            fixture_id: fixture_id.to_string(),
            home,
            away,
        }
    }

    #[test]
    fn test_valid_lines_are_accepted() {
        let (accepted, rejected) = partition_scores(&[line("A vs B", Some(2), Some(0))]);
        assert_eq!(accepted, vec![("A vs B".to_string(), 2, 0)]);
        assert!(rejected.is_empty());
    }

    #[test]
    fn test_negative_line_rejected_alone() {
        let (accepted, rejected) = partition_scores(&[
            line("A vs B", Some(-1), Some(0)),
            line("C vs D", Some(1), Some(1)),
        ]);
        assert_eq!(accepted.len(), 1);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].fixture_id, "A vs B");
    }

    #[test]
    fn test_half_filled_line_rejected() {
        let (accepted, rejected) = partition_scores(&[line("A vs B", Some(1), None)]);
        assert!(accepted.is_empty());
        assert_eq!(rejected[0].reason, "both home and away scores are required");
    }

    #[test]
    fn test_empty_line_ignored() {
        let (accepted, rejected) = partition_scores(&[line("A vs B", None, None)]);
        assert!(accepted.is_empty());
        assert!(rejected.is_empty());
    }

    #[test]
    fn test_out_of_range_line_rejected() {
        let (_, rejected) = partition_scores(&[line("A vs B", Some(i64::MAX), Some(0))]);
        assert_eq!(rejected.len(), 1);
    }
}
