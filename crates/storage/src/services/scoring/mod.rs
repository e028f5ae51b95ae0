//! Scoring engine: converts a week's predictions and official results into
//! per-member points, including the cohort uniqueness bonus.

pub mod match_score;
pub mod outcome;
pub mod recalculation;
pub mod snapshot;
pub mod uniqueness;

use thiserror::Error;

use crate::error::StorageError;

pub use match_score::score_match;
pub use outcome::{Outcome, Scoreline};
pub use recalculation::{MemberWeekScore, WeekRecalculation, recalculate_week, recalculate_weeks, score_week};
pub use snapshot::WeekSnapshot;
pub use uniqueness::CohortTally;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Malformed prediction by {username} for {fixture_id}: {home}-{away}")]
    MalformedPrediction {
        username: String,
        fixture_id: String,
        home: i32,
        away: i32,
    },

    #[error("Malformed result for {fixture_id}: {home}-{away}")]
    MalformedResult {
        fixture_id: String,
        home: i32,
        away: i32,
    },

    #[error("Persistence failure: {0}")]
    Persistence(#[from] StorageError),
}
