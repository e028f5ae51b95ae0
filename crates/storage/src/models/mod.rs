pub mod actual_result;
pub mod fixture;
pub mod member;
pub mod prediction;
pub mod standing;
pub mod week;

pub use actual_result::ActualResult;
pub use fixture::{Fixture, fixture_id};
pub use member::{DEFAULT_COHORT, Member};
pub use prediction::Prediction;
pub use standing::{Standing, WeekPoints, build_standings, scored_weeks};
pub use week::WeekSettings;
