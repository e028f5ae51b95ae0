use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A scheduled match within a week.
///
/// The identifier is derived from the two team names, see [`fixture_id`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Fixture {
    pub week: i32,
    pub fixture_id: String,
    pub home_team: String,
    pub away_team: String,
    pub kickoff: Option<NaiveDateTime>,
    pub display_order: i32,
}

/// Builds the identifier of a fixture from its participants.
///
/// ```
/// use storage::models::fixture_id;
///
/// assert_eq!(fixture_id(" Arsenal ", "Chelsea"), "Arsenal vs Chelsea");
/// ```
pub fn fixture_id(home_team: &str, away_team: &str) -> String {
    format!("{} vs {}", home_team.trim(), away_team.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_id_keeps_home_first() {
        assert_eq!(fixture_id("Leeds", "Everton"), "Leeds vs Everton");
        assert_ne!(fixture_id("Leeds", "Everton"), fixture_id("Everton", "Leeds"));
    }

    #[test]
    fn test_fixture_id_trims_names() {
        assert_eq!(fixture_id("  Fulham", "Brentford  "), "Fulham vs Brentford");
    }
}
