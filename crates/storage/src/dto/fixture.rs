use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::repository::fixture::NewFixture;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct FixtureInput {
    #[validate(length(min = 1, max = 100, message = "Home team is required"))]
    pub home_team: String,

    #[validate(length(min = 1, max = 100, message = "Away team is required"))]
    pub away_team: String,

    pub kickoff: Option<NaiveDateTime>,

    /// Position in the week's list; defaults to the position in the request.
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ReplaceFixturesRequest {
    #[validate(nested)]
    #[validate(length(min = 1, message = "At least one fixture is required"))]
    pub fixtures: Vec<FixtureInput>,
}

impl ReplaceFixturesRequest {
    pub fn into_new_fixtures(self) -> Vec<NewFixture> {
        self.fixtures
            .into_iter()
            .enumerate()
            .map(|(index, f)| NewFixture {
                display_order: f.display_order.unwrap_or(index as i32 + 1),
                home_team: f.home_team,
                away_team: f.away_team,
                kickoff: f.kickoff,
            })
            .collect()
    }

    /// The same pairing listed twice would collapse into one fixture.
    pub fn validate_unique(&self) -> Result<(), String> {
        let mut seen = std::collections::HashSet::new();
        for f in &self.fixtures {
            let id = crate::models::fixture_id(&f.home_team, &f.away_team);
            if !seen.insert(id.clone()) {
                return Err(format!("Fixture '{}' is listed twice", id));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(home: &str, away: &str, order: Option<i32>) -> FixtureInput {
        FixtureInput {
            home_team: home.to_string(),
            away_team: away.to_string(),
            kickoff: None,
            display_order: order,
        }
    }

    #[test]
    fn test_display_order_defaults_to_position() {
        let request = ReplaceFixturesRequest {
            fixtures: vec![input("A", "B", None), input("C", "D", Some(7))],
        };
        let fixtures = request.into_new_fixtures();
        assert_eq!(fixtures[0].display_order, 1);
        assert_eq!(fixtures[1].display_order, 7);
    }

    #[test]
    fn test_duplicate_pairing_rejected() {
        let request = ReplaceFixturesRequest {
            fixtures: vec![input("A", "B", None), input(" A", "B ", None)],
        };
        assert!(request.validate_unique().is_err());
    }

    #[test]
    fn test_empty_team_fails_validation() {
        let request = ReplaceFixturesRequest {
            fixtures: vec![input("", "B", None)],
        };
        assert!(request.validate().is_err());
    }
}
