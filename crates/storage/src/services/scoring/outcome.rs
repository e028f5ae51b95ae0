use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Result of a match from the home side's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    pub fn classify(home: u32, away: u32) -> Self {
        match home.cmp(&away) {
            Ordering::Greater => Self::Win,
            Ordering::Equal => Self::Draw,
            Ordering::Less => Self::Loss,
        }
    }
}

/// A validated home/away score pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Scoreline {
    pub home: u32,
    pub away: u32,
}

impl Scoreline {
    pub fn new(home: u32, away: u32) -> Self {
        Self { home, away }
    }

    /// Converts stored integer columns, rejecting negative scores.
    pub fn from_columns(home: i32, away: i32) -> Option<Self> {
        Some(Self {
            home: u32::try_from(home).ok()?,
            away: u32::try_from(away).ok()?,
        })
    }

    pub fn outcome(&self) -> Outcome {
        Outcome::classify(self.home, self.away)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_each_class() {
        assert_eq!(Outcome::classify(2, 1), Outcome::Win);
        assert_eq!(Outcome::classify(0, 0), Outcome::Draw);
        assert_eq!(Outcome::classify(1, 3), Outcome::Loss);
    }

    #[test]
    fn test_classify_is_antisymmetric() {
        for home in 0..8 {
            for away in 0..8 {
                let forward = Outcome::classify(home, away);
                let reverse = Outcome::classify(away, home);
                assert_eq!(forward == Outcome::Win, reverse == Outcome::Loss);
                assert_eq!(forward == Outcome::Draw, home == away);
            }
        }
    }

    #[test]
    fn test_classify_extreme_values() {
        assert_eq!(Outcome::classify(u32::MAX, 0), Outcome::Win);
        assert_eq!(Outcome::classify(u32::MAX, u32::MAX), Outcome::Draw);
    }

    #[test]
    fn test_from_columns_rejects_negative() {
        assert_eq!(Scoreline::from_columns(2, 1), Some(Scoreline::new(2, 1)));
        assert!(Scoreline::from_columns(-1, 0).is_none());
        assert!(Scoreline::from_columns(0, -3).is_none());
    }
}
