use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Standing, scored_weeks};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub username: String,
    pub cohort: String,
    pub total_points: i64,
    pub points_by_week: BTreeMap<i32, i64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaderboardResponse {
    pub weeks: Vec<i32>,
    pub standings: Vec<LeaderboardEntry>,
}

impl LeaderboardResponse {
    /// Expects standings already ordered. Equal totals share a rank.
    pub fn from_standings(standings: Vec<Standing>) -> Self {
        let weeks = scored_weeks(&standings);
        let mut entries: Vec<LeaderboardEntry> = Vec::with_capacity(standings.len());

        for (index, standing) in standings.into_iter().enumerate() {
            let total_points = standing.total();
            let rank = match entries.last() {
                Some(previous) if previous.total_points == total_points => previous.rank,
                _ => index + 1,
            };

            entries.push(LeaderboardEntry {
                rank,
                total_points,
                username: standing.username,
                cohort: standing.cohort,
                points_by_week: standing.points_by_week,
            });
        }

        Self {
            weeks,
            standings: entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standing(username: &str, weeks: &[(i32, i64)]) -> Standing {
        Standing {
            username: username.to_string(),
            cohort: "A".to_string(),
            points_by_week: weeks.iter().copied().collect(),
        }
    }

    #[test]
    fn test_ties_share_rank() {
        let response = LeaderboardResponse::from_standings(vec![
            standing("ana", &[(1, 9)]),
            standing("bob", &[(1, 4), (2, 1)]),
            standing("cleo", &[(2, 5)]),
            standing("dan", &[(1, 1)]),
        ]);

        let ranks: Vec<usize> = response.standings.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 2, 4]);
        assert_eq!(response.weeks, vec![1, 2]);
    }
}
