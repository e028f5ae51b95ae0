use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Points a member earned in one week, as stored by the last recalculation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WeekPoints {
    pub username: String,
    pub week: i32,
    pub points: i64,
}

/// A member's position in the league: weekly points and their sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Standing {
    pub username: String,
    pub cohort: String,
    pub points_by_week: BTreeMap<i32, i64>,
}

impl Standing {
    /// The cumulative total is always derived from the weekly map.
    pub fn total(&self) -> i64 {
        self.points_by_week.values().sum()
    }
}

/// Groups stored week points per member and orders them for the leaderboard:
/// highest total first, ties broken by username.
///
/// `cohorts` lists every registered member; users with points but no
/// membership are still listed under the default cohort.
pub fn build_standings(
    cohorts: &BTreeMap<String, String>,
    rows: impl IntoIterator<Item = WeekPoints>,
) -> Vec<Standing> {
    let mut by_user: BTreeMap<String, BTreeMap<i32, i64>> = cohorts
        .keys()
        .map(|username| (username.clone(), BTreeMap::new()))
        .collect();

    for row in rows {
        by_user
            .entry(row.username)
            .or_default()
            .insert(row.week, row.points);
    }

    let mut standings: Vec<Standing> = by_user
        .into_iter()
        .map(|(username, points_by_week)| Standing {
            cohort: cohorts
                .get(&username)
                .cloned()
                .unwrap_or_else(|| super::DEFAULT_COHORT.to_string()),
            username,
            points_by_week,
        })
        .collect();

    standings.sort_by(|a, b| {
        b.total()
            .cmp(&a.total())
            .then_with(|| a.username.cmp(&b.username))
    });

    standings
}

/// Every week that appears in at least one standing, ascending.
pub fn scored_weeks(standings: &[Standing]) -> Vec<i32> {
    standings
        .iter()
        .flat_map(|s| s.points_by_week.keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
