use std::collections::BTreeMap;

use sqlx::PgPool;
use storage::{
    dto::standings::LeaderboardResponse,
    error::Result,
    models::build_standings,
    repository::{member::MemberRepository, standings::StandingsRepository},
};

/// Standings with totals summed from stored week points
pub async fn get_leaderboard(pool: &PgPool) -> Result<LeaderboardResponse> {
    let cohorts: BTreeMap<String, String> = MemberRepository::new(pool)
        .list()
        .await?
        .into_iter()
        .map(|m| (m.username, m.cohort))
        .collect();

    let rows = StandingsRepository::new(pool).list_week_points().await?;

    Ok(LeaderboardResponse::from_standings(build_standings(&cohorts, rows)))
}
