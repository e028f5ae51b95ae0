use sqlx::PgPool;
use storage::{
    dto::member::{CohortChangeResponse, CreateMemberRequest},
    error::Result,
    models::{DEFAULT_COHORT, Member},
    repository::{member::MemberRepository, result::ResultRepository},
    services::scoring::recalculate_weeks,
    store::PgLeagueStore,
};

use crate::error::WebResult;

/// Register a member, defaulting the cohort
pub async fn create_member(pool: &PgPool, request: &CreateMemberRequest) -> Result<Member> {
    let cohort = request.cohort.as_deref().unwrap_or(DEFAULT_COHORT);
    let member = MemberRepository::new(pool)
        .create(request.username.trim(), cohort.trim())
        .await?;

    tracing::info!(username = %member.username, cohort = %member.cohort, "Member registered");
    Ok(member)
}

pub async fn list_members(pool: &PgPool) -> Result<Vec<Member>> {
    MemberRepository::new(pool).list().await
}

/// Move a member to another cohort, then rescore every week with results
/// so that stored bonuses follow the new cohort.
pub async fn update_cohort(
    pool: &PgPool,
    username: &str,
    cohort: &str,
) -> WebResult<CohortChangeResponse> {
    let member = MemberRepository::new(pool)
        .update_cohort(username, cohort.trim())
        .await?;

    let weeks = ResultRepository::new(pool).weeks_with_results().await?;
    let store = PgLeagueStore::new(pool.clone());
    let recalculations = recalculate_weeks(&store, &weeks).await?;

    tracing::info!(
        username = %member.username,
        cohort = %member.cohort,
        weeks = recalculations.len(),
        "Cohort changed and weeks rescored"
    );

    Ok(CohortChangeResponse {
        member,
        recalculations,
    })
}
