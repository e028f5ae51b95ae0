use sqlx::PgPool;
use storage::{
    dto::score::{RecordResultsRequest, RecordResultsResponse, partition_scores},
    models::ActualResult,
    repository::result::ResultRepository,
    services::scoring::{ScoringError, WeekRecalculation, recalculate_week},
    store::PgLeagueStore,
};

use crate::error::{WebError, WebResult};

pub async fn list_results(pool: &PgPool, week: i32) -> WebResult<Vec<ActualResult>> {
    Ok(ResultRepository::new(pool).list_for_week(week).await?)
}

/// Record or correct results, then rescore the whole week.
///
/// If rescoring fails the results stay recorded and the previous totals
/// stay in place; the administrator retries through the recalculate
/// endpoint.
pub async fn record_results(
    pool: &PgPool,
    week: i32,
    request: &RecordResultsRequest,
) -> WebResult<RecordResultsResponse> {
    let (accepted, rejected) = partition_scores(&request.results);
    if accepted.is_empty() {
        return Err(WebError::BadRequest("No valid scores provided".to_string()));
    }

    for line in &rejected {
        tracing::warn!(week, fixture = %line.fixture_id, reason = %line.reason, "Result line rejected");
    }

    let results = ResultRepository::new(pool)
        .upsert_many(week, &accepted)
        .await?;

    let recalculation = recalculate(pool, week).await?;

    Ok(RecordResultsResponse {
        message: recalculation.summary(),
        results,
        rejected,
        recalculation,
    })
}

/// The administrator's `recalculateWeek` entry point
pub async fn recalculate(pool: &PgPool, week: i32) -> Result<WeekRecalculation, ScoringError> {
    let store = PgLeagueStore::new(pool.clone());
    recalculate_week(&store, week).await
}
