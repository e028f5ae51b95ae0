use chrono::NaiveDateTime;
use sqlx::PgPool;
use storage::{
    dto::score::{SubmitPredictionsRequest, SubmitPredictionsResponse, partition_scores},
    error::StorageError,
    models::Prediction,
    repository::{
        member::MemberRepository, prediction::PredictionRepository, result::ResultRepository,
        week::WeekRepository,
    },
    services::scoring::recalculate_week,
    store::PgLeagueStore,
};

use crate::error::{WebError, WebResult};

/// Save a member's predictions for a week.
///
/// Lines with malformed scores are reported back and skipped. When the week
/// already has results the whole week is rescored, since a new prediction can
/// change other members' uniqueness bonuses.
pub async fn submit_predictions(
    pool: &PgPool,
    week: i32,
    request: &SubmitPredictionsRequest,
    now: NaiveDateTime,
) -> WebResult<SubmitPredictionsResponse> {
    let username = request.username.trim();

    MemberRepository::new(pool)
        .find(username)
        .await
        .map_err(|e| match e {
            StorageError::NotFound => WebError::NotFound(format!("Member '{}'", username)),
            other => other.into(),
        })?;

    let settings = WeekRepository::new(pool).settings(week).await?;
    if !settings.accepts_predictions_at(now) {
        return Err(WebError::Conflict(format!(
            "Prediction deadline for week {} has passed",
            week
        )));
    }

    let (accepted, rejected) = partition_scores(&request.predictions);
    if accepted.is_empty() {
        return Err(WebError::BadRequest("No valid predictions provided".to_string()));
    }

    let saved = PredictionRepository::new(pool)
        .upsert_many(username, week, &accepted)
        .await?;

    tracing::info!(
        username = %username,
        week,
        saved = saved.len(),
        rejected = rejected.len(),
        "Predictions saved"
    );

    let has_results = !ResultRepository::new(pool).list_for_week(week).await?.is_empty();
    let recalculation = if has_results {
        let store = PgLeagueStore::new(pool.clone());
        Some(recalculate_week(&store, week).await?)
    } else {
        None
    };

    Ok(SubmitPredictionsResponse {
        saved,
        rejected,
        recalculation,
    })
}

pub async fn list_member_predictions(
    pool: &PgPool,
    week: i32,
    username: &str,
) -> WebResult<Vec<Prediction>> {
    Ok(PredictionRepository::new(pool)
        .list_for_member(week, username)
        .await?)
}
