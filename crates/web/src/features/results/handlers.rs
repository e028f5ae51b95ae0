use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::score::{RecordResultsRequest, RecordResultsResponse},
    models::ActualResult,
    services::scoring::WeekRecalculation,
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/weeks/{week}/results",
    params(
        ("week" = i32, Path, description = "Week number")
    ),
    responses(
        (status = 200, description = "Recorded results of the week", body = Vec<ActualResult>)
    ),
    tag = "weeks"
)]
pub async fn list_results(
    State(db): State<Database>,
    Path(week): Path<i32>,
) -> Result<Response, WebError> {
    let results = services::list_results(db.pool(), week).await?;

    Ok(Json(results).into_response())
}

#[utoipa::path(
    put,
    path = "/api/admin/weeks/{week}/results",
    params(
        ("week" = i32, Path, description = "Week number")
    ),
    request_body = RecordResultsRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Results recorded and week rescored", body = RecordResultsResponse),
        (status = 400, description = "No valid score in the request"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Unknown fixture"),
        (status = 503, description = "Rescoring failed, retry")
    ),
    tag = "admin"
)]
pub async fn record_results(
    State(db): State<Database>,
    Path(week): Path<i32>,
    Json(req): Json<RecordResultsRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let response = services::record_results(db.pool(), week, &req).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    post,
    path = "/api/admin/weeks/{week}/recalculate",
    params(
        ("week" = i32, Path, description = "Week number")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Week rescored", body = WeekRecalculation),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Rescoring failed, retry")
    ),
    tag = "admin"
)]
pub async fn recalculate_week(
    State(db): State<Database>,
    Path(week): Path<i32>,
) -> Result<Response, WebError> {
    let recalculation = services::recalculate(db.pool(), week).await?;

    Ok(Json(recalculation).into_response())
}
