use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::score::{SubmitPredictionsRequest, SubmitPredictionsResponse},
    models::Prediction,
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    put,
    path = "/api/weeks/{week}/predictions",
    params(
        ("week" = i32, Path, description = "Week number")
    ),
    request_body = SubmitPredictionsRequest,
    responses(
        (status = 200, description = "Predictions saved; malformed lines are listed as rejected", body = SubmitPredictionsResponse),
        (status = 400, description = "No valid prediction in the request"),
        (status = 404, description = "Member not found"),
        (status = 409, description = "Deadline passed or unknown fixture")
    ),
    tag = "predictions"
)]
pub async fn submit_predictions(
    State(db): State<Database>,
    Path(week): Path<i32>,
    Json(req): Json<SubmitPredictionsRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let now = chrono::Utc::now().naive_utc();
    let response = services::submit_predictions(db.pool(), week, &req, now).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/weeks/{week}/predictions/{username}",
    params(
        ("week" = i32, Path, description = "Week number"),
        ("username" = String, Path, description = "Member username")
    ),
    responses(
        (status = 200, description = "The member's predictions for the week", body = Vec<Prediction>)
    ),
    tag = "predictions"
)]
pub async fn list_member_predictions(
    State(db): State<Database>,
    Path((week, username)): Path<(i32, String)>,
) -> Result<Response, WebError> {
    let predictions = services::list_member_predictions(db.pool(), week, &username).await?;

    Ok(Json(predictions).into_response())
}
