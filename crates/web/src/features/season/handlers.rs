use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use storage::{Database, repository::season::SeasonReset};

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/admin/season/reset",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "League emptied and current week set to 1", body = SeasonReset),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin"
)]
pub async fn reset_season(State(db): State<Database>) -> Result<Response, WebError> {
    let reset = services::reset_season(db.pool()).await?;

    Ok(Json(reset).into_response())
}
