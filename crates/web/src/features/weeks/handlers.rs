use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        fixture::ReplaceFixturesRequest,
        week::{CurrentWeekResponse, SetCurrentWeekRequest, SetDeadlineRequest},
    },
    models::{Fixture, WeekSettings},
};
use validator::Validate;

use crate::error::WebError;

use super::services;

fn validate_week(week: i32) -> Result<(), WebError> {
    if week < 1 {
        return Err(WebError::BadRequest("week must be >= 1".to_string()));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/weeks/current",
    responses(
        (status = 200, description = "Current week and its prediction deadline", body = CurrentWeekResponse)
    ),
    tag = "weeks"
)]
pub async fn get_current_week(State(db): State<Database>) -> Result<Response, WebError> {
    let now = chrono::Utc::now().naive_utc();
    let response = services::get_current_week(db.pool(), now).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/weeks/{week}/fixtures",
    params(
        ("week" = i32, Path, description = "Week number")
    ),
    responses(
        (status = 200, description = "Fixtures of the week in display order", body = Vec<Fixture>),
        (status = 400, description = "Invalid week")
    ),
    tag = "weeks"
)]
pub async fn list_fixtures(
    State(db): State<Database>,
    Path(week): Path<i32>,
) -> Result<Response, WebError> {
    validate_week(week)?;

    let fixtures = services::list_fixtures(db.pool(), week).await?;

    Ok(Json(fixtures).into_response())
}

#[utoipa::path(
    put,
    path = "/api/admin/weeks/current",
    request_body = SetCurrentWeekRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Current week updated"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin"
)]
pub async fn set_current_week(
    State(db): State<Database>,
    Json(req): Json<SetCurrentWeekRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    services::set_current_week(db.pool(), req.week).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    put,
    path = "/api/admin/weeks/{week}/deadline",
    params(
        ("week" = i32, Path, description = "Week number")
    ),
    request_body = SetDeadlineRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Deadline updated", body = WeekSettings),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin"
)]
pub async fn set_deadline(
    State(db): State<Database>,
    Path(week): Path<i32>,
    Json(req): Json<SetDeadlineRequest>,
) -> Result<Response, WebError> {
    validate_week(week)?;

    let settings = services::set_deadline(db.pool(), week, req.prediction_deadline).await?;

    Ok(Json(settings).into_response())
}

#[utoipa::path(
    put,
    path = "/api/admin/weeks/{week}/fixtures",
    params(
        ("week" = i32, Path, description = "Week number")
    ),
    request_body = ReplaceFixturesRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Fixtures replaced", body = Vec<Fixture>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Week already has results")
    ),
    tag = "admin"
)]
pub async fn replace_fixtures(
    State(db): State<Database>,
    Path(week): Path<i32>,
    Json(req): Json<ReplaceFixturesRequest>,
) -> Result<Response, WebError> {
    validate_week(week)?;
    req.validate()?;
    req.validate_unique().map_err(WebError::BadRequest)?;

    let fixtures = services::replace_fixtures(db.pool(), week, req).await?;

    Ok(Json(fixtures).into_response())
}
