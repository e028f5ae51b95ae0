use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::member::{CohortChangeResponse, CreateMemberRequest, UpdateCohortRequest},
    models::Member,
};
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/members",
    responses(
        (status = 200, description = "All registered members", body = Vec<Member>)
    ),
    tag = "members"
)]
pub async fn list_members(State(db): State<Database>) -> Result<Json<Vec<Member>>, WebError> {
    let members = services::list_members(db.pool()).await?;
    Ok(Json(members))
}

#[utoipa::path(
    post,
    path = "/api/members",
    request_body = CreateMemberRequest,
    responses(
        (status = 201, description = "Member registered", body = Member),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username already taken")
    ),
    tag = "members"
)]
pub async fn create_member(
    State(db): State<Database>,
    Json(req): Json<CreateMemberRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let member = services::create_member(db.pool(), &req).await?;

    Ok((StatusCode::CREATED, Json(member)).into_response())
}

#[utoipa::path(
    put,
    path = "/api/admin/members/{username}/cohort",
    params(
        ("username" = String, Path, description = "Member username")
    ),
    request_body = UpdateCohortRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Cohort updated and weeks with results rescored", body = CohortChangeResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Member not found"),
        (status = 503, description = "Rescoring failed, retry with the recalculate endpoint")
    ),
    tag = "admin"
)]
pub async fn update_cohort(
    State(db): State<Database>,
    Path(username): Path<String>,
    Json(req): Json<UpdateCohortRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let response = services::update_cohort(db.pool(), &username, &req.cohort).await?;

    Ok(Json(response).into_response())
}
