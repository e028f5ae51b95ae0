use axum::{
    Router,
    routing::{get, put},
};
use storage::Database;

use super::handlers::{create_member, list_members, update_cohort};

pub fn routes() -> Router<Database> {
    Router::new().route("/", get(list_members).post(create_member))
}

pub fn admin_routes() -> Router<Database> {
    Router::new().route("/:username/cohort", put(update_cohort))
}
