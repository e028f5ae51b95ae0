use axum::{
    Router,
    routing::{get, put},
};
use storage::Database;

use super::handlers::{get_current_week, list_fixtures, replace_fixtures, set_current_week, set_deadline};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/current", get(get_current_week))
        .route("/:week/fixtures", get(list_fixtures))
}

pub fn admin_routes() -> Router<Database> {
    Router::new()
        .route("/current", put(set_current_week))
        .route("/:week/deadline", put(set_deadline))
        .route("/:week/fixtures", put(replace_fixtures))
}
