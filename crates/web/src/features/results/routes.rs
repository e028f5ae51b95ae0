use axum::{
    Router,
    routing::{get, post, put},
};
use storage::Database;

use super::handlers::{list_results, recalculate_week, record_results};

pub fn routes() -> Router<Database> {
    Router::new().route("/:week/results", get(list_results))
}

pub fn admin_routes() -> Router<Database> {
    Router::new()
        .route("/:week/results", put(record_results))
        .route("/:week/recalculate", post(recalculate_week))
}
