use axum::{
    Router,
    routing::{get, put},
};
use storage::Database;

use super::handlers::{list_member_predictions, submit_predictions};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/:week/predictions", put(submit_predictions))
        .route("/:week/predictions/:username", get(list_member_predictions))
}
