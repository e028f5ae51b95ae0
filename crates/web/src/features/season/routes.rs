use axum::{Router, routing::post};
use storage::Database;

use super::handlers::reset_season;

pub fn admin_routes() -> Router<Database> {
    Router::new().route("/reset", post(reset_season))
}
