use axum::{Router, routing::get};
use storage::Database;

use super::handlers::get_leaderboard;

pub fn routes() -> Router<Database> {
    Router::new().route("/leaderboard", get(get_leaderboard))
}
