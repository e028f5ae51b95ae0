use sqlx::PgPool;
use storage::{
    error::Result,
    repository::season::{SeasonRepository, SeasonReset},
};

/// Start a new season from an empty league
pub async fn reset_season(pool: &PgPool) -> Result<SeasonReset> {
    SeasonRepository::new(pool).reset().await
}
