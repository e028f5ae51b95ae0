use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub mod dto;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod store;

use error::Result;

/// Shared handle to the league database.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Wraps an existing pool, e.g. a lazily connecting one.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Helpers for tests that talk to Postgres. They only run when
/// `TEST_DATABASE_URL` points at a scratch database.
#[cfg(test)]
pub(crate) mod test_support {
    use super::Database;

    pub async fn database() -> Option<Database> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        let db = Database::new(&url).await.expect("TEST_DATABASE_URL is not reachable");
        db.run_migrations().await.expect("migrations failed");
        Some(db)
    }

    /// A username no other test run uses.
    pub fn unique_name(prefix: &str) -> String {
        let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        format!("{}-{}", prefix, nanos)
    }
}
