use sqlx::{PgExecutor, PgPool};

use crate::error::{Result, StorageError};
use crate::models::Prediction;

pub struct PredictionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PredictionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_week(&self, week: i32) -> Result<Vec<Prediction>> {
        fetch_week(self.pool, week).await
    }

    pub async fn list_for_member(&self, week: i32, username: &str) -> Result<Vec<Prediction>> {
        let predictions = sqlx::query_as::<_, Prediction>(
            r#"
            SELECT p.username, p.week, p.fixture_id, p.home_score, p.away_score, p.submitted_at
            FROM predictions p
            INNER JOIN fixtures f ON f.week = p.week AND f.fixture_id = p.fixture_id
            WHERE p.week = $1 AND p.username = $2
            ORDER BY f.display_order, p.fixture_id
            "#,
        )
        .bind(week)
        .bind(username)
        .fetch_all(self.pool)
        .await?;

        Ok(predictions)
    }

    /// Upserts a member's predictions for a week in one transaction.
    /// A later write for the same fixture replaces the earlier one.
    pub async fn upsert_many(
        &self,
        username: &str,
        week: i32,
        scores: &[(String, i32, i32)],
    ) -> Result<Vec<Prediction>> {
        let mut tx = self.pool.begin().await?;

        for (fixture_id, home, away) in scores {
            sqlx::query(
                r#"
                INSERT INTO predictions (username, week, fixture_id, home_score, away_score)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (username, week, fixture_id) DO UPDATE SET
                    home_score = EXCLUDED.home_score,
                    away_score = EXCLUDED.away_score,
                    submitted_at = CURRENT_TIMESTAMP
                "#,
            )
            .bind(username)
            .bind(week)
            .bind(fixture_id)
            .bind(home)
            .bind(away)
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::from(e).unknown_fixture(week, fixture_id))?;
        }

        tx.commit().await?;

        self.list_for_member(week, username).await
    }
}

pub(crate) async fn fetch_week<'e, E>(executor: E, week: i32) -> Result<Vec<Prediction>>
where
    E: PgExecutor<'e>,
{
    let predictions = sqlx::query_as::<_, Prediction>(
        r#"
        SELECT username, week, fixture_id, home_score, away_score, submitted_at
        FROM predictions
        WHERE week = $1
        ORDER BY fixture_id, username
        "#,
    )
    .bind(week)
    .fetch_all(executor)
    .await?;

    Ok(predictions)
}
