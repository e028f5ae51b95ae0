use sqlx::{PgExecutor, PgPool};

use crate::error::{Result, StorageError};
use crate::models::ActualResult;

pub struct ResultRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ResultRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_week(&self, week: i32) -> Result<Vec<ActualResult>> {
        fetch_week(self.pool, week).await
    }

    /// Records or corrects results of a week in one transaction.
    pub async fn upsert_many(&self, week: i32, scores: &[(String, i32, i32)]) -> Result<Vec<ActualResult>> {
        let mut tx = self.pool.begin().await?;

        for (fixture_id, home, away) in scores {
            sqlx::query(
                r#"
                INSERT INTO actual_results (week, fixture_id, home_score, away_score)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (week, fixture_id) DO UPDATE SET
                    home_score = EXCLUDED.home_score,
                    away_score = EXCLUDED.away_score,
                    recorded_at = CURRENT_TIMESTAMP
                "#,
            )
            .bind(week)
            .bind(fixture_id)
            .bind(home)
            .bind(away)
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::from(e).unknown_fixture(week, fixture_id))?;
        }

        tx.commit().await?;

        self.list_for_week(week).await
    }

    /// Weeks that have at least one recorded result, ascending.
    pub async fn weeks_with_results(&self) -> Result<Vec<i32>> {
        let weeks = sqlx::query_scalar::<_, i32>(
            "SELECT DISTINCT week FROM actual_results ORDER BY week",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(weeks)
    }
}

pub(crate) async fn fetch_week<'e, E>(executor: E, week: i32) -> Result<Vec<ActualResult>>
where
    E: PgExecutor<'e>,
{
    let results = sqlx::query_as::<_, ActualResult>(
        r#"
        SELECT week, fixture_id, home_score, away_score, recorded_at
        FROM actual_results
        WHERE week = $1
        ORDER BY fixture_id
        "#,
    )
    .bind(week)
    .fetch_all(executor)
    .await?;

    Ok(results)
}
