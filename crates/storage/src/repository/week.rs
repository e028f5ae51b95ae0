use chrono::NaiveDateTime;
use sqlx::PgPool;

use crate::error::Result;
use crate::models::WeekSettings;

pub struct WeekRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WeekRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn current_week(&self) -> Result<i32> {
        let week = sqlx::query_scalar::<_, i32>("SELECT current_week FROM league_settings WHERE id = 1")
            .fetch_one(self.pool)
            .await?;

        Ok(week)
    }

    pub async fn set_current_week(&self, week: i32) -> Result<()> {
        sqlx::query("UPDATE league_settings SET current_week = $1 WHERE id = 1")
            .bind(week)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Settings of a week; weeks never configured have no deadline.
    pub async fn settings(&self, week: i32) -> Result<WeekSettings> {
        let settings = sqlx::query_as::<_, WeekSettings>(
            "SELECT week, prediction_deadline FROM weeks WHERE week = $1",
        )
        .bind(week)
        .fetch_optional(self.pool)
        .await?;

        Ok(settings.unwrap_or(WeekSettings {
            week,
            prediction_deadline: None,
        }))
    }

    pub async fn set_deadline(&self, week: i32, deadline: Option<NaiveDateTime>) -> Result<WeekSettings> {
        let settings = sqlx::query_as::<_, WeekSettings>(
            r#"
            INSERT INTO weeks (week, prediction_deadline)
            VALUES ($1, $2)
            ON CONFLICT (week) DO UPDATE SET prediction_deadline = EXCLUDED.prediction_deadline
            RETURNING week, prediction_deadline
            "#,
        )
        .bind(week)
        .bind(deadline)
        .fetch_one(self.pool)
        .await?;

        Ok(settings)
    }
}
