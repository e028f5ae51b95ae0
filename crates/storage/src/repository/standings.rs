use std::collections::BTreeMap;

use sqlx::{PgConnection, PgPool};

use crate::error::{Result, StorageError};
use crate::models::WeekPoints;

pub struct StandingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StandingsRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_week_points(&self) -> Result<Vec<WeekPoints>> {
        let rows = sqlx::query_as::<_, WeekPoints>(
            "SELECT username, week, points FROM week_points ORDER BY username, week",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Writes a week's points and the recomputed totals in one transaction.
    /// Any failure rolls back every write of this commit. Commits of
    /// different weeks touching the same member run one after the other, so
    /// each total is summed over the other commit's weeks as committed.
    pub async fn commit_week(
        &self,
        week: i32,
        points: &BTreeMap<String, u32>,
    ) -> Result<BTreeMap<String, i64>> {
        let mut tx = self.pool.begin().await?;
        let mut totals = BTreeMap::new();

        lock_totals(&mut tx, points.keys().map(String::as_str)).await?;

        for (username, earned) in points {
            save_week_points(&mut tx, username, week, i64::from(*earned)).await?;
        }

        for username in points.keys() {
            let total = save_cumulative_total(&mut tx, username).await?;
            totals.insert(username.clone(), total);
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::Persistence(format!("commit of week {} failed: {}", week, e)))?;

        Ok(totals)
    }
}

/// Serializes writers of the given members' totals until the transaction
/// ends. Works for usernames without a `members` row too. Locks are taken in
/// the order given; callers pass usernames sorted.
pub(crate) async fn lock_totals<'u>(
    conn: &mut PgConnection,
    usernames: impl IntoIterator<Item = &'u str>,
) -> Result<()> {
    for username in usernames {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(username)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

async fn save_week_points(conn: &mut PgConnection, username: &str, week: i32, points: i64) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO week_points (username, week, points)
        VALUES ($1, $2, $3)
        ON CONFLICT (username, week) DO UPDATE SET
            points = EXCLUDED.points,
            computed_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(username)
    .bind(week)
    .bind(points)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Recomputes a user's total from their stored weeks and writes it back.
async fn save_cumulative_total(conn: &mut PgConnection, username: &str) -> Result<i64> {
    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COALESCE(SUM(points), 0)::BIGINT FROM week_points WHERE username = $1",
    )
    .bind(username)
    .fetch_one(&mut *conn)
    .await?;

    sqlx::query("UPDATE members SET total_points = $2 WHERE username = $1")
        .bind(username)
        .bind(total)
        .execute(&mut *conn)
        .await?;

    Ok(total)
}
