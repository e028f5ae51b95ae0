use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use utoipa::ToSchema;

use crate::error::Result;

/// Rows removed by a season reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct SeasonReset {
    pub members: u64,
    pub fixtures: u64,
    pub predictions: u64,
    pub results: u64,
    pub week_points: u64,
}

impl SeasonReset {
    pub fn summary(&self) -> String {
        format!(
            "Season reset: {} members, {} fixtures, {} predictions, {} results and {} week scores removed; current week is 1",
            self.members, self.fixtures, self.predictions, self.results, self.week_points
        )
    }
}

pub struct SeasonRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SeasonRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Empties the league: members, fixtures, predictions, results, scores
    /// and deadlines, and moves the current week back to 1. All or nothing.
    pub async fn reset(&self) -> Result<SeasonReset> {
        let mut tx = self.pool.begin().await?;

        // Children before parents: predictions and results reference fixtures.
        let reset = SeasonReset {
            week_points: delete_all(&mut tx, "week_points").await?,
            predictions: delete_all(&mut tx, "predictions").await?,
            results: delete_all(&mut tx, "actual_results").await?,
            fixtures: delete_all(&mut tx, "fixtures").await?,
            members: delete_all(&mut tx, "members").await?,
        };
        delete_all(&mut tx, "weeks").await?;

        sqlx::query("UPDATE league_settings SET current_week = 1 WHERE id = 1")
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!("{}", reset.summary());
        Ok(reset)
    }
}

async fn delete_all(conn: &mut PgConnection, table: &'static str) -> Result<u64> {
    let deleted = sqlx::query(&format!("DELETE FROM {}", table))
        .execute(&mut *conn)
        .await?
        .rows_affected();

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::member::MemberRepository;
    use crate::repository::week::WeekRepository;
    use crate::test_support::{database, unique_name};

    #[test]
    fn test_summary_names_every_count() {
        let reset = SeasonReset {
            members: 4,
            fixtures: 10,
            predictions: 40,
            results: 10,
            week_points: 8,
        };
        assert_eq!(
            reset.summary(),
            "Season reset: 4 members, 10 fixtures, 40 predictions, 10 results and 8 week scores removed; current week is 1"
        );
    }

    /// Wipes every table, so it must not share a database with other tests.
    #[tokio::test]
    #[ignore = "empties the whole test database"]
    async fn test_reset_empties_league_and_rewinds_week() {
        let Some(db) = database().await else {
            return;
        };
        let username = unique_name("reset");
        MemberRepository::new(db.pool()).create(&username, "A").await.unwrap();
        let weeks = WeekRepository::new(db.pool());
        weeks.set_current_week(5).await.unwrap();
        weeks.set_deadline(5, None).await.unwrap();

        let reset = SeasonRepository::new(db.pool()).reset().await.unwrap();

        assert!(reset.members >= 1);
        assert!(MemberRepository::new(db.pool()).list().await.unwrap().is_empty());
        assert_eq!(weeks.current_week().await.unwrap(), 1);
    }
}
