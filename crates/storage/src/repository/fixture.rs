use chrono::NaiveDateTime;
use sqlx::{PgConnection, PgPool};

use crate::error::{Result, StorageError};
use crate::models::{Fixture, fixture_id};

/// Fields of a fixture before its identifier is derived.
#[derive(Debug, Clone)]
pub struct NewFixture {
    pub home_team: String,
    pub away_team: String,
    pub kickoff: Option<NaiveDateTime>,
    pub display_order: i32,
}

pub struct FixtureRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FixtureRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_week(&self, week: i32) -> Result<Vec<Fixture>> {
        let fixtures = sqlx::query_as::<_, Fixture>(
            r#"
            SELECT week, fixture_id, home_team, away_team, kickoff, display_order
            FROM fixtures
            WHERE week = $1
            ORDER BY display_order, fixture_id
            "#,
        )
        .bind(week)
        .fetch_all(self.pool)
        .await?;

        Ok(fixtures)
    }

    /// Replaces the fixture list of a week.
    ///
    /// Fixtures that stay in the list keep their predictions; removed ones
    /// take their predictions with them. Refused once the week has results.
    pub async fn replace_for_week(&self, week: i32, fixtures: &[NewFixture]) -> Result<Vec<Fixture>> {
        let mut tx = self.pool.begin().await?;

        let has_results: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM actual_results WHERE week = $1)",
        )
        .bind(week)
        .fetch_one(&mut *tx)
        .await?;

        if has_results {
            return Err(StorageError::ConstraintViolation(format!(
                "Fixtures of week {} are locked because results were recorded",
                week
            )));
        }

        let ids: Vec<String> = fixtures
            .iter()
            .map(|f| fixture_id(&f.home_team, &f.away_team))
            .collect();

        sqlx::query("DELETE FROM fixtures WHERE week = $1 AND NOT (fixture_id = ANY($2))")
            .bind(week)
            .bind(&ids)
            .execute(&mut *tx)
            .await?;

        upsert_fixtures(&mut tx, week, fixtures).await?;

        tx.commit().await?;

        self.list_for_week(week).await
    }

    /// Adds or updates fixtures without removing others and without the
    /// results lock. Used by bulk imports that bring their own results.
    pub async fn merge_for_week(&self, week: i32, fixtures: &[NewFixture]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        upsert_fixtures(&mut tx, week, fixtures).await?;
        tx.commit().await?;
        Ok(())
    }
}

async fn upsert_fixtures(conn: &mut PgConnection, week: i32, fixtures: &[NewFixture]) -> Result<()> {
    for fixture in fixtures {
        sqlx::query(
            r#"
            INSERT INTO fixtures (week, fixture_id, home_team, away_team, kickoff, display_order)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (week, fixture_id) DO UPDATE SET
                home_team = EXCLUDED.home_team,
                away_team = EXCLUDED.away_team,
                kickoff = EXCLUDED.kickoff,
                display_order = EXCLUDED.display_order
            "#,
        )
        .bind(week)
        .bind(fixture_id(&fixture.home_team, &fixture.away_team))
        .bind(fixture.home_team.trim())
        .bind(fixture.away_team.trim())
        .bind(fixture.kickoff)
        .bind(fixture.display_order)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}
