use std::collections::BTreeMap;

use sqlx::{PgExecutor, PgPool};

use crate::error::{Result, StorageError, Violation};
use crate::models::Member;
use crate::repository::standings::lock_totals;

pub struct MemberRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MemberRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Registers a member. Usernames are unique.
    ///
    /// A username may already own stored week points, e.g. an imported
    /// predictor who was never registered; the new row starts from their sum.
    pub async fn create(&self, username: &str, cohort: &str) -> Result<Member> {
        let mut tx = self.pool.begin().await?;
        lock_totals(&mut tx, [username]).await?;

        let member = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (username, cohort, total_points)
            VALUES ($1, $2, (
                SELECT COALESCE(SUM(points), 0)::BIGINT FROM week_points WHERE username = $1
            ))
            RETURNING username, cohort, total_points, created_at
            "#,
        )
        .bind(username)
        .bind(cohort)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            StorageError::from(e).explain(Violation::Unique, || {
                format!("Username '{}' is already taken", username)
            })
        })?;

        tx.commit().await?;

        Ok(member)
    }

    pub async fn find(&self, username: &str) -> Result<Member> {
        sqlx::query_as::<_, Member>(
            r#"
            SELECT username, cohort, total_points, created_at
            FROM members
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn list(&self) -> Result<Vec<Member>> {
        let members = sqlx::query_as::<_, Member>(
            r#"
            SELECT username, cohort, total_points, created_at
            FROM members
            ORDER BY username
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(members)
    }

    pub async fn list_usernames(&self) -> Result<Vec<String>> {
        let usernames = sqlx::query_scalar::<_, String>("SELECT username FROM members ORDER BY username")
            .fetch_all(self.pool)
            .await?;

        Ok(usernames)
    }

    pub async fn cohort_of(&self, username: &str) -> Result<Option<String>> {
        let cohort = sqlx::query_scalar::<_, String>("SELECT cohort FROM members WHERE username = $1")
            .bind(username)
            .fetch_optional(self.pool)
            .await?;

        Ok(cohort)
    }

    pub async fn update_cohort(&self, username: &str, cohort: &str) -> Result<Member> {
        sqlx::query_as::<_, Member>(
            r#"
            UPDATE members
            SET cohort = $2
            WHERE username = $1
            RETURNING username, cohort, total_points, created_at
            "#,
        )
        .bind(username)
        .bind(cohort)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Inserts or updates a member, used by bulk imports. The stored total
    /// is rewritten from the member's stored weeks either way.
    pub async fn ensure(&self, username: &str, cohort: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        lock_totals(&mut tx, [username]).await?;

        sqlx::query(
            r#"
            INSERT INTO members (username, cohort, total_points)
            VALUES ($1, $2, (
                SELECT COALESCE(SUM(points), 0)::BIGINT FROM week_points WHERE username = $1
            ))
            ON CONFLICT (username) DO UPDATE SET
                cohort = EXCLUDED.cohort,
                total_points = EXCLUDED.total_points
            "#,
        )
        .bind(username)
        .bind(cohort)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }
}

/// username -> cohort of every registered member, in one query.
pub(crate) async fn fetch_cohorts<'e, E>(executor: E) -> Result<BTreeMap<String, String>>
where
    E: PgExecutor<'e>,
{
    let rows = sqlx::query_as::<_, (String, String)>("SELECT username, cohort FROM members")
        .fetch_all(executor)
        .await?;

    Ok(rows.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::standings::StandingsRepository;
    use crate::test_support::{database, unique_name};

    #[tokio::test]
    async fn test_registration_starts_from_stored_weeks() {
        let Some(db) = database().await else {
            return;
        };
        let username = unique_name("late-member");
        let points = BTreeMap::from([(username.clone(), 6)]);
        StandingsRepository::new(db.pool()).commit_week(1, &points).await.unwrap();

        let member = MemberRepository::new(db.pool())
            .create(&username, "A")
            .await
            .unwrap();

        assert_eq!(member.total_points, 6);
    }

    #[tokio::test]
    async fn test_ensure_rewrites_total_from_weeks() {
        let Some(db) = database().await else {
            return;
        };
        let username = unique_name("imported");
        let standings = StandingsRepository::new(db.pool());
        standings
            .commit_week(1, &BTreeMap::from([(username.clone(), 3)]))
            .await
            .unwrap();
        standings
            .commit_week(2, &BTreeMap::from([(username.clone(), 1)]))
            .await
            .unwrap();

        let members = MemberRepository::new(db.pool());
        members.ensure(&username, "B").await.unwrap();

        let member = members.find(&username).await.unwrap();
        assert_eq!(member.cohort, "B");
        assert_eq!(member.total_points, 4);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_a_constraint_violation() {
        let Some(db) = database().await else {
            return;
        };
        let username = unique_name("taken");
        let members = MemberRepository::new(db.pool());
        members.create(&username, "A").await.unwrap();

        let err = members.create(&username, "A").await.unwrap_err();
        assert!(matches!(err, StorageError::ConstraintViolation(_)));
    }
}
