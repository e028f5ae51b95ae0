use chrono::NaiveDateTime;
use sqlx::PgPool;
use storage::{
    dto::{fixture::ReplaceFixturesRequest, week::CurrentWeekResponse},
    error::Result,
    models::{Fixture, WeekSettings},
    repository::{fixture::FixtureRepository, week::WeekRepository},
};

/// Current week with its deadline, evaluated at `now`
pub async fn get_current_week(pool: &PgPool, now: NaiveDateTime) -> Result<CurrentWeekResponse> {
    let repo = WeekRepository::new(pool);
    let week = repo.current_week().await?;
    let settings = repo.settings(week).await?;

    Ok(CurrentWeekResponse {
        week,
        prediction_deadline: settings.prediction_deadline,
        accepting_predictions: settings.accepts_predictions_at(now),
    })
}

pub async fn set_current_week(pool: &PgPool, week: i32) -> Result<()> {
    WeekRepository::new(pool).set_current_week(week).await?;
    tracing::info!(week, "Current week changed");
    Ok(())
}

pub async fn set_deadline(
    pool: &PgPool,
    week: i32,
    deadline: Option<NaiveDateTime>,
) -> Result<WeekSettings> {
    WeekRepository::new(pool).set_deadline(week, deadline).await
}

pub async fn list_fixtures(pool: &PgPool, week: i32) -> Result<Vec<Fixture>> {
    FixtureRepository::new(pool).list_for_week(week).await
}

pub async fn replace_fixtures(
    pool: &PgPool,
    week: i32,
    request: ReplaceFixturesRequest,
) -> Result<Vec<Fixture>> {
    let fixtures = FixtureRepository::new(pool)
        .replace_for_week(week, &request.into_new_fixtures())
        .await?;

    tracing::info!(week, count = fixtures.len(), "Fixtures replaced");
    Ok(fixtures)
}
