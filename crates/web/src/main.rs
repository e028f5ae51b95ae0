use anyhow::Context;
use storage::Database;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;
mod routes;

use config::Config;
use features::{leaderboard, members, predictions, results, season, weeks};
use middleware::auth::ApiKeys;

#[derive(OpenApi)]
#[openapi(
    paths(
        members::handlers::list_members,
        members::handlers::create_member,
        members::handlers::update_cohort,
        weeks::handlers::get_current_week,
        weeks::handlers::list_fixtures,
        weeks::handlers::set_current_week,
        weeks::handlers::set_deadline,
        weeks::handlers::replace_fixtures,
        predictions::handlers::submit_predictions,
        predictions::handlers::list_member_predictions,
        results::handlers::list_results,
        results::handlers::record_results,
        results::handlers::recalculate_week,
        season::handlers::reset_season,
        leaderboard::handlers::get_leaderboard,
    ),
    components(
        schemas(
            storage::dto::member::CreateMemberRequest,
            storage::dto::member::UpdateCohortRequest,
            storage::dto::member::CohortChangeResponse,
            storage::dto::fixture::FixtureInput,
            storage::dto::fixture::ReplaceFixturesRequest,
            storage::dto::week::CurrentWeekResponse,
            storage::dto::week::SetCurrentWeekRequest,
            storage::dto::week::SetDeadlineRequest,
            storage::dto::score::ScoreInput,
            storage::dto::score::RejectedScore,
            storage::dto::score::SubmitPredictionsRequest,
            storage::dto::score::SubmitPredictionsResponse,
            storage::dto::score::RecordResultsRequest,
            storage::dto::score::RecordResultsResponse,
            storage::dto::standings::LeaderboardEntry,
            storage::dto::standings::LeaderboardResponse,
            storage::models::Member,
            storage::models::Fixture,
            storage::models::Prediction,
            storage::models::ActualResult,
            storage::models::WeekSettings,
            storage::services::scoring::WeekRecalculation,
            storage::services::scoring::MemberWeekScore,
            storage::repository::season::SeasonReset,
        )
    ),
    tags(
        (name = "members", description = "League member endpoints"),
        (name = "weeks", description = "Weeks, fixtures and results"),
        (name = "predictions", description = "Prediction submission"),
        (name = "leaderboard", description = "League standings"),
        (name = "admin", description = "Administrator endpoints, bearer key required"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting prediction league API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    if api_keys.is_empty() {
        tracing::warn!("API_KEYS is empty, admin endpoints will reject every request");
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::router(api_keys)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .with_state(db);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
