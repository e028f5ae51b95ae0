use std::collections::BTreeMap;
use std::path::PathBuf;

use admin::{AdminError, ImportPlan, LegacyData};
use clap::{Parser, Subcommand};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use storage::{
    Database,
    dto::standings::LeaderboardResponse,
    models::build_standings,
    repository::{
        fixture::FixtureRepository, member::MemberRepository, prediction::PredictionRepository,
        result::ResultRepository, season::SeasonRepository, standings::StandingsRepository,
        week::WeekRepository,
    },
    store::PgLeagueStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "league-admin")]
#[command(about = "Prediction league administration", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rescore a week from its stored predictions and results
    Recalculate {
        #[command(flatten)]
        target: RecalculateTarget,
    },
    /// Print the leaderboard
    Standings,
    /// Import the JSON data directory of the previous league application
    ImportLegacy {
        #[arg(long)]
        dir: PathBuf,

        /// Week the entries of fixtures.json belong to (defaults to the legacy current week)
        #[arg(long)]
        week: Option<i32>,

        #[arg(long)]
        dry_run: bool,
    },
    /// Remove all members, fixtures, predictions, results and deadlines and
    /// start again at week 1
    Reset {
        /// Required, the reset cannot be undone
        #[arg(long)]
        yes: bool,
    },
}

#[derive(clap::Args)]
#[group(required = true, multiple = false)]
struct RecalculateTarget {
    #[arg(short, long)]
    week: Option<i32>,

    /// Every week with recorded results
    #[arg(long)]
    all: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "league_admin={},admin={},storage={}",
                    log_level, log_level, log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Recalculate { target } => {
            let pool = connect(&cli.database_url).await?;
            handle_recalculate(&pool, target).await?;
        }
        Commands::Standings => {
            let pool = connect(&cli.database_url).await?;
            handle_standings(&pool).await?;
        }
        Commands::ImportLegacy { dir, week, dry_run } => {
            handle_import_legacy(dir, week, dry_run, &cli.database_url).await?;
        }
        Commands::Reset { yes } => {
            if !yes {
                return Err("Refusing to reset the season without --yes".into());
            }
            let pool = connect(&cli.database_url).await?;
            let reset = SeasonRepository::new(&pool).reset().await?;
            tracing::info!("✓ {}", reset.summary());
        }
    }

    Ok(())
}

async fn connect(database_url: &str) -> Result<PgPool, Box<dyn std::error::Error>> {
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Database::from_pool(pool.clone()).run_migrations().await?;

    Ok(pool)
}

async fn handle_recalculate(
    pool: &PgPool,
    target: RecalculateTarget,
) -> Result<(), Box<dyn std::error::Error>> {
    let weeks = if target.all {
        ResultRepository::new(pool).weeks_with_results().await?
    } else {
        target.week.into_iter().collect()
    };

    if weeks.is_empty() {
        tracing::warn!("No week has recorded results, nothing to recalculate");
        return Ok(());
    }

    recalculate_weeks(pool, &weeks).await
}

async fn recalculate_weeks(pool: &PgPool, weeks: &[i32]) -> Result<(), Box<dyn std::error::Error>> {
    let store = PgLeagueStore::new(pool.clone());

    for recalculation in storage::services::scoring::recalculate_weeks(&store, weeks).await? {
        tracing::info!("✓ {}", recalculation.summary());
    }

    Ok(())
}

async fn handle_standings(pool: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let cohorts: BTreeMap<String, String> = MemberRepository::new(pool)
        .list()
        .await?
        .into_iter()
        .map(|m| (m.username, m.cohort))
        .collect();
    let rows = StandingsRepository::new(pool).list_week_points().await?;
    let leaderboard = LeaderboardResponse::from_standings(build_standings(&cohorts, rows));

    if leaderboard.standings.is_empty() {
        println!("No members yet");
        return Ok(());
    }

    println!("{:>4}  {:<20} {:<6} {:>6}", "#", "username", "cohort", "total");
    for entry in &leaderboard.standings {
        println!(
            "{:>4}  {:<20} {:<6} {:>6}",
            entry.rank, entry.username, entry.cohort, entry.total_points
        );
    }

    Ok(())
}

async fn handle_import_legacy(
    dir: PathBuf,
    week: Option<i32>,
    dry_run: bool,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if !dir.is_dir() {
        return Err(AdminError::LegacyDataError(format!("{} is not a directory", dir.display())).into());
    }

    tracing::info!("Loading legacy data from: {}", dir.display());
    let data = LegacyData::load_dir(&dir).await?;
    let plan = ImportPlan::from_legacy(data, week);

    for reason in &plan.skipped {
        tracing::warn!("Skipped {}", reason);
    }
    tracing::info!("Import plan: {}", plan.summary());

    if dry_run {
        return Ok(());
    }

    let pool = connect(database_url).await?;
    apply_plan(&pool, &plan).await?;
    tracing::info!("✓ Legacy data written");

    recalculate_weeks(&pool, &plan.weeks_with_results()).await?;
    tracing::info!("✓ Import completed successfully!");

    Ok(())
}

/// Fixtures go first so predictions and results can reference them.
async fn apply_plan(pool: &PgPool, plan: &ImportPlan) -> Result<(), AdminError> {
    let members = MemberRepository::new(pool);
    for (username, cohort) in &plan.members {
        members.ensure(username, cohort).await?;
    }

    let weeks = WeekRepository::new(pool);
    weeks.set_current_week(plan.current_week).await?;
    for (week, deadline) in &plan.deadlines {
        weeks.set_deadline(*week, Some(*deadline)).await?;
    }

    let fixtures = FixtureRepository::new(pool);
    for (week, list) in &plan.fixtures {
        tracing::debug!("Week {}: {} fixtures", week, list.len());
        fixtures.merge_for_week(*week, list).await?;
    }

    let predictions = PredictionRepository::new(pool);
    for ((username, week), lines) in &plan.predictions {
        predictions.upsert_many(username, *week, lines).await?;
    }

    let results = ResultRepository::new(pool);
    for (week, lines) in &plan.results {
        results.upsert_many(*week, lines).await?;
    }

    Ok(())
}
