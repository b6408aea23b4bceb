//! ClassQuest Engine - outbox worker entry point.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use classquest_engine::infrastructure::{
    clock::{SystemClock, SystemRandom},
    config::EngineConfig,
    outbox_worker::outbox_worker,
    ports::{ClockPort, OutboxStatus, RandomPort},
    sqlite::SqliteRepositories,
};
use classquest_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root so the binary works from `crates/engine`.
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "classquest_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ClassQuest Engine");

    let config = EngineConfig::from_env();
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);
    let random: Arc<dyn RandomPort> = Arc::new(SystemRandom);

    tracing::info!(db_path = %config.db_path, "Opening SQLite store");
    let repos = SqliteRepositories::open(&config.db_path, clock.clone()).await?;
    let app = App::new(repos, clock, random, &config);

    let dead = app
        .repositories
        .outbox
        .count_by_status(OutboxStatus::Dead)
        .await?;
    if dead > 0 {
        tracing::warn!(dead, "Outbox has dead entries that need attention");
    }

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    outbox_worker(&app.use_cases.drain_outbox, &config, shutdown).await;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
