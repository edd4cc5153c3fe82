use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stagiaires_api::config::{self, AppConfig};
use stagiaires_api::database::DatabaseManager;
use stagiaires_api::{app, AppState};

#[derive(Debug, Parser)]
#[command(name = "stagiaires-api", version, about = "Internship administration API server")]
struct Args {
    /// Bind address (overrides API_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Listen port (overrides API_PORT / PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Apply the bundled migrations before serving
    #[arg(long)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up SUPABASE_URL, DATABASE_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("stagiaires_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let mut config: AppConfig = config::config().clone();
    if let Some(host) = args.host {
        config.api.host = host;
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }
    config.validate().context("invalid configuration")?;
    tracing::info!("Starting Stagiaires API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database).context("database setup failed")?;
    if args.migrate || config.database.run_migrations {
        DatabaseManager::migrate(&pool).await.context("migrations failed")?;
    }

    let bind_addr = format!("{}:{}", config.api.host, config.api.port);
    let router = app(AppState::postgres(config, pool.clone()));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    DatabaseManager::close(pool).await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
