mod config;
mod error;
mod handlers;
mod metrics;
mod state;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use girder_billing::BillingService;
use girder_store_sqlite::SqliteStore;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use config::ServerConfig;
use state::AppState;

// ────────────────────────────────────── CLI Types ──────────────────────────────────────

#[derive(Parser)]
#[command(name = "girder-server")]
#[command(about = "Girder subscription/quota API server")]
struct Cli {
    /// Database URL (sqlite://path/to/db.db)
    #[arg(long, global = true, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API server
    Serve {
        /// Server address
        #[arg(long, default_value = "0.0.0.0:8080", env = "GIRDER_ADDR")]
        addr: String,
    },
    /// Seed the built-in plan catalog and exit
    SeedPlans,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let db_url = cli
        .database_url
        .unwrap_or_else(|| "sqlite://girder.db?mode=rwc".to_string());

    match cli.command {
        Command::Serve { addr } => cmd_serve(&db_url, &addr).await?,
        Command::SeedPlans => cmd_seed_plans(&db_url).await?,
    }

    Ok(())
}

async fn cmd_serve(db_url: &str, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let addr: std::net::SocketAddr = addr.parse()?;
    let server_config = ServerConfig::from_env()?;

    let store = Arc::new(SqliteStore::open(db_url).await?);
    let billing = Arc::new(BillingService::new(store));
    if server_config.seed_plans_on_start {
        billing.seed_plans().await?;
    }

    let metrics_handle = metrics::init_metrics();
    let app_state = AppState {
        billing,
        metrics: metrics_handle,
    };

    let app = handlers::router(app_state);
    let app = if server_config.request_log {
        app.layer(TraceLayer::new_for_http())
    } else {
        app
    };

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;
    tracing::info!(addr = %actual_addr, "girder-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn cmd_seed_plans(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = Arc::new(SqliteStore::open(db_url).await?);
    let billing = BillingService::new(store);
    billing.seed_plans().await?;
    let plans = billing.all_plans().await?;
    println!("{} plans in catalog:", plans.len());
    for plan in plans {
        println!("  {} ({}, {}/mo)", plan.id, plan.tier.as_str(), plan.price_monthly);
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
