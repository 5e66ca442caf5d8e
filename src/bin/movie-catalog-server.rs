use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use movie_catalog::{
    AppState, SharedState, api, auth::hash_password, config::AppConfig, db, db::SqliteDbRepo,
};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, rename_all = "kebab-case")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Command {
    /// Serve the catalog API
    Serve(ServeArgs),
    /// Print an Argon2 hash for storing in users.password
    HashPassword {
        /// Plaintext password to hash
        password: String,
    },
}

#[derive(clap::Args, Debug)]
#[command(rename_all = "kebab-case")]
struct ServeArgs {
    /// Path to the SQLite catalog database
    #[arg(long, value_name = "PATH")]
    db_path: PathBuf,
    /// Listen address for the HTTP server
    #[arg(long, value_name = "ADDR", default_value = "0.0.0.0:8080")]
    listen: SocketAddr,
    /// Maximum number of pooled database connections
    #[arg(long, value_name = "N", default_value_t = 5)]
    max_connections: u32,
    /// Per-call database timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 3)]
    query_timeout_secs: u64,
    /// Origin allowed by CORS (repeat for multiple values; any origin if omitted)
    #[arg(long = "allowed-origin", value_name = "ORIGIN")]
    allowed_origin: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    match Cli::parse().command {
        Command::Serve(args) => serve(args).await,
        Command::HashPassword { password } => {
            println!("{}", hash_password(&password)?);
            Ok(())
        }
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    let config = build_app_config(&args)?;
    let state = init_shared_state(&args, config).await?;

    let app = api::create_router(state);

    let listener = TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("failed to bind to {}", args.listen))?;

    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited with error")?;

    Ok(())
}

async fn init_shared_state(args: &ServeArgs, config: AppConfig) -> Result<SharedState> {
    if !args.db_path.exists() {
        bail!("database {} does not exist", args.db_path.display());
    }

    let pool = db::init_db(&args.db_path, args.max_connections)
        .await
        .with_context(|| format!("failed to open database {}", args.db_path.display()))?;
    let repo = SqliteDbRepo::with_timeout(pool, config.query_timeout);

    Ok(Arc::new(AppState {
        config,
        repo: Arc::new(repo),
    }))
}

fn build_app_config(args: &ServeArgs) -> Result<AppConfig> {
    if args.query_timeout_secs == 0 {
        bail!("--query-timeout-secs must be at least 1");
    }
    if args.max_connections == 0 {
        bail!("--max-connections must be at least 1");
    }

    let allowed_origins = args
        .allowed_origin
        .iter()
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
        .collect();

    Ok(AppConfig {
        query_timeout: Duration::from_secs(args.query_timeout_secs),
        allowed_origins,
    })
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!("failed to install CTRL+C handler: {err}");
    }
    info!("shutdown signal received");
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}
