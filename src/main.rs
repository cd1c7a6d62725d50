//! sweather - AI wardrobe assistant service
//!
//! Serves the embedded browser UI and JSON API on a local port. Requires a
//! Gemini API key (env or TOML config) for the classification and
//! recommendation features.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use sweather::gateway::GeminiClient;
use sweather::{build_router, config, db, AppState};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "sweather", about = "AI wardrobe assistant")]
struct Cli {
    /// Data folder holding the wardrobe database
    #[arg(long)]
    data_folder: Option<PathBuf>,

    /// Port to listen on
    #[arg(long, env = "SWEATHER_PORT", default_value_t = 5780)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting sweather v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let cli = Cli::parse();
    let toml_config = config::load_toml_config();

    // Resolve and prepare the data folder
    let data_folder = config::resolve_data_folder(cli.data_folder.as_deref(), toml_config.as_ref());
    config::ensure_data_folder(&data_folder)?;

    let db_path = config::database_path(&data_folder);
    info!("Database path: {}", db_path.display());

    let pool = db::init_pool(&db_path).await?;
    info!("Database connection established");

    // AI gateway: key resolution fails fast with configuration guidance
    let api_key = config::resolve_api_key(toml_config.as_ref())?;
    let model = config::resolve_model(toml_config.as_ref());
    info!("AI gateway model: {}", model);
    let advisor = Arc::new(GeminiClient::new(api_key, model));

    let state = AppState::new(pool, advisor);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", cli.port)).await?;
    info!("sweather listening on http://127.0.0.1:{}", cli.port);
    info!("Health check: http://127.0.0.1:{}/health", cli.port);

    axum::serve(listener, app).await?;

    Ok(())
}
