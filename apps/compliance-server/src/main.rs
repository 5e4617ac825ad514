//! Policy Compliance Server
//!
//! Checks the main content of a webpage against a content policy page using
//! a generative model. Provides REST endpoints for:
//!
//! - Compliance checking (`POST /check-compliance`)
//! - Health (`GET /health`)
//! - Interactive API docs (`GET /docs`, `GET /openapi.json`), optional

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use compliance_engine::{FindingValidation, GeminiConfig, GeminiModel, ModelClient};
use text_extraction::{FetchConfig, TextExtractor};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod docs;
mod error;
mod state;

use api::{handle_check_compliance, handle_health};
use docs::ApiDocs;
use state::AppState;

/// Command-line arguments for the compliance server
#[derive(Parser, Debug)]
#[command(name = "compliance-server")]
#[command(about = "Checks webpage content against a content policy")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Gemini API key; requests fail at the model step when empty
    #[arg(long, env = "GEMINI_API_KEY", default_value = "", hide_env_values = true)]
    gemini_api_key: String,

    /// Gemini model name
    #[arg(long, env = "GEMINI_MODEL", default_value = compliance_engine::gemini::DEFAULT_MODEL)]
    model: String,

    /// Gemini API base URL
    #[arg(long, env = "GEMINI_BASE_URL", default_value = compliance_engine::gemini::DEFAULT_BASE_URL)]
    gemini_base_url: String,

    /// How model findings are checked: pass-through, fill-defaults or strict
    #[arg(long, env = "FINDING_VALIDATION", default_value = "pass-through")]
    finding_validation: FindingValidation,

    /// Timeout for fetching pages, in seconds (none by default)
    #[arg(long, env = "FETCH_TIMEOUT_SECS")]
    fetch_timeout_secs: Option<u64>,

    /// Timeout for model calls, in seconds (none by default)
    #[arg(long, env = "MODEL_TIMEOUT_SECS")]
    model_timeout_secs: Option<u64>,

    /// Do not serve the Swagger UI and OpenAPI document
    #[arg(long, env = "DISABLE_DOCS")]
    no_docs: bool,

    /// OpenAPI document to serve instead of the bundled one
    #[arg(long, env = "OPENAPI_PATH")]
    openapi_path: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting compliance server on {}:{}", args.host, args.port);

    let extractor = TextExtractor::http(FetchConfig {
        timeout: args.fetch_timeout_secs.map(Duration::from_secs),
        ..FetchConfig::default()
    })
    .context("Failed to build HTTP client")?;

    if args.gemini_api_key.trim().is_empty() {
        warn!("GEMINI_API_KEY is not set; compliance checks will fail at the model step");
    }
    let model = GeminiModel::new(
        GeminiConfig::new(args.gemini_api_key)
            .with_model(args.model)
            .with_base_url(args.gemini_base_url)
            .with_timeout(args.model_timeout_secs.map(Duration::from_secs)),
    )
    .context("Failed to build model client")?;
    let model_client =
        ModelClient::new(Arc::new(model)).with_validation(args.finding_validation);

    info!("Model: {}", model_client.model_name());
    info!("Finding validation: {}", model_client.validation());

    let docs = if args.no_docs {
        info!("API docs disabled");
        None
    } else {
        let docs = match &args.openapi_path {
            Some(path) => {
                info!("API docs enabled from {}", path.display());
                ApiDocs::load(path)?
            }
            None => {
                info!("API docs enabled");
                ApiDocs::bundled()?
            }
        };
        Some(docs)
    };

    let state = AppState::new(extractor, model_client);
    let app = build_router(state, docs);

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Full router; docs routes are mounted only when `docs` is given.
pub fn build_router(state: AppState, docs: Option<ApiDocs>) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/health", get(handle_health))
        .route("/check-compliance", post(handle_check_compliance));

    if let Some(docs) = docs {
        router = router.merge(docs.router());
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
