use std::{net::SocketAddr, sync::Arc};

use {
    axum::{
        Router,
        response::{IntoResponse, Json},
        routing::get,
    },
    lintel_analysis::{AnalysisRepository, SqliteAnalysisRepository},
    lintel_config::LintelConfig,
    tower_http::{
        catch_panic::CatchPanicLayer,
        cors::{Any, CorsLayer},
        trace::TraceLayer,
    },
    tracing::{info, warn},
};

use crate::{
    analyze_routes::{create_analysis, list_analyses},
    error::handle_panic,
};

// ── Shared app state ─────────────────────────────────────────────────────────

/// State shared by every handler. The repository wraps the one database
/// handle opened at startup.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn AnalysisRepository>,
}

impl AppState {
    pub fn new(repository: Arc<dyn AnalysisRepository>) -> Self {
        Self { repository }
    }
}

// ── Server startup ───────────────────────────────────────────────────────────

/// Build the application router (shared between production startup and
/// tests). `extra` is merged in before the layers are applied; the web UI
/// passes its page routes here.
pub fn build_gateway_app(state: AppState, extra: Router<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/analyze", get(list_analyses).post(create_analysis))
        .merge(extra)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Open the database, ensure the schema, and serve until Ctrl-C.
pub async fn start_gateway(config: &LintelConfig, extra: Router<AppState>) -> anyhow::Result<()> {
    let db_path = &config.database.path;
    let pool = lintel_analysis::connect(db_path).await?;
    lintel_analysis::initialize(&pool).await?;

    let repository = SqliteAnalysisRepository::new(pool.clone());
    match repository.count().await {
        Ok(count) => info!(path = %db_path.display(), count, "analysis database ready"),
        Err(e) => warn!(path = %db_path.display(), error = %e, "failed to count stored analyses"),
    }

    let app = build_gateway_app(AppState::new(Arc::new(repository)), extra);

    let listener =
        tokio::net::TcpListener::bind((config.server.bind.as_str(), config.server.port)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
