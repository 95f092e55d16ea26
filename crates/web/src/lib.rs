//! Web UI: the analyze page, the paginated history, and static assets.
//!
//! This crate depends on `lintel-gateway` for [`AppState`]. It provides
//! [`web_routes()`], which the CLI hands to the gateway to merge into the
//! main router.

pub mod assets;
pub mod error;
pub mod history;
pub mod pages;
pub mod templates;

use {
    axum::{Router, routing::get},
    lintel_gateway::server::AppState,
};

pub use error::{Error, Result};

/// Build the web-UI router: pages, the history fragment, and assets.
pub fn web_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::analyze_page))
        .route("/history", get(pages::history_page))
        .route("/history/view", get(pages::history_view))
        .route(
            "/assets/v/{version}/{*path}",
            get(assets::versioned_asset_handler),
        )
        .route("/assets/{*path}", get(assets::asset_handler))
}
