//! Page handlers: the analyze page, the history shell, and the history
//! fragment it loads.

use {
    axum::{
        extract::{Query, State},
        response::{IntoResponse, Response},
    },
    lintel_gateway::{error::ApiResult, server::AppState},
    serde::Deserialize,
    tracing::debug,
};

use crate::{
    history::HistoryView,
    templates::{Page, html_response, render_history_view, render_page},
};

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<String>,
}

impl PageQuery {
    /// Requested page; anything unparseable means the first page.
    fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(1)
    }
}

pub async fn analyze_page() -> impl IntoResponse {
    render_page(Page::Analyze)
}

pub async fn history_page(Query(query): Query<PageQuery>) -> impl IntoResponse {
    render_page(Page::History { page: query.page() })
}

/// Every stored analysis as cards, split into pages. The requested page is
/// clamped and shown; the rest are rendered hidden.
pub async fn history_view(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Response> {
    let records = state.repository.list_all().await?;
    let view = HistoryView::build(&records, query.page());
    debug!(count = records.len(), "rendering history view");
    let body = render_history_view(&view)?;
    Ok(html_response(body))
}
