//! Page templates and HTML response headers.

use {
    askama::Template,
    axum::{
        http::{HeaderValue, header},
        response::{Html, IntoResponse, Response},
    },
    tracing::warn,
};

use crate::{
    assets::{asset_content_hash, is_dev_assets},
    error::{Error, Result},
    history::{CardView, HistoryView, PageView},
};

/// Path submitted by the analyze button.
pub const SUBMIT_FILE_PATH: &str = "example.ts";

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
     script-src 'self'; \
     style-src 'self'; \
     img-src 'self' data:; \
     connect-src 'self'; \
     frame-ancestors 'none'; \
     form-action 'self'; \
     base-uri 'self'; \
     object-src 'none'";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Page {
    Analyze,
    History { page: usize },
}

#[derive(Template)]
#[template(path = "analyze.html", escape = "html")]
struct AnalyzeHtmlTemplate<'a> {
    asset_prefix: &'a str,
    file_path: &'a str,
}

#[derive(Template)]
#[template(path = "history.html", escape = "html")]
struct HistoryHtmlTemplate<'a> {
    asset_prefix: &'a str,
    page: usize,
}

#[derive(Template)]
#[template(path = "history_empty.html", escape = "html")]
struct HistoryEmptyTemplate;

#[derive(Template)]
#[template(path = "history_pages.html", escape = "html")]
struct HistoryPagesTemplate<'a> {
    current: usize,
    pages: &'a [PageView],
    cards: Vec<&'a CardView>,
}

/// URL prefix for versioned assets. In dev mode a timestamp defeats caching.
fn asset_prefix() -> String {
    if is_dev_assets() {
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        format!("/assets/v/{ts}/")
    } else {
        static HASH: std::sync::LazyLock<String> = std::sync::LazyLock::new(asset_content_hash);
        format!("/assets/v/{}/", *HASH)
    }
}

pub(crate) fn render_page(page: Page) -> Response {
    let asset_prefix = asset_prefix();
    let rendered = match page {
        Page::Analyze => AnalyzeHtmlTemplate {
            asset_prefix: &asset_prefix,
            file_path: SUBMIT_FILE_PATH,
        }
        .render(),
        Page::History { page } => HistoryHtmlTemplate {
            asset_prefix: &asset_prefix,
            page,
        }
        .render(),
    };

    let body = match rendered {
        Ok(html) => html,
        Err(e) => {
            warn!(error = %e, ?page, "failed to render page template");
            String::new()
        },
    };
    html_response(body)
}

/// The history fragment swapped into the page by `history.js`.
pub fn render_history_view(view: &HistoryView) -> Result<String> {
    match view {
        HistoryView::Empty => HistoryEmptyTemplate
            .render()
            .map_err(|e| Error::render("history_empty.html", e)),
        HistoryView::Populated { current, pages } => HistoryPagesTemplate {
            current: *current,
            pages,
            cards: pages.iter().flat_map(|p| p.cards.iter()).collect(),
        }
        .render()
        .map_err(|e| Error::render("history_pages.html", e)),
    }
}

/// Wrap rendered HTML with the no-cache and CSP headers every page carries.
pub(crate) fn html_response(body: String) -> Response {
    let mut response = Html(body).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    );
    response
}
