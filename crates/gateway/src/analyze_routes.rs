use {
    axum::{
        Json,
        body::Bytes,
        extract::State,
        http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
        response::IntoResponse,
    },
    serde::Serialize,
    serde_json::Value,
    tracing::{debug, info},
};

use crate::{
    error::{ApiError, ApiResult},
    server::AppState,
    validation::validate_file_path,
};

pub const SAVED_MESSAGE: &str = "Analysis saved successfully";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeCreated {
    pub id: i64,
    pub file_path: String,
    pub message: &'static str,
}

/// Validate `filePath`, store an (empty) analysis for it, and return its id.
pub async fn create_analysis(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let body = json_body(&headers, &body)?;
    let file_path = validate_file_path(body.as_ref()).map_err(ApiError::Validation)?;

    let analysis = lintel_analysis::analyzer::analyze(&file_path);
    let id = state.repository.save(&file_path, &analysis).await?;
    info!(id, file_path = %file_path, "analysis saved");

    Ok((
        StatusCode::CREATED,
        Json(AnalyzeCreated {
            id,
            file_path,
            message: SAVED_MESSAGE,
        }),
    ))
}

/// The request's JSON body. A body without a JSON content type, or with no
/// content at all, is absent. Malformed JSON is a request failure rather than
/// a validation error.
pub(crate) fn json_body(headers: &HeaderMap, body: &[u8]) -> ApiResult<Option<Value>> {
    if !is_json_content_type(headers) {
        debug!("analyze request without a JSON content type");
        return Ok(None);
    }
    if body.trim_ascii().is_empty() {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| ApiError::Internal(format!("malformed JSON request body: {e}")))
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = value.split(';').next().unwrap_or_default().trim();
    essence.eq_ignore_ascii_case("application/json")
        || essence.to_ascii_lowercase().ends_with("+json")
}

/// Every stored record, most recent first.
pub async fn list_analyses(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let records = state.repository.list_all().await?;
    debug!(count = records.len(), "listing analyses");
    Ok(Json(records))
}
