//! HTTP mapping for request failures.
//!
//! Validation failures are reported field by field. Everything else collapses
//! into one generic 500 body; the detail only goes to the log.

use std::any::Any;

use {
    axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    tracing::error,
};

use crate::validation::FieldError;

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request validation failed")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    Internal(String),
}

impl From<lintel_analysis::Error> for ApiError {
    fn from(err: lintel_analysis::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "errors": errors })),
            )
                .into_response(),
            Self::Internal(detail) => {
                error!(error = %detail, "request failed");
                internal_error_response()
            },
        }
    }
}

fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": INTERNAL_MESSAGE })),
    )
        .into_response()
}

/// Response for a handler that panicked; used with `CatchPanicLayer`.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    error!(panic = %detail, "request handler panicked");
    internal_error_response()
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, axum::body::to_bytes};

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn internal_errors_are_redacted() {
        let response = ApiError::Internal("disk I/O error at /var/db".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!({ "error": "Internal server error" }));
    }

    #[tokio::test]
    async fn validation_errors_list_each_field_error() {
        let errors = crate::validation::validate_file_path(None).unwrap_err();
        let response = ApiError::Validation(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["errors"][0]["msg"], "filePath is required");
        assert_eq!(body["errors"][0]["path"], "filePath");
    }

    #[tokio::test]
    async fn panic_payloads_map_to_500() {
        let payloads: Vec<Box<dyn Any + Send>> = vec![
            Box::new("static str"),
            Box::new(String::from("owned")),
            Box::new(7_u8),
        ];
        for payload in payloads {
            let response = handle_panic(payload);
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
