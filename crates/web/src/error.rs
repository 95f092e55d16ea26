#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to render {template}: {source}")]
    Render {
        template: &'static str,
        #[source]
        source: askama::Error,
    },
}

impl Error {
    #[must_use]
    pub fn render(template: &'static str, source: askama::Error) -> Self {
        Self::Render { template, source }
    }
}

impl From<Error> for lintel_gateway::error::ApiError {
    fn from(err: Error) -> Self {
        Self::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
