use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VtError {
    #[error("invalid input {path}: {message}")]
    InputFormat { path: PathBuf, message: String },

    #[error("schema error: {0}")]
    Schema(String),

    #[error("query against {endpoint} failed: {message} (payload: {payload})")]
    Query {
        endpoint: String,
        payload: String,
        message: String,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("missing configuration: {0}")]
    MissingConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl VtError {
    pub fn input_format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InputFormat {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Stable identifier used in robot-mode error output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InputFormat { .. } => "input_format",
            Self::Schema(_) => "schema",
            Self::Query { .. } => "query",
            Self::Config(_) | Self::MissingConfig(_) => "config",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
        }
    }
}

pub type Result<T> = std::result::Result<T, VtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_error_mentions_endpoint_and_payload() {
        let err = VtError::Query {
            endpoint: "http://localhost:8080/search/".to_string(),
            payload: r#"{"query":"x"}"#.to_string(),
            message: "connection refused".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("http://localhost:8080/search/"));
        assert!(rendered.contains(r#"{"query":"x"}"#));
        assert_eq!(err.code(), "query");
    }

    #[test]
    fn input_format_code() {
        let err = VtError::input_format("videos.csv", "missing column video_id");
        assert_eq!(err.code(), "input_format");
        assert!(err.to_string().contains("videos.csv"));
    }
}
