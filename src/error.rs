use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use serde_json::json;

pub type Result<T> = core::result::Result<T, ApiError>;

/// Failures a request handler can surface to the client
#[derive(Debug)]
pub enum ApiError {
    /// Request body carried no `url`
    MissingUrl,
    /// `url` did not yield a video ID
    InvalidUrl,
    /// Transcript provider or LLM failure
    Upstream(eyre::Report),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingUrl | ApiError::InvalidUrl => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::MissingUrl => "Mungon linku".to_string(),
            ApiError::InvalidUrl => "Linku jo i sakte".to_string(),
            ApiError::Upstream(report) => format!("Ndodhi një gabim: {report:#}"),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl From<eyre::Report> for ApiError {
    fn from(report: eyre::Report) -> Self {
        ApiError::Upstream(report)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Upstream(ref report) = self {
            error!("Upstream failure: {report:#}");
        }
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}
