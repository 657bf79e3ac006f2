//! Server error type.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Error answering a sitemap request.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// No sitemap has been published for the domain.
    #[error("no sitemap for {0}")]
    SitemapNotFound(String),

    /// No domain could be determined for the request.
    #[error("no site configured for this host")]
    UnknownHost,

    /// Requested name is not a valid domain.
    #[error("invalid domain: {0}")]
    InvalidDomain(String),

    /// Reading the sitemap file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::SitemapNotFound(_) | Self::UnknownHost => StatusCode::NOT_FOUND,
            Self::InvalidDomain(_) => StatusCode::BAD_REQUEST,
            Self::Io(e) => {
                tracing::error!(error = %e, "Failed to read sitemap");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}
