//! Sitemap endpoints.
//!
//! Sitemap files are read from disk on every request, so a regeneration is
//! visible immediately without restarting the server.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Response};

use crate::error::ServerError;
use crate::state::AppState;

/// Content type of sitemap responses.
const XML_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Handle GET /sitemap.xml.
///
/// The domain comes from the `Host` header. Hosts that are not configured
/// get the default site's sitemap.
pub(crate) async fn get_host_sitemap(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok());
    let domain = state.resolve_domain(host).ok_or(ServerError::UnknownHost)?;

    serve_sitemap(&state, &domain).await
}

/// Handle GET /sitemaps/{domain}.xml.
pub(crate) async fn get_domain_sitemap(
    Path(file): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServerError> {
    let domain = file
        .strip_suffix(".xml")
        .ok_or_else(|| ServerError::SitemapNotFound(file.clone()))?
        .to_ascii_lowercase();

    serve_sitemap(&state, &domain).await
}

async fn serve_sitemap(state: &AppState, domain: &str) -> Result<Response, ServerError> {
    // The domain becomes a file name.
    if !smap_config::is_valid_hostname(domain) {
        return Err(ServerError::InvalidDomain(domain.to_owned()));
    }

    let path = state.sitemap_dir().join(format!("{domain}.xml"));
    let content = match tokio::fs::read(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(domain, path = %path.display(), "Sitemap not published");
            return Err(ServerError::SitemapNotFound(domain.to_owned()));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(([(header::CONTENT_TYPE, XML_CONTENT_TYPE)], content).into_response())
}
