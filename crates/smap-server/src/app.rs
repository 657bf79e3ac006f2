//! Router construction.

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, header};
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the application router.
///
/// Every response, including errors, carries `X-Content-Type-Options:
/// nosniff` so browsers never reinterpret a sitemap as HTML.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/sitemap.xml", get(handlers::sitemap::get_host_sitemap))
        .route("/sitemaps/{file}", get(handlers::sitemap::get_domain_sitemap))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                )),
        )
        .with_state(state)
}
