//! HTTP server for published smap sitemaps.
//!
//! Serves the files written by `smap generate`:
//! - `GET /sitemap.xml` picks the sitemap by the request's `Host` header,
//!   falling back to the default site for unknown hosts
//! - `GET /sitemaps/{domain}.xml` returns the sitemap of a named domain
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use smap_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_owned(),
//!         port: 7980,
//!         sitemap_dir: PathBuf::from("sitemaps"),
//!         default_domain: Some("example.com".to_owned()),
//!         domains: vec!["example.com".to_owned(), "shop.example.com".to_owned()],
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory holding `{domain}.xml` files.
    pub sitemap_dir: PathBuf,
    /// Domain served for hosts that are not configured.
    pub default_domain: Option<String>,
    /// Configured site domains.
    pub domains: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7980,
            sitemap_dir: PathBuf::from("sitemaps"),
            default_domain: None,
            domains: Vec::new(),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState::new(
        config.sitemap_dir.clone(),
        config.default_domain.clone(),
        config.domains.iter().cloned(),
    ));
    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(
        address = %addr,
        sitemap_dir = %config.sitemap_dir.display(),
        "Starting server"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C, stopping server");
        return;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from smap config.
#[must_use]
pub fn server_config_from_smap_config(config: &smap_config::Config) -> ServerConfig {
    let default_domain = Some(config.general.domain.clone()).filter(|domain| !domain.is_empty());

    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        sitemap_dir: config.output_resolved.sitemap_dir.clone(),
        default_domain,
        domains: config.sites().into_iter().map(|site| site.domain).collect(),
    }
}
