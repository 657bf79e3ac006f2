//! Application state.
//!
//! Shared state for all request handlers.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Directory holding `{domain}.xml` files.
    sitemap_dir: PathBuf,
    /// Domain served for unknown hosts.
    default_domain: Option<String>,
    /// Configured site domains (lowercase).
    domains: HashSet<String>,
}

impl AppState {
    pub(crate) fn new(
        sitemap_dir: PathBuf,
        default_domain: Option<String>,
        domains: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            sitemap_dir,
            default_domain: default_domain.map(|d| d.to_ascii_lowercase()),
            domains: domains.into_iter().map(|d| d.to_ascii_lowercase()).collect(),
        }
    }

    pub(crate) fn sitemap_dir(&self) -> &Path {
        &self.sitemap_dir
    }

    /// Domain whose sitemap answers a request for `host` (a `Host` header
    /// value, possibly with a port).
    pub(crate) fn resolve_domain(&self, host: Option<&str>) -> Option<String> {
        let requested = host.map(normalize_host);
        match requested {
            Some(domain) if self.domains.contains(&domain) => Some(domain),
            _ => self.default_domain.clone(),
        }
    }
}

/// Lowercase host name without port or trailing dot.
fn normalize_host(host: &str) -> String {
    let host = host.trim();
    let name = match host.rsplit_once(':') {
        Some((name, port)) if port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    };
    name.trim_end_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(
            PathBuf::from("/srv/sitemaps"),
            Some("Example.com".to_owned()),
            ["example.com".to_owned(), "shop.example.com".to_owned()],
        )
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("Shop.Example.com:8080"), "shop.example.com");
        assert_eq!(normalize_host("example.com."), "example.com");
        assert_eq!(normalize_host(" example.com "), "example.com");
    }

    #[test]
    fn test_resolve_known_host() {
        assert_eq!(
            state().resolve_domain(Some("shop.example.com:443")),
            Some("shop.example.com".to_owned())
        );
    }

    #[test]
    fn test_resolve_unknown_host_falls_back_to_default() {
        assert_eq!(
            state().resolve_domain(Some("www.other.org")),
            Some("example.com".to_owned())
        );
        assert_eq!(state().resolve_domain(None), Some("example.com".to_owned()));
    }

    #[test]
    fn test_resolve_without_default() {
        let state = AppState::new(PathBuf::from("/srv"), None, Vec::new());

        assert_eq!(state.resolve_domain(Some("example.com")), None);
    }
}
