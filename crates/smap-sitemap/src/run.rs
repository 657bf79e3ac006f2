//! Multi-site generation run.

use std::path::PathBuf;

use smap_config::SiteConfig;
use smap_content::ContentTree;
use smap_notify::Notifier;

use crate::error::GenerateError;
use crate::generator::SitemapGenerator;
use crate::publish::SitemapPublisher;

/// Result of generating one site.
#[derive(Debug)]
pub struct SiteOutcome {
    /// Site domain.
    pub domain: String,
    /// Written sitemap file, if publication succeeded.
    pub path: Option<PathBuf>,
    /// Number of URL entries written.
    pub urls: usize,
    /// Number of image entries written.
    pub images: usize,
    /// Why the site failed, if it did.
    pub error: Option<GenerateError>,
    /// Notification outcome. `None` when no notification was attempted.
    pub notified: Option<bool>,
}

impl SiteOutcome {
    /// Whether the sitemap was published.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcomes of a generation run, one per site in configuration order.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Per-site outcomes.
    pub sites: Vec<SiteOutcome>,
}

impl RunReport {
    /// Whether any site failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.sites.iter().any(|site| !site.is_success())
    }

    /// Sites that failed.
    pub fn failures(&self) -> impl Iterator<Item = &SiteOutcome> {
        self.sites.iter().filter(|site| !site.is_success())
    }
}

/// Generate and publish the sitemap of every site.
///
/// Sites are processed in order. A failing site is recorded in the report and
/// does not stop the run. When `should_notify` is set, the notifier is called
/// once for every site that was published successfully.
pub fn run(
    sites: &[SiteConfig],
    tree: &dyn ContentTree,
    publisher: &SitemapPublisher,
    notifier: &dyn Notifier,
    should_notify: bool,
) -> RunReport {
    let generator = SitemapGenerator::new(tree, sites);
    let mut report = RunReport::default();

    for site in sites {
        let mut outcome = SiteOutcome {
            domain: site.domain.clone(),
            path: None,
            urls: 0,
            images: 0,
            error: None,
            notified: None,
        };

        let published = generator.build(site).and_then(|document| {
            let path = publisher.publish(&site.domain, &document)?;
            Ok((document, path))
        });

        match published {
            Ok((document, path)) => {
                outcome.urls = document.urls.len();
                outcome.images = document.image_count();
                outcome.path = Some(path);
                tracing::info!(
                    domain = %site.domain,
                    urls = outcome.urls,
                    images = outcome.images,
                    "Sitemap published"
                );

                if should_notify {
                    outcome.notified = Some(notifier.notify(&site.base_url()));
                }
            }
            Err(e) => {
                tracing::warn!(domain = %site.domain, error = %e, "Sitemap generation failed");
                outcome.error = Some(e);
            }
        }

        report.sites.push(outcome);
    }

    report
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;
    use smap_config::Protocol;
    use smap_content::{ContentNode, MockContentTree};
    use tempfile::TempDir;

    use super::*;

    /// Records notified base URLs and answers with a fixed outcome.
    struct RecordingNotifier {
        accept: bool,
        calls: RefCell<Vec<String>>,
    }

    impl RecordingNotifier {
        fn new(accept: bool) -> Self {
            Self {
                accept,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, site_base_url: &str) -> bool {
            self.calls.borrow_mut().push(site_base_url.to_owned());
            self.accept
        }
    }

    fn site(root_id: u64, domain: &str, protocol: Protocol) -> SiteConfig {
        SiteConfig {
            root_id,
            root_path: String::new(),
            protocol,
            domain: domain.to_owned(),
        }
    }

    fn tree() -> MockContentTree {
        MockContentTree::new()
            .with_root(ContentNode::page(1, "/"))
            .with_child(1, ContentNode::page(2, "/about"))
            .with_root(ContentNode::page(5, "/"))
    }

    #[test]
    fn test_run_publishes_every_site() {
        let dir = TempDir::new().unwrap();
        let publisher = SitemapPublisher::new(dir.path());
        let notifier = RecordingNotifier::new(true);
        let sites = [
            site(1, "example.com", Protocol::Https),
            site(5, "shop.example.com", Protocol::Https),
        ];

        let report = run(&sites, &tree(), &publisher, &notifier, false);

        assert!(!report.has_failures());
        let summary: Vec<(&str, usize, Option<bool>)> = report
            .sites
            .iter()
            .map(|s| (s.domain.as_str(), s.urls, s.notified))
            .collect();
        assert_eq!(
            summary,
            vec![("example.com", 2, None), ("shop.example.com", 1, None)]
        );
        assert!(dir.path().join("example.com.xml").exists());
        assert!(dir.path().join("shop.example.com.xml").exists());
        assert!(notifier.calls.borrow().is_empty());
    }

    #[test]
    fn test_run_notifies_with_site_protocol() {
        let dir = TempDir::new().unwrap();
        let publisher = SitemapPublisher::new(dir.path());
        let notifier = RecordingNotifier::new(false);
        let sites = [
            site(1, "example.com", Protocol::Https),
            site(5, "shop.example.com", Protocol::Http),
        ];

        let report = run(&sites, &tree(), &publisher, &notifier, true);

        assert!(!report.has_failures());
        assert_eq!(report.sites[0].notified, Some(false));
        assert_eq!(
            *notifier.calls.borrow(),
            vec!["https://example.com", "http://shop.example.com"]
        );
    }

    #[test]
    fn test_run_continues_after_failed_site() {
        let dir = TempDir::new().unwrap();
        let publisher = SitemapPublisher::new(dir.path());
        let notifier = RecordingNotifier::new(true);
        let sites = [
            site(99, "missing.example.com", Protocol::Https),
            site(1, "example.com", Protocol::Https),
        ];

        let report = run(&sites, &tree(), &publisher, &notifier, true);

        assert!(report.has_failures());
        let failed: Vec<&str> = report.failures().map(|s| s.domain.as_str()).collect();
        assert_eq!(failed, vec!["missing.example.com"]);
        assert!(matches!(
            report.sites[0].error,
            Some(GenerateError::RootNotFound { root_id: 99, .. })
        ));
        assert_eq!(report.sites[0].notified, None);
        assert_eq!(report.sites[0].path, None);

        assert!(report.sites[1].is_success());
        assert_eq!(report.sites[1].notified, Some(true));
        assert_eq!(*notifier.calls.borrow(), vec!["https://example.com"]);
        assert!(!dir.path().join("missing.example.com.xml").exists());
    }

    #[test]
    fn test_run_write_failure_is_per_site() {
        let dir = TempDir::new().unwrap();
        let publisher = SitemapPublisher::new(dir.path().join("missing"));
        let notifier = RecordingNotifier::new(true);
        let sites = [site(1, "example.com", Protocol::Https)];

        let report = run(&sites, &tree(), &publisher, &notifier, true);

        assert!(matches!(report.sites[0].error, Some(GenerateError::Publish(_))));
        assert!(notifier.calls.borrow().is_empty());
    }

    #[test]
    fn test_run_without_sites() {
        let dir = TempDir::new().unwrap();
        let publisher = SitemapPublisher::new(dir.path());
        let notifier = RecordingNotifier::new(true);

        let report = run(&[], &tree(), &publisher, &notifier, true);

        assert!(report.sites.is_empty());
        assert!(!report.has_failures());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
