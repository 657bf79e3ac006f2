//! End-to-end sitemap generation over a file-backed content tree.

use pretty_assertions::assert_eq;
use smap_content::{ContentTree, FileContentTree};
use smap_notify::Notifier;
use smap_sitemap::{
    IMAGE_NAMESPACE, Protocol, SiteConfig, SitemapGenerator, SitemapPublisher, parse_sitemap, run,
};
use tempfile::TempDir;

const TREE: &str = r"
nodes:
  - id: 1
    kind: folder
    path: /
  - id: 2
    parent: 1
    path: /about
    modified: 1705314600
    language: en
    elements:
      - kind: image
        image_id: 10
  - id: 3
    parent: 1
    kind: folder
    path: /blog
  - id: 4
    parent: 3
    path: /blog/post-1
    modified: 1706774400
  - id: 5
    parent: 1
    path: /shop
    modified: 1705314600
  - id: 6
    parent: 5
    path: /shop/cart
    modified: 1705314600
  - id: 7
    parent: 1
    path: /internal
    sitemap_exclude: true
  - id: 8
    parent: 7
    kind: snippet
    path: /internal/footer
images:
  - id: 10
    thumbnail: /img/a.jpg
    metadata:
      en: { title: Our <b>team</b>, alt: Everyone at the office }
";

struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _site_base_url: &str) -> bool {
        true
    }
}

fn sites() -> Vec<SiteConfig> {
    vec![
        SiteConfig {
            root_id: 1,
            root_path: String::new(),
            protocol: Protocol::Https,
            domain: "example.com".to_owned(),
        },
        SiteConfig {
            root_id: 5,
            root_path: "shop".to_owned(),
            protocol: Protocol::Https,
            domain: "shop.example.com".to_owned(),
        },
    ]
}

fn tree() -> FileContentTree {
    FileContentTree::from_yaml(TREE).unwrap()
}

#[test]
fn test_default_site_sitemap() {
    let tree = tree();
    let sites = sites();

    let document = SitemapGenerator::new(&tree, &sites).build(&sites[0]).unwrap();

    assert_eq!(
        document.locations(),
        vec![
            ("https://example.com/about", "2024-01-15T10:30:00+00:00"),
            ("https://example.com/blog/post-1", "2024-02-01T08:00:00+00:00"),
        ]
    );
    assert_eq!(document.urls[0].images.len(), 1);
    assert_eq!(document.urls[0].images[0].location, "https://example.com/img/a.jpg");
    assert_eq!(document.urls[0].images[0].title.as_deref(), Some("Our team"));
    assert_eq!(
        document.urls[0].images[0].caption.as_deref(),
        Some("Everyone at the office")
    );
    assert!(document.urls[1].images.is_empty());
}

#[test]
fn test_subsite_has_its_own_sitemap() {
    let tree = tree();
    let sites = sites();

    let document = SitemapGenerator::new(&tree, &sites).build(&sites[1]).unwrap();

    assert_eq!(
        document.locations(),
        vec![
            ("https://shop.example.com", "2024-01-15T10:30:00+00:00"),
            ("https://shop.example.com/cart", "2024-01-15T10:30:00+00:00"),
        ]
    );
}

#[test]
fn test_run_writes_parseable_files() {
    let dir = TempDir::new().unwrap();
    let tree = tree();
    let sites = sites();
    let publisher = SitemapPublisher::new(dir.path());

    let report = run(&sites, &tree, &publisher, &NoopNotifier, false);
    assert!(!report.has_failures());

    for site in &sites {
        let generated = SitemapGenerator::new(&tree, &sites).build(site).unwrap();
        let written = std::fs::read_to_string(dir.path().join(format!("{}.xml", site.domain))).unwrap();

        assert_eq!(parse_sitemap(&written).unwrap().locations(), generated.locations());
    }

    let main = std::fs::read_to_string(dir.path().join("example.com.xml")).unwrap();
    assert!(main.contains(IMAGE_NAMESPACE));
    assert!(main.contains("<image:title>Our team</image:title>"));
    assert!(!main.contains("/shop"));
    assert!(!main.contains("/internal"));

    let shop = std::fs::read_to_string(dir.path().join("shop.example.com.xml")).unwrap();
    assert!(!shop.contains(IMAGE_NAMESPACE));
}

#[test]
fn test_run_regenerates_from_scratch() {
    let dir = TempDir::new().unwrap();
    let sites = sites();
    let publisher = SitemapPublisher::new(dir.path());

    run(&sites, &tree(), &publisher, &NoopNotifier, false);

    let smaller = FileContentTree::from_yaml(
        "nodes:\n  - { id: 1, kind: folder, path: / }\n  - { id: 5, parent: 1, path: /shop }\n",
    )
    .unwrap();
    let before = std::fs::read_to_string(dir.path().join("example.com.xml")).unwrap();
    assert!(before.contains("/about"));
    assert!(before.contains("/blog/post-1"));

    let report = run(&sites, &smaller, &publisher, &NoopNotifier, false);

    assert!(!report.has_failures());
    assert_eq!(report.sites[0].urls, 0);
    assert_eq!(report.sites[1].urls, 1);
    let written = std::fs::read_to_string(dir.path().join("example.com.xml")).unwrap();
    assert!(!written.contains("/about"));
    assert!(!written.contains("/blog/post-1"));
    assert!(parse_sitemap(&written).unwrap().urls.is_empty());
}

#[test]
fn test_missing_root_does_not_block_other_sites() {
    let dir = TempDir::new().unwrap();
    let tree = tree();
    let mut sites = sites();
    sites.insert(
        0,
        SiteConfig {
            root_id: 404,
            root_path: String::new(),
            protocol: Protocol::Https,
            domain: "gone.example.com".to_owned(),
        },
    );
    let publisher = SitemapPublisher::new(dir.path());

    let report = run(&sites, &tree, &publisher, &NoopNotifier, true);

    assert!(report.has_failures());
    assert_eq!(report.failures().count(), 1);
    assert_eq!(report.sites[1].notified, Some(true));
    assert_eq!(report.sites[2].notified, Some(true));
    assert!(tree.node(404).is_err());
}
