//! Sitemap generation and publication for smap.
//!
//! Turns the subtree of each configured site into a `sitemap.xml` document
//! and publishes it as `{sitemap_dir}/{domain}.xml`.
//!
//! # Architecture
//!
//! - [`SitemapGenerator`] walks a site's subtree in depth-first pre-order with
//!   an explicit work-list, skipping the roots of other sites, and collects a
//!   [`SitemapDocument`]
//! - [`render_sitemap`] / [`parse_sitemap`] convert documents to and from the
//!   sitemaps.org XML format with the Google image extension
//! - [`SitemapPublisher`] writes documents atomically, one file per domain
//! - [`run`] drives all sites, isolating failures per site, and optionally
//!   notifies search engines
//!
//! # Example
//!
//! ```ignore
//! use smap_sitemap::{SitemapPublisher, run};
//!
//! let publisher = SitemapPublisher::new(config.output_resolved.sitemap_dir.clone());
//! let report = run(&config.sites(), &tree, &publisher, &notifier, config.is_production());
//! for outcome in &report.sites {
//!     println!("{}: {} URLs", outcome.domain, outcome.urls);
//! }
//! ```

mod error;
mod generator;
mod model;
mod path;
mod publish;
mod run;
mod text;
mod xml;

pub use error::{GenerateError, PublishError, XmlError};
pub use generator::{SitemapGenerator, format_lastmod};
pub use model::{ImageEntry, SitemapDocument, UrlEntry};
pub use path::public_path;
pub use publish::SitemapPublisher;
pub use run::{RunReport, SiteOutcome, run};
pub use smap_config::{Protocol, SiteConfig};
pub use text::strip_tags;
pub use xml::{IMAGE_NAMESPACE, SITEMAP_NAMESPACE, parse_sitemap, render_sitemap};
