//! Content tree traversal.

use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, Utc};
use smap_config::{Protocol, SiteConfig};
use smap_content::{ContentNode, ContentTree, ElementKind, PageElement};

use crate::error::GenerateError;
use crate::model::{ImageEntry, SitemapDocument, UrlEntry};
use crate::path::public_path;
use crate::text::clean;

/// Builds sitemap documents from a content tree.
///
/// The generator knows the root ids of all configured sites. While walking
/// one site, any node that is the root of a site is skipped together with its
/// subtree, so every page is published by exactly one sitemap.
pub struct SitemapGenerator<'a> {
    tree: &'a dyn ContentTree,
    site_roots: HashSet<u64>,
}

impl<'a> SitemapGenerator<'a> {
    /// Create a generator for `sites` over `tree`.
    #[must_use]
    pub fn new(tree: &'a dyn ContentTree, sites: &[SiteConfig]) -> Self {
        Self {
            tree,
            site_roots: sites.iter().map(|site| site.root_id).collect(),
        }
    }

    /// Build the sitemap for one site.
    ///
    /// Nodes are visited depth-first in pre-order, children in the order the
    /// content tree returns them. The walk uses an explicit stack, so deep
    /// trees cannot exhaust the call stack.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::RootNotFound`] if the site's root node does
    /// not exist, or [`GenerateError::Content`] if any other tree lookup
    /// fails. Unresolvable images are skipped instead.
    pub fn build(&self, site: &SiteConfig) -> Result<SitemapDocument, GenerateError> {
        let base_url = site.base_url();
        let root = self.tree.node(site.root_id).map_err(|source| {
            if source.is_not_found() {
                GenerateError::RootNotFound {
                    root_id: site.root_id,
                    domain: site.domain.clone(),
                    source,
                }
            } else {
                GenerateError::Content(source)
            }
        })?;

        let mut document = SitemapDocument::default();
        let mut visited = HashSet::new();
        let mut stack = vec![root];

        while let Some(node) = stack.pop() {
            if !visited.insert(node.id) {
                tracing::warn!(node = node.id, domain = %site.domain, "Cycle in content tree, skipping node");
                continue;
            }

            if self.qualifies(&node, site) {
                let entry = self.url_entry(&node, site, &base_url);
                tracing::info!(domain = %site.domain, url = %entry.location, "Adding URL");
                document.urls.push(entry);
            }

            let children = self.tree.children(node.id)?;
            // Reversed so the first child is popped first.
            for child in children.into_iter().rev() {
                if self.site_roots.contains(&child.id) {
                    tracing::debug!(node = child.id, domain = %site.domain, "Skipping root of another site");
                    continue;
                }
                stack.push(child);
            }
        }

        Ok(document)
    }

    /// Whether `node` becomes a URL of `site`'s sitemap.
    fn qualifies(&self, node: &ContentNode, site: &SiteConfig) -> bool {
        node.kind.is_page()
            && !node.sitemap_exclude
            && (node.id == site.root_id || !self.site_roots.contains(&node.id))
    }

    fn url_entry(&self, node: &ContentNode, site: &SiteConfig, base_url: &str) -> UrlEntry {
        UrlEntry {
            location: format!("{base_url}{}", public_path(&node.full_path, &site.root_path)),
            last_modified: lastmod(node),
            images: node
                .elements
                .iter()
                .filter(|element| element.kind == ElementKind::Image)
                .filter_map(|element| self.image_entry(node, element, site.protocol, base_url))
                .collect(),
        }
    }

    fn image_entry(
        &self,
        node: &ContentNode,
        element: &PageElement,
        protocol: Protocol,
        base_url: &str,
    ) -> Option<ImageEntry> {
        let Some(image_id) = element.image_id else {
            tracing::debug!(node = node.id, "Image element without image reference");
            return None;
        };

        let image = match self.tree.image(image_id) {
            Ok(image) => image,
            Err(e) if e.is_not_found() => {
                tracing::debug!(node = node.id, image = image_id, "Referenced image not found");
                return None;
            }
            Err(e) => {
                tracing::warn!(node = node.id, image = image_id, error = %e, "Failed to load image");
                return None;
            }
        };

        let thumbnail = image.thumbnail.trim();
        if thumbnail.is_empty() {
            tracing::debug!(node = node.id, image = image_id, "Image has no thumbnail");
            return None;
        }

        let locale = node.language.as_deref();
        Some(ImageEntry {
            location: absolute_url(thumbnail, protocol, base_url),
            title: clean(element.alt.as_deref()).or_else(|| clean(image.title(locale))),
            caption: clean(image.alt(locale)),
        })
    }
}

/// Make a thumbnail path absolute against the site.
///
/// Host-relative paths get the base URL, scheme-relative ones (`//cdn/...`)
/// the site protocol. Anything else is assumed to be absolute already.
fn absolute_url(path: &str, protocol: Protocol, base_url: &str) -> String {
    if path.starts_with("//") {
        format!("{protocol}:{path}")
    } else if path.starts_with('/') {
        format!("{base_url}{path}")
    } else {
        path.to_owned()
    }
}

/// The node's modification time as a `lastmod` value.
fn lastmod(node: &ContentNode) -> String {
    let Some(modified) = DateTime::<Utc>::from_timestamp(node.modified, 0) else {
        tracing::warn!(
            node = node.id,
            modified = node.modified,
            "Modification time out of range, using Unix epoch"
        );
        return format_lastmod(0);
    };
    modified.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Format a Unix timestamp as RFC 3339 in UTC with second precision,
/// e.g. `2024-01-15T10:30:00+00:00`.
///
/// Timestamps outside the representable range format as the Unix epoch.
#[must_use]
pub fn format_lastmod(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Secs, false)
}
