//! Content node types.
//!
//! Nodes are plain data: the tree structure lives in the [`ContentTree`]
//! implementation, which answers parent/child questions by id.
//!
//! [`ContentTree`]: crate::ContentTree

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Kind of a content node.
///
/// Only [`NodeKind::Page`] nodes are published as URLs. Every other kind is
/// still walked through, since folders and links can have pages below them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Renderable page.
    #[default]
    Page,
    /// Redirect to another location.
    Link,
    /// Reusable fragment embedded into pages.
    Snippet,
    /// Structural container without content of its own.
    Folder,
    /// Mirror of another subtree.
    Hardlink,
    /// Email template.
    Email,
    /// Anything the gateway does not classify.
    #[serde(other)]
    Other,
}

impl NodeKind {
    /// Whether nodes of this kind are standalone pages.
    #[must_use]
    pub fn is_page(self) -> bool {
        matches!(self, Self::Page)
    }
}

/// Kind of an element embedded in a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Image reference.
    Image,
    /// Any other editable (text, wysiwyg, select, ...).
    #[serde(other)]
    Other,
}

/// Element embedded in a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageElement {
    /// Element kind.
    pub kind: ElementKind,
    /// Referenced image asset, for image elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<u64>,
    /// Alt text entered on the element itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl PageElement {
    /// Image element referencing asset `image_id`.
    #[must_use]
    pub fn image(image_id: u64) -> Self {
        Self {
            kind: ElementKind::Image,
            image_id: Some(image_id),
            alt: None,
        }
    }

    /// Set the element's alt text.
    #[must_use]
    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }
}

/// A node of the content tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentNode {
    /// Unique node id.
    pub id: u64,
    /// Node kind.
    pub kind: NodeKind,
    /// Full internal path, e.g. `/shop/products/shoes`.
    pub full_path: String,
    /// Last modification as seconds since the Unix epoch (UTC).
    pub modified: i64,
    /// Hide this node from sitemaps.
    pub sitemap_exclude: bool,
    /// Value of the node's `language` property.
    pub language: Option<String>,
    /// Embedded elements in document order.
    pub elements: Vec<PageElement>,
}

impl ContentNode {
    /// Create a node of the given kind with no elements.
    #[must_use]
    pub fn new(id: u64, kind: NodeKind, full_path: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            full_path: full_path.into(),
            modified: 0,
            sitemap_exclude: false,
            language: None,
            elements: Vec::new(),
        }
    }

    /// Create a page node.
    #[must_use]
    pub fn page(id: u64, full_path: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Page, full_path)
    }

    /// Create a folder node.
    #[must_use]
    pub fn folder(id: u64, full_path: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Folder, full_path)
    }

    /// Set the modification time (seconds since Unix epoch).
    #[must_use]
    pub fn with_modified(mut self, modified: i64) -> Self {
        self.modified = modified;
        self
    }

    /// Flag the node as hidden from sitemaps.
    #[must_use]
    pub fn excluded(mut self) -> Self {
        self.sitemap_exclude = true;
        self
    }

    /// Set the node's language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Append an embedded element.
    #[must_use]
    pub fn with_element(mut self, element: PageElement) -> Self {
        self.elements.push(element);
        self
    }
}

/// Locale-specific image metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    /// Image title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Alternative text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// Image asset referenced from page elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Unique asset id.
    pub id: u64,
    /// Path of the rendered thumbnail. Host-relative (`/...`) or absolute URL.
    pub thumbnail: String,
    /// Metadata keyed by locale (e.g. `en`, `de_CH`).
    #[serde(default)]
    pub metadata: HashMap<String, ImageMetadata>,
}

impl Image {
    /// Create an image with no metadata.
    #[must_use]
    pub fn new(id: u64, thumbnail: impl Into<String>) -> Self {
        Self {
            id,
            thumbnail: thumbnail.into(),
            metadata: HashMap::new(),
        }
    }

    /// Add metadata for a locale.
    #[must_use]
    pub fn with_metadata(mut self, locale: impl Into<String>, metadata: ImageMetadata) -> Self {
        self.metadata.insert(locale.into(), metadata);
        self
    }

    /// Title for `locale`, if set.
    #[must_use]
    pub fn title(&self, locale: Option<&str>) -> Option<&str> {
        self.localized(locale)?.title.as_deref()
    }

    /// Alt text for `locale`, if set.
    #[must_use]
    pub fn alt(&self, locale: Option<&str>) -> Option<&str> {
        self.localized(locale)?.alt.as_deref()
    }

    fn localized(&self, locale: Option<&str>) -> Option<&ImageMetadata> {
        self.metadata.get(locale.unwrap_or_default())
    }
}
