//! Sitemap document model.

/// Image attached to a sitemap URL (Google image extension).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageEntry {
    /// Absolute image URL.
    pub location: String,
    /// Image title, tags stripped. `None` when empty.
    pub title: Option<String>,
    /// Image caption, tags stripped. `None` when empty.
    pub caption: Option<String>,
}

/// One `<url>` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlEntry {
    /// Absolute page URL.
    pub location: String,
    /// Last modification, RFC 3339 in UTC.
    pub last_modified: String,
    /// Images on the page, in element order.
    pub images: Vec<ImageEntry>,
}

/// Ordered URL entries of one site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapDocument {
    /// Entries in traversal order.
    pub urls: Vec<UrlEntry>,
}

impl SitemapDocument {
    /// Number of image entries across all URLs.
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.urls.iter().map(|url| url.images.len()).sum()
    }

    /// Whether any URL carries an image (the image namespace is needed).
    #[must_use]
    pub fn has_images(&self) -> bool {
        self.urls.iter().any(|url| !url.images.is_empty())
    }

    /// `(location, last_modified)` pairs in document order.
    #[must_use]
    pub fn locations(&self) -> Vec<(&str, &str)> {
        self.urls
            .iter()
            .map(|url| (url.location.as_str(), url.last_modified.as_str()))
            .collect()
    }
}
