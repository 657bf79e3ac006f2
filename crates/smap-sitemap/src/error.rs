//! Error types for sitemap generation.

use std::path::PathBuf;

use smap_content::ContentError;

/// Error while generating one site's sitemap.
///
/// Any of these aborts the affected site only; [`run`](crate::run) records it
/// and moves on to the next site.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The site's root node does not exist in the content tree.
    #[error("root node {root_id} of site {domain} not found")]
    RootNotFound {
        /// Configured root node id.
        root_id: u64,
        /// Site domain.
        domain: String,
        /// Lookup error from the content tree.
        #[source]
        source: ContentError,
    },

    /// Content tree lookup failed during traversal.
    #[error("content tree error: {0}")]
    Content(#[from] ContentError),

    /// Sitemap could not be written.
    #[error("{0}")]
    Publish(#[from] PublishError),
}

/// Error converting a sitemap to or from XML.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum XmlError {
    /// Writing to the output buffer failed.
    #[error("XML write error: {0}")]
    Write(#[from] std::io::Error),

    /// XML parsing error.
    #[error("XML parse error: {0}")]
    Parse(#[from] quick_xml::Error),

    /// Encoding error during XML parsing.
    #[error("encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// Well-formed XML that is not a valid sitemap.
    #[error("malformed sitemap: {0}")]
    Malformed(String),
}

/// Error writing a sitemap file.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Domain cannot be used as a file name.
    #[error("invalid domain for sitemap file: {0:?}")]
    InvalidDomain(String),

    /// Document could not be rendered.
    #[error("failed to render sitemap: {0}")]
    Render(#[from] XmlError),

    /// Filesystem operation failed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// Target sitemap file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use smap_content::ContentErrorKind;

    use super::*;

    #[test]
    fn test_root_not_found_display() {
        let err = GenerateError::RootNotFound {
            root_id: 5,
            domain: "shop.example.com".to_owned(),
            source: ContentError::node_not_found(5),
        };

        assert_eq!(err.to_string(), "root node 5 of site shop.example.com not found");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_publish_io_display() {
        let err = PublishError::Io {
            path: PathBuf::from("/srv/sitemaps/example.com.xml"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };

        assert_eq!(
            err.to_string(),
            "failed to write /srv/sitemaps/example.com.xml: denied"
        );
    }

    #[test]
    fn test_content_error_converts() {
        let err: GenerateError = ContentError::new(ContentErrorKind::Unavailable).into();
        assert!(matches!(err, GenerateError::Content(_)));
    }
}
