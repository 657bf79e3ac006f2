//! Content tree trait and error types.
//!
//! Provides the core [`ContentTree`] trait for read-only access to content
//! nodes, along with [`ContentError`] for unified error handling across
//! backends.

use std::fmt;
use std::path::PathBuf;

use crate::node::{ContentNode, Image};

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContentErrorKind {
    /// Node or image does not exist.
    NotFound,
    /// Backend data is malformed (bad export file, dangling parent, ...).
    InvalidData,
    /// Backend is temporarily unavailable.
    Unavailable,
    /// Other/unknown error category.
    Other,
}

/// What a [`ContentError`] is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentRef {
    /// A content node id.
    Node(u64),
    /// An image asset id.
    Image(u64),
    /// A backend file.
    File(PathBuf),
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(id) => write!(f, "node {id}"),
            Self::Image(id) => write!(f, "image {id}"),
            Self::File(path) => write!(f, "file {}", path.display()),
        }
    }
}

/// Content error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct ContentError {
    /// Semantic error category.
    pub kind: ContentErrorKind,
    /// Subject of the failed lookup (if applicable).
    pub subject: Option<ContentRef>,
    /// Backend identifier (e.g., "File", "Mock").
    pub backend: Option<&'static str>,
    message: Option<String>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ContentError {
    /// Create a new content error.
    #[must_use]
    pub fn new(kind: ContentErrorKind) -> Self {
        Self {
            kind,
            subject: None,
            backend: None,
            message: None,
            source: None,
        }
    }

    /// Attach the subject of the failed lookup.
    #[must_use]
    pub fn with_subject(mut self, subject: ContentRef) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach a human-readable detail message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error for a node.
    #[must_use]
    pub fn node_not_found(id: u64) -> Self {
        Self::new(ContentErrorKind::NotFound).with_subject(ContentRef::Node(id))
    }

    /// Create a not found error for an image.
    #[must_use]
    pub fn image_not_found(id: u64) -> Self {
        Self::new(ContentErrorKind::NotFound).with_subject(ContentRef::Image(id))
    }

    /// Create a content error from an I/O error on a backend file.
    #[must_use]
    pub fn io(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ContentErrorKind::NotFound,
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted => {
                ContentErrorKind::Unavailable
            }
            _ => ContentErrorKind::Other,
        };
        Self::new(kind)
            .with_subject(ContentRef::File(path.into()))
            .with_source(err)
    }

    /// Whether this error means the subject does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == ContentErrorKind::NotFound
    }
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "[Backend] Kind: message: source (node 5)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            ContentErrorKind::NotFound => "Not found",
            ContentErrorKind::InvalidData => "Invalid data",
            ContentErrorKind::Unavailable => "Unavailable",
            ContentErrorKind::Other => "Error",
        };
        write!(f, "{kind_str}")?;

        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        if let Some(subject) = &self.subject {
            write!(f, " ({subject})")?;
        }

        Ok(())
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Read-only access to a hierarchical content tree.
///
/// Implementations must return children in a stable, meaningful order (the
/// order editors arranged them in); sitemap output order follows it.
pub trait ContentTree: Send + Sync {
    /// Look up a node by id.
    ///
    /// # Errors
    ///
    /// Returns [`ContentErrorKind::NotFound`] if no such node exists, or
    /// another kind if the backend fails.
    fn node(&self, id: u64) -> Result<ContentNode, ContentError>;

    /// Direct children of node `id`, in tree order.
    ///
    /// A leaf returns an empty vector.
    ///
    /// # Errors
    ///
    /// Returns [`ContentErrorKind::NotFound`] if `id` itself does not exist.
    fn children(&self, id: u64) -> Result<Vec<ContentNode>, ContentError>;

    /// Look up an image asset by id.
    ///
    /// # Errors
    ///
    /// Returns [`ContentErrorKind::NotFound`] if no such image exists.
    fn image(&self, id: u64) -> Result<Image, ContentError>;
}
