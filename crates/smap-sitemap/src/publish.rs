//! Sitemap file publication.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::PublishError;
use crate::model::SitemapDocument;
use crate::xml::render_sitemap;

/// Writes sitemap documents to `{dir}/{domain}.xml`.
///
/// Each write goes to a temporary file in the same directory which is then
/// renamed over the target, so readers see either the previous or the new
/// document, never a partial one.
#[derive(Debug, Clone)]
pub struct SitemapPublisher {
    dir: PathBuf,
}

impl SitemapPublisher {
    /// Create a publisher writing into `dir`.
    ///
    /// The directory is not created; publishing into a missing directory
    /// fails.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Sitemap file path for `domain`.
    #[must_use]
    pub fn path_for(&self, domain: &str) -> PathBuf {
        self.dir.join(format!("{domain}.xml"))
    }

    /// Render `document` and atomically replace the sitemap of `domain`.
    ///
    /// Returns the path of the written file.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::InvalidDomain`] if `domain` is not a valid host
    /// name, or [`PublishError::Io`] if the file cannot be written.
    pub fn publish(&self, domain: &str, document: &SitemapDocument) -> Result<PathBuf, PublishError> {
        if !smap_config::is_valid_hostname(domain) {
            return Err(PublishError::InvalidDomain(domain.to_owned()));
        }

        let content = render_sitemap(document)?;
        let target = self.path_for(domain);
        let io_error = |source| PublishError::Io {
            path: target.clone(),
            source,
        };

        let mut temp = tempfile::Builder::new()
            .prefix(".sitemap-")
            .suffix(".xml.tmp")
            .tempfile_in(&self.dir)
            .map_err(io_error)?;
        temp.write_all(&content).map_err(io_error)?;
        temp.as_file().sync_all().map_err(io_error)?;

        // Temp files are created owner-only; published sitemaps are served.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            temp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o644))
                .map_err(io_error)?;
        }

        temp.persist(&target).map_err(|e| io_error(e.error))?;

        tracing::debug!(path = %target.display(), bytes = content.len(), "Wrote sitemap");
        Ok(target)
    }
}
