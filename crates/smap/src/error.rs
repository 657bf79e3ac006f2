//! CLI error types.

use smap_config::ConfigError;
use smap_content::ContentError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("failed to load content tree: {0}")]
    Content(#[from] ContentError),

    #[error("{failed} of {total} sites failed")]
    Generation { failed: usize, total: usize },

    #[error("{0}")]
    Server(String),
}
