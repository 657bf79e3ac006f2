//! `smap generate` command implementation.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use smap_config::{CliSettings, Config};
use smap_content::FileContentTree;
use smap_notify::PingNotifier;
use smap_sitemap::{SitemapPublisher, run};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the generate command.
#[derive(Args)]
pub(crate) struct GenerateArgs {
    /// Path to configuration file (default: auto-discover smap.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for sitemaps (overrides config).
    #[arg(short, long)]
    sitemap_dir: Option<PathBuf>,

    /// Content tree export file (overrides config).
    #[arg(short, long)]
    tree: Option<PathBuf>,

    /// Deployment environment (overrides config).
    #[arg(long, env = "SMAP_ENVIRONMENT")]
    environment: Option<String>,

    /// Notify search engines even outside production.
    #[arg(long)]
    notify: bool,

    /// Never notify search engines.
    #[arg(long, conflicts_with = "notify")]
    no_notify: bool,

    /// Enable verbose output (log every URL).
    #[arg(short, long)]
    pub verbose: bool,
}

impl GenerateArgs {
    /// Execute the generate command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or the content tree cannot be
    /// loaded, or if any site failed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            sitemap_dir: self.sitemap_dir.clone(),
            tree_file: self.tree.clone(),
            environment: self.environment.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let sites = config.sites();
        if sites.is_empty() {
            output.warning("No sites configured (set general.domain or add [[sites]])");
            return Ok(());
        }

        let sitemap_dir = &config.output_resolved.sitemap_dir;
        std::fs::create_dir_all(sitemap_dir)?;

        let tree_file = &config.content_resolved.tree_file;
        output.info(&format!("Content tree: {}", tree_file.display()));
        output.info(&format!("Output: {}", sitemap_dir.display()));
        let tree = FileContentTree::load(tree_file)?;

        let should_notify = self.resolve_notify(config.is_production());
        if should_notify {
            output.info(&format!("Notifying: {}", config.notify.endpoint));
        }
        let notifier = PingNotifier::new(
            &config.notify.endpoint,
            Duration::from_secs(config.notify.timeout_secs),
        );
        let publisher = SitemapPublisher::new(sitemap_dir.clone());

        output.highlight(&format!("Generating sitemaps for {} site(s)", sites.len()));
        tracing::info!(sites = sites.len(), notify = should_notify, "Starting sitemap generation");
        let report = run(&sites, &tree, &publisher, &notifier, should_notify);
        output.report(&report);

        if report.has_failures() {
            return Err(CliError::Generation {
                failed: report.failures().count(),
                total: report.sites.len(),
            });
        }
        Ok(())
    }

    /// Resolve notification from --notify/--no-notify, defaulting to the
    /// environment.
    fn resolve_notify(&self, is_production: bool) -> bool {
        if self.no_notify {
            false
        } else {
            self.notify || is_production
        }
    }
}
