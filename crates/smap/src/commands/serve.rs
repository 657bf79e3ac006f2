//! `smap serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use smap_config::{CliSettings, Config};
use smap_server::{run_server, server_config_from_smap_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover smap.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory with published sitemaps (overrides config).
    #[arg(short, long)]
    sitemap_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output (log every request).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            sitemap_dir: self.sitemap_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Sitemap directory: {}",
            config.output_resolved.sitemap_dir.display()
        ));
        if config.general.domain.is_empty() {
            output.warning("No default domain configured: unknown hosts will get 404");
        } else {
            output.info(&format!("Default domain: {}", config.general.domain));
        }

        let server_config = server_config_from_smap_config(&config);
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
