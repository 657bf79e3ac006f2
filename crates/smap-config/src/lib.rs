//! Configuration management for smap.
//!
//! Parses `smap.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories. The parsed
//! configuration doubles as the site registry: [`Config::sites`] yields the
//! default site plus every `[[sites]]` entry as a [`SiteConfig`].
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `general.domain`
//! - `general.environment`
//! - `notify.endpoint`
//! - `server.host`

mod expand;

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override sitemap output directory.
    pub sitemap_dir: Option<PathBuf>,
    /// Override content tree export file.
    pub tree_file: Option<PathBuf>,
    /// Override deployment environment.
    pub environment: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "smap.toml";

/// Environment name that enables search-engine notification.
const PRODUCTION: &str = "production";

/// Default search-engine ping endpoint.
const DEFAULT_PING_ENDPOINT: &str = "https://www.google.com/ping";

/// URL scheme a site is published under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Plain `http://`.
    Http,
    /// `https://` (default).
    #[default]
    Https,
}

impl Protocol {
    /// Scheme name without the `://` separator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A site whose sitemap is generated independently.
///
/// The node identified by `root_id` is the top of the site's subtree. Nodes
/// below it have `root_path` stripped from their full path before being
/// published under `protocol://domain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Content node at the top of the site.
    pub root_id: u64,
    /// Internal path prefix removed from published URLs (may be empty).
    pub root_path: String,
    /// Public URL scheme.
    pub protocol: Protocol,
    /// Public host name, also used as the sitemap file stem.
    pub domain: String,
}

impl SiteConfig {
    /// Public base URL, e.g. `https://example.com`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.protocol, self.domain)
    }
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings for the default site and deployment.
    pub general: GeneralConfig,
    /// Additional sites rooted somewhere inside the content tree.
    sites: Vec<SiteEntryRaw>,
    /// Output configuration (paths are relative strings from TOML).
    output: OutputConfigRaw,
    /// Content tree configuration (paths are relative strings from TOML).
    content: ContentConfigRaw,
    /// Search-engine notification configuration.
    pub notify: NotifyConfig,
    /// Server configuration.
    pub server: ServerConfig,

    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Resolved content configuration (set after loading).
    #[serde(skip)]
    pub content_resolved: ContentConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// General configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Domain of the default site. Empty disables the default site.
    pub domain: String,
    /// Protocol of the default site and fallback for `[[sites]]` entries.
    pub protocol: Protocol,
    /// Deployment environment; `production` enables notification.
    pub environment: String,
    /// Root node of the default site.
    pub default_root_id: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            protocol: Protocol::default(),
            environment: "development".to_owned(),
            default_root_id: 1,
        }
    }
}

/// Raw `[[sites]]` entry as parsed from TOML.
#[derive(Debug, Deserialize)]
struct SiteEntryRaw {
    root_id: u64,
    domain: String,
    #[serde(default)]
    root_path: Option<String>,
    #[serde(default)]
    protocol: Option<Protocol>,
}

/// Raw output configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    sitemap_dir: Option<String>,
}

/// Resolved output configuration with absolute paths.
#[derive(Debug, Default)]
pub struct OutputConfig {
    /// Directory holding one `{domain}.xml` file per site.
    pub sitemap_dir: PathBuf,
}

/// Raw content configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    tree_file: Option<String>,
}

/// Resolved content configuration with absolute paths.
#[derive(Debug, Default)]
pub struct ContentConfig {
    /// Exported content tree (`.json`, `.yaml` or `.yml`).
    pub tree_file: PathBuf,
}

/// Search-engine notification configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Ping endpoint; the sitemap URL is appended as the `sitemap` query parameter.
    pub endpoint: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_PING_ENDPOINT.to_owned(),
            timeout_secs: 10,
        }
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7980,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`general.domain`").
        field: String,
        /// Error message (e.g., "${`SITE_DOMAIN`} not set").
        message: String,
    },
}

/// Check that `value` is a DNS host name (letters, digits, hyphens, dots).
///
/// Labels must be 1-63 characters and may not start or end with a hyphen.
#[must_use]
pub fn is_valid_hostname(value: &str) -> bool {
    if value.is_empty() || value.len() > 253 {
        return false;
    }
    value.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    })
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// Require a field to hold a valid host name.
fn require_hostname(value: &str, field: &str) -> Result<(), ConfigError> {
    if !is_valid_hostname(value) {
        return Err(ConfigError::Validation(format!(
            "{field} is not a valid host name: {value:?}"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `smap.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Sites to generate, in generation order.
    ///
    /// `[[sites]]` entries come first in file order, then the default site
    /// (when `general.domain` is set). A `[[sites]]` entry sharing the default
    /// root id is replaced in place by the default site, so no root is ever
    /// listed twice.
    #[must_use]
    pub fn sites(&self) -> Vec<SiteConfig> {
        let mut sites: Vec<SiteConfig> = self
            .sites
            .iter()
            .map(|entry| SiteConfig {
                root_id: entry.root_id,
                root_path: entry.root_path.clone().unwrap_or_default(),
                protocol: entry.protocol.unwrap_or(self.general.protocol),
                domain: entry.domain.clone(),
            })
            .collect();

        if !self.general.domain.is_empty() {
            let default_site = SiteConfig {
                root_id: self.general.default_root_id,
                root_path: String::new(),
                protocol: self.general.protocol,
                domain: self.general.domain.clone(),
            };
            match sites
                .iter_mut()
                .find(|site| site.root_id == default_site.root_id)
            {
                Some(existing) => *existing = default_site,
                None => sites.push(default_site),
            }
        }

        sites
    }

    /// Whether the deployment environment is `production`.
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.general.environment == PRODUCTION
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(sitemap_dir) = &settings.sitemap_dir {
            self.output_resolved.sitemap_dir.clone_from(sitemap_dir);
        }
        if let Some(tree_file) = &settings.tree_file {
            self.content_resolved.tree_file.clone_from(tree_file);
        }
        if let Some(environment) = &settings.environment {
            self.general.environment.clone_from(environment);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            general: GeneralConfig::default(),
            sites: Vec::new(),
            output: OutputConfigRaw::default(),
            content: ContentConfigRaw::default(),
            notify: NotifyConfig::default(),
            server: ServerConfig::default(),
            output_resolved: OutputConfig {
                sitemap_dir: base.join("sitemaps"),
            },
            content_resolved: ContentConfig {
                tree_file: base.join("content.json"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_sites()?;
        self.validate_notify()?;
        self.validate_server()?;
        Ok(())
    }

    /// Validate the default site and every `[[sites]]` entry.
    fn validate_sites(&self) -> Result<(), ConfigError> {
        if !self.general.domain.is_empty() {
            require_hostname(&self.general.domain, "general.domain")?;
        }

        let mut root_ids = HashSet::new();
        for (index, entry) in self.sites.iter().enumerate() {
            require_hostname(&entry.domain, &format!("sites[{index}].domain"))?;
            if !root_ids.insert(entry.root_id) {
                return Err(ConfigError::Validation(format!(
                    "sites[{index}].root_id {} is used by more than one site",
                    entry.root_id
                )));
            }
        }

        let mut domains = HashSet::new();
        for site in self.sites() {
            if !domains.insert(site.domain.clone()) {
                return Err(ConfigError::Validation(format!(
                    "domain {} is configured for more than one site",
                    site.domain
                )));
            }
        }

        Ok(())
    }

    /// Validate notification configuration.
    fn validate_notify(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.notify.endpoint, "notify.endpoint")?;
        require_http_url(&self.notify.endpoint, "notify.endpoint")?;
        if self.notify.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "notify.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.general.domain = expand::expand_env(&self.general.domain, "general.domain")?;
        self.general.environment =
            expand::expand_env(&self.general.environment, "general.environment")?;
        self.notify.endpoint = expand::expand_env(&self.notify.endpoint, "notify.endpoint")?;
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.output_resolved = OutputConfig {
            sitemap_dir: resolve(self.output.sitemap_dir.as_deref(), "sitemaps"),
        };
        self.content_resolved = ContentConfig {
            tree_file: resolve(self.content.tree_file.as_deref(), "content.json"),
        };
    }
}
