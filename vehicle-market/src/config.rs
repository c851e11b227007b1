//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: `VEHICLE_MARKET_`, nested keys split on `__`)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/vehicle-market/{service_name}/config.toml
//! 4. System directory: /etc/vehicle-market/{service_name}/config.toml
//! 5. Default values
//!
//! ```toml
//! [service]
//! name = "vehicle-market"
//! port = 8080
//!
//! [pagination]
//! default_per_page = 20
//! max_visible_pages = 7
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;
use crate::pagination::DEFAULT_MAX_VISIBLE_PAGES;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "VEHICLE_MARKET_";

/// Directory name used under the XDG and system config roots
const CONFIG_DIR: &str = "vehicle-market";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Middleware configuration
    #[serde(default)]
    pub middleware: MiddlewareConfig,

    /// Listing pagination configuration
    #[serde(default)]
    pub pagination: PaginationConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Environment (dev, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl ServiceConfig {
    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// CORS policy applied by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorsMode {
    /// Allow any origin, method and header
    #[default]
    Permissive,
    /// Same-origin only
    Restrictive,
}

/// Middleware configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Request body size limit in MB
    #[serde(default = "default_body_limit_mb")]
    pub body_limit_mb: usize,

    /// Enable panic recovery middleware
    #[serde(default = "default_true")]
    pub catch_panic: bool,

    /// Enable compression
    #[serde(default = "default_true")]
    pub compression: bool,

    /// CORS configuration
    #[serde(default)]
    pub cors_mode: CorsMode,
}

impl MiddlewareConfig {
    /// Body limit in bytes
    pub fn body_limit_bytes(&self) -> usize {
        self.body_limit_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            body_limit_mb: default_body_limit_mb(),
            catch_panic: true,
            compression: true,
            cors_mode: CorsMode::default(),
        }
    }
}

/// Listing page sizes and page-link window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size when a request gives none
    #[serde(default = "default_per_page")]
    pub default_per_page: u32,

    /// Largest page size a request may ask for
    #[serde(default = "default_max_per_page")]
    pub max_per_page: u32,

    /// Number of page links in the sliding window
    #[serde(default = "default_max_visible_pages")]
    pub max_visible_pages: u32,
}

impl PaginationConfig {
    /// Clamp a requested page size into `[1, max_per_page]`
    ///
    /// A missing size falls back to `default_per_page`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use vehicle_market::config::PaginationConfig;
    ///
    /// let config = PaginationConfig::default();
    /// assert_eq!(config.page_size(None), 10);
    /// assert_eq!(config.page_size(Some(0)), 1);
    /// assert_eq!(config.page_size(Some(500)), 100);
    /// ```
    pub fn page_size(&self, requested: Option<u32>) -> u32 {
        let max = self.max_per_page.max(1);
        requested.unwrap_or(self.default_per_page).clamp(1, max)
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_per_page: default_per_page(),
            max_per_page: default_max_per_page(),
            max_visible_pages: default_max_visible_pages(),
        }
    }
}

// Default value functions
fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_true() -> bool {
    true
}

fn default_body_limit_mb() -> usize {
    1
}

fn default_per_page() -> u32 {
    10
}

fn default_max_per_page() -> u32 {
    100
}

fn default_max_visible_pages() -> u32 {
    DEFAULT_MAX_VISIBLE_PAGES
}

impl Config {
    /// Load configuration from all sources for the default service name
    ///
    /// Environment variables (`VEHICLE_MARKET_` prefix) override all file-based configs.
    pub fn load() -> Result<Self> {
        Self::load_for_service(CONFIG_DIR)
    }

    /// Load configuration for a specific service name
    ///
    /// Searches ./config.toml, the XDG config directory and /etc, merging
    /// every file that exists with higher-priority files winning.
    pub fn load_for_service(service_name: &str) -> Result<Self> {
        let config_paths = Self::find_config_paths(service_name);

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let existing: Vec<PathBuf> = config_paths
            .into_iter()
            .filter(|path| {
                let exists = path.exists();
                if exists {
                    tracing::info!("Loading configuration from: {}", path.display());
                }
                exists
            })
            .collect();

        let config = Self::figment(&existing, Env::prefixed(ENV_PREFIX).split("__")).extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    ///
    /// This bypasses directory discovery; defaults and environment variables
    /// still apply. A missing file is not an error.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let files = [path.as_ref().to_path_buf()];
        let config = Self::figment(&files, Env::prefixed(ENV_PREFIX).split("__")).extract()?;
        Ok(config)
    }

    /// Defaults, then `files` from lowest to highest priority, then `env`
    ///
    /// `files` is given highest priority first.
    fn figment(files: &[PathBuf], env: Env) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        for path in files.iter().rev() {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(env)
    }

    /// Find all possible config file paths for a service
    ///
    /// Returns paths in priority order (highest first). The XDG entry is
    /// only present when the file exists.
    fn find_config_paths(service_name: &str) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix(CONFIG_DIR);
        let config_file_path = Path::new(service_name).join("config.toml");
        if let Some(path) = xdg_dirs.find_config_file(&config_file_path) {
            paths.push(path);
        }

        paths.push(
            PathBuf::from("/etc")
                .join(CONFIG_DIR)
                .join(service_name)
                .join("config.toml"),
        );

        paths
    }

    /// Get the recommended config path for a service
    ///
    /// Returns: ~/.config/vehicle-market/{service_name}/config.toml
    pub fn recommended_path(service_name: &str) -> PathBuf {
        let xdg_dirs = xdg::BaseDirectories::with_prefix(CONFIG_DIR);
        let config_file_path = Path::new(service_name).join("config.toml");

        // place_config_file creates parent directories if needed
        xdg_dirs
            .place_config_file(&config_file_path)
            .unwrap_or_else(|_| {
                PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| String::from("~")))
                    .join(".config")
                    .join(CONFIG_DIR)
                    .join(config_file_path)
            })
    }

    /// Whether the service runs in a production environment
    pub fn is_production(&self) -> bool {
        matches!(self.service.environment.as_str(), "production" | "prod")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: "vehicle-market".to_string(),
                port: default_port(),
                log_level: default_log_level(),
                timeout_secs: default_timeout(),
                environment: default_environment(),
            },
            middleware: MiddlewareConfig::default(),
            pagination: PaginationConfig::default(),
        }
    }
}
