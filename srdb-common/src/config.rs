//! Bootstrap configuration and config file resolution
//!
//! Configuration is read once at startup from a TOML file. Every key is
//! optional; anything missing falls back to the compiled defaults below.
//!
//! ```toml
//! [server]
//! port = 5730
//!
//! [data]
//! base = "https://example.org/data/"
//!
//! [data.files]
//! songs = ["elvis-songs.yml", "non-elvis-songs.yml"]
//!
//! [pagination.desktop]
//! default_rows_per_page = 20
//! ```

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SRDB_CONFIG";

/// Complete bootstrap configuration
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub pagination: PaginationConfig,
    pub featured: FeaturedConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5730,
        }
    }
}

/// Where the YAML collections live
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    /// Directory path or `http(s)://` base URL
    pub base: String,
    pub files: DataFiles,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            base: "./data/".to_string(),
            files: DataFiles::default(),
        }
    }
}

/// File names of each collection, relative to the data base
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataFiles {
    pub song_plays: String,
    /// Song collections, concatenated in this order
    pub songs: Vec<String>,
    pub performers: String,
    pub organizations: String,
    pub rights_admin_songs: String,
    pub genres: String,
    pub movies: String,
    pub writers: String,
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            song_plays: "song-plays.yml".to_string(),
            songs: vec![
                "elvis-songs.yml".to_string(),
                "non-elvis-songs.yml".to_string(),
            ],
            performers: "performers.yml".to_string(),
            organizations: "organizations.yml".to_string(),
            rights_admin_songs: "rights-admin-songs.yml".to_string(),
            genres: "genres.yml".to_string(),
            movies: "movies.yml".to_string(),
            writers: "writers.yml".to_string(),
        }
    }
}

/// Page size settings for both layouts
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct PaginationConfig {
    pub desktop: DesktopPagination,
    pub mobile: MobilePagination,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DesktopPagination {
    pub default_rows_per_page: usize,
    pub rows_per_page_options: Vec<usize>,
}

impl Default for DesktopPagination {
    fn default() -> Self {
        Self {
            default_rows_per_page: 15,
            rows_per_page_options: vec![10, 15, 20, 25, 40, 100],
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct MobilePagination {
    pub default_rows_per_page: usize,
}

impl Default for MobilePagination {
    fn default() -> Self {
        Self {
            default_rows_per_page: 10,
        }
    }
}

/// Secondary table restricted to one performer
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeaturedConfig {
    pub heading: String,
    /// Case-insensitive substring matched against the performers column
    pub performer_match: String,
}

impl Default for FeaturedConfig {
    fn default() -> Self {
        Self {
            heading: "Elvis Presley Songs".to_string(),
            performer_match: "elvis".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log file path (optional, logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl CatalogConfig {
    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// A missing file is not fatal: defaults are used and the returned
    /// [`ConfigOrigin`] says so.
    pub fn load(path: &Path) -> Result<(Self, ConfigOrigin)> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let config = Self::from_toml_str(&content)
                    .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
                Ok((config, ConfigOrigin::File(path.to_path_buf())))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok((Self::default(), ConfigOrigin::MissingFile(path.to_path_buf())))
            }
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Check cross-field constraints that serde cannot express
    pub fn validate(&self) -> Result<()> {
        let desktop = &self.pagination.desktop;
        if desktop.rows_per_page_options.is_empty() {
            return Err(Error::Config(
                "pagination.desktop.rows_per_page_options must not be empty".to_string(),
            ));
        }
        if desktop.rows_per_page_options.contains(&0)
            || desktop.default_rows_per_page == 0
            || self.pagination.mobile.default_rows_per_page == 0
        {
            return Err(Error::Config("page sizes must be greater than zero".to_string()));
        }
        if !desktop
            .rows_per_page_options
            .contains(&desktop.default_rows_per_page)
        {
            return Err(Error::Config(format!(
                "default_rows_per_page {} is not one of {:?}",
                desktop.default_rows_per_page, desktop.rows_per_page_options
            )));
        }
        if self.data.files.song_plays.trim().is_empty() {
            return Err(Error::Config("data.files.song_plays must be set".to_string()));
        }
        if self.data.files.songs.iter().all(|f| f.trim().is_empty()) {
            return Err(Error::Config(
                "data.files.songs must name at least one file".to_string(),
            ));
        }
        Ok(())
    }
}

/// Config file resolution in priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. Per-user config directory (`<config_dir>/srdb/config.toml`)
///
/// Returns `None` when nothing resolves, meaning compiled defaults apply.
pub fn resolve_config_path(cli_arg: Option<&Path>, env_var_name: &str) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Per-user config file, only if it exists
    default_config_file().filter(|path| path.exists())
}

/// Get default configuration file path for the platform
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("srdb").join("config.toml"))
}

/// Where the loaded configuration came from
///
/// Configuration is read before logging is set up, so the outcome is
/// returned and logged by the caller once a subscriber is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    File(PathBuf),
    /// A file was named but does not exist
    MissingFile(PathBuf),
    /// Nothing named, no per-user file
    Defaults,
}

impl ConfigOrigin {
    pub fn log(&self) {
        match self {
            ConfigOrigin::File(path) => info!("Loaded configuration from {}", path.display()),
            ConfigOrigin::MissingFile(path) => warn!(
                "Config file {} not found, using built-in defaults",
                path.display()
            ),
            ConfigOrigin::Defaults => info!("No config file found, using built-in defaults"),
        }
    }
}

/// Resolve and load configuration, falling back to compiled defaults
pub fn load_config(cli_arg: Option<&Path>) -> Result<(CatalogConfig, ConfigOrigin)> {
    match resolve_config_path(cli_arg, CONFIG_ENV_VAR) {
        Some(path) => CatalogConfig::load(&path),
        None => Ok((CatalogConfig::default(), ConfigOrigin::Defaults)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = CatalogConfig::default();
        config.validate().unwrap();
        assert_eq!(config.pagination.desktop.default_rows_per_page, 15);
        assert_eq!(config.pagination.mobile.default_rows_per_page, 10);
        assert_eq!(config.data.files.songs.len(), 2);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CatalogConfig::from_toml_str(
            "[server]\nport = 8000\n\n[data]\nbase = \"https://example.org/data/\"\n",
        )
        .unwrap();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.data.base, "https://example.org/data/");
        assert_eq!(config.data.files.song_plays, "song-plays.yml");
    }

    #[test]
    fn test_default_page_size_must_be_an_option() {
        let err = CatalogConfig::from_toml_str(
            "[pagination.desktop]\ndefault_rows_per_page = 12\n",
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err =
            CatalogConfig::from_toml_str("[pagination.mobile]\ndefault_rows_per_page = 0\n")
                .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = CatalogConfig::from_toml_str("[server\nport = ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_cli_path_wins() {
        let path = resolve_config_path(Some(Path::new("/tmp/explicit.toml")), "SRDB_TEST_UNSET_VAR");
        assert_eq!(path, Some(PathBuf::from("/tmp/explicit.toml")));
    }
}
