//! Configuration loading and data directory resolution
//!
//! Bootstrap settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`MCAT_DATA_DIR`, `MCAT_HOST`, `MCAT_PORT`)
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing default config file is not an error; the service starts with
//! compiled defaults. A config file named explicitly must exist and parse.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "MCAT_DATA_DIR";
/// Environment variable overriding the bind host
pub const HOST_ENV: &str = "MCAT_HOST";
/// Environment variable overriding the bind port
pub const PORT_ENV: &str = "MCAT_PORT";
/// Environment variable naming an explicit TOML config file
pub const CONFIG_ENV: &str = "MCAT_CONFIG";

/// Catalog file name inside the data directory
pub const CATALOG_FILE: &str = "music.json";
/// Audio root directory name inside the data directory
pub const AUDIO_DIR: &str = "audio";

/// Bootstrap configuration loaded from TOML file
///
/// Every key is optional. Values left out fall through to the compiled
/// defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Directory holding `music.json` and `audio/`
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// HTTP bind host
    #[serde(default)]
    pub host: Option<String>,

    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse TOML text
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Load a config file that must exist
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
        })?;
        Self::parse(&text)
    }

    /// Load the config file, tolerating absence of the default one
    ///
    /// `explicit` comes from `--config` or `MCAT_CONFIG` and is strict.
    /// Otherwise the platform default path is tried and, if absent, compiled
    /// defaults are used. Returns the path actually read, if any.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        let explicit = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        if let Some(path) = explicit {
            let config = Self::load(&path)?;
            return Ok((config, Some(path)));
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                let config = Self::load(&path)?;
                Ok((config, Some(path)))
            }
            _ => Ok((Self::default(), None)),
        }
    }
}

/// Platform config file location (`<config dir>/mcat/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("mcat").join("config.toml"))
}

/// Built-in fallback values
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub data_dir: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub data_dir: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// On-disk layout of the data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/music.json`
    pub fn catalog_path(&self) -> PathBuf {
        self.root.join(CATALOG_FILE)
    }

    /// `<root>/audio`
    pub fn audio_root(&self) -> PathBuf {
        self.root.join(AUDIO_DIR)
    }
}

/// Fully resolved startup configuration
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    pub data: DataLayout,
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl BootstrapConfig {
    /// Resolve every setting through CLI → ENV → TOML → default
    pub fn resolve(cli: CliOverrides, toml: &TomlConfig) -> Self {
        let defaults = CompiledDefaults::default();

        let data_dir = resolve_data_dir(cli.data_dir, toml);

        let host = cli
            .host
            .or_else(|| std::env::var(HOST_ENV).ok())
            .or_else(|| toml.host.clone())
            .unwrap_or(defaults.host);

        let port = cli
            .port
            .or_else(port_from_env)
            .or(toml.port)
            .unwrap_or(defaults.port);

        Self {
            data: DataLayout::new(data_dir),
            host,
            port,
            log_level: toml.logging.level.clone(),
        }
    }

    /// `host:port` string suitable for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Data directory resolution (CLI → `MCAT_DATA_DIR` → TOML → `./data`)
pub fn resolve_data_dir(cli_arg: Option<PathBuf>, toml: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path;
    }

    // Priority 2: Environment variable
    if let Some(path) = std::env::var_os(DATA_DIR_ENV) {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Some(path) = &toml.data_dir {
        return path.clone();
    }

    // Priority 4: Compiled default
    CompiledDefaults::default().data_dir
}

fn port_from_env() -> Option<u16> {
    let raw = std::env::var(PORT_ENV).ok()?;
    match raw.parse::<u16>() {
        Ok(port) => Some(port),
        Err(_) => {
            warn!("Ignoring invalid {}={:?}", PORT_ENV, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_paths() {
        let layout = DataLayout::new("/srv/music");
        assert_eq!(layout.catalog_path(), PathBuf::from("/srv/music/music.json"));
        assert_eq!(layout.audio_root(), PathBuf::from("/srv/music/audio"));
    }

    #[test]
    fn parse_full_toml() {
        let config = TomlConfig::parse(
            r#"
            data_dir = "/srv/music"
            host = "0.0.0.0"
            port = 9000

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/music")));
        assert_eq!(config.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(config.port, Some(9000));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = TomlConfig::parse("").unwrap();
        assert!(config.data_dir.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = TomlConfig::parse("port = \"eighty\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
