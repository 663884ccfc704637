//! Configuration loading and root folder resolution
//!
//! Each service reads a small bootstrap TOML file (port, root folder,
//! logging, service-specific knobs). A missing TOML file never stops a
//! service from starting: compiled defaults are used instead.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "MEDSCAN_ROOT_FOLDER";

/// Logging configuration (`[logging]` table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
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

/// Default TOML path for a module: `<config dir>/medscan/<module>.toml`
pub fn default_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("medscan").join(format!("{}.toml", module_name)))
}

/// Where a loaded configuration came from
///
/// Loading happens before the tracing subscriber exists, so the outcome is
/// returned and logged by the caller once logging is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// No user config directory on this platform
    NoConfigDir,
    /// Path checked, nothing there
    Missing(PathBuf),
    Loaded(PathBuf),
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::NoConfigDir => {
                warn!("No configuration directory available, using built-in defaults")
            }
            ConfigSource::Missing(path) => info!(
                "Config file {} not found, using built-in defaults",
                path.display()
            ),
            ConfigSource::Loaded(path) => info!("Loaded configuration from {}", path.display()),
        }
    }
}

/// Load a TOML configuration file, falling back to defaults
///
/// A missing file is normal (defaults are used). A file that exists but
/// cannot be read or parsed is a configuration error.
pub fn load_toml_config<T>(path: Option<&Path>) -> Result<(T, ConfigSource)>
where
    T: DeserializeOwned + Default,
{
    let Some(path) = path else {
        return Ok((T::default(), ConfigSource::NoConfigDir));
    };

    if !path.exists() {
        return Ok((T::default(), ConfigSource::Missing(path.to_path_buf())));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    Ok((config, ConfigSource::Loaded(path.to_path_buf())))
}

/// Root folder resolution in priority order:
/// 1. Command-line argument (highest priority)
/// 2. `MEDSCAN_ROOT_FOLDER` environment variable
/// 3. `root_folder` from the TOML config file
/// 4. OS-dependent compiled default
#[derive(Debug, Clone, Default)]
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_value: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    pub fn with_toml_value(mut self, path: Option<PathBuf>) -> Self {
        self.toml_value = path;
        self
    }

    /// Resolve the root folder (never fails; falls back to the OS default)
    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml_value {
            return path.clone();
        }

        default_root_folder()
    }
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("medscan"))
        .unwrap_or_else(|| PathBuf::from("./medscan_data"))
}

/// Creates the root folder and derives file paths inside it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root folder if it is missing (idempotent)
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root.exists() {
            std::fs::create_dir_all(&self.root)?;
            info!("Created root folder: {}", self.root.display());
        }
        Ok(())
    }

    /// Path of a file inside the root folder. Absolute names are kept as-is.
    pub fn file_path(&self, name: impl AsRef<Path>) -> PathBuf {
        let name = name.as_ref();
        if name.is_absolute() {
            name.to_path_buf()
        } else {
            self.root.join(name)
        }
    }
}
