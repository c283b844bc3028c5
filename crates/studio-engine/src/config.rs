//! Studio configuration, read from a TOML file.
//!
//! Every field is optional. A missing file means "all defaults"; a file that
//! exists but cannot be read or parsed is an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::binding::SymbolNames;
use crate::error::EngineError;
use crate::logging::LoggingConfig;

pub const DEFAULT_CONFIG_FILE: &str = "studio.toml";
pub const DEFAULT_LIBRARY_NAME: &str = "StudioInterface";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub library: LibraryConfig,
    pub logging: LoggingSection,
    pub startup: StartupConfig,
}

/// Where a loaded [`StudioConfig`] came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    File,
    /// The file did not exist.
    Defaults,
}

impl ConfigOrigin {
    /// Reports the outcome of [`StudioConfig::from_file`].
    ///
    /// Loading happens before the logger is installed, so callers emit this
    /// once logging is up.
    pub fn log(self, path: &Path) {
        match self {
            Self::File => log::debug!("loaded config from {}", path.display()),
            Self::Defaults => {
                log::warn!("config file {} not found, using defaults", path.display())
            }
        }
    }
}

impl StudioConfig {
    /// Loads `path`, falling back to defaults when the file does not exist.
    pub fn from_file(path: impl AsRef<Path>) -> Result<(Self, ConfigOrigin), EngineError> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok((Self::default(), ConfigOrigin::Defaults));
            }
            Err(source) => {
                return Err(EngineError::Config {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config = Self::from_toml_str(&text).map_err(|source| EngineError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok((config, ConfigOrigin::File))
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Where the engine library lives and what it exports.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Explicit library path. Takes precedence over `name`.
    pub path: Option<PathBuf>,
    /// Library stem; platform prefix and extension are added on load.
    pub name: String,
    pub symbols: SymbolNames,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            path: None,
            name: DEFAULT_LIBRARY_NAME.to_string(),
            symbols: SymbolNames::default(),
        }
    }
}

impl LibraryConfig {
    /// Path handed to the dynamic loader.
    ///
    /// A bare file name (the `name` case) lets the platform search its usual
    /// library directories.
    pub fn resolve_path(&self) -> PathBuf {
        match &self.path {
            Some(path) => path.clone(),
            None => PathBuf::from(libloading::library_filename(&self.name)),
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStyle {
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// `env_logger` filter. `RUST_LOG` applies when unset.
    pub filter: Option<String>,
    pub style: LogStyle,
}

impl LoggingSection {
    pub fn to_logging_config(&self) -> LoggingConfig {
        let write_style = match self.style {
            LogStyle::Auto => env_logger::WriteStyle::Auto,
            LogStyle::Always => env_logger::WriteStyle::Always,
            LogStyle::Never => env_logger::WriteStyle::Never,
        };
        LoggingConfig {
            env_filter: self.filter.clone(),
            write_style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StartupConfig {
    pub banner: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self { banner: true }
    }
}
