// Layered configuration: CLI flags > YAML config file > defaults
//
// A missing default config file is fine; an explicit --config path that
// doesn't exist is an error.

use eyre::{Context, Result, eyre};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::filter::SortOrder;

/// Where the board collection is kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Jsonl,
    Sqlite,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Jsonl => write!(f, "jsonl"),
            Backend::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "jsonl" => Ok(Backend::Jsonl),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(format!("unknown backend: {} (expected jsonl or sqlite)", other)),
        }
    }
}

/// On-disk config file; every field optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    store_path: Option<PathBuf>,
    backend: Option<Backend>,
    sort: Option<SortOrder>,
}

/// Values given on the command line (or via env), taking precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub store_path: Option<PathBuf>,
    pub backend: Option<Backend>,
    pub sort: Option<SortOrder>,
}

/// Fully resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding `.sprintboard/`
    pub store_path: PathBuf,
    pub backend: Backend,
    /// Default due-date order for `ls`
    pub sort: SortOrder,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("."),
            backend: Backend::default(),
            sort: SortOrder::default(),
        }
    }
}

/// `$XDG_CONFIG_HOME/sprintboard/config.yaml` (or the platform equivalent)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sprintboard").join("config.yaml"))
}

impl Config {
    /// Resolve configuration from an optional explicit file plus overrides
    pub fn load(explicit: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let file = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(eyre!("Config file not found: {}", path.display()));
                }
                read_file(path)?
            }
            None => match default_config_path() {
                Some(path) if path.exists() => read_file(&path)?,
                _ => ConfigFile::default(),
            },
        };

        Ok(Self::resolve(file, overrides))
    }

    /// Parse YAML text and apply overrides, without touching the filesystem
    pub fn from_yaml(content: &str, overrides: Overrides) -> Result<Self> {
        Ok(Self::resolve(parse(content)?, overrides))
    }

    fn resolve(file: ConfigFile, overrides: Overrides) -> Self {
        let defaults = Self::default();
        Self {
            store_path: overrides
                .store_path
                .or(file.store_path)
                .unwrap_or(defaults.store_path),
            backend: overrides.backend.or(file.backend).unwrap_or(defaults.backend),
            sort: overrides.sort.or(file.sort).unwrap_or(defaults.sort),
        }
    }
}

fn read_file(path: &Path) -> Result<ConfigFile> {
    debug!(path = ?path, "Reading config file");
    let content = fs::read_to_string(path).wrap_err_with(|| format!("Failed to read config file {}", path.display()))?;
    parse(&content).wrap_err_with(|| format!("Invalid config file {}", path.display()))
}

fn parse(content: &str) -> Result<ConfigFile> {
    // An empty YAML document deserializes as null, not as an empty map
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str(content).context("Failed to parse YAML config")
}
