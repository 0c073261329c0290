use crate::error::{AppError, Result};
use crate::models::{PermissionType, Role};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR_PREFIX: &str = "gsheet-client";

/// Environment variable holding the path to the service account key file.
pub const CREDENTIALS_ENV: &str = "gs_credentials";

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials_path: PathBuf,
    pub sharing: SharingConfig,
}

/// Settings read from the optional `config.toml`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    pub sharing: SharingConfig,
}

/// Defaults applied when a share request leaves permission type or role unset.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SharingConfig {
    pub perm_type: PermissionType,
    pub role: Role,
    pub notify: bool,
}

impl Default for SharingConfig {
    fn default() -> Self {
        Self {
            perm_type: PermissionType::User,
            role: Role::Writer,
            notify: true,
        }
    }
}

impl Config {
    /// Load configuration, taking the credentials path from `gs_credentials`
    /// unless an explicit path is given.
    pub fn load(credentials_override: Option<PathBuf>) -> Result<Self> {
        let credentials_path =
            resolve_credentials_path(credentials_override, std::env::var_os(CREDENTIALS_ENV))?;

        let file_config = match Self::xdg_dirs().find_config_file("config.toml") {
            Some(path) => FileConfig::read(&path)?,
            None => FileConfig::default(),
        };

        Ok(Self {
            credentials_path,
            sharing: file_config.sharing,
        })
    }

    fn xdg_dirs() -> xdg::BaseDirectories {
        xdg::BaseDirectories::with_prefix(CONFIG_DIR_PREFIX)
    }

    /// Get the config file path
    pub fn config_file() -> Result<PathBuf> {
        let xdg_dirs = Self::xdg_dirs();
        xdg_dirs
            .place_config_file("config.toml")
            .map_err(|e| AppError::Config(format!("Failed to create config directory: {}", e)))
    }
}

impl FileConfig {
    pub fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config {}: {}", path.display(), e))
        })
    }
}

fn resolve_credentials_path(
    credentials_override: Option<PathBuf>,
    env_value: Option<OsString>,
) -> Result<PathBuf> {
    match credentials_override {
        Some(path) => Ok(path),
        None => credentials_path_from(env_value),
    }
}

fn credentials_path_from(value: Option<OsString>) -> Result<PathBuf> {
    match value {
        Some(value) if !value.is_empty() => Ok(PathBuf::from(value)),
        Some(_) => Err(AppError::Config(format!(
            "Environment variable {} is empty",
            CREDENTIALS_ENV
        ))),
        None => Err(AppError::Config(format!(
            "Environment variable {} must point to a service account key file",
            CREDENTIALS_ENV
        ))),
    }
}
