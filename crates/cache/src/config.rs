//! Disk storage configuration with precedence and validation
//!
//! Sources, lowest precedence first: built-in defaults, a JSON file, the
//! `TIERSTORE_DISK_*` environment variables, explicit builder calls.

use crate::disk::{FilenameEncoding, WriteMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tierstore_core::{Result, StorageError};
use tierstore_utils::BaseDirectory;
use tracing::debug;

pub const ENV_ROOT: &str = "TIERSTORE_DISK_ROOT";
pub const ENV_FOLDER: &str = "TIERSTORE_DISK_FOLDER";
pub const ENV_ENCODING: &str = "TIERSTORE_DISK_ENCODING";
pub const ENV_WRITE_MODE: &str = "TIERSTORE_DISK_WRITE_MODE";
pub const ENV_CLEAR_ON_DROP: &str = "TIERSTORE_DISK_CLEAR_ON_DROP";

const DEFAULT_FOLDER: &str = "tierstore";

/// Settings for a [`DiskFolderStore`](crate::DiskFolderStore)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskConfig {
    /// Folder name under the root directory
    pub folder: String,
    /// Standard location used when `root_dir` is unset
    pub base_directory: BaseDirectory,
    /// Explicit parent directory, overriding `base_directory`
    pub root_dir: Option<PathBuf>,
    /// How logical names become file names
    pub encoding: FilenameEncoding,
    /// Create missing parent directories on store
    pub create_directories: bool,
    pub write_mode: WriteMode,
    /// Remove the folder when the store is dropped
    pub clear_on_drop: bool,
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            folder: DEFAULT_FOLDER.to_string(),
            base_directory: BaseDirectory::Cache,
            root_dir: None,
            encoding: FilenameEncoding::Base64Url,
            create_directories: true,
            write_mode: WriteMode::InPlace,
            clear_on_drop: false,
        }
    }
}

impl DiskConfig {
    pub fn builder() -> DiskConfigBuilder {
        DiskConfigBuilder::new()
    }

    /// Defaults, then `path` if given, then the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        config.with_env_overrides()
    }

    /// Read a JSON file; missing fields keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| StorageError::io(path, "read config", e))?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            StorageError::configuration(format!("invalid config '{}': {e}", path.display()))
        })?;
        debug!(path = %path.display(), "loaded disk config from file");
        Ok(config)
    }

    /// Apply any `TIERSTORE_DISK_*` variables that are set and non-empty
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(root) = env_value(ENV_ROOT) {
            self.root_dir = Some(PathBuf::from(root));
        }
        if let Some(folder) = env_value(ENV_FOLDER) {
            self.folder = folder;
        }
        if let Some(encoding) = env_value(ENV_ENCODING) {
            self.encoding = encoding.parse()?;
        }
        if let Some(mode) = env_value(ENV_WRITE_MODE) {
            self.write_mode = mode.parse()?;
        }
        if let Some(flag) = env_value(ENV_CLEAR_ON_DROP) {
            self.clear_on_drop = parse_flag(ENV_CLEAR_ON_DROP, &flag)?;
        }
        Ok(self)
    }

    /// Directory the folder store is rooted at
    pub fn root(&self) -> PathBuf {
        let parent = match &self.root_dir {
            Some(dir) => dir.clone(),
            None => self.base_directory.path(),
        };
        parent.join(&self.folder)
    }

    pub fn validate(&self) -> Result<()> {
        let folder = self.folder.as_str();
        if folder.trim().is_empty() {
            return Err(StorageError::configuration("folder name must not be empty"));
        }
        if folder == "." || folder == ".." || folder.contains(['/', '\\', '\0']) {
            return Err(StorageError::configuration(format!(
                "folder name '{folder}' must be a single path component"
            )));
        }
        Ok(())
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(StorageError::configuration(format!(
            "{name} must be a boolean, got '{other}'"
        ))),
    }
}

/// Builder applied on top of a loaded or default [`DiskConfig`]
#[derive(Debug, Clone, Default)]
pub struct DiskConfigBuilder {
    config: DiskConfig,
}

impl DiskConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration, e.g. the result of [`DiskConfig::load`]
    pub fn from_config(config: DiskConfig) -> Self {
        Self { config }
    }

    pub fn folder(mut self, folder: impl Into<String>) -> Self {
        self.config.folder = folder.into();
        self
    }

    pub fn base_directory(mut self, base: BaseDirectory) -> Self {
        self.config.base_directory = base;
        self
    }

    pub fn root_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.root_dir = Some(dir.into());
        self
    }

    pub fn encoding(mut self, encoding: FilenameEncoding) -> Self {
        self.config.encoding = encoding;
        self
    }

    pub fn create_directories(mut self, create: bool) -> Self {
        self.config.create_directories = create;
        self
    }

    pub fn write_mode(mut self, mode: WriteMode) -> Self {
        self.config.write_mode = mode;
        self
    }

    pub fn clear_on_drop(mut self, clear: bool) -> Self {
        self.config.clear_on_drop = clear;
        self
    }

    /// Validate and return the configuration
    pub fn build(self) -> Result<DiskConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
