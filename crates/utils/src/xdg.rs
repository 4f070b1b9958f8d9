use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// XDG Base Directory locations
pub struct XdgPaths;

impl XdgPaths {
    /// XDG_CACHE_HOME or fallback
    pub fn cache_dir() -> PathBuf {
        Self::resolve("XDG_CACHE_HOME", ".cache")
    }

    /// XDG_DATA_HOME or fallback
    pub fn data_dir() -> PathBuf {
        Self::resolve("XDG_DATA_HOME", ".local/share")
    }

    /// XDG_STATE_HOME or fallback
    pub fn state_dir() -> PathBuf {
        Self::resolve("XDG_STATE_HOME", ".local/state")
    }

    fn resolve(variable: &str, home_relative: &str) -> PathBuf {
        env::var(variable)
            .ok()
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|home| home.join(home_relative))
                    .unwrap_or_else(|| PathBuf::from(home_relative))
            })
    }
}

/// Standard location a storage folder can live under
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseDirectory {
    #[default]
    Cache,
    Data,
    State,
    Temp,
}

impl BaseDirectory {
    pub fn path(self) -> PathBuf {
        match self {
            Self::Cache => XdgPaths::cache_dir(),
            Self::Data => XdgPaths::data_dir(),
            Self::State => XdgPaths::state_dir(),
            Self::Temp => env::temp_dir(),
        }
    }
}
