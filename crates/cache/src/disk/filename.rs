//! Logical file names and the encoders that turn them into path components

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use tierstore_core::StorageError;

/// Logical name of a file inside a folder store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filename(String);

impl Filename {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Filename {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Filename {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for Filename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps a logical name to a single path component.
///
/// Implementations must be collision-free: distinct names must never encode
/// to the same string.
pub trait EncodeFilename: Send + Sync {
    fn encode(&self, name: &str) -> String;
}

impl<F> EncodeFilename for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn encode(&self, name: &str) -> String {
        self(name)
    }
}

/// Built-in filename encoders
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilenameEncoding {
    /// URL-safe base64 without padding. Reversible; assumes a case-sensitive
    /// filesystem.
    #[default]
    Base64Url,
    /// Lowercase hex of the UTF-8 bytes. Reversible and case-insensitive safe.
    Hex,
    /// Hex SHA-256 digest. Fixed length, not reversible.
    Sha256,
    /// The name itself. Only for names already known to be valid components.
    Raw,
}

impl EncodeFilename for FilenameEncoding {
    fn encode(&self, name: &str) -> String {
        match self {
            Self::Base64Url => URL_SAFE_NO_PAD.encode(name),
            Self::Hex => hex::encode(name),
            Self::Sha256 => hex::encode(Sha256::digest(name.as_bytes())),
            Self::Raw => name.to_string(),
        }
    }
}

impl FromStr for FilenameEncoding {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base64-url" | "base64" => Ok(Self::Base64Url),
            "hex" => Ok(Self::Hex),
            "sha256" => Ok(Self::Sha256),
            "raw" => Ok(Self::Raw),
            other => Err(StorageError::configuration(format!(
                "unknown filename encoding '{other}' (expected base64-url, hex, sha256 or raw)"
            ))),
        }
    }
}
