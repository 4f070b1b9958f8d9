use std::fmt;
use std::path::PathBuf;

/// Result type alias for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Which side of a two-tier composite failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Nearer tier of a front/back chain
    Front,
    /// Farther tier of a front/back chain
    Back,
    /// Left-hand store of a zip
    First,
    /// Right-hand store of a zip
    Second,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Front => "front",
            Self::Back => "back",
            Self::First => "first",
            Self::Second => "second",
        };
        f.write_str(name)
    }
}

/// Error type shared by every storage tier
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Key has no value in the storage
    #[error("no value for key {key} in '{storage}'")]
    NotFound { storage: String, key: String },

    /// Underlying I/O failure
    #[error("I/O {operation} failed for '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Parent directory of a file could not be created
    #[error("failed to create directory '{}': {source}", .path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File could not be created or overwritten
    #[error("failed to create file '{}': {source}", .path.display())]
    FileCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One tier of a composite storage failed
    #[error("{tier} tier of '{storage}' failed: {source}")]
    Composition {
        storage: String,
        tier: Tier,
        #[source]
        source: Box<StorageError>,
    },

    /// Key cannot be mapped onto the underlying storage
    #[error("invalid key {key}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// Stored bytes could not be decoded into a value
    #[error("failed to decode {}: {message}", display_bytes(.data))]
    Decode { data: Vec<u8>, message: String },

    /// A queued task was dropped before it could report back
    #[error("task queued on '{storage}' was aborted before completing")]
    Aborted { storage: String },

    /// Invalid storage configuration
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

/// Render a byte payload for an error message.
///
/// Valid UTF-8 is shown as text, anything else as a size placeholder.
pub fn display_bytes(data: &[u8]) -> String {
    match std::str::from_utf8(data) {
        Ok(text) => format!("'{text}'"),
        Err(_) => format!("<{} bytes of binary data>", data.len()),
    }
}

impl StorageError {
    /// Create a not-found error for a key
    #[must_use]
    pub fn not_found(storage: impl Into<String>, key: &dyn fmt::Debug) -> Self {
        StorageError::NotFound {
            storage: storage.into(),
            key: format!("{key:?}"),
        }
    }

    /// Create an I/O error with context
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, operation: &'static str, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            operation,
            source,
        }
    }

    /// Create a directory creation error
    #[must_use]
    pub fn directory_creation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::DirectoryCreation {
            path: path.into(),
            source,
        }
    }

    /// Create a file creation error
    #[must_use]
    pub fn file_creation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::FileCreation {
            path: path.into(),
            source,
        }
    }

    /// Wrap an error raised by one tier of a composite
    #[must_use]
    pub fn composition(storage: impl Into<String>, tier: Tier, source: StorageError) -> Self {
        StorageError::Composition {
            storage: storage.into(),
            tier,
            source: Box::new(source),
        }
    }

    #[must_use]
    pub fn invalid_key(key: &dyn fmt::Debug, reason: impl Into<String>) -> Self {
        StorageError::InvalidKey {
            key: format!("{key:?}"),
            reason: reason.into(),
        }
    }

    /// Create a decoding error keeping the offending bytes
    #[must_use]
    pub fn decode(data: impl Into<Vec<u8>>, message: impl Into<String>) -> Self {
        StorageError::Decode {
            data: data.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn aborted(storage: impl Into<String>) -> Self {
        StorageError::Aborted {
            storage: storage.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        StorageError::Configuration {
            message: message.into(),
        }
    }

    /// The innermost error, looking through composite wrappers
    #[must_use]
    pub fn root_cause(&self) -> &StorageError {
        match self {
            StorageError::Composition { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Whether the failure means "no value for this key"
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self.root_cause() {
            StorageError::NotFound { .. } => true,
            StorageError::Io { source, .. } => matches!(
                source.kind(),
                std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory
            ),
            _ => false,
        }
    }

    /// The tier that failed, if this is a composite failure
    #[must_use]
    pub fn failed_tier(&self) -> Option<Tier> {
        match self {
            StorageError::Composition { tier, .. } => Some(*tier),
            _ => None,
        }
    }
}
