//! Error types for the Arena backdrop.

use thiserror::Error;

/// Top-level error type for stage operations.
#[derive(Debug, Error)]
pub enum StageError {
    /// A scene, weather kind or time-of-day name is not in its catalog.
    #[error("{what} \"{name}\" not found")]
    NotFound {
        /// Which catalog was searched ("scene", "weather", ...).
        what: &'static str,
        /// The name that failed to resolve.
        name: String,
    },

    /// An asset fetch failed.
    #[error("Asset load error: {0}")]
    AssetLoad(#[from] AssetLoadError),
}

impl StageError {
    /// Builds a [`StageError::NotFound`].
    #[must_use]
    pub fn not_found(what: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            what,
            name: name.into(),
        }
    }

    /// Whether this is a catalog lookup failure.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Per-image fetch failures.
///
/// The compositor recovers from all of these locally by substituting a
/// placeholder, so they are only ever logged.
#[derive(Debug, Error)]
pub enum AssetLoadError {
    /// Nothing exists at the requested location.
    #[error("Asset not found: {0}")]
    Missing(String),

    /// Reading the asset failed.
    #[error("IO error reading {uri}: {source}")]
    Io {
        /// Requested URI.
        uri: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The bytes could not be decoded as an image.
    #[error("Failed to decode {uri}: {reason}")]
    Decode {
        /// Requested URI.
        uri: String,
        /// Decoder message.
        reason: String,
    },
}

/// Result type alias for stage operations.
pub type StageResult<T> = Result<T, StageError>;
