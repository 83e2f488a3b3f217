use std::path::PathBuf;

use crate::error::EngineError;

/// A byte payload supplied either inline or as a file path.
///
/// Used for both module bytes and proving-key material. When both are
/// supplied, explicit bytes take precedence over the path.
#[derive(Debug, Clone, Default)]
pub struct ByteSource {
    /// In-memory bytes; wins over `path` when set.
    pub bytes: Option<Vec<u8>>,
    /// Path to read when no inline bytes are given.
    pub path: Option<PathBuf>,
}

impl ByteSource {
    /// Source backed by in-memory bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Some(bytes.into()),
            path: None,
        }
    }

    /// Source backed by a file on disk.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            bytes: None,
            path: Some(path.into()),
        }
    }

    /// Resolve to bytes: inline bytes first, the path otherwise.
    pub async fn resolve(&self) -> Result<Vec<u8>, EngineError> {
        if let Some(bytes) = &self.bytes {
            return Ok(bytes.clone());
        }
        if let Some(path) = &self.path {
            tracing::debug!(path = %path.display(), "reading byte source from disk");
            return Ok(tokio::fs::read(path).await?);
        }
        Err(EngineError::MissingSource)
    }
}
