use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read manifest {path:?}: {source}")]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse manifest {path:?}: {source}")]
    ManifestParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("No base URL configured. Set BASE_URL (or add it to .env) or pass --base-url")]
    MissingBaseUrl,

    #[error("Invalid quality value: {0}. Must be between 1 and 100")]
    InvalidQuality(u8),

    #[error("Invalid timeout: must be at least 1 second")]
    InvalidTimeout,

    #[error("Invalid image descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Error downloading {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Error downloading {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Download too large: {url} exceeds {limit} bytes")]
    DownloadTooLarge { url: String, limit: u64 },

    #[error("Failed to decode {url}: {source}")]
    Decode {
        url: String,
        source: image::ImageError,
    },

    #[error("Invalid image dimensions: {0}x{1}. Maximum allowed: {2}x{2}")]
    InvalidDimensions(u32, u32, u32),

    #[error("WebP encoding error: {0}")]
    WebpEncoding(String),

    #[error("Failed to create output directory: {0}")]
    DirectoryCreationFailed(PathBuf),
}

impl OptimizeError {
    /// Failures that only sink the current descriptor. Everything else
    /// (encoding, filesystem) aborts the whole run.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            OptimizeError::InvalidDescriptor(_)
                | OptimizeError::Fetch { .. }
                | OptimizeError::HttpStatus { .. }
                | OptimizeError::DownloadTooLarge { .. }
                | OptimizeError::Decode { .. }
                | OptimizeError::InvalidDimensions(..)
        )
    }
}

pub type Result<T> = std::result::Result<T, OptimizeError>;
