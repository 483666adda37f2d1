//! Error types for the WebHDFS client.

use hdfsutils_core::FsError;
use thiserror::Error;

/// Errors raised while talking to a namenode.
#[derive(Debug, Error)]
pub enum WebHdfsError {
    /// Network request error.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Invalid response: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP error without a WebHDFS exception body.
    #[error("HTTP error: {0}")]
    Http(u16),

    /// The namenode returned a `RemoteException`.
    #[error("{exception}: {message}")]
    Remote { exception: String, message: String },

    /// The namenode answered `{"boolean": false}`.
    #[error("{op} refused by the namenode")]
    Refused { op: &'static str },

    /// The configured URL cannot be used.
    #[error("Invalid URL: {0}")]
    Url(String),
}

impl WebHdfsError {
    /// Check whether this error means the path is absent.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Http(404) => true,
            Self::Remote { exception, .. } => exception == "FileNotFoundException",
            _ => false,
        }
    }

    /// Translate into the error kind the engines understand.
    pub fn into_fs_error(self, path: &str) -> FsError {
        if self.is_not_found() {
            return FsError::not_found(path);
        }
        match self {
            Self::Remote { message, .. } => FsError::remote(path, message),
            other => FsError::remote(path, other.to_string()),
        }
    }
}
