//! Error types for the media host client.

use thiserror::Error;

/// Errors that can occur when talking to the media host.
#[derive(Debug, Error)]
pub enum MediaError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The host rejected the upload.
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Error body returned by the upload API.
#[derive(Debug, serde::Deserialize)]
pub struct UploadErrorResponse {
    pub error: UploadErrorDetail,
}

#[derive(Debug, serde::Deserialize)]
pub struct UploadErrorDetail {
    pub message: String,
}
