//! Upload client for the media host.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::instrument;

use civic_core::{Department, Email};

use crate::config::CloudinaryConfig;
use crate::models::MediaAsset;

use super::error::{MediaError, UploadErrorResponse};
use super::urls::{self, Transform};

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
    format: Option<String>,
    bytes: Option<i64>,
    version: Option<i64>,
}

/// A file to upload.
#[derive(Debug, Clone, Copy)]
pub struct Upload<'a> {
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub data: &'a [u8],
    pub department: Department,
    pub uploaded_by: &'a Email,
}

/// Media host client (unsigned uploads through a preset).
#[derive(Clone)]
pub struct MediaClient {
    inner: Arc<MediaClientInner>,
}

struct MediaClientInner {
    client: reqwest::Client,
    cloud_name: String,
    upload_preset: String,
}

impl MediaClient {
    /// Create a new media client.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Http` if the HTTP client cannot be built.
    pub fn new(config: &CloudinaryConfig) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder().timeout(UPLOAD_TIMEOUT).build()?;

        Ok(Self {
            inner: Arc::new(MediaClientInner {
                client,
                cloud_name: config.cloud_name.clone(),
                upload_preset: config.upload_preset.clone(),
            }),
        })
    }

    /// Public id for a new upload: `reports/<department>/<stem>_<unix ms>`.
    #[must_use]
    pub fn public_id_for(department: Department, file_name: &str, unix_ms: i64) -> String {
        format!(
            "reports/{}/{}_{unix_ms}",
            urls::clean_department(department.label()),
            urls::clean_file_stem(file_name)
        )
    }

    /// Upload a file as a raw resource.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Upload` with the host's message if it rejects
    /// the file.
    #[instrument(skip(self, upload), fields(file_name = %upload.file_name, bytes = upload.data.len()))]
    pub async fn upload_raw(&self, upload: Upload<'_>) -> Result<MediaAsset, MediaError> {
        let public_id = Self::public_id_for(
            upload.department,
            upload.file_name,
            Utc::now().timestamp_millis(),
        );
        let context = format!(
            "department={}|uploaded_by={}",
            upload.department.label(),
            upload.uploaded_by
        );

        let file = Part::bytes(upload.data.to_vec())
            .file_name(upload.file_name.to_owned())
            .mime_str(upload.content_type)?;
        let form = Form::new()
            .part("file", file)
            .text("upload_preset", self.inner.upload_preset.clone())
            .text("public_id", public_id)
            .text("context", context);

        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/{}/upload",
            self.inner.cloud_name,
            urls::RAW_RESOURCE
        );
        let response = self.inner.client.post(url).multipart(form).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<UploadErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_owned()
                });
            tracing::warn!(status = %status, message = %message, "Media upload rejected");
            return Err(MediaError::Upload(message));
        }

        let uploaded: UploadResponse = serde_json::from_str(&body)
            .map_err(|e| MediaError::Parse(format!("Failed to parse upload response: {e}")))?;

        tracing::info!(public_id = %uploaded.public_id, "Media uploaded");

        Ok(MediaAsset {
            public_id: uploaded.public_id,
            secure_url: uploaded.secure_url,
            format: uploaded.format,
            bytes: uploaded.bytes,
            version: uploaded.version,
        })
    }

    /// Delivery URL for a stored asset.
    #[must_use]
    pub fn delivery_url(&self, public_id: &str, transform: &Transform<'_>) -> String {
        urls::delivery_url(&self.inner.cloud_name, public_id, transform)
    }

    /// Attachment-download URL for a stored asset.
    #[must_use]
    pub fn download_url(&self, public_id: &str, file_name: &str) -> String {
        urls::download_url(&self.inner.cloud_name, public_id, file_name)
    }
}
