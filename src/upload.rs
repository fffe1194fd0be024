//! Product image upload flow.
//!
//! Each image goes `Selected → Previewing → Uploading` and ends either
//! `Committed` with the hosted URL or `Fallback` with its local data URL.
//! Nothing leads back to `Selected` and a failed upload is not retried.

use std::fmt;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use uuid::Uuid;

use crate::{
    api::ApiClient,
    dto::uploads::UploadedImage,
    error::{AppError, AppResult},
    services::upload_service,
};

/// An image picked by the admin, already read into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let mime = mime_for_path(path).ok_or_else(|| {
            AppError::BadRequest(format!("{} is not a supported image", path.display()))
        })?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| AppError::Internal(err.into()))?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::new(file_name, mime, bytes))
    }
}

pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "avif" => Some("image/avif"),
        _ => None,
    }
}

pub fn preview_data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    Selected,
    Previewing { preview: String },
    Uploading { preview: String },
    Committed { url: String },
    Fallback { preview: String },
}

impl UploadState {
    fn name(&self) -> &'static str {
        match self {
            UploadState::Selected => "selected",
            UploadState::Previewing { .. } => "previewing",
            UploadState::Uploading { .. } => "uploading",
            UploadState::Committed { .. } => "committed",
            UploadState::Fallback { .. } => "fallback",
        }
    }
}

impl fmt::Display for UploadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct ImageUpload {
    id: Uuid,
    file: ImageFile,
    state: UploadState,
}

impl ImageUpload {
    pub fn new(file: ImageFile) -> Self {
        Self {
            id: Uuid::new_v4(),
            file,
            state: UploadState::Selected,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn file(&self) -> &ImageFile {
        &self.file
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    fn illegal(&self, action: &str) -> AppError {
        AppError::BadRequest(format!("cannot {action} an upload that is {}", self.state))
    }

    pub fn start_preview(&mut self) -> AppResult<&str> {
        if self.state != UploadState::Selected {
            return Err(self.illegal("preview"));
        }
        let preview = preview_data_url(&self.file.bytes, &self.file.mime);
        self.state = UploadState::Previewing { preview };
        Ok(self.preview().unwrap_or_default())
    }

    pub fn begin_upload(&mut self) -> AppResult<()> {
        match &self.state {
            UploadState::Previewing { preview } => {
                self.state = UploadState::Uploading {
                    preview: preview.clone(),
                };
                Ok(())
            }
            _ => Err(self.illegal("upload")),
        }
    }

    pub fn commit(&mut self, url: impl Into<String>) -> AppResult<()> {
        match &self.state {
            UploadState::Uploading { .. } => {
                self.state = UploadState::Committed { url: url.into() };
                Ok(())
            }
            _ => Err(self.illegal("commit")),
        }
    }

    pub fn fall_back(&mut self) -> AppResult<()> {
        match &self.state {
            UploadState::Uploading { preview } => {
                self.state = UploadState::Fallback {
                    preview: preview.clone(),
                };
                Ok(())
            }
            _ => Err(self.illegal("fall back")),
        }
    }

    /// The local data URL while one exists.
    pub fn preview(&self) -> Option<&str> {
        match &self.state {
            UploadState::Previewing { preview }
            | UploadState::Uploading { preview }
            | UploadState::Fallback { preview } => Some(preview),
            _ => None,
        }
    }

    /// The value to persist once the flow has finished.
    pub fn resolved_url(&self) -> Option<&str> {
        match &self.state {
            UploadState::Committed { url } => Some(url),
            UploadState::Fallback { preview } => Some(preview),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(
            self.state,
            UploadState::Committed { .. } | UploadState::Fallback { .. }
        )
    }

    pub fn to_uploaded(&self) -> Option<UploadedImage> {
        Some(UploadedImage {
            file_name: self.file.file_name.clone(),
            url: self.resolved_url()?.to_string(),
            hosted: matches!(self.state, UploadState::Committed { .. }),
        })
    }

    /// Runs the whole flow for this image. Upload failures are logged and
    /// leave the image on its local preview.
    pub async fn run(mut self, client: &ApiClient) -> Self {
        if let Err(err) = self.start_preview().map(|_| ()) {
            tracing::warn!(error = %err, "image preview failed");
            return self;
        }
        if self.begin_upload().is_err() {
            return self;
        }

        let outcome = upload_service::upload_image(client, &self.file).await;
        let transition = match outcome {
            Ok(url) => self.commit(url),
            Err(err) => {
                tracing::warn!(
                    file = %self.file.file_name,
                    error = %err,
                    "image upload failed, keeping local preview"
                );
                self.fall_back()
            }
        };
        if let Err(err) = transition {
            tracing::error!(error = %err, "upload state machine rejected transition");
        }
        self
    }
}

/// Uploads every file concurrently; results keep the input order.
pub async fn upload_all(client: &ApiClient, files: Vec<ImageFile>) -> Vec<ImageUpload> {
    let handles: Vec<_> = files
        .into_iter()
        .map(|file| {
            let client = client.clone();
            tokio::spawn(async move { ImageUpload::new(file).run(&client).await })
        })
        .collect();

    let mut uploads = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(upload) => uploads.push(upload),
            Err(err) => tracing::error!(error = %err, "image upload task aborted"),
        }
    }
    uploads
}
