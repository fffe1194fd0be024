use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome of one image in an upload batch, in submission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub file_name: String,
    pub url: String,
    /// `false` when the upload failed and `url` is the local data URL.
    pub hosted: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadBatch {
    pub images: Vec<UploadedImage>,
}
