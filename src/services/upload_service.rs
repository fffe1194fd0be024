use crate::{api::ApiClient, error::AppResult, upload::ImageFile};

/// Sends one image to the storage endpoint and returns its hosted URL.
pub async fn upload_image(client: &ApiClient, file: &ImageFile) -> AppResult<String> {
    let url = client
        .upload_image(&file.file_name, file.bytes.clone(), &file.mime)
        .await?;
    tracing::debug!(file = %file.file_name, url = %url, "image uploaded");
    Ok(url)
}
