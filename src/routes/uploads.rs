use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
};

use crate::{
    dto::uploads::UploadBatch,
    error::{AppError, AppResult},
    middleware::auth::AdminToken,
    response::ApiResponse,
    state::AppState,
    upload::{ImageFile, upload_all},
};

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/uploads",
        post(upload_images).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
    )
}

#[utoipa::path(
    post,
    path = "/api/admin/uploads",
    request_body(content_type = "multipart/form-data", description = "One or more image parts"),
    responses(
        (status = 200, description = "Resolved image URLs in submission order", body = ApiResponse<UploadBatch>),
        (status = 400, description = "No images or a non-image part"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn upload_images(
    State(state): State<AppState>,
    token: AdminToken,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<UploadBatch>>> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(err.body_text()))?
    {
        let file_name = field.file_name().unwrap_or("image").to_string();
        let mime = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        if !mime.starts_with("image/") {
            return Err(AppError::BadRequest(format!("{file_name} is not an image")));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::BadRequest(err.body_text()))?;
        files.push(ImageFile::new(file_name, mime, bytes.to_vec()));
    }

    if files.is_empty() {
        return Err(AppError::BadRequest("no images submitted".into()));
    }

    let client = state.admin_client(&token);
    let images = upload_all(&client, files)
        .await
        .iter()
        .filter_map(|upload| upload.to_uploaded())
        .collect();
    Ok(Json(ApiResponse::success(
        "Images processed",
        UploadBatch { images },
        None,
    )))
}
