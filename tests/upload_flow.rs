use std::path::Path;

use laptop_store_admin::{
    error::AppError,
    upload::{ImageFile, ImageUpload, UploadState, mime_for_path, preview_data_url},
};

fn upload() -> ImageUpload {
    ImageUpload::new(ImageFile::new("front.jpg", "image/jpeg", b"jpeg".to_vec()))
}

#[test]
fn happy_path_ends_committed() {
    let mut image = upload();
    assert_eq!(image.state(), &UploadState::Selected);

    let preview = image.start_preview().expect("preview").to_string();
    assert_eq!(preview, "data:image/jpeg;base64,anBlZw==");

    image.begin_upload().expect("upload starts");
    assert_eq!(image.preview(), Some(preview.as_str()));
    assert!(!image.is_finished());

    image.commit("https://cdn.example.com/front.jpg").expect("commit");
    assert!(image.is_finished());
    assert_eq!(image.preview(), None);
    assert_eq!(image.resolved_url(), Some("https://cdn.example.com/front.jpg"));
    assert!(image.to_uploaded().is_some_and(|u| u.hosted));
}

#[test]
fn out_of_order_transitions_are_rejected() {
    let mut image = upload();
    assert!(matches!(image.begin_upload(), Err(AppError::BadRequest(_))));
    assert!(image.commit("x").is_err());
    assert!(image.to_uploaded().is_none());

    image.start_preview().expect("preview");
    assert!(image.start_preview().is_err());
    assert!(image.fall_back().is_err());

    image.begin_upload().expect("upload starts");
    image.fall_back().expect("fallback");
    // Finished uploads never restart.
    assert!(image.commit("late").is_err());
    assert!(image.begin_upload().is_err());
    assert_eq!(image.state().to_string(), "fallback");
}

#[test]
fn preview_encodes_bytes_as_data_url() {
    assert_eq!(preview_data_url(&[], "image/png"), "data:image/png;base64,");
    assert_eq!(
        mime_for_path(Path::new("shots/Side.WEBP")),
        Some("image/webp")
    );
    assert_eq!(mime_for_path(Path::new("notes.txt")), None);
}

#[tokio::test]
async fn image_file_is_read_from_disk() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join(format!("upload-flow-{}.png", uuid::Uuid::new_v4()));
    tokio::fs::write(&path, [137u8, 80, 78, 71]).await?;

    let file = ImageFile::from_path(&path).await;
    tokio::fs::remove_file(&path).await?;

    let file = file?;
    assert_eq!(file.mime, "image/png");
    assert_eq!(file.bytes, vec![137, 80, 78, 71]);
    assert!(file.file_name.starts_with("upload-flow-"));

    let rejected = ImageFile::from_path("readme.md").await;
    assert!(matches!(rejected, Err(AppError::BadRequest(_))));
    Ok(())
}
