use std::sync::Arc;

use axum::{
    extract::{Multipart, Path},
    middleware,
    response::IntoResponse,
    routing::{delete, post},
    Extension, Json, Router,
};

use crate::{
    dtos::{authdtos::Response, uploaddtos::UploadResponseDto},
    error::{ErrorMessage, HttpError},
    middleware::auth,
    service::cloudinary::CloudinaryError,
    AppState,
};

pub fn upload_handler() -> Router {
    Router::new()
        .route("/", post(upload_image))
        // Public ids carry the folder prefix, so the parameter may contain
        // slashes.
        .route("/*public_id", delete(delete_image))
        .layer(middleware::from_fn(auth))
}

pub async fn upload_image(
    Extension(app_state): Extension<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpError> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HttpError::bad_request(e.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| HttpError::bad_request(e.to_string()))?;
            file = Some((filename, bytes.to_vec()));
        }
    }

    let (filename, bytes) =
        file.ok_or_else(|| HttpError::bad_request(ErrorMessage::NoFileUploaded.to_string()))?;

    let uploaded = app_state
        .cloudinary
        .upload(bytes, &filename)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(UploadResponseDto::from(uploaded)))
}

pub async fn delete_image(
    Path(public_id): Path<String>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    if public_id.trim().is_empty() {
        return Err(HttpError::bad_request(
            ErrorMessage::MissingPublicId.to_string(),
        ));
    }

    app_state
        .cloudinary
        .destroy(&public_id)
        .await
        .map_err(|e| match e {
            CloudinaryError::NotFound => {
                HttpError::not_found(ErrorMessage::ImageNotFound.to_string())
            }
            other => HttpError::server_error(other.to_string()),
        })?;

    Ok(Json(Response {
        status: "success",
        message: "Image deleted successfully".to_string(),
    }))
}
