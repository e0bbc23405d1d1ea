use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::propertydb::PropertyExt,
    dtos::{
        authdtos::Response,
        propertydtos::{ListPropertiesQueryDto, SavePropertyDto},
    },
    error::{ErrorMessage, HttpError},
    middleware::auth,
    service::cloudinary::public_id_from_url,
    AppState,
};

pub fn property_handler() -> Router {
    // Reads are public; every write path sits behind the admin auth gate.
    Router::new()
        .route("/", get(list_properties))
        .route("/:property_id", get(get_property))
        .route(
            "/",
            post(create_property).route_layer(middleware::from_fn(auth)),
        )
        .route(
            "/:property_id",
            put(update_property)
                .delete(delete_property)
                .route_layer(middleware::from_fn(auth)),
        )
}

pub async fn list_properties(
    Query(query_params): Query<ListPropertiesQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let properties = app_state
        .db_client
        .list_properties(query_params.location)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(properties))
}

pub async fn get_property(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let property = app_state
        .db_client
        .get_property_by_id(property_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::PropertyNotFound.to_string()))?;

    Ok(Json(property))
}

pub async fn create_property(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<SavePropertyDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(HttpError::validation)?;

    let property = app_state
        .db_client
        .save_property(&body)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(property)))
}

pub async fn update_property(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<SavePropertyDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(HttpError::validation)?;

    let property = app_state
        .db_client
        .update_property(property_id, &body)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::PropertyNotFound.to_string()))?;

    Ok(Json(property))
}

pub async fn delete_property(
    Path(property_id): Path<Uuid>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let property = app_state
        .db_client
        .delete_property(property_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::PropertyNotFound.to_string()))?;

    // Best-effort cleanup of the hosted images; never blocks or fails the
    // delete itself.
    let cloudinary = app_state.cloudinary.clone();
    let images = property.images.0.clone();
    tokio::spawn(async move {
        for url in images {
            if let Some(public_id) = public_id_from_url(&url) {
                if let Err(e) = cloudinary.destroy(&public_id).await {
                    tracing::warn!("failed to delete hosted image {}: {}", public_id, e);
                }
            }
        }
    });

    Ok(Json(Response {
        status: "success",
        message: "Property deleted successfully".to_string(),
    }))
}
