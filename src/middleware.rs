use std::sync::Arc;

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::IntoResponse,
    Extension,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ErrorMessage, HttpError},
    utils::token,
    AppState,
};

pub const ADMIN_ROLE: &str = "admin";

/// Claims of the authenticated admin, inserted into request extensions by
/// the auth middleware.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdminSession {
    pub id: String,
    pub role: String,
}

pub async fn auth(
    cookie_jar: CookieJar,
    Extension(app_state): Extension<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let cookies = cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| {
                    if auth_value.starts_with("Bearer ") {
                        Some(auth_value[7..].to_owned())
                    } else {
                        None
                    }
                })
        });

    let token = cookies
        .ok_or_else(|| HttpError::unauthorized(ErrorMessage::TokenNotProvided.to_string()))?;

    let claims = token::decode_token(token, app_state.env.jwt_secret.as_bytes())
        .map_err(|_| HttpError::unauthorized(ErrorMessage::InvalidToken.to_string()))?;

    if claims.role != ADMIN_ROLE {
        return Err(HttpError::new(
            ErrorMessage::PermissionDenied.to_string(),
            axum::http::StatusCode::FORBIDDEN,
        ));
    }

    req.extensions_mut().insert(AdminSession {
        id: claims.sub,
        role: claims.role,
    });

    Ok(next.run(req).await)
}
