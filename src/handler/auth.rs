use std::sync::Arc;

use axum::{
    http::{header, HeaderMap},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use validator::Validate;

use crate::{
    config::Config,
    dtos::authdtos::{LoginDto, LoginResponseDto, Response, SessionResponseDto, SessionUserDto},
    error::{ErrorMessage, HttpError},
    middleware::{auth, AdminSession, ADMIN_ROLE},
    utils::token,
    AppState,
};

/// The single admin identity the session token is derived from.
pub const ADMIN_USER_ID: &str = "1";

pub fn auth_handler() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/session", get(session).layer(middleware::from_fn(auth)))
}

/// Direct equality check against the configured admin pair. This login path
/// is intentionally unhashed; there is exactly one credential pair and it
/// never touches the database.
pub fn verify_admin_credentials(config: &Config, username: &str, password: &str) -> bool {
    username == config.admin_username && password == config.admin_password
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<LoginDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if !verify_admin_credentials(&app_state.env, &body.username, &body.password) {
        return Err(HttpError::unauthorized(
            ErrorMessage::WrongCredentials.to_string(),
        ));
    }

    let token = token::create_token(
        ADMIN_USER_ID,
        ADMIN_ROLE,
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let cookie_duration = time::Duration::minutes(app_state.env.jwt_maxage);
    let cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .max_age(cookie_duration)
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error("Failed to build session cookie"))?,
    );

    let response = Json(LoginResponseDto {
        status: "success".to_string(),
        token,
    });

    let mut response = response.into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}

pub async fn logout() -> Result<impl IntoResponse, HttpError> {
    // Expire the session cookie immediately
    let cookie = Cookie::build(("token", ""))
        .path("/")
        .max_age(time::Duration::hours(-1))
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error("Failed to build session cookie"))?,
    );

    let response = Json(Response {
        status: "success",
        message: "Logged out successfully".to_string(),
    });

    let mut response = response.into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}

pub async fn session(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(admin): Extension<AdminSession>,
) -> Result<impl IntoResponse, HttpError> {
    Ok(Json(SessionResponseDto {
        status: "success".to_string(),
        user: SessionUserDto {
            id: admin.id,
            username: app_state.env.admin_username.clone(),
            role: admin.role,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            database_url: "postgres://localhost/test".to_string(),
            app_url: "http://localhost:3000".to_string(),
            jwt_secret: "secret".to_string(),
            jwt_maxage: 43200,
            port: 8000,
            admin_username: "admin".to_string(),
            admin_password: "hunter2".to_string(),
            cloudinary_cloud_name: "".to_string(),
            cloudinary_api_key: "".to_string(),
            cloudinary_api_secret: "".to_string(),
        }
    }

    #[test]
    fn exact_credential_pair_is_accepted() {
        let config = test_config();
        assert!(verify_admin_credentials(&config, "admin", "hunter2"));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let config = test_config();
        assert!(!verify_admin_credentials(&config, "admin", "wrong"));
        assert!(!verify_admin_credentials(&config, "someone", "hunter2"));
        assert!(!verify_admin_credentials(&config, "", ""));
    }
}
