use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorMessage {
    WrongCredentials,
    TokenNotProvided,
    InvalidToken,
    PermissionDenied,
    PropertyNotFound,
    ImageNotFound,
    NoFileUploaded,
    MissingPublicId,
}

impl ErrorMessage {
    fn to_str(&self) -> String {
        match self {
            ErrorMessage::WrongCredentials => "Invalid username or password".to_string(),
            ErrorMessage::TokenNotProvided => {
                "You are not logged in, please provide a token".to_string()
            }
            ErrorMessage::InvalidToken => "Authentication token is invalid or expired".to_string(),
            ErrorMessage::PermissionDenied => {
                "You are not allowed to perform this action".to_string()
            }
            ErrorMessage::PropertyNotFound => "Property not found".to_string(),
            ErrorMessage::ImageNotFound => "Image not found".to_string(),
            ErrorMessage::NoFileUploaded => "No file uploaded".to_string(),
            ErrorMessage::MissingPublicId => "Missing publicId parameter".to_string(),
        }
    }
}

impl ToString for ErrorMessage {
    fn to_string(&self) -> String {
        self.to_str()
    }
}

#[derive(Debug, Clone)]
pub struct HttpError {
    pub message: String,
    pub status: StatusCode,
    pub errors: Option<Value>,
}

impl HttpError {
    pub fn new(message: impl Into<String>, status: StatusCode) -> Self {
        HttpError {
            message: message.into(),
            status,
            errors: None,
        }
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        HttpError::new(message, StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        HttpError::new(message, StatusCode::BAD_REQUEST)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        HttpError::new(message, StatusCode::UNAUTHORIZED)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        HttpError::new(message, StatusCode::NOT_FOUND)
    }

    /// Field-level validation failure; the per-field error set rides along
    /// in the response body under "errors".
    pub fn validation(errors: validator::ValidationErrors) -> Self {
        HttpError {
            message: "Validation error".to_string(),
            status: StatusCode::BAD_REQUEST,
            errors: serde_json::to_value(&errors).ok(),
        }
    }

    pub fn into_http_response(self) -> Response {
        let status = if self.status.is_server_error() {
            "error"
        } else {
            "fail"
        };

        (
            self.status,
            Json(ErrorResponse {
                status: status.to_string(),
                message: self.message,
                errors: self.errors,
            }),
        )
            .into_response()
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HttpError: message: {}, status: {}",
            self.message, self.status
        )
    }
}

impl std::error::Error for HttpError {}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_map_to_expected_status_codes() {
        assert_eq!(
            HttpError::bad_request("bad").status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            HttpError::unauthorized("nope").status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(HttpError::not_found("gone").status, StatusCode::NOT_FOUND);
        assert_eq!(
            HttpError::server_error("boom").status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn wrong_credentials_message_matches_login_error() {
        assert_eq!(
            ErrorMessage::WrongCredentials.to_string(),
            "Invalid username or password"
        );
    }
}
