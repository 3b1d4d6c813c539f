//! Error taxonomy shared by the service and the HTTP layer, plus the JSON
//! envelope every endpoint answers with.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::auth::repo_types::RepoError;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Incorrect password")]
    InvalidCredential,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Service error: {0}")]
    Service(String),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredential | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::NotFound(_) => StatusCode::NOT_FOUND,
            AuthError::Repository(_) | AuthError::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "Invalid request",
            AuthError::NotFound(_) => "Resource not found",
            AuthError::InvalidCredential => "Invalid credentials",
            AuthError::InvalidToken => "Not authenticated",
            AuthError::Repository(_) | AuthError::Service(_) => "Something went wrong",
        }
    }
}

impl From<RepoError> for AuthError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AuthError::NotFound(msg),
            RepoError::Validation(msg) => AuthError::Validation(msg),
            RepoError::Store(e) => {
                tracing::error!(error = %e, "store failure");
                AuthError::Repository(e.to_string())
            }
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::debug!(error = %err, "jwt rejected");
        AuthError::InvalidToken
    }
}

/// Uniform body: `{success, message, data, error}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub data: T,
    pub error: Value,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            error: json!({}),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        // internal details stay in the logs
        let detail = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        let body = Envelope {
            success: false,
            message: self.message().to_string(),
            data: json!({}),
            error: Value::String(detail),
        };
        (status, Json(body)).into_response()
    }
}
