use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::{
        dto::{CredentialsRequest, IsAdminRequest, PublicUser},
        extractors::BearerToken,
    },
    error::{AuthError, Envelope},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/isAuthenticated", get(is_authenticated))
        .route("/isAdmin", get(is_admin))
}

fn credentials(
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<CredentialsRequest, AuthError> {
    let Json(body) = payload.map_err(|e| {
        warn!(error = %e, "unreadable credentials body");
        AuthError::Validation("All fields are required.".into())
    })?;
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(AuthError::Validation("All fields are required.".into()));
    }
    Ok(body)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<PublicUser>>), AuthError> {
    let body = credentials(payload)?;
    let user = state.users.register(&body.email, &body.password).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok("Successfully created a user", user)),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<Envelope<String>>, AuthError> {
    let body = credentials(payload)?;
    let token = state.users.login(&body.email, &body.password).await?;
    Ok(Json(Envelope::ok("Successfully logged in", token)))
}

#[instrument(skip(state, token))]
pub async fn is_authenticated(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Envelope<i32>>, AuthError> {
    let user_id = state.users.is_authenticated(&token).await?;
    Ok(Json(Envelope::ok("User is authenticated", user_id)))
}

#[instrument(skip(state, payload))]
pub async fn is_admin(
    State(state): State<AppState>,
    payload: Result<Json<IsAdminRequest>, JsonRejection>,
) -> Result<Json<Envelope<bool>>, AuthError> {
    let id = payload
        .ok()
        .and_then(|Json(body)| body.id)
        .filter(|id| *id > 0)
        .ok_or_else(|| AuthError::Validation("User id is required.".into()))?;
    let admin = state.users.is_admin(id).await?;
    Ok(Json(Envelope::ok("Admin check complete", admin)))
}
