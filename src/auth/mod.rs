use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod services;
pub(crate) mod extractors;
#[cfg(test)]
pub(crate) mod memory;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
