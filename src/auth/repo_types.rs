use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // Argon2 PHC string, never exposed in JSON
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Role reference data (ADMIN, CUSTOMER, ...).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

pub const ADMIN_ROLE: &str = "ADMIN";

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("database error: {0}")]
    Store(#[from] sqlx::Error),
}

impl RepoError {
    pub(crate) fn user_not_found(id: i32) -> Self {
        RepoError::NotFound(format!("User with id {id} not found."))
    }

    pub(crate) fn email_not_found(email: &str) -> Self {
        RepoError::NotFound(format!("User with email {email} not found."))
    }

    pub(crate) fn role_not_found(name: &str) -> Self {
        RepoError::NotFound(format!("Role {name} not found."))
    }

    pub(crate) fn duplicate_email(email: &str) -> Self {
        RepoError::Validation(format!("Email {email} is already registered."))
    }
}
