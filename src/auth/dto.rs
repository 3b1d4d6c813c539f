use serde::{Deserialize, Serialize};

use crate::auth::repo_types::User;

/// Request body for register and login.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for the admin check.
#[derive(Debug, Deserialize)]
pub struct IsAdminRequest {
    #[serde(default)]
    pub id: Option<i32>,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PublicUser {
    pub id: i32,
    pub email: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub check: bool,
}
