use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::PublicUser,
        jwt::TokenKeys,
        password::{hash_password, verify_password},
        repo::UserStore,
        repo_types::{RepoError, ADMIN_ROLE},
    },
    error::AuthError,
};

const PASSWORD_MIN_LEN: usize = 3;
const PASSWORD_MAX_LEN: usize = 15;
/// Width of the `users.email` column.
const EMAIL_MAX_LEN: usize = 255;

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn check_password_policy(password: &str) -> Result<(), AuthError> {
    let len = password.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        return Err(AuthError::Validation(format!(
            "Password must be between {PASSWORD_MIN_LEN} and {PASSWORD_MAX_LEN} characters."
        )));
    }
    Ok(())
}

/// Registration, login and role checks over an injected store and key set.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    keys: TokenKeys,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, keys: TokenKeys) -> Self {
        Self { store, keys }
    }

    #[instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str) -> Result<PublicUser, AuthError> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            warn!(%email, "invalid email");
            return Err(AuthError::Validation(format!("{email} is not a valid email.")));
        }
        if email.chars().count() > EMAIL_MAX_LEN {
            warn!(len = email.len(), "email too long");
            return Err(AuthError::Validation(format!(
                "Email must be at most {EMAIL_MAX_LEN} characters."
            )));
        }
        check_password_policy(password)?;

        let hash = hash_password(password)?;
        let user = self.store.create(&email, &hash).await?;

        info!(user_id = user.id, email = %user.email, "user registered");
        Ok(PublicUser::from(user))
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let email = normalize_email(email);
        let user = self.store.get_by_email(&email).await?;

        if !verify_password(password, &user.password_hash) {
            warn!(user_id = user.id, "login invalid password");
            return Err(AuthError::InvalidCredential);
        }

        let token = self.keys.issue(user.id, &user.email)?;
        info!(user_id = user.id, "user logged in");
        Ok(token)
    }

    #[instrument(skip_all)]
    pub async fn is_authenticated(&self, token: &str) -> Result<i32, AuthError> {
        let claims = self.keys.verify(token)?;
        let user = self.store.get_by_id(claims.id).await.map_err(|e| {
            if let RepoError::NotFound(_) = e {
                warn!(user_id = claims.id, "token valid but user is gone");
            }
            AuthError::from(e)
        })?;
        Ok(user.id)
    }

    #[instrument(skip(self))]
    pub async fn is_admin(&self, user_id: i32) -> Result<bool, AuthError> {
        let user = self.store.get_by_id(user_id).await?;
        let admin = self.store.get_role_by_name(ADMIN_ROLE).await?;
        Ok(self.store.has_role(user.id, admin.id).await?)
    }

    /// Re-hashes only when `new_password` differs from the stored one.
    #[instrument(skip(self, new_password))]
    pub async fn change_password(
        &self,
        user_id: i32,
        new_password: &str,
    ) -> Result<PublicUser, AuthError> {
        check_password_policy(new_password)?;
        let user = self.store.get_by_id(user_id).await?;
        if verify_password(new_password, &user.password_hash) {
            return Ok(PublicUser::from(user));
        }

        let hash = hash_password(new_password)?;
        let user = self.store.update_password(user_id, &hash).await?;
        info!(user_id, "password changed");
        Ok(PublicUser::from(user))
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, user_id: i32) -> Result<(), AuthError> {
        self.store.destroy(user_id).await?;
        info!(user_id, "user deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn grant_role(&self, user_id: i32, role_name: &str) -> Result<(), AuthError> {
        let user = self.store.get_by_id(user_id).await?;
        let role = self.store.get_role_by_name(role_name).await?;
        self.store.add_role(user.id, role.id).await?;
        info!(user_id, role = %role.name, "role granted");
        Ok(())
    }
}
