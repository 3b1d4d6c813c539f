//! In-process `UserStore` for tests. Mirrors the Postgres constraints that
//! matter to the service: unique emails and cascading membership deletes.

use std::collections::HashSet;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::auth::{
    repo::UserStore,
    repo_types::{RepoError, Role, User},
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    roles: Vec<Role>,
    memberships: HashSet<(i32, i32)>,
    next_user_id: i32,
}

pub struct MemoryUserStore {
    tables: RwLock<Tables>,
}

impl MemoryUserStore {
    /// Empty store seeded with the same roles as the migrations.
    pub fn seeded() -> Self {
        Self::with_roles(&["ADMIN", "CUSTOMER", "AIRLINE_BUSINESS"])
    }

    pub fn with_roles(names: &[&str]) -> Self {
        let now = OffsetDateTime::now_utc();
        let roles = names
            .iter()
            .enumerate()
            .map(|(i, name)| Role {
                id: i as i32 + 1,
                name: (*name).to_string(),
                created_at: now,
                updated_at: now,
            })
            .collect();
        Self {
            tables: RwLock::new(Tables {
                roles,
                next_user_id: 1,
                ..Tables::default()
            }),
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, RepoError> {
        let mut t = self.tables.write().await;
        if t.users.iter().any(|u| u.email == email) {
            return Err(RepoError::duplicate_email(email));
        }
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: t.next_user_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        t.next_user_id += 1;
        t.users.push(user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: i32) -> Result<User, RepoError> {
        let t = self.tables.read().await;
        t.users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| RepoError::user_not_found(id))
    }

    async fn get_by_email(&self, email: &str) -> Result<User, RepoError> {
        let t = self.tables.read().await;
        t.users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| RepoError::email_not_found(email))
    }

    async fn update_password(&self, id: i32, password_hash: &str) -> Result<User, RepoError> {
        let mut t = self.tables.write().await;
        let user = t
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| RepoError::user_not_found(id))?;
        user.password_hash = password_hash.to_string();
        user.updated_at = OffsetDateTime::now_utc();
        Ok(user.clone())
    }

    async fn destroy(&self, id: i32) -> Result<(), RepoError> {
        let mut t = self.tables.write().await;
        let before = t.users.len();
        t.users.retain(|u| u.id != id);
        if t.users.len() == before {
            return Err(RepoError::user_not_found(id));
        }
        t.memberships.retain(|(user_id, _)| *user_id != id);
        Ok(())
    }

    async fn get_role_by_name(&self, name: &str) -> Result<Role, RepoError> {
        let t = self.tables.read().await;
        t.roles
            .iter()
            .find(|r| r.name == name)
            .cloned()
            .ok_or_else(|| RepoError::role_not_found(name))
    }

    async fn has_role(&self, user_id: i32, role_id: i32) -> Result<bool, RepoError> {
        Ok(self.tables.read().await.memberships.contains(&(user_id, role_id)))
    }

    async fn add_role(&self, user_id: i32, role_id: i32) -> Result<(), RepoError> {
        self.tables.write().await.memberships.insert((user_id, role_id));
        Ok(())
    }
}
