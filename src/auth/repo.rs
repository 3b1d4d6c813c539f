use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::repo_types::{RepoError, Role, User};

/// Persistence seam for users, roles and their membership.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, RepoError>;
    async fn get_by_id(&self, id: i32) -> Result<User, RepoError>;
    async fn get_by_email(&self, email: &str) -> Result<User, RepoError>;
    async fn update_password(&self, id: i32, password_hash: &str) -> Result<User, RepoError>;
    async fn destroy(&self, id: i32) -> Result<(), RepoError>;
    async fn get_role_by_name(&self, name: &str) -> Result<Role, RepoError>;
    async fn has_role(&self, user_id: i32, role_id: i32) -> Result<bool, RepoError>;
    async fn add_role(&self, user_id: i32, role_id: i32) -> Result<(), RepoError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn insert_error(err: sqlx::Error, email: &str) -> RepoError {
    match err {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            RepoError::duplicate_email(email)
        }
        other => RepoError::Store(other),
    }
}

const USER_COLUMNS: &str = "id, email, password_hash, created_at, updated_at";

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, RepoError> {
        let sql = format!(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .bind(password_hash)
            .fetch_one(&self.db)
            .await
            .map_err(|e| insert_error(e, email))
    }

    async fn get_by_id(&self, id: i32) -> Result<User, RepoError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| RepoError::user_not_found(id))
    }

    async fn get_by_email(&self, email: &str) -> Result<User, RepoError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| RepoError::email_not_found(email))
    }

    async fn update_password(&self, id: i32, password_hash: &str) -> Result<User, RepoError> {
        let sql = format!(
            r#"
            UPDATE users
               SET password_hash = $2, updated_at = now()
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(password_hash)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| RepoError::user_not_found(id))
    }

    async fn destroy(&self, id: i32) -> Result<(), RepoError> {
        let res = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(RepoError::user_not_found(id));
        }
        Ok(())
    }

    async fn get_role_by_name(&self, name: &str) -> Result<Role, RepoError> {
        sqlx::query_as::<_, Role>(
            r#"
            SELECT id, name, created_at, updated_at
              FROM roles
             WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| RepoError::role_not_found(name))
    }

    async fn has_role(&self, user_id: i32, role_id: i32) -> Result<bool, RepoError> {
        let found: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM user_roles WHERE user_id = $1 AND role_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(role_id)
        .fetch_one(&self.db)
        .await?;
        Ok(found)
    }

    async fn add_role(&self, user_id: i32, role_id: i32) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(role_id)
        .execute(&self.db)
        .await?;
        Ok(())
    }
}
