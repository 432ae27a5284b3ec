//! User repository module for database operations.

use super::{map_write_error, UserStore};
use crate::errors::ApiError;
use crate::models::{NewUser, User, UserChanges, UserFilter};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, email, mobile, password_hash, created_at, updated_at";

pub const DUPLICATE_EMAIL: &str = "User with this email already exists";

/// List all users, oldest first.
pub async fn list_users(pool: &PgPool) -> Result<Vec<User>, ApiError> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users ORDER BY created_at",
        USER_COLUMNS
    ))
    .fetch_all(pool)
    .await
    .map_err(|e| ApiError::Database(format!("Failed to list users: {}", e)))?;

    Ok(users)
}

/// Get user by id.
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE id = $1",
        USER_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| ApiError::Database(format!("Failed to fetch user by id: {}", e)))?;

    Ok(user)
}

/// Get user by email (unique).
pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE email = $1",
        USER_COLUMNS
    ))
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(|e| ApiError::Database(format!("Failed to fetch user by email: {}", e)))?;

    Ok(user)
}

/// Get the first user registered with a mobile number.
pub async fn get_by_mobile(pool: &PgPool, mobile: &str) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE mobile = $1 ORDER BY created_at LIMIT 1",
        USER_COLUMNS
    ))
    .bind(mobile)
    .fetch_optional(pool)
    .await
    .map_err(|e| ApiError::Database(format!("Failed to fetch user by mobile: {}", e)))?;

    Ok(user)
}

/// Find the first user matching every field set in `filter`.
///
/// An empty filter would match everyone, so it is rejected.
pub async fn find_by_filter(pool: &PgPool, filter: &UserFilter) -> Result<Option<User>, ApiError> {
    if filter.is_empty() {
        return Err(ApiError::BadRequest(
            "At least one search parameter must be provided".to_string(),
        ));
    }

    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM users WHERE ", USER_COLUMNS));
    {
        let mut conditions = builder.separated(" AND ");
        if let Some(id) = filter.id {
            conditions.push("id = ").push_bind_unseparated(id);
        }
        if let Some(name) = &filter.name {
            conditions.push("name = ").push_bind_unseparated(name.clone());
        }
        if let Some(email) = &filter.email {
            conditions.push("email = ").push_bind_unseparated(email.clone());
        }
        if let Some(mobile) = &filter.mobile {
            conditions.push("mobile = ").push_bind_unseparated(mobile.clone());
        }
    }
    builder.push(" ORDER BY created_at LIMIT 1");

    let user = builder
        .build_query_as::<User>()
        .fetch_optional(pool)
        .await
        .map_err(|e| ApiError::Database(format!("Failed to search users: {}", e)))?;

    Ok(user)
}

/// Create a new user.
///
/// Returns `Conflict` when the email is already registered.
pub async fn create_user(pool: &PgPool, user: &NewUser) -> Result<User, ApiError> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (name, email, mobile, password_hash)
        VALUES ($1, $2, $3, $4)
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.mobile)
    .bind(&user.password_hash)
    .fetch_one(pool)
    .await
    .map_err(|e| map_write_error(e, DUPLICATE_EMAIL, "Failed to create user"))
}

/// Apply a partial update. Returns `None` when no user has this id.
pub async fn update_user(
    pool: &PgPool,
    id: Uuid,
    changes: &UserChanges,
) -> Result<Option<User>, ApiError> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET name = COALESCE($2, name),
            email = COALESCE($3, email),
            mobile = COALESCE($4, mobile),
            password_hash = COALESCE($5, password_hash),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(id)
    .bind(changes.name.as_deref())
    .bind(changes.email.as_deref())
    .bind(changes.mobile.as_deref())
    .bind(changes.password_hash.as_deref())
    .fetch_optional(pool)
    .await
    .map_err(|e| map_write_error(e, DUPLICATE_EMAIL, "Failed to update user"))
}

/// Delete a user. Returns true if a row was removed.
pub async fn delete_user(pool: &PgPool, id: Uuid) -> Result<bool, ApiError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| ApiError::Database(format!("Failed to delete user: {}", e)))?;

    Ok(result.rows_affected() > 0)
}

/// `UserStore` backed by PostgreSQL.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_all(&self) -> Result<Vec<User>, ApiError> {
        list_users(&self.pool).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        get_by_id(&self.pool, id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        get_by_email(&self.pool, email).await
    }

    async fn find_by_mobile(&self, mobile: &str) -> Result<Option<User>, ApiError> {
        get_by_mobile(&self.pool, mobile).await
    }

    async fn find_by_filter(&self, filter: &UserFilter) -> Result<Option<User>, ApiError> {
        find_by_filter(&self.pool, filter).await
    }

    async fn insert(&self, user: NewUser) -> Result<User, ApiError> {
        create_user(&self.pool, &user).await
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, ApiError> {
        update_user(&self.pool, id, &changes).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        delete_user(&self.pool, id).await
    }
}
