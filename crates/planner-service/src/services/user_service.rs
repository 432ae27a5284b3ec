//! User service module for registration and account management.

use crate::crypto;
use crate::errors::ApiError;
use crate::models::{
    CreateUserRequest, NewUser, PublicUser, SearchUserRequest, UpdateUserRequest, UserChanges,
    UserFilter,
};
use crate::observability::hash_for_correlation;
use crate::repositories::UserStore;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

pub const EMPTY_SEARCH_MESSAGE: &str =
    "At least one search parameter (id, name, email, mobile) must be provided";

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, bcrypt_cost: u32) -> Self {
        Self { users, bcrypt_cost }
    }

    /// Register a new user.
    ///
    /// # Steps
    ///
    /// 1. Validate name, email format, mobile and password
    /// 2. Hash password (bcrypt, configured cost)
    /// 3. Insert user (`Conflict` if the email is taken)
    #[instrument(skip_all, name = "planner.users.register")]
    pub async fn register(&self, request: CreateUserRequest) -> Result<PublicUser, ApiError> {
        let name = require_non_empty("name", &request.name)?;
        let email = validate_email(&request.email)?;
        let mobile = require_non_empty("mobile", &request.mobile)?;
        if request.password.is_empty() {
            return Err(ApiError::BadRequest("password should not be empty".to_string()));
        }

        let password_hash = crypto::hash_password(&request.password, self.bcrypt_cost)?;

        let user = self
            .users
            .insert(NewUser {
                name,
                email,
                mobile,
                password_hash,
            })
            .await?;

        tracing::info!(
            target: "planner.users",
            user_id = %user.id,
            email_hash = %hash_for_correlation(&user.email),
            "User registered"
        );

        Ok(user.into())
    }

    pub async fn list(&self) -> Result<Vec<PublicUser>, ApiError> {
        let users = self.users.find_all().await?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<PublicUser>, ApiError> {
        Ok(self.users.find_by_id(id).await?.map(PublicUser::from))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<PublicUser>, ApiError> {
        Ok(self.users.find_by_email(email).await?.map(PublicUser::from))
    }

    pub async fn get_by_mobile(&self, mobile: &str) -> Result<Option<PublicUser>, ApiError> {
        Ok(self.users.find_by_mobile(mobile).await?.map(PublicUser::from))
    }

    /// Apply a partial update. A new password is re-hashed before storage.
    #[instrument(skip_all, name = "planner.users.update")]
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<Option<PublicUser>, ApiError> {
        let changes = UserChanges {
            name: request
                .name
                .as_deref()
                .map(|v| require_non_empty("name", v))
                .transpose()?,
            email: request.email.as_deref().map(validate_email).transpose()?,
            mobile: request
                .mobile
                .as_deref()
                .map(|v| require_non_empty("mobile", v))
                .transpose()?,
            password_hash: match request.password.as_deref() {
                Some("") => {
                    return Err(ApiError::BadRequest(
                        "password should not be empty".to_string(),
                    ))
                }
                Some(password) => Some(crypto::hash_password(password, self.bcrypt_cost)?),
                None => None,
            },
        };

        let updated = self.users.update(id, changes).await?;
        if updated.is_some() {
            tracing::info!(target: "planner.users", user_id = %id, "User updated");
        }
        Ok(updated.map(PublicUser::from))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let deleted = self.users.delete(id).await?;
        if deleted {
            tracing::info!(target: "planner.users", user_id = %id, "User deleted");
        }
        Ok(deleted)
    }

    /// Find the first user matching every provided field.
    #[instrument(skip_all, name = "planner.users.search")]
    pub async fn search(&self, request: SearchUserRequest) -> Result<Option<PublicUser>, ApiError> {
        let filter = build_filter(request)?;
        Ok(self
            .users
            .find_by_filter(&filter)
            .await?
            .map(PublicUser::from))
    }
}

/// Turn a search body into a store filter.
///
/// Fails when no field is given, when `id` is not a UUID, or when `email`
/// is malformed.
pub fn build_filter(request: SearchUserRequest) -> Result<UserFilter, ApiError> {
    // Empty strings count as absent.
    let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let request = SearchUserRequest {
        id: present(request.id),
        name: present(request.name),
        email: present(request.email),
        mobile: present(request.mobile),
    };

    let id = request
        .id
        .as_deref()
        .map(|raw| {
            Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest("id must be a valid ID".to_string()))
        })
        .transpose()?;
    let email = request.email.as_deref().map(validate_email).transpose()?;

    let filter = UserFilter {
        id,
        name: request.name,
        email,
        mobile: request.mobile,
    };

    if filter.is_empty() {
        return Err(ApiError::BadRequest(EMPTY_SEARCH_MESSAGE.to_string()));
    }

    Ok(filter)
}

fn require_non_empty(field: &str, value: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::BadRequest(format!("{} should not be empty", field)));
    }
    Ok(trimmed.to_string())
}

fn validate_email(email: &str) -> Result<String, ApiError> {
    let email = email.trim();
    if !is_valid_email(email) {
        return Err(ApiError::BadRequest("email must be an email".to_string()));
    }
    Ok(email.to_string())
}

/// Basic email format check: one `@`, non-empty local part, dotted domain.
fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    if local.is_empty() || local.contains(char::is_whitespace) {
        return false;
    }

    let domain_parts: Vec<&str> = domain.split('.').collect();
    domain_parts.len() >= 2 && domain_parts.iter().all(|p| !p.is_empty())
}
