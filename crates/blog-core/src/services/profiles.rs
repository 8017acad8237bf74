use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Actor, ProfileChanges, User, user};
use crate::error::DomainError;
use crate::ports::UserRepository;

/// User accounts: registration, lookup and self-service profile edits.
#[derive(Clone)]
pub struct ProfileService {
    users: Arc<dyn UserRepository>,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn find(&self, username: &str) -> Result<User, DomainError> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))
    }

    pub async fn get(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", id))
    }

    /// Create an account. The password must already be hashed.
    pub async fn register(
        &self,
        username: String,
        email: String,
        password_hash: String,
    ) -> Result<User, DomainError> {
        user::validate_username(&username)?;
        user::validate_email(&email)?;
        self.ensure_username_free(&username, None).await?;
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::Duplicate(format!(
                "Email {email} is already registered"
            )));
        }

        let user = self
            .users
            .save(User::new(username, email, password_hash))
            .await?;
        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Edit the actor's own profile.
    pub async fn update(&self, actor: &Actor, changes: ProfileChanges) -> Result<User, DomainError> {
        let mut user = self
            .users
            .find_by_id(actor.id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", actor.id))?;

        changes.validate()?;
        self.ensure_username_free(&changes.username, Some(&user)).await?;

        user.username = changes.username;
        user.email = changes.email;
        user.first_name = changes.first_name;
        user.last_name = changes.last_name;
        user.updated_at = Utc::now();

        let user = self.users.save(user).await?;
        tracing::info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }

    async fn ensure_username_free(
        &self,
        username: &str,
        current: Option<&User>,
    ) -> Result<(), DomainError> {
        match self.users.find_by_username(username).await? {
            Some(existing) if current.is_none_or(|current| current.id != existing.id) => Err(
                DomainError::Duplicate(format!("Username {username} is already taken")),
            ),
            _ => Ok(()),
        }
    }
}
