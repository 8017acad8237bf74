use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MAX_USERNAME_LEN;
use crate::error::DomainError;

/// User entity - an account that can author posts and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            first_name: String::new(),
            last_name: String::new(),
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn as_author(&self) -> Author {
        Author {
            id: self.id,
            username: self.username.clone(),
        }
    }

    pub fn as_actor(&self) -> Actor {
        Actor {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

/// Public projection of a user shown next to posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub username: String,
}

/// The authenticated user on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub username: String,
}

impl Actor {
    pub fn new(id: Uuid, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
        }
    }
}

impl From<Actor> for Author {
    fn from(actor: Actor) -> Self {
        Self {
            id: actor.id,
            username: actor.username,
        }
    }
}

/// Editable profile fields.
#[derive(Debug, Clone)]
pub struct ProfileChanges {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Letters, digits and `@.+-_`, at most 150 characters.
pub(crate) fn validate_username(username: &str) -> Result<(), DomainError> {
    if username.is_empty() {
        return Err(DomainError::Validation("Username is required".to_string()));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(DomainError::Validation(format!(
            "Username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(DomainError::Validation(
            "Username may contain only letters, digits and @/./+/-/_".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_email(email: &str) -> Result<(), DomainError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(DomainError::Validation("Invalid email address".to_string())),
    }
}

impl ProfileChanges {
    pub fn validate(&self) -> Result<(), DomainError> {
        validate_username(&self.username)?;
        validate_email(&self.email)
    }
}
