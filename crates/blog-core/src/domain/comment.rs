use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Author;
use crate::error::DomainError;

/// Comment entity - a reader's remark on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    pub author_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub is_published: bool,
}

impl Comment {
    pub fn new(author_id: Uuid, post_id: Uuid, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            author_id,
            post_id,
            created_at: Utc::now(),
            is_published: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommentDraft {
    pub text: String,
}

impl CommentDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.text.trim().is_empty() {
            return Err(DomainError::Validation(
                "Comment text is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// A comment with its author resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentDetails {
    pub comment: Comment,
    pub author: Author,
}
