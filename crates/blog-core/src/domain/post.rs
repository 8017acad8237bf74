use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Author, Category, Location, MAX_TITLE_LEN};
use crate::error::DomainError;
use crate::services::visibility;

/// Post entity - a blog publication, possibly scheduled for a future `pub_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub location_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    /// Stored path of the attached image, if any.
    pub image: Option<String>,
}

impl Post {
    /// Create a new post authored by `author_id` from a validated draft.
    pub fn new(author_id: Uuid, draft: PostDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            text: draft.text,
            pub_date: draft.pub_date,
            is_published: draft.is_published,
            created_at: Utc::now(),
            author_id,
            location_id: draft.location_id,
            category_id: Some(draft.category_id),
            image: draft.image,
        }
    }

    /// Replace the editable fields. Identity, author and `created_at` are kept.
    pub fn apply(&mut self, draft: PostDraft) {
        self.title = draft.title;
        self.text = draft.text;
        self.pub_date = draft.pub_date;
        self.is_published = draft.is_published;
        self.location_id = draft.location_id;
        self.category_id = Some(draft.category_id);
        self.image = draft.image;
    }
}

/// User-submitted post fields. Everything but the author is editable.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub is_published: bool,
    pub category_id: Uuid,
    pub location_id: Option<Uuid>,
    pub image: Option<String>,
}

impl PostDraft {
    pub fn validate(&self) -> Result<(), DomainError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DomainError::Validation("Title is required".to_string()));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(DomainError::Validation(format!(
                "Title must be at most {MAX_TITLE_LEN} characters"
            )));
        }
        if self.text.trim().is_empty() {
            return Err(DomainError::Validation("Text is required".to_string()));
        }
        Ok(())
    }
}

/// A post together with its resolved relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetails {
    pub post: Post,
    pub author: Author,
    pub category: Option<Category>,
    pub location: Option<Location>,
    pub comment_count: u64,
}

impl PostDetails {
    /// Whether this post is publicly visible at `now`.
    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        visibility::is_visible(&self.post, self.category.as_ref(), now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> PostDraft {
        PostDraft {
            title: "Hello".to_string(),
            text: "World".to_string(),
            pub_date: Utc::now(),
            is_published: true,
            category_id: Uuid::new_v4(),
            location_id: None,
            image: None,
        }
    }

    #[test]
    fn test_draft_validation() {
        assert!(draft().validate().is_ok());

        let blank_title = PostDraft {
            title: "   ".to_string(),
            ..draft()
        };
        assert!(matches!(
            blank_title.validate(),
            Err(DomainError::Validation(_))
        ));

        let long_title = PostDraft {
            title: "t".repeat(MAX_TITLE_LEN + 1),
            ..draft()
        };
        assert!(long_title.validate().is_err());

        let no_text = PostDraft {
            text: String::new(),
            ..draft()
        };
        assert!(no_text.validate().is_err());
    }

    #[test]
    fn test_apply_keeps_identity() {
        let author_id = Uuid::new_v4();
        let mut post = Post::new(author_id, draft());
        let (id, created_at) = (post.id, post.created_at);

        post.apply(PostDraft {
            title: "Edited".to_string(),
            is_published: false,
            ..draft()
        });

        assert_eq!(post.id, id);
        assert_eq!(post.created_at, created_at);
        assert_eq!(post.author_id, author_id);
        assert_eq!(post.title, "Edited");
        assert!(!post.is_published);
    }
}
