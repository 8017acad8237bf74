//! Ownership gate for reading and mutating posts and comments.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Actor, Comment, Post, PostDetails};

/// A record authored by a single user.
pub trait Owned {
    fn author_id(&self) -> Uuid;
}

impl Owned for Post {
    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

impl Owned for Comment {
    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

impl Owned for PostDetails {
    fn author_id(&self) -> Uuid {
        self.post.author_id
    }
}

/// Only the author may edit or delete a record. There is no staff override.
pub fn can_modify(actor: &Actor, record: &impl Owned) -> bool {
    actor.id == record.author_id()
}

/// Anyone may read a visible post; the author may always read their own.
pub fn can_view(post: &PostDetails, viewer: Option<&Actor>, now: DateTime<Utc>) -> bool {
    post.is_visible(now) || viewer.is_some_and(|actor| can_modify(actor, post))
}

/// Result of a gated mutation.
///
/// A non-owner is not told they lacked permission: the attempt ends in a
/// redirect to the post they tried to change, and nothing is written.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome<T> {
    Applied(T),
    RedirectToPost(Uuid),
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::domain::{Author, PostDraft};

    fn details(author: &Actor, pub_date: DateTime<Utc>) -> PostDetails {
        let post = Post::new(
            author.id,
            PostDraft {
                title: "Title".to_string(),
                text: "Text".to_string(),
                pub_date,
                is_published: true,
                category_id: Uuid::new_v4(),
                location_id: None,
                image: None,
            },
        );
        PostDetails {
            post: Post {
                category_id: None,
                ..post
            },
            author: Author {
                id: author.id,
                username: author.username.clone(),
            },
            category: None,
            location: None,
            comment_count: 0,
        }
    }

    #[test]
    fn test_only_author_can_modify() {
        let author = Actor::new(Uuid::new_v4(), "author");
        let other = Actor::new(Uuid::new_v4(), "other");
        let comment = Comment::new(author.id, Uuid::new_v4(), "Nice".to_string());

        assert!(can_modify(&author, &comment));
        assert!(!can_modify(&other, &comment));
    }

    #[test]
    fn test_same_username_different_id_is_not_owner() {
        let author = Actor::new(Uuid::new_v4(), "admin");
        let impostor = Actor::new(Uuid::new_v4(), "admin");
        let post = details(&author, Utc::now());

        assert!(!can_modify(&impostor, &post));
    }

    #[test]
    fn test_future_post_visible_only_to_author() {
        let now = Utc::now();
        let author = Actor::new(Uuid::new_v4(), "author");
        let reader = Actor::new(Uuid::new_v4(), "reader");
        let post = details(&author, now + TimeDelta::days(1));

        assert!(can_view(&post, Some(&author), now));
        assert!(!can_view(&post, Some(&reader), now));
        assert!(!can_view(&post, None, now));
    }

    #[test]
    fn test_visible_post_readable_by_anonymous() {
        let now = Utc::now();
        let author = Actor::new(Uuid::new_v4(), "author");
        let post = details(&author, now - TimeDelta::days(1));

        assert!(can_view(&post, None, now));
    }
}
