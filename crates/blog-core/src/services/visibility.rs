//! Public visibility of posts.

use chrono::{DateTime, Utc};

use crate::domain::{Category, Post};

/// A post is publicly visible when it is published, its `pub_date` has been
/// reached, and it either has no category or its category is published.
///
/// `category` must be the category referenced by `post.category_id`.
pub fn is_visible(post: &Post, category: Option<&Category>, now: DateTime<Utc>) -> bool {
    post.is_published && post.pub_date <= now && category.is_none_or(|c| c.is_published)
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use uuid::Uuid;

    use super::*;
    use crate::domain::PostDraft;

    fn post(pub_date: DateTime<Utc>, is_published: bool) -> Post {
        Post::new(
            Uuid::new_v4(),
            PostDraft {
                title: "Title".to_string(),
                text: "Text".to_string(),
                pub_date,
                is_published,
                category_id: Uuid::new_v4(),
                location_id: None,
                image: None,
            },
        )
    }

    fn category(is_published: bool) -> Category {
        Category {
            is_published,
            ..Category::new("Travel".into(), "Trips".into(), "travel".into())
        }
    }

    #[test]
    fn test_past_published_post_without_category_is_visible() {
        let now = Utc::now();
        let p = post(now - TimeDelta::days(1), true);
        assert!(is_visible(&p, None, now));
    }

    #[test]
    fn test_future_post_is_hidden() {
        let now = Utc::now();
        let p = post(now + TimeDelta::days(1), true);
        assert!(!is_visible(&p, None, now));
    }

    #[test]
    fn test_pub_date_equal_to_now_is_visible() {
        let now = Utc::now();
        assert!(is_visible(&post(now, true), None, now));
    }

    #[test]
    fn test_unpublished_post_is_hidden() {
        let now = Utc::now();
        let p = post(now - TimeDelta::days(1), false);
        assert!(!is_visible(&p, Some(&category(true)), now));
    }

    #[test]
    fn test_unpublished_category_hides_post() {
        let now = Utc::now();
        let p = post(now - TimeDelta::days(1), true);
        assert!(is_visible(&p, Some(&category(true)), now));
        assert!(!is_visible(&p, Some(&category(false)), now));
    }

    #[test]
    fn test_predicate_matches_all_combinations() {
        let now = Utc::now();
        for is_published in [true, false] {
            for future in [true, false] {
                for cat in [None, Some(true), Some(false)] {
                    let pub_date = if future {
                        now + TimeDelta::hours(1)
                    } else {
                        now - TimeDelta::hours(1)
                    };
                    let p = post(pub_date, is_published);
                    let c = cat.map(category);
                    let expected = is_published && !future && cat.unwrap_or(true);
                    assert_eq!(is_visible(&p, c.as_ref(), now), expected);
                }
            }
        }
    }
}
