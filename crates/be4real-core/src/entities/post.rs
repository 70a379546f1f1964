//! Post entity - a single photo shared by a user

use chrono::{DateTime, Utc};

use crate::value_objects::{ReactionCounts, Snowflake};

/// Post entity
///
/// The image payload is immutable after creation; `reactions` is the
/// denormalized per-label aggregate maintained by the reaction ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Snowflake,
    pub author_id: Snowflake,
    pub image_data: String,
    pub reactions: ReactionCounts,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new Post with no reactions
    pub fn new(id: Snowflake, author_id: Snowflake, image_data: String) -> Self {
        Self {
            id,
            author_id,
            image_data,
            reactions: ReactionCounts::new(),
            created_at: Utc::now(),
        }
    }

    /// Feed ordering key: timestamp first, id as tie-breaker
    #[inline]
    pub fn sort_key(&self) -> (DateTime<Utc>, Snowflake) {
        (self.created_at, self.id)
    }

    #[inline]
    pub fn is_authored_by(&self, user_id: Snowflake) -> bool {
        self.author_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_new_post_has_no_reactions() {
        let post = Post::new(Snowflake::new(10), Snowflake::new(1), "aGVsbG8=".to_string());
        assert!(post.reactions.is_empty());
        assert!(post.is_authored_by(Snowflake::new(1)));
        assert!(!post.is_authored_by(Snowflake::new(2)));
    }

    #[test]
    fn test_sort_key_breaks_ties_by_id() {
        let now = Utc::now();
        let mut a = Post::new(Snowflake::new(1), Snowflake::new(1), "a".to_string());
        let mut b = Post::new(Snowflake::new(2), Snowflake::new(1), "b".to_string());
        a.created_at = now;
        b.created_at = now;
        assert!(a.sort_key() < b.sort_key());

        a.created_at = now + Duration::milliseconds(1);
        assert!(a.sort_key() > b.sort_key());
    }
}
