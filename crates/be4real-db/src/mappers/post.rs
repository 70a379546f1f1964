//! Post model -> entity mapper

use be4real_core::{Post, ReactionCounts, Snowflake};

use crate::models::PostModel;

impl From<PostModel> for Post {
    fn from(model: PostModel) -> Self {
        // drop zero or negative entries
        let reactions: ReactionCounts = model
            .reactions
            .0
            .iter()
            .map(|(label, count)| (label.to_owned(), count))
            .collect();

        Post {
            id: Snowflake::new(model.id),
            author_id: Snowflake::new(model.author_id),
            image_data: model.image_data,
            reactions,
            created_at: model.created_at,
        }
    }
}
