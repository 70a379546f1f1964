//! Reaction model -> entity mapper

use be4real_core::{DomainError, Reaction, ReactionLabel, Snowflake};

use crate::models::ReactionModel;

/// Labels are validated on the way in, but the column is only a VARCHAR
impl TryFrom<ReactionModel> for Reaction {
    type Error = DomainError;

    fn try_from(model: ReactionModel) -> Result<Self, Self::Error> {
        Ok(Reaction {
            id: Snowflake::new(model.id),
            post_id: Snowflake::new(model.post_id),
            user_id: Snowflake::new(model.user_id),
            label: ReactionLabel::parse(model.label)?,
            created_at: model.created_at,
        })
    }
}
