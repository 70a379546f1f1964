//! Value objects - immutable types that represent domain concepts

mod reaction_counts;
mod reaction_label;
mod snowflake;

pub use reaction_counts::ReactionCounts;
pub use reaction_label::ReactionLabel;
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
