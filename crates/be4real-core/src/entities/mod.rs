//! Domain entities - core business objects

mod post;
mod reaction;
mod user;

pub use post::Post;
pub use reaction::Reaction;
pub use user::{LoginMethod, User};
