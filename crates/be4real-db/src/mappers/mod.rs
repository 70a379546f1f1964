//! Model to entity mappers
//!
//! `From<Model> for Entity` converts database rows into domain objects.
//! Rows written by the repositories always satisfy the domain invariants;
//! the mappers still normalize where a hand-edited row could break them.

mod post;
mod reaction;
mod user;
