//! # be4real-db
//!
//! Database layer implementing the be4real-core repository traits.
//!
//! ## Overview
//!
//! - Connection pool management and SQL migrations
//! - Database models with SQLx `FromRow` derives
//! - Model -> entity mappers
//! - PostgreSQL repositories; ledger writes are transactional
//! - [`memory::MemoryStore`], an in-process store with the same contracts
//!
//! ## Usage
//!
//! ```rust,ignore
//! use be4real_db::{create_pool, run_migrations, PgPostRepository, PoolConfig};
//! use std::path::Path;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::new("postgres://localhost/be4real")).await?;
//!     run_migrations(&pool, Path::new(be4real_db::DEFAULT_MIGRATIONS_DIR)).await?;
//!     let posts = PgPostRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, run_migrations, PgPool, PoolConfig, DEFAULT_MIGRATIONS_DIR};
pub use repositories::{PgPostRepository, PgReactionRepository, PgUserRepository};
