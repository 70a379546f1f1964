//! Schema migrations
//!
//! Migrations are plain SQL files read at runtime, so the crate builds
//! without a live database.

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use std::path::Path;
use tracing::info;

/// `migrations/` directory shipped with this crate
pub const DEFAULT_MIGRATIONS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/migrations");

/// Apply every pending migration found in `dir`
pub async fn run_migrations(pool: &PgPool, dir: &Path) -> Result<(), MigrateError> {
    let migrator = Migrator::new(dir).await?;
    info!(dir = %dir.display(), count = migrator.iter().count(), "Running database migrations");
    migrator.run(pool).await
}
