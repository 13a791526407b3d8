//! Database Module
//!
//! Embedded SurrealDB storage. The server runs on RocksDB under the work
//! directory; tests construct an in-memory engine and hand it to the same
//! repositories.

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

/// Namespace and database names for the embedded engine
pub const NAMESPACE: &str = "mandi";
pub const DATABASE: &str = "marketplace";

/// Open the embedded database under the given directory
pub async fn connect(database_dir: &Path) -> Result<Surreal<Db>, AppError> {
    let db = Surreal::new::<RocksDb>(database_dir)
        .await
        .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

    tracing::info!("Database connection established ({})", database_dir.display());

    Ok(db)
}
