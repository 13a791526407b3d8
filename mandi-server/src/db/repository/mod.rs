//! Repository Module
//!
//! CRUD operations for the SurrealDB tables. Each repository owns a clone of
//! the embedded database handle through [`BaseRepository`].

pub mod offer;
pub mod order;
pub mod product;
pub mod request;
pub mod user;

pub use offer::SellerOfferRepository;
pub use order::OrderRepository;
pub use product::CatalogItemRepository;
pub use request::ProductRequestRepository;
pub use user::UserRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Stock guard tripped inside the purchase transaction
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Parse a `"table:key"` id string into a RecordId, validating the table
pub fn parse_record_id(table: &str, id: &str) -> RepoResult<surrealdb::RecordId> {
    let rid: surrealdb::RecordId = id
        .parse()
        .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
    if rid.table() != table {
        return Err(RepoError::Validation(format!(
            "Expected a {} id, got: {}",
            table, id
        )));
    }
    Ok(rid)
}
