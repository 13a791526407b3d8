//! Catalog Item Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{CatalogItem, CatalogItemCreate, CatalogItemUpdate};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const CATALOG_TABLE: &str = "catalog_item";

#[derive(Clone)]
pub struct CatalogItemRepository {
    base: BaseRepository,
}

impl CatalogItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all catalog items, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<CatalogItem>> {
        let items: Vec<CatalogItem> = self
            .base
            .db()
            .query("SELECT * FROM catalog_item ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Find catalog items owned by the given seller
    pub async fn find_by_owner(&self, owner: RecordId) -> RepoResult<Vec<CatalogItem>> {
        let items: Vec<CatalogItem> = self
            .base
            .db()
            .query("SELECT * FROM catalog_item WHERE owner = $owner ORDER BY created_at DESC")
            .bind(("owner", owner))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Find catalog item by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<CatalogItem>> {
        let rid = parse_record_id(CATALOG_TABLE, id)?;
        let item: Option<CatalogItem> = self.base.db().select(rid).await?;
        Ok(item)
    }

    /// Create a new catalog item owned by the given seller
    ///
    /// Link fields bind natively so `owner` is stored as a record link, not
    /// its string form.
    pub async fn create(&self, data: CatalogItemCreate, owner: RecordId) -> RepoResult<CatalogItem> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE catalog_item SET
                    name = $name,
                    price = $price,
                    quantity = $quantity,
                    location = $location,
                    image = $image,
                    owner = $owner,
                    created_at = $created_at
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("price", data.price))
            .bind(("quantity", data.quantity))
            .bind(("location", data.location))
            .bind(("image", data.image))
            .bind(("owner", owner))
            .bind(("created_at", chrono::Utc::now()))
            .await?;

        let created: Option<CatalogItem> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create catalog item".to_string()))
    }

    /// Merge the provided fields into an existing item
    pub async fn update(&self, id: &str, data: CatalogItemUpdate) -> RepoResult<CatalogItem> {
        let rid = parse_record_id(CATALOG_TABLE, id)?;
        let updated: Option<CatalogItem> = self.base.db().update(rid).merge(data).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Catalog item {} not found", id)))
    }

    /// Delete a catalog item, returning whether it existed
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = parse_record_id(CATALOG_TABLE, id)?;
        let deleted: Option<CatalogItem> = self.base.db().delete(rid).await?;
        Ok(deleted.is_some())
    }

    /// Total row count
    pub async fn count_all(&self) -> RepoResult<i64> {
        #[derive(serde::Deserialize)]
        struct Counted {
            count: i64,
        }

        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM catalog_item GROUP ALL")
            .await?;
        let counted: Vec<Counted> = result.take(0)?;
        Ok(counted.first().map(|c| c.count).unwrap_or(0))
    }

    /// Per-owner aggregates: (owner, listing count, summed quantity)
    ///
    /// Sorting and top-N truncation happen in the caller; the embedded
    /// engine has a known ORDER+LIMIT quirk on grouped selects.
    pub async fn aggregate_by_owner(&self) -> RepoResult<Vec<OwnerAggregate>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT owner, count() AS listings, math::sum(quantity) AS total_quantity \
                 FROM catalog_item GROUP BY owner",
            )
            .await?;
        let rows: Vec<OwnerAggregate> = result.take(0)?;
        Ok(rows)
    }
}

/// Grouped aggregate row for the statistics endpoints
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct OwnerAggregate {
    #[serde(with = "crate::db::models::serde_helpers::record_id")]
    pub owner: RecordId,
    pub listings: i64,
    pub total_quantity: i64,
}
