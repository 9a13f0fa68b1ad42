/// Repository trait for record persistence
///
/// Defines what the embedding backfill needs from the record store.
/// Implementation uses Diesel ORM with PostgreSQL.
use super::collection::Collection;
use super::entities::Record;
use crate::shared::errors::AppResult;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Check the store is reachable
    async fn ping(&self) -> AppResult<()>;

    /// Records whose embedding is absent or empty, ordered by ascending public id
    async fn find_pending(&self, collection: Collection) -> AppResult<Vec<Record>>;

    /// Overwrite the embedding of one record, leaving every other field untouched
    async fn update_embedding(
        &self,
        collection: Collection,
        store_id: Uuid,
        embedding: &[f32],
    ) -> AppResult<()>;

    /// Get collection statistics
    async fn get_statistics(&self, collection: Collection) -> AppResult<CollectionStatistics>;
}

/// Embedding coverage of one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionStatistics {
    pub collection: Collection,
    pub pending_count: i64,
    pub total_count: i64,
}

impl CollectionStatistics {
    pub fn embedded_count(&self) -> i64 {
        self.total_count - self.pending_count
    }
}
