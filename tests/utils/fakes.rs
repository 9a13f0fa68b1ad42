/// In-memory collaborators and mocks for driving the backfill job
use async_trait::async_trait;
use jobboard::modules::backfill::Sleeper;
use jobboard::modules::embedding::{EmbeddingProvider, TaskType};
use jobboard::modules::records::{Collection, CollectionStatistics, Record, RecordStore};
use jobboard::shared::{AppError, AppResult};
use mockall::mock;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

mock! {
    pub Embedder {}

    #[async_trait]
    impl EmbeddingProvider for Embedder {
        async fn embed(&self, text: &str, task_type: TaskType) -> AppResult<Vec<f32>>;
    }
}

mock! {
    pub Store {}

    #[async_trait]
    impl RecordStore for Store {
        async fn ping(&self) -> AppResult<()>;
        async fn find_pending(&self, collection: Collection) -> AppResult<Vec<Record>>;
        async fn update_embedding(
            &self,
            collection: Collection,
            store_id: Uuid,
            embedding: &[f32],
        ) -> AppResult<()>;
        async fn get_statistics(&self, collection: Collection) -> AppResult<CollectionStatistics>;
    }
}

/// One `update_embedding` call seen by the store
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingWrite {
    pub collection: Collection,
    pub id: i32,
    pub dimensions: usize,
}

/// Record store backed by a map, with the same pending semantics as Postgres
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: Mutex<HashMap<Collection, Vec<Record>>>,
    writes: Mutex<Vec<EmbeddingWrite>>,
}

impl InMemoryRecordStore {
    pub fn with_records(records: Vec<Record>) -> Self {
        let store = Self::default();
        {
            let mut map = store.records.lock().unwrap();
            for record in records {
                map.entry(record.collection()).or_default().push(record);
            }
        }
        store
    }

    pub fn embedding_of(&self, collection: Collection, id: i32) -> Option<Vec<f32>> {
        self.records
            .lock()
            .unwrap()
            .get(&collection)
            .and_then(|records| records.iter().find(|r| r.id == id))
            .and_then(|record| record.embedding.clone())
    }

    pub fn writes(&self) -> Vec<EmbeddingWrite> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn find_pending(&self, collection: Collection) -> AppResult<Vec<Record>> {
        let mut pending: Vec<Record> = self
            .records
            .lock()
            .unwrap()
            .get(&collection)
            .map(|records| records.iter().filter(|r| r.is_pending()).cloned().collect())
            .unwrap_or_default();
        pending.sort_by_key(|r| r.id);
        Ok(pending)
    }

    async fn update_embedding(
        &self,
        collection: Collection,
        store_id: Uuid,
        embedding: &[f32],
    ) -> AppResult<()> {
        let mut map = self.records.lock().unwrap();
        let record = map
            .get_mut(&collection)
            .and_then(|records| records.iter_mut().find(|r| r.store_id == store_id))
            .ok_or_else(|| AppError::NotFound(format!("{} {}", collection, store_id)))?;

        record.embedding = Some(embedding.to_vec());
        self.writes.lock().unwrap().push(EmbeddingWrite {
            collection,
            id: record.id,
            dimensions: embedding.len(),
        });
        Ok(())
    }

    async fn get_statistics(&self, collection: Collection) -> AppResult<CollectionStatistics> {
        let map = self.records.lock().unwrap();
        let records = map.get(&collection).map(Vec::as_slice).unwrap_or_default();
        Ok(CollectionStatistics {
            collection,
            pending_count: records.iter().filter(|r| r.is_pending()).count() as i64,
            total_count: records.len() as i64,
        })
    }
}

/// Sleeper that returns immediately and remembers every requested wait
#[derive(Default)]
pub struct RecordingSleeper {
    waits: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }

    pub fn total(&self) -> Duration {
        self.waits().into_iter().sum()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}
