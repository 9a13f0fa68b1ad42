/// Diesel-based implementation of RecordStore
///
/// Both collections share the pending predicate: an embedding column that is
/// NULL or an empty array.
use crate::log_debug;
use crate::modules::records::domain::collection::Collection;
use crate::modules::records::domain::entities::Record;
use crate::modules::records::domain::repository::{CollectionStatistics, RecordStore};
use crate::modules::records::infrastructure::models::{JobListingModel, ResumeModel};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::infrastructure::database::{Database, DbConnection};
use crate::shared::utils::logger::{LogContext, TimedOperation};
use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

const PENDING_PREDICATE: &str = "embedding IS NULL OR cardinality(embedding) = 0";

/// Helper struct for COUNT queries
#[derive(QueryableByName)]
struct CountResult {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    count: i64,
}

pub struct DieselRecordStore {
    database: Database,
}

impl DieselRecordStore {
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    fn get_conn(&self) -> AppResult<DbConnection> {
        self.database.get_connection()
    }

    fn count(&self, conn: &mut DbConnection, query: &str) -> AppResult<i64> {
        let result: CountResult = diesel::sql_query(query)
            .get_result(conn)
            .map_err(|e| AppError::DatabaseError(format!("Failed to count records: {}", e)))?;
        Ok(result.count)
    }
}

#[async_trait]
impl RecordStore for DieselRecordStore {
    async fn ping(&self) -> AppResult<()> {
        self.database.ping()
    }

    async fn find_pending(&self, collection: Collection) -> AppResult<Vec<Record>> {
        let timer = TimedOperation::new(&format!("find_pending({})", collection));
        let mut conn = self.get_conn()?;

        let query = format!(
            "SELECT * FROM {} WHERE {} ORDER BY id ASC",
            collection.table_name(),
            PENDING_PREDICATE
        );

        let records: Vec<Record> = match collection {
            Collection::Listings => diesel::sql_query(query)
                .load::<JobListingModel>(&mut conn)
                .map_err(|e| {
                    AppError::DatabaseError(format!("Failed to load pending listings: {}", e))
                })?
                .into_iter()
                .map(JobListingModel::to_record)
                .collect(),
            Collection::Resumes => diesel::sql_query(query)
                .load::<ResumeModel>(&mut conn)
                .map_err(|e| {
                    AppError::DatabaseError(format!("Failed to load pending resumes: {}", e))
                })?
                .into_iter()
                .map(ResumeModel::to_record)
                .collect(),
        };

        timer.finish_with_info(&format!("{} pending", records.len()));
        Ok(records)
    }

    async fn update_embedding(
        &self,
        collection: Collection,
        store_id: Uuid,
        embedding: &[f32],
    ) -> AppResult<()> {
        LogContext::db_operation("update_embedding", collection.table_name(), None);
        let mut conn = self.get_conn()?;

        let updated = diesel::sql_query(format!(
            "UPDATE {} SET embedding = $1 WHERE store_id = $2",
            collection.table_name()
        ))
        .bind::<diesel::sql_types::Array<diesel::sql_types::Float4>, _>(embedding.to_vec())
        .bind::<diesel::sql_types::Uuid, _>(store_id)
        .execute(&mut conn)
        .map_err(|e| AppError::DatabaseError(format!("Failed to update embedding: {}", e)))?;

        if updated == 0 {
            return Err(AppError::NotFound(format!(
                "No {} record with store id {}",
                collection, store_id
            )));
        }

        log_debug!(
            "Stored {}-dimension embedding on {} {}",
            embedding.len(),
            collection,
            store_id
        );
        Ok(())
    }

    async fn get_statistics(&self, collection: Collection) -> AppResult<CollectionStatistics> {
        let mut conn = self.get_conn()?;
        let table = collection.table_name();

        let pending = self.count(
            &mut conn,
            &format!(
                "SELECT COUNT(*) as count FROM {} WHERE {}",
                table, PENDING_PREDICATE
            ),
        )?;
        let total = self.count(&mut conn, &format!("SELECT COUNT(*) as count FROM {}", table))?;

        Ok(CollectionStatistics {
            collection,
            pending_count: pending,
            total_count: total,
        })
    }
}
