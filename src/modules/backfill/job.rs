/// Embedding backfill job
///
/// Drains the pending set of each collection in order: compose the record's
/// text, ask the provider for a vector, write it back, cool down. A failed
/// attempt is never a reason to skip; the record is retried after the wait the
/// retry policy prescribes.
use super::config::BackfillConfig;
use super::job_logger::JobLogger;
use super::retry_policy::{RetryPolicy, TieredBackoff};
use super::sleeper::{Sleeper, TokioSleeper};
use crate::modules::embedding::domain::provider::{EmbeddingProvider, TaskType};
use crate::modules::embedding::domain::text_composer::compose;
use crate::modules::records::domain::collection::Collection;
use crate::modules::records::domain::entities::Record;
use crate::modules::records::domain::repository::RecordStore;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::TimedOperation;
use crate::{log_debug, log_info};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of one collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionReport {
    pub collection: Collection,
    /// Size of the pending set when the scan ran
    pub pending: usize,
    pub embedded: usize,
    /// Provider attempts that produced no vector
    pub failed_attempts: u32,
}

impl CollectionReport {
    fn new(collection: Collection, pending: usize) -> Self {
        Self {
            collection,
            pending,
            embedded: 0,
            failed_attempts: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BackfillReport {
    pub collections: Vec<CollectionReport>,
}

impl BackfillReport {
    pub fn total_embedded(&self) -> usize {
        self.collections.iter().map(|c| c.embedded).sum()
    }

    pub fn total_failed_attempts(&self) -> u32 {
        self.collections.iter().map(|c| c.failed_attempts).sum()
    }

    pub fn for_collection(&self, collection: Collection) -> Option<&CollectionReport> {
        self.collections.iter().find(|c| c.collection == collection)
    }
}

pub struct BackfillJob {
    store: Arc<dyn RecordStore>,
    provider: Arc<dyn EmbeddingProvider>,
    retry_policy: Arc<dyn RetryPolicy>,
    sleeper: Arc<dyn Sleeper>,
    logger: Arc<JobLogger>,
    config: BackfillConfig,
}

impl BackfillJob {
    /// Job with the default schedule, real waits and the default field lists
    pub fn new(
        store: Arc<dyn RecordStore>,
        provider: Arc<dyn EmbeddingProvider>,
        logger: Arc<JobLogger>,
    ) -> Self {
        Self {
            store,
            provider,
            retry_policy: Arc::new(TieredBackoff::default()),
            sleeper: Arc::new(TokioSleeper),
            logger,
            config: BackfillConfig::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry_policy: Arc<dyn RetryPolicy>) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_config(mut self, config: BackfillConfig) -> Self {
        self.config = config;
        self
    }

    pub fn logger(&self) -> &JobLogger {
        &self.logger
    }

    /// Run one full reconciliation pass over every configured collection
    pub async fn run(&self) -> AppResult<BackfillReport> {
        self.config.validate()?;

        if let Err(e) = self.store.ping().await {
            self.logger
                .error(format!("Could not reach the record store: {}", e));
            return Err(e);
        }

        let timer = TimedOperation::new("embedding backfill");
        self.logger.info(format!(
            "Starting embedding backfill with {}",
            self.provider.provider_name()
        ));

        let mut report = BackfillReport::default();
        for collection in &self.config.collections {
            match self.reconcile(*collection).await {
                Ok(collection_report) => report.collections.push(collection_report),
                Err(e) => {
                    self.logger.error(format!(
                        "Backfill of {} stopped: {}",
                        collection.display_name(),
                        e
                    ));
                    return Err(e);
                }
            }
        }

        self.logger.success(format!(
            "Backfill complete: {} records embedded",
            report.total_embedded()
        ));
        timer.finish_with_info(&format!("{} records embedded", report.total_embedded()));
        Ok(report)
    }

    async fn reconcile(&self, collection: Collection) -> AppResult<CollectionReport> {
        let name = collection.display_name();
        let pending = self.store.find_pending(collection).await?;

        if pending.is_empty() {
            self.logger
                .success(format!("{} already up to date", name));
            return Ok(CollectionReport::new(collection, 0));
        }

        self.logger.info(format!(
            "{}: {} records without embeddings",
            name,
            pending.len()
        ));

        let fields = self.config.fields_for(collection);
        let total = pending.len();
        let mut report = CollectionReport::new(collection, total);

        for (index, record) in pending.iter().enumerate() {
            self.logger.status(format!(
                "{}: processing record {} of {}: id={}, title={}",
                name,
                index + 1,
                total,
                record.id,
                record.label()
            ));

            let text = compose(record, fields);
            log_debug!("{} id={} composed {} chars", name, record.id, text.len());

            let (vector, failures) = self.embed_with_retry(record, &text).await?;
            report.failed_attempts += failures;

            self.store
                .update_embedding(collection, record.store_id, &vector)
                .await?;
            report.embedded += 1;
            self.logger.success(format!(
                "{} id={}: embedding saved ({} values)",
                name,
                record.id,
                vector.len()
            ));

            self.sleeper.sleep(self.config.cooldown).await;
        }

        self.logger.success(format!(
            "{} fully reconciled ({} records embedded)",
            name, report.embedded
        ));
        Ok(report)
    }

    /// Ask the provider until it returns a vector. Returns the vector and the
    /// number of failed attempts before it.
    async fn embed_with_retry(&self, record: &Record, text: &str) -> AppResult<(Vec<f32>, u32)> {
        let name = record.collection().display_name();
        let mut attempt: u32 = 0;

        loop {
            let failure = match self.provider.embed(text, TaskType::RetrievalDocument).await {
                Ok(vector) if !vector.is_empty() => return Ok((vector, attempt)),
                Ok(_) => "provider returned an empty vector".to_string(),
                Err(e) => e.to_string(),
            };

            attempt += 1;
            if !self.retry_policy.allows_retry_after(attempt) {
                return Err(AppError::RetriesExhausted(format!(
                    "{} id={} still has no embedding after {} attempts: {}",
                    name, record.id, attempt, failure
                )));
            }

            let wait = self.retry_policy.delay_for(attempt);
            self.logger.warning(format!(
                "{} id={}: attempt {} failed ({}), waiting {}s before retrying",
                name,
                record.id,
                attempt,
                failure,
                wait.as_secs()
            ));
            self.countdown(wait).await;
            self.logger
                .status(format!("{} id={}: retrying", name, record.id));
        }
    }

    async fn countdown(&self, wait: Duration) {
        let tick = self.config.countdown_tick;
        let mut remaining = wait;
        while !remaining.is_zero() {
            self.logger
                .status(format!("Retrying in {}s", remaining.as_secs().max(1)));
            let step = remaining.min(tick);
            self.sleeper.sleep(step).await;
            remaining -= step;
        }
        log_info!("Backoff of {}s elapsed", wait.as_secs());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_totals() {
        let report = BackfillReport {
            collections: vec![
                CollectionReport {
                    collection: Collection::Listings,
                    pending: 3,
                    embedded: 3,
                    failed_attempts: 2,
                },
                CollectionReport::new(Collection::Resumes, 0),
            ],
        };
        assert_eq!(report.total_embedded(), 3);
        assert_eq!(report.total_failed_attempts(), 2);
        assert_eq!(
            report.for_collection(Collection::Resumes).map(|c| c.pending),
            Some(0)
        );
    }
}
