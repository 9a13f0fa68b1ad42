/// Embedding backfill module
///
/// Reconciles records stored without an embedding: scan, compose, embed with
/// escalating backoff, persist. The run reports through an explicit
/// `JobLogger` rather than process-wide state.
pub mod config;
pub mod job;
pub mod job_logger;
pub mod retry_policy;
pub mod sleeper;

pub use config::{parse_field_list, BackfillConfig};
pub use job::{BackfillJob, BackfillReport, CollectionReport};
pub use job_logger::{ConsoleSink, EventLevel, EventSink, JobEvent, JobLogger, MemorySink};
pub use retry_policy::{BackoffTier, RetryPolicy, TieredBackoff};
pub use sleeper::{Sleeper, TokioSleeper};
