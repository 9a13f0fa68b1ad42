pub mod modules;
mod schema;
pub mod shared;

pub use modules::backfill::{BackfillConfig, BackfillJob, BackfillReport, JobLogger};
pub use modules::embedding::{EmbeddingProvider, GeminiConfig, GeminiEmbedder, TaskType};
pub use modules::records::{Collection, DieselRecordStore, Record, RecordStore};
pub use shared::{AppError, AppResult, Database};
