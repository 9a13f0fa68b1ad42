/// Embedding module
///
/// - Domain: the `EmbeddingProvider` port and the record text composer
/// - Infrastructure: Gemini `embedContent` client
pub mod domain;
pub mod infrastructure;

pub use domain::{compose, EmbeddingProvider, TaskType};
pub use infrastructure::{GeminiConfig, GeminiEmbedder};
