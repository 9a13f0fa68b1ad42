pub mod provider;
pub mod text_composer;

pub use provider::{EmbeddingProvider, TaskType};
pub use text_composer::compose;
