use crate::shared::errors::AppResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Hint telling the provider how the vector will be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    /// Vectors stored on records
    RetrievalDocument,
    /// Vectors computed for a search query
    RetrievalQuery,
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskType::RetrievalDocument => write!(f, "RETRIEVAL_DOCUMENT"),
            TaskType::RetrievalQuery => write!(f, "RETRIEVAL_QUERY"),
        }
    }
}

/// External service turning text into a fixed-dimension vector
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one text. A successful result is never empty.
    async fn embed(&self, text: &str, task_type: TaskType) -> AppResult<Vec<f32>>;

    /// Name used in log lines
    fn provider_name(&self) -> &str {
        "embedding provider"
    }
}
