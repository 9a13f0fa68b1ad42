/// Shared infrastructure concerns
///
/// Infrastructure used by more than one module (currently the Postgres pool).
pub mod database;

// Re-exports for convenience
pub use database::{Database, DbConnection, DbPool};
