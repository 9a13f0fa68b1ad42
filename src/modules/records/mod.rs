/// Job board records module
///
/// Listings and résumés as the embedding backfill sees them:
/// - Domain: typed records, collections and the `RecordStore` trait
/// - Infrastructure: Diesel/PostgreSQL implementation
pub mod domain;
pub mod infrastructure;

// Re-exports for easy access
pub use domain::{
    collection::Collection,
    entities::{FieldValue, JobListing, Record, RecordBody, Resume},
    repository::{CollectionStatistics, RecordStore},
};
pub use infrastructure::DieselRecordStore;
