pub mod collection;
pub mod entities;
pub mod repository;

pub use collection::Collection;
pub use entities::{FieldValue, JobListing, Record, RecordBody, Resume};
pub use repository::{CollectionStatistics, RecordStore};
