pub mod backfill;
pub mod embedding;
pub mod records;
