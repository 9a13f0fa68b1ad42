/// Database test utilities with singleton pattern
///
/// Provides thread-safe access to the test database with proper isolation.
/// Requires TEST_DATABASE_URL; tests using it are `#[ignore]`d by default.
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel::sql_types::{Array, Float4, Int4, Nullable, Text};
use jobboard::shared::infrastructure::database::DbPool;
use jobboard::shared::Database;
use std::sync::{Mutex, MutexGuard, OnceLock};

static DB: OnceLock<Database> = OnceLock::new();

/// Get or create the shared test database, migrated on first use
pub fn get_test_database() -> Database {
    DB.get_or_init(|| {
        dotenvy::dotenv().ok();
        let test_db_url = std::env::var("TEST_DATABASE_URL")
            .expect("TEST_DATABASE_URL must be set in .env for tests");

        let manager = ConnectionManager::<PgConnection>::new(test_db_url);
        let pool: DbPool = r2d2::Pool::builder()
            .max_size(4)
            .build(manager)
            .expect("Failed to create test database pool");

        let database = Database::from_pool(pool);
        database
            .run_migrations()
            .expect("Unable to migrate the test database");
        database
    })
    .clone()
}

/// Clean all test tables - use at the start of each test
pub fn clean_test_db() {
    let mut conn = get_test_database()
        .get_connection()
        .expect("Failed to get DB connection");

    diesel::sql_query("TRUNCATE TABLE job_listings, resumes")
        .execute(&mut conn)
        .expect("Failed to clean record tables");
}

pub fn insert_listing(id: i32, title: &str, embedding: Option<Vec<f32>>) {
    let mut conn = get_test_database()
        .get_connection()
        .expect("Failed to get DB connection");

    diesel::sql_query(
        "INSERT INTO job_listings (id, title, skills, embedding) VALUES ($1, $2, $3, $4)",
    )
    .bind::<Int4, _>(id)
    .bind::<Text, _>(title)
    .bind::<Array<Text>, _>(vec!["Rust".to_string(), "SQL".to_string()])
    .bind::<Nullable<Array<Float4>>, _>(embedding)
    .execute(&mut conn)
    .expect("Failed to insert listing");
}

pub fn insert_resume(id: i32, name: &str, embedding: Option<Vec<f32>>) {
    let mut conn = get_test_database()
        .get_connection()
        .expect("Failed to get DB connection");

    diesel::sql_query("INSERT INTO resumes (id, name, summary, embedding) VALUES ($1, $2, $3, $4)")
        .bind::<Int4, _>(id)
        .bind::<Text, _>(name)
        .bind::<Text, _>("Backend engineer")
        .bind::<Nullable<Array<Float4>>, _>(embedding)
        .execute(&mut conn)
        .expect("Failed to insert resume");
}

/// Global test mutex for serialization
static TEST_LOCK: Mutex<()> = Mutex::new(());

/// Acquire test lock to ensure tests run serially
/// Returns a guard that releases the lock when dropped
pub fn acquire_test_lock() -> MutexGuard<'static, ()> {
    // Handle poisoned mutex by recovering from panic
    match TEST_LOCK.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
