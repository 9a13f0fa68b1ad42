use crate::log_info;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::LogContext;
use diesel::pg::PgConnection;
use diesel::r2d2::{self, ConnectionManager, Pool};
use diesel::RunQueryDsl;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type DbPool = Pool<ConnectionManager<PgConnection>>;
pub type DbConnection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

#[derive(Debug, Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Build a pool for `database_url`. Connections are opened lazily;
    /// call [`Database::ping`] to surface an unreachable store.
    pub fn connect(database_url: &str) -> AppResult<Self> {
        Self::validate_url(database_url)?;

        let manager = ConnectionManager::<PgConnection>::new(database_url);

        // The backfill holds a single connection at a time; keep the pool small
        let pool = r2d2::Pool::builder()
            .max_size(2)
            .min_idle(Some(0))
            .connection_timeout(Duration::from_secs(5)) // Fail fast when the store is unreachable
            .idle_timeout(Some(Duration::from_secs(300)))
            .max_lifetime(Some(Duration::from_secs(1800)))
            .test_on_check_out(true)
            .build_unchecked(manager);

        log_info!(
            "Database connection pool initialized for {} (max_size: {})",
            Self::redacted_host(database_url),
            pool.max_size()
        );

        Ok(Self { pool })
    }

    /// Create a Database instance from an existing pool (useful for testing)
    pub fn from_pool(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Validate a database URL before any connection attempt
    pub fn validate_url(database_url: &str) -> AppResult<()> {
        if !database_url.starts_with("postgres://") && !database_url.starts_with("postgresql://") {
            return Err(AppError::ConfigurationError(
                "Invalid database URL format. Must start with postgres:// or postgresql://"
                    .to_string(),
            ));
        }

        if database_url.contains("password=") {
            return Err(AppError::ConfigurationError(
                "Database URL must not carry the password as a query parameter".to_string(),
            ));
        }

        Ok(())
    }

    /// Host part of the URL, without credentials, for log lines
    pub fn redacted_host(database_url: &str) -> &str {
        database_url.rsplit('@').next().unwrap_or("unknown_host")
    }

    pub fn get_connection(&self) -> AppResult<DbConnection> {
        let start = std::time::Instant::now();

        match self.pool.get() {
            Ok(conn) => {
                let duration = start.elapsed().as_millis() as u64;
                if duration > 100 {
                    LogContext::performance_metric("db_connection_acquire", duration, Some("slow"));
                }
                Ok(conn)
            }
            Err(e) => {
                LogContext::error_with_context(
                    &e,
                    "Failed to acquire database connection from pool",
                );
                Err(AppError::ServiceUnavailable(format!(
                    "Record store unreachable: {}",
                    e
                )))
            }
        }
    }

    /// Round-trip a trivial query to prove the store is reachable
    pub fn ping(&self) -> AppResult<()> {
        let mut conn = self.get_connection()?;
        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .map_err(|e| AppError::ServiceUnavailable(format!("Record store ping failed: {}", e)))?;
        Ok(())
    }

    /// Apply embedded migrations, returning how many ran
    pub fn run_migrations(&self) -> AppResult<usize> {
        let mut conn = self.get_connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| AppError::DatabaseError(format!("Failed to run migrations: {}", e)))?;
        log_info!("Applied {} pending migration(s)", applied.len());
        Ok(applied.len())
    }
}
