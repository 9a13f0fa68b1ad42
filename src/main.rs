use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use futures::future::try_join_all;
use jobboard::modules::backfill::{
    parse_field_list, BackfillConfig, BackfillJob, JobLogger, TieredBackoff,
};
use jobboard::modules::embedding::infrastructure::gemini_client::{
    DEFAULT_BASE_URL, DEFAULT_MODEL,
};
use jobboard::modules::embedding::{GeminiConfig, GeminiEmbedder};
use jobboard::modules::records::{Collection, DieselRecordStore, RecordStore};
use jobboard::shared::utils::init_logger;
use jobboard::shared::Database;
use jobboard::log_error;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "jobboard",
    about = "Embedding reconciliation for job listings and résumés"
)]
struct Cli {
    /// Postgres connection string (postgres://...)
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Embed every record stored without an embedding
    Backfill(BackfillArgs),
    /// Print pending and total record counts per collection
    Status,
    /// Apply pending database migrations
    Migrate,
}

#[derive(Args, Debug)]
struct BackfillArgs {
    /// API key for the embedding service
    #[arg(long, env = "GOOGLE_AI_KEY", hide_env_values = true)]
    api_key: String,

    #[arg(long, env = "EMBEDDING_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    #[arg(long, env = "EMBEDDING_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Expected vector length; other lengths count as a failed attempt
    #[arg(long, env = "EMBEDDING_DIMENSIONS")]
    dimensions: Option<usize>,

    #[arg(long, env = "EMBEDDING_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Pause after each stored embedding
    #[arg(long, env = "BACKFILL_COOLDOWN_SECS", default_value_t = 10)]
    cooldown_secs: u64,

    /// Backoff tiers as `<through attempt>:<seconds>`, last tier `*`
    #[arg(long, env = "BACKFILL_BACKOFF", default_value = "1:60,3:300,*:3600")]
    backoff: String,

    /// Abort the run once a record has failed this many times (unbounded if unset)
    #[arg(long, env = "BACKFILL_MAX_ATTEMPTS")]
    max_attempts: Option<u32>,

    /// Comma separated listing fields composed into the embedded text
    #[arg(long, env = "BACKFILL_LISTING_FIELDS")]
    listing_fields: Option<String>,

    /// Comma separated résumé fields composed into the embedded text
    #[arg(long, env = "BACKFILL_RESUME_FIELDS")]
    resume_fields: Option<String>,
}

impl BackfillArgs {
    fn gemini_config(&self) -> GeminiConfig {
        let mut config = GeminiConfig::new(self.api_key.clone());
        config.model = self.model.clone();
        config.base_url = self.base_url.clone();
        config.dimensions = self.dimensions;
        config.timeout = Duration::from_secs(self.timeout_secs.max(1));
        config
    }

    fn retry_policy(&self) -> Result<TieredBackoff> {
        let policy: TieredBackoff = self
            .backoff
            .parse()
            .with_context(|| format!("invalid BACKFILL_BACKOFF '{}'", self.backoff))?;
        Ok(policy.with_max_attempts(self.max_attempts))
    }

    fn backfill_config(&self) -> Result<BackfillConfig> {
        let mut config =
            BackfillConfig::default().with_cooldown(Duration::from_secs(self.cooldown_secs));
        if let Some(raw) = &self.listing_fields {
            let fields = parse_field_list(raw).context("invalid BACKFILL_LISTING_FIELDS")?;
            config = config.with_fields(Collection::Listings, fields);
        }
        if let Some(raw) = &self.resume_fields {
            let fields = parse_field_list(raw).context("invalid BACKFILL_RESUME_FIELDS")?;
            config = config.with_fields(Collection::Resumes, fields);
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logger();

    let cli = Cli::parse();
    let database = Database::connect(&cli.database_url).with_context(|| {
        format!(
            "failed to configure database at {}",
            Database::redacted_host(&cli.database_url)
        )
    })?;

    let result = match cli.command {
        Command::Backfill(args) => backfill(database, args).await,
        Command::Status => status(database).await,
        Command::Migrate => migrate(database),
    };

    if let Err(e) = &result {
        log_error!("{:#}", e);
    }
    result
}

async fn backfill(database: Database, args: BackfillArgs) -> Result<()> {
    let config = args.backfill_config()?;
    let retry_policy = args.retry_policy()?;
    let provider =
        GeminiEmbedder::new(args.gemini_config()).context("failed to create embedding client")?;

    let store = Arc::new(DieselRecordStore::new(database));
    let logger = Arc::new(JobLogger::console());
    let job = BackfillJob::new(store, Arc::new(provider), logger)
        .with_retry_policy(Arc::new(retry_policy))
        .with_config(config);

    let report = job.run().await.context("embedding backfill failed")?;

    for collection in &report.collections {
        println!(
            "{:<8} pending={} embedded={} failed_attempts={}",
            collection.collection.display_name(),
            collection.pending,
            collection.embedded,
            collection.failed_attempts
        );
    }
    Ok(())
}

async fn status(database: Database) -> Result<()> {
    let store = DieselRecordStore::new(database);
    store.ping().await.context("record store is unreachable")?;

    let statistics = try_join_all(
        Collection::ALL
            .iter()
            .map(|collection| store.get_statistics(*collection)),
    )
    .await
    .context("failed to count records")?;

    for stats in statistics {
        println!(
            "{:<8} total={} embedded={} pending={}",
            stats.collection.display_name(),
            stats.total_count,
            stats.embedded_count(),
            stats.pending_count
        );
    }
    Ok(())
}

fn migrate(database: Database) -> Result<()> {
    let applied = database
        .run_migrations()
        .context("failed to run database migrations")?;
    println!("Applied {} migration(s)", applied);
    Ok(())
}
