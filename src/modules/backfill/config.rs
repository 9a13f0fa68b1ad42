use crate::modules::records::domain::collection::Collection;
use crate::shared::errors::{AppError, AppResult};
use std::time::Duration;

/// Pause after every stored embedding, keeping the run under the provider's
/// requests-per-minute ceiling
pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(10);

/// Granularity of the countdown shown while waiting out a backoff
pub const DEFAULT_COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// Tunables for one backfill run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackfillConfig {
    pub cooldown: Duration,
    pub countdown_tick: Duration,
    /// Collections in processing order
    pub collections: Vec<Collection>,
    pub listing_fields: Vec<String>,
    pub resume_fields: Vec<String>,
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            cooldown: DEFAULT_COOLDOWN,
            countdown_tick: DEFAULT_COUNTDOWN_TICK,
            collections: Collection::ALL.to_vec(),
            listing_fields: owned(Collection::Listings.default_embedding_fields()),
            resume_fields: owned(Collection::Resumes.default_embedding_fields()),
        }
    }
}

impl BackfillConfig {
    pub fn fields_for(&self, collection: Collection) -> &[String] {
        match collection {
            Collection::Listings => &self.listing_fields,
            Collection::Resumes => &self.resume_fields,
        }
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_fields(mut self, collection: Collection, fields: Vec<String>) -> Self {
        match collection {
            Collection::Listings => self.listing_fields = fields,
            Collection::Resumes => self.resume_fields = fields,
        }
        self
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.countdown_tick.is_zero() {
            return Err(AppError::ConfigurationError(
                "countdown tick must be positive".to_string(),
            ));
        }
        if self.collections.is_empty() {
            return Err(AppError::ConfigurationError(
                "at least one collection must be configured".to_string(),
            ));
        }
        for collection in &self.collections {
            if self.fields_for(*collection).is_empty() {
                return Err(AppError::ConfigurationError(format!(
                    "no embedding fields configured for {}",
                    collection
                )));
            }
        }
        Ok(())
    }
}

/// Parse a comma separated field list such as `title, description,skills`
pub fn parse_field_list(raw: &str) -> AppResult<Vec<String>> {
    let fields: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_lowercase)
        .collect();

    if fields.is_empty() {
        return Err(AppError::ConfigurationError(format!(
            "field list '{}' is empty",
            raw
        )));
    }
    Ok(fields)
}

fn owned(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|field| field.to_string()).collect()
}
