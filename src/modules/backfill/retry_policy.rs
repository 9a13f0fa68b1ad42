//! Retry policies for embedding attempts
//!
//! The backfill never skips a record, so the default policy has no attempt
//! ceiling; only the wait between attempts escalates.

use crate::shared::errors::{AppError, AppResult};
use std::time::Duration;

/// Decides how long to wait after a failed attempt and whether to try again
pub trait RetryPolicy: Send + Sync {
    /// Attempt ceiling per record, `None` for unbounded
    fn max_attempts(&self) -> Option<u32>;

    /// Wait after the `attempt`-th consecutive failure (1-indexed)
    fn delay_for(&self, attempt: u32) -> Duration;

    fn allows_retry_after(&self, attempt: u32) -> bool {
        self.max_attempts().map_or(true, |max| attempt < max)
    }
}

/// One row of a backoff table: failures up to and including
/// `through_attempt` wait `delay`. `None` covers every later attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffTier {
    pub through_attempt: Option<u32>,
    pub delay: Duration,
}

/// Table-driven backoff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TieredBackoff {
    tiers: Vec<BackoffTier>,
    max_attempts: Option<u32>,
}

impl TieredBackoff {
    /// Tiers must be ordered by `through_attempt` with an open-ended tier last
    pub fn new(tiers: Vec<BackoffTier>) -> AppResult<Self> {
        let Some(last) = tiers.last() else {
            return Err(AppError::ConfigurationError(
                "backoff needs at least one tier".to_string(),
            ));
        };
        if last.through_attempt.is_some() {
            return Err(AppError::ConfigurationError(
                "last backoff tier must cover all remaining attempts (use '*')".to_string(),
            ));
        }

        let mut previous = 0;
        for tier in &tiers[..tiers.len() - 1] {
            match tier.through_attempt {
                Some(n) if n > previous => previous = n,
                Some(n) => {
                    return Err(AppError::ConfigurationError(format!(
                        "backoff tiers must be strictly increasing, found {} after {}",
                        n, previous
                    )))
                }
                None => {
                    return Err(AppError::ConfigurationError(
                        "only the last backoff tier may be open-ended".to_string(),
                    ))
                }
            }
        }

        Ok(Self {
            tiers,
            max_attempts: None,
        })
    }

    /// 60 s after the first failure, 300 s after the second and third,
    /// an hour after every later one
    pub fn free_tier_quota() -> Self {
        Self {
            tiers: vec![
                BackoffTier {
                    through_attempt: Some(1),
                    delay: Duration::from_secs(60),
                },
                BackoffTier {
                    through_attempt: Some(3),
                    delay: Duration::from_secs(300),
                },
                BackoffTier {
                    through_attempt: None,
                    delay: Duration::from_secs(3600),
                },
            ],
            max_attempts: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: Option<u32>) -> Self {
        self.max_attempts = max_attempts.filter(|n| *n > 0);
        self
    }

    pub fn tiers(&self) -> &[BackoffTier] {
        &self.tiers
    }
}

impl Default for TieredBackoff {
    fn default() -> Self {
        Self::free_tier_quota()
    }
}

impl RetryPolicy for TieredBackoff {
    fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        self.tiers
            .iter()
            .find(|tier| tier.through_attempt.map_or(true, |n| attempt <= n))
            .map(|tier| tier.delay)
            .unwrap_or_default()
    }
}

/// Parses `through:seconds` pairs, e.g. `1:60,3:300,*:3600`
impl std::str::FromStr for TieredBackoff {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tiers = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                let (through, seconds) = part.split_once(':').ok_or_else(|| {
                    AppError::ConfigurationError(format!(
                        "backoff tier '{}' must look like <attempt>:<seconds>",
                        part
                    ))
                })?;
                let through_attempt = match through.trim() {
                    "*" => None,
                    n => Some(n.parse::<u32>().map_err(|e| {
                        AppError::ConfigurationError(format!("backoff attempt '{}': {}", n, e))
                    })?),
                };
                let seconds = seconds.trim().parse::<u64>().map_err(|e| {
                    AppError::ConfigurationError(format!("backoff seconds '{}': {}", seconds, e))
                })?;
                Ok(BackoffTier {
                    through_attempt,
                    delay: Duration::from_secs(seconds),
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        TieredBackoff::new(tiers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let policy = TieredBackoff::default();
        let waits: Vec<u64> = (1..=5).map(|n| policy.delay_for(n).as_secs()).collect();
        assert_eq!(waits, vec![60, 300, 300, 3600, 3600]);
        assert_eq!(policy.max_attempts(), None);
        assert!(policy.allows_retry_after(10_000));
    }

    #[test]
    fn test_parse_matches_default() {
        let parsed: TieredBackoff = "1:60, 3:300, *:3600".parse().unwrap();
        assert_eq!(parsed, TieredBackoff::default());
    }

    #[test]
    fn test_parse_rejects_closed_table() {
        assert!("1:60,3:300".parse::<TieredBackoff>().is_err());
    }

    #[test]
    fn test_parse_rejects_unordered_tiers() {
        assert!("3:60,2:300,*:3600".parse::<TieredBackoff>().is_err());
        assert!("*:60,*:300".parse::<TieredBackoff>().is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("fast".parse::<TieredBackoff>().is_err());
        assert!("1:soon,*:60".parse::<TieredBackoff>().is_err());
        assert!("".parse::<TieredBackoff>().is_err());
    }

    #[test]
    fn test_bounded_attempts() {
        let policy = TieredBackoff::default().with_max_attempts(Some(3));
        assert!(policy.allows_retry_after(2));
        assert!(!policy.allows_retry_after(3));

        let unbounded = TieredBackoff::default().with_max_attempts(Some(0));
        assert_eq!(unbounded.max_attempts(), None);
    }

    #[test]
    fn test_single_open_tier() {
        let policy: TieredBackoff = "*:5".parse().unwrap();
        assert_eq!(policy.delay_for(1), Duration::from_secs(5));
        assert_eq!(policy.delay_for(99), Duration::from_secs(5));
    }
}
