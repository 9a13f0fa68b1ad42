//! Structured event log for a backfill run
//!
//! The logger is created by the caller and handed to the job, so the "last N
//! lines" panel and any live status display belong to one run instead of to
//! process-wide state.

use crate::{log_debug, log_error, log_info, log_warn};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// How many formatted lines the recent-history panel keeps
pub const DEFAULT_HISTORY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLevel {
    /// Transient progress (current record, countdown); not kept in history
    Status,
    Info,
    Success,
    Warning,
    Error,
}

impl std::fmt::Display for EventLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventLevel::Status => write!(f, "status"),
            EventLevel::Info => write!(f, "info"),
            EventLevel::Success => write!(f, "success"),
            EventLevel::Warning => write!(f, "warning"),
            EventLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JobEvent {
    pub timestamp: DateTime<Local>,
    pub level: EventLevel,
    pub message: String,
}

impl JobEvent {
    /// `[HH:MM:SS] message`
    pub fn formatted(&self) -> String {
        format!("[{}] {}", self.timestamp.format("%H:%M:%S"), self.message)
    }
}

/// Destination for job events (console, file, UI push channel...)
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &JobEvent);
}

/// Forwards events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn emit(&self, event: &JobEvent) {
        match event.level {
            EventLevel::Status => log_debug!("{}", event.message),
            EventLevel::Info | EventLevel::Success => log_info!("{}", event.message),
            EventLevel::Warning => log_warn!("{}", event.message),
            EventLevel::Error => log_error!("{}", event.message),
        }
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<JobEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<JobEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Messages at one level, in emission order
    pub fn messages(&self, level: EventLevel) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|event| event.level == level)
            .map(|event| event.message)
            .collect()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &JobEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

pub struct JobLogger {
    sinks: Vec<Arc<dyn EventSink>>,
    history: Mutex<VecDeque<String>>,
    history_limit: usize,
}

impl JobLogger {
    pub fn new() -> Self {
        Self {
            sinks: Vec::new(),
            history: Mutex::new(VecDeque::with_capacity(DEFAULT_HISTORY)),
            history_limit: DEFAULT_HISTORY,
        }
    }

    /// Logger writing to the console only
    pub fn console() -> Self {
        Self::new().with_sink(Arc::new(ConsoleSink))
    }

    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    pub fn status(&self, message: impl Into<String>) {
        self.record(EventLevel::Status, message.into());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.record(EventLevel::Info, message.into());
    }

    pub fn success(&self, message: impl Into<String>) {
        self.record(EventLevel::Success, message.into());
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.record(EventLevel::Warning, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.record(EventLevel::Error, message.into());
    }

    /// The most recent non-status lines, oldest first
    pub fn recent(&self) -> Vec<String> {
        self.history
            .lock()
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn record(&self, level: EventLevel, message: String) {
        let event = JobEvent {
            timestamp: Local::now(),
            level,
            message,
        };

        if level != EventLevel::Status {
            if let Ok(mut history) = self.history.lock() {
                if history.len() == self.history_limit {
                    history.pop_front();
                }
                history.push_back(event.formatted());
            }
        }

        for sink in &self.sinks {
            sink.emit(&event);
        }
    }
}

impl Default for JobLogger {
    fn default() -> Self {
        Self::new()
    }
}
