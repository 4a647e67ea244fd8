// File: ./src/runner.rs
// Batch processing of roster entries: fetch, transcode, publish, report.
use crate::context::AppContext;
use crate::model::{Category, RosterEntry};
use crate::rewrite::RuleSet;
use crate::storage::{CalendarFetcher, CalendarPublisher, atomic_write};
use crate::transcode::{TranscodeOptions, transcode};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub const MAX_CONCURRENT: usize = 5;
pub const BATCH_DELAY_MS: u64 = 100;

#[derive(Debug, Clone, Serialize)]
pub struct EntryOutcome {
    pub name: String,
    pub category: Category,
    pub success: bool,
    pub retained: usize,
    pub dropped: usize,
    /// Targets whose calendar was replaced in this run.
    pub targets: Vec<String>,
    pub error: Option<String>,
}

impl EntryOutcome {
    fn failed(entry: &RosterEntry, error: String) -> Self {
        Self {
            name: entry.name.clone(),
            category: entry.classify(),
            success: false,
            retained: 0,
            dropped: 0,
            targets: Vec::new(),
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub completed_at: DateTime<Utc>,
    pub outcomes: Vec<EntryOutcome>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn dropped_events(&self) -> usize {
        self.outcomes.iter().map(|o| o.dropped).sum()
    }

    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_report_path()?;
        let json = serde_json::to_string_pretty(self)?;
        atomic_write(&path, json)?;
        log::info!("Run report saved to {}", path.display());
        Ok(())
    }
}

/// Shared, cheaply clonable pipeline. The rule set is compiled once and
/// read concurrently by every worker.
#[derive(Clone)]
pub struct Runner {
    rules: Arc<RuleSet>,
    fetcher: Arc<dyn CalendarFetcher>,
    publisher: Arc<dyn CalendarPublisher>,
    options: Arc<TranscodeOptions>,
    max_concurrent: usize,
    batch_delay: Duration,
}

impl Runner {
    pub fn new(
        rules: Arc<RuleSet>,
        fetcher: Arc<dyn CalendarFetcher>,
        publisher: Arc<dyn CalendarPublisher>,
        options: TranscodeOptions,
    ) -> Self {
        Self {
            rules,
            fetcher,
            publisher,
            options: Arc::new(options),
            max_concurrent: MAX_CONCURRENT,
            batch_delay: Duration::from_millis(BATCH_DELAY_MS),
        }
    }

    pub fn with_limits(mut self, max_concurrent: usize, batch_delay: Duration) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self.batch_delay = batch_delay;
        self
    }

    /// Fetches, transcodes and publishes one entry. Never panics on bad input.
    /// Fetch and transcode failures publish nothing. A publish failure stops at
    /// that target; `targets` then lists only the ones already replaced.
    pub fn process_entry(&self, entry: &RosterEntry) -> EntryOutcome {
        let raw = match self.fetcher.fetch(entry) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Error fetching {}: {:#}", entry.name, e);
                return EntryOutcome::failed(entry, format!("{:#}", e));
            }
        };

        let transcoded = match transcode(&raw, entry, &self.rules, &self.options) {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Error processing {}: {}", entry.name, e);
                return EntryOutcome::failed(entry, e.to_string());
            }
        };

        let wanted = entry.targets();
        let mut published = Vec::with_capacity(wanted.len());
        let mut error = None;
        for target in &wanted {
            match self.publisher.publish(target, entry, &transcoded.document) {
                Ok(()) => published.push(target.clone()),
                Err(e) => {
                    log::warn!("Error publishing {} to {}: {:#}", entry.name, target, e);
                    error = Some(if published.is_empty() {
                        format!("{:#}", e)
                    } else {
                        format!(
                            "partial publish ({} of {} targets) failed at {}: {:#}",
                            published.len(),
                            wanted.len(),
                            target,
                            e
                        )
                    });
                    break;
                }
            }
        }

        EntryOutcome {
            name: entry.name.clone(),
            category: entry.classify(),
            success: error.is_none(),
            retained: transcoded.retained(),
            dropped: transcoded.dropped,
            targets: published,
            error,
        }
    }

    /// Processes `entries` with at most `max_concurrent` in flight, pausing
    /// `batch_delay` between batches. Outcomes keep the input order.
    pub async fn run(&self, entries: Vec<RosterEntry>) -> RunReport {
        let total = entries.len();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = JoinSet::new();

        for (index, entry) in entries.into_iter().enumerate() {
            if index > 0 && index % self.max_concurrent == 0 && !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }

            let permit = match semaphore.clone().acquire_owned().await {
                Ok(p) => p,
                Err(_) => break,
            };
            let runner = self.clone();
            tasks.spawn(async move {
                let _permit = permit;
                let fallback = entry.clone();
                let outcome =
                    tokio::task::spawn_blocking(move || runner.process_entry(&entry)).await;
                let outcome = outcome.unwrap_or_else(|e| {
                    EntryOutcome::failed(&fallback, format!("worker failed: {}", e))
                });
                (index, outcome)
            });
        }

        let mut indexed = Vec::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(pair) => indexed.push(pair),
                Err(e) => log::error!("Runner task failed: {}", e),
            }
        }
        indexed.sort_by_key(|(index, _)| *index);

        let report = RunReport {
            completed_at: Utc::now(),
            outcomes: indexed.into_iter().map(|(_, o)| o).collect(),
        };
        log::info!(
            "Processed {}/{} calendars successfully ({} events dropped)",
            report.succeeded(),
            total,
            report.dropped_events()
        );
        report
    }
}
