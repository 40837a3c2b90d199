//! Scheduled jobs
//!
//! The status sweep drives the time-based event transitions in the
//! background: scheduled events whose start has passed go in-progress,
//! events whose end has passed complete. Cancellation is never part of
//! the sweep; it stays an explicit user action.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use std::time::Duration;
use tokio::time::interval;

use crate::repository::EventRepository;

/// Report from one sweep pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    /// Events evaluated against the transition rule
    pub scanned: usize,
    /// Events whose status actually changed
    pub updated: usize,
    /// Per-event failures; one bad row never blocks its siblings
    pub errors: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

/// Configuration for the sweep scheduler
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Interval between sweep passes (default: 5 minutes)
    pub sweep_interval: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(300),
        }
    }
}

/// Status sweep job - periodically applies due status transitions
pub struct SweepJob {
    events: EventRepository,
    config: SweepConfig,
}

impl SweepJob {
    pub fn new(pool: PgPool) -> Self {
        Self {
            events: EventRepository::new(pool),
            config: SweepConfig::default(),
        }
    }

    pub fn with_config(pool: PgPool, config: SweepConfig) -> Self {
        Self {
            events: EventRepository::new(pool),
            config,
        }
    }

    /// Start the sweep loop in the background.
    /// Returns a handle that can be used to abort the scheduler.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(&self) {
        tracing::info!(
            interval_secs = self.config.sweep_interval.as_secs(),
            "status sweep started"
        );

        let mut tick = interval(self.config.sweep_interval);
        loop {
            tick.tick().await;
            let report = self.run_once().await;
            if report.updated > 0 || !report.errors.is_empty() {
                tracing::info!(
                    scanned = report.scanned,
                    updated = report.updated,
                    errors = report.errors.len(),
                    "sweep pass finished"
                );
            }
        }
    }

    /// Run one sweep pass (also the manual-trigger path).
    ///
    /// Every event is evaluated independently: a write failure on one is
    /// recorded and the pass continues. Re-running a pass with no time
    /// change is a no-op because the transition rule is idempotent.
    pub async fn run_once(&self) -> SweepReport {
        let mut report = SweepReport::default();
        let now = Utc::now();

        let events = match self.events.list_all().await {
            Ok(events) => events,
            Err(e) => {
                report.errors.push(format!("event scan: {}", e));
                report.completed_at = Utc::now();
                return report;
            }
        };

        report.scanned = events.len();
        for event in &events {
            let Some(next) = event.due_transition(now) else {
                continue;
            };
            match self.events.update_status(event.id, next, now).await {
                Ok(()) => {
                    report.updated += 1;
                    tracing::info!(
                        event_id = %event.id,
                        from = %event.status,
                        to = %next,
                        "event status advanced"
                    );
                }
                Err(e) => report.errors.push(format!("event {}: {}", event.id, e)),
            }
        }

        report.completed_at = Utc::now();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_config_default() {
        let config = SweepConfig::default();
        assert_eq!(config.sweep_interval, Duration::from_secs(300));
    }

    #[test]
    fn test_sweep_report_default() {
        let report = SweepReport::default();
        assert_eq!(report.scanned, 0);
        assert_eq!(report.updated, 0);
        assert!(report.errors.is_empty());
    }
}
