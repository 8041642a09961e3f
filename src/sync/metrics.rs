//! # Sync Metrics
//!
//! Counters and timing for sync cycles, kept in memory for diagnostics.

use std::time::{Duration, Instant};

/// Aggregated statistics over all sync cycles since startup.
#[derive(Debug, Clone, Default)]
pub struct SyncMetrics {
    /// Cycles started
    pub total_cycles: u64,
    /// Cycles that ran to completion
    pub completed_cycles: u64,
    /// Cycles aborted by a connectivity failure
    pub aborted_cycles: u64,
    /// Operations accepted by the backend across all cycles
    pub operations_synced: u64,
    /// Operations rejected by the backend across all cycles
    pub operations_rejected: u64,
    /// Duration of the most recent cycle
    pub last_cycle_duration: Option<Duration>,
    /// Rolling average over completed cycles
    pub average_cycle_duration: Duration,
    cycle_started_at: Option<Instant>,
}

impl SyncMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the start of a cycle.
    pub fn record_cycle_start(&mut self) {
        self.total_cycles += 1;
        self.cycle_started_at = Some(Instant::now());
    }

    /// Mark a cycle that ran through the whole queue.
    pub fn record_cycle_completed(&mut self, synced: u64, rejected: u64) {
        self.completed_cycles += 1;
        self.operations_synced += synced;
        self.operations_rejected += rejected;
        self.finish_cycle();
    }

    /// Mark a cycle cut short by an unreachable backend.
    pub fn record_cycle_aborted(&mut self, synced: u64, rejected: u64) {
        self.aborted_cycles += 1;
        self.operations_synced += synced;
        self.operations_rejected += rejected;
        self.finish_cycle();
    }

    fn finish_cycle(&mut self) {
        if let Some(started_at) = self.cycle_started_at.take() {
            let duration = started_at.elapsed();
            self.last_cycle_duration = Some(duration);

            let finished = self.completed_cycles + self.aborted_cycles;
            if finished <= 1 {
                self.average_cycle_duration = duration;
            } else {
                let prior = self.average_cycle_duration.as_millis() as u64;
                let averaged =
                    (prior * (finished - 1) + duration.as_millis() as u64) / finished;
                self.average_cycle_duration = Duration::from_millis(averaged);
            }
        }
    }

    /// Fraction of started cycles that completed, in `[0, 1]`.
    pub fn completion_rate(&self) -> f64 {
        if self.total_cycles == 0 {
            return 0.0;
        }
        self.completed_cycles as f64 / self.total_cycles as f64
    }
}
