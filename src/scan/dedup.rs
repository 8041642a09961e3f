//! # Scan Deduplication Guard
//!
//! Suppresses accidental double-reads from handheld scanners. Hardware
//! scanners and camera-based scanning both tend to fire the same barcode two
//! or three times in quick succession while the operator holds the device
//! steady; the guard treats a repeat of the immediately prior identifier
//! within a short window as noise rather than a new count event.
//!
//! ## Behavior
//!
//! - **Single record**: only the most recent accepted scan is retained
//! - **Windowed**: repeats at or past the window boundary count as new scans
//! - **Read-only checks**: `check` never mutates the retained record
//! - **Session scoped**: `reset` clears history when the operator switches
//!   count sessions
//!
//! ## Usage
//!
//! ```rust
//! use stocktake::scan::ScanDeduplicator;
//!
//! let mut guard = ScanDeduplicator::new();
//!
//! let verdict = guard.check("4006381333931");
//! if !verdict.is_duplicate {
//!     guard.record("4006381333931");
//!     // forward the scan to the offline queue...
//! }
//! ```
//!
//! The guard is owned by the host's scan flow and called synchronously
//! before any async work begins. It holds no locks and performs no I/O.

use std::time::{Duration, Instant};

/// Default re-scan suppression window.
pub const DEFAULT_DUPLICATE_WINDOW: Duration = Duration::from_millis(3000);

/// The most recent accepted scan.
#[derive(Debug, Clone)]
struct ScanRecord {
    identifier: String,
    observed_at: Instant,
}

/// Outcome of a duplicate check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateCheck {
    /// Whether the identifier is a repeat inside the window
    pub is_duplicate: bool,
    /// Human-readable explanation, present only for duplicates
    pub reason: Option<String>,
}

impl DuplicateCheck {
    fn unique() -> Self {
        Self {
            is_duplicate: false,
            reason: None,
        }
    }

    fn duplicate(reason: String) -> Self {
        Self {
            is_duplicate: true,
            reason: Some(reason),
        }
    }
}

/// Duplicate-scan guard retaining at most one prior scan.
#[derive(Debug)]
pub struct ScanDeduplicator {
    window: Duration,
    last_scan: Option<ScanRecord>,
}

impl ScanDeduplicator {
    /// Create a guard with the default 3-second window.
    pub fn new() -> Self {
        Self::with_window(DEFAULT_DUPLICATE_WINDOW)
    }

    /// Create a guard with a custom suppression window.
    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            last_scan: None,
        }
    }

    /// Check whether `identifier` repeats the immediately prior scan within
    /// the window. Does not mutate the retained record. Empty identifiers
    /// are compared like any other.
    pub fn check(&self, identifier: &str) -> DuplicateCheck {
        self.check_at(identifier, Instant::now())
    }

    /// Record an accepted scan, overwriting any retained record.
    pub fn record(&mut self, identifier: &str) {
        self.record_at(identifier, Instant::now());
    }

    /// Clear the retained record. Called when the operator switches count
    /// sessions, so the first scan of the new session is never suppressed.
    pub fn reset(&mut self) {
        self.last_scan = None;
    }

    /// The configured suppression window.
    pub fn window(&self) -> Duration {
        self.window
    }

    fn check_at(&self, identifier: &str, now: Instant) -> DuplicateCheck {
        let Some(last) = &self.last_scan else {
            return DuplicateCheck::unique();
        };

        if last.identifier != identifier {
            return DuplicateCheck::unique();
        }

        let elapsed = now.duration_since(last.observed_at);
        // Boundary is exclusive: elapsed exactly at the window is a new scan.
        if elapsed < self.window {
            DuplicateCheck::duplicate(format!(
                "barcode \"{}\" was accepted {:.1}s ago, inside the {} re-scan window",
                identifier,
                elapsed.as_secs_f64(),
                window_label(self.window),
            ))
        } else {
            DuplicateCheck::unique()
        }
    }

    fn record_at(&mut self, identifier: &str, now: Instant) {
        self.last_scan = Some(ScanRecord {
            identifier: identifier.to_string(),
            observed_at: now,
        });
    }
}

impl Default for ScanDeduplicator {
    fn default() -> Self {
        Self::new()
    }
}

fn window_label(window: Duration) -> String {
    if window.subsec_nanos() == 0 {
        format!("{}s", window.as_secs())
    } else {
        format!("{:.1}s", window.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_scan_is_never_duplicate() {
        let guard = ScanDeduplicator::new();
        let verdict = guard.check("8712345678906");
        assert!(!verdict.is_duplicate);
        assert!(verdict.reason.is_none());
    }

    #[test]
    fn test_immediate_repeat_is_duplicate() {
        let mut guard = ScanDeduplicator::new();
        guard.record("8712345678906");
        assert!(guard.check("8712345678906").is_duplicate);
    }

    #[test]
    fn test_different_identifier_is_never_duplicate() {
        let mut guard = ScanDeduplicator::new();
        let t0 = Instant::now();
        guard.record_at("A", t0);

        // Regardless of elapsed time, a different code is a new scan.
        assert!(!guard.check_at("B", t0).is_duplicate);
        assert!(!guard.check_at("B", t0 + Duration::from_millis(1)).is_duplicate);
        assert!(!guard.check_at("B", t0 + Duration::from_secs(60)).is_duplicate);
    }

    #[test]
    fn test_window_boundary_is_exclusive() {
        let mut guard = ScanDeduplicator::new();
        let t0 = Instant::now();
        guard.record_at("A", t0);

        assert!(guard.check_at("A", t0 + Duration::from_millis(2999)).is_duplicate);
        assert!(!guard.check_at("A", t0 + Duration::from_millis(3000)).is_duplicate);
        assert!(!guard.check_at("A", t0 + Duration::from_millis(3001)).is_duplicate);
    }

    #[test]
    fn test_reason_rounds_elapsed_to_one_decimal() {
        let mut guard = ScanDeduplicator::new();
        let t0 = Instant::now();
        guard.record_at("A", t0);

        let verdict = guard.check_at("A", t0 + Duration::from_millis(1234));
        let reason = verdict.reason.expect("duplicate carries a reason");
        assert!(reason.contains("1.2s"), "reason was: {}", reason);
        // The window itself is part of the message.
        assert!(reason.contains("3s"), "reason was: {}", reason);
    }

    #[test]
    fn test_reason_near_window_rounds_up() {
        let mut guard = ScanDeduplicator::new();
        let t0 = Instant::now();
        guard.record_at("A", t0);

        let verdict = guard.check_at("A", t0 + Duration::from_millis(2999));
        let reason = verdict.reason.expect("duplicate carries a reason");
        assert!(reason.contains("3.0s"), "reason was: {}", reason);
    }

    #[test]
    fn test_check_does_not_mutate_history() {
        let mut guard = ScanDeduplicator::new();
        let t0 = Instant::now();
        guard.record_at("A", t0);

        // A rejected duplicate must not refresh the retained timestamp.
        let mid = t0 + Duration::from_millis(2000);
        assert!(guard.check_at("A", mid).is_duplicate);
        assert!(!guard.check_at("A", t0 + Duration::from_millis(3000)).is_duplicate);
    }

    #[test]
    fn test_record_overwrites_prior_scan() {
        let mut guard = ScanDeduplicator::new();
        let t0 = Instant::now();
        guard.record_at("A", t0);
        guard.record_at("B", t0 + Duration::from_millis(10));

        assert!(!guard.check_at("A", t0 + Duration::from_millis(20)).is_duplicate);
        assert!(guard.check_at("B", t0 + Duration::from_millis(20)).is_duplicate);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut guard = ScanDeduplicator::new();
        guard.record("A");
        guard.reset();
        assert!(!guard.check("A").is_duplicate);
    }

    #[test]
    fn test_empty_identifier_is_comparable() {
        let mut guard = ScanDeduplicator::new();
        guard.record("");
        assert!(guard.check("").is_duplicate);
        assert!(!guard.check("A").is_duplicate);
    }

    #[test]
    fn test_window_reports_configured_duration() {
        assert_eq!(ScanDeduplicator::new().window(), DEFAULT_DUPLICATE_WINDOW);
        assert_eq!(
            ScanDeduplicator::with_window(Duration::from_millis(1500)).window(),
            Duration::from_millis(1500)
        );
    }

    #[test]
    fn test_custom_window_label() {
        let mut guard = ScanDeduplicator::with_window(Duration::from_millis(1500));
        let t0 = Instant::now();
        guard.record_at("A", t0);

        let verdict = guard.check_at("A", t0 + Duration::from_millis(100));
        let reason = verdict.reason.expect("duplicate carries a reason");
        assert!(reason.contains("1.5s"), "reason was: {}", reason);
    }
}
