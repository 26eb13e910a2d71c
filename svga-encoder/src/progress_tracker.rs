//! Progress tracking with ETA estimation

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Thread-safe progress tracker with ETA estimation
pub struct ProgressTracker {
    total: u64,
    processed: AtomicU64,
    start_time: Instant,
    label: String,
}

impl ProgressTracker {
    /// Creates a new progress tracker
    pub fn new(total: u64, label: &str) -> Self {
        Self {
            total,
            processed: AtomicU64::new(0),
            start_time: Instant::now(),
            label: label.to_string(),
        }
    }

    /// Number of items processed so far
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    /// Increments the processed count by one and logs progress every
    /// `report_interval` items and on completion
    pub fn increment_and_report(&self, report_interval: u64) {
        let current = self.processed.fetch_add(1, Ordering::Relaxed) + 1;
        if current % report_interval.max(1) == 0 || current == self.total {
            self.report(current);
        }
    }

    fn report(&self, current: u64) {
        let elapsed_secs = self.start_time.elapsed().as_secs_f64();

        if current < self.total {
            let rate = current as f64 / elapsed_secs.max(f64::EPSILON);
            let remaining = (self.total - current) as f64 / rate;
            tracing::info!(
                "{} {}/{} ({:.1}%) - elapsed: {} - ETA: {}",
                self.label,
                current,
                self.total,
                percent(current, self.total),
                format_duration(elapsed_secs),
                format_duration(remaining),
            );
        } else {
            tracing::info!(
                "{} {}/{} (100.0%) - completed in {}",
                self.label,
                current,
                self.total,
                format_duration(elapsed_secs),
            );
        }
    }
}

fn percent(current: u64, total: u64) -> f64 {
    if total > 0 {
        (current as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// Formats seconds into a human-readable duration string
fn format_duration(secs: f64) -> String {
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else if secs < 3600.0 {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{}m {:.0}s", mins, remaining)
    } else {
        let hours = (secs / 3600.0).floor() as u64;
        let remaining = secs - (hours as f64 * 3600.0);
        let mins = (remaining / 60.0).floor() as u64;
        let remaining_secs = remaining - (mins as f64 * 60.0);
        format!("{}h {}m {:.0}s", hours, mins, remaining_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(4.34), "4.3s");
        assert_eq!(format_duration(125.0), "2m 5s");
        assert_eq!(format_duration(3725.0), "1h 2m 5s");
    }

    #[test]
    fn test_counts_across_threads() {
        let tracker = ProgressTracker::new(8, "Re-encoding");
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    tracker.increment_and_report(3);
                    tracker.increment_and_report(3);
                });
            }
        });
        assert_eq!(tracker.processed(), 8);
        assert_eq!(percent(2, 8), 25.0);
    }
}
