//! Throughput counters and remaining time projection.
use std::fmt;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::info;

#[derive(Debug, Default, Clone, Copy)]
struct Counts {
    files: u64,
    records: u64,
    bytes: u64,
    projections: u64,
}

/// Point-in-time view of a [Progress].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub files: u64,
    pub records: u64,
    pub bytes: u64,
    pub elapsed: Duration,
}

/// Rates and linear projection of the time needed to reach a target record count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub files: u64,
    pub records: u64,
    pub elapsed: Duration,
    pub files_per_sec: f64,
    pub records_per_sec: f64,
    pub bytes_per_sec: f64,
    pub target_records: u64,
    pub remaining_secs: f64,
}

impl Snapshot {
    /// Project the remaining time to reach `target_records`.
    ///
    /// Returns `None` when no time has elapsed, or when nothing has been read yet.
    pub fn project(&self, target_records: u64) -> Option<Projection> {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return None;
        }
        let records_per_sec = self.records as f64 / secs;
        if records_per_sec <= 0.0 {
            return None;
        }
        let remaining = target_records.saturating_sub(self.records) as f64;

        Some(Projection {
            files: self.files,
            records: self.records,
            elapsed: self.elapsed,
            files_per_sec: self.files as f64 / secs,
            records_per_sec,
            bytes_per_sec: self.bytes as f64 / secs,
            target_records,
            remaining_secs: remaining / records_per_sec,
        })
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.remaining_secs / 3600.0;
        write!(
            f,
            "{} chunks, {} records in {:.3} seconds --> {:.3} chunks/sec, {:.3} records/sec, {:.3} MB/sec --> {:.1} hours ({:.1} days) remaining for {} records",
            self.files,
            self.records,
            self.elapsed.as_secs_f64(),
            self.files_per_sec,
            self.records_per_sec,
            self.bytes_per_sec / 1_000_000.0,
            hours,
            hours / 24.0,
            self.target_records,
        )
    }
}

/// Aggregate counters, shareable between threads.
#[derive(Debug)]
pub struct Progress {
    start: Instant,
    report_every: u64,
    target_records: u64,
    counts: Mutex<Counts>,
}

impl Progress {
    pub fn new(report_every: u64, target_records: u64) -> Self {
        Self::with_start(Instant::now(), report_every, target_records)
    }

    pub fn with_start(start: Instant, report_every: u64, target_records: u64) -> Self {
        Self {
            start,
            report_every,
            target_records,
            counts: Mutex::new(Counts::default()),
        }
    }

    // counters stay meaningful even if a holder panicked
    fn counts(&self) -> MutexGuard<'_, Counts> {
        self.counts.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Account for a newly opened file of `bytes` bytes.
    pub fn add_file(&self, bytes: u64) {
        let mut counts = self.counts();
        counts.files += 1;
        counts.bytes += bytes;
    }

    /// Account for one record read now. See [Self::record_at].
    pub fn record(&self) -> Option<Projection> {
        self.record_at(Instant::now())
    }

    /// Account for one record read at `now`.
    ///
    /// Every `report_every` records a projection is computed, logged and returned,
    /// unless no time has elapsed since the start.
    pub fn record_at(&self, now: Instant) -> Option<Projection> {
        let mut counts = self.counts();
        counts.records += 1;
        if self.report_every == 0 || counts.records % self.report_every != 0 {
            return None;
        }

        let projection = Self::snapshot_of(&counts, now.saturating_duration_since(self.start))
            .project(self.target_records)?;
        counts.projections += 1;
        drop(counts);

        info!("{}", projection);
        Some(projection)
    }

    fn snapshot_of(counts: &Counts, elapsed: Duration) -> Snapshot {
        Snapshot {
            files: counts.files,
            records: counts.records,
            bytes: counts.bytes,
            elapsed,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Self::snapshot_of(&self.counts(), self.start.elapsed())
    }

    /// Number of projections emitted so far.
    pub fn projections(&self) -> u64 {
        self.counts().projections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_elapsed_has_no_projection() {
        let snap = Snapshot {
            files: 1,
            records: 100,
            bytes: 10,
            elapsed: Duration::ZERO,
        };
        assert!(snap.project(1000).is_none());
    }

    #[test]
    fn linear_projection() {
        let snap = Snapshot {
            files: 2,
            records: 100,
            bytes: 4_000_000,
            elapsed: Duration::from_secs(2),
        };
        let p = snap.project(1000).unwrap();
        assert_eq!(p.records_per_sec, 50.0);
        assert_eq!(p.files_per_sec, 1.0);
        assert_eq!(p.bytes_per_sec, 2_000_000.0);
        assert_eq!(p.remaining_secs, 18.0);
    }

    #[test]
    fn target_already_reached() {
        let snap = Snapshot {
            files: 1,
            records: 10,
            bytes: 0,
            elapsed: Duration::from_secs(1),
        };
        assert_eq!(snap.project(5).unwrap().remaining_secs, 0.0);
    }

    #[test]
    fn cadence() {
        let start = Instant::now();
        let progress = Progress::with_start(start, 3, 100);
        progress.add_file(10);
        let later = start + Duration::from_secs(1);

        assert!(progress.record_at(later).is_none());
        assert!(progress.record_at(later).is_none());
        let p = progress.record_at(later).unwrap();
        assert_eq!(p.records, 3);
        assert_eq!(p.records_per_sec, 3.0);
        assert_eq!(progress.projections(), 1);
    }

    #[test]
    fn cadence_skips_zero_elapsed() {
        let start = Instant::now();
        let progress = Progress::with_start(start, 1, 100);
        assert!(progress.record_at(start).is_none());
        assert_eq!(progress.projections(), 0);
        assert!(progress.record_at(start + Duration::from_millis(5)).is_some());
        assert_eq!(progress.snapshot().records, 2);
    }
}
