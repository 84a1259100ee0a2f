//! CPU utilization from consecutive `/proc/stat` samples.

use tracing::{debug, warn};

use super::parser::{CounterSnapshot, count_cpu_cores, parse_cpu_line};
use crate::collector::error::CollectError;
use crate::collector::source::{KernelSource, Resource};
use crate::collector::traits::FileSystem;
use crate::model::CpuUsage;

/// Utilization between two snapshots of the same cpu line, in percent.
///
/// Returns 0 when no time elapsed between the snapshots. The result is not
/// clamped.
pub fn percent_from_delta(prev: &CounterSnapshot, curr: &CounterSnapshot) -> f64 {
    let delta = curr.saturating_delta(prev);
    let active = delta.active();
    let total = active.saturating_add(delta.idle_total());
    if total == 0 {
        return 0.0;
    }
    100.0 * active as f64 / total as f64
}

fn core_key(index: usize) -> String {
    format!("cpu{} ", index)
}

const AGGREGATE_KEY: &str = "cpu ";

/// Keeps the previous snapshot of every cpu line and turns each new sample
/// into a percentage.
///
/// The number of cores is fixed at construction. Cores that come online later
/// are ignored; cores that go offline report 0.
pub struct CpuSampler<F: FileSystem> {
    source: KernelSource<F>,
    previous: CounterSnapshot,
    previous_cores: Vec<CounterSnapshot>,
}

impl<F: FileSystem> CpuSampler<F> {
    /// Creates a sampler and captures the initial snapshots, so the first
    /// [`refresh`](Self::refresh) covers the time since construction.
    pub fn new(source: KernelSource<F>) -> Self {
        let lines = match source.read_lines(&Resource::SystemStat) {
            Ok(lines) => lines,
            Err(e) => {
                warn!(error = %e, "cannot read cpu counters, sampling no cores");
                Vec::new()
            }
        };

        let core_count = count_cpu_cores(&lines);
        let previous = parse_cpu_line(&lines, AGGREGATE_KEY).unwrap_or_default();
        let previous_cores = (0..core_count)
            .map(|i| parse_cpu_line(&lines, &core_key(i)).unwrap_or_default())
            .collect();

        debug!(cores = core_count, "cpu sampler initialized");

        Self {
            source,
            previous,
            previous_cores,
        }
    }

    /// Number of per-core entries every refresh reports.
    pub fn core_count(&self) -> usize {
        self.previous_cores.len()
    }

    /// Reads the current aggregate counters without touching the stored state.
    pub fn capture_aggregate(&self) -> Result<CounterSnapshot, CollectError> {
        let lines = self.source.read_lines(&Resource::SystemStat)?;
        Ok(parse_cpu_line(&lines, AGGREGATE_KEY)?)
    }

    /// Reads the current counters of core `index` without touching the stored state.
    pub fn capture_core(&self, index: usize) -> Result<CounterSnapshot, CollectError> {
        let lines = self.source.read_lines(&Resource::SystemStat)?;
        Ok(parse_cpu_line(&lines, &core_key(index))?)
    }

    /// Samples every cpu line once and returns utilization since the previous sample.
    ///
    /// A line that cannot be read reports 0 and keeps its previous snapshot, so
    /// the next successful sample spans the gap.
    pub fn refresh(&mut self) -> CpuUsage {
        let lines = match self.source.read_lines(&Resource::SystemStat) {
            Ok(lines) => lines,
            Err(e) => {
                debug!(error = %e, "cpu counters unavailable");
                return CpuUsage {
                    aggregate: 0.0,
                    cores: vec![0.0; self.core_count()],
                };
            }
        };

        let aggregate = Self::advance(&mut self.previous, &lines, AGGREGATE_KEY);
        let cores = self
            .previous_cores
            .iter_mut()
            .enumerate()
            .map(|(i, previous)| Self::advance(previous, &lines, &core_key(i)))
            .collect();

        CpuUsage { aggregate, cores }
    }

    fn advance(previous: &mut CounterSnapshot, lines: &[String], key: &str) -> f64 {
        match parse_cpu_line(lines, key) {
            Ok(current) => {
                let percent = percent_from_delta(previous, &current);
                *previous = current;
                percent
            }
            Err(e) => {
                debug!(line = key.trim_end(), error = %e, "cpu line unavailable");
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::config::CollectorConfig;
    use crate::collector::mock::MockFs;

    fn snapshot(user: u64, system: u64, idle: u64) -> CounterSnapshot {
        CounterSnapshot {
            user,
            system,
            idle,
            ..Default::default()
        }
    }

    fn sampler(fs: &MockFs) -> CpuSampler<MockFs> {
        CpuSampler::new(KernelSource::new(fs.clone(), &CollectorConfig::default()))
    }

    #[test]
    fn test_percent_half_busy() {
        let prev = snapshot(100, 0, 100);
        let curr = snapshot(150, 0, 150);
        assert!((percent_from_delta(&prev, &curr) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_percent_zero_delta() {
        let s = snapshot(100, 50, 800);
        assert_eq!(percent_from_delta(&s, &s), 0.0);
        assert_eq!(
            percent_from_delta(&CounterSnapshot::default(), &CounterSnapshot::default()),
            0.0
        );
    }

    #[test]
    fn test_percent_counter_regression_is_zero_delta() {
        let prev = snapshot(500, 100, 1000);
        let curr = snapshot(100, 50, 900);
        assert_eq!(percent_from_delta(&prev, &curr), 0.0);
    }

    #[test]
    fn test_percent_near_counter_limit() {
        let curr = CounterSnapshot {
            user: u64::MAX,
            system: 1,
            ..Default::default()
        };
        let percent = percent_from_delta(&CounterSnapshot::default(), &curr);
        assert!((percent - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_percent_is_deterministic() {
        let prev = snapshot(1234, 321, 9000);
        let curr = snapshot(1500, 400, 9500);
        assert_eq!(
            percent_from_delta(&prev, &curr),
            percent_from_delta(&prev, &curr)
        );
    }

    #[test]
    fn test_iowait_counts_as_idle() {
        let prev = CounterSnapshot::default();
        let curr = CounterSnapshot {
            user: 25,
            iowait: 75,
            ..Default::default()
        };
        assert!((percent_from_delta(&prev, &curr) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_first_refresh_covers_time_since_construction() {
        let fs = MockFs::new();
        fs.add_file("/proc/stat", "cpu  100 0 0 100\ncpu0 100 0 0 100\n");
        let mut sampler = sampler(&fs);
        assert_eq!(sampler.core_count(), 1);

        fs.add_file("/proc/stat", "cpu  150 0 0 150\ncpu0 200 0 0 100\n");
        let usage = sampler.refresh();
        assert!((usage.aggregate - 50.0).abs() < 1e-9);
        assert_eq!(usage.cores.len(), 1);
        assert!((usage.cores[0] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_immediate_refresh_is_zero() {
        let fs = MockFs::typical_system();
        let mut sampler = sampler(&fs);

        let usage = sampler.refresh();
        assert_eq!(usage.aggregate, 0.0);
        assert!(usage.cores.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_core_count_fixed_at_construction() {
        let fs = MockFs::new();
        fs.add_file("/proc/stat", "cpu  0 0 0 0\ncpu0 0 0 0 0\ncpu1 0 0 0 0\n");
        let mut sampler = sampler(&fs);

        // Core 1 goes offline, core 2 appears.
        fs.add_file(
            "/proc/stat",
            "cpu  10 0 0 10\ncpu0 10 0 0 10\ncpu2 10 0 0 10\n",
        );
        let usage = sampler.refresh();
        assert_eq!(usage.cores.len(), 2);
        assert!((usage.cores[0] - 50.0).abs() < 1e-9);
        assert_eq!(usage.cores[1], 0.0);
    }

    #[test]
    fn test_missing_line_keeps_previous_snapshot() {
        let fs = MockFs::new();
        fs.add_file("/proc/stat", "cpu  0 0 0 0\ncpu0 0 0 0 0\n");
        let mut sampler = sampler(&fs);

        fs.add_file("/proc/stat", "cpu  10 0 0 10\n");
        assert_eq!(sampler.refresh().cores[0], 0.0);

        fs.add_file("/proc/stat", "cpu  20 0 0 20\ncpu0 30 0 0 10\n");
        let usage = sampler.refresh();
        assert!((usage.cores[0] - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_unreadable_stat() {
        let fs = MockFs::new();
        fs.add_file("/proc/stat", "cpu  0 0 0 0\ncpu0 0 0 0 0\ncpu1 0 0 0 0\n");
        let mut sampler = sampler(&fs);

        fs.remove_file("/proc/stat");
        let usage = sampler.refresh();
        assert_eq!(usage.aggregate, 0.0);
        assert_eq!(usage.cores, vec![0.0, 0.0]);
        assert!(sampler.capture_aggregate().is_err());
    }

    #[test]
    fn test_capture_does_not_advance_state() {
        let fs = MockFs::new();
        fs.add_file("/proc/stat", "cpu  0 0 0 0\ncpu0 0 0 0 0\n");
        let mut sampler = sampler(&fs);

        fs.add_file("/proc/stat", "cpu  30 0 0 10\ncpu0 30 0 0 10\n");
        assert_eq!(sampler.capture_aggregate().unwrap().user, 30);
        assert_eq!(sampler.capture_core(0).unwrap().idle, 10);
        assert!(sampler.capture_core(5).is_err());

        assert!((sampler.refresh().aggregate - 75.0).abs() < 1e-9);
    }
}
