//! Main collector that combines the CPU sampler, system collector and process registry.
//!
//! The `Collector` struct provides a unified interface for running one refresh
//! cycle and getting back a `SystemSnapshot`.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::collector::config::CollectorConfig;
use crate::collector::error::CollectError;
use crate::collector::procfs::{CpuSampler, ProcessRegistry, SystemCollector, UserTable};
use crate::collector::source::{KernelSource, Resource};
use crate::collector::traits::FileSystem;
use crate::model::SystemSnapshot;

/// Timing information for each collector phase.
///
/// Used for debugging and performance monitoring.
#[derive(Debug, Clone, Default)]
pub struct CollectorTiming {
    /// Total snapshot collection time.
    pub total: Duration,
    /// Time to sample CPU counters.
    pub cpu: Duration,
    /// Time to collect memory info.
    pub memory: Duration,
    /// Time to collect uptime, process counters, kernel and OS names.
    pub system: Duration,
    /// Time to refresh the process registry.
    pub processes: Duration,
}

/// Logs a degraded metric and falls back to its default.
fn or_default<T: Default>(result: Result<T, CollectError>, metric: &str) -> T {
    result.unwrap_or_else(|e| {
        debug!(metric, error = %e, "metric unavailable, using default");
        T::default()
    })
}

/// Runs refresh cycles and assembles snapshots.
pub struct Collector<F: FileSystem + Clone> {
    config: CollectorConfig,
    cpu_sampler: CpuSampler<F>,
    system_collector: SystemCollector<F>,
    process_registry: ProcessRegistry<F>,
    user_table: UserTable,
    /// Timing information from the last collect_snapshot call.
    last_timing: Option<CollectorTiming>,
}

impl<F: FileSystem + Clone> Collector<F> {
    /// Creates a new collector.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc_path` - Base path to proc filesystem (usually "/proc")
    pub fn new(fs: F, proc_path: impl Into<std::path::PathBuf>) -> Self {
        Self::with_config(fs, CollectorConfig::new(proc_path))
    }

    /// Creates a collector from a full configuration.
    ///
    /// The user table is loaded from the configured passwd file; if it cannot
    /// be read every uid resolves to its number. CPU counters are captured
    /// here, so the first snapshot covers the time since construction.
    pub fn with_config(fs: F, config: CollectorConfig) -> Self {
        let source = KernelSource::new(fs, &config);

        let user_table = match source.read_to_string(&Resource::Passwd) {
            Ok(content) => UserTable::from_passwd(&content),
            Err(e) => {
                debug!(error = %e, "user table not loaded");
                UserTable::new()
            }
        };

        Self {
            cpu_sampler: CpuSampler::new(source.clone()),
            system_collector: SystemCollector::new(source.clone()),
            process_registry: ProcessRegistry::new(source),
            user_table,
            config,
            last_timing: None,
        }
    }

    /// Replaces the uid -> name table.
    pub fn with_user_table(mut self, user_table: UserTable) -> Self {
        self.user_table = user_table;
        self
    }

    pub fn user_table(&self) -> &UserTable {
        &self.user_table
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Number of per-core entries in every snapshot.
    pub fn core_count(&self) -> usize {
        self.cpu_sampler.core_count()
    }

    /// Returns timing information from the last collect_snapshot call.
    pub fn last_timing(&self) -> Option<&CollectorTiming> {
        self.last_timing.as_ref()
    }

    /// Runs one refresh cycle.
    ///
    /// Individual metrics that cannot be read fall back to 0 or an empty
    /// string. Only a failure to list processes aborts the cycle.
    pub fn collect_snapshot(&mut self) -> Result<SystemSnapshot, CollectError> {
        let total_start = Instant::now();
        let mut timing = CollectorTiming::default();
        let hz = self.config.clock_ticks;

        let start = Instant::now();
        let cpu = self.cpu_sampler.refresh();
        timing.cpu = start.elapsed();

        let start = Instant::now();
        let mem_percent = or_default(self.system_collector.collect_memory_percent(), "memory");
        timing.memory = start.elapsed();

        let start = Instant::now();
        let uptime = or_default(self.system_collector.collect_uptime(), "uptime");
        let total_processes = or_default(
            self.system_collector.collect_total_processes(),
            "total_processes",
        );
        let running_processes = or_default(
            self.system_collector.collect_running_processes(),
            "running_processes",
        );
        let kernel_version = or_default(
            self.system_collector.collect_kernel_version(),
            "kernel_version",
        );
        let os_name = or_default(self.system_collector.collect_os_name(), "os_name");
        timing.system = start.elapsed();

        let start = Instant::now();
        let uptime_ticks = (uptime * hz as f64).round() as u64;
        let processes = self
            .process_registry
            .refresh(uptime_ticks, hz, &self.user_table)?
            .to_vec();
        timing.processes = start.elapsed();

        let threads = processes.iter().map(|p| u64::from(p.threads)).sum();

        timing.total = total_start.elapsed();
        debug!(
            processes = processes.len(),
            total_ms = timing.total.as_millis() as u64,
            "snapshot collected"
        );
        self.last_timing = Some(timing);

        Ok(SystemSnapshot {
            timestamp: chrono::Utc::now().timestamp(),
            cpu,
            mem_percent,
            uptime_secs: uptime as u64,
            threads,
            total_processes,
            running_processes,
            os_name,
            kernel_version,
            processes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;

    #[test]
    fn test_collect_typical_system() {
        let fs = MockFs::typical_system();
        let mut collector = Collector::new(fs, "/proc");
        assert!(collector.user_table().is_loaded());
        assert_eq!(collector.core_count(), 4);

        let snapshot = collector.collect_snapshot().unwrap();

        assert!(snapshot.timestamp > 0);
        assert_eq!(snapshot.os_name, "Debian GNU/Linux 12 (bookworm)");
        assert_eq!(snapshot.kernel_version, "6.1.0-18-amd64");
        assert_eq!(snapshot.uptime_secs, 12345);
        assert_eq!(snapshot.total_processes, 10000);
        assert_eq!(snapshot.running_processes, 2);
        assert_eq!(snapshot.threads, 3);
        assert_eq!(snapshot.processes.len(), 3);
        assert_eq!(snapshot.core_count(), 4);
        // Nothing changed since construction.
        assert_eq!(snapshot.cpu.aggregate, 0.0);

        let expected_mem = 100.0 * (1.0 - 8192000.0 / (12000000.0 - 512000.0));
        assert!((snapshot.mem_percent - expected_mem).abs() < 1e-9);

        let timing = collector.last_timing().unwrap();
        assert!(timing.total >= timing.processes);
    }

    #[test]
    fn test_cpu_delta_between_cycles() {
        let fs = MockFs::typical_system();
        let mut collector = Collector::new(fs.clone(), "/proc");
        collector.collect_snapshot().unwrap();

        fs.add_file(
            "/proc/stat",
            "\
cpu  10100 500 3000 80100 1000 200 100 0 0 0
cpu0 2600 125 750 20000 250 50 25 0 0 0
cpu1 2500 125 750 20100 250 50 25 0 0 0
cpu2 2500 125 750 20000 250 50 25 0 0 0
cpu3 2500 125 750 20000 250 50 25 0 0 0
processes 10001
procs_running 1
",
        );
        let snapshot = collector.collect_snapshot().unwrap();

        assert!((snapshot.cpu.aggregate - 50.0).abs() < 1e-9);
        assert_eq!(snapshot.cpu.cores, vec![100.0, 0.0, 0.0, 0.0]);
        assert_eq!(snapshot.total_processes, 10001);
        assert_eq!(snapshot.running_processes, 1);
    }

    #[test]
    fn test_collect_minimal_system_defaults() {
        let fs = MockFs::minimal_system();
        let mut collector = Collector::new(fs, "/proc");
        assert!(!collector.user_table().is_loaded());

        let snapshot = collector.collect_snapshot().unwrap();

        assert_eq!(snapshot.os_name, "");
        assert_eq!(snapshot.kernel_version, "");
        assert_eq!(snapshot.uptime_secs, 60);
        assert_eq!(snapshot.threads, 0);
        assert!(snapshot.processes.is_empty());
        assert_eq!(snapshot.core_count(), 1);
        assert!((snapshot.mem_percent - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_metrics_default_independently() {
        let fs = MockFs::typical_system();
        fs.remove_file("/proc/meminfo");
        fs.remove_file("/proc/uptime");
        let mut collector = Collector::new(fs, "/proc");

        let snapshot = collector.collect_snapshot().unwrap();

        assert_eq!(snapshot.mem_percent, 0.0);
        assert_eq!(snapshot.uptime_secs, 0);
        assert_eq!(snapshot.kernel_version, "6.1.0-18-amd64");
        assert_eq!(snapshot.processes.len(), 3);
        // Without uptime no process has elapsed time.
        assert!(snapshot.processes.iter().all(|p| p.cpu_percent == 0.0));
    }

    #[test]
    fn test_enumeration_failure_aborts_cycle() {
        let fs = MockFs::typical_system();
        let mut collector = Collector::new(fs.clone(), "/proc");

        fs.remove_dir("/proc");
        let result = collector.collect_snapshot();
        assert!(matches!(result, Err(CollectError::Enumeration(_))));
    }

    #[test]
    fn test_custom_user_table_and_clock_ticks() {
        let fs = MockFs::typical_system();
        let config = CollectorConfig::default().with_clock_ticks(1000);
        let users: UserTable = [(1000, "alice")].into_iter().collect();
        let mut collector = Collector::with_config(fs, config).with_user_table(users);
        assert_eq!(collector.config().clock_ticks, 1000);

        let snapshot = collector.collect_snapshot().unwrap();
        let bash = snapshot
            .processes
            .iter()
            .find(|p| p.pid.as_str() == "1000")
            .unwrap();
        assert_eq!(bash.user, "alice");
        // starttime 100000 ticks at 1000 Hz is 100 s after boot.
        assert!((bash.uptime_secs - 12245.67).abs() < 1e-6);

        let init = &snapshot.processes[0];
        assert_eq!(init.user, "0");
    }
}
