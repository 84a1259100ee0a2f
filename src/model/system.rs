//! System-wide metrics assembled once per refresh cycle.

use serde::{Deserialize, Serialize};

use super::process::ProcessRecord;

/// CPU utilization for one cycle.
///
/// Source: two consecutive reads of `/proc/stat`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct CpuUsage {
    /// Utilization of the aggregate `cpu` line, in percent.
    pub aggregate: f64,

    /// Utilization of each `cpuN` line, indexed by core number.
    /// The length is fixed when the sampler is constructed.
    pub cores: Vec<f64>,
}

/// Read-only view of one refresh cycle.
///
/// A snapshot is never mutated after it is built; the next cycle produces a
/// new one that replaces it as a whole.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct SystemSnapshot {
    /// Unix timestamp (seconds) at which the cycle finished.
    pub timestamp: i64,

    /// Aggregate and per-core CPU utilization.
    pub cpu: CpuUsage,

    /// Memory utilization in percent.
    /// Source: `/proc/meminfo` (MemAvailable, MemFree, Buffers)
    pub mem_percent: f64,

    /// Seconds since boot.
    /// Source: `/proc/uptime` first field
    pub uptime_secs: u64,

    /// Sum of `Threads:` over all tracked processes.
    pub threads: u64,

    /// Processes created since boot.
    /// Source: `/proc/stat` (processes)
    pub total_processes: u64,

    /// Processes currently runnable.
    /// Source: `/proc/stat` (procs_running)
    pub running_processes: u64,

    /// Distribution name.
    /// Source: `/etc/os-release` (PRETTY_NAME)
    pub os_name: String,

    /// Kernel release.
    /// Source: `/proc/version` third field
    pub kernel_version: String,

    /// Processes observed in this cycle, ordered by pid.
    pub processes: Vec<ProcessRecord>,
}

impl SystemSnapshot {
    /// Returns the number of online cores reported in this snapshot.
    pub fn core_count(&self) -> usize {
        self.cpu.cores.len()
    }

    /// Returns up to `n` processes with the highest CPU utilization.
    pub fn top_by_cpu(&self, n: usize) -> Vec<&ProcessRecord> {
        let mut sorted: Vec<&ProcessRecord> = self.processes.iter().collect();
        sorted.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent));
        sorted.truncate(n);
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Pid;

    fn record(pid: u32, cpu_percent: f64) -> ProcessRecord {
        ProcessRecord {
            pid: Pid::from(pid),
            cpu_percent,
            ..ProcessRecord::default()
        }
    }

    #[test]
    fn test_top_by_cpu() {
        let snapshot = SystemSnapshot {
            processes: vec![record(1, 0.5), record(2, 75.0), record(3, 12.0)],
            ..SystemSnapshot::default()
        };

        let top = snapshot.top_by_cpu(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].pid.as_str(), "2");
        assert_eq!(top[1].pid.as_str(), "3");
    }

    #[test]
    fn test_top_by_cpu_more_than_available() {
        let snapshot = SystemSnapshot {
            processes: vec![record(1, 0.5)],
            ..SystemSnapshot::default()
        };
        assert_eq!(snapshot.top_by_cpu(10).len(), 1);
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let snapshot = SystemSnapshot {
            cpu: CpuUsage {
                aggregate: 50.0,
                cores: vec![25.0, 75.0],
            },
            processes: vec![record(42, 1.0)],
            ..SystemSnapshot::default()
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["cpu"]["aggregate"], 50.0);
        assert_eq!(json["processes"][0]["pid"], "42");
        assert_eq!(snapshot.core_count(), 2);
    }
}
