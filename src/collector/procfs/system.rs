//! System collector for gathering global system metrics from `/proc/` and `/etc/`.

use crate::collector::error::CollectError;
use crate::collector::procfs::parser::{
    GlobalCounters, MemInfo, parse_global_counters, parse_kernel_version, parse_meminfo,
    parse_os_release, parse_uptime,
};
use crate::collector::source::{KernelSource, Resource};
use crate::collector::traits::FileSystem;

/// Memory utilization in percent: `100 * (1 - MemFree / (MemAvailable - Buffers))`.
///
/// Returns 0 when the denominator is not positive, which covers a meminfo
/// without `MemAvailable`.
pub fn memory_percent(info: &MemInfo) -> f64 {
    let usable = info.mem_available as f64 - info.buffers as f64;
    if usable <= 0.0 {
        return 0.0;
    }
    100.0 * (1.0 - info.mem_free as f64 / usable)
}

/// Collects system-wide metrics.
///
/// Every method reads its resource afresh; nothing is cached between calls.
pub struct SystemCollector<F: FileSystem> {
    source: KernelSource<F>,
}

impl<F: FileSystem> SystemCollector<F> {
    /// Creates a new system collector.
    pub fn new(source: KernelSource<F>) -> Self {
        Self { source }
    }

    /// Collects memory information from `/proc/meminfo`.
    pub fn collect_meminfo(&self) -> Result<MemInfo, CollectError> {
        let content = self.source.read_to_string(&Resource::MemInfo)?;
        Ok(parse_meminfo(&content))
    }

    /// Memory utilization in percent, see [`memory_percent`].
    pub fn collect_memory_percent(&self) -> Result<f64, CollectError> {
        Ok(memory_percent(&self.collect_meminfo()?))
    }

    /// Seconds since boot from `/proc/uptime`, with the fractional part.
    pub fn collect_uptime(&self) -> Result<f64, CollectError> {
        let content = self.source.read_to_string(&Resource::Uptime)?;
        Ok(parse_uptime(&content)?)
    }

    /// `processes` and `procs_running` from `/proc/stat`.
    pub fn collect_global_counters(&self) -> Result<GlobalCounters, CollectError> {
        let lines = self.source.read_lines(&Resource::SystemStat)?;
        Ok(parse_global_counters(&lines)?)
    }

    /// Processes created since boot.
    pub fn collect_total_processes(&self) -> Result<u64, CollectError> {
        Ok(self.collect_global_counters()?.processes)
    }

    /// Processes currently runnable.
    pub fn collect_running_processes(&self) -> Result<u64, CollectError> {
        Ok(self.collect_global_counters()?.procs_running)
    }

    /// Kernel release from `/proc/version`.
    pub fn collect_kernel_version(&self) -> Result<String, CollectError> {
        let content = self.source.read_to_string(&Resource::KernelVersion)?;
        Ok(parse_kernel_version(&content)?)
    }

    /// Distribution name from `/etc/os-release`.
    pub fn collect_os_name(&self) -> Result<String, CollectError> {
        let content = self.source.read_to_string(&Resource::OsRelease)?;
        Ok(parse_os_release(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::config::CollectorConfig;
    use crate::collector::mock::MockFs;

    fn collector(fs: &MockFs) -> SystemCollector<MockFs> {
        SystemCollector::new(KernelSource::new(fs.clone(), &CollectorConfig::default()))
    }

    #[test]
    fn test_memory_percent() {
        let info = MemInfo {
            mem_available: 1000,
            mem_free: 450,
            buffers: 100,
            ..Default::default()
        };
        assert!((memory_percent(&info) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_memory_percent_guard() {
        // Only MemFree and Buffers present.
        let info = MemInfo {
            mem_free: 1000,
            buffers: 100,
            ..Default::default()
        };
        assert_eq!(memory_percent(&info), 0.0);

        let info = MemInfo {
            mem_available: 100,
            buffers: 100,
            ..Default::default()
        };
        assert_eq!(memory_percent(&info), 0.0);
    }

    #[test]
    fn test_memory_percent_without_mem_available() {
        let fs = MockFs::new();
        fs.add_file(
            "/proc/meminfo",
            "MemTotal: 2000 kB\nMemFree: 1000 kB\nBuffers: 100 kB\n",
        );
        let collector = collector(&fs);

        assert_eq!(collector.collect_memory_percent().unwrap(), 0.0);
    }

    #[test]
    fn test_collect_typical_system() {
        let fs = MockFs::typical_system();
        let collector = collector(&fs);

        let expected = 100.0 * (1.0 - 8192000.0 / (12000000.0 - 512000.0));
        assert!((collector.collect_memory_percent().unwrap() - expected).abs() < 1e-9);
        assert!((collector.collect_uptime().unwrap() - 12345.67).abs() < 1e-9);
        assert_eq!(collector.collect_total_processes().unwrap(), 10000);
        assert_eq!(collector.collect_running_processes().unwrap(), 2);
        assert_eq!(collector.collect_kernel_version().unwrap(), "6.1.0-18-amd64");
        assert_eq!(
            collector.collect_os_name().unwrap(),
            "Debian GNU/Linux 12 (bookworm)"
        );
    }

    #[test]
    fn test_collect_minimal_system() {
        let fs = MockFs::minimal_system();
        let collector = collector(&fs);

        assert!((collector.collect_memory_percent().unwrap() - 50.0).abs() < 1e-9);
        assert_eq!(collector.collect_running_processes().unwrap(), 1);
        assert!(matches!(
            collector.collect_kernel_version(),
            Err(CollectError::ResourceUnavailable { .. })
        ));
        assert!(collector.collect_os_name().is_err());
    }

    #[test]
    fn test_collect_missing_counter_is_parse_error() {
        let fs = MockFs::new();
        fs.add_file("/proc/stat", "cpu  1 2 3 4\nprocesses 12\n");
        let collector = collector(&fs);

        assert!(matches!(
            collector.collect_running_processes(),
            Err(CollectError::Parse(_))
        ));
    }
}
