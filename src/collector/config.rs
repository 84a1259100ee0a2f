//! Collector configuration.

use std::path::PathBuf;

/// Clock ticks per second (USER_HZ). Standard value for Linux.
pub const DEFAULT_CLOCK_TICKS: u64 = 100;

/// Where the collector reads from and how it converts ticks to seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectorConfig {
    /// Base path of the proc filesystem (usually `/proc`).
    pub proc_path: PathBuf,
    /// Account database used to build the uid -> name table.
    pub passwd_path: PathBuf,
    /// Distribution metadata (`PRETTY_NAME`).
    pub os_release_path: PathBuf,
    /// Kernel clock ticks per second, used for every tick -> second conversion.
    pub clock_ticks: u64,
}

impl CollectorConfig {
    /// Creates a configuration reading from `proc_path`, other fields at their defaults.
    pub fn new(proc_path: impl Into<PathBuf>) -> Self {
        Self {
            proc_path: proc_path.into(),
            ..Self::default()
        }
    }

    /// Overrides the clock tick rate. Zero is replaced by the default.
    pub fn with_clock_ticks(mut self, clock_ticks: u64) -> Self {
        self.clock_ticks = if clock_ticks == 0 {
            DEFAULT_CLOCK_TICKS
        } else {
            clock_ticks
        };
        self
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            proc_path: PathBuf::from("/proc"),
            passwd_path: PathBuf::from("/etc/passwd"),
            os_release_path: PathBuf::from("/etc/os-release"),
            clock_ticks: DEFAULT_CLOCK_TICKS,
        }
    }
}
