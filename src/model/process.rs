//! Process-level records built from `/proc/[pid]/` files.
//!
//! A [`ProcessRecord`] lives for as long as its [`Pid`] keeps showing up in the
//! `/proc` listing. Values derived from kernel counters are refreshed every cycle;
//! the command line is read once when the record is created.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Kernel-assigned process identifier.
///
/// Treated as an opaque token: only the enumeration layer knows that it is the
/// decimal name of a directory under `/proc`. Ordering puts shorter tokens first,
/// which for decimal names is the same as numeric order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pid(String);

impl Pid {
    /// Wraps a token without validating it.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Builds a pid from a `/proc` directory entry name.
    ///
    /// Returns `None` for anything that is not a non-empty run of ASCII digits
    /// (`self`, `sys`, `meminfo`, ...).
    pub fn from_dir_name(name: &str) -> Option<Self> {
        if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(name.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Pid {
    fn default() -> Self {
        Self(String::from("0"))
    }
}

impl Ord for Pid {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Pid {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u32> for Pid {
    fn from(pid: u32) -> Self {
        Self(pid.to_string())
    }
}

/// One tracked process.
///
/// Source: `/proc/[pid]/stat`, `/proc/[pid]/status`, `/proc/[pid]/cmdline`
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct ProcessRecord {
    /// Process identifier.
    pub pid: Pid,

    /// Executable name (comm), from `/proc/[pid]/stat` field 2.
    pub name: String,

    /// Scheduler state (`R`, `S`, `D`, `Z`, ...).
    pub state: char,

    /// Real user id from the `Uid:` line of `/proc/[pid]/status`.
    /// `None` when the status file could not be read.
    pub uid: Option<u32>,

    /// Owner name resolved through the user table.
    /// Falls back to the numeric uid; empty when the uid itself is unknown.
    pub user: String,

    /// Resident memory in GB (`VmRSS` kB / 1024²). Zero when unavailable.
    pub mem_gb: f64,

    /// Lifetime CPU utilization: total CPU time over elapsed wall time, in percent.
    /// Not clamped; a multi-threaded process can exceed 100.
    pub cpu_percent: f64,

    /// Seconds since the process started.
    pub uptime_secs: f64,

    /// Number of threads (`Threads:` in `/proc/[pid]/status`).
    pub threads: u32,

    /// Command line with NUL separators replaced by spaces.
    /// Read once when the record is created.
    pub cmdline: String,
}
