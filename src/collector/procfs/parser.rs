//! Parsers for `/proc` filesystem files.
//!
//! These are pure functions that parse the content of various `/proc` files
//! into structured data. They are designed to be easily testable with string inputs.
//!
//! Two layouts cover almost everything the kernel exposes:
//! - whitespace-separated positional fields (`/proc/stat`, `/proc/[pid]/stat`, `/proc/uptime`)
//! - `key: value` tables (`/proc/meminfo`, `/proc/[pid]/status`)

use std::collections::HashMap;
use std::str::FromStr;

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

// ============ Generic helpers ============

/// Splits a line into whitespace-separated tokens.
pub fn parse_fields(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Returns the tokens of the first line starting with `key`.
///
/// The key is a plain prefix: `"cpu "` matches the aggregate line only, while
/// `"cpu"` would match every per-core line too.
pub fn parse_table<'a, S: AsRef<str>>(lines: &'a [S], key: &str) -> Result<Vec<&'a str>, ParseError> {
    lines
        .iter()
        .map(AsRef::as_ref)
        .find(|line| line.starts_with(key))
        .map(parse_fields)
        .ok_or_else(|| ParseError::new(format!("no line starting with '{}'", key.trim_end())))
}

/// Returns the token at `index`, naming the field in the error.
pub fn field<'a>(tokens: &[&'a str], index: usize, name: &str) -> Result<&'a str, ParseError> {
    tokens.get(index).copied().ok_or_else(|| {
        ParseError::new(format!(
            "missing field {} (column {}, got {} columns)",
            name,
            index,
            tokens.len()
        ))
    })
}

/// Parses a single token into `T`.
pub fn parse_value<T: FromStr>(token: &str, name: &str) -> Result<T, ParseError> {
    token
        .parse()
        .map_err(|_| ParseError::new(format!("invalid {}: '{}'", name, token)))
}

/// Looks up `key` in a table and parses column `index` of the matching line.
pub fn table_value<T: FromStr, S: AsRef<str>>(
    lines: &[S],
    key: &str,
    index: usize,
) -> Result<T, ParseError> {
    let tokens = parse_table(lines, key)?;
    let token = field(&tokens, index, key.trim_end_matches(':'))?;
    parse_value(token, key.trim_end_matches(':'))
}

// ============ /proc/stat ============

/// Counts the per-core `cpuN` lines in `/proc/stat`.
pub fn count_cpu_cores<S: AsRef<str>>(lines: &[S]) -> usize {
    lines
        .iter()
        .filter_map(|line| line.as_ref().split_whitespace().next())
        .filter(|label| {
            label
                .strip_prefix("cpu")
                .is_some_and(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
        })
        .count()
}

/// The ten CPU time counters of one `/proc/stat` cpu line, in clock ticks.
///
/// Counters are cumulative since boot, so a single snapshot says nothing about
/// utilization; only the difference between two snapshots of the same line does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
    pub guest: u64,
    pub guest_nice: u64,
}

impl CounterSnapshot {
    /// Ticks spent doing work.
    pub fn active(&self) -> u64 {
        [
            self.nice,
            self.system,
            self.irq,
            self.softirq,
            self.steal,
            self.guest,
            self.guest_nice,
        ]
        .iter()
        .fold(self.user, |sum, ticks| sum.saturating_add(*ticks))
    }

    /// Ticks spent idle, including waiting on I/O.
    pub fn idle_total(&self) -> u64 {
        self.idle.saturating_add(self.iowait)
    }

    /// Per-field difference `self - earlier`. A counter that went backwards
    /// contributes zero.
    pub fn saturating_delta(&self, earlier: &CounterSnapshot) -> CounterSnapshot {
        CounterSnapshot {
            user: self.user.saturating_sub(earlier.user),
            nice: self.nice.saturating_sub(earlier.nice),
            system: self.system.saturating_sub(earlier.system),
            idle: self.idle.saturating_sub(earlier.idle),
            iowait: self.iowait.saturating_sub(earlier.iowait),
            irq: self.irq.saturating_sub(earlier.irq),
            softirq: self.softirq.saturating_sub(earlier.softirq),
            steal: self.steal.saturating_sub(earlier.steal),
            guest: self.guest.saturating_sub(earlier.guest),
            guest_nice: self.guest_nice.saturating_sub(earlier.guest_nice),
        }
    }
}

/// Parses the cpu line starting with `key` (`"cpu "` or `"cpuN "`).
///
/// The first four counters are required. Older kernels omit the trailing
/// columns, which then read as zero.
pub fn parse_cpu_line<S: AsRef<str>>(lines: &[S], key: &str) -> Result<CounterSnapshot, ParseError> {
    let tokens = parse_table(lines, key)?;
    let required = |index: usize, name: &str| -> Result<u64, ParseError> {
        parse_value(field(&tokens, index, name)?, name)
    };
    let optional = |index: usize| -> u64 {
        tokens
            .get(index)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    };

    Ok(CounterSnapshot {
        user: required(1, "user")?,
        nice: required(2, "nice")?,
        system: required(3, "system")?,
        idle: required(4, "idle")?,
        iowait: optional(5),
        irq: optional(6),
        softirq: optional(7),
        steal: optional(8),
        guest: optional(9),
        guest_nice: optional(10),
    })
}

/// Process counters from `/proc/stat`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlobalCounters {
    /// Forks since boot.
    pub processes: u64,
    /// Currently runnable.
    pub procs_running: u64,
}

/// Extracts `processes` and `procs_running` from `/proc/stat` lines.
pub fn parse_global_counters<S: AsRef<str>>(lines: &[S]) -> Result<GlobalCounters, ParseError> {
    Ok(GlobalCounters {
        processes: table_value(lines, "processes ", 1)?,
        procs_running: table_value(lines, "procs_running ", 1)?,
    })
}

// ============ /proc/[pid]/stat ============

/// Parsed data from `/proc/[pid]/stat`.
///
/// Only the fields the collector consumes are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcStat {
    pub pid: u32,
    pub comm: String,
    pub state: char,
    pub utime: u64,
    pub stime: u64,
    pub cutime: i64,
    pub cstime: i64,
    pub num_threads: i64,
    pub starttime: u64,
}

/// Parses `/proc/[pid]/stat` content.
///
/// The format is tricky because the comm field can contain spaces and parentheses.
/// Format: pid (comm) state ppid pgrp session tty_nr ...
pub fn parse_proc_stat(content: &str) -> Result<ProcStat, ParseError> {
    let content = content.trim();

    // Find the comm field boundaries (enclosed in parentheses)
    let open_paren = content
        .find('(')
        .ok_or_else(|| ParseError::new("missing '(' in stat"))?;
    let close_paren = content
        .rfind(')')
        .ok_or_else(|| ParseError::new("missing ')' in stat"))?;

    if close_paren <= open_paren {
        return Err(ParseError::new("invalid parentheses in stat"));
    }

    let pid: u32 = parse_value(content[..open_paren].trim(), "pid")?;
    let comm = content[open_paren + 1..close_paren].to_string();

    // Fields after ')' start at field 3 (state), so index = field number - 3.
    let fields = parse_fields(&content[close_paren + 1..]);
    if fields.len() < 20 {
        return Err(ParseError::new(format!(
            "not enough fields in stat: expected 20+, got {}",
            fields.len()
        )));
    }

    Ok(ProcStat {
        pid,
        comm,
        state: fields[0].chars().next().unwrap_or('?'),
        utime: parse_value(fields[11], "utime")?,
        stime: parse_value(fields[12], "stime")?,
        cutime: parse_value(fields[13], "cutime")?,
        cstime: parse_value(fields[14], "cstime")?,
        num_threads: parse_value(fields[17], "num_threads")?,
        starttime: parse_value(fields[19], "starttime")?,
    })
}

// ============ /proc/[pid]/status ============

/// Parsed data from `/proc/[pid]/status`.
///
/// Every field is optional: kernel threads have no `Vm*` lines, and a process
/// exiting mid-read can leave the file truncated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcStatus {
    pub name: Option<String>,
    pub uid: Option<u32>,
    pub vm_rss: Option<u64>,
    pub threads: Option<u32>,
}

/// Parses `/proc/[pid]/status` content.
///
/// Format is key:\tvalue pairs, one per line.
pub fn parse_proc_status(content: &str) -> ProcStatus {
    let mut fields: HashMap<&str, &str> = HashMap::new();

    for line in content.lines() {
        if let Some((key, value)) = line.split_once(':') {
            fields.insert(key.trim(), value.trim());
        }
    }

    // Memory fields are in kB format: "12345 kB"
    let first_number = |key: &str| -> Option<u64> {
        fields
            .get(key)
            .and_then(|s| s.split_whitespace().next())
            .and_then(|s| s.parse().ok())
    };

    ProcStatus {
        name: fields.get("Name").map(|s| s.to_string()),
        // Uid has format: real effective saved fs
        uid: first_number("Uid").map(|uid| uid as u32),
        vm_rss: first_number("VmRSS"),
        threads: first_number("Threads").map(|n| n as u32),
    }
}

/// Parses `/proc/[pid]/cmdline` content.
///
/// Arguments are NUL-separated; they are joined with single spaces.
pub fn parse_cmdline(content: &str) -> String {
    content
        .split('\0')
        .filter(|arg| !arg.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

// ============ /proc/meminfo ============

/// Parsed data from `/proc/meminfo`, in kB.
///
/// Missing keys read as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemInfo {
    pub mem_free: u64,
    pub mem_available: u64,
    pub buffers: u64,
}

/// Parses `/proc/meminfo` content.
pub fn parse_meminfo(content: &str) -> MemInfo {
    let mut info = MemInfo::default();

    let parse_kb = |line: &str| -> u64 {
        line.split_whitespace()
            .nth(1)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    };

    for line in content.lines() {
        if line.starts_with("MemFree:") {
            info.mem_free = parse_kb(line);
        } else if line.starts_with("MemAvailable:") {
            info.mem_available = parse_kb(line);
        } else if line.starts_with("Buffers:") {
            info.buffers = parse_kb(line);
        }
    }

    info
}

// ============ Single-value files ============

/// Parses `/proc/uptime` and returns seconds since boot.
///
/// Format: `uptime_seconds idle_seconds`
pub fn parse_uptime(content: &str) -> Result<f64, ParseError> {
    let fields = parse_fields(content);
    let uptime: f64 = parse_value(field(&fields, 0, "uptime")?, "uptime")?;
    if uptime.is_finite() && uptime >= 0.0 {
        Ok(uptime)
    } else {
        Err(ParseError::new(format!("invalid uptime: {}", uptime)))
    }
}

/// Extracts the kernel release from `/proc/version`.
///
/// Format: `Linux version 6.1.0-18-amd64 (debian-kernel@lists.debian.org) ...`
pub fn parse_kernel_version(content: &str) -> Result<String, ParseError> {
    let lines: Vec<&str> = content.lines().collect();
    let tokens = parse_table(&lines, "Linux version ")?;
    Ok(field(&tokens, 2, "release")?.to_string())
}

/// Extracts `PRETTY_NAME` from `/etc/os-release`, without quotes.
pub fn parse_os_release(content: &str) -> Result<String, ParseError> {
    content
        .lines()
        .find_map(|line| line.strip_prefix("PRETTY_NAME="))
        .map(|value| value.trim().replace('"', ""))
        .ok_or_else(|| ParseError::new("no PRETTY_NAME in os-release"))
}

// ============ /etc/passwd ============

/// Parses `/etc/passwd` content and returns a map of UID -> username.
///
/// Format: username:password:uid:gid:gecos:home:shell
pub fn parse_passwd(content: &str) -> HashMap<u32, String> {
    let mut map = HashMap::new();
    for line in content.lines() {
        // Skip comments and empty lines
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = line.split(':').collect();
        if parts.len() >= 3
            && let Ok(uid) = parts[2].parse::<u32>()
        {
            map.entry(uid).or_insert_with(|| parts[0].to_string());
        }
    }
    map
}
