//! Process registry for per-process metrics from `/proc/[pid]/`.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::parser::{ProcStat, parse_cmdline, parse_proc_stat, parse_proc_status};
use super::users::UserTable;
use crate::collector::error::CollectError;
use crate::collector::source::{KernelSource, Resource};
use crate::collector::traits::FileSystem;
use crate::model::{Pid, ProcessRecord};

const KB_PER_GB: f64 = 1024.0 * 1024.0;

/// Lifetime CPU utilization of a process, in percent.
///
/// Total CPU time (own and waited-for children) divided by the wall time since
/// the process started. Returns 0 if no time has elapsed or `hz` is 0.
pub fn process_cpu_percent(stat: &ProcStat, uptime_ticks: u64, hz: u64) -> f64 {
    let elapsed = process_uptime_secs(stat, uptime_ticks, hz);
    if elapsed <= 0.0 {
        return 0.0;
    }
    // The kernel reports child times as signed values.
    let ticks = stat.utime as f64
        + stat.stime as f64
        + stat.cutime.max(0) as f64
        + stat.cstime.max(0) as f64;
    100.0 * (ticks / hz as f64) / elapsed
}

/// Seconds since the process started, never negative.
pub fn process_uptime_secs(stat: &ProcStat, uptime_ticks: u64, hz: u64) -> f64 {
    if hz == 0 {
        return 0.0;
    }
    let hz = hz as f64;
    (uptime_ticks as f64 / hz - stat.starttime as f64 / hz).max(0.0)
}

/// Tracks the set of live processes across refresh cycles.
///
/// Each refresh rebuilds the list from the current `/proc` listing. A record
/// survives as long as its pid keeps showing up; a pid that disappears and
/// comes back later gets a new record.
pub struct ProcessRegistry<F: FileSystem> {
    source: KernelSource<F>,
    records: Vec<ProcessRecord>,
}

impl<F: FileSystem> ProcessRegistry<F> {
    /// Creates an empty registry.
    pub fn new(source: KernelSource<F>) -> Self {
        Self {
            source,
            records: Vec::new(),
        }
    }

    /// Records of the last successful refresh, ordered by pid.
    pub fn records(&self) -> &[ProcessRecord] {
        &self.records
    }

    /// Lists the pids currently present, in ascending order.
    pub fn list_identifiers(&self) -> Result<Vec<Pid>, CollectError> {
        self.source.list_pids()
    }

    /// Rebuilds the registry from the current process listing.
    ///
    /// # Arguments
    /// * `uptime_ticks` - System uptime in clock ticks
    /// * `hz` - Clock ticks per second
    /// * `users` - uid -> name table
    ///
    /// Processes whose stat file cannot be read are left out of this cycle.
    /// If the listing itself fails the previous records are kept and the error
    /// is returned.
    pub fn refresh(
        &mut self,
        uptime_ticks: u64,
        hz: u64,
        users: &UserTable,
    ) -> Result<&[ProcessRecord], CollectError> {
        let pids = self.list_identifiers().inspect_err(|e| {
            warn!(error = %e, "process enumeration failed");
        })?;

        let mut previous: HashMap<Pid, ProcessRecord> = self
            .records
            .drain(..)
            .map(|record| (record.pid.clone(), record))
            .collect();

        let mut records = Vec::with_capacity(pids.len());
        for pid in pids {
            let stat = match self.read_stat(&pid) {
                Ok(stat) => stat,
                Err(e) => {
                    debug!(pid = %pid, error = %e, "skipping process");
                    continue;
                }
            };

            let mut record = match previous.remove(&pid) {
                Some(record) => record,
                None => self.new_record(pid, &stat),
            };
            self.update(&mut record, &stat, uptime_ticks, hz, users);
            records.push(record);
        }

        debug!(
            processes = records.len(),
            exited = previous.len(),
            "process registry refreshed"
        );

        self.records = records;
        Ok(&self.records)
    }

    fn read_stat(&self, pid: &Pid) -> Result<ProcStat, CollectError> {
        let content = self
            .source
            .read_to_string(&Resource::ProcessStat(pid.clone()))?;
        Ok(parse_proc_stat(&content)?)
    }

    /// Creates a record for a pid seen for the first time and reads its command line.
    fn new_record(&self, pid: Pid, stat: &ProcStat) -> ProcessRecord {
        let cmdline = self
            .source
            .read_to_string(&Resource::ProcessCmdline(pid.clone()))
            .map(|content| parse_cmdline(&content))
            .unwrap_or_default();

        ProcessRecord {
            pid,
            // Kernel threads have an empty cmdline.
            cmdline: if cmdline.is_empty() {
                stat.comm.clone()
            } else {
                cmdline
            },
            ..Default::default()
        }
    }

    fn update(
        &self,
        record: &mut ProcessRecord,
        stat: &ProcStat,
        uptime_ticks: u64,
        hz: u64,
        users: &UserTable,
    ) {
        record.name.clone_from(&stat.comm);
        record.state = stat.state;
        record.cpu_percent = process_cpu_percent(stat, uptime_ticks, hz);
        record.uptime_secs = process_uptime_secs(stat, uptime_ticks, hz);

        match self
            .source
            .read_to_string(&Resource::ProcessStatus(record.pid.clone()))
        {
            Ok(content) => {
                let status = parse_proc_status(&content);
                record.mem_gb = status.vm_rss.map_or(0.0, |kb| kb as f64 / KB_PER_GB);
                record.threads = status.threads.unwrap_or(0);
                record.uid = status.uid;
                record.user = status.uid.map(|uid| users.resolve(uid)).unwrap_or_default();
            }
            Err(e) => {
                debug!(pid = %record.pid, error = %e, "status unavailable");
                record.mem_gb = 0.0;
                record.threads = 0;
                record.uid = None;
                record.user = String::new();
            }
        }
    }
}
