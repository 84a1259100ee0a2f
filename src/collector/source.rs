//! Logical kernel resources and the text source that reads them.
//!
//! Collectors never build paths themselves: they ask for a [`Resource`] and get
//! its text back, so the file layout lives in one place.

use std::fmt;
use std::path::PathBuf;

use crate::collector::config::CollectorConfig;
use crate::collector::error::CollectError;
use crate::collector::traits::FileSystem;
use crate::model::Pid;

/// A named piece of kernel or system text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// `/proc/stat`: CPU counters and global process counters.
    SystemStat,
    /// `/proc/uptime`
    Uptime,
    /// `/proc/meminfo`
    MemInfo,
    /// `/proc/version`
    KernelVersion,
    /// `/etc/os-release`
    OsRelease,
    /// `/etc/passwd`
    Passwd,
    /// `/proc/[pid]/stat`
    ProcessStat(Pid),
    /// `/proc/[pid]/status`
    ProcessStatus(Pid),
    /// `/proc/[pid]/cmdline`
    ProcessCmdline(Pid),
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::SystemStat => f.write_str("system stat"),
            Resource::Uptime => f.write_str("system uptime"),
            Resource::MemInfo => f.write_str("memory info"),
            Resource::KernelVersion => f.write_str("kernel version"),
            Resource::OsRelease => f.write_str("os release"),
            Resource::Passwd => f.write_str("user database"),
            Resource::ProcessStat(pid) => write!(f, "process {} stat", pid),
            Resource::ProcessStatus(pid) => write!(f, "process {} status", pid),
            Resource::ProcessCmdline(pid) => write!(f, "process {} cmdline", pid),
        }
    }
}

/// Reads [`Resource`]s through a [`FileSystem`].
#[derive(Debug, Clone)]
pub struct KernelSource<F: FileSystem> {
    fs: F,
    proc_path: PathBuf,
    passwd_path: PathBuf,
    os_release_path: PathBuf,
}

impl<F: FileSystem> KernelSource<F> {
    /// Creates a source resolving resources against the paths in `config`.
    pub fn new(fs: F, config: &CollectorConfig) -> Self {
        Self {
            fs,
            proc_path: config.proc_path.clone(),
            passwd_path: config.passwd_path.clone(),
            os_release_path: config.os_release_path.clone(),
        }
    }

    /// Maps a logical resource to its path.
    pub fn path(&self, resource: &Resource) -> PathBuf {
        match resource {
            Resource::SystemStat => self.proc_path.join("stat"),
            Resource::Uptime => self.proc_path.join("uptime"),
            Resource::MemInfo => self.proc_path.join("meminfo"),
            Resource::KernelVersion => self.proc_path.join("version"),
            Resource::OsRelease => self.os_release_path.clone(),
            Resource::Passwd => self.passwd_path.clone(),
            Resource::ProcessStat(pid) => self.proc_path.join(pid.as_str()).join("stat"),
            Resource::ProcessStatus(pid) => self.proc_path.join(pid.as_str()).join("status"),
            Resource::ProcessCmdline(pid) => self.proc_path.join(pid.as_str()).join("cmdline"),
        }
    }

    /// Reads the whole resource as one string.
    pub fn read_to_string(&self, resource: &Resource) -> Result<String, CollectError> {
        self.fs
            .read_to_string(&self.path(resource))
            .map_err(|source| CollectError::ResourceUnavailable {
                resource: resource.to_string(),
                source,
            })
    }

    /// Reads the resource and splits it into lines.
    pub fn read_lines(&self, resource: &Resource) -> Result<Vec<String>, CollectError> {
        let content = self.read_to_string(resource)?;
        Ok(content.lines().map(str::to_string).collect())
    }

    /// Lists the numeric entries of the proc directory, in ascending order.
    ///
    /// Fails with [`CollectError::Enumeration`] if the directory cannot be read.
    pub fn list_pids(&self) -> Result<Vec<Pid>, CollectError> {
        let entries = self
            .fs
            .read_dir(&self.proc_path)
            .map_err(CollectError::Enumeration)?;

        let mut pids: Vec<Pid> = entries
            .iter()
            .filter_map(|entry| entry.file_name().and_then(|n| n.to_str()))
            .filter_map(Pid::from_dir_name)
            .collect();
        pids.sort();
        Ok(pids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;
    use std::path::Path;

    fn source(fs: MockFs) -> KernelSource<MockFs> {
        KernelSource::new(fs, &CollectorConfig::default())
    }

    #[test]
    fn test_resource_paths() {
        let source = source(MockFs::new());
        let pid = Pid::from(42);

        assert_eq!(source.path(&Resource::SystemStat), Path::new("/proc/stat"));
        assert_eq!(source.path(&Resource::Passwd), Path::new("/etc/passwd"));
        assert_eq!(
            source.path(&Resource::ProcessStatus(pid.clone())),
            Path::new("/proc/42/status")
        );
        assert_eq!(
            source.path(&Resource::ProcessCmdline(pid)),
            Path::new("/proc/42/cmdline")
        );
    }

    #[test]
    fn test_resource_display() {
        assert_eq!(Resource::SystemStat.to_string(), "system stat");
        assert_eq!(
            Resource::ProcessStatus(Pid::from(7)).to_string(),
            "process 7 status"
        );
    }

    #[test]
    fn test_read_lines() {
        let fs = MockFs::new();
        fs.add_file("/proc/uptime", "100.5 200.0\n");
        let source = source(fs);

        let lines = source.read_lines(&Resource::Uptime).unwrap();
        assert_eq!(lines, vec!["100.5 200.0".to_string()]);
    }

    #[test]
    fn test_read_missing_resource() {
        let source = source(MockFs::new());
        let err = source.read_lines(&Resource::MemInfo).unwrap_err();
        match err {
            CollectError::ResourceUnavailable { resource, .. } => {
                assert_eq!(resource, "memory info")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_list_pids_numeric_only_and_sorted() {
        let fs = MockFs::new();
        fs.add_file("/proc/1000/stat", "");
        fs.add_file("/proc/2/stat", "");
        fs.add_file("/proc/self/stat", "");
        fs.add_file("/proc/meminfo", "");
        fs.add_dir("/proc/sys");
        let source = source(fs);

        let pids = source.list_pids().unwrap();
        assert_eq!(pids, vec![Pid::from(2), Pid::from(1000)]);
    }

    #[test]
    fn test_list_pids_unreadable_directory() {
        let source = source(MockFs::new());
        assert!(matches!(
            source.list_pids(),
            Err(CollectError::Enumeration(_))
        ));
    }
}
