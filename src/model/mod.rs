//! Data model produced by the collector.
//!
//! - [`process`]: per-process records and the opaque process identifier.
//! - [`system`]: the per-cycle system snapshot handed to consumers.

pub mod process;
pub mod system;

pub use process::{Pid, ProcessRecord};
pub use system::{CpuUsage, SystemSnapshot};
