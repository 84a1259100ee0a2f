//! Sampling engine for Linux `/proc`.
//!
//! This module reads raw kernel counters, keeps the previous sample of every
//! tracked entity and turns counter deltas into utilization figures. All
//! access goes through the [`FileSystem`] trait so the whole engine runs
//! against an in-memory tree in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                            Collector                             │
//! │  ┌──────────────┐  ┌─────────────────┐  ┌─────────────────────┐  │
//! │  │  CpuSampler  │  │ SystemCollector │  │   ProcessRegistry   │  │
//! │  │ - /proc/stat │  │ - meminfo       │  │ - /proc/[pid]/*     │  │
//! │  │ - prev snaps │  │ - uptime        │  │ - UserTable         │  │
//! │  └──────┬───────┘  │ - version       │  └──────────┬──────────┘  │
//! │         │          └────────┬────────┘             │             │
//! │         └───────────────────┼──────────────────────┘             │
//! │                     ┌───────▼───────┐                            │
//! │                     │ KernelSource  │ (Resource -> text)         │
//! │                     └───────┬───────┘                            │
//! │                     ┌───────▼───────┐                            │
//! │                     │  FileSystem   │ (trait)                    │
//! │                     └───────┬───────┘                            │
//! └─────────────────────────────┼────────────────────────────────────┘
//!                               │
//!                ┌──────────────┼──────────────┐
//!                │              │              │
//!         ┌──────▼──────┐ ┌─────▼───────┐ ┌────▼────────┐
//!         │   RealFs    │ │   MockFs    │ │  Scenarios  │
//!         │ (Linux)     │ │ (Testing)   │ │ (Fixtures)  │
//!         └─────────────┘ └─────────────┘ └─────────────┘
//! ```
//!
//! # Usage
//!
//! ## Production (Linux)
//!
//! ```ignore
//! use proctop::collector::{Collector, RealFs};
//!
//! let fs = RealFs::new();
//! let mut collector = Collector::new(fs, "/proc");
//! let snapshot = collector.collect_snapshot().unwrap();
//! ```
//!
//! ## Testing (with MockFs)
//!
//! ```
//! use proctop::collector::{Collector, MockFs};
//!
//! let fs = MockFs::typical_system();
//! let mut collector = Collector::new(fs, "/proc");
//! let snapshot = collector.collect_snapshot().unwrap();
//! assert_eq!(snapshot.processes.len(), 3);
//! ```

#[allow(clippy::module_inception)]
mod collector;
pub mod config;
pub mod error;
pub mod mock;
pub mod procfs;
pub mod source;
pub mod traits;

pub use collector::{Collector, CollectorTiming};
pub use config::CollectorConfig;
pub use error::CollectError;
pub use mock::MockFs;
pub use procfs::{CounterSnapshot, CpuSampler, ProcessRegistry, SystemCollector, UserTable};
pub use source::{KernelSource, Resource};
pub use traits::{FileSystem, RealFs};
