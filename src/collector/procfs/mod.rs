//! Collectors for Linux `/proc` filesystem.
//!
//! This module provides parsers and collectors for reading system and process
//! information from the `/proc` virtual filesystem.

pub mod cpu;
pub mod parser;
pub mod process;
pub mod system;
pub mod users;

pub use cpu::{CpuSampler, percent_from_delta};
pub use parser::CounterSnapshot;
pub use process::ProcessRegistry;
pub use system::SystemCollector;
pub use users::UserTable;
