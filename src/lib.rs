//! proctop - procfs sampling and delta-computation library.
//!
//! This library provides the engine behind the `proctop` monitor: it reads
//! kernel counters from `/proc`, keeps one previous sample per tracked entity
//! and derives CPU, memory and per-process utilization from the deltas.

pub mod collector;
pub mod fmt;
pub mod model;
pub mod provider;
