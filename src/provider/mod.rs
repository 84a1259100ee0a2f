//! Provider abstraction for snapshot data sources.
//!
//! This module defines the `SnapshotProvider` trait that lets a front end
//! (the text printer, the JSON printer) read the currently visible snapshot
//! without knowing how it was produced.

mod live;

pub use live::LiveProvider;

use crate::collector::{CollectorTiming, UserTable};
use crate::model::SystemSnapshot;

/// Error types that can occur during snapshot operations.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Error during data collection.
    Collection(String),
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderError::Collection(msg) => write!(f, "Collection error: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Abstraction for snapshot data sources.
///
/// The trait is object-safe and designed to be used with `Box<dyn SnapshotProvider>`.
pub trait SnapshotProvider {
    /// Returns the current snapshot, if available.
    ///
    /// Returns `None` if no snapshot has been loaded yet.
    fn current(&self) -> Option<&SystemSnapshot>;

    /// Advances to the next snapshot.
    ///
    /// Returns `None` if collection failed (check `last_error()` for details).
    /// A failed advance leaves `current()` unchanged.
    fn advance(&mut self) -> Option<&SystemSnapshot>;

    /// Returns the last error that occurred, if any.
    ///
    /// Cleared by the next successful `advance()`.
    fn last_error(&self) -> Option<&ProviderError>;

    /// Returns the user table for UID -> username mapping.
    fn user_table(&self) -> Option<&UserTable> {
        None
    }

    /// Returns timing information from the last snapshot collection.
    ///
    /// Only available for live providers.
    fn collector_timing(&self) -> Option<&CollectorTiming> {
        None
    }
}
