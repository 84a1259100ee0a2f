//! Live data provider for real-time system monitoring.

use tracing::warn;

use crate::collector::traits::FileSystem;
use crate::collector::{Collector, CollectorTiming, UserTable};
use crate::model::SystemSnapshot;

use super::{ProviderError, SnapshotProvider};

/// Provider for real-time system data collection.
///
/// Holds the snapshot of the last successful cycle. A cycle that fails keeps
/// that snapshot visible and records the error instead.
pub struct LiveProvider<F: FileSystem + Clone> {
    collector: Collector<F>,
    current: Option<SystemSnapshot>,
    last_error: Option<ProviderError>,
}

impl<F: FileSystem + Clone> LiveProvider<F> {
    /// Creates a new live provider.
    ///
    /// # Arguments
    /// * `collector` - The collector to use for gathering system metrics
    pub fn new(collector: Collector<F>) -> Self {
        Self {
            collector,
            current: None,
            last_error: None,
        }
    }

    pub fn collector(&self) -> &Collector<F> {
        &self.collector
    }
}

impl<F: FileSystem + Clone> SnapshotProvider for LiveProvider<F> {
    fn current(&self) -> Option<&SystemSnapshot> {
        self.current.as_ref()
    }

    fn advance(&mut self) -> Option<&SystemSnapshot> {
        match self.collector.collect_snapshot() {
            Ok(snapshot) => {
                self.last_error = None;
                self.current = Some(snapshot);
                self.current.as_ref()
            }
            Err(e) => {
                warn!(error = %e, "refresh cycle failed, keeping previous snapshot");
                self.last_error = Some(ProviderError::Collection(e.to_string()));
                None
            }
        }
    }

    fn last_error(&self) -> Option<&ProviderError> {
        self.last_error.as_ref()
    }

    fn user_table(&self) -> Option<&UserTable> {
        Some(self.collector.user_table())
    }

    fn collector_timing(&self) -> Option<&CollectorTiming> {
        self.collector.last_timing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;

    #[test]
    fn test_live_provider_advance() {
        let fs = MockFs::typical_system();
        let collector = Collector::new(fs, "/proc");
        let mut provider = LiveProvider::new(collector);

        // Initially no snapshot
        assert!(provider.current().is_none());

        // Advance should collect a snapshot
        let snapshot = provider.advance();
        assert!(snapshot.is_some());

        // Current should now return the snapshot
        assert!(provider.current().is_some());
        assert!(provider.last_error().is_none());
        assert!(provider.collector_timing().is_some());
    }

    #[test]
    fn test_live_provider_keeps_snapshot_on_failure() {
        let fs = MockFs::typical_system();
        let collector = Collector::new(fs.clone(), "/proc");
        let mut provider = LiveProvider::new(collector);
        provider.advance().unwrap();
        let before = provider.current().cloned().unwrap();

        fs.remove_dir("/proc");
        assert!(provider.advance().is_none());
        assert!(matches!(
            provider.last_error(),
            Some(ProviderError::Collection(_))
        ));
        assert_eq!(provider.current(), Some(&before));
    }

    #[test]
    fn test_live_provider_recovers_after_failure() {
        let fs = MockFs::typical_system();
        let collector = Collector::new(fs.clone(), "/proc");
        let mut provider = LiveProvider::new(collector);

        fs.remove_dir("/proc");
        assert!(provider.advance().is_none());
        assert!(provider.current().is_none());

        fs.add_dir("/proc");
        let snapshot = provider.advance().unwrap();
        assert!(snapshot.processes.is_empty());
        assert!(provider.last_error().is_none());
    }

    #[test]
    fn test_live_provider_exposes_user_table() {
        let fs = MockFs::typical_system();
        let collector = Collector::new(fs, "/proc");
        let provider = LiveProvider::new(collector);

        assert!(provider.user_table().is_some_and(|t| t.is_loaded()));
    }
}
