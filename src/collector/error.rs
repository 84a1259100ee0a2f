//! Error type shared by all collectors.

use std::io;

use crate::collector::procfs::parser::ParseError;

/// Error type for collection failures.
///
/// Only [`CollectError::Enumeration`] aborts a refresh cycle; the other variants
/// degrade a single metric to its default and the cycle carries on.
#[derive(Debug)]
pub enum CollectError {
    /// A resource could not be opened or read (missing file, permission, process gone).
    ResourceUnavailable { resource: String, source: io::Error },
    /// A resource was read but the expected line or column was not there.
    Parse(ParseError),
    /// The process directory itself could not be listed.
    Enumeration(io::Error),
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::ResourceUnavailable { resource, source } => {
                write!(f, "{} unavailable: {}", resource, source)
            }
            CollectError::Parse(e) => write!(f, "{}", e),
            CollectError::Enumeration(e) => write!(f, "cannot enumerate processes: {}", e),
        }
    }
}

impl std::error::Error for CollectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectError::ResourceUnavailable { source, .. } => Some(source),
            CollectError::Parse(e) => Some(e),
            CollectError::Enumeration(e) => Some(e),
        }
    }
}

impl From<ParseError> for CollectError {
    fn from(e: ParseError) -> Self {
        CollectError::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_display_resource_unavailable() {
        let err = CollectError::ResourceUnavailable {
            resource: "process 42 status".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "process 42 status unavailable: gone");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_from_parse_error() {
        let err: CollectError = ParseError::new("missing field utime").into();
        assert!(matches!(err, CollectError::Parse(_)));
        assert_eq!(err.to_string(), "Parse error: missing field utime");
    }
}
