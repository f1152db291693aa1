//! Errors raised while moving the code viewport to a frame.

use std::{io, path::PathBuf};

/// The host could not open a file in the viewport
#[derive(Debug, thiserror::Error)]
pub enum OpenFileError {
    #[error("file does not exist")]
    NotFound,

    #[error("permission denied")]
    PermissionDenied,

    /// Any other failure reported by the host editor
    #[error("{0}")]
    Host(String),
}

impl From<io::Error> for OpenFileError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::Host(e.to_string()),
        }
    }
}

/// The host could not place the cursor
#[derive(Debug, thiserror::Error)]
pub enum PositionError {
    #[error("line {line} is out of range, buffer has {line_count} lines")]
    LineOutOfRange { line: usize, line_count: usize },

    #[error("no buffer is open in the viewport")]
    NoBuffer,

    #[error("{0}")]
    Host(String),
}

#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("opening {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: OpenFileError,
    },

    #[error("jumping to {line}:{column} in {}: {source}", path.display())]
    Position {
        path: PathBuf,
        line: usize,
        column: usize,
        #[source]
        source: PositionError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_map_to_open_failures() {
        let not_found = OpenFileError::from(io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(not_found, OpenFileError::NotFound));

        let denied = OpenFileError::from(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(denied, OpenFileError::PermissionDenied));

        let other = OpenFileError::from(io::Error::other("disk on fire"));
        assert_eq!(other.to_string(), "disk on fire");
    }
}
