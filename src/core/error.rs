//! Error taxonomy for the browsing engine.
//!
//! Filesystem failures are classified at the call site and converted into
//! user-visible status messages; they never propagate into the engine's
//! state transitions. A cancelled search is a normal phase, not an error,
//! so it has no variant here.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrowseError {
    /// Directory or file is unreadable. The prior listing stays displayed.
    #[error("Permission denied")]
    PermissionDenied,

    /// Path vanished between selection and action.
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Any other per-item I/O failure (copy, move, delete, stat).
    #[error("I/O error: {0}")]
    Io(io::Error),
}

impl BrowseError {
    /// Classify an I/O error observed for `path`.
    pub fn classify(err: io::Error, path: &std::path::Path) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => BrowseError::PermissionDenied,
            io::ErrorKind::NotFound => BrowseError::NotFound(path.to_path_buf()),
            _ => BrowseError::Io(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn classify_maps_error_kinds() {
        let p = Path::new("/tmp/x");
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        assert!(matches!(
            BrowseError::classify(denied, p),
            BrowseError::PermissionDenied
        ));

        let missing = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert!(matches!(
            BrowseError::classify(missing, p),
            BrowseError::NotFound(_)
        ));

        let other = io::Error::other("disk on fire");
        assert!(matches!(BrowseError::classify(other, p), BrowseError::Io(_)));
    }
}
