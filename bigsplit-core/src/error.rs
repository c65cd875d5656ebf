use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::status::SplitStatus;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("access denied: {path}")]
    UnauthorizedAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("path too long: {path}")]
    PathTooLong {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("directory not found: {path}")]
    DirectoryNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("not supported: {path}: {reason}")]
    NotSupported { path: PathBuf, reason: String },

    #[error("unknown error: {0}")]
    Unknown(String),
}

/// Which side of the copy an I/O error came from. `NotFound` means a
/// missing directory only when we were writing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Source,
    Output,
}

impl SplitError {
    /// Classify a raw I/O error into one of the terminal failure kinds.
    pub fn from_io(side: Side, path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::PermissionDenied => Self::UnauthorizedAccess { path, source },
            io::ErrorKind::InvalidFilename => Self::PathTooLong { path, source },
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory if side == Side::Output => {
                Self::DirectoryNotFound { path, source }
            }
            io::ErrorKind::Unsupported | io::ErrorKind::InvalidInput => Self::NotSupported {
                path,
                reason: source.to_string(),
            },
            _ => Self::Io { path, source },
        }
    }

    pub fn not_supported(path: &Path, reason: impl Into<String>) -> Self {
        Self::NotSupported {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn status(&self) -> SplitStatus {
        match self {
            Self::Io { .. } => SplitStatus::IoError,
            Self::UnauthorizedAccess { .. } => SplitStatus::UnauthorizedAccessError,
            Self::PathTooLong { .. } => SplitStatus::PathTooLongError,
            Self::DirectoryNotFound { .. } => SplitStatus::DirectoryNotFoundError,
            Self::NotSupported { .. } => SplitStatus::NotSupportedError,
            Self::Unknown(_) => SplitStatus::UnknownError,
        }
    }
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, SplitError>;
