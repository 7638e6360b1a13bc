//! # Exhibit Errors
//!
//! Every failure an exhibit comparison can surface is a variant of
//! [`ExhibitError`]. The same failures are also signalled to the host test
//! through [`TestContext`](crate::context::TestContext), so callers may ignore
//! the returned value and still get a failing test.
//!
//! - **Mismatch**: the diff was non-empty. Non-fatal.
//! - **Storage**: the exhibit file could not be read or written.
//! - **Serialization**: the reported value could not be encoded as JSON.
//! - **NotImplemented**: a declared placeholder operation was called.

use std::fmt;
use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// The "different" outcome of a comparison: both normalized texts and the
/// unified diff between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub expected: String,
    pub reported: String,
    pub diff: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.diff)
    }
}

/// Which side of the exhibit lifecycle failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageAction {
    Read,
    Write,
}

impl StorageAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageAction::Read => "read",
            StorageAction::Write => "write",
        }
    }
}

impl fmt::Display for StorageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Diagnostic, Debug)]
pub enum ExhibitError {
    /// `Display` yields the diff text verbatim.
    #[error("{0}")]
    #[diagnostic(
        code(exhibit::mismatch),
        help("re-run with TEST_SNAPSHOT=TRUE to record the reported output")
    )]
    Mismatch(Mismatch),

    #[error("could not {action} exhibit {}: {source}", path.display())]
    #[diagnostic(code(exhibit::storage))]
    Storage {
        action: StorageAction,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not serialize reported value: {source}")]
    #[diagnostic(code(exhibit::serialize))]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    #[error("{operation} is not implemented")]
    #[diagnostic(code(exhibit::unimplemented))]
    NotImplemented { operation: &'static str },
}

impl ExhibitError {
    pub(crate) fn storage(action: StorageAction, path: impl Into<PathBuf>, source: io::Error) -> Self {
        ExhibitError::Storage {
            action,
            path: path.into(),
            source,
        }
    }

    /// The mismatch payload, when this error came from a non-empty diff.
    pub fn mismatch(&self) -> Option<&Mismatch> {
        match self {
            ExhibitError::Mismatch(mismatch) => Some(mismatch),
            _ => None,
        }
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, ExhibitError::Mismatch(_))
    }
}

impl From<Mismatch> for ExhibitError {
    fn from(mismatch: Mismatch) -> Self {
        ExhibitError::Mismatch(mismatch)
    }
}
