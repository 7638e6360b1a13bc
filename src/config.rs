//! # Exhibit Configuration
//!
//! Record mode is chosen once per process from the `TEST_SNAPSHOT` environment
//! variable and then handed to each [`ExhibitStore`](crate::store::ExhibitStore)
//! through an [`ExhibitConfig`]. Nothing re-reads the environment per call.

use std::env;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;

/// Environment variable that toggles record mode.
pub const RECORD_ENV_VAR: &str = "TEST_SNAPSHOT";

/// Exact value of [`RECORD_ENV_VAR`] that selects record mode.
pub const RECORD_SENTINEL: &str = "TRUE";

static PROCESS_MODE: Lazy<Mode> = Lazy::new(|| {
    let mode = Mode::from_value(env::var(RECORD_ENV_VAR).ok().as_deref());
    tracing::debug!(?mode, var = RECORD_ENV_VAR, "exhibit mode selected");
    mode
});

/// Whether exhibits are compared against or overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Verify,
    Record,
}

impl Mode {
    /// The process-wide mode, read from the environment on first use.
    pub fn from_env() -> Self {
        *PROCESS_MODE
    }

    /// Parses a raw environment value. Only the exact sentinel records.
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some(RECORD_SENTINEL) => Mode::Record,
            _ => Mode::Verify,
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Mode::Record)
    }
}

/// Settings shared by every comparison an [`ExhibitStore`](crate::store::ExhibitStore) runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExhibitConfig {
    pub mode: Mode,
    /// Directory that relative exhibit names are resolved against.
    pub root: Option<PathBuf>,
}

impl ExhibitConfig {
    pub fn new(mode: Mode) -> Self {
        Self { mode, root: None }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Resolves an exhibit name to the path that is read or written.
    pub fn resolve(&self, exhibit: &Path) -> PathBuf {
        match &self.root {
            Some(root) if exhibit.is_relative() => root.join(exhibit),
            _ => exhibit.to_path_buf(),
        }
    }
}

impl Default for ExhibitConfig {
    fn default() -> Self {
        Self::new(Mode::from_env())
    }
}
