//! # Exhibit Store
//!
//! Resolves comparisons against reference files on disk ("exhibits"), or, in
//! record mode, overwrites those files with the reported output.
//!
//! ## Entry Points
//!
//! - **`compare_object_exhibit`**: dump-style text with addresses normalized.
//! - **`compare_json_exhibit`**: pretty-printed JSON.
//! - **`compare_exhibit`**: caller-supplied text, stored as-is.
//!
//! ## Failure Policy
//!
//! Storage and serialization failures are fatal (`fail_now`). The one exception
//! is `compare_exhibit`: a missing exhibit is a plain failure there, and empty
//! reported text passes without any file access.

use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::compare::{report_mismatch, Comparator, Comparison};
use crate::config::{ExhibitConfig, Mode};
use crate::context::TestContext;
use crate::diff::{Differ, LineDiffer};
use crate::error::{ExhibitError, StorageAction};
use crate::serialize::{PrettyDebug, Serializer};

/// How a failed exhibit read is signalled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Fatal,
    Failure,
}

#[derive(Debug, Clone)]
pub struct ExhibitStore<S = PrettyDebug, D = LineDiffer> {
    config: ExhibitConfig,
    comparator: Comparator<S, D>,
}

impl ExhibitStore {
    pub fn new(config: ExhibitConfig) -> Self {
        Self::with_comparator(config, Comparator::new())
    }
}

impl Default for ExhibitStore {
    fn default() -> Self {
        Self::new(ExhibitConfig::default())
    }
}

impl<S: Serializer, D: Differ> ExhibitStore<S, D> {
    pub fn with_comparator(config: ExhibitConfig, comparator: Comparator<S, D>) -> Self {
        Self { config, comparator }
    }

    pub fn config(&self) -> &ExhibitConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    pub fn comparator(&self) -> &Comparator<S, D> {
        &self.comparator
    }

    /// Compares the normalized dump of `reported` with the exhibit file.
    pub fn compare_object_exhibit<C, T>(
        &self,
        ctx: &mut C,
        exhibit: impl AsRef<Path>,
        reported: &T,
    ) -> Result<(), ExhibitError>
    where
        C: TestContext + ?Sized,
        T: Debug + ?Sized,
    {
        let path = self.config.resolve(exhibit.as_ref());
        let reported = self.comparator.render(reported);

        if self.config.mode.is_record() {
            return write_exhibit(ctx, &path, &reported);
        }

        let expected = read_exhibit(ctx, &path, Severity::Fatal)?;
        self.verify(ctx, &path, &expected, &reported)
    }

    /// Compares the pretty JSON encoding of `reported` with the exhibit file.
    ///
    /// An encoding failure halts the test before the exhibit is touched.
    pub fn compare_json_exhibit<C, T>(
        &self,
        ctx: &mut C,
        exhibit: impl AsRef<Path>,
        reported: &T,
    ) -> Result<(), ExhibitError>
    where
        C: TestContext + ?Sized,
        T: Serialize + ?Sized,
    {
        let path = self.config.resolve(exhibit.as_ref());
        let reported = match self.comparator.serializer().to_json(reported) {
            Ok(json) => json,
            Err(source) => {
                ctx.log(&format!("Couldn't marshal: {}", source));
                ctx.fail_now();
                return Err(ExhibitError::Serialization { source });
            }
        };

        if self.config.mode.is_record() {
            return write_exhibit(ctx, &path, &reported);
        }

        let expected = read_exhibit(ctx, &path, Severity::Fatal)?;
        self.verify(ctx, &path, &expected, &reported)
    }

    /// Compares caller-supplied text with the exhibit file, without any dump
    /// or normalization step.
    ///
    /// Empty `reported` text always passes and touches nothing on disk, in
    /// either mode: the test expects no output and none was produced.
    pub fn compare_exhibit<C>(&self, ctx: &mut C, exhibit: impl AsRef<Path>, reported: &str) -> Result<(), ExhibitError>
    where
        C: TestContext + ?Sized,
    {
        let path = self.config.resolve(exhibit.as_ref());

        if reported.is_empty() {
            tracing::debug!(exhibit = %path.display(), "nothing reported, exhibit skipped");
            return Ok(());
        }

        if self.config.mode.is_record() {
            return write_exhibit(ctx, &path, reported);
        }

        let expected = read_exhibit(ctx, &path, Severity::Failure)?;
        self.verify(ctx, &path, &expected, reported)
    }

    fn verify<C>(&self, ctx: &mut C, path: &Path, expected: &str, reported: &str) -> Result<(), ExhibitError>
    where
        C: TestContext + ?Sized,
    {
        match self.comparator.diff_texts(expected, reported) {
            Comparison::Equal => Ok(()),
            Comparison::Different(mismatch) => Err(report_mismatch(ctx, Some(path), mismatch)),
        }
    }
}

fn write_exhibit<C>(ctx: &mut C, path: &Path, contents: &str) -> Result<(), ExhibitError>
where
    C: TestContext + ?Sized,
{
    match fs::write(path, contents) {
        Ok(()) => {
            tracing::debug!(exhibit = %path.display(), bytes = contents.len(), "exhibit recorded");
            Ok(())
        }
        Err(source) => Err(storage_failure(ctx, StorageAction::Write, path, source, Severity::Fatal)),
    }
}

fn read_exhibit<C>(ctx: &mut C, path: &Path, severity: Severity) -> Result<String, ExhibitError>
where
    C: TestContext + ?Sized,
{
    match fs::read_to_string(path) {
        Ok(contents) => {
            tracing::debug!(exhibit = %path.display(), bytes = contents.len(), "exhibit loaded");
            Ok(contents)
        }
        Err(source) => Err(storage_failure(ctx, StorageAction::Read, path, source, severity)),
    }
}

fn storage_failure<C>(
    ctx: &mut C,
    action: StorageAction,
    path: &Path,
    source: io::Error,
    severity: Severity,
) -> ExhibitError
where
    C: TestContext + ?Sized,
{
    ctx.log(&format!("File Error: {}: {}", path.display(), source));
    match severity {
        Severity::Fatal => ctx.fail_now(),
        Severity::Failure => ctx.fail(),
    }
    ExhibitError::storage(action, path, source)
}
