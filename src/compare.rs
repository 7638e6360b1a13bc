//! # Comparator
//!
//! Serializes both sides of a comparison, scrubs volatile addresses out of the
//! result, diffs the two texts and reports a non-empty diff as a test failure.
//!
//! The pieces are injected: a [`Serializer`] for turning values into text and a
//! [`Differ`] for the diff itself. [`Comparator::new`] wires in the defaults.

use std::fmt::{self, Debug};
use std::path::Path;

use crate::context::TestContext;
use crate::diff::{DiffOptions, Differ, LineDiffer};
use crate::error::{ExhibitError, Mismatch};
use crate::normalize::{normalize, AddressStyle};
use crate::serialize::{PrettyDebug, Serializer};

/// Outcome of comparing two texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    Different(Mismatch),
}

impl Comparison {
    pub fn is_equal(&self) -> bool {
        matches!(self, Comparison::Equal)
    }

    pub fn into_result(self) -> Result<(), ExhibitError> {
        match self {
            Comparison::Equal => Ok(()),
            Comparison::Different(mismatch) => Err(ExhibitError::Mismatch(mismatch)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Comparator<S = PrettyDebug, D = LineDiffer> {
    serializer: S,
    differ: D,
    style: AddressStyle,
    options: DiffOptions,
}

impl Comparator {
    /// Key-sorted alternate-`Debug` dumps, bare address normalization and a
    /// 3-line-context diff labelled `Expected` / `Reported`.
    pub fn new() -> Self {
        Self::with_parts(PrettyDebug, LineDiffer)
    }
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Serializer, D: Differ> Comparator<S, D> {
    pub fn with_parts(serializer: S, differ: D) -> Self {
        Self {
            serializer,
            differ,
            style: AddressStyle::default(),
            options: DiffOptions::default(),
        }
    }

    pub fn with_address_style(mut self, style: AddressStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_options(mut self, options: DiffOptions) -> Self {
        self.options = options;
        self
    }

    pub fn serializer(&self) -> &S {
        &self.serializer
    }

    /// Dumps a value and normalizes the addresses in it.
    pub fn render<T: Debug + ?Sized>(&self, value: &T) -> String {
        normalize(&self.serializer.dump(value), self.style)
    }

    /// Diffs two already-rendered texts. No side effects.
    pub fn diff_texts(&self, expected: &str, reported: &str) -> Comparison {
        let diff = self.differ.unified_diff(expected, reported, &self.options);
        if diff.is_empty() {
            Comparison::Equal
        } else {
            Comparison::Different(Mismatch {
                expected: expected.to_string(),
                reported: reported.to_string(),
                diff,
            })
        }
    }

    /// Compares the dumps of two values and fails the test when they differ.
    pub fn compare_objects<C, T, U>(&self, ctx: &mut C, expected: &T, reported: &U) -> Result<(), ExhibitError>
    where
        C: TestContext + ?Sized,
        T: Debug + ?Sized,
        U: Debug + ?Sized,
    {
        self.compare_rendered(ctx, expected, reported, None)
    }

    /// Like [`compare_objects`](Self::compare_objects), logging `message`
    /// ahead of the diff on failure.
    pub fn compare_objects_with_message<C, T, U>(
        &self,
        ctx: &mut C,
        expected: &T,
        reported: &U,
        message: fmt::Arguments<'_>,
    ) -> Result<(), ExhibitError>
    where
        C: TestContext + ?Sized,
        T: Debug + ?Sized,
        U: Debug + ?Sized,
    {
        self.compare_rendered(ctx, expected, reported, Some(message))
    }

    fn compare_rendered<C, T, U>(
        &self,
        ctx: &mut C,
        expected: &T,
        reported: &U,
        message: Option<fmt::Arguments<'_>>,
    ) -> Result<(), ExhibitError>
    where
        C: TestContext + ?Sized,
        T: Debug + ?Sized,
        U: Debug + ?Sized,
    {
        let expected = self.render(expected);
        let reported = self.render(reported);

        match self.diff_texts(&expected, &reported) {
            Comparison::Equal => Ok(()),
            Comparison::Different(mismatch) => {
                if let Some(message) = message {
                    ctx.log(&message.to_string());
                }
                Err(report_mismatch(ctx, None, mismatch))
            }
        }
    }

    /// Declared for string-to-string comparison; halts the test.
    pub fn compare_strings<C>(&self, ctx: &mut C, _expected: &str, _reported: &str) -> Result<(), ExhibitError>
    where
        C: TestContext + ?Sized,
    {
        Err(not_implemented(ctx, "compare_strings"))
    }

    /// Declared for comparison against a named snapshot; halts the test.
    pub fn compare_snapshot<C, T>(&self, ctx: &mut C, _expected: &str, _reported: &T) -> Result<(), ExhibitError>
    where
        C: TestContext + ?Sized,
        T: Debug + ?Sized,
    {
        Err(not_implemented(ctx, "compare_snapshot"))
    }
}

/// Logs the diff, marks the test failed and hands back the error to return.
pub(crate) fn report_mismatch<C>(ctx: &mut C, exhibit: Option<&Path>, mismatch: Mismatch) -> ExhibitError
where
    C: TestContext + ?Sized,
{
    if let Some(exhibit) = exhibit {
        ctx.log(&format!("Exhibit: {}", exhibit.display()));
    }
    ctx.log(&format!("\n{}", mismatch.diff));
    ctx.fail();
    ExhibitError::Mismatch(mismatch)
}

fn not_implemented<C>(ctx: &mut C, operation: &'static str) -> ExhibitError
where
    C: TestContext + ?Sized,
{
    let error = ExhibitError::NotImplemented { operation };
    ctx.log(&error.to_string());
    ctx.fail_now();
    error
}
