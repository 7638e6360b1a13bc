//! # Test Context
//!
//! The comparison core never decides how a test fails. It calls into a
//! [`TestContext`], which stands in for the host runner: it logs diagnostics,
//! marks the test failed, or halts it.
//!
//! - [`Harness`] plugs into `cargo test` and panics to fail the test.
//! - [`Recorder`] only remembers what happened, for inspection in tests.

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Failure signalling and logging for the running test.
pub trait TestContext {
    /// Records a diagnostic line.
    fn log(&mut self, message: &str);

    /// Marks the test failed. Execution continues.
    fn fail(&mut self);

    /// Marks the test fatally failed. Implementations that can halt do so
    /// here; callers return immediately afterwards either way.
    fn fail_now(&mut self);

    fn failed(&self) -> bool;
}

// ============================================================================
// RECORDER: captures signals without acting on them
// ============================================================================

/// Collects logs and failure marks into plain fields.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    pub logs: Vec<String>,
    pub failed: bool,
    pub fatal: bool,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// All log lines joined by newlines.
    pub fn output(&self) -> String {
        self.logs.join("\n")
    }
}

impl TestContext for Recorder {
    fn log(&mut self, message: &str) {
        self.logs.push(message.to_string());
    }

    fn fail(&mut self) {
        self.failed = true;
    }

    fn fail_now(&mut self) {
        self.failed = true;
        self.fatal = true;
    }

    fn failed(&self) -> bool {
        self.failed
    }
}

// ============================================================================
// HARNESS: cargo test integration
// ============================================================================

/// A [`TestContext`] for `#[test]` functions.
///
/// Log lines are buffered and only printed once the test has failed. A fatal
/// failure panics at once; a plain failure panics when the harness is dropped.
///
/// ```rust,no_run
/// use exhibit::{ExhibitConfig, ExhibitStore, Harness};
///
/// let mut t = Harness::new("renders_report");
/// let store = ExhibitStore::new(ExhibitConfig::default());
/// let _ = store.compare_exhibit(&mut t, "tests/exhibits/report.txt", "ok\n");
/// ```
pub struct Harness {
    name: String,
    logs: Vec<String>,
    failed: bool,
    use_colors: bool,
}

impl Harness {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            logs: Vec::new(),
            failed: false,
            use_colors: atty::is(atty::Stream::Stderr),
        }
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn flush(&mut self) {
        let choice = if self.use_colors {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stderr = StandardStream::stderr(choice);
        for entry in self.logs.drain(..) {
            for line in entry.lines() {
                print_line(&mut stderr, line);
            }
        }
        let _ = stderr.reset();
    }
}

impl TestContext for Harness {
    fn log(&mut self, message: &str) {
        self.logs.push(message.to_string());
    }

    fn fail(&mut self) {
        self.failed = true;
    }

    fn fail_now(&mut self) {
        self.failed = true;
        self.flush();
        panic!("{}: fatal exhibit failure", self.name);
    }

    fn failed(&self) -> bool {
        self.failed
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        if self.failed && !std::thread::panicking() {
            self.flush();
            panic!("{}: exhibit comparison failed", self.name);
        }
    }
}

fn print_line(stream: &mut StandardStream, line: &str) {
    let color = if line.starts_with("---") || line.starts_with("+++") {
        None
    } else if line.starts_with("@@") {
        Some(Color::Cyan)
    } else if line.starts_with('-') {
        Some(Color::Red)
    } else if line.starts_with('+') {
        Some(Color::Green)
    } else {
        None
    };

    match color {
        Some(color) => {
            let _ = stream.set_color(ColorSpec::new().set_fg(Some(color)));
        }
        None => {
            let _ = stream.reset();
        }
    }
    let _ = writeln!(stream, "{}", line);
}
