//! # Exhibit
//!
//! Golden-file comparisons for tests. A freshly computed value is serialized,
//! scrubbed of memory addresses and diffed against a recorded reference (an
//! "exhibit"). Differences are reported through the running test's
//! [`TestContext`] as a unified diff.
//!
//! Setting `TEST_SNAPSHOT=TRUE` switches file-backed comparisons to record
//! mode, which overwrites each exhibit with the reported output.

pub use crate::compare::{Comparator, Comparison};
pub use crate::config::{ExhibitConfig, Mode, RECORD_ENV_VAR, RECORD_SENTINEL};
pub use crate::context::{Harness, Recorder, TestContext};
pub use crate::diff::{DiffOptions, Differ, LineDiffer};
pub use crate::error::{ExhibitError, Mismatch, StorageAction};
pub use crate::normalize::{normalize, normalize_pointers, normalize_wrapped_pointers, AddressStyle};
pub use crate::serialize::{PrettyDebug, Serializer};
pub use crate::store::ExhibitStore;

pub mod compare;
pub mod config;
pub mod context;
pub mod diff;
pub mod error;
pub mod normalize;
pub mod serialize;
pub mod store;
