//! Shared types for the squish pipeline.
//!
//! Everything the other crates agree on lives here:
//! - [`Family`]: the four supported text families
//! - [`PipelineError`] / [`FailureKind`]: the failure taxonomy
//! - the option model ([`OptionSet`], [`PartialOptionSet`], [`resolve`])
//! - carrier types ([`SourceText`], [`Fragment`], [`Classification`])

pub mod error;
pub mod family;
pub mod options;
pub mod types;

pub use error::{FailureKind, PipelineError, Result};
pub use family::Family;
pub use options::{
    resolve, Aggressiveness, JsonOptions, OptionSet, PartialOptionSet, ScriptOptions,
    SerializedOptions, StylesheetOptions,
};
pub use types::{Classification, Fragment, SourceText};
