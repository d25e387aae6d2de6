#![deny(missing_docs)]
#![doc = "Core types, errors and key-path helpers shared by the sweep expansion crates."]

pub mod errors;
pub mod keypath;
/// Experiment templates and concrete job records.
#[allow(missing_docs)]
pub mod template;

pub use errors::{ErrorInfo, SweepError};
pub use keypath::{flatten, insert_deep, KeyPath, SweepAxis};
pub use template::{Binding, Directive, ExperimentTemplate, JobRecord, ParamTree};
