//! Expansion of declarative experiment templates into concrete, per-repetition job records.

mod ablative;
mod combine;
mod diagnostics;
mod expand;
mod load;
mod manifest;
mod naming;
mod paths;
mod unroll;

pub use ablative::ablative_expand;
pub use combine::{combine, product, zip, CombineMode};
pub use diagnostics::{Diagnostic, Diagnostics};
pub use expand::{expand_experiments, unfold, Expansion};
pub use load::{
    experiment_names, load_templates, merge_deep, templates_from_str, DEFAULT_DOCUMENT,
    SLURM_DOCUMENT,
};
pub use manifest::plan_hash;
pub use naming::{
    extend_experiment_name, sanitize_value, short_keys, shorten_key, suffix_for,
    PRIMARY_SEPARATOR, SECONDARY_SEPARATOR,
};
pub use paths::{normalize_lexically, normalize_paths, LOG_DIR};
pub use unroll::{rep_dir_name, unroll_repetitions};
