use sweep_core::errors::SweepError;
use sweep_core::{flatten, Binding, Directive, ExperimentTemplate, KeyPath};

use crate::combine::annotate_ablative;
use crate::naming::{extend_experiment_name, short_keys};

/// Builds the single-factor variants of every base record.
///
/// For each record carrying an `ablative` block, each key-path and each of its
/// candidate values produce one variant that overrides only that key-path.
/// Only the variants are returned; callers decide whether to keep the bases.
pub fn ablative_expand(bases: &[ExperimentTemplate]) -> Result<Vec<ExperimentTemplate>, SweepError> {
    let mut variants = Vec::new();
    for base in bases {
        let Some(block) = base.directive(Directive::Ablative) else {
            continue;
        };
        let axes = flatten(block).map_err(|err| annotate_ablative(err, base))?;
        let paths: Vec<KeyPath> = axes.iter().map(|axis| axis.path.clone()).collect();
        let keys = short_keys(&paths);
        let stripped = base.without(Directive::Ablative);
        for (axis, key) in axes.iter().zip(&keys) {
            for value in &axis.values {
                let bound = stripped.bind(&[Binding::new(axis.path.clone(), value.clone())])?;
                variants.push(extend_experiment_name(
                    bound,
                    std::slice::from_ref(key),
                    std::slice::from_ref(value),
                ));
            }
        }
    }
    Ok(variants)
}
