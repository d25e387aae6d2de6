use serde_json::Value;
use sweep_core::errors::SweepError;
use sweep_core::{flatten, Binding, Directive, ExperimentTemplate, KeyPath, SweepAxis};

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::naming::{extend_experiment_name, short_keys};

/// How the value lists of a directive are combined into tuples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineMode {
    /// Full cross-product, first axis varying slowest.
    Product,
    /// Positional pairing, truncated to the shortest axis.
    Zip,
}

impl CombineMode {
    /// Combination mode used for a sweep directive.
    pub fn for_directive(directive: Directive) -> Option<Self> {
        match directive {
            Directive::Grid => Some(CombineMode::Product),
            Directive::List => Some(CombineMode::Zip),
            Directive::Ablative => None,
        }
    }
}

/// Expands one directive of `template` into one template per value tuple.
///
/// `None` (or a directive the template does not carry) yields the template
/// itself. Each emitted template has the directive block removed, every
/// swept value bound into `params`, and its experiment name extended.
pub fn combine(
    template: &ExperimentTemplate,
    directive: Option<Directive>,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<ExperimentTemplate>, SweepError> {
    let Some((directive, mode)) =
        directive.and_then(|d| CombineMode::for_directive(d).map(|mode| (d, mode)))
    else {
        return Ok(vec![template.clone()]);
    };
    let Some(block) = template.directive(directive) else {
        return Ok(vec![template.clone()]);
    };
    let axes = flatten(block).map_err(|err| annotate(err, template, directive))?;
    let base = template.without(directive);
    if axes.is_empty() {
        return Ok(vec![base]);
    }

    if mode == CombineMode::Zip {
        let lengths: Vec<usize> = axes.iter().map(|axis| axis.values.len()).collect();
        if lengths.windows(2).any(|pair| pair[0] != pair[1]) {
            diagnostics.push(Diagnostic::UnevenListLengths {
                experiment: template.name.clone(),
                lengths,
            });
        }
    }

    let paths: Vec<KeyPath> = axes.iter().map(|axis| axis.path.clone()).collect();
    let keys = short_keys(&paths);
    let tuples = match mode {
        CombineMode::Product => product(&axes),
        CombineMode::Zip => zip(&axes),
    };

    let mut combined = Vec::with_capacity(tuples.len());
    for values in tuples {
        let bindings: Vec<Binding> = paths
            .iter()
            .cloned()
            .zip(values.iter().cloned())
            .map(|(path, value)| Binding::new(path, value))
            .collect();
        let bound = base.bind(&bindings)?;
        combined.push(extend_experiment_name(bound, &keys, &values));
    }
    Ok(combined)
}

/// Cross-product of every axis, in odometer order with the last axis fastest.
pub fn product(axes: &[SweepAxis]) -> Vec<Vec<Value>> {
    let mut outputs = Vec::new();
    expand_product(axes, 0, Vec::with_capacity(axes.len()), &mut outputs);
    outputs
}

fn expand_product(
    axes: &[SweepAxis],
    idx: usize,
    current: Vec<Value>,
    outputs: &mut Vec<Vec<Value>>,
) {
    if idx == axes.len() {
        outputs.push(current);
        return;
    }
    for value in &axes[idx].values {
        let mut next = current.clone();
        next.push(value.clone());
        expand_product(axes, idx + 1, next, outputs);
    }
}

/// Positional tuples across every axis, stopping at the shortest.
pub fn zip(axes: &[SweepAxis]) -> Vec<Vec<Value>> {
    let len = axes.iter().map(|axis| axis.values.len()).min().unwrap_or(0);
    (0..len)
        .map(|idx| axes.iter().map(|axis| axis.values[idx].clone()).collect())
        .collect()
}

fn annotate(err: SweepError, template: &ExperimentTemplate, directive: Directive) -> SweepError {
    match err {
        SweepError::Directive(info) => SweepError::Directive(
            info.with_context("experiment", template.name.clone())
                .with_context("directive", directive.key()),
        ),
        other => other,
    }
}

pub(crate) fn annotate_ablative(err: SweepError, template: &ExperimentTemplate) -> SweepError {
    annotate(err, template, Directive::Ablative)
}
