use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use sweep_core::errors::SweepError;
use sweep_core::{Directive, ExperimentTemplate, JobRecord};

use crate::ablative::ablative_expand;
use crate::combine::combine;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::manifest::plan_hash;
use crate::paths::normalize_paths;
use crate::unroll::unroll_repetitions;

/// Result of unfolding a set of templates into runnable jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expansion {
    /// Hash of the input templates, stable across runs.
    pub plan_hash: String,
    /// One record per variant and repetition.
    pub jobs: Vec<JobRecord>,
    /// Non-fatal findings raised during expansion.
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

/// Expands templates into concrete parameter assignments and unrolls repetitions.
pub fn unfold(templates: &[ExperimentTemplate]) -> Result<Expansion, SweepError> {
    let plan_hash = plan_hash(templates)?;
    let mut diagnostics = Diagnostics::new();
    let expanded = expand_experiments(templates, &mut diagnostics)?;
    Ok(Expansion {
        plan_hash,
        jobs: unroll_repetitions(expanded),
        diagnostics: diagnostics.into_vec(),
    })
}

/// Expands every template into concrete, path-normalized job records.
///
/// Templates carrying both `grid` and `list` are resolved in two passes: the
/// list pairing runs first and each paired variant is pushed to the back of
/// the work queue with its `grid` still attached.
pub fn expand_experiments(
    templates: &[ExperimentTemplate],
    diagnostics: &mut Diagnostics,
) -> Result<Vec<JobRecord>, SweepError> {
    for template in templates {
        template.validate()?;
    }

    let mut queue: VecDeque<ExperimentTemplate> = templates.iter().cloned().collect();
    let mut expanded = Vec::new();
    while let Some(template) = queue.pop_front() {
        let template = template.with_defaults();

        if template.grid.is_some() && template.list.is_some() {
            queue.extend(combine(&template, Some(Directive::List), diagnostics)?);
            continue;
        }

        let directive = if template.list.is_some() {
            Some(Directive::List)
        } else if template.grid.is_some() {
            Some(Directive::Grid)
        } else {
            None
        };
        let mut expansion = combine(&template, directive, diagnostics)?;
        if template.ablative.is_some() {
            let variants = ablative_expand(&expansion)?;
            expansion.extend(variants);
        }
        for template in expansion {
            expanded.push(JobRecord::from_template(template)?);
        }
    }
    Ok(normalize_paths(expanded))
}
