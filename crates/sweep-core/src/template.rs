use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{ErrorInfo, SweepError};
use crate::keypath::{insert_deep, KeyPath};

/// Nested parameter mapping as declared in a template.
pub type ParamTree = Map<String, Value>;

/// Sweep directives a template may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Directive {
    /// Cross-product over every axis.
    Grid,
    /// Positional pairing of equally long axes.
    List,
    /// One-factor-at-a-time perturbations of a base record.
    Ablative,
}

impl Directive {
    /// Template key holding the directive block.
    pub const fn key(self) -> &'static str {
        match self {
            Directive::Grid => "grid",
            Directive::List => "list",
            Directive::Ablative => "ablative",
        }
    }
}

/// User declared experiment definition, possibly containing sweep directives.
///
/// The underscore-prefixed fields are bookkeeping owned by the expansion
/// engine. They are accepted on input so that partially expanded templates
/// can be fed back through the engine unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentTemplate {
    pub name: String,
    pub path: String,
    pub repetitions: u32,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub params: ParamTree,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<ParamTree>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<ParamTree>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ablative: Option<ParamTree>,
    #[serde(rename = "_base_path", default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(rename = "_experiment_name", default, skip_serializing_if = "Option::is_none")]
    pub experiment_name: Option<String>,
    #[serde(rename = "_nested_dir", default, skip_serializing_if = "Option::is_none")]
    pub nested_dir: Option<String>,
    /// Keys the engine does not interpret; carried through to every job.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One concrete value bound to a key-path of the parameter tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub path: KeyPath,
    pub value: Value,
}

impl Binding {
    pub fn new(path: KeyPath, value: Value) -> Self {
        Self { path, value }
    }
}

impl ExperimentTemplate {
    /// Creates a template with no parameters and no directives.
    pub fn new(name: impl Into<String>, path: impl Into<String>, repetitions: u32) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            repetitions,
            params: Map::new(),
            grid: None,
            list: None,
            ablative: None,
            base_path: None,
            experiment_name: None,
            nested_dir: None,
            extra: Map::new(),
        }
    }

    /// Decodes a template from a generic mapping and validates it.
    pub fn from_value(value: Value) -> Result<Self, SweepError> {
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("<unnamed>")
            .to_string();
        let template: Self = serde_json::from_value(value).map_err(|err| {
            SweepError::Template(
                ErrorInfo::new("template-decode", err.to_string()).with_context("experiment", name),
            )
        })?;
        template.validate()?;
        Ok(template)
    }

    /// Checks the required fields every downstream record depends on.
    pub fn validate(&self) -> Result<(), SweepError> {
        if self.name.is_empty() {
            return Err(SweepError::Template(ErrorInfo::new(
                "template-name",
                "experiment `name` must not be empty",
            )));
        }
        if self.path.is_empty() {
            return Err(SweepError::Template(
                ErrorInfo::new("template-path", "experiment `path` must not be empty")
                    .with_context("experiment", self.name.clone()),
            ));
        }
        if self.repetitions == 0 {
            return Err(SweepError::Template(
                ErrorInfo::new("template-repetitions", "`repetitions` must be at least 1")
                    .with_context("experiment", self.name.clone()),
            ));
        }
        Ok(())
    }

    /// Returns the block declared for `directive`, if any.
    pub fn directive(&self, directive: Directive) -> Option<&ParamTree> {
        match directive {
            Directive::Grid => self.grid.as_ref(),
            Directive::List => self.list.as_ref(),
            Directive::Ablative => self.ablative.as_ref(),
        }
    }

    /// Returns a copy of the template without the given directive block.
    pub fn without(&self, directive: Directive) -> Self {
        let mut next = self.clone();
        match directive {
            Directive::Grid => next.grid = None,
            Directive::List => next.list = None,
            Directive::Ablative => next.ablative = None,
        }
        next
    }

    /// Fills the bookkeeping fields from `path` and `name` when absent.
    pub fn with_defaults(mut self) -> Self {
        if self.base_path.is_none() {
            self.base_path = Some(self.path.clone());
        }
        if self.experiment_name.is_none() {
            self.experiment_name = Some(self.name.clone());
        }
        if self.nested_dir.is_none() {
            self.nested_dir = Some(String::new());
        }
        self
    }

    /// Working experiment name, falling back to the declared name.
    pub fn experiment_name(&self) -> &str {
        self.experiment_name.as_deref().unwrap_or(&self.name)
    }

    /// Builds a new template with each binding written into `params`.
    pub fn bind(&self, bindings: &[Binding]) -> Result<Self, SweepError> {
        let mut next = self.clone();
        for binding in bindings {
            insert_deep(&mut next.params, &binding.path, binding.value.clone()).map_err(
                |err| match err {
                    SweepError::Directive(info) => {
                        SweepError::Directive(info.with_context("experiment", self.name.clone()))
                    }
                    other => other,
                },
            )?;
        }
        Ok(next)
    }
}

/// Concrete, fully expanded job definition consumed by a launcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub name: String,
    pub path: PathBuf,
    pub log_path: PathBuf,
    pub repetitions: u32,
    #[serde(default)]
    pub params: ParamTree,
    #[serde(rename = "_base_path")]
    pub base_path: String,
    #[serde(rename = "_experiment_name")]
    pub experiment_name: String,
    #[serde(rename = "_nested_dir", default)]
    pub nested_dir: String,
    #[serde(rename = "_rep_idx", default, skip_serializing_if = "Option::is_none")]
    pub rep_idx: Option<u32>,
    #[serde(rename = "_rep_log_path", default, skip_serializing_if = "Option::is_none")]
    pub rep_log_path: Option<PathBuf>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobRecord {
    /// Converts an expanded template into a job record, dropping any directive blocks.
    ///
    /// A carried `_rep_idx` must be a non-negative integer and `_rep_log_path`
    /// a string; anything else is rejected rather than re-unrolled.
    pub fn from_template(template: ExperimentTemplate) -> Result<Self, SweepError> {
        let mut template = template.with_defaults();
        let rep_idx = match template.extra.remove("_rep_idx") {
            None => None,
            Some(value) => Some(
                value
                    .as_u64()
                    .and_then(|idx| u32::try_from(idx).ok())
                    .ok_or_else(|| bookkeeping_error(&template.name, "_rep_idx", &value))?,
            ),
        };
        let rep_log_path = match template.extra.remove("_rep_log_path") {
            None => None,
            Some(Value::String(path)) => Some(PathBuf::from(path)),
            Some(other) => return Err(bookkeeping_error(&template.name, "_rep_log_path", &other)),
        };
        // Recomputed from the normalized path.
        template.extra.remove("log_path");
        let path = PathBuf::from(&template.path);
        let log_path = path.join("log");
        Ok(Self {
            base_path: template.base_path.unwrap_or_default(),
            experiment_name: template.experiment_name.unwrap_or_default(),
            nested_dir: template.nested_dir.unwrap_or_default(),
            name: template.name,
            path,
            log_path,
            repetitions: template.repetitions,
            params: template.params,
            rep_idx,
            rep_log_path,
            extra: template.extra,
        })
    }
}

fn bookkeeping_error(experiment: &str, field: &str, found: &Value) -> SweepError {
    SweepError::Template(
        ErrorInfo::new(
            "template-bookkeeping",
            "engine bookkeeping field carries a value of the wrong type",
        )
        .with_context("experiment", experiment.to_string())
        .with_context("field", field)
        .with_context("found", found.to_string()),
    )
}
