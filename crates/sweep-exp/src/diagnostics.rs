use serde::{Deserialize, Serialize};

/// Non-fatal findings raised while expanding templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A `list` directive paired axes of different lengths; pairing stopped
    /// at the shortest one.
    UnevenListLengths {
        experiment: String,
        lengths: Vec<usize>,
    },
}

impl Diagnostic {
    /// Human readable rendering used by log sinks.
    pub fn message(&self) -> String {
        match self {
            Diagnostic::UnevenListLengths {
                experiment,
                lengths,
            } => format!(
                "list params of experiment \"{experiment}\" are not of equal length ({lengths:?}); pairing stops at the shortest"
            ),
        }
    }
}

/// Collector handed to the expansion engine in place of a global logger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}
