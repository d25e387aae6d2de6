use std::path::{Component, Path, PathBuf};

use sweep_core::JobRecord;

/// Directory name holding the logs of one experiment variant.
pub const LOG_DIR: &str = "log";

/// Resolves the on-disk location of every record.
///
/// `path` becomes `_base_path/_nested_dir/_experiment_name` (lexically
/// normalized) and `log_path` sits beneath it. Order is preserved.
pub fn normalize_paths(records: Vec<JobRecord>) -> Vec<JobRecord> {
    records.into_iter().map(normalize_record).collect()
}

fn normalize_record(mut record: JobRecord) -> JobRecord {
    let mut joined = PathBuf::from(&record.base_path);
    if !record.nested_dir.is_empty() {
        joined.push(&record.nested_dir);
    }
    joined.push(&record.experiment_name);
    record.path = normalize_lexically(&joined);
    record.log_path = record.path.join(LOG_DIR);
    record
}

/// Removes `.` components and folds `..` without touching the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}
