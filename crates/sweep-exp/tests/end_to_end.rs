use std::path::PathBuf;

use serde_json::json;
use sweep_core::ExperimentTemplate;
use sweep_exp::{unfold, Expansion};

fn lr_template() -> ExperimentTemplate {
    ExperimentTemplate::from_value(json!({
        "name": "exp",
        "path": "/out",
        "repetitions": 2,
        "grid": {"lr": [0.1, 0.01]},
    }))
    .expect("template")
}

#[test]
fn grid_template_unrolls_into_named_repetitions() {
    let expansion = unfold(&[lr_template()]).expect("unfold");
    let summary: Vec<(String, Option<u32>)> = expansion
        .jobs
        .iter()
        .map(|job| (job.experiment_name.clone(), job.rep_idx))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("exp__lr_0.1".to_string(), Some(0)),
            ("exp__lr_0.1".to_string(), Some(1)),
            ("exp__lr_0.01".to_string(), Some(0)),
            ("exp__lr_0.01".to_string(), Some(1)),
        ]
    );
    let first = &expansion.jobs[0];
    assert_eq!(first.nested_dir, "exp");
    assert_eq!(first.base_path, "/out");
    assert_eq!(first.path, PathBuf::from("/out/exp/exp__lr_0.1"));
    assert_eq!(first.log_path, PathBuf::from("/out/exp/exp__lr_0.1/log"));
    assert_eq!(
        first.rep_log_path,
        Some(PathBuf::from("/out/exp/exp__lr_0.1/log/rep_00"))
    );
    assert_eq!(
        expansion.jobs[3].rep_log_path,
        Some(PathBuf::from("/out/exp/exp__lr_0.01/log/rep_01"))
    );
    assert_eq!(first.params.get("lr"), Some(&json!(0.1)));
    assert!(expansion.diagnostics.is_empty());
}

#[test]
fn plain_template_keeps_its_name() {
    let mut template = ExperimentTemplate::new("plain", "/runs/./base", 1);
    template.params.insert("seed".into(), json!(7));
    let expansion = unfold(&[template]).expect("unfold");
    assert_eq!(expansion.jobs.len(), 1);
    let job = &expansion.jobs[0];
    assert_eq!(job.experiment_name, "plain");
    assert_eq!(job.nested_dir, "");
    assert_eq!(job.path, PathBuf::from("/runs/base/plain"));
    assert_eq!(job.rep_idx, Some(0));
}

#[test]
fn expansion_is_deterministic() {
    let mut second = ExperimentTemplate::new("other", "/out", 3);
    second.list = json!({"model": {"depth": [2, 4], "width": [64, 128]}})
        .as_object()
        .cloned();
    let templates = vec![lr_template(), second];
    let a = unfold(&templates).expect("unfold");
    let b = unfold(&templates).expect("unfold");
    assert_eq!(a, b);
    assert_eq!(
        a.to_manifest_bytes().expect("json"),
        b.to_manifest_bytes().expect("json")
    );
    assert_eq!(a.plan_hash.len(), 64);
}

#[test]
fn plan_hash_tracks_template_contents() {
    let base = unfold(&[lr_template()]).expect("unfold");
    let mut changed = lr_template();
    changed.repetitions = 3;
    let other = unfold(&[changed]).expect("unfold");
    assert_ne!(base.plan_hash, other.plan_hash);
}

#[test]
fn records_serialize_with_bookkeeping_keys() {
    let expansion = unfold(&[lr_template()]).expect("unfold");
    let value = serde_json::to_value(&expansion.jobs[1]).expect("serialize");
    assert_eq!(value["_experiment_name"], "exp__lr_0.1");
    assert_eq!(value["_rep_idx"], 1);
    assert_eq!(value["_rep_log_path"], "/out/exp/exp__lr_0.1/log/rep_01");
    assert!(value.get("grid").is_none());
}

#[test]
fn manifest_bytes_decode_back_into_expansion() {
    let expansion = unfold(&[lr_template()]).expect("unfold");
    let bytes = expansion.to_manifest_bytes().expect("json");
    let decoded = Expansion::from_manifest_bytes(&bytes).expect("decode");
    assert_eq!(decoded, expansion);
}
