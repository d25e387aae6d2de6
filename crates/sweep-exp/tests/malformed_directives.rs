use serde_json::json;
use sweep_core::{ExperimentTemplate, SweepError};
use sweep_exp::{templates_from_str, unfold};

#[test]
fn scalar_ablative_leaf_is_fatal() {
    let mut template = ExperimentTemplate::new("abl", "/out", 1);
    template.ablative = json!({"a": 5}).as_object().cloned();
    let err = unfold(&[template]).expect_err("scalar leaf");
    assert!(matches!(err, SweepError::Directive(_)));
    let info = err.info();
    assert_eq!(info.code, "directive-leaf-not-list");
    assert_eq!(info.context["key_path"], "a");
    assert_eq!(info.context["directive"], "ablative");
    assert_eq!(info.context["experiment"], "abl");
}

#[test]
fn scalar_grid_leaf_is_fatal() {
    let mut template = ExperimentTemplate::new("g", "/out", 1);
    template.grid = json!({"opt": {"lr": 0.1}}).as_object().cloned();
    let err = unfold(&[template]).expect_err("scalar leaf");
    assert_eq!(err.info().code, "directive-leaf-not-list");
    assert_eq!(err.info().context["key_path"], "opt.lr");
    assert_eq!(err.info().context["directive"], "grid");
}

#[test]
fn sweep_through_scalar_param_is_fatal() {
    let mut template = ExperimentTemplate::new("g", "/out", 1);
    template.params.insert("opt".into(), json!("sgd"));
    template.grid = json!({"opt": {"lr": [0.1]}}).as_object().cloned();
    let err = unfold(&[template]).expect_err("conflict");
    assert_eq!(err.info().code, "keypath-conflict");
    assert_eq!(err.info().context["experiment"], "g");
}

#[test]
fn one_bad_template_fails_the_whole_call() {
    let good = ExperimentTemplate::new("good", "/out", 1);
    let bad = ExperimentTemplate::new("bad", "/out", 0);
    let err = unfold(&[good, bad]).expect_err("invalid repetitions");
    assert_eq!(err.info().code, "template-repetitions");
}

#[test]
fn missing_required_field_in_config_is_fatal() {
    let err = templates_from_str("name: exp\nrepetitions: 1\n", &[]).expect_err("no path");
    assert!(matches!(err, SweepError::Template(_)));
    assert!(err.info().message.contains("path"));
}
