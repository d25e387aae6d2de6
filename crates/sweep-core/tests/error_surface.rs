use sweep_core::errors::{ErrorInfo, SweepError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("experiment", "exp")
        .with_context("key_path", "optimizer.lr")
}

#[test]
fn template_error_surface() {
    let err = SweepError::Template(sample_info("template-repetitions", "zero repetitions"));
    assert_eq!(err.info().code, "template-repetitions");
    assert!(err.info().context.contains_key("experiment"));
}

#[test]
fn directive_error_surface() {
    let err = SweepError::Directive(sample_info("directive-leaf-not-list", "scalar leaf"));
    assert_eq!(err.info().code, "directive-leaf-not-list");
    assert!(err.info().context.contains_key("key_path"));
}

#[test]
fn serde_error_surface() {
    let err = SweepError::Serde(sample_info("yaml_deserialize", "bad document"));
    assert_eq!(err.info().code, "yaml_deserialize");
}

#[test]
fn io_error_surface() {
    let err = SweepError::Io(sample_info("config-read", "missing file"));
    assert_eq!(err.info().code, "config-read");
}

#[test]
fn display_includes_context_and_hint() {
    let err = SweepError::Directive(
        ErrorInfo::new("directive-leaf-not-list", "leaf must be a list")
            .with_context("key_path", "lr")
            .with_hint("use lr: [0.1]"),
    );
    assert_eq!(
        err.to_string(),
        "directive error: leaf must be a list (code: directive-leaf-not-list) | context: [key_path=lr] | hint: use lr: [0.1]"
    );
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = SweepError::Template(ErrorInfo::new("template-decode", "missing field `name`"));
    let value = serde_json::to_value(&err).expect("serialize");
    assert_eq!(value["family"], "Template");
    assert_eq!(value["detail"]["code"], "template-decode");
}
