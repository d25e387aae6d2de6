use proptest::prelude::*;
use serde_json::{json, Map, Value};
use sweep_core::ExperimentTemplate;
use sweep_exp::{expand_experiments, Diagnostic, Diagnostics};

fn list_template(lengths: &[usize]) -> ExperimentTemplate {
    let mut list = Map::new();
    for (axis, len) in lengths.iter().enumerate() {
        let values: Vec<Value> = (0..*len).map(|v| json!(v * 10 + axis)).collect();
        list.insert(format!("k{axis}"), Value::Array(values));
    }
    let mut template = ExperimentTemplate::new("paired", "/out", 1);
    template.list = Some(list);
    template
}

#[test]
fn uneven_lists_truncate_and_warn_once() {
    let mut template = ExperimentTemplate::new("l", "/out", 1);
    template.list = json!({"a": [1, 2, 3], "b": [10, 20]}).as_object().cloned();
    let mut diagnostics = Diagnostics::new();
    let records = expand_experiments(&[template], &mut diagnostics).expect("expand");
    let names: Vec<&str> = records.iter().map(|r| r.experiment_name.as_str()).collect();
    assert_eq!(names, vec!["l__a_1_b_10", "l__a_2_b_20"]);
    assert_eq!(
        diagnostics.entries(),
        &[Diagnostic::UnevenListLengths {
            experiment: "l".to_string(),
            lengths: vec![3, 2],
        }]
    );
    assert!(diagnostics.entries()[0].message().contains("\"l\""));
}

#[test]
fn list_pairs_positionally() {
    let mut template = ExperimentTemplate::new("l", "/out", 1);
    template.list = json!({"model": {"depth": [2, 4]}, "lr": [0.1, 0.2]})
        .as_object()
        .cloned();
    let mut diagnostics = Diagnostics::new();
    let records = expand_experiments(&[template], &mut diagnostics).expect("expand");
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].params["model"]["depth"], json!(4));
    assert_eq!(records[1].params["lr"], json!(0.2));
    assert_eq!(records[1].experiment_name, "l__mod.depth_4_lr_0.2");
}

proptest! {
    #[test]
    fn equal_lists_yield_one_record_per_position(n in 0usize..6, axes in 1usize..4) {
        let template = list_template(&vec![n; axes]);
        let mut diagnostics = Diagnostics::new();
        let records = expand_experiments(&[template], &mut diagnostics).unwrap();
        prop_assert_eq!(records.len(), n);
        prop_assert!(diagnostics.is_empty());
    }

    #[test]
    fn unequal_lists_yield_shortest(short in 0usize..4, extra in 1usize..4) {
        let template = list_template(&[short, short + extra]);
        let mut diagnostics = Diagnostics::new();
        let records = expand_experiments(&[template], &mut diagnostics).unwrap();
        prop_assert_eq!(records.len(), short);
        prop_assert_eq!(diagnostics.len(), 1);
    }
}
