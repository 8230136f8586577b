use super::*;
use serde_json::json;

#[test]
fn clone_excludes_functions_and_preserves_index() {
    let state = DynamicState::new()
        .with("a", 1)
        .with_function("b", |_| Value::Null)
        .with(INDEX_KEY, 7);

    let cloned = state.clone_state();

    assert_eq!(cloned.get("a"), Some(&json!(1)));
    assert!(!cloned.contains("b"));
    assert_eq!(cloned.get(INDEX_KEY), Some(&json!(7)));
}

#[test]
fn index_survives_even_when_function_valued() {
    let state = DynamicState::new().with_function(INDEX_KEY, |_| json!("computed"));

    let cloned = state.clone_state();
    assert!(cloned.index().is_some_and(StateValue::is_function));
    assert_eq!(cloned.call(INDEX_KEY), Some(json!("computed")));
}

#[test]
fn clone_onto_keeps_target_defaults() {
    let target = DynamicState::new().with("theme", "dark").with("a", 0);
    let state = DynamicState::new().with("a", 2);

    let cloned = state.clone_onto(target);
    assert_eq!(cloned.get("a"), Some(&json!(2)));
    assert_eq!(cloned.get("theme"), Some(&json!("dark")));
}

#[test]
fn clone_is_independent_of_source() {
    let state = DynamicState::new().with("items", json!([1, 2]));
    let mut cloned = state.clone_state();
    cloned.set("items", json!([1, 2, 3]));

    assert_eq!(state.get("items"), Some(&json!([1, 2])));
}

#[test]
fn computed_properties_see_the_state() {
    let state = DynamicState::new()
        .with("count", 3)
        .with_function("double", |state| {
            json!(state.get("count").and_then(Value::as_i64).unwrap_or(0) * 2)
        });

    assert_eq!(state.call("double"), Some(json!(6)));
    assert_eq!(state.get("double"), None);
    assert_eq!(state.call("count"), None);
}

#[test]
fn json_view_lists_data_only() {
    let state = DynamicState::new()
        .with("a", 1)
        .with_function("f", |_| Value::Null);
    assert_eq!(state.to_json(), json!({"a": 1}));
    assert_eq!(state.len(), 2);
    assert_eq!(state.keys().collect::<Vec<_>>(), vec!["a", "f"]);
}
