use super::*;

use controller_core::Controller;

fn counter_controller(step: i64) -> (Controller<DynamicState, Payload>, Rc<CounterModule>) {
    let counter = CounterModule::new(step);
    let controller = Controller::<DynamicState, Payload>::builder()
        .initial_state(empty_state)
        .render(|_| {})
        .component("counter", Rc::clone(&counter))
        .build()
        .expect("controller");
    (controller, counter)
}

#[test]
fn null_payload_means_one_step() {
    let counter = CounterModule::new(3);
    assert_eq!(counter.steps(Value::Null), 3);
    assert_eq!(counter.steps(json!(8)), 8);
}

#[test]
fn increment_saturates_at_the_largest_count() {
    let (controller, counter) = counter_controller(1);
    controller.emit(INCREMENT, json!(i64::MAX)).expect("inc");
    controller.emit(INCREMENT, Value::Null).expect("inc");

    assert_eq!(counter.count(), Some(i64::MAX));
    assert_eq!(controller.state().call("doubled"), Some(json!(i64::MAX)));
}

#[test]
fn negative_increment_is_ignored() {
    let (controller, counter) = counter_controller(1);
    controller.emit(INCREMENT, json!(4)).expect("inc");
    controller.emit(INCREMENT, json!(-10)).expect("inc");
    assert_eq!(counter.count(), Some(4));
}

#[test]
fn decrement_amount_is_clamped_to_the_count() {
    let (controller, counter) = counter_controller(1);
    controller.emit(DECREMENT, json!(-5)).expect("dec");
    assert_eq!(counter.count(), Some(0));

    controller.emit(INCREMENT, json!(3)).expect("inc");
    controller.emit(DECREMENT, json!(i64::MIN)).expect("dec");
    assert_eq!(counter.count(), Some(3));

    controller.emit(DECREMENT, json!(100)).expect("dec");
    assert_eq!(counter.count(), Some(0));
}

#[test]
fn count_is_unknown_until_joined() {
    let counter = CounterModule::new(1);
    assert_eq!(counter.count(), None);
}

#[test]
fn empty_state_has_computed_double() {
    let state = empty_state().with("count", 4);
    assert_eq!(count_of(&state), 4);
    assert_eq!(state.call("doubled"), Some(json!(8)));
    assert_eq!(state.to_json(), json!({ "count": 4, "route": null, "routes": [] }));
}

#[test]
fn history_requires_reset_and_reports_the_gap_without_it() {
    let history = HistoryModule::new();
    let controller = Controller::<DynamicState, Payload>::builder()
        .initial_state(empty_state)
        .render(|_| {})
        .component("history", Rc::clone(&history))
        .build()
        .expect("controller");

    let report = controller.composition_report();
    assert_eq!(report.missing_required(), [EventType::new(RESET)]);
    assert!(history.is_linked());

    controller.emit(NAVIGATE, json!("/home")).expect("navigate");
    assert_eq!(controller.state().get("route"), Some(&json!("/home")));
}
