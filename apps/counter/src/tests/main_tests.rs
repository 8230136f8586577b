use super::{build_controller, parse_command, Args};

use std::rc::Rc;

use clap::Parser;
use controller_core::{HistoryKind, HistoryRouter};
use serde_json::{json, Value};

use crate::{
    config::Settings,
    modules::{count_of, CounterModule, HistoryModule, DECREMENT, INCREMENT, NAVIGATE, RESET},
};

#[test]
fn parses_commands() {
    assert_eq!(parse_command("inc").expect("inc"), (INCREMENT, Value::Null));
    assert_eq!(parse_command("increment:4").expect("inc"), (INCREMENT, json!(4)));
    assert_eq!(parse_command("DEC:2").expect("dec"), (DECREMENT, json!(2)));
    assert_eq!(parse_command("reset").expect("reset"), (RESET, Value::Null));
    assert_eq!(parse_command("goto:/about").expect("goto"), (NAVIGATE, json!("/about")));
}

#[test]
fn rejects_malformed_commands() {
    assert!(parse_command("jump").is_err());
    assert!(parse_command("inc:lots").is_err());
    assert!(parse_command("goto:").is_err());
    assert!(parse_command("reset:1").is_err());
}

#[test]
fn cli_flags_override_settings() {
    let args = Args::parse_from(["counter", "--history", "browser", "--step", "3", "--log-dispatch", "inc"]);
    let mut settings = Settings::default();
    args.apply(&mut settings);

    assert_eq!(settings.history, HistoryKind::Browser);
    assert_eq!(settings.step, 3);
    assert!(settings.log_dispatch);
    assert_eq!(args.commands, vec!["inc".to_string()]);
}

#[test]
fn counter_demo_runs_end_to_end() {
    let settings = Settings {
        step: 2,
        log_dispatch: true,
        ..Settings::default()
    };
    let counter = CounterModule::new(settings.step);
    let history = HistoryModule::new();
    let router = Rc::new(HistoryRouter::with_history_kind(settings.history));
    let controller = build_controller(&settings, Rc::clone(&counter), Rc::clone(&history), Rc::clone(&router))
        .expect("controller");

    assert!(controller.composition_report().is_complete());
    assert_eq!(controller.event_types(), ["RESET", "INCREMENT", "DECREMENT", "NAVIGATE"]);
    assert!(history.is_linked());

    controller.run();
    controller.emit(INCREMENT, Value::Null).expect("inc");
    controller.emit(INCREMENT, json!(5)).expect("inc");
    assert_eq!(counter.count(), Some(7));

    controller.emit(DECREMENT, json!(100)).expect("dec");
    assert_eq!(count_of(&controller.state()), 0);

    controller.emit(NAVIGATE, json!("/stats")).expect("navigate");
    assert_eq!(router.entries(), vec!["#/stats".to_string()]);
    assert_eq!(controller.state().get("route"), Some(&json!("#/stats")));

    controller.emit(INCREMENT, json!(3)).expect("inc");
    controller.emit(RESET, Value::Null).expect("reset");
    let state = controller.state();
    assert_eq!(count_of(&state), 0);
    assert_eq!(state.get("routes"), Some(&json!(["#/stats"])));

    let snapshot = controller.clone_state(&state);
    assert_eq!(snapshot.call("doubled"), Some(json!(0)));
    assert_eq!(snapshot.get("route"), Some(&json!("#/stats")));
}

#[test]
fn computed_property_follows_count() {
    let settings = Settings::default();
    let controller = build_controller(
        &settings,
        CounterModule::new(1),
        HistoryModule::new(),
        Rc::new(HistoryRouter::new()),
    )
    .expect("controller");

    controller.emit(INCREMENT, json!(21)).expect("inc");
    assert_eq!(controller.state().call("doubled"), Some(json!(42)));
}
