use super::{apply_env, apply_file, load_settings_from, Settings};

use std::{
    collections::HashMap,
    env, fs,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use controller_core::HistoryKind;

fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_match_documented_values() {
    let settings = Settings::default();
    assert_eq!(settings.log_filter, "info");
    assert_eq!(settings.history, HistoryKind::Hash);
    assert_eq!(settings.initial_route, "/");
    assert_eq!(settings.step, 1);
    assert!(!settings.log_dispatch);
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        r#"
log_filter = "debug"
history = "browser"
initial_route = "/about"
step = "5"
log_dispatch = "true"
"#,
    );

    assert_eq!(
        settings,
        Settings {
            log_filter: "debug".into(),
            history: HistoryKind::Browser,
            initial_route: "/about".into(),
            step: 5,
            log_dispatch: true,
        }
    );
}

#[test]
fn invalid_values_keep_previous_setting() {
    let mut settings = Settings::default();
    apply_file(&mut settings, "history = \"memory\"\nstep = \"many\"\nlog_dispatch = \"maybe\"\n");
    assert_eq!(settings, Settings::default());
}

#[test]
fn unparsable_file_is_ignored() {
    let mut settings = Settings::default();
    apply_file(&mut settings, "step = [1, 2");
    assert_eq!(settings, Settings::default());
}

#[test]
fn env_overrides_file() {
    let mut settings = Settings::default();
    apply_file(&mut settings, "step = \"5\"\nhistory = \"browser\"\n");
    apply_env(
        &mut settings,
        vars(&[("APP__STEP", "10"), ("APP__HISTORY", "hash"), ("APP__LOG_DISPATCH", "1")]),
    );

    assert_eq!(settings.step, 10);
    assert_eq!(settings.history, HistoryKind::Hash);
    assert!(settings.log_dispatch);
}

#[test]
fn explicit_config_file_is_loaded() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("counter_config_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("counter.toml");
    fs::write(&path, "initial_route = \"/stats\"\n").expect("write config");

    let settings = load_settings_from(&path).expect("load settings");
    assert_eq!(settings.initial_route, "/stats");

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn explicit_config_file_must_exist() {
    let err = load_settings_from(Path::new("/nonexistent/counter.toml")).expect_err("missing file");
    assert!(err.to_string().contains("failed to read config file"));
}
