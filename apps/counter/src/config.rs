use std::{collections::HashMap, fs, path::Path};

use anyhow::Context;
use controller_core::HistoryKind;
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "counter.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_filter: String,
    pub history: HistoryKind,
    pub initial_route: String,
    pub step: i64,
    pub log_dispatch: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: "info".into(),
            history: HistoryKind::Hash,
            initial_route: "/".into(),
            step: 1,
            log_dispatch: false,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(DEFAULT_CONFIG_FILE) {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());

    settings
}

pub fn load_settings_from(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;

    let mut settings = Settings::default();
    apply_file(&mut settings, &raw);
    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

pub fn apply_file(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<HashMap<String, String>>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(error) => {
            warn!(%error, "ignoring unparsable config file");
            return;
        }
    };

    if let Some(v) = file_cfg.get("log_filter") {
        settings.log_filter = v.clone();
    }
    if let Some(v) = file_cfg.get("history") {
        set_history(settings, v);
    }
    if let Some(v) = file_cfg.get("initial_route") {
        settings.initial_route = v.clone();
    }
    if let Some(v) = file_cfg.get("step") {
        set_step(settings, v);
    }
    if let Some(v) = file_cfg.get("log_dispatch") {
        set_log_dispatch(settings, v);
    }
}

pub fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
    if let Some(v) = var("APP__HISTORY") {
        set_history(settings, &v);
    }
    if let Some(v) = var("APP__INITIAL_ROUTE") {
        settings.initial_route = v;
    }
    if let Some(v) = var("APP__STEP") {
        set_step(settings, &v);
    }
    if let Some(v) = var("APP__LOG_DISPATCH") {
        set_log_dispatch(settings, &v);
    }
}

fn set_history(settings: &mut Settings, raw: &str) {
    match raw.parse() {
        Ok(kind) => settings.history = kind,
        Err(error) => warn!(%error, "keeping history '{}'", settings.history),
    }
}

fn set_step(settings: &mut Settings, raw: &str) {
    match raw.trim().parse::<i64>() {
        Ok(step) => settings.step = step,
        Err(_) => warn!(value = raw, "step is not an integer; keeping {}", settings.step),
    }
}

fn set_log_dispatch(settings: &mut Settings, raw: &str) {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => settings.log_dispatch = true,
        "0" | "false" | "no" | "off" => settings.log_dispatch = false,
        _ => warn!(value = raw, "log_dispatch is not a boolean; ignoring"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
