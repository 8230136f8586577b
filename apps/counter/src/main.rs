mod config;
mod modules;

use std::{path::PathBuf, rc::Rc};

use anyhow::{bail, Context, Result};
use clap::Parser;
use controller_core::{Controller, DynamicState, HistoryKind, HistoryRouter, LoggingMiddleware};
use serde_json::{json, Value};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    config::{load_settings, load_settings_from, Settings},
    modules::{count_of, CounterModule, HistoryModule, Payload, DECREMENT, INCREMENT, NAVIGATE, RESET},
};

#[derive(Parser, Debug)]
struct Args {
    /// Config file to use instead of an optional `counter.toml`.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    log_filter: Option<String>,
    #[arg(long)]
    history: Option<HistoryKind>,
    #[arg(long)]
    initial_route: Option<String>,
    #[arg(long)]
    step: Option<i64>,
    #[arg(long)]
    log_dispatch: bool,
    /// `inc[:n]`, `dec[:n]`, `reset` or `goto:<path>`, applied in order.
    commands: Vec<String>,
}

impl Args {
    fn apply(&self, settings: &mut Settings) {
        if let Some(v) = &self.log_filter {
            settings.log_filter = v.clone();
        }
        if let Some(v) = self.history {
            settings.history = v;
        }
        if let Some(v) = &self.initial_route {
            settings.initial_route = v.clone();
        }
        if let Some(v) = self.step {
            settings.step = v;
        }
        if self.log_dispatch {
            settings.log_dispatch = true;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = match &args.config {
        Some(path) => load_settings_from(path)?,
        None => load_settings(),
    };
    args.apply(&mut settings);

    let filter = EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let counter = CounterModule::new(settings.step);
    let history = HistoryModule::new();
    let router = Rc::new(HistoryRouter::with_history_kind(settings.history));
    let controller = build_controller(&settings, Rc::clone(&counter), Rc::clone(&history), Rc::clone(&router))?;

    let report = controller.composition_report();
    if !report.is_complete() {
        warn!(
            failure = ?report.failure(),
            missing = ?report.missing_required(),
            "controller composed with gaps"
        );
    }
    info!(
        event_types = ?controller.event_types(),
        methods = ?controller.method_names(),
        "controller ready"
    );

    controller.emit(NAVIGATE, json!(settings.initial_route))?;
    controller.run();

    for raw in &args.commands {
        let (event_type, payload) = parse_command(raw)?;
        controller.emit(event_type, payload)?;
    }

    info!(
        count = ?counter.count(),
        visited = ?router.entries(),
        history_linked = history.is_linked(),
        "done"
    );
    let snapshot = controller.clone_state(&controller.state());
    println!("{}", serde_json::to_string_pretty(&snapshot.to_json())?);

    Ok(())
}

fn build_controller(
    settings: &Settings,
    counter: Rc<CounterModule>,
    history: Rc<HistoryModule>,
    router: Rc<HistoryRouter>,
) -> Result<Controller<DynamicState, Payload>> {
    let mut builder = Controller::<DynamicState, Payload>::builder()
        .initial_state(modules::empty_state)
        .empty_state(modules::empty_state)
        .render(render)
        .event_type(RESET)
        .apply(RESET, |state: &DynamicState, _: &Payload| {
            let mut next = modules::empty_state();
            next.set("route", state.get("route").cloned().unwrap_or(Value::Null))
                .set("routes", state.get("routes").cloned().unwrap_or_else(|| json!([])));
            next
        })
        .component("counter", counter)
        .component("history", history)
        .router_instance(router);
    if settings.log_dispatch {
        builder = builder.middleware(LoggingMiddleware);
    }

    let controller = builder.build()?;
    Ok(controller)
}

fn render(controller: &Controller<DynamicState, Payload>) {
    let state = controller.state();
    println!(
        "count={} doubled={} route={}",
        count_of(&state),
        state.call("doubled").unwrap_or(Value::Null),
        state.get("route").and_then(Value::as_str).unwrap_or("-"),
    );
}

fn parse_command(raw: &str) -> Result<(&'static str, Payload)> {
    let (name, arg) = match raw.split_once(':') {
        Some((name, arg)) => (name, Some(arg)),
        None => (raw, None),
    };

    match (name.trim().to_ascii_lowercase().as_str(), arg) {
        ("inc" | "increment", None) => Ok((INCREMENT, Value::Null)),
        ("inc" | "increment", Some(amount)) => Ok((INCREMENT, json!(parse_amount(raw, amount)?))),
        ("dec" | "decrement", None) => Ok((DECREMENT, Value::Null)),
        ("dec" | "decrement", Some(amount)) => Ok((DECREMENT, json!(parse_amount(raw, amount)?))),
        ("reset", None) => Ok((RESET, Value::Null)),
        ("goto", Some(path)) if !path.trim().is_empty() => Ok((NAVIGATE, json!(path.trim()))),
        _ => bail!("unknown command '{raw}'; expected inc[:n], dec[:n], reset or goto:<path>"),
    }
}

fn parse_amount(raw: &str, amount: &str) -> Result<i64> {
    amount
        .trim()
        .parse::<i64>()
        .with_context(|| format!("invalid amount in command '{raw}'"))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
