use std::rc::Rc;

use controller_core::{ComponentModule, ControllerLink, DynamicState, EventType, HandlerSet, WeakController};
use serde_json::{json, Value};
use tracing::info;

pub const INCREMENT: &str = "INCREMENT";
pub const DECREMENT: &str = "DECREMENT";
pub const NAVIGATE: &str = "NAVIGATE";
pub const RESET: &str = "RESET";

pub type Payload = Value;

/// Owns the counter arithmetic. A `null` payload means one step.
pub struct CounterModule {
    step: i64,
    link: ControllerLink<DynamicState, Payload>,
}

impl CounterModule {
    pub fn new(step: i64) -> Rc<Self> {
        Rc::new(Self {
            step,
            link: ControllerLink::new(),
        })
    }

    pub fn count(&self) -> Option<i64> {
        self.link.state().map(|state| count_of(&state))
    }

    fn steps(&self, payload: Payload) -> i64 {
        if payload.is_null() {
            self.step
        } else {
            amount_of(&payload)
        }
    }
}

impl ComponentModule<DynamicState, Payload> for CounterModule {
    fn owned_event_types(&self) -> Vec<EventType> {
        vec![INCREMENT.into(), DECREMENT.into()]
    }

    fn set_controller(&self, controller: WeakController<DynamicState, Payload>) {
        self.link.set(controller);
    }

    fn handlers(self: Rc<Self>) -> HandlerSet<DynamicState, Payload> {
        let increment = Rc::clone(&self);
        let decrement = Rc::clone(&self);
        HandlerSet::<DynamicState, Payload>::new()
            .emit(INCREMENT, move |_, payload| json!(increment.steps(payload).max(0)))
            .apply(INCREMENT, |state, data| {
                with_count(state, count_of(state).saturating_add(amount_of(data)))
            })
            // The count never drops below zero.
            .emit(DECREMENT, move |controller, payload| {
                let count = count_of(&controller.state()).max(0);
                json!(decrement.steps(payload).clamp(0, count))
            })
            .apply(DECREMENT, |state, data| {
                with_count(state, count_of(state).saturating_sub(amount_of(data)))
            })
    }
}

pub struct HistoryModule {
    link: ControllerLink<DynamicState, Payload>,
}

impl HistoryModule {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            link: ControllerLink::new(),
        })
    }

    pub fn is_linked(&self) -> bool {
        self.link.is_linked()
    }
}

impl ComponentModule<DynamicState, Payload> for HistoryModule {
    fn owned_event_types(&self) -> Vec<EventType> {
        vec![NAVIGATE.into()]
    }

    fn required_event_types(&self) -> Vec<EventType> {
        vec![RESET.into()]
    }

    fn set_controller(&self, controller: WeakController<DynamicState, Payload>) {
        self.link.set(controller);
    }

    fn handlers(self: Rc<Self>) -> HandlerSet<DynamicState, Payload> {
        HandlerSet::<DynamicState, Payload>::new()
            .emit(NAVIGATE, |controller, payload| {
                let path = payload.as_str().unwrap_or("/");
                match controller.router() {
                    Some(router) => {
                        router.navigate(path);
                        router.location().map(Value::String).unwrap_or(payload)
                    }
                    None => payload,
                }
            })
            .apply(NAVIGATE, |state, data| {
                let mut routes = match state.get("routes") {
                    Some(Value::Array(routes)) => routes.clone(),
                    _ => Vec::new(),
                };
                routes.push(data.clone());
                let mut next = state.clone();
                next.set("route", data.clone()).set("routes", routes);
                next
            })
            .effect(NAVIGATE, |_, data| info!(route = %data, "navigated"))
    }
}

pub fn empty_state() -> DynamicState {
    DynamicState::new()
        .with("count", 0)
        .with("route", Value::Null)
        .with("routes", json!([]))
        .with_function("doubled", |state| json!(count_of(state).saturating_mul(2)))
}

pub fn count_of(state: &DynamicState) -> i64 {
    state.get("count").and_then(Value::as_i64).unwrap_or(0)
}

fn amount_of(data: &Payload) -> i64 {
    data.as_i64().unwrap_or(0)
}

fn with_count(state: &DynamicState, count: i64) -> DynamicState {
    let mut next = state.clone();
    next.set("count", count);
    next
}

#[cfg(test)]
#[path = "tests/modules_tests.rs"]
mod tests;
