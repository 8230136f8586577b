use std::{cell::OnceCell, rc::Rc};

use shared::domain::EventType;
use tracing::warn;

use crate::{
    controller::{Controller, WeakController},
    handlers::HandlerSet,
    router::Router,
    state::DynamicState,
};

pub trait ComponentModule<S, P> {
    fn owned_event_types(&self) -> Vec<EventType>;

    fn required_event_types(&self) -> Vec<EventType> {
        Vec::new()
    }

    fn set_controller(&self, controller: WeakController<S, P>);

    fn handlers(self: Rc<Self>) -> HandlerSet<S, P> {
        HandlerSet::new()
    }
}

/// The link is set during controller construction but only resolves once
/// construction has finished.
pub struct ControllerLink<S, P> {
    controller: OnceCell<WeakController<S, P>>,
}

impl<S, P> ControllerLink<S, P> {
    pub fn new() -> Self {
        Self {
            controller: OnceCell::new(),
        }
    }

    pub fn set(&self, controller: WeakController<S, P>) {
        if self.controller.set(controller).is_err() {
            warn!("component module is already linked to a controller; keeping the first");
        }
    }

    pub fn is_linked(&self) -> bool {
        self.controller.get().is_some()
    }

    pub fn controller(&self) -> Option<Controller<S, P>> {
        self.controller.get().and_then(WeakController::upgrade)
    }

    pub fn state(&self) -> Option<Rc<S>> {
        self.controller().map(|controller| controller.state())
    }

    pub fn router(&self) -> Option<Rc<dyn Router>> {
        self.controller().and_then(|controller| controller.router())
    }
}

impl<P: 'static> ControllerLink<DynamicState, P> {
    pub fn clone_state(&self, state: &DynamicState) -> DynamicState {
        match self.controller() {
            Some(controller) => controller.clone_state(state),
            None => state.clone_state(),
        }
    }
}

impl<S, P> Default for ControllerLink<S, P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/component_tests.rs"]
mod tests;
