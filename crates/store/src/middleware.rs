use shared::domain::Event;
use tracing::debug;

use crate::{Action, Store};

/// Call `next` to pass an action on; not calling it swallows the action.
pub trait Middleware<S, P> {
    fn handle(&self, store: &Store<S, P>, action: Action<S, P>, next: &dyn Fn(Action<S, P>));
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DeferredMiddleware;

impl<S, P> Middleware<S, P> for DeferredMiddleware {
    fn handle(&self, store: &Store<S, P>, action: Action<S, P>, next: &dyn Fn(Action<S, P>)) {
        match action {
            Action::Deferred(f) => f(store),
            event => next(event),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingMiddleware;

impl<S, P> Middleware<S, P> for LoggingMiddleware {
    fn handle(&self, _store: &Store<S, P>, action: Action<S, P>, next: &dyn Fn(Action<S, P>)) {
        match &action {
            Action::Event(event) => log_event(event),
            Action::Deferred(_) => debug!("dispatching deferred action"),
        }
        next(action);
    }
}

fn log_event<P>(event: &Event<P>) {
    debug!(event_type = %event.event_type(), "dispatching event");
}
