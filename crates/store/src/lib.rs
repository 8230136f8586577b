use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

use shared::domain::Event;
use tracing::{debug, warn};

pub mod middleware;

pub use middleware::{DeferredMiddleware, LoggingMiddleware, Middleware};

pub type Reducer<S, P> = Box<dyn Fn(Rc<S>, &Event<P>) -> Rc<S>>;

pub type Deferred<S, P> = Box<dyn FnOnce(&Store<S, P>)>;

pub enum Action<S, P> {
    Event(Rc<Event<P>>),
    Deferred(Deferred<S, P>),
}

impl<S, P> Action<S, P> {
    pub fn event(event: Event<P>) -> Self {
        Action::Event(Rc::new(event))
    }

    pub fn deferred(f: impl FnOnce(&Store<S, P>) + 'static) -> Self {
        Action::Deferred(Box::new(f))
    }
}

impl<S, P> fmt::Debug for Action<S, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Event(event) => f
                .debug_tuple("Event")
                .field(&event.event_type().as_str())
                .finish(),
            Action::Deferred(_) => f.write_str("Deferred"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn()>;

pub struct Store<S, P> {
    state: RefCell<Rc<S>>,
    reducer: Reducer<S, P>,
    middleware: Vec<Rc<dyn Middleware<S, P>>>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
    next_listener_id: Cell<u64>,
}

impl<S, P> Store<S, P> {
    pub fn new(initial_state: S, reducer: Reducer<S, P>) -> Self {
        Self {
            state: RefCell::new(Rc::new(initial_state)),
            reducer,
            middleware: Vec::new(),
            listeners: RefCell::new(Vec::new()),
            next_listener_id: Cell::new(0),
        }
    }

    pub fn with_middleware(mut self, middleware: Rc<dyn Middleware<S, P>>) -> Self {
        self.middleware.push(middleware);
        self
    }

    pub fn get_state(&self) -> Rc<S> {
        Rc::clone(&self.state.borrow())
    }

    pub fn dispatch(&self, action: Action<S, P>) {
        self.dispatch_from(0, action);
    }

    pub fn dispatch_event(&self, event: Event<P>) {
        self.dispatch(Action::event(event));
    }

    pub fn dispatch_deferred(&self, f: impl FnOnce(&Store<S, P>) + 'static) {
        self.dispatch(Action::deferred(f));
    }

    pub fn subscribe(&self, listener: impl Fn() + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_listener_id.get());
        self.next_listener_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn dispatch_from(&self, index: usize, action: Action<S, P>) {
        match self.middleware.get(index) {
            Some(middleware) => {
                let next = |action: Action<S, P>| self.dispatch_from(index + 1, action);
                middleware.handle(self, action, &next);
            }
            None => self.reduce(action),
        }
    }

    fn reduce(&self, action: Action<S, P>) {
        let event = match action {
            Action::Event(event) => event,
            Action::Deferred(_) => {
                warn!("deferred action reached the store without a deferred middleware; dropped");
                return;
            }
        };

        // No borrow is held while the reducer or the listeners run.
        let current = self.get_state();
        let next = (self.reducer)(current, &event);
        *self.state.borrow_mut() = next;
        debug!(event_type = %event.event_type(), "state replaced");

        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
