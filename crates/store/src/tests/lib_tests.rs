use super::*;
use shared::domain::EventType;

fn adding_store() -> Store<i64, i64> {
    Store::new(
        0,
        Box::new(|state: Rc<i64>, event: &Event<i64>| {
            if event.event_type() == "ADD" {
                Rc::new(*state + event.data())
            } else {
                state
            }
        }),
    )
}

fn add(amount: i64) -> Event<i64> {
    Event::new(EventType::new("ADD"), amount)
}

#[test]
fn dispatch_replaces_state_with_reducer_result() {
    let store = adding_store();
    store.dispatch_event(add(5));
    store.dispatch_event(add(3));
    assert_eq!(*store.get_state(), 8);
}

#[test]
fn unmatched_event_keeps_state_identity() {
    let store = adding_store();
    let before = store.get_state();
    store.dispatch_event(Event::new(EventType::new("OTHER"), 1));
    assert!(Rc::ptr_eq(&before, &store.get_state()));
}

#[test]
fn subscribers_run_after_each_dispatch() {
    let store = adding_store();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let store = Rc::new(store);
    let sink = Rc::clone(&seen);
    let reader = Rc::downgrade(&store);
    store.subscribe(move || {
        if let Some(store) = reader.upgrade() {
            sink.borrow_mut().push(*store.get_state());
        }
    });

    store.dispatch_event(add(2));
    store.dispatch_event(add(4));
    assert_eq!(*seen.borrow(), vec![2, 6]);
}

#[test]
fn unsubscribe_stops_notifications() {
    let store = adding_store();
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let id = store.subscribe(move || counter.set(counter.get() + 1));

    store.dispatch_event(add(1));
    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store.dispatch_event(add(1));

    assert_eq!(calls.get(), 1);
    assert_eq!(store.listener_count(), 0);
}

#[test]
fn deferred_action_runs_with_store() {
    let store = adding_store().with_middleware(Rc::new(DeferredMiddleware));
    store.dispatch_deferred(|store| {
        store.dispatch_event(add(10));
        let halfway = *store.get_state();
        store.dispatch_event(add(halfway));
    });
    assert_eq!(*store.get_state(), 20);
}

#[test]
fn deferred_action_without_middleware_is_dropped() {
    let store = adding_store();
    let ran = Rc::new(Cell::new(false));
    let flag = Rc::clone(&ran);
    store.dispatch_deferred(move |_| flag.set(true));
    assert!(!ran.get());
    assert_eq!(*store.get_state(), 0);
}

struct Recording(Rc<RefCell<Vec<String>>>);

impl Middleware<i64, i64> for Recording {
    fn handle(&self, _store: &Store<i64, i64>, action: Action<i64, i64>, next: &dyn Fn(Action<i64, i64>)) {
        self.0.borrow_mut().push(format!("{action:?}"));
        next(action);
    }
}

struct Swallow;

impl Middleware<i64, i64> for Swallow {
    fn handle(&self, _store: &Store<i64, i64>, _action: Action<i64, i64>, _next: &dyn Fn(Action<i64, i64>)) {}
}

#[test]
fn middleware_runs_in_installation_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let store = adding_store()
        .with_middleware(Rc::new(DeferredMiddleware))
        .with_middleware(Rc::new(Recording(Rc::clone(&log))));

    store.dispatch_deferred(|store| store.dispatch_event(add(1)));
    store.dispatch_event(add(2));

    // The deferred action never reaches the recorder, only the events it produced.
    assert_eq!(*log.borrow(), vec!["Event(\"ADD\")", "Event(\"ADD\")"]);
    assert_eq!(*store.get_state(), 3);
}

#[test]
fn middleware_can_swallow_actions() {
    let store = adding_store().with_middleware(Rc::new(Swallow));
    store.dispatch_event(add(7));
    assert_eq!(*store.get_state(), 0);
}

#[test]
fn listener_may_dispatch_reentrantly() {
    let store = Rc::new(adding_store());
    let reader = Rc::downgrade(&store);
    store.subscribe(move || {
        if let Some(store) = reader.upgrade() {
            if *store.get_state() == 1 {
                store.dispatch_event(add(10));
            }
        }
    });

    store.dispatch_event(add(1));
    assert_eq!(*store.get_state(), 11);
}
