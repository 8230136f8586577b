use std::{
    cell::Cell,
    rc::{Rc, Weak},
};

use shared::{
    domain::{EventType, Phase},
    naming::method_name,
};
use store::{DeferredMiddleware, Middleware, Store};
use tracing::{debug, warn};

use crate::{
    component::ComponentModule,
    composition::{Composer, CompositionReport, ModuleEntry},
    error::{ConfigurationError, EmitError},
    handlers::HandlerSet,
    pipeline::{Pipeline, RootTransition},
    router::Router,
    state::DynamicState,
};

pub type RenderFn<S, P> = Rc<dyn Fn(&Controller<S, P>)>;

type RouterFactory = Box<dyn FnOnce() -> Rc<dyn Router>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LifecyclePhase {
    Constructed,
    PropertiesInitialized,
    ModulesJoined,
    StoreInitialized,
    RouterInitialized,
    MethodsFinalized,
    Ready,
    Running,
}

struct Lifecycle {
    phase: Cell<LifecyclePhase>,
}

impl Lifecycle {
    fn new() -> Self {
        debug!(phase = ?LifecyclePhase::Constructed, "controller lifecycle");
        Self {
            phase: Cell::new(LifecyclePhase::Constructed),
        }
    }

    fn phase(&self) -> LifecyclePhase {
        self.phase.get()
    }

    fn advance(&self, next: LifecyclePhase) {
        debug_assert!(next > self.phase.get(), "lifecycle never moves back");
        self.phase.set(next);
        debug!(phase = ?next, "controller lifecycle");
    }
}

struct ControllerInner<S, P> {
    lifecycle: Lifecycle,
    event_types: Vec<EventType>,
    pipeline: Pipeline<S, P>,
    store: Store<S, P>,
    router: Option<Rc<dyn Router>>,
    render: RenderFn<S, P>,
    empty_state: Option<Rc<dyn Fn() -> S>>,
    report: CompositionReport,
}

pub struct Controller<S, P> {
    inner: Rc<ControllerInner<S, P>>,
}

impl<S, P> Clone for Controller<S, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

pub struct WeakController<S, P> {
    inner: Weak<ControllerInner<S, P>>,
}

impl<S, P> WeakController<S, P> {
    pub fn new() -> Self {
        Self { inner: Weak::new() }
    }

    pub fn upgrade(&self) -> Option<Controller<S, P>> {
        self.inner.upgrade().map(|inner| Controller { inner })
    }
}

impl<S, P> Clone for WeakController<S, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<S, P> Default for WeakController<S, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: 'static, P: 'static> Controller<S, P> {
    pub fn builder() -> ControllerBuilder<S, P> {
        ControllerBuilder::new()
    }

    pub fn emit(&self, event_type: &str, payload: P) -> Result<(), EmitError> {
        let stage = self
            .inner
            .pipeline
            .stage(event_type)
            .ok_or_else(|| EmitError::UnknownEventType(EventType::new(event_type)))?;
        stage.fire(self, payload);
        Ok(())
    }

    pub fn dispatch_deferred(&self, f: impl FnOnce(&Controller<S, P>) + 'static) {
        let controller = self.clone();
        self.inner
            .store
            .dispatch_deferred(move |_store| f(&controller));
    }

    pub fn run(&self) {
        if self.inner.lifecycle.phase() == LifecyclePhase::Running {
            warn!("controller is already running");
            return;
        }
        let controller = self.downgrade();
        self.inner.store.subscribe(move || {
            if let Some(controller) = controller.upgrade() {
                controller.render();
            }
        });
        self.inner.lifecycle.advance(LifecyclePhase::Running);
        self.render();
    }

    pub fn render(&self) {
        (self.inner.render)(self)
    }
}

impl<S, P> Controller<S, P> {
    pub fn state(&self) -> Rc<S> {
        self.inner.store.get_state()
    }

    pub fn store(&self) -> &Store<S, P> {
        &self.inner.store
    }

    pub fn router(&self) -> Option<Rc<dyn Router>> {
        self.inner.router.clone()
    }

    pub fn event_types(&self) -> &[EventType] {
        &self.inner.event_types
    }

    pub fn has_event_type(&self, event_type: &str) -> bool {
        self.inner.event_types.iter().any(|declared| declared == event_type)
    }

    pub fn method_names(&self) -> Vec<String> {
        self.inner.pipeline.method_names()
    }

    pub fn has_method(&self, method: &str) -> bool {
        self.inner.pipeline.stages().iter().any(|stage| {
            let event_type = stage.event_type();
            method == method_name(Phase::Emit, event_type)
                || (stage.has_effect() && method == method_name(Phase::Effect, event_type))
                || (stage.has_apply() && method == method_name(Phase::Apply, event_type))
        })
    }

    pub fn lifecycle(&self) -> LifecyclePhase {
        self.inner.lifecycle.phase()
    }

    pub fn composition_report(&self) -> &CompositionReport {
        &self.inner.report
    }

    pub fn downgrade(&self) -> WeakController<S, P> {
        WeakController {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl<P: 'static> Controller<DynamicState, P> {
    pub fn create_empty_state(&self) -> DynamicState {
        self.inner
            .empty_state
            .as_ref()
            .map(|create| create())
            .unwrap_or_default()
    }

    pub fn clone_state(&self, state: &DynamicState) -> DynamicState {
        state.clone_onto(self.create_empty_state())
    }
}

pub struct ControllerBuilder<S, P> {
    initial_state: Option<Box<dyn FnOnce() -> S>>,
    render: Option<RenderFn<S, P>>,
    own_event_types: Vec<EventType>,
    handlers: HandlerSet<S, P>,
    components: Vec<ModuleEntry<S, P>>,
    router: Option<RouterFactory>,
    empty_state: Option<Rc<dyn Fn() -> S>>,
    middleware: Vec<Rc<dyn Middleware<S, P>>>,
}

impl<S: 'static, P: 'static> ControllerBuilder<S, P> {
    pub fn new() -> Self {
        Self {
            initial_state: None,
            render: None,
            own_event_types: Vec::new(),
            handlers: HandlerSet::new(),
            components: Vec::new(),
            router: None,
            empty_state: None,
            middleware: Vec::new(),
        }
    }

    pub fn initial_state(mut self, f: impl FnOnce() -> S + 'static) -> Self {
        self.initial_state = Some(Box::new(f));
        self
    }

    pub fn render(mut self, f: impl Fn(&Controller<S, P>) + 'static) -> Self {
        self.render = Some(Rc::new(f));
        self
    }

    pub fn event_types<I, T>(mut self, event_types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<EventType>,
    {
        self.own_event_types
            .extend(event_types.into_iter().map(Into::into));
        self
    }

    pub fn event_type(mut self, event_type: impl Into<EventType>) -> Self {
        self.own_event_types.push(event_type.into());
        self
    }

    /// Controller-level handlers may target module-owned event types too;
    /// they occupy the method slot before any module joins.
    pub fn emit(
        mut self,
        event_type: impl Into<EventType>,
        f: impl Fn(&Controller<S, P>, P) -> P + 'static,
    ) -> Self {
        self.handlers = self.handlers.emit(event_type, f);
        self
    }

    pub fn effect(
        mut self,
        event_type: impl Into<EventType>,
        f: impl Fn(&Controller<S, P>, &P) + 'static,
    ) -> Self {
        self.handlers = self.handlers.effect(event_type, f);
        self
    }

    pub fn apply(mut self, event_type: impl Into<EventType>, f: impl Fn(&S, &P) -> S + 'static) -> Self {
        self.handlers = self.handlers.apply(event_type, f);
        self
    }

    pub fn handlers(mut self, handlers: HandlerSet<S, P>) -> Self {
        self.handlers.extend(handlers);
        self
    }

    pub fn component<M>(mut self, key: impl Into<String>, module: Rc<M>) -> Self
    where
        M: ComponentModule<S, P> + 'static,
    {
        let module: Rc<dyn ComponentModule<S, P>> = module;
        self.components.push((key.into(), module));
        self
    }

    pub fn router<R>(mut self, factory: impl FnOnce() -> R + 'static) -> Self
    where
        R: Router + 'static,
    {
        self.router = Some(Box::new(move || Rc::new(factory()) as Rc<dyn Router>));
        self
    }

    pub fn router_instance<R>(mut self, router: Rc<R>) -> Self
    where
        R: Router + 'static,
    {
        self.router = Some(Box::new(move || router as Rc<dyn Router>));
        self
    }

    pub fn empty_state(mut self, f: impl Fn() -> S + 'static) -> Self {
        self.empty_state = Some(Rc::new(f));
        self
    }

    pub fn middleware<M>(mut self, middleware: M) -> Self
    where
        M: Middleware<S, P> + 'static,
    {
        self.middleware.push(Rc::new(middleware));
        self
    }

    pub fn build(self) -> Result<Controller<S, P>, ConfigurationError> {
        let Self {
            initial_state,
            render,
            own_event_types,
            handlers,
            components,
            router,
            empty_state,
            middleware,
        } = self;

        let initial_state = initial_state.ok_or(ConfigurationError::MissingInitialState)?;
        let render = render.ok_or(ConfigurationError::MissingRender)?;
        let lifecycle = Lifecycle::new();

        let mut composer = Composer::new(own_event_types, &handlers)?;
        lifecycle.advance(LifecyclePhase::PropertiesInitialized);

        let inner = Rc::new_cyclic(move |weak| {
            let link = WeakController {
                inner: Weak::clone(weak),
            };
            let report = composer.join_all(components, &link);
            lifecycle.advance(LifecyclePhase::ModulesJoined);

            let (event_types, table) = composer.into_parts();
            let transition = RootTransition::from_table(&event_types, &table);
            let store = middleware.into_iter().fold(
                Store::new(initial_state(), transition.into_reducer())
                    .with_middleware(Rc::new(DeferredMiddleware)),
                Store::with_middleware,
            );
            lifecycle.advance(LifecyclePhase::StoreInitialized);

            let router = router.map(|create| create());
            if let Some(router) = &router {
                router.init();
            }
            lifecycle.advance(LifecyclePhase::RouterInitialized);

            let pipeline = Pipeline::synthesize(&event_types, &table);
            lifecycle.advance(LifecyclePhase::MethodsFinalized);
            lifecycle.advance(LifecyclePhase::Ready);

            ControllerInner {
                lifecycle,
                event_types,
                pipeline,
                store,
                router,
                render,
                empty_state,
                report,
            }
        });

        Ok(Controller { inner })
    }
}

impl<S: 'static, P: 'static> Default for ControllerBuilder<S, P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
