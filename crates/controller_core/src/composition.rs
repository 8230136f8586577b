use std::rc::Rc;

use shared::{domain::EventType, error::ComposeError};
use tracing::{debug, error, info};

use crate::{
    component::ComponentModule,
    controller::WeakController,
    error::ConfigurationError,
    handlers::HandlerSet,
    propagation::{propagate, HandlerTable},
    registry::EventTypeRegistry,
};

pub(crate) type ModuleEntry<S, P> = (String, Rc<dyn ComponentModule<S, P>>);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositionReport {
    joined: Vec<String>,
    failure: Option<ComposeError>,
    skipped: Vec<String>,
    missing_required: Vec<EventType>,
}

impl CompositionReport {
    pub fn joined(&self) -> &[String] {
        &self.joined
    }

    pub fn failure(&self) -> Option<&ComposeError> {
        self.failure.as_ref()
    }

    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn missing_required(&self) -> &[EventType] {
        &self.missing_required
    }

    pub fn is_complete(&self) -> bool {
        self.failure.is_none() && self.missing_required.is_empty()
    }
}

pub(crate) struct Composer<S, P> {
    registry: EventTypeRegistry,
    table: HandlerTable<S, P>,
}

impl<S: 'static, P: 'static> Composer<S, P> {
    pub(crate) fn new(
        own_event_types: Vec<EventType>,
        own_handlers: &HandlerSet<S, P>,
    ) -> Result<Self, ConfigurationError> {
        let registry = EventTypeRegistry::with_own(own_event_types)?;
        let mut table = HandlerTable::new();
        table.seed(own_handlers)?;
        table.reserve_emits(registry.declared())?;
        Ok(Self { registry, table })
    }

    pub(crate) fn join_all(
        &mut self,
        modules: Vec<ModuleEntry<S, P>>,
        link: &WeakController<S, P>,
    ) -> CompositionReport {
        let mut report = CompositionReport::default();
        let mut required = Vec::new();
        let mut modules = modules.into_iter();

        while let Some((key, module)) = modules.next() {
            match self.join(&key, &module, link) {
                Ok(module_required) => {
                    required.extend(module_required);
                    report.joined.push(key);
                }
                Err(err) => {
                    error!(module = %key, error = %err, "controller init error");
                    report.failure = Some(err);
                    report.skipped = modules.by_ref().map(|(key, _)| key).collect();
                    if !report.skipped.is_empty() {
                        debug!(skipped = ?report.skipped, "remaining component modules not attempted");
                    }
                    return report;
                }
            }
        }

        let missing = self.registry.missing_required(&required);
        if !missing.is_empty() {
            error!(
                missing = ?missing,
                "controller init error: required event types have not been initialized"
            );
        }
        report.missing_required = missing;
        report
    }

    fn join(
        &mut self,
        key: &str,
        module: &Rc<dyn ComponentModule<S, P>>,
        link: &WeakController<S, P>,
    ) -> Result<Vec<EventType>, ComposeError> {
        let owned = module.owned_event_types();
        let claim = self.registry.claim(key, &owned)?;

        let handlers = Rc::clone(module).handlers();
        let foreign: Vec<&EventType> = handlers
            .event_types()
            .filter(|event_type| !owned.contains(*event_type))
            .collect();
        if !foreign.is_empty() {
            debug!(module = key, event_types = ?foreign, "handlers for event types not owned by the module are ignored");
        }

        let propagation = propagate(&self.table, key, &handlers, &owned)?;
        let methods: Vec<String> = propagation.method_names().map(str::to_string).collect();

        self.registry.commit(claim);
        propagation.commit(&mut self.table);
        module.set_controller(link.clone());

        info!(module = key, event_types = ?owned, methods = ?methods, "component module joined");
        Ok(module.required_event_types())
    }

    pub(crate) fn into_parts(self) -> (Vec<EventType>, HandlerTable<S, P>) {
        (self.registry.into_declared(), self.table)
    }
}
