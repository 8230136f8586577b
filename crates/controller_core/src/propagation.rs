use std::collections::HashMap;

use shared::{
    domain::{EventType, Phase},
    error::ComposeError,
    naming::method_name,
};

use crate::{
    error::ConfigurationError,
    handlers::{HandlerSet, Handlers, Slot},
};

pub struct HandlerTable<S, P> {
    slots: HashMap<EventType, Handlers<S, P>>,
    methods: HashMap<String, Method>,
}

// `reserved` marks a synthesized `throw<Name>` with no function installed yet.
#[derive(Debug, Clone)]
struct Method {
    event_type: EventType,
    reserved: bool,
}

impl<S, P> HandlerTable<S, P> {
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
            methods: HashMap::new(),
        }
    }

    pub fn handlers(&self, event_type: &EventType) -> Option<&Handlers<S, P>> {
        self.slots.get(event_type)
    }

    pub fn has_method(&self, method: &str) -> bool {
        self.methods.get(method).is_some_and(|entry| !entry.reserved)
    }

    pub fn method_count(&self) -> usize {
        self.methods.values().filter(|entry| !entry.reserved).count()
    }

    pub fn seed(&mut self, handlers: &HandlerSet<S, P>) -> Result<(), ConfigurationError> {
        let event_types: Vec<EventType> = handlers.event_types().cloned().collect();
        let installs = plan(self, handlers, &event_types)
            .map_err(|method| ConfigurationError::DuplicateHandler { method })?;
        Propagation { installs }.commit(self);
        Ok(())
    }

    /// Every declared event type gets a `throw<Name>`, explicit or not.
    pub fn reserve_emits(&mut self, event_types: &[EventType]) -> Result<(), ConfigurationError> {
        let installs = plan(self, &HandlerSet::new(), event_types)
            .map_err(|method| ConfigurationError::DuplicateHandler { method })?;
        Propagation { installs }.commit(self);
        Ok(())
    }

    fn conflicts(&self, method: &str, event_type: &EventType, reservation: bool) -> bool {
        match self.methods.get(method) {
            None => false,
            Some(entry) if entry.event_type != *event_type => true,
            Some(entry) => !reservation && !entry.reserved,
        }
    }
}

impl<S, P> Default for HandlerTable<S, P> {
    fn default() -> Self {
        Self::new()
    }
}

struct Install<S, P> {
    event_type: EventType,
    method: String,
    slot: Option<Slot<S, P>>,
}

pub struct Propagation<S, P> {
    installs: Vec<Install<S, P>>,
}

impl<S, P> Propagation<S, P> {
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.installs
            .iter()
            .filter(|install| install.slot.is_some())
            .map(|install| install.method.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.method_names().next().is_none()
    }

    pub fn commit(self, table: &mut HandlerTable<S, P>) {
        for install in self.installs {
            let Some(slot) = install.slot else {
                table.methods.entry(install.method).or_insert(Method {
                    event_type: install.event_type,
                    reserved: true,
                });
                continue;
            };
            table.methods.insert(
                install.method,
                Method {
                    event_type: install.event_type.clone(),
                    reserved: false,
                },
            );
            table
                .slots
                .entry(install.event_type)
                .or_default()
                .set(slot);
        }
    }
}

pub fn propagate<S, P>(
    table: &HandlerTable<S, P>,
    module: &str,
    handlers: &HandlerSet<S, P>,
    event_types: &[EventType],
) -> Result<Propagation<S, P>, ComposeError> {
    plan(table, handlers, event_types)
        .map(|installs| Propagation { installs })
        .map_err(|method| ComposeError::MethodCollision {
            module: module.to_string(),
            method,
        })
}

fn plan<S, P>(
    table: &HandlerTable<S, P>,
    handlers: &HandlerSet<S, P>,
    event_types: &[EventType],
) -> Result<Vec<Install<S, P>>, String> {
    let mut installs = Vec::new();
    let mut pending: HashMap<String, &EventType> = HashMap::new();

    for event_type in event_types {
        let record = handlers.get(event_type);
        for phase in Phase::ALL {
            let slot = record.and_then(|record| record.slot(phase));
            let reservation = slot.is_none();
            if reservation && phase != Phase::Emit {
                continue;
            }
            let method = method_name(phase, event_type);
            let taken_here = pending
                .get(&method)
                .is_some_and(|owner| *owner != event_type || !reservation);
            if taken_here || table.conflicts(&method, event_type, reservation) {
                return Err(method);
            }
            pending.insert(method.clone(), event_type);
            installs.push(Install {
                event_type: event_type.clone(),
                method,
                slot,
            });
        }
    }

    Ok(installs)
}

#[cfg(test)]
#[path = "tests/propagation_tests.rs"]
mod tests;
