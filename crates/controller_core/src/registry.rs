use std::collections::HashSet;

use shared::{domain::EventType, error::ComposeError};

use crate::error::ConfigurationError;

pub fn claim(
    module: &str,
    existing: &[EventType],
    new: &[EventType],
) -> Result<Vec<EventType>, ComposeError> {
    let taken: HashSet<&EventType> = existing.iter().collect();
    let mut seen = HashSet::new();
    let mut overlapping: Vec<EventType> = Vec::new();

    for event_type in new {
        let clashes = taken.contains(event_type) || !seen.insert(event_type);
        if clashes && !overlapping.contains(event_type) {
            overlapping.push(event_type.clone());
        }
    }

    if !overlapping.is_empty() {
        return Err(ComposeError::EventTypeCollision {
            module: module.to_string(),
            overlapping,
            declared: new.to_vec(),
        });
    }

    let mut merged = Vec::with_capacity(existing.len() + new.len());
    merged.extend_from_slice(existing);
    merged.extend_from_slice(new);
    Ok(merged)
}

pub fn missing_required(required: &[EventType], declared: &[EventType]) -> Vec<EventType> {
    let declared: HashSet<&EventType> = declared.iter().collect();
    let mut seen = HashSet::new();
    required
        .iter()
        .filter(|event_type| seen.insert(*event_type) && !declared.contains(event_type))
        .cloned()
        .collect()
}

#[derive(Debug)]
pub struct Claim {
    merged: Vec<EventType>,
}

#[derive(Debug, Clone, Default)]
pub struct EventTypeRegistry {
    declared: Vec<EventType>,
}

impl EventTypeRegistry {
    pub fn with_own(own: Vec<EventType>) -> Result<Self, ConfigurationError> {
        let mut seen = HashSet::new();
        if let Some(duplicate) = own.iter().find(|event_type| !seen.insert(*event_type)) {
            return Err(ConfigurationError::DuplicateEventType(duplicate.clone()));
        }
        Ok(Self { declared: own })
    }

    pub fn declared(&self) -> &[EventType] {
        &self.declared
    }

    pub fn contains(&self, event_type: &EventType) -> bool {
        self.declared.contains(event_type)
    }

    pub fn claim(&self, module: &str, new: &[EventType]) -> Result<Claim, ComposeError> {
        claim(module, &self.declared, new).map(|merged| Claim { merged })
    }

    pub fn commit(&mut self, claim: Claim) {
        self.declared = claim.merged;
    }

    pub fn missing_required(&self, required: &[EventType]) -> Vec<EventType> {
        missing_required(required, &self.declared)
    }

    pub fn into_declared(self) -> Vec<EventType> {
        self.declared
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
