use thiserror::Error;

use crate::domain::EventType;

fn join_types(types: &[EventType]) -> String {
    types
        .iter()
        .map(EventType::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    #[error(
        "module '{module}': event types [{}] of [{}] intersect with existing event types",
        join_types(.overlapping),
        join_types(.declared)
    )]
    EventTypeCollision {
        module: String,
        overlapping: Vec<EventType>,
        declared: Vec<EventType>,
    },
    #[error("module '{module}': propagated method \"{method}\" has already been initialized")]
    MethodCollision { module: String, method: String },
}

impl ComposeError {
    pub fn module(&self) -> &str {
        match self {
            ComposeError::EventTypeCollision { module, .. }
            | ComposeError::MethodCollision { module, .. } => module,
        }
    }
}
