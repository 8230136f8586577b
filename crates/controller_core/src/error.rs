use shared::domain::EventType;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("no initial state provider; call ControllerBuilder::initial_state")]
    MissingInitialState,
    #[error("no render function; call ControllerBuilder::render")]
    MissingRender,
    #[error("controller event type {0} is declared more than once")]
    DuplicateEventType(EventType),
    #[error("controller handler \"{method}\" is registered for more than one event type")]
    DuplicateHandler { method: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitError {
    #[error("event type {0} is not declared on this controller")]
    UnknownEventType(EventType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("no controller passed to this view")]
    MissingController,
}
