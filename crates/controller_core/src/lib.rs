pub mod component;
mod composition;
pub mod controller;
pub mod error;
pub mod handlers;
pub mod pipeline;
pub mod propagation;
pub mod registry;
pub mod router;
pub mod state;
pub mod view;

pub use component::{ComponentModule, ControllerLink};
pub use composition::CompositionReport;
pub use controller::{Controller, ControllerBuilder, LifecyclePhase, RenderFn, WeakController};
pub use error::{ConfigurationError, EmitError, ViewError};
pub use handlers::{ApplyFn, EffectFn, EmitFn, HandlerSet, Handlers};
pub use router::{HistoryKind, HistoryRouter, Router};
pub use shared::{
    domain::{Event, EventType, Phase},
    error::ComposeError,
    naming,
};
pub use state::{DynamicState, StateValue, INDEX_KEY};
pub use store::{Action, DeferredMiddleware, LoggingMiddleware, Middleware, Store};
pub use view::ViewContext;
