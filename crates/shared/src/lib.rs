pub mod domain;
pub mod error;
pub mod naming;

pub use domain::{Event, EventType, Phase};
pub use error::ComposeError;
