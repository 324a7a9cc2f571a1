pub mod error;
pub mod service;
mod session;
pub mod timings;

pub use error::{AutomationError, StepExt};
pub use service::InputService;
pub use timings::{FieldClicks, SelectAll, Timings, TypingProfile};
