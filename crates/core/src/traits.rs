use crate::models::*;

// ---------------------------------------------------------------------------
// Driver Trait
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to the OS input system.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriverError {
    #[error("input system unavailable: {0}")]
    Unavailable(String),
    #[error("input injection failed: {0}")]
    Injection(String),
}

/// One open session with the OS input system.
///
/// Sessions are short-lived: a backend opens one per operation and drops it
/// when the operation ends. Implementations need not be `Send`.
pub trait InputDriver {
    /// Move the pointer to an absolute screen position.
    fn move_to(&mut self, point: Point) -> Result<(), DriverError>;

    /// Press, release, or click a mouse button at the current position.
    fn button(&mut self, button: MouseButton, direction: Direction) -> Result<(), DriverError>;

    /// Press, release, or tap a key.
    fn key(&mut self, key: Key, direction: Direction) -> Result<(), DriverError>;

    /// Inject a string as typed text.
    fn text(&mut self, text: &str) -> Result<(), DriverError>;

    /// Scroll the wheel by `amount` notches along `axis`.
    fn scroll(&mut self, amount: i32, axis: ScrollAxis) -> Result<(), DriverError>;

    /// Current pointer position.
    fn location(&self) -> Result<Point, DriverError>;
}

/// Opens driver sessions. Shared across request handlers.
pub trait DriverBackend: Send + Sync {
    /// Short identifier reported by the health endpoint.
    fn name(&self) -> &str;

    /// Open a new session with the input system.
    fn open(&self) -> Result<Box<dyn InputDriver>, DriverError>;
}
