use inputbot_core::*;
use std::sync::{Arc, Mutex, MutexGuard};

/// Configuration for the recording backend.
#[derive(Debug, Clone, Default)]
pub struct RecordingConfig {
    /// Initial pointer position.
    pub start: Point,
    /// Fail every `open()` as if no display were available.
    pub unavailable: bool,
    /// Reject text injection (both bulk text and single characters).
    pub reject_text: bool,
}

#[derive(Debug, Default)]
struct Recorded {
    events: Vec<InputEvent>,
    cursor: Point,
    sessions: usize,
}

/// An input backend that records events instead of injecting them.
///
/// Clones share the same log, so a test can keep one handle and give
/// another to the service under test.
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    config: RecordingConfig,
    shared: Arc<Mutex<Recorded>>,
}

impl RecordingBackend {
    pub fn new(config: RecordingConfig) -> Self {
        let recorded = Recorded {
            cursor: config.start,
            ..Default::default()
        };
        Self {
            config,
            shared: Arc::new(Mutex::new(recorded)),
        }
    }

    /// Every event recorded so far, in order.
    pub fn events(&self) -> Vec<InputEvent> {
        lock(&self.shared).events.clone()
    }

    /// Current simulated pointer position.
    pub fn cursor(&self) -> Point {
        lock(&self.shared).cursor
    }

    /// Number of sessions opened.
    pub fn sessions(&self) -> usize {
        lock(&self.shared).sessions
    }

    /// Drop the recorded events, keeping the pointer position.
    pub fn clear(&self) {
        lock(&self.shared).events.clear();
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new(RecordingConfig::default())
    }
}

impl DriverBackend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    fn open(&self) -> Result<Box<dyn InputDriver>, DriverError> {
        if self.config.unavailable {
            return Err(DriverError::Unavailable("recording backend disabled".to_string()));
        }
        lock(&self.shared).sessions += 1;
        Ok(Box::new(RecordingDriver {
            shared: Arc::clone(&self.shared),
            reject_text: self.config.reject_text,
        }))
    }
}

struct RecordingDriver {
    shared: Arc<Mutex<Recorded>>,
    reject_text: bool,
}

impl RecordingDriver {
    fn push(&self, event: InputEvent) {
        tracing::trace!(?event, "Recorded input event");
        lock(&self.shared).events.push(event);
    }

    fn check_text(&self) -> Result<(), DriverError> {
        if self.reject_text {
            Err(DriverError::Injection("text rejected".to_string()))
        } else {
            Ok(())
        }
    }
}

impl InputDriver for RecordingDriver {
    fn move_to(&mut self, point: Point) -> Result<(), DriverError> {
        lock(&self.shared).cursor = point;
        self.push(InputEvent::Move { to: point });
        Ok(())
    }

    fn button(&mut self, button: MouseButton, direction: Direction) -> Result<(), DriverError> {
        self.push(InputEvent::Button { button, direction });
        Ok(())
    }

    fn key(&mut self, key: Key, direction: Direction) -> Result<(), DriverError> {
        if let Key::Char(_) = key {
            self.check_text()?;
        }
        self.push(InputEvent::Key { key, direction });
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), DriverError> {
        self.check_text()?;
        self.push(InputEvent::Text {
            text: text.to_string(),
        });
        Ok(())
    }

    fn scroll(&mut self, amount: i32, axis: ScrollAxis) -> Result<(), DriverError> {
        self.push(InputEvent::Scroll { amount, axis });
        Ok(())
    }

    fn location(&self) -> Result<Point, DriverError> {
        Ok(lock(&self.shared).cursor)
    }
}

// A panic while holding the lock leaves the log intact; keep using it.
fn lock(shared: &Mutex<Recorded>) -> MutexGuard<'_, Recorded> {
    shared.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_events_in_order() {
        let backend = RecordingBackend::default();
        let mut driver = backend.open().unwrap();
        driver.move_to(Point::new(10, 20)).unwrap();
        driver.button(MouseButton::Left, Direction::Click).unwrap();
        driver.text("hi").unwrap();

        let events = backend.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], InputEvent::Move { to: Point::new(10, 20) });
        assert!(events[1].is_click(MouseButton::Left));
        assert_eq!(backend.cursor(), Point::new(10, 20));
        assert_eq!(driver.location().unwrap(), Point::new(10, 20));
    }

    #[test]
    fn test_unavailable_backend_fails_to_open() {
        let backend = RecordingBackend::new(RecordingConfig {
            unavailable: true,
            ..Default::default()
        });
        assert!(matches!(backend.open(), Err(DriverError::Unavailable(_))));
        assert_eq!(backend.sessions(), 0);
    }

    #[test]
    fn test_rejects_text_but_not_named_keys() {
        let backend = RecordingBackend::new(RecordingConfig {
            reject_text: true,
            ..Default::default()
        });
        let mut driver = backend.open().unwrap();
        assert!(driver.text("abc").is_err());
        assert!(driver.key(Key::Char('a'), Direction::Click).is_err());
        assert!(driver.key(Key::Enter, Direction::Click).is_ok());
    }
}
