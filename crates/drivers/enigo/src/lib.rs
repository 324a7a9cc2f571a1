//! Native input driver.
//!
//! Injects real mouse and keyboard events through `enigo`. A fresh `Enigo`
//! connection is opened per session, so nothing platform-specific has to be
//! shared between threads.

use enigo::{Axis, Button, Coordinate, Enigo, Keyboard, Mouse, Settings};
use inputbot_core::*;

/// Backend that opens `enigo` sessions against the local display.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnigoBackend;

impl EnigoBackend {
    pub fn new() -> Self {
        Self
    }
}

impl DriverBackend for EnigoBackend {
    fn name(&self) -> &str {
        "enigo"
    }

    fn open(&self) -> Result<Box<dyn InputDriver>, DriverError> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| DriverError::Unavailable(format!("Failed to create Enigo: {}", e)))?;
        tracing::trace!("Opened enigo session");
        Ok(Box::new(EnigoDriver { enigo }))
    }
}

struct EnigoDriver {
    enigo: Enigo,
}

impl InputDriver for EnigoDriver {
    fn move_to(&mut self, point: Point) -> Result<(), DriverError> {
        self.enigo
            .move_mouse(point.x, point.y, Coordinate::Abs)
            .map_err(|e| DriverError::Injection(format!("Mouse move failed: {}", e)))
    }

    fn button(&mut self, button: MouseButton, direction: Direction) -> Result<(), DriverError> {
        self.enigo
            .button(map_button(button), map_direction(direction))
            .map_err(|e| DriverError::Injection(format!("Mouse {} failed: {}", button, e)))
    }

    fn key(&mut self, key: Key, direction: Direction) -> Result<(), DriverError> {
        self.enigo
            .key(map_key(key), map_direction(direction))
            .map_err(|e| DriverError::Injection(format!("Key {} failed: {}", key, e)))
    }

    fn text(&mut self, text: &str) -> Result<(), DriverError> {
        self.enigo
            .text(text)
            .map_err(|e| DriverError::Injection(format!("Text input failed: {}", e)))
    }

    fn scroll(&mut self, amount: i32, axis: ScrollAxis) -> Result<(), DriverError> {
        let axis = match axis {
            ScrollAxis::Horizontal => Axis::Horizontal,
            ScrollAxis::Vertical => Axis::Vertical,
        };
        self.enigo
            .scroll(amount, axis)
            .map_err(|e| DriverError::Injection(format!("Scroll failed: {}", e)))
    }

    fn location(&self) -> Result<Point, DriverError> {
        let (x, y) = self
            .enigo
            .location()
            .map_err(|e| DriverError::Injection(format!("Pointer location failed: {}", e)))?;
        Ok(Point::new(x, y))
    }
}

fn map_button(button: MouseButton) -> Button {
    match button {
        MouseButton::Left => Button::Left,
        MouseButton::Right => Button::Right,
        MouseButton::Center => Button::Middle,
    }
}

fn map_direction(direction: Direction) -> enigo::Direction {
    match direction {
        Direction::Press => enigo::Direction::Press,
        Direction::Release => enigo::Direction::Release,
        Direction::Click => enigo::Direction::Click,
    }
}

fn map_key(key: Key) -> enigo::Key {
    match key {
        Key::Enter => enigo::Key::Return,
        Key::Tab => enigo::Key::Tab,
        Key::Space => enigo::Key::Space,
        Key::Delete => enigo::Key::Delete,
        Key::Backspace => enigo::Key::Backspace,
        Key::Escape => enigo::Key::Escape,
        Key::Control => enigo::Key::Control,
        Key::Meta => enigo::Key::Meta,
        Key::Shift => enigo::Key::Shift,
        Key::Alt => enigo::Key::Alt,
        Key::Up => enigo::Key::UpArrow,
        Key::Down => enigo::Key::DownArrow,
        Key::Left => enigo::Key::LeftArrow,
        Key::Right => enigo::Key::RightArrow,
        Key::Home => enigo::Key::Home,
        Key::End => enigo::Key::End,
        Key::PageUp => enigo::Key::PageUp,
        Key::PageDown => enigo::Key::PageDown,
        Key::Char(c) => enigo::Key::Unicode(c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert!(matches!(map_key(Key::Enter), enigo::Key::Return));
        assert!(matches!(map_key(Key::Char('z')), enigo::Key::Unicode('z')));
        assert!(matches!(map_key(Key::Meta), enigo::Key::Meta));
    }

    #[test]
    fn test_button_mapping() {
        assert!(matches!(map_button(MouseButton::Center), Button::Middle));
        assert!(matches!(
            map_direction(Direction::Click),
            enigo::Direction::Click
        ));
    }
}
