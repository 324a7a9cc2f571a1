use crate::models::*;
use serde::{Deserialize, Serialize};

/// A single input event as delivered to a driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Absolute pointer move.
    Move { to: Point },
    Button {
        button: MouseButton,
        direction: Direction,
    },
    Key { key: Key, direction: Direction },
    /// Text injected in one call.
    Text { text: String },
    Scroll { amount: i32, axis: ScrollAxis },
}

impl InputEvent {
    pub fn is_click(&self, button: MouseButton) -> bool {
        matches!(
            self,
            InputEvent::Button { button: b, direction: Direction::Click } if *b == button
        )
    }

    pub fn is_key_tap(&self, key: Key) -> bool {
        matches!(
            self,
            InputEvent::Key { key: k, direction: Direction::Click } if *k == key
        )
    }
}
