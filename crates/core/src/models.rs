use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A position on screen, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Errors produced when parsing user-supplied names into input types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown mouse button: {0:?} (expected left, right or center)")]
    UnknownButton(String),
    #[error("unknown key: {0:?}")]
    UnknownKey(String),
    #[error("unknown typing method: {0:?} (expected char_by_char or bulk)")]
    UnknownMethod(String),
}

// ---------------------------------------------------------------------------
// Mouse
// ---------------------------------------------------------------------------

/// A mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    #[serde(alias = "middle")]
    Center,
}

impl MouseButton {
    pub fn as_str(&self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Right => "right",
            MouseButton::Center => "center",
        }
    }
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a button name. An empty name means the left button.
impl FromStr for MouseButton {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "left" => Ok(MouseButton::Left),
            "right" => Ok(MouseButton::Right),
            "center" | "middle" => Ok(MouseButton::Center),
            _ => Err(ParseError::UnknownButton(s.to_string())),
        }
    }
}

/// Whether an input is pressed, released, or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Press,
    Release,
    Click,
}

impl Direction {
    pub fn from_down(down: bool) -> Self {
        if down {
            Direction::Press
        } else {
            Direction::Release
        }
    }
}

/// Scroll wheel axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollAxis {
    Horizontal,
    Vertical,
}

// ---------------------------------------------------------------------------
// Keyboard
// ---------------------------------------------------------------------------

/// A keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Enter,
    Tab,
    Space,
    Delete,
    Backspace,
    Escape,
    Control,
    Meta,
    Shift,
    Alt,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Char(char),
}

impl Key {
    /// The key that produces `c` when tapped, if it has a dedicated key.
    pub fn for_char(c: char) -> Option<Key> {
        match c {
            '\n' => Some(Key::Enter),
            '\t' => Some(Key::Tab),
            ' ' => Some(Key::Space),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Key::Enter => "enter",
            Key::Tab => "tab",
            Key::Space => "space",
            Key::Delete => "delete",
            Key::Backspace => "backspace",
            Key::Escape => "escape",
            Key::Control => "ctrl",
            Key::Meta => "command",
            Key::Shift => "shift",
            Key::Alt => "alt",
            Key::Up => "up",
            Key::Down => "down",
            Key::Left => "left",
            Key::Right => "right",
            Key::Home => "home",
            Key::End => "end",
            Key::PageUp => "pageup",
            Key::PageDown => "pagedown",
            Key::Char(c) => return write!(f, "{c}"),
        };
        f.write_str(name)
    }
}

impl FromStr for Key {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // A lone whitespace character is a key in its own right.
        let name = if s.chars().count() == 1 { s } else { s.trim() };
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(Key::for_char(c).unwrap_or(Key::Char(c)));
        }

        let key = match name.to_ascii_lowercase().as_str() {
            "enter" | "return" => Key::Enter,
            "tab" => Key::Tab,
            "space" => Key::Space,
            "delete" | "del" => Key::Delete,
            "backspace" => Key::Backspace,
            "escape" | "esc" => Key::Escape,
            "ctrl" | "control" => Key::Control,
            "cmd" | "command" | "meta" | "super" | "win" => Key::Meta,
            "shift" => Key::Shift,
            "alt" | "option" => Key::Alt,
            "up" => Key::Up,
            "down" => Key::Down,
            "left" => Key::Left,
            "right" => Key::Right,
            "home" => Key::Home,
            "end" => Key::End,
            "pageup" => Key::PageUp,
            "pagedown" => Key::PageDown,
            _ => return Err(ParseError::UnknownKey(s.to_string())),
        };
        Ok(key)
    }
}

/// How text is delivered to the focused field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeMethod {
    /// One key event per character, paced by the typing delay.
    CharByChar,
    /// The whole string in a single text injection.
    Bulk,
}

impl fmt::Display for TypeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeMethod::CharByChar => f.write_str("char_by_char"),
            TypeMethod::Bulk => f.write_str("bulk"),
        }
    }
}

impl FromStr for TypeMethod {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "char_by_char" | "charbychar" | "chars" => Ok(TypeMethod::CharByChar),
            "bulk" => Ok(TypeMethod::Bulk),
            _ => Err(ParseError::UnknownMethod(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Platform
// ---------------------------------------------------------------------------

/// The host operating system family. Delay tuning and typing strategy
/// depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// The platform this binary was compiled for. Anything that is not
    /// Windows or macOS is treated as Linux.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::MacOs => "macos",
            Platform::Linux => "linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Composite operations
// ---------------------------------------------------------------------------

/// Options for the "click a field and type into it" sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputOptions {
    /// Select-all and delete the field's contents before typing.
    pub clear_before_input: bool,
    /// Pause between the pointer arriving at a target and clicking it (ms).
    pub click_delay_ms: u64,
    /// Pause between typed characters (ms). 0 uses the platform default.
    pub type_delay_ms: u64,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            clear_before_input: true,
            click_delay_ms: 100,
            type_delay_ms: 30,
        }
    }
}

/// Fill a text field, then click a button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillAndClick {
    /// The text field.
    pub input: Point,
    pub text: String,
    /// The button clicked once the text is typed.
    pub target: Point,
    pub button: MouseButton,
    pub options: InputOptions,
}
