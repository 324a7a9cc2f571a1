//! Delay and strategy profile for the input sequences.
//!
//! Every pause the sequences make comes from here. The defaults are tuned
//! per platform: Windows needs a second click to take focus inside modal
//! dialogs, macOS needs longer pauses around Cmd-A, and Linux accepts bulk
//! text injection.

use inputbot_core::{Key, Platform, TypeMethod};
use serde::{Deserialize, Serialize};

/// All delays are in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Pause after moving the pointer onto a target before clicking it.
    pub move_settle_ms: u64,
    /// Pause after the click that focuses a field.
    pub focus_ms: u64,
    /// Pause after clearing a field.
    pub after_clear_ms: u64,
    /// Click the field again right before typing.
    pub refocus_before_typing: bool,
    /// Pause after the refocus click.
    pub refocus_ms: u64,
    /// Pause right before typing starts.
    pub pre_type_ms: u64,
    /// Pause between finishing typing and moving to the button.
    pub after_type_ms: u64,
    /// Pause before a fill-and-click sequence starts, so the caller can
    /// bring the target window to the front.
    pub fill_settle_ms: u64,
    pub field_clicks: FieldClicks,
    pub select_all: SelectAll,
    pub typing: TypingProfile,
}

/// How `type_text_at` takes focus of a field: a burst of left clicks,
/// optionally followed by Delete to drop the selected text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldClicks {
    pub count: u32,
    pub between_ms: u64,
    pub after_ms: u64,
    pub delete_selection: bool,
    pub after_delete_ms: u64,
}

/// Select-all (modifier + A) followed by Delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectAll {
    pub modifier: Key,
    /// Pause after pressing the modifier and after tapping A.
    pub key_ms: u64,
    /// Pause after releasing the modifier.
    pub release_ms: u64,
    pub after_delete_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingProfile {
    pub method: TypeMethod,
    /// Used when a request asks for a delay of 0.
    pub default_char_delay_ms: u64,
    /// Pause after each injected character, on top of the request delay.
    pub per_char_settle_ms: u64,
    /// Pause after the last character.
    pub trailing_ms: u64,
}

impl Timings {
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Windows => Self {
                move_settle_ms: 50,
                focus_ms: 300,
                after_clear_ms: 500,
                refocus_before_typing: true,
                refocus_ms: 300,
                pre_type_ms: 500,
                after_type_ms: 200,
                fill_settle_ms: 4000,
                field_clicks: FieldClicks {
                    count: 3,
                    between_ms: 100,
                    after_ms: 200,
                    delete_selection: true,
                    after_delete_ms: 500,
                },
                select_all: SelectAll {
                    modifier: Key::Control,
                    key_ms: 50,
                    release_ms: 100,
                    after_delete_ms: 100,
                },
                typing: TypingProfile {
                    method: TypeMethod::CharByChar,
                    default_char_delay_ms: 30,
                    per_char_settle_ms: 20,
                    trailing_ms: 0,
                },
            },
            Platform::MacOs => Self {
                move_settle_ms: 50,
                focus_ms: 400,
                after_clear_ms: 400,
                refocus_before_typing: true,
                refocus_ms: 200,
                pre_type_ms: 500,
                after_type_ms: 200,
                fill_settle_ms: 4000,
                field_clicks: FieldClicks {
                    count: 2,
                    between_ms: 150,
                    after_ms: 200,
                    delete_selection: true,
                    after_delete_ms: 150,
                },
                select_all: SelectAll {
                    modifier: Key::Meta,
                    key_ms: 100,
                    release_ms: 200,
                    after_delete_ms: 200,
                },
                typing: TypingProfile {
                    method: TypeMethod::CharByChar,
                    default_char_delay_ms: 10,
                    per_char_settle_ms: 10,
                    trailing_ms: 100,
                },
            },
            Platform::Linux => Self {
                move_settle_ms: 50,
                focus_ms: 300,
                after_clear_ms: 200,
                refocus_before_typing: false,
                refocus_ms: 0,
                pre_type_ms: 100,
                after_type_ms: 200,
                fill_settle_ms: 4000,
                field_clicks: FieldClicks {
                    count: 2,
                    between_ms: 100,
                    after_ms: 100,
                    delete_selection: false,
                    after_delete_ms: 0,
                },
                select_all: SelectAll {
                    modifier: Key::Control,
                    key_ms: 50,
                    release_ms: 100,
                    after_delete_ms: 100,
                },
                typing: TypingProfile {
                    method: TypeMethod::Bulk,
                    default_char_delay_ms: 10,
                    per_char_settle_ms: 0,
                    trailing_ms: 0,
                },
            },
        }
    }

    /// The current platform's profile with every delay set to zero.
    pub fn instant() -> Self {
        Self::for_platform(Platform::current()).without_delays()
    }

    /// Keep the strategies, drop every pause.
    pub fn without_delays(self) -> Self {
        Self {
            move_settle_ms: 0,
            focus_ms: 0,
            after_clear_ms: 0,
            refocus_ms: 0,
            pre_type_ms: 0,
            after_type_ms: 0,
            fill_settle_ms: 0,
            field_clicks: FieldClicks {
                between_ms: 0,
                after_ms: 0,
                after_delete_ms: 0,
                ..self.field_clicks
            },
            select_all: SelectAll {
                key_ms: 0,
                release_ms: 0,
                after_delete_ms: 0,
                ..self.select_all
            },
            typing: TypingProfile {
                default_char_delay_ms: 0,
                per_char_settle_ms: 0,
                trailing_ms: 0,
                ..self.typing
            },
            ..self
        }
    }

    /// Parse a TOML override. Missing fields keep the current platform's
    /// defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self::for_platform(Platform::current())
    }
}

impl Default for FieldClicks {
    fn default() -> Self {
        Timings::default().field_clicks
    }
}

impl Default for SelectAll {
    fn default() -> Self {
        Timings::default().select_all
    }
}

impl Default for TypingProfile {
    fn default() -> Self {
        Timings::default().typing
    }
}
