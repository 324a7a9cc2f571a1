//! The steps the public operations are built from.

use crate::error::{AutomationError, StepExt};
use crate::timings::Timings;
use inputbot_core::*;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// One open driver plus the profile that paces it.
pub(crate) struct Session<'a> {
    driver: Box<dyn InputDriver>,
    timings: &'a Timings,
}

impl<'a> Session<'a> {
    pub(crate) fn new(driver: Box<dyn InputDriver>, timings: &'a Timings) -> Self {
        Self { driver, timings }
    }

    pub(crate) fn pause(&self, ms: u64) {
        if ms > 0 {
            thread::sleep(Duration::from_millis(ms));
        }
    }

    pub(crate) fn location(&self) -> Result<Point, AutomationError> {
        self.driver.location().step("read pointer position")
    }

    pub(crate) fn move_to(&mut self, point: Point) -> Result<(), AutomationError> {
        self.driver.move_to(point).step("move pointer")
    }

    pub(crate) fn click(&mut self, button: MouseButton) -> Result<(), AutomationError> {
        self.driver.button(button, Direction::Click).step("click")
    }

    pub(crate) fn key(&mut self, key: Key, direction: Direction) -> Result<(), AutomationError> {
        self.driver.key(key, direction).step("key")
    }

    pub(crate) fn tap(&mut self, key: Key) -> Result<(), AutomationError> {
        self.key(key, Direction::Click)
    }

    pub(crate) fn scroll(&mut self, amount: i32, axis: ScrollAxis) -> Result<(), AutomationError> {
        self.driver.scroll(amount, axis).step("scroll")
    }

    /// Move onto `point`, wait `settle_ms`, click.
    pub(crate) fn click_at(
        &mut self,
        point: Point,
        button: MouseButton,
        settle_ms: u64,
    ) -> Result<(), AutomationError> {
        self.move_to(point)?;
        self.pause(settle_ms);
        self.click(button)
    }

    /// Type `text` into whatever has focus. A `delay_ms` of 0 takes the
    /// platform default.
    pub(crate) fn type_text(
        &mut self,
        text: &str,
        delay_ms: u64,
        method: Option<TypeMethod>,
    ) -> Result<(), AutomationError> {
        if text.is_empty() {
            warn!("Empty text, nothing to type");
            return Ok(());
        }

        let typing = &self.timings.typing;
        let delay_ms = if delay_ms == 0 {
            typing.default_char_delay_ms
        } else {
            delay_ms
        };
        let method = method.unwrap_or(typing.method);

        info!(
            %method,
            delay_ms,
            chars = text.chars().count(),
            "Typing text"
        );
        debug!(text, "Text to type");

        match method {
            TypeMethod::CharByChar => self.type_chars(text, delay_ms),
            TypeMethod::Bulk => self.driver.text(text).step("type text"),
        }
    }

    fn type_chars(&mut self, text: &str, delay_ms: u64) -> Result<(), AutomationError> {
        let settle_ms = self.timings.typing.per_char_settle_ms;
        let trailing_ms = self.timings.typing.trailing_ms;
        let total = text.chars().count();
        let mut buf = [0u8; 4];

        for (i, c) in text.chars().enumerate() {
            match Key::for_char(c) {
                Some(key) => self.tap(key)?,
                None => {
                    self.driver
                        .text(c.encode_utf8(&mut buf))
                        .step("type character")?;
                    self.pause(settle_ms);
                }
            }
            trace!(position = i + 1, total, "Typed character");

            if i + 1 < total {
                self.pause(delay_ms);
            } else {
                self.pause(trailing_ms);
            }
        }

        debug!(chars = total, "Typed text character by character");
        Ok(())
    }

    /// Select everything in the focused field and delete it.
    pub(crate) fn clear_input(&mut self) -> Result<(), AutomationError> {
        let select_all = self.timings.select_all.clone();
        debug!(modifier = %select_all.modifier, "Select all and delete");

        self.key(select_all.modifier, Direction::Press)?;
        self.pause(select_all.key_ms);
        let tapped = self.tap(Key::Char('a'));
        self.pause(select_all.key_ms);
        // Release even when the tap failed, so the modifier is not left held.
        let released = self.key(select_all.modifier, Direction::Release);
        tapped?;
        released?;
        self.pause(select_all.release_ms);

        self.tap(Key::Delete)?;
        self.pause(select_all.after_delete_ms);
        Ok(())
    }

    /// Focus a field with a burst of clicks, as configured in
    /// `field_clicks`, then type into it.
    pub(crate) fn type_text_at(
        &mut self,
        point: Point,
        text: &str,
        delay_ms: u64,
        method: Option<TypeMethod>,
    ) -> Result<(), AutomationError> {
        let clicks = self.timings.field_clicks.clone();

        self.move_to(point)?;
        self.pause(self.timings.move_settle_ms);

        debug!(count = clicks.count, "Clicking to focus field");
        for n in 0..clicks.count {
            self.click(MouseButton::Left)?;
            if n + 1 < clicks.count {
                self.pause(clicks.between_ms);
            } else {
                self.pause(clicks.after_ms);
            }
        }

        if clicks.delete_selection {
            self.tap(Key::Delete)?;
            self.pause(clicks.after_delete_ms);
        }

        self.type_text(text, delay_ms, method)
    }

    /// Click a field, optionally clear it, and type `text` into it.
    pub(crate) fn fill_field(
        &mut self,
        point: Point,
        text: &str,
        options: &InputOptions,
    ) -> Result<(), AutomationError> {
        self.click_at(point, MouseButton::Left, options.click_delay_ms)?;
        self.pause(self.timings.focus_ms);
        debug!("Field focused");

        if options.clear_before_input {
            self.clear_input()?;
            self.pause(self.timings.after_clear_ms);
            debug!("Field cleared");
        }

        if self.timings.refocus_before_typing {
            self.click(MouseButton::Left)?;
            self.pause(self.timings.refocus_ms);
        }
        self.pause(self.timings.pre_type_ms);

        self.type_text(text, options.type_delay_ms, None)
    }
}
