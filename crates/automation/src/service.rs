use crate::error::{AutomationError, StepExt};
use crate::session::Session;
use crate::timings::Timings;
use inputbot_core::*;
use std::sync::{Arc, Mutex};
use tracing::{info, info_span};
use uuid::Uuid;

/// Mouse and keyboard automation over a driver backend.
///
/// Every operation is blocking: it opens one driver session, runs its
/// sequence with the configured pauses, and closes the session. Operations
/// are serialized, since interleaving two sequences on one pointer would
/// scramble both.
pub struct InputService {
    backend: Arc<dyn DriverBackend>,
    platform: Platform,
    timings: Timings,
    session_lock: Mutex<()>,
}

impl InputService {
    pub fn new(backend: Arc<dyn DriverBackend>, platform: Platform, timings: Timings) -> Self {
        Self {
            backend,
            platform,
            timings,
            session_lock: Mutex::new(()),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    fn run<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut Session<'_>) -> Result<T, AutomationError>,
    ) -> Result<T, AutomationError> {
        let span = info_span!("automation", op, id = %Uuid::new_v4(), platform = %self.platform);
        let _enter = span.enter();

        let _guard = self
            .session_lock
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let driver = self.backend.open().step("open input session")?;
        let mut session = Session::new(driver, &self.timings);

        let result = f(&mut session);
        if let Err(e) = &result {
            tracing::error!(error = %e, "Automation failed");
        }
        result
    }

    // -----------------------------------------------------------------------
    // Mouse
    // -----------------------------------------------------------------------

    pub fn mouse_position(&self) -> Result<Point, AutomationError> {
        self.run("mouse_position", |s| {
            let point = s.location()?;
            tracing::debug!(x = point.x, y = point.y, "Pointer position");
            Ok(point)
        })
    }

    pub fn move_mouse(&self, point: Point) -> Result<(), AutomationError> {
        self.run("move_mouse", |s| {
            info!(x = point.x, y = point.y, "Moving pointer");
            s.move_to(point)
        })
    }

    /// Click at the current pointer position.
    pub fn click(&self, button: MouseButton) -> Result<(), AutomationError> {
        self.run("click", |s| {
            info!(%button, "Clicking");
            s.click(button)
        })
    }

    pub fn click_at(&self, point: Point, button: MouseButton) -> Result<(), AutomationError> {
        self.run("click_at", |s| {
            info!(x = point.x, y = point.y, %button, "Clicking at coordinates");
            s.click_at(point, button, self.timings.move_settle_ms)
        })
    }

    /// Scroll horizontally by `dx` then vertically by `dy` notches. Zero
    /// amounts are skipped.
    pub fn scroll(&self, dx: i32, dy: i32) -> Result<(), AutomationError> {
        self.run("scroll", |s| {
            info!(dx, dy, "Scrolling");
            if dx != 0 {
                s.scroll(dx, ScrollAxis::Horizontal)?;
            }
            if dy != 0 {
                s.scroll(dy, ScrollAxis::Vertical)?;
            }
            Ok(())
        })
    }

    // -----------------------------------------------------------------------
    // Keyboard
    // -----------------------------------------------------------------------

    /// Type into the focused element.
    pub fn type_text(
        &self,
        text: &str,
        delay_ms: u64,
        method: Option<TypeMethod>,
    ) -> Result<(), AutomationError> {
        self.run("type_text", |s| s.type_text(text, delay_ms, method))
    }

    /// Focus the field at `point` with the platform's click burst, then type.
    pub fn type_text_at(
        &self,
        point: Point,
        text: &str,
        delay_ms: u64,
        method: Option<TypeMethod>,
    ) -> Result<(), AutomationError> {
        self.run("type_text_at", |s| {
            info!(x = point.x, y = point.y, "Typing text at coordinates");
            s.type_text_at(point, text, delay_ms, method)
        })
    }

    pub fn key_tap(&self, key: Key) -> Result<(), AutomationError> {
        self.run("key_tap", |s| {
            info!(%key, "Tapping key");
            s.tap(key)
        })
    }

    /// Hold (`down = true`) or release a key.
    pub fn key_toggle(&self, key: Key, down: bool) -> Result<(), AutomationError> {
        self.run("key_toggle", |s| {
            info!(%key, down, "Toggling key");
            s.key(key, Direction::from_down(down))
        })
    }

    /// Clear the focused field (select all, delete).
    pub fn clear_input(&self) -> Result<(), AutomationError> {
        self.run("clear_input", |s| {
            info!("Clearing focused field");
            s.clear_input()
        })
    }

    // -----------------------------------------------------------------------
    // Composite
    // -----------------------------------------------------------------------

    /// Click the field at `point`, optionally clear it, and type `text`.
    pub fn input_at(
        &self,
        point: Point,
        text: &str,
        options: &InputOptions,
    ) -> Result<(), AutomationError> {
        self.run("input_at", |s| {
            info!(
                x = point.x,
                y = point.y,
                clear_before = options.clear_before_input,
                "Filling field"
            );
            s.fill_field(point, text, options)
        })
    }

    /// Fill a field, then click a button.
    pub fn fill_and_click(&self, request: &FillAndClick) -> Result<(), AutomationError> {
        self.run("fill_and_click", |s| {
            info!(
                input_x = request.input.x,
                input_y = request.input.y,
                button_x = request.target.x,
                button_y = request.target.y,
                button = %request.button,
                "Filling field and clicking button"
            );
            s.pause(self.timings.fill_settle_ms);

            s.fill_field(request.input, &request.text, &request.options)?;
            s.pause(self.timings.after_type_ms);

            s.click_at(request.target, request.button, request.options.click_delay_ms)?;
            info!("Field filled and button clicked");
            Ok(())
        })
    }
}
