use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use inputbot_core::*;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

type ApiResult = Result<Json<Value>, ApiError>;

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Health
        .route("/health", get(health_check))
        // Mouse
        .route("/robotogo/mouse/position", get(mouse_position))
        .route("/robotogo/mouse/move", post(move_mouse))
        .route("/robotogo/mouse/click", post(click))
        .route("/robotogo/mouse/scroll", post(scroll))
        // Keyboard
        .route("/robotogo/keyboard/type", post(type_text))
        .route("/robotogo/keyboard/tap", post(key_tap))
        .route("/robotogo/keyboard/toggle", post(key_toggle))
        .route("/robotogo/keyboard/clear", post(clear_input))
        // Composite
        .route("/robotogo/input", post(input_at_coordinates))
        .route("/robotogo/fill-and-click", post(fill_and_click))
}

/// `{"success": true, "message": ...}` plus the fields of `extra`.
fn success(message: impl Into<String>, extra: Value) -> Json<Value> {
    let mut body = json!({
        "success": true,
        "message": message.into(),
    });
    if let (Some(obj), Value::Object(extra)) = (body.as_object_mut(), extra) {
        obj.extend(extra);
    }
    Json(body)
}

fn parse<T>(payload: Result<Json<T>, JsonRejection>, message: &str) -> Result<T, ApiError> {
    payload
        .map(|Json(req)| req)
        .map_err(|rejection| ApiError::from_rejection(message, rejection))
}

fn require_text(text: &str, message: &str) -> Result<(), ApiError> {
    if text.is_empty() {
        Err(ApiError::bad_request(message, "text must not be empty"))
    } else {
        Ok(())
    }
}

fn parse_button(button: Option<&str>) -> Result<MouseButton, ApiError> {
    button
        .unwrap_or_default()
        .parse()
        .map_err(|e| ApiError::bad_request("Invalid mouse button", e))
}

/// Request delays of 0 or less mean "use the default".
fn or_default(value: i64, default: u64) -> u64 {
    u64::try_from(value)
        .ok()
        .filter(|&ms| ms > 0)
        .unwrap_or(default)
}

/// Coordinates only count when both are positive; otherwise the action
/// happens at the current pointer position.
fn target_point(x: i32, y: i32) -> Option<Point> {
    (x > 0 && y > 0).then(|| Point::new(x, y))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime = Utc::now() - state.started_at;
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "platform": state.input.platform(),
        "backend": state.input.backend_name(),
        "started_at": state.started_at,
        "uptime_secs": uptime.num_seconds(),
    }))
}

// ---------------------------------------------------------------------------
// Mouse
// ---------------------------------------------------------------------------

async fn mouse_position(State(state): State<Arc<AppState>>) -> ApiResult {
    let point = state
        .run(|input| input.mouse_position())
        .await
        .map_err(|e| ApiError::automation("Failed to read mouse position", e))?;

    Ok(success(
        format!("Mouse is at {}", point),
        json!({ "x": point.x, "y": point.y }),
    ))
}

#[derive(Debug, Deserialize)]
struct MoveMouseRequest {
    x: i32,
    y: i32,
}

async fn move_mouse(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MoveMouseRequest>, JsonRejection>,
) -> ApiResult {
    let req = parse(payload, "x and y coordinates are required")?;
    let point = Point::new(req.x, req.y);

    state
        .run(move |input| input.move_mouse(point))
        .await
        .map_err(|e| ApiError::automation("Failed to move mouse", e))?;

    Ok(success(
        format!("Mouse moved to {}", point),
        json!({ "x": req.x, "y": req.y }),
    ))
}

#[derive(Debug, Deserialize)]
struct ClickRequest {
    #[serde(default)]
    x: i32,
    #[serde(default)]
    y: i32,
    button: Option<String>,
}

async fn click(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ClickRequest>, JsonRejection>,
) -> ApiResult {
    let req = parse(payload, "Invalid request format")?;
    let button = parse_button(req.button.as_deref())?;
    let target = target_point(req.x, req.y);

    state
        .run(move |input| match target {
            Some(point) => input.click_at(point, button),
            None => input.click(button),
        })
        .await
        .map_err(|e| ApiError::automation("Click failed", e))?;

    let message = match target {
        Some(point) => format!("Clicked at {} (button: {})", point, button),
        None => format!("Clicked (button: {})", button),
    };
    Ok(success(message, json!({})))
}

#[derive(Debug, Deserialize)]
struct ScrollRequest {
    #[serde(default)]
    x: i32,
    #[serde(default)]
    y: i32,
}

async fn scroll(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ScrollRequest>, JsonRejection>,
) -> ApiResult {
    let req = parse(payload, "Invalid request format")?;
    let (dx, dy) = (req.x, req.y);

    state
        .run(move |input| input.scroll(dx, dy))
        .await
        .map_err(|e| ApiError::automation("Scroll failed", e))?;

    Ok(success(
        format!("Scrolled by ({}, {})", dx, dy),
        json!({ "x": dx, "y": dy }),
    ))
}

// ---------------------------------------------------------------------------
// Keyboard
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TypeTextRequest {
    text: String,
    #[serde(default)]
    x: i32,
    #[serde(default)]
    y: i32,
    /// Pause between characters; 0 or less uses the platform default.
    #[serde(default)]
    delay_ms: i64,
    method: Option<String>,
}

async fn type_text(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TypeTextRequest>, JsonRejection>,
) -> ApiResult {
    const MESSAGE: &str = "Text to type is required";
    let req = parse(payload, MESSAGE)?;
    require_text(&req.text, MESSAGE)?;
    let method = req
        .method
        .as_deref()
        .map(str::parse::<TypeMethod>)
        .transpose()
        .map_err(|e| ApiError::bad_request("Invalid typing method", e))?;
    let target = target_point(req.x, req.y);

    let text = req.text.clone();
    // 0 tells the service to use the platform default.
    let delay_ms = or_default(req.delay_ms, 0);
    state
        .run(move |input| match target {
            Some(point) => input.type_text_at(point, &text, delay_ms, method),
            None => input.type_text(&text, delay_ms, method),
        })
        .await
        .map_err(|e| ApiError::automation("Failed to type text", e))?;

    let message = match target {
        Some(point) => format!("Text typed at {}: {}", point, req.text),
        None => format!("Text typed: {}", req.text),
    };
    Ok(success(message, json!({ "text": req.text })))
}

#[derive(Debug, Deserialize)]
struct KeyTapRequest {
    key: String,
}

async fn key_tap(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<KeyTapRequest>, JsonRejection>,
) -> ApiResult {
    let req = parse(payload, "key is required")?;
    let key: Key = req
        .key
        .parse()
        .map_err(|e| ApiError::bad_request("Invalid key", e))?;

    state
        .run(move |input| input.key_tap(key))
        .await
        .map_err(|e| ApiError::automation("Key tap failed", e))?;

    Ok(success(
        format!("Key tapped: {}", key),
        json!({ "key": req.key }),
    ))
}

#[derive(Debug, Deserialize)]
struct KeyToggleRequest {
    key: String,
    down: bool,
}

async fn key_toggle(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<KeyToggleRequest>, JsonRejection>,
) -> ApiResult {
    let req = parse(payload, "key and down are required")?;
    let key: Key = req
        .key
        .parse()
        .map_err(|e| ApiError::bad_request("Invalid key", e))?;
    let down = req.down;

    state
        .run(move |input| input.key_toggle(key, down))
        .await
        .map_err(|e| ApiError::automation("Key toggle failed", e))?;

    let action = if down { "held" } else { "released" };
    Ok(success(
        format!("Key {}: {}", action, key),
        json!({ "key": req.key, "down": down }),
    ))
}

async fn clear_input(State(state): State<Arc<AppState>>) -> ApiResult {
    state
        .run(|input| input.clear_input())
        .await
        .map_err(|e| ApiError::automation("Failed to clear field", e))?;

    Ok(success("Field cleared", json!({})))
}

// ---------------------------------------------------------------------------
// Composite
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct InputAtCoordinatesRequest {
    x: i32,
    y: i32,
    text: String,
    #[serde(default)]
    clear_before_input: bool,
    #[serde(default)]
    click_delay_ms: i64,
    #[serde(default)]
    type_delay_ms: i64,
}

async fn input_at_coordinates(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<InputAtCoordinatesRequest>, JsonRejection>,
) -> ApiResult {
    const MESSAGE: &str = "x, y and text are required";
    let req = parse(payload, MESSAGE)?;
    require_text(&req.text, MESSAGE)?;

    let defaults = InputOptions::default();
    let options = InputOptions {
        clear_before_input: req.clear_before_input,
        click_delay_ms: or_default(req.click_delay_ms, defaults.click_delay_ms),
        type_delay_ms: or_default(req.type_delay_ms, defaults.type_delay_ms),
    };
    let point = Point::new(req.x, req.y);

    let text = req.text.clone();
    state
        .run(move |input| input.input_at(point, &text, &options))
        .await
        .map_err(|e| ApiError::automation("Failed to enter data", e))?;

    Ok(success(
        format!("Data entered at {}: {}", point, req.text),
        json!({ "x": req.x, "y": req.y, "text": req.text }),
    ))
}

#[derive(Debug, Deserialize)]
struct FillAndClickRequest {
    input_x: i32,
    input_y: i32,
    text: String,
    button_x: i32,
    button_y: i32,
    button: Option<String>,
    /// Absent means true.
    clear_before_input: Option<bool>,
    #[serde(default)]
    click_delay_ms: i64,
    #[serde(default)]
    type_delay_ms: i64,
}

async fn fill_and_click(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FillAndClickRequest>, JsonRejection>,
) -> ApiResult {
    const MESSAGE: &str = "input_x, input_y, text, button_x and button_y are required";
    let req = parse(payload, MESSAGE)?;
    require_text(&req.text, MESSAGE)?;
    let button = parse_button(req.button.as_deref())?;

    let defaults = InputOptions::default();
    let request = FillAndClick {
        input: Point::new(req.input_x, req.input_y),
        text: req.text,
        target: Point::new(req.button_x, req.button_y),
        button,
        options: InputOptions {
            clear_before_input: req.clear_before_input.unwrap_or(defaults.clear_before_input),
            click_delay_ms: or_default(req.click_delay_ms, defaults.click_delay_ms),
            type_delay_ms: or_default(req.type_delay_ms, defaults.type_delay_ms),
        },
    };

    let request = Arc::new(request);
    let job = Arc::clone(&request);
    state
        .run(move |input| input.fill_and_click(&job))
        .await
        .map_err(|e| ApiError::automation("Operation failed", e))?;

    Ok(success(
        format!(
            "Text '{}' entered into input {} and button clicked at {}",
            request.text, request.input, request.target
        ),
        json!({
            "input": { "x": request.input.x, "y": request.input.y },
            "text": request.text,
            "button": {
                "x": request.target.x,
                "y": request.target.y,
                "button": request.button,
            },
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use inputbot_automation::{InputService, Timings};
    use inputbot_drivers_common::{RecordingBackend, RecordingConfig};
    use tower::ServiceExt;

    fn app(backend: &RecordingBackend) -> Router {
        let input = InputService::new(
            Arc::new(backend.clone()),
            Platform::Linux,
            Timings::for_platform(Platform::Linux).without_delays(),
        );
        crate::build_router(AppState::new(input))
    }

    async fn call(app: Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let backend = RecordingBackend::default();
        let (status, body) = call(app(&backend), "GET", "/api/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["platform"], "linux");
        assert_eq!(body["backend"], "recording");
    }

    #[tokio::test]
    async fn test_mouse_position() {
        let backend = RecordingBackend::new(RecordingConfig {
            start: Point::new(12, 34),
            ..Default::default()
        });
        let (status, body) =
            call(app(&backend), "GET", "/api/robotogo/mouse/position", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["x"], 12);
        assert_eq!(body["y"], 34);
    }

    #[tokio::test]
    async fn test_move_mouse() {
        let backend = RecordingBackend::default();
        let (status, body) = call(
            app(&backend),
            "POST",
            "/api/robotogo/mouse/move",
            Some(r#"{"x": 640, "y": 480}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Mouse moved to (640, 480)");
        assert_eq!(backend.cursor(), Point::new(640, 480));
    }

    #[tokio::test]
    async fn test_move_mouse_requires_coordinates() {
        let backend = RecordingBackend::default();
        let (status, body) = call(
            app(&backend),
            "POST",
            "/api/robotogo/mouse/move",
            Some(r#"{"x": 640}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "x and y coordinates are required");
        assert!(body["error"].as_str().unwrap().contains("y"));
        assert!(backend.events().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let backend = RecordingBackend::default();
        let (status, body) = call(
            app(&backend),
            "POST",
            "/api/robotogo/mouse/click",
            Some("{not json"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_click_without_coordinates_uses_current_position() {
        let backend = RecordingBackend::default();
        let (status, body) = call(
            app(&backend),
            "POST",
            "/api/robotogo/mouse/click",
            Some(r#"{"button": "right"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Clicked (button: right)");
        let events = backend.events();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_click(MouseButton::Right));
    }

    #[tokio::test]
    async fn test_click_at_coordinates_defaults_to_left() {
        let backend = RecordingBackend::default();
        let (status, body) = call(
            app(&backend),
            "POST",
            "/api/robotogo/mouse/click",
            Some(r#"{"x": 10, "y": 20, "button": ""}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Clicked at (10, 20) (button: left)");
        let events = backend.events();
        assert_eq!(events[0], InputEvent::Move { to: Point::new(10, 20) });
        assert!(events[1].is_click(MouseButton::Left));
    }

    #[tokio::test]
    async fn test_click_rejects_unknown_button() {
        let backend = RecordingBackend::default();
        let (status, body) = call(
            app(&backend),
            "POST",
            "/api/robotogo/mouse/click",
            Some(r#"{"button": "thumb"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid mouse button");
    }

    #[tokio::test]
    async fn test_type_text_requires_text() {
        let backend = RecordingBackend::default();
        let (status, body) = call(
            app(&backend),
            "POST",
            "/api/robotogo/keyboard/type",
            Some(r#"{"text": ""}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "text must not be empty");
    }

    #[tokio::test]
    async fn test_type_text_with_method_override() {
        let backend = RecordingBackend::default();
        let (status, body) = call(
            app(&backend),
            "POST",
            "/api/robotogo/keyboard/type",
            Some(r#"{"text": "hi", "method": "char_by_char", "delay_ms": 1}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "hi");
        assert_eq!(
            backend.events(),
            vec![
                InputEvent::Text { text: "h".into() },
                InputEvent::Text { text: "i".into() },
            ]
        );
    }

    #[tokio::test]
    async fn test_key_tap_and_toggle() {
        let backend = RecordingBackend::default();
        let (status, _) = call(
            app(&backend),
            "POST",
            "/api/robotogo/keyboard/tap",
            Some(r#"{"key": "enter"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(
            app(&backend),
            "POST",
            "/api/robotogo/keyboard/toggle",
            Some(r#"{"key": "shift", "down": true}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["down"], true);

        let events = backend.events();
        assert!(events[0].is_key_tap(Key::Enter));
        assert_eq!(
            events[1],
            InputEvent::Key {
                key: Key::Shift,
                direction: Direction::Press,
            }
        );

        backend.clear();
        let (status, _) = call(
            app(&backend),
            "POST",
            "/api/robotogo/keyboard/toggle",
            Some(r#"{"key": "shift", "down": false}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            backend.events(),
            vec![InputEvent::Key {
                key: Key::Shift,
                direction: Direction::Release,
            }]
        );
    }

    #[tokio::test]
    async fn test_scroll() {
        let backend = RecordingBackend::default();
        let (status, body) = call(
            app(&backend),
            "POST",
            "/api/robotogo/mouse/scroll",
            Some(r#"{"y": -3}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["x"], 0);
        assert_eq!(body["y"], -3);
        assert_eq!(
            backend.events(),
            vec![InputEvent::Scroll {
                amount: -3,
                axis: ScrollAxis::Vertical,
            }]
        );
    }

    #[tokio::test]
    async fn test_clear_input_without_body() {
        let backend = RecordingBackend::default();
        let (status, body) = call(app(&backend), "POST", "/api/robotogo/keyboard/clear", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Field cleared");
        assert_eq!(
            backend.events(),
            vec![
                InputEvent::Key {
                    key: Key::Control,
                    direction: Direction::Press,
                },
                InputEvent::Key {
                    key: Key::Char('a'),
                    direction: Direction::Click,
                },
                InputEvent::Key {
                    key: Key::Control,
                    direction: Direction::Release,
                },
                InputEvent::Key {
                    key: Key::Delete,
                    direction: Direction::Click,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_negative_delay_takes_default() {
        let backend = RecordingBackend::default();
        let (status, body) = call(
            app(&backend),
            "POST",
            "/api/robotogo/keyboard/type",
            Some(r#"{"text": "hi", "delay_ms": -5}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(backend.events(), vec![InputEvent::Text { text: "hi".into() }]);

        let (status, _) = call(
            app(&backend),
            "POST",
            "/api/robotogo/input",
            Some(r#"{"x": 1, "y": 2, "text": "z", "click_delay_ms": -1, "type_delay_ms": -30}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[test]
    fn test_or_default() {
        assert_eq!(or_default(-5, 100), 100);
        assert_eq!(or_default(0, 100), 100);
        assert_eq!(or_default(7, 100), 7);
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let backend = RecordingBackend::default();
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/robotogo/mouse/move")
            .header("origin", "http://portal.example")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .body(Body::empty())
            .unwrap();

        let response = app(&backend).oneshot(request).await.unwrap();

        assert!(response.status().is_success());
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert!(backend.events().is_empty());
    }

    #[tokio::test]
    async fn test_input_at_coordinates() {
        let backend = RecordingBackend::default();
        let (status, body) = call(
            app(&backend),
            "POST",
            "/api/robotogo/input",
            Some(r#"{"x": 100, "y": 200, "text": "12345", "click_delay_ms": 1}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Data entered at (100, 200): 12345");
        // no clear unless asked
        assert!(!backend.events().iter().any(|e| e.is_key_tap(Key::Delete)));
        assert_eq!(
            backend.events().last(),
            Some(&InputEvent::Text { text: "12345".into() })
        );
    }

    #[tokio::test]
    async fn test_fill_and_click_clears_by_default() {
        let backend = RecordingBackend::default();
        let (status, body) = call(
            app(&backend),
            "POST",
            "/api/robotogo/fill-and-click",
            Some(
                r#"{"input_x": 10, "input_y": 20, "text": "BIN-42",
                    "button_x": 300, "button_y": 400, "click_delay_ms": 1}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["input"]["x"], 10);
        assert_eq!(body["button"]["y"], 400);
        assert_eq!(body["button"]["button"], "left");

        let events = backend.events();
        assert!(events.iter().any(|e| e.is_key_tap(Key::Delete)));
        assert_eq!(events[events.len() - 2], InputEvent::Move { to: Point::new(300, 400) });
        assert!(events[events.len() - 1].is_click(MouseButton::Left));
    }

    #[tokio::test]
    async fn test_fill_and_click_requires_button_coordinates() {
        let backend = RecordingBackend::default();
        let (status, body) = call(
            app(&backend),
            "POST",
            "/api/robotogo/fill-and-click",
            Some(r#"{"input_x": 10, "input_y": 20, "text": "x"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "input_x, input_y, text, button_x and button_y are required"
        );
    }

    #[tokio::test]
    async fn test_automation_failure_is_500() {
        let backend = RecordingBackend::new(RecordingConfig {
            unavailable: true,
            ..Default::default()
        });
        let (status, body) = call(
            app(&backend),
            "POST",
            "/api/robotogo/mouse/move",
            Some(r#"{"x": 1, "y": 2}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Failed to move mouse");
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("open input session failed"));
    }
}
