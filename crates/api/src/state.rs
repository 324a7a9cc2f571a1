use chrono::{DateTime, Utc};
use inputbot_automation::{AutomationError, InputService};
use std::sync::Arc;

/// Shared application state accessible by all route handlers.
pub struct AppState {
    pub input: Arc<InputService>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(input: InputService) -> Self {
        Self {
            input: Arc::new(input),
            started_at: Utc::now(),
        }
    }

    /// Run a blocking automation operation off the async runtime.
    pub async fn run<T, F>(&self, f: F) -> Result<T, AutomationError>
    where
        F: FnOnce(&InputService) -> Result<T, AutomationError> + Send + 'static,
        T: Send + 'static,
    {
        let input = Arc::clone(&self.input);
        tokio::task::spawn_blocking(move || f(&input))
            .await
            .map_err(|e| AutomationError::Task(e.to_string()))?
    }
}
