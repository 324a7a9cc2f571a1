use inputbot_core::DriverError;

/// Errors returned by automation operations.
#[derive(Debug, thiserror::Error)]
pub enum AutomationError {
    /// A driver call failed partway through a sequence.
    #[error("{step} failed: {source}")]
    Step {
        step: &'static str,
        source: DriverError,
    },
    /// The blocking task running the sequence panicked or was cancelled.
    #[error("automation task failed: {0}")]
    Task(String),
}

/// Attach the name of the failing step to a driver result.
pub trait StepExt<T> {
    fn step(self, step: &'static str) -> Result<T, AutomationError>;
}

impl<T> StepExt<T> for Result<T, DriverError> {
    fn step(self, step: &'static str) -> Result<T, AutomationError> {
        self.map_err(|source| AutomationError::Step { step, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_message_includes_driver_error() {
        let result: Result<(), DriverError> = Err(DriverError::Injection("denied".to_string()));
        let err = result.step("type text").unwrap_err();
        assert_eq!(err.to_string(), "type text failed: input injection failed: denied");
    }
}
