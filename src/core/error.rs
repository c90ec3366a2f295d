//=========================================================================
// Engine Errors
//=========================================================================

//=== EngineError =========================================================

/// Configuration errors detected while running the frame loop.
///
/// These never propagate as panics; they are logged and reported through
/// [`crate::engine::CycleOutcome::Halted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// The logic or render handler was not supplied; the loop halted.
    MissingHandlers,
}

//--- Trait Implementations -----------------------------------------------

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingHandlers => write!(f, "Logic or render handler not set"),
        }
    }
}

impl std::error::Error for EngineError {}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error_is_error_trait() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn missing_handlers_display() {
        assert_eq!(
            EngineError::MissingHandlers.to_string(),
            "Logic or render handler not set"
        );
    }
}
