//! Error types for the automation layer.

/// Result type alias for automation operations.
pub type Result<T> = std::result::Result<T, AutomationError>;

/// Errors surfaced to assistive-technology callers.
///
/// The taxonomy is deliberately narrow. Precondition violations,
/// realization failures, and commit failures all surface as
/// [`OperationCannotBePerformed`](AutomationError::OperationCannotBePerformed):
/// the caller learns the command did not apply and that no partial state
/// change happened. Failures are local to the requested operation; the layer
/// never retries on its own (the focus-loss continuation is a deferral of a
/// not-yet-attempted command, not a retry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AutomationError {
    /// The grid or the targeted element is disabled.
    #[error("element is not enabled")]
    ElementNotEnabled,

    /// The operation is not valid in the current grid state.
    #[error("operation cannot be performed")]
    OperationCannotBePerformed,
}
