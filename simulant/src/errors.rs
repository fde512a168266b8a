use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutomationError {
    #[error("Target element not found: {0}")]
    TargetNotFound(String),

    #[error("Target element is not visible: {0}")]
    TargetNotVisible(String),

    #[error("Target element is detached from the document: {0}")]
    TargetDetached(String),

    #[error("Invalid command arguments: {0}")]
    InvalidCommandArgs(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Platform-specific error: {0}")]
    PlatformError(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

impl AutomationError {
    /// True when the failure means the target can no longer be interacted
    /// with at all, as opposed to a transient platform fault.
    pub fn is_target_failure(&self) -> bool {
        matches!(
            self,
            Self::TargetNotFound(_) | Self::TargetNotVisible(_) | Self::TargetDetached(_)
        )
    }
}
