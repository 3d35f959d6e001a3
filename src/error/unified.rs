//! Error classification and recovery.

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    Network,
    Timeout,
    Cancelled,
    Server,
    Api,
    Configuration,
    Serialization,
    InvalidInput,
    Unsupported,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    /// Log in again or refresh the session.
    Reauthenticate,
    RetryLater,
    IncreaseTimeout,
    CheckConfiguration,
    FixRequest,
    ContactSupport,
    None,
}
