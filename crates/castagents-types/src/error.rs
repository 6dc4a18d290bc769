use thiserror::Error;

/// Reasons a user submission is rejected by the conversation session.
///
/// A rejected submission leaves the transcript untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("message is empty")]
    BlankInput,

    #[error("a response is already being generated")]
    Busy,
}

/// Errors from conversation session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Rejected(#[from] SubmitRejected),

    #[error("cannot switch persona while a response is being generated")]
    PersonaSwitchWhileSending,

    /// The completion belongs to a turn that is no longer in flight.
    #[error("stale completion for turn #{token}")]
    StaleCompletion { token: u64 },

    #[error("persona not found: {0}")]
    PersonaNotFound(String),
}

/// Errors related to configuration loading and credential resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API key not set (looked in: {0})")]
    MissingApiKey(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
