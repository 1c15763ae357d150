//! Error type shared by the scheduling and state layers.
//!
//! Every error is raised synchronously by the call that violates a
//! precondition; nothing is deferred to a later `update`. Cancelling an
//! unknown or already removed timer is deliberately *not* an error.

use thiserror::Error;

/// Errors surfaced to the game loop or to state implementations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A transition named a state that was never registered.
    #[error("unknown state '{0}'")]
    UnknownState(String),
    /// `pop`, `update` or `on_input` on a stack with no states.
    #[error("state stack is empty")]
    EmptyStack,
    /// A tween asked for an easing key that does not exist.
    #[error("invalid ease function name '{0}'")]
    InvalidEaseName(String),
    /// Malformed scheduling parameters (non-positive duration, zero fire limit...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A state refused to enter, usually because of bad enter parameters.
    #[error("state '{state}' failed to enter: {reason}")]
    EnterFailed { state: String, reason: String },
    /// Configuration file could not be read, parsed or written.
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
