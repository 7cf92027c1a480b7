//! Error kinds raised by the render core and the engine.

use thiserror::Error;

/// Convenience alias used across the core and engine crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from rendering, state management and screen backends.
///
/// Every invariant violation has its own variant so callers (and tests) can
/// match on the kind instead of a message.
#[derive(Debug, Error)]
pub enum Error {
    /// `Application::current()` was called while no application exists.
    #[error("application not initialized")]
    NotInitialized,

    /// The scheduler was started (or ticked) without an active state.
    #[error("there is no active state")]
    NoActiveState,

    /// A transition or lookup named a state that is not registered.
    #[error("no such state: '{0}'")]
    UnknownState(String),

    /// A state with the same name is already registered.
    #[error("state already registered: '{0}'")]
    DuplicateState(String),

    /// A state asked its context for a resource nobody inserted.
    #[error("missing resource: {0}")]
    MissingResource(&'static str),

    /// The object is not registered with the renderer or object list.
    #[error("object is not registered")]
    NotRegistered,

    /// A cell write fell outside the screen's addressable extent.
    #[error("cell ({x}, {y}) is outside the {width}x{height} screen")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u16,
        height: u16,
    },

    /// Terminal or file I/O failed in a backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true for errors that indicate a caller bug rather than an
    /// environment failure.
    pub fn is_invariant(&self) -> bool {
        match self {
            Self::NotInitialized
            | Self::NoActiveState
            | Self::UnknownState(_)
            | Self::DuplicateState(_)
            | Self::MissingResource(_)
            | Self::NotRegistered
            | Self::OutOfBounds { .. } => true,
            Self::Io(_) => false,
        }
    }
}
