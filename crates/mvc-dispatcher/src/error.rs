//! Error types for the dispatcher
//!
//! Every failure raised while a dispatch is running (listener, controller hook,
//! action body or resolution) is a `DispatchError`. All of them are routed through
//! the `beforeException` event before they can reach the caller of
//! [`Dispatcher::dispatch`](crate::Dispatcher::dispatch).
//!
//! # Examples
//!
//! ```ignore
//! match dispatcher.dispatch(ActionDescriptor::new("posts", "show")) {
//!     Ok(ctx) => println!("dispatched {}", ctx.current_action()),
//!     Err(DispatchError::HandlerNotFound(name)) => eprintln!("no controller {}", name),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

/// Errors that can occur while dispatching an action
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The controller named by an action descriptor could not be resolved
    #[error("Handler not found: {0}")]
    HandlerNotFound(String),

    /// The controller exists but does not expose the requested action
    #[error("Action '{action}' was not found on handler '{controller}'")]
    ActionNotFound {
        /// Controller that was resolved
        controller: String,
        /// Action that was missing
        action: String,
    },

    /// Too many inner cycles ran in a single dispatch
    ///
    /// The u32 is the configured `max_forwards` limit.
    #[error("Dispatcher has detected a cyclic routing after {0} dispatch cycles")]
    CyclicRouting(u32),

    /// `forward` was called from a controller's `initialize` hook
    #[error("Forwarding inside a controller's initialize() method is forbidden")]
    ForwardInInitialize,

    /// `forward` was called when no dispatch cycle can pick it up
    #[error("Forward requested outside of an active dispatch")]
    NotDispatching,

    /// A listener was attached to an event name the dispatcher never fires
    #[error("Unknown dispatch event: {0}")]
    UnknownEvent(String),

    /// Detaching a listener that is not attached
    #[error("Listener not found: {0}")]
    ListenerNotFound(String),

    /// Invalid dispatcher configuration
    ///
    /// Common causes:
    /// - `max_forwards` set to zero
    /// - Empty or malformed default controller/action names
    /// - Malformed YAML
    #[error("Invalid dispatcher configuration: {0}")]
    InvalidConfiguration(String),

    /// Registry storage error (lock poisoning)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Error raised by application code: listeners, controller hooks or actions
    ///
    /// Displayed and sourced transparently so the original error keeps its
    /// identity when it propagates out of `dispatch`.
    #[error(transparent)]
    Application(Box<dyn std::error::Error + Send + Sync>),

    /// YAML (de)serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_yaml::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DispatchError {
    /// Wrap an application error (or a plain message) raised by user code
    pub fn application<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Application(error.into())
    }

    /// Whether this error comes from resolving a controller or action
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::HandlerNotFound(_) | Self::ActionNotFound { .. }
        )
    }
}

/// Result type for dispatcher operations
pub type Result<T> = std::result::Result<T, DispatchError>;
