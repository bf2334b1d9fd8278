//! Event bus used by the dispatcher to notify listeners
//!
//! The dispatcher only depends on the [`EventBus`] trait: fire a named event and
//! get back the aggregated [`Flow`]. [`EventsManager`] is the in-memory bus
//! listeners attach to.
//!
//! # Examples
//!
//! ```ignore
//! use mvc_dispatcher::{EventsManager, Flow};
//!
//! let events = EventsManager::new();
//! events.attach("dispatch:beforeDispatch", |_event, ctx| {
//!     if ctx.current_action().controller() == "admin" {
//!         ctx.forward(ActionDescriptor::new("session", "login"))?;
//!     }
//!     Ok(Flow::Continue)
//! })?;
//! ```

pub mod manager;

pub use manager::{EventsManager, ListenerId};

use crate::{
    context::DispatchContext,
    error::{DispatchError, Result},
    types::{DispatchEvent, Flow},
};

/// One firing of a dispatch event
///
/// `beforeException` firings carry the error being routed; it is borrowed from
/// the dispatcher and released once the firing returns.
#[derive(Debug)]
pub struct Event<'a> {
    kind: DispatchEvent,
    exception: Option<&'a DispatchError>,
    propagation_stopped: bool,
}

impl<'a> Event<'a> {
    pub fn new(kind: DispatchEvent) -> Self {
        Self {
            kind,
            exception: None,
            propagation_stopped: false,
        }
    }

    /// A `beforeException` firing for `error`
    pub fn exception(error: &'a DispatchError) -> Self {
        Self {
            kind: DispatchEvent::BeforeException,
            exception: Some(error),
            propagation_stopped: false,
        }
    }

    pub fn kind(&self) -> DispatchEvent {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Error being routed, for `beforeException` firings
    pub fn error(&self) -> Option<&'a DispatchError> {
        self.exception
    }

    /// Skip the remaining listeners of this firing
    ///
    /// This does not halt the dispatch; return [`Flow::Stop`] for that.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Something that reacts to dispatch events
///
/// Implemented for closures taking `(&mut Event, &mut DispatchContext)`.
pub trait Listener: Send + Sync {
    /// Handle one event firing
    ///
    /// Returning `Err` interrupts the current phase and routes the error through
    /// `beforeException`.
    fn handle(&self, event: &mut Event<'_>, ctx: &mut DispatchContext) -> Result<Flow>;
}

impl<F> Listener for F
where
    F: Fn(&mut Event<'_>, &mut DispatchContext) -> Result<Flow> + Send + Sync,
{
    fn handle(&self, event: &mut Event<'_>, ctx: &mut DispatchContext) -> Result<Flow> {
        self(event, ctx)
    }
}

/// Trait for firing dispatch events
///
/// The returned flow is `Stop` when any listener asked to stop. An `Err` from a
/// listener aborts the firing and is returned as is.
pub trait EventBus: Send + Sync {
    /// Fire `event` to every matching listener in order
    fn fire(&self, event: &mut Event<'_>, ctx: &mut DispatchContext) -> Result<Flow>;
}
