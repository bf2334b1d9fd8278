//! MVC Dispatcher
//!
//! Event-driven dispatch loop that resolves a request into a controller action,
//! fires lifecycle events around it, and supports forwarding and centralized
//! exception interception.
//!
//! # Architecture
//!
//! 1. **Dispatcher** (`dispatcher`): outer loop, inner cycles, exception routing
//! 2. **Event Bus** (`events`): listeners attached to dispatch events
//! 3. **Controllers** (`controller`): actions, lifecycle hooks and their resolver
//! 4. **Configuration** (`config`): YAML-backed dispatcher settings
//!
//! # Lifecycle
//!
//! A plain dispatch fires, in order:
//!
//! ```text
//! beforeDispatchLoop, beforeDispatch, beforeExecuteRoute, [before hook],
//! [initialize], afterInitialize, <action>, afterExecuteRoute, [after hook],
//! afterDispatch, afterDispatchLoop
//! ```
//!
//! Any listener or hook may return [`Flow::Stop`] to halt the loop, or call
//! [`DispatchContext::forward`] to run another action in a new inner cycle.
//! Errors raised anywhere are handed to `beforeException` listeners, which can
//! swallow them (`Stop`), recover by forwarding, or let them reach the caller.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use mvc_dispatcher::*;
//!
//! let events = EventsManager::new();
//! let controllers = ControllerRegistry::new();
//! controllers.register("posts", Arc::new(PostsController::default()))?;
//!
//! events.attach("dispatch:beforeException", |event, ctx| {
//!     match event.error() {
//!         Some(e) if e.is_not_found() => {
//!             ctx.forward(ActionDescriptor::new("errors", "show404"))?;
//!             Ok(Flow::Continue)
//!         }
//!         _ => Ok(Flow::Continue),
//!     }
//! })?;
//!
//! let dispatcher = Dispatcher::new(Arc::new(events), Arc::new(controllers));
//! let ctx = dispatcher.dispatch(ActionDescriptor::new("posts", "show"))?;
//! println!("returned {:?}", ctx.returned_value());
//! # Ok::<(), DispatchError>(())
//! ```
//!
//! # Limitations
//!
//! Dispatch is synchronous. A listener or action that never returns stalls the
//! dispatch; there is no timeout or cancellation.

pub mod config;
pub mod context;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod types;

pub use config::{ConfigLoader, ConfigValidator, DispatcherConfig};
pub use context::{DispatchContext, DispatchPhase};
pub use controller::{Controller, ControllerRegistry, HandlerResolver};
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, Result};
pub use events::{Event, EventBus, EventsManager, Listener, ListenerId};
pub use types::{ActionDescriptor, DispatchEvent, Flow};
