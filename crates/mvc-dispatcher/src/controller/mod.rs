//! Controllers and their resolution
//!
//! A [`Controller`] exposes named actions plus optional lifecycle hooks. The
//! dispatcher obtains controllers through a [`HandlerResolver`];
//! [`ControllerRegistry`] is the in-memory resolver.

pub mod registry;

pub use registry::ControllerRegistry;

use std::sync::Arc;

use crate::{
    context::DispatchContext,
    error::Result,
    types::{ActionDescriptor, Flow},
};

/// A set of actions sharing lifecycle hooks
///
/// Hooks default to no-ops. Their [`Flow`] is treated exactly like a listener's:
/// `Stop` halts the dispatch, and a forward requested inside a hook restarts the
/// inner cycle once the hook returns.
pub trait Controller: Send + Sync {
    /// Whether `action` can be invoked
    fn has_action(&self, action: &str) -> bool;

    /// Run `action`, returning the value exposed as `returned_value()`
    fn call_action(&self, action: &str, ctx: &mut DispatchContext) -> Result<serde_json::Value>;

    /// Runs after the `beforeExecuteRoute` event
    fn before_execute_route(&self, _ctx: &mut DispatchContext) -> Result<Flow> {
        Ok(Flow::Continue)
    }

    /// Runs once per dispatch, the first time the controller is used
    ///
    /// Forwarding from here is rejected with `ForwardInInitialize`.
    fn initialize(&self, _ctx: &mut DispatchContext) -> Result<()> {
        Ok(())
    }

    /// Runs after the `afterExecuteRoute` event
    fn after_execute_route(&self, _ctx: &mut DispatchContext) -> Result<Flow> {
        Ok(Flow::Continue)
    }
}

/// Trait for locating the controller of an action
pub trait HandlerResolver: Send + Sync {
    /// Resolve the controller named by `action`
    ///
    /// # Errors
    ///
    /// Returns `HandlerNotFound` when no such controller exists.
    fn resolve(&self, action: &ActionDescriptor) -> Result<Arc<dyn Controller>>;
}
