//! One inner cycle: resolve and run a single action

use tracing::{debug, warn};

use super::Dispatcher;
use crate::{
    context::{DispatchContext, DispatchPhase},
    error::{DispatchError, Result},
    types::{DispatchEvent, Flow},
};

/// How an inner cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum CycleOutcome {
    /// Every step ran and nothing was forwarded
    Completed,
    /// A forward is pending; run another cycle
    Forwarded,
    /// A stop sentinel ended the loop
    Halted,
}

/// Decide whether the cycle goes on after an event or hook returned `flow`
///
/// Stop wins over a forward requested in the same step.
fn checkpoint(flow: Flow, ctx: &DispatchContext) -> Option<CycleOutcome> {
    if flow.is_stop() {
        Some(CycleOutcome::Halted)
    } else if ctx.is_forwarded() {
        Some(CycleOutcome::Forwarded)
    } else {
        None
    }
}

macro_rules! step {
    ($flow:expr, $ctx:expr) => {
        if let Some(outcome) = checkpoint($flow, $ctx) {
            return Ok(outcome);
        }
    };
}

impl Dispatcher {
    pub(super) fn run_cycle(&self, ctx: &mut DispatchContext) -> Result<CycleOutcome> {
        step!(self.fire(DispatchEvent::BeforeDispatch, ctx)?, ctx);

        let action = ctx.current_action().clone();
        let controller = self.resolver.resolve(&action)?;

        if !controller.has_action(action.action()) {
            warn!(action = %action, "Action not found");
            step!(self.fire(DispatchEvent::BeforeNotFoundAction, ctx)?, ctx);
            return Err(DispatchError::ActionNotFound {
                controller: action.controller().to_string(),
                action: action.action().to_string(),
            });
        }

        step!(self.fire(DispatchEvent::BeforeExecuteRoute, ctx)?, ctx);
        step!(controller.before_execute_route(ctx)?, ctx);

        if ctx.mark_initialized(action.controller()) {
            debug!(controller = %action.controller(), "Initializing controller");
            ctx.set_phase(DispatchPhase::Initialize);
            let initialized = controller.initialize(ctx);
            ctx.set_phase(DispatchPhase::Cycle);
            initialized?;

            step!(self.fire(DispatchEvent::AfterInitialize, ctx)?, ctx);
        }

        debug!(action = %action, "Invoking action");
        let value = controller.call_action(action.action(), ctx)?;
        ctx.set_returned_value(value);

        // A forward made by the action itself is picked up after this event
        step!(self.fire(DispatchEvent::AfterExecuteRoute, ctx)?, ctx);
        step!(controller.after_execute_route(ctx)?, ctx);
        step!(self.fire(DispatchEvent::AfterDispatch, ctx)?, ctx);

        Ok(CycleOutcome::Completed)
    }
}
