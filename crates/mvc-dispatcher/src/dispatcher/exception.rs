//! Routing of dispatch errors through `beforeException`

use tracing::{error, info, warn};

use super::Dispatcher;
use crate::{
    context::DispatchContext,
    error::{DispatchError, Result},
    events::Event,
};

/// How a routed error was absorbed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Recovery {
    /// A listener returned `Stop`; the error is discarded
    Suppressed,
    /// A listener forwarded; the error is discarded and the loop goes on
    Forwarded,
}

impl Dispatcher {
    /// Fire `beforeException` for `err` and decide its fate
    ///
    /// Returns `Err(err)` unchanged when no listener stopped or forwarded. An
    /// error raised by a `beforeException` listener is returned instead of the
    /// original; it is not routed again.
    pub(super) fn handle_exception(
        &self,
        err: DispatchError,
        ctx: &mut DispatchContext,
    ) -> Result<Recovery> {
        warn!(
            error = %err,
            action = %ctx.current_action(),
            "Routing exception through beforeException"
        );

        // Only forwards made while handling the error count
        ctx.cancel_forward();

        let fired = self.events.fire(&mut Event::exception(&err), ctx);
        let flow = match fired {
            Ok(flow) => flow,
            Err(second) => {
                error!(
                    error = %second,
                    original = %err,
                    "beforeException listener failed"
                );
                return Err(second);
            }
        };

        if flow.is_stop() {
            ctx.cancel_forward();
            info!(error = %err, "Exception suppressed by listener");
            return Ok(Recovery::Suppressed);
        }

        if let Some(next) = ctx.pending_action() {
            info!(error = %err, to = %next, "Exception handled by forward");
            return Ok(Recovery::Forwarded);
        }

        Err(err)
    }
}
