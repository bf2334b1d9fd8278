//! The dispatch loop
//!
//! [`Dispatcher::dispatch`] runs the outer loop:
//!
//! ```text
//! beforeDispatchLoop
//!   ┌─> beforeDispatch
//!   │   beforeExecuteRoute, controller before-hook
//!   │   initialize (first use only), afterInitialize
//!   │   action
//!   │   afterExecuteRoute, controller after-hook
//!   └── afterDispatch            (repeats while a forward is pending)
//! afterDispatchLoop
//! ```
//!
//! Every error raised on the way goes through `beforeException` exactly once.

mod cycle;
mod exception;

use std::sync::Arc;

use tracing::{debug, error, info, info_span};

use self::{cycle::CycleOutcome, exception::Recovery};
use crate::{
    config::{ConfigValidator, DispatcherConfig},
    context::{DispatchContext, DispatchPhase},
    controller::HandlerResolver,
    error::{DispatchError, Result},
    events::{Event, EventBus},
    types::{ActionDescriptor, DispatchEvent, Flow},
};

/// Resolves actions and drives them through the dispatch lifecycle
///
/// A dispatcher is bound to one event bus and one resolver for its lifetime.
/// Each `dispatch` call owns its own [`DispatchContext`]; calling `dispatch`
/// again from inside a listener starts an unrelated dispatch.
#[derive(Clone)]
pub struct Dispatcher {
    events: Arc<dyn EventBus>,
    resolver: Arc<dyn HandlerResolver>,
    config: DispatcherConfig,
}

impl Dispatcher {
    /// Create a dispatcher with the default configuration
    pub fn new(events: Arc<dyn EventBus>, resolver: Arc<dyn HandlerResolver>) -> Self {
        Self {
            events,
            resolver,
            config: DispatcherConfig::default(),
        }
    }

    /// Create a dispatcher with an explicit configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `config` does not validate.
    pub fn with_config(
        events: Arc<dyn EventBus>,
        resolver: Arc<dyn HandlerResolver>,
        config: DispatcherConfig,
    ) -> Result<Self> {
        ConfigValidator::validate(&config)?;
        Ok(Self {
            events,
            resolver,
            config,
        })
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Dispatch `action` and every action it forwards to
    ///
    /// Returns the final context on success, including when a listener stopped
    /// the loop or a `beforeException` listener absorbed an error.
    ///
    /// # Errors
    ///
    /// Returns the original error when `beforeException` neither stopped nor
    /// forwarded, and any error raised by a `beforeException` listener itself.
    /// Exceeding the forward limit raises `CyclicRouting` through the same
    /// route; a listener that absorbs it ends the loop, even by forwarding.
    pub fn dispatch(&self, action: ActionDescriptor) -> Result<DispatchContext> {
        let mut ctx = DispatchContext::with_config(action, &self.config);
        let span = info_span!("dispatch", dispatch_id = %ctx.id());
        let _guard = span.enter();

        info!(action = %ctx.current_action(), "Dispatch started");
        let result = self.run(&mut ctx);
        ctx.set_phase(DispatchPhase::Finished);

        match result {
            Ok(()) => {
                info!(
                    action = %ctx.current_action(),
                    cycles = ctx.cycles(),
                    "Dispatch finished"
                );
                Ok(ctx)
            }
            Err(e) => {
                error!(error = %e, cycles = ctx.cycles(), "Dispatch failed");
                Err(e)
            }
        }
    }

    fn run(&self, ctx: &mut DispatchContext) -> Result<()> {
        match self.fire(DispatchEvent::BeforeDispatchLoop, ctx) {
            Ok(Flow::Stop) => {
                ctx.cancel_forward();
                return Ok(());
            }
            Ok(Flow::Continue) => {}
            // Suppressed here skips afterDispatchLoop entirely
            Err(err) => match self.handle_exception(err, ctx)? {
                Recovery::Suppressed => return Ok(()),
                Recovery::Forwarded => {}
            },
        }

        self.run_cycles(ctx)?;

        ctx.set_phase(DispatchPhase::Finishing);
        match self.fire(DispatchEvent::AfterDispatchLoop, ctx) {
            Ok(_) => Ok(()),
            // forward() is rejected while finishing, so only Stop can get here
            Err(err) => self.handle_exception(err, ctx).map(|_| ()),
        }
    }

    fn run_cycles(&self, ctx: &mut DispatchContext) -> Result<()> {
        loop {
            if ctx.cycles() >= self.config.max_forwards {
                let err = DispatchError::CyclicRouting(self.config.max_forwards);
                // Absorbed either way; a forward here would only re-enter the loop
                self.handle_exception(err, ctx)?;
                ctx.cancel_forward();
                return Ok(());
            }

            ctx.begin_cycle();
            debug!(
                cycle = ctx.cycles(),
                action = %ctx.current_action(),
                forwarded = ctx.was_forwarded(),
                "Inner cycle started"
            );

            let outcome = match self.run_cycle(ctx) {
                Ok(outcome) => outcome,
                Err(err) => match self.handle_exception(err, ctx)? {
                    Recovery::Suppressed => CycleOutcome::Halted,
                    Recovery::Forwarded => CycleOutcome::Forwarded,
                },
            };

            match outcome {
                CycleOutcome::Forwarded => continue,
                CycleOutcome::Completed => return Ok(()),
                CycleOutcome::Halted => {
                    // Stop wins over a forward requested in the same step
                    ctx.cancel_forward();
                    return Ok(());
                }
            }
        }
    }

    fn fire(&self, kind: DispatchEvent, ctx: &mut DispatchContext) -> Result<Flow> {
        debug!(event = %kind, action = %ctx.current_action(), "Firing event");
        let flow = self.events.fire(&mut Event::new(kind), ctx)?;
        if flow.is_stop() {
            info!(event = %kind, "Dispatch stopped by listener");
        }
        Ok(flow)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
