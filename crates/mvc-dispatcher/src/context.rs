//! Per-dispatch state handed to every listener, hook and action
//!
//! A [`DispatchContext`] is created by [`Dispatcher::dispatch`](crate::Dispatcher::dispatch)
//! and owned by that call until it returns. Listeners, controller hooks and
//! action bodies receive it mutably; this is the only place `forward` can be
//! requested from, so a forward always belongs to a live dispatch.

use std::collections::HashSet;

use tracing::debug;
use uuid::Uuid;

use crate::{
    config::DispatcherConfig,
    error::{DispatchError, Result},
    types::ActionDescriptor,
};

/// Where the dispatch currently is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPhase {
    /// `beforeDispatchLoop` and its exception handling
    Loop,
    /// Inside an inner cycle
    Cycle,
    /// Running a controller's `initialize` hook
    Initialize,
    /// `afterDispatchLoop` is firing
    Finishing,
    /// `dispatch` has returned
    Finished,
}

/// Mutable state of one dispatch
#[derive(Debug)]
pub struct DispatchContext {
    id: Uuid,
    phase: DispatchPhase,
    current: ActionDescriptor,
    pending: Option<ActionDescriptor>,
    previous: Option<ActionDescriptor>,
    was_forwarded: bool,
    cycles: u32,
    initialized: HashSet<String>,
    returned_value: Option<serde_json::Value>,
    default_controller: String,
    default_action: String,
}

impl DispatchContext {
    /// Create a context for `action` using the default configuration
    pub fn new(action: ActionDescriptor) -> Self {
        Self::with_config(action, &DispatcherConfig::default())
    }

    pub(crate) fn with_config(action: ActionDescriptor, config: &DispatcherConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: DispatchPhase::Loop,
            current: action.or_defaults(&config.default_controller, &config.default_action),
            pending: None,
            previous: None,
            was_forwarded: false,
            cycles: 0,
            initialized: HashSet::new(),
            returned_value: None,
            default_controller: config.default_controller.clone(),
            default_action: config.default_action.clone(),
        }
    }

    /// Identifier used to correlate log records of this dispatch
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> DispatchPhase {
        self.phase
    }

    /// Action of the running inner cycle (or the initial action before the first one)
    pub fn current_action(&self) -> &ActionDescriptor {
        &self.current
    }

    /// Action queued by a forward, if any
    pub fn pending_action(&self) -> Option<&ActionDescriptor> {
        self.pending.as_ref()
    }

    /// Action that ran before the last forward
    pub fn previous_action(&self) -> Option<&ActionDescriptor> {
        self.previous.as_ref()
    }

    /// Parameters of the current action
    pub fn params(&self) -> &[serde_json::Value] {
        self.current.params()
    }

    pub fn param(&self, index: usize) -> Option<&serde_json::Value> {
        self.current.param(index)
    }

    /// Whether a forward was requested during the current inner cycle
    pub fn is_forwarded(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether the current action was reached through a forward
    pub fn was_forwarded(&self) -> bool {
        self.was_forwarded
    }

    /// Number of inner cycles started so far
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Value returned by the last action that ran
    pub fn returned_value(&self) -> Option<&serde_json::Value> {
        self.returned_value.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.phase == DispatchPhase::Finished
    }

    /// Queue `action` for the next inner cycle
    ///
    /// Nothing runs synchronously: the dispatcher picks the forward up once the
    /// current event or hook returns. A later forward in the same cycle replaces
    /// an earlier one.
    ///
    /// # Errors
    ///
    /// - `ForwardInInitialize` when called from a controller's `initialize` hook
    /// - `NotDispatching` during `afterDispatchLoop` or after the dispatch returned
    pub fn forward(&mut self, action: ActionDescriptor) -> Result<()> {
        match self.phase {
            DispatchPhase::Initialize => return Err(DispatchError::ForwardInInitialize),
            DispatchPhase::Finishing | DispatchPhase::Finished => {
                return Err(DispatchError::NotDispatching)
            }
            DispatchPhase::Loop | DispatchPhase::Cycle => {}
        }

        let action = action.or_defaults(&self.default_controller, &self.default_action);
        debug!(
            dispatch_id = %self.id,
            from = %self.current,
            to = %action,
            "Forward requested"
        );
        self.pending = Some(action);
        Ok(())
    }

    /// Forward to another action of the current controller, keeping the parameters
    pub fn forward_action(&mut self, action: impl Into<String>) -> Result<()> {
        let next = ActionDescriptor::new(self.current.controller(), action)
            .with_params(self.current.params().to_vec());
        self.forward(next)
    }

    /// Start an inner cycle, promoting a pending forward to the current action
    pub(crate) fn begin_cycle(&mut self) {
        self.phase = DispatchPhase::Cycle;
        self.cycles += 1;
        self.returned_value = None;
        if let Some(next) = self.pending.take() {
            self.previous = Some(std::mem::replace(&mut self.current, next));
            self.was_forwarded = true;
        }
    }

    /// Drop a forward that was queued before an error interrupted the cycle
    pub(crate) fn cancel_forward(&mut self) {
        self.pending = None;
    }

    pub(crate) fn set_phase(&mut self, phase: DispatchPhase) {
        self.phase = phase;
    }

    /// Record that `controller` was initialized; false if it already was
    pub(crate) fn mark_initialized(&mut self, controller: &str) -> bool {
        self.initialized.insert(controller.to_string())
    }

    pub(crate) fn set_returned_value(&mut self, value: serde_json::Value) {
        self.returned_value = Some(value);
    }
}
