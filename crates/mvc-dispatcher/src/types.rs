//! Core data types for the dispatcher
//!
//! This module defines the values that flow through a dispatch: the action
//! descriptor naming what to run, the [`Flow`] returned by every listener and
//! controller hook, and the closed set of lifecycle events.
//!
//! # Examples
//!
//! ```ignore
//! use mvc_dispatcher::*;
//!
//! let action = ActionDescriptor::new("posts", "show").with_param(serde_json::json!(42));
//! assert_eq!(action.to_string(), "posts::show");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Controller, action and ordered parameters of one action execution
///
/// Descriptors are never mutated by the dispatcher; a forward always replaces
/// the pending descriptor wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    /// Controller identity
    controller: String,

    /// Action identity within the controller
    action: String,

    /// Positional action parameters
    #[serde(default)]
    params: Vec<serde_json::Value>,
}

impl ActionDescriptor {
    /// Create a descriptor without parameters
    pub fn new(controller: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
            action: action.into(),
            params: Vec::new(),
        }
    }

    /// Replace the parameter list
    pub fn with_params(mut self, params: Vec<serde_json::Value>) -> Self {
        self.params = params;
        self
    }

    /// Append a single parameter
    pub fn with_param(mut self, param: serde_json::Value) -> Self {
        self.params.push(param);
        self
    }

    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn params(&self) -> &[serde_json::Value] {
        &self.params
    }

    /// Parameter at `index`, if present
    pub fn param(&self, index: usize) -> Option<&serde_json::Value> {
        self.params.get(index)
    }

    /// Fill empty controller/action names with the given defaults
    pub(crate) fn or_defaults(mut self, controller: &str, action: &str) -> Self {
        if self.controller.is_empty() {
            self.controller = controller.to_string();
        }
        if self.action.is_empty() {
            self.action = action.to_string();
        }
        self
    }
}

impl fmt::Display for ActionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.controller, self.action)
    }
}

/// Control value returned by listeners and controller hooks
///
/// `Stop` halts the dispatch at the current phase. It takes precedence over a
/// forward requested in the same phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// Keep processing
    #[default]
    Continue,

    /// Halt the loop immediately
    Stop,
}

impl Flow {
    pub fn is_stop(self) -> bool {
        self == Flow::Stop
    }

    /// Aggregate two results; `Stop` absorbs `Continue`
    pub fn and(self, other: Flow) -> Flow {
        if self.is_stop() || other.is_stop() {
            Flow::Stop
        } else {
            Flow::Continue
        }
    }
}

/// Event type prefix shared by every dispatcher event
pub const EVENT_TYPE: &str = "dispatch";

/// Lifecycle events fired by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchEvent {
    BeforeDispatchLoop,
    BeforeDispatch,
    BeforeNotFoundAction,
    BeforeExecuteRoute,
    AfterInitialize,
    AfterExecuteRoute,
    AfterDispatch,
    AfterDispatchLoop,
    BeforeException,
}

impl DispatchEvent {
    /// All events, in the order a plain dispatch fires them
    pub const ALL: [DispatchEvent; 9] = [
        DispatchEvent::BeforeDispatchLoop,
        DispatchEvent::BeforeDispatch,
        DispatchEvent::BeforeNotFoundAction,
        DispatchEvent::BeforeExecuteRoute,
        DispatchEvent::AfterInitialize,
        DispatchEvent::AfterExecuteRoute,
        DispatchEvent::AfterDispatch,
        DispatchEvent::AfterDispatchLoop,
        DispatchEvent::BeforeException,
    ];

    /// Short event name, e.g. `beforeDispatch`
    pub fn name(self) -> &'static str {
        match self {
            DispatchEvent::BeforeDispatchLoop => "beforeDispatchLoop",
            DispatchEvent::BeforeDispatch => "beforeDispatch",
            DispatchEvent::BeforeNotFoundAction => "beforeNotFoundAction",
            DispatchEvent::BeforeExecuteRoute => "beforeExecuteRoute",
            DispatchEvent::AfterInitialize => "afterInitialize",
            DispatchEvent::AfterExecuteRoute => "afterExecuteRoute",
            DispatchEvent::AfterDispatch => "afterDispatch",
            DispatchEvent::AfterDispatchLoop => "afterDispatchLoop",
            DispatchEvent::BeforeException => "beforeException",
        }
    }

    /// Fully qualified name, e.g. `dispatch:beforeDispatch`
    pub fn full_name(self) -> String {
        format!("{}:{}", EVENT_TYPE, self.name())
    }

    /// Look up an event by its short or fully qualified name
    pub fn from_name(name: &str) -> Option<DispatchEvent> {
        let short = name
            .strip_prefix(EVENT_TYPE)
            .and_then(|rest| rest.strip_prefix(':'))
            .unwrap_or(name);
        Self::ALL.into_iter().find(|event| event.name() == short)
    }
}

impl fmt::Display for DispatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
