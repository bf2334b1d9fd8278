//! Shared fixtures for the dispatch trace scenarios
//!
//! `DispatcherListener` is attached to every dispatch event and records the
//! event names; `TestController` records its hooks and actions into the same
//! trace, so a scenario can compare the whole lifecycle in one assertion.

#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use mvc_dispatcher::{
    ActionDescriptor, Controller, ControllerRegistry, DispatchContext, DispatchError, Dispatcher,
    DispatcherConfig, Event, EventsManager, Flow, Listener, Result,
};

/// Early listener for all dispatch events
#[derive(Debug, Default)]
pub struct DispatcherListener {
    trace: Mutex<Vec<String>>,
}

impl DispatcherListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trace(&self, text: impl Into<String>) {
        self.trace.lock().expect("Trace lock poisoned").push(text.into());
    }

    pub fn get_trace(&self) -> Vec<String> {
        self.trace.lock().expect("Trace lock poisoned").clone()
    }

    pub fn clear_trace(&self) {
        self.trace.lock().expect("Trace lock poisoned").clear();
    }

    pub fn count(&self, entry: &str) -> usize {
        self.trace
            .lock()
            .expect("Trace lock poisoned")
            .iter()
            .filter(|e| e.as_str() == entry)
            .count()
    }
}

impl Listener for DispatcherListener {
    fn handle(&self, event: &mut Event<'_>, _ctx: &mut DispatchContext) -> Result<Flow> {
        match event.error() {
            Some(err) => self.trace(format!("beforeException: {}", err)),
            None => self.trace(event.name()),
        }
        Ok(Flow::Continue)
    }
}

/// Error a hook raises the first time it runs
struct FailOnce {
    message: &'static str,
    raised: AtomicBool,
}

impl FailOnce {
    fn new(message: &'static str) -> Self {
        Self {
            message,
            raised: AtomicBool::new(false),
        }
    }

    fn check(failure: &Option<FailOnce>) -> Result<()> {
        match failure {
            Some(f) if !f.raised.swap(true, Ordering::SeqCst) => {
                Err(DispatchError::application(f.message))
            }
            _ => Ok(()),
        }
    }
}

/// Controller with `index`, `index2`, `throw`, `forward` and `params` actions
pub struct TestController {
    listener: Arc<DispatcherListener>,
    before_hook: Flow,
    after_hook: Flow,
    before_hook_failure: Option<FailOnce>,
    after_hook_failure: Option<FailOnce>,
    forward_in_initialize: bool,
}

impl TestController {
    pub fn new(listener: Arc<DispatcherListener>) -> Self {
        Self {
            listener,
            before_hook: Flow::Continue,
            after_hook: Flow::Continue,
            before_hook_failure: None,
            after_hook_failure: None,
            forward_in_initialize: false,
        }
    }

    /// Make the before-execute hook return `flow`
    pub fn before_hook(mut self, flow: Flow) -> Self {
        self.before_hook = flow;
        self
    }

    /// Make the after-execute hook return `flow`
    pub fn after_hook(mut self, flow: Flow) -> Self {
        self.after_hook = flow;
        self
    }

    /// Make the before-execute hook raise `message` the first time it runs
    pub fn failing_before_hook(mut self, message: &'static str) -> Self {
        self.before_hook_failure = Some(FailOnce::new(message));
        self
    }

    /// Make the after-execute hook raise `message` the first time it runs
    pub fn failing_after_hook(mut self, message: &'static str) -> Self {
        self.after_hook_failure = Some(FailOnce::new(message));
        self
    }

    pub fn forwarding_in_initialize(mut self) -> Self {
        self.forward_in_initialize = true;
        self
    }
}

impl Controller for TestController {
    fn has_action(&self, action: &str) -> bool {
        matches!(action, "index" | "index2" | "throw" | "forward" | "params")
    }

    fn call_action(&self, action: &str, ctx: &mut DispatchContext) -> Result<serde_json::Value> {
        self.listener.trace(format!("{}Action", action));
        match action {
            "throw" => Err(DispatchError::application("throw action exception occurred")),
            "forward" => {
                ctx.forward_action("index2")?;
                Ok(serde_json::Value::Null)
            }
            "params" => Ok(serde_json::Value::Array(ctx.params().to_vec())),
            _ => Ok(serde_json::json!(action)),
        }
    }

    fn before_execute_route(&self, _ctx: &mut DispatchContext) -> Result<Flow> {
        self.listener.trace("beforeExecuteRoute-method");
        FailOnce::check(&self.before_hook_failure)?;
        Ok(self.before_hook)
    }

    fn initialize(&self, ctx: &mut DispatchContext) -> Result<()> {
        self.listener.trace("initialize-method");
        if self.forward_in_initialize {
            ctx.forward_action("index2")?;
        }
        Ok(())
    }

    fn after_execute_route(&self, _ctx: &mut DispatchContext) -> Result<Flow> {
        self.listener.trace("afterExecuteRoute-method");
        FailOnce::check(&self.after_hook_failure)?;
        Ok(self.after_hook)
    }
}

/// A dispatcher wired to a recording listener and a `test` controller
pub struct Fixture {
    pub dispatcher: Dispatcher,
    pub events: EventsManager,
    pub controllers: ControllerRegistry,
    pub listener: Arc<DispatcherListener>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with(DispatcherConfig::default(), |controller| controller)
    }

    /// Build a fixture, customising the `test` controller
    pub fn with(
        config: DispatcherConfig,
        customise: impl FnOnce(TestController) -> TestController,
    ) -> Self {
        let events = EventsManager::new();
        let controllers = ControllerRegistry::new();
        let listener = Arc::new(DispatcherListener::new());

        events
            .attach_listener("dispatch", 0, listener.clone())
            .expect("Should attach trace listener");
        controllers
            .register(
                "test",
                Arc::new(customise(TestController::new(listener.clone()))),
            )
            .expect("Should register test controller");

        let dispatcher = Dispatcher::with_config(
            Arc::new(events.clone()),
            Arc::new(controllers.clone()),
            config,
        )
        .expect("Should build dispatcher");

        Self {
            dispatcher,
            events,
            controllers,
            listener,
        }
    }

    /// Dispatch `test::index`
    pub fn dispatch(&self) -> Result<DispatchContext> {
        self.dispatcher.dispatch(ActionDescriptor::new("test", "index"))
    }

    pub fn trace(&self) -> Vec<String> {
        self.listener.get_trace()
    }

    pub fn attach<F>(&self, pattern: &str, listener: F)
    where
        F: Fn(&mut Event<'_>, &mut DispatchContext) -> Result<Flow> + Send + Sync + 'static,
    {
        self.events
            .attach(pattern, listener)
            .expect("Should attach listener");
    }

    /// Attach a listener that raises `message` the first time `pattern` fires
    pub fn throw_once(&self, pattern: &str, message: &'static str) {
        let thrown = AtomicBool::new(false);
        self.attach(pattern, move |_event, _ctx| {
            if thrown.swap(true, Ordering::SeqCst) {
                Ok(Flow::Continue)
            } else {
                Err(DispatchError::application(message))
            }
        });
    }

    /// Attach a listener that forwards to `test::index2` the first time `pattern` fires
    pub fn forward_once(&self, pattern: &str) {
        let forwarded = AtomicBool::new(false);
        self.attach(pattern, move |_event, ctx| {
            if !forwarded.swap(true, Ordering::SeqCst) {
                ctx.forward(ActionDescriptor::new("test", "index2"))?;
            }
            Ok(Flow::Continue)
        });
    }

    /// Attach a `beforeException` listener that traces `label` and returns `flow`
    pub fn on_exception(&self, label: &'static str, flow: Flow) {
        let listener = self.listener.clone();
        self.attach("dispatch:beforeException", move |_event, _ctx| {
            listener.trace(format!("beforeException: {}", label));
            Ok(flow)
        });
    }

    /// Attach a `beforeException` listener that traces `label` and forwards to `test::index2`
    pub fn forward_on_exception(&self, label: &'static str) {
        let listener = self.listener.clone();
        self.attach("dispatch:beforeException", move |_event, ctx| {
            listener.trace(format!("beforeException: {}", label));
            ctx.forward(ActionDescriptor::new("test", "index2"))?;
            Ok(Flow::Continue)
        });
    }
}

/// Build an owned trace from string literals
pub fn trace(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|e| e.to_string()).collect()
}

/// Trace of one complete inner cycle for `action` on a controller that was
/// already initialized
pub fn cycle_after_forward(action: &str) -> Vec<String> {
    vec![
        "beforeDispatch".to_string(),
        "beforeExecuteRoute".to_string(),
        "beforeExecuteRoute-method".to_string(),
        format!("{}Action", action),
        "afterExecuteRoute".to_string(),
        "afterExecuteRoute-method".to_string(),
        "afterDispatch".to_string(),
    ]
}

/// Trace of a plain dispatch of `test::<action>`
pub fn full_trace(action: &str) -> Vec<String> {
    vec![
        "beforeDispatchLoop".to_string(),
        "beforeDispatch".to_string(),
        "beforeExecuteRoute".to_string(),
        "beforeExecuteRoute-method".to_string(),
        "initialize-method".to_string(),
        "afterInitialize".to_string(),
        format!("{}Action", action),
        "afterExecuteRoute".to_string(),
        "afterExecuteRoute-method".to_string(),
        "afterDispatch".to_string(),
        "afterDispatchLoop".to_string(),
    ]
}
