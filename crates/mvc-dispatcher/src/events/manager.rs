//! In-memory event bus implementation

use std::{
    fmt,
    sync::{Arc, RwLock},
};

use tracing::{debug, trace};
use uuid::Uuid;

use super::{Event, EventBus, Listener};
use crate::{
    context::DispatchContext,
    error::{DispatchError, Result},
    types::{DispatchEvent, Flow, EVENT_TYPE},
};

/// Handle returned by `attach`, used to detach a listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(Uuid);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone)]
struct Registration {
    id: ListenerId,
    /// `None` listens to every dispatch event
    event: Option<DispatchEvent>,
    priority: i32,
    listener: Arc<dyn Listener>,
}

impl Registration {
    fn matches(&self, event: DispatchEvent) -> bool {
        self.event.map_or(true, |e| e == event)
    }
}

/// In-memory event bus
///
/// Listeners attach either to the whole `dispatch` event type or to a single
/// event such as `dispatch:beforeDispatch`. They run by descending priority,
/// then in attachment order. Cloning shares the same listener list.
#[derive(Clone, Default)]
pub struct EventsManager {
    listeners: Arc<RwLock<Vec<Registration>>>,
}

impl EventsManager {
    /// Create an empty event bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a closure listener with the default priority (0)
    ///
    /// # Errors
    ///
    /// Returns `UnknownEvent` if `pattern` is neither `dispatch` nor a known
    /// `dispatch:<event>` name.
    pub fn attach<F>(&self, pattern: &str, listener: F) -> Result<ListenerId>
    where
        F: Fn(&mut Event<'_>, &mut DispatchContext) -> Result<Flow> + Send + Sync + 'static,
    {
        self.attach_listener(pattern, 0, Arc::new(listener))
    }

    /// Attach a closure listener; higher priorities run first
    pub fn attach_with_priority<F>(
        &self,
        pattern: &str,
        priority: i32,
        listener: F,
    ) -> Result<ListenerId>
    where
        F: Fn(&mut Event<'_>, &mut DispatchContext) -> Result<Flow> + Send + Sync + 'static,
    {
        self.attach_listener(pattern, priority, Arc::new(listener))
    }

    /// Attach a shared listener object
    pub fn attach_listener(
        &self,
        pattern: &str,
        priority: i32,
        listener: Arc<dyn Listener>,
    ) -> Result<ListenerId> {
        let event = Self::parse_pattern(pattern)?;
        let id = ListenerId(Uuid::new_v4());

        let mut listeners = self.listeners.write().map_err(|e| {
            DispatchError::StorageError(format!("Failed to acquire write lock: {}", e))
        })?;

        let position = listeners
            .iter()
            .position(|r| r.priority < priority)
            .unwrap_or(listeners.len());
        listeners.insert(
            position,
            Registration {
                id,
                event,
                priority,
                listener,
            },
        );

        debug!(listener_id = %id, pattern = %pattern, priority, "Listener attached");
        Ok(id)
    }

    /// Detach a single listener
    pub fn detach(&self, id: ListenerId) -> Result<()> {
        let mut listeners = self.listeners.write().map_err(|e| {
            DispatchError::StorageError(format!("Failed to acquire write lock: {}", e))
        })?;

        let position = listeners
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| DispatchError::ListenerNotFound(id.to_string()))?;
        listeners.remove(position);
        Ok(())
    }

    /// Detach every listener attached with exactly `pattern`
    ///
    /// Returns the number of listeners removed.
    pub fn detach_all(&self, pattern: &str) -> Result<usize> {
        let event = Self::parse_pattern(pattern)?;
        let mut listeners = self.listeners.write().map_err(|e| {
            DispatchError::StorageError(format!("Failed to acquire write lock: {}", e))
        })?;

        let before = listeners.len();
        listeners.retain(|r| r.event != event);
        Ok(before - listeners.len())
    }

    /// Whether any listener would receive `event`
    pub fn has_listeners(&self, event: DispatchEvent) -> Result<bool> {
        let listeners = self
            .listeners
            .read()
            .map_err(|e| DispatchError::StorageError(format!("Failed to acquire read lock: {}", e)))?;

        Ok(listeners.iter().any(|r| r.matches(event)))
    }

    /// Total number of attached listeners
    pub fn len(&self) -> Result<usize> {
        let listeners = self
            .listeners
            .read()
            .map_err(|e| DispatchError::StorageError(format!("Failed to acquire read lock: {}", e)))?;

        Ok(listeners.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn parse_pattern(pattern: &str) -> Result<Option<DispatchEvent>> {
        if pattern == EVENT_TYPE {
            return Ok(None);
        }

        pattern
            .strip_prefix(EVENT_TYPE)
            .and_then(|rest| rest.strip_prefix(':'))
            .and_then(DispatchEvent::from_name)
            .map(Some)
            .ok_or_else(|| DispatchError::UnknownEvent(pattern.to_string()))
    }

    /// Listeners for `event`, copied out so firing never holds the lock
    fn snapshot(&self, event: DispatchEvent) -> Result<Vec<Registration>> {
        let listeners = self
            .listeners
            .read()
            .map_err(|e| DispatchError::StorageError(format!("Failed to acquire read lock: {}", e)))?;

        Ok(listeners
            .iter()
            .filter(|r| r.matches(event))
            .cloned()
            .collect())
    }
}

impl fmt::Debug for EventsManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.listeners.read().map(|l| l.len()).unwrap_or_default();
        f.debug_struct("EventsManager")
            .field("listeners", &count)
            .finish()
    }
}

impl EventBus for EventsManager {
    fn fire(&self, event: &mut Event<'_>, ctx: &mut DispatchContext) -> Result<Flow> {
        let registrations = self.snapshot(event.kind())?;
        let mut flow = Flow::Continue;

        for registration in registrations {
            trace!(
                event = %event.kind(),
                listener_id = %registration.id,
                "Calling listener"
            );

            flow = flow.and(registration.listener.handle(event, ctx)?);

            if event.is_propagation_stopped() {
                debug!(
                    event = %event.kind(),
                    listener_id = %registration.id,
                    "Event propagation stopped"
                );
                break;
            }
        }

        Ok(flow)
    }
}
