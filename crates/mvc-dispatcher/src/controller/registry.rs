//! In-memory controller registry

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, RwLock},
};

use tracing::debug;

use super::{Controller, HandlerResolver};
use crate::{
    error::{DispatchError, Result},
    types::ActionDescriptor,
};

/// Controllers keyed by name
#[derive(Clone, Default)]
pub struct ControllerRegistry {
    controllers: Arc<RwLock<HashMap<String, Arc<dyn Controller>>>>,
}

impl ControllerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `controller` under `name`, replacing any previous one
    pub fn register(&self, name: impl Into<String>, controller: Arc<dyn Controller>) -> Result<()> {
        let name = name.into();
        let mut controllers = self.controllers.write().map_err(|e| {
            DispatchError::StorageError(format!("Failed to acquire write lock: {}", e))
        })?;

        debug!(controller = %name, "Controller registered");
        controllers.insert(name, controller);
        Ok(())
    }

    /// Remove a controller
    pub fn unregister(&self, name: &str) -> Result<()> {
        let mut controllers = self.controllers.write().map_err(|e| {
            DispatchError::StorageError(format!("Failed to acquire write lock: {}", e))
        })?;

        controllers
            .remove(name)
            .ok_or_else(|| DispatchError::HandlerNotFound(name.to_string()))?;
        Ok(())
    }

    pub fn contains(&self, name: &str) -> Result<bool> {
        let controllers = self
            .controllers
            .read()
            .map_err(|e| DispatchError::StorageError(format!("Failed to acquire read lock: {}", e)))?;

        Ok(controllers.contains_key(name))
    }
}

impl fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .controllers
            .read()
            .map(|c| c.keys().cloned().collect())
            .unwrap_or_default();
        f.debug_struct("ControllerRegistry")
            .field("controllers", &names)
            .finish()
    }
}

impl HandlerResolver for ControllerRegistry {
    fn resolve(&self, action: &ActionDescriptor) -> Result<Arc<dyn Controller>> {
        let controllers = self
            .controllers
            .read()
            .map_err(|e| DispatchError::StorageError(format!("Failed to acquire read lock: {}", e)))?;

        controllers
            .get(action.controller())
            .cloned()
            .ok_or_else(|| DispatchError::HandlerNotFound(action.controller().to_string()))
    }
}
