//! Process-wide tool catalog with cached instantiation
//!
//! The registry is an explicit value built once by the composition root and
//! dependency-injected into every protocol adapter. Tools join the catalog
//! through an ordered registration pass at startup; entries are never removed
//! during normal operation.

use crate::error::{BridgeError, Result};
use crate::registry::types::{Tool, ToolArguments, ToolDescriptor, ToolRegistration};
use dashmap::DashMap;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// Central registry mapping tool name to registration and cached instances
pub struct ToolRegistry {
    /// Registrations indexed by tool name
    tools: DashMap<String, Arc<ToolRegistration>>,

    /// Tool names in registration order, for deterministic listings
    order: RwLock<Vec<String>>,

    /// Instantiated tools keyed by (name, canonical configuration). Unbounded,
    /// but the key space is limited to the statically known tools and the
    /// handful of configurations the adapters pass.
    instances: DashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            tools: DashMap::new(),
            order: RwLock::new(Vec::new()),
            instances: DashMap::new(),
        }
    }

    /// Register a tool. Duplicate names fail loudly so a misconfigured
    /// registration pass aborts startup instead of shadowing a tool.
    pub fn register(&self, registration: ToolRegistration) -> Result<()> {
        registration.descriptor.validate()?;
        let name = registration.descriptor.name.clone();

        if self.tools.contains_key(&name) {
            return Err(BridgeError::registry(format!(
                "Tool '{}' is already registered",
                name
            )));
        }

        self.tools.insert(name.clone(), Arc::new(registration));
        self.order
            .write()
            .expect("registry order lock poisoned")
            .push(name.clone());

        info!("Registered tool: {}", name);
        Ok(())
    }

    /// Get a tool instance, constructing and caching it on first use.
    ///
    /// Instances are cached per (name, configuration); configuration equality
    /// is structural, independent of key order. Unknown names fail with a
    /// not-found error naming the tool.
    pub fn get(&self, name: &str, config: Option<&ToolArguments>) -> Result<Arc<dyn Tool>> {
        let registration = self
            .tools
            .get(name)
            .ok_or_else(|| BridgeError::tool_not_found(name))?;

        let cache_key = Self::cache_key(name, config);
        if let Some(instance) = self.instances.get(&cache_key) {
            return Ok(instance.clone());
        }

        debug!("Constructing tool instance: {}", name);
        let instance = registration.construct(config)?;

        // entry() keeps the first insert under concurrent construction, so a
        // (name, config) pair always resolves to one instance.
        let instance = self
            .instances
            .entry(cache_key)
            .or_insert(instance)
            .clone();
        Ok(instance)
    }

    /// List all registered descriptors in registration order
    pub fn list(&self) -> Vec<ToolDescriptor> {
        let order = self.order.read().expect("registry order lock poisoned");
        order
            .iter()
            .filter_map(|name| self.tools.get(name).map(|r| r.descriptor.clone()))
            .collect()
    }

    /// Get the descriptor for one tool
    pub fn descriptor(&self, name: &str) -> Result<ToolDescriptor> {
        self.tools
            .get(name)
            .map(|r| r.descriptor.clone())
            .ok_or_else(|| BridgeError::tool_not_found(name))
    }

    /// Registered tool names in registration order
    pub fn tool_names(&self) -> Vec<String> {
        self.order
            .read()
            .expect("registry order lock poisoned")
            .clone()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Canonical cache key: tool name plus the configuration serialized with
    /// sorted keys, so structurally equal configurations collide.
    fn cache_key(name: &str, config: Option<&ToolArguments>) -> String {
        match config {
            None => format!("{}::", name),
            Some(map) => {
                let sorted: BTreeMap<&String, &Value> = map.iter().collect();
                let canonical = serde_json::to_string(&sorted).unwrap_or_default();
                format!("{}::{}", name, canonical)
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tool_names())
            .finish()
    }
}
