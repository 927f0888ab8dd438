//! Router construction by type name.
//!
//! Routers are declared in a JSON routing definition:
//!
//! ```json
//! {
//!   "vindexes": {
//!     "cfc_md5": { "type": "cfc", "params": { "hash": "md5", "offsets": "[2,4]" } }
//!   }
//! }
//! ```
//!
//! Each `type` resolves to a [`RouterFactory`] in a [`RouterRegistry`].

use crate::config::RouterConfig;
use crate::core::{Result, RouteError};
use crate::router::{ExactRouter, Router};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Type name of the composite-key router.
pub const COMPOSITE_KEY_TYPE: &str = "cfc";

/// Builds routers of one type from declarative parameters.
pub trait RouterFactory: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn create(
        &self,
        name: &str,
        params: Option<&HashMap<String, String>>,
    ) -> Result<Arc<dyn Router>>;
}

/// Factory for [`ExactRouter`].
pub struct CompositeKeyFactory;

impl RouterFactory for CompositeKeyFactory {
    fn type_name(&self) -> &'static str {
        COMPOSITE_KEY_TYPE
    }

    fn create(
        &self,
        name: &str,
        params: Option<&HashMap<String, String>>,
    ) -> Result<Arc<dyn Router>> {
        let config = RouterConfig::from_params(name, params)?;
        Ok(Arc::new(ExactRouter::new(config)?))
    }
}

pub struct RouterRegistry {
    factories: Vec<Box<dyn RouterFactory>>,
}

impl RouterRegistry {
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// Register a factory. A later registration shadows an earlier one of the same type.
    pub fn register(&mut self, factory: Box<dyn RouterFactory>) {
        tracing::debug!(router_type = factory.type_name(), "registered router factory");
        self.factories.push(factory);
    }

    pub fn with_default_factories() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(CompositeKeyFactory));
        registry
    }

    pub fn find_factory(&self, type_name: &str) -> Option<&dyn RouterFactory> {
        self.factories
            .iter()
            .rev()
            .find(|factory| factory.type_name() == type_name)
            .map(|boxed| &**boxed)
    }

    pub fn create(
        &self,
        type_name: &str,
        name: &str,
        params: Option<&HashMap<String, String>>,
    ) -> Result<Arc<dyn Router>> {
        let factory = self
            .find_factory(type_name)
            .ok_or_else(|| RouteError::UnknownRouterType(type_name.to_string()))?;
        factory.create(name, params)
    }

    pub fn list_types(&self) -> Vec<&str> {
        self.factories.iter().map(|f| f.type_name()).collect()
    }
}

impl Default for RouterRegistry {
    fn default() -> Self {
        Self::with_default_factories()
    }
}

/// One router declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterDefinition {
    #[serde(rename = "type")]
    pub router_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<HashMap<String, String>>,
}

/// Named router declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDefinition {
    #[serde(default)]
    pub vindexes: BTreeMap<String, RouterDefinition>,
}

impl RoutingDefinition {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Routers built from a [`RoutingDefinition`], keyed by name.
#[derive(Debug, Default, Clone)]
pub struct RouterSet {
    routers: BTreeMap<String, Arc<dyn Router>>,
}

impl RouterSet {
    /// Build every declared router; the first failure aborts.
    pub fn build(registry: &RouterRegistry, definition: &RoutingDefinition) -> Result<Self> {
        let mut routers = BTreeMap::new();
        for (name, def) in &definition.vindexes {
            let router = registry.create(&def.router_type, name, def.params.as_ref())?;
            routers.insert(name.clone(), router);
        }
        Ok(Self { routers })
    }

    pub fn from_json(registry: &RouterRegistry, json: &str) -> Result<Self> {
        Self::build(registry, &RoutingDefinition::from_json(json)?)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Router>> {
        self.routers.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.routers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }
}
