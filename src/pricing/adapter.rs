//! Per-service shape adapters.
//!
//! An adapter turns the editor's form view of a configuration into the body
//! the backend persists for that service. Services without a registered
//! adapter are sent as-is.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::pricing::cascade::Selector;
use crate::pricing::ConfigTree;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("service '{0}' needs a vehicle type before it can be saved")]
    MissingVehicleType(String),

    #[error("form for '{0}' is not an object")]
    NotAnObject(String),
}

/// Pure `form view → write body` function for one service.
pub trait ShapeAdapter: Send + Sync + std::fmt::Debug {
    fn shape(&self, form: &ConfigTree, selector: &Selector) -> Result<Value, ShapeError>;
}

/// Sends the form unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityAdapter;

impl ShapeAdapter for IdentityAdapter {
    fn shape(&self, form: &ConfigTree, _selector: &Selector) -> Result<Value, ShapeError> {
        Ok(form.clone())
    }
}

/// Nests flat per-vehicle fields under `vehicleTypes.<vehicle>`.
///
/// The editor shows e.g. `baseFare` at the top level, while the backend stores
/// `{ vehicleTypes: { economy: { baseFare } }, minimumFare }`. Fields listed in
/// `nested` move into the vehicle envelope; every other field stays at the top.
#[derive(Debug, Clone)]
pub struct VehicleTypeAdapter {
    nested: Vec<&'static str>,
}

impl VehicleTypeAdapter {
    pub fn new(nested: Vec<&'static str>) -> Self {
        Self { nested }
    }

    pub fn bike() -> Self {
        Self::new(vec!["baseFare", "perKmRate", "nightCharges"])
    }
}

impl ShapeAdapter for VehicleTypeAdapter {
    fn shape(&self, form: &ConfigTree, selector: &Selector) -> Result<Value, ShapeError> {
        let vehicle = selector
            .leaf()
            .ok_or_else(|| ShapeError::MissingVehicleType(selector.category.clone()))?;
        let fields = form
            .as_object()
            .ok_or_else(|| ShapeError::NotAnObject(selector.category.clone()))?;

        let mut vehicle_fields = Map::new();
        let mut body = Map::new();
        for (key, value) in fields {
            if key == "vehicleTypes" {
                continue;
            }
            if self.nested.contains(&key.as_str()) {
                vehicle_fields.insert(key.clone(), value.clone());
            } else {
                body.insert(key.clone(), value.clone());
            }
        }
        let mut vehicle_types = Map::new();
        vehicle_types.insert(vehicle.to_string(), Value::Object(vehicle_fields));
        body.insert("vehicleTypes".to_string(), Value::Object(vehicle_types));
        Ok(Value::Object(body))
    }
}

/// Adapters keyed by normalized service key.
#[derive(Debug, Clone)]
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn ShapeAdapter>>,
    fallback: Arc<dyn ShapeAdapter>,
}

impl AdapterRegistry {
    /// Registry with no service-specific adapters.
    pub fn empty() -> Self {
        Self {
            adapters: HashMap::new(),
            fallback: Arc::new(IdentityAdapter),
        }
    }

    pub fn register(&mut self, service: impl Into<String>, adapter: impl ShapeAdapter + 'static) {
        self.adapters.insert(service.into(), Arc::new(adapter));
    }

    pub fn adapter_for(&self, service: &str) -> &dyn ShapeAdapter {
        self.adapters
            .get(service)
            .map(|adapter| &**adapter)
            .unwrap_or(self.fallback.as_ref())
    }

    pub fn shape(&self, form: &ConfigTree, selector: &Selector) -> Result<Value, ShapeError> {
        self.adapter_for(&selector.category).shape(form, selector)
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("bike", VehicleTypeAdapter::bike());
        registry
    }
}
