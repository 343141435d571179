//! Shape-specific configuration editors.
//!
//! Each editor is a fixed list of field bindings for one configuration shape.
//! Bindings read their initial value from the loaded baseline (through the
//! draft, so pending edits show) and validate raw input before it reaches the
//! draft store. They carry no behavior beyond that.
//!
//! | Editor               | Services                         |
//! |----------------------|----------------------------------|
//! | `general`            | anything without a dedicated one |
//! | `bike`               | `bike`                           |
//! | `car_recovery`       | `carRecovery`                    |
//! | `shifting_movers`    | `shiftingMovers`                 |
//! | `appointment`        | `appointmentServices`            |

pub mod appointment;
pub mod bike;
pub mod car_recovery;
pub mod general;
pub mod shifting_movers;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

use crate::pricing::cascade::Selector;
use crate::pricing::draft::{DraftStore, RawValue, TypeHint};
use crate::pricing::path::{self, FieldPath};
use crate::pricing::ConfigTree;

/// Which editor renders a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorKind {
    General,
    Bike,
    CarRecovery,
    ShiftingMovers,
    AppointmentServices,
}

impl EditorKind {
    /// Built-in routing by normalized service key, with config overrides first.
    pub fn for_service(service: &str, overrides: &HashMap<String, EditorKind>) -> Self {
        if let Some(kind) = overrides.get(service) {
            return *kind;
        }
        match service {
            "bike" => EditorKind::Bike,
            "carRecovery" => EditorKind::CarRecovery,
            "shiftingMovers" => EditorKind::ShiftingMovers,
            "appointmentServices" | "appointments" => EditorKind::AppointmentServices,
            _ => EditorKind::General,
        }
    }

    pub fn schema(self) -> EditorSchema {
        let fields = match self {
            EditorKind::General => general::fields(),
            EditorKind::Bike => bike::fields(),
            EditorKind::CarRecovery => car_recovery::fields(),
            EditorKind::ShiftingMovers => shifting_movers::fields(),
            EditorKind::AppointmentServices => appointment::fields(),
        };
        EditorSchema { kind: self, fields }
    }
}

/// How a field is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Number,
    Toggle,
    Text,
}

impl InputKind {
    pub fn type_hint(self) -> TypeHint {
        match self {
            InputKind::Number => TypeHint::Number,
            InputKind::Toggle => TypeHint::Boolean,
            InputKind::Text => TypeHint::Text,
        }
    }
}

/// Where a binding's path is rooted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Directly in the loaded subtree.
    Root,
    /// Under `vehicleTypes.<vehicle>.`, vehicle taken from the selector.
    Vehicle,
}

/// Inclusive numeric bounds. The only validation this crate does on fares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Constraints {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// One editable field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldBinding {
    pub label: &'static str,
    pub path: &'static str,
    pub kind: InputKind,
    pub scope: Scope,
    pub constraints: Constraints,
}

impl FieldBinding {
    fn new(label: &'static str, path: &'static str, kind: InputKind) -> Self {
        Self {
            label,
            path,
            kind,
            scope: Scope::Root,
            constraints: Constraints::default(),
        }
    }

    /// Non-negative number (fares, rates, fees).
    pub fn amount(label: &'static str, path: &'static str) -> Self {
        Self::new(label, path, InputKind::Number).min(0.0)
    }

    pub fn number(label: &'static str, path: &'static str) -> Self {
        Self::new(label, path, InputKind::Number)
    }

    /// Percentage in `0..=100`.
    pub fn percent(label: &'static str, path: &'static str) -> Self {
        Self::new(label, path, InputKind::Number).range(0.0, 100.0)
    }

    /// Hour of day in `0..=23`.
    pub fn hour(label: &'static str, path: &'static str) -> Self {
        Self::new(label, path, InputKind::Number).range(0.0, 23.0)
    }

    pub fn toggle(label: &'static str, path: &'static str) -> Self {
        Self::new(label, path, InputKind::Toggle)
    }

    pub fn text(label: &'static str, path: &'static str) -> Self {
        Self::new(label, path, InputKind::Text)
    }

    pub fn min(mut self, min: f64) -> Self {
        self.constraints.min = Some(min);
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.constraints = Constraints {
            min: Some(min),
            max: Some(max),
        };
        self
    }

    pub fn per_vehicle(mut self) -> Self {
        self.scope = Scope::Vehicle;
        self
    }

    /// Full path of this field for the given selector.
    pub fn resolve(&self, selector: &Selector) -> Result<FieldPath, FieldError> {
        let path = FieldPath::from(self.path);
        match self.scope {
            Scope::Root => Ok(path),
            Scope::Vehicle => {
                let vehicle = selector
                    .leaf()
                    .ok_or_else(|| FieldError::VehicleRequired(self.path.to_string()))?;
                Ok(path.prefixed(&format!("vehicleTypes.{vehicle}")))
            }
        }
    }

    /// Check raw input against kind and range, producing the draft value.
    pub fn parse(&self, path: &FieldPath, raw: &str) -> Result<RawValue, FieldError> {
        match self.kind {
            InputKind::Text => Ok(RawValue::Text(raw.to_string())),
            InputKind::Toggle => parse_toggle(raw)
                .map(RawValue::Bool)
                .ok_or_else(|| FieldError::NotABoolean {
                    path: path.to_string(),
                    raw: raw.to_string(),
                }),
            InputKind::Number => {
                let trimmed = raw.trim();
                // Empty clears the field to null.
                if trimmed.is_empty() {
                    return Ok(RawValue::Text(String::new()));
                }
                let value: f64 = trimmed
                    .parse()
                    .ok()
                    .filter(|v: &f64| v.is_finite())
                    .ok_or_else(|| FieldError::NotANumber {
                        path: path.to_string(),
                        raw: raw.to_string(),
                    })?;
                self.check_range(path, value)?;
                Ok(RawValue::Text(trimmed.to_string()))
            }
        }
    }

    fn check_range(&self, path: &FieldPath, value: f64) -> Result<(), FieldError> {
        let Constraints { min, max } = self.constraints;
        let below = min.is_some_and(|min| value < min);
        let above = max.is_some_and(|max| value > max);
        if below || above {
            return Err(FieldError::OutOfRange {
                path: path.to_string(),
                value,
                min,
                max,
            });
        }
        Ok(())
    }
}

fn parse_toggle(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Rejected field input. The draft is left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("'{0}' is not a field of this editor")]
    UnknownField(String),

    #[error("'{raw}' is not a number (field {path})")]
    NotANumber { path: String, raw: String },

    #[error("'{raw}' is not true/false (field {path})")]
    NotABoolean { path: String, raw: String },

    #[error("{value} is out of range for {path} ({})", describe_range(.min, .max))]
    OutOfRange {
        path: String,
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
    },

    #[error("field '{0}' is per vehicle type; select a vehicle first")]
    VehicleRequired(String),
}

fn describe_range(min: &Option<f64>, max: &Option<f64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{min}..={max}"),
        (Some(min), None) => format!(">= {min}"),
        (None, Some(max)) => format!("<= {max}"),
        (None, None) => "unbounded".to_string(),
    }
}

/// A field ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedField {
    pub label: &'static str,
    pub path: FieldPath,
    pub kind: InputKind,
    pub constraints: Constraints,
    /// Value after pending edits, else the baseline value.
    pub value: Option<Value>,
    pub edited: bool,
}

/// The field list of one editor kind.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSchema {
    pub kind: EditorKind,
    pub fields: Vec<FieldBinding>,
}

impl EditorSchema {
    /// Render every field that can be addressed under `selector`.
    ///
    /// Per-vehicle fields are skipped until a vehicle is selected.
    pub fn render(&self, baseline: &ConfigTree, draft: &DraftStore, selector: &Selector) -> Vec<RenderedField> {
        let current = draft.commit(baseline);
        self.fields
            .iter()
            .filter_map(|binding| {
                let path = binding.resolve(selector).ok()?;
                Some(RenderedField {
                    label: binding.label,
                    value: path::get(&current, path.as_str()).cloned(),
                    edited: draft.get(path.as_str()).is_some(),
                    kind: binding.kind,
                    constraints: binding.constraints,
                    path,
                })
            })
            .collect()
    }

    /// Find the binding whose resolved path is `path`.
    pub fn binding_for(&self, path: &str, selector: &Selector) -> Result<&FieldBinding, FieldError> {
        let mut vehicle_scoped = None;
        for binding in &self.fields {
            match binding.resolve(selector) {
                Ok(resolved) if resolved.as_str() == path => return Ok(binding),
                Err(e) if binding.path == path => vehicle_scoped = Some(e),
                _ => {}
            }
        }
        Err(vehicle_scoped.unwrap_or_else(|| FieldError::UnknownField(path.to_string())))
    }

    /// Validate `raw` for `path` and record it into `draft`.
    pub fn record(
        &self,
        draft: &mut DraftStore,
        selector: &Selector,
        path: &str,
        raw: &str,
    ) -> Result<(), FieldError> {
        let binding = self.binding_for(path, selector)?;
        let path = binding.resolve(selector)?;
        let value = binding.parse(&path, raw)?;
        draft.record(path, value, binding.kind.type_hint());
        Ok(())
    }
}
