//! Three-level selector state machine.
//!
//! # States
//! `(service_key, category_key, sub_key)`, each empty (unset) or a node key.
//!
//! # Transitions
//! ```text
//! select_service(k): service ← k, category ← "", sub ← ""
//! select_category(k): category ← k, sub ← ""
//! select_sub(k):      sub ← k
//! ```
//!
//! Option lists are derived from the flow tree and the current state on every
//! call; nothing derived is cached, so a child can never point at a stale parent.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::pricing::flow::{FlowEntry, FlowNode, FlowTree, SelectOption};
use crate::pricing::normalize::normalize;

/// Current selector keys. Empty string means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    pub service_key: String,
    pub category_key: String,
    pub sub_key: String,
}

/// The normalized routing triple the backend addresses a subtree by.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    pub category: String,
    pub service: String,
    pub sub_service: String,
}

impl Selector {
    pub fn new(
        category: impl Into<String>,
        service: impl Into<String>,
        sub_service: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            service: service.into(),
            sub_service: sub_service.into(),
        }
    }

    /// The most specific non-empty key below the top-level category.
    ///
    /// For flat services the cascade's category tier carries the sub-service
    /// (e.g. `bike` → `economy`), so this is what per-vehicle shapes key on.
    pub fn leaf(&self) -> Option<&str> {
        [self.sub_service.as_str(), self.service.as_str()]
            .into_iter()
            .find(|s| !s.is_empty())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.category, self.service, self.sub_service)
    }
}

/// Why the current selection cannot be fetched. No request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionInvalid {
    #[error("no service selected")]
    NoService,

    #[error("service '{0}' requires a category")]
    CategoryRequired(String),

    #[error("label '{0}' does not normalize to a usable key")]
    NormalizationAmbiguous(String),
}

/// Selector state bound to an immutable flow tree.
#[derive(Debug, Clone)]
pub struct SelectorCascade {
    flow: FlowTree,
    state: SelectionState,
}

impl SelectorCascade {
    pub fn new(flow: FlowTree) -> Self {
        Self {
            flow,
            state: SelectionState::default(),
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn flow(&self) -> &FlowTree {
        &self.flow
    }

    pub fn select_service(&mut self, key: impl Into<String>) {
        self.state.service_key = key.into();
        self.state.category_key.clear();
        self.state.sub_key.clear();
    }

    pub fn select_category(&mut self, key: impl Into<String>) {
        self.state.category_key = key.into();
        self.state.sub_key.clear();
    }

    pub fn select_sub(&mut self, key: impl Into<String>) {
        self.state.sub_key = key.into();
    }

    pub fn service_options(&self) -> Vec<SelectOption> {
        self.flow.services().iter().map(FlowNode::option).collect()
    }

    fn service_node(&self) -> Option<&FlowNode> {
        self.flow.service(&self.state.service_key)
    }

    fn category_node(&self) -> Option<&FlowNode> {
        self.service_node()?.category(&self.state.category_key)
    }

    /// Categories of the selected service, or its sub-services when the
    /// service is flat and has no category tier.
    pub fn category_options(&self) -> Vec<SelectOption> {
        let Some(service) = self.service_node() else {
            return Vec::new();
        };
        match (&service.categories, &service.sub_services) {
            (Some(categories), _) => categories.iter().map(FlowNode::option).collect(),
            (None, Some(subs)) => subs.iter().map(FlowEntry::option).collect(),
            (None, None) => Vec::new(),
        }
    }

    /// Sub-services (or vehicles) of the selected category node.
    pub fn sub_options(&self) -> Vec<SelectOption> {
        let Some(category) = self.category_node() else {
            return Vec::new();
        };
        category
            .sub_services
            .as_ref()
            .or(category.vehicles.as_ref())
            .map(|entries| entries.iter().map(FlowEntry::option).collect())
            .unwrap_or_default()
    }

    pub fn has_categories(&self) -> bool {
        self.service_node()
            .is_some_and(|service| service.categories.is_some())
    }

    /// Resolve the backend selector for the current state.
    pub fn selector(&self) -> Result<Selector, SelectionInvalid> {
        let category = resolve(&self.state.service_key)?;
        let service = resolve(&self.state.category_key)?;
        let sub_service = resolve(&self.state.sub_key)?;

        if category.is_empty() {
            return Err(SelectionInvalid::NoService);
        }
        if service.is_empty() && self.has_categories() {
            return Err(SelectionInvalid::CategoryRequired(category));
        }

        Ok(Selector {
            category,
            service,
            sub_service,
        })
    }

    pub fn is_ready(&self) -> bool {
        self.selector().is_ok()
    }
}

/// Unset stays unset; a set key that normalizes to nothing is rejected.
fn resolve(key: &str) -> Result<String, SelectionInvalid> {
    if key.is_empty() {
        return Ok(String::new());
    }
    let normalized = normalize(key);
    if normalized.is_empty() {
        return Err(SelectionInvalid::NormalizationAmbiguous(key.to_string()));
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flow() -> FlowTree {
        serde_json::from_str(
            r#"[
                { "key": "bike", "label": "Bike", "subServices": [ { "key": "economy", "label": "Economy" } ] },
                {
                    "key": "carRecovery",
                    "label": "Car Recovery",
                    "categories": [
                        { "key": "winching", "label": "Winching", "subServices": ["engine", "battery"] },
                        { "key": "towing", "label": "Towing", "vehicles": [ { "key": "flatbed", "label": "Flatbed" } ] },
                        { "key": "Key Unlocker Services", "label": "Key Unlocker Services" }
                    ]
                },
                { "key": "carCab", "label": "Car/Cab" }
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_initial_state() {
        let cascade = SelectorCascade::new(flow());
        assert_eq!(cascade.state(), &SelectionState::default());
        assert!(cascade.category_options().is_empty());
        assert!(cascade.sub_options().is_empty());
        assert_eq!(cascade.selector(), Err(SelectionInvalid::NoService));
    }

    #[test]
    fn test_select_service_resets_children() {
        let mut cascade = SelectorCascade::new(flow());
        cascade.select_service("carRecovery");
        cascade.select_category("winching");
        cascade.select_sub("engine");

        cascade.select_service("bike");
        assert_eq!(cascade.state().category_key, "");
        assert_eq!(cascade.state().sub_key, "");

        // Re-selecting the same service also resets.
        cascade.select_category("economy");
        cascade.select_service("bike");
        assert_eq!(cascade.state().category_key, "");
    }

    #[test]
    fn test_select_category_resets_sub() {
        let mut cascade = SelectorCascade::new(flow());
        cascade.select_service("carRecovery");
        cascade.select_category("winching");
        cascade.select_sub("battery");
        cascade.select_category("towing");
        assert_eq!(cascade.state().sub_key, "");
        assert_eq!(cascade.state().service_key, "carRecovery");
    }

    #[test]
    fn test_flat_service_skips_category_tier() {
        let mut cascade = SelectorCascade::new(flow());
        cascade.select_service("bike");
        assert_eq!(cascade.category_options(), vec![SelectOption::new("economy", "Economy")]);
        assert!(!cascade.has_categories());
        assert!(cascade.sub_options().is_empty());
    }

    #[test]
    fn test_sub_options_from_bare_strings() {
        let mut cascade = SelectorCascade::new(flow());
        cascade.select_service("carRecovery");
        assert!(cascade.has_categories());
        cascade.select_category("winching");
        assert_eq!(
            cascade.sub_options(),
            vec![SelectOption::new("engine", "engine"), SelectOption::new("battery", "battery")]
        );
    }

    #[test]
    fn test_sub_options_from_vehicles() {
        let mut cascade = SelectorCascade::new(flow());
        cascade.select_service("carRecovery");
        cascade.select_category("towing");
        assert_eq!(cascade.sub_options(), vec![SelectOption::new("flatbed", "Flatbed")]);
    }

    #[test]
    fn test_ready_conditions() {
        let mut cascade = SelectorCascade::new(flow());

        // Flat service is ready as soon as it is selected.
        cascade.select_service("carCab");
        assert_eq!(cascade.selector(), Ok(Selector::new("carCab", "", "")));

        // Three-tier service needs a category.
        cascade.select_service("carRecovery");
        assert_eq!(
            cascade.selector(),
            Err(SelectionInvalid::CategoryRequired("carRecovery".into()))
        );
        cascade.select_category("Key Unlocker Services");
        assert_eq!(
            cascade.selector(),
            Ok(Selector::new("carRecovery", "keyUnlockerServices", ""))
        );
    }

    #[test]
    fn test_ambiguous_label_is_invalid() {
        let mut cascade = SelectorCascade::new(flow());
        cascade.select_service("carCab");
        cascade.select_category("&&");
        assert_eq!(
            cascade.selector(),
            Err(SelectionInvalid::NormalizationAmbiguous("&&".into()))
        );
        assert!(!cascade.is_ready());
    }

    #[test]
    fn test_selector_leaf() {
        assert_eq!(Selector::new("bike", "economy", "").leaf(), Some("economy"));
        assert_eq!(Selector::new("carRecovery", "winching", "engine").leaf(), Some("engine"));
        assert_eq!(Selector::new("carCab", "", "").leaf(), None);
        assert_eq!(Selector::new("bike", "economy", "").to_string(), "bike/economy/");
    }
}
