//! Static service/category/sub-service navigation tree.
//!
//! Served by the backend at `/vehicle-select-flow`, fetched once per session
//! and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// One selectable node in the navigation tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowNode {
    pub key: String,

    /// Display label; falls back to the key when the backend omits it.
    #[serde(default)]
    pub label: String,

    /// Present only on three-tier services (service → category → sub-service).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<FlowNode>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_services: Option<Vec<FlowEntry>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicles: Option<Vec<FlowEntry>>,
}

impl FlowNode {
    pub fn label(&self) -> &str {
        if self.label.is_empty() {
            &self.key
        } else {
            &self.label
        }
    }

    pub fn option(&self) -> SelectOption {
        SelectOption {
            key: self.key.clone(),
            label: self.label().to_string(),
        }
    }

    pub fn category(&self, key: &str) -> Option<&FlowNode> {
        self.categories.as_ref()?.iter().find(|c| c.key == key)
    }
}

/// Children may be full nodes or bare string keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlowEntry {
    Key(String),
    Node(FlowNode),
}

impl FlowEntry {
    pub fn option(&self) -> SelectOption {
        match self {
            FlowEntry::Key(key) => SelectOption {
                key: key.clone(),
                label: key.clone(),
            },
            FlowEntry::Node(node) => node.option(),
        }
    }
}

/// A `{key, label}` pair offered by a selector dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub key: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// The whole navigation tree, as served by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowTree(Vec<FlowNode>);

impl FlowTree {
    pub fn new(services: Vec<FlowNode>) -> Self {
        Self(services)
    }

    pub fn service(&self, key: &str) -> Option<&FlowNode> {
        self.0.iter().find(|s| s.key == key)
    }

    pub fn services(&self) -> &[FlowNode] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The flow endpoint answers either with a bare array or `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum FlowEnvelope {
    Bare(FlowTree),
    Wrapped { data: FlowTree },
}

impl From<FlowEnvelope> for FlowTree {
    fn from(envelope: FlowEnvelope) -> Self {
        match envelope {
            FlowEnvelope::Bare(tree) | FlowEnvelope::Wrapped { data: tree } => tree,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLOW_JSON: &str = r#"[
        { "key": "bike", "label": "Bike", "subServices": [ { "key": "economy", "label": "Economy" } ] },
        {
            "key": "carRecovery",
            "label": "Car Recovery",
            "categories": [
                { "key": "winching", "label": "Winching", "subServices": ["engine", "battery"] }
            ]
        },
        { "key": "carCab" }
    ]"#;

    #[test]
    fn test_deserialize_mixed_children() {
        let tree: FlowTree = serde_json::from_str(FLOW_JSON).unwrap();
        assert_eq!(tree.services().len(), 3);

        let bike = tree.service("bike").unwrap();
        assert!(bike.categories.is_none());
        assert_eq!(
            bike.sub_services.as_ref().unwrap()[0].option(),
            SelectOption::new("economy", "Economy")
        );

        let winching = tree.service("carRecovery").unwrap().category("winching").unwrap();
        let subs: Vec<_> = winching.sub_services.as_ref().unwrap().iter().map(FlowEntry::option).collect();
        assert_eq!(subs, vec![SelectOption::new("engine", "engine"), SelectOption::new("battery", "battery")]);
    }

    #[test]
    fn test_label_falls_back_to_key() {
        let tree: FlowTree = serde_json::from_str(FLOW_JSON).unwrap();
        assert_eq!(tree.service("carCab").unwrap().label(), "carCab");
    }

    #[test]
    fn test_wrapped_envelope() {
        let json = format!(r#"{{ "data": {} }}"#, FLOW_JSON);
        let envelope: FlowEnvelope = serde_json::from_str(&json).unwrap();
        let tree = FlowTree::from(envelope);
        assert!(tree.service("bike").is_some());
    }
}
