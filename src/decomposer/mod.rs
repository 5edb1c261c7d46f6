//! Attribute decomposition into primitive, recordable fields

use crate::monitor::Attributes;
use serde_json::Value;

/// Breaks complex attribute values down before processors see them
pub trait Decomposer: Send + Sync {
    fn decompose(&self, attributes: &Attributes) -> Attributes;
}

/// Flattens nested objects into dotted keys and arrays into indexed keys.
///
/// `{"order": {"id": 7, "tags": ["a"]}}` becomes
/// `{"order.id": 7, "order.tags.0": "a"}`. Empty objects and arrays are kept
/// under their own key.
#[derive(Debug, Default, Clone)]
pub struct AttributeDecomposer;

impl AttributeDecomposer {
    pub fn new() -> Self {
        Self
    }

    fn flatten_into(prefix: &str, value: &Value, out: &mut Attributes) {
        match value {
            Value::Object(map) if !map.is_empty() => {
                for (key, child) in map {
                    Self::flatten_into(&format!("{}.{}", prefix, key), child, out);
                }
            }
            Value::Array(items) if !items.is_empty() => {
                for (i, child) in items.iter().enumerate() {
                    Self::flatten_into(&format!("{}.{}", prefix, i), child, out);
                }
            }
            other => {
                out.insert(prefix.to_string(), other.clone());
            }
        }
    }
}

impl Decomposer for AttributeDecomposer {
    fn decompose(&self, attributes: &Attributes) -> Attributes {
        let mut out = Attributes::new();
        for (key, value) in attributes {
            Self::flatten_into(key, value, &mut out);
        }
        out
    }
}
