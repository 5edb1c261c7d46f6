//! Event monitors: named, levelled bags of attributes fired into the engine

use crate::engine::MonitoringEngine;
use crate::level::MonitoringLevel;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Attribute map carried by a monitor
pub type Attributes = BTreeMap<String, Value>;

/// A single event to be recorded by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct EventMonitor {
    name: String,
    level: MonitoringLevel,
    attributes: Attributes,
}

impl EventMonitor {
    pub fn new(name: impl Into<String>, level: MonitoringLevel) -> Self {
        Self {
            name: name.into(),
            level,
            attributes: Attributes::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> MonitoringLevel {
        self.level
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Set an attribute, replacing any previous value under `key`
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Hand the monitor to `engine` for dispatch to its processors
    pub async fn fire(self, engine: &MonitoringEngine) {
        engine.process(self).await;
    }
}

/// The form of a monitor that processors receive: effective level applied,
/// attributes decomposed, timestamped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedMonitor {
    pub name: String,
    pub level: MonitoringLevel,
    pub timestamp_ms: u64,
    pub attributes: Attributes,
}

impl ProcessedMonitor {
    pub fn new(name: String, level: MonitoringLevel, attributes: Attributes) -> Self {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        Self {
            name,
            level,
            timestamp_ms,
            attributes,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_replaces_and_chains() {
        let mut monitor = EventMonitor::new("checkout.submit", MonitoringLevel::Info);
        monitor.set("eventType", "start").set("items", 3);
        monitor.set("eventType", "finish");

        assert_eq!(monitor.name(), "checkout.submit");
        assert_eq!(monitor.get("eventType"), Some(&json!("finish")));
        assert_eq!(monitor.get("items"), Some(&json!(3)));
        assert_eq!(monitor.attributes().len(), 2);
    }

    #[test]
    fn test_processed_monitor_serializes_level_by_name() {
        let mut attributes = Attributes::new();
        attributes.insert("k".to_string(), json!("v"));
        let processed =
            ProcessedMonitor::new("x".to_string(), MonitoringLevel::Essential, attributes);

        let value = serde_json::to_value(&processed).unwrap();
        assert_eq!(value["level"], json!("ESSENTIAL"));
        assert_eq!(value["attributes"]["k"], json!("v"));
        assert!(processed.timestamp_ms > 0);
    }
}
