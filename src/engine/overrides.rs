use crate::level::MonitoringLevel;
use std::collections::BTreeMap;

/// Name-keyed level overrides, rendered in key order
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LevelOverrides {
    levels: BTreeMap<String, MonitoringLevel>,
}

impl LevelOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the override for `key`
    pub fn insert(&mut self, key: &str, level: MonitoringLevel) {
        self.levels.insert(key.to_string(), level);
    }

    /// Insert under `key`, dropping any existing key equal to it ignoring ASCII case
    pub fn insert_ignore_case(&mut self, key: &str, level: MonitoringLevel) {
        self.levels
            .retain(|existing, _| !existing.eq_ignore_ascii_case(key));
        self.levels.insert(key.to_string(), level);
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Level of the longest key that `name` starts with
    pub fn longest_prefix_match(&self, name: &str) -> Option<MonitoringLevel> {
        self.levels
            .iter()
            .filter(|(prefix, _)| name.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, level)| *level)
    }

    /// Level stored under a key equal to `name`, ignoring ASCII case
    pub fn get_ignore_case(&self, name: &str) -> Option<MonitoringLevel> {
        self.levels
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, level)| *level)
    }

    /// One `key -> LEVEL` line per override
    pub fn listing(&self) -> String {
        self.levels
            .iter()
            .map(|(key, level)| format!("{} -> {}", key, level))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_prefix_wins() {
        let mut overrides = LevelOverrides::new();
        overrides.insert("checkout", MonitoringLevel::Info);
        overrides.insert("checkout.payment", MonitoringLevel::Essential);

        assert_eq!(
            overrides.longest_prefix_match("checkout.payment.auth"),
            Some(MonitoringLevel::Essential)
        );
        assert_eq!(
            overrides.longest_prefix_match("checkout.cart"),
            Some(MonitoringLevel::Info)
        );
        assert_eq!(overrides.longest_prefix_match("search"), None);
    }

    #[test]
    fn test_insert_replaces_existing_key() {
        let mut overrides = LevelOverrides::new();
        overrides.insert("a", MonitoringLevel::Debug);
        overrides.insert("a", MonitoringLevel::Essential);
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides.listing(), "a -> ESSENTIAL");
    }

    #[test]
    fn test_insert_ignore_case_replaces_differently_cased_key() {
        let mut overrides = LevelOverrides::new();
        assert!(overrides.is_empty());

        overrides.insert_ignore_case("FileLogger", MonitoringLevel::Debug);
        overrides.insert_ignore_case("filelogger", MonitoringLevel::Essential);

        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides.get_ignore_case("FILELOGGER"), Some(MonitoringLevel::Essential));
        assert_eq!(overrides.listing(), "filelogger -> ESSENTIAL");
        assert!(!overrides.is_empty());
    }

    #[test]
    fn test_get_ignore_case() {
        let mut overrides = LevelOverrides::new();
        overrides.insert("FileLogger", MonitoringLevel::Debug);
        assert_eq!(overrides.get_ignore_case("filelogger"), Some(MonitoringLevel::Debug));
        assert_eq!(overrides.get_ignore_case("other"), None);
    }

    #[test]
    fn test_listing_sorted_by_key() {
        let mut overrides = LevelOverrides::new();
        assert_eq!(overrides.listing(), "");
        overrides.insert("zeta", MonitoringLevel::Info);
        overrides.insert("alpha", MonitoringLevel::Debug);
        assert_eq!(overrides.listing(), "alpha -> DEBUG\nzeta -> INFO");
    }
}
