//! Embedded rule sets

use super::config::RuleSetConfig;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::warn;

const EMBEDDED_SOURCES: &[(&str, &str)] = &[
    ("default", include_str!("../../configs/blocks/default.toml")),
    ("plain", include_str!("../../configs/blocks/plain.toml")),
];

static EMBEDDED: OnceLock<BTreeMap<String, RuleSetConfig>> = OnceLock::new();

fn embedded() -> &'static BTreeMap<String, RuleSetConfig> {
    EMBEDDED.get_or_init(|| {
        let mut map = BTreeMap::new();
        for (name, source) in EMBEDDED_SOURCES {
            match toml::from_str::<RuleSetConfig>(source) {
                Ok(config) => {
                    map.insert((*name).to_string(), config);
                }
                Err(e) => warn!("failed to parse embedded rule set '{}': {}", name, e),
            }
        }
        map
    })
}

/// An embedded rule set by name
pub fn get_rule_set(name: &str) -> Option<&'static RuleSetConfig> {
    embedded().get(name)
}

/// Names of the embedded rule sets
pub fn list_rule_sets() -> Vec<&'static str> {
    embedded().keys().map(String::as_str).collect()
}
