//! scalar mapping
//!
//! maps schema scalar names to output primitive names. the default
//! table covers the scalars seen across the supported endpoints;
//! caller-supplied overrides win, and unmapped names fall back to a
//! configurable default.

use crate::config::GenConfig;
use std::collections::BTreeMap;

/// fallback for scalar names missing from the table
pub const DEFAULT_SCALAR_TYPE: &str = "unknown";

/// built-in scalar name table
pub const DEFAULT_SCALARS: &[(&str, &str)] = &[
    ("Int", "number"),
    ("Float", "number"),
    ("String", "string"),
    ("Boolean", "boolean"),
    ("ID", "number"),
    ("BigDecimal", "number"),
    ("Date", "string"),
    ("DateTime", "string"),
    ("Long", "string"),
    ("MetricInfo", "Record<string, string>"),
    ("Time", "string"),
    ("Upload", "any"),
    ("HashMap", "Record<string, string>"),
];

/// resolved scalar table for one generation run
#[derive(Debug, Clone)]
pub struct ScalarMap {
    table: BTreeMap<String, String>,
    default_type: String,
}

impl ScalarMap {
    /// build the table for one run: defaults first, caller overrides on top
    pub fn new(config: &GenConfig) -> Self {
        let mut table: BTreeMap<String, String> = DEFAULT_SCALARS
            .iter()
            .map(|(name, mapped)| (name.to_string(), mapped.to_string()))
            .collect();
        for (name, mapped) in &config.scalars {
            table.insert(name.clone(), mapped.clone());
        }

        Self {
            table,
            default_type: config
                .default_scalar
                .clone()
                .unwrap_or_else(|| DEFAULT_SCALAR_TYPE.to_string()),
        }
    }

    /// map a scalar name, falling back to the configured default
    pub fn resolve(&self, name: &str) -> &str {
        self.table
            .get(name)
            .map(String::as_str)
            .unwrap_or(&self.default_type)
    }

    /// the configured fallback name
    pub fn default_type(&self) -> &str {
        &self.default_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_lookup() {
        let scalars = ScalarMap::new(&GenConfig::new());
        assert_eq!(scalars.resolve("ID"), "number");
        assert_eq!(scalars.resolve("String"), "string");
        assert_eq!(scalars.resolve("Boolean"), "boolean");
        assert_eq!(scalars.resolve("Upload"), "any");
    }

    #[test]
    fn test_lookup_miss_uses_default() {
        let scalars = ScalarMap::new(&GenConfig::new());
        assert_eq!(scalars.resolve("Duration"), "unknown");

        let scalars = ScalarMap::new(&GenConfig::new().with_default_scalar("any"));
        assert_eq!(scalars.resolve("Duration"), "any");
    }

    #[test]
    fn test_caller_override_wins_for_one_run() {
        let scalars = ScalarMap::new(&GenConfig::new().with_scalar("ID", "string"));
        assert_eq!(scalars.resolve("ID"), "string");

        // a fresh run without the override is unaffected
        let scalars = ScalarMap::new(&GenConfig::new());
        assert_eq!(scalars.resolve("ID"), "number");
    }
}
