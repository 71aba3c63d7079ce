use crate::types::RuleSet;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::RwLock;

/// Storage abstraction for persisted annotation rule sets.
///
/// The store supplies the ordered rule set for a message's context. The
/// engine only ever reads a snapshot per invocation; ownership and mutation
/// of the rules stay entirely on this side of the boundary.
pub trait RuleStore {
    fn get_rules(&self, context: &str) -> Result<Option<RuleSet>>;
    fn store_rules(&self, context: &str, rules: &RuleSet) -> Result<()>;
}

/// File-based rule store: one JSON document per context under a directory.
///
/// Documents written by earlier dashboard versions (the `match`/`replace`/
/// `highlight` field names, boolean or missing modes) deserialize through
/// the same path as current ones; the legacy handling lives on the `Rule`
/// types, not here.
pub struct FileRuleStore {
    store_dir: String,
}

impl FileRuleStore {
    pub fn new(store_dir: &str) -> Result<Self> {
        // Ensure store directory exists
        fs::create_dir_all(store_dir)?;

        Ok(Self {
            store_dir: store_dir.to_string(),
        })
    }

    fn rules_path(&self, context: &str) -> String {
        format!("{}/{}.json", self.store_dir, sanitize_context(context))
    }
}

/// Context names come from operator input and agency fields; keep the file
/// name to a safe character set.
fn sanitize_context(context: &str) -> String {
    context
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

impl RuleStore for FileRuleStore {
    fn get_rules(&self, context: &str) -> Result<Option<RuleSet>> {
        let path = self.rules_path(context);
        if Path::new(&path).exists() {
            let json_str = fs::read_to_string(path)?;
            let rules: RuleSet = serde_json::from_str(&json_str)
                .map_err(|e| anyhow!("Failed to deserialize rule set for `{}`: {}", context, e))?;
            Ok(Some(rules))
        } else {
            Ok(None)
        }
    }

    fn store_rules(&self, context: &str, rules: &RuleSet) -> Result<()> {
        let path = self.rules_path(context);
        let json_str = serde_json::to_string_pretty(rules)
            .map_err(|e| anyhow!("Failed to serialize rule set for `{}`: {}", context, e))?;
        fs::write(path, json_str)?;
        Ok(())
    }
}

/// In-memory rule store for tests and embedded previews.
pub struct MemoryRuleStore {
    rules: RwLock<HashMap<String, RuleSet>>,
}

impl Default for MemoryRuleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRuleStore {
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(HashMap::new()),
        }
    }
}

impl RuleStore for MemoryRuleStore {
    fn get_rules(&self, context: &str) -> Result<Option<RuleSet>> {
        let rules = self
            .rules
            .read()
            .map_err(|_| anyhow!("rule store lock poisoned"))?;
        Ok(rules.get(context).cloned())
    }

    fn store_rules(&self, context: &str, rules: &RuleSet) -> Result<()> {
        let mut store = self
            .rules
            .write()
            .map_err(|_| anyhow!("rule store lock poisoned"))?;
        store.insert(context.to_string(), rules.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rule;

    #[test]
    fn test_file_store_roundtrip() {
        let temp_dir = std::env::temp_dir().join("pagermark_test_rules");
        let store = FileRuleStore::new(temp_dir.to_str().unwrap()).unwrap();

        let rules = vec![
            Rule::replace("Code 3", "Priority"),
            Rule::styled("ALARM", "Fire alarm"),
        ];

        store.store_rules("FIRE-DISPATCH", &rules).unwrap();
        let retrieved = store.get_rules("FIRE-DISPATCH").unwrap();
        assert_eq!(retrieved, Some(rules));

        // Clean up
        std::fs::remove_dir_all(temp_dir).ok();
    }

    #[test]
    fn test_missing_context_is_none() {
        let store = MemoryRuleStore::new();
        assert_eq!(store.get_rules("NOBODY").unwrap(), None);
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryRuleStore::new();
        let rules = vec![Rule::plain("Engine \\d+", "Engine company")];

        store.store_rules("EMS", &rules).unwrap();
        assert_eq!(store.get_rules("EMS").unwrap(), Some(rules));
    }

    #[test]
    fn test_context_names_are_sanitized() {
        assert_eq!(sanitize_context("FIRE/EMS Dispatch"), "FIRE_EMS_Dispatch");
        assert_eq!(sanitize_context("north-side_2"), "north-side_2");
    }
}
