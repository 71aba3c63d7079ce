use crate::types::Rule;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Version constants for render invalidation
pub mod versions {
    pub const PAGERMARK_VERSION: &str = "0.1.1";
    pub const RENDER_VERSION: &str = "1.0.0";
}

/// Render deduplication key (message text + rule set + presentation → markup).
///
/// The engine itself never caches; the surrounding render layer keys on this
/// snapshot so a message is only re-annotated when its text, its rule set,
/// or the highlight class actually changed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct RenderKey {
    pub message_hash: String,
    pub rules_hash: String,
    pub highlight_class: String,
    pub render_version: String,
}

impl RenderKey {
    pub fn new(message: &str, rules: &[Rule], highlight_class: &str) -> Self {
        Self {
            message_hash: calculate_text_hash(message),
            rules_hash: calculate_rules_hash(rules),
            highlight_class: highlight_class.to_string(),
            render_version: versions::RENDER_VERSION.to_string(),
        }
    }

    /// Compute cache key hash for storage
    pub fn to_cache_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.message_hash);
        hasher.update(&self.rules_hash);
        hasher.update(&self.highlight_class);
        hasher.update(&self.render_version);
        format!("{:x}", hasher.finalize())
    }
}

/// Calculate hash for message text (for render key)
pub fn calculate_text_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Calculate hash for a rule-set snapshot (for render key).
/// Serializes through serde so the hash tracks exactly what the engine sees.
pub fn calculate_rules_hash(rules: &[Rule]) -> String {
    // Rule serialization is infallible (strings and a unit-variant mode)
    let rules_json = serde_json::to_string(rules).unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(rules_json.as_bytes());
    format!("{:x}", hasher.finalize())
}
