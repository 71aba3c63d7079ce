use crate::rules::{AnnotationEngine, DEFAULT_HIGHLIGHT_CLASS};
use crate::types::RuleSet;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;

// Default value functions for serde
fn default_highlight_class() -> String {
    DEFAULT_HIGHLIGHT_CLASS.to_string()
}

/// Operator-authored annotation configuration: the per-context rule sets and
/// the presentation knobs, as loaded from a YAML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationConfig {
    /// CSS class applied by styled highlight rules
    #[serde(default = "default_highlight_class")]
    pub highlight_class: String,
    /// Rules applied when a message's context has no rule set of its own
    #[serde(default)]
    pub default_rules: RuleSet,
    /// Per-context (agency) rule sets. Rule order within each set is the
    /// operator's priority and is preserved exactly as authored.
    #[serde(default)]
    pub contexts: HashMap<String, RuleSet>,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            highlight_class: default_highlight_class(),
            default_rules: Vec::new(),
            contexts: HashMap::new(),
        }
    }
}

impl AnnotationConfig {
    /// Load config from file path (functional approach)
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AnnotationConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|_| {
                eprintln!("⚠️  Failed to load config from {}, using defaults", p);
                Self::default()
            }),
            None => Self::default(),
        }
    }
}

/// Resolves the rule set and engine settings for a message's context.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: AnnotationConfig,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: AnnotationConfig::default(),
        }
    }

    pub fn from_config(config: AnnotationConfig) -> Self {
        Self { config }
    }

    pub fn load_config_from_file(&mut self, config_path: &str) -> Result<()> {
        println!("📁 Loading annotation config from: {config_path}");
        self.config = AnnotationConfig::load_from_file(config_path)?;
        println!("✅ Annotation config loaded successfully");
        Ok(())
    }

    pub fn config(&self) -> &AnnotationConfig {
        &self.config
    }

    /// The rule set for a context, falling back to the default rules when
    /// the context has none configured.
    pub fn rules_for(&self, context: &str) -> &RuleSet {
        self.config
            .contexts
            .get(context)
            .unwrap_or(&self.config.default_rules)
    }

    /// Build an engine carrying this configuration's highlight class.
    pub fn engine(&self) -> AnnotationEngine {
        AnnotationEngine::with_highlight_class(&self.config.highlight_class)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
