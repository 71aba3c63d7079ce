use crate::cache::RenderKey;
use crate::rules::{Annotated, AnnotationEngine, RuleDiagnostic};
use crate::storage::{FileRuleStore, MemoryRuleStore, RuleStore};
use crate::types::AlertMessage;
use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;

/// Rendered output for one message: the original record, the annotated
/// markup handed to the UI, and diagnostics for any skipped rules.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedMessage {
    pub message: AlertMessage,
    pub markup: String,
    pub skipped: Vec<RuleDiagnostic>,
}

/// Render-side binding of the annotation engine.
///
/// Owns the engine and a rule store, and re-invokes the engine whenever a
/// message is rendered with a snapshot (text, rules, highlight class) it
/// has not seen before. Deduplication lives here on purpose: the engine is
/// a pure function and provides no caching of its own.
pub struct MessageRenderer {
    engine: AnnotationEngine,
    store: Box<dyn RuleStore + Send + Sync>,
    rendered: HashMap<String, Annotated>,
}

impl MessageRenderer {
    /// Create MessageRenderer with full dependency injection
    pub fn new(engine: AnnotationEngine, store: Box<dyn RuleStore + Send + Sync>) -> Self {
        Self {
            engine,
            store,
            rendered: HashMap::new(),
        }
    }

    /// Convenience constructor for dashboard usage with a file-backed store
    pub fn with_file_store(engine: AnnotationEngine, store_dir: &str) -> Result<Self> {
        let store = Box::new(FileRuleStore::new(store_dir)?);
        Ok(Self::new(engine, store))
    }

    /// Convenience constructor for tests and previews
    pub fn with_memory_store(engine: AnnotationEngine) -> Self {
        Self::new(engine, Box::new(MemoryRuleStore::new()))
    }

    pub fn store(&self) -> &(dyn RuleStore + Send + Sync) {
        self.store.as_ref()
    }

    /// Annotate `message` with its context's rule set, reusing the previous
    /// render when nothing in the snapshot changed. A context with no stored
    /// rules renders the message text unchanged.
    pub fn render(&mut self, message: &AlertMessage) -> Result<AnnotatedMessage> {
        let rules = self.store.get_rules(&message.agency)?.unwrap_or_default();
        let key =
            RenderKey::new(&message.message, &rules, self.engine.highlight_class()).to_cache_hash();

        if let Some(hit) = self.rendered.get(&key) {
            return Ok(AnnotatedMessage {
                message: message.clone(),
                markup: hit.markup.clone(),
                skipped: hit.skipped.clone(),
            });
        }

        let annotated = self.engine.annotate(&message.message, &rules);
        self.rendered.insert(key, annotated.clone());

        Ok(AnnotatedMessage {
            message: message.clone(),
            markup: annotated.markup,
            skipped: annotated.skipped,
        })
    }

    /// Annotate without touching the dedup cache (one-shot rendering).
    pub fn render_uncached(&self, message: &AlertMessage) -> Result<AnnotatedMessage> {
        let rules = self.store.get_rules(&message.agency)?.unwrap_or_default();
        let annotated = self.engine.annotate(&message.message, &rules);

        Ok(AnnotatedMessage {
            message: message.clone(),
            markup: annotated.markup,
            skipped: annotated.skipped,
        })
    }

    /// Number of distinct snapshots rendered so far
    pub fn cached_renders(&self) -> usize {
        self.rendered.len()
    }
}
