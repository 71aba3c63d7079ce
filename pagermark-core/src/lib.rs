// Pagermark Core Library
//
// Provides pager-alert message annotation with an ordered, operator-defined
// rule pipeline. Main interface for rewriting and highlighting decoded
// messages before they reach the dashboard.

pub mod types;
pub mod config;
pub mod rules;
pub mod storage;
pub mod cache;
pub mod processor;

// Re-export main types and functions for easy use
pub use types::*;
pub use config::{AnnotationConfig, ConfigManager};
pub use processor::{AnnotatedMessage, MessageRenderer};
pub use rules::{
    Annotated, AnnotationEngine, RuleDiagnostic, RuleError, DEFAULT_HIGHLIGHT_CLASS,
};
pub use storage::{FileRuleStore, MemoryRuleStore, RuleStore};
