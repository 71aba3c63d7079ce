// Main rules module - delegates to semantic sub-modules
// This file coordinates the rule system but actual implementations are in:
// - engine.rs: AnnotationEngine and the sequential rule pipeline
// - replace.rs: first-match substitution rules
// - highlight.rs: anchor-wrapping highlight rules
// - guard.rs: markup guard shared by the highlight rules
// - validation.rs: rule-set validation and reporting

pub mod engine;
pub mod guard;
pub mod highlight;
pub mod replace;
pub mod validation;

// Re-export everything for backwards compatibility
pub use engine::*;
