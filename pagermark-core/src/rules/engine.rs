use crate::types::{Rule, RuleMode};
use serde::Serialize;
use thiserror::Error;

use super::highlight::HighlightRule;
use super::replace::ReplaceRule;

/// CSS class applied by styled highlight rules when the caller supplies none.
pub const DEFAULT_HIGHLIGHT_CLASS: &str = "annotation-highlight";

/// A single rule's application failure. Failures stay local to the rule:
/// one broken operator-authored pattern must not break rendering of the
/// message for every other rule.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Diagnostic for a rule that was skipped during an annotation pass.
#[derive(Debug, Clone, Serialize)]
pub struct RuleDiagnostic {
    /// Position of the rule in the rule set it came from
    pub index: usize,
    pub pattern: String,
    pub reason: String,
}

/// Best-effort annotation output: the rewritten markup plus diagnostics for
/// any rules that could not be applied.
#[derive(Debug, Clone)]
pub struct Annotated {
    pub markup: String,
    pub skipped: Vec<RuleDiagnostic>,
}

impl Annotated {
    pub fn into_markup(self) -> String {
        self.markup
    }
}

// Sequential rule pipeline infrastructure
pub trait AnnotateRule {
    fn apply(&self, html: &str) -> Result<String, RuleError>;
    fn name(&self) -> &str;
}

/// The annotation engine: folds an ordered rule set over the message text.
///
/// Pure over its inputs: identical `(source, rules)` always produce
/// identical output, and no state is carried between invocations, so one
/// engine may serve any number of rendering contexts concurrently.
pub struct AnnotationEngine {
    highlight_class: String,
}

impl AnnotationEngine {
    pub fn new() -> Self {
        Self {
            highlight_class: DEFAULT_HIGHLIGHT_CLASS.to_string(),
        }
    }

    pub fn with_highlight_class(highlight_class: &str) -> Self {
        Self {
            highlight_class: highlight_class.to_string(),
        }
    }

    pub fn highlight_class(&self) -> &str {
        &self.highlight_class
    }

    /// Apply `rules` to `source` in sequence order: each rule operates on
    /// the output of the previous one, never on the original text. Order
    /// is the operator's priority and is never rearranged.
    ///
    /// A rule whose pattern does not compile is skipped and reported in the
    /// result's diagnostics; the remaining rules still run. An empty rule
    /// set returns the source unchanged.
    pub fn annotate(&self, source: &str, rules: &[Rule]) -> Annotated {
        let mut markup = source.to_string();
        let mut skipped = Vec::new();

        for (index, rule) in rules.iter().enumerate() {
            match self.apply_rule(&markup, rule) {
                Ok(next) => markup = next,
                Err(err) => {
                    eprintln!("⚠️  Skipping annotation rule {index}: {err}");
                    skipped.push(RuleDiagnostic {
                        index,
                        pattern: rule.pattern.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        Annotated { markup, skipped }
    }

    fn apply_rule(&self, html: &str, rule: &Rule) -> Result<String, RuleError> {
        match rule.mode {
            RuleMode::Replace => ReplaceRule::new(rule).apply(html),
            RuleMode::Styled => HighlightRule::styled(rule, &self.highlight_class).apply(html),
            RuleMode::Plain => HighlightRule::plain(rule).apply(html),
        }
    }
}

impl Default for AnnotationEngine {
    fn default() -> Self {
        Self::new()
    }
}
