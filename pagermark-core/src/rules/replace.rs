use super::engine::{AnnotateRule, RuleError};
use crate::types::Rule;
use regex::Regex;

// ReplaceRule - first-match substitution with back-reference support
pub struct ReplaceRule<'a> {
    rule: &'a Rule,
}

impl<'a> ReplaceRule<'a> {
    pub fn new(rule: &'a Rule) -> Self {
        Self { rule }
    }
}

impl<'a> AnnotateRule for ReplaceRule<'a> {
    fn apply(&self, html: &str) -> Result<String, RuleError> {
        let regex = Regex::new(&self.rule.pattern).map_err(|source| RuleError::InvalidPattern {
            pattern: self.rule.pattern.clone(),
            source,
        })?;

        // Regex::replace substitutes the first match only and expands
        // `$n`/`${name}` group references in the replacement text. A rule
        // that matches nowhere returns the input unchanged.
        Ok(regex
            .replace(html, self.rule.replacement.as_str())
            .into_owned())
    }

    fn name(&self) -> &str {
        "Replace"
    }
}
