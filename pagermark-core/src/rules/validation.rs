use crate::types::{Rule, RuleMode};
use regex::Regex;

// Rule-set validation - surfaces broken or suspicious operator rules before
// they reach a live render path. Pure reporting; never mutates the rules.

#[derive(Debug, Clone)]
pub struct RuleSetReport {
    pub issues: Vec<RuleSetIssue>,
    pub quality_score: f32,
    pub total_rules: usize,
}

#[derive(Debug, Clone)]
pub enum RuleSetIssue {
    InvalidPattern {
        index: usize,
        pattern: String,
        message: String,
    },
    EmptyPattern {
        index: usize,
    },
    MatchesEmpty {
        index: usize,
        pattern: String,
    },
}

impl RuleSetReport {
    /// True when every rule compiled and nothing looked suspicious.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Print validation report to console
    pub fn print(&self) {
        println!("   📊 Rule Set Report:");
        println!("      📈 Quality Score: {:.2}/1.00", self.quality_score);
        println!("      🔍 Issues Found: {}", self.issues.len());

        if self.issues.is_empty() {
            println!("      ✅ No rule issues detected!");
            return;
        }

        println!("      ⚠️  Issues detected:");
        for issue in &self.issues {
            match issue {
                RuleSetIssue::InvalidPattern {
                    index,
                    pattern,
                    message,
                } => {
                    println!(
                        "         ❌ Rule {} does not compile: `{}` ({})",
                        index, pattern, message
                    );
                }
                RuleSetIssue::EmptyPattern { index } => {
                    println!("         🫥 Rule {} has an empty pattern", index);
                }
                RuleSetIssue::MatchesEmpty { index, pattern } => {
                    println!(
                        "         🤔 Rule {} matches the empty string: `{}`",
                        index, pattern
                    );
                }
            }
        }
    }
}

/// Validate every rule in the set. Broken rules are reported, not removed;
/// the engine skips them at apply time with the same diagnosis.
pub fn validate_rules(rules: &[Rule]) -> RuleSetReport {
    let mut issues = Vec::new();

    for (index, rule) in rules.iter().enumerate() {
        if rule.pattern.is_empty() {
            issues.push(RuleSetIssue::EmptyPattern { index });
            continue;
        }

        match Regex::new(&rule.pattern) {
            Ok(regex) => {
                // A pattern that matches the empty string highlights or
                // replaces a zero-width span, which is almost always an authoring
                // mistake (e.g. `E*` instead of `E+`).
                if rule.mode != RuleMode::Replace && regex.is_match("") {
                    issues.push(RuleSetIssue::MatchesEmpty {
                        index,
                        pattern: rule.pattern.clone(),
                    });
                }
            }
            Err(err) => {
                issues.push(RuleSetIssue::InvalidPattern {
                    index,
                    pattern: rule.pattern.clone(),
                    message: err.to_string(),
                });
            }
        }
    }

    let quality_score = if rules.is_empty() {
        1.0
    } else {
        (1.0 - (issues.len() as f32 / rules.len() as f32)).max(0.0)
    };

    RuleSetReport {
        issues,
        quality_score,
        total_rules: rules.len(),
    }
}
