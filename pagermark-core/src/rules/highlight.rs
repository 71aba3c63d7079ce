use super::engine::{AnnotateRule, RuleError};
use super::guard;
use crate::types::Rule;
use regex::Regex;
use url::form_urlencoded;

// HighlightRule - wraps the first unguarded match in an anchor element.
//
// The anchor links back to the dashboard search (`/?q=<match>`), carries the
// rule's label as a Bootstrap popover tooltip, and (in styled mode) the
// configured CSS class. The matched text stays visible as the anchor body.
pub struct HighlightRule<'a> {
    rule: &'a Rule,
    /// CSS class for the anchor; None renders the unstyled plain variant
    highlight_class: Option<&'a str>,
}

impl<'a> HighlightRule<'a> {
    pub fn styled(rule: &'a Rule, highlight_class: &'a str) -> Self {
        Self {
            rule,
            highlight_class: Some(highlight_class),
        }
    }

    pub fn plain(rule: &'a Rule) -> Self {
        Self {
            rule,
            highlight_class: None,
        }
    }

    fn build_anchor(&self, matched: &str) -> String {
        let query: String = form_urlencoded::byte_serialize(matched.as_bytes()).collect();
        let label = &self.rule.replacement;

        match self.highlight_class {
            Some(class) => format!(
                "<a href=\"/?q={query}\" data-toggle=\"popover\" class=\"{class}\" \
                 title=\"{label}\" onmouseenter=\"$(this).tooltip('show')\">{matched}</a>"
            ),
            None => format!(
                "<a href=\"/?q={query}\" data-toggle=\"popover\" \
                 title=\"{label}\" onmouseenter=\"$(this).tooltip('show')\">{matched}</a>"
            ),
        }
    }
}

impl<'a> AnnotateRule for HighlightRule<'a> {
    fn apply(&self, html: &str) -> Result<String, RuleError> {
        let regex = Regex::new(&self.rule.pattern).map_err(|source| RuleError::InvalidPattern {
            pattern: self.rule.pattern.clone(),
            source,
        })?;

        // First match position that is not already inside markup produced by
        // an earlier rule. A pattern that only matches guarded regions is a
        // no-op, which is what keeps re-annotation from nesting anchors.
        let candidate = regex
            .find_iter(html)
            .find(|m| !guard::is_guarded(html, m.start(), m.end()));

        let Some(matched) = candidate else {
            return Ok(html.to_string());
        };

        let anchor = self.build_anchor(matched.as_str());
        let mut annotated = String::with_capacity(html.len() + anchor.len());
        annotated.push_str(&html[..matched.start()]);
        annotated.push_str(&anchor);
        annotated.push_str(&html[matched.end()..]);
        Ok(annotated)
    }

    fn name(&self) -> &str {
        match self.highlight_class {
            Some(_) => "HighlightStyled",
            None => "HighlightPlain",
        }
    }
}
