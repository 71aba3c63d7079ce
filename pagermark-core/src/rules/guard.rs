// Markup guard shared by the highlight rules.
//
// Highlight rules must never wrap text that earlier rules already turned
// into markup. The historical implementation expressed this as regex
// look-around; the `regex` crate has no look-around support, so the same
// contract is an explicit scan over the flat string here. This is a
// best-effort heuristic, not an HTML parse: deeply nested or malformed
// markup can still slip through, and that behavior is kept as-is so that
// existing operator configurations render identically.

/// Returns true when the match at `html[start..end]` must not be wrapped:
/// the range sits inside a tag's markup, or inside the visible text of an
/// anchor produced by an earlier rule.
pub fn is_guarded(html: &str, start: usize, end: usize) -> bool {
    inside_tag_markup(html, start) || inside_anchor_text(html, end)
}

/// Inside tag markup when the last `<` before the match has no closing `>`
/// between it and the match position.
fn inside_tag_markup(html: &str, start: usize) -> bool {
    let prefix = &html[..start];
    match (prefix.rfind('<'), prefix.rfind('>')) {
        (Some(open), Some(close)) => open > close,
        (Some(_), None) => true,
        _ => false,
    }
}

/// Inside an anchor's visible text when the first tag after the match is a
/// closing `</a>`.
fn inside_anchor_text(html: &str, end: usize) -> bool {
    let rest = &html[end..];
    match rest.find('<') {
        Some(tag_start) => rest[tag_start..].starts_with("</a>"),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guarded(html: &str, needle: &str) -> bool {
        let start = html.find(needle).expect("needle not present");
        is_guarded(html, start, start + needle.len())
    }

    #[test]
    fn test_plain_text_is_not_guarded() {
        assert!(!guarded("Engine 7 responding", "Engine 7"));
    }

    #[test]
    fn test_attribute_text_is_guarded() {
        assert!(guarded("<a href=\"/?q=Engine 7\">crew</a>", "Engine 7"));
    }

    #[test]
    fn test_anchor_body_is_guarded() {
        assert!(guarded("<a href=\"/?q=x\">Engine 7</a>", "Engine 7"));
    }

    #[test]
    fn test_text_after_closed_tag_is_not_guarded() {
        assert!(!guarded("<a href=\"/?q=x\">crew</a> Engine 7", "Engine 7"));
    }

    #[test]
    fn test_text_before_any_markup_is_not_guarded() {
        assert!(!guarded("Engine 7 <a href=\"/?q=x\">crew</a>", "Engine 7"));
    }

    #[test]
    fn test_text_inside_non_anchor_element_is_not_guarded() {
        // Only the anchor closing tag guards trailing text; other elements
        // are fair game, matching the historical behavior.
        assert!(!guarded("<b>Engine 7</b>", "Engine 7"));
    }
}
