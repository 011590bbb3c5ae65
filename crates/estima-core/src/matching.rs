//! Free-text annotation → list-item association.
//!
//! The backend flags requirement issues by quoting the feature text rather
//! than referencing it by ID, so the UI has to match the quote back to a
//! list item: case-folded, whitespace-trimmed exact match first, then a
//! substring-containment fallback that only kicks in for annotations longer
//! than [`CONTAINMENT_MIN_CHARS`]. The fallback is a known-fragile
//! heuristic (short or overlapping text can mis-match); it is kept as-is
//! because the wire format offers nothing better.

/// Minimum annotation length (in chars, after trimming) before the
/// substring-containment fallback applies.
pub const CONTAINMENT_MIN_CHARS: usize = 10;

fn fold(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Find the list item an annotation refers to. Returns the index of the
/// first exact (case-folded, trimmed) match, falling back to the first item
/// that contains the annotation or is contained by it, with the fallback gated on
/// annotation length.
#[must_use]
pub fn match_annotation(annotation: &str, items: &[&str]) -> Option<usize> {
    let needle = fold(annotation);
    if needle.is_empty() {
        return None;
    }

    if let Some(idx) = items.iter().position(|item| fold(item) == needle) {
        return Some(idx);
    }

    if needle.chars().count() <= CONTAINMENT_MIN_CHARS {
        return None;
    }

    items.iter().position(|item| {
        let folded = fold(item);
        !folded.is_empty() && (folded.contains(&needle) || needle.contains(&folded))
    })
}

#[cfg(test)]
mod tests {
    use super::match_annotation;

    #[test]
    fn exact_match_ignores_case_and_whitespace() {
        let items = ["User authentication", "Report export"];
        assert_eq!(match_annotation("  user AUTHENTICATION ", &items), Some(0));
        assert_eq!(match_annotation("Report export", &items), Some(1));
    }

    #[test]
    fn containment_applies_only_above_cutoff() {
        let items = ["Push notification delivery", "Admin"];
        // 25 chars: the annotation is a substring of item 0.
        assert_eq!(
            match_annotation("notification delivery", &items),
            Some(0)
        );
        // Short annotation, no exact match: no fallback, no match.
        assert_eq!(match_annotation("Admin UI", &items), None);
    }

    #[test]
    fn containment_works_both_directions() {
        // Annotation contains the item.
        assert_eq!(
            match_annotation("the SSO login must support SAML", &["SSO login"]),
            Some(0)
        );
        // Item contains the annotation.
        assert_eq!(
            match_annotation("support SAML", &["SSO login must support SAML"]),
            Some(0)
        );
    }

    #[test]
    fn empty_annotation_never_matches() {
        assert_eq!(match_annotation("   ", &["anything"]), None);
        assert_eq!(match_annotation("something long enough", &[]), None);
    }

    #[test]
    fn first_match_wins_on_overlap() {
        let items = ["payment processing", "payment processing v2"];
        assert_eq!(
            match_annotation("payment processing v2 rollout", &items),
            Some(0),
            "the fragile heuristic picks the first containment hit"
        );
    }
}
