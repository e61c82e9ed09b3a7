//! Strips formatting artifacts from generated Cypher.

/// Remove surrounding code fences and a leading `cypher` language tag.
///
/// Idempotent: already-clean text passes through unchanged. The remaining
/// content is not validated here; the database parser is the judge.
pub fn normalize(raw: &str) -> String {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        // The language tag is only an artifact right after an opening fence.
        text = rest.strip_prefix("cypher").unwrap_or(rest);
    }
    text = text.strip_suffix("```").unwrap_or(text);
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_fences_and_language_tag() {
        assert_eq!(
            normalize("```cypher\nMATCH (n) RETURN n\n```"),
            "MATCH (n) RETURN n"
        );
    }

    #[test]
    fn test_strips_bare_fences() {
        assert_eq!(normalize("```\nMATCH (n) RETURN n\n```"), "MATCH (n) RETURN n");
    }

    #[test]
    fn test_clean_text_is_untouched() {
        assert_eq!(normalize("MATCH (n) RETURN n"), "MATCH (n) RETURN n");
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(normalize("  MATCH (n) RETURN n\n"), "MATCH (n) RETURN n");
    }

    #[test]
    fn test_language_tag_without_fence_is_kept() {
        assert_eq!(normalize("cypher runtime hints"), "cypher runtime hints");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "```cypher\nMATCH (n) RETURN n```",
            "MATCH (n) RETURN n",
            "```\nRETURN 1\n```",
            "",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {input:?}");
        }
    }
}
