// Citation Protection
// Swaps bibliographic citations for opaque placeholders around a rewrite

static_regex!(pub fn citation_re =>
    r"\([A-Za-z][A-Za-z\s&.'\-]*,?\s*\d{4}[a-z]?\)|\[\d+(?:\s*[-–,]\s*\d+)*\]");

/// Placeholder delimiters from the Unicode private-use area; no mutator pattern matches them.
pub const ENGINE_MARKERS: (char, char) = ('\u{E000}', '\u{E001}');
pub const LOOP_MARKERS: (char, char) = ('\u{E002}', '\u{E003}');

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CitationVault {
    open: char,
    close: char,
    citations: Vec<String>,
}

impl CitationVault {
    /// Replace every citation in `text` with a numbered placeholder.
    pub fn protect(text: &str, markers: (char, char)) -> (String, Self) {
        let (open, close) = markers;
        let mut citations = Vec::new();
        let protected = citation_re()
            .replace_all(text, |caps: &regex::Captures| {
                citations.push(caps[0].to_string());
                format!("{}{}{}", open, citations.len() - 1, close)
            })
            .into_owned();
        (protected, Self { open, close, citations })
    }

    pub fn len(&self) -> usize {
        self.citations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.citations.is_empty()
    }

    fn placeholder(&self, idx: usize) -> String {
        format!("{}{}{}", self.open, idx, self.close)
    }

    /// Put citations back; `None` if any placeholder was lost or duplicated.
    pub fn restore(&self, text: &str) -> Option<String> {
        let mut out = text.to_string();
        for (idx, citation) in self.citations.iter().enumerate() {
            let placeholder = self.placeholder(idx);
            if out.matches(placeholder.as_str()).count() != 1 {
                return None;
            }
            out = out.replacen(placeholder.as_str(), citation, 1);
        }
        if out.contains(self.open) || out.contains(self.close) {
            return None;
        }
        Some(out)
    }

    /// Every protected citation occurs in `text` at least as often as it was protected.
    pub fn is_intact(&self, text: &str) -> bool {
        self.citations.iter().all(|c| {
            let wanted = self.citations.iter().filter(|o| *o == c).count();
            text.matches(c.as_str()).count() >= wanted
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_patterns() {
        let text = "As shown (Smith & Jones, 2019) and [3], also [4-6] and (O'Neil 2020a).";
        let found: Vec<&str> = citation_re().find_iter(text).map(|m| m.as_str()).collect();
        assert_eq!(found, vec!["(Smith & Jones, 2019)", "[3]", "[4-6]", "(O'Neil 2020a)"]);
    }

    #[test]
    fn test_protect_and_restore_round_trip() {
        let text = "Earlier work [1] disagrees (Lee et al., 2021).";
        let (protected, vault) = CitationVault::protect(text, ENGINE_MARKERS);
        assert_eq!(vault.len(), 2);
        assert!(!protected.contains("[1]"));
        assert_eq!(vault.restore(&protected).as_deref(), Some(text));
        assert!(vault.is_intact(text));
    }

    #[test]
    fn test_lost_placeholder_is_detected() {
        let (protected, vault) = CitationVault::protect("See [1] and [2].", LOOP_MARKERS);
        let damaged = protected.replace("\u{E002}1\u{E003}", "");
        assert_eq!(vault.restore(&damaged), None);
        assert!(!vault.is_intact("See [1] only."));
    }

    #[test]
    fn test_markers_do_not_collide() {
        let (outer, outer_vault) = CitationVault::protect("Cite [7] here.", LOOP_MARKERS);
        let (inner, inner_vault) = CitationVault::protect(&outer, ENGINE_MARKERS);
        assert!(inner_vault.is_empty());
        assert_eq!(inner_vault.restore(&inner).as_deref(), Some(outer.as_str()));
        assert_eq!(outer_vault.restore(&outer).as_deref(), Some("Cite [7] here."));
    }
}
