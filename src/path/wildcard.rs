//! `*` wildcard matching for key filters.

/// A key pattern where `*` matches any run of characters, including none.
///
/// There is no escape syntax; every other character matches itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardPattern {
    source: String,
    parts: Vec<String>,
}

impl WildcardPattern {
    /// Compiles a pattern. Text without `*` becomes a pattern that matches only itself.
    pub fn new(pattern: &str) -> Self {
        Self {
            source: pattern.to_string(),
            parts: pattern.split('*').map(str::to_string).collect(),
        }
    }

    /// Returns true if the text contains a `*`.
    pub fn is_wildcard(text: &str) -> bool {
        text.contains('*')
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Matches a literal against the pattern.
    ///
    /// The first part anchors at the start, the last part anchors at the end, and
    /// interior parts are found left to right without overlapping.
    pub fn matches(&self, text: &str) -> bool {
        if self.parts.len() == 1 {
            return self.source == text;
        }

        let first = &self.parts[0];
        let last = &self.parts[self.parts.len() - 1];
        if text.len() < first.len() + last.len() {
            return false;
        }
        if !text.starts_with(first.as_str()) || !text.ends_with(last.as_str()) {
            return false;
        }

        let mut cursor = first.len();
        let end = text.len() - last.len();
        for part in &self.parts[1..self.parts.len() - 1] {
            match text[cursor..end].find(part.as_str()) {
                Some(pos) => cursor += pos + part.len(),
                None => return false,
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_pattern() {
        let p = WildcardPattern::new("value1");
        assert!(p.matches("value1"));
        assert!(!p.matches("value10"));
    }

    #[test]
    fn test_star_matches_everything() {
        let p = WildcardPattern::new("*");
        assert!(p.matches(""));
        assert!(p.matches("anything"));
    }

    #[test]
    fn test_prefix_and_suffix() {
        assert!(WildcardPattern::new("value*").matches("value3"));
        assert!(WildcardPattern::new("value*").matches("value"));
        assert!(!WildcardPattern::new("value*").matches("myvalue"));
        assert!(WildcardPattern::new("*.yaml").matches("config.yaml"));
        assert!(!WildcardPattern::new("*.yaml").matches("config.yml"));
    }

    #[test]
    fn test_contains() {
        let p = WildcardPattern::new("*foo*");
        assert!(p.matches("foo"));
        assert!(p.matches("a_foo_b"));
        assert!(!p.matches("fo"));
    }

    #[test]
    fn test_interior_parts_in_order() {
        let p = WildcardPattern::new("a*b*c");
        assert!(p.matches("abc"));
        assert!(p.matches("aXbYc"));
        assert!(!p.matches("acb"));
    }

    #[test]
    fn test_anchors_do_not_overlap() {
        // "aba" would satisfy both anchors only by sharing the middle 'b'.
        assert!(!WildcardPattern::new("ab*ba").matches("aba"));
        assert!(WildcardPattern::new("ab*ba").matches("abba"));
    }

    #[test]
    fn test_is_wildcard() {
        assert!(WildcardPattern::is_wildcard("k*"));
        assert!(!WildcardPattern::is_wildcard("k1"));
    }
}
