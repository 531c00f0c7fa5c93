//! Text pattern classification for heading candidates.
//!
//! Rules are tried in priority order and the first match wins, so a line is
//! assigned exactly one pattern class.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Pattern class of a line. Classes are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternMatch {
    /// Section numbering ("1.", "2.3.1", "A.", "Chapter 4") with nesting depth
    Numbered { depth: usize },
    /// Structural keyword heading (Introduction, References, ...)
    Keyword,
    /// Enumerative lead-in ("For each ...")
    Enumerative,
    /// Short phrase ending in a colon
    ColonTerminated,
    /// Short ALL-CAPS phrase
    AllCaps,
    /// No pattern
    None,
}

impl PatternMatch {
    /// Check if any pattern matched.
    pub fn is_match(&self) -> bool {
        !matches!(self, PatternMatch::None)
    }

    /// Numbering depth for numbered headings.
    pub fn depth(&self) -> Option<usize> {
        match self {
            PatternMatch::Numbered { depth } => Some(*depth),
            _ => None,
        }
    }
}

enum Matcher {
    Regex(Regex, fn(&Captures) -> PatternMatch),
    Predicate(fn(&str) -> bool, PatternMatch),
}

struct PatternRule {
    name: &'static str,
    matcher: Matcher,
}

impl PatternRule {
    fn regex(name: &'static str, pattern: &str, to_match: fn(&Captures) -> PatternMatch) -> Self {
        Self {
            name,
            matcher: Matcher::Regex(Regex::new(pattern).unwrap(), to_match),
        }
    }

    fn predicate(name: &'static str, check: fn(&str) -> bool, result: PatternMatch) -> Self {
        Self {
            name,
            matcher: Matcher::Predicate(check, result),
        }
    }

    fn apply(&self, text: &str) -> Option<PatternMatch> {
        match &self.matcher {
            Matcher::Regex(re, to_match) => re.captures(text).map(|caps| to_match(&caps)),
            Matcher::Predicate(check, result) => check(text).then_some(*result),
        }
    }
}

/// Number of dot-separated components in the first capture group plus `base`.
fn components(caps: &Captures, base: usize) -> usize {
    caps.get(1)
        .map(|m| m.as_str().split('.').filter(|p| !p.is_empty()).count())
        .unwrap_or(0)
        + base
}

// Ordered rule table (compiled once using LazyLock)
static RULES: LazyLock<Vec<PatternRule>> = LazyLock::new(|| {
    vec![
        PatternRule::regex(
            "decimal",
            r"^(\d{1,3}(?:\.\d{1,3})+\.?\)?|\d{1,3}[.)])\s+[\p{Lu}\p{Lt}\p{Lo}]",
            |caps| PatternMatch::Numbered {
                depth: components(caps, 0),
            },
        ),
        PatternRule::regex(
            "lettered",
            r"^[A-Z](?:((?:\.\d{1,3})+)\.?|[.)])\s+[\p{Lu}\p{Lt}\p{Lo}\d]",
            |caps| PatternMatch::Numbered {
                depth: components(caps, 1),
            },
        ),
        PatternRule::regex("roman", r"^[IVXLC]{1,6}[.)]\s+\p{Lu}", |_| {
            PatternMatch::Numbered { depth: 1 }
        }),
        PatternRule::regex(
            "section_label",
            r"(?i)^section\s+(\d{1,3}(?:\.\d{1,3})*)\b",
            |caps| PatternMatch::Numbered {
                depth: components(caps, 0),
            },
        ),
        PatternRule::regex(
            "chapter_label",
            r"(?i)^(?:chapter|part|appendix)\s+(?:\d{1,3}|[A-Z]|[IVXLC]{1,6})\b",
            |_| PatternMatch::Numbered { depth: 1 },
        ),
        PatternRule::regex(
            "keyword",
            r"(?i)^(?:summary|introduction|background|conclusions?|appendix|appendices|references|acknowledge?ments?|abstract|overview|bibliography|table of contents|contents|glossary|preface)\s*:?$",
            |_| PatternMatch::Keyword,
        ),
        PatternRule::regex("enumerative", r"(?i)^for\s+(?:each|every)\b", |_| {
            PatternMatch::Enumerative
        }),
        PatternRule::regex(
            "colon_terminated",
            r"^[\p{Lu}\p{Lt}\p{Lo}\d][^.!?:]{1,60}:$",
            |_| PatternMatch::ColonTerminated,
        ),
        PatternRule::predicate("all_caps", is_all_caps, PatternMatch::AllCaps),
    ]
});

/// Classify a line of text into a single pattern class.
pub fn classify(text: &str) -> PatternMatch {
    let text = text.trim();
    for rule in RULES.iter() {
        if let Some(found) = rule.apply(text) {
            log::trace!("Pattern {} matched {:?}", rule.name, text);
            return found;
        }
    }
    PatternMatch::None
}

/// Short phrase with at least two uppercase letters and no lowercase ones.
pub fn is_all_caps(text: &str) -> bool {
    if text.chars().count() > 60 {
        return false;
    }
    let upper = text.chars().filter(|c| c.is_uppercase()).count();
    upper >= 2 && !text.chars().any(char::is_lowercase)
}

/// URLs, e-mail addresses and copyright lines.
pub fn is_navigation_text(text: &str) -> bool {
    let lower = text.to_lowercase();
    ["www.", "http", "@", "©", "copyright"]
        .iter()
        .any(|marker| lower.contains(marker))
}

/// Fill-in rules and leader lines ("Name: ______", "Intro ..... 3").
pub fn is_fill_rule(text: &str) -> bool {
    ["___", "...", "---", "…"].iter().any(|marker| text.contains(marker))
}

/// Text with a leading numbering token removed.
pub fn strip_numbering(text: &str) -> &str {
    match text.split_once(char::is_whitespace) {
        Some((_, rest)) => rest.trim_start(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_numbering_depth() {
        assert_eq!(classify("1. Overview"), PatternMatch::Numbered { depth: 1 });
        assert_eq!(classify("1.1 Background"), PatternMatch::Numbered { depth: 2 });
        assert_eq!(classify("1.1.1 Details"), PatternMatch::Numbered { depth: 3 });
        assert_eq!(classify("2.3.4.1 Deep Dive"), PatternMatch::Numbered { depth: 4 });
        assert_eq!(classify("3) Results"), PatternMatch::Numbered { depth: 1 });
    }

    #[test]
    fn test_lettered_roman_and_labels() {
        assert_eq!(classify("A. Scope"), PatternMatch::Numbered { depth: 1 });
        assert_eq!(classify("B.2 Tooling"), PatternMatch::Numbered { depth: 2 });
        assert_eq!(classify("IV. Results"), PatternMatch::Numbered { depth: 1 });
        assert_eq!(classify("Chapter 3 Methods"), PatternMatch::Numbered { depth: 1 });
        assert_eq!(classify("Appendix B: Data"), PatternMatch::Numbered { depth: 1 });
        assert_eq!(classify("Section 2.1 Scope"), PatternMatch::Numbered { depth: 2 });
    }

    #[test]
    fn test_keywords_case_insensitive() {
        for text in ["Introduction", "REFERENCES", "summary:", "Acknowledgements", "Table of Contents"] {
            assert_eq!(classify(text), PatternMatch::Keyword, "{text:?}");
        }
        assert_ne!(classify("Introduction to the widget market"), PatternMatch::Keyword);
    }

    #[test]
    fn test_enumerative_colon_and_caps() {
        assert_eq!(classify("For each Ontario citizen:"), PatternMatch::Enumerative);
        assert_eq!(classify("Key findings:"), PatternMatch::ColonTerminated);
        assert_eq!(classify("PATHWAY OPTIONS"), PatternMatch::AllCaps);
    }

    #[test]
    fn test_priority_order() {
        // Numbered beats all-caps
        assert_eq!(classify("1. INTRODUCTION"), PatternMatch::Numbered { depth: 1 });
        // Keyword beats all-caps
        assert_eq!(classify("SUMMARY"), PatternMatch::Keyword);
        // Enumerative beats colon-terminated
        assert_eq!(classify("For every member:"), PatternMatch::Enumerative);
    }

    #[test]
    fn test_non_headings() {
        assert_eq!(classify("This is a regular sentence."), PatternMatch::None);
        assert_eq!(classify("A Study of Widgets"), PatternMatch::None);
        assert_eq!(classify("2024"), PatternMatch::None);
        assert_eq!(classify("1. the list item in prose"), PatternMatch::None);
        assert_eq!(classify("Part of the problem"), PatternMatch::None);
        assert_eq!(classify("12 March 2003"), PatternMatch::None);
        assert_eq!(classify("100 Main Street"), PatternMatch::None);
        assert!(!classify("plain").is_match());
    }

    // ==================== Helper Tests ====================

    #[test]
    fn test_all_caps_requires_letters() {
        assert!(is_all_caps("NASA"));
        assert!(!is_all_caps("A"));
        assert!(!is_all_caps("123 456"));
        assert!(!is_all_caps("Mixed CASE"));
        assert!(!is_all_caps(&"LONG ".repeat(20)));
    }

    #[test]
    fn test_navigation_and_fill_rules() {
        assert!(is_navigation_text("Visit www.example.com"));
        assert!(is_navigation_text("contact@example.com"));
        assert!(is_navigation_text("Copyright 2024 ACME"));
        assert!(!is_navigation_text("Introduction"));
        assert!(is_fill_rule("Name: ________"));
        assert!(is_fill_rule("Introduction ........ 3"));
        assert!(!is_fill_rule("Results"));
    }

    #[test]
    fn test_strip_numbering() {
        assert_eq!(strip_numbering("1.2 Background"), "Background");
        assert_eq!(strip_numbering("Single"), "Single");
    }

    #[test]
    fn test_depth_accessor() {
        assert_eq!(classify("2.1 Scope").depth(), Some(2));
        assert_eq!(classify("Summary").depth(), None);
    }
}
