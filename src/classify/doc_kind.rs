//! Coarse document kind detection.
//!
//! Forms, invitations and flyers are laid out for visual effect; their large
//! text is rarely a section heading.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::TextLine;

const FORM_INDICATORS: &[&str] = &[
    "application", "form", "for:", "date:", "name:", "address:", "rsvp:", "signature",
];
const INVITATION_INDICATORS: &[&str] =
    &["invited", "party", "celebration", "event", "rsvp", "please join"];
const FLYER_INDICATORS: &[&str] = &["sale", "discount", "special offer", "limited time", "call now"];

/// Documents with fewer lines than this may be forms or flyers.
const SHORT_DOCUMENT_LINES: usize = 20;
/// Average line length below which a short document is considered sparse.
const SPARSE_LINE_CHARS: f32 = 50.0;
/// Documents with more lines than this are long.
const LONG_DOCUMENT_LINES: usize = 100;

static FORM_RE: LazyLock<Vec<Regex>> = LazyLock::new(|| indicator_patterns(FORM_INDICATORS));
static INVITATION_RE: LazyLock<Vec<Regex>> =
    LazyLock::new(|| indicator_patterns(INVITATION_INDICATORS));
static FLYER_RE: LazyLock<Vec<Regex>> = LazyLock::new(|| indicator_patterns(FLYER_INDICATORS));

fn indicator_patterns(words: &[&str]) -> Vec<Regex> {
    words
        .iter()
        .map(|word| {
            let trailing = if word.ends_with(|c: char| c.is_alphanumeric()) {
                r"\b"
            } else {
                ""
            };
            Regex::new(&format!(r"(?i)\b{}{}", regex::escape(word), trailing)).unwrap()
        })
        .collect()
}

/// Document kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Form,
    Invitation,
    Flyer,
    /// Short and sparse, but not a form
    Short,
    Standard,
    Long,
}

impl DocumentKind {
    /// Detect the kind from a document's lines.
    pub fn detect(lines: &[TextLine]) -> Self {
        let total = lines.len();
        if total > LONG_DOCUMENT_LINES {
            return DocumentKind::Long;
        }
        if total >= SHORT_DOCUMENT_LINES {
            return DocumentKind::Standard;
        }

        let avg_chars = lines.iter().map(|l| l.char_count()).sum::<usize>() as f32 / total.max(1) as f32;
        if avg_chars >= SPARSE_LINE_CHARS {
            return DocumentKind::Standard;
        }

        let all_text = lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let hits = |patterns: &[Regex]| patterns.iter().filter(|re| re.is_match(&all_text)).count();

        let kind = if hits(FORM_RE.as_slice()) > 2 {
            DocumentKind::Form
        } else if hits(INVITATION_RE.as_slice()) > 1 {
            DocumentKind::Invitation
        } else if hits(FLYER_RE.as_slice()) > 1 {
            DocumentKind::Flyer
        } else {
            DocumentKind::Short
        };
        log::debug!("Document kind: {:?} ({} lines, avg {:.1} chars)", kind, total, avg_chars);
        kind
    }

    /// Whether headings of this kind are not section structure.
    pub fn is_visual(&self) -> bool {
        matches!(
            self,
            DocumentKind::Form | DocumentKind::Invitation | DocumentKind::Flyer
        )
    }
}
