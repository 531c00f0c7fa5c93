//! Running header/footer and page number removal.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;

use crate::model::TextLine;

/// Longest line considered as a running header or footer.
const MAX_RUNNING_LINE_CHARS: usize = 100;

// Page number patterns (compiled once using LazyLock)
static RE_PAGE_BARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-–—\[\(]?\s*\d{1,4}\s*[-–—\]\)]?$").unwrap());

static RE_PAGE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:page|pg\.?|p\.)\s*\d{1,4}(?:\s*(?:/|of)\s*\d{1,4})?$").unwrap()
});

static RE_PAGE_RATIO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\d{1,4}\s*(?:/|of)\s*\d{1,4}$").unwrap());

static RE_PAGE_ROMAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ivxlc]{1,7}$").unwrap());

/// Vertical region of a page used for recurrence matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Band {
    Top,
    Bottom,
}

impl Band {
    fn of(line: &TextLine) -> Option<Self> {
        let rel = line.relative_y();
        if rel < 0.25 {
            Some(Band::Top)
        } else if rel >= 0.75 {
            Some(Band::Bottom)
        } else {
            None
        }
    }
}

/// What the noise filter removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoiseReport {
    /// Lines removed as running headers or footers
    pub running_lines: usize,
    /// Lines removed as page numbers
    pub page_numbers: usize,
}

impl NoiseReport {
    /// Total number of removed lines.
    pub fn total(&self) -> usize {
        self.running_lines + self.page_numbers
    }
}

/// Check if a line is a page number, optionally decorated.
pub fn is_page_number(text: &str) -> bool {
    let text = text.trim();
    RE_PAGE_BARE.is_match(text)
        || RE_PAGE_LABEL.is_match(text)
        || RE_PAGE_RATIO.is_match(text)
        || RE_PAGE_ROMAN.is_match(text)
}

/// Recurrence key: case-folded, digits replaced, whitespace collapsed.
///
/// "Page 3 of 10" and "page 4 of 10" share a key.
pub fn recurrence_key(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_digit() { '#' } else { c })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove running headers/footers and page numbers.
///
/// A line is a running header or footer when its recurrence key appears in
/// the same band on at least `min_repeat_pages` distinct pages.
pub fn filter_noise(lines: Vec<TextLine>, min_repeat_pages: usize) -> (Vec<TextLine>, NoiseReport) {
    let mut pages_by_key: HashMap<(String, Band), BTreeSet<u32>> = HashMap::new();
    for line in &lines {
        if line.char_count() > MAX_RUNNING_LINE_CHARS {
            continue;
        }
        if let Some(band) = Band::of(line) {
            pages_by_key
                .entry((recurrence_key(&line.text), band))
                .or_default()
                .insert(line.page);
        }
    }
    pages_by_key.retain(|_, pages| pages.len() >= min_repeat_pages.max(1));

    let mut report = NoiseReport::default();
    let kept: Vec<TextLine> = lines
        .into_iter()
        .filter(|line| {
            if is_page_number(&line.text) {
                report.page_numbers += 1;
                return false;
            }
            if line.char_count() <= MAX_RUNNING_LINE_CHARS {
                if let Some(band) = Band::of(line) {
                    if pages_by_key.contains_key(&(recurrence_key(&line.text), band)) {
                        report.running_lines += 1;
                        return false;
                    }
                }
            }
            true
        })
        .collect();

    log::debug!(
        "Noise filter removed {} running lines and {} page numbers",
        report.running_lines,
        report.page_numbers
    );
    (kept, report)
}
