//! Heading candidate scoring.
//!
//! Each line gets a confidence in `[0, 1]` from independent signals: size
//! ratio, boldness, pattern class and position. Penalties for long or
//! prose-like lines pull the score back down.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::classify::font_profile::FontProfile;
use crate::classify::noise::is_page_number;
use crate::classify::options::{ExtractOptions, ScoreWeights};
use crate::classify::patterns::{
    classify, is_fill_rule, is_navigation_text, strip_numbering, PatternMatch,
};
use crate::classify::title::TitleMatch;
use crate::model::{HeadingLevel, TextLine};

/// Distance from the leftmost line start that still counts as the margin.
const LEFT_MARGIN_TOLERANCE: f32 = 2.0;

/// Extra space over the median gap that marks a paragraph break.
const GAP_TOLERANCE: f32 = 0.5;

static RE_SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?;](?:\s|$)").unwrap());

/// A line being considered for the outline.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    /// Position of the line in detection order
    pub index: usize,
    /// The scored line
    pub line: &'a TextLine,
    /// Confidence in `[0, 1]`
    pub score: f32,
    /// Pattern class that contributed to the score
    pub pattern: PatternMatch,
    /// Assigned by the hierarchy stage
    pub level: Option<HeadingLevel>,
}

/// Scores lines against a document's font profile and layout.
#[derive(Debug)]
pub struct HeadingScorer<'a> {
    profile: &'a FontProfile,
    options: &'a ExtractOptions,
    median_gap: f32,
    left_margins: BTreeMap<u32, f32>,
}

impl<'a> HeadingScorer<'a> {
    /// Create a scorer for one document.
    pub fn new(lines: &[TextLine], profile: &'a FontProfile, options: &'a ExtractOptions) -> Self {
        let mut left_margins: BTreeMap<u32, f32> = BTreeMap::new();
        for line in lines {
            left_margins
                .entry(line.page)
                .and_modify(|x| *x = x.min(line.x_position))
                .or_insert(line.x_position);
        }

        Self {
            profile,
            options,
            median_gap: median_line_gap(lines),
            left_margins,
        }
    }

    /// Median vertical gap between consecutive lines on the same page.
    pub fn median_gap(&self) -> f32 {
        self.median_gap
    }

    /// Score every line not consumed by the title and keep those at or above
    /// the acceptance threshold.
    pub fn candidates<'l>(&self, lines: &'l [TextLine], title: &TitleMatch) -> Vec<Candidate<'l>> {
        let threshold = self.options.acceptance_threshold;
        let candidates: Vec<Candidate<'l>> = lines
            .iter()
            .enumerate()
            .filter(|(i, _)| !title.consumes(*i))
            .filter_map(|(i, line)| {
                let pattern = classify(&line.text);
                let score = self.score_line(lines, i, pattern);
                (score >= threshold).then_some(Candidate {
                    index: i,
                    line,
                    score,
                    pattern,
                    level: None,
                })
            })
            .collect();

        log::debug!(
            "Accepted {} of {} lines as heading candidates (threshold {:.2})",
            candidates.len(),
            lines.len(),
            threshold
        );
        candidates
    }

    /// Score the line at `index`.
    pub fn score(&self, lines: &[TextLine], index: usize) -> f32 {
        self.score_line(lines, index, classify(&lines[index].text))
    }

    fn score_line(&self, lines: &[TextLine], index: usize, pattern: PatternMatch) -> f32 {
        let line = &lines[index];
        if self.is_disqualified(line) {
            return 0.0;
        }
        let w = &self.options.weights;

        let mut score = self.size_signal(line.font_size, w);
        if line.bold {
            score += w.bold;
        }
        score += pattern_signal(pattern, w);
        if self.at_left_margin(line) {
            score += w.left_margin;
        }
        if self.follows_break(lines, index) {
            score += w.paragraph_gap;
        }

        if line.char_count() > self.options.max_heading_chars {
            score -= w.length_penalty;
        }
        if is_prose(&line.text, pattern) {
            score -= w.prose_penalty;
        }

        score.clamp(0.0, 1.0)
    }

    fn is_disqualified(&self, line: &TextLine) -> bool {
        line.char_count() < self.options.min_heading_chars
            || is_navigation_text(&line.text)
            || is_fill_rule(&line.text)
            || is_page_number(&line.text)
    }

    fn size_signal(&self, font_size: f32, w: &ScoreWeights) -> f32 {
        let ratio = self.profile.size_ratio(font_size);
        if ratio >= 1.8 {
            w.size_strong
        } else if ratio >= 1.4 {
            w.size_medium
        } else if ratio >= 1.15 {
            w.size_weak
        } else if ratio < 0.9 {
            -w.size_small_penalty
        } else {
            0.0
        }
    }

    fn at_left_margin(&self, line: &TextLine) -> bool {
        self.left_margins
            .get(&line.page)
            .map(|left| line.x_position - left <= LEFT_MARGIN_TOLERANCE)
            .unwrap_or(false)
    }

    /// The first line on a page counts as following a break.
    fn follows_break(&self, lines: &[TextLine], index: usize) -> bool {
        let line = &lines[index];
        match index.checked_sub(1).map(|i| &lines[i]) {
            Some(prev) if prev.page == line.page => {
                line.y_position - prev.bottom > self.median_gap + GAP_TOLERANCE
            }
            _ => true,
        }
    }
}

fn pattern_signal(pattern: PatternMatch, w: &ScoreWeights) -> f32 {
    match pattern {
        PatternMatch::Numbered { .. } => w.numbered,
        PatternMatch::Keyword => w.keyword,
        PatternMatch::Enumerative => w.enumerative,
        PatternMatch::ColonTerminated => w.colon_terminated,
        PatternMatch::AllCaps => w.all_caps,
        PatternMatch::None => 0.0,
    }
}

/// Running text: starts lowercase or holds several sentence breaks.
fn is_prose(text: &str, pattern: PatternMatch) -> bool {
    let body = match pattern {
        PatternMatch::Numbered { .. } => strip_numbering(text),
        _ => text,
    };
    let starts_lower = body.chars().next().is_some_and(char::is_lowercase);
    starts_lower || RE_SENTENCE_BREAK.find_iter(body).count() >= 2
}

/// Median gap between the bottom of a line and the top of the next one.
pub fn median_line_gap(lines: &[TextLine]) -> f32 {
    let mut gaps: Vec<f32> = lines
        .windows(2)
        .filter(|pair| pair[0].page == pair[1].page)
        .map(|pair| pair[1].y_position - pair[0].bottom)
        .filter(|gap| gap.is_finite())
        .collect();
    if gaps.is_empty() {
        return 0.0;
    }
    gaps.sort_by(|a, b| a.total_cmp(b));
    gaps[gaps.len() / 2]
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Body lines 10pt high on a 14pt pitch, starting at `y`.
    fn body_lines(page: u32, y: f32, count: usize) -> Vec<TextLine> {
        (0..count)
            .map(|i| {
                TextLine::new("Regular body text for the paragraph", page, 10.0)
                    .at(72.0, y + i as f32 * 14.0)
            })
            .collect()
    }

    fn setup(lines: &[TextLine]) -> (FontProfile, ExtractOptions) {
        (FontProfile::from_lines(lines).unwrap(), ExtractOptions::default())
    }

    #[test]
    fn test_median_gap() {
        let lines = body_lines(1, 100.0, 5);
        assert!((median_line_gap(&lines) - 4.0).abs() < 1e-4);
        assert_eq!(median_line_gap(&lines[..1]), 0.0);
    }

    #[test]
    fn test_large_bold_numbered_line_scores_high() {
        let mut lines = body_lines(1, 100.0, 10);
        lines.insert(5, TextLine::new("2. Results", 1, 18.0).at(72.0, 180.0).bold());
        let (profile, options) = setup(&lines);
        let scorer = HeadingScorer::new(&lines, &profile, &options);

        let score = scorer.score(&lines, 5);
        assert!(score >= 0.9, "score was {score}");
    }

    #[test]
    fn test_body_line_scores_low() {
        let lines = body_lines(1, 100.0, 10);
        let (profile, options) = setup(&lines);
        let scorer = HeadingScorer::new(&lines, &profile, &options);

        for i in 0..lines.len() {
            assert!(scorer.score(&lines, i) < options.acceptance_threshold);
        }
    }

    #[test]
    fn test_numbered_line_mid_page_at_margin() {
        // Near body size, not bold, no gap before it
        let mut lines = body_lines(1, 100.0, 3);
        lines.push(TextLine::new("1.1.1 Details", 1, 11.0).at(72.0, 142.0));
        lines.extend(body_lines(1, 157.0, 3));
        let (profile, options) = setup(&lines);
        let scorer = HeadingScorer::new(&lines, &profile, &options);

        assert!(!scorer.follows_break(&lines, 3));
        assert!(scorer.score(&lines, 3) >= options.acceptance_threshold);

        lines[3] = TextLine::new("1.1.1 Details", 1, 11.0).at(110.0, 142.0);
        let scorer = HeadingScorer::new(&lines, &profile, &options);
        assert!(scorer.score(&lines, 3) < options.acceptance_threshold);
    }

    #[test]
    fn test_single_signal_not_enough() {
        // Large size alone (indented, no gap, no pattern, not bold)
        let mut lines = body_lines(1, 100.0, 6);
        lines.insert(3, TextLine::new("Big plain words", 1, 19.0).at(120.0, 142.0));
        let (profile, options) = setup(&lines);
        let scorer = HeadingScorer::new(&lines, &profile, &options);
        assert!(scorer.score(&lines, 3) < options.acceptance_threshold);
    }

    #[test]
    fn test_candidates_skip_title_lines() {
        let mut lines = vec![TextLine::new("Document Title", 1, 24.0).at(72.0, 40.0).bold()];
        lines.extend(body_lines(1, 100.0, 5));
        let (profile, options) = setup(&lines);
        let scorer = HeadingScorer::new(&lines, &profile, &options);

        let title = TitleMatch {
            text: "Document Title".to_string(),
            consumed: vec![0],
            font_size: 24.0,
        };
        assert!(scorer.candidates(&lines, &title).is_empty());
        assert_eq!(scorer.candidates(&lines, &TitleMatch::default()).len(), 1);
    }

    // ==================== Penalty Tests ====================

    #[test]
    fn test_length_penalty() {
        let long = format!("1. {}", "Word ".repeat(40));
        let mut lines = body_lines(1, 100.0, 4);
        lines.insert(2, TextLine::new(long.trim(), 1, 18.0).at(72.0, 140.0).bold());
        let (profile, options) = setup(&lines);
        let scorer = HeadingScorer::new(&lines, &profile, &options);
        assert!(scorer.score(&lines, 2) < options.acceptance_threshold);
    }

    #[test]
    fn test_prose_detection() {
        assert!(is_prose("and then it continued", PatternMatch::None));
        assert!(is_prose("It rained. We left. Done", PatternMatch::None));
        assert!(!is_prose("Background", PatternMatch::Keyword));
        assert!(!is_prose("1.1 Background", PatternMatch::Numbered { depth: 2 }));
    }

    #[test]
    fn test_disqualified_lines_score_zero() {
        let mut lines = body_lines(1, 100.0, 4);
        lines.push(TextLine::new("Hi", 1, 24.0).at(72.0, 200.0).bold());
        lines.push(TextLine::new("www.example.com", 1, 24.0).at(72.0, 240.0).bold());
        lines.push(TextLine::new("Signature: ________", 1, 24.0).at(72.0, 280.0).bold());
        let (profile, options) = setup(&lines);
        let scorer = HeadingScorer::new(&lines, &profile, &options);

        assert_eq!(scorer.score(&lines, 4), 0.0);
        assert_eq!(scorer.score(&lines, 5), 0.0);
        assert_eq!(scorer.score(&lines, 6), 0.0);
    }

    #[test]
    fn test_first_line_on_page_follows_break() {
        let mut lines = body_lines(1, 100.0, 3);
        lines.extend(body_lines(2, 100.0, 3));
        let (profile, options) = setup(&lines);
        let scorer = HeadingScorer::new(&lines, &profile, &options);
        assert!(scorer.follows_break(&lines, 0));
        assert!(scorer.follows_break(&lines, 3));
        assert!(!scorer.follows_break(&lines, 4));
    }
}
