//! Title detection on the first page.

use crate::classify::font_profile::FontProfile;
use crate::classify::noise::is_page_number;
use crate::classify::patterns::is_navigation_text;
use crate::model::TextLine;

/// Sizes within this distance count as the same title style.
const SAME_STYLE_TOLERANCE: f32 = 0.5;

/// The detected title and the lines it was built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitleMatch {
    /// Title text, empty when none was found
    pub text: String,
    /// Indices into the line slice consumed by the title
    pub consumed: Vec<usize>,
    /// Font size of the title lines
    pub font_size: f32,
}

impl TitleMatch {
    /// Check if no title was found.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Check if a line index is part of the title.
    pub fn consumes(&self, index: usize) -> bool {
        self.consumed.contains(&index)
    }
}

/// A run of consecutive same-style lines merged into one candidate.
#[derive(Debug)]
struct TitleRun {
    indices: Vec<usize>,
    text: String,
    font_size: f32,
}

/// Detect the title among the lines of `first_page`.
///
/// Prefers the largest text in the top half of the page, merging consecutive
/// lines of the same style. Falls back to the largest line anywhere on the
/// page when nothing in the top half is larger than body text.
pub fn detect_title(
    lines: &[TextLine],
    first_page: u32,
    profile: &FontProfile,
    max_chars: usize,
) -> TitleMatch {
    let eligible: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| l.page == first_page)
        .filter(|(_, l)| !is_page_number(&l.text) && !is_navigation_text(&l.text))
        .map(|(i, _)| i)
        .collect();
    if eligible.is_empty() {
        return TitleMatch::default();
    }

    let top_half: Vec<usize> = eligible
        .iter()
        .copied()
        .filter(|&i| lines[i].relative_y() < 0.5)
        .collect();
    let runs = merge_runs(lines, &top_half);

    let best = runs
        .iter()
        .map(|r| r.font_size)
        .fold(f32::NEG_INFINITY, f32::max);

    let chosen = if best > profile.body_size + 0.05 {
        runs.into_iter()
            .filter(|r| best - r.font_size <= 0.1)
            .fold(None, |acc: Option<TitleRun>, run| match acc {
                Some(a) if a.text.chars().count() >= run.text.chars().count() => Some(a),
                _ => Some(run),
            })
    } else {
        largest_line(lines, &eligible)
    };

    match chosen {
        Some(run) => {
            let text = truncate_chars(&run.text, max_chars);
            log::debug!("Detected title {:?} ({:.1}pt)", text, run.font_size);
            TitleMatch {
                text,
                consumed: run.indices,
                font_size: run.font_size,
            }
        }
        None => TitleMatch::default(),
    }
}

/// Merge consecutive lines with matching style into runs.
fn merge_runs(lines: &[TextLine], indices: &[usize]) -> Vec<TitleRun> {
    let mut runs: Vec<TitleRun> = Vec::new();

    for &i in indices {
        let line = &lines[i];
        if let Some(run) = runs.last_mut() {
            let last = run.indices.last().map(|&j| &lines[j]);
            let continues = last.is_some_and(|prev| {
                (prev.font_size - line.font_size).abs() <= SAME_STYLE_TOLERANCE
                    && prev.bold == line.bold
                    && line.y_position - prev.bottom <= line.font_size
                    && line.y_position >= prev.y_position
            });
            if continues {
                run.text.push(' ');
                run.text.push_str(&line.text);
                run.indices.push(i);
                continue;
            }
        }
        runs.push(TitleRun {
            indices: vec![i],
            text: line.text.clone(),
            font_size: line.font_size,
        });
    }

    runs
}

/// The single largest line, longest text on ties.
fn largest_line(lines: &[TextLine], indices: &[usize]) -> Option<TitleRun> {
    indices
        .iter()
        .copied()
        .fold(None, |acc: Option<usize>, i| match acc {
            Some(a) => {
                let (best, cand) = (&lines[a], &lines[i]);
                let larger = cand.font_size > best.font_size;
                let longer = cand.font_size == best.font_size && cand.char_count() > best.char_count();
                if larger || longer {
                    Some(i)
                } else {
                    Some(a)
                }
            }
            None => Some(i),
        })
        .map(|i| TitleRun {
            indices: vec![i],
            text: lines[i].text.clone(),
            font_size: lines[i].font_size,
        })
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    truncated.trim_end().to_string()
}
