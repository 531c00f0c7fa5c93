//! Outline cleanup: duplicate removal, size cap and reading order.

use crate::classify::scorer::Candidate;
use crate::model::{HeadingLevel, OutlineEntry};

/// Key used to spot repeated headings.
pub fn dedupe_key(text: &str) -> String {
    let lower = text.to_lowercase();
    let collapsed = lower.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_end_matches(|c: char| c == ':' || c == '.' || c.is_whitespace())
        .to_string()
}

/// Drop repeats of the same heading on the same or an adjacent page.
///
/// Candidates must be in reading order; the first occurrence is kept.
pub fn dedupe(candidates: Vec<Candidate<'_>>) -> Vec<Candidate<'_>> {
    let mut kept: Vec<(String, Candidate)> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let key = dedupe_key(&candidate.line.text);
        let is_repeat = kept
            .iter()
            .any(|(k, c)| *k == key && c.line.page.abs_diff(candidate.line.page) <= 1);
        if is_repeat {
            log::debug!("Dropping duplicate heading {:?}", candidate.line.text);
        } else {
            kept.push((key, candidate));
        }
    }
    kept.into_iter().map(|(_, c)| c).collect()
}

/// Keep at most `max` candidates, dropping the lowest scores first.
///
/// Later candidates go first among equal scores. An H1 survives whenever
/// one was present. Input order is preserved.
pub fn cap(mut candidates: Vec<Candidate<'_>>, max: usize) -> Vec<Candidate<'_>> {
    if candidates.len() <= max {
        return candidates;
    }
    let dropped = candidates.len() - max;

    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| {
        candidates[b]
            .score
            .total_cmp(&candidates[a].score)
            .then(a.cmp(&b))
    });
    let mut keep = vec![false; candidates.len()];
    for &i in order.iter().take(max) {
        keep[i] = true;
    }

    let has_h1 = |c: &Candidate| c.level == Some(HeadingLevel::H1);
    let lost_h1 = !candidates
        .iter()
        .zip(&keep)
        .any(|(c, &k)| k && has_h1(c));
    if lost_h1 {
        if let Some(best_h1) = order.iter().copied().find(|&i| has_h1(&candidates[i])) {
            // Swap out the weakest kept candidate.
            if let Some(weakest) = order.iter().take(max).copied().last() {
                keep[weakest] = false;
            }
            keep[best_h1] = true;
        }
    }

    log::debug!("Outline capped at {} entries ({} dropped)", max, dropped);
    let mut flags = keep.into_iter();
    candidates.retain(|_| flags.next().unwrap_or(false));
    candidates
}

/// Stable sort into reading order: page, then vertical position.
pub fn sort_reading_order(candidates: &mut [Candidate<'_>]) {
    candidates.sort_by(|a, b| {
        a.line
            .page
            .cmp(&b.line.page)
            .then(a.line.y_position.total_cmp(&b.line.y_position))
            .then(a.index.cmp(&b.index))
    });
}

/// Sort, dedupe and cap candidates into outline entries.
pub fn finalize(mut candidates: Vec<Candidate<'_>>, max_entries: usize) -> Vec<OutlineEntry> {
    sort_reading_order(&mut candidates);
    let mut candidates = cap(dedupe(candidates), max_entries);
    sort_reading_order(&mut candidates);
    candidates
        .into_iter()
        .map(|c| {
            OutlineEntry::new(
                c.level.unwrap_or(HeadingLevel::H4),
                c.line.text.clone(),
                c.line.page,
            )
        })
        .collect()
}
