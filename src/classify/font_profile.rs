//! Document-wide font size statistics.

use std::collections::BTreeMap;

use crate::model::TextLine;

/// Percentiles kept in every profile.
pub const PROFILE_PERCENTILES: [u8; 3] = [75, 90, 95];

/// Sizes closer than this are treated as the same tier.
const TIER_TOLERANCE: f32 = 0.5;

/// Font size statistics for heading detection.
#[derive(Debug, Clone, PartialEq)]
pub struct FontProfile {
    /// Body text font size (character-weighted mode)
    pub body_size: f32,
    /// Character-weighted size percentiles
    pub size_percentiles: BTreeMap<u8, f32>,
    /// Largest observed size
    pub max_size: f32,
    /// H1, H2 and H3 size cutoffs, descending
    pub tier_thresholds: [f32; 3],
}

impl FontProfile {
    /// Build a profile from lines. Returns `None` when there are no lines.
    pub fn from_lines(lines: &[TextLine]) -> Option<Self> {
        let mut histogram: BTreeMap<i32, usize> = BTreeMap::new();
        for line in lines {
            let key = size_key(line.font_size);
            *histogram.entry(key).or_insert(0) += line.char_count().max(1);
        }
        if histogram.is_empty() {
            return None;
        }

        // BTreeMap iterates ascending, so on equal weight the smaller size wins.
        let body_key = histogram
            .iter()
            .fold(None, |best: Option<(i32, usize)>, (&key, &count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((key, count)),
            })
            .map(|(key, _)| key)?;
        let body_size = key_size(body_key);
        let max_size = histogram.keys().next_back().map(|k| key_size(*k))?;

        let total: usize = histogram.values().sum();
        let size_percentiles = PROFILE_PERCENTILES
            .iter()
            .map(|&p| (p, weighted_percentile(&histogram, total, p)))
            .collect();

        let tier_thresholds = tier_ladder(&histogram, body_size);

        let profile = Self {
            body_size,
            size_percentiles,
            max_size,
            tier_thresholds,
        };
        log::debug!(
            "Font profile: body={:.1}, max={:.1}, tiers={:?}, percentiles={:?}",
            profile.body_size,
            profile.max_size,
            profile.tier_thresholds,
            profile.size_percentiles
        );
        Some(profile)
    }

    /// Ratio of a font size to the body size.
    pub fn size_ratio(&self, font_size: f32) -> f32 {
        if self.body_size > 0.0 {
            font_size / self.body_size
        } else {
            1.0
        }
    }

    /// Percentile size, if that percentile is tracked.
    pub fn percentile(&self, p: u8) -> Option<f32> {
        self.size_percentiles.get(&p).copied()
    }

    /// Whether every line uses the same size.
    pub fn is_degenerate(&self) -> bool {
        (self.max_size - self.body_size).abs() < f32::EPSILON
    }

    /// Size tier (1..=3) a font size reaches, or 4 when it reaches none.
    ///
    /// A degenerate profile puts every size in tier 4.
    pub fn size_tier(&self, font_size: f32) -> usize {
        for (i, threshold) in self.tier_thresholds.iter().enumerate() {
            if *threshold > self.body_size + TIER_TOLERANCE
                && font_size >= threshold - TIER_TOLERANCE
            {
                return i + 1;
            }
        }
        4
    }
}

fn size_key(size: f32) -> i32 {
    (size * 10.0).round() as i32 // Round to 0.1 precision
}

fn key_size(key: i32) -> f32 {
    key as f32 / 10.0
}

/// Nearest-rank percentile over the weighted histogram.
fn weighted_percentile(histogram: &BTreeMap<i32, usize>, total: usize, p: u8) -> f32 {
    let rank = ((p as f32 / 100.0) * total as f32).ceil().max(1.0) as usize;
    let mut seen = 0;
    for (&key, &count) in histogram {
        seen += count;
        if seen >= rank {
            return key_size(key);
        }
    }
    histogram.keys().next_back().map(|k| key_size(*k)).unwrap_or(0.0)
}

/// The three largest size clusters above body, padded with the body size.
fn tier_ladder(histogram: &BTreeMap<i32, usize>, body_size: f32) -> [f32; 3] {
    let mut tiers: Vec<f32> = Vec::with_capacity(3);
    for size in histogram.keys().rev().map(|k| key_size(*k)) {
        if size <= body_size + TIER_TOLERANCE {
            break;
        }
        let joins_last = tiers
            .last()
            .map(|last| last - size <= TIER_TOLERANCE)
            .unwrap_or(false);
        if !joins_last {
            tiers.push(size);
            if tiers.len() == 3 {
                break;
            }
        }
    }
    let mut ladder = [body_size; 3];
    for (slot, size) in ladder.iter_mut().zip(tiers) {
        *slot = size;
    }
    ladder
}
