//! Heading level assignment.

use crate::classify::font_profile::FontProfile;
use crate::classify::patterns::PatternMatch;
use crate::classify::scorer::Candidate;
use crate::model::HeadingLevel;

/// Level for a single candidate.
///
/// Numbering depth decides first, enumerative lead-ins are always H4, and
/// everything else falls into the font size tier. Structural keywords never
/// sit deeper than H2.
pub fn assign_level(candidate: &Candidate, profile: &FontProfile) -> HeadingLevel {
    match candidate.pattern {
        PatternMatch::Numbered { depth } => HeadingLevel::from_depth(depth),
        PatternMatch::Enumerative => HeadingLevel::H4,
        PatternMatch::Keyword => {
            HeadingLevel::from_depth(profile.size_tier(candidate.line.font_size)).min(HeadingLevel::H2)
        }
        _ => HeadingLevel::from_depth(profile.size_tier(candidate.line.font_size)),
    }
}

/// Assign levels to all candidates in place.
pub fn assign_levels(candidates: &mut [Candidate], profile: &FontProfile) {
    for candidate in candidates.iter_mut() {
        candidate.level = Some(assign_level(candidate, profile));
    }
}
