//! Heading classification pipeline.
//!
//! Turns raw text blocks into a title and a leveled outline using font
//! statistics, text patterns and position heuristics.

mod collector;
mod doc_kind;
mod extractor;
mod font_profile;
mod hierarchy;
mod noise;
mod options;
mod patterns;
mod postprocess;
mod scorer;
mod title;

pub use collector::{collect_lines, normalize_text};
pub use doc_kind::DocumentKind;
pub use extractor::OutlineExtractor;
pub use font_profile::{FontProfile, PROFILE_PERCENTILES};
pub use hierarchy::{assign_level, assign_levels};
pub use noise::{filter_noise, is_page_number, recurrence_key, NoiseReport};
pub use options::{ExtractOptions, ScoreWeights};
pub use patterns::{classify, PatternMatch};
pub use postprocess::{dedupe, dedupe_key, finalize};
pub use scorer::{median_line_gap, Candidate, HeadingScorer};
pub use title::{detect_title, TitleMatch};
