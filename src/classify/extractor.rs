//! The extraction pipeline.

use crate::classify::collector::collect_lines;
use crate::classify::doc_kind::DocumentKind;
use crate::classify::font_profile::FontProfile;
use crate::classify::hierarchy::assign_levels;
use crate::classify::noise::filter_noise;
use crate::classify::options::ExtractOptions;
use crate::classify::postprocess::finalize;
use crate::classify::scorer::HeadingScorer;
use crate::classify::title::detect_title;
use crate::model::{ExtractionResult, RawDocument};

/// Extracts a title and outline from a decoded document.
///
/// Stages run strictly in order: collect, filter noise, profile fonts,
/// detect the title, score candidates, assign levels, post-process. The
/// extractor holds no per-document state and can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct OutlineExtractor {
    options: ExtractOptions,
}

impl OutlineExtractor {
    /// Create an extractor with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor with custom options.
    pub fn with_options(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// Get the extraction options.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Run the pipeline on one document.
    ///
    /// A document without usable text yields an empty result.
    pub fn extract(&self, doc: &RawDocument) -> ExtractionResult {
        let lines = collect_lines(doc);
        let (lines, _) = filter_noise(lines, self.options.min_repeat_pages);

        let Some(profile) = FontProfile::from_lines(&lines) else {
            log::debug!("No usable lines; returning empty result");
            return ExtractionResult::empty();
        };

        let first_page = doc.pages.first().map(|p| p.number).unwrap_or_default();
        let title = detect_title(&lines, first_page, &profile, self.options.max_title_chars);

        let kind = DocumentKind::detect(&lines);
        if self.options.suppress_form_outlines && kind.is_visual() {
            log::debug!("Skipping outline for {:?} document", kind);
            return ExtractionResult {
                title: title.text,
                outline: Vec::new(),
            };
        }

        let scorer = HeadingScorer::new(&lines, &profile, &self.options);
        let mut candidates = scorer.candidates(&lines, &title);
        assign_levels(&mut candidates, &profile);
        let outline = finalize(candidates, self.options.max_outline_entries);

        log::debug!("Extracted {} outline entries", outline.len());
        ExtractionResult {
            title: title.text,
            outline,
        }
    }
}
