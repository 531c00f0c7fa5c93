//! Extraction options and scoring weights.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Options controlling title and outline extraction.
///
/// Every field has a documented default; a JSON calibration file may
/// override any subset of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Minimum candidate score for a line to become a heading
    pub acceptance_threshold: f32,

    /// Signal weights used by the scorer
    pub weights: ScoreWeights,

    /// Lines shorter than this are never headings
    pub min_heading_chars: usize,

    /// Lines longer than this receive the length penalty
    pub max_heading_chars: usize,

    /// Maximum number of outline entries
    pub max_outline_entries: usize,

    /// Distinct pages a line must recur on to count as a running header/footer
    pub min_repeat_pages: usize,

    /// Title length limit in characters
    pub max_title_chars: usize,

    /// Drop the outline of forms, invitations and flyers
    pub suppress_form_outlines: bool,

    /// Whether batch extraction runs documents in parallel
    pub parallel: bool,
}

impl ExtractOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the acceptance threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.acceptance_threshold = threshold;
        self
    }

    /// Set the scoring weights.
    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set the heading length bounds.
    pub fn with_heading_chars(mut self, min: usize, max: usize) -> Self {
        self.min_heading_chars = min;
        self.max_heading_chars = max;
        self
    }

    /// Set the maximum outline size.
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_outline_entries = max;
        self
    }

    /// Set the header/footer recurrence minimum.
    pub fn with_min_repeat_pages(mut self, pages: usize) -> Self {
        self.min_repeat_pages = pages;
        self
    }

    /// Set the title length limit.
    pub fn with_max_title_chars(mut self, chars: usize) -> Self {
        self.max_title_chars = chars;
        self
    }

    /// Keep outlines of forms and flyers.
    pub fn keep_form_outlines(mut self) -> Self {
        self.suppress_form_outlines = false;
        self
    }

    /// Enable or disable parallel batch processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel batch processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Load options from a JSON string, falling back to defaults for missing fields.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)
            .map_err(|e| Error::InvalidOptions(format!("malformed options: {}", e)))?;
        options.validate()?;
        Ok(options)
    }

    /// Check that all values are usable.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.acceptance_threshold) {
            return Err(Error::InvalidOptions(format!(
                "acceptance_threshold must be within [0, 1], got {}",
                self.acceptance_threshold
            )));
        }
        if self.max_outline_entries == 0 {
            return Err(Error::InvalidOptions(
                "max_outline_entries must be at least 1".to_string(),
            ));
        }
        if self.min_repeat_pages == 0 {
            return Err(Error::InvalidOptions(
                "min_repeat_pages must be at least 1".to_string(),
            ));
        }
        if self.min_heading_chars > self.max_heading_chars {
            return Err(Error::InvalidOptions(format!(
                "min_heading_chars ({}) exceeds max_heading_chars ({})",
                self.min_heading_chars, self.max_heading_chars
            )));
        }
        self.weights.validate()
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            acceptance_threshold: 0.45,
            weights: ScoreWeights::default(),
            min_heading_chars: 3,
            max_heading_chars: 120,
            max_outline_entries: 50,
            min_repeat_pages: 3,
            max_title_chars: 150,
            suppress_form_outlines: true,
            parallel: true,
        }
    }
}

/// Weights of the individual heading signals.
///
/// Each signal is capped below the default acceptance threshold, so a line
/// needs at least two agreeing signals to become a heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Size ratio >= 1.8
    pub size_strong: f32,
    /// Size ratio >= 1.4
    pub size_medium: f32,
    /// Size ratio >= 1.15
    pub size_weak: f32,
    /// Penalty for text smaller than body (ratio < 0.9)
    pub size_small_penalty: f32,

    pub bold: f32,

    pub numbered: f32,
    pub keyword: f32,
    pub enumerative: f32,
    pub colon_terminated: f32,
    pub all_caps: f32,

    /// Line starts at the page's left margin
    pub left_margin: f32,
    /// Line follows a wider than usual vertical gap
    pub paragraph_gap: f32,

    /// Penalty for lines over the maximum heading length
    pub length_penalty: f32,
    /// Penalty for lines that read like running prose
    pub prose_penalty: f32,
}

impl ScoreWeights {
    fn validate(&self) -> Result<()> {
        let named = [
            ("size_strong", self.size_strong),
            ("size_medium", self.size_medium),
            ("size_weak", self.size_weak),
            ("size_small_penalty", self.size_small_penalty),
            ("bold", self.bold),
            ("numbered", self.numbered),
            ("keyword", self.keyword),
            ("enumerative", self.enumerative),
            ("colon_terminated", self.colon_terminated),
            ("all_caps", self.all_caps),
            ("left_margin", self.left_margin),
            ("paragraph_gap", self.paragraph_gap),
            ("length_penalty", self.length_penalty),
            ("prose_penalty", self.prose_penalty),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidOptions(format!(
                    "weight {} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            size_strong: 0.40,
            size_medium: 0.30,
            size_weak: 0.15,
            size_small_penalty: 0.15,
            bold: 0.15,
            numbered: 0.35,
            keyword: 0.25,
            enumerative: 0.20,
            colon_terminated: 0.15,
            all_caps: 0.15,
            left_margin: 0.10,
            paragraph_gap: 0.10,
            length_penalty: 0.70,
            prose_penalty: 0.35,
        }
    }
}
