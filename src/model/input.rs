//! Raw text block input, as produced by an upstream PDF decoder.
//!
//! Coordinates use a top-left origin with y increasing downward. Page numbers
//! are passed through to the outline untouched.

use serde::{Deserialize, Serialize};

/// A decoded document: ordered pages of ordered text blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    /// Pages in reading order
    #[serde(default)]
    pub pages: Vec<RawPage>,
}

impl RawDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: RawPage) {
        self.pages.push(page);
    }

    /// Builder form of [`RawDocument::add_page`].
    pub fn with_page(mut self, page: RawPage) -> Self {
        self.pages.push(page);
        self
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of blocks across all pages.
    pub fn block_count(&self) -> usize {
        self.pages.iter().map(|p| p.blocks.len()).sum()
    }
}

/// A single page of text blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPage {
    /// Page number as reported by the decoder
    pub number: u32,

    /// Page width in points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,

    /// Page height in points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,

    /// Text blocks in decoder order
    #[serde(default)]
    pub blocks: Vec<RawBlock>,
}

impl RawPage {
    /// Create a page without known dimensions.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            ..Default::default()
        }
    }

    /// Create a US Letter page (612 x 792 points).
    pub fn letter(number: u32) -> Self {
        Self::new(number).with_size(612.0, 792.0)
    }

    /// Set page dimensions.
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Add a block to the page.
    pub fn add_block(&mut self, block: RawBlock) {
        self.blocks.push(block);
    }

    /// Builder form of [`RawPage::add_block`].
    pub fn with_block(mut self, block: RawBlock) -> Self {
        self.blocks.push(block);
        self
    }
}

/// A text block with its dominant font metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBlock {
    /// Block text, possibly spanning several lines
    #[serde(default)]
    pub text: String,

    /// Block bounding box
    #[serde(default)]
    pub bbox: BoundingBox,

    /// Dominant font size in points (0 = unknown)
    #[serde(default)]
    pub font_size: f32,

    /// Dominant font is bold
    #[serde(default)]
    pub bold: bool,

    /// Dominant font is italic
    #[serde(default)]
    pub italic: bool,

    /// Optional per-span breakdown of the block
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spans: Vec<RawSpan>,
}

impl RawBlock {
    /// Create a block with text and font size.
    pub fn new(text: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            font_size,
            ..Default::default()
        }
    }

    /// Set the bounding box.
    pub fn with_bbox(mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        self.bbox = BoundingBox::new(x0, y0, x1, y1);
        self
    }

    /// Mark the block as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Mark the block as italic.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Add a span.
    pub fn with_span(mut self, span: RawSpan) -> Self {
        self.spans.push(span);
        self
    }
}

/// A run of text in a single font.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSpan {
    /// Span text
    #[serde(default)]
    pub text: String,

    /// Span bounding box
    #[serde(default)]
    pub bbox: BoundingBox,

    /// Font size in points (0 = inherit from block)
    #[serde(default)]
    pub font_size: f32,

    /// Bold font
    #[serde(default)]
    pub bold: bool,

    /// Italic font
    #[serde(default)]
    pub italic: bool,
}

impl RawSpan {
    /// Create a span with text, font size and bounding box.
    pub fn new(text: impl Into<String>, font_size: f32, bbox: BoundingBox) -> Self {
        Self {
            text: text.into(),
            bbox,
            font_size,
            ..Default::default()
        }
    }

    /// Mark the span as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// Axis-aligned rectangle, serialized as `[x0, y0, x1, y1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    /// Create a bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width, never negative.
    pub fn width(&self) -> f32 {
        (self.x1 - self.x0).max(0.0)
    }

    /// Height, never negative.
    pub fn height(&self) -> f32 {
        (self.y1 - self.y0).max(0.0)
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from([x0, y0, x1, y1]: [f32; 4]) -> Self {
        Self { x0, y0, x1, y1 }
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x0, b.y0, b.x1, b.y1]
    }
}
