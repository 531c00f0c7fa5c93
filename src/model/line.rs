//! Normalized text lines.

/// A single text line on one page.
///
/// Produced by the collector and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Normalized line text (NFC, collapsed whitespace, trimmed)
    pub text: String,
    /// Page number as reported by the decoder
    pub page: u32,
    /// Font size in points, always positive
    pub font_size: f32,
    /// Predominantly bold
    pub bold: bool,
    /// Predominantly italic
    pub italic: bool,
    /// Left edge
    pub x_position: f32,
    /// Top edge, growing downward
    pub y_position: f32,
    /// Bottom edge
    pub bottom: f32,
    /// Height of the containing page
    pub page_height: f32,
}

impl TextLine {
    /// Create a line with default geometry.
    pub fn new(text: impl Into<String>, page: u32, font_size: f32) -> Self {
        Self {
            text: text.into(),
            page,
            font_size,
            bold: false,
            italic: false,
            x_position: 0.0,
            y_position: 0.0,
            bottom: font_size,
            page_height: 792.0,
        }
    }

    /// Set the vertical position, keeping the line height at the font size.
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x_position = x;
        self.y_position = y;
        self.bottom = y + self.font_size;
        self
    }

    /// Mark the line as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Number of characters in the text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Top edge as a fraction of the page height.
    pub fn relative_y(&self) -> f32 {
        if self.page_height > 0.0 {
            self.y_position / self.page_height
        } else {
            0.0
        }
    }
}
