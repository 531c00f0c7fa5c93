//! Document model types.
//!
//! Input blocks come from an upstream decoder, lines are the normalized
//! intermediate form, and the outline types are the extraction output.

mod input;
mod line;
mod outline;

pub use input::{BoundingBox, RawBlock, RawDocument, RawPage, RawSpan};
pub use line::TextLine;
pub use outline::{ExtractionResult, HeadingLevel, OutlineEntry};
