//! # unoutline
//!
//! Title and heading outline extraction for PDF documents.
//!
//! This library takes text blocks already decoded from a PDF (text, bounding
//! box, font size, bold/italic flags) and produces the document title plus a
//! hierarchical H1–H4 outline with page numbers.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unoutline::{extract_file, render};
//!
//! fn main() -> unoutline::Result<()> {
//!     // Read a block dump produced by a PDF decoder
//!     let result = extract_file("document.json")?;
//!
//!     // Serialize the outline
//!     let json = render::to_json(&result, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Collector**: splits blocks into normalized lines
//! - **Noise filter**: drops running headers, footers and page numbers
//! - **Font profile**: body size, percentiles and size tiers
//! - **Title detection**: dominant text on the first page
//! - **Scoring**: size, boldness, pattern and position signals
//! - **Hierarchy**: numbering depth, size tiers and structural cues
//! - **Post-processing**: deduplication, size cap and reading order

pub mod classify;
pub mod error;
pub mod model;
pub mod render;

// Re-export commonly used types
pub use classify::{DocumentKind, ExtractOptions, FontProfile, OutlineExtractor, ScoreWeights};
pub use error::{Error, Result};
pub use model::{
    BoundingBox, ExtractionResult, HeadingLevel, OutlineEntry, RawBlock, RawDocument, RawPage,
    RawSpan, TextLine,
};
pub use render::JsonFormat;

use std::path::Path;

use rayon::prelude::*;

/// Extract the title and outline of a document with default options.
///
/// # Example
///
/// ```
/// use unoutline::{extract, RawBlock, RawDocument, RawPage};
///
/// let page = RawPage::letter(1)
///     .with_block(RawBlock::new("Annual Report", 24.0).with_bbox(72.0, 60.0, 400.0, 88.0));
/// let result = extract(&RawDocument::new().with_page(page));
/// assert_eq!(result.title, "Annual Report");
/// ```
pub fn extract(doc: &RawDocument) -> ExtractionResult {
    OutlineExtractor::new().extract(doc)
}

/// Extract with custom options.
///
/// # Example
///
/// ```
/// use unoutline::{extract_with_options, ExtractOptions, RawDocument};
///
/// let options = ExtractOptions::new().with_threshold(0.5).with_max_entries(20);
/// let result = extract_with_options(&RawDocument::new(), &options).unwrap();
/// assert!(result.is_empty());
/// ```
pub fn extract_with_options(doc: &RawDocument, options: &ExtractOptions) -> Result<ExtractionResult> {
    options.validate()?;
    Ok(OutlineExtractor::with_options(options.clone()).extract(doc))
}

/// Parse a JSON block dump and extract from it.
///
/// # Arguments
///
/// * `json` - A serialized [`RawDocument`]
pub fn extract_json(json: &str) -> Result<ExtractionResult> {
    let doc = parse_document(json)?;
    Ok(extract(&doc))
}

/// Read a JSON block dump from disk and extract from it.
///
/// # Example
///
/// ```no_run
/// use unoutline::extract_file;
///
/// let result = extract_file("report.json").unwrap();
/// println!("{} headings", result.outline.len());
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<ExtractionResult> {
    let doc = read_document(path)?;
    Ok(extract(&doc))
}

/// Parse a JSON block dump.
pub fn parse_document(json: &str) -> Result<RawDocument> {
    serde_json::from_str(json).map_err(|e| Error::InvalidInput(format!("malformed block dump: {}", e)))
}

/// Read and parse a JSON block dump from disk.
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<RawDocument> {
    let data = std::fs::read_to_string(path.as_ref())?;
    parse_document(&data)
}

/// Extract from many independent documents.
///
/// Runs on the rayon thread pool when `options.parallel` is set. Results keep
/// the input order.
pub fn extract_batch(docs: &[RawDocument], options: &ExtractOptions) -> Result<Vec<ExtractionResult>> {
    options.validate()?;
    let extractor = OutlineExtractor::with_options(options.clone());
    let results: Vec<ExtractionResult> = if options.parallel {
        docs.par_iter().map(|doc| extractor.extract(doc)).collect()
    } else {
        docs.iter().map(|doc| extractor.extract(doc)).collect()
    };
    Ok(results)
}
