//! Block collection: raw decoder blocks to normalized text lines.
//!
//! Blocks with a span breakdown are regrouped span by span, splitting on
//! vertical movement and font-size changes. Blocks without spans are split on
//! embedded newlines and their height is shared evenly between the lines.

use std::collections::BTreeMap;

use unicode_normalization::UnicodeNormalization;

use crate::model::{RawBlock, RawDocument, RawSpan, TextLine};

/// Size used when the document carries no usable font size at all.
const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Flatten a document into lines in page and block order.
pub fn collect_lines(doc: &RawDocument) -> Vec<TextLine> {
    let fallback_size = modal_block_size(doc);
    let doc_height = max_bottom(doc);
    let mut lines = Vec::new();

    for page in &doc.pages {
        let page_height = page
            .height
            .filter(|h| h.is_finite() && *h > 0.0)
            .unwrap_or(doc_height);

        for block in &page.blocks {
            let block_size = resolve_size(block.font_size, fallback_size);
            let ctx = LineContext {
                page: page.number,
                page_height,
                block_size,
            };
            if block.spans.is_empty() {
                lines.extend(lines_from_text(block, &ctx));
            } else {
                lines.extend(lines_from_spans(&block.spans, &ctx));
            }
        }
    }

    log::debug!(
        "Collected {} lines from {} pages ({} blocks)",
        lines.len(),
        doc.page_count(),
        doc.block_count()
    );
    lines
}

/// Normalize text: NFC, collapsed whitespace, trimmed.
pub fn normalize_text(text: &str) -> String {
    let composed: String = text.nfc().collect();
    composed.split_whitespace().collect::<Vec<_>>().join(" ")
}

struct LineContext {
    page: u32,
    page_height: f32,
    block_size: f32,
}

fn resolve_size(size: f32, fallback: f32) -> f32 {
    if size.is_finite() && size > 0.0 {
        size
    } else {
        fallback
    }
}

/// Character-weighted most common known font size over blocks and spans.
fn modal_block_size(doc: &RawDocument) -> f32 {
    let mut histogram: BTreeMap<i32, usize> = BTreeMap::new();
    let mut observe = |size: f32, text: &str| {
        if size.is_finite() && size > 0.0 {
            let key = (size * 10.0).round() as i32;
            *histogram.entry(key).or_insert(0) += text.chars().count().max(1);
        }
    };

    for block in doc.pages.iter().flat_map(|p| &p.blocks) {
        if block.spans.is_empty() {
            observe(block.font_size, &block.text);
        } else {
            for span in &block.spans {
                let size = if span.font_size > 0.0 {
                    span.font_size
                } else {
                    block.font_size
                };
                observe(size, &span.text);
            }
        }
    }

    // BTreeMap iterates ascending, so on equal weight the smaller size wins.
    histogram
        .iter()
        .fold(None, |best: Option<(i32, usize)>, (&key, &count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((key, count)),
        })
        .map(|(key, _)| key as f32 / 10.0)
        .unwrap_or(DEFAULT_FONT_SIZE)
}

fn max_bottom(doc: &RawDocument) -> f32 {
    doc.pages
        .iter()
        .flat_map(|p| &p.blocks)
        .flat_map(|b| std::iter::once(b.bbox.y1).chain(b.spans.iter().map(|s| s.bbox.y1)))
        .filter(|y| y.is_finite())
        .fold(0.0, f32::max)
}

fn lines_from_text(block: &RawBlock, ctx: &LineContext) -> Vec<TextLine> {
    let texts: Vec<String> = block
        .text
        .lines()
        .map(normalize_text)
        .filter(|t| !t.is_empty())
        .collect();
    if texts.is_empty() {
        return Vec::new();
    }

    let height = block.bbox.height();
    let line_height = if height > 0.0 {
        height / texts.len() as f32
    } else {
        ctx.block_size
    };

    texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let y = block.bbox.y0 + i as f32 * line_height;
            TextLine {
                text,
                page: ctx.page,
                font_size: ctx.block_size,
                bold: block.bold,
                italic: block.italic,
                x_position: block.bbox.x0,
                y_position: y,
                bottom: y + line_height,
                page_height: ctx.page_height,
            }
        })
        .collect()
}

/// A span with its font size resolved.
struct SizedSpan<'a> {
    span: &'a RawSpan,
    size: f32,
}

fn lines_from_spans(spans: &[RawSpan], ctx: &LineContext) -> Vec<TextLine> {
    let mut lines = Vec::new();
    let mut current: Vec<SizedSpan> = Vec::new();

    for span in spans.iter().filter(|s| !s.text.trim().is_empty()) {
        let size = resolve_size(span.font_size, ctx.block_size);
        if let Some(first) = current.first() {
            let y_tolerance = size * 0.3;
            let same_line = (span.bbox.y0 - first.span.bbox.y0).abs() <= y_tolerance
                && (size - first.size).abs() <= 1.0;
            if !same_line {
                lines.extend(build_line(&current, ctx));
                current.clear();
            }
        }
        current.push(SizedSpan { span, size });
    }
    if !current.is_empty() {
        lines.extend(build_line(&current, ctx));
    }

    lines
}

fn build_line(spans: &[SizedSpan], ctx: &LineContext) -> Option<TextLine> {
    let text = normalize_text(&join_spans(spans));
    if text.is_empty() {
        return None;
    }

    let total_chars: usize = spans.iter().map(|s| s.span.text.chars().count()).sum();
    let weighted_size: f32 = spans
        .iter()
        .map(|s| s.size * s.span.text.chars().count() as f32)
        .sum();
    let font_size = if total_chars > 0 {
        weighted_size / total_chars as f32
    } else {
        spans[0].size
    };

    let bold_chars: usize = spans
        .iter()
        .filter(|s| s.span.bold)
        .map(|s| s.span.text.chars().count())
        .sum();
    let italic_chars: usize = spans
        .iter()
        .filter(|s| s.span.italic)
        .map(|s| s.span.text.chars().count())
        .sum();

    let x = spans
        .iter()
        .map(|s| s.span.bbox.x0)
        .fold(f32::INFINITY, f32::min);
    let y = spans
        .iter()
        .map(|s| s.span.bbox.y0)
        .fold(f32::INFINITY, f32::min);
    let bottom = spans
        .iter()
        .map(|s| s.span.bbox.y1.max(s.span.bbox.y0 + s.size * 0.5))
        .fold(f32::NEG_INFINITY, f32::max);

    Some(TextLine {
        text,
        page: ctx.page,
        font_size,
        bold: bold_chars * 2 > total_chars,
        italic: italic_chars * 2 > total_chars,
        x_position: x,
        y_position: y,
        bottom,
        page_height: ctx.page_height,
    })
}

/// Join span texts, inserting a space where the horizontal gap suggests one.
fn join_spans(spans: &[SizedSpan]) -> String {
    let mut result = String::new();

    for (i, current) in spans.iter().enumerate() {
        let span = current.span;
        if i == 0 {
            result.push_str(&span.text);
            continue;
        }
        let prev = spans[i - 1].span;

        // Without horizontal extents the gap is unknown; assume a word break.
        let has_geometry = prev.bbox.width() > 0.0 || span.bbox.width() > 0.0;
        let gap = span.bbox.x0 - prev.bbox.x1;

        let char_count = span.text.chars().count();
        let avg_char_width = if char_count > 0 && span.bbox.width() > 0.0 {
            span.bbox.width() / char_count as f32
        } else {
            current.size * 0.5
        };

        let prev_spaceless = prev
            .text
            .chars()
            .last()
            .map(is_spaceless_script_char)
            .unwrap_or(false);
        let curr_spaceless = span
            .text
            .chars()
            .next()
            .map(is_spaceless_script_char)
            .unwrap_or(false);

        let wide_gap = !has_geometry || gap > avg_char_width * 0.2;
        let already_spaced = prev.text.ends_with(char::is_whitespace)
            || span.text.starts_with(char::is_whitespace);

        if wide_gap && !(prev_spaceless && curr_spaceless) && !already_spaced {
            result.push(' ');
        }
        result.push_str(&span.text);
    }

    result
}

/// Check if character is from a script that doesn't use word spaces.
///
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and Extension A
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    // CJK Unified Ideographs Extension B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}
