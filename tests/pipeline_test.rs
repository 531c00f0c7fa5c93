//! Integration tests for the extraction pipeline.

use unoutline::render::{to_json, JsonFormat};
use unoutline::{
    extract, extract_with_options, ExtractOptions, HeadingLevel, OutlineEntry, RawBlock,
    RawDocument, RawPage,
};

const BODY_SIZE: f32 = 10.0;

/// Builds documents line by line with realistic spacing.
///
/// Lines are 2pt taller than their font size and separated by 2pt, so body
/// text sits on a 14pt pitch.
struct DocBuilder {
    doc: RawDocument,
    y: f32,
    filler: usize,
}

impl DocBuilder {
    fn new() -> Self {
        Self {
            doc: RawDocument::new(),
            y: 72.0,
            filler: 0,
        }
    }

    fn page(mut self, number: u32) -> Self {
        self.doc.add_page(RawPage::letter(number));
        self.y = 72.0;
        self
    }

    fn line(mut self, text: &str, size: f32, bold: bool) -> Self {
        let height = size + 2.0;
        let mut block = RawBlock::new(text, size).with_bbox(72.0, self.y, 500.0, self.y + height);
        if bold {
            block = block.bold();
        }
        if let Some(page) = self.doc.pages.last_mut() {
            page.add_block(block);
        }
        self.y += height + 2.0;
        self
    }

    fn line_at(mut self, text: &str, size: f32, bold: bool, y: f32) -> Self {
        self.y = y;
        self.line(text, size, bold)
    }

    fn gap(mut self, amount: f32) -> Self {
        self.y += amount;
        self
    }

    fn body(mut self, count: usize) -> Self {
        for _ in 0..count {
            let n = self.filler;
            self.filler += 1;
            let tag: String = [b'a' + (n / 26 % 26) as u8, b'a' + (n % 26) as u8]
                .iter()
                .map(|b| *b as char)
                .collect();
            self = self.line(&format!("Body copy {tag} describes widget assembly steps"), BODY_SIZE, false);
        }
        self
    }

    fn build(self) -> RawDocument {
        self.doc
    }
}

/// Three pages with a title and a three-level numbered outline.
///
/// The third-level heading sits mid-page at near body size, with no extra
/// spacing around it.
fn guide_document() -> RawDocument {
    DocBuilder::new()
        .page(1)
        .line("Widget Field Guide", 22.0, true)
        .gap(10.0)
        .body(6)
        .page(2)
        .line("1. Overview", 16.0, true)
        .body(4)
        .gap(10.0)
        .line("1.1 Background", 13.0, false)
        .body(4)
        .page(3)
        .body(3)
        .line("1.1.1 Details", 11.0, false)
        .body(3)
        .build()
}

// ==================== Documented Examples ====================

#[test]
fn test_numbered_outline_levels() {
    let result = extract(&guide_document());

    assert_eq!(result.title, "Widget Field Guide");
    assert_eq!(
        result.outline,
        vec![
            OutlineEntry::new(HeadingLevel::H1, "1. Overview", 2),
            OutlineEntry::new(HeadingLevel::H2, "1.1 Background", 2),
            OutlineEntry::new(HeadingLevel::H3, "1.1.1 Details", 3),
        ]
    );
}

#[test]
fn test_dominant_first_page_line_becomes_title() {
    let doc = DocBuilder::new()
        .page(1)
        .line("Introduction to Widgets", 22.0, false)
        .gap(10.0)
        .body(5)
        .build();
    let result = extract(&doc);

    assert_eq!(result.title, "Introduction to Widgets");
    assert!(result.outline.iter().all(|e| e.page != 1));
}

#[test]
fn test_duplicate_headings_collapse() {
    let doc = DocBuilder::new()
        .page(1)
        .line("Research Notes", 22.0, true)
        .gap(10.0)
        .body(4)
        .page(2)
        .body(4)
        .page(3)
        .body(4)
        .page(4)
        .body(4)
        .page(5)
        .line("References", 15.0, false)
        .body(3)
        .gap(10.0)
        .line("References", 15.0, false)
        .body(2)
        .build();
    let result = extract(&doc);

    let references: Vec<&OutlineEntry> = result.outline.iter().filter(|e| e.text == "References").collect();
    assert_eq!(references.len(), 1);
    assert_eq!(references[0].page, 5);
    assert!(references[0].level <= HeadingLevel::H2);
}

#[test]
fn test_duplicate_keeps_first_in_reading_order() {
    // The lower heading arrives first from the decoder
    let doc = DocBuilder::new()
        .page(1)
        .line("Research Notes", 22.0, true)
        .gap(10.0)
        .body(4)
        .page(2)
        .body(3)
        .line_at("References:", 15.0, false, 500.0)
        .body(2)
        .line_at("REFERENCES", 15.0, false, 300.0)
        .body(2)
        .build();
    let result = extract(&doc);

    let references: Vec<&OutlineEntry> = result
        .outline
        .iter()
        .filter(|e| e.text.eq_ignore_ascii_case("references") || e.text == "References:")
        .collect();
    assert_eq!(references.len(), 1);
    assert_eq!(references[0].text, "REFERENCES");
}

#[test]
fn test_empty_document() {
    let result = extract(&RawDocument::new());
    assert_eq!(to_json(&result, JsonFormat::Compact).unwrap(), r#"{"title":"","outline":[]}"#);

    let blank_pages = RawDocument::new()
        .with_page(RawPage::letter(1))
        .with_page(RawPage::letter(2).with_block(RawBlock::new("   ", 12.0)));
    assert!(extract(&blank_pages).is_empty());
}

// ==================== Properties ====================

#[test]
fn test_determinism() {
    let doc = guide_document();
    let first = to_json(&extract(&doc), JsonFormat::Pretty).unwrap();
    for _ in 0..5 {
        assert_eq!(to_json(&extract(&doc), JsonFormat::Pretty).unwrap(), first);
    }
}

#[test]
fn test_reading_order() {
    let result = extract(&guide_document());
    for pair in result.outline.windows(2) {
        assert!(pair[0].page <= pair[1].page);
    }
}

#[test]
fn test_reading_order_within_page() {
    // Blocks on page 2 arrive bottom section first
    let doc = DocBuilder::new()
        .page(1)
        .line("Survey Methods Handbook", 22.0, true)
        .gap(10.0)
        .body(4)
        .page(2)
        .line_at("3. Analysis", 16.0, true, 520.0)
        .body(3)
        .line_at("1. Sampling", 16.0, true, 100.0)
        .body(3)
        .line_at("2. Collection", 16.0, true, 300.0)
        .body(3)
        .page(3)
        .line("4. Reporting", 16.0, true)
        .body(3)
        .build();
    let result = extract(&doc);

    let y_of = |text: &str| match text {
        "1. Sampling" => 100.0,
        "2. Collection" => 300.0,
        "3. Analysis" => 520.0,
        _ => 72.0,
    };
    for pair in result.outline.windows(2) {
        assert!(pair[0].page <= pair[1].page);
        if pair[0].page == pair[1].page {
            assert!(y_of(&pair[0].text) <= y_of(&pair[1].text));
        }
    }
    let texts: Vec<&str> = result.outline.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["1. Sampling", "2. Collection", "3. Analysis", "4. Reporting"]);
}

#[test]
fn test_running_headers_never_in_outline() {
    let mut builder = DocBuilder::new();
    let sections = ["1. Production", "2. Logistics", "3. Staffing", "4. Outlook"];
    for (i, section) in sections.iter().enumerate() {
        let page = i as u32 + 1;
        builder = builder
            .page(page)
            .line("ACME Widget Corporation", 14.0, true)
            .gap(10.0);
        if page == 1 {
            builder = builder.line("Quarterly Widget Review", 22.0, true).gap(10.0);
        }
        builder = builder
            .line(section, 16.0, true)
            .body(5)
            .line_at(&format!("Page {page} of 4"), 9.0, false, 760.0);
    }
    let result = extract(&builder.build());

    assert_eq!(result.title, "Quarterly Widget Review");
    assert!(result.outline.iter().all(|e| e.text != "ACME Widget Corporation"));
    assert!(result.outline.iter().all(|e| !e.text.starts_with("Page ")));
    let texts: Vec<&str> = result.outline.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, sections.to_vec());
    assert!(result.outline.iter().all(|e| e.level == HeadingLevel::H1));
}

#[test]
fn test_parent_number_never_deeper_than_child() {
    // The child is set larger than its parent; numbering still decides.
    let doc = DocBuilder::new()
        .page(1)
        .line("Study Design Report", 22.0, true)
        .gap(10.0)
        .body(3)
        .gap(10.0)
        .line("2. Methods", 12.0, true)
        .body(3)
        .gap(10.0)
        .line("2.1 Sampling", 18.0, true)
        .body(3)
        .build();
    let result = extract(&doc);

    let parent = result.outline.iter().find(|e| e.text == "2. Methods").unwrap();
    let child = result.outline.iter().find(|e| e.text == "2.1 Sampling").unwrap();
    assert!(parent.level < child.level);
}

#[test]
fn test_single_font_size_relies_on_other_signals() {
    let doc = DocBuilder::new()
        .page(1)
        .line("1. Scope", BODY_SIZE, false)
        .line("This introductory paragraph is the longest line here", BODY_SIZE, false)
        .body(3)
        .gap(10.0)
        .line("2. Terms", BODY_SIZE, false)
        .body(3)
        .build();
    let result = extract(&doc);

    assert_eq!(result.title, "This introductory paragraph is the longest line here");
    let texts: Vec<&str> = result.outline.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["1. Scope", "2. Terms"]);
    assert!(result.outline.iter().all(|e| e.level == HeadingLevel::H1));
}

#[test]
fn test_enumerative_lines_are_h4() {
    let doc = DocBuilder::new()
        .page(1)
        .line("Operations Manual", 22.0, true)
        .gap(10.0)
        .body(3)
        .gap(10.0)
        .line("For each widget type", 13.0, true)
        .body(3)
        .build();
    let result = extract(&doc);

    let entry = result.outline.iter().find(|e| e.text == "For each widget type").unwrap();
    assert_eq!(entry.level, HeadingLevel::H4);
}

#[test]
fn test_outline_cap_keeps_strongest() {
    let options = ExtractOptions::new().with_max_entries(2);
    let result = extract_with_options(&guide_document(), &options).unwrap();

    let texts: Vec<&str> = result.outline.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["1. Overview", "1.1 Background"]);
}

#[test]
fn test_raised_threshold_drops_weak_headings() {
    let options = ExtractOptions::new().with_threshold(0.6);
    let result = extract_with_options(&guide_document(), &options).unwrap();

    assert!(result.outline.iter().all(|e| e.text != "1.1.1 Details"));
    assert_eq!(result.outline.len(), 2);
}
