//! hOCR parser — converts Tesseract-style hOCR XHTML into pages of
//! positioned tokens.
//!
//! hOCR encodes OCR results as XHTML: `ocr_page` elements carry the
//! page geometry and `ocrx_word` elements carry one word each, with
//! pixel bounding boxes in the `title` attribute
//! (`title="bbox x0 y0 x1 y1; x_wconf 93"`).

use roxmltree::{Document, Node};

use crate::model::{Page, PositionedToken};

/// Page width assumed when a page has neither a bbox nor any words.
const DEFAULT_VIEWPORT: f64 = 1000.0;

/// Margin added when estimating a missing page width from word extents.
const VIEWPORT_MARGIN: f64 = 50.0;

/// Parse an hOCR document into pages of positioned tokens.
///
/// Words without a parseable bbox are dropped. A page without its own
/// bbox gets a width estimated from its word extents. Documents that
/// omit the `ocr_page` container are treated as a single page.
pub fn parse_hocr(xhtml: &str) -> Result<Vec<Page>, String> {
    // hOCR files usually carry an XHTML DOCTYPE, so DTDs must be allowed
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let doc = Document::parse_with_options(xhtml, options)
        .map_err(|e| format!("hOCR parse error: {e}"))?;

    let mut pages = Vec::new();
    for node in doc
        .descendants()
        .filter(|n| n.is_element() && has_class(n, "ocr_page"))
    {
        let tokens = collect_words(&node);
        let viewport_width = node
            .attribute("title")
            .and_then(parse_bbox)
            .map(|b| b[2] - b[0])
            .unwrap_or_else(|| estimate_viewport(&tokens));
        pages.push(Page {
            tokens,
            viewport_width,
        });
    }

    if pages.is_empty() {
        // No page container; scan the whole document instead.
        let tokens = collect_words(&doc.root());
        if tokens.is_empty() {
            return Err("no ocr_page or ocrx_word elements found in hOCR input".to_string());
        }
        let viewport_width = estimate_viewport(&tokens);
        pages.push(Page {
            tokens,
            viewport_width,
        });
    }

    Ok(pages)
}

// ─── Helpers ─────────────────────────────────────────────────────────

/// Collect every `ocrx_word` under `node` as a positioned token.
fn collect_words(node: &Node) -> Vec<PositionedToken> {
    let mut tokens = Vec::new();
    for word in node
        .descendants()
        .filter(|n| n.is_element() && has_class(n, "ocrx_word"))
    {
        let bbox = match word.attribute("title").and_then(parse_bbox) {
            Some(b) => b,
            None => continue, // unusable without a position
        };
        tokens.push(PositionedToken {
            text: element_text(&word),
            x: bbox[0],
            y: bbox[1],
            width: bbox[2] - bbox[0],
        });
    }
    tokens
}

/// Whether an element's `class` attribute lists the given hOCR class.
fn has_class(node: &Node, name: &str) -> bool {
    node.attribute("class")
        .map_or(false, |classes| classes.split_whitespace().any(|c| c == name))
}

/// Parse the `bbox x0 y0 x1 y1` field of an hOCR `title` attribute.
fn parse_bbox(title: &str) -> Option<[f64; 4]> {
    for field in title.split(';') {
        let mut parts = field.split_whitespace();
        if parts.next() != Some("bbox") {
            continue;
        }
        let mut coords = [0.0_f64; 4];
        for coord in &mut coords {
            *coord = parts.next()?.parse().ok()?;
        }
        return Some(coords);
    }
    None
}

/// Concatenated descendant text of an element, trimmed. Word elements
/// may nest markup such as `<strong>`.
fn element_text(node: &Node) -> String {
    let mut text = String::new();
    for child in node.descendants().filter(|n| n.is_text()) {
        if let Some(t) = child.text() {
            text.push_str(t);
        }
    }
    text.trim().to_string()
}

/// Approximate a missing page width from the word extents.
fn estimate_viewport(tokens: &[PositionedToken]) -> f64 {
    if tokens.is_empty() {
        return DEFAULT_VIEWPORT;
    }
    let max_end = tokens.iter().map(|t| t.end_x()).fold(0.0_f64, f64::max);
    max_end + VIEWPORT_MARGIN
}
