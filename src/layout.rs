//! Layout reconstruction from positioned page fragments.
//!
//! Groups fragments into visual lines by y-proximity, classifies each
//! line chord-vs-lyric, pairs chord lines with the lyric line below,
//! and re-renders the page as aligned monospace text. Columns are
//! measured in characters.

use crate::model::{LineKind, Page, PositionedToken};
use crate::parser::parse_line;

// ── Geometry ────────────────────────────────────────────────────────
const LINE_TOLERANCE_FACTOR: f64 = 0.01; // y-grouping tolerance, fraction of viewport width
const WORD_GAP_PX: f64 = 3.0; // gap beyond which lyric fragments get a space
const INDENT_FACTOR: f64 = 0.05; // first-fragment x beyond this fraction counts as indented
const ANCHOR_SLACK_PX: f64 = 5.0; // slack around a lyric span when anchoring a chord
const FLOAT_CHAR_WIDTH: f64 = 10.0; // estimated char width for unanchored chords
const GRID_UNIT: f64 = 12.0; // px per character for unpaired lines
const MAX_COLUMN: i64 = 4096; // ceiling for x-derived columns from corrupt positions

/// One visual line accumulated during y-grouping. Keyed by the first
/// fragment's y.
struct Line<'a> {
    y: f64,
    tokens: Vec<&'a PositionedToken>,
    is_chord: bool,
}

/// Maps a rendered lyric fragment's pixel span to its output column.
struct SpanEntry {
    start_x: f64,
    end_x: f64,
    start_col: usize,
}

/// Reconstruct one page of positioned fragments as plain text.
///
/// Every emitted line is right-trimmed and newline-terminated. An
/// empty fragment list yields an empty string.
pub fn reconstruct_page(tokens: &[PositionedToken], viewport_width: f64) -> String {
    if tokens.is_empty() {
        return String::new();
    }

    let mut lines = group_lines(tokens, viewport_width);
    for line in &mut lines {
        line.tokens.sort_by(|a, b| a.x.total_cmp(&b.x));
        line.is_chord = classify(&line.tokens);
    }

    let mut out = String::new();
    let mut i = 0;
    while i < lines.len() {
        let current = &lines[i];
        if current.tokens.is_empty() {
            i += 1;
            continue;
        }

        let paired = current.is_chord && lines.get(i + 1).map_or(false, |next| !next.is_chord);
        if paired {
            let (chord_text, lyric_text) = render_pair(current, &lines[i + 1], viewport_width);
            out.push_str(chord_text.trim_end());
            out.push('\n');
            out.push_str(lyric_text.trim_end());
            out.push('\n');
            // The lyric line is consumed by the pair.
            i += 2;
        } else {
            let text = render_grid(&current.tokens);
            out.push_str(text.trim_end());
            out.push('\n');
            i += 1;
        }
    }
    out
}

/// Reconstruct a multi-page document. Each page's text is followed by
/// one blank separator line.
pub fn reconstruct_pages(pages: &[Page]) -> String {
    let mut out = String::new();
    for page in pages {
        out.push_str(&reconstruct_page(&page.tokens, page.viewport_width));
        out.push('\n');
    }
    out
}

// ─── Line grouping & classification ─────────────────────────────────

/// Accumulate fragments into lines by y-proximity. Linear scan against
/// each open line's first-fragment y.
fn group_lines(tokens: &[PositionedToken], viewport_width: f64) -> Vec<Line<'_>> {
    let tolerance = viewport_width * LINE_TOLERANCE_FACTOR;
    let mut lines: Vec<Line> = Vec::new();
    for token in tokens {
        match lines.iter_mut().find(|l| (l.y - token.y).abs() < tolerance) {
            Some(line) => line.tokens.push(token),
            None => lines.push(Line {
                y: token.y,
                tokens: vec![token],
                is_chord: false,
            }),
        }
    }
    lines.sort_by(|a, b| a.y.total_cmp(&b.y));
    lines
}

/// Run the text classifier over the line's fragments joined with
/// single spaces.
fn classify(tokens: &[&PositionedToken]) -> bool {
    let joined = tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    parse_line(&joined).kind == LineKind::Chord
}

// ─── Rendering ──────────────────────────────────────────────────────

/// Render a chord line anchored over its lyric line. The lyric line
/// renders first and records each fragment's pixel span → column
/// mapping; each chord then lands at the column of the span containing
/// its horizontal center, or at a rough x-derived column if nothing
/// matches ("floating chord").
fn render_pair(chords: &Line, lyrics: &Line, viewport_width: f64) -> (String, String) {
    let mut lyric_text = String::new();
    let mut spans: Vec<SpanEntry> = Vec::new();
    let mut last_x_end = 0.0_f64;

    if lyrics
        .tokens
        .first()
        .map_or(false, |t| t.x > viewport_width * INDENT_FACTOR)
    {
        lyric_text.push_str("  ");
    }

    for token in &lyrics.tokens {
        if last_x_end > 0.0 && token.x - last_x_end > WORD_GAP_PX {
            lyric_text.push(' ');
        }
        spans.push(SpanEntry {
            start_x: token.x,
            end_x: token.end_x(),
            start_col: lyric_text.chars().count(),
        });
        lyric_text.push_str(&token.text);
        last_x_end = token.end_x();
    }

    let mut chord_text = String::new();
    for token in &chords.tokens {
        let center = token.x + token.width / 2.0;
        let target = spans
            .iter()
            .find(|s| {
                center >= s.start_x - ANCHOR_SLACK_PX && center <= s.end_x + ANCHOR_SLACK_PX
            })
            .map(|s| s.start_col as i64)
            .unwrap_or_else(|| ((token.x / FLOAT_CHAR_WIDTH).floor() as i64).min(MAX_COLUMN));

        let col = chord_text.chars().count() as i64;
        let padding = target - col;
        if padding > 0 {
            chord_text.push_str(&" ".repeat(padding as usize));
        } else if col > 0 {
            // Past the target; keep adjacent chords from merging.
            chord_text.push(' ');
        }
        chord_text.push_str(&token.text);
    }

    (chord_text, lyric_text)
}

/// Render an unpaired line by quantizing each fragment's x onto a
/// fixed character grid.
fn render_grid(tokens: &[&PositionedToken]) -> String {
    let mut text = String::new();
    for token in tokens {
        let target = ((token.x / GRID_UNIT).floor() as i64).min(MAX_COLUMN);
        let padding = target - text.chars().count() as i64;
        if padding > 0 {
            text.push_str(&" ".repeat(padding as usize));
        }
        text.push_str(&token.text);
    }
    text
}
