//! Data model for chord sheet text and positioned page fragments.
//!
//! These structures capture the information needed for layout
//! reconstruction and chord transposition.

use serde::{Deserialize, Serialize};

/// One positioned text fragment extracted from an image or PDF page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionedToken {
    /// Fragment text (usually one word or glyph run)
    pub text: String,
    /// Left edge in page pixels
    pub x: f64,
    /// Top edge in page pixels (y increases downward)
    pub y: f64,
    /// Rendered width in page pixels
    pub width: f64,
}

/// One page of positioned fragments plus the coordinate space they live in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Fragments in extraction order (layout sorts them itself)
    pub tokens: Vec<PositionedToken>,
    /// Width of the page's pixel coordinate space
    pub viewport_width: f64,
}

/// Classification of one line of chord sheet text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    /// Predominantly chord symbols (rendered above lyrics)
    Chord,
    /// Lyrics or other prose
    Lyric,
}

/// One token of a tokenized line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedToken {
    /// Token text, byte-identical to its slice of the input line
    pub text: String,
    /// Whether transposition should rewrite this token
    pub is_chord: bool,
    /// Whether this token is a whitespace run
    pub is_separator: bool,
}

/// A line of text split into tokens and classified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedLine {
    /// Line classification from the ratio heuristic
    pub kind: LineKind,
    /// Tokens in source order; concatenating their text reproduces the line
    pub tokens: Vec<ParsedToken>,
}

/// Enharmonic spelling requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    /// Always spell with sharps
    Sharp,
    /// Always spell with flats
    Flat,
    /// Decide once per document by counting accidentals
    Auto,
}

/// Document-wide spelling verdict applied when the preference is `Auto`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyContext {
    Sharp,
    Flat,
}

impl PositionedToken {
    /// Right edge in page pixels.
    pub fn end_x(&self) -> f64 {
        self.x + self.width
    }
}

impl ParsedLine {
    /// Reassemble the original line text from its tokens.
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

impl Preference {
    /// Parse a preference from its wire form: `"sharp"`, `"flat"` or `"auto"`
    /// (case-insensitive). Used at the FFI boundary.
    pub fn parse(s: &str) -> Option<Preference> {
        if s.eq_ignore_ascii_case("sharp") {
            Some(Preference::Sharp)
        } else if s.eq_ignore_ascii_case("flat") {
            Some(Preference::Flat)
        } else if s.eq_ignore_ascii_case("auto") {
            Some(Preference::Auto)
        } else {
            None
        }
    }
}

impl Default for Preference {
    fn default() -> Self {
        Preference::Auto
    }
}
