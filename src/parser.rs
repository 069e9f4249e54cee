//! Line tokenizer and chord/lyric line classifier.
//!
//! One line of chord sheet text is split into tokens (whitespace runs,
//! `[...]` segments, `(...)` segments, bare slashes and words) such
//! that concatenating the tokens reproduces the line byte-for-byte.
//! The line is then classified by chord density, and each token gets
//! its final chord flag.

use crate::chord::is_chord;
use crate::model::{LineKind, ParsedLine, ParsedToken};

/// Chord-density ratio above which a line containing wrapped (sure)
/// chords classifies as a chord line.
const SURE_LINE_RATIO: f64 = 0.4;

/// Chord-density ratio above which a line of bare tokens only
/// classifies as a chord line.
const BARE_LINE_RATIO: f64 = 0.5;

/// Tokenize and classify one line of text.
///
/// Wrapped tokens count as sure chords and any token passing the
/// grammar counts toward density. A line with sure chords classifies
/// as chord above the lowered ratio, otherwise above the strict one.
/// The final flags force wrapped tokens to chord; bare tokens are
/// chord only when the whole line is.
pub fn parse_line(line: &str) -> ParsedLine {
    let parts = split_tokens(line);

    let mut sure = 0usize;
    let mut potential = 0usize;
    let mut total = 0usize;
    for part in &parts {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }
        total += 1;
        if is_wrapped(trimmed) {
            sure += 1;
        }
        if is_chord(trimmed) {
            potential += 1;
        }
    }

    // Empty and whitespace-only lines carry no tokens at all.
    if total == 0 {
        return ParsedLine {
            kind: LineKind::Lyric,
            tokens: Vec::new(),
        };
    }

    let ratio = potential as f64 / total as f64;
    let threshold = if sure > 0 {
        SURE_LINE_RATIO
    } else {
        BARE_LINE_RATIO
    };
    let kind = if ratio > threshold {
        LineKind::Chord
    } else {
        LineKind::Lyric
    };

    let tokens = parts
        .into_iter()
        .map(|part| {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                return ParsedToken {
                    text: part.to_string(),
                    is_chord: false,
                    is_separator: true,
                };
            }
            let chord =
                is_wrapped(trimmed) || (kind == LineKind::Chord && is_chord(trimmed));
            ParsedToken {
                text: part.to_string(),
                is_chord: chord,
                is_separator: false,
            }
        })
        .collect();

    ParsedLine { kind, tokens }
}

/// Parse every line of a document. Lines are split on `\n`.
pub fn parse_text(text: &str) -> Vec<ParsedLine> {
    text.split('\n').map(parse_line).collect()
}

// ─── Tokenizer ───────────────────────────────────────────────────────

/// Split a line into token slices. Delimited segments (`[...]`,
/// `(...)`) end at the first closing delimiter; an opener that never
/// closes stays inside its word token.
fn split_tokens(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut word_start = 0;
    let mut pos = 0;

    while pos < line.len() {
        let c = match line[pos..].chars().next() {
            Some(c) => c,
            None => break,
        };
        let segment_end = match c {
            '[' => closing_delim(line, pos, ']'),
            '(' => closing_delim(line, pos, ')'),
            '/' => Some(pos + 1),
            c if c.is_whitespace() => Some(whitespace_end(line, pos)),
            _ => None,
        };
        match segment_end {
            Some(end) => {
                if word_start < pos {
                    tokens.push(&line[word_start..pos]);
                }
                tokens.push(&line[pos..end]);
                pos = end;
                word_start = end;
            }
            None => pos += c.len_utf8(),
        }
    }
    if word_start < line.len() {
        tokens.push(&line[word_start..]);
    }
    tokens
}

/// Byte offset just past the closing delimiter, or `None` if the line
/// never closes it.
fn closing_delim(line: &str, open: usize, close: char) -> Option<usize> {
    line[open + 1..]
        .find(close)
        .map(|i| open + 1 + i + close.len_utf8())
}

/// Byte offset of the end of the whitespace run starting at `start`.
fn whitespace_end(line: &str, start: usize) -> usize {
    line[start..]
        .find(|c: char| !c.is_whitespace())
        .map_or(line.len(), |i| start + i)
}

/// One token fully wrapped in brackets or parens with non-empty content.
fn is_wrapped(token: &str) -> bool {
    let bytes = token.as_bytes();
    token.len() >= 3
        && matches!(
            (bytes[0], bytes[token.len() - 1]),
            (b'[', b']') | (b'(', b')')
        )
}
