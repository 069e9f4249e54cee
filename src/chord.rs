//! Chord symbol grammar.
//!
//! An explicit parser for chord-symbol shapes: root letter, optional
//! accidental, a run of quality/extension keywords with trailing
//! digits, and an optional slash bass. Ambiguous English words are
//! handled by explicit exception tables rather than shape tests.

/// Quality/extension keywords, longest first so the greedy scan
/// prefers `maj` over `m`.
const QUALITY_KEYWORDS: [&str; 11] = [
    "maj", "dim", "aug", "sus", "add", "11", "13", "m", "7", "9", "5",
];

/// Accepted as chords regardless of shape. `A`/`Am` (and their
/// lowercase forms) collide with English words but are accepted
/// anyway; the classifier's second pass keeps them from transposing
/// inside lyric lines.
const ALWAYS_CHORD: [&str; 6] = ["N.C.", "NC", "A", "a", "Am", "am"];

/// Rejected despite being shape-adjacent.
const NEVER_CHORD: [&str; 1] = ["I"];

/// Sharp or flat accidental on a root or bass note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accidental {
    Sharp,
    Flat,
}

/// A chord symbol decomposed by the grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordSymbol<'a> {
    /// Root letter, `A`–`G`
    pub root: char,
    /// Accidental attached to the root
    pub accidental: Option<Accidental>,
    /// Quality/extension text between root and slash (may be empty)
    pub quality: &'a str,
    /// Bass note of a slash chord, e.g. `F#` in `D/F#`
    pub bass: Option<&'a str>,
}

/// Split a leading root note (`A`–`G` plus optional `#`/`b`) from the
/// remainder. This is the lenient split used by transposition; the
/// remainder is not checked against the grammar.
pub fn split_root(text: &str) -> Option<(&str, &str)> {
    match text.as_bytes() {
        [b'A'..=b'G', b'#' | b'b', ..] => Some(text.split_at(2)),
        [b'A'..=b'G', ..] => Some(text.split_at(1)),
        _ => None,
    }
}

/// Parse a token against the full chord grammar. Returns `None`
/// unless the entire input is consumed.
pub fn parse_chord(text: &str) -> Option<ChordSymbol<'_>> {
    let (root, rest) = split_root(text)?;
    let accidental = match root.as_bytes().get(1) {
        Some(b'#') => Some(Accidental::Sharp),
        Some(b'b') => Some(Accidental::Flat),
        _ => None,
    };

    let (quality, tail) = rest.split_at(quality_run_len(rest));

    let bass = if tail.is_empty() {
        None
    } else {
        let bass = tail.strip_prefix('/')?;
        if !is_note_name(bass) {
            return None;
        }
        Some(bass)
    };

    Some(ChordSymbol {
        root: root.as_bytes()[0] as char,
        accidental,
        quality,
        bass,
    })
}

/// Test whether a token reads as a chord symbol.
///
/// One layer of bracket/paren wrapping is ignored and the exception
/// tables are consulted before the grammar.
pub fn is_chord(token: &str) -> bool {
    let stripped = strip_wrapping(token);
    if stripped.is_empty() {
        return false;
    }
    if ALWAYS_CHORD.contains(&stripped) {
        return true;
    }
    if NEVER_CHORD.contains(&stripped) {
        return false;
    }
    parse_chord(stripped).is_some()
}

/// Remove one layer of wrapping: a single leading `[` or `(` and a
/// single trailing `]` or `)`, each stripped independently.
fn strip_wrapping(token: &str) -> &str {
    let token = token
        .strip_prefix('[')
        .or_else(|| token.strip_prefix('('))
        .unwrap_or(token);
    token
        .strip_suffix(']')
        .or_else(|| token.strip_suffix(')'))
        .unwrap_or(token)
}

/// Exactly a note name: `A`–`G` plus an optional accidental.
fn is_note_name(s: &str) -> bool {
    matches!(split_root(s), Some((_, "")))
}

/// Length of the longest prefix of `s` that forms a quality run:
/// keywords repeated, then trailing digits.
fn quality_run_len(s: &str) -> usize {
    let mut pos = 0;
    'keywords: loop {
        for kw in QUALITY_KEYWORDS {
            if s[pos..].starts_with(kw) {
                pos += kw.len();
                continue 'keywords;
            }
        }
        break;
    }
    while s[pos..].starts_with(|c: char| c.is_ascii_digit()) {
        pos += 1;
    }
    pos
}
