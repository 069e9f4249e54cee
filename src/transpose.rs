//! Document-level transposition.
//!
//! The single entry point the editor calls on every keystroke or
//! semitone change: the whole text is re-tokenized and every
//! chord-flagged token rewritten, leaving all other bytes untouched.

use crate::model::{KeyContext, Preference};
use crate::parser::parse_line;
use crate::pitch::{determine_key_preference, transpose_chord};

/// Transpose every chord in `text` by `semitones`.
///
/// In `Auto` mode one document-wide spelling verdict is fixed up
/// front and reused for every chord, so the output stays internally
/// consistent. Output line count always equals input line count.
pub fn transpose_details(text: &str, semitones: i32, preference: Preference) -> String {
    let context = match preference {
        Preference::Auto => determine_key_preference(text),
        _ => KeyContext::Sharp,
    };

    let lines: Vec<String> = text
        .split('\n')
        .map(|line| transpose_line(line, semitones, preference, context))
        .collect();
    lines.join("\n")
}

/// Rewrite one line: chord-flagged tokens are unwrapped, transposed
/// and rewrapped; everything else passes through byte-for-byte.
fn transpose_line(
    line: &str,
    semitones: i32,
    preference: Preference,
    context: KeyContext,
) -> String {
    let parsed = parse_line(line);
    let mut out = String::new();
    for token in &parsed.tokens {
        if !token.is_chord {
            out.push_str(&token.text);
            continue;
        }
        let (prefix, core, suffix) = split_delimiters(&token.text);
        out.push_str(prefix);
        out.push_str(&transpose_chord(core, semitones, preference, Some(context)));
        out.push_str(suffix);
    }
    out
}

/// Split one leading `[`/`(` and one trailing `]`/`)` off a token,
/// each independently.
fn split_delimiters(token: &str) -> (&str, &str, &str) {
    let (prefix, rest) = if token.starts_with('[') || token.starts_with('(') {
        token.split_at(1)
    } else {
        ("", token)
    };
    let (core, suffix) = if rest.ends_with(']') || rest.ends_with(')') {
        rest.split_at(rest.len() - 1)
    } else {
        (rest, "")
    };
    (prefix, core, suffix)
}
