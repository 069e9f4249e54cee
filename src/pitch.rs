//! Pitch-class arithmetic and chord transposition.
//!
//! Note names map to pitch classes 0–11; transposition adds semitones
//! modulo 12 and re-spells the result from one of two canonical name
//! tables. The sharp/flat choice is either forced by the caller or
//! fixed once per document from an accidental count.

use crate::chord::split_root;
use crate::model::{KeyContext, Preference};

/// The twelve pitch classes spelled with sharps.
pub const NOTES_SHARP: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// The twelve pitch classes spelled with flats.
pub const NOTES_FLAT: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// The "no chord" marker, passed through transposition untouched.
pub const NO_CHORD: &str = "N.C.";

/// Look up a note name's pitch class (0–11). Case-insensitive, and
/// accepts both sharp and flat spellings.
pub fn note_index(note: &str) -> Option<usize> {
    NOTES_SHARP
        .iter()
        .position(|n| n.eq_ignore_ascii_case(note))
        .or_else(|| NOTES_FLAT.iter().position(|n| n.eq_ignore_ascii_case(note)))
}

/// Transpose a single note name by `semitones` and re-spell it from
/// the sharp or flat table. The `N.C.` marker and unrecognized names
/// pass through unchanged.
pub fn transpose_note(
    note: &str,
    semitones: i32,
    preference: Preference,
    key_context: KeyContext,
) -> String {
    if note == NO_CHORD {
        return note.to_string();
    }
    let idx = match note_index(note) {
        Some(i) => i,
        None => return note.to_string(),
    };

    // Sum in i64: an i32 sum overflows for offsets near the domain edge.
    let new_idx = (idx as i64 + i64::from(semitones)).rem_euclid(12) as usize;

    let use_flats = match preference {
        Preference::Sharp => false,
        Preference::Flat => true,
        Preference::Auto => key_context == KeyContext::Flat,
    };
    if use_flats {
        NOTES_FLAT[new_idx].to_string()
    } else {
        NOTES_SHARP[new_idx].to_string()
    }
}

/// Scan text for root-letter occurrences (`A`–`G` with an optional
/// trailing `#`/`b`) and pick the document-wide spelling: flats win
/// only a strict majority; ties and accidental-free text stay sharp.
///
/// The scan is deliberately crude (it also matches capital letters
/// inside lyrics); it exists to keep one document internally
/// consistent, not to detect the key.
pub fn determine_key_preference(text: &str) -> KeyContext {
    let mut sharps = 0usize;
    let mut flats = 0usize;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if ('A'..='G').contains(&c) {
            match chars.peek() {
                Some('#') => {
                    sharps += 1;
                    chars.next();
                }
                Some('b') => {
                    flats += 1;
                    chars.next();
                }
                _ => {}
            }
        }
    }
    if flats > sharps {
        KeyContext::Flat
    } else {
        KeyContext::Sharp
    }
}

/// Transpose one chord symbol. The leading root (and the bass of a
/// slash chord, when the bass names a real note) moves by `semitones`;
/// everything else passes through byte-for-byte. `key_context`
/// supplies the document-wide spelling for `Auto` mode; pass `None`
/// outside a document pass to derive it from the chord's own root.
pub fn transpose_chord(
    chord: &str,
    semitones: i32,
    preference: Preference,
    key_context: Option<KeyContext>,
) -> String {
    let (root, rest) = match split_root(chord) {
        Some(split) => split,
        None => return chord.to_string(),
    };

    let context = key_context.unwrap_or(if root.contains('b') {
        KeyContext::Flat
    } else {
        KeyContext::Sharp
    });

    let new_root = transpose_note(root, semitones, preference, context);

    // Slash handling: split at the first `/` and transpose the bass
    // only if it names a note on its own. Suffixes that merely contain
    // a slash (`C6/9`) keep the remainder untouched.
    if let Some((quality, bass)) = rest.split_once('/') {
        if note_index(bass).is_some() {
            let new_bass = transpose_note(bass, semitones, preference, context);
            return format!("{new_root}{quality}/{new_bass}");
        }
    }
    format!("{new_root}{rest}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_lookup_is_case_insensitive() {
        assert_eq!(note_index("C"), Some(0));
        assert_eq!(note_index("c"), Some(0));
        assert_eq!(note_index("C#"), Some(1));
        assert_eq!(note_index("Db"), Some(1));
        assert_eq!(note_index("db"), Some(1));
        assert_eq!(note_index("DB"), Some(1));
        assert_eq!(note_index("Bb"), Some(10));
        assert_eq!(note_index("H"), None);
        assert_eq!(note_index(""), None);
    }

    #[test]
    fn transpose_note_basic() {
        assert_eq!(
            transpose_note("C", 2, Preference::Sharp, KeyContext::Sharp),
            "D"
        );
        assert_eq!(
            transpose_note("B", 1, Preference::Sharp, KeyContext::Sharp),
            "C"
        );
        assert_eq!(
            transpose_note("C", -1, Preference::Sharp, KeyContext::Sharp),
            "B"
        );
    }

    #[test]
    fn transpose_note_wraps_any_offset() {
        assert_eq!(
            transpose_note("C", 14, Preference::Sharp, KeyContext::Sharp),
            "D"
        );
        assert_eq!(
            transpose_note("C", -13, Preference::Sharp, KeyContext::Sharp),
            "B"
        );
        assert_eq!(
            transpose_note("G", -24, Preference::Sharp, KeyContext::Sharp),
            "G"
        );
        // Offsets at the edges of the i32 domain still reduce mod 12.
        assert_eq!(
            transpose_note("D", i32::MAX, Preference::Sharp, KeyContext::Sharp),
            "A"
        );
        assert_eq!(
            transpose_note("D", i32::MIN, Preference::Sharp, KeyContext::Sharp),
            "F#"
        );
    }

    #[test]
    fn spelling_follows_preference() {
        assert_eq!(
            transpose_note("C", 1, Preference::Sharp, KeyContext::Flat),
            "C#"
        );
        assert_eq!(
            transpose_note("C", 1, Preference::Flat, KeyContext::Sharp),
            "Db"
        );
        // Auto defers to the key context.
        assert_eq!(
            transpose_note("C", 1, Preference::Auto, KeyContext::Sharp),
            "C#"
        );
        assert_eq!(
            transpose_note("C", 1, Preference::Auto, KeyContext::Flat),
            "Db"
        );
    }

    #[test]
    fn passthrough_cases() {
        assert_eq!(
            transpose_note("N.C.", 5, Preference::Sharp, KeyContext::Sharp),
            "N.C."
        );
        assert_eq!(
            transpose_note("H", 5, Preference::Sharp, KeyContext::Sharp),
            "H"
        );
        assert_eq!(
            transpose_note("", 5, Preference::Sharp, KeyContext::Sharp),
            ""
        );
    }

    #[test]
    fn key_preference_counts_accidentals() {
        assert_eq!(determine_key_preference("Bb Eb F"), KeyContext::Flat);
        assert_eq!(determine_key_preference("F# C# B"), KeyContext::Sharp);
        // Ties and empty input stay sharp.
        assert_eq!(determine_key_preference("F# Bb"), KeyContext::Sharp);
        assert_eq!(determine_key_preference(""), KeyContext::Sharp);
        assert_eq!(determine_key_preference("C F G"), KeyContext::Sharp);
        // Lowercase letters never start a match.
        assert_eq!(determine_key_preference("ebb and flow"), KeyContext::Sharp);
    }

    #[test]
    fn transpose_chord_moves_root_and_bass() {
        assert_eq!(
            transpose_chord("Am7/G", -2, Preference::Flat, Some(KeyContext::Flat)),
            "Gm7/F"
        );
        assert_eq!(
            transpose_chord("D/F#", -2, Preference::Flat, Some(KeyContext::Flat)),
            "C/E"
        );
        assert_eq!(
            transpose_chord("Cadd9", -2, Preference::Flat, Some(KeyContext::Flat)),
            "Bbadd9"
        );
    }

    #[test]
    fn transpose_chord_protects_non_note_slashes() {
        // `9` is not a note, so the whole remainder stays put.
        assert_eq!(
            transpose_chord("C6/9", 2, Preference::Sharp, None),
            "D6/9"
        );
        // Only the first slash splits; `G/B` is not a note name.
        assert_eq!(
            transpose_chord("Am7/G/B", 2, Preference::Sharp, None),
            "Bm7/G/B"
        );
    }

    #[test]
    fn transpose_chord_derives_local_context() {
        // Without a document context, a flat-spelled root keeps flats.
        assert_eq!(transpose_chord("Bb", 2, Preference::Auto, None), "C");
        assert_eq!(transpose_chord("Bb", 1, Preference::Auto, None), "B");
        assert_eq!(transpose_chord("Ab", 1, Preference::Auto, None), "A");
        assert_eq!(transpose_chord("Db", 5, Preference::Auto, None), "Gb");
        // Sharp-spelled roots keep sharps.
        assert_eq!(transpose_chord("C#", 4, Preference::Auto, None), "F");
        assert_eq!(transpose_chord("F#", 1, Preference::Auto, None), "G");
        assert_eq!(transpose_chord("G#", 1, Preference::Auto, None), "A");
        assert_eq!(transpose_chord("D#", 1, Preference::Auto, None), "E");
        assert_eq!(transpose_chord("A#", 1, Preference::Auto, None), "B");
        assert_eq!(transpose_chord("C#", 1, Preference::Auto, None), "D");
        assert_eq!(transpose_chord("Eb", 1, Preference::Auto, None), "E");
        // A forced document context wins.
        assert_eq!(
            transpose_chord("C", 1, Preference::Auto, Some(KeyContext::Flat)),
            "Db"
        );
    }

    #[test]
    fn transpose_chord_passthrough_without_root() {
        assert_eq!(
            transpose_chord("hello", 3, Preference::Sharp, None),
            "hello"
        );
        assert_eq!(transpose_chord("", 3, Preference::Sharp, None), "");
        assert_eq!(
            transpose_chord("N.C.", 3, Preference::Sharp, None),
            "N.C."
        );
    }

    #[test]
    fn round_trip_preserves_spelling_under_fixed_preference() {
        for chord in ["C", "F#m7", "Bb", "Am7/G", "Dsus4", "Ebmaj7"] {
            for n in [-14, -7, -1, 0, 1, 5, 12, 25] {
                let up = transpose_chord(chord, n, Preference::Flat, None);
                let back = transpose_chord(&up, -n, Preference::Flat, None);
                let expected = transpose_chord(chord, 0, Preference::Flat, None);
                assert_eq!(back, expected, "{chord} by {n} did not round-trip");
            }
        }
    }
}
