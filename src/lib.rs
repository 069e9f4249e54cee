//! chordlib — chord sheet transposition and layout reconstruction
//! library for ChordShift.
//!
//! Two jobs: transpose every chord in a sheet of plain text by a
//! semitone offset while keeping the document's enharmonic spelling
//! consistent, and reconstruct aligned monospace text from positioned
//! fragments produced by OCR or PDF text extraction.
//!
//! # Example
//! ```
//! use chordlib::{transpose_details, Preference};
//!
//! let out = transpose_details("G        Em7\nHello world", 2, Preference::Sharp);
//! assert_eq!(out, "A        F#m7\nHello world");
//! ```

pub mod chord;
pub mod hocr;
pub mod layout;
pub mod model;
pub mod parser;
pub mod pitch;
pub mod transpose;

#[cfg(target_os = "android")]
pub mod android;

pub use chord::{is_chord, parse_chord, Accidental, ChordSymbol};
pub use hocr::parse_hocr;
pub use layout::{reconstruct_page, reconstruct_pages};
pub use model::*;
pub use parser::{parse_line, parse_text};
pub use pitch::{determine_key_preference, transpose_chord, transpose_note};
pub use transpose::transpose_details;

/// Parse a JSON array of positioned fragments (`{text, x, y, width}`
/// objects) handed over by an extraction collaborator.
pub fn tokens_from_json(json: &str) -> Result<Vec<PositionedToken>, String> {
    serde_json::from_str(json).map_err(|e| format!("positioned token JSON error: {e}"))
}

/// Parse a JSON array of pages (`{tokens, viewport_width}` objects).
pub fn pages_from_json(json: &str) -> Result<Vec<Page>, String> {
    serde_json::from_str(json).map_err(|e| format!("page JSON error: {e}"))
}

/// Reconstruct one page handed over as a JSON fragment list.
/// Convenience function combining parsing and layout.
pub fn reconstruct_json_page(tokens_json: &str, viewport_width: f64) -> Result<String, String> {
    let tokens = tokens_from_json(tokens_json)?;
    Ok(reconstruct_page(&tokens, viewport_width))
}

/// Parse an hOCR document and reconstruct all of its pages.
/// Convenience function combining parsing and layout.
pub fn reconstruct_hocr(xhtml: &str) -> Result<String, String> {
    let pages = parse_hocr(xhtml)?;
    Ok(reconstruct_pages(&pages))
}

/// Convert parsed lines to a JSON string.
/// Useful for hosts that drive chord highlighting from the classifier.
pub fn parsed_lines_to_json(lines: &[ParsedLine]) -> Result<String, String> {
    serde_json::to_string_pretty(lines).map_err(|e| format!("JSON serialization error: {e}"))
}

// ═══════════════════════════════════════════════════════════════════════
// C FFI — for iOS (static library) and Android (JNI)
// ═══════════════════════════════════════════════════════════════════════

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Transpose chord sheet text and return the result as a C string.
/// `preference` is `"sharp"`, `"flat"` or `"auto"`; null means auto.
/// The caller must free the returned string with `chordlib_free_string`.
///
/// # Safety
/// `text` must be a valid null-terminated UTF-8 C string.
/// `preference` may be null.
#[no_mangle]
pub unsafe extern "C" fn chordlib_transpose_text(
    text: *const c_char,
    semitones: i32,
    preference: *const c_char,
) -> *mut c_char {
    if text.is_null() {
        return std::ptr::null_mut();
    }
    let text = match unsafe { CStr::from_ptr(text) }.to_str() {
        Ok(s) => s,
        Err(_) => return std::ptr::null_mut(),
    };

    let pref = if preference.is_null() {
        Some(Preference::Auto)
    } else {
        unsafe { CStr::from_ptr(preference) }
            .to_str()
            .ok()
            .and_then(Preference::parse)
    };
    let pref = match pref {
        Some(p) => p,
        None => return std::ptr::null_mut(),
    };

    let out = transpose_details(text, semitones, pref);
    CString::new(out).unwrap_or_default().into_raw()
}

/// Reconstruct one page of positioned tokens (JSON array of
/// `{text, x, y, width}` objects) and return plain text as a C string.
/// The caller must free the returned string with `chordlib_free_string`.
///
/// # Safety
/// `tokens_json` must be a valid null-terminated UTF-8 C string.
#[no_mangle]
pub unsafe extern "C" fn chordlib_reconstruct_page(
    tokens_json: *const c_char,
    viewport_width: f64,
) -> *mut c_char {
    if tokens_json.is_null() {
        return std::ptr::null_mut();
    }
    let json = match unsafe { CStr::from_ptr(tokens_json) }.to_str() {
        Ok(s) => s,
        Err(_) => return std::ptr::null_mut(),
    };

    match reconstruct_json_page(json, viewport_width) {
        Ok(text) => CString::new(text).unwrap_or_default().into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Reconstruct every page of an hOCR document and return plain text
/// as a C string.
/// The caller must free the returned string with `chordlib_free_string`.
///
/// # Safety
/// `xhtml` must be a valid null-terminated UTF-8 C string.
#[no_mangle]
pub unsafe extern "C" fn chordlib_reconstruct_hocr(xhtml: *const c_char) -> *mut c_char {
    if xhtml.is_null() {
        return std::ptr::null_mut();
    }
    let xhtml = match unsafe { CStr::from_ptr(xhtml) }.to_str() {
        Ok(s) => s,
        Err(_) => return std::ptr::null_mut(),
    };

    match reconstruct_hocr(xhtml) {
        Ok(text) => CString::new(text).unwrap_or_default().into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Free a string previously returned by chordlib functions.
///
/// # Safety
/// `ptr` must be a string previously returned by a chordlib function, or null.
#[no_mangle]
pub unsafe extern "C" fn chordlib_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}
