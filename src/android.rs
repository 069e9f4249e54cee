//! JNI bindings for Android.
//!
//! These functions are called from Kotlin via the JNI bridge.

use jni::objects::{JClass, JString};
use jni::sys::{jfloat, jint, jstring};
use jni::JNIEnv;

use crate::model::Preference;
use crate::{reconstruct_hocr, reconstruct_json_page, transpose_details};

/// Transpose chord sheet text.
///
/// Called from Kotlin as:
///   external fun transposeText(text: String, semitones: Int, preference: String?): String?
#[no_mangle]
pub extern "system" fn Java_com_chordshift_app_ChordLib_transposeText(
    mut env: JNIEnv,
    _class: JClass,
    text: JString,
    semitones: jint,
    preference: JString,
) -> jstring {
    let text: String = match env.get_string(&text) {
        Ok(s) => s.into(),
        Err(_) => return std::ptr::null_mut(),
    };

    let pref_str: Option<String> = if preference.is_null() {
        None
    } else {
        env.get_string(&preference).ok().map(|s| s.into())
    };
    let pref = match pref_str {
        None => Preference::Auto,
        Some(s) => match Preference::parse(&s) {
            Some(p) => p,
            None => return std::ptr::null_mut(),
        },
    };

    let out = transpose_details(&text, semitones, pref);
    match env.new_string(&out) {
        Ok(js) => js.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Reconstruct one page of positioned tokens (a JSON array of
/// `{text, x, y, width}` objects) as aligned plain text.
///
/// Called from Kotlin as:
///   external fun reconstructPage(tokensJson: String, viewportWidth: Float): String?
#[no_mangle]
pub extern "system" fn Java_com_chordshift_app_ChordLib_reconstructPage(
    mut env: JNIEnv,
    _class: JClass,
    tokens_json: JString,
    viewport_width: jfloat,
) -> jstring {
    let json: String = match env.get_string(&tokens_json) {
        Ok(s) => s.into(),
        Err(_) => return std::ptr::null_mut(),
    };

    match reconstruct_json_page(&json, viewport_width as f64) {
        Ok(text) => match env.new_string(&text) {
            Ok(js) => js.into_raw(),
            Err(_) => std::ptr::null_mut(),
        },
        Err(_) => std::ptr::null_mut(),
    }
}

/// Reconstruct every page of an hOCR document as aligned plain text.
///
/// Called from Kotlin as:
///   external fun reconstructHocr(xhtml: String): String?
#[no_mangle]
pub extern "system" fn Java_com_chordshift_app_ChordLib_reconstructHocr(
    mut env: JNIEnv,
    _class: JClass,
    xhtml: JString,
) -> jstring {
    let xhtml: String = match env.get_string(&xhtml) {
        Ok(s) => s.into(),
        Err(_) => return std::ptr::null_mut(),
    };

    match reconstruct_hocr(&xhtml) {
        Ok(text) => match env.new_string(&text) {
            Ok(js) => js.into_raw(),
            Err(_) => std::ptr::null_mut(),
        },
        Err(_) => std::ptr::null_mut(),
    }
}
