//! scorelayout — notation layout and rendering engine.
//!
//! Takes a read-only `Score` model, lays the selected bars out into systems
//! of standard notation, tablature and slash staves, and paints them onto a
//! `Canvas`. Two canvases ship with the crate: `SvgCanvas` produces one SVG
//! document per render unit and `RecordingCanvas` keeps the draw calls.
//!
//! # Example
//! ```no_run
//! use scorelayout::{render_score_to_svg, score_from_json, RenderSettings};
//!
//! let json = std::fs::read_to_string("song.json").unwrap();
//! let score = score_from_json(&json).unwrap();
//! let documents = render_score_to_svg(&score, &RenderSettings::default()).unwrap();
//! println!("{} render units", documents.len());
//! ```

pub mod error;
pub mod model;
pub mod platform;
pub mod renderer;
pub mod settings;

pub use error::LayoutError;
pub use model::*;
pub use platform::{Canvas, DrawOp, MusicFontSymbol, RecordingCanvas, SvgCanvas, TextAlign};
pub use renderer::{BarId, PartialRender, ScoreLayout};
pub use settings::{LayoutMode, RenderSettings, RenderingResources, StaveProfile};

/// Parse a score model from JSON.
pub fn score_from_json(json: &str) -> Result<Score, LayoutError> {
    Ok(serde_json::from_str(json)?)
}

/// Convert a score to a JSON string.
/// Useful for passing data across FFI boundaries.
pub fn score_to_json(score: &Score) -> Result<String, LayoutError> {
    Ok(serde_json::to_string_pretty(score)?)
}

/// Lay the score out and render it to SVG, one document per render unit
/// (header, each system, footer).
pub fn render_score_to_svg(
    score: &Score,
    settings: &RenderSettings,
) -> Result<Vec<String>, LayoutError> {
    let mut layout = ScoreLayout::new(score, settings);
    layout.update_sizes()?;
    layout.do_layout()?;
    let mut canvas = SvgCanvas::with_resources(&settings.resources);
    layout.paint(&mut canvas);
    Ok(canvas.into_documents())
}

/// Render a JSON score with JSON settings to a JSON array of SVG documents.
pub fn render_json_to_svg(score_json: &str, settings_json: &str) -> Result<String, LayoutError> {
    let score = score_from_json(score_json)?;
    let settings = RenderSettings::from_json(settings_json);
    let documents = render_score_to_svg(&score, &settings)?;
    Ok(serde_json::to_string(&documents)?)
}

// ═══════════════════════════════════════════════════════════════════════
// C FFI
// ═══════════════════════════════════════════════════════════════════════

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Render a JSON score and return a JSON array of SVG documents as a C
/// string. The caller must free it with `scorelayout_free_string`.
/// Returns null on invalid input or a layout error.
///
/// # Safety
/// `score_json` must be a valid null-terminated UTF-8 C string.
/// `settings_json` may be null for default settings.
#[no_mangle]
pub unsafe extern "C" fn scorelayout_render_json(
    score_json: *const c_char,
    settings_json: *const c_char,
) -> *mut c_char {
    if score_json.is_null() {
        return std::ptr::null_mut();
    }
    let Ok(score) = unsafe { CStr::from_ptr(score_json) }.to_str() else {
        return std::ptr::null_mut();
    };
    let settings = if settings_json.is_null() {
        "{}"
    } else {
        unsafe { CStr::from_ptr(settings_json) }
            .to_str()
            .unwrap_or("{}")
    };

    match render_json_to_svg(score, settings) {
        Ok(json) => CString::new(json).unwrap_or_default().into_raw(),
        Err(e) => {
            log::warn!("Rendering failed: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Free a string previously returned by scorelayout functions.
///
/// # Safety
/// `ptr` must be a string previously returned by a scorelayout function, or null.
#[no_mangle]
pub unsafe extern "C" fn scorelayout_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}
