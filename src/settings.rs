//! Render settings and rendering resources (fonts, colors).
//!
//! Settings are supplied by the host. Every field is defaulted so a partial
//! JSON document yields a complete configuration, and a malformed document
//! falls back to the built-in defaults instead of failing the render.

use serde::{Deserialize, Serialize};

/// How bars are distributed into systems.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutMode {
    /// Systems wrap at the configured width and are stretched to fill it.
    #[default]
    Page,
    /// A single system holding every bar at its minimal width.
    Horizontal,
}

/// Which renderer kinds are stacked for each staff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StaveProfile {
    /// Derived from the staff's own display flags.
    #[default]
    Default,
    ScoreTab,
    Score,
    Tab,
    TabMixed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderSettings {
    pub scale: f64,
    /// Total width of a page-mode layout
    pub width: f64,
    pub layout_mode: LayoutMode,
    pub stave_profile: StaveProfile,
    /// First bar to render, 1-based
    pub start_bar: usize,
    /// Number of bars to render, -1 for all
    pub bar_count: i32,
    /// Fixed number of bars per system, -1 to fill by width
    pub bars_per_row: i32,
    /// Suppress title, artist and other score info
    pub hide_info: bool,
    /// Suppress the tuning of the first stringed staff in the header
    pub hide_tuning: bool,
    /// Suppress the chord diagrams in the header
    pub hide_chord_diagrams: bool,
    pub resources: RenderingResources,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            scale: 1.0,
            width: 950.0,
            layout_mode: LayoutMode::Page,
            stave_profile: StaveProfile::Default,
            start_bar: 1,
            bar_count: -1,
            bars_per_row: -1,
            hide_info: false,
            hide_tuning: false,
            hide_chord_diagrams: false,
            resources: RenderingResources::default(),
        }
    }
}

impl RenderSettings {
    /// Read settings from JSON, falling back to the defaults when the
    /// document cannot be parsed.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Invalid render settings, using defaults: {e}");
                Self::default()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FontStyle {
    #[default]
    Plain,
    Bold,
    Italic,
    BoldItalic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Font {
    pub family: String,
    pub size: f64,
    pub style: FontStyle,
}

impl Default for Font {
    fn default() -> Self {
        Self::new("Arial", 12.0, FontStyle::Plain)
    }
}

impl Font {
    pub fn new(family: &str, size: f64, style: FontStyle) -> Self {
        Self {
            family: family.to_string(),
            size,
            style,
        }
    }

    /// Approximate advance width of `text` in this font. Used whenever the
    /// drawing surface has no real font metrics.
    pub fn measure_text(&self, text: &str) -> f64 {
        let factor = match self.style {
            FontStyle::Bold | FontStyle::BoldItalic => 0.62,
            _ => 0.56,
        };
        text.chars().count() as f64 * self.size * factor
    }

    pub fn is_bold(&self) -> bool {
        matches!(self.style, FontStyle::Bold | FontStyle::BoldItalic)
    }

    pub fn is_italic(&self) -> bool {
        matches!(self.style, FontStyle::Italic | FontStyle::BoldItalic)
    }
}

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Color {
    fn default() -> Self {
        Color::rgb(0, 0, 0)
    }
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// CSS notation, `#rrggbb` for opaque colors.
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({},{},{},{:.2})",
                self.r,
                self.g,
                self.b,
                self.a as f64 / 255.0
            )
        }
    }
}

/// Fonts and colors used while painting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderingResources {
    pub copyright_font: Font,
    pub title_font: Font,
    pub sub_title_font: Font,
    pub words_font: Font,
    pub effect_font: Font,
    pub fretboard_number_font: Font,
    pub tablature_font: Font,
    pub grace_font: Font,
    pub bar_number_font: Font,
    /// Family used for SMuFL notation symbols
    pub music_font_family: String,
    pub staff_line_color: Color,
    pub bar_separator_color: Color,
    pub bar_number_color: Color,
    pub main_glyph_color: Color,
    pub secondary_glyph_color: Color,
    pub score_info_color: Color,
}

impl Default for RenderingResources {
    fn default() -> Self {
        let sans = "Arial";
        let serif = "Georgia";
        Self {
            copyright_font: Font::new(sans, 12.0, FontStyle::Bold),
            title_font: Font::new(serif, 32.0, FontStyle::Plain),
            sub_title_font: Font::new(serif, 20.0, FontStyle::Plain),
            words_font: Font::new(serif, 15.0, FontStyle::Plain),
            effect_font: Font::new(serif, 12.0, FontStyle::Italic),
            fretboard_number_font: Font::new(sans, 11.0, FontStyle::Plain),
            tablature_font: Font::new(sans, 13.0, FontStyle::Plain),
            grace_font: Font::new(sans, 11.0, FontStyle::Plain),
            bar_number_font: Font::new(sans, 11.0, FontStyle::Plain),
            music_font_family: "Bravura".to_string(),
            staff_line_color: Color::rgb(165, 165, 165),
            bar_separator_color: Color::rgb(34, 34, 17),
            bar_number_color: Color::rgb(200, 0, 0),
            main_glyph_color: Color::rgb(0, 0, 0),
            secondary_glyph_color: Color::rgba(0, 0, 0, 100),
            score_info_color: Color::rgb(0, 0, 0),
        }
    }
}
