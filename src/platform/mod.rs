//! The drawing-surface contract and the reference surfaces shipped with the
//! crate.

mod music_font;
mod recording;
mod svg;

pub use music_font::MusicFontSymbol;
pub use recording::{DrawOp, RecordingCanvas};
pub use svg::SvgCanvas;

use crate::settings::{Color, Font};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// A drawing backend receiving primitive operations.
///
/// Every standalone output unit is bracketed by `begin_render` and
/// `end_render`; no state is assumed to survive between two units.
pub trait Canvas {
    fn begin_render(&mut self, width: f64, height: f64);
    fn end_render(&mut self);

    fn color(&self) -> Color;
    fn set_color(&mut self, color: Color);
    fn line_width(&self) -> f64;
    fn set_line_width(&mut self, width: f64);
    fn font(&self) -> &Font;
    fn set_font(&mut self, font: &Font);
    fn text_align(&self) -> TextAlign;
    fn set_text_align(&mut self, align: TextAlign);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn close_path(&mut self);
    fn stroke(&mut self);
    fn fill(&mut self);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);

    /// Width of `text` in the current font.
    fn measure_text(&self, text: &str) -> f64 {
        self.font().measure_text(text)
    }

    /// Draw a notation symbol with its baseline at `y`. `scale` multiplies
    /// the nominal music font size.
    fn fill_music_font_symbol(
        &mut self,
        x: f64,
        y: f64,
        scale: f64,
        symbol: MusicFontSymbol,
        center_at_position: bool,
    );
}
