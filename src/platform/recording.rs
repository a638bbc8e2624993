//! A canvas that keeps every draw call as a value, for inspection by hosts
//! that do their own rasterization and by tests.

use super::{Canvas, MusicFontSymbol, TextAlign};
use crate::settings::{Color, Font};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    BeginRender { width: f64, height: f64 },
    EndRender,
    SetColor(Color),
    SetLineWidth(f64),
    SetFont(Font),
    SetTextAlign(TextAlign),
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    ClosePath,
    Stroke,
    Fill,
    FillRect { x: f64, y: f64, width: f64, height: f64 },
    FillCircle { x: f64, y: f64, radius: f64 },
    FillText { text: String, x: f64, y: f64 },
    FillMusicFontSymbol {
        x: f64,
        y: f64,
        scale: f64,
        symbol: MusicFontSymbol,
        centered: bool,
    },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    ops: Vec<DrawOp>,
    color: Color,
    line_width: f64,
    font: Font,
    text_align: TextAlign,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self {
            line_width: 1.0,
            ..Self::default()
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Number of completed render units.
    pub fn render_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::EndRender))
            .count()
    }

    /// Every stroked path as its list of points.
    pub fn stroked_paths(&self) -> Vec<Vec<(f64, f64)>> {
        self.paths(|op| matches!(op, DrawOp::Stroke))
    }

    /// Every filled path as its list of points.
    pub fn filled_paths(&self) -> Vec<Vec<(f64, f64)>> {
        self.paths(|op| matches!(op, DrawOp::Fill))
    }

    fn paths(&self, terminates: impl Fn(&DrawOp) -> bool) -> Vec<Vec<(f64, f64)>> {
        let mut result = Vec::new();
        let mut current: Vec<(f64, f64)> = Vec::new();
        for op in &self.ops {
            match op {
                DrawOp::BeginPath => current.clear(),
                DrawOp::MoveTo(x, y) | DrawOp::LineTo(x, y) => current.push((*x, *y)),
                DrawOp::Stroke | DrawOp::Fill => {
                    if terminates(op) {
                        result.push(current.clone());
                    }
                    current.clear();
                }
                _ => {}
            }
        }
        result
    }

    /// All text drawn, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// All music symbols drawn, in order.
    pub fn symbols(&self) -> Vec<MusicFontSymbol> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillMusicFontSymbol { symbol, .. } => Some(*symbol),
                _ => None,
            })
            .collect()
    }

    pub fn count_symbol(&self, symbol: MusicFontSymbol) -> usize {
        self.symbols().into_iter().filter(|s| *s == symbol).count()
    }
}

impl Canvas for RecordingCanvas {
    fn begin_render(&mut self, width: f64, height: f64) {
        self.ops.push(DrawOp::BeginRender { width, height });
    }

    fn end_render(&mut self) {
        self.ops.push(DrawOp::EndRender);
    }

    fn color(&self) -> Color {
        self.color
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
        self.ops.push(DrawOp::SetColor(color));
    }

    fn line_width(&self) -> f64 {
        self.line_width
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
        self.ops.push(DrawOp::SetLineWidth(width));
    }

    fn font(&self) -> &Font {
        &self.font
    }

    fn set_font(&mut self, font: &Font) {
        self.font = font.clone();
        self.ops.push(DrawOp::SetFont(font.clone()));
    }

    fn text_align(&self) -> TextAlign {
        self.text_align
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.text_align = align;
        self.ops.push(DrawOp::SetTextAlign(align));
    }

    fn begin_path(&mut self) {
        self.ops.push(DrawOp::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::LineTo(x, y));
    }

    fn close_path(&mut self) {
        self.ops.push(DrawOp::ClosePath);
    }

    fn stroke(&mut self) {
        self.ops.push(DrawOp::Stroke);
    }

    fn fill(&mut self) {
        self.ops.push(DrawOp::Fill);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(DrawOp::FillRect {
            x,
            y,
            width,
            height,
        });
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64) {
        self.ops.push(DrawOp::FillCircle { x, y, radius });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.ops.push(DrawOp::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn fill_music_font_symbol(
        &mut self,
        x: f64,
        y: f64,
        scale: f64,
        symbol: MusicFontSymbol,
        center_at_position: bool,
    ) {
        self.ops.push(DrawOp::FillMusicFontSymbol {
            x,
            y,
            scale,
            symbol,
            centered: center_at_position,
        });
    }
}
