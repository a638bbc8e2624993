//! Glyphs placed before and after the beats of a bar.

use super::{glyph_bounds, Bounds, Glyph, RenderContext};
use crate::platform::{Canvas, TextAlign};
use crate::renderer::constants::*;
use crate::settings::Font;

/// The vertical extent a bar line covers, in renderer coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSpan {
    pub top: f64,
    pub bottom: f64,
}

/// Closing bar line; a thin+thick pair on the last bar of the score.
pub struct BarSeparatorGlyph {
    bounds: Bounds,
    span: LineSpan,
    is_final: bool,
}

impl BarSeparatorGlyph {
    pub fn new(top: f64, bottom: f64, is_final: bool) -> Self {
        Self {
            bounds: Bounds::default(),
            span: LineSpan { top, bottom },
            is_final,
        }
    }
}

impl Glyph for BarSeparatorGlyph {
    glyph_bounds!();

    fn measure(&mut self, ctx: &RenderContext<'_>) {
        self.bounds.width = if self.is_final {
            BAR_SEPARATOR_WIDTH * ctx.scale
        } else {
            THIN_LINE * ctx.scale
        };
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>) {
        canvas.set_color(ctx.resources.bar_separator_color);
        let right = cx + self.bounds.x + self.bounds.width;
        let top = cy + self.span.top;
        let height = self.span.bottom - self.span.top;
        if self.is_final {
            let thick = THICK_LINE * ctx.scale;
            canvas.fill_rect(right - thick, top, thick, height);
            canvas.fill_rect(
                right - thick - THICK_LINE * ctx.scale - THIN_LINE * ctx.scale,
                top,
                THIN_LINE * ctx.scale,
                height,
            );
        } else {
            let thin = THIN_LINE * ctx.scale;
            canvas.fill_rect(right - thin, top, thin, height);
        }
        canvas.set_color(ctx.resources.main_glyph_color);
    }
}

/// Thick bar, thin bar and two dots opening a repeated section.
pub struct RepeatOpenGlyph {
    bounds: Bounds,
    span: LineSpan,
    /// y of the two dots
    dots: (f64, f64),
}

impl RepeatOpenGlyph {
    pub fn new(top: f64, bottom: f64, dots: (f64, f64)) -> Self {
        Self {
            bounds: Bounds::default(),
            span: LineSpan { top, bottom },
            dots,
        }
    }
}

impl Glyph for RepeatOpenGlyph {
    glyph_bounds!();

    fn measure(&mut self, ctx: &RenderContext<'_>) {
        self.bounds.width = (THICK_LINE + THIN_LINE * 3.0 + REPEAT_DOT_RADIUS * 2.0 + PRE_BEAT_GAP)
            * ctx.scale;
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>) {
        let s = ctx.scale;
        let x = cx + self.bounds.x;
        let top = cy + self.span.top;
        let height = self.span.bottom - self.span.top;
        canvas.set_color(ctx.resources.bar_separator_color);
        canvas.fill_rect(x, top, THICK_LINE * s, height);
        let thin_x = x + (THICK_LINE + THIN_LINE) * s;
        canvas.fill_rect(thin_x, top, THIN_LINE * s, height);
        let dot_x = thin_x + (THIN_LINE * 2.0 + REPEAT_DOT_RADIUS) * s;
        canvas.fill_circle(dot_x, cy + self.dots.0, REPEAT_DOT_RADIUS * s);
        canvas.fill_circle(dot_x, cy + self.dots.1, REPEAT_DOT_RADIUS * s);
        canvas.set_color(ctx.resources.main_glyph_color);
    }
}

/// Two dots, thin bar and thick bar closing a repeated section.
pub struct RepeatCloseGlyph {
    bounds: Bounds,
    span: LineSpan,
    dots: (f64, f64),
}

impl RepeatCloseGlyph {
    pub fn new(top: f64, bottom: f64, dots: (f64, f64)) -> Self {
        Self {
            bounds: Bounds::default(),
            span: LineSpan { top, bottom },
            dots,
        }
    }
}

impl Glyph for RepeatCloseGlyph {
    glyph_bounds!();

    fn measure(&mut self, ctx: &RenderContext<'_>) {
        self.bounds.width =
            (REPEAT_DOT_RADIUS * 2.0 + THIN_LINE * 3.0 + THICK_LINE + THIN_LINE) * ctx.scale;
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>) {
        let s = ctx.scale;
        let x = cx + self.bounds.x;
        let top = cy + self.span.top;
        let height = self.span.bottom - self.span.top;
        canvas.set_color(ctx.resources.bar_separator_color);
        let dot_x = x + REPEAT_DOT_RADIUS * s;
        canvas.fill_circle(dot_x, cy + self.dots.0, REPEAT_DOT_RADIUS * s);
        canvas.fill_circle(dot_x, cy + self.dots.1, REPEAT_DOT_RADIUS * s);
        let thin_x = dot_x + (REPEAT_DOT_RADIUS + THIN_LINE * 2.0) * s;
        canvas.fill_rect(thin_x, top, THIN_LINE * s, height);
        canvas.fill_rect(thin_x + THIN_LINE * 2.0 * s, top, THICK_LINE * s, height);
        canvas.set_color(ctx.resources.main_glyph_color);
    }
}

/// "x3" above the closing repeat of a section played more than twice.
pub struct RepeatCountGlyph {
    bounds: Bounds,
    count: i32,
}

impl RepeatCountGlyph {
    pub fn new(count: i32, y: f64) -> Self {
        Self {
            bounds: Bounds {
                y,
                ..Bounds::default()
            },
            count,
        }
    }

    pub fn label(&self) -> String {
        format!("x{}", self.count)
    }
}

impl Glyph for RepeatCountGlyph {
    glyph_bounds!();

    fn measure(&mut self, _ctx: &RenderContext<'_>) {
        self.bounds.width = 0.0;
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>) {
        let font = Font {
            size: ctx.resources.bar_number_font.size * ctx.scale,
            ..ctx.resources.bar_number_font.clone()
        };
        canvas.set_font(&font);
        canvas.set_text_align(TextAlign::Right);
        canvas.fill_text(&self.label(), cx + self.bounds.x, cy + self.bounds.y);
        canvas.set_text_align(TextAlign::Left);
    }

    fn anchored(&self) -> bool {
        true
    }
}

/// The 1-based bar number at the start of a system or of every bar.
pub struct BarNumberGlyph {
    bounds: Bounds,
    number: usize,
}

impl BarNumberGlyph {
    pub fn new(number: usize, y: f64) -> Self {
        Self {
            bounds: Bounds {
                y,
                ..Bounds::default()
            },
            number,
        }
    }
}

impl Glyph for BarNumberGlyph {
    glyph_bounds!();

    fn measure(&mut self, _ctx: &RenderContext<'_>) {
        self.bounds.width = 0.0;
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>) {
        let font = Font {
            size: ctx.resources.bar_number_font.size * ctx.scale,
            ..ctx.resources.bar_number_font.clone()
        };
        canvas.set_color(ctx.resources.bar_number_color);
        canvas.set_font(&font);
        canvas.set_text_align(TextAlign::Left);
        canvas.fill_text(&self.number.to_string(), cx + self.bounds.x, cy + self.bounds.y);
        canvas.set_color(ctx.resources.main_glyph_color);
    }

    fn anchored(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{DrawOp, RecordingCanvas};
    use crate::settings::RenderingResources;

    #[test]
    fn final_bar_line_is_double() {
        let resources = RenderingResources::default();
        let ctx = RenderContext {
            scale: 1.0,
            resources: &resources,
        };
        let mut glyph = BarSeparatorGlyph::new(10.0, 46.0, true);
        glyph.measure(&ctx);
        let mut canvas = RecordingCanvas::new();
        glyph.paint(0.0, 0.0, &mut canvas, &ctx);
        let rects = canvas
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::FillRect { .. }))
            .count();
        assert_eq!(rects, 2);
    }

    #[test]
    fn repeat_count_label() {
        assert_eq!(RepeatCountGlyph::new(3, 0.0).label(), "x3");
    }
}
