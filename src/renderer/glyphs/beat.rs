//! Beat and voice containers plus the effect glyphs attached to beats.

use super::{glyph_bounds, Bounds, Glyph, GlyphGroup, GroupLayout, RenderContext};
use crate::model::BendPoint;
use crate::platform::{Canvas, TextAlign};
use crate::renderer::beat_map::BeatTime;
use crate::renderer::constants::*;
use crate::settings::Font;

/// All glyphs of one beat: accidentals before the heads, the heads (or the
/// rest) themselves, dots after them and effects drawn on top.
pub struct BeatContainerGlyph {
    bounds: Bounds,
    pub beat_index: usize,
    /// Position of the beat inside the bar
    pub time: BeatTime,
    /// Sounding length in ticks, 0 for grace and empty beats
    pub duration: i32,
    pub pre_notes: GlyphGroup,
    pub on_notes: GlyphGroup,
    pub post_notes: GlyphGroup,
    pub effects: GlyphGroup,
}

impl BeatContainerGlyph {
    pub fn new(beat_index: usize, time: BeatTime, duration: i32) -> Self {
        Self {
            bounds: Bounds::default(),
            beat_index,
            time,
            duration,
            pre_notes: GlyphGroup::new(GroupLayout::LeftToRight),
            on_notes: GlyphGroup::new(GroupLayout::Overlay),
            post_notes: GlyphGroup::new(GroupLayout::LeftToRight),
            effects: GlyphGroup::new(GroupLayout::Overlay),
        }
    }

    /// Left edge of the note heads, relative to the bar.
    pub fn on_notes_x(&self) -> f64 {
        self.bounds.x + self.on_notes.x()
    }

    /// Width of the widest note head (or rest).
    pub fn on_notes_width(&self) -> f64 {
        self.on_notes.width()
    }

    pub fn set_x(&mut self, x: f64) {
        self.bounds.x = x;
    }
}

impl Glyph for BeatContainerGlyph {
    glyph_bounds!();

    fn measure(&mut self, ctx: &RenderContext<'_>) {
        self.pre_notes.measure(ctx);
        self.on_notes.measure(ctx);
        self.post_notes.measure(ctx);
        self.effects.measure(ctx);

        let on_x = self.pre_notes.width();
        self.on_notes.bounds_mut().x = on_x;
        self.effects.bounds_mut().x = on_x;
        let post_x = on_x + self.on_notes.width();
        self.post_notes.bounds_mut().x = post_x;

        self.bounds.width = post_x + self.post_notes.width() + BEAT_PADDING * ctx.scale;
        self.bounds.height = self
            .on_notes
            .bounds()
            .height
            .max(self.pre_notes.bounds().height);
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>) {
        let (x, y) = (cx + self.bounds.x, cy + self.bounds.y);
        self.pre_notes.paint(x, y, canvas, ctx);
        self.on_notes.paint(x, y, canvas, ctx);
        self.post_notes.paint(x, y, canvas, ctx);
        self.effects.paint(x, y, canvas, ctx);
    }

    fn anchored(&self) -> bool {
        true
    }
}

/// The beats of one voice in beat order.
pub struct VoiceContainerGlyph {
    bounds: Bounds,
    pub voice_index: usize,
    pub beats: Vec<BeatContainerGlyph>,
}

impl VoiceContainerGlyph {
    pub fn new(voice_index: usize) -> Self {
        Self {
            bounds: Bounds::default(),
            voice_index,
            beats: Vec::new(),
        }
    }

    pub fn add_beat(&mut self, glyph: BeatContainerGlyph) {
        self.beats.push(glyph);
    }

    pub fn beat_mut(&mut self, beat_index: usize) -> Option<&mut BeatContainerGlyph> {
        self.beats.iter_mut().find(|b| b.beat_index == beat_index)
    }

    pub fn beat(&self, beat_index: usize) -> Option<&BeatContainerGlyph> {
        self.beats.iter().find(|b| b.beat_index == beat_index)
    }

    /// Sum of the minimal beat widths.
    pub fn min_width(&self) -> f64 {
        self.beats.iter().map(|b| b.width()).sum()
    }
}

impl Glyph for VoiceContainerGlyph {
    glyph_bounds!();

    fn measure(&mut self, ctx: &RenderContext<'_>) {
        let mut height = 0.0f64;
        for beat in &mut self.beats {
            beat.measure(ctx);
            height = height.max(beat.bounds().height);
        }
        self.bounds.width = self.min_width();
        self.bounds.height = height;
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>) {
        let (x, y) = (cx + self.bounds.x, cy + self.bounds.y);
        for beat in &self.beats {
            beat.paint(x, y, canvas, ctx);
        }
    }
}

/// Fret number on a tablature line. `y` is the center of the line.
pub struct TabNoteNumberGlyph {
    bounds: Bounds,
    pub text: String,
    font: Font,
}

impl TabNoteNumberGlyph {
    pub fn new(text: String, y: f64, font: Font) -> Self {
        Self {
            bounds: Bounds {
                y,
                ..Bounds::default()
            },
            text,
            font,
        }
    }

    fn scaled_font(&self, scale: f64) -> Font {
        Font {
            size: self.font.size * scale,
            ..self.font.clone()
        }
    }
}

impl Glyph for TabNoteNumberGlyph {
    glyph_bounds!();

    fn measure(&mut self, ctx: &RenderContext<'_>) {
        let font = self.scaled_font(ctx.scale);
        self.bounds.width = font.measure_text(&self.text);
        self.bounds.height = font.size;
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>) {
        let font = self.scaled_font(ctx.scale);
        canvas.set_font(&font);
        canvas.set_text_align(TextAlign::Left);
        canvas.fill_text(
            &self.text,
            cx + self.bounds.x,
            cy + self.bounds.y + font.size / 3.0,
        );
    }

    fn anchored(&self) -> bool {
        true
    }
}

/// Whammy bar curve drawn above a beat. `y` is the zero line of the curve.
pub struct WhammyBarGlyph {
    bounds: Bounds,
    points: Vec<BendPoint>,
}

impl WhammyBarGlyph {
    pub fn new(points: Vec<BendPoint>, y: f64) -> Self {
        Self {
            bounds: Bounds {
                y,
                ..Bounds::default()
            },
            points,
        }
    }

    /// Extent above and below the zero line, at the given scale.
    pub fn extent(points: &[BendPoint], scale: f64) -> (f64, f64) {
        let max = points.iter().map(|p| p.value).max().unwrap_or(0).max(0);
        let min = points.iter().map(|p| p.value).min().unwrap_or(0).min(0);
        (
            max as f64 * WHAMMY_HEIGHT * scale,
            -(min as f64) * WHAMMY_HEIGHT * scale,
        )
    }
}

impl Glyph for WhammyBarGlyph {
    glyph_bounds!();

    fn measure(&mut self, ctx: &RenderContext<'_>) {
        let (above, below) = Self::extent(&self.points, ctx.scale);
        self.bounds.width = BEND_WIDTH * 2.0 * ctx.scale;
        self.bounds.height = above + below;
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>) {
        if self.points.len() < 2 {
            return;
        }
        let x = cx + self.bounds.x;
        let y = cy + self.bounds.y;
        let span = BEND_WIDTH * 2.0 * ctx.scale;
        canvas.set_line_width(STEM_WIDTH * ctx.scale);
        canvas.begin_path();
        for (i, point) in self.points.iter().enumerate() {
            let px = x + span * point.offset as f64 / 60.0;
            let py = y - point.value as f64 * WHAMMY_HEIGHT * ctx.scale;
            if i == 0 {
                canvas.move_to(px, py);
            } else {
                canvas.line_to(px, py);
            }
        }
        canvas.stroke();
    }

    fn anchored(&self) -> bool {
        true
    }
}

/// Bend arrow rising from a fret number, labelled with the bend amount.
/// `y` is the center of the string line.
pub struct TabBendGlyph {
    bounds: Bounds,
    /// Highest bend value in quarter tones
    value: i32,
}

impl TabBendGlyph {
    pub fn new(points: &[BendPoint], y: f64) -> Self {
        Self {
            bounds: Bounds {
                y,
                ..Bounds::default()
            },
            value: points.iter().map(|p| p.value).max().unwrap_or(0),
        }
    }

    /// Height of the arrow for a bend of `value` quarter tones.
    pub fn arrow_height(value: i32, scale: f64) -> f64 {
        BEND_HEIGHT * scale * (value.max(0) as f64 / 4.0).max(0.5)
    }

    /// "full" for a whole tone, fractions of a tone otherwise.
    pub fn label(quarter_tones: i32) -> String {
        let whole = quarter_tones / 4;
        let fraction = match quarter_tones % 4 {
            1 => "1/4",
            2 => "1/2",
            3 => "3/4",
            _ => "",
        };
        match (whole, fraction) {
            (0, "") => String::new(),
            (1, "") => "full".to_string(),
            (w, "") => w.to_string(),
            (0, f) => f.to_string(),
            (w, f) => format!("{w} {f}"),
        }
    }
}

impl Glyph for TabBendGlyph {
    glyph_bounds!();

    fn measure(&mut self, ctx: &RenderContext<'_>) {
        self.bounds.width = BEND_WIDTH * ctx.scale;
        self.bounds.height = Self::arrow_height(self.value, ctx.scale);
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>) {
        if self.value <= 0 {
            return;
        }
        let s = ctx.scale;
        let x = cx + self.bounds.x + BEND_WIDTH * s * 0.5;
        let y = cy + self.bounds.y;
        let top = y - Self::arrow_height(self.value, s);
        let head = 3.0 * s;

        canvas.set_line_width(STEM_WIDTH * s);
        canvas.begin_path();
        canvas.move_to(x, y);
        canvas.line_to(x + BEND_WIDTH * s * 0.5, top + head);
        canvas.stroke();

        let tip = x + BEND_WIDTH * s * 0.5;
        canvas.begin_path();
        canvas.move_to(tip - head, top + head);
        canvas.line_to(tip, top);
        canvas.line_to(tip + head, top + head);
        canvas.close_path();
        canvas.fill();

        let font = Font {
            size: ctx.resources.tablature_font.size * s,
            ..ctx.resources.tablature_font.clone()
        };
        canvas.set_font(&font);
        canvas.set_text_align(TextAlign::Center);
        canvas.fill_text(&Self::label(self.value), tip, top - 2.0 * s);
        canvas.set_text_align(TextAlign::Left);
    }

    fn anchored(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::RecordingCanvas;
    use crate::renderer::glyphs::SpacingGlyph;
    use crate::settings::RenderingResources;
    use pretty_assertions::assert_eq;

    #[test]
    fn bend_labels() {
        assert_eq!(TabBendGlyph::label(4), "full");
        assert_eq!(TabBendGlyph::label(2), "1/2");
        assert_eq!(TabBendGlyph::label(6), "1 1/2");
        assert_eq!(TabBendGlyph::label(8), "2");
        assert_eq!(TabBendGlyph::label(1), "1/4");
    }

    #[test]
    fn whammy_extent_covers_dive_and_pull() {
        let points = vec![
            BendPoint::new(0, 0),
            BendPoint::new(30, -4),
            BendPoint::new(60, 2),
        ];
        assert_eq!(WhammyBarGlyph::extent(&points, 1.0), (4.0, 8.0));
    }

    #[test]
    fn beat_container_places_heads_after_accidentals() {
        let resources = RenderingResources::default();
        let ctx = RenderContext {
            scale: 1.0,
            resources: &resources,
        };
        let mut beat = BeatContainerGlyph::new(0, BeatTime::new(0), 960);
        beat.pre_notes.add(SpacingGlyph::new(8.0));
        beat.on_notes.add(SpacingGlyph::new(10.0));
        beat.set_x(20.0);
        beat.measure(&ctx);
        assert_eq!(beat.on_notes_x(), 28.0);
        assert_eq!(beat.on_notes_width(), 10.0);
        assert_eq!(beat.width(), 18.0 + BEAT_PADDING);

        let mut canvas = RecordingCanvas::new();
        beat.paint(0.0, 0.0, &mut canvas, &ctx);
        assert!(canvas.ops().is_empty());
    }
}
