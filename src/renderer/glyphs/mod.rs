//! The glyph tree: every positionable piece of a bar.
//!
//! Glyphs are built once per bar, measured bottom-up and painted top-down.
//! `paint` receives the origin of the parent; a glyph draws itself at
//! `origin + (x, y)`. Painting never changes sizes, so a tree can be painted
//! any number of times.

macro_rules! glyph_bounds {
    () => {
        fn bounds(&self) -> &$crate::renderer::glyphs::Bounds {
            &self.bounds
        }

        fn bounds_mut(&mut self) -> &mut $crate::renderer::glyphs::Bounds {
            &mut self.bounds
        }
    };
}
pub(crate) use glyph_bounds;

mod bar;
mod beat;
mod header;
mod symbols;

pub(crate) use bar::{
    BarNumberGlyph, BarSeparatorGlyph, RepeatCloseGlyph, RepeatCountGlyph, RepeatOpenGlyph,
};
pub(crate) use beat::{
    BeatContainerGlyph, TabBendGlyph, TabNoteNumberGlyph, VoiceContainerGlyph, WhammyBarGlyph,
};
pub(crate) use header::{ChordDiagramGlyph, TuningGlyph};
pub(crate) use symbols::{
    ghost_parentheses, AccidentalGlyph, CircleGlyph, ClefGlyph, KeySignatureGlyph,
    MusicFontGlyph, NoteHeadGlyph, RestGlyph, TextGlyph, TimeSignatureGlyph,
};

use crate::platform::Canvas;
use crate::settings::RenderingResources;

/// Everything a glyph may consult while measuring or painting.
#[derive(Clone, Copy)]
pub struct RenderContext<'r> {
    pub scale: f64,
    pub resources: &'r RenderingResources,
}

/// Position relative to the parent, and measured size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

pub trait Glyph {
    fn bounds(&self) -> &Bounds;
    fn bounds_mut(&mut self) -> &mut Bounds;

    /// Compute `width` and `height`. Calling it again must give the same
    /// result.
    fn measure(&mut self, ctx: &RenderContext<'_>);

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>);

    /// Anchored glyphs keep their own `x` inside a left-to-right group.
    fn anchored(&self) -> bool {
        false
    }

    fn x(&self) -> f64 {
        self.bounds().x
    }

    fn width(&self) -> f64 {
        self.bounds().width
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupLayout {
    /// Children are placed one after another.
    #[default]
    LeftToRight,
    /// Children keep their positions; the group spans their union.
    Overlay,
}

/// An ordered container of glyphs.
#[derive(Default)]
pub struct GlyphGroup {
    bounds: Bounds,
    pub layout: GroupLayout,
    pub glyphs: Vec<Box<dyn Glyph>>,
}

impl GlyphGroup {
    pub fn new(layout: GroupLayout) -> Self {
        Self {
            bounds: Bounds::default(),
            layout,
            glyphs: Vec::new(),
        }
    }

    pub fn add(&mut self, glyph: impl Glyph + 'static) {
        self.glyphs.push(Box::new(glyph));
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }
}

impl Glyph for GlyphGroup {
    glyph_bounds!();

    fn measure(&mut self, ctx: &RenderContext<'_>) {
        let mut offset = 0.0f64;
        let mut right = 0.0f64;
        let mut bottom = 0.0f64;
        for glyph in &mut self.glyphs {
            glyph.measure(ctx);
            if self.layout == GroupLayout::LeftToRight && !glyph.anchored() {
                glyph.bounds_mut().x = offset;
                offset += glyph.width();
            }
            let b = glyph.bounds();
            right = right.max(b.x + b.width);
            bottom = bottom.max(b.y + b.height);
        }
        self.bounds.width = right.max(offset);
        self.bounds.height = bottom;
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>) {
        let (ox, oy) = (cx + self.bounds.x, cy + self.bounds.y);
        for glyph in &self.glyphs {
            glyph.paint(ox, oy, canvas, ctx);
        }
    }
}

/// Reserves horizontal space without drawing anything.
pub struct SpacingGlyph {
    bounds: Bounds,
    units: f64,
}

impl SpacingGlyph {
    pub fn new(units: f64) -> Self {
        Self {
            bounds: Bounds::default(),
            units,
        }
    }
}

impl Glyph for SpacingGlyph {
    glyph_bounds!();

    fn measure(&mut self, ctx: &RenderContext<'_>) {
        self.bounds.width = self.units * ctx.scale;
    }

    fn paint(&self, _cx: f64, _cy: f64, _canvas: &mut dyn Canvas, _ctx: &RenderContext<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{MusicFontSymbol, RecordingCanvas};
    use pretty_assertions::assert_eq;

    fn ctx(resources: &RenderingResources) -> RenderContext<'_> {
        RenderContext {
            scale: 1.0,
            resources,
        }
    }

    #[test]
    fn left_to_right_places_children() {
        let resources = RenderingResources::default();
        let mut group = GlyphGroup::new(GroupLayout::LeftToRight);
        group.add(SpacingGlyph::new(5.0));
        group.add(MusicFontGlyph::new(MusicFontSymbol::AccidentalSharp));
        group.add(SpacingGlyph::new(3.0));
        group.measure(&ctx(&resources));

        let xs: Vec<f64> = group.glyphs.iter().map(|g| g.x()).collect();
        assert_eq!(xs, vec![0.0, 5.0, 5.0 + MusicFontSymbol::AccidentalSharp.width()]);
        assert_eq!(
            group.width(),
            8.0 + MusicFontSymbol::AccidentalSharp.width()
        );
    }

    #[test]
    fn measuring_twice_is_stable() {
        let resources = RenderingResources::default();
        let c = ctx(&resources);
        let mut group = GlyphGroup::new(GroupLayout::LeftToRight);
        group.add(SpacingGlyph::new(2.0));
        let mut inner = GlyphGroup::new(GroupLayout::Overlay);
        inner.add(NoteHeadGlyph::new(MusicFontSymbol::NoteheadBlack, false));
        group.add(inner);
        group.add(TextGlyph::new("3", resources.effect_font.clone()));

        group.measure(&c);
        let first = (group.width(), group.bounds().height);
        let first_xs: Vec<f64> = group.glyphs.iter().map(|g| g.x()).collect();
        group.measure(&c);
        let second_xs: Vec<f64> = group.glyphs.iter().map(|g| g.x()).collect();

        assert_eq!(first, (group.width(), group.bounds().height));
        assert_eq!(first_xs, second_xs);
    }

    #[test]
    fn overlay_keeps_positions_and_paints_with_offsets() {
        let resources = RenderingResources::default();
        let c = ctx(&resources);
        let mut group = GlyphGroup::new(GroupLayout::Overlay);
        let mut head = NoteHeadGlyph::new(MusicFontSymbol::NoteheadBlack, false);
        head.bounds_mut().y = 12.0;
        group.add(head);
        group.bounds_mut().x = 10.0;
        group.measure(&c);

        let mut canvas = RecordingCanvas::new();
        group.paint(100.0, 50.0, &mut canvas, &c);
        assert_eq!(
            canvas.ops(),
            &[crate::platform::DrawOp::FillMusicFontSymbol {
                x: 110.0,
                y: 62.0,
                scale: 1.0,
                symbol: MusicFontSymbol::NoteheadBlack,
                centered: false,
            }]
        );
    }
}
