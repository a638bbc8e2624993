//! Leaf glyphs: music-font symbols, text, dots and the notation symbols
//! built from them.

use super::{glyph_bounds, Bounds, Glyph, GlyphGroup, GroupLayout, RenderContext, SpacingGlyph};
use crate::model::{Clef, Duration, Ottavia};
use crate::platform::{Canvas, MusicFontSymbol, TextAlign};
use crate::renderer::accidentals::AccidentalType;
use crate::renderer::constants::*;
use crate::settings::Font;

/// A single symbol of the music font.
pub struct MusicFontGlyph {
    bounds: Bounds,
    pub symbol: MusicFontSymbol,
    glyph_scale: f64,
    centered: bool,
}

impl MusicFontGlyph {
    pub fn new(symbol: MusicFontSymbol) -> Self {
        Self {
            bounds: Bounds::default(),
            symbol,
            glyph_scale: 1.0,
            centered: false,
        }
    }

    pub fn with_scale(mut self, glyph_scale: f64) -> Self {
        self.glyph_scale = glyph_scale;
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.bounds.x = x;
        self.bounds.y = y;
        self
    }

    /// Draw the symbol centered on `x` instead of starting there.
    pub fn centered(mut self) -> Self {
        self.centered = true;
        self
    }
}

impl Glyph for MusicFontGlyph {
    glyph_bounds!();

    fn measure(&mut self, ctx: &RenderContext<'_>) {
        self.bounds.width = self.symbol.width() * self.glyph_scale * ctx.scale;
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>) {
        canvas.fill_music_font_symbol(
            cx + self.bounds.x,
            cy + self.bounds.y,
            self.glyph_scale * ctx.scale,
            self.symbol,
            self.centered,
        );
    }
}

/// Text in one of the resource fonts. The font size is scaled on paint.
pub struct TextGlyph {
    bounds: Bounds,
    pub text: String,
    font: Font,
    align: TextAlign,
}

impl TextGlyph {
    pub fn new(text: &str, font: Font) -> Self {
        Self {
            bounds: Bounds::default(),
            text: text.to_string(),
            font,
            align: TextAlign::Left,
        }
    }

    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    fn scaled_font(&self, scale: f64) -> Font {
        Font {
            size: self.font.size * scale,
            ..self.font.clone()
        }
    }
}

impl Glyph for TextGlyph {
    glyph_bounds!();

    fn measure(&mut self, ctx: &RenderContext<'_>) {
        let font = self.scaled_font(ctx.scale);
        self.bounds.width = font.measure_text(&self.text);
        self.bounds.height = font.size;
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>) {
        canvas.set_font(&self.scaled_font(ctx.scale));
        canvas.set_text_align(self.align);
        canvas.fill_text(&self.text, cx + self.bounds.x, cy + self.bounds.y);
    }
}

/// A filled dot, used for augmentation dots.
pub struct CircleGlyph {
    bounds: Bounds,
    radius: f64,
}

impl CircleGlyph {
    pub fn new(radius: f64) -> Self {
        Self {
            bounds: Bounds::default(),
            radius,
        }
    }
}

impl Glyph for CircleGlyph {
    glyph_bounds!();

    fn measure(&mut self, ctx: &RenderContext<'_>) {
        self.bounds.width = (self.radius * 2.0 + DOT_SPACING) * ctx.scale;
        self.bounds.height = self.radius * 2.0 * ctx.scale;
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>) {
        let r = self.radius * ctx.scale;
        canvas.fill_circle(
            cx + self.bounds.x + DOT_SPACING * ctx.scale + r,
            cy + self.bounds.y,
            r,
        );
    }
}

/// A note head; `y` is the center line of the head.
pub struct NoteHeadGlyph {
    bounds: Bounds,
    pub symbol: MusicFontSymbol,
    grace: bool,
}

impl NoteHeadGlyph {
    pub fn new(symbol: MusicFontSymbol, grace: bool) -> Self {
        Self {
            bounds: Bounds::default(),
            symbol,
            grace,
        }
    }

    /// Standard head for a duration.
    pub fn symbol_for(duration: Duration) -> MusicFontSymbol {
        match duration {
            Duration::QuadrupleWhole | Duration::DoubleWhole => MusicFontSymbol::NoteheadDoubleWhole,
            Duration::Whole => MusicFontSymbol::NoteheadWhole,
            Duration::Half => MusicFontSymbol::NoteheadHalf,
            _ => MusicFontSymbol::NoteheadBlack,
        }
    }

    /// Slash head for a duration.
    pub fn slash_symbol_for(duration: Duration) -> MusicFontSymbol {
        match duration {
            Duration::QuadrupleWhole | Duration::DoubleWhole | Duration::Whole => {
                MusicFontSymbol::SlashWhiteWhole
            }
            Duration::Half => MusicFontSymbol::SlashHalf,
            _ => MusicFontSymbol::SlashHorizontalEnds,
        }
    }

    fn glyph_scale(&self) -> f64 {
        if self.grace {
            GRACE_SCALE
        } else {
            1.0
        }
    }
}

impl Glyph for NoteHeadGlyph {
    glyph_bounds!();

    fn measure(&mut self, ctx: &RenderContext<'_>) {
        self.bounds.width = self.symbol.width() * self.glyph_scale() * ctx.scale;
        self.bounds.height = LINE_SPACING * ctx.scale;
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>) {
        canvas.fill_music_font_symbol(
            cx + self.bounds.x,
            cy + self.bounds.y,
            self.glyph_scale() * ctx.scale,
            self.symbol,
            false,
        );
    }

    fn anchored(&self) -> bool {
        true
    }
}

pub struct AccidentalGlyph {
    bounds: Bounds,
    pub accidental: AccidentalType,
    grace: bool,
}

impl AccidentalGlyph {
    pub fn new(accidental: AccidentalType, grace: bool) -> Self {
        Self {
            bounds: Bounds::default(),
            accidental,
            grace,
        }
    }

    pub fn at_y(mut self, y: f64) -> Self {
        self.bounds.y = y;
        self
    }

    fn symbol(&self) -> Option<MusicFontSymbol> {
        match self.accidental {
            AccidentalType::None => None,
            AccidentalType::Natural => Some(MusicFontSymbol::AccidentalNatural),
            AccidentalType::Sharp => Some(MusicFontSymbol::AccidentalSharp),
            AccidentalType::Flat => Some(MusicFontSymbol::AccidentalFlat),
        }
    }

    fn glyph_scale(&self) -> f64 {
        if self.grace {
            GRACE_SCALE
        } else {
            1.0
        }
    }
}

impl Glyph for AccidentalGlyph {
    glyph_bounds!();

    fn measure(&mut self, ctx: &RenderContext<'_>) {
        self.bounds.width = match self.symbol() {
            Some(symbol) => (symbol.width() + ACCIDENTAL_GAP) * self.glyph_scale() * ctx.scale,
            None => 0.0,
        };
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>) {
        if let Some(symbol) = self.symbol() {
            canvas.fill_music_font_symbol(
                cx + self.bounds.x,
                cy + self.bounds.y,
                self.glyph_scale() * ctx.scale,
                symbol,
                false,
            );
        }
    }
}

pub struct RestGlyph {
    bounds: Bounds,
    pub duration: Duration,
}

impl RestGlyph {
    pub fn new(duration: Duration) -> Self {
        Self {
            bounds: Bounds::default(),
            duration,
        }
    }

    pub fn symbol(&self) -> MusicFontSymbol {
        match self.duration {
            Duration::QuadrupleWhole => MusicFontSymbol::RestLonga,
            Duration::DoubleWhole => MusicFontSymbol::RestDoubleWhole,
            Duration::Whole => MusicFontSymbol::RestWhole,
            Duration::Half => MusicFontSymbol::RestHalf,
            Duration::Quarter => MusicFontSymbol::RestQuarter,
            Duration::Eighth => MusicFontSymbol::Rest8th,
            Duration::Sixteenth => MusicFontSymbol::Rest16th,
            Duration::ThirtySecond => MusicFontSymbol::Rest32nd,
            Duration::SixtyFourth => MusicFontSymbol::Rest64th,
            Duration::OneHundredTwentyEighth => MusicFontSymbol::Rest128th,
            Duration::TwoHundredFiftySixth => MusicFontSymbol::Rest256th,
        }
    }
}

impl Glyph for RestGlyph {
    glyph_bounds!();

    fn measure(&mut self, ctx: &RenderContext<'_>) {
        self.bounds.width = self.symbol().width() * ctx.scale;
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>) {
        canvas.fill_music_font_symbol(
            cx + self.bounds.x,
            cy + self.bounds.y,
            ctx.scale,
            self.symbol(),
            false,
        );
    }

    fn anchored(&self) -> bool {
        true
    }
}

/// A clef symbol with an optional ottava number above or below it.
pub struct ClefGlyph {
    bounds: Bounds,
    pub clef: Clef,
    ottava: Option<(String, f64)>,
}

impl ClefGlyph {
    /// `y` is the baseline of the clef symbol; `above` and `below` are the
    /// baselines for an ottava number over or under the staff.
    pub fn new(clef: Clef, ottava: Ottavia, y: f64, above: f64, below: f64) -> Self {
        let ottava = match ottava {
            Ottavia::Quindicesima => Some(("15".to_string(), above - y)),
            Ottavia::Ottava => Some(("8".to_string(), above - y)),
            Ottavia::OttavaBassa => Some(("8".to_string(), below - y)),
            Ottavia::QuindicesimaBassa => Some(("15".to_string(), below - y)),
            Ottavia::Regular => None,
        };
        Self {
            bounds: Bounds {
                y,
                ..Bounds::default()
            },
            clef,
            ottava,
        }
    }

    fn symbol(&self) -> MusicFontSymbol {
        match self.clef {
            Clef::Neutral => MusicFontSymbol::UnpitchedPercussionClef,
            Clef::C3 | Clef::C4 => MusicFontSymbol::CClef,
            Clef::F4 => MusicFontSymbol::FClef,
            Clef::G2 => MusicFontSymbol::GClef,
        }
    }
}

impl Glyph for ClefGlyph {
    glyph_bounds!();

    fn measure(&mut self, ctx: &RenderContext<'_>) {
        self.bounds.width = (self.symbol().width() + PRE_BEAT_GAP) * ctx.scale;
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>) {
        let x = cx + self.bounds.x;
        let y = cy + self.bounds.y;
        canvas.fill_music_font_symbol(x, y, ctx.scale, self.symbol(), false);
        if let Some((label, dy)) = &self.ottava {
            let font = Font {
                size: ctx.resources.effect_font.size * ctx.scale,
                ..ctx.resources.effect_font.clone()
            };
            canvas.set_font(&font);
            canvas.set_text_align(TextAlign::Center);
            canvas.fill_text(
                label,
                x + self.symbol().width() * ctx.scale / 2.0,
                y + dy,
            );
        }
    }
}

/// The accidentals of a key signature, including naturals cancelling the
/// previous key.
pub struct KeySignatureGlyph {
    bounds: Bounds,
    accidentals: GlyphGroup,
}

impl KeySignatureGlyph {
    /// Each entry is an accidental and the y of its staff line.
    pub fn new(entries: Vec<(AccidentalType, f64)>) -> Self {
        let mut accidentals = GlyphGroup::new(GroupLayout::LeftToRight);
        for (accidental, y) in entries {
            accidentals.add(AccidentalGlyph::new(accidental, false).at_y(y));
        }
        Self {
            bounds: Bounds::default(),
            accidentals,
        }
    }

    pub fn count(&self) -> usize {
        self.accidentals.len()
    }
}

impl Glyph for KeySignatureGlyph {
    glyph_bounds!();

    fn measure(&mut self, ctx: &RenderContext<'_>) {
        self.accidentals.measure(ctx);
        self.bounds.width = if self.accidentals.is_empty() {
            0.0
        } else {
            self.accidentals.width() + PRE_BEAT_GAP * ctx.scale
        };
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>) {
        self.accidentals
            .paint(cx + self.bounds.x, cy + self.bounds.y, canvas, ctx);
    }
}

/// Stacked time signature digits, or the common/cut time symbol.
pub struct TimeSignatureGlyph {
    bounds: Bounds,
    numerator: i32,
    denominator: i32,
    common: bool,
    numerator_y: f64,
    denominator_y: f64,
    glyph_scale: f64,
}

impl TimeSignatureGlyph {
    /// `numerator_y` and `denominator_y` are the digit baselines; the common
    /// time symbol is centered between them.
    pub fn new(
        numerator: i32,
        denominator: i32,
        common: bool,
        numerator_y: f64,
        denominator_y: f64,
    ) -> Self {
        let common = common
            && ((numerator == 4 && denominator == 4) || (numerator == 2 && denominator == 2));
        Self {
            bounds: Bounds::default(),
            numerator,
            denominator,
            common,
            numerator_y,
            denominator_y,
            glyph_scale: 1.0,
        }
    }

    pub fn with_scale(mut self, glyph_scale: f64) -> Self {
        self.glyph_scale = glyph_scale;
        self
    }

    fn digits(value: i32) -> Vec<MusicFontSymbol> {
        value
            .max(0)
            .to_string()
            .chars()
            .filter_map(|c| c.to_digit(10))
            .map(MusicFontSymbol::time_signature_digit)
            .collect()
    }

    fn digits_width(value: i32) -> f64 {
        Self::digits(value).iter().map(|s| s.width()).sum()
    }

    fn content_width(&self) -> f64 {
        if self.common {
            MusicFontSymbol::TimeSigCommon.width()
        } else {
            Self::digits_width(self.numerator).max(Self::digits_width(self.denominator))
        }
    }
}

impl Glyph for TimeSignatureGlyph {
    glyph_bounds!();

    fn measure(&mut self, ctx: &RenderContext<'_>) {
        self.bounds.width = (self.content_width() * self.glyph_scale + PRE_BEAT_GAP) * ctx.scale;
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>) {
        let scale = self.glyph_scale * ctx.scale;
        let x = cx + self.bounds.x;
        let y = cy + self.bounds.y;
        let full = self.content_width() * scale;

        if self.common {
            let symbol = if self.numerator == 2 {
                MusicFontSymbol::TimeSigCutCommon
            } else {
                MusicFontSymbol::TimeSigCommon
            };
            let middle = (self.numerator_y + self.denominator_y) / 2.0;
            canvas.fill_music_font_symbol(x, y + middle, scale, symbol, false);
            return;
        }

        for (value, line_y) in [
            (self.numerator, self.numerator_y),
            (self.denominator, self.denominator_y),
        ] {
            let mut dx = x + (full - Self::digits_width(value) * scale) / 2.0;
            for digit in Self::digits(value) {
                canvas.fill_music_font_symbol(dx, y + line_y, scale, digit, false);
                dx += digit.width() * scale;
            }
        }
    }
}

/// Parentheses around ghost note heads at the given ys, with the gap
/// towards the heads: left parentheses go before the heads, right ones
/// after them.
pub fn ghost_parentheses(ys: &[f64], left: bool, grace: bool) -> GlyphGroup {
    let glyph_scale = if grace { GRACE_SCALE } else { 1.0 };
    let symbol = if left {
        MusicFontSymbol::NoteheadParenthesisLeft
    } else {
        MusicFontSymbol::NoteheadParenthesisRight
    };
    let mut parentheses = GlyphGroup::new(GroupLayout::Overlay);
    for &y in ys {
        parentheses.add(MusicFontGlyph::new(symbol).with_scale(glyph_scale).at(0.0, y));
    }
    let gap = SpacingGlyph::new(GHOST_PARENTHESIS_GAP * glyph_scale);

    let mut group = GlyphGroup::new(GroupLayout::LeftToRight);
    if left {
        group.add(parentheses);
        group.add(gap);
    } else {
        group.add(gap);
        group.add(parentheses);
    }
    group
}
