//! One bar of one staff: glyph creation, measuring, positioning and paint.
//!
//! `BarRendererBase` holds the state every staff kind shares; the kind
//! itself only contributes glyphs and geometry through `BarRendererKind`.

use crate::error::LayoutError;
use crate::model::{Bar, BendPoint, Duration, MasterBar, Score, SimileMark, Staff};
use crate::platform::{Canvas, MusicFontSymbol, TextAlign};
use crate::renderer::accidentals::AccidentalHelper;
use crate::renderer::beaming::{
    is_full_bar_join, BarHelpers, BeamDirection, BeamYCalculator, BeamingHelper,
};
use crate::renderer::beat_map::{beat_start_times, lookup_beat_x, BarLayoutingInfo, BeatTime};
use crate::renderer::constants::*;
use crate::renderer::glyphs::{
    BarSeparatorGlyph, BeatContainerGlyph, Glyph, GlyphGroup, GroupLayout, RenderContext,
    RepeatCloseGlyph, RepeatCountGlyph, TextGlyph, VoiceContainerGlyph, WhammyBarGlyph,
};
use crate::renderer::tuplets::TupletGroup;
use crate::renderer::BarId;
use crate::settings::{Font, RenderSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RendererState {
    Uninitialized,
    SizesUpdated,
    GlyphsCreated,
    LaidOut,
    Painted,
}

/// How stem lengths are chosen for a staff kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StemStyle {
    Score,
    Slash,
}

/// Vertical geometry of a staff drawing stems and beams. Lines are staff
/// steps counted from the top line, two steps per line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineGeometry {
    /// y of step 0, relative to the renderer
    pub origin: f64,
    pub scale: f64,
    pub style: StemStyle,
}

impl LineGeometry {
    fn step(&self) -> f64 {
        LINE_SPACING * self.scale / 2.0
    }

    /// Stem length in steps for beamed and flagged beats.
    fn stem_steps(&self, duration: Duration, flagged: bool) -> f64 {
        match self.style {
            StemStyle::Score => match duration {
                Duration::ThirtySecond => STEM_STEPS + 1.0,
                Duration::SixtyFourth => STEM_STEPS + 2.0,
                Duration::OneHundredTwentyEighth => STEM_STEPS + 3.0,
                Duration::TwoHundredFiftySixth => STEM_STEPS + 4.0,
                _ => STEM_STEPS,
            },
            StemStyle::Slash if flagged => 6.0,
            StemStyle::Slash => match duration {
                Duration::ThirtySecond | Duration::SixtyFourth => 7.0,
                Duration::OneHundredTwentyEighth => 9.0,
                Duration::TwoHundredFiftySixth => 10.0,
                _ => 6.0,
            },
        }
    }
}

impl BeamYCalculator for LineGeometry {
    fn line_y(&self, line: i32) -> f64 {
        self.origin + line as f64 * self.step()
    }

    fn stem_size(&self, helper: &BeamingHelper) -> f64 {
        let steps = self.stem_steps(helper.shortest_duration, !helper.is_beamed());
        let size = steps * self.step();
        if helper.is_grace {
            size * GRACE_SCALE
        } else {
            size
        }
    }

    fn max_beam_rise(&self) -> f64 {
        MAX_BEAM_RISE * self.scale
    }
}

/// State shared by every staff kind.
pub struct BarRendererBase<'a> {
    pub id: BarId,
    pub score: &'a Score,
    pub settings: &'a RenderSettings,
    pub staff: &'a Staff,
    pub bar: &'a Bar,
    pub master_bar: &'a MasterBar,
    pub scale: f64,
    pub is_first_of_line: bool,
    pub show_bar_number: bool,
    /// First row of its staff in the system; beat texts are drawn here only.
    pub is_top_of_staff: bool,
    state: RendererState,

    /// Position inside the staff
    pub x: f64,
    pub width: f64,
    /// Nominal height without overflow
    pub height: f64,
    pub top_padding: f64,
    pub bottom_padding: f64,
    top_overflow: f64,
    bottom_overflow: f64,

    pub pre_beat_glyphs: GlyphGroup,
    pub voices: Vec<VoiceContainerGlyph>,
    pub post_beat_glyphs: GlyphGroup,
    pub helpers: BarHelpers,
    pub accidentals: AccidentalHelper,
    pub layouting_info: BarLayoutingInfo,
}

impl<'a> BarRendererBase<'a> {
    pub fn new(
        id: BarId,
        score: &'a Score,
        settings: &'a RenderSettings,
        staff: &'a Staff,
        bar: &'a Bar,
        master_bar: &'a MasterBar,
    ) -> Self {
        Self {
            id,
            score,
            settings,
            staff,
            bar,
            master_bar,
            scale: settings.scale,
            is_first_of_line: false,
            show_bar_number: false,
            is_top_of_staff: true,
            state: RendererState::Uninitialized,
            x: 0.0,
            width: 0.0,
            height: 0.0,
            top_padding: 0.0,
            bottom_padding: 0.0,
            top_overflow: 0.0,
            bottom_overflow: 0.0,
            pre_beat_glyphs: GlyphGroup::new(GroupLayout::LeftToRight),
            voices: Vec::new(),
            post_beat_glyphs: GlyphGroup::new(GroupLayout::LeftToRight),
            helpers: BarHelpers::default(),
            accidentals: AccidentalHelper::new(bar, master_bar, staff),
            layouting_info: BarLayoutingInfo::new(),
        }
    }

    pub fn state(&self) -> RendererState {
        self.state
    }

    /// Top padding of a staff kind whose own padding is `padding`: every
    /// bar keeps room for a bar number above its top line, so a bar number
    /// never adds overflow.
    pub fn padding_with_bar_number(&self, padding: f64) -> f64 {
        let band = (self.settings.resources.bar_number_font.size + BAR_NUMBER_GAP) * self.scale;
        padding.max(band)
    }

    /// Baseline of the bar number, inside the top padding.
    pub fn bar_number_y(&self) -> f64 {
        self.top_padding - BAR_NUMBER_GAP * self.scale
    }

    /// Text of a beat above the staff, registered as top overflow.
    pub fn beat_text_glyph(&mut self, text: &str, top_line_y: f64) -> TextGlyph {
        let font = self.settings.resources.effect_font.clone();
        let y = top_line_y - BEAT_TEXT_GAP * self.scale;
        self.register_overflow_top(font.size * self.scale - y);
        let mut glyph = TextGlyph::new(text, font);
        glyph.bounds_mut().y = y;
        glyph
    }

    pub fn context(&self) -> RenderContext<'a> {
        let settings: &'a RenderSettings = self.settings;
        RenderContext {
            scale: self.scale,
            resources: &settings.resources,
        }
    }

    pub fn top_overflow(&self) -> f64 {
        self.top_overflow
    }

    pub fn bottom_overflow(&self) -> f64 {
        self.bottom_overflow
    }

    pub fn register_overflow_top(&mut self, value: f64) {
        if value > self.top_overflow {
            self.top_overflow = value;
        }
    }

    pub fn register_overflow_bottom(&mut self, value: f64) {
        if value > self.bottom_overflow {
            self.bottom_overflow = value;
        }
    }

    fn reset_overflow(&mut self) {
        self.top_overflow = 0.0;
        self.bottom_overflow = 0.0;
    }

    pub fn previous_master_bar(&self) -> Option<&'a MasterBar> {
        let score: &'a Score = self.score;
        self.id
            .index
            .checked_sub(1)
            .and_then(|i| score.master_bars.get(i))
    }

    pub fn previous_bar(&self) -> Option<&'a Bar> {
        let staff: &'a Staff = self.staff;
        self.id.index.checked_sub(1).and_then(|i| staff.bars.get(i))
    }

    pub fn is_last_of_score(&self) -> bool {
        self.id.index + 1 >= self.score.bar_count()
    }

    /// Time signature is printed on the first bar and on every change.
    pub fn shows_time_signature(&self) -> bool {
        self.previous_master_bar()
            .map_or(true, |prev| self.master_bar.time_signature_differs(prev))
    }

    /// Start times of the beats of voice `voice`.
    pub fn beat_times(&self, voice: usize) -> Vec<BeatTime> {
        self.bar
            .voices
            .get(voice)
            .map(beat_start_times)
            .unwrap_or_default()
    }

    /// An empty beat container for `beat` of `voice`.
    pub fn beat_container(&self, voice: usize, beat: usize, time: BeatTime) -> BeatContainerGlyph {
        let duration = self
            .bar
            .voices
            .get(voice)
            .and_then(|v| v.beats.get(beat))
            .filter(|b| !b.is_grace() && !b.is_empty)
            .map_or(0, |b| b.playback_ticks());
        BeatContainerGlyph::new(beat, time, duration)
    }

    /// Closing repeat (with its count above `count_y`) or a bar line.
    pub fn add_bar_end_glyphs(&mut self, top: f64, bottom: f64, dots: (f64, f64), count_y: f64) {
        if self.master_bar.is_repeat_end() {
            self.post_beat_glyphs
                .add(RepeatCloseGlyph::new(top, bottom, dots));
            if self.master_bar.repeat_count > 2 {
                self.post_beat_glyphs
                    .add(RepeatCountGlyph::new(self.master_bar.repeat_count, count_y));
            }
        } else {
            let is_final = self.is_last_of_score();
            self.post_beat_glyphs
                .add(BarSeparatorGlyph::new(top, bottom, is_final));
        }
    }

    /// Whammy curves above the staff. The zero line of every curve sits
    /// at `zero_y` and the top reach is registered as overflow.
    pub fn add_whammy(&mut self, voice: usize, beat: usize, points: &[BendPoint], zero_y: f64) {
        let (above, _) = WhammyBarGlyph::extent(points, self.scale);
        self.register_overflow_top(above - zero_y);
        if let Some(container) = self
            .voices
            .get_mut(voice)
            .and_then(|v| v.beat_mut(beat))
        {
            container
                .effects
                .add(WhammyBarGlyph::new(points.to_vec(), zero_y));
        }
    }

    /// Stretch or shrink the bar to `width` on the shared grid `info`.
    fn position_beats(&mut self, info: &BarLayoutingInfo, width: f64) {
        let pre = info.pre_beat_size;
        let voice_width = (width - pre - info.post_beat_size).max(0.0);
        let positions = info.positions(voice_width);

        for voice in &mut self.voices {
            let v = voice.voice_index;
            for beat in &mut voice.beats {
                beat.set_x(pre + lookup_beat_x(&positions, beat.time));
                let up = beat.on_notes_x() + beat.on_notes_width();
                let down = beat.on_notes_x();
                self.helpers
                    .register_beat_line_x(v, beat.beat_index, up, down);
            }
        }
        self.post_beat_glyphs.bounds_mut().x = width - self.post_beat_glyphs.width();
        self.width = width;
    }
}

/// The hooks through which a staff kind builds and paints its bars.
pub trait BarRendererKind {
    fn staff_id(&self) -> &'static str;

    /// Derive `height` and paddings from the resources.
    fn update_sizes(&self, base: &mut BarRendererBase<'_>);

    fn create_pre_beat_glyphs(&self, base: &mut BarRendererBase<'_>);

    /// Beat containers for every voice; also registers note lines with
    /// the beaming helpers.
    fn create_voice_glyphs(&self, base: &mut BarRendererBase<'_>);

    fn create_post_beat_glyphs(&self, base: &mut BarRendererBase<'_>);

    /// Direction imposed on every beam of the staff.
    fn forced_direction(&self) -> Option<BeamDirection> {
        None
    }

    /// Stem and beam geometry; `None` for staves without stems.
    fn geometry(&self, _base: &BarRendererBase<'_>) -> Option<LineGeometry> {
        None
    }

    /// Extra room needed above or below the nominal height, after the
    /// glyphs are measured.
    fn register_overflow(&self, base: &mut BarRendererBase<'_>) {
        if let Some(geometry) = self.geometry(base) {
            register_beam_overflow(base, &geometry);
        }
    }

    /// Staff lines and anything else under the glyphs.
    fn paint_background(
        &self,
        base: &BarRendererBase<'_>,
        cx: f64,
        cy: f64,
        canvas: &mut dyn Canvas,
        ctx: &RenderContext<'_>,
    );

    /// Stems, beams and tuplets on top of the glyphs.
    fn paint_foreground(
        &self,
        base: &BarRendererBase<'_>,
        cx: f64,
        cy: f64,
        canvas: &mut dyn Canvas,
        ctx: &RenderContext<'_>,
    ) {
        if let Some(geometry) = self.geometry(base) {
            paint_beams(base, &geometry, cx, cy, canvas, ctx);
            paint_tuplets(base, &geometry, cx, cy, canvas, ctx);
        }
    }
}

pub struct BarRenderer<'a> {
    pub base: BarRendererBase<'a>,
    kind: Box<dyn BarRendererKind>,
}

impl<'a> BarRenderer<'a> {
    pub fn new(base: BarRendererBase<'a>, kind: Box<dyn BarRendererKind>) -> Self {
        Self { base, kind }
    }

    pub fn staff_id(&self) -> &'static str {
        self.kind.staff_id()
    }

    pub fn state(&self) -> RendererState {
        self.base.state
    }

    pub fn update_sizes(&mut self) {
        self.kind.update_sizes(&mut self.base);
        self.base.state = RendererState::SizesUpdated;
    }

    /// Change the scale; the bar has to be laid out again.
    pub fn rescale(&mut self, scale: f64) {
        self.base.scale = scale;
        self.update_sizes();
    }

    /// Build, measure and validate the glyph tree, then place the beats at
    /// their minimal width.
    pub fn do_layout(&mut self) -> Result<(), LayoutError> {
        if self.base.state == RendererState::Uninitialized {
            self.update_sizes();
        }
        let base = &mut self.base;
        base.reset_overflow();
        base.pre_beat_glyphs = GlyphGroup::new(GroupLayout::LeftToRight);
        base.post_beat_glyphs = GlyphGroup::new(GroupLayout::LeftToRight);
        base.voices.clear();
        base.helpers = BarHelpers::new(base.bar, base.master_bar);
        base.accidentals = AccidentalHelper::new(base.bar, base.master_bar, base.staff);

        self.kind.create_pre_beat_glyphs(base);
        self.kind.create_voice_glyphs(base);
        self.kind.create_post_beat_glyphs(base);
        base.helpers.finish(self.kind.forced_direction());
        base.state = RendererState::GlyphsCreated;

        let ctx = base.context();
        base.pre_beat_glyphs.measure(&ctx);
        for voice in &mut base.voices {
            voice.measure(&ctx);
        }
        base.post_beat_glyphs.measure(&ctx);
        base.helpers.validate(base.id, base.bar)?;

        let mut info = BarLayoutingInfo::new();
        info.update_pre_beat_size(base.pre_beat_glyphs.width());
        info.update_post_beat_size(base.post_beat_glyphs.width());
        for voice in &base.voices {
            for beat in &voice.beats {
                info.add_spring(beat.time, beat.duration, beat.width());
            }
        }
        if base.voices.iter().all(|v| v.beats.is_empty()) {
            info.add_spring(
                BeatTime::new(0),
                base.master_bar.duration_ticks(),
                LINE_SPACING * 2.0 * base.scale,
            );
        }

        self.kind.register_overflow(base);
        base.state = RendererState::LaidOut;
        log::debug!(
            "Laid out {} bar {} (min width {:.1})",
            self.kind.staff_id(),
            base.id,
            info.min_bar_width()
        );
        base.layouting_info = info.clone();
        self.apply_layouting_info(&info);
        Ok(())
    }

    /// Adopt the merged grid of all staves at this bar index, at its
    /// minimal width.
    pub fn apply_layouting_info(&mut self, info: &BarLayoutingInfo) {
        self.base.layouting_info = info.clone();
        self.base.position_beats(info, info.min_bar_width());
    }

    /// Stretch the bar to `width` keeping the shared grid.
    pub fn scale_to_width(&mut self, width: f64) {
        let info = self.base.layouting_info.clone();
        self.base.position_beats(&info, width);
    }

    /// Paint at (`cx`, `cy`), the top-left corner of the nominal box.
    pub fn paint(&mut self, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        if self.base.state < RendererState::LaidOut {
            log::warn!("Bar {} painted before layout, skipping", self.base.id);
            return;
        }
        let base = &self.base;
        let ctx = base.context();
        let x = cx + base.x;
        canvas.set_color(ctx.resources.main_glyph_color);
        self.kind.paint_background(base, x, cy, canvas, &ctx);
        base.pre_beat_glyphs.paint(x, cy, canvas, &ctx);
        for voice in &base.voices {
            voice.paint(x, cy, canvas, &ctx);
        }
        base.post_beat_glyphs.paint(x, cy, canvas, &ctx);
        self.kind.paint_foreground(base, x, cy, canvas, &ctx);
        self.base.state = RendererState::Painted;
    }
}

// ── Shared staff painting ───────────────────────────────────────────

/// Horizontal staff lines at the given renderer-relative ys.
pub(crate) fn paint_staff_lines(
    base: &BarRendererBase<'_>,
    lines: impl IntoIterator<Item = f64>,
    cx: f64,
    cy: f64,
    canvas: &mut dyn Canvas,
    ctx: &RenderContext<'_>,
) {
    let thickness = STAFF_LINE_WIDTH * ctx.scale;
    canvas.set_color(ctx.resources.staff_line_color);
    for y in lines {
        canvas.fill_rect(cx, cy + y - thickness / 2.0, base.width, thickness);
    }
    canvas.set_color(ctx.resources.main_glyph_color);
}

/// Simile symbol of the bar: a single repeat centred in the bar, the
/// double repeat centred on the barline between its two bars.
pub(crate) fn paint_simile_mark(
    base: &BarRendererBase<'_>,
    middle_y: f64,
    cx: f64,
    cy: f64,
    canvas: &mut dyn Canvas,
    ctx: &RenderContext<'_>,
) {
    let (symbol, x) = match base.bar.simile_mark {
        SimileMark::Simple => (MusicFontSymbol::Repeat1Bar, cx + base.width / 2.0),
        SimileMark::SecondOfDouble => (MusicFontSymbol::Repeat2Bars, cx),
        SimileMark::None | SimileMark::FirstOfDouble => return,
    };
    canvas.fill_music_font_symbol(x, cy + middle_y, ctx.scale, symbol, true);
}

// ── Overflow ────────────────────────────────────────────────────────

/// Register what stems, beams and tuplet labels need beyond the staff.
pub(crate) fn register_beam_overflow(base: &mut BarRendererBase<'_>, geometry: &LineGeometry) {
    let mut top = 0.0f64;
    let mut bottom = base.height;
    for helper in base.helpers.beam_helpers.iter().flatten() {
        if !helper.has_line() {
            continue;
        }
        let (start, end) = helper.beam_ends(geometry);
        top = top.min(start.min(end));
        bottom = bottom.max(start.max(end));
    }

    let label = base.settings.resources.effect_font.size * base.scale * 1.5;
    for (v, groups) in base.helpers.tuplet_groups.iter().enumerate() {
        for group in groups {
            let Some(&first) = group.beats.first() else {
                continue;
            };
            let Some(helper) = base.helpers.helper_for_beat(v, first) else {
                continue;
            };
            let (start, end) = tip_span(helper, geometry);
            match helper.direction {
                BeamDirection::Up => {
                    let y = start.min(end) - TUPLET_OFFSET * base.scale - label;
                    top = top.min(y);
                }
                BeamDirection::Down => {
                    let y = start.max(end) + TUPLET_OFFSET * base.scale + label;
                    bottom = bottom.max(y);
                }
            }
        }
    }

    base.register_overflow_top(-top);
    base.register_overflow_bottom(bottom - base.height);
}

/// Beam ends of a helper, or the staff edge for stemless helpers.
fn tip_span(helper: &BeamingHelper, geometry: &LineGeometry) -> (f64, f64) {
    if helper.has_line() {
        helper.beam_ends(geometry)
    } else {
        let y = match helper.direction {
            BeamDirection::Up => geometry.line_y(0),
            BeamDirection::Down => geometry.line_y((STAFF_LINE_COUNT - 1) * 2),
        };
        (y, y)
    }
}

// ── Stems, flags and beams ──────────────────────────────────────────

fn flag_symbol(duration: Duration, direction: BeamDirection) -> Option<MusicFontSymbol> {
    use MusicFontSymbol::*;
    let up = direction == BeamDirection::Up;
    let symbol = match (duration, up) {
        (Duration::Eighth, true) => Flag8thUp,
        (Duration::Eighth, false) => Flag8thDown,
        (Duration::Sixteenth, true) => Flag16thUp,
        (Duration::Sixteenth, false) => Flag16thDown,
        (Duration::ThirtySecond, true) => Flag32ndUp,
        (Duration::ThirtySecond, false) => Flag32ndDown,
        (Duration::SixtyFourth, true) => Flag64thUp,
        (Duration::SixtyFourth, false) => Flag64thDown,
        (Duration::OneHundredTwentyEighth, true) => Flag128thUp,
        (Duration::OneHundredTwentyEighth, false) => Flag128thDown,
        (Duration::TwoHundredFiftySixth, true) => Flag256thUp,
        (Duration::TwoHundredFiftySixth, false) => Flag256thDown,
        _ => return None,
    };
    Some(symbol)
}

fn paint_stem(canvas: &mut dyn Canvas, x: f64, y1: f64, y2: f64, ctx: &RenderContext<'_>) {
    canvas.set_line_width(STEM_WIDTH * ctx.scale);
    canvas.begin_path();
    canvas.move_to(x, y1);
    canvas.line_to(x, y2);
    canvas.stroke();
}

/// A beam bar as a filled quad between two points on the beam line.
fn paint_bar(canvas: &mut dyn Canvas, x1: f64, y1: f64, x2: f64, y2: f64, size: f64) {
    canvas.begin_path();
    canvas.move_to(x1, y1);
    canvas.line_to(x2, y2);
    canvas.line_to(x2, y2 + size);
    canvas.line_to(x1, y1 + size);
    canvas.close_path();
    canvas.fill();
}

pub(crate) fn paint_beams(
    base: &BarRendererBase<'_>,
    geometry: &LineGeometry,
    cx: f64,
    cy: f64,
    canvas: &mut dyn Canvas,
    ctx: &RenderContext<'_>,
) {
    for helper in base.helpers.beam_helpers.iter().flatten() {
        if !helper.has_line() {
            continue;
        }
        if helper.is_beamed() {
            paint_beamed_helper(helper, geometry, cx, cy, canvas, ctx);
        } else {
            paint_single_stem(helper, geometry, cx, cy, canvas, ctx);
        }
    }
}

/// y where the stem of a beat leaves its notes.
fn stem_root(helper: &BeamingHelper, position: usize, geometry: &LineGeometry) -> Option<f64> {
    let beat = &helper.beats[position];
    let line = match helper.direction {
        BeamDirection::Up => beat.bottom_line(),
        BeamDirection::Down => beat.top_line(),
    }?;
    Some(geometry.line_y(line))
}

fn paint_single_stem(
    helper: &BeamingHelper,
    geometry: &LineGeometry,
    cx: f64,
    cy: f64,
    canvas: &mut dyn Canvas,
    ctx: &RenderContext<'_>,
) {
    let Some(root) = stem_root(helper, 0, geometry) else {
        return;
    };
    let x = helper.beat_line_x(0);
    let (tip, _) = helper.beam_ends(geometry);
    paint_stem(canvas, cx + x, cy + root, cy + tip, ctx);

    if helper.has_flag() {
        if let Some(symbol) = flag_symbol(helper.shortest_duration, helper.direction) {
            let scale = if helper.is_grace {
                GRACE_SCALE * ctx.scale
            } else {
                ctx.scale
            };
            canvas.fill_music_font_symbol(cx + x, cy + tip, scale, symbol, false);
        }
    }
}

fn paint_beamed_helper(
    helper: &BeamingHelper,
    geometry: &LineGeometry,
    cx: f64,
    cy: f64,
    canvas: &mut dyn Canvas,
    ctx: &RenderContext<'_>,
) {
    let scale = if helper.is_grace {
        GRACE_SCALE * ctx.scale
    } else {
        ctx.scale
    };
    let (spacing, size) = match helper.direction {
        BeamDirection::Up => (BEAM_SPACING * scale, BEAM_THICKNESS * scale),
        BeamDirection::Down => (-BEAM_SPACING * scale, -BEAM_THICKNESS * scale),
    };
    let stub = BROKEN_BEAM_LENGTH * scale;
    let count = helper.beats.len();
    let y_at = |x: f64| helper.calculate_beam_y(geometry, x);

    for i in 0..count {
        let beat = &helper.beats[i];
        let x = helper.beat_line_x(i);
        if let Some(root) = stem_root(helper, i, geometry) {
            paint_stem(canvas, cx + x, cy + root, cy + y_at(x), ctx);
        }

        for level in 0..beat.duration.beam_count() as i32 {
            let offset = level as f64 * spacing;
            let (x1, x2) = if i + 1 < count {
                let next = &helper.beats[i + 1];
                if is_full_bar_join(beat.duration, next.duration, level) {
                    (x, helper.beat_line_x(i + 1))
                } else if i == 0
                    || !is_full_bar_join(helper.beats[i - 1].duration, beat.duration, level)
                {
                    (x, x + stub)
                } else {
                    continue;
                }
            } else if i > 0 && !is_full_bar_join(beat.duration, helper.beats[i - 1].duration, level)
            {
                (x - stub, x)
            } else {
                continue;
            };
            paint_bar(
                canvas,
                cx + x1,
                cy + y_at(x1) + offset,
                cx + x2,
                cy + y_at(x2) + offset,
                size,
            );
        }
    }
}

// ── Tuplets ─────────────────────────────────────────────────────────

pub(crate) fn paint_tuplets(
    base: &BarRendererBase<'_>,
    geometry: &LineGeometry,
    cx: f64,
    cy: f64,
    canvas: &mut dyn Canvas,
    ctx: &RenderContext<'_>,
) {
    let font = Font {
        size: ctx.resources.effect_font.size * ctx.scale,
        ..ctx.resources.effect_font.clone()
    };
    canvas.set_font(&font);
    canvas.set_text_align(TextAlign::Center);
    for (v, groups) in base.helpers.tuplet_groups.iter().enumerate() {
        for group in groups {
            paint_tuplet_group(base, v, group, geometry, cx, cy, canvas, ctx);
        }
    }
    canvas.set_text_align(TextAlign::Left);
}

/// Stem tip of `beat` and the direction of its helper.
fn beat_tip(
    base: &BarRendererBase<'_>,
    voice: usize,
    beat: usize,
    geometry: &LineGeometry,
) -> Option<(f64, f64, BeamDirection)> {
    let helper = base.helpers.helper_for_beat(voice, beat)?;
    let position = helper.position_of(beat)?;
    let x = helper.beat_line_x(position);
    let y = if helper.has_line() {
        helper.calculate_beam_y(geometry, x)
    } else {
        tip_span(helper, geometry).0
    };
    Some((x, y, helper.direction))
}

#[allow(clippy::too_many_arguments)]
fn paint_tuplet_group(
    base: &BarRendererBase<'_>,
    voice: usize,
    group: &TupletGroup,
    geometry: &LineGeometry,
    cx: f64,
    cy: f64,
    canvas: &mut dyn Canvas,
    ctx: &RenderContext<'_>,
) {
    let s = ctx.scale;
    let label = group.label();
    let font_size = canvas.font().size;

    if !group.is_full || group.beats.len() == 1 {
        for &beat in &group.beats {
            let Some((x, tip, direction)) = beat_tip(base, voice, beat, geometry) else {
                continue;
            };
            let y = match direction {
                BeamDirection::Up => tip - font_size * 0.5,
                BeamDirection::Down => tip + 3.0 * s + font_size,
            };
            canvas.fill_text(&label, cx + x, cy + y);
        }
        return;
    }

    let (Some(&first), Some(&last)) = (group.beats.first(), group.beats.last()) else {
        return;
    };
    let (Some((start_x, start_y, direction)), Some((end_x, end_y, _))) = (
        beat_tip(base, voice, first, geometry),
        beat_tip(base, voice, last, geometry),
    ) else {
        return;
    };
    let (offset, tick) = match direction {
        BeamDirection::Up => (TUPLET_OFFSET * s, TUPLET_TICK_SIZE * s),
        BeamDirection::Down => (-TUPLET_OFFSET * s, -TUPLET_TICK_SIZE * s),
    };
    let (x1, y1) = (cx + start_x, cy + start_y - offset);
    let (x2, y2) = (cx + end_x, cy + end_y - offset);

    let label_width = canvas.measure_text(&label);
    let padding = TUPLET_LABEL_PADDING * s;
    let mid_x = (x1 + x2) / 2.0;
    let gap_start = mid_x - label_width / 2.0 - padding;
    let gap_end = mid_x + label_width / 2.0 + padding;
    let y_at = |x: f64| {
        if (x2 - x1).abs() < f64::EPSILON {
            y1
        } else {
            y1 + (y2 - y1) * (x - x1) / (x2 - x1)
        }
    };

    canvas.set_line_width(STEM_WIDTH * s);
    canvas.begin_path();
    canvas.move_to(x1, y1 + tick);
    canvas.line_to(x1, y1);
    canvas.line_to(gap_start, y_at(gap_start));
    canvas.move_to(gap_end, y_at(gap_end));
    canvas.line_to(x2, y2);
    canvas.line_to(x2, y2 + tick);
    canvas.stroke();

    canvas.fill_text(&label, mid_x, y_at(mid_x) + font_size / 3.0);
}
