//! Standard notation: five-line staff with clef, key and time signature,
//! note heads on pitch lines, stems and beams. Percussion staves use the
//! same renderer with the drum line map and a neutral clef.

use super::bar_renderer::{
    paint_beams, paint_simile_mark, paint_staff_lines, paint_tuplets, register_beam_overflow,
    BarRendererBase, BarRendererKind, LineGeometry, StemStyle,
};
use super::factory::BarRendererFactory;
use crate::model::{Clef, Duration, Ottavia, Staff, Track};
use crate::platform::{Canvas, MusicFontSymbol};
use crate::renderer::accidentals::{key_signature_accidentals, AccidentalType};
use crate::renderer::beaming::BeamYCalculator;
use crate::renderer::constants::*;
use crate::renderer::glyphs::{
    ghost_parentheses, AccidentalGlyph, BarNumberGlyph, CircleGlyph, ClefGlyph, Glyph, KeySignatureGlyph,
    NoteHeadGlyph, RenderContext, RepeatOpenGlyph, RestGlyph, SpacingGlyph, TimeSignatureGlyph,
    VoiceContainerGlyph,
};

/// Bottom staff step of a five-line staff.
const BOTTOM_LINE: i32 = (STAFF_LINE_COUNT - 1) * 2;

pub struct ScoreBarRenderer;

impl ScoreBarRenderer {
    fn line_y(base: &BarRendererBase<'_>, line: i32) -> f64 {
        base.top_padding + line as f64 * LINE_SPACING * base.scale / 2.0
    }

    fn clef(base: &BarRendererBase<'_>) -> Clef {
        if base.staff.is_percussion {
            Clef::Neutral
        } else {
            base.bar.clef
        }
    }

    /// Staff step the clef symbol is anchored to.
    fn clef_line(clef: Clef) -> i32 {
        match clef {
            Clef::G2 => 6,
            Clef::F4 | Clef::C4 => 2,
            Clef::C3 | Clef::Neutral => 4,
        }
    }

    fn rest_line(duration: Duration) -> i32 {
        match duration {
            Duration::QuadrupleWhole | Duration::DoubleWhole | Duration::Whole => 2,
            _ => 4,
        }
    }

    fn head_symbol(duration: Duration, x_head: bool, dead: bool, harmonic: bool) -> MusicFontSymbol {
        if x_head || dead {
            MusicFontSymbol::NoteheadXBlack
        } else if harmonic {
            match duration {
                Duration::QuadrupleWhole
                | Duration::DoubleWhole
                | Duration::Whole
                | Duration::Half => MusicFontSymbol::NoteheadDiamondWhite,
                _ => MusicFontSymbol::NoteheadDiamondBlack,
            }
        } else {
            NoteHeadGlyph::symbol_for(duration)
        }
    }

    fn shows_clef(base: &BarRendererBase<'_>) -> bool {
        base.is_first_of_line
            || base.previous_bar().map_or(true, |prev| {
                prev.clef != base.bar.clef || prev.clef_ottava != base.bar.clef_ottava
            })
    }

    fn paint_ledger_lines(
        base: &BarRendererBase<'_>,
        cx: f64,
        cy: f64,
        canvas: &mut dyn Canvas,
        ctx: &RenderContext<'_>,
    ) {
        let thickness = STAFF_LINE_WIDTH * ctx.scale;
        let extend = LEDGER_EXTEND * ctx.scale;
        canvas.set_color(ctx.resources.staff_line_color);
        for voice in &base.voices {
            for beat in &voice.beats {
                let Some(helper) = base.helpers.helper_for_beat(voice.voice_index, beat.beat_index)
                else {
                    continue;
                };
                let Some(position) = helper.position_of(beat.beat_index) else {
                    continue;
                };
                let lines = &helper.beats[position];
                let (Some(top), Some(bottom)) = (lines.top_line(), lines.bottom_line()) else {
                    continue;
                };
                let above = (top..0).filter(|l| l % 2 == 0);
                let below = (BOTTOM_LINE + 2..=bottom).filter(|l| l % 2 == 0);
                for line in above.chain(below) {
                    canvas.fill_rect(
                        cx + beat.on_notes_x() - extend,
                        cy + Self::line_y(base, line) - thickness / 2.0,
                        beat.on_notes_width() + extend * 2.0,
                        thickness,
                    );
                }
            }
        }
        canvas.set_color(ctx.resources.main_glyph_color);
    }
}

impl BarRendererKind for ScoreBarRenderer {
    fn staff_id(&self) -> &'static str {
        "score"
    }

    fn update_sizes(&self, base: &mut BarRendererBase<'_>) {
        let padding = STAFF_PADDING * base.scale;
        base.top_padding = base.padding_with_bar_number(padding);
        base.bottom_padding = padding;
        base.height = LINE_SPACING * base.scale * (STAFF_LINE_COUNT - 1) as f64
            + base.top_padding
            + base.bottom_padding;
    }

    fn create_pre_beat_glyphs(&self, base: &mut BarRendererBase<'_>) {
        let top = Self::line_y(base, 0);
        let bottom = Self::line_y(base, BOTTOM_LINE);
        if base.master_bar.is_repeat_start {
            let dots = (Self::line_y(base, 3), Self::line_y(base, 5));
            base.pre_beat_glyphs.add(RepeatOpenGlyph::new(top, bottom, dots));
        }

        let clef = Self::clef(base);
        if Self::shows_clef(base) {
            let ottava = if base.staff.is_percussion {
                Ottavia::Regular
            } else {
                base.bar.clef_ottava
            };
            base.pre_beat_glyphs.add(ClefGlyph::new(
                clef,
                ottava,
                Self::line_y(base, Self::clef_line(clef)),
                Self::line_y(base, -3),
                Self::line_y(base, BOTTOM_LINE + 5),
            ));
        }

        if !base.staff.is_percussion {
            let key = base.master_bar.key_signature;
            let changed = base
                .previous_master_bar()
                .map(|prev| prev.key_signature)
                .filter(|prev| *prev != key);
            if base.is_first_of_line || changed.is_some() {
                let entries: Vec<(AccidentalType, f64)> =
                    key_signature_accidentals(key, changed, clef)
                        .into_iter()
                        .map(|(accidental, step)| (accidental, Self::line_y(base, step)))
                        .collect();
                let glyph = KeySignatureGlyph::new(entries);
                if glyph.count() > 0 {
                    base.pre_beat_glyphs.add(glyph);
                }
            }
        }

        if base.shows_time_signature() {
            let master = base.master_bar;
            base.pre_beat_glyphs.add(TimeSignatureGlyph::new(
                master.time_signature_numerator,
                master.time_signature_denominator,
                master.time_signature_common,
                Self::line_y(base, 2),
                Self::line_y(base, 6),
            ));
        }

        if base.show_bar_number {
            base.pre_beat_glyphs
                .add(BarNumberGlyph::new(base.id.index + 1, base.bar_number_y()));
        }
        base.pre_beat_glyphs.add(SpacingGlyph::new(PRE_BEAT_GAP));
    }

    fn create_voice_glyphs(&self, base: &mut BarRendererBase<'_>) {
        let bar = base.bar;
        let multi_voice = bar.voices.iter().filter(|v| !v.is_empty()).count() > 1;
        for (v, voice) in bar.voices.iter().enumerate() {
            let times = base.beat_times(v);
            let mut container = VoiceContainerGlyph::new(v);
            for (i, beat) in voice.beats.iter().enumerate() {
                let mut glyph = base.beat_container(v, i, times[i]);
                if beat.is_empty {
                    container.add_beat(glyph);
                    continue;
                }
                let grace = beat.is_grace();
                if let Some(text) = beat.text.as_deref().filter(|t| !t.is_empty()) {
                    if base.is_top_of_staff {
                        let top = Self::line_y(base, 0);
                        glyph.effects.add(base.beat_text_glyph(text, top));
                    }
                }

                if beat.is_rest() {
                    let mut line = Self::rest_line(beat.duration);
                    if multi_voice {
                        line += if v == 0 { -4 } else { 4 };
                    }
                    let mut rest = RestGlyph::new(beat.duration);
                    rest.bounds_mut().y = Self::line_y(base, line);
                    glyph.on_notes.add(rest);
                } else {
                    let mut top_line: Option<i32> = None;
                    let mut ghosts = Vec::new();
                    for note in &beat.notes {
                        let applied = base.accidentals.apply_accidental(note, v, i);
                        let y = Self::line_y(base, applied.line);
                        let symbol = Self::head_symbol(
                            beat.duration,
                            applied.x_head,
                            note.is_dead,
                            note.is_harmonic(),
                        );
                        let mut head = NoteHeadGlyph::new(symbol, grace);
                        head.bounds_mut().y = y;
                        glyph.on_notes.add(head);
                        if applied.accidental != AccidentalType::None {
                            glyph
                                .pre_notes
                                .add(AccidentalGlyph::new(applied.accidental, grace).at_y(y));
                        }
                        if note.is_ghost {
                            ghosts.push(y);
                        }
                        base.helpers.register_note_line(v, i, applied.line);
                        top_line = Some(top_line.map_or(applied.line, |t| t.min(applied.line)));
                    }
                    if !ghosts.is_empty() {
                        glyph.pre_notes.add(ghost_parentheses(&ghosts, true, grace));
                        glyph.post_notes.add(ghost_parentheses(&ghosts, false, grace));
                    }
                    if let Some(line) = top_line {
                        // dots sit in the space above a note on a line
                        let dot_line = if line % 2 == 0 { line - 1 } else { line };
                        for _ in 0..beat.dots {
                            let mut dot = CircleGlyph::new(DOT_RADIUS);
                            dot.bounds_mut().y = Self::line_y(base, dot_line);
                            glyph.post_notes.add(dot);
                        }
                    }
                }
                container.add_beat(glyph);
            }
            base.voices.push(container);
        }
    }

    fn create_post_beat_glyphs(&self, base: &mut BarRendererBase<'_>) {
        let top = Self::line_y(base, 0);
        let bottom = Self::line_y(base, BOTTOM_LINE);
        let dots = (Self::line_y(base, 3), Self::line_y(base, 5));
        let count_y = Self::line_y(base, -1);
        base.add_bar_end_glyphs(top, bottom, dots, count_y);
    }

    fn geometry(&self, base: &BarRendererBase<'_>) -> Option<LineGeometry> {
        Some(LineGeometry {
            origin: base.top_padding,
            scale: base.scale,
            style: StemStyle::Score,
        })
    }

    fn register_overflow(&self, base: &mut BarRendererBase<'_>) {
        let Some(geometry) = self.geometry(base) else {
            return;
        };
        register_beam_overflow(base, &geometry);

        let half_head = LINE_SPACING * base.scale / 2.0;
        if let Some(highest) = base.accidentals.max_note {
            let top = geometry.line_y(highest.line) - half_head;
            base.register_overflow_top(-top);
        }
        if let Some(lowest) = base.accidentals.min_note {
            let bottom = geometry.line_y(lowest.line) + half_head;
            base.register_overflow_bottom(bottom - base.height);
        }
        if Self::shows_clef(base) {
            let font = base.settings.resources.effect_font.size * base.scale;
            match base.bar.clef_ottava {
                Ottavia::Ottava | Ottavia::Quindicesima => {
                    base.register_overflow_top(font - geometry.line_y(-3));
                }
                Ottavia::OttavaBassa | Ottavia::QuindicesimaBassa => {
                    base.register_overflow_bottom(geometry.line_y(BOTTOM_LINE + 5) - base.height);
                }
                Ottavia::Regular => {}
            }
        }
    }

    fn paint_background(
        &self,
        base: &BarRendererBase<'_>,
        cx: f64,
        cy: f64,
        canvas: &mut dyn Canvas,
        ctx: &RenderContext<'_>,
    ) {
        let lines = (0..STAFF_LINE_COUNT).map(|i| Self::line_y(base, i * 2));
        paint_staff_lines(base, lines, cx, cy, canvas, ctx);
        paint_simile_mark(base, Self::line_y(base, 4), cx, cy, canvas, ctx);
    }

    fn paint_foreground(
        &self,
        base: &BarRendererBase<'_>,
        cx: f64,
        cy: f64,
        canvas: &mut dyn Canvas,
        ctx: &RenderContext<'_>,
    ) {
        Self::paint_ledger_lines(base, cx, cy, canvas, ctx);
        if let Some(geometry) = self.geometry(base) {
            paint_beams(base, &geometry, cx, cy, canvas, ctx);
            paint_tuplets(base, &geometry, cx, cy, canvas, ctx);
        }
    }
}

pub struct ScoreBarRendererFactory;

impl BarRendererFactory for ScoreBarRendererFactory {
    fn staff_id(&self) -> &'static str {
        "score"
    }

    fn can_create(&self, _track: &Track, staff: &Staff) -> bool {
        staff.show_standard_notation || staff.is_percussion
    }

    fn create_kind(&self) -> Box<dyn BarRendererKind> {
        Box::new(ScoreBarRenderer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bar, Beat, MasterBar, Note, Score, SimileMark, Voice};
    use crate::platform::RecordingCanvas;
    use crate::renderer::bar_renderer::{BarRenderer, RendererState};
    use crate::renderer::BarId;
    use crate::settings::RenderSettings;
    use pretty_assertions::assert_eq;

    fn score_with(bars: Vec<Vec<Beat>>) -> Score {
        let bars: Vec<Bar> = bars
            .into_iter()
            .map(|beats| Bar {
                voices: vec![Voice { beats }],
                ..Bar::default()
            })
            .collect();
        Score {
            master_bars: vec![MasterBar::default(); bars.len()],
            tracks: vec![Track {
                staves: vec![Staff {
                    bars,
                    ..Staff::default()
                }],
                ..Track::default()
            }],
            ..Score::default()
        }
    }

    fn renderer<'a>(score: &'a Score, settings: &'a RenderSettings, index: usize) -> BarRenderer<'a> {
        let staff = &score.tracks[0].staves[0];
        let base = BarRendererBase::new(
            BarId {
                track: 0,
                staff: 0,
                index,
            },
            score,
            settings,
            staff,
            &staff.bars[index],
            &score.master_bars[index],
        );
        ScoreBarRendererFactory.create(base)
    }

    #[test]
    fn whole_rest_bar_keeps_nominal_height() {
        let score = score_with(vec![vec![Beat::rest(Duration::Whole)]]);
        let settings = RenderSettings::default();
        let mut bar = renderer(&score, &settings, 0);
        bar.do_layout().unwrap();
        // the top padding holds the bar number band
        let band = 11.0 + BAR_NUMBER_GAP;
        assert_eq!(bar.base.height, LINE_SPACING * 4.0 + band + STAFF_PADDING);
        assert_eq!(bar.base.top_overflow(), 0.0);
        assert_eq!(bar.base.bottom_overflow(), 0.0);
    }

    #[test]
    fn accidental_shown_once_per_bar() {
        let c_sharp = || Beat::new(Duration::Quarter, vec![Note::new(73)]);
        let score = score_with(vec![
            vec![c_sharp(), c_sharp(), c_sharp(), c_sharp()],
            vec![c_sharp(), c_sharp(), c_sharp(), c_sharp()],
        ]);
        let settings = RenderSettings::default();
        for index in 0..2 {
            let mut bar = renderer(&score, &settings, index);
            bar.do_layout().unwrap();
            let mut canvas = RecordingCanvas::new();
            bar.paint(0.0, 0.0, &mut canvas);
            assert_eq!(canvas.count_symbol(MusicFontSymbol::AccidentalSharp), 1);
        }
    }

    #[test]
    fn paint_before_layout_draws_nothing() {
        let score = score_with(vec![vec![Beat::rest(Duration::Whole)]]);
        let settings = RenderSettings::default();
        let mut bar = renderer(&score, &settings, 0);
        let mut canvas = RecordingCanvas::new();
        bar.paint(0.0, 0.0, &mut canvas);
        assert!(canvas.ops().is_empty());
        assert_eq!(bar.state(), RendererState::Uninitialized);
    }

    #[test]
    fn layout_twice_gives_same_width() {
        let score = score_with(vec![vec![
            Beat::new(Duration::Eighth, vec![Note::new(72)]),
            Beat::new(Duration::Eighth, vec![Note::new(74)]),
            Beat::new(Duration::Half, vec![Note::new(66)]).with_dots(1),
        ]]);
        let settings = RenderSettings::default();
        let mut bar = renderer(&score, &settings, 0);
        bar.do_layout().unwrap();
        let first = bar.base.width;
        bar.do_layout().unwrap();
        assert_eq!(bar.base.width, first);
        assert_eq!(bar.state(), RendererState::LaidOut);
    }

    #[test]
    fn high_notes_overflow_the_top() {
        let score = score_with(vec![vec![Beat::new(Duration::Whole, vec![Note::new(91)])]]);
        let settings = RenderSettings::default();
        let mut bar = renderer(&score, &settings, 0);
        bar.do_layout().unwrap();
        assert!(bar.base.top_overflow() > 0.0);
        assert_eq!(bar.base.bottom_overflow(), 0.0);
    }

    #[test]
    fn ledger_lines_below_the_staff() {
        // middle C on a treble staff needs one ledger line
        let score = score_with(vec![vec![Beat::new(Duration::Whole, vec![Note::new(60)])]]);
        let settings = RenderSettings::default();
        let mut bar = renderer(&score, &settings, 0);
        bar.do_layout().unwrap();
        let mut canvas = RecordingCanvas::new();
        bar.paint(0.0, 0.0, &mut canvas);
        let rects = canvas
            .ops()
            .iter()
            .filter(|op| matches!(op, crate::platform::DrawOp::FillRect { .. }))
            .count();
        // five staff lines, one ledger line, thin and thick final bar line
        assert_eq!(rects, 8);
    }

    #[test]
    fn simile_marks_follow_their_bar() {
        let mut score = score_with(vec![vec![Beat::rest(Duration::Whole)]; 3]);
        let bars = &mut score.tracks[0].staves[0].bars;
        bars[0].simile_mark = SimileMark::Simple;
        bars[1].simile_mark = SimileMark::FirstOfDouble;
        bars[2].simile_mark = SimileMark::SecondOfDouble;
        let settings = RenderSettings::default();

        let mut counts = Vec::new();
        for index in 0..3 {
            let mut bar = renderer(&score, &settings, index);
            bar.do_layout().unwrap();
            let mut canvas = RecordingCanvas::new();
            bar.paint(0.0, 0.0, &mut canvas);
            counts.push((
                canvas.count_symbol(MusicFontSymbol::Repeat1Bar),
                canvas.count_symbol(MusicFontSymbol::Repeat2Bars),
            ));
        }
        assert_eq!(counts, vec![(1, 0), (0, 0), (0, 1)]);
    }

    #[test]
    fn beat_text_sits_above_the_staff() {
        let mut beat = Beat::new(Duration::Whole, vec![Note::new(67)]);
        beat.text = Some("rit.".to_string());
        let score = score_with(vec![vec![beat]]);
        let settings = RenderSettings::default();
        let mut bar = renderer(&score, &settings, 0);
        bar.do_layout().unwrap();
        assert!(bar.base.top_overflow() > 0.0);

        let mut canvas = RecordingCanvas::new();
        bar.paint(0.0, 0.0, &mut canvas);
        assert!(canvas.texts().contains(&"rit."));
    }

    #[test]
    fn ghost_notes_get_parentheses() {
        let mut ghost = Note::new(64);
        ghost.is_ghost = true;
        let score = score_with(vec![vec![
            Beat::new(Duration::Half, vec![ghost, Note::new(72)]),
            Beat::new(Duration::Half, vec![Note::new(64)]),
        ]]);
        let settings = RenderSettings::default();
        let mut bar = renderer(&score, &settings, 0);
        bar.do_layout().unwrap();
        let mut canvas = RecordingCanvas::new();
        bar.paint(0.0, 0.0, &mut canvas);
        assert_eq!(canvas.count_symbol(MusicFontSymbol::NoteheadParenthesisLeft), 1);
        assert_eq!(canvas.count_symbol(MusicFontSymbol::NoteheadParenthesisRight), 1);
    }
}
