//! Slash notation: a single line with rhythm slashes, stems always up.

use super::bar_renderer::{
    paint_simile_mark, paint_staff_lines, BarRendererBase, BarRendererKind, LineGeometry,
    StemStyle,
};
use super::factory::BarRendererFactory;
use crate::model::{Duration, Staff, Track};
use crate::platform::{Canvas, MusicFontSymbol};
use crate::renderer::beaming::BeamDirection;
use crate::renderer::constants::*;
use crate::renderer::glyphs::{
    ghost_parentheses, BarNumberGlyph, CircleGlyph, Glyph, NoteHeadGlyph, RenderContext, RepeatOpenGlyph, RestGlyph,
    SpacingGlyph, TimeSignatureGlyph, VoiceContainerGlyph, WhammyBarGlyph,
};

/// Staff step of the single slash line.
const SLASH_LINE: i32 = 4;

pub struct SlashBarRenderer;

impl SlashBarRenderer {
    /// Vertical position in half line offsets around the slash line.
    fn score_y(base: &BarRendererBase<'_>, steps: f64, correction: f64) -> f64 {
        base.top_padding + LINE_SPACING * base.scale / 2.0 * steps + correction * base.scale
    }

    fn line_y(base: &BarRendererBase<'_>) -> f64 {
        Self::score_y(base, SLASH_LINE as f64, 0.0)
    }

    fn head_symbol(duration: Duration, dead: bool, harmonic: bool) -> MusicFontSymbol {
        if dead {
            MusicFontSymbol::SlashDead
        } else if harmonic {
            MusicFontSymbol::SlashDiamond
        } else {
            NoteHeadGlyph::slash_symbol_for(duration)
        }
    }
}

impl BarRendererKind for SlashBarRenderer {
    fn staff_id(&self) -> &'static str {
        "slash"
    }

    fn update_sizes(&self, base: &mut BarRendererBase<'_>) {
        let font = base.settings.resources.tablature_font.size;
        let padding = (font / 2.0 + font * SLASH_SIZE_PADDING) * base.scale;
        base.top_padding = base.padding_with_bar_number(padding);
        base.bottom_padding = padding;
        base.height = LINE_SPACING * base.scale * 4.0 + base.top_padding + base.bottom_padding;
    }

    fn create_pre_beat_glyphs(&self, base: &mut BarRendererBase<'_>) {
        let top = Self::score_y(base, 0.0, 0.0);
        let bottom = Self::score_y(base, 8.0, 0.0);
        if base.master_bar.is_repeat_start {
            let dots = (Self::score_y(base, 3.0, 0.0), Self::score_y(base, 5.0, 0.0));
            base.pre_beat_glyphs.add(RepeatOpenGlyph::new(top, bottom, dots));
        }
        if base.shows_time_signature() {
            let master = base.master_bar;
            base.pre_beat_glyphs.add(TimeSignatureGlyph::new(
                master.time_signature_numerator,
                master.time_signature_denominator,
                master.time_signature_common,
                Self::score_y(base, 2.0, 0.0),
                Self::score_y(base, 5.0, 0.0),
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
        let y = Self::line_y(base);
        for (v, voice) in bar.voices.iter().enumerate() {
            let times = base.beat_times(v);
            let mut container = VoiceContainerGlyph::new(v);
            for (i, beat) in voice.beats.iter().enumerate() {
                let mut glyph = base.beat_container(v, i, times[i]);
                if beat.is_empty {
                    container.add_beat(glyph);
                    continue;
                }
                if let Some(text) = beat.text.as_deref().filter(|t| !t.is_empty()) {
                    if base.is_top_of_staff {
                        let top = Self::score_y(base, 0.0, 0.0);
                        glyph.effects.add(base.beat_text_glyph(text, top));
                    }
                }
                if beat.is_rest() {
                    let mut rest = RestGlyph::new(beat.duration);
                    rest.bounds_mut().y = y;
                    glyph.on_notes.add(rest);
                } else {
                    let dead = beat.notes.iter().all(|n| n.is_dead);
                    let harmonic = beat.notes.iter().any(|n| n.is_harmonic());
                    let mut head = NoteHeadGlyph::new(
                        Self::head_symbol(beat.duration, dead, harmonic),
                        beat.is_grace(),
                    );
                    head.bounds_mut().y = y;
                    glyph.on_notes.add(head);
                    if beat.notes.iter().any(|n| n.is_ghost) {
                        glyph.pre_notes.add(ghost_parentheses(&[y], true, beat.is_grace()));
                        glyph.post_notes.add(ghost_parentheses(&[y], false, beat.is_grace()));
                    }
                    base.helpers.register_note_line(v, i, SLASH_LINE);
                    for _ in 0..beat.dots {
                        let mut dot = CircleGlyph::new(DOT_RADIUS);
                        dot.bounds_mut().y = Self::score_y(base, (SLASH_LINE - 1) as f64, 0.0);
                        glyph.post_notes.add(dot);
                    }
                }
                container.add_beat(glyph);
            }
            base.voices.push(container);

            for (i, beat) in voice.beats.iter().enumerate() {
                if beat.has_whammy_bar() {
                    // the curve sits fully above the bar
                    let (_, below) = WhammyBarGlyph::extent(&beat.whammy_bar_points, base.scale);
                    base.add_whammy(v, i, &beat.whammy_bar_points, -below);
                }
            }
        }
    }

    fn create_post_beat_glyphs(&self, base: &mut BarRendererBase<'_>) {
        let top = Self::score_y(base, 0.0, 0.0);
        let bottom = Self::score_y(base, 8.0, 0.0);
        let dots = (Self::score_y(base, 3.0, 0.0), Self::score_y(base, 5.0, 0.0));
        let count_y = Self::score_y(base, -1.0, -3.0);
        base.add_bar_end_glyphs(top, bottom, dots, count_y);
    }

    fn forced_direction(&self) -> Option<BeamDirection> {
        Some(BeamDirection::Up)
    }

    fn geometry(&self, base: &BarRendererBase<'_>) -> Option<LineGeometry> {
        Some(LineGeometry {
            origin: base.top_padding,
            scale: base.scale,
            style: StemStyle::Slash,
        })
    }

    fn paint_background(
        &self,
        base: &BarRendererBase<'_>,
        cx: f64,
        cy: f64,
        canvas: &mut dyn Canvas,
        ctx: &RenderContext<'_>,
    ) {
        let y = Self::line_y(base);
        paint_staff_lines(base, [y], cx, cy, canvas, ctx);
        paint_simile_mark(base, y, cx, cy, canvas, ctx);
    }
}

pub struct SlashBarRendererFactory;

impl BarRendererFactory for SlashBarRendererFactory {
    fn staff_id(&self) -> &'static str {
        "slash"
    }

    fn can_create(&self, _track: &Track, staff: &Staff) -> bool {
        staff.show_slash
    }

    fn create_kind(&self) -> Box<dyn BarRendererKind> {
        Box::new(SlashBarRenderer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bar, Beat, BendPoint, MasterBar, Note, Score, SimileMark, Voice};
    use crate::platform::{DrawOp, RecordingCanvas};
    use crate::renderer::bar_renderer::BarRenderer;
    use crate::renderer::BarId;
    use crate::settings::RenderSettings;
    use pretty_assertions::assert_eq;

    fn slash_score(beats: Vec<Beat>) -> Score {
        Score {
            master_bars: vec![MasterBar::default()],
            tracks: vec![Track {
                staves: vec![Staff {
                    show_slash: true,
                    bars: vec![Bar {
                        voices: vec![Voice { beats }],
                        ..Bar::default()
                    }],
                    ..Staff::default()
                }],
                ..Track::default()
            }],
            ..Score::default()
        }
    }

    fn renderer<'a>(score: &'a Score, settings: &'a RenderSettings) -> BarRenderer<'a> {
        let staff = &score.tracks[0].staves[0];
        let base = BarRendererBase::new(
            BarId {
                track: 0,
                staff: 0,
                index: 0,
            },
            score,
            settings,
            staff,
            &staff.bars[0],
            &score.master_bars[0],
        );
        SlashBarRendererFactory.create(base)
    }

    #[test]
    fn height_follows_tab_font() {
        let score = slash_score(vec![Beat::rest(Duration::Whole)]);
        let settings = RenderSettings::default();
        let mut bar = renderer(&score, &settings);
        bar.do_layout().unwrap();
        let padding = 13.0 / 2.0 + 13.0 * SLASH_SIZE_PADDING;
        let band = 11.0 + BAR_NUMBER_GAP;
        assert_eq!(bar.base.height, LINE_SPACING * 4.0 + band + padding);
    }

    #[test]
    fn stems_always_point_up() {
        // low pitches would point a score stem up too, so use high ones
        let beats = vec![
            Beat::new(Duration::Eighth, vec![Note::new(96)]),
            Beat::new(Duration::Eighth, vec![Note::new(96)]),
            Beat::new(Duration::Half, vec![Note::new(96)]),
        ];
        let score = slash_score(beats);
        let settings = RenderSettings::default();
        let mut bar = renderer(&score, &settings);
        bar.do_layout().unwrap();
        for helper in bar.base.helpers.beam_helpers.iter().flatten() {
            assert_eq!(helper.direction, BeamDirection::Up);
        }

        let mut canvas = RecordingCanvas::new();
        bar.paint(0.0, 0.0, &mut canvas);
        assert_eq!(canvas.count_symbol(MusicFontSymbol::SlashHorizontalEnds), 2);
        assert_eq!(canvas.count_symbol(MusicFontSymbol::SlashHalf), 1);
        // one stem per slash
        assert_eq!(canvas.stroked_paths().len(), 3);
    }

    #[test]
    fn whammy_reaches_above_the_bar() {
        let mut beat = Beat::new(Duration::Quarter, vec![Note::new(60)]);
        beat.whammy_bar_points = vec![BendPoint::new(0, 0), BendPoint::new(60, 8)];
        let score = slash_score(vec![beat]);
        let settings = RenderSettings::default();
        let mut bar = renderer(&score, &settings);
        bar.do_layout().unwrap();
        assert!(bar.base.top_overflow() >= 8.0 * WHAMMY_HEIGHT);
    }

    #[test]
    fn simile_mark_is_centred_on_the_slash_line() {
        let mut score = slash_score(vec![Beat::rest(Duration::Whole)]);
        score.tracks[0].staves[0].bars[0].simile_mark = SimileMark::Simple;
        let settings = RenderSettings::default();
        let mut bar = renderer(&score, &settings);
        bar.do_layout().unwrap();
        let mut canvas = RecordingCanvas::new();
        bar.paint(0.0, 0.0, &mut canvas);
        let line_y = SlashBarRenderer::line_y(&bar.base);
        let width = bar.base.width;
        let marks: Vec<(f64, f64)> = canvas
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillMusicFontSymbol {
                    x,
                    y,
                    symbol: MusicFontSymbol::Repeat1Bar,
                    ..
                } => Some((*x, *y)),
                _ => None,
            })
            .collect();
        assert_eq!(marks, vec![(width / 2.0, line_y)]);
    }

    #[test]
    fn ghost_slash_and_beat_text() {
        let mut ghost = Note::new(60);
        ghost.is_ghost = true;
        let mut beat = Beat::new(Duration::Whole, vec![ghost]);
        beat.text = Some("solo".to_string());
        let score = slash_score(vec![beat]);
        let settings = RenderSettings::default();
        let mut bar = renderer(&score, &settings);
        bar.do_layout().unwrap();
        assert!(bar.base.top_overflow() > 0.0);

        let mut canvas = RecordingCanvas::new();
        bar.paint(0.0, 0.0, &mut canvas);
        assert_eq!(canvas.count_symbol(MusicFontSymbol::NoteheadParenthesisLeft), 1);
        assert_eq!(canvas.count_symbol(MusicFontSymbol::NoteheadParenthesisRight), 1);
        assert_eq!(canvas.texts(), vec!["solo"]);
    }
}
