//! Tablature: one line per string with fret numbers, bends and whammy
//! curves. Tablature draws no stems.

use super::bar_renderer::{paint_staff_lines, BarRendererBase, BarRendererKind};
use super::factory::BarRendererFactory;
use crate::model::{HarmonicType, Note, Staff, Track};
use crate::platform::{Canvas, MusicFontSymbol};
use crate::renderer::constants::*;
use crate::renderer::glyphs::{
    BarNumberGlyph, MusicFontGlyph, RenderContext, RepeatOpenGlyph, SpacingGlyph,
    TabBendGlyph, TabNoteNumberGlyph, TimeSignatureGlyph, VoiceContainerGlyph, WhammyBarGlyph,
};

pub struct TabBarRenderer;

impl TabBarRenderer {
    fn string_count(base: &BarRendererBase<'_>) -> usize {
        base.staff.tuning.len().max(1)
    }

    /// y of the line with the given index from the top.
    fn line_y(base: &BarRendererBase<'_>, index: f64) -> f64 {
        base.top_padding + index * TAB_LINE_SPACING * base.scale
    }

    /// y of a 1-based string counted from the lowest string.
    fn string_y(base: &BarRendererBase<'_>, string: i32) -> f64 {
        let count = Self::string_count(base) as i32;
        let index = (count - string).clamp(0, count - 1);
        Self::line_y(base, index as f64)
    }

    fn bottom_y(base: &BarRendererBase<'_>) -> f64 {
        Self::line_y(base, (Self::string_count(base) - 1) as f64)
    }

    /// Clef symbol for the string count and the scale that stretches it
    /// over the lines: the four-string clef up to four strings, the
    /// six-string clef above.
    pub fn clef_for(strings: usize) -> (MusicFontSymbol, f64) {
        let gaps = strings.saturating_sub(1).max(1) as f64;
        if strings <= 4 {
            (MusicFontSymbol::FourStringTabClef, gaps / 3.0)
        } else {
            (MusicFontSymbol::SixStringTabClef, gaps / 5.0)
        }
    }

    /// Text for a fret: "X" for dead notes, "<12>" for natural harmonics,
    /// parentheses for tied and ghost notes.
    pub fn fret_text(note: &Note) -> String {
        if note.is_dead {
            return "X".to_string();
        }
        let fret = note.fret.to_string();
        if note.harmonic_type == HarmonicType::Natural {
            format!("<{fret}>")
        } else if note.is_tie_destination || note.is_ghost {
            format!("({fret})")
        } else {
            fret
        }
    }
}

impl BarRendererKind for TabBarRenderer {
    fn staff_id(&self) -> &'static str {
        "tab"
    }

    fn update_sizes(&self, base: &mut BarRendererBase<'_>) {
        let padding = TAB_PADDING * base.scale;
        base.top_padding = base.padding_with_bar_number(padding);
        base.bottom_padding = padding;
        let lines = (Self::string_count(base) - 1) as f64;
        base.height = TAB_LINE_SPACING * base.scale * lines + base.top_padding + base.bottom_padding;
    }

    fn create_pre_beat_glyphs(&self, base: &mut BarRendererBase<'_>) {
        let top = Self::line_y(base, 0.0);
        let bottom = Self::bottom_y(base);
        let middle = (top + bottom) / 2.0;
        if base.master_bar.is_repeat_start {
            let spacing = TAB_LINE_SPACING * base.scale;
            let dots = (middle - spacing / 2.0, middle + spacing / 2.0);
            base.pre_beat_glyphs.add(RepeatOpenGlyph::new(top, bottom, dots));
        }
        if base.is_first_of_line {
            let (clef, clef_scale) = Self::clef_for(Self::string_count(base));
            base.pre_beat_glyphs.add(
                MusicFontGlyph::new(clef)
                    .with_scale(clef_scale)
                    .at(0.0, middle),
            );
            base.pre_beat_glyphs.add(SpacingGlyph::new(PRE_BEAT_GAP));
        }
        if base.shows_time_signature() {
            let master = base.master_bar;
            let spacing = TAB_LINE_SPACING * base.scale;
            base.pre_beat_glyphs.add(TimeSignatureGlyph::new(
                master.time_signature_numerator,
                master.time_signature_denominator,
                master.time_signature_common,
                middle - spacing,
                middle + spacing,
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
        let font = if base.staff.is_stringed() {
            base.settings.resources.tablature_font.clone()
        } else {
            base.settings.resources.fretboard_number_font.clone()
        };
        for (v, voice) in bar.voices.iter().enumerate() {
            let times = base.beat_times(v);
            let mut container = VoiceContainerGlyph::new(v);
            for (i, beat) in voice.beats.iter().enumerate() {
                let mut glyph = base.beat_container(v, i, times[i]);
                if !beat.is_empty {
                    let beat_font = if beat.is_grace() {
                        base.settings.resources.grace_font.clone()
                    } else {
                        font.clone()
                    };
                    if let Some(text) = beat.text.as_deref().filter(|t| !t.is_empty()) {
                        if base.is_top_of_staff {
                            let top = Self::line_y(base, 0.0);
                            glyph.effects.add(base.beat_text_glyph(text, top));
                        }
                    }
                    for note in &beat.notes {
                        let y = Self::string_y(base, note.string);
                        glyph.on_notes.add(TabNoteNumberGlyph::new(
                            Self::fret_text(note),
                            y,
                            beat_font.clone(),
                        ));
                        if note.has_bend() {
                            let bend = TabBendGlyph::new(&note.bend_points, y);
                            let reach = TabBendGlyph::arrow_height(
                                note.bend_points.iter().map(|p| p.value).max().unwrap_or(0),
                                base.scale,
                            ) + base.settings.resources.tablature_font.size * base.scale;
                            base.register_overflow_top(reach - y);
                            glyph.effects.add(bend);
                        }
                    }
                }
                container.add_beat(glyph);
            }
            base.voices.push(container);

            for (i, beat) in voice.beats.iter().enumerate() {
                if beat.has_whammy_bar() {
                    let (_, below) = WhammyBarGlyph::extent(&beat.whammy_bar_points, base.scale);
                    base.add_whammy(v, i, &beat.whammy_bar_points, -below);
                }
            }
        }
    }

    fn create_post_beat_glyphs(&self, base: &mut BarRendererBase<'_>) {
        let top = Self::line_y(base, 0.0);
        let bottom = Self::bottom_y(base);
        let middle = (top + bottom) / 2.0;
        let spacing = TAB_LINE_SPACING * base.scale;
        let dots = (middle - spacing / 2.0, middle + spacing / 2.0);
        base.add_bar_end_glyphs(top, bottom, dots, top - 3.0 * base.scale);
    }

    fn paint_background(
        &self,
        base: &BarRendererBase<'_>,
        cx: f64,
        cy: f64,
        canvas: &mut dyn Canvas,
        ctx: &RenderContext<'_>,
    ) {
        let lines = (0..Self::string_count(base)).map(|i| Self::line_y(base, i as f64));
        paint_staff_lines(base, lines, cx, cy, canvas, ctx);
    }

    fn paint_foreground(
        &self,
        _base: &BarRendererBase<'_>,
        _cx: f64,
        _cy: f64,
        _canvas: &mut dyn Canvas,
        _ctx: &RenderContext<'_>,
    ) {
    }
}

pub struct TabBarRendererFactory;

impl BarRendererFactory for TabBarRendererFactory {
    fn staff_id(&self) -> &'static str {
        "tab"
    }

    fn can_create(&self, _track: &Track, staff: &Staff) -> bool {
        !staff.is_percussion && staff.is_stringed() && staff.show_tablature
    }

    fn create_kind(&self) -> Box<dyn BarRendererKind> {
        Box::new(TabBarRenderer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bar, Beat, BendPoint, Duration, MasterBar, Score, Voice};
    use crate::platform::RecordingCanvas;
    use crate::renderer::bar_renderer::BarRenderer;
    use crate::renderer::BarId;
    use crate::settings::RenderSettings;
    use pretty_assertions::assert_eq;

    const GUITAR: [i32; 6] = [64, 59, 55, 50, 45, 40];

    fn tab_score(beats: Vec<Beat>) -> Score {
        Score {
            master_bars: vec![MasterBar::default()],
            tracks: vec![Track {
                staves: vec![Staff {
                    tuning: GUITAR.to_vec(),
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
        TabBarRendererFactory.create(base)
    }

    #[test]
    fn fret_texts() {
        let mut note = Note::fretted(64, 1, 5);
        assert_eq!(TabBarRenderer::fret_text(&note), "5");
        note.is_tie_destination = true;
        assert_eq!(TabBarRenderer::fret_text(&note), "(5)");
        note.is_tie_destination = false;
        note.harmonic_type = HarmonicType::Natural;
        assert_eq!(TabBarRenderer::fret_text(&note), "<5>");
        note.is_dead = true;
        assert_eq!(TabBarRenderer::fret_text(&note), "X");
    }

    #[test]
    fn clef_follows_string_count() {
        assert_eq!(
            TabBarRenderer::clef_for(6),
            (MusicFontSymbol::SixStringTabClef, 1.0)
        );
        assert_eq!(
            TabBarRenderer::clef_for(4),
            (MusicFontSymbol::FourStringTabClef, 1.0)
        );
        assert_eq!(
            TabBarRenderer::clef_for(7),
            (MusicFontSymbol::SixStringTabClef, 1.2)
        );
    }

    #[test]
    fn bass_tab_draws_the_four_string_clef() {
        let mut score = tab_score(vec![Beat::rest(Duration::Whole)]);
        score.tracks[0].staves[0].tuning = vec![43, 38, 33, 28];
        let settings = RenderSettings::default();
        let mut bar = renderer(&score, &settings);
        bar.base.is_first_of_line = true;
        bar.do_layout().unwrap();
        let mut canvas = RecordingCanvas::new();
        bar.paint(0.0, 0.0, &mut canvas);
        assert_eq!(canvas.count_symbol(MusicFontSymbol::FourStringTabClef), 1);
        assert_eq!(canvas.count_symbol(MusicFontSymbol::SixStringTabClef), 0);
    }

    #[test]
    fn six_strings_give_five_gaps() {
        let score = tab_score(vec![Beat::rest(Duration::Whole)]);
        let settings = RenderSettings::default();
        let mut bar = renderer(&score, &settings);
        bar.do_layout().unwrap();
        let band = 11.0 + BAR_NUMBER_GAP;
        assert_eq!(bar.base.height, TAB_LINE_SPACING * 5.0 + band + TAB_PADDING);
    }

    #[test]
    fn fret_numbers_sit_on_their_strings() {
        let beat = Beat::new(
            Duration::Quarter,
            vec![Note::fretted(40, 1, 0), Note::fretted(67, 6, 3)],
        );
        let score = tab_score(vec![beat]);
        let settings = RenderSettings::default();
        let mut bar = renderer(&score, &settings);
        bar.do_layout().unwrap();
        let mut canvas = RecordingCanvas::new();
        bar.paint(0.0, 0.0, &mut canvas);
        assert_eq!(canvas.texts(), vec!["0", "3"]);
        assert!(canvas.stroked_paths().is_empty());
    }

    #[test]
    fn bends_overflow_the_top() {
        let mut note = Note::fretted(64, 6, 7);
        note.bend_points = vec![BendPoint::new(0, 0), BendPoint::new(30, 4)];
        let score = tab_score(vec![Beat::new(Duration::Quarter, vec![note])]);
        let settings = RenderSettings::default();
        let mut bar = renderer(&score, &settings);
        bar.do_layout().unwrap();
        assert!(bar.base.top_overflow() > 0.0);
        assert_eq!(bar.base.bottom_overflow(), 0.0);
    }

    #[test]
    fn beat_text_only_on_the_top_row() {
        let mut beat = Beat::new(Duration::Whole, vec![Note::fretted(64, 1, 0)]);
        beat.text = Some("let ring".to_string());
        let score = tab_score(vec![beat]);
        let settings = RenderSettings::default();

        let mut bar = renderer(&score, &settings);
        bar.do_layout().unwrap();
        assert!(bar.base.top_overflow() > 0.0);
        let mut canvas = RecordingCanvas::new();
        bar.paint(0.0, 0.0, &mut canvas);
        assert!(canvas.texts().contains(&"let ring"));

        let mut below = renderer(&score, &settings);
        below.base.is_top_of_staff = false;
        below.do_layout().unwrap();
        assert_eq!(below.base.top_overflow(), 0.0);
        let mut canvas = RecordingCanvas::new();
        below.paint(0.0, 0.0, &mut canvas);
        assert!(!canvas.texts().contains(&"let ring"));
    }
}
