//! Score layout — splits the selected bar range into systems, places the
//! score info around them and paints everything as separate render units.

use std::collections::HashMap;

use serde::Serialize;

use super::bar_renderer::BarRenderer;
use super::constants::*;
use super::glyphs::{ChordDiagramGlyph, Glyph, RenderContext, TextGlyph, TuningGlyph};
use super::staves::{staff_rows, StaffRow, StaveGroup};
use super::BarId;
use crate::error::LayoutError;
use crate::model::Score;
use crate::platform::{Canvas, TextAlign};
use crate::settings::{LayoutMode, RenderSettings};

// ═══════════════════════════════════════════════════════════════════════
// Results
// ═══════════════════════════════════════════════════════════════════════

/// One painted output unit: the header, a system or the footer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialRender {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Bar range of a system; `None` for header and footer
    pub first_bar: Option<usize>,
    pub last_bar: Option<usize>,
}

/// Where a registered renderer lives inside the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererLocation {
    pub group: usize,
    pub staff: usize,
    pub bar: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreInfo {
    Title,
    SubTitle,
    Artist,
    Album,
    WordsAndMusic,
    Words,
    Music,
    Copyright,
}

// ═══════════════════════════════════════════════════════════════════════
// Bar range
// ═══════════════════════════════════════════════════════════════════════

/// First and last bar index selected by `start_bar` (1-based) and
/// `bar_count` (-1 for all), clamped to the score.
pub fn bar_range(score: &Score, settings: &RenderSettings) -> Option<(usize, usize)> {
    let count = score.bar_count() as i64;
    if count == 0 {
        return None;
    }
    let start = (settings.start_bar as i64 - 1).clamp(0, count - 1);
    let requested = if settings.bar_count < 0 {
        count
    } else {
        settings.bar_count as i64
    };
    let end = (start + requested - 1).clamp(0, count - 1).max(start);
    Some((start as usize, end as usize))
}

// ═══════════════════════════════════════════════════════════════════════
// Layout
// ═══════════════════════════════════════════════════════════════════════

pub struct ScoreLayout<'a> {
    score: &'a Score,
    settings: &'a RenderSettings,
    pub first_bar_index: Option<usize>,
    pub last_bar_index: Option<usize>,
    rows: Option<Vec<StaffRow>>,
    header: Vec<(ScoreInfo, TextGlyph)>,
    tuning: Option<TuningGlyph>,
    chord_diagrams: Vec<ChordDiagramGlyph>,
    footer: Option<TextGlyph>,
    header_height: f64,
    footer_y: f64,
    pub groups: Vec<StaveGroup<'a>>,
    pub width: f64,
    pub height: f64,
    lookup: HashMap<&'static str, HashMap<BarId, RendererLocation>>,
}

impl<'a> ScoreLayout<'a> {
    pub fn new(score: &'a Score, settings: &'a RenderSettings) -> Self {
        Self {
            score,
            settings,
            first_bar_index: None,
            last_bar_index: None,
            rows: None,
            header: Vec::new(),
            tuning: None,
            chord_diagrams: Vec::new(),
            footer: None,
            header_height: 0.0,
            footer_y: 0.0,
            groups: Vec::new(),
            width: 0.0,
            height: 0.0,
            lookup: HashMap::new(),
        }
    }

    fn scale(&self) -> f64 {
        self.settings.scale
    }

    fn context(&self) -> RenderContext<'a> {
        let settings: &'a RenderSettings = self.settings;
        RenderContext {
            scale: settings.scale,
            resources: &settings.resources,
        }
    }

    /// Resolve the bar range and renderer rows and measure the score info.
    pub fn update_sizes(&mut self) -> Result<(), LayoutError> {
        let range = bar_range(self.score, self.settings);
        self.first_bar_index = range.map(|r| r.0);
        self.last_bar_index = range.map(|r| r.1);
        log::debug!("Bar range {:?}", range);
        self.rows = Some(staff_rows(self.score, self.settings)?);
        self.create_score_info_glyphs();
        Ok(())
    }

    fn create_score_info_glyphs(&mut self) {
        self.header.clear();
        self.tuning = None;
        self.chord_diagrams.clear();
        self.footer = None;
        if !self.settings.hide_info {
            self.create_info_texts();
        }
        let score: &'a Score = self.score;
        let settings: &'a RenderSettings = self.settings;
        let res = &settings.resources;

        if !settings.hide_tuning {
            let staff = score
                .tracks
                .iter()
                .flat_map(|track| &track.staves)
                .find(|staff| !staff.is_percussion && staff.is_stringed());
            self.tuning =
                staff.map(|staff| TuningGlyph::new(&staff.tuning, res.effect_font.clone()));
        }
        if !settings.hide_chord_diagrams {
            let mut names: Vec<&str> = Vec::new();
            for chord in score
                .tracks
                .iter()
                .flat_map(|track| &track.staves)
                .flat_map(|staff| &staff.chords)
                .filter(|chord| chord.show_diagram)
            {
                if names.contains(&chord.name.as_str()) {
                    continue;
                }
                names.push(&chord.name);
                self.chord_diagrams.push(ChordDiagramGlyph::new(
                    chord,
                    res.effect_font.clone(),
                    res.fretboard_number_font.clone(),
                ));
            }
        }

        let ctx = self.context();
        for (_, glyph) in &mut self.header {
            glyph.measure(&ctx);
        }
        if let Some(tuning) = &mut self.tuning {
            tuning.measure(&ctx);
        }
        for diagram in &mut self.chord_diagrams {
            diagram.measure(&ctx);
        }
        if let Some(footer) = &mut self.footer {
            footer.measure(&ctx);
        }
    }

    fn create_info_texts(&mut self) {
        let score: &'a Score = self.score;
        let settings: &'a RenderSettings = self.settings;
        let res = &settings.resources;
        let mut add = |kind: ScoreInfo, text: String, font, align| {
            self.header
                .push((kind, TextGlyph::new(&text, font).with_align(align)));
        };
        let present = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());

        if let Some(title) = present(&score.title) {
            add(ScoreInfo::Title, title, res.title_font.clone(), TextAlign::Center);
        }
        if let Some(sub_title) = present(&score.sub_title) {
            add(ScoreInfo::SubTitle, sub_title, res.sub_title_font.clone(), TextAlign::Center);
        }
        if let Some(artist) = present(&score.artist) {
            add(ScoreInfo::Artist, artist, res.sub_title_font.clone(), TextAlign::Center);
        }
        if let Some(album) = present(&score.album) {
            add(ScoreInfo::Album, album, res.sub_title_font.clone(), TextAlign::Center);
        }
        match (present(&score.music), present(&score.words)) {
            (Some(music), Some(words)) if music == words => add(
                ScoreInfo::WordsAndMusic,
                format!("Music and Words by {words}"),
                res.words_font.clone(),
                TextAlign::Center,
            ),
            (music, words) => {
                if let Some(music) = music {
                    add(
                        ScoreInfo::Music,
                        format!("Music by {music}"),
                        res.words_font.clone(),
                        TextAlign::Right,
                    );
                }
                if let Some(words) = words {
                    add(
                        ScoreInfo::Words,
                        format!("Words by {words}"),
                        res.words_font.clone(),
                        TextAlign::Left,
                    );
                }
            }
        }
        self.footer = present(&score.copyright).map(|copyright| {
            TextGlyph::new(&copyright, res.copyright_font.clone()).with_align(TextAlign::Center)
        });
    }

    fn has_header(&self) -> bool {
        !self.header.is_empty() || self.tuning.is_some() || !self.chord_diagrams.is_empty()
    }

    /// Texts of the score info in paint order, copyright last.
    pub fn score_info(&self) -> Vec<(ScoreInfo, &str)> {
        let mut info: Vec<(ScoreInfo, &str)> = self
            .header
            .iter()
            .map(|(kind, glyph)| (*kind, glyph.text.as_str()))
            .collect();
        if let Some(footer) = &self.footer {
            info.push((ScoreInfo::Copyright, footer.text.as_str()));
        }
        info
    }

    /// Build every system from scratch.
    pub fn do_layout(&mut self) -> Result<(), LayoutError> {
        if self.rows.is_none() {
            self.update_sizes()?;
        }
        self.groups.clear();
        self.lookup.clear();

        if self.settings.layout_mode == LayoutMode::Horizontal {
            self.width = 0.0;
        } else {
            self.width = self.settings.width;
        }
        let mut y = self.layout_header();

        let rows = self.rows.clone().unwrap_or_default();
        match (self.first_bar_index, self.last_bar_index) {
            (Some(first), Some(last)) if !rows.is_empty() => {
                y = match self.settings.layout_mode {
                    LayoutMode::Page => self.layout_pages(&rows, first, last, y)?,
                    LayoutMode::Horizontal => self.layout_horizontal(&rows, first, last, y)?,
                };
            }
            _ => log::debug!("Nothing to lay out"),
        }

        self.align_header();
        self.footer_y = y;
        if let Some(footer) = &mut self.footer {
            let size = footer.bounds().height;
            footer.bounds_mut().x = self.width / 2.0;
            footer.bounds_mut().y = size;
            y += size * 2.0;
        }
        self.height = y + PAGE_PADDING * self.scale();
        log::debug!(
            "Laid out {} systems, {:.1}x{:.1}",
            self.groups.len(),
            self.width,
            self.height
        );
        Ok(())
    }

    /// Stack the header lines, returning the y where systems start. In
    /// horizontal mode the width grows to fit the header content.
    fn layout_header(&mut self) -> f64 {
        let scale = self.scale();
        let padding = PAGE_PADDING * scale;
        let horizontal = self.settings.layout_mode == LayoutMode::Horizontal;

        let mut y = padding;
        let mut content_width = 0.0f64;
        let mut words_line = 0.0f64;
        let mut words_width = 0.0f64;
        for (kind, glyph) in &mut self.header {
            let size = glyph.bounds().height;
            glyph.bounds_mut().y = y + size;
            match kind {
                ScoreInfo::Music | ScoreInfo::Words => {
                    words_line = words_line.max(size);
                    words_width += glyph.width() + padding;
                }
                _ => {
                    content_width = content_width.max(glyph.width());
                    y += size;
                }
            }
        }
        content_width = content_width.max(words_width - padding);
        y += words_line;
        if !self.header.is_empty() {
            y += SCORE_INFO_SPACING * scale;
        }

        if let Some(tuning) = &mut self.tuning {
            tuning.bounds_mut().x = padding;
            tuning.bounds_mut().y = y;
            y += tuning.bounds().height + SCORE_INFO_SPACING * scale;
            content_width = content_width.max(tuning.width());
        }

        if !self.chord_diagrams.is_empty() {
            let right = if horizontal {
                f64::INFINITY
            } else {
                self.width - padding
            };
            let gap = CHORD_DIAGRAM_GAP * scale;
            let mut x = padding;
            let mut row_height = 0.0f64;
            for diagram in &mut self.chord_diagrams {
                if x > padding && x + diagram.width() > right {
                    y += row_height;
                    x = padding;
                    row_height = 0.0;
                }
                diagram.bounds_mut().x = x;
                diagram.bounds_mut().y = y;
                content_width = content_width.max(x + diagram.width() - padding);
                x += diagram.width() + gap;
                row_height = row_height.max(diagram.bounds().height);
            }
            y += row_height + SCORE_INFO_SPACING * scale;
        }

        if let Some(footer) = &self.footer {
            content_width = content_width.max(footer.width());
        }
        if horizontal {
            self.width = self.width.max(content_width + padding * 2.0);
        }
        self.header_height = if self.has_header() { y } else { 0.0 };
        y
    }

    /// Place centred and right-aligned score info against the final width.
    fn align_header(&mut self) {
        let padding = PAGE_PADDING * self.scale();
        let width = self.width;
        for (kind, glyph) in &mut self.header {
            glyph.bounds_mut().x = match kind {
                ScoreInfo::Music => width - padding,
                ScoreInfo::Words => padding,
                _ => width / 2.0,
            };
        }
    }

    fn layout_pages(
        &mut self,
        rows: &[StaffRow],
        first: usize,
        last: usize,
        mut y: f64,
    ) -> Result<f64, LayoutError> {
        let scale = self.scale();
        let padding = PAGE_PADDING * scale;
        let max_width = self.width - padding * 2.0;
        let bars_per_row = usize::try_from(self.settings.bars_per_row).ok().filter(|n| *n > 0);

        let mut index = first;
        while index <= last {
            let mut group = StaveGroup::new(self.score, self.settings, rows);
            group.x = padding;
            group.y = y;
            let group_index = self.groups.len();
            while index <= last {
                group.add_bars(index)?;
                let position = group.bar_count() - 1;
                self.register_position(&group, group_index, position);

                let too_wide = bars_per_row.is_none() && group.width() > max_width;
                if too_wide && group.bar_count() > 1 {
                    self.unregister_position(&group, position);
                    if let Some(reverted) = group.revert_last_bar() {
                        log::debug!("Bar {reverted} starts a new system");
                    }
                    group.is_full = true;
                    break;
                }
                index += 1;
                if bars_per_row.is_some_and(|n| group.bar_count() >= n) {
                    group.is_full = true;
                    break;
                }
            }
            if group.is_full || group.width() > max_width {
                group.scale_to_width(max_width);
            }
            group.finalize();
            y += group.height() + SYSTEM_SPACING * scale;
            self.groups.push(group);
        }
        Ok(y)
    }

    fn layout_horizontal(
        &mut self,
        rows: &[StaffRow],
        first: usize,
        last: usize,
        y: f64,
    ) -> Result<f64, LayoutError> {
        let padding = PAGE_PADDING * self.scale();
        let mut group = StaveGroup::new(self.score, self.settings, rows);
        group.x = padding;
        group.y = y;
        for index in first..=last {
            group.add_bars(index)?;
            self.register_position(&group, 0, group.bar_count() - 1);
        }
        group.finalize();
        self.width = self.width.max(group.width() + padding * 2.0);
        let y = y + group.height();
        self.groups.push(group);
        Ok(y)
    }

    fn register_position(&mut self, group: &StaveGroup<'_>, group_index: usize, position: usize) {
        for (staff, (staff_id, id)) in group.bar_ids(position).into_iter().enumerate() {
            self.register_bar_renderer(
                staff_id,
                id,
                RendererLocation {
                    group: group_index,
                    staff,
                    bar: position,
                },
            );
        }
    }

    fn unregister_position(&mut self, group: &StaveGroup<'_>, position: usize) {
        for (staff_id, id) in group.bar_ids(position) {
            self.unregister_bar_renderer(staff_id, id);
        }
    }

    // ── Renderer lookup ────────────────────────────────────────────

    pub fn register_bar_renderer(
        &mut self,
        staff_id: &'static str,
        id: BarId,
        location: RendererLocation,
    ) {
        self.lookup.entry(staff_id).or_default().insert(id, location);
    }

    pub fn unregister_bar_renderer(
        &mut self,
        staff_id: &str,
        id: BarId,
    ) -> Option<RendererLocation> {
        self.lookup.get_mut(staff_id)?.remove(&id)
    }

    pub fn renderer_location(&self, staff_id: &str, id: BarId) -> Option<RendererLocation> {
        self.lookup.get(staff_id)?.get(&id).copied()
    }

    pub fn renderer_for_bar(&self, staff_id: &str, id: BarId) -> Option<&BarRenderer<'a>> {
        let location = self.renderer_location(staff_id, id)?;
        self.groups
            .get(location.group)?
            .staves
            .get(location.staff)?
            .bars
            .get(location.bar)
    }

    // ── Painting ───────────────────────────────────────────────────

    /// Paint the header, every system and the footer, each as its own
    /// render unit.
    pub fn paint(&mut self, canvas: &mut dyn Canvas) -> Vec<PartialRender> {
        let ctx = self.context();
        let mut results = Vec::new();
        let width = self.width;

        if self.has_header() {
            canvas.begin_render(width, self.header_height);
            canvas.set_color(ctx.resources.score_info_color);
            for (_, glyph) in &self.header {
                glyph.paint(0.0, 0.0, canvas, &ctx);
            }
            canvas.set_color(ctx.resources.main_glyph_color);
            if let Some(tuning) = &self.tuning {
                tuning.paint(0.0, 0.0, canvas, &ctx);
            }
            for diagram in &self.chord_diagrams {
                diagram.paint(0.0, 0.0, canvas, &ctx);
            }
            canvas.end_render();
            results.push(PartialRender {
                x: 0.0,
                y: 0.0,
                width,
                height: self.header_height,
                first_bar: None,
                last_bar: None,
            });
        }

        for group in &mut self.groups {
            let height = group.height() + SYSTEM_SPACING * ctx.scale;
            canvas.begin_render(width, height);
            group.paint(0.0, -group.y, canvas);
            canvas.end_render();
            results.push(PartialRender {
                x: 0.0,
                y: group.y,
                width,
                height,
                first_bar: group.first_bar_index(),
                last_bar: group.last_bar_index(),
            });
        }

        if let Some(footer) = &self.footer {
            let height = footer.bounds().height * 2.0;
            canvas.begin_render(width, height);
            canvas.set_color(ctx.resources.score_info_color);
            footer.paint(0.0, 0.0, canvas, &ctx);
            canvas.end_render();
            results.push(PartialRender {
                x: 0.0,
                y: self.footer_y,
                width,
                height,
                first_bar: None,
                last_bar: None,
            });
        }
        log::debug!("Painted {} render units", results.len());
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bar, Beat, Chord, Duration, MasterBar, Note, Staff, Track, Voice};
    use crate::platform::{DrawOp, RecordingCanvas};
    use pretty_assertions::assert_eq;

    fn score(bars: usize) -> Score {
        let bar = Bar {
            voices: vec![Voice {
                beats: (0..4)
                    .map(|_| Beat::new(Duration::Quarter, vec![Note::new(67)]))
                    .collect(),
            }],
            ..Bar::default()
        };
        Score {
            title: Some("Etude".to_string()),
            music: Some("A. Composer".to_string()),
            words: Some("A. Composer".to_string()),
            copyright: Some("public domain".to_string()),
            master_bars: vec![MasterBar::default(); bars],
            tracks: vec![Track {
                staves: vec![Staff {
                    bars: vec![bar; bars],
                    ..Staff::default()
                }],
                ..Track::default()
            }],
            ..Score::default()
        }
    }

    #[test]
    fn bar_range_is_clamped() {
        let score = score(10);
        let mut settings = RenderSettings::default();
        assert_eq!(bar_range(&score, &settings), Some((0, 9)));
        settings.start_bar = 3;
        settings.bar_count = 4;
        assert_eq!(bar_range(&score, &settings), Some((2, 5)));
        settings.start_bar = 40;
        settings.bar_count = -1;
        assert_eq!(bar_range(&score, &settings), Some((9, 9)));
        settings.start_bar = 0;
        settings.bar_count = 100;
        assert_eq!(bar_range(&score, &settings), Some((0, 9)));
        assert_eq!(bar_range(&Score::default(), &settings), None);
    }

    #[test]
    fn equal_words_and_music_share_a_line() {
        let score = score(1);
        let settings = RenderSettings::default();
        let mut layout = ScoreLayout::new(&score, &settings);
        layout.update_sizes().unwrap();
        assert_eq!(
            layout.score_info(),
            vec![
                (ScoreInfo::Title, "Etude"),
                (ScoreInfo::WordsAndMusic, "Music and Words by A. Composer"),
                (ScoreInfo::Copyright, "public domain"),
            ]
        );
    }

    #[test]
    fn separate_words_and_music() {
        let mut score = score(1);
        score.words = Some("A. Poet".to_string());
        let settings = RenderSettings::default();
        let mut layout = ScoreLayout::new(&score, &settings);
        layout.update_sizes().unwrap();
        let kinds: Vec<ScoreInfo> = layout.score_info().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![
                ScoreInfo::Title,
                ScoreInfo::Music,
                ScoreInfo::Words,
                ScoreInfo::Copyright
            ]
        );
    }

    #[test]
    fn hide_info_drops_header_and_footer() {
        let score = score(1);
        let settings = RenderSettings {
            hide_info: true,
            ..RenderSettings::default()
        };
        let mut layout = ScoreLayout::new(&score, &settings);
        layout.do_layout().unwrap();
        assert!(layout.score_info().is_empty());
        let mut canvas = RecordingCanvas::new();
        let units = layout.paint(&mut canvas);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].first_bar, Some(0));
    }

    #[test]
    fn page_mode_wraps_and_stretches() {
        let score = score(24);
        let settings = RenderSettings {
            width: 600.0,
            ..RenderSettings::default()
        };
        let mut layout = ScoreLayout::new(&score, &settings);
        layout.do_layout().unwrap();
        assert!(layout.groups.len() > 1);

        let max_width = 600.0 - 2.0 * PAGE_PADDING;
        let mut next = 0;
        for group in &layout.groups {
            assert_eq!(group.first_bar_index(), Some(next));
            next = group.last_bar_index().unwrap() + 1;
            if group.is_full {
                assert_eq!(group.width(), max_width);
            } else {
                assert!(group.width() <= max_width);
            }
        }
        assert_eq!(next, 24);
    }

    #[test]
    fn bars_per_row_is_fixed() {
        let score = score(10);
        let settings = RenderSettings {
            bars_per_row: 4,
            ..RenderSettings::default()
        };
        let mut layout = ScoreLayout::new(&score, &settings);
        layout.do_layout().unwrap();
        let counts: Vec<usize> = layout.groups.iter().map(|g| g.bar_count()).collect();
        assert_eq!(counts, vec![4, 4, 2]);
        assert!(layout.groups[0].is_full);
        assert!(!layout.groups[2].is_full);
    }

    #[test]
    fn horizontal_mode_is_one_system() {
        let score = score(24);
        let settings = RenderSettings {
            layout_mode: LayoutMode::Horizontal,
            ..RenderSettings::default()
        };
        let mut layout = ScoreLayout::new(&score, &settings);
        layout.do_layout().unwrap();
        assert_eq!(layout.groups.len(), 1);
        assert_eq!(layout.groups[0].bar_count(), 24);
        assert!(layout.width > settings.width);
    }

    #[test]
    fn renderers_are_found_by_bar() {
        let score = score(6);
        let settings = RenderSettings {
            bars_per_row: 4,
            ..RenderSettings::default()
        };
        let mut layout = ScoreLayout::new(&score, &settings);
        layout.do_layout().unwrap();
        let id = BarId {
            track: 0,
            staff: 0,
            index: 5,
        };
        assert_eq!(
            layout.renderer_location("score", id),
            Some(RendererLocation {
                group: 1,
                staff: 0,
                bar: 1
            })
        );
        let renderer = layout.renderer_for_bar("score", id).unwrap();
        assert_eq!(renderer.base.id, id);
        assert!(layout.renderer_for_bar("tab", id).is_none());

        assert!(layout.unregister_bar_renderer("score", id).is_some());
        assert!(layout.renderer_for_bar("score", id).is_none());
    }

    #[test]
    fn every_unit_is_bracketed() {
        let score = score(8);
        let settings = RenderSettings::default();
        let mut layout = ScoreLayout::new(&score, &settings);
        layout.do_layout().unwrap();
        let mut canvas = RecordingCanvas::new();
        let units = layout.paint(&mut canvas);
        let begins = canvas
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::BeginRender { .. }))
            .count();
        let ends = canvas
            .ops()
            .iter()
            .filter(|op| matches!(op, DrawOp::EndRender))
            .count();
        assert_eq!(begins, units.len());
        assert_eq!(ends, units.len());
        assert_eq!(units.first().map(|u| u.first_bar), Some(None));
        assert_eq!(units.last().map(|u| u.last_bar), Some(None));
    }

    fn text_x(canvas: &RecordingCanvas, wanted: &str) -> Option<f64> {
        canvas.ops().iter().find_map(|op| match op {
            DrawOp::FillText { text, x, .. } if text == wanted => Some(*x),
            _ => None,
        })
    }

    #[test]
    fn horizontal_header_follows_the_final_width() {
        let mut score = score(24);
        score.words = Some("A. Poet".to_string());
        let settings = RenderSettings {
            layout_mode: LayoutMode::Horizontal,
            ..RenderSettings::default()
        };
        let mut layout = ScoreLayout::new(&score, &settings);
        layout.do_layout().unwrap();
        let width = layout.width;
        let canvas = {
            let mut canvas = RecordingCanvas::new();
            layout.paint(&mut canvas);
            canvas
        };
        assert_eq!(text_x(&canvas, "Etude"), Some(width / 2.0));
        assert_eq!(text_x(&canvas, "Music by A. Composer"), Some(width - PAGE_PADDING));
        assert_eq!(text_x(&canvas, "Words by A. Poet"), Some(PAGE_PADDING));
        assert_eq!(text_x(&canvas, "public domain"), Some(width / 2.0));
    }

    #[test]
    fn horizontal_width_fits_a_long_title() {
        let mut score = score(1);
        score.title = Some("A very long title that is wider than a single bar".to_string());
        let settings = RenderSettings {
            layout_mode: LayoutMode::Horizontal,
            ..RenderSettings::default()
        };
        let mut layout = ScoreLayout::new(&score, &settings);
        layout.do_layout().unwrap();
        let title_width = settings
            .resources
            .title_font
            .measure_text(score.title.as_deref().unwrap_or_default());
        assert_eq!(layout.width, title_width + PAGE_PADDING * 2.0);
        assert!(layout.groups[0].width() + PAGE_PADDING * 2.0 < layout.width);
    }

    fn guitar(bars: usize) -> Score {
        let mut score = score(bars);
        score.tracks[0].staves[0].tuning = vec![64, 59, 55, 50, 45, 38];
        score
    }

    #[test]
    fn tuning_of_the_first_stringed_staff_is_listed() {
        let mut score = guitar(1);
        let drums = Staff {
            is_percussion: true,
            tuning: vec![64, 59, 55, 50, 45, 40],
            bars: vec![Bar {
                voices: vec![Voice {
                    beats: vec![Beat::rest(Duration::Whole)],
                }],
                ..Bar::default()
            }],
            ..Staff::default()
        };
        score.tracks.insert(
            0,
            Track {
                staves: vec![drums],
                ..Track::default()
            },
        );
        let settings = RenderSettings {
            hide_info: true,
            ..RenderSettings::default()
        };
        let mut layout = ScoreLayout::new(&score, &settings);
        layout.do_layout().unwrap();
        let mut canvas = RecordingCanvas::new();
        let units = layout.paint(&mut canvas);
        assert_eq!(units[0].first_bar, None);
        let texts = canvas.texts();
        assert!(texts.contains(&"Drop D"));
        assert!(texts.contains(&"(6) = D"));
        assert!(!texts.contains(&"Guitar Standard Tuning"));
    }

    #[test]
    fn hide_tuning_removes_the_header_entry() {
        let score = guitar(1);
        let settings = RenderSettings {
            hide_info: true,
            hide_tuning: true,
            ..RenderSettings::default()
        };
        let mut layout = ScoreLayout::new(&score, &settings);
        layout.do_layout().unwrap();
        let mut canvas = RecordingCanvas::new();
        let units = layout.paint(&mut canvas);
        assert_eq!(units.len(), 1);
        assert!(!canvas.texts().contains(&"Drop D"));
    }

    #[test]
    fn chord_diagrams_are_listed_once() {
        let mut score = guitar(1);
        let chord = |name: &str, show_diagram| Chord {
            name: name.to_string(),
            strings: vec![0, 1, 0, 2, 3, -1],
            show_diagram,
            ..Chord::default()
        };
        score.tracks[0].staves[0].chords =
            vec![chord("C", true), chord("C", true), chord("G", false)];
        let settings = RenderSettings {
            hide_info: true,
            hide_tuning: true,
            ..RenderSettings::default()
        };
        let mut layout = ScoreLayout::new(&score, &settings);
        layout.do_layout().unwrap();
        let mut canvas = RecordingCanvas::new();
        layout.paint(&mut canvas);
        assert_eq!(canvas.texts().iter().filter(|t| **t == "C").count(), 1);
        assert!(!canvas.texts().contains(&"G"));

        let hidden = RenderSettings {
            hide_chord_diagrams: true,
            ..settings.clone()
        };
        let mut layout = ScoreLayout::new(&score, &hidden);
        layout.do_layout().unwrap();
        let mut canvas = RecordingCanvas::new();
        let units = layout.paint(&mut canvas);
        assert_eq!(units.len(), 1);
    }
}
