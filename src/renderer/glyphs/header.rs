//! Header glyphs drawn above the first system: the tuning of the first
//! stringed staff and the chord diagrams of the score.

use super::{glyph_bounds, Bounds, Glyph, RenderContext, TextGlyph};
use crate::model::Chord;
use crate::platform::{Canvas, TextAlign};
use crate::renderer::constants::*;
use crate::settings::Font;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Well-known tunings, highest string first.
const KNOWN_TUNINGS: [(&str, &[i32]); 10] = [
    ("Guitar Standard Tuning", &[64, 59, 55, 50, 45, 40]),
    ("Guitar 7-String Standard Tuning", &[64, 59, 55, 50, 45, 40, 35]),
    ("Drop D", &[64, 59, 55, 50, 45, 38]),
    ("Eb Standard", &[63, 58, 54, 49, 44, 39]),
    ("D Standard", &[62, 57, 53, 48, 43, 38]),
    ("Open G", &[62, 59, 55, 50, 43, 38]),
    ("DADGAD", &[62, 57, 55, 50, 45, 38]),
    ("Bass Standard Tuning", &[43, 38, 33, 28]),
    ("Bass 5-String Standard Tuning", &[43, 38, 33, 28, 23]),
    ("Ukulele Standard Tuning", &[69, 64, 60, 67]),
];

/// Pitch class name of a MIDI value, with sharps.
pub fn note_name(value: i32) -> &'static str {
    NOTE_NAMES[value.rem_euclid(12) as usize]
}

pub fn tuning_name(tuning: &[i32]) -> Option<&'static str> {
    KNOWN_TUNINGS
        .iter()
        .find(|(_, values)| *values == tuning)
        .map(|(name, _)| *name)
}

/// The tuning name (when known) over one "(n) = E" entry per string,
/// `TUNING_ROWS` strings per column.
pub struct TuningGlyph {
    bounds: Bounds,
    name: Option<TextGlyph>,
    strings: Vec<TextGlyph>,
}

impl TuningGlyph {
    pub fn new(tuning: &[i32], font: Font) -> Self {
        let name = tuning_name(tuning).map(|name| TextGlyph::new(name, font.clone()));
        let strings = tuning
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let text = format!("({}) = {}", i + 1, note_name(*value));
                TextGlyph::new(&text, font.clone())
            })
            .collect();
        Self {
            bounds: Bounds::default(),
            name,
            strings,
        }
    }
}

impl Glyph for TuningGlyph {
    glyph_bounds!();

    fn measure(&mut self, ctx: &RenderContext<'_>) {
        let gap = TUNING_LINE_GAP * ctx.scale;
        let mut top = 0.0;
        let mut width = 0.0f64;
        if let Some(name) = &mut self.name {
            name.measure(ctx);
            let height = name.bounds().height;
            top = height + gap;
            name.bounds_mut().x = 0.0;
            name.bounds_mut().y = height;
            width = name.width();
        }

        let mut column_width = 0.0f64;
        let mut line = 0.0f64;
        for entry in &mut self.strings {
            entry.measure(ctx);
            column_width = column_width.max(entry.width());
            line = line.max(entry.bounds().height);
        }
        column_width += TUNING_COLUMN_GAP * ctx.scale;

        for (i, entry) in self.strings.iter_mut().enumerate() {
            let (column, row) = (i / TUNING_ROWS, i % TUNING_ROWS);
            entry.bounds_mut().x = column as f64 * column_width;
            entry.bounds_mut().y = top + line + row as f64 * (line + gap);
        }
        let rows = self.strings.len().min(TUNING_ROWS);
        let columns = self.strings.len().div_ceil(TUNING_ROWS);
        if columns > 0 {
            width = width.max(columns as f64 * column_width - TUNING_COLUMN_GAP * ctx.scale);
        }
        self.bounds.width = width;
        self.bounds.height = top + rows as f64 * line + rows.saturating_sub(1) as f64 * gap;
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>) {
        let (ox, oy) = (cx + self.bounds.x, cy + self.bounds.y);
        if let Some(name) = &self.name {
            name.paint(ox, oy, canvas, ctx);
        }
        for entry in &self.strings {
            entry.paint(ox, oy, canvas, ctx);
        }
    }
}

/// A chord name over a fret grid. The lowest string is drawn on the left.
pub struct ChordDiagramGlyph {
    bounds: Bounds,
    name: TextGlyph,
    first_fret: i32,
    strings: Vec<i32>,
    number_font: Font,
    grid_left: f64,
    grid_top: f64,
}

impl ChordDiagramGlyph {
    pub fn new(chord: &Chord, name_font: Font, number_font: Font) -> Self {
        Self {
            bounds: Bounds::default(),
            name: TextGlyph::new(&chord.name, name_font).with_align(TextAlign::Center),
            first_fret: chord.first_fret,
            strings: chord.strings.clone(),
            number_font,
            grid_left: 0.0,
            grid_top: 0.0,
        }
    }

    fn shows_nut(&self) -> bool {
        self.first_fret <= 1
    }

    fn grid_width(&self, scale: f64) -> f64 {
        self.strings.len().saturating_sub(1) as f64 * CHORD_STRING_SPACING * scale
    }

    fn string_x(&self, string: usize, scale: f64) -> f64 {
        let column = self.strings.len() - 1 - string;
        self.grid_left + column as f64 * CHORD_STRING_SPACING * scale
    }
}

impl Glyph for ChordDiagramGlyph {
    glyph_bounds!();

    fn measure(&mut self, ctx: &RenderContext<'_>) {
        let s = ctx.scale;
        let padding = CHORD_PADDING * s;
        self.name.measure(ctx);
        let name_height = self.name.bounds().height;

        let label = if self.shows_nut() {
            0.0
        } else {
            let font = Font {
                size: self.number_font.size * s,
                ..self.number_font.clone()
            };
            font.measure_text(&self.first_fret.to_string()) + padding
        };
        self.grid_left = padding + label;
        // marker row for open and muted strings between name and grid
        self.grid_top = name_height + padding + CHORD_CIRCLE_RADIUS * 2.0 * s + padding;

        let width = self.grid_left + self.grid_width(s) + padding;
        self.bounds.width = width.max(self.name.width());
        self.bounds.height =
            self.grid_top + CHORD_FRET_COUNT as f64 * CHORD_FRET_SPACING * s + padding;
        self.name.bounds_mut().x = self.grid_left + self.grid_width(s) / 2.0;
        self.name.bounds_mut().y = name_height;
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas, ctx: &RenderContext<'_>) {
        let s = ctx.scale;
        let (ox, oy) = (cx + self.bounds.x, cy + self.bounds.y);
        self.name.paint(ox, oy, canvas, ctx);
        if self.strings.is_empty() {
            return;
        }

        let line = STAFF_LINE_WIDTH * s;
        let fret_spacing = CHORD_FRET_SPACING * s;
        let grid_height = CHORD_FRET_COUNT as f64 * fret_spacing;
        let grid_width = self.grid_width(s);
        let top = oy + self.grid_top;
        for string in 0..self.strings.len() {
            let x = ox + self.string_x(string, s);
            canvas.fill_rect(x - line / 2.0, top, line, grid_height);
        }
        for fret in 0..=CHORD_FRET_COUNT {
            let y = top + fret as f64 * fret_spacing;
            canvas.fill_rect(ox + self.grid_left, y - line / 2.0, grid_width, line);
        }

        let font = Font {
            size: self.number_font.size * s,
            ..self.number_font.clone()
        };
        canvas.set_font(&font);
        if self.shows_nut() {
            let nut = CHORD_NUT_WIDTH * s;
            canvas.fill_rect(ox + self.grid_left, top - nut, grid_width, nut);
        } else {
            canvas.set_text_align(TextAlign::Right);
            let baseline = top + fret_spacing / 2.0 + font.size / 2.0;
            let x = ox + self.grid_left - CHORD_PADDING * s;
            canvas.fill_text(&self.first_fret.to_string(), x, baseline);
        }

        canvas.set_text_align(TextAlign::Center);
        let marker_y = top - CHORD_PADDING * s;
        let base_fret = self.first_fret.max(1);
        for (string, &fret) in self.strings.iter().enumerate() {
            let x = ox + self.string_x(string, s);
            match fret {
                f if f < 0 => canvas.fill_text("x", x, marker_y),
                0 => canvas.fill_text("o", x, marker_y),
                f => {
                    let row = f - base_fret;
                    if (0..CHORD_FRET_COUNT).contains(&row) {
                        let y = top + (row as f64 + 0.5) * fret_spacing;
                        canvas.fill_circle(x, y, CHORD_CIRCLE_RADIUS * s);
                    } else {
                        log::debug!("Fret {f} is outside the diagram starting at {base_fret}");
                    }
                }
            }
        }
        canvas.set_text_align(TextAlign::Left);
    }
}
