//! Shared layout constants, in units at scale 1.

// ── Page ────────────────────────────────────────────────────────────
pub(crate) const PAGE_PADDING: f64 = 40.0;
pub(crate) const SYSTEM_SPACING: f64 = 20.0; // vertical gap between systems
pub(crate) const SCORE_INFO_SPACING: f64 = 8.0;
pub(crate) const ACCOLADE_WIDTH: f64 = 6.0;

// ── Header: tuning & chord diagrams ─────────────────────────────────
pub(crate) const TUNING_ROWS: usize = 3; // strings per column
pub(crate) const TUNING_COLUMN_GAP: f64 = 15.0;
pub(crate) const TUNING_LINE_GAP: f64 = 3.0;
pub(crate) const CHORD_STRING_SPACING: f64 = 10.0;
pub(crate) const CHORD_FRET_SPACING: f64 = 12.0;
pub(crate) const CHORD_FRET_COUNT: i32 = 5;
pub(crate) const CHORD_CIRCLE_RADIUS: f64 = 3.0;
pub(crate) const CHORD_PADDING: f64 = 5.0;
pub(crate) const CHORD_NUT_WIDTH: f64 = 3.0;
pub(crate) const CHORD_DIAGRAM_GAP: f64 = 15.0; // between two diagrams

// ── Standard notation staff ─────────────────────────────────────────
pub(crate) const LINE_SPACING: f64 = 9.0; // distance between two staff lines
pub(crate) const STAFF_LINE_COUNT: i32 = 5;
pub(crate) const STAFF_PADDING: f64 = 10.0; // above and below the lines
pub(crate) const STAFF_LINE_WIDTH: f64 = 1.0;
pub(crate) const BAR_NUMBER_GAP: f64 = 2.0; // bar number baseline above the top line

// ── Stems & beams ───────────────────────────────────────────────────
pub(crate) const STEM_STEPS: f64 = 7.0; // stem length in half line spacings
pub(crate) const STEM_WIDTH: f64 = 1.0;
pub(crate) const MAX_BEAM_RISE: f64 = 10.0;
pub(crate) const BEAM_SPACING: f64 = 7.0; // distance between two beam bars
pub(crate) const BEAM_THICKNESS: f64 = 4.0;
pub(crate) const BROKEN_BEAM_LENGTH: f64 = 6.0;

// ── Tuplets ─────────────────────────────────────────────────────────
pub(crate) const TUPLET_OFFSET: f64 = 10.0; // bracket distance from the beam
pub(crate) const TUPLET_TICK_SIZE: f64 = 5.0;
pub(crate) const TUPLET_LABEL_PADDING: f64 = 3.0;

// ── Glyph spacing ───────────────────────────────────────────────────
pub(crate) const GRACE_SCALE: f64 = 0.75;
pub(crate) const BEAT_PADDING: f64 = 4.0; // horizontal space after every beat
pub(crate) const ACCIDENTAL_GAP: f64 = 2.0;
pub(crate) const DOT_RADIUS: f64 = 1.5;
pub(crate) const DOT_SPACING: f64 = 4.0;
pub(crate) const PRE_BEAT_GAP: f64 = 6.0;
pub(crate) const BAR_SEPARATOR_WIDTH: f64 = 8.0;
pub(crate) const THIN_LINE: f64 = 1.0;
pub(crate) const THICK_LINE: f64 = 3.0;
pub(crate) const REPEAT_DOT_RADIUS: f64 = 1.5;
pub(crate) const LEDGER_EXTEND: f64 = 3.0;
pub(crate) const GHOST_PARENTHESIS_GAP: f64 = 4.0;
pub(crate) const BEAT_TEXT_GAP: f64 = 4.0; // beat text baseline above the top line

// ── Tablature ───────────────────────────────────────────────────────
pub(crate) const TAB_LINE_SPACING: f64 = 10.0;
pub(crate) const TAB_PADDING: f64 = 10.0;
pub(crate) const BEND_HEIGHT: f64 = 20.0; // arrow height for a full tone
pub(crate) const BEND_WIDTH: f64 = 14.0;

// ── Slash notation ──────────────────────────────────────────────────
pub(crate) const SLASH_SIZE_PADDING: f64 = 0.2; // fraction of the tab font size
pub(crate) const WHAMMY_HEIGHT: f64 = 2.0; // per quarter tone
