//! Data model for the score handed to the layout engine.
//!
//! The importer that builds these structures lives outside this crate; the
//! renderer only ever borrows them. Every field has a default so hosts can
//! exchange sparse JSON documents.

use serde::{Deserialize, Serialize};

/// Ticks per quarter note used for all rhythmic arithmetic.
pub const QUARTER_TICKS: i32 = 960;
/// Largest tuplet part honoured; larger ratios are treated as malformed.
pub const MAX_TUPLET_PART: i32 = 128;

/// A complete musical score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Score {
    pub title: Option<String>,
    pub sub_title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Lyricist
    pub words: Option<String>,
    /// Composer
    pub music: Option<String>,
    pub copyright: Option<String>,
    /// Bar attributes shared by all tracks, one entry per bar index.
    pub master_bars: Vec<MasterBar>,
    pub tracks: Vec<Track>,
}

/// Attributes shared by every staff at one bar index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MasterBar {
    pub time_signature_numerator: i32,
    pub time_signature_denominator: i32,
    /// Draw the common-time symbol instead of digits (4/4 and 2/2 only)
    pub time_signature_common: bool,
    /// Number of sharps (positive) or flats (negative), -7..=7
    pub key_signature: i32,
    pub is_repeat_start: bool,
    /// Number of plays for a repeat ending at this bar; 0 = no repeat end
    pub repeat_count: i32,
}

/// One instrument.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Track {
    pub name: String,
    pub short_name: String,
    pub staves: Vec<Staff>,
}

/// One staff of a track, holding the bars in score order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Staff {
    pub bars: Vec<Bar>,
    pub show_standard_notation: bool,
    pub show_tablature: bool,
    pub show_slash: bool,
    pub is_percussion: bool,
    /// Open-string MIDI values, highest string first
    pub tuning: Vec<i32>,
    /// Semitones added to every pitch for display (e.g. -12 for guitar)
    pub display_transposition_pitch: i32,
    /// Chord shapes used on this staff
    pub chords: Vec<Chord>,
}

/// A chord shape for a stringed staff.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Chord {
    pub name: String,
    /// Fret shown on the top row of the diagram; 0 or 1 draws the nut
    pub first_fret: i32,
    /// Fret per string, highest string first; -1 mutes, 0 is open
    pub strings: Vec<i32>,
    pub show_diagram: bool,
}

impl Default for Chord {
    fn default() -> Self {
        Self {
            name: String::new(),
            first_fret: 1,
            strings: Vec::new(),
            show_diagram: true,
        }
    }
}

/// One bar (measure) of one staff.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Bar {
    pub clef: Clef,
    pub clef_ottava: Ottavia,
    pub simile_mark: SimileMark,
    pub voices: Vec<Voice>,
}

/// One voice inside a bar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Voice {
    pub beats: Vec<Beat>,
}

/// One rhythmic event: a chord of notes, a rest, or an empty placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Beat {
    pub duration: Duration,
    pub dots: u8,
    /// -1 when the beat is not part of a tuplet
    pub tuplet_numerator: i32,
    pub tuplet_denominator: i32,
    pub grace_type: GraceType,
    /// Placeholder beat that occupies no visible space
    pub is_empty: bool,
    pub notes: Vec<Note>,
    pub text: Option<String>,
    pub beam_mode: BeamMode,
    pub invert_beam_direction: bool,
    pub whammy_bar_points: Vec<BendPoint>,
}

/// A single note of a beat.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Note {
    /// MIDI note value (middle C = 60); drum key on percussion staves
    pub pitch: i32,
    /// 1-based string number counted from the lowest string, 0 if unset
    pub string: i32,
    pub fret: i32,
    pub is_dead: bool,
    pub is_ghost: bool,
    pub is_tie_destination: bool,
    pub harmonic_type: HarmonicType,
    pub accidental_mode: AccidentalMode,
    pub bend_points: Vec<BendPoint>,
}

/// A point of a bend or whammy curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BendPoint {
    /// Position along the beat, 0..=60
    pub offset: i32,
    /// Pitch change in quarter tones
    pub value: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Duration {
    QuadrupleWhole,
    DoubleWhole,
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
    SixtyFourth,
    OneHundredTwentyEighth,
    TwoHundredFiftySixth,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GraceType {
    #[default]
    None,
    OnBeat,
    BeforeBeat,
    BendGrace,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BeamMode {
    #[default]
    Auto,
    ForceSplitToNext,
    ForceMergeWithNext,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HarmonicType {
    #[default]
    None,
    Natural,
    Artificial,
    Pinch,
    Tap,
    Semi,
    Feedback,
}

/// Explicit accidental request on a note, overriding the bar-level rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccidentalMode {
    #[default]
    Default,
    ForceNone,
    ForceNatural,
    ForceSharp,
    ForceFlat,
    /// Show the accidental even if the bar already registered it
    Courtesy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Clef {
    Neutral,
    C3,
    C4,
    F4,
    #[default]
    G2,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ottavia {
    #[serde(rename = "15ma")]
    Quindicesima,
    #[serde(rename = "8va")]
    Ottava,
    #[default]
    #[serde(rename = "regular")]
    Regular,
    #[serde(rename = "8vb")]
    OttavaBassa,
    #[serde(rename = "15mb")]
    QuindicesimaBassa,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SimileMark {
    #[default]
    None,
    Simple,
    FirstOfDouble,
    SecondOfDouble,
}

impl Score {
    /// Number of bars in the score (driven by the master bars).
    pub fn bar_count(&self) -> usize {
        self.master_bars.len()
    }
}

impl Default for MasterBar {
    fn default() -> Self {
        Self {
            time_signature_numerator: 4,
            time_signature_denominator: 4,
            time_signature_common: false,
            key_signature: 0,
            is_repeat_start: false,
            repeat_count: 0,
        }
    }
}

impl MasterBar {
    pub fn is_repeat_end(&self) -> bool {
        self.repeat_count > 0
    }

    /// Length of a full bar in ticks.
    pub fn duration_ticks(&self) -> i32 {
        let denominator = self.time_signature_denominator.max(1);
        (QUARTER_TICKS * 4).saturating_mul(self.time_signature_numerator.max(1)) / denominator
    }

    /// Whether the time signature differs from `other`.
    pub fn time_signature_differs(&self, other: &MasterBar) -> bool {
        self.time_signature_numerator != other.time_signature_numerator
            || self.time_signature_denominator != other.time_signature_denominator
            || self.time_signature_common != other.time_signature_common
    }
}

impl Default for Staff {
    fn default() -> Self {
        Self {
            bars: Vec::new(),
            show_standard_notation: true,
            show_tablature: true,
            show_slash: false,
            is_percussion: false,
            tuning: Vec::new(),
            display_transposition_pitch: 0,
            chords: Vec::new(),
        }
    }
}

impl Staff {
    /// Stringed staves have a tuning and can show tablature.
    pub fn is_stringed(&self) -> bool {
        !self.tuning.is_empty()
    }
}

impl Bar {
    /// True when no voice contains a visible beat.
    pub fn is_empty(&self) -> bool {
        self.voices.iter().all(Voice::is_empty)
    }

    /// True when every non-empty beat of every voice is a rest.
    pub fn is_rest_only(&self) -> bool {
        self.voices
            .iter()
            .flat_map(|v| v.beats.iter())
            .filter(|b| !b.is_empty)
            .all(Beat::is_rest)
    }
}

impl Voice {
    pub fn is_empty(&self) -> bool {
        self.beats.iter().all(|b| b.is_empty)
    }
}

impl Default for Beat {
    fn default() -> Self {
        Self {
            duration: Duration::Quarter,
            dots: 0,
            tuplet_numerator: -1,
            tuplet_denominator: -1,
            grace_type: GraceType::None,
            is_empty: false,
            notes: Vec::new(),
            text: None,
            beam_mode: BeamMode::Auto,
            invert_beam_direction: false,
            whammy_bar_points: Vec::new(),
        }
    }
}

impl Beat {
    /// A beat holding the given notes.
    pub fn new(duration: Duration, notes: Vec<Note>) -> Self {
        Self {
            duration,
            notes,
            ..Self::default()
        }
    }

    /// A rest of the given duration.
    pub fn rest(duration: Duration) -> Self {
        Self::new(duration, Vec::new())
    }

    pub fn with_tuplet(mut self, numerator: i32, denominator: i32) -> Self {
        self.tuplet_numerator = numerator;
        self.tuplet_denominator = denominator;
        self
    }

    pub fn with_dots(mut self, dots: u8) -> Self {
        self.dots = dots;
        self
    }

    pub fn is_rest(&self) -> bool {
        !self.is_empty && self.notes.is_empty()
    }

    pub fn is_grace(&self) -> bool {
        self.grace_type != GraceType::None
    }

    /// The tuplet ratio, or `None` for non-tupled beats. Degenerate ratios
    /// (zero or negative parts, parts above `MAX_TUPLET_PART`, 1:1) count
    /// as non-tupled.
    pub fn tuplet(&self) -> Option<(i32, i32)> {
        let (num, den) = (self.tuplet_numerator, self.tuplet_denominator);
        let parts = 1..=MAX_TUPLET_PART;
        if parts.contains(&num) && parts.contains(&den) && !(num == 1 && den == 1) {
            Some((num, den))
        } else {
            None
        }
    }

    pub fn has_tuplet(&self) -> bool {
        self.tuplet().is_some()
    }

    /// A tuplet ratio was supplied but cannot be honoured.
    pub fn has_malformed_tuplet(&self) -> bool {
        let unset = self.tuplet_numerator == -1 && self.tuplet_denominator == -1;
        let identity = self.tuplet_numerator == 1 && self.tuplet_denominator == 1;
        !unset && !identity && self.tuplet().is_none()
    }

    /// Notated length in ticks, including dots.
    pub fn written_ticks(&self) -> i32 {
        let base = self.duration.ticks();
        match self.dots {
            0 => base,
            1 => base + base / 2,
            _ => base + base / 2 + base / 4,
        }
    }

    /// Sounding length in ticks, including dots and tuplet scaling.
    pub fn playback_ticks(&self) -> i32 {
        let written = self.written_ticks();
        match self.tuplet() {
            Some((num, den)) => written * den / num,
            None => written,
        }
    }

    pub fn has_whammy_bar(&self) -> bool {
        !self.whammy_bar_points.is_empty()
    }
}

impl Default for Note {
    fn default() -> Self {
        Self {
            pitch: 60,
            string: 0,
            fret: 0,
            is_dead: false,
            is_ghost: false,
            is_tie_destination: false,
            harmonic_type: HarmonicType::None,
            accidental_mode: AccidentalMode::Default,
            bend_points: Vec::new(),
        }
    }
}

impl Note {
    pub fn new(pitch: i32) -> Self {
        Self {
            pitch,
            ..Self::default()
        }
    }

    /// A note placed on a string/fret of a stringed staff.
    pub fn fretted(pitch: i32, string: i32, fret: i32) -> Self {
        Self {
            pitch,
            string,
            fret,
            ..Self::default()
        }
    }

    pub fn is_harmonic(&self) -> bool {
        self.harmonic_type != HarmonicType::None
    }

    pub fn has_bend(&self) -> bool {
        !self.bend_points.is_empty()
    }
}

impl Duration {
    /// The classic numeric value: 1 = whole, 4 = quarter, negative for
    /// multi-whole durations.
    pub fn value(self) -> i32 {
        match self {
            Duration::QuadrupleWhole => -4,
            Duration::DoubleWhole => -2,
            Duration::Whole => 1,
            Duration::Half => 2,
            Duration::Quarter => 4,
            Duration::Eighth => 8,
            Duration::Sixteenth => 16,
            Duration::ThirtySecond => 32,
            Duration::SixtyFourth => 64,
            Duration::OneHundredTwentyEighth => 128,
            Duration::TwoHundredFiftySixth => 256,
        }
    }

    pub fn ticks(self) -> i32 {
        let value = self.value();
        if value < 0 {
            QUARTER_TICKS * 4 * -value
        } else {
            QUARTER_TICKS * 4 / value
        }
    }

    /// log2 of the value; 0 for whole notes and longer.
    pub fn index(self) -> i32 {
        let value = self.value();
        if value <= 0 {
            return 0;
        }
        value.trailing_zeros() as i32
    }

    /// Number of beams (or flags) this duration carries.
    pub fn beam_count(self) -> usize {
        (self.index() - 2).max(0) as usize
    }

    /// Only durations shorter than a quarter can be joined by a beam.
    pub fn is_beamable(self) -> bool {
        self.beam_count() > 0
    }
}

impl BendPoint {
    pub fn new(offset: i32, value: i32) -> Self {
        Self { offset, value }
    }
}
