//! Pitch to staff-line resolution and accidental bookkeeping for one bar.
//!
//! Lines are counted in steps from the top staff line downwards: 0 is the
//! top line, 8 the bottom line of a five-line staff, odd steps are spaces.

use std::collections::HashSet;

use crate::model::{AccidentalMode, Bar, Clef, MasterBar, Note, Ottavia, Staff};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccidentalType {
    #[default]
    None,
    Natural,
    Sharp,
    Flat,
}

/// Staff step of the C in octave -1 for each clef.
fn octave_steps(clef: Clef) -> i32 {
    match clef {
        Clef::Neutral => 38,
        Clef::C3 => 32,
        Clef::C4 => 30,
        Clef::F4 => 26,
        Clef::G2 => 38,
    }
}

/// Diatonic step of each pitch class when black keys are spelled as sharps.
const SHARP_NOTE_STEPS: [i32; 12] = [0, 0, 1, 1, 2, 3, 3, 4, 4, 5, 5, 6];
/// Diatonic step of each pitch class when black keys are spelled as flats.
const FLAT_NOTE_STEPS: [i32; 12] = [0, 1, 1, 2, 2, 3, 4, 4, 5, 5, 6, 6];
/// Pitch classes on black keys.
const ACCIDENTAL_NOTES: [bool; 12] = [
    false, true, false, true, false, false, true, false, true, false, true, false,
];

/// Pitch classes on the staff line of each added sharp, in key signature
/// order: the natural note and its sharp.
const SHARP_KEY_LINES: [[usize; 2]; 7] = [[5, 6], [0, 1], [7, 8], [2, 3], [9, 10], [4, 5], [11, 0]];
/// Pitch classes on the staff line of each added flat: the flat and its
/// natural note.
const FLAT_KEY_LINES: [[usize; 2]; 7] = [[10, 11], [3, 4], [8, 9], [1, 2], [6, 7], [11, 0], [4, 5]];

/// Steps of the key signature accidentals on a treble staff.
const SHARP_KS_STEPS: [i32; 7] = [0, 3, -1, 2, 5, 1, 4];
const FLAT_KS_STEPS: [i32; 7] = [4, 1, 5, 2, 6, 3, 7];

/// Fixed lines of common drum keys, with whether they use an x head.
fn percussion_line(key: i32) -> (i32, bool) {
    match key {
        35 | 36 => (7, false),
        38 | 40 => (3, false),
        37 | 39 => (3, true),
        42 | 44 | 46 => (-1, true),
        49 | 52 | 55 | 57 => (-2, true),
        51 | 53 | 59 => (0, true),
        48 | 50 => (1, false),
        45 | 47 => (2, false),
        41 | 43 => (5, false),
        _ => (4, false),
    }
}

/// Whether the key signature `key` places an accidental on the staff line
/// of the pitch class `index`.
fn key_alters(key: i32, index: usize) -> bool {
    let count = key.unsigned_abs().min(7) as usize;
    let lines = if key > 0 {
        &SHARP_KEY_LINES[..count]
    } else {
        &FLAT_KEY_LINES[..count]
    };
    lines.iter().any(|pair| pair.contains(&index))
}

fn ottava_shift(ottava: Ottavia) -> i32 {
    match ottava {
        Ottavia::Quindicesima => -24,
        Ottavia::Ottava => -12,
        Ottavia::Regular => 0,
        Ottavia::OttavaBassa => 12,
        Ottavia::QuindicesimaBassa => 24,
    }
}

/// Staff step of a display pitch for a clef, spelling black keys as sharps
/// or flats.
pub fn steps_for_value(value: i32, clef: Clef, use_flats: bool) -> i32 {
    let octave = value.div_euclid(12) - 1;
    let index = value.rem_euclid(12) as usize;
    let step = if use_flats {
        FLAT_NOTE_STEPS[index]
    } else {
        SHARP_NOTE_STEPS[index]
    };
    octave_steps(clef) - octave * 7 - step
}

/// Where a note ended up and what accidental it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedAccidental {
    pub line: i32,
    pub accidental: AccidentalType,
    /// Percussion notes using a cross head
    pub x_head: bool,
}

/// The highest or lowest note of a bar and the beat owning it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteExtreme {
    pub value: i32,
    pub line: i32,
    pub voice: usize,
    pub beat: usize,
}

#[derive(Debug, Clone)]
pub struct AccidentalHelper {
    clef: Clef,
    key_signature: i32,
    transposition: i32,
    percussion: bool,
    registered: HashSet<i32>,
    /// Highest note on the staff (smallest line)
    pub max_note: Option<NoteExtreme>,
    /// Lowest note on the staff (largest line)
    pub min_note: Option<NoteExtreme>,
}

impl AccidentalHelper {
    pub fn new(bar: &Bar, master_bar: &MasterBar, staff: &Staff) -> Self {
        Self {
            clef: bar.clef,
            key_signature: master_bar.key_signature.clamp(-7, 7),
            transposition: staff.display_transposition_pitch + ottava_shift(bar.clef_ottava),
            percussion: staff.is_percussion,
            registered: HashSet::new(),
            max_note: None,
            min_note: None,
        }
    }

    /// Pitch as it is displayed on this staff.
    pub fn display_value(&self, note: &Note) -> i32 {
        note.pitch + self.transposition
    }

    /// Line of a display value using the spelling of the key signature.
    pub fn line_for_value(&self, value: i32) -> i32 {
        steps_for_value(value, self.clef, self.key_signature < 0)
    }

    /// Line of a note without touching the accidental state.
    pub fn note_line(&self, note: &Note) -> i32 {
        if self.percussion {
            percussion_line(note.pitch).0
        } else {
            self.line_for_value(self.display_value(note))
        }
    }

    /// Resolve the line and accidental of the next note in reading order.
    /// Must be called once per note, in order, as the result depends on
    /// the accidentals already shown in the bar.
    pub fn apply_accidental(&mut self, note: &Note, voice: usize, beat: usize) -> AppliedAccidental {
        if self.percussion {
            let (line, x_head) = percussion_line(note.pitch);
            self.track_extremes(note.pitch, line, voice, beat);
            return AppliedAccidental {
                line,
                accidental: AccidentalType::None,
                x_head,
            };
        }

        let value = self.display_value(note);
        let index = value.rem_euclid(12) as usize;
        let use_flats = match note.accidental_mode {
            AccidentalMode::ForceFlat => true,
            AccidentalMode::ForceSharp => false,
            _ => self.key_signature < 0,
        };
        let line = steps_for_value(value, self.clef, use_flats);
        self.track_extremes(value, line, voice, beat);

        let is_accidental_note = ACCIDENTAL_NOTES[index];
        let altered_by_key = key_alters(self.key_signature, index);
        let spelled = if is_accidental_note {
            if use_flats {
                AccidentalType::Flat
            } else {
                AccidentalType::Sharp
            }
        } else {
            AccidentalType::Natural
        };

        let accidental = match note.accidental_mode {
            AccidentalMode::ForceNone => AccidentalType::None,
            AccidentalMode::ForceNatural => {
                self.registered.insert(line);
                AccidentalType::Natural
            }
            AccidentalMode::ForceSharp => {
                self.registered.insert(line);
                AccidentalType::Sharp
            }
            AccidentalMode::ForceFlat => {
                self.registered.insert(line);
                AccidentalType::Flat
            }
            AccidentalMode::Default | AccidentalMode::Courtesy => {
                let registered = self.registered.contains(&line);
                let decided = if is_accidental_note != altered_by_key && !registered {
                    self.registered.insert(line);
                    spelled
                } else if is_accidental_note == altered_by_key && registered {
                    self.registered.remove(&line);
                    spelled
                } else {
                    AccidentalType::None
                };
                if decided == AccidentalType::None
                    && note.accidental_mode == AccidentalMode::Courtesy
                {
                    spelled
                } else {
                    decided
                }
            }
        };

        AppliedAccidental {
            line,
            accidental,
            x_head: false,
        }
    }

    fn track_extremes(&mut self, value: i32, line: i32, voice: usize, beat: usize) {
        let extreme = NoteExtreme {
            value,
            line,
            voice,
            beat,
        };
        if self.max_note.map_or(true, |m| line < m.line) {
            self.max_note = Some(extreme);
        }
        if self.min_note.map_or(true, |m| line > m.line) {
            self.min_note = Some(extreme);
        }
    }
}

/// Number of naturals needed when the key changes from `old` to `new`.
pub fn cancellation_natural_count(old: i32, new: i32) -> u32 {
    if old == 0 {
        return 0;
    }
    let same_direction = (old > 0 && new > 0) || (old < 0 && new < 0);
    if same_direction {
        old.unsigned_abs().saturating_sub(new.unsigned_abs())
    } else {
        old.unsigned_abs()
    }
}

fn key_signature_clef_offset(clef: Clef) -> i32 {
    match clef {
        Clef::Neutral | Clef::G2 => 0,
        Clef::F4 => 2,
        Clef::C3 => 1,
        Clef::C4 => -1,
    }
}

/// The accidentals of a key signature as (accidental, step) pairs: naturals
/// cancelling the previous key first, then the sharps or flats of `key`.
pub fn key_signature_accidentals(
    key: i32,
    previous: Option<i32>,
    clef: Clef,
) -> Vec<(AccidentalType, i32)> {
    let key = key.clamp(-7, 7);
    let offset = key_signature_clef_offset(clef);
    let mut result = Vec::new();

    if let Some(old) = previous.map(|k| k.clamp(-7, 7)) {
        let naturals = cancellation_natural_count(old, key) as usize;
        let old_count = old.unsigned_abs() as usize;
        let steps = if old > 0 { &SHARP_KS_STEPS } else { &FLAT_KS_STEPS };
        for step in &steps[old_count - naturals..old_count] {
            result.push((AccidentalType::Natural, step + offset));
        }
    }

    let count = key.unsigned_abs() as usize;
    if key > 0 {
        for step in &SHARP_KS_STEPS[..count] {
            result.push((AccidentalType::Sharp, step + offset));
        }
    } else {
        for step in &FLAT_KS_STEPS[..count] {
            result.push((AccidentalType::Flat, step + offset));
        }
    }
    result
}
