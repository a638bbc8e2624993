//! Tuplet grouping: consecutive beats of one voice sharing a tuplet ratio.

use crate::model::{Beat, Duration};

const STANDARD_DURATIONS: [Duration; 11] = [
    Duration::QuadrupleWhole,
    Duration::DoubleWhole,
    Duration::Whole,
    Duration::Half,
    Duration::Quarter,
    Duration::Eighth,
    Duration::Sixteenth,
    Duration::ThirtySecond,
    Duration::SixtyFourth,
    Duration::OneHundredTwentyEighth,
    Duration::TwoHundredFiftySixth,
];

#[derive(Debug, Clone, PartialEq)]
pub struct TupletGroup {
    pub voice: usize,
    pub numerator: i32,
    pub denominator: i32,
    /// Indices of the member beats inside the voice
    pub beats: Vec<usize>,
    /// The group covers a complete tuplet unit.
    pub is_full: bool,
    equal_length: bool,
    first_ticks: i32,
    total_ticks: i32,
    closed: bool,
}

impl TupletGroup {
    pub fn new(voice: usize) -> Self {
        Self {
            voice,
            numerator: -1,
            denominator: -1,
            beats: Vec::new(),
            is_full: false,
            equal_length: true,
            first_ticks: 0,
            total_ticks: 0,
            closed: false,
        }
    }

    /// Try to add a beat. Returns false when the beat has to start a new
    /// group.
    pub fn check(&mut self, beat_index: usize, beat: &Beat) -> bool {
        let Some((numerator, denominator)) = beat.tuplet() else {
            return false;
        };

        if self.beats.is_empty() {
            self.numerator = numerator;
            self.denominator = denominator;
            self.first_ticks = beat.written_ticks();
        } else if self.closed
            || self.is_full
            || numerator != self.numerator
            || denominator != self.denominator
        {
            return false;
        } else if beat.is_grace() {
            // grace beats neither break nor fill an open group
            return true;
        }

        let ticks = beat.written_ticks();
        if ticks != self.first_ticks {
            self.equal_length = false;
        }
        self.beats.push(beat_index);
        self.total_ticks = self.total_ticks.saturating_add(ticks);

        self.is_full = if self.equal_length {
            self.beats.len() as i32 == self.numerator
        } else {
            STANDARD_DURATIONS
                .iter()
                .any(|d| self.total_ticks == d.ticks() * self.numerator)
        };
        true
    }

    /// No further beats may join, e.g. after a non-tupled beat.
    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn label(&self) -> String {
        tuplet_label(self.numerator, self.denominator)
    }
}

/// Text printed on a tuplet bracket. Common ratios print the numerator only.
pub fn tuplet_label(numerator: i32, denominator: i32) -> String {
    match (numerator, denominator) {
        (2, 3) | (3, 2) | (4, 6) | (5, 4) | (6, 4) | (7, 4) | (9, 8) | (10, 8) | (11, 8)
        | (12, 8) | (13, 8) => numerator.to_string(),
        _ => format!("{numerator}:{denominator}"),
    }
}
