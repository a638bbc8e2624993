//! Beam grouping, stem direction and beam geometry.
//!
//! Every beat of a voice belongs to exactly one `BeamingHelper`. Helpers of
//! a single beat draw a flag (or nothing); helpers of two or more beats
//! draw a beam.

use crate::error::LayoutError;
use crate::model::{Bar, BeamMode, Beat, Duration, MasterBar, QUARTER_TICKS};
use crate::renderer::beat_map::beat_start_times;
use crate::renderer::tuplets::TupletGroup;
use crate::renderer::BarId;

/// Staff step of the middle line.
const MIDDLE_LINE: i32 = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BeamDirection {
    #[default]
    Up,
    Down,
}

impl BeamDirection {
    pub fn inverted(self) -> Self {
        match self {
            BeamDirection::Up => BeamDirection::Down,
            BeamDirection::Down => BeamDirection::Up,
        }
    }
}

/// Geometry a renderer kind provides for beam calculations.
pub trait BeamYCalculator {
    /// Renderer-relative y of a staff step.
    fn line_y(&self, line: i32) -> f64;
    /// Stem length of the helper's beats.
    fn stem_size(&self, helper: &BeamingHelper) -> f64;
    /// Largest allowed difference between the two beam ends.
    fn max_beam_rise(&self) -> f64;
}

/// One beat as seen by its beaming helper.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamedBeat {
    pub index: usize,
    pub duration: Duration,
    pub has_notes: bool,
    /// Topmost and bottommost note line
    lines: Option<(i32, i32)>,
    note_lines: Vec<i32>,
    /// Stem x for an up and a down stem, renderer-relative
    line_x: (f64, f64),
}

impl BeamedBeat {
    pub fn top_line(&self) -> Option<i32> {
        self.lines.map(|(top, _)| top)
    }

    pub fn bottom_line(&self) -> Option<i32> {
        self.lines.map(|(_, bottom)| bottom)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeamingHelper {
    pub voice: usize,
    pub beats: Vec<BeamedBeat>,
    pub shortest_duration: Duration,
    pub is_grace: bool,
    pub has_tuplet: bool,
    pub invert_direction: bool,
    pub direction: BeamDirection,
    /// Start time and tuplet group of the last added beat
    last: Option<(i32, Option<usize>)>,
    last_mode: BeamMode,
    last_grace: bool,
    division_length: i32,
}

impl BeamingHelper {
    fn new(voice: usize, master_bar: &MasterBar) -> Self {
        let mut division_length = QUARTER_TICKS;
        if master_bar.time_signature_denominator == 8
            && master_bar.time_signature_numerator % 3 == 0
        {
            division_length += QUARTER_TICKS / 2;
        }
        Self {
            voice,
            beats: Vec::new(),
            shortest_duration: Duration::QuadrupleWhole,
            is_grace: false,
            has_tuplet: false,
            invert_direction: false,
            direction: BeamDirection::Up,
            last: None,
            last_mode: BeamMode::Auto,
            last_grace: false,
            division_length,
        }
    }

    /// Whether `beat` may follow the last beat of this helper under one
    /// beam.
    fn can_join(&self, beat: &Beat, start: i32, tuplet: Option<usize>) -> bool {
        let Some((last_start, last_tuplet)) = self.last else {
            return true;
        };
        let last = match self.beats.last() {
            Some(b) => b,
            None => return true,
        };
        if !last.has_notes || beat.is_rest() || beat.is_empty || self.last_grace != beat.is_grace()
        {
            return false;
        }
        if self.last_grace && beat.is_grace() {
            return true;
        }
        match self.last_mode {
            BeamMode::ForceSplitToNext => return false,
            BeamMode::ForceMergeWithNext => return true,
            BeamMode::Auto => {}
        }
        if !last.duration.is_beamable() || !beat.duration.is_beamable() {
            return last_start == start;
        }
        if last_tuplet != tuplet {
            return false;
        }
        let division = |s: i32| (self.division_length + s) / self.division_length;
        division(last_start) == division(start)
    }

    fn add(&mut self, index: usize, beat: &Beat, start: i32, tuplet: Option<usize>) {
        if beat.invert_beam_direction {
            self.invert_direction = true;
        }
        if beat.is_grace() {
            self.is_grace = true;
        }
        if beat.has_tuplet() {
            self.has_tuplet = true;
        }
        if beat.duration > self.shortest_duration {
            self.shortest_duration = beat.duration;
        }
        self.beats.push(BeamedBeat {
            index,
            duration: beat.duration,
            has_notes: !beat.notes.is_empty() && !beat.is_empty,
            lines: None,
            note_lines: Vec::new(),
            line_x: (0.0, 0.0),
        });
        self.last = Some((start, tuplet));
        self.last_mode = beat.beam_mode;
        self.last_grace = beat.is_grace();
    }

    /// Two or more beats joined by a beam.
    pub fn is_beamed(&self) -> bool {
        self.beats.len() > 1
    }

    /// The helper draws a stem.
    pub fn has_line(&self) -> bool {
        self.beats.iter().any(|b| b.has_notes) && self.shortest_duration.value() > 1
    }

    /// The helper draws a flag instead of a beam.
    pub fn has_flag(&self) -> bool {
        self.beats.len() == 1 && self.has_line() && self.shortest_duration.is_beamable()
    }

    pub fn position_of(&self, beat_index: usize) -> Option<usize> {
        self.beats.iter().position(|b| b.index == beat_index)
    }

    fn register_note_line(&mut self, beat_index: usize, line: i32) {
        if let Some(beat) = self.beats.iter_mut().find(|b| b.index == beat_index) {
            beat.note_lines.push(line);
            beat.lines = Some(match beat.lines {
                Some((top, bottom)) => (top.min(line), bottom.max(line)),
                None => (line, line),
            });
        }
    }

    fn register_line_x(&mut self, beat_index: usize, up: f64, down: f64) {
        if let Some(beat) = self.beats.iter_mut().find(|b| b.index == beat_index) {
            beat.line_x = (up, down);
        }
    }

    /// Stem x of the beat at `position` for the resolved direction.
    pub fn beat_line_x(&self, position: usize) -> f64 {
        let (up, down) = self.beats[position].line_x;
        match self.direction {
            BeamDirection::Up => up,
            BeamDirection::Down => down,
        }
    }

    /// Topmost note line of the whole helper.
    pub fn top_line(&self) -> Option<i32> {
        self.beats.iter().filter_map(BeamedBeat::top_line).min()
    }

    /// Bottommost note line of the whole helper.
    pub fn bottom_line(&self) -> Option<i32> {
        self.beats.iter().filter_map(BeamedBeat::bottom_line).max()
    }

    /// Direction from note positions: the majority side of the middle
    /// line wins, then the previous helper, then the farther extreme.
    fn direction_from_notes(&self, previous: Option<BeamDirection>) -> BeamDirection {
        let lines = self.beats.iter().flat_map(|b| b.note_lines.iter().copied());
        let (mut above, mut below) = (0, 0);
        for line in lines {
            if line < MIDDLE_LINE {
                above += 1;
            } else if line > MIDDLE_LINE {
                below += 1;
            }
        }
        if above > below {
            return BeamDirection::Down;
        }
        if below > above {
            return BeamDirection::Up;
        }
        if let Some(previous) = previous {
            return previous;
        }
        let (Some(top), Some(bottom)) = (self.top_line(), self.bottom_line()) else {
            return BeamDirection::Up;
        };
        if MIDDLE_LINE - top > bottom - MIDDLE_LINE {
            BeamDirection::Down
        } else {
            BeamDirection::Up
        }
    }

    fn stem_tip(&self, calc: &dyn BeamYCalculator, beat: &BeamedBeat, stem: f64) -> f64 {
        match self.direction {
            BeamDirection::Up => beat.top_line().map_or(0.0, |l| calc.line_y(l)) - stem,
            BeamDirection::Down => beat.bottom_line().map_or(0.0, |l| calc.line_y(l)) + stem,
        }
    }

    /// The two beam ends as (start y, end y) after slope limiting.
    pub fn beam_ends(&self, calc: &dyn BeamYCalculator) -> (f64, f64) {
        let stem = calc.stem_size(self);
        let with_notes: Vec<&BeamedBeat> = self.beats.iter().filter(|b| b.has_notes).collect();
        let (Some(first), Some(last)) = (with_notes.first(), with_notes.last()) else {
            return (0.0, 0.0);
        };
        if with_notes.len() == 1 {
            let y = self.stem_tip(calc, first, stem);
            return (y, y);
        }

        // an extreme note on an inner beat makes the beam horizontal
        let inner = &with_notes[1..with_notes.len() - 1];
        match self.direction {
            BeamDirection::Up => {
                let ends = first.top_line().min(last.top_line());
                let inner_top = inner.iter().filter_map(|b| b.top_line()).min();
                if let (Some(i), Some(e)) = (inner_top, ends) {
                    if i < e {
                        let y = calc.line_y(i) - stem;
                        return (y, y);
                    }
                }
            }
            BeamDirection::Down => {
                let ends = first.bottom_line().max(last.bottom_line());
                let inner_bottom = inner.iter().filter_map(|b| b.bottom_line()).max();
                if let (Some(i), Some(e)) = (inner_bottom, ends) {
                    if i > e {
                        let y = calc.line_y(i) + stem;
                        return (y, y);
                    }
                }
            }
        }

        let mut start = self.stem_tip(calc, first, stem);
        let mut end = self.stem_tip(calc, last, stem);
        let max = calc.max_beam_rise();
        // only ever lengthen stems
        match self.direction {
            BeamDirection::Down => {
                if start > end && start - end > max {
                    end = start - max;
                }
                if end > start && end - start > max {
                    start = end - max;
                }
            }
            BeamDirection::Up => {
                if start < end && end - start > max {
                    end = start + max;
                }
                if end < start && start - end > max {
                    start = end + max;
                }
            }
        }
        (start, end)
    }

    /// y of the beam at `x`, on the straight line between both ends.
    pub fn calculate_beam_y(&self, calc: &dyn BeamYCalculator, x: f64) -> f64 {
        let (start, end) = self.beam_ends(calc);
        let positions: Vec<usize> = self
            .beats
            .iter()
            .enumerate()
            .filter(|(_, b)| b.has_notes)
            .map(|(i, _)| i)
            .collect();
        let (Some(&first), Some(&last)) = (positions.first(), positions.last()) else {
            return start;
        };
        let x1 = self.beat_line_x(first);
        let x2 = self.beat_line_x(last);
        if (x2 - x1).abs() < f64::EPSILON {
            return start;
        }
        start + (end - start) * (x - x1) / (x2 - x1)
    }
}

/// Bar count of a duration used for secondary beams: 8th = 1, 16th = 2.
fn bar_count(duration: Duration) -> i32 {
    duration.index() - 2
}

/// Whether beats `a` and `b` are joined by a full bar at level `level`
/// (0 = primary beam).
pub fn is_full_bar_join(a: Duration, b: Duration, level: i32) -> bool {
    bar_count(a) - level > 0 && bar_count(b) - level > 0
}

/// Beaming helpers and tuplet groups of every voice of one bar.
#[derive(Debug, Clone, Default)]
pub struct BarHelpers {
    pub beam_helpers: Vec<Vec<BeamingHelper>>,
    pub tuplet_groups: Vec<Vec<TupletGroup>>,
    /// voice -> beat -> index into `beam_helpers[voice]`
    lookup: Vec<Vec<Option<usize>>>,
}

impl BarHelpers {
    pub fn new(bar: &Bar, master_bar: &MasterBar) -> Self {
        let mut helpers = BarHelpers::default();
        for (v, voice) in bar.voices.iter().enumerate() {
            let times = beat_start_times(voice);

            let mut groups: Vec<TupletGroup> = Vec::new();
            let mut tuplet_of = vec![None; voice.beats.len()];
            for (i, beat) in voice.beats.iter().enumerate() {
                if beat.has_malformed_tuplet() {
                    log::warn!(
                        "Ignoring tuplet {}:{} on beat {} of voice {}",
                        beat.tuplet_numerator,
                        beat.tuplet_denominator,
                        i,
                        v
                    );
                }
                if beat.has_tuplet() {
                    let joined = groups.last_mut().is_some_and(|g| g.check(i, beat));
                    if joined {
                        tuplet_of[i] = Some(groups.len() - 1);
                    } else if !beat.is_grace() {
                        // grace beats never open a group
                        let mut group = TupletGroup::new(v);
                        group.check(i, beat);
                        groups.push(group);
                        tuplet_of[i] = Some(groups.len() - 1);
                    }
                } else if let Some(group) = groups.last_mut() {
                    group.close();
                }
            }

            let mut voice_helpers: Vec<BeamingHelper> = Vec::new();
            let mut lookup = vec![None; voice.beats.len()];
            let mut current: Option<BeamingHelper> = None;
            for (i, beat) in voice.beats.iter().enumerate() {
                let start = times[i].tick;
                let joins = current
                    .as_ref()
                    .is_some_and(|h| h.can_join(beat, start, tuplet_of[i]));
                if !joins {
                    if let Some(done) = current.take() {
                        voice_helpers.push(done);
                    }
                    current = Some(BeamingHelper::new(v, master_bar));
                }
                if let Some(helper) = current.as_mut() {
                    helper.add(i, beat, start, tuplet_of[i]);
                }
                lookup[i] = Some(voice_helpers.len());
            }
            if let Some(done) = current.take() {
                voice_helpers.push(done);
            }

            helpers.beam_helpers.push(voice_helpers);
            helpers.tuplet_groups.push(groups);
            helpers.lookup.push(lookup);
        }
        helpers
    }

    pub fn helper_index(&self, voice: usize, beat: usize) -> Option<usize> {
        self.lookup.get(voice)?.get(beat).copied().flatten()
    }

    pub fn helper_for_beat(&self, voice: usize, beat: usize) -> Option<&BeamingHelper> {
        let index = self.helper_index(voice, beat)?;
        self.beam_helpers.get(voice)?.get(index)
    }

    fn helper_for_beat_mut(&mut self, voice: usize, beat: usize) -> Option<&mut BeamingHelper> {
        let index = self.helper_index(voice, beat)?;
        self.beam_helpers.get_mut(voice)?.get_mut(index)
    }

    /// Record the staff step of one note of a beat.
    pub fn register_note_line(&mut self, voice: usize, beat: usize, line: i32) {
        if let Some(helper) = self.helper_for_beat_mut(voice, beat) {
            helper.register_note_line(beat, line);
        }
    }

    /// Record where the stem of a beat goes for both directions.
    pub fn register_beat_line_x(&mut self, voice: usize, beat: usize, up: f64, down: f64) {
        if let Some(helper) = self.helper_for_beat_mut(voice, beat) {
            helper.register_line_x(beat, up, down);
        }
    }

    /// Resolve the stem direction of every helper. `forced` is a direction
    /// imposed by the renderer kind.
    pub fn finish(&mut self, forced: Option<BeamDirection>) {
        let multi_voice = self
            .beam_helpers
            .iter()
            .filter(|helpers| helpers.iter().any(|h| h.beats.iter().any(|b| b.has_notes)))
            .count()
            > 1;
        for (v, helpers) in self.beam_helpers.iter_mut().enumerate() {
            let mut previous: Option<BeamDirection> = None;
            for helper in helpers.iter_mut() {
                helper.direction = if let Some(direction) = forced {
                    direction
                } else {
                    let natural = if multi_voice {
                        if v == 0 {
                            BeamDirection::Up
                        } else {
                            BeamDirection::Down
                        }
                    } else if helper.is_grace {
                        BeamDirection::Up
                    } else {
                        helper.direction_from_notes(previous)
                    };
                    if helper.invert_direction {
                        natural.inverted()
                    } else {
                        natural
                    }
                };
                if helper.beats.iter().any(|b| b.has_notes) {
                    previous = Some(helper.direction);
                }
            }
        }
    }

    /// Every beat of the bar must belong to a helper.
    pub fn validate(&self, id: BarId, bar: &Bar) -> Result<(), LayoutError> {
        for (voice, v) in bar.voices.iter().enumerate() {
            for beat in 0..v.beats.len() {
                if self.helper_for_beat(voice, beat).is_none() {
                    return Err(LayoutError::MissingBeamingHelper { bar: id, voice, beat });
                }
            }
        }
        Ok(())
    }

    /// Helpers joining two or more beats, over all voices.
    pub fn beam_groups(&self) -> impl Iterator<Item = &BeamingHelper> {
        self.beam_helpers.iter().flatten().filter(|h| h.is_beamed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GraceType, Note, Voice};
    use pretty_assertions::assert_eq;

    fn note(duration: Duration, pitch: i32) -> Beat {
        Beat::new(duration, vec![Note::new(pitch)])
    }

    fn bar_of(beats: Vec<Beat>) -> Bar {
        Bar {
            voices: vec![Voice { beats }],
            ..Bar::default()
        }
    }

    fn groups(bar: &Bar, master: &MasterBar) -> Vec<Vec<usize>> {
        BarHelpers::new(bar, master).beam_helpers[0]
            .iter()
            .map(|h| h.beats.iter().map(|b| b.index).collect())
            .collect()
    }

    struct Lines;

    impl BeamYCalculator for Lines {
        fn line_y(&self, line: i32) -> f64 {
            line as f64 * 4.5
        }
        fn stem_size(&self, _helper: &BeamingHelper) -> f64 {
            31.5
        }
        fn max_beam_rise(&self) -> f64 {
            10.0
        }
    }

    #[test]
    fn quarters_are_never_beamed() {
        let bar = bar_of(vec![note(Duration::Quarter, 60); 4]);
        let master = MasterBar::default();
        assert_eq!(groups(&bar, &master), vec![vec![0], vec![1], vec![2], vec![3]]);
        assert_eq!(BarHelpers::new(&bar, &master).beam_groups().count(), 0);
    }

    #[test]
    fn eighths_beam_within_a_quarter() {
        let bar = bar_of(vec![
            note(Duration::Eighth, 60),
            note(Duration::Eighth, 62),
            note(Duration::Quarter, 64),
        ]);
        assert_eq!(
            groups(&bar, &MasterBar::default()),
            vec![vec![0, 1], vec![2]]
        );
    }

    #[test]
    fn rests_and_divisions_break_beams() {
        let bar = bar_of(vec![
            note(Duration::Eighth, 60),
            note(Duration::Eighth, 60),
            note(Duration::Eighth, 60),
            Beat::rest(Duration::Eighth),
            note(Duration::Eighth, 60),
        ]);
        assert_eq!(
            groups(&bar, &MasterBar::default()),
            vec![vec![0, 1], vec![2], vec![3], vec![4]]
        );
    }

    #[test]
    fn compound_meter_uses_dotted_quarter_division() {
        let master = MasterBar {
            time_signature_numerator: 6,
            time_signature_denominator: 8,
            ..MasterBar::default()
        };
        let bar = bar_of(vec![note(Duration::Eighth, 60); 6]);
        assert_eq!(groups(&bar, &master), vec![vec![0, 1, 2], vec![3, 4, 5]]);
    }

    #[test]
    fn beam_modes_override_divisions() {
        let mut beats = vec![note(Duration::Eighth, 60); 4];
        beats[0].beam_mode = BeamMode::ForceSplitToNext;
        beats[1].beam_mode = BeamMode::ForceMergeWithNext;
        let bar = bar_of(beats);
        assert_eq!(
            groups(&bar, &MasterBar::default()),
            vec![vec![0], vec![1, 2, 3]]
        );
    }

    #[test]
    fn tuplet_groups_do_not_share_beams() {
        let triplet = note(Duration::Eighth, 60).with_tuplet(3, 2);
        let bar = bar_of(vec![triplet.clone(), triplet.clone(), triplet.clone(), triplet]);
        let helpers = BarHelpers::new(&bar, &MasterBar::default());
        assert_eq!(helpers.tuplet_groups[0].len(), 2);
        assert_eq!(groups(&bar, &MasterBar::default()), vec![vec![0, 1, 2], vec![3]]);
    }

    #[test]
    fn tupled_grace_after_a_full_group_stays_outside() {
        let triplet = note(Duration::Eighth, 60).with_tuplet(3, 2);
        let mut grace = note(Duration::Sixteenth, 62).with_tuplet(3, 2);
        grace.grace_type = GraceType::BeforeBeat;
        let bar = bar_of(vec![
            triplet.clone(),
            triplet.clone(),
            triplet,
            grace,
            note(Duration::Half, 60),
        ]);
        let helpers = BarHelpers::new(&bar, &MasterBar::default());
        let tuplets: Vec<Vec<usize>> = helpers.tuplet_groups[0]
            .iter()
            .map(|g| g.beats.clone())
            .collect();
        assert_eq!(tuplets, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn grace_beats_join_each_other_only() {
        let mut grace = note(Duration::Sixteenth, 62);
        grace.grace_type = GraceType::BeforeBeat;
        let bar = bar_of(vec![grace.clone(), grace, note(Duration::Eighth, 60)]);
        assert_eq!(
            groups(&bar, &MasterBar::default()),
            vec![vec![0, 1], vec![2]]
        );
    }

    #[test]
    fn direction_by_majority_then_previous() {
        let bar = bar_of(vec![
            note(Duration::Eighth, 0),
            note(Duration::Eighth, 0),
            note(Duration::Eighth, 0),
            note(Duration::Eighth, 0),
        ]);
        let mut helpers = BarHelpers::new(&bar, &MasterBar::default());
        // first group above the middle line
        helpers.register_note_line(0, 0, 1);
        helpers.register_note_line(0, 1, 2);
        // second group balanced around it
        helpers.register_note_line(0, 2, 2);
        helpers.register_note_line(0, 3, 6);
        helpers.finish(None);
        assert_eq!(helpers.beam_helpers[0][0].direction, BeamDirection::Down);
        assert_eq!(helpers.beam_helpers[0][1].direction, BeamDirection::Down);
    }

    #[test]
    fn direction_tie_without_previous_uses_extremes() {
        let bar = bar_of(vec![note(Duration::Eighth, 0), note(Duration::Eighth, 0)]);
        let mut helpers = BarHelpers::new(&bar, &MasterBar::default());
        helpers.register_note_line(0, 0, 3);
        helpers.register_note_line(0, 1, 8);
        helpers.finish(None);
        assert_eq!(helpers.beam_helpers[0][0].direction, BeamDirection::Up);

        let mut forced = BarHelpers::new(&bar, &MasterBar::default());
        forced.register_note_line(0, 0, 9);
        forced.register_note_line(0, 1, 9);
        forced.finish(Some(BeamDirection::Down));
        assert_eq!(forced.beam_helpers[0][0].direction, BeamDirection::Down);
    }

    #[test]
    fn inner_extreme_makes_beam_horizontal() {
        let bar = bar_of(vec![note(Duration::Sixteenth, 0); 3]);
        let mut helpers = BarHelpers::new(&bar, &MasterBar::default());
        helpers.register_note_line(0, 0, 6);
        helpers.register_note_line(0, 1, 3);
        helpers.register_note_line(0, 2, 7);
        helpers.finish(Some(BeamDirection::Up));
        let helper = &helpers.beam_helpers[0][0];
        let (start, end) = helper.beam_ends(&Lines);
        assert_eq!(start, end);
        assert_eq!(start, 3.0 * 4.5 - 31.5);
    }

    #[test]
    fn slope_is_limited_and_stems_only_grow() {
        let bar = bar_of(vec![note(Duration::Eighth, 0); 2]);
        let mut helpers = BarHelpers::new(&bar, &MasterBar::default());
        helpers.register_note_line(0, 0, 8);
        helpers.register_note_line(0, 1, 0);
        helpers.register_beat_line_x(0, 0, 10.0, 0.0);
        helpers.register_beat_line_x(0, 1, 40.0, 30.0);
        helpers.finish(Some(BeamDirection::Up));
        let helper = &helpers.beam_helpers[0][0];
        let (start, end) = helper.beam_ends(&Lines);
        assert_eq!(end, -31.5);
        assert_eq!(start, end + 10.0);
        assert_eq!(helper.calculate_beam_y(&Lines, 25.0), start - 5.0);
    }

    #[test]
    fn full_bar_joins() {
        assert!(is_full_bar_join(Duration::Eighth, Duration::Eighth, 0));
        assert!(!is_full_bar_join(Duration::Eighth, Duration::Sixteenth, 1));
        assert!(is_full_bar_join(Duration::Sixteenth, Duration::ThirtySecond, 1));
    }

    #[test]
    fn every_beat_has_a_helper() {
        let bar = bar_of(vec![
            note(Duration::Eighth, 60),
            Beat::rest(Duration::Quarter),
            note(Duration::Half, 60),
        ]);
        let helpers = BarHelpers::new(&bar, &MasterBar::default());
        let id = BarId {
            track: 0,
            staff: 0,
            index: 0,
        };
        assert!(helpers.validate(id, &bar).is_ok());
        assert!(helpers.validate(id, &bar_of(vec![note(Duration::Eighth, 60); 5])).is_err());
    }
}
