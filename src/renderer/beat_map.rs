//! Beat timing and the shared horizontal grid of a bar.
//!
//! Every staff of a system renders the same bar index with the same beat
//! positions, so the minimum widths of all staves are merged into one
//! `BarLayoutingInfo` before the beats are placed.

use std::collections::BTreeMap;

use crate::model::Voice;

/// Position of a beat inside its bar. Grace beats share the tick of the
/// beat they precede and sort before it through a negative offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BeatTime {
    pub tick: i32,
    pub grace_offset: i32,
}

impl BeatTime {
    pub fn new(tick: i32) -> Self {
        Self {
            tick,
            grace_offset: 0,
        }
    }
}

/// Start time of every beat of a voice, in beat order. Empty beats take no
/// time; grace beats take no time and are ordered before their principal.
pub fn beat_start_times(voice: &Voice) -> Vec<BeatTime> {
    let mut times = Vec::with_capacity(voice.beats.len());
    let mut current = 0;
    for beat in &voice.beats {
        times.push(BeatTime::new(current));
        if !beat.is_grace() && !beat.is_empty {
            current = current.saturating_add(beat.playback_ticks());
        }
    }

    let mut i = 0;
    while i < voice.beats.len() {
        if voice.beats[i].is_grace() {
            let start = i;
            while i < voice.beats.len() && voice.beats[i].is_grace() {
                i += 1;
            }
            let run = (i - start) as i32;
            for (k, time) in times[start..i].iter_mut().enumerate() {
                time.grace_offset = k as i32 - run;
            }
        } else {
            i += 1;
        }
    }
    times
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Spring {
    min_width: f64,
    duration: i32,
}

/// Minimum sizes of one bar index, merged across all staves of a system.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarLayoutingInfo {
    pub pre_beat_size: f64,
    pub post_beat_size: f64,
    springs: BTreeMap<BeatTime, Spring>,
}

impl BarLayoutingInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_pre_beat_size(&mut self, size: f64) {
        self.pre_beat_size = self.pre_beat_size.max(size);
    }

    pub fn update_post_beat_size(&mut self, size: f64) {
        self.post_beat_size = self.post_beat_size.max(size);
    }

    /// Record that a beat starting at `time` needs at least `min_width`.
    pub fn add_spring(&mut self, time: BeatTime, duration: i32, min_width: f64) {
        let spring = self.springs.entry(time).or_insert(Spring {
            min_width: 0.0,
            duration: 0,
        });
        spring.min_width = spring.min_width.max(min_width);
        spring.duration = spring.duration.max(duration);
    }

    pub fn merge(&mut self, other: &BarLayoutingInfo) {
        self.update_pre_beat_size(other.pre_beat_size);
        self.update_post_beat_size(other.post_beat_size);
        for (time, spring) in &other.springs {
            self.add_spring(*time, spring.duration, spring.min_width);
        }
    }

    /// Narrowest space the beats fit into.
    pub fn min_voice_size(&self) -> f64 {
        self.springs.values().map(|s| s.min_width).sum()
    }

    pub fn min_bar_width(&self) -> f64 {
        self.pre_beat_size + self.min_voice_size() + self.post_beat_size
    }

    /// Time distance from each beat time to the next one.
    fn gaps(&self) -> Vec<i32> {
        let times: Vec<&BeatTime> = self.springs.keys().collect();
        let end = self
            .springs
            .iter()
            .map(|(t, s)| t.tick + s.duration)
            .max()
            .unwrap_or(0);
        times
            .iter()
            .enumerate()
            .map(|(i, t)| match times.get(i + 1) {
                Some(next) => next.tick - t.tick,
                None => end - t.tick,
            })
            .collect()
    }

    /// Beat positions for a voice area of `voice_width`, relative to its
    /// start. Space beyond the minimum is shared in proportion to the
    /// time each beat occupies.
    pub fn positions(&self, voice_width: f64) -> BTreeMap<BeatTime, f64> {
        let gaps = self.gaps();
        let span: i32 = gaps.iter().sum();
        let extra = (voice_width - self.min_voice_size()).max(0.0);
        let count = self.springs.len().max(1) as f64;

        let mut positions = BTreeMap::new();
        let mut x = 0.0;
        for ((time, spring), gap) in self.springs.iter().zip(gaps) {
            positions.insert(*time, x);
            let share = if span > 0 {
                gap as f64 / span as f64
            } else {
                1.0 / count
            };
            x += spring.min_width + extra * share;
        }
        positions
    }
}

/// Look up the position of `time`, falling back to the closest known time.
pub fn lookup_beat_x(positions: &BTreeMap<BeatTime, f64>, time: BeatTime) -> f64 {
    if let Some(x) = positions.get(&time) {
        return *x;
    }
    positions
        .iter()
        .min_by_key(|(t, _)| (t.tick - time.tick).abs())
        .map_or(0.0, |(_, x)| *x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Beat, Duration, GraceType, Note};
    use pretty_assertions::assert_eq;

    #[test]
    fn start_times_with_graces() {
        let mut grace = Beat::new(Duration::Sixteenth, vec![Note::new(60)]);
        grace.grace_type = GraceType::BeforeBeat;
        let voice = Voice {
            beats: vec![
                Beat::rest(Duration::Quarter),
                grace.clone(),
                grace,
                Beat::rest(Duration::Half),
            ],
        };
        let times = beat_start_times(&voice);
        assert_eq!(
            times,
            vec![
                BeatTime::new(0),
                BeatTime {
                    tick: 960,
                    grace_offset: -2
                },
                BeatTime {
                    tick: 960,
                    grace_offset: -1
                },
                BeatTime::new(960),
            ]
        );
    }

    #[test]
    fn extra_space_follows_durations() {
        let mut info = BarLayoutingInfo::new();
        info.add_spring(BeatTime::new(0), 1920, 10.0);
        info.add_spring(BeatTime::new(1920), 960, 10.0);
        info.add_spring(BeatTime::new(2880), 960, 10.0);
        assert_eq!(info.min_voice_size(), 30.0);

        let positions = info.positions(30.0);
        assert_eq!(positions.values().copied().collect::<Vec<_>>(), vec![0.0, 10.0, 20.0]);

        let positions = info.positions(70.0);
        // 40 extra: half to the half note, a quarter each to the quarters
        assert_eq!(positions.values().copied().collect::<Vec<_>>(), vec![0.0, 30.0, 50.0]);
    }

    #[test]
    fn merge_keeps_maxima() {
        let mut a = BarLayoutingInfo::new();
        a.update_pre_beat_size(20.0);
        a.add_spring(BeatTime::new(0), 960, 12.0);
        let mut b = BarLayoutingInfo::new();
        b.update_pre_beat_size(30.0);
        b.update_post_beat_size(5.0);
        b.add_spring(BeatTime::new(0), 960, 8.0);
        b.add_spring(BeatTime::new(960), 960, 8.0);
        a.merge(&b);
        assert_eq!(a.pre_beat_size, 30.0);
        assert_eq!(a.post_beat_size, 5.0);
        assert_eq!(a.min_voice_size(), 20.0);
        assert_eq!(a.min_bar_width(), 55.0);
    }
}
