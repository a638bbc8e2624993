//! Score renderer — lays a `Score` out into systems of bar renderers and
//! paints them onto any `Canvas`.
//!
//! The pipeline per bar: build a glyph tree, group beats into beams and
//! tuplets, resolve accidentals, measure, then share the beat grid with
//! the other staves of the same system. `ScoreLayout` drives it for the
//! selected bar range.

mod accidentals;
mod bar_renderer;
mod beaming;
mod beat_map;
mod constants;
mod factory;
mod glyphs;
mod layout;
mod score_bar;
mod slash_bar;
mod staves;
mod tab_bar;
mod tuplets;

use std::fmt;

use serde::Serialize;

pub use accidentals::{AccidentalHelper, AccidentalType, AppliedAccidental};
pub use bar_renderer::{BarRenderer, BarRendererBase, BarRendererKind, RendererState};
pub use beaming::{BarHelpers, BeamDirection, BeamingHelper};
pub use beat_map::{BarLayoutingInfo, BeatTime};
pub use factory::{factories_for, stave_profile_for, BarRendererFactory};
pub use layout::{bar_range, PartialRender, RendererLocation, ScoreInfo, ScoreLayout};
pub use score_bar::{ScoreBarRenderer, ScoreBarRendererFactory};
pub use slash_bar::{SlashBarRenderer, SlashBarRendererFactory};
pub use staves::{staff_rows, RenderStaff, StaffRow, StaveGroup};
pub use tab_bar::{TabBarRenderer, TabBarRendererFactory};
pub use tuplets::{tuplet_label, TupletGroup};

/// Identifies one bar of one staff: the key of the renderer lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarId {
    pub track: usize,
    pub staff: usize,
    pub index: usize,
}

impl fmt::Display for BarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.track, self.staff, self.index + 1)
    }
}
