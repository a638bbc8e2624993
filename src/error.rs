use thiserror::Error;

use crate::renderer::BarId;

/// Errors surfaced by a layout pass. Painting never fails; only the layout
/// pass that precedes it can.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("beat {beat} of voice {voice} in bar {bar} has no beaming helper")]
    MissingBeamingHelper { bar: BarId, voice: usize, beat: usize },

    #[error("staff {staff} of track {track} is shown but no bar renderer factory accepts it")]
    NoMatchingFactory { track: usize, staff: usize },

    #[error("staff {staff} of track {track} has no bar {index}")]
    MissingBar { track: usize, staff: usize, index: usize },

    #[error("Invalid score JSON: {0}")]
    Json(#[from] serde_json::Error),
}
