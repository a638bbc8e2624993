//! Renderer factories and stave profiles.
//!
//! A profile is an ordered list of factories; every factory of the
//! profile that accepts a staff contributes one renderer row for it.

use super::bar_renderer::{BarRenderer, BarRendererBase, BarRendererKind};
use super::score_bar::ScoreBarRendererFactory;
use super::slash_bar::SlashBarRendererFactory;
use super::tab_bar::TabBarRendererFactory;
use crate::model::{Staff, Track};
use crate::settings::StaveProfile;

pub trait BarRendererFactory: Sync {
    /// Identifier shared by all renderers created by this factory.
    fn staff_id(&self) -> &'static str;

    fn can_create(&self, track: &Track, staff: &Staff) -> bool;

    fn create_kind(&self) -> Box<dyn BarRendererKind>;

    fn create<'a>(&self, base: BarRendererBase<'a>) -> BarRenderer<'a> {
        BarRenderer::new(base, self.create_kind())
    }
}

static SLASH: SlashBarRendererFactory = SlashBarRendererFactory;
static SCORE: ScoreBarRendererFactory = ScoreBarRendererFactory;
static TAB: TabBarRendererFactory = TabBarRendererFactory;

static SCORE_TAB_FACTORIES: [&dyn BarRendererFactory; 3] = [&SLASH, &SCORE, &TAB];
static SCORE_FACTORIES: [&dyn BarRendererFactory; 2] = [&SLASH, &SCORE];
static TAB_FACTORIES: [&dyn BarRendererFactory; 2] = [&SLASH, &TAB];

/// Factories of a profile, top to bottom.
pub fn factories_for(profile: StaveProfile) -> &'static [&'static dyn BarRendererFactory] {
    match profile {
        StaveProfile::Default | StaveProfile::ScoreTab => &SCORE_TAB_FACTORIES,
        StaveProfile::Score => &SCORE_FACTORIES,
        StaveProfile::Tab | StaveProfile::TabMixed => &TAB_FACTORIES,
    }
}

/// Resolves the profile used for one staff. `None` hides the staff.
pub fn stave_profile_for(
    requested: StaveProfile,
    track: &Track,
    staff: &Staff,
) -> Option<StaveProfile> {
    if staff.is_percussion {
        return Some(StaveProfile::Score);
    }
    if requested != StaveProfile::Default {
        return Some(requested);
    }
    let tab = staff.show_tablature && staff.is_stringed();
    let score = staff.show_standard_notation;
    match (tab, score) {
        (true, true) => Some(StaveProfile::ScoreTab),
        (true, false) => {
            let mixed = track
                .staves
                .iter()
                .any(|other| !std::ptr::eq(other, staff) && other.show_standard_notation);
            Some(if mixed {
                StaveProfile::TabMixed
            } else {
                StaveProfile::Tab
            })
        }
        (false, true) => Some(StaveProfile::Score),
        (false, false) if staff.show_slash => Some(StaveProfile::Score),
        (false, false) => None,
    }
}

/// Factories of the resolved profile that accept the staff.
pub fn factories_for_staff(
    requested: StaveProfile,
    track: &Track,
    staff: &Staff,
) -> Vec<&'static dyn BarRendererFactory> {
    stave_profile_for(requested, track, staff)
        .map(|profile| {
            factories_for(profile)
                .iter()
                .copied()
                .filter(|f| f.can_create(track, staff))
                .collect()
        })
        .unwrap_or_default()
}
