//! Systems: one `RenderStaff` per renderer row, grouped into a
//! `StaveGroup` that keeps bar widths and margins consistent.

use super::bar_renderer::{BarRenderer, BarRendererBase};
use super::beat_map::BarLayoutingInfo;
use super::constants::*;
use super::factory::{factories_for_staff, BarRendererFactory};
use super::BarId;
use crate::error::LayoutError;
use crate::model::Score;
use crate::platform::Canvas;
use crate::settings::RenderSettings;

/// One renderer row: a model staff drawn by one factory.
#[derive(Clone, Copy)]
pub struct StaffRow {
    pub track: usize,
    pub staff: usize,
    pub factory: &'static dyn BarRendererFactory,
}

/// Resolve the rows of every track and staff of the score, top to bottom.
pub fn staff_rows(score: &Score, settings: &RenderSettings) -> Result<Vec<StaffRow>, LayoutError> {
    let mut rows = Vec::new();
    for (t, track) in score.tracks.iter().enumerate() {
        for (s, staff) in track.staves.iter().enumerate() {
            let factories = factories_for_staff(settings.stave_profile, track, staff);
            if factories.is_empty() {
                if super::factory::stave_profile_for(settings.stave_profile, track, staff).is_some() {
                    return Err(LayoutError::NoMatchingFactory { track: t, staff: s });
                }
                log::debug!("Staff {s} of track {t} is hidden");
                continue;
            }
            rows.extend(factories.into_iter().map(|factory| StaffRow {
                track: t,
                staff: s,
                factory,
            }));
        }
    }
    Ok(rows)
}

pub struct RenderStaff<'a> {
    pub row: StaffRow,
    pub bars: Vec<BarRenderer<'a>>,
    /// Top of the staff's box inside the group, margins included
    pub y: f64,
    pub top_spacing: f64,
    pub bottom_spacing: f64,
}

impl<'a> RenderStaff<'a> {
    fn new(row: StaffRow) -> Self {
        Self {
            row,
            bars: Vec::new(),
            y: 0.0,
            top_spacing: 0.0,
            bottom_spacing: 0.0,
        }
    }

    pub fn staff_id(&self) -> &'static str {
        self.row.factory.staff_id()
    }

    /// Height of the staff lines area without margins.
    pub fn nominal_height(&self) -> f64 {
        self.bars.iter().map(|b| b.base.height).fold(0.0, f64::max)
    }

    pub fn height(&self) -> f64 {
        self.top_spacing + self.nominal_height() + self.bottom_spacing
    }

    fn top_overflow(&self) -> f64 {
        self.bars.iter().map(|b| b.base.top_overflow()).fold(0.0, f64::max)
    }

    fn bottom_overflow(&self) -> f64 {
        self.bars.iter().map(|b| b.base.bottom_overflow()).fold(0.0, f64::max)
    }
}

/// The staves of one system.
pub struct StaveGroup<'a> {
    score: &'a Score,
    settings: &'a RenderSettings,
    pub staves: Vec<RenderStaff<'a>>,
    pub x: f64,
    pub y: f64,
    /// Merged grid per bar of the group
    infos: Vec<BarLayoutingInfo>,
    first_bar_index: Option<usize>,
    /// Width of the bars at their minimum
    content_width: f64,
    /// Width the bars were last stretched to
    stretched_width: Option<f64>,
    pub is_full: bool,
    height: f64,
}

impl<'a> StaveGroup<'a> {
    pub fn new(score: &'a Score, settings: &'a RenderSettings, rows: &[StaffRow]) -> Self {
        Self {
            score,
            settings,
            staves: rows.iter().copied().map(RenderStaff::new).collect(),
            x: 0.0,
            y: 0.0,
            infos: Vec::new(),
            first_bar_index: None,
            content_width: 0.0,
            stretched_width: None,
            is_full: false,
            height: 0.0,
        }
    }

    pub fn bar_count(&self) -> usize {
        self.infos.len()
    }

    pub fn first_bar_index(&self) -> Option<usize> {
        self.first_bar_index
    }

    pub fn last_bar_index(&self) -> Option<usize> {
        self.first_bar_index.map(|first| first + self.infos.len() - 1)
    }

    fn accolade_width(&self) -> f64 {
        ACCOLADE_WIDTH * self.settings.scale
    }

    /// Current width including the accolade.
    pub fn width(&self) -> f64 {
        self.accolade_width() + self.stretched_width.unwrap_or(self.content_width)
    }

    /// Append bar `index` to every staff and unify its width across them.
    /// Nothing is appended when any staff fails.
    pub fn add_bars(&mut self, index: usize) -> Result<(), LayoutError> {
        let score: &'a Score = self.score;
        let settings: &'a RenderSettings = self.settings;
        let is_first_of_line = self.infos.is_empty();

        let mut created = Vec::with_capacity(self.staves.len());
        let mut info = BarLayoutingInfo::new();
        for (position, staff) in self.staves.iter().enumerate() {
            let row = staff.row;
            let model_staff = score
                .tracks
                .get(row.track)
                .and_then(|t| t.staves.get(row.staff))
                .ok_or_else(|| missing_bar(row, index))?;
            let master_bar = score.master_bars.get(index).ok_or_else(|| missing_bar(row, index))?;
            let bar = model_staff.bars.get(index).ok_or_else(|| missing_bar(row, index))?;

            let id = BarId {
                track: row.track,
                staff: row.staff,
                index,
            };
            let mut base = BarRendererBase::new(id, score, settings, model_staff, bar, master_bar);
            base.is_first_of_line = is_first_of_line;
            base.show_bar_number = position == 0;
            base.is_top_of_staff = position == 0 || {
                let above = self.staves[position - 1].row;
                (above.track, above.staff) != (row.track, row.staff)
            };
            let mut renderer = row.factory.create(base);
            renderer.do_layout()?;
            info.merge(&renderer.base.layouting_info);
            created.push(renderer);
        }

        let x = self.content_width;
        for (staff, mut renderer) in self.staves.iter_mut().zip(created) {
            renderer.apply_layouting_info(&info);
            renderer.base.x = x;
            staff.bars.push(renderer);
        }
        self.content_width += info.min_bar_width();
        self.infos.push(info);
        self.first_bar_index.get_or_insert(index);
        self.stretched_width = None;
        Ok(())
    }

    /// Drop the last bar of every staff. Returns its index.
    pub fn revert_last_bar(&mut self) -> Option<usize> {
        let last = self.last_bar_index()?;
        let info = self.infos.pop()?;
        for staff in &mut self.staves {
            staff.bars.pop();
        }
        log::debug!("Reverted bar {last} ({:.1} wide)", info.min_bar_width());
        self.content_width = self.infos.iter().map(BarLayoutingInfo::min_bar_width).sum();
        if self.infos.is_empty() {
            self.first_bar_index = None;
        }
        self.stretched_width = None;
        Some(last)
    }

    /// Ids of the bars at `position` within the group, one per staff.
    pub fn bar_ids(&self, position: usize) -> Vec<(&'static str, BarId)> {
        self.staves
            .iter()
            .filter_map(|staff| staff.bars.get(position).map(|b| (staff.staff_id(), b.base.id)))
            .collect()
    }

    /// Stretch the bars to fill `width`, sharing the extra space in
    /// proportion to each bar's minimal width.
    pub fn scale_to_width(&mut self, width: f64) {
        let available = (width - self.accolade_width()).max(self.content_width);
        let factor = if self.content_width > 0.0 {
            available / self.content_width
        } else {
            1.0
        };
        let last = self.infos.len().saturating_sub(1);
        let mut x = 0.0;
        for (i, info) in self.infos.iter().enumerate() {
            // the last bar absorbs rounding so the system ends flush
            let bar_width = if i == last {
                available - x
            } else {
                info.min_bar_width() * factor
            };
            for staff in &mut self.staves {
                if let Some(bar) = staff.bars.get_mut(i) {
                    bar.base.x = x;
                    bar.scale_to_width(bar_width);
                }
            }
            x += bar_width;
        }
        self.stretched_width = Some(available);
    }

    /// Give every staff the same margins and stack them.
    pub fn finalize(&mut self) {
        let top = self.staves.iter().map(RenderStaff::top_overflow).fold(0.0, f64::max);
        let bottom = self.staves.iter().map(RenderStaff::bottom_overflow).fold(0.0, f64::max);
        let mut y = 0.0;
        for staff in &mut self.staves {
            staff.top_spacing = top;
            staff.bottom_spacing = bottom;
            staff.y = y;
            y += staff.height();
        }
        self.height = y;
        log::debug!(
            "Finalized system with bars {:?}..={:?}: margins {top:.1}/{bottom:.1}, height {y:.1}",
            self.first_bar_index(),
            self.last_bar_index()
        );
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn paint(&mut self, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        let x = cx + self.x;
        let y = cy + self.y;
        self.paint_accolade(x, y, canvas);
        let content_x = x + self.accolade_width();
        for staff in &mut self.staves {
            let staff_y = y + staff.y + staff.top_spacing;
            for bar in &mut staff.bars {
                bar.paint(content_x, staff_y, canvas);
            }
        }
    }

    /// Line joining the staves at the start of the system.
    fn paint_accolade(&self, x: f64, y: f64, canvas: &mut dyn Canvas) {
        if self.staves.len() < 2 {
            return;
        }
        let first = self.staves.first().zip(self.staves.first().and_then(|s| s.bars.first()));
        let last = self.staves.last().zip(self.staves.last().and_then(|s| s.bars.first()));
        let (Some((first, first_bar)), Some((last, last_bar))) = (first, last) else {
            return;
        };
        let top = y + first.y + first.top_spacing + first_bar.base.top_padding;
        let bottom = y + last.y + last.top_spacing + last.nominal_height()
            - last_bar.base.bottom_padding;
        let scale = self.settings.scale;
        canvas.set_color(self.settings.resources.bar_separator_color);
        canvas.fill_rect(
            x + self.accolade_width() - THIN_LINE * scale,
            top,
            THIN_LINE * scale,
            bottom - top,
        );
        canvas.set_color(self.settings.resources.main_glyph_color);
    }
}

fn missing_bar(row: StaffRow, index: usize) -> LayoutError {
    LayoutError::MissingBar {
        track: row.track,
        staff: row.staff,
        index,
    }
}
