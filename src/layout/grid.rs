//! Maps the virtualized row grid to timeline semantics: which cells are
//! group labels and which are time rows, how tall each row is, and which
//! synthetic filler rows pad the grid out to the viewport height.

use std::ops::Range;

use egui::{Pos2, Rect, Vec2};

use crate::model::{Group, Item, TimePoint, TimelineViewport};

use super::overlap::row_depths;

/// Upper bound on synthetic rows padding the grid.
pub const MAX_FILLER_ROWS: usize = 1024;

/// Resolves screen points to logical rows.
///
/// The interaction controller only talks to rows through this trait, so it
/// can be driven without a real layout.
pub trait RowLocator {
    /// Row under `pos`, if any.
    fn row_at(&self, pos: Pos2) -> Option<usize>;
    /// Screen-space bounds of `row`.
    fn bounds_of(&self, row: usize) -> Option<Rect>;
}

/// What a grid cell shows. The last column is always the time row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    GroupLabel { row: usize, column: usize },
    TimeRow { row: usize },
}

pub fn cell_kind(column: usize, row: usize, column_count: usize) -> CellKind {
    if column + 1 >= column_count {
        CellKind::TimeRow { row }
    } else {
        CellKind::GroupLabel { row, column }
    }
}

/// One row of the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridRow {
    /// A caller-supplied group with its stacking depth.
    Group { row: usize, depth: usize },
    /// Synthetic padding below the last group. Ids continue after the groups.
    Filler { id: usize, height: f32 },
}

/// Row heights and filler rows derived from the current groups, items and
/// visible window.
#[derive(Debug, Clone)]
pub struct GridCoordinator {
    item_height: f32,
    /// Stacking depth per caller row.
    depths: Vec<usize>,
    /// Heights of the filler rows, top to bottom.
    fillers: Vec<f32>,
}

impl GridCoordinator {
    pub fn new(item_height: f32) -> Self {
        Self {
            item_height,
            depths: Vec::new(),
            fillers: Vec::new(),
        }
    }

    pub fn item_height(&self) -> f32 {
        self.item_height
    }

    pub fn set_item_height(&mut self, item_height: f32) {
        self.item_height = item_height;
    }

    /// Rebuild depths and filler rows from scratch.
    ///
    /// Calling this twice with the same inputs yields the same rows.
    pub fn recompute<T: TimePoint>(
        &mut self,
        groups: &[Group],
        items: &[Item<T>],
        viewport: &TimelineViewport<T>,
        viewport_height: f32,
    ) {
        self.depths = row_depths(items, groups.len(), viewport);
        self.fillers.clear();

        if self.item_height <= 0.0 {
            return;
        }
        let remaining = viewport_height - self.content_height();
        if !remaining.is_finite() || remaining <= 0.0 {
            return;
        }
        let full = ((remaining / self.item_height).floor() as usize).min(MAX_FILLER_ROWS);
        self.fillers.extend(std::iter::repeat(self.item_height).take(full));
        let rest = remaining - full as f32 * self.item_height;
        if full < MAX_FILLER_ROWS && rest > f32::EPSILON {
            self.fillers.push(rest);
        }
    }

    pub fn group_count(&self) -> usize {
        self.depths.len()
    }

    pub fn filler_count(&self) -> usize {
        self.fillers.len()
    }

    pub fn row_count(&self) -> usize {
        self.depths.len() + self.fillers.len()
    }

    pub fn is_filler(&self, row: usize) -> bool {
        row >= self.depths.len() && row < self.row_count()
    }

    /// Stacking depth of a caller row; rows without a cached depth count as 1.
    pub fn depth(&self, row: usize) -> usize {
        self.depths.get(row).copied().unwrap_or(1)
    }

    pub fn row_height(&self, row: usize) -> f32 {
        match row.checked_sub(self.depths.len()) {
            Some(filler) => self.fillers.get(filler).copied().unwrap_or(self.item_height),
            None => self.depth(row) as f32 * self.item_height,
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = GridRow> + '_ {
        let groups = self
            .depths
            .iter()
            .enumerate()
            .map(|(row, &depth)| GridRow::Group { row, depth });
        let fillers = self
            .fillers
            .iter()
            .enumerate()
            .map(move |(i, &height)| GridRow::Filler {
                id: self.depths.len() + i,
                height,
            });
        groups.chain(fillers)
    }

    /// Height of the caller rows alone.
    pub fn content_height(&self) -> f32 {
        self.depths.iter().map(|&d| d as f32 * self.item_height).sum()
    }

    /// Height of all rows, fillers included.
    pub fn total_height(&self) -> f32 {
        self.content_height() + self.fillers.iter().sum::<f32>()
    }

    /// Offset of the top of `row` from the top of the grid.
    pub fn row_top(&self, row: usize) -> f32 {
        (0..row.min(self.row_count())).map(|r| self.row_height(r)).sum()
    }

    /// Rows intersecting `[scroll_y, scroll_y + height)`: the only rows a
    /// virtualized renderer needs to draw.
    pub fn visible_rows(&self, scroll_y: f32, height: f32) -> Range<usize> {
        let tops = self.row_tops();
        let first = tops.partition_point(|&t| t <= scroll_y).saturating_sub(1);
        let last = tops.partition_point(|&t| t < scroll_y + height);
        first..last.min(self.row_count()).max(first)
    }

    /// Screen-space geometry of every row, with the grid's top-left at `origin`.
    pub fn geometry(&self, origin: Pos2, width: f32) -> RowGeometry {
        RowGeometry {
            origin,
            width,
            tops: self.row_tops(),
        }
    }

    /// Cumulative row tops, one longer than the row count.
    fn row_tops(&self) -> Vec<f32> {
        let mut tops = Vec::with_capacity(self.row_count() + 1);
        let mut y = 0.0;
        tops.push(y);
        for row in 0..self.row_count() {
            y += self.row_height(row);
            tops.push(y);
        }
        tops
    }
}

/// Row layout snapshot in screen coordinates.
#[derive(Debug, Clone)]
pub struct RowGeometry {
    origin: Pos2,
    width: f32,
    tops: Vec<f32>,
}

impl RowGeometry {
    pub fn row_count(&self) -> usize {
        self.tops.len().saturating_sub(1)
    }
}

impl RowLocator for RowGeometry {
    /// Rows span the full width, so only `pos.y` matters.
    fn row_at(&self, pos: Pos2) -> Option<usize> {
        let y = pos.y - self.origin.y;
        let bottom = *self.tops.last()?;
        if y < 0.0 || y >= bottom {
            return None;
        }
        Some(self.tops.partition_point(|&t| t <= y) - 1)
    }

    fn bounds_of(&self, row: usize) -> Option<Rect> {
        let top = *self.tops.get(row)?;
        let bottom = *self.tops.get(row + 1)?;
        Some(Rect::from_min_size(
            self.origin + Vec2::new(0.0, top),
            Vec2::new(self.width, bottom - top),
        ))
    }
}
