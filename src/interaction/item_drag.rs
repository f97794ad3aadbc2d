//! Item move and resize sessions.
//!
//! Frames only update a visual offset; item data is untouched until commit,
//! which recomputes everything from the release position.

use egui::{Pos2, Vec2};

use crate::layout::RowLocator;
use crate::model::time::{MILLIS_PER_MINUTE, MILLIS_PER_SECOND};
use crate::model::{Item, ItemKey, ItemPatch, TimePoint, TimelineViewport};

use super::events::ResizeEdge;

/// Placement of an item when its gesture started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Baseline<T> {
    pub key: ItemKey,
    pub row: usize,
    pub start: T,
    pub end: T,
}

impl<T: TimePoint> Baseline<T> {
    pub fn of(item: &Item<T>) -> Self {
        Self {
            key: item.key.clone(),
            row: item.row,
            start: item.start,
            end: item.end,
        }
    }
}

/// Several items dragged together.
#[derive(Debug, Clone)]
pub struct MoveSession<T> {
    /// The item under the pointer; its start drives the snapped time delta.
    pub grabbed: Baseline<T>,
    pub origin: Pos2,
    pub origin_row: usize,
    pub baselines: Vec<Baseline<T>>,
    /// Snapped visual offset applied to every moving item.
    pub offset: Vec2,
}

/// Outcome of a committed move.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveResult<T> {
    pub time_delta_ms: i64,
    pub row_delta: i64,
    pub patches: Vec<ItemPatch<T>>,
}

impl<T: TimePoint> MoveSession<T> {
    /// Capture baselines for `moving`. `None` if the grabbed item is unknown.
    pub fn begin(
        grabbed: &ItemKey,
        moving: &[ItemKey],
        origin: Pos2,
        items: &[Item<T>],
        locator: &dyn RowLocator,
    ) -> Option<Self> {
        let grabbed = Baseline::of(items.iter().find(|i| i.key == *grabbed)?);
        let mut baselines: Vec<Baseline<T>> = items
            .iter()
            .filter(|i| moving.contains(&i.key))
            .map(Baseline::of)
            .collect();
        if !baselines.iter().any(|b| b.key == grabbed.key) {
            baselines.insert(0, grabbed.clone());
        }
        let origin_row = locator.row_at(origin).unwrap_or(grabbed.row);
        Some(Self {
            grabbed,
            origin,
            origin_row,
            baselines,
            offset: Vec2::ZERO,
        })
    }

    pub fn keys(&self) -> Vec<ItemKey> {
        self.baselines.iter().map(|b| b.key.clone()).collect()
    }

    pub fn moves(&self, key: &ItemKey) -> bool {
        self.baselines.iter().any(|b| b.key == *key)
    }

    pub fn update(&mut self, pos: Pos2, viewport: &TimelineViewport<T>, snap_seconds: i64) {
        let delta = pos - self.origin;
        self.offset = Vec2::new(viewport.snapped_pixel_delta(delta.x, snap_seconds), delta.y);
    }

    /// Resolve the drop: one time delta in whole minutes and one row delta,
    /// applied to every moving item. Rows are clamped to the caller rows.
    pub fn commit(
        &mut self,
        pos: Pos2,
        viewport: &TimelineViewport<T>,
        snap_seconds: i64,
        locator: &dyn RowLocator,
        group_count: usize,
    ) -> MoveResult<T> {
        self.update(pos, viewport, snap_seconds);

        let start_px = viewport.pixel_at_time(self.grabbed.start) + self.offset.x;
        let new_start = viewport.time_at_pixel(start_px, snap_seconds);
        let raw_delta = new_start.to_millis() - self.grabbed.start.to_millis();
        let time_delta_ms = raw_delta / MILLIS_PER_MINUTE * MILLIS_PER_MINUTE;

        let row_delta = locator
            .row_at(pos)
            .map_or(0, |row| row as i64 - self.origin_row as i64);

        let patches = self
            .baselines
            .iter()
            .map(|b| ItemPatch {
                key: b.key.clone(),
                row: shift_row(b.row, row_delta, group_count),
                start: b.start.offset_millis(time_delta_ms),
                end: b.end.offset_millis(time_delta_ms),
            })
            .collect();

        MoveResult {
            time_delta_ms,
            row_delta,
            patches,
        }
    }
}

fn shift_row(row: usize, delta: i64, group_count: usize) -> usize {
    if group_count == 0 {
        return row;
    }
    (row as i64 + delta).clamp(0, group_count as i64 - 1) as usize
}

/// One edge of one item being dragged.
#[derive(Debug, Clone)]
pub struct ResizeSession<T> {
    pub baseline: Baseline<T>,
    pub edge: ResizeEdge,
    pub origin: Pos2,
    /// Horizontal offset of the moving edge, snapped and width-clamped.
    pub offset_x: f32,
}

impl<T: TimePoint> ResizeSession<T> {
    pub fn begin(key: &ItemKey, edge: ResizeEdge, origin: Pos2, items: &[Item<T>]) -> Option<Self> {
        let item = items.iter().find(|i| i.key == *key)?;
        Some(Self {
            baseline: Baseline::of(item),
            edge,
            origin,
            offset_x: 0.0,
        })
    }

    pub fn update(&mut self, pos: Pos2, viewport: &TimelineViewport<T>, snap_seconds: i64) {
        let dx = viewport.snapped_pixel_delta(pos.x - self.origin.x, snap_seconds);
        let min_width = viewport.snap_unit_pixels(snap_seconds).max(0.0);
        let left = viewport.pixel_at_time(self.baseline.start);
        let right = viewport.pixel_at_time(self.baseline.end);
        self.offset_x = match self.edge {
            ResizeEdge::Start => (left + dx).min(right - min_width) - left,
            ResizeEdge::End => (right + dx).max(left + min_width) - right,
        };
    }

    /// Rewrite the moved edge; the row never changes.
    pub fn commit(&mut self, pos: Pos2, viewport: &TimelineViewport<T>, snap_seconds: i64) -> ItemPatch<T> {
        self.update(pos, viewport, snap_seconds);
        let min_ms = snap_seconds.max(0) * MILLIS_PER_SECOND;
        let b = &self.baseline;
        let (start, end) = match self.edge {
            ResizeEdge::Start => {
                let px = viewport.pixel_at_time(b.start) + self.offset_x;
                let start = viewport.time_at_pixel(px, snap_seconds);
                (start.min(b.end.offset_millis(-min_ms)), b.end)
            }
            ResizeEdge::End => {
                let px = viewport.pixel_at_time(b.end) + self.offset_x;
                let end = viewport.time_at_pixel(px, snap_seconds);
                (b.start, end.max(b.start.offset_millis(min_ms)))
            }
        };
        ItemPatch {
            key: b.key.clone(),
            row: b.row,
            start,
            end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::gesture::tests::UniformRows;
    use crate::model::time::MILLIS_PER_HOUR;
    use approx::assert_abs_diff_eq;

    const HOUR: i64 = MILLIS_PER_HOUR;

    // 10 h over 1000 px: one hour is 100 px
    fn viewport() -> TimelineViewport<i64> {
        TimelineViewport::new(0, 10 * HOUR, 1000.0).unwrap()
    }

    fn rows() -> UniformRows {
        UniformRows { height: 20.0, count: 4 }
    }

    fn items() -> Vec<Item<i64>> {
        vec![
            Item::new(1, 0, HOUR, 2 * HOUR),
            Item::new(2, 1, 3 * HOUR, 5 * HOUR),
            Item::new(3, 3, 0, HOUR),
        ]
    }

    #[test]
    fn move_applies_one_delta_to_every_item() {
        let items = items();
        let keys = [ItemKey::from(1), ItemKey::from(2)];
        let mut s = MoveSession::begin(&keys[0], &keys, Pos2::new(150.0, 10.0), &items, &rows()).unwrap();

        s.update(Pos2::new(265.0, 12.0), &viewport(), 3600);
        assert_abs_diff_eq!(s.offset.x, 100.0, epsilon = 1e-3);

        // +110 px snaps to +1h, release on row 1
        let result = s.commit(Pos2::new(260.0, 30.0), &viewport(), 3600, &rows(), 4);
        assert_eq!(result.time_delta_ms, HOUR);
        assert_eq!(result.row_delta, 1);
        assert_eq!(
            result.patches,
            vec![
                ItemPatch { key: ItemKey::from(1), row: 1, start: 2 * HOUR, end: 3 * HOUR },
                ItemPatch { key: ItemKey::from(2), row: 2, start: 4 * HOUR, end: 6 * HOUR },
            ]
        );
    }

    #[test]
    fn move_clamps_rows_and_truncates_to_minutes() {
        let items = items();
        let keys = [ItemKey::from(3)];
        let mut s = MoveSession::begin(&keys[0], &keys, Pos2::new(50.0, 70.0), &items, &rows()).unwrap();
        // 1 px = 36 s, snap off: +5 px = 3 minutes exactly, +1 px = 36 s truncated away
        let result = s.commit(Pos2::new(56.0, 5.0), &viewport(), 0, &rows(), 2);
        assert_eq!(result.time_delta_ms, 3 * MILLIS_PER_MINUTE);
        assert_eq!(result.row_delta, -3);
        assert_eq!(result.patches[0].row, 0);
    }

    #[test]
    fn grabbed_item_always_moves() {
        let items = items();
        let s = MoveSession::begin(&ItemKey::from(2), &[ItemKey::from(1)], Pos2::ZERO, &items, &rows()).unwrap();
        assert!(s.moves(&ItemKey::from(2)));
        assert!(s.moves(&ItemKey::from(1)));
        assert!(MoveSession::begin(&ItemKey::from(9), &[], Pos2::ZERO, &items, &rows()).is_none());
    }

    #[test]
    fn resize_end_respects_minimum_width() {
        let items = items();
        let mut s = ResizeSession::begin(&ItemKey::from(1), ResizeEdge::End, Pos2::new(200.0, 5.0), &items).unwrap();
        // drag far left: width floors at one 15 minute unit (25 px)
        s.update(Pos2::new(0.0, 5.0), &viewport(), 900);
        assert_abs_diff_eq!(s.offset_x, -75.0, epsilon = 1e-3);

        let patch = s.commit(Pos2::new(0.0, 5.0), &viewport(), 900);
        assert_eq!((patch.start, patch.end), (HOUR, HOUR + 15 * MILLIS_PER_MINUTE));
        assert_eq!(patch.row, 0);
    }

    #[test]
    fn resize_start_moves_only_the_start() {
        let items = items();
        let mut s = ResizeSession::begin(&ItemKey::from(2), ResizeEdge::Start, Pos2::new(300.0, 25.0), &items).unwrap();
        let patch = s.commit(Pos2::new(240.0, 90.0), &viewport(), 1800);
        assert_eq!((patch.start, patch.end), (2 * HOUR + 30 * MILLIS_PER_MINUTE, 5 * HOUR));
        assert_eq!(patch.row, 1);
    }
}
