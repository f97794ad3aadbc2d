//! Rectangle sessions: rubber-band selection and drag-to-create.

use egui::{Modifiers, PointerButton, Pos2, Rect};

use crate::layout::RowLocator;

/// Probe offset toward the anchor row when resolving the row under the
/// pointer, so an exact row boundary counts for the row on the anchor side.
const EDGE_NUDGE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectMode {
    /// Rubber-band selection across rows.
    Select,
    /// Drawing a new segment; pinned to the anchor row.
    Create,
}

/// An open rectangle gesture.
#[derive(Debug, Clone)]
pub struct RectSession<T> {
    pub mode: RectMode,
    pub origin: Pos2,
    pub current: Pos2,
    pub rect: Rect,
    pub anchor_row: usize,
    /// Row under the pointer on the last update.
    pub current_row: usize,
    /// Inclusive row range covered by the rectangle.
    pub first_row: usize,
    pub last_row: usize,
    pub button: PointerButton,
    pub modifiers: Modifiers,
    /// Time at the origin, reported as the provisional start in create mode.
    pub create_start: Option<T>,
}

impl<T> RectSession<T> {
    pub fn begin(
        mode: RectMode,
        origin: Pos2,
        anchor_row: usize,
        button: PointerButton,
        modifiers: Modifiers,
        locator: &dyn RowLocator,
    ) -> Self {
        let mut session = Self {
            mode,
            origin,
            current: origin,
            rect: Rect::from_min_max(origin, origin),
            anchor_row,
            current_row: anchor_row,
            first_row: anchor_row,
            last_row: anchor_row,
            button,
            modifiers,
            create_start: None,
        };
        session.update(origin, locator);
        session
    }

    /// Recompute the rectangle from the origin to `pos`.
    pub fn update(&mut self, pos: Pos2, locator: &dyn RowLocator) {
        self.current = pos;
        match self.mode {
            RectMode::Create => {
                let (top, bottom) = locator
                    .bounds_of(self.anchor_row)
                    .map_or((self.origin.y, self.origin.y), |b| (b.top(), b.bottom()));
                self.rect = Rect::from_min_max(
                    Pos2::new(self.origin.x.min(pos.x), top),
                    Pos2::new(self.origin.x.max(pos.x), bottom),
                );
                if let Some(row) = locator.row_at(pos) {
                    self.current_row = row;
                }
            }
            RectMode::Select => {
                self.rect = Rect::from_two_pos(self.origin, pos);
                let growing_down = pos.y >= self.origin.y;
                let probe_y = if growing_down {
                    pos.y - EDGE_NUDGE
                } else {
                    pos.y + EDGE_NUDGE
                };
                if let Some(row) = locator.row_at(Pos2::new(pos.x, probe_y)) {
                    self.current_row = row;
                }
                if growing_down {
                    self.first_row = self.anchor_row;
                    self.last_row = self.current_row.max(self.anchor_row);
                } else {
                    self.first_row = self.current_row.min(self.anchor_row);
                    self.last_row = self.anchor_row;
                }
            }
        }
    }

    pub fn covers_row(&self, row: usize) -> bool {
        (self.first_row..=self.last_row).contains(&row)
    }
}
