pub mod grid;
pub mod overlap;

pub use grid::{cell_kind, CellKind, GridCoordinator, GridRow, RowGeometry, RowLocator};
pub use overlap::{max_overlap_depth, row_depths, stacking_slots};
