use egui::Color32;

use super::time::TimePoint;

/// A background decoration interval bound to one row.
///
/// Read-only to the interaction system.
#[derive(Debug, Clone)]
pub struct RowLayer<T> {
    pub row: usize,
    pub start: T,
    pub end: T,
    pub color: Color32,
}

impl<T: TimePoint> RowLayer<T> {
    pub fn new(row: usize, start: T, end: T, color: Color32) -> Self {
        Self {
            row,
            start,
            end,
            color,
        }
    }
}

/// Layers drawn behind `row`, in host order.
pub fn layers_for_row<T>(layers: &[RowLayer<T>], row: usize) -> impl Iterator<Item = &RowLayer<T>> {
    layers.iter().filter(move |l| l.row == row)
}
