//! Stacking depth of overlapping segments within one row.
//!
//! Intervals are half-open `[start, end)`: a segment ending exactly where the
//! next one starts does not overlap it.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::model::{Item, TimePoint, TimelineViewport};

/// Size of the largest set of intervals that are all open at one instant.
///
/// A row always reserves one slot, so the result is at least 1.
pub fn max_overlap_depth(intervals: &[(i64, i64)]) -> usize {
    // (time, delta): ends (-1) sort before starts (+1) at the same instant
    let mut events: Vec<(i64, i32)> = Vec::with_capacity(intervals.len() * 2);
    for &(start, end) in intervals {
        events.push((start, 1));
        events.push((end, -1));
    }
    events.sort_unstable();

    let mut open = 0i32;
    let mut max = 0i32;
    for (_, delta) in events {
        open += delta;
        max = max.max(open);
    }
    (max as usize).max(1)
}

/// Slot index of each interval, in input order.
///
/// Each interval takes the lowest slot not held by an interval still open at
/// its start; a slot is released when its interval ends.
pub fn stacking_slots(intervals: &[(i64, i64)]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..intervals.len()).collect();
    order.sort_by_key(|&i| (intervals[i].0, i));

    let mut slots = vec![0; intervals.len()];
    // (end, slot) of intervals still holding a slot
    let mut held: BinaryHeap<Reverse<(i64, usize)>> = BinaryHeap::new();
    let mut free: BinaryHeap<Reverse<usize>> = BinaryHeap::new();
    let mut next_slot = 0;

    for i in order {
        let (start, end) = intervals[i];
        while let Some(&Reverse((held_end, slot))) = held.peek() {
            if held_end > start {
                break;
            }
            held.pop();
            free.push(Reverse(slot));
        }
        let slot = match free.pop() {
            Some(Reverse(slot)) => slot,
            None => {
                next_slot += 1;
                next_slot - 1
            }
        };
        slots[i] = slot;
        held.push(Reverse((end, slot)));
    }
    slots
}

/// Depth of every caller row, computed over the items visible in `viewport`.
///
/// Items pointing at rows `>= row_count` are ignored.
pub fn row_depths<T: TimePoint>(
    items: &[Item<T>],
    row_count: usize,
    viewport: &TimelineViewport<T>,
) -> Vec<usize> {
    let mut per_row: Vec<Vec<(i64, i64)>> = vec![Vec::new(); row_count];
    for item in items {
        if item.row >= row_count || !item.intersects(viewport.start, viewport.end) {
            continue;
        }
        per_row[item.row].push(item.span_millis());
    }
    per_row.iter().map(|spans| max_overlap_depth(spans)).collect()
}
