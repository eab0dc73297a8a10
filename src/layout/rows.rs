use super::TimeScale;
use crate::ir::TimedEvent;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowSlot {
    pub row: usize,
    pub x_start: f32,
    pub x_end: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowPacking {
    /// Parallel to the input events.
    pub slots: Vec<RowSlot>,
    /// Rows needed to draw the packing; at least 1.
    pub row_count: usize,
}

/// Half-open pixel intervals `[s1, e1)` and `[s2, e2)` overlap unless one
/// ends at or before the other starts.
pub fn pixel_overlap(a: (f32, f32), b: (f32, f32)) -> bool {
    !(a.1 <= b.0 || a.0 >= b.1)
}

/// Greedy first-fit packing in input order. Overlap is tested on mapped
/// pixel positions, so bars that only collide in time at sub-pixel scale can
/// still share a row. Not minimal in row count.
pub fn assign_rows(events: &[TimedEvent], scale: &TimeScale) -> RowPacking {
    let mut rows: Vec<Vec<(f32, f32)>> = Vec::new();
    let mut slots = Vec::with_capacity(events.len());

    for event in events {
        let span = (scale.x(event.start), scale.x(event.end));
        let free = rows
            .iter()
            .position(|placed| placed.iter().all(|other| !pixel_overlap(span, *other)));
        let row = match free {
            Some(row) => row,
            None => {
                rows.push(Vec::new());
                rows.len() - 1
            }
        };
        rows[row].push(span);
        slots.push(RowSlot {
            row,
            x_start: span.0,
            x_end: span.1,
        });
    }

    RowPacking {
        slots,
        row_count: rows.len().max(1),
    }
}
