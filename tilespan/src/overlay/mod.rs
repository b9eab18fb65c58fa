//! Row overlay engine
//!
//! Coverage at one zoom level is held as a sparse map from tile row index to
//! a list of dataset-tagged column intervals. Overlaying a rectangle's
//! footprint replaces whatever it covers ("last write wins") while leaving
//! untouched coverage intact.
//!
//! Within a row, interval lists maintain three invariants: sorted ascending
//! by start column, mutually disjoint, and maximal (no two adjacent
//! intervals share a dataset id).

use std::collections::BTreeMap;

use crate::coord::{ColumnSpan, RowSpan};

/// Interned dataset identifier, dense from 0.
pub type DatasetId = u16;

/// An inclusive tile-column range tagged with a dataset, valid within one
/// row of one zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    /// First covered column (inclusive)
    pub x0: u32,
    /// Last covered column (inclusive)
    pub x1: u32,
    /// Dataset that covers the range
    pub dataset: DatasetId,
}

impl Interval {
    /// Number of columns covered.
    #[inline]
    pub fn width(&self) -> u32 {
        self.x1 - self.x0 + 1
    }
}

/// Overlays `[x0, x1]` with `dataset` onto a row's interval list.
///
/// Returns a new list; the input is not modified. Existing intervals left
/// or right of the window are copied through, straddlers keep their
/// remainder outside the window under their original dataset, and the
/// window itself becomes exactly one interval tagged `dataset`. Adjacent
/// intervals that end up sharing a dataset are merged, so the result
/// satisfies the row invariants whenever the input does.
pub fn overlay(existing: &[Interval], x0: u32, x1: u32, dataset: DatasetId) -> Vec<Interval> {
    let mut out = Vec::with_capacity(existing.len() + 2);
    let mut tail = Vec::new();

    for iv in existing {
        if iv.x1 < x0 {
            out.push(*iv);
        } else if iv.x0 > x1 {
            tail.push(*iv);
        } else {
            // Straddlers keep the part outside the window.
            if iv.x0 < x0 {
                out.push(Interval {
                    x0: iv.x0,
                    x1: x0 - 1,
                    dataset: iv.dataset,
                });
            }
            if iv.x1 > x1 {
                tail.push(Interval {
                    x0: x1 + 1,
                    x1: iv.x1,
                    dataset: iv.dataset,
                });
            }
        }
    }

    out.push(Interval { x0, x1, dataset });
    out.extend(tail);
    merge_adjacent(out)
}

/// Coalesces touching intervals that share a dataset id.
fn merge_adjacent(intervals: Vec<Interval>) -> Vec<Interval> {
    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for iv in intervals {
        match merged.last_mut() {
            Some(last) if last.dataset == iv.dataset && last.x1 + 1 == iv.x0 => {
                last.x1 = iv.x1;
            }
            _ => merged.push(iv),
        }
    }
    merged
}

/// Sparse per-row coverage for one zoom level.
///
/// Rows with no intervals are never materialized. The ordered map gives
/// deterministic iteration order for encoding.
#[derive(Debug, Clone, Default)]
pub struct LevelRows {
    rows: BTreeMap<u32, Vec<Interval>>,
}

impl LevelRows {
    /// Create an empty level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlays a rectangle footprint (row span × column span) with
    /// `dataset`, one row at a time.
    pub fn apply(&mut self, rows: RowSpan, cols: ColumnSpan, dataset: DatasetId) {
        for y in rows.y0..=rows.y1 {
            let entry = self.rows.entry(y).or_default();
            *entry = overlay(entry, cols.x0, cols.x1, dataset);
        }
    }

    /// True when no row holds any interval.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of materialized rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Total number of intervals across all rows.
    pub fn interval_count(&self) -> usize {
        self.rows.values().map(Vec::len).sum()
    }

    /// Iterate rows in ascending row-index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[Interval])> {
        self.rows.iter().map(|(&y, ivs)| (y, ivs.as_slice()))
    }
}
