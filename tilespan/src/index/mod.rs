//! Decoder and query index.
//!
//! [`CoverageIndex`] reconstructs the absolute row and column coordinates
//! from a serialized [`TileAvailabilityMap`] by replaying the encoding:
//! row deltas accumulate into row indices, column gaps and lengths
//! accumulate into interval bounds, with the column cursor reset at the
//! start of every row.
//!
//! The index is immutable after construction. All queries take `&self`
//! and share no mutable state, so concurrent readers need no locking.

use crate::coord::{self, TileCoord};
use crate::error::DecodeError;
use crate::map::{DatasetEntry, TileAvailabilityMap, FORMAT_TAG};
use crate::overlay::DatasetId;

/// Per-level statistics, used for inspection output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelStats {
    pub zoom: u8,
    pub row_count: usize,
    pub interval_count: usize,
    /// Total number of covered tiles on this level.
    pub tile_count: u64,
}

/// One decoded zoom level: flat, binary-searchable arrays.
///
/// `row_index` is sorted ascending (carried over from encoding);
/// `row_spans[i]` is the half-open range of `intervals` belonging to
/// `row_index[i]`.
#[derive(Debug, Clone, Default)]
struct LevelIndex {
    row_index: Vec<u32>,
    row_spans: Vec<(u32, u32)>,
    interval_cols: Vec<(u32, u32)>,
    interval_datasets: Vec<DatasetId>,
}

impl LevelIndex {
    fn dataset_at(&self, x: u32, y: u32) -> Option<DatasetId> {
        let row = self.row_index.binary_search(&y).ok()?;
        let (start, end) = self.row_spans[row];
        for i in start as usize..end as usize {
            let (x0, x1) = self.interval_cols[i];
            if x0 <= x && x <= x1 {
                return Some(self.interval_datasets[i]);
            }
        }
        None
    }
}

/// Read-only point/tile query index over a decoded availability map.
#[derive(Debug, Clone)]
pub struct CoverageIndex {
    zbase: u8,
    zmax: u8,
    datasets: Vec<DatasetEntry>,
    base_dataset: Option<DatasetId>,
    /// Level for zoom `z` lives at offset `z - zbase - 1`.
    levels: Vec<LevelIndex>,
}

impl CoverageIndex {
    /// Decode a serialized map into a query index.
    ///
    /// The format tag is checked before any row data is touched. Row data
    /// that does not match its declared shape fails with the zoom and row
    /// where decoding stopped.
    pub fn from_map(map: &TileAvailabilityMap) -> Result<Self, DecodeError> {
        if map.format != FORMAT_TAG {
            return Err(DecodeError::FormatMismatch {
                found: map.format.clone(),
            });
        }

        if map.zmax > coord::MAX_ZOOM || map.zbase > map.zmax {
            return Err(DecodeError::StructuralInconsistency {
                zoom: map.zmax,
                row: 0,
                detail: format!(
                    "zoom band {}..{} is not within 0..{}",
                    map.zbase,
                    map.zmax,
                    coord::MAX_ZOOM
                ),
            });
        }

        let expected: Vec<u8> = (map.zbase + 1..=map.zmax).collect();
        let found: Vec<u8> = map.levels.iter().map(|l| l.zoom).collect();
        if found != expected {
            return Err(DecodeError::StructuralInconsistency {
                zoom: found.first().copied().unwrap_or(map.zbase),
                row: 0,
                detail: format!(
                    "levels cover zooms {:?}, expected {:?}",
                    found, expected
                ),
            });
        }

        let levels = map
            .levels
            .iter()
            .map(|level| decode_level(level.zoom, &level.rows, map.datasets.len()))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            zbase = map.zbase,
            zmax = map.zmax,
            datasets = map.datasets.len(),
            "Decoded availability map"
        );

        Ok(Self {
            zbase: map.zbase,
            zmax: map.zmax,
            datasets: map.datasets.clone(),
            base_dataset: map.base_dataset,
            levels,
        })
    }

    /// Dataset covering one tile, if any level encodes it.
    ///
    /// Binary-searches the level's row array, then scans the few
    /// intervals of the matched row.
    pub fn dataset_for_tile(&self, zoom: u8, x: u32, y: u32) -> Option<DatasetId> {
        if zoom <= self.zbase || zoom > self.zmax {
            return None;
        }
        self.levels[(zoom - self.zbase - 1) as usize].dataset_at(x, y)
    }

    /// Most detailed coverage at a geographic point.
    ///
    /// Probes levels from `zmax` downward; higher-zoom coverage is rare
    /// and local, so most queries resolve at the first populated level or
    /// fall through to the base. Latitude outside the Mercator band is
    /// clamped by the projection, never an error.
    pub fn dataset_here(&self, lat: f64, lon: f64) -> (u8, Option<DatasetId>) {
        for zoom in (self.zbase + 1..=self.zmax).rev() {
            let TileCoord { row, col, .. } = coord::to_tile_coords(lat, lon, zoom);
            if let Some(dataset) = self.dataset_for_tile(zoom, col, row) {
                return (zoom, Some(dataset));
            }
        }
        (self.zbase, self.base_dataset)
    }

    /// Most detailed zoom available at a geographic point.
    pub fn max_zoom_at(&self, lat: f64, lon: f64) -> u8 {
        self.dataset_here(lat, lon).0
    }

    /// Base zoom of the map.
    pub fn zbase(&self) -> u8 {
        self.zbase
    }

    /// Highest encoded zoom.
    pub fn zmax(&self) -> u8 {
        self.zmax
    }

    /// The base dataset id, if the map declares one.
    pub fn base_dataset(&self) -> Option<DatasetId> {
        self.base_dataset
    }

    /// Dataset table entry by id.
    pub fn dataset(&self, id: DatasetId) -> Option<&DatasetEntry> {
        self.datasets.get(id as usize)
    }

    /// Display label for a dataset id.
    pub fn dataset_label(&self, id: DatasetId) -> &str {
        self.dataset(id).map(DatasetEntry::label).unwrap_or("unknown")
    }

    /// Number of entries in the dataset table.
    pub fn dataset_count(&self) -> usize {
        self.datasets.len()
    }

    /// Per-level statistics in ascending zoom order.
    pub fn level_stats(&self) -> Vec<LevelStats> {
        self.levels
            .iter()
            .enumerate()
            .map(|(offset, level)| LevelStats {
                zoom: self.zbase + 1 + offset as u8,
                row_count: level.row_index.len(),
                interval_count: level.interval_cols.len(),
                tile_count: level
                    .interval_cols
                    .iter()
                    .map(|&(x0, x1)| (x1 - x0 + 1) as u64)
                    .sum(),
            })
            .collect()
    }
}

/// Decodes one level's flat array back into absolute coordinates.
fn decode_level(zoom: u8, data: &[u32], dataset_count: usize) -> Result<LevelIndex, DecodeError> {
    let grid = coord::tile_count(zoom) as u64;
    let mut level = LevelIndex::default();
    let mut i = 0usize;
    let mut prev_row: Option<u32> = None;

    while i < data.len() {
        if data.len() - i < 2 {
            return Err(DecodeError::StructuralInconsistency {
                zoom,
                row: prev_row.unwrap_or(0),
                detail: format!("truncated row header at offset {}", i),
            });
        }
        let delta = data[i];
        let count = data[i + 1] as usize;
        i += 2;

        let row64 = match prev_row {
            Some(prev) => {
                if delta == 0 {
                    return Err(DecodeError::StructuralInconsistency {
                        zoom,
                        row: prev,
                        detail: "zero row delta would duplicate a row".to_string(),
                    });
                }
                prev as u64 + delta as u64
            }
            None => delta as u64,
        };
        if row64 >= grid {
            return Err(DecodeError::StructuralInconsistency {
                zoom,
                row: prev_row.unwrap_or(0),
                detail: format!("row index {} outside the {}-row grid", row64, grid),
            });
        }
        let row = row64 as u32;
        prev_row = Some(row);

        if data.len() - i < count * 3 {
            return Err(DecodeError::StructuralInconsistency {
                zoom,
                row,
                detail: format!(
                    "row declares {} intervals but {} values remain",
                    count,
                    data.len() - i
                ),
            });
        }

        let start = level.interval_cols.len() as u32;
        let mut cursor = 0u32;
        for _ in 0..count {
            let (gap, length, dataset) = (data[i], data[i + 1], data[i + 2]);
            i += 3;

            if dataset > DatasetId::MAX as u32 || dataset as usize >= dataset_count {
                return Err(DecodeError::StructuralInconsistency {
                    zoom,
                    row,
                    detail: format!(
                        "interval references dataset {} outside table of {}",
                        dataset, dataset_count
                    ),
                });
            }

            let x0 = cursor as u64 + gap as u64;
            let x1 = x0 + length as u64;
            if x1 >= grid {
                return Err(DecodeError::StructuralInconsistency {
                    zoom,
                    row,
                    detail: format!("interval end {} outside the {}-column grid", x1, grid),
                });
            }
            cursor = (x1 + 1) as u32;
            level.interval_cols.push((x0 as u32, x1 as u32));
            level.interval_datasets.push(dataset as DatasetId);
        }

        level.row_index.push(row);
        level
            .row_spans
            .push((start, level.interval_cols.len() as u32));
    }

    Ok(level)
}
