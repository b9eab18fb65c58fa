//! Availability map construction.
//!
//! [`MapBuilder`] is the build context of one encode pass: the growing
//! dataset table and the per-level row maps. It is owned by the encode
//! operation, threaded through every step, and consumed when the final
//! structure is produced; there is no ambient state.

use std::collections::BTreeMap;

use crate::coord;
use crate::error::EncodeError;
use crate::inventory::Inventory;
use crate::overlay::{DatasetId, LevelRows};

use super::{DatasetEntry, EncodedLevel, TileAvailabilityMap, FORMAT_TAG};

/// Build context for one encode pass.
#[derive(Debug)]
pub struct MapBuilder {
    zbase: u8,
    zmax: u8,
    datasets: Vec<DatasetEntry>,
    base_dataset: Option<DatasetId>,
    levels: BTreeMap<u8, LevelRows>,
}

impl MapBuilder {
    /// Start a build for the zoom band `zbase+1 ..= zmax`.
    pub fn new(zbase: u8, zmax: u8) -> Self {
        Self {
            zbase,
            zmax,
            datasets: Vec::new(),
            base_dataset: None,
            levels: BTreeMap::new(),
        }
    }

    /// Interns a dataset entry, returning its dense id.
    ///
    /// Entries are deduplicated by equality; the table is append-only.
    /// `item_index` is only used for error context.
    pub fn intern_dataset(
        &mut self,
        entry: &DatasetEntry,
        item_index: usize,
    ) -> Result<DatasetId, EncodeError> {
        if let Some(id) = self.datasets.iter().position(|e| e == entry) {
            return Ok(id as DatasetId);
        }
        if self.datasets.len() > DatasetId::MAX as usize {
            return Err(EncodeError::MalformedInput {
                item: entry.label().to_string(),
                index: item_index,
                reason: "dataset table overflow".to_string(),
            });
        }
        self.datasets.push(entry.clone());
        Ok((self.datasets.len() - 1) as DatasetId)
    }

    /// Marks the dataset the base zoom falls back to.
    pub fn set_base_dataset(&mut self, id: DatasetId) {
        self.base_dataset = Some(id);
    }

    /// Mutable access to one zoom level's row map, materializing it on
    /// first use.
    pub fn level_mut(&mut self, zoom: u8) -> &mut LevelRows {
        debug_assert!(self.zbase < zoom && zoom <= self.zmax);
        self.levels.entry(zoom).or_default()
    }

    /// Produce the final serialized structure.
    pub fn finish(self) -> TileAvailabilityMap {
        let levels = (self.zbase + 1..=self.zmax)
            .map(|zoom| EncodedLevel {
                zoom,
                rows: self
                    .levels
                    .get(&zoom)
                    .map(encode_level_rows)
                    .unwrap_or_default(),
            })
            .collect();

        TileAvailabilityMap {
            format: FORMAT_TAG.to_string(),
            zbase: self.zbase,
            zmax: self.zmax,
            datasets: self.datasets,
            base_dataset: self.base_dataset,
            levels,
        }
    }
}

/// Delta-encodes one level's row maps into the flat integer array.
///
/// Row indices become deltas between consecutive non-empty rows; interval
/// start columns become gaps from a cursor that starts at column 0 and
/// jumps past each encoded interval. Clustered coverage therefore encodes
/// as small integers.
fn encode_level_rows(rows: &LevelRows) -> Vec<u32> {
    let mut out = Vec::with_capacity(rows.row_count() * 2 + rows.interval_count() * 3);
    let mut prev_row: Option<u32> = None;

    for (y, intervals) in rows.iter() {
        out.push(match prev_row {
            Some(prev) => y - prev,
            None => y,
        });
        out.push(intervals.len() as u32);
        prev_row = Some(y);

        let mut cursor = 0u32;
        for iv in intervals {
            out.push(iv.x0 - cursor);
            out.push(iv.x1 - iv.x0);
            out.push(iv.dataset as u32);
            cursor = iv.x1 + 1;
        }
    }
    out
}

/// Builds a [`TileAvailabilityMap`] from an inventory.
///
/// Validates every item, resolves the base zoom (see
/// [`Inventory::resolve_base`]), then overlays each item's footprint onto
/// the level matching its `max_zoom` in declaration order, so later items
/// override earlier ones wherever they overlap. Items at or below the base
/// zoom only contribute through base resolution.
pub fn build_availability_map(
    inventory: &Inventory,
    base_zoom_override: Option<u8>,
) -> Result<TileAvailabilityMap, EncodeError> {
    for (index, item) in inventory.items().iter().enumerate() {
        item.validate(index)?;
    }

    let (zbase, base_item) = inventory.resolve_base(base_zoom_override)?;
    let zmax = inventory
        .items()
        .iter()
        .map(|item| item.max_zoom)
        .max()
        .unwrap_or(zbase)
        .max(zbase);

    let mut builder = MapBuilder::new(zbase, zmax);

    for (index, item) in inventory.items().iter().enumerate() {
        let dataset = builder.intern_dataset(&item.dataset, index)?;

        if item.max_zoom <= zbase {
            tracing::debug!(
                dataset = item.dataset.label(),
                max_zoom = item.max_zoom,
                zbase,
                "Item is not above the base zoom, no interval coverage"
            );
            continue;
        }

        let rows = coord::row_range(item.min_lat, item.max_lat, item.max_zoom);
        if rows.y0 > rows.y1 {
            tracing::debug!(
                dataset = item.dataset.label(),
                "Dropping degenerate row range"
            );
            continue;
        }

        for span in coord::column_ranges(item.min_lon, item.max_lon, item.max_zoom) {
            if span.x0 > span.x1 {
                continue;
            }
            builder.level_mut(item.max_zoom).apply(rows, span, dataset);
        }
    }

    if let Some(index) = base_item {
        let id = builder.intern_dataset(&inventory.items()[index].dataset, index)?;
        builder.set_base_dataset(id);
    }

    let map = builder.finish();
    tracing::info!(
        zbase = map.zbase,
        zmax = map.zmax,
        datasets = map.datasets.len(),
        "Built availability map"
    );
    Ok(map)
}
