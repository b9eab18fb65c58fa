//! Coverage inventory: the encode-side input.
//!
//! An inventory is an ordered list of items, each pairing a dataset with an
//! inclusive lon/lat bounding box (WGS84 degrees) and the maximum zoom at
//! which that dataset applies. The inventory also determines the base zoom
//! before the core encode runs: an explicit override wins, otherwise a
//! full-coverage item supplies both the base zoom and the base dataset,
//! otherwise the minimum `max_zoom` across items is used with no base
//! dataset.
//!
//! Items are owned by the caller and read-only to the core.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::coord::{self, MAX_ZOOM};
use crate::error::EncodeError;
use crate::map::DatasetEntry;

/// Grid used to judge whether an item covers the whole world: every row
/// and column at this zoom must be touched by the item's footprint.
const WORLD_TEST_ZOOM: u8 = 8;

/// One rectangle of declared coverage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Dataset this rectangle belongs to (bare name or metadata record).
    pub dataset: DatasetEntry,
    /// Western edge, degrees (inclusive).
    pub min_lon: f64,
    /// Eastern edge, degrees (inclusive). Less than `min_lon` when the
    /// rectangle crosses the antimeridian.
    pub max_lon: f64,
    /// Southern edge, degrees (inclusive).
    pub min_lat: f64,
    /// Northern edge, degrees (inclusive).
    pub max_lat: f64,
    /// Most detailed zoom at which this dataset applies.
    pub max_zoom: u8,
}

impl InventoryItem {
    /// Convenience constructor for a bare-name dataset.
    pub fn named(
        name: &str,
        min_lon: f64,
        max_lon: f64,
        min_lat: f64,
        max_lat: f64,
        max_zoom: u8,
    ) -> Self {
        Self {
            dataset: DatasetEntry::from(name),
            min_lon,
            max_lon,
            min_lat,
            max_lat,
            max_zoom,
        }
    }

    /// Checks the item for non-finite bounds and out-of-range zoom.
    ///
    /// Encoding fails whole on the first malformed item; a degenerate
    /// rectangle is never constructed from bad input.
    pub fn validate(&self, index: usize) -> Result<(), EncodeError> {
        let bounds = [
            ("min_lon", self.min_lon),
            ("max_lon", self.max_lon),
            ("min_lat", self.min_lat),
            ("max_lat", self.max_lat),
        ];
        for (field, value) in bounds {
            if !value.is_finite() {
                return Err(EncodeError::MalformedInput {
                    item: self.dataset.label().to_string(),
                    index,
                    reason: format!("non-finite {}: {}", field, value),
                });
            }
        }
        if self.max_zoom > MAX_ZOOM {
            return Err(EncodeError::MalformedInput {
                item: self.dataset.label().to_string(),
                index,
                reason: format!(
                    "max_zoom {} exceeds supported maximum {}",
                    self.max_zoom, MAX_ZOOM
                ),
            });
        }
        Ok(())
    }

    /// True when the item's footprint covers every tile of the
    /// [`WORLD_TEST_ZOOM`] grid.
    pub fn covers_world(&self) -> bool {
        let n = coord::tile_count(WORLD_TEST_ZOOM);

        let rows = coord::row_range(self.min_lat, self.max_lat, WORLD_TEST_ZOOM);
        if rows.y0 != 0 || rows.y1 != n - 1 {
            return false;
        }

        // Column spans may wrap and overlap, so mark coverage per column.
        let mut covered = vec![false; n as usize];
        for span in coord::column_ranges(self.min_lon, self.max_lon, WORLD_TEST_ZOOM) {
            for x in span.x0..=span.x1 {
                covered[x as usize] = true;
            }
        }
        covered.iter().all(|&c| c)
    }
}

/// An ordered list of inventory items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    items: Vec<InventoryItem>,
}

impl Inventory {
    /// Build an inventory from items, preserving their order.
    pub fn from_items(items: Vec<InventoryItem>) -> Self {
        Self { items }
    }

    /// Load an inventory from a JSON file (a list of items).
    pub fn load(path: &Path) -> Result<Self, EncodeError> {
        let file = File::open(path).map_err(|source| EncodeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let inventory: Inventory =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| EncodeError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::info!(
            path = %path.display(),
            items = inventory.items.len(),
            "Loaded coverage inventory"
        );
        Ok(inventory)
    }

    /// The items in declaration order.
    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Resolves the base zoom and the base dataset item.
    ///
    /// Returns the base zoom together with the index of the item supplying
    /// the base dataset, if any. An explicit override takes precedence for
    /// the zoom; the base dataset is the last full-coverage item either
    /// way. Without an override or a full-coverage item, the base zoom
    /// falls back to the minimum `max_zoom` across items.
    pub fn resolve_base(&self, override_zoom: Option<u8>) -> Result<(u8, Option<usize>), EncodeError> {
        if let Some(zoom) = override_zoom {
            if zoom > MAX_ZOOM {
                return Err(EncodeError::InvalidBaseZoom {
                    zoom,
                    max: MAX_ZOOM,
                });
            }
        }

        let base_item = self
            .items
            .iter()
            .rposition(|item| item.covers_world());

        let zbase = match (override_zoom, base_item) {
            (Some(zoom), _) => zoom,
            (None, Some(index)) => self.items[index].max_zoom,
            (None, None) => self
                .items
                .iter()
                .map(|item| item.max_zoom)
                .min()
                .ok_or(EncodeError::EmptyInventory)?,
        };

        Ok((zbase, base_item))
    }
}
