//! Tilespan - Zoom coverage maps for web-mercator tile pyramids
//!
//! This library answers, for a geographic point, "what is the most detailed
//! zoom level available, and from which dataset?" given an inventory of
//! overlapping rectangular coverage regions.
//!
//! An [`inventory::Inventory`] of lat/lon rectangles is encoded into a compact
//! [`map::TileAvailabilityMap`]: coverage is banded by zoom level and stored
//! as delta-coded column intervals per tile row. The map is decoded back into
//! an immutable [`index::CoverageIndex`] that resolves point and tile queries
//! in sublinear time.
//!
//! ```
//! use tilespan::inventory::{Inventory, InventoryItem};
//! use tilespan::map::build_availability_map;
//! use tilespan::index::CoverageIndex;
//!
//! let inventory = Inventory::from_items(vec![
//!     InventoryItem::named("planet", -180.0, 180.0, -85.0511, 85.0511, 12),
//!     InventoryItem::named("alps", 11.25, 16.875, 45.09, 48.92, 17),
//! ]);
//!
//! let map = build_availability_map(&inventory, None).unwrap();
//! let index = CoverageIndex::from_map(&map).unwrap();
//!
//! let (zoom, dataset) = index.dataset_here(47.0, 14.0);
//! assert_eq!(zoom, 17);
//! assert_eq!(index.dataset_label(dataset.unwrap()), "alps");
//! ```

pub mod coord;
pub mod error;
pub mod index;
pub mod inventory;
pub mod logging;
pub mod map;
pub mod overlay;

/// Crate version, used in diagnostics and CLI output.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
