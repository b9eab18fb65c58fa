//! `tilespan query` - resolve coverage at a geographic point.

use std::path::Path;

use tilespan::index::CoverageIndex;
use tilespan::map::TileAvailabilityMap;

use crate::error::CliError;

/// Decode a map and answer a point query.
pub fn run(map_path: &Path, lat: f64, lon: f64) -> Result<(), CliError> {
    let map = TileAvailabilityMap::load(map_path)?;
    let index = CoverageIndex::from_map(&map)?;

    let (zoom, dataset) = index.dataset_here(lat, lon);

    println!("Location: {}, {}", lat, lon);
    println!("  Max zoom: {}", zoom);
    match dataset {
        Some(id) => println!("  Dataset: {}", index.dataset_label(id)),
        None => println!("  Dataset: none"),
    }

    Ok(())
}
