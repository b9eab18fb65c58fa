//! `tilespan inspect` - show the contents of an availability map.

use std::path::Path;

use tilespan::index::CoverageIndex;
use tilespan::map::TileAvailabilityMap;

use crate::error::CliError;

/// Decode a map and print its summary.
pub fn run(map_path: &Path) -> Result<(), CliError> {
    let map = TileAvailabilityMap::load(map_path)?;
    let index = CoverageIndex::from_map(&map)?;

    println!("Availability map: {}", map_path.display());
    println!("  Format: {}", map.format);
    println!("  Zoom band: {} (base) to {}", index.zbase(), index.zmax());

    match index.base_dataset() {
        Some(id) => println!("  Base dataset: {}", index.dataset_label(id)),
        None => println!("  Base dataset: none"),
    }

    println!("  Datasets: {}", index.dataset_count());
    for id in 0..index.dataset_count() {
        println!("    [{}] {}", id, index.dataset_label(id as u16));
    }

    println!("  Levels:");
    for stats in index.level_stats() {
        if stats.row_count == 0 {
            println!("    z{}: empty", stats.zoom);
        } else {
            println!(
                "    z{}: {} rows, {} intervals, {} tiles",
                stats.zoom, stats.row_count, stats.interval_count, stats.tile_count
            );
        }
    }

    Ok(())
}
