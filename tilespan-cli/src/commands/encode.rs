//! `tilespan encode` - build an availability map from an inventory.

use std::path::Path;

use tilespan::index::CoverageIndex;
use tilespan::inventory::Inventory;
use tilespan::map::build_availability_map;

use crate::error::CliError;

/// Load an inventory, build the availability map, and write it out.
pub fn run(
    inventory_path: &Path,
    output_path: &Path,
    base_zoom: Option<u8>,
) -> Result<(), CliError> {
    let inventory = Inventory::load(inventory_path)?;
    println!(
        "Encoding {} inventory items from {}",
        inventory.len(),
        inventory_path.display()
    );

    let map = build_availability_map(&inventory, base_zoom)?;
    map.save(output_path)?;

    // Decode our own output for the summary; this also proves the
    // artifact round-trips.
    let index = CoverageIndex::from_map(&map)?;

    println!("Wrote {}", output_path.display());
    println!("  Base zoom: {}", index.zbase());
    match index.base_dataset() {
        Some(id) => println!("  Base dataset: {}", index.dataset_label(id)),
        None => println!("  Base dataset: none"),
    }
    println!("  Datasets: {}", index.dataset_count());
    for stats in index.level_stats() {
        if stats.row_count == 0 {
            continue;
        }
        println!(
            "  z{}: {} rows, {} intervals, {} tiles",
            stats.zoom, stats.row_count, stats.interval_count, stats.tile_count
        );
    }

    Ok(())
}
