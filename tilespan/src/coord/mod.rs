//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude)
//! and Web Mercator tile coordinates, plus the footprint projections used
//! when rasterizing inventory rectangles onto a tile grid.
//!
//! Out-of-range inputs are handled by the projection contract, not by
//! errors: latitude is clamped to the Mercator band and longitude is
//! wrapped into [-180, 180).

mod types;

pub use types::{ColumnSpan, RowSpan, TileCoord, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON, MIN_ZOOM};

use std::f64::consts::PI;

/// Number of tiles along one axis of the grid at a zoom level.
#[inline]
pub fn tile_count(zoom: u8) -> u32 {
    1u32 << zoom.min(MAX_ZOOM)
}

/// Wraps a longitude into [-180, 180).
///
/// 180 maps to -180; both name the same meridian, the western edge of
/// column 0.
#[inline]
pub fn normalize_lon(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Converts a longitude to a tile column, clamped to the grid.
#[inline]
pub fn lon_to_column(lon: f64, zoom: u8) -> u32 {
    let n = tile_count(zoom);
    let col = ((lon + 180.0) / 360.0 * n as f64).floor() as i64;
    col.clamp(0, n as i64 - 1) as u32
}

/// Converts a latitude to a tile row, clamped to the grid.
///
/// Latitude is clamped to the Mercator band first; row 0 is the northern
/// edge of the grid.
#[inline]
pub fn lat_to_row(lat: f64, zoom: u8) -> u32 {
    let n = tile_count(zoom);
    let lat_rad = lat.clamp(MIN_LAT, MAX_LAT) * PI / 180.0;
    let row = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n as f64).floor() as i64;
    row.clamp(0, n as i64 - 1) as u32
}

/// Converts geographic coordinates to tile coordinates.
///
/// Latitude outside the Mercator band is clamped and longitude is wrapped,
/// so every input maps to some tile of the grid.
#[inline]
pub fn to_tile_coords(lat: f64, lon: f64, zoom: u8) -> TileCoord {
    TileCoord {
        row: lat_to_row(lat, zoom),
        col: lon_to_column(normalize_lon(lon), zoom),
        zoom,
    }
}

/// Projects a longitude range onto inclusive tile column spans.
///
/// Returns one span, or two when the range crosses the antimeridian
/// (`min_lon > max_lon` after normalization): one ending at the grid's
/// eastern edge and one starting at column 0. A range spanning 360 degrees
/// or more covers the full grid.
pub fn column_ranges(min_lon: f64, max_lon: f64, zoom: u8) -> Vec<ColumnSpan> {
    let n = tile_count(zoom);

    if max_lon - min_lon >= 360.0 {
        return vec![ColumnSpan { x0: 0, x1: n - 1 }];
    }

    let min = normalize_lon(min_lon);
    let max = normalize_lon(max_lon);

    if min > max {
        // Antimeridian crossing: western part runs to the grid edge, the
        // remainder wraps around to column 0.
        vec![
            ColumnSpan {
                x0: lon_to_column(min, zoom),
                x1: n - 1,
            },
            ColumnSpan {
                x0: 0,
                x1: lon_to_column(max, zoom),
            },
        ]
    } else {
        vec![ColumnSpan {
            x0: lon_to_column(min, zoom),
            x1: lon_to_column(max, zoom),
        }]
    }
}

/// Projects a latitude range onto an inclusive tile row span.
///
/// The northern edge (`max_lat`) produces the smaller row index. Passing
/// `min_lat < max_lat` yields a span with `y0 <= y1`; a caller that feeds
/// an inverted range gets an empty span back (`y0 > y1`) and is expected
/// to drop it.
pub fn row_range(min_lat: f64, max_lat: f64, zoom: u8) -> RowSpan {
    RowSpan {
        y0: lat_to_row(max_lat, zoom),
        y1: lat_to_row(min_lat, zoom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_york_city_at_zoom_16() {
        // New York City: 40.7128°N, 74.0060°W
        let tile = to_tile_coords(40.7128, -74.0060, 16);
        assert_eq!(tile.row, 24640);
        assert_eq!(tile.col, 19295);
        assert_eq!(tile.zoom, 16);
    }

    #[test]
    fn test_out_of_band_latitude_clamps_to_grid_edges() {
        assert_eq!(to_tile_coords(90.0, 0.0, 10).row, 0);
        assert_eq!(to_tile_coords(-90.0, 0.0, 10).row, tile_count(10) - 1);
    }

    #[test]
    fn test_longitude_wraps_across_the_seam() {
        let west = to_tile_coords(0.0, -180.0, 8);
        let east = to_tile_coords(0.0, 180.0, 8);
        assert_eq!(west.col, 0);
        // 180 and -180 are the same meridian
        assert_eq!(east.col, 0);

        assert_eq!(
            to_tile_coords(0.0, 190.0, 8).col,
            to_tile_coords(0.0, -170.0, 8).col
        );
    }

    #[test]
    fn test_full_longitude_range_covers_the_grid() {
        let spans = column_ranges(-180.0, 180.0, 5);
        assert_eq!(spans, vec![ColumnSpan { x0: 0, x1: 31 }]);
    }

    #[test]
    fn test_simple_longitude_range_is_single_span() {
        let spans = column_ranges(11.25, 16.875, 17);
        assert_eq!(
            spans,
            vec![ColumnSpan {
                x0: 69632,
                x1: 71680
            }]
        );
    }

    #[test]
    fn test_antimeridian_range_splits_into_two_spans() {
        let spans = column_ranges(170.0, -170.0, 5);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0], ColumnSpan { x0: 31, x1: 31 });
        assert_eq!(spans[1], ColumnSpan { x0: 0, x1: 0 });
    }

    #[test]
    fn test_row_range_puts_north_first() {
        let span = row_range(45.09, 48.92, 17);
        assert!(span.y0 < span.y1, "northern edge must be the smaller row");

        // The span must bracket a point inside the latitude band.
        let inside = lat_to_row(47.0, 17);
        assert!(span.y0 <= inside && inside <= span.y1);
    }

    #[test]
    fn test_inverted_latitude_range_is_empty() {
        let span = row_range(48.92, 45.09, 10);
        assert!(span.y0 > span.y1);
    }

    #[test]
    fn test_polar_latitudes_clamp_to_full_height() {
        let span = row_range(-90.0, 90.0, 4);
        assert_eq!(span, RowSpan { y0: 0, y1: 15 });
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_tile_coords_in_bounds(
                lat in -90.0..90.0_f64,
                lon in -360.0..360.0_f64,
                zoom in 0u8..=18
            ) {
                let tile = to_tile_coords(lat, lon, zoom);
                let max_tile = tile_count(zoom);
                prop_assert!(tile.row < max_tile);
                prop_assert!(tile.col < max_tile);
            }

            #[test]
            fn test_longitude_monotonic(
                lat in 0.0..1.0_f64,
                lon1 in -180.0..-90.0_f64,
                lon2 in -90.0..0.0_f64,
                zoom in 10u8..=15
            ) {
                // For fixed latitude, increasing longitude never decreases
                // the column.
                let tile1 = to_tile_coords(lat, lon1, zoom);
                let tile2 = to_tile_coords(lat, lon2, zoom);
                prop_assert!(tile1.col <= tile2.col);
            }

            #[test]
            fn test_latitude_monotonic_north_up(
                lon in -10.0..10.0_f64,
                lat1 in -80.0..0.0_f64,
                lat2 in 0.0..80.0_f64,
                zoom in 5u8..=12
            ) {
                // Rows grow southward: the northern point has the smaller
                // or equal row index.
                let south = to_tile_coords(lat1, lon, zoom);
                let north = to_tile_coords(lat2, lon, zoom);
                prop_assert!(north.row <= south.row);
            }

            #[test]
            fn test_wrapped_longitude_equivalent(
                lat in -80.0..80.0_f64,
                lon in -180.0..180.0_f64,
                zoom in 0u8..=16
            ) {
                let here = to_tile_coords(lat, lon, zoom);
                let wrapped = to_tile_coords(lat, lon + 360.0, zoom);
                prop_assert_eq!(here.col, wrapped.col);
                prop_assert_eq!(here.row, wrapped.row);
            }

            #[test]
            fn test_column_ranges_in_bounds(
                min_lon in -360.0..360.0_f64,
                width in 0.0..360.0_f64,
                zoom in 0u8..=16
            ) {
                let spans = column_ranges(min_lon, min_lon + width, zoom);
                prop_assert!(!spans.is_empty());
                prop_assert!(spans.len() <= 2);
                for span in spans {
                    prop_assert!(span.x0 <= span.x1);
                    prop_assert!(span.x1 < tile_count(zoom));
                }
            }

            #[test]
            fn test_column_ranges_cover_interior_points(
                min_lon in -170.0..160.0_f64,
                width in 0.5..20.0_f64,
                zoom in 4u8..=12
            ) {
                // The column of a point inside the range must land in one
                // of the produced spans.
                let mid = min_lon + width / 2.0;
                let col = to_tile_coords(0.0, mid, zoom).col;
                let spans = column_ranges(min_lon, min_lon + width, zoom);
                prop_assert!(
                    spans.iter().any(|s| s.x0 <= col && col <= s.x1),
                    "column {} not covered by {:?}", col, spans
                );
            }

            #[test]
            fn test_row_range_brackets_interior_points(
                min_lat in -80.0..70.0_f64,
                height in 0.5..10.0_f64,
                zoom in 4u8..=12
            ) {
                let mid = min_lat + height / 2.0;
                let row = to_tile_coords(mid, 0.0, zoom).row;
                let span = row_range(min_lat, min_lat + height, zoom);
                prop_assert!(span.y0 <= row && row <= span.y1);
            }
        }
    }
}
