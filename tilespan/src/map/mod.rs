//! Serialized availability map structure.
//!
//! [`TileAvailabilityMap`] is the wire/storage form of a coverage map:
//! a format tag, the zoom band (`zbase`, `zmax`), the dataset table, an
//! optional base dataset, and one delta-coded row array per zoom level.
//! The deltas are plain integers in the structural representation; no
//! bit-level framing is involved, so the JSON form stays human-inspectable.
//!
//! [`build_availability_map`] produces the structure from an inventory;
//! [`crate::index::CoverageIndex`] decodes it back for querying.

mod builder;

pub use builder::{build_availability_map, MapBuilder};

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, EncodeError};
use crate::overlay::DatasetId;

/// Format tag distinguishing the row-indexed representation from sibling
/// encodings.
pub const FORMAT_TAG: &str = "tilespan-rows/1";

/// One entry of the dataset table.
///
/// Sources are declared either as a bare name or as a structured metadata
/// record; the distinction only exists at this boundary. The core works
/// with the interned integer id throughout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DatasetEntry {
    /// A plain dataset name.
    Name(String),
    /// A structured record; `name` is the conventional display key.
    Metadata(BTreeMap<String, String>),
}

impl DatasetEntry {
    /// Display label for diagnostics and query output.
    pub fn label(&self) -> &str {
        match self {
            DatasetEntry::Name(name) => name,
            DatasetEntry::Metadata(map) => {
                map.get("name").map(String::as_str).unwrap_or("unnamed")
            }
        }
    }
}

impl From<&str> for DatasetEntry {
    fn from(name: &str) -> Self {
        DatasetEntry::Name(name.to_string())
    }
}

/// One zoom level's encoded coverage.
///
/// `rows` is a flat integer array with shape
/// `[row_delta, interval_count, (col_gap, length, dataset_id) × interval_count, ...]`
/// per non-empty row:
/// - `row_delta`: difference to the previous non-empty row's index; the
///   first row stores its absolute index.
/// - `col_gap`: gap between the interval's start column and the column
///   immediately after the previous interval's end, with an implicit
///   cursor starting at column 0.
/// - `length`: `x1 - x0`, so the decoder reconstructs the end column by
///   addition alone.
/// - `dataset_id`: stored literally; it is an arbitrary small index, not a
///   quantity with locality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedLevel {
    /// Zoom value of this level.
    pub zoom: u8,
    /// Delta-coded row/interval array; empty for levels with no coverage.
    pub rows: Vec<u32>,
}

/// The complete built artifact of an encode pass.
///
/// Constructed once from a finished inventory, persisted or transmitted
/// as-is, and reconstructed into an immutable query index at decode time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileAvailabilityMap {
    /// Format tag; must equal [`FORMAT_TAG`] for this decoder.
    pub format: String,
    /// Base zoom: coverage assumed everywhere below this level.
    pub zbase: u8,
    /// Highest encoded zoom.
    pub zmax: u8,
    /// Interned dataset table, index-addressed.
    pub datasets: Vec<DatasetEntry>,
    /// Index of the base dataset in `datasets`, if any.
    pub base_dataset: Option<DatasetId>,
    /// Levels in ascending zoom order, covering `zbase+1 ..= zmax`.
    pub levels: Vec<EncodedLevel>,
}

impl TileAvailabilityMap {
    /// Load a serialized map from a JSON file.
    pub fn load(path: &Path) -> Result<Self, DecodeError> {
        let file = File::open(path).map_err(|source| DecodeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| DecodeError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the map to a JSON file.
    ///
    /// Writes to a temp file first, then renames, so readers never observe
    /// a partially written map.
    pub fn save(&self, path: &Path) -> Result<(), EncodeError> {
        let io_err = |source| EncodeError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let temp_path = path.with_extension("tmp");
        let file = File::create(&temp_path).map_err(io_err)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self).map_err(|source| {
            EncodeError::Json {
                path: path.to_path_buf(),
                source,
            }
        })?;
        std::fs::rename(&temp_path, path).map_err(io_err)?;

        tracing::info!(
            path = %path.display(),
            datasets = self.datasets.len(),
            levels = self.levels.len(),
            "Saved availability map"
        );
        Ok(())
    }

    /// Dataset entry by interned id.
    pub fn dataset(&self, id: DatasetId) -> Option<&DatasetEntry> {
        self.datasets.get(id as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_entry_deserializes_bare_name() {
        let entry: DatasetEntry = serde_json::from_str("\"alps\"").unwrap();
        assert_eq!(entry, DatasetEntry::Name("alps".to_string()));
        assert_eq!(entry.label(), "alps");
    }

    #[test]
    fn test_dataset_entry_deserializes_metadata_record() {
        let entry: DatasetEntry =
            serde_json::from_str(r#"{"name": "alps", "provider": "eox"}"#).unwrap();
        assert_eq!(entry.label(), "alps");
        match entry {
            DatasetEntry::Metadata(map) => assert_eq!(map.get("provider").unwrap(), "eox"),
            other => panic!("expected metadata record, got {:?}", other),
        }
    }

    #[test]
    fn test_metadata_without_name_has_placeholder_label() {
        let entry: DatasetEntry = serde_json::from_str(r#"{"provider": "eox"}"#).unwrap();
        assert_eq!(entry.label(), "unnamed");
    }

    #[test]
    fn test_map_json_round_trip() {
        let map = TileAvailabilityMap {
            format: FORMAT_TAG.to_string(),
            zbase: 12,
            zmax: 14,
            datasets: vec![DatasetEntry::from("planet"), DatasetEntry::from("alps")],
            base_dataset: Some(0),
            levels: vec![
                EncodedLevel {
                    zoom: 13,
                    rows: vec![],
                },
                EncodedLevel {
                    zoom: 14,
                    rows: vec![100, 1, 5, 3, 1],
                },
            ],
        };

        let json = serde_json::to_string(&map).unwrap();
        let back: TileAvailabilityMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coverage.json");

        let map = TileAvailabilityMap {
            format: FORMAT_TAG.to_string(),
            zbase: 3,
            zmax: 4,
            datasets: vec![DatasetEntry::from("island")],
            base_dataset: None,
            levels: vec![EncodedLevel {
                zoom: 4,
                rows: vec![2, 1, 4, 0, 0],
            }],
        };

        map.save(&path).unwrap();
        let loaded = TileAvailabilityMap::load(&path).unwrap();
        assert_eq!(loaded, map);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = TileAvailabilityMap::load(Path::new("/nonexistent/map.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/map.json"));
    }
}
