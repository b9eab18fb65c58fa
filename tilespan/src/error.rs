//! Error types for encoding and decoding availability maps.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building an availability map from an inventory.
///
/// Every failure is terminal for the encode operation; there is nothing to
/// retry inside the core.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// An inventory item has missing or non-finite bounds, or an
    /// out-of-range zoom. Encoding fails whole rather than silently
    /// constructing a degenerate rectangle.
    #[error("inventory item '{item}' (#{index}): {reason}")]
    MalformedInput {
        /// Display label of the offending item's dataset.
        item: String,
        /// Position of the item in the inventory.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// The inventory has no items and no base zoom override was given,
    /// so there is no way to determine the base zoom.
    #[error("inventory is empty and no base zoom override was given")]
    EmptyInventory,

    /// The explicit base zoom override is outside the supported range.
    #[error("base zoom override {zoom} exceeds the supported maximum {max}")]
    InvalidBaseZoom { zoom: u8, max: u8 },

    /// Failed to read or write a file at the encode boundary.
    #[error("failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file at the encode boundary contained invalid JSON.
    #[error("invalid JSON in '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that can occur while decoding an availability map into a query
/// index.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The structure's format tag does not match what this decoder
    /// supports. Checked before any row data is touched.
    #[error("unsupported availability map format '{found}'")]
    FormatMismatch { found: String },

    /// A level's encoded row array does not match its declared shape:
    /// truncated row header, missing interval values, or an interval
    /// referencing a dataset outside the table.
    #[error("malformed level data at zoom {zoom}, row {row}: {detail}")]
    StructuralInconsistency {
        zoom: u8,
        row: u32,
        detail: String,
    },

    /// Failed to read a file at the decode boundary.
    #[error("failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file at the decode boundary contained invalid JSON.
    #[error("invalid JSON in '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
