//! Error types
//!
//! Only recoverable, reportable failures live here. Invalid phase transitions
//! requested by name are programming errors and panic instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("unknown phase name: {0:?}")]
    UnknownPhase(String),

    #[error("failed to read asset {path:?}: {source}")]
    AssetIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("asset {0:?} not found")]
    AssetMissing(String),

    #[error("failed to decode image {path:?}: {source}")]
    ImageDecode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("tile map is empty")]
    EmptyTileMap,

    #[error("tile map row {row} has {actual} tiles, expected {expected}")]
    RaggedTileMap {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("settings I/O failed: {0}")]
    SettingsIo(#[from] std::io::Error),

    #[error("settings are not valid JSON: {0}")]
    SettingsParse(#[from] serde_json::Error),
}
