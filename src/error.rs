//! Error types raised by the radar.

use thiserror::Error;

/// Why a single spot record could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordParseError {
    #[error("record is empty")]
    Empty,

    #[error("spot header needs 3 comma separated fields, found {0}")]
    HeaderFields(usize),

    #[error("tile needs 2 comma separated fields, found {0}")]
    TileFields(usize),

    #[error("record is not valid UTF-8")]
    InvalidUtf8,

    #[error("invalid integer {0:?}")]
    InvalidInteger(String),

    #[error("map index {index} out of range (maps: {maps})")]
    MapOutOfRange { index: u8, maps: u8 },
}

/// Errors surfaced by the marked spot store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed record on line {line}: {reason}")]
    Malformed {
        line: usize,
        reason: RecordParseError,
    },
}

/// Errors surfaced out of the controller loop.
#[derive(Debug, Error)]
pub enum RadarError {
    #[error("marked spot store: {0}")]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, RadarError>;
