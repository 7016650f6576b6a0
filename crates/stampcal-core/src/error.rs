use thiserror::Error;

use crate::image::Band;

#[derive(Error, Debug)]
pub enum StampcalError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing field `{0}`")]
    MissingField(String),

    #[error("Malformed value for `{field}`: {reason}")]
    MalformedValue { field: String, reason: String },

    #[error("Shape mismatch: pixel array is {actual_height}x{actual_width}, declared {declared_height}x{declared_width}")]
    ShapeMismatch {
        declared_height: usize,
        declared_width: usize,
        actual_height: usize,
        actual_width: usize,
    },

    #[error("Band {band} of stamp {stamp_id}: {source}")]
    Band {
        band: Band,
        stamp_id: String,
        #[source]
        source: Box<StampcalError>,
    },

    #[error("Catalog row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: Box<StampcalError>,
    },

    #[error("Active source index {index} out of range (total: {total})")]
    ActiveSourceOutOfRange { index: usize, total: usize },

    #[error("Empty catalog")]
    EmptyCatalog,

    #[error("Compositor error: {0}")]
    Compositor(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Coarse classification of an error, ignoring band/row context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    MissingField,
    MalformedValue,
    ShapeMismatch,
    IoFailure,
    Other,
}

impl StampcalError {
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Wrap with the band/stamp that produced the error.
    pub fn in_band(self, band: Band, stamp_id: &str) -> Self {
        Self::Band {
            band,
            stamp_id: stamp_id.to_string(),
            source: Box::new(self),
        }
    }

    /// Wrap with the catalog row index that produced the error.
    pub fn in_row(self, row: usize) -> Self {
        Self::Row {
            row,
            source: Box::new(self),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Band { source, .. } | Self::Row { source, .. } => source.kind(),
            Self::MissingField(_) => ErrorKind::MissingField,
            Self::MalformedValue { .. } => ErrorKind::MalformedValue,
            Self::ShapeMismatch { .. } => ErrorKind::ShapeMismatch,
            Self::Io(_) | Self::Csv(_) => ErrorKind::IoFailure,
            _ => ErrorKind::Other,
        }
    }
}

pub type Result<T> = std::result::Result<T, StampcalError>;
