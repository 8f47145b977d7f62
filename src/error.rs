use std::path::PathBuf;
use thiserror::Error;

use crate::format::FormatId;
use crate::rep::RepresentationKind;

/// The main error type for multirep operations.
#[derive(Debug, Error)]
pub enum MultirepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse volume descriptor {path}: {source}")]
    DescriptorParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to write volume descriptor {path}: {source}")]
    DescriptorWrite {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unknown format name: '{0}'")]
    UnknownFormat(String),

    #[error("Failed to serialize report: {0}")]
    ReportSerialize(#[from] serde_json::Error),

    #[error("Raw file {path} holds {actual} bytes, expected {expected}")]
    RawSizeMismatch {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    #[error("No conversion path from {from:?} to {to:?}")]
    NoConversionPath {
        from: RepresentationKind,
        to: RepresentationKind,
    },

    #[error("Container holds no authoritative representation")]
    NoAuthoritative,

    #[error("Container has no {0:?} representation to edit")]
    MissingRepresentation(RepresentationKind),

    #[error("Converter registry is finalized; registration is no longer allowed")]
    RegistryFrozen,

    #[error("Geometry mismatch: representation is {actual:?}, container is {expected:?}")]
    GeometryMismatch {
        expected: crate::dims::Dims3,
        actual: crate::dims::Dims3,
    },

    #[error("Format mismatch: representation is {actual}, container is {expected}")]
    FormatMismatch { expected: FormatId, actual: FormatId },

    #[error("Buffer of {actual} bytes does not match expected size {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("Invalid dimensions: {0}")]
    InvalidDims(String),

    #[error("Unsupported byte order: {0}")]
    UnsupportedByteOrder(String),
}
