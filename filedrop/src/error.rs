//! Error types for filedrop operations.

use thiserror::Error;

use crate::codec::CodecError;

/// Convenient result type for filedrop operations.
pub type FiledropResult<T> = Result<T, FiledropError>;

/// Errors that can occur while loading or merging tabular files.
///
/// Lookup misses (no file type for a key, an absent object) are not errors
/// and are represented as empty results at their call sites; this enum covers
/// the genuinely faulty paths.
#[derive(Error, Debug)]
pub enum FiledropError {
    /// A file type failed validation before use.
    #[error("invalid file type configuration: {0}")]
    InvalidFileType(String),

    /// A table is missing the primary-key column required to process it.
    #[error("column `{column}` not found in `{object}`")]
    MissingKeyColumn { column: String, object: String },

    /// The object store failed an operation.
    #[error("object store error for `{address}`: {reason}")]
    Store { address: String, reason: String },

    /// Delimited content could not be parsed.
    #[error("malformed delimited content: {0}")]
    Codec(#[from] CodecError),
}
