//! Error types for channel projection.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("Channel depth must be at least 1")]
    ZeroDepth,

    #[error("Value of length {len} cannot be split into {depth} channels")]
    UnevenChannels { len: usize, depth: usize },
}
