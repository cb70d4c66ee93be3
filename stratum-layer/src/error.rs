//! Error types for layer operations.

use crate::{LifecycleState, Shape};
use stratum_data::DataError;
use stratum_scene::SceneError;
use thiserror::Error;

/// Errors that can occur while assembling, driving or disposing a layer.
#[derive(Debug, Error)]
pub enum LayerError {
    #[error("\"size\" property is required for UpSampling1d layer")]
    MissingSize,

    #[error("UpSampling1d size must be at least 1, got {0}")]
    InvalidSize(usize),

    #[error("Input layer shape must be at least 1x1, got {width}x{depth}")]
    InvalidInputShape { width: usize, depth: usize },

    #[error("Cannot {operation} while layer is {state}")]
    InvalidState {
        operation: &'static str,
        state: LifecycleState,
    },

    #[error("Upsampling {upstream} by {size} overflows the output shape")]
    OutputTooLarge { upstream: Shape, size: usize },

    #[error("Upstream layer has not been assembled")]
    UpstreamNotAssembled,

    #[error("Expected {expected} channel centers from upstream, found {found}")]
    CenterCountMismatch { expected: usize, found: usize },

    #[error("Expected a value of length {expected}, got {actual}")]
    ValueLength { expected: usize, actual: usize },

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

}
