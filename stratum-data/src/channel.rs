//! Channel projection for 1d layer outputs.
//!
//! Layer values arrive position-major: `value[position * depth + channel]`.

use crate::DataError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a closed layer collapses its channels into one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationStrategy {
    /// Largest value across channels.
    Max,
    /// Mean value across channels.
    #[default]
    Average,
}

impl fmt::Display for AggregationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationStrategy::Max => write!(f, "max"),
            AggregationStrategy::Average => write!(f, "average"),
        }
    }
}

fn positions(value: &[f32], depth: usize) -> Result<usize, DataError> {
    if depth == 0 {
        return Err(DataError::ZeroDepth);
    }
    if value.len() % depth != 0 {
        return Err(DataError::UnevenChannels {
            len: value.len(),
            depth,
        });
    }
    Ok(value.len() / depth)
}

/// Reorder a position-major value into channel-major order.
///
/// Channel `i` occupies `[i * width, (i + 1) * width)` of the result.
pub fn project_channels(value: &[f32], depth: usize) -> Result<Vec<f32>, DataError> {
    let width = positions(value, depth)?;
    let mut channels = Vec::with_capacity(value.len());
    for channel in 0..depth {
        channels.extend((0..width).map(|position| value[position * depth + channel]));
    }
    Ok(channels)
}

/// Collapse all channels into one value per position.
pub fn project_aggregate(
    value: &[f32],
    depth: usize,
    strategy: AggregationStrategy,
) -> Result<Vec<f32>, DataError> {
    positions(value, depth)?;
    let aggregated = value
        .chunks_exact(depth)
        .map(|cells| match strategy {
            AggregationStrategy::Max => cells.iter().copied().fold(f32::NEG_INFINITY, f32::max),
            AggregationStrategy::Average => cells.iter().sum::<f32>() / depth as f32,
        })
        .collect();
    Ok(aggregated)
}
