//! Stratum Data Crate
//!
//! Turns a layer's flat output value into the per-cell color buffers its
//! visual elements display. This crate knows nothing about layers or scenes
//! beyond the [`Color`](stratum_scene::Color) type.

pub mod channel;
pub mod color_map;
pub mod error;

pub use channel::{AggregationStrategy, project_aggregate, project_channels};
pub use color_map::{ColorMap, MinMaxColorMap};
pub use error::DataError;
