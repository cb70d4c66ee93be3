//! Model-wide and per-layer configuration.
//!
//! Layer settings are resolved once, at construction: a value set on the layer
//! wins, anything left unset falls back to the model configuration.

use crate::{LayerError, RepresentationMode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use stratum_data::AggregationStrategy;
use stratum_scene::Color;
use thiserror::Error;
use tracing::error;

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Base colors per layer type, as 0xRRGGBB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayerPalette {
    pub up_sampling1d: u32,
}

impl Default for LayerPalette {
    fn default() -> Self {
        Self {
            up_sampling1d: 0xFFFFFF,
        }
    }
}

/// Settings shared by every layer of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelConfig {
    /// Whether layers start open.
    pub layer_init_status: bool,
    pub color: LayerPalette,
    /// Draw lines to related upstream elements on hover.
    pub relation_system: bool,
    /// Show a label on the hovered strip.
    pub text_system: bool,
    pub aggregation_strategy: AggregationStrategy,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            layer_init_status: false,
            color: LayerPalette::default(),
            relation_system: true,
            text_system: true,
            aggregation_strategy: AggregationStrategy::Average,
        }
    }
}

impl ModelConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

/// Configuration of a single UpSampling1d layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpSampling1dConfig {
    /// Upsampling factor along the spatial axis. Required.
    pub size: Option<usize>,
    pub init_status: Option<bool>,
    pub color: Option<u32>,
    pub relation_system: Option<bool>,
    pub text_system: Option<bool>,
    pub aggregation_strategy: Option<AggregationStrategy>,
}

impl UpSampling1dConfig {
    pub fn with_size(size: usize) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    /// Validate and merge with the model configuration.
    pub fn resolve(&self, model: &ModelConfig) -> Result<LayerSettings, LayerError> {
        let size = match self.size {
            Some(0) => {
                error!("UpSampling1d \"size\" must be at least 1");
                return Err(LayerError::InvalidSize(0));
            }
            Some(size) => size,
            None => {
                error!("\"size\" property is required for UpSampling1d layer.");
                return Err(LayerError::MissingSize);
            }
        };

        Ok(LayerSettings {
            size,
            initial_mode: RepresentationMode::from_open(
                self.init_status.unwrap_or(model.layer_init_status),
            ),
            color: Color::from_hex(self.color.unwrap_or(model.color.up_sampling1d)),
            relation_system: self.relation_system.unwrap_or(model.relation_system),
            text_system: self.text_system.unwrap_or(model.text_system),
            aggregation_strategy: self
                .aggregation_strategy
                .unwrap_or(model.aggregation_strategy),
        })
    }
}

/// Fully resolved settings of one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSettings {
    pub size: usize,
    pub initial_mode: RepresentationMode,
    pub color: Color,
    pub relation_system: bool,
    pub text_system: bool,
    pub aggregation_strategy: AggregationStrategy,
}

/// Configuration of the input layer heading a chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input1dConfig {
    pub width: usize,
    pub depth: usize,
    #[serde(default = "default_ratio")]
    pub real_virtual_ratio: f32,
}

fn default_ratio() -> f32 {
    1.0
}
