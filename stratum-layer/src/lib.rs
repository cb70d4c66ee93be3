//! Stratum Layer Crate
//!
//! One stage of a layered network, rendered as an interactive 3D object that
//! switches between a closed view (one aggregated row) and an open view (one
//! strip per channel).
//!
//! ## Modules
//!
//! - [`config`]: model-wide and per-layer configuration
//! - [`shape`]: output shape planning and channel anchor placement
//! - [`element`] / [`factory`]: visual elements and how they are built
//! - [`projector`]: output value to color buffers
//! - [`router`]: click and hover dispatch
//! - [`base`] / [`node`]: the shared lifecycle and the layer contract
//! - [`upsampling`]: the 1d upsampling layer
//! - [`input`]: a minimal input layer heading a chain

pub mod base;
pub mod config;
pub mod element;
pub mod error;
pub mod factory;
pub mod input;
pub mod mode;
pub mod node;
pub mod projector;
pub mod router;
pub mod shape;
pub mod upsampling;

pub use base::{LayerBase, LifecycleState};
pub use config::{ConfigError, Input1dConfig, LayerPalette, ModelConfig, UpSampling1dConfig};
pub use element::{CloseControl, ElementTarget, ElementView, GridElement, GridGeometry, GridKind};
pub use error::LayerError;
pub use factory::{ElementTemplate, GridElementFactory, VisualElementFactory};
pub use input::Input1d;
pub use mode::RepresentationMode;
pub use node::{Hook, LayerNode, UpstreamLayer};
pub use projector::ValueProjector;
pub use router::{HoverPlan, InteractionRouter, ModeRequest};
pub use shape::{CenterListBuilder, MirroredCenters, Shape, ShapePlanner, UpsamplingPlanner};
pub use upsampling::UpSampling1d;
