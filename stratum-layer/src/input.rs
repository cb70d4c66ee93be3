//! Minimal input layer heading a chain.

use crate::config::Input1dConfig;
use crate::element::ElementView;
use crate::node::{Hook, UpstreamLayer};
use crate::{LayerError, Shape};
use glam::Vec3;

/// Distance between neighbouring channel anchors, in world units.
const CHANNEL_INTERVAL: f32 = 5.0;

/// A fixed-shape input that is always open.
///
/// It draws nothing itself; it only supplies the shape, anchors and scale
/// the first real layer assembles from.
#[derive(Debug, Clone)]
pub struct Input1d {
    shape: Shape,
    real_virtual_ratio: f32,
    open_center_list: Vec<Vec3>,
    next_hook: Option<Hook>,
}

impl Input1d {
    pub fn new(width: usize, depth: usize) -> Result<Self, LayerError> {
        if width == 0 || depth == 0 {
            return Err(LayerError::InvalidInputShape { width, depth });
        }
        Ok(Self {
            shape: Shape::new(width, depth),
            real_virtual_ratio: 1.0,
            open_center_list: Self::channel_centers(depth),
            next_hook: None,
        })
    }

    pub fn from_config(config: &Input1dConfig) -> Result<Self, LayerError> {
        Ok(Self::new(config.width, config.depth)?.with_real_virtual_ratio(config.real_virtual_ratio))
    }

    pub fn with_real_virtual_ratio(mut self, ratio: f32) -> Self {
        self.real_virtual_ratio = ratio;
        self
    }

    pub fn set_next_hook(&mut self, hook: Option<Hook>) {
        self.next_hook = hook;
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Anchors spread along z, centered on the origin.
    fn channel_centers(depth: usize) -> Vec<Vec3> {
        let offset = (depth as f32 - 1.0) / 2.0;
        (0..depth)
            .map(|i| Vec3::new(0.0, 0.0, (i as f32 - offset) * CHANNEL_INTERVAL))
            .collect()
    }
}

impl UpstreamLayer for Input1d {
    fn output_shape(&self) -> Option<Shape> {
        Some(self.shape)
    }

    fn open_center_list(&self) -> &[Vec3] {
        &self.open_center_list
    }

    fn real_virtual_ratio(&self) -> f32 {
        self.real_virtual_ratio
    }

    fn is_open(&self) -> bool {
        true
    }

    fn aggregation_element(&self) -> Option<ElementView> {
        None
    }

    fn segregation_elements(&self) -> Vec<ElementView> {
        Vec::new()
    }

    fn next_hook(&self) -> Option<Hook> {
        self.next_hook
    }
}
