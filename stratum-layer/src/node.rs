//! The contracts between a layer, its upstream layer and the orchestrator.

use crate::element::{ElementTarget, ElementView};
use crate::{LayerError, LifecycleState, Shape};
use glam::Vec3;
use stratum_scene::SceneGraph;

/// Connection point that relation lines between two layers are routed through.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hook {
    /// World-space position.
    pub position: Vec3,
}

impl Hook {
    pub fn at(position: Vec3) -> Self {
        Self { position }
    }
}

/// What a layer exposes to the layer directly downstream of it.
pub trait UpstreamLayer {
    /// `None` until the layer has been assembled.
    fn output_shape(&self) -> Option<Shape>;

    /// Per-channel anchors used when the layer is open.
    fn open_center_list(&self) -> &[Vec3];

    /// World-space length of one logical unit.
    fn real_virtual_ratio(&self) -> f32;

    fn is_open(&self) -> bool;

    /// The aggregation element, when closed and initialized.
    fn aggregation_element(&self) -> Option<ElementView>;

    /// The channel strips, when open and initialized.
    fn segregation_elements(&self) -> Vec<ElementView>;

    /// Hook handed to this layer's successor.
    fn next_hook(&self) -> Option<Hook>;
}

/// Lifecycle driven by the orchestrator that assembles a model.
///
/// Calls must follow `assemble` → `init` → (`update_value` | events)* →
/// `dispose`; out-of-order calls return [`LayerError::InvalidState`].
pub trait LayerNode: UpstreamLayer {
    fn layer_index(&self) -> usize;

    fn state(&self) -> LifecycleState;

    /// Derive shape, world-space sizing and channel anchors from `upstream`.
    fn assemble(&mut self, layer_index: usize, upstream: &dyn UpstreamLayer)
    -> Result<(), LayerError>;

    /// Build the elements for the current mode under a group at `center`.
    fn init(
        &mut self,
        scene: &mut dyn SceneGraph,
        upstream: &dyn UpstreamLayer,
        center: Vec3,
        depth_index: f32,
        next_hook: Option<Hook>,
    ) -> Result<(), LayerError>;

    /// Store a new output value and redraw the current representation.
    fn update_value(&mut self, scene: &mut dyn SceneGraph, value: Vec<f32>)
    -> Result<(), LayerError>;

    fn handle_click(
        &mut self,
        scene: &mut dyn SceneGraph,
        target: ElementTarget,
    ) -> Result<(), LayerError>;

    fn handle_hover_in(
        &mut self,
        scene: &mut dyn SceneGraph,
        upstream: &dyn UpstreamLayer,
        target: ElementTarget,
    ) -> Result<(), LayerError>;

    /// Clear hover decorations. Calling it with nothing shown is a no-op.
    fn handle_hover_out(&mut self, scene: &mut dyn SceneGraph) -> Result<(), LayerError>;

    /// Upstream elements to cross-highlight for `target`. Has no side effects.
    fn get_relative_elements(
        &self,
        target: ElementTarget,
        upstream: &dyn UpstreamLayer,
    ) -> Vec<ElementView>;

    /// Release every element and the layer's group.
    fn dispose(&mut self, scene: &mut dyn SceneGraph) -> Result<(), LayerError>;
}
