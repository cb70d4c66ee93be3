//! The 1d upsampling layer.
//!
//! Repeats each spatial position `size` times and keeps the channel count, so
//! it reuses the upstream layer's channel anchors and only stretches along
//! width.

use crate::base::{ActiveLabel, LayerBase, LifecycleState};
use crate::config::{ModelConfig, UpSampling1dConfig};
use crate::element::{CloseControl, ElementTarget, ElementView, GridElement, GridGeometry};
use crate::factory::{ElementTemplate, GridElementFactory, VisualElementFactory};
use crate::node::{Hook, LayerNode, UpstreamLayer};
use crate::projector::ValueProjector;
use crate::router::{InteractionRouter, ModeRequest};
use crate::shape::{CenterListBuilder, MirroredCenters, Shape, ShapePlanner, UpsamplingPlanner};
use crate::{LayerError, RepresentationMode};
use glam::Vec3;
use stratum_data::ColorMap;
use stratum_scene::{Color, GroupHandle, PrimitiveHandle, SceneError, SceneGraph};
use tracing::{debug, warn};

/// The element set of whichever representation is live.
enum LayerElements {
    /// Not initialized, or disposed.
    Empty,
    Closed {
        aggregation: GridElement,
    },
    Open {
        strips: Vec<GridElement>,
        close_control: CloseControl,
    },
}

/// Sizing fixed at assembly.
#[derive(Debug, Clone, Copy)]
struct Assembly {
    shape: Shape,
    real_virtual_ratio: f32,
    actual_width: f32,
    unit_length: f32,
}

pub struct UpSampling1d {
    base: LayerBase,
    size: usize,
    planner: Box<dyn ShapePlanner>,
    centers: Box<dyn CenterListBuilder>,
    factory: Box<dyn VisualElementFactory>,
    projector: ValueProjector,
    router: InteractionRouter,
    assembly: Option<Assembly>,
    open_center_list: Vec<Vec3>,
    elements: LayerElements,
}

impl UpSampling1d {
    /// Validate the layer configuration against the model configuration.
    ///
    /// Fails with [`LayerError::MissingSize`] when no `size` was given.
    pub fn new(config: &UpSampling1dConfig, model: &ModelConfig) -> Result<Self, LayerError> {
        let settings = config.resolve(model)?;

        Ok(Self {
            base: LayerBase::new(settings.initial_mode, settings.color),
            size: settings.size,
            planner: Box::new(UpsamplingPlanner::new(settings.size)),
            centers: Box::new(MirroredCenters),
            factory: Box::new(GridElementFactory),
            projector: ValueProjector::new(settings.aggregation_strategy),
            router: InteractionRouter::new(settings.relation_system, settings.text_system),
            assembly: None,
            open_center_list: Vec::new(),
            elements: LayerElements::Empty,
        })
    }

    pub fn with_factory(mut self, factory: Box<dyn VisualElementFactory>) -> Self {
        self.factory = factory;
        self
    }

    pub fn with_center_builder(mut self, centers: Box<dyn CenterListBuilder>) -> Self {
        self.centers = centers;
        self
    }

    pub fn with_color_map(mut self, color_map: Box<dyn ColorMap>) -> Self {
        self.projector = self.projector.with_color_map(color_map);
        self
    }

    /// Upsampling factor along width.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Lifecycle and hover bookkeeping.
    pub fn base(&self) -> &LayerBase {
        &self.base
    }

    /// Representation currently shown.
    pub fn mode(&self) -> RepresentationMode {
        self.base.mode()
    }

    /// `None` before assembly.
    pub fn shape(&self) -> Option<Shape> {
        self.assembly.map(|a| a.shape)
    }

    /// World-space width of a strip, `None` before assembly.
    pub fn actual_width(&self) -> Option<f32> {
        self.assembly.map(|a| a.actual_width)
    }

    /// World-space length of one cell, `None` before assembly.
    pub fn unit_length(&self) -> Option<f32> {
        self.assembly.map(|a| a.unit_length)
    }

    /// Last accepted output value, position-major.
    pub fn neural_value(&self) -> Option<&[f32]> {
        self.base.neural_value()
    }

    /// Label shown by the current hover, if any.
    pub fn active_label(&self) -> Option<ActiveLabel> {
        self.base.active_label()
    }

    /// Lines drawn by the current hover.
    pub fn relation_lines(&self) -> &[PrimitiveHandle] {
        self.base.relation_lines()
    }

    /// Number of channel strips; zero unless open.
    pub fn strip_count(&self) -> usize {
        match &self.elements {
            LayerElements::Open { strips, .. } => strips.len(),
            _ => 0,
        }
    }

    /// Whether the aggregation row is present.
    pub fn has_aggregation(&self) -> bool {
        matches!(self.elements, LayerElements::Closed { .. })
    }

    /// Whether the close control is present.
    pub fn has_close_control(&self) -> bool {
        matches!(self.elements, LayerElements::Open { .. })
    }

    /// Colors last pushed into strip `channel`, when open.
    pub fn strip_colors(&self, channel: usize) -> Option<&[Color]> {
        match &self.elements {
            LayerElements::Open { strips, .. } => strips.get(channel).map(GridElement::colors),
            _ => None,
        }
    }

    /// Colors last pushed into the aggregation, when closed.
    pub fn aggregation_colors(&self) -> Option<&[Color]> {
        match &self.elements {
            LayerElements::Closed { aggregation } => Some(aggregation.colors()),
            _ => None,
        }
    }

    /// Every element target currently present.
    pub fn element_targets(&self) -> Vec<ElementTarget> {
        match &self.elements {
            LayerElements::Empty => Vec::new(),
            LayerElements::Closed { aggregation } => vec![aggregation.target()],
            LayerElements::Open {
                strips,
                close_control,
            } => strips
                .iter()
                .map(GridElement::target)
                .chain(std::iter::once(close_control.target()))
                .collect(),
        }
    }

    /// Open the layer if it is closed.
    pub fn open_layer(&mut self, scene: &mut dyn SceneGraph) -> Result<(), LayerError> {
        self.switch_mode(scene, RepresentationMode::Open)
    }

    /// Close the layer if it is open.
    pub fn close_layer(&mut self, scene: &mut dyn SceneGraph) -> Result<(), LayerError> {
        self.switch_mode(scene, RepresentationMode::Closed)
    }

    fn assembly_for(&self, operation: &'static str) -> Result<Assembly, LayerError> {
        self.assembly.ok_or(LayerError::InvalidState {
            operation,
            state: self.base.state(),
        })
    }

    fn switch_mode(
        &mut self,
        scene: &mut dyn SceneGraph,
        mode: RepresentationMode,
    ) -> Result<(), LayerError> {
        self.base.expect_state("toggle", LifecycleState::Live)?;
        if self.base.mode() == mode {
            debug!("Layer {} already {}", self.base.layer_index(), mode);
            return Ok(());
        }

        let previous = self.base.mode();
        self.dispose_elements(scene)?;
        self.base.set_mode(mode);
        if let Err(err) = self.build_elements(scene) {
            warn!(
                "Layer {} could not switch to {}, restoring {}: {}",
                self.base.layer_index(),
                mode,
                previous,
                err
            );
            self.dispose_elements(scene)?;
            self.base.set_mode(previous);
            self.build_elements(scene)?;
            return Err(err);
        }
        debug!("Layer {} switched to {}", self.base.layer_index(), mode);
        Ok(())
    }

    /// Build the element set of the current mode and paint the held value.
    ///
    /// Elements are only stored once the whole set exists; a partial set is
    /// released before the error is returned.
    fn build_elements(&mut self, scene: &mut dyn SceneGraph) -> Result<(), LayerError> {
        let assembly = self.assembly_for("build elements")?;
        let group = self.base.group_for("build elements")?;
        let template = ElementTemplate {
            layer_index: self.base.layer_index(),
            geometry: GridGeometry {
                cells: assembly.shape.width,
                actual_width: assembly.actual_width,
                unit_length: assembly.unit_length,
            },
            color: self.base.color(),
        };

        let elements = match self.base.mode() {
            RepresentationMode::Open => self.build_open_elements(scene, group, &template)?,
            RepresentationMode::Closed => LayerElements::Closed {
                aggregation: self.factory.build_aggregation(scene, group, &template)?,
            },
        };
        self.elements = elements;

        self.refresh_vis(scene)
    }

    fn build_open_elements(
        &self,
        scene: &mut dyn SceneGraph,
        group: GroupHandle,
        template: &ElementTemplate,
    ) -> Result<LayerElements, LayerError> {
        let mut strips = Vec::with_capacity(self.open_center_list.len());
        for (channel, center) in self.open_center_list.iter().enumerate() {
            match self
                .factory
                .build_strip(scene, group, template, channel, *center)
            {
                Ok(strip) => strips.push(strip),
                Err(err) => return Err(self.abandon_strips(scene, group, strips, err)),
            }
        }

        match self
            .factory
            .build_close_control(scene, group, template, &self.open_center_list)
        {
            Ok(close_control) => Ok(LayerElements::Open {
                strips,
                close_control,
            }),
            Err(err) => Err(self.abandon_strips(scene, group, strips, err)),
        }
    }

    /// Release strips built before `err` and hand `err` back.
    fn abandon_strips(
        &self,
        scene: &mut dyn SceneGraph,
        group: GroupHandle,
        strips: Vec<GridElement>,
        err: SceneError,
    ) -> LayerError {
        for strip in strips {
            if let Err(cleanup) = strip.dispose(scene, group) {
                warn!(
                    "Layer {}: failed to release partial strip: {}",
                    self.base.layer_index(),
                    cleanup
                );
            }
        }
        err.into()
    }

    /// Tear down the current element set, hover decorations first.
    fn dispose_elements(&mut self, scene: &mut dyn SceneGraph) -> Result<(), LayerError> {
        self.base.clear_hover(scene)?;
        let elements = std::mem::replace(&mut self.elements, LayerElements::Empty);
        let Some(group) = self.base.group() else {
            return Ok(());
        };

        match elements {
            LayerElements::Empty => {}
            LayerElements::Closed { aggregation } => aggregation.dispose(scene, group)?,
            LayerElements::Open {
                strips,
                close_control,
            } => {
                for strip in strips {
                    strip.dispose(scene, group)?;
                }
                close_control.dispose(scene, group)?;
            }
        }
        Ok(())
    }

    /// Repaint the live representation from the held value, if any.
    fn refresh_vis(&mut self, scene: &mut dyn SceneGraph) -> Result<(), LayerError> {
        let Some(value) = self.base.neural_value() else {
            return Ok(());
        };
        let shape = self.assembly_for("update visualization")?.shape;

        match &mut self.elements {
            LayerElements::Empty => {}
            LayerElements::Open { strips, .. } => {
                let buffers = self.projector.segregation_colors(value, shape)?;
                for (strip, colors) in strips.iter_mut().zip(buffers) {
                    strip.update_vis(scene, colors)?;
                }
            }
            LayerElements::Closed { aggregation } => {
                let colors = self.projector.aggregation_colors(value, shape)?;
                aggregation.update_vis(scene, colors)?;
            }
        }
        Ok(())
    }

    /// World-space position of a target if it is currently present.
    fn target_position(&self, target: ElementTarget) -> Option<Vec3> {
        let origin = self.base.center();
        match (&self.elements, target) {
            (LayerElements::Closed { aggregation }, ElementTarget::Aggregation { .. }) => {
                Some(origin + aggregation.position())
            }
            (LayerElements::Open { strips, .. }, ElementTarget::Strip { channel, .. }) => {
                strips.get(channel).map(|strip| origin + strip.position())
            }
            (LayerElements::Open { close_control, .. }, ElementTarget::CloseControl { .. }) => {
                Some(origin + close_control.position())
            }
            _ => None,
        }
    }
}

impl UpstreamLayer for UpSampling1d {
    fn output_shape(&self) -> Option<Shape> {
        self.shape()
    }

    fn open_center_list(&self) -> &[Vec3] {
        &self.open_center_list
    }

    fn real_virtual_ratio(&self) -> f32 {
        self.assembly.map_or(1.0, |a| a.real_virtual_ratio)
    }

    fn is_open(&self) -> bool {
        self.base.mode().is_open()
    }

    fn aggregation_element(&self) -> Option<ElementView> {
        match &self.elements {
            LayerElements::Closed { aggregation } => Some(aggregation.view(self.base.center())),
            _ => None,
        }
    }

    fn segregation_elements(&self) -> Vec<ElementView> {
        match &self.elements {
            LayerElements::Open { strips, .. } => strips
                .iter()
                .map(|strip| strip.view(self.base.center()))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn next_hook(&self) -> Option<Hook> {
        self.base.next_hook()
    }
}

impl LayerNode for UpSampling1d {
    fn layer_index(&self) -> usize {
        self.base.layer_index()
    }

    fn state(&self) -> LifecycleState {
        self.base.state()
    }

    fn assemble(
        &mut self,
        layer_index: usize,
        upstream: &dyn UpstreamLayer,
    ) -> Result<(), LayerError> {
        self.base
            .expect_state("assemble", LifecycleState::Uninitialized)?;

        let input_shape = upstream
            .output_shape()
            .ok_or(LayerError::UpstreamNotAssembled)?;
        let shape = self.planner.plan(input_shape)?;
        let real_virtual_ratio = upstream.real_virtual_ratio();
        let actual_width = shape.width as f32 * real_virtual_ratio;
        let unit_length = actual_width / shape.width as f32;

        let centers = self
            .centers
            .build(upstream.open_center_list(), shape.depth)?;
        if centers.len() != shape.depth {
            return Err(LayerError::CenterCountMismatch {
                expected: shape.depth,
                found: centers.len(),
            });
        }
        self.open_center_list = centers;
        self.assembly = Some(Assembly {
            shape,
            real_virtual_ratio,
            actual_width,
            unit_length,
        });
        self.base.mark_assembled(layer_index);

        debug!(
            "Layer {} assembled: {} -> {} (size {}, actual width {})",
            layer_index, input_shape, shape, self.size, actual_width
        );
        Ok(())
    }

    fn init(
        &mut self,
        scene: &mut dyn SceneGraph,
        upstream: &dyn UpstreamLayer,
        center: Vec3,
        depth_index: f32,
        next_hook: Option<Hook>,
    ) -> Result<(), LayerError> {
        self.base.expect_state("init", LifecycleState::Assembled)?;

        self.base
            .open_group(scene, center, depth_index, upstream.next_hook(), next_hook);
        self.build_elements(scene)?;
        self.base.go_live(scene)
    }

    fn update_value(
        &mut self,
        scene: &mut dyn SceneGraph,
        value: Vec<f32>,
    ) -> Result<(), LayerError> {
        self.base.expect_state("update value", LifecycleState::Live)?;
        let expected = self.assembly_for("update value")?.shape.len();
        if value.len() != expected {
            return Err(LayerError::ValueLength {
                expected,
                actual: value.len(),
            });
        }

        self.base.store_value(value);
        self.refresh_vis(scene)
    }

    fn handle_click(
        &mut self,
        scene: &mut dyn SceneGraph,
        target: ElementTarget,
    ) -> Result<(), LayerError> {
        self.base.expect_state("handle click", LifecycleState::Live)?;
        match self.router.route_click(self.base.layer_index(), target) {
            Some(ModeRequest::Open) => self.open_layer(scene),
            Some(ModeRequest::Close) => self.close_layer(scene),
            None => Ok(()),
        }
    }

    fn handle_hover_in(
        &mut self,
        scene: &mut dyn SceneGraph,
        upstream: &dyn UpstreamLayer,
        target: ElementTarget,
    ) -> Result<(), LayerError> {
        self.base.expect_state("handle hover", LifecycleState::Live)?;
        let Some(plan) = self.router.hover_plan(self.base.layer_index(), target) else {
            return Ok(());
        };
        let Some(position) = self.target_position(target) else {
            debug!(
                "Layer {} hover over absent element {:?}",
                self.base.layer_index(),
                target
            );
            return Ok(());
        };

        self.base.clear_hover(scene)?;

        if plan.draw_relations {
            let relatives = self.get_relative_elements(target, upstream);
            self.base.draw_relation_lines(scene, position, &relatives)?;
        }

        if let Some(channel) = plan.label_channel {
            let width = self.assembly_for("show label")?.shape.width;
            if let LayerElements::Open { strips, .. } = &self.elements {
                if let Some(strip) = strips.get(channel) {
                    let text = format!("channel {} · {}", channel, width);
                    self.base
                        .show_label(scene, channel, strip.primitive(), &text)?;
                }
            }
        }
        Ok(())
    }

    fn handle_hover_out(&mut self, scene: &mut dyn SceneGraph) -> Result<(), LayerError> {
        self.base.clear_hover(scene)
    }

    fn get_relative_elements(
        &self,
        target: ElementTarget,
        upstream: &dyn UpstreamLayer,
    ) -> Vec<ElementView> {
        self.router
            .relative_elements(self.base.layer_index(), target, upstream)
    }

    fn dispose(&mut self, scene: &mut dyn SceneGraph) -> Result<(), LayerError> {
        if self.base.state() == LifecycleState::Disposed {
            return Err(LayerError::InvalidState {
                operation: "dispose",
                state: LifecycleState::Disposed,
            });
        }
        self.dispose_elements(scene)?;
        self.base.close_group(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Input1d;
    use stratum_scene::RetainedScene;

    fn layer(size: usize, open: bool) -> UpSampling1d {
        let config = UpSampling1dConfig {
            size: Some(size),
            init_status: Some(open),
            ..UpSampling1dConfig::default()
        };
        UpSampling1d::new(&config, &ModelConfig::default()).unwrap()
    }

    #[test]
    fn test_new_without_size_fails() {
        let result = UpSampling1d::new(&UpSampling1dConfig::default(), &ModelConfig::default());
        assert!(matches!(result, Err(LayerError::MissingSize)));
    }

    #[test]
    fn test_assemble_derives_sizing() {
        let input = Input1d::new(4, 3).unwrap().with_real_virtual_ratio(0.5);
        let mut layer = layer(2, false);
        layer.assemble(1, &input).unwrap();

        assert_eq!(layer.state(), LifecycleState::Assembled);
        assert_eq!(layer.shape(), Some(Shape::new(8, 3)));
        assert_eq!(layer.actual_width(), Some(4.0));
        assert_eq!(layer.unit_length(), Some(0.5));
        assert_eq!(layer.open_center_list(), input.open_center_list());
        assert_eq!(layer.output_shape(), Some(Shape::new(8, 3)));
    }

    #[test]
    fn test_assemble_twice_fails() {
        let input = Input1d::new(4, 3).unwrap();
        let mut layer = layer(2, false);
        layer.assemble(1, &input).unwrap();
        assert!(matches!(
            layer.assemble(1, &input),
            Err(LayerError::InvalidState {
                operation: "assemble",
                ..
            })
        ));
    }

    #[test]
    fn test_assemble_rejects_overflowing_size() {
        let input = Input1d::new(4, 3).unwrap();
        let mut layer = layer(usize::MAX / 2, false);
        assert!(matches!(
            layer.assemble(1, &input),
            Err(LayerError::OutputTooLarge { .. })
        ));
        assert_eq!(layer.state(), LifecycleState::Uninitialized);
        assert_eq!(layer.shape(), None);
    }

    #[test]
    fn test_assemble_from_unassembled_upstream_fails() {
        let upstream = layer(2, false);
        let mut downstream = layer(2, false);
        assert!(matches!(
            downstream.assemble(2, &upstream),
            Err(LayerError::UpstreamNotAssembled)
        ));
    }

    #[test]
    fn test_init_before_assemble_fails() {
        let mut scene = RetainedScene::new();
        let input = Input1d::new(4, 3).unwrap();
        let mut layer = layer(2, true);
        let err = layer
            .init(&mut scene, &input, Vec3::ZERO, 0.0, None)
            .unwrap_err();
        assert!(matches!(err, LayerError::InvalidState { operation: "init", .. }));
        assert_eq!(scene.live_groups(), 0);
    }

    #[test]
    fn test_update_before_init_fails() {
        let mut scene = RetainedScene::new();
        let input = Input1d::new(4, 3).unwrap();
        let mut layer = layer(2, true);
        layer.assemble(1, &input).unwrap();
        assert!(layer.update_value(&mut scene, vec![0.0; 24]).is_err());
        assert!(layer.neural_value().is_none());
    }

    #[test]
    fn test_update_rejects_wrong_length() {
        let mut scene = RetainedScene::new();
        let input = Input1d::new(4, 3).unwrap();
        let mut layer = layer(2, true);
        layer.assemble(1, &input).unwrap();
        layer.init(&mut scene, &input, Vec3::ZERO, 0.0, None).unwrap();

        let err = layer.update_value(&mut scene, vec![0.0; 12]).unwrap_err();
        assert!(matches!(
            err,
            LayerError::ValueLength {
                expected: 24,
                actual: 12
            }
        ));
        assert!(layer.neural_value().is_none());
    }

    #[test]
    fn test_open_layer_exposes_strips_to_downstream() {
        let mut scene = RetainedScene::new();
        let input = Input1d::new(4, 3).unwrap();
        let mut layer = layer(2, true);
        layer.assemble(1, &input).unwrap();
        layer
            .init(&mut scene, &input, Vec3::new(0.0, 20.0, 0.0), 1.0, None)
            .unwrap();

        assert!(layer.is_open());
        assert!(layer.aggregation_element().is_none());
        let views = layer.segregation_elements();
        assert_eq!(views.len(), 3);
        assert_eq!(views[0].position, Vec3::new(0.0, 20.0, -5.0));
        assert_eq!(layer.base().depth_index(), 1.0);
    }

    #[test]
    fn test_element_targets_per_mode() {
        let mut scene = RetainedScene::new();
        let input = Input1d::new(2, 2).unwrap();
        let mut layer = layer(3, false);
        layer.assemble(4, &input).unwrap();
        layer.init(&mut scene, &input, Vec3::ZERO, 0.0, None).unwrap();
        assert_eq!(
            layer.element_targets(),
            vec![ElementTarget::Aggregation { layer_index: 4 }]
        );

        layer.open_layer(&mut scene).unwrap();
        assert_eq!(
            layer.element_targets(),
            vec![
                ElementTarget::Strip {
                    layer_index: 4,
                    channel: 0
                },
                ElementTarget::Strip {
                    layer_index: 4,
                    channel: 1
                },
                ElementTarget::CloseControl { layer_index: 4 },
            ]
        );
    }

    #[test]
    fn test_dispose_twice_fails() {
        let mut scene = RetainedScene::new();
        let input = Input1d::new(4, 3).unwrap();
        let mut layer = layer(2, false);
        layer.assemble(1, &input).unwrap();
        layer.init(&mut scene, &input, Vec3::ZERO, 0.0, None).unwrap();

        layer.dispose(&mut scene).unwrap();
        assert_eq!(layer.state(), LifecycleState::Disposed);
        assert!(layer.dispose(&mut scene).is_err());
        assert!(layer.handle_click(&mut scene, ElementTarget::Aggregation { layer_index: 1 }).is_err());
    }
}
