//! Construction of a layer's element set.

use crate::element::{CloseControl, GridElement, GridGeometry, GridKind};
use glam::Vec3;
use stratum_scene::{Color, GroupHandle, SceneError, SceneGraph};
use tracing::debug;

/// Close control edge length, in unit lengths.
const CLOSE_BUTTON_SIZE_RATIO: f32 = 1.2;
/// Gap between the strips' left edge and the close control, in unit lengths.
const CLOSE_BUTTON_MARGIN: f32 = 2.0;

/// Everything a factory needs to know about the layer it builds for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementTemplate {
    pub layer_index: usize,
    pub geometry: GridGeometry,
    pub color: Color,
}

/// Builds the elements of either representation under a layer's group.
pub trait VisualElementFactory {
    fn build_aggregation(
        &self,
        scene: &mut dyn SceneGraph,
        group: GroupHandle,
        template: &ElementTemplate,
    ) -> Result<GridElement, SceneError>;

    /// The strip of one channel, anchored at that channel's center.
    fn build_strip(
        &self,
        scene: &mut dyn SceneGraph,
        group: GroupHandle,
        template: &ElementTemplate,
        channel: usize,
        center: Vec3,
    ) -> Result<GridElement, SceneError>;

    fn build_close_control(
        &self,
        scene: &mut dyn SceneGraph,
        group: GroupHandle,
        template: &ElementTemplate,
        centers: &[Vec3],
    ) -> Result<CloseControl, SceneError>;
}

/// Default factory: grid rows for data, a square button to close.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridElementFactory;

impl GridElementFactory {
    /// Where the close control sits for a given set of strip centers.
    pub fn close_control_position(geometry: &GridGeometry, centers: &[Vec3]) -> Vec3 {
        let middle = match (centers.first(), centers.last()) {
            (Some(first), Some(last)) => (*first + *last) * 0.5,
            _ => Vec3::ZERO,
        };
        let x = -geometry.actual_width / 2.0 - CLOSE_BUTTON_MARGIN * geometry.unit_length;
        Vec3::new(x, middle.y, middle.z)
    }
}

impl VisualElementFactory for GridElementFactory {
    fn build_aggregation(
        &self,
        scene: &mut dyn SceneGraph,
        group: GroupHandle,
        template: &ElementTemplate,
    ) -> Result<GridElement, SceneError> {
        debug!(
            "Layer {}: building aggregation of {} cells",
            template.layer_index, template.geometry.cells
        );
        GridElement::create(
            scene,
            group,
            GridKind::Aggregation,
            template.layer_index,
            template.geometry,
            Vec3::ZERO,
            template.color,
        )
    }

    fn build_strip(
        &self,
        scene: &mut dyn SceneGraph,
        group: GroupHandle,
        template: &ElementTemplate,
        channel: usize,
        center: Vec3,
    ) -> Result<GridElement, SceneError> {
        debug!(
            "Layer {}: building strip {} of {} cells",
            template.layer_index, channel, template.geometry.cells
        );
        GridElement::create(
            scene,
            group,
            GridKind::Strip { channel },
            template.layer_index,
            template.geometry,
            center,
            template.color,
        )
    }

    fn build_close_control(
        &self,
        scene: &mut dyn SceneGraph,
        group: GroupHandle,
        template: &ElementTemplate,
        centers: &[Vec3],
    ) -> Result<CloseControl, SceneError> {
        let position = Self::close_control_position(&template.geometry, centers);
        CloseControl::create(
            scene,
            group,
            template.layer_index,
            position,
            template.geometry.unit_length * CLOSE_BUTTON_SIZE_RATIO,
            template.color,
        )
    }
}
