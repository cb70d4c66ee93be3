//! The scene-graph capability consumed by layers.

use crate::{Color, GroupHandle, PrimitiveHandle, SceneError};
use glam::Vec3;

/// Description of a primitive to create.
///
/// Positions are local to the group the primitive is later added to.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveDesc {
    /// A row of `cells` equally sized cubes spanning `actual_width`.
    Grid {
        cells: usize,
        actual_width: f32,
        unit_length: f32,
        position: Vec3,
        color: Color,
    },
    /// A clickable square control.
    Button {
        position: Vec3,
        size: f32,
        color: Color,
    },
    /// A polyline through `points`.
    Line { points: Vec<Vec3>, color: Color },
}

impl PrimitiveDesc {
    /// Number of colorable cells, if this is a grid.
    pub fn cells(&self) -> Option<usize> {
        match self {
            PrimitiveDesc::Grid { cells, .. } => Some(*cells),
            _ => None,
        }
    }
}

/// Rendering-engine operations a layer needs.
///
/// Groups own primitives through `add_child`/`remove_child`. A primitive must
/// be removed from its group before the group is released.
pub trait SceneGraph {
    /// Create a detached group at `position`.
    fn create_group(&mut self, position: Vec3) -> GroupHandle;

    /// Attach a group to the scene root so it is drawn.
    fn attach_group(&mut self, group: GroupHandle) -> Result<(), SceneError>;

    /// Detach a group from the scene root.
    fn detach_group(&mut self, group: GroupHandle) -> Result<(), SceneError>;

    /// Release an empty group.
    fn release_group(&mut self, group: GroupHandle) -> Result<(), SceneError>;

    fn create_primitive(&mut self, desc: PrimitiveDesc) -> PrimitiveHandle;

    fn add_child(&mut self, group: GroupHandle, primitive: PrimitiveHandle)
    -> Result<(), SceneError>;

    fn remove_child(
        &mut self,
        group: GroupHandle,
        primitive: PrimitiveHandle,
    ) -> Result<(), SceneError>;

    /// Release a primitive that has no parent, with any GPU-side storage behind it.
    fn release_primitive(&mut self, primitive: PrimitiveHandle) -> Result<(), SceneError>;

    /// Upload one color per grid cell.
    fn set_cell_colors(
        &mut self,
        primitive: PrimitiveHandle,
        colors: &[Color],
    ) -> Result<(), SceneError>;

    fn show_text(&mut self, primitive: PrimitiveHandle, text: &str) -> Result<(), SceneError>;

    fn hide_text(&mut self, primitive: PrimitiveHandle) -> Result<(), SceneError>;
}
