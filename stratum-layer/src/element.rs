//! Visual elements owned by a layer.
//!
//! Every element owns exactly one scene primitive and releases it in
//! `dispose`, which consumes the element.

use glam::Vec3;
use stratum_scene::{Color, GroupHandle, PrimitiveDesc, PrimitiveHandle, SceneError, SceneGraph};

/// Parent a fresh primitive under `group`, releasing it if that fails.
fn adopt(
    scene: &mut dyn SceneGraph,
    group: GroupHandle,
    primitive: PrimitiveHandle,
) -> Result<(), SceneError> {
    if let Err(err) = scene.add_child(group, primitive) {
        scene.release_primitive(primitive)?;
        return Err(err);
    }
    Ok(())
}

/// What a pointer event landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementTarget {
    /// The merged row of a closed layer.
    Aggregation { layer_index: usize },
    /// The control that closes an open layer.
    CloseControl { layer_index: usize },
    /// One channel strip of an open layer.
    Strip { layer_index: usize, channel: usize },
}

impl ElementTarget {
    pub fn layer_index(&self) -> usize {
        match *self {
            ElementTarget::Aggregation { layer_index }
            | ElementTarget::CloseControl { layer_index }
            | ElementTarget::Strip { layer_index, .. } => layer_index,
        }
    }
}

/// Read-only view of an element, handed to other layers for highlighting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementView {
    pub target: ElementTarget,
    pub primitive: PrimitiveHandle,
    /// World-space position.
    pub position: Vec3,
}

/// Sizing shared by every grid element of a layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub cells: usize,
    pub actual_width: f32,
    pub unit_length: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKind {
    Aggregation,
    Strip { channel: usize },
}

/// A row of cells: either the aggregation of a closed layer or one strip of
/// an open layer.
#[derive(Debug)]
pub struct GridElement {
    kind: GridKind,
    layer_index: usize,
    primitive: PrimitiveHandle,
    position: Vec3,
    colors: Vec<Color>,
}

impl GridElement {
    /// Create the primitive and parent it under `group`.
    pub fn create(
        scene: &mut dyn SceneGraph,
        group: GroupHandle,
        kind: GridKind,
        layer_index: usize,
        geometry: GridGeometry,
        position: Vec3,
        color: Color,
    ) -> Result<Self, SceneError> {
        let primitive = scene.create_primitive(PrimitiveDesc::Grid {
            cells: geometry.cells,
            actual_width: geometry.actual_width,
            unit_length: geometry.unit_length,
            position,
            color,
        });
        adopt(scene, group, primitive)?;

        Ok(Self {
            kind,
            layer_index,
            primitive,
            position,
            colors: Vec::new(),
        })
    }

    pub fn target(&self) -> ElementTarget {
        match self.kind {
            GridKind::Aggregation => ElementTarget::Aggregation {
                layer_index: self.layer_index,
            },
            GridKind::Strip { channel } => ElementTarget::Strip {
                layer_index: self.layer_index,
                channel,
            },
        }
    }

    pub fn primitive(&self) -> PrimitiveHandle {
        self.primitive
    }

    /// Position relative to the owning group.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Colors most recently pushed; empty until the first update.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn update_vis(
        &mut self,
        scene: &mut dyn SceneGraph,
        colors: Vec<Color>,
    ) -> Result<(), SceneError> {
        scene.set_cell_colors(self.primitive, &colors)?;
        self.colors = colors;
        Ok(())
    }

    /// View in world space, given the owning group's position.
    pub fn view(&self, origin: Vec3) -> ElementView {
        ElementView {
            target: self.target(),
            primitive: self.primitive,
            position: origin + self.position,
        }
    }

    pub fn dispose(self, scene: &mut dyn SceneGraph, group: GroupHandle) -> Result<(), SceneError> {
        scene.remove_child(group, self.primitive)?;
        scene.release_primitive(self.primitive)
    }
}

/// The button shown beside an open layer that closes it again.
#[derive(Debug)]
pub struct CloseControl {
    layer_index: usize,
    primitive: PrimitiveHandle,
    position: Vec3,
}

impl CloseControl {
    pub fn create(
        scene: &mut dyn SceneGraph,
        group: GroupHandle,
        layer_index: usize,
        position: Vec3,
        size: f32,
        color: Color,
    ) -> Result<Self, SceneError> {
        let primitive = scene.create_primitive(PrimitiveDesc::Button {
            position,
            size,
            color,
        });
        adopt(scene, group, primitive)?;

        Ok(Self {
            layer_index,
            primitive,
            position,
        })
    }

    pub fn target(&self) -> ElementTarget {
        ElementTarget::CloseControl {
            layer_index: self.layer_index,
        }
    }

    pub fn primitive(&self) -> PrimitiveHandle {
        self.primitive
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn dispose(self, scene: &mut dyn SceneGraph, group: GroupHandle) -> Result<(), SceneError> {
        scene.remove_child(group, self.primitive)?;
        scene.release_primitive(self.primitive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_scene::RetainedScene;

    const GEOMETRY: GridGeometry = GridGeometry {
        cells: 4,
        actual_width: 4.0,
        unit_length: 1.0,
    };

    #[test]
    fn test_strip_target_carries_channel() {
        let mut scene = RetainedScene::new();
        let group = scene.create_group(Vec3::ZERO);
        let strip = GridElement::create(
            &mut scene,
            group,
            GridKind::Strip { channel: 2 },
            5,
            GEOMETRY,
            Vec3::Z,
            Color::WHITE,
        )
        .unwrap();

        assert_eq!(
            strip.target(),
            ElementTarget::Strip {
                layer_index: 5,
                channel: 2
            }
        );
        assert_eq!(strip.target().layer_index(), 5);
        assert!(strip.colors().is_empty());
    }

    #[test]
    fn test_create_under_missing_group_leaves_nothing() {
        let mut scene = RetainedScene::new();
        let group = scene.create_group(Vec3::ZERO);
        scene.release_group(group).unwrap();

        let result = GridElement::create(
            &mut scene,
            group,
            GridKind::Aggregation,
            1,
            GEOMETRY,
            Vec3::ZERO,
            Color::WHITE,
        );
        assert!(matches!(result, Err(SceneError::UnknownGroup(_))));
        assert!(CloseControl::create(&mut scene, group, 1, Vec3::ZERO, 1.0, Color::WHITE).is_err());
        assert_eq!(scene.live_primitives(), 0);
    }

    #[test]
    fn test_update_vis_and_dispose() {
        let mut scene = RetainedScene::new();
        let group = scene.create_group(Vec3::new(10.0, 0.0, 0.0));
        let mut aggregation = GridElement::create(
            &mut scene,
            group,
            GridKind::Aggregation,
            1,
            GEOMETRY,
            Vec3::ZERO,
            Color::WHITE,
        )
        .unwrap();

        let colors = vec![Color::gray(0.5); 4];
        aggregation.update_vis(&mut scene, colors.clone()).unwrap();
        assert_eq!(aggregation.colors(), colors.as_slice());
        assert_eq!(scene.cell_colors(aggregation.primitive()).unwrap(), colors.as_slice());
        assert_eq!(aggregation.view(Vec3::new(10.0, 0.0, 0.0)).position.x, 10.0);

        aggregation.dispose(&mut scene, group).unwrap();
        assert_eq!(scene.live_primitives(), 0);
        assert_eq!(scene.children(group).map(|c| c.len()), Some(0));
    }

    #[test]
    fn test_update_vis_rejects_wrong_length() {
        let mut scene = RetainedScene::new();
        let group = scene.create_group(Vec3::ZERO);
        let mut strip = GridElement::create(
            &mut scene,
            group,
            GridKind::Strip { channel: 0 },
            0,
            GEOMETRY,
            Vec3::ZERO,
            Color::WHITE,
        )
        .unwrap();

        assert!(strip.update_vis(&mut scene, vec![Color::BLACK; 3]).is_err());
        assert!(strip.colors().is_empty());
    }

    #[test]
    fn test_close_control_lifecycle() {
        let mut scene = RetainedScene::new();
        let group = scene.create_group(Vec3::ZERO);
        let control =
            CloseControl::create(&mut scene, group, 3, Vec3::NEG_X, 1.2, Color::WHITE).unwrap();
        assert_eq!(control.target(), ElementTarget::CloseControl { layer_index: 3 });

        control.dispose(&mut scene, group).unwrap();
        assert_eq!(scene.live_primitives(), 0);
    }
}
