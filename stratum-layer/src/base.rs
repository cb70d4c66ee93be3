//! Lifecycle state and hover bookkeeping shared by every layer type.

use crate::element::ElementView;
use crate::node::Hook;
use crate::{LayerError, RepresentationMode};
use glam::Vec3;
use std::fmt;
use stratum_scene::{Color, GroupHandle, PrimitiveDesc, PrimitiveHandle, SceneGraph};
use tracing::debug;

/// Where a layer is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Assembled,
    /// Initialized and drawn in its current [`RepresentationMode`].
    Live,
    Disposed,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Uninitialized => write!(f, "uninitialized"),
            LifecycleState::Assembled => write!(f, "assembled"),
            LifecycleState::Live => write!(f, "live"),
            LifecycleState::Disposed => write!(f, "disposed"),
        }
    }
}

/// The label currently shown by a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveLabel {
    pub channel: usize,
    pub primitive: PrimitiveHandle,
}

/// Fields and behaviour common to all layers.
///
/// Owns the layer's scene group, the latest output value, and whatever hover
/// decorations (one label, any number of relation lines) are on screen.
#[derive(Debug)]
pub struct LayerBase {
    layer_index: usize,
    state: LifecycleState,
    mode: RepresentationMode,
    color: Color,
    center: Vec3,
    depth_index: f32,
    group: Option<GroupHandle>,
    neural_value: Option<Vec<f32>>,
    last_hook: Option<Hook>,
    next_hook: Option<Hook>,
    label: Option<ActiveLabel>,
    relation_lines: Vec<PrimitiveHandle>,
}

impl LayerBase {
    pub fn new(initial_mode: RepresentationMode, color: Color) -> Self {
        Self {
            layer_index: 0,
            state: LifecycleState::Uninitialized,
            mode: initial_mode,
            color,
            center: Vec3::ZERO,
            depth_index: 0.0,
            group: None,
            neural_value: None,
            last_hook: None,
            next_hook: None,
            label: None,
            relation_lines: Vec::new(),
        }
    }

    /// Position in the model, set at assembly.
    pub fn layer_index(&self) -> usize {
        self.layer_index
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Representation currently shown.
    pub fn mode(&self) -> RepresentationMode {
        self.mode
    }

    /// Record the mode; the caller rebuilds the elements.
    pub fn set_mode(&mut self, mode: RepresentationMode) {
        self.mode = mode;
    }

    /// Base color of every element.
    pub fn color(&self) -> Color {
        self.color
    }

    /// World-space position of the layer's group.
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Stacking index along the model's depth axis.
    pub fn depth_index(&self) -> f32 {
        self.depth_index
    }

    /// The layer's scene group, between init and dispose.
    pub fn group(&self) -> Option<GroupHandle> {
        self.group
    }

    /// Last accepted output value.
    pub fn neural_value(&self) -> Option<&[f32]> {
        self.neural_value.as_deref()
    }

    /// Replace the held output value.
    pub fn store_value(&mut self, value: Vec<f32>) {
        self.neural_value = Some(value);
    }

    /// Hook the next layer routes its relation lines through.
    pub fn next_hook(&self) -> Option<Hook> {
        self.next_hook
    }

    /// Label currently shown, if any.
    pub fn active_label(&self) -> Option<ActiveLabel> {
        self.label
    }

    /// Relation lines currently drawn.
    pub fn relation_lines(&self) -> &[PrimitiveHandle] {
        &self.relation_lines
    }

    pub fn expect_state(
        &self,
        operation: &'static str,
        expected: LifecycleState,
    ) -> Result<(), LayerError> {
        if self.state != expected {
            return Err(LayerError::InvalidState {
                operation,
                state: self.state,
            });
        }
        Ok(())
    }

    /// The group, or an error naming `operation` when there is none yet.
    pub fn group_for(&self, operation: &'static str) -> Result<GroupHandle, LayerError> {
        self.group.ok_or(LayerError::InvalidState {
            operation,
            state: self.state,
        })
    }

    pub fn mark_assembled(&mut self, layer_index: usize) {
        self.layer_index = layer_index;
        self.state = LifecycleState::Assembled;
    }

    /// Create the layer's detached group at `center`.
    pub fn open_group(
        &mut self,
        scene: &mut dyn SceneGraph,
        center: Vec3,
        depth_index: f32,
        last_hook: Option<Hook>,
        next_hook: Option<Hook>,
    ) -> GroupHandle {
        let group = scene.create_group(center);
        self.center = center;
        self.depth_index = depth_index;
        self.last_hook = last_hook;
        self.next_hook = next_hook;
        self.group = Some(group);
        group
    }

    /// Attach the group to the scene and go live.
    pub fn go_live(&mut self, scene: &mut dyn SceneGraph) -> Result<(), LayerError> {
        let group = self.group_for("init")?;
        scene.attach_group(group)?;
        self.state = LifecycleState::Live;
        debug!(
            "Layer {} live at {} ({})",
            self.layer_index, self.center, self.mode
        );
        Ok(())
    }

    /// Show `text` on `primitive`, hiding any label already shown.
    pub fn show_label(
        &mut self,
        scene: &mut dyn SceneGraph,
        channel: usize,
        primitive: PrimitiveHandle,
        text: &str,
    ) -> Result<(), LayerError> {
        self.hide_label(scene)?;
        scene.show_text(primitive, text)?;
        self.label = Some(ActiveLabel { channel, primitive });
        Ok(())
    }

    pub fn hide_label(&mut self, scene: &mut dyn SceneGraph) -> Result<(), LayerError> {
        if let Some(label) = self.label.take() {
            scene.hide_text(label.primitive)?;
        }
        Ok(())
    }

    /// Draw one line from `from` to each relative, bent through the incoming hook.
    pub fn draw_relation_lines(
        &mut self,
        scene: &mut dyn SceneGraph,
        from: Vec3,
        relatives: &[ElementView],
    ) -> Result<(), LayerError> {
        let group = self.group_for("draw relation lines")?;
        for relative in relatives {
            let mut points = vec![from - self.center];
            if let Some(hook) = self.last_hook {
                points.push(hook.position - self.center);
            }
            points.push(relative.position - self.center);

            let line = scene.create_primitive(PrimitiveDesc::Line {
                points,
                color: self.color,
            });
            scene.add_child(group, line)?;
            self.relation_lines.push(line);
        }
        Ok(())
    }

    pub fn clear_relation_lines(&mut self, scene: &mut dyn SceneGraph) -> Result<(), LayerError> {
        if self.relation_lines.is_empty() {
            return Ok(());
        }
        let group = self.group_for("clear relation lines")?;
        for line in self.relation_lines.drain(..) {
            scene.remove_child(group, line)?;
            scene.release_primitive(line)?;
        }
        Ok(())
    }

    /// Remove every hover decoration.
    pub fn clear_hover(&mut self, scene: &mut dyn SceneGraph) -> Result<(), LayerError> {
        self.clear_relation_lines(scene)?;
        self.hide_label(scene)
    }

    /// Detach and release the (already emptied) group. Ends the lifecycle.
    pub fn close_group(&mut self, scene: &mut dyn SceneGraph) -> Result<(), LayerError> {
        if let Some(group) = self.group.take() {
            scene.detach_group(group)?;
            scene.release_group(group)?;
        }
        self.neural_value = None;
        self.state = LifecycleState::Disposed;
        debug!("Layer {} disposed", self.layer_index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementTarget;
    use stratum_scene::RetainedScene;

    fn live_base(scene: &mut RetainedScene, hook: Option<Hook>) -> LayerBase {
        let mut base = LayerBase::new(RepresentationMode::Closed, Color::WHITE);
        base.mark_assembled(1);
        base.open_group(scene, Vec3::new(0.0, 10.0, 0.0), 1.0, hook, None);
        base.go_live(scene).unwrap();
        base
    }

    fn relative(position: Vec3) -> ElementView {
        ElementView {
            target: ElementTarget::Aggregation { layer_index: 0 },
            primitive: PrimitiveHandle::new(999),
            position,
        }
    }

    #[test]
    fn test_expect_state() {
        let base = LayerBase::new(RepresentationMode::Open, Color::WHITE);
        assert!(base.expect_state("assemble", LifecycleState::Uninitialized).is_ok());
        let err = base
            .expect_state("init", LifecycleState::Assembled)
            .unwrap_err();
        assert!(matches!(
            err,
            LayerError::InvalidState {
                operation: "init",
                state: LifecycleState::Uninitialized
            }
        ));
    }

    #[test]
    fn test_go_live_attaches_group() {
        let mut scene = RetainedScene::new();
        let base = live_base(&mut scene, None);
        assert_eq!(base.state(), LifecycleState::Live);
        assert!(scene.is_attached(base.group().unwrap()));
    }

    #[test]
    fn test_relation_lines_are_local_and_routed_through_hook() {
        let mut scene = RetainedScene::new();
        let hook = Hook::at(Vec3::new(0.0, 5.0, 0.0));
        let mut base = live_base(&mut scene, Some(hook));

        base.draw_relation_lines(&mut scene, Vec3::new(0.0, 10.0, 0.0), &[relative(Vec3::ZERO)])
            .unwrap();
        assert_eq!(base.relation_lines().len(), 1);

        let desc = scene.desc(base.relation_lines()[0]).unwrap();
        match desc {
            PrimitiveDesc::Line { points, .. } => assert_eq!(
                points,
                &vec![Vec3::ZERO, Vec3::new(0.0, -5.0, 0.0), Vec3::new(0.0, -10.0, 0.0)]
            ),
            other => panic!("expected a line, got {:?}", other),
        }

        base.clear_relation_lines(&mut scene).unwrap();
        assert!(base.relation_lines().is_empty());
        assert_eq!(scene.live_primitives(), 0);
    }

    #[test]
    fn test_clear_hover_is_idempotent() {
        let mut scene = RetainedScene::new();
        let mut base = live_base(&mut scene, None);
        base.clear_hover(&mut scene).unwrap();
        base.clear_hover(&mut scene).unwrap();
        assert!(base.active_label().is_none());
    }

    #[test]
    fn test_close_group_releases_everything() {
        let mut scene = RetainedScene::new();
        let mut base = live_base(&mut scene, None);
        base.store_value(vec![1.0]);
        base.close_group(&mut scene).unwrap();

        assert_eq!(base.state(), LifecycleState::Disposed);
        assert!(base.neural_value().is_none());
        assert_eq!(scene.live_groups(), 0);
    }
}
