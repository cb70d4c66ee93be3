//! In-memory scene that records every primitive it is asked to draw.
//!
//! Used by the demo driver and by tests to check that layers never leak
//! groups or primitives across open/close transitions.

use crate::{Color, GroupHandle, PrimitiveDesc, PrimitiveHandle, SceneError, SceneGraph};
use glam::Vec3;
use std::collections::{HashMap, HashSet};
use tracing::trace;

struct GroupEntry {
    position: Vec3,
    children: Vec<PrimitiveHandle>,
}

struct PrimitiveEntry {
    desc: PrimitiveDesc,
    parent: Option<GroupHandle>,
    colors: Vec<Color>,
    label: Option<String>,
}

/// Registry mapping handles to the primitives they stand for.
pub struct RetainedScene {
    next_id: u64,
    groups: HashMap<u64, GroupEntry>,
    primitives: HashMap<u64, PrimitiveEntry>,
    attached: HashSet<u64>,
}

impl RetainedScene {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            groups: HashMap::new(),
            primitives: HashMap::new(),
            attached: HashSet::new(),
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn group_mut(&mut self, group: GroupHandle) -> Result<&mut GroupEntry, SceneError> {
        self.groups
            .get_mut(&group.id)
            .ok_or(SceneError::UnknownGroup(group.id))
    }

    fn primitive_mut(
        &mut self,
        primitive: PrimitiveHandle,
    ) -> Result<&mut PrimitiveEntry, SceneError> {
        self.primitives
            .get_mut(&primitive.id)
            .ok_or(SceneError::UnknownPrimitive(primitive.id))
    }

    /// Number of primitives that have been created and not released.
    pub fn live_primitives(&self) -> usize {
        self.primitives.len()
    }

    /// Number of groups that have been created and not released.
    pub fn live_groups(&self) -> usize {
        self.groups.len()
    }

    /// Whether the group is attached to the scene root.
    pub fn is_attached(&self, group: GroupHandle) -> bool {
        self.attached.contains(&group.id)
    }

    pub fn group_position(&self, group: GroupHandle) -> Option<Vec3> {
        self.groups.get(&group.id).map(|g| g.position)
    }

    /// Children of a group, in insertion order.
    pub fn children(&self, group: GroupHandle) -> Option<&[PrimitiveHandle]> {
        self.groups.get(&group.id).map(|g| g.children.as_slice())
    }

    pub fn desc(&self, primitive: PrimitiveHandle) -> Option<&PrimitiveDesc> {
        self.primitives.get(&primitive.id).map(|p| &p.desc)
    }

    /// Current per-cell colors of a grid primitive.
    pub fn cell_colors(&self, primitive: PrimitiveHandle) -> Option<&[Color]> {
        self.primitives
            .get(&primitive.id)
            .map(|p| p.colors.as_slice())
    }

    /// Raw bytes of the cell colors, laid out for a storage buffer upload.
    pub fn color_bytes(&self, primitive: PrimitiveHandle) -> Option<&[u8]> {
        self.cell_colors(primitive).map(bytemuck::cast_slice)
    }

    /// Visible label text, if any.
    pub fn label(&self, primitive: PrimitiveHandle) -> Option<&str> {
        self.primitives
            .get(&primitive.id)
            .and_then(|p| p.label.as_deref())
    }

    /// Number of primitives currently showing a label.
    pub fn visible_labels(&self) -> usize {
        self.primitives
            .values()
            .filter(|p| p.label.is_some())
            .count()
    }
}

impl Default for RetainedScene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph for RetainedScene {
    fn create_group(&mut self, position: Vec3) -> GroupHandle {
        let handle = GroupHandle::new(self.next_id());
        self.groups.insert(
            handle.id,
            GroupEntry {
                position,
                children: Vec::new(),
            },
        );
        trace!("created group {}", handle);
        handle
    }

    fn attach_group(&mut self, group: GroupHandle) -> Result<(), SceneError> {
        self.group_mut(group)?;
        self.attached.insert(group.id);
        Ok(())
    }

    fn detach_group(&mut self, group: GroupHandle) -> Result<(), SceneError> {
        self.group_mut(group)?;
        self.attached.remove(&group.id);
        Ok(())
    }

    fn release_group(&mut self, group: GroupHandle) -> Result<(), SceneError> {
        let entry = self.group_mut(group)?;
        if !entry.children.is_empty() {
            return Err(SceneError::GroupNotEmpty {
                group: group.id,
                children: entry.children.len(),
            });
        }
        self.groups.remove(&group.id);
        self.attached.remove(&group.id);
        trace!("released group {}", group);
        Ok(())
    }

    fn create_primitive(&mut self, desc: PrimitiveDesc) -> PrimitiveHandle {
        let handle = PrimitiveHandle::new(self.next_id());
        let colors = match &desc {
            PrimitiveDesc::Grid { cells, color, .. } => vec![*color; *cells],
            PrimitiveDesc::Button { color, .. } | PrimitiveDesc::Line { color, .. } => {
                vec![*color]
            }
        };
        self.primitives.insert(
            handle.id,
            PrimitiveEntry {
                desc,
                parent: None,
                colors,
                label: None,
            },
        );
        handle
    }

    fn add_child(
        &mut self,
        group: GroupHandle,
        primitive: PrimitiveHandle,
    ) -> Result<(), SceneError> {
        self.group_mut(group)?;
        let entry = self.primitive_mut(primitive)?;
        if let Some(parent) = entry.parent {
            return Err(SceneError::AlreadyParented {
                group: parent.id,
                primitive: primitive.id,
            });
        }
        entry.parent = Some(group);
        self.group_mut(group)?.children.push(primitive);
        Ok(())
    }

    fn remove_child(
        &mut self,
        group: GroupHandle,
        primitive: PrimitiveHandle,
    ) -> Result<(), SceneError> {
        let entry = self.group_mut(group)?;
        let position = entry
            .children
            .iter()
            .position(|child| *child == primitive)
            .ok_or(SceneError::NotAChild {
                group: group.id,
                primitive: primitive.id,
            })?;
        entry.children.remove(position);
        self.primitive_mut(primitive)?.parent = None;
        Ok(())
    }

    /// Only unparented primitives can be released; `remove_child` comes first.
    fn release_primitive(&mut self, primitive: PrimitiveHandle) -> Result<(), SceneError> {
        if let Some(parent) = self.primitive_mut(primitive)?.parent {
            return Err(SceneError::StillParented {
                group: parent.id,
                primitive: primitive.id,
            });
        }
        self.primitives.remove(&primitive.id);
        trace!("released primitive {}", primitive);
        Ok(())
    }

    fn set_cell_colors(
        &mut self,
        primitive: PrimitiveHandle,
        colors: &[Color],
    ) -> Result<(), SceneError> {
        let entry = self.primitive_mut(primitive)?;
        let cells = entry
            .desc
            .cells()
            .ok_or(SceneError::NotAGrid(primitive.id))?;
        if cells != colors.len() {
            return Err(SceneError::ColorCountMismatch {
                primitive: primitive.id,
                expected: cells,
                actual: colors.len(),
            });
        }
        entry.colors.clear();
        entry.colors.extend_from_slice(colors);
        Ok(())
    }

    fn show_text(&mut self, primitive: PrimitiveHandle, text: &str) -> Result<(), SceneError> {
        self.primitive_mut(primitive)?.label = Some(text.to_string());
        Ok(())
    }

    fn hide_text(&mut self, primitive: PrimitiveHandle) -> Result<(), SceneError> {
        self.primitive_mut(primitive)?.label = None;
        Ok(())
    }
}
