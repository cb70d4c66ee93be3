//! Pointer event dispatch.
//!
//! The router only decides; the layer applies the decision to its elements.

use crate::element::{ElementTarget, ElementView};
use crate::node::UpstreamLayer;
use tracing::warn;

/// Mode change requested by a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeRequest {
    Open,
    Close,
}

/// What a hover over a given target should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoverPlan {
    pub draw_relations: bool,
    /// Strip that gets the label.
    pub label_channel: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
pub struct InteractionRouter {
    relation_system: bool,
    text_system: bool,
}

impl InteractionRouter {
    pub fn new(relation_system: bool, text_system: bool) -> Self {
        Self {
            relation_system,
            text_system,
        }
    }

    fn owns(owner: usize, target: ElementTarget) -> bool {
        if target.layer_index() != owner {
            warn!(
                "Layer {} ignoring event for element of layer {}",
                owner,
                target.layer_index()
            );
            return false;
        }
        true
    }

    pub fn route_click(&self, owner: usize, target: ElementTarget) -> Option<ModeRequest> {
        if !Self::owns(owner, target) {
            return None;
        }
        match target {
            ElementTarget::Aggregation { .. } => Some(ModeRequest::Open),
            ElementTarget::CloseControl { .. } => Some(ModeRequest::Close),
            ElementTarget::Strip { .. } => None,
        }
    }

    /// `None` when the target belongs to another layer.
    pub fn hover_plan(&self, owner: usize, target: ElementTarget) -> Option<HoverPlan> {
        if !Self::owns(owner, target) {
            return None;
        }
        let label_channel = match target {
            ElementTarget::Strip { channel, .. } if self.text_system => Some(channel),
            _ => None,
        };
        Some(HoverPlan {
            draw_relations: self.relation_system,
            label_channel,
        })
    }

    /// Upstream elements related to `target`.
    ///
    /// A closed upstream offers its aggregation. An open upstream offers every
    /// strip to an aggregation target, and the strip of the same channel to a
    /// strip target.
    pub fn relative_elements(
        &self,
        owner: usize,
        target: ElementTarget,
        upstream: &dyn UpstreamLayer,
    ) -> Vec<ElementView> {
        if target.layer_index() != owner {
            return Vec::new();
        }
        match target {
            ElementTarget::CloseControl { .. } => Vec::new(),
            _ if !upstream.is_open() => upstream.aggregation_element().into_iter().collect(),
            ElementTarget::Aggregation { .. } => upstream.segregation_elements(),
            ElementTarget::Strip { channel, .. } => upstream
                .segregation_elements()
                .into_iter()
                .filter(|view| {
                    matches!(view.target, ElementTarget::Strip { channel: c, .. } if c == channel)
                })
                .collect(),
        }
    }
}
