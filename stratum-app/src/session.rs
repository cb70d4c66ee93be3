//! Scripted demo session over an input → upsampling chain.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use stratum_layer::{
    ConfigError, ElementTarget, Hook, Input1d, Input1dConfig, LayerError, LayerNode, ModelConfig,
    UpSampling1d, UpSampling1dConfig, UpstreamLayer,
};
use stratum_scene::SceneGraph;
use thiserror::Error;
use tracing::{debug, info};

/// Vertical distance between consecutive layer centers.
const LAYER_INTERVAL: f32 = 20.0;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session has no layers")]
    EmptyChain,

    #[error(transparent)]
    Layer(#[from] LayerError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A whole demo: model defaults, the input shape and the layer stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    #[serde(default)]
    pub model: ModelConfig,
    pub input: Input1dConfig,
    pub layers: Vec<UpSampling1dConfig>,
}

impl SessionConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}

pub struct Session {
    input: Input1d,
    layers: Vec<UpSampling1d>,
}

fn layer_center(index: usize) -> Vec3 {
    Vec3::new(0.0, LAYER_INTERVAL * index as f32, 0.0)
}

fn hook_above(index: usize) -> Hook {
    Hook::at(layer_center(index) + Vec3::new(0.0, LAYER_INTERVAL * 0.5, 0.0))
}

/// The upstream of layer `index` (0 is the first upsampling layer).
fn upstream_of<'a>(input: &'a Input1d, before: &'a [UpSampling1d]) -> &'a dyn UpstreamLayer {
    match before.last() {
        Some(layer) => layer,
        None => input,
    }
}

/// Deterministic test signal, position-major.
fn synthetic_value(len: usize, phase: f32) -> Vec<f32> {
    (0..len).map(|i| (i as f32 * 0.37 + phase).sin()).collect()
}

impl Session {
    /// Construct and assemble the chain. Layer indices start at 1; the input is 0.
    pub fn build(config: &SessionConfig) -> Result<Self, SessionError> {
        if config.layers.is_empty() {
            return Err(SessionError::EmptyChain);
        }

        let mut input = Input1d::from_config(&config.input)?;
        input.set_next_hook(Some(hook_above(0)));

        let mut layers = config
            .layers
            .iter()
            .map(|layer| UpSampling1d::new(layer, &config.model))
            .collect::<Result<Vec<_>, _>>()?;

        for i in 0..layers.len() {
            let (before, rest) = layers.split_at_mut(i);
            let upstream = upstream_of(&input, before);
            rest[0].assemble(i + 1, upstream)?;
            debug!("Assembled layer {} with shape {:?}", i + 1, rest[0].shape());
        }

        info!(
            "Built chain: input {} + {} upsampling layer(s)",
            input.shape(),
            layers.len()
        );
        Ok(Self { input, layers })
    }

    pub fn init(&mut self, scene: &mut dyn SceneGraph) -> Result<(), SessionError> {
        let count = self.layers.len();
        for i in 0..count {
            let (before, rest) = self.layers.split_at_mut(i);
            let upstream = upstream_of(&self.input, before);
            let next_hook = (i + 1 < count).then(|| hook_above(i + 1));
            rest[0].init(scene, upstream, layer_center(i + 1), (i + 1) as f32, next_hook)?;
        }
        Ok(())
    }

    pub fn push_values(&mut self, scene: &mut dyn SceneGraph) -> Result<(), SessionError> {
        for (i, layer) in self.layers.iter_mut().enumerate() {
            let len = layer.shape().map(|s| s.len()).unwrap_or(0);
            layer.update_value(scene, synthetic_value(len, i as f32))?;
        }
        Ok(())
    }

    /// Open the last layer, hover its first strip, then close it again.
    pub fn replay_interactions(&mut self, scene: &mut dyn SceneGraph) -> Result<(), SessionError> {
        let count = self.layers.len();
        let (before, rest) = self.layers.split_at_mut(count - 1);
        let upstream = upstream_of(&self.input, before);
        let layer = &mut rest[0];
        let index = layer.layer_index();

        if !layer.is_open() {
            layer.handle_click(scene, ElementTarget::Aggregation { layer_index: index })?;
        }
        info!("Layer {} is {}", index, layer.mode());

        let strip = ElementTarget::Strip {
            layer_index: index,
            channel: 0,
        };
        let relatives = layer.get_relative_elements(strip, upstream);
        debug!("Strip 0 relates to {} upstream element(s)", relatives.len());

        layer.handle_hover_in(scene, upstream, strip)?;
        if let Some(label) = layer.active_label() {
            debug!("Label shown on channel {}", label.channel);
        }
        layer.handle_hover_out(scene)?;

        layer.handle_click(scene, ElementTarget::CloseControl { layer_index: index })?;
        info!("Layer {} is {}", index, layer.mode());
        Ok(())
    }

    pub fn summary(&self) -> Vec<String> {
        let mut lines = vec![format!("input      {}", self.input.shape())];
        for layer in &self.layers {
            let shape = layer
                .shape()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string());
            lines.push(format!(
                "layer {:<4} {} x{} {} ({} element(s))",
                layer.layer_index(),
                shape,
                layer.size(),
                layer.mode(),
                layer.element_targets().len()
            ));
        }
        lines
    }

    /// Dispose layers from the top of the stack down.
    pub fn dispose(&mut self, scene: &mut dyn SceneGraph) -> Result<(), SessionError> {
        for layer in self.layers.iter_mut().rev() {
            layer.dispose(scene)?;
        }
        Ok(())
    }

    #[cfg(test)]
    fn layers(&self) -> &[UpSampling1d] {
        &self.layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_layer::RepresentationMode;
    use stratum_scene::RetainedScene;

    const SESSION_JSON: &str = r#"{
        "model": { "layerInitStatus": false },
        "input": { "width": 4, "depth": 3 },
        "layers": [ { "size": 2 }, { "size": 3, "initStatus": true } ]
    }"#;

    #[test]
    fn test_parse_session() {
        let config = SessionConfig::from_json_str(SESSION_JSON).unwrap();
        assert_eq!(config.input.width, 4);
        assert_eq!(config.layers.len(), 2);
        assert_eq!(config.layers[1].size, Some(3));
    }

    #[test]
    fn test_empty_chain_rejected() {
        let config = SessionConfig {
            model: ModelConfig::default(),
            input: Input1dConfig {
                width: 2,
                depth: 1,
                real_virtual_ratio: 1.0,
            },
            layers: Vec::new(),
        };
        assert!(matches!(Session::build(&config), Err(SessionError::EmptyChain)));
    }

    #[test]
    fn test_chain_shapes_compound() {
        let config = SessionConfig::from_json_str(SESSION_JSON).unwrap();
        let session = Session::build(&config).unwrap();
        let shapes: Vec<_> = session
            .layers()
            .iter()
            .map(|l| l.shape().map(|s| (s.width, s.depth)))
            .collect();
        assert_eq!(shapes, vec![Some((8, 3)), Some((24, 3))]);
    }

    #[test]
    fn test_full_session_leaves_scene_empty() {
        let config = SessionConfig::from_json_str(SESSION_JSON).unwrap();
        let mut scene = RetainedScene::new();
        let mut session = Session::build(&config).unwrap();
        session.init(&mut scene).unwrap();
        session.push_values(&mut scene).unwrap();
        session.replay_interactions(&mut scene).unwrap();

        let modes: Vec<_> = session.layers().iter().map(|l| l.mode()).collect();
        assert_eq!(modes, vec![RepresentationMode::Closed, RepresentationMode::Closed]);
        assert_eq!(session.summary().len(), 3);

        session.dispose(&mut scene).unwrap();
        assert_eq!(scene.live_groups(), 0);
        assert_eq!(scene.live_primitives(), 0);
    }
}
