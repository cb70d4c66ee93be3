//! Output value to color buffers, per representation.

use crate::Shape;
use stratum_data::{
    AggregationStrategy, ColorMap, DataError, MinMaxColorMap, project_aggregate, project_channels,
};
use stratum_scene::Color;

/// Projects a layer value into color buffers. Pure: it holds no element state.
pub struct ValueProjector {
    strategy: AggregationStrategy,
    color_map: Box<dyn ColorMap>,
}

impl ValueProjector {
    pub fn new(strategy: AggregationStrategy) -> Self {
        Self {
            strategy,
            color_map: Box::new(MinMaxColorMap),
        }
    }

    pub fn with_color_map(mut self, color_map: Box<dyn ColorMap>) -> Self {
        self.color_map = color_map;
        self
    }

    /// One buffer of `shape.width` colors per channel, in channel order.
    ///
    /// All channels are normalized together so strips stay comparable.
    pub fn segregation_colors(
        &self,
        value: &[f32],
        shape: Shape,
    ) -> Result<Vec<Vec<Color>>, DataError> {
        let channels = project_channels(value, shape.depth)?;
        let colors = self.color_map.map_to_colors(&channels);
        Ok(colors.chunks(shape.width.max(1)).map(<[Color]>::to_vec).collect())
    }

    /// A single buffer of `shape.width` colors for the aggregated row.
    pub fn aggregation_colors(&self, value: &[f32], shape: Shape) -> Result<Vec<Color>, DataError> {
        let aggregated = project_aggregate(value, shape.depth, self.strategy)?;
        Ok(self.color_map.map_to_colors(&aggregated))
    }
}

impl Default for ValueProjector {
    fn default() -> Self {
        Self::new(AggregationStrategy::default())
    }
}
