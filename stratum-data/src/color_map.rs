//! Value-to-color mapping.

use stratum_scene::Color;

/// Maps a sequence of output values to one color each.
///
/// Implementations must be deterministic: equal inputs give equal outputs.
pub trait ColorMap {
    fn map_to_colors(&self, values: &[f32]) -> Vec<Color>;
}

/// Normalizes values to `[0, 1]` by their min and max and renders them gray.
///
/// A constant input has no range and maps to black.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinMaxColorMap;

impl MinMaxColorMap {
    /// Normalized intensities, before they become colors.
    pub fn adjust_values(values: &[f32]) -> Vec<f32> {
        let (min, max) = values
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let range = max - min;
        if range.is_nan() || range <= 0.0 {
            return vec![0.0; values.len()];
        }
        values.iter().map(|v| (v - min) / range).collect()
    }
}

impl ColorMap for MinMaxColorMap {
    fn map_to_colors(&self, values: &[f32]) -> Vec<Color> {
        Self::adjust_values(values)
            .into_iter()
            .map(Color::gray)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_values_spans_unit_range() {
        let adjusted = MinMaxColorMap::adjust_values(&[2.0, 4.0, 6.0]);
        assert_eq!(adjusted, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_constant_input_maps_to_black() {
        let colors = MinMaxColorMap.map_to_colors(&[3.0, 3.0]);
        assert_eq!(colors, vec![Color::BLACK, Color::BLACK]);
    }

    #[test]
    fn test_empty_input() {
        assert!(MinMaxColorMap.map_to_colors(&[]).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let values = [0.3, -1.0, 7.5, 2.0];
        assert_eq!(
            MinMaxColorMap.map_to_colors(&values),
            MinMaxColorMap.map_to_colors(&values)
        );
    }
}
