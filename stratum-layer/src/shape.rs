//! Output shape planning and channel anchor placement.

use crate::LayerError;
use glam::Vec3;
use std::fmt;

/// Output extent of a 1d layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    /// Spatial extent.
    pub width: usize,
    /// Channel count.
    pub depth: usize,
}

impl Shape {
    pub fn new(width: usize, depth: usize) -> Self {
        Self { width, depth }
    }

    /// Number of scalar values a layer with this shape outputs.
    pub fn len(&self) -> usize {
        self.width * self.depth
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.width, self.depth)
    }
}

/// Derives a layer's output shape from its upstream shape.
pub trait ShapePlanner {
    fn plan(&self, upstream: Shape) -> Result<Shape, LayerError>;
}

/// Repeats every position `size` times and keeps the channel count.
#[derive(Debug, Clone, Copy)]
pub struct UpsamplingPlanner {
    pub size: usize,
}

impl UpsamplingPlanner {
    pub fn new(size: usize) -> Self {
        Self { size }
    }
}

impl ShapePlanner for UpsamplingPlanner {
    /// Fails when the output extent or value length would overflow `usize`.
    fn plan(&self, upstream: Shape) -> Result<Shape, LayerError> {
        upstream
            .width
            .checked_mul(self.size)
            .filter(|width| width.checked_mul(upstream.depth).is_some())
            .map(|width| Shape::new(width, upstream.depth))
            .ok_or(LayerError::OutputTooLarge {
                upstream,
                size: self.size,
            })
    }
}

/// Derives per-channel anchors from the upstream layer's anchors.
pub trait CenterListBuilder {
    fn build(&self, upstream_centers: &[Vec3], depth: usize) -> Result<Vec<Vec3>, LayerError>;
}

/// Keeps channels exactly where the upstream layer put them.
#[derive(Debug, Clone, Copy, Default)]
pub struct MirroredCenters;

impl CenterListBuilder for MirroredCenters {
    fn build(&self, upstream_centers: &[Vec3], depth: usize) -> Result<Vec<Vec3>, LayerError> {
        if upstream_centers.len() != depth {
            return Err(LayerError::CenterCountMismatch {
                expected: depth,
                found: upstream_centers.len(),
            });
        }
        Ok(upstream_centers.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsampling_scales_width_only() {
        let planner = UpsamplingPlanner::new(2);
        let shape = planner.plan(Shape::new(4, 3)).unwrap();
        assert_eq!(shape, Shape::new(8, 3));
        assert_eq!(shape.len(), 24);
    }

    #[test]
    fn test_upsampling_property() {
        for width in 1..8 {
            for depth in 1..5 {
                for size in 1..5 {
                    let shape = UpsamplingPlanner::new(size)
                        .plan(Shape::new(width, depth))
                        .unwrap();
                    assert_eq!(shape.width, width * size);
                    assert_eq!(shape.depth, depth);
                }
            }
        }
    }

    #[test]
    fn test_upsampling_rejects_overflowing_size() {
        let err = UpsamplingPlanner::new(usize::MAX / 2)
            .plan(Shape::new(4, 3))
            .unwrap_err();
        assert!(matches!(
            err,
            LayerError::OutputTooLarge {
                upstream: Shape { width: 4, depth: 3 },
                size
            } if size == usize::MAX / 2
        ));

        // width fits, but width * depth does not
        let err = UpsamplingPlanner::new(usize::MAX / 4)
            .plan(Shape::new(2, 3))
            .unwrap_err();
        assert!(matches!(err, LayerError::OutputTooLarge { .. }));
    }

    #[test]
    fn test_mirrored_centers_copy_verbatim() {
        let upstream = vec![
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 5.0),
        ];
        let centers = MirroredCenters.build(&upstream, 3).unwrap();
        assert_eq!(centers, upstream);
    }

    #[test]
    fn test_mirrored_centers_reject_wrong_count() {
        let err = MirroredCenters.build(&[Vec3::ZERO], 2).unwrap_err();
        assert!(matches!(
            err,
            LayerError::CenterCountMismatch {
                expected: 2,
                found: 1
            }
        ));
    }
}
