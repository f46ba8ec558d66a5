//! Freehand drawing shape.

use super::{Shape, ShapeId, ShapeModel};
use crate::geometry::Dimensions;
use kurbo::{Affine, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freehand drawing (series of points).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Freehand {
    pub(crate) id: ShapeId,
    /// Points in the freehand path.
    pub points: Vec<Point>,
}

impl Freehand {
    /// Create from existing points.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
        }
    }
}

/// Remap one coordinate from `[from0, from1]` into `[to0, to1]`.
/// A collapsed source range is translated instead of scaled.
fn remap(value: f64, from0: f64, from1: f64, to0: f64, to1: f64) -> f64 {
    let span = from1 - from0;
    if span.abs() < f64::EPSILON {
        return to0 + (value - from0);
    }
    to0 + (value - from0) * (to1 - to0) / span
}

impl ShapeModel for Freehand {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn dimensions(&self) -> Dimensions {
        Dimensions::from_points(&self.points).unwrap_or_else(|| Dimensions::from_rect(Rect::ZERO))
    }

    fn set_dimensions(&mut self, dimensions: Dimensions) {
        if self.points.is_empty() {
            return;
        }
        let from = self.dimensions().rect();
        let to = dimensions.rect();
        for point in &mut self.points {
            point.x = remap(point.x, from.x0, from.x1, to.x0, to.x1);
            point.y = remap(point.y, from.y0, from.y1, to.y0, to.y1);
        }
    }

    fn to_shape(&self) -> Shape {
        self.clone().into()
    }

    fn transform(&mut self, affine: Affine) {
        for point in &mut self.points {
            *point = affine * *point;
        }
    }
}
