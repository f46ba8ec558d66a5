//! Rectangle shape.

use super::{Shape, ShapeId, ShapeModel};
use crate::geometry::Dimensions;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    /// Top-left corner position.
    pub position: Point,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            width,
            height,
        }
    }

    /// Get the rectangle as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }
}

impl ShapeModel for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn dimensions(&self) -> Dimensions {
        Dimensions::from_rect(self.as_rect())
    }

    fn set_dimensions(&mut self, dimensions: Dimensions) {
        self.position = dimensions.top_left();
        self.width = dimensions.width();
        self.height = dimensions.height();
    }

    fn to_shape(&self) -> Shape {
        self.clone().into()
    }
}
