//! Shape models that interaction states can read and resize.

mod ellipse;
mod freehand;
mod rectangle;

pub use ellipse::Ellipse;
pub use freehand::Freehand;
pub use rectangle::Rectangle;

use crate::geometry::Dimensions;
use kurbo::Affine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Anything with readable and writable axis-aligned dimensions.
///
/// Interaction states only ever talk to shapes through this trait.
pub trait ShapeModel {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Current dimensions in model space.
    fn dimensions(&self) -> Dimensions;

    /// Reshape so that `dimensions()` returns `dimensions` afterwards.
    fn set_dimensions(&mut self, dimensions: Dimensions);

    /// Owned copy of the model.
    fn to_shape(&self) -> Shape;

    /// Map the geometry through `affine`.
    ///
    /// The default maps the dimensions and writes them back. Shapes with
    /// interior geometry map every point instead, so flips and collapsed
    /// axes survive.
    fn transform(&mut self, affine: Affine) {
        let mut dimensions = self.dimensions();
        dimensions.transform(affine);
        self.set_dimensions(dimensions);
    }
}

/// Enum wrapper for all shape types (for serialization).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Shape {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Freehand(Freehand),
}

impl ShapeModel for Shape {
    fn id(&self) -> ShapeId {
        match self {
            Shape::Rectangle(s) => s.id(),
            Shape::Ellipse(s) => s.id(),
            Shape::Freehand(s) => s.id(),
        }
    }

    fn dimensions(&self) -> Dimensions {
        match self {
            Shape::Rectangle(s) => s.dimensions(),
            Shape::Ellipse(s) => s.dimensions(),
            Shape::Freehand(s) => s.dimensions(),
        }
    }

    fn set_dimensions(&mut self, dimensions: Dimensions) {
        match self {
            Shape::Rectangle(s) => s.set_dimensions(dimensions),
            Shape::Ellipse(s) => s.set_dimensions(dimensions),
            Shape::Freehand(s) => s.set_dimensions(dimensions),
        }
    }

    fn to_shape(&self) -> Shape {
        self.clone()
    }

    fn transform(&mut self, affine: Affine) {
        match self {
            Shape::Rectangle(s) => s.transform(affine),
            Shape::Ellipse(s) => s.transform(affine),
            Shape::Freehand(s) => s.transform(affine),
        }
    }
}

impl From<Rectangle> for Shape {
    fn from(shape: Rectangle) -> Self {
        Shape::Rectangle(shape)
    }
}

impl From<Ellipse> for Shape {
    fn from(shape: Ellipse) -> Self {
        Shape::Ellipse(shape)
    }
}

impl From<Freehand> for Shape {
    fn from(shape: Freehand) -> Self {
        Shape::Freehand(shape)
    }
}
