//! Selection model consumed by anchor inputs.

use crate::canvas::CanvasEngine;
use crate::error::{GestureError, GestureResult};
use crate::geometry::Dimensions;
use crate::shapes::ShapeId;

/// The selected shapes, in a stable order, with their aggregate bounds.
///
/// The bounds are supplied by whoever builds the selection; interaction
/// states treat them as read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionModel {
    models: Vec<ShapeId>,
    dimensions: Dimensions,
}

impl SelectionModel {
    /// Create a selection with externally computed bounds.
    pub fn new(models: Vec<ShapeId>, dimensions: Dimensions) -> Self {
        Self { models, dimensions }
    }

    /// Build a selection whose bounds are the union of its members' dimensions.
    pub fn from_engine(engine: &dyn CanvasEngine, models: Vec<ShapeId>) -> GestureResult<Self> {
        let mut dimensions: Option<Dimensions> = None;
        for &id in &models {
            let model = engine.model(id).ok_or(GestureError::UnknownShape(id))?;
            let dims = model.dimensions();
            dimensions = Some(match dimensions {
                Some(acc) => acc.union(&dims),
                None => dims,
            });
        }
        let dimensions = dimensions.ok_or(GestureError::EmptySelection)?;
        Ok(Self { models, dimensions })
    }

    /// Selected shape IDs in selection order.
    pub fn models(&self) -> &[ShapeId] {
        &self.models
    }

    /// Aggregate bounding dimensions.
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }
}
