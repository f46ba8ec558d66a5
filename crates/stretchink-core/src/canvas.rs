//! Canvas document and the engine contract interaction states write through.

use crate::camera::Camera;
use crate::shapes::{Shape, ShapeId, ShapeModel};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What an interaction state needs from the host canvas.
pub trait CanvasEngine {
    /// Current view scale factor, always > 0.
    fn zoom_level(&self) -> f64;

    /// Look up a shape model by ID.
    fn model(&self, id: ShapeId) -> Option<&dyn ShapeModel>;

    /// Swap in new geometry for a model. Returns false if `id` is unknown.
    fn replace_model(&mut self, id: ShapeId, shape: Shape) -> bool;

    /// Request a redraw after geometry changed.
    fn force_update(&mut self);
}

/// A canvas document containing all shapes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CanvasDocument {
    /// All shapes in the document, keyed by ID.
    pub shapes: HashMap<ShapeId, Shape>,
}

impl CanvasDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape to the document and return its ID.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        self.shapes.insert(id, shape);
        id
    }

    /// Remove a shape from the document.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        self.shapes.remove(&id)
    }

    /// Get a shape by ID.
    pub fn get_shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    /// Get a mutable reference to a shape by ID.
    pub fn get_shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.get_mut(&id)
    }
}

/// A document together with its view and redraw bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    pub document: CanvasDocument,
    pub camera: Camera,
    needs_redraw: bool,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a redraw was requested since the last call; clears the flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }
}

impl CanvasEngine for Canvas {
    fn zoom_level(&self) -> f64 {
        self.camera.zoom()
    }

    fn model(&self, id: ShapeId) -> Option<&dyn ShapeModel> {
        self.document.get_shape(id).map(|shape| shape as &dyn ShapeModel)
    }

    fn replace_model(&mut self, id: ShapeId, shape: Shape) -> bool {
        match self.document.get_shape_mut(id) {
            Some(slot) => {
                *slot = shape;
                true
            }
            None => false,
        }
    }

    fn force_update(&mut self) {
        self.needs_redraw = true;
    }
}
