//! Gesture errors.

use crate::input::AnchorPosition;
use crate::shapes::ShapeId;
use thiserror::Error;

/// Errors raised by inputs and interaction states.
///
/// None of these are recoverable inside a gesture: the state machine aborts
/// the active gesture and hands the error back to the host.
#[derive(Debug, Error, PartialEq)]
pub enum GestureError {
    #[error("Input not registered: {0}")]
    MissingInput(&'static str),
    #[error("No anchor has been selected")]
    NoAnchor,
    #[error("Anchor input is locked by an active gesture")]
    AnchorLocked,
    #[error("Unknown anchor position: {0}")]
    UnknownAnchor(String),
    #[error("Cannot resize from {anchor:?}: selection is {width}x{height}")]
    DegenerateSelection {
        anchor: AnchorPosition,
        width: f64,
        height: f64,
    },
    #[error("Selection is empty")]
    EmptySelection,
    #[error("Shape not found: {0}")]
    UnknownShape(ShapeId),
    #[error("Zoom level must be positive, got {0}")]
    InvalidZoom(f64),
    #[error("Pointer is not down")]
    PointerNotDown,
    #[error("State is not active: {0}")]
    NotActive(String),
    #[error("A state is already active: {0}")]
    AlreadyActive(String),
    #[error("State not registered: {0}")]
    UnknownState(String),
    #[error("State already registered: {0}")]
    DuplicateState(String),
}

/// Result type for gesture operations.
pub type GestureResult<T> = Result<T, GestureError>;
