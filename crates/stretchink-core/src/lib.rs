//! StretchInk Core Library
//!
//! Interaction core for the StretchInk canvas: typed input channels, the
//! gesture state machine, and the handle-driven resize of a selection.

pub mod camera;
pub mod canvas;
pub mod error;
pub mod geometry;
pub mod input;
pub mod selection;
pub mod shapes;
pub mod state;

pub use camera::Camera;
pub use canvas::{Canvas, CanvasDocument, CanvasEngine};
pub use error::{GestureError, GestureResult};
pub use geometry::{Dimensions, scale_about};
pub use input::{AnchorInput, AnchorLock, AnchorPosition, Input, InputKind, InputRegistry, MouseInput, PointerEvent};
pub use selection::SelectionModel;
pub use shapes::{Shape, ShapeId, ShapeModel};
pub use state::{DisplacementHandler, DisplacementState, GestureContext, ResizeDimensions, State, StateMachine, resize_state};
