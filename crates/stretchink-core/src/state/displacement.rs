//! Drag-to-transform lifecycle shared by displacement-driven states.

use super::{GestureContext, State};
use crate::error::{GestureError, GestureResult};
use crate::input::{InputKind, MouseInput, PointerEvent};
use kurbo::Point;

/// Strategy plugged into a [`DisplacementState`].
pub trait DisplacementHandler {
    /// The gesture started.
    fn activated(&mut self, ctx: &mut GestureContext<'_>) -> GestureResult<()>;

    /// Total screen-space pointer movement since the gesture started.
    fn process_displacement(&mut self, dx: f64, dy: f64, ctx: &mut GestureContext<'_>) -> GestureResult<()>;

    /// The gesture ended or was cancelled.
    fn deactivated(&mut self, ctx: &mut GestureContext<'_>);
}

/// Turns pointer moves into cumulative displacements for a handler.
///
/// The origin is the pointer-down position at activation; every move
/// reports `position - origin`, never the delta since the previous move.
#[derive(Debug)]
pub struct DisplacementState<H> {
    name: String,
    interests: Vec<InputKind>,
    handler: H,
    origin: Option<Point>,
}

impl<H: DisplacementHandler> DisplacementState<H> {
    pub fn new(name: impl Into<String>, interests: impl Into<Vec<InputKind>>, handler: H) -> Self {
        Self {
            name: name.into(),
            interests: interests.into(),
            handler,
            origin: None,
        }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Gesture origin in screen coordinates, while active.
    pub fn origin(&self) -> Option<Point> {
        self.origin
    }
}

impl<H: DisplacementHandler> State for DisplacementState<H> {
    fn name(&self) -> &str {
        &self.name
    }

    fn interests(&self) -> &[InputKind] {
        &self.interests
    }

    fn activated(&mut self, ctx: &mut GestureContext<'_>) -> GestureResult<()> {
        let origin = ctx
            .inputs
            .require::<MouseInput>()?
            .down_position()
            .ok_or(GestureError::PointerNotDown)?;
        self.handler.activated(ctx)?;
        self.origin = Some(origin);
        Ok(())
    }

    fn handle_event(&mut self, event: &PointerEvent, ctx: &mut GestureContext<'_>) -> GestureResult<()> {
        let PointerEvent::Move { position } = event else {
            return Ok(());
        };
        let origin = self
            .origin
            .ok_or_else(|| GestureError::NotActive(self.name.clone()))?;
        let displacement = *position - origin;
        self.handler
            .process_displacement(displacement.x, displacement.y, ctx)
    }

    fn deactivated(&mut self, ctx: &mut GestureContext<'_>) {
        self.origin = None;
        self.handler.deactivated(ctx);
    }
}
