//! Interaction states and the machine that drives them.
//!
//! The host decides which state to activate; the machine keeps the input
//! channels up to date, forwards pointer events to the active state and
//! guarantees that deactivation runs on every way out of a gesture.
//! Anchor selections reach states through the registered [`AnchorInput`].

mod displacement;
mod resize;

pub use displacement::{DisplacementHandler, DisplacementState};
pub use resize::{RESIZE_STATE, ResizeDimensions, resize_state, resize_transform};

use crate::canvas::CanvasEngine;
use crate::error::{GestureError, GestureResult};
use crate::input::{
    AnchorInput, AnchorPosition, Input, InputKind, InputRegistry, MouseButton, MouseInput, PointerEvent,
};
use crate::selection::SelectionModel;
use kurbo::Point;

/// What a state sees while it handles a callback.
pub struct GestureContext<'a> {
    pub inputs: &'a InputRegistry,
    pub engine: &'a mut dyn CanvasEngine,
}

/// An interaction state.
pub trait State {
    /// Unique name used to activate the state.
    fn name(&self) -> &str;

    /// Input kinds this state reacts to.
    fn interests(&self) -> &[InputKind];

    /// Called once when the state becomes active. An error leaves it inactive.
    fn activated(&mut self, ctx: &mut GestureContext<'_>) -> GestureResult<()>;

    /// Called for every pointer event of an interesting kind while active.
    fn handle_event(&mut self, event: &PointerEvent, ctx: &mut GestureContext<'_>) -> GestureResult<()>;

    /// Called once when the state stops being active, however that happens.
    fn deactivated(&mut self, ctx: &mut GestureContext<'_>);

    fn is_interested(&self, kind: InputKind) -> bool {
        self.interests().contains(&kind)
    }
}

/// Registered inputs and states, with at most one active state.
#[derive(Default)]
pub struct StateMachine {
    inputs: InputRegistry,
    states: Vec<Box<dyn State>>,
    active: Option<usize>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_input<T: Input>(&mut self, input: T) -> Option<T> {
        self.inputs.register(input)
    }

    pub fn register_state<S: State + 'static>(&mut self, state: S) -> GestureResult<()> {
        if self.states.iter().any(|s| s.name() == state.name()) {
            return Err(GestureError::DuplicateState(state.name().to_string()));
        }
        log::debug!("Registered state {} ({:?})", state.name(), state.interests());
        self.states.push(Box::new(state));
        Ok(())
    }

    pub fn input<T: Input>(&self) -> Option<&T> {
        self.inputs.get::<T>()
    }

    /// Record the grabbed handle on the anchor input.
    pub fn select_anchor(&self, anchor: AnchorPosition, selection: SelectionModel) -> GestureResult<()> {
        self.inputs.require::<AnchorInput>()?.set(anchor, selection)?;
        log::debug!("Anchor {} selected", anchor);
        Ok(())
    }

    /// Hit-test the selection's handles at a model-space `point` and record
    /// the one found. `Ok(None)` means no handle was under the point.
    pub fn select_anchor_at(
        &self,
        selection: SelectionModel,
        point: Point,
        tolerance: f64,
    ) -> GestureResult<Option<AnchorPosition>> {
        let hit = self
            .inputs
            .require::<AnchorInput>()?
            .select_at(selection, point, tolerance)?;
        if let Some(anchor) = hit {
            log::debug!("Anchor {} selected at {:?}", anchor, point);
        }
        Ok(hit)
    }

    /// Name of the active state, if any.
    pub fn active_state(&self) -> Option<&str> {
        self.active.map(|index| self.states[index].name())
    }

    /// Activate a registered state by name.
    pub fn activate(&mut self, name: &str, engine: &mut dyn CanvasEngine) -> GestureResult<()> {
        if let Some(active) = self.active_state() {
            return Err(GestureError::AlreadyActive(active.to_string()));
        }
        let index = self
            .states
            .iter()
            .position(|state| state.name() == name)
            .ok_or_else(|| GestureError::UnknownState(name.to_string()))?;

        let mut ctx = GestureContext {
            inputs: &self.inputs,
            engine,
        };
        self.states[index].activated(&mut ctx)?;
        log::debug!("State {} activated", name);
        self.active = Some(index);
        Ok(())
    }

    /// Feed a pointer event through the machine.
    ///
    /// Releasing the primary button ends the active gesture. If the active
    /// state fails, the gesture is aborted (the state is deactivated) and the
    /// error returned.
    pub fn handle_pointer(&mut self, event: PointerEvent, engine: &mut dyn CanvasEngine) -> GestureResult<()> {
        if let Some(mouse) = self.inputs.get_mut::<MouseInput>() {
            mouse.handle_pointer_event(event.clone());
        }
        let Some(index) = self.active else {
            return Ok(());
        };

        let kind = InputKind::of(&event);
        if self.states[index].is_interested(kind) {
            let mut ctx = GestureContext {
                inputs: &self.inputs,
                engine: &mut *engine,
            };
            if let Err(err) = self.states[index].handle_event(&event, &mut ctx) {
                log::warn!("Aborting {}: {}", self.states[index].name(), err);
                self.deactivate(engine);
                return Err(err);
            }
        }

        if matches!(event, PointerEvent::Up { button: MouseButton::Left, .. }) {
            self.deactivate(engine);
        }
        Ok(())
    }

    /// Deactivate the active state. Returns false if nothing was active.
    pub fn deactivate(&mut self, engine: &mut dyn CanvasEngine) -> bool {
        let Some(index) = self.active.take() else {
            return false;
        };
        let mut ctx = GestureContext {
            inputs: &self.inputs,
            engine,
        };
        let state = &mut self.states[index];
        state.deactivated(&mut ctx);
        log::debug!("State {} deactivated", state.name());
        true
    }
}
