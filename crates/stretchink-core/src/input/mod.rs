//! Typed input channels consumed by interaction states.
//!
//! Every channel is a concrete type implementing [`Input`]; states look
//! channels up by type through the [`InputRegistry`] and get the exact
//! handle type back.

mod anchor;
mod mouse;

pub use anchor::{AnchorInput, AnchorLock, AnchorPosition, HANDLE_HIT_TOLERANCE};
pub use mouse::{MouseButton, MouseInput, PointerEvent};

use crate::error::{GestureError, GestureResult};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// A named input channel.
pub trait Input: Any {
    /// Stable identifier used in logs and errors.
    const NAME: &'static str;
}

/// Kinds of input a state can declare interest in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    MouseDown,
    MouseMove,
    MouseUp,
}

impl InputKind {
    /// The kind a pointer event belongs to.
    pub fn of(event: &PointerEvent) -> Self {
        match event {
            PointerEvent::Down { .. } => InputKind::MouseDown,
            PointerEvent::Move { .. } => InputKind::MouseMove,
            PointerEvent::Up { .. } => InputKind::MouseUp,
        }
    }
}

/// Input channels keyed by their type.
#[derive(Default)]
pub struct InputRegistry {
    inputs: HashMap<TypeId, (&'static str, Box<dyn Any>)>,
}

impl InputRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel, returning the one it replaced.
    pub fn register<T: Input>(&mut self, input: T) -> Option<T> {
        self.inputs
            .insert(TypeId::of::<T>(), (T::NAME, Box::new(input) as Box<dyn Any>))
            .and_then(|(_, old)| old.downcast::<T>().ok())
            .map(|old| *old)
    }

    pub fn get<T: Input>(&self) -> Option<&T> {
        self.inputs
            .get(&TypeId::of::<T>())
            .and_then(|(_, input)| input.downcast_ref::<T>())
    }

    pub fn get_mut<T: Input>(&mut self) -> Option<&mut T> {
        self.inputs
            .get_mut(&TypeId::of::<T>())
            .and_then(|(_, input)| input.downcast_mut::<T>())
    }

    /// Like [`get`](Self::get), but a missing channel is an error.
    pub fn require<T: Input>(&self) -> GestureResult<&T> {
        self.get::<T>().ok_or(GestureError::MissingInput(T::NAME))
    }
}

impl fmt::Debug for InputRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.inputs.values().map(|(name, _)| name))
            .finish()
    }
}
