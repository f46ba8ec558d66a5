//! Anchor input: which handle started a gesture, on which selection.

use super::Input;
use crate::error::{GestureError, GestureResult};
use crate::geometry::Dimensions;
use crate::selection::SelectionModel;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Handle hit tolerance in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 24.0;

/// The eight handles around a selection's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnchorPosition {
    TopLeft,
    Top,
    TopRight,
    Right,
    BotRight,
    Bot,
    BotLeft,
    Left,
}

impl AnchorPosition {
    /// All positions, clockwise from the top-left corner.
    pub const ALL: [AnchorPosition; 8] = [
        AnchorPosition::TopLeft,
        AnchorPosition::Top,
        AnchorPosition::TopRight,
        AnchorPosition::Right,
        AnchorPosition::BotRight,
        AnchorPosition::Bot,
        AnchorPosition::BotLeft,
        AnchorPosition::Left,
    ];

    /// The handle on the other side of the bounding box.
    pub fn opposite(self) -> Self {
        match self {
            AnchorPosition::TopLeft => AnchorPosition::BotRight,
            AnchorPosition::Top => AnchorPosition::Bot,
            AnchorPosition::TopRight => AnchorPosition::BotLeft,
            AnchorPosition::Right => AnchorPosition::Left,
            AnchorPosition::BotRight => AnchorPosition::TopLeft,
            AnchorPosition::Bot => AnchorPosition::Top,
            AnchorPosition::BotLeft => AnchorPosition::TopRight,
            AnchorPosition::Left => AnchorPosition::Right,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AnchorPosition::TopLeft => "TOP_LEFT",
            AnchorPosition::Top => "TOP",
            AnchorPosition::TopRight => "TOP_RIGHT",
            AnchorPosition::Right => "RIGHT",
            AnchorPosition::BotRight => "BOT_RIGHT",
            AnchorPosition::Bot => "BOT",
            AnchorPosition::BotLeft => "BOT_LEFT",
            AnchorPosition::Left => "LEFT",
        }
    }

    /// Find the handle of `dimensions` closest to `point`, within `tolerance`.
    pub fn hit_test(dimensions: &Dimensions, point: Point, tolerance: f64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .map(|anchor| (anchor, dimensions.anchor_point(anchor).distance_squared(point)))
            .filter(|&(_, dist_sq)| dist_sq <= tolerance * tolerance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(anchor, _)| anchor)
    }
}

impl fmt::Display for AnchorPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnchorPosition {
    type Err = GestureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|anchor| anchor.as_str() == normalized)
            .ok_or_else(|| GestureError::UnknownAnchor(s.to_string()))
    }
}

#[derive(Debug, Default)]
struct AnchorSlot {
    anchor: Option<AnchorPosition>,
    selection: Option<SelectionModel>,
    locked: bool,
}

/// Shared anchor/selection slot.
///
/// Cloning yields another handle to the same slot. While an [`AnchorLock`]
/// is alive every read and write through any handle fails with
/// [`GestureError::AnchorLocked`].
#[derive(Debug, Clone, Default)]
pub struct AnchorInput {
    slot: Rc<RefCell<AnchorSlot>>,
}

impl Input for AnchorInput {
    const NAME: &'static str = "model-anchor";
}

impl AnchorInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the handle that was grabbed and the selection it belongs to.
    pub fn set(&self, anchor: AnchorPosition, selection: SelectionModel) -> GestureResult<()> {
        let mut slot = self.slot.borrow_mut();
        if slot.locked {
            return Err(GestureError::AnchorLocked);
        }
        slot.anchor = Some(anchor);
        slot.selection = Some(selection);
        Ok(())
    }

    /// Hit-test the selection's handles and record the one under `point`.
    ///
    /// Returns `Ok(None)` and leaves the slot untouched when nothing is hit.
    pub fn select_at(
        &self,
        selection: SelectionModel,
        point: Point,
        tolerance: f64,
    ) -> GestureResult<Option<AnchorPosition>> {
        if self.is_locked() {
            return Err(GestureError::AnchorLocked);
        }
        let hit = AnchorPosition::hit_test(&selection.dimensions(), point, tolerance);
        if let Some(anchor) = hit {
            self.set(anchor, selection)?;
        }
        Ok(hit)
    }

    pub fn clear(&self) -> GestureResult<()> {
        let mut slot = self.slot.borrow_mut();
        if slot.locked {
            return Err(GestureError::AnchorLocked);
        }
        slot.anchor = None;
        slot.selection = None;
        Ok(())
    }

    pub fn anchor(&self) -> GestureResult<Option<AnchorPosition>> {
        let slot = self.slot.borrow();
        if slot.locked {
            return Err(GestureError::AnchorLocked);
        }
        Ok(slot.anchor)
    }

    pub fn selection(&self) -> GestureResult<Option<SelectionModel>> {
        let slot = self.slot.borrow();
        if slot.locked {
            return Err(GestureError::AnchorLocked);
        }
        Ok(slot.selection.clone())
    }

    pub fn is_locked(&self) -> bool {
        self.slot.borrow().locked
    }

    /// Take exclusive ownership of the anchor for one gesture.
    ///
    /// The lock is not reentrant. It is released when the returned guard is
    /// ejected or dropped.
    pub fn lock(&self) -> GestureResult<AnchorLock> {
        let mut slot = self.slot.borrow_mut();
        if slot.locked {
            return Err(GestureError::AnchorLocked);
        }
        let anchor = slot.anchor.ok_or(GestureError::NoAnchor)?;
        let selection = slot.selection.clone().ok_or(GestureError::NoAnchor)?;
        slot.locked = true;
        log::debug!("Anchor {} locked ({} models)", anchor, selection.len());
        Ok(AnchorLock {
            slot: Rc::clone(&self.slot),
            anchor,
            selection,
        })
    }
}

/// Exclusive hold on an [`AnchorInput`] for the duration of a gesture.
#[must_use = "dropping the lock releases the anchor immediately"]
#[derive(Debug)]
pub struct AnchorLock {
    slot: Rc<RefCell<AnchorSlot>>,
    anchor: AnchorPosition,
    selection: SelectionModel,
}

impl AnchorLock {
    /// The anchor captured when the lock was taken.
    pub fn anchor(&self) -> AnchorPosition {
        self.anchor
    }

    /// The selection captured when the lock was taken.
    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    /// Release the anchor.
    pub fn eject(self) {}
}

impl Drop for AnchorLock {
    fn drop(&mut self) {
        self.slot.borrow_mut().locked = false;
        log::debug!("Anchor {} released", self.anchor);
    }
}
