//! StretchInk Replay
//!
//! Plays a recorded resize gesture against an in-memory canvas. The script
//! carries its own configuration, the shapes to create, the selection and
//! the pointer path in screen coordinates.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::path::Path;
use stretchink_core::input::{HANDLE_HIT_TOLERANCE, MouseButton};
use stretchink_core::shapes::{Ellipse, Freehand, Rectangle};
use stretchink_core::state::RESIZE_STATE;
use stretchink_core::{
    AnchorInput, AnchorPosition, Canvas, GestureError, MouseInput, PointerEvent, SelectionModel,
    Shape, ShapeId, StateMachine, resize_state,
};
use thiserror::Error;

/// Replay errors.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Gesture failed: {0}")]
    Gesture(#[from] GestureError),
    #[error("Selection index out of range: {0}")]
    SelectionIndex(usize),
    #[error("No resize handle under {0:?}")]
    NoHandle(Point),
}

/// Host settings for a replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// View zoom (clamped by the camera).
    pub zoom: f64,
    /// View pan offset in screen pixels.
    pub offset: Vec2,
    /// Handle hit radius in screen pixels, used when no anchor is given.
    pub handle_tolerance: f64,
    /// Default log filter; `RUST_LOG` takes precedence.
    pub log_filter: String,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset: Vec2::ZERO,
            handle_tolerance: HANDLE_HIT_TOLERANCE,
            log_filter: "info".to_string(),
        }
    }
}

/// A shape to create before the gesture starts.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeSpec {
    Rectangle { x: f64, y: f64, width: f64, height: f64 },
    Ellipse { x: f64, y: f64, width: f64, height: f64 },
    Freehand { points: Vec<Point> },
}

impl ShapeSpec {
    fn build(&self) -> Shape {
        match self {
            ShapeSpec::Rectangle { x, y, width, height } => {
                Rectangle::new(Point::new(*x, *y), *width, *height).into()
            }
            ShapeSpec::Ellipse { x, y, width, height } => {
                Ellipse::from_rect(Rect::new(*x, *y, x + width, y + height)).into()
            }
            ShapeSpec::Freehand { points } => Freehand::from_points(points.clone()).into(),
        }
    }
}

fn default_release() -> bool {
    true
}

/// A recorded gesture.
#[derive(Debug, Clone, Deserialize)]
pub struct GestureScript {
    #[serde(default)]
    pub config: ReplayConfig,
    pub shapes: Vec<ShapeSpec>,
    /// Indices into `shapes`; everything when absent.
    #[serde(default)]
    pub selection: Option<Vec<usize>>,
    /// Anchor name such as `"BOT_RIGHT"`; hit-tested from `press` when absent.
    #[serde(default)]
    pub anchor: Option<String>,
    /// Pointer-down position in screen coordinates.
    pub press: Point,
    #[serde(default)]
    pub moves: Vec<Point>,
    /// End with a pointer-up; `false` cancels the gesture instead.
    #[serde(default = "default_release")]
    pub release: bool,
}

impl GestureScript {
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Load a script from disk.
pub fn load_script(path: impl AsRef<Path>) -> Result<GestureScript, ReplayError> {
    let json = std::fs::read_to_string(path)?;
    GestureScript::from_json(&json)
}

/// Result of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayOutcome {
    pub anchor: AnchorPosition,
    /// Number of moves that requested a redraw.
    pub redraws: usize,
    /// Shapes in creation order after the gesture.
    pub shapes: Vec<Shape>,
}

/// Run a script through a fresh state machine.
pub fn replay(script: &GestureScript) -> Result<ReplayOutcome, ReplayError> {
    let config = &script.config;
    let mut canvas = Canvas::new();
    canvas.camera.set_zoom(config.zoom);
    canvas.camera.offset = config.offset;

    let ids: Vec<ShapeId> = script
        .shapes
        .iter()
        .map(|spec| canvas.document.add_shape(spec.build()))
        .collect();
    let selected = match &script.selection {
        Some(indices) => indices
            .iter()
            .map(|&index| ids.get(index).copied().ok_or(ReplayError::SelectionIndex(index)))
            .collect::<Result<Vec<_>, _>>()?,
        None => ids.clone(),
    };
    let selection = SelectionModel::from_engine(&canvas, selected)?;

    let mut machine = StateMachine::new();
    machine.register_input(MouseInput::new());
    machine.register_input(AnchorInput::new());
    machine.register_state(resize_state())?;

    let anchor = match &script.anchor {
        Some(name) => {
            let anchor: AnchorPosition = name.parse()?;
            machine.select_anchor(anchor, selection)?;
            anchor
        }
        None => {
            let world = canvas.camera.screen_to_world(script.press);
            let tolerance = config.handle_tolerance / canvas.camera.zoom();
            machine
                .select_anchor_at(selection, world, tolerance)?
                .ok_or(ReplayError::NoHandle(script.press))?
        }
    };
    log::info!(
        "Replaying {} moves on {} shapes from {}",
        script.moves.len(),
        ids.len(),
        anchor
    );

    let press = PointerEvent::Down {
        position: script.press,
        button: MouseButton::Left,
    };
    machine.handle_pointer(press, &mut canvas)?;
    machine.activate(RESIZE_STATE, &mut canvas)?;

    let mut redraws = 0;
    for &position in &script.moves {
        machine.handle_pointer(PointerEvent::Move { position }, &mut canvas)?;
        if canvas.take_redraw() {
            redraws += 1;
        }
    }

    if script.release {
        let position = script.moves.last().copied().unwrap_or(script.press);
        let up = PointerEvent::Up {
            position,
            button: MouseButton::Left,
        };
        machine.handle_pointer(up, &mut canvas)?;
    } else {
        log::info!("Gesture cancelled");
        machine.deactivate(&mut canvas);
    }

    let shapes = ids
        .iter()
        .filter_map(|id| canvas.document.get_shape(*id).cloned())
        .collect();
    Ok(ReplayOutcome {
        anchor,
        redraws,
        shapes,
    })
}
