//! Handle-driven resize of the selected shapes.

use super::{DisplacementHandler, DisplacementState, GestureContext};
use crate::error::{GestureError, GestureResult};
use crate::geometry::{Dimensions, scale_about};
use crate::input::{AnchorInput, AnchorLock, AnchorPosition, InputKind};
use crate::shapes::{Shape, ShapeId, ShapeModel};
use kurbo::{Affine, Vec2};

/// Registered name of the resize state.
pub const RESIZE_STATE: &str = "resize-dimension";

/// The resize state, ready to register with a
/// [`StateMachine`](super::StateMachine).
pub fn resize_state() -> DisplacementState<ResizeDimensions> {
    DisplacementState::new(
        RESIZE_STATE,
        [InputKind::MouseDown, InputKind::MouseMove],
        ResizeDimensions::new(),
    )
}

/// How one axis responds to the dragged handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisScale {
    /// Positive displacement grows the box (handle on the max side).
    Grow,
    /// Positive displacement shrinks the box (handle on the min side).
    Shrink,
    /// Axis is not dragged.
    Fixed,
}

impl AxisScale {
    fn factor(self, size: f64, distance: f64) -> f64 {
        match self {
            AxisScale::Grow => (size + distance) / size,
            AxisScale::Shrink => (size - distance) / size,
            AxisScale::Fixed => 1.0,
        }
    }

    fn can_scale(self, size: f64) -> bool {
        self == AxisScale::Fixed || (size.is_finite() && size > 0.0)
    }
}

fn axis_scales(anchor: AnchorPosition) -> (AxisScale, AxisScale) {
    use AxisScale::*;
    match anchor {
        AnchorPosition::TopLeft => (Shrink, Shrink),
        AnchorPosition::Top => (Fixed, Shrink),
        AnchorPosition::TopRight => (Grow, Shrink),
        AnchorPosition::Right => (Grow, Fixed),
        AnchorPosition::BotRight => (Grow, Grow),
        AnchorPosition::Bot => (Fixed, Grow),
        AnchorPosition::BotLeft => (Shrink, Grow),
        AnchorPosition::Left => (Shrink, Fixed),
    }
}

/// Refuse anchors whose dragged axis has no extent to scale.
fn check_resizable(anchor: AnchorPosition, dimensions: &Dimensions) -> GestureResult<()> {
    let (x, y) = axis_scales(anchor);
    if x.can_scale(dimensions.width()) && y.can_scale(dimensions.height()) {
        Ok(())
    } else {
        Err(GestureError::DegenerateSelection {
            anchor,
            width: dimensions.width(),
            height: dimensions.height(),
        })
    }
}

/// Scale `initial` about the handle opposite `anchor` so that the dragged
/// handle follows a model-space `distance`.
pub fn resize_transform(anchor: AnchorPosition, initial: &Dimensions, distance: Vec2) -> Affine {
    let (x, y) = axis_scales(anchor);
    scale_about(
        x.factor(initial.width(), distance.x),
        y.factor(initial.height(), distance.y),
        initial.anchor_point(anchor.opposite()),
    )
}

#[derive(Debug)]
struct ResizeSession {
    lock: AnchorLock,
    initial_dimension: Dimensions,
    initial_models: Vec<(ShapeId, Shape)>,
}

/// Resizes every selected shape from the snapshot taken at activation.
///
/// Each move maps a fresh copy of every shape as it was at activation, so
/// the result only depends on the current cumulative displacement.
#[derive(Debug, Default)]
pub struct ResizeDimensions {
    session: Option<ResizeSession>,
}

impl ResizeDimensions {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplacementHandler for ResizeDimensions {
    fn activated(&mut self, ctx: &mut GestureContext<'_>) -> GestureResult<()> {
        // Any early return below drops the lock again
        let lock = ctx.inputs.require::<AnchorInput>()?.lock()?;
        let anchor = lock.anchor();
        let initial_dimension = lock.selection().dimensions();
        check_resizable(anchor, &initial_dimension)?;

        let initial_models = lock
            .selection()
            .models()
            .iter()
            .map(|&id| {
                ctx.engine
                    .model(id)
                    .map(|model| (id, model.to_shape()))
                    .ok_or(GestureError::UnknownShape(id))
            })
            .collect::<GestureResult<Vec<_>>>()?;

        log::debug!(
            "Resize from {} on {} models, bounds {:?}",
            anchor,
            initial_models.len(),
            initial_dimension.rect()
        );
        self.session = Some(ResizeSession {
            lock,
            initial_dimension,
            initial_models,
        });
        Ok(())
    }

    fn process_displacement(&mut self, dx: f64, dy: f64, ctx: &mut GestureContext<'_>) -> GestureResult<()> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| GestureError::NotActive(RESIZE_STATE.to_string()))?;

        let zoom = ctx.engine.zoom_level();
        if !(zoom.is_finite() && zoom > 0.0) {
            return Err(GestureError::InvalidZoom(zoom));
        }
        let distance = Vec2::new(dx / zoom, dy / zoom);
        let transform = resize_transform(session.lock.anchor(), &session.initial_dimension, distance);
        log::trace!("Resize displacement {:?} -> {:?}", distance, transform);

        for (id, initial) in &session.initial_models {
            let mut shape = initial.clone();
            shape.transform(transform);
            if !ctx.engine.replace_model(*id, shape) {
                return Err(GestureError::UnknownShape(*id));
            }
        }

        ctx.engine.force_update();
        Ok(())
    }

    fn deactivated(&mut self, _ctx: &mut GestureContext<'_>) {
        if let Some(session) = self.session.take() {
            session.lock.eject();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::input::{MouseButton, MouseInput, PointerEvent};
    use crate::selection::SelectionModel;
    use crate::shapes::{Freehand, Rectangle};
    use crate::state::StateMachine;
    use kurbo::Point;

    const EPS: f64 = 1e-9;

    fn assert_dims(actual: Dimensions, x: f64, y: f64, width: f64, height: f64) {
        assert!(
            (actual.x() - x).abs() < EPS
                && (actual.y() - y).abs() < EPS
                && (actual.width() - width).abs() < EPS
                && (actual.height() - height).abs() < EPS,
            "expected ({x}, {y}, {width}, {height}), got {:?}",
            actual.rect()
        );
    }

    fn assert_point(actual: Point, expected: Point) {
        assert!(
            (actual.x - expected.x).abs() < EPS && (actual.y - expected.y).abs() < EPS,
            "expected {expected:?}, got {actual:?}"
        );
    }

    struct Fixture {
        machine: StateMachine,
        canvas: Canvas,
        anchor: AnchorInput,
        ids: Vec<ShapeId>,
    }

    impl Fixture {
        fn new(shapes: Vec<Shape>, anchor: AnchorPosition) -> Self {
            let mut canvas = Canvas::new();
            let ids: Vec<_> = shapes
                .into_iter()
                .map(|shape| canvas.document.add_shape(shape))
                .collect();
            let selection = SelectionModel::from_engine(&canvas, ids.clone()).unwrap();

            let anchor_input = AnchorInput::new();
            let mut machine = StateMachine::new();
            machine.register_input(MouseInput::new());
            machine.register_input(anchor_input.clone());
            machine.register_state(resize_state()).unwrap();
            machine.select_anchor(anchor, selection).unwrap();

            Self {
                machine,
                canvas,
                anchor: anchor_input,
                ids,
            }
        }

        fn single(x: f64, y: f64, width: f64, height: f64, anchor: AnchorPosition) -> Self {
            Self::new(vec![Rectangle::new(Point::new(x, y), width, height).into()], anchor)
        }

        fn press(&mut self, x: f64, y: f64) -> GestureResult<()> {
            let event = PointerEvent::Down {
                position: Point::new(x, y),
                button: MouseButton::Left,
            };
            self.machine.handle_pointer(event, &mut self.canvas)?;
            self.machine.activate(RESIZE_STATE, &mut self.canvas)
        }

        fn drag_to(&mut self, x: f64, y: f64) -> GestureResult<()> {
            let event = PointerEvent::Move {
                position: Point::new(x, y),
            };
            self.machine.handle_pointer(event, &mut self.canvas)
        }

        fn release(&mut self) {
            let event = PointerEvent::Up {
                position: Point::ZERO,
                button: MouseButton::Left,
            };
            self.machine.handle_pointer(event, &mut self.canvas).unwrap();
        }

        fn dims(&self, index: usize) -> Dimensions {
            self.canvas.document.get_shape(self.ids[index]).unwrap().dimensions()
        }

        fn anchor_selection(&self) -> SelectionModel {
            SelectionModel::from_engine(&self.canvas, self.ids.clone()).unwrap()
        }

        fn points(&self, index: usize) -> Vec<Point> {
            match self.canvas.document.get_shape(self.ids[index]) {
                Some(Shape::Freehand(freehand)) => freehand.points.clone(),
                other => panic!("expected a freehand, got {other:?}"),
            }
        }

        /// Press at the origin and report the first shape after one displacement.
        fn resized(mut self, dx: f64, dy: f64) -> Dimensions {
            self.press(0.0, 0.0).unwrap();
            self.drag_to(dx, dy).unwrap();
            self.dims(0)
        }
    }

    #[test]
    fn test_bottom_right_scenario() {
        let initial = Dimensions::new(0.0, 0.0, 100.0, 50.0);
        let transform = resize_transform(AnchorPosition::BotRight, &initial, Vec2::new(20.0, 10.0));
        let coeffs = transform.as_coeffs();
        assert!((coeffs[0] - 1.2).abs() < EPS);
        assert!((coeffs[3] - 1.2).abs() < EPS);
        assert_point(transform * Point::ZERO, Point::ZERO);

        let mut fixture = Fixture::single(0.0, 0.0, 100.0, 50.0, AnchorPosition::BotRight);
        fixture.press(100.0, 50.0).unwrap();
        fixture.drag_to(120.0, 60.0).unwrap();
        assert_dims(fixture.dims(0), 0.0, 0.0, 120.0, 60.0);
        assert!(fixture.canvas.take_redraw());
    }

    #[test]
    fn test_left_edge_scenario_ignores_vertical_drag() {
        let initial = Dimensions::new(0.0, 0.0, 100.0, 50.0);
        let transform = resize_transform(AnchorPosition::Left, &initial, Vec2::new(-10.0, 999.0));
        let coeffs = transform.as_coeffs();
        assert!((coeffs[0] - 1.1).abs() < EPS);
        assert_eq!(coeffs[3], 1.0);
        assert_point(transform * Point::new(100.0, 25.0), Point::new(100.0, 25.0));

        let dims = Fixture::single(0.0, 0.0, 100.0, 50.0, AnchorPosition::Left).resized(-10.0, 999.0);
        assert_dims(dims, -10.0, 0.0, 110.0, 50.0);
    }

    #[test]
    fn test_fixed_point_holds_for_every_anchor() {
        let initial = Dimensions::new(10.0, -20.0, 100.0, 50.0);
        let displacements = [
            Vec2::new(20.0, 10.0),
            Vec2::new(-35.0, 70.0),
            Vec2::new(-250.0, -120.0),
            Vec2::new(0.5, -0.25),
            Vec2::new(100.0, 50.0),
        ];
        for anchor in AnchorPosition::ALL {
            let fixed = initial.anchor_point(anchor.opposite());
            for distance in displacements {
                let transform = resize_transform(anchor, &initial, distance);
                assert_point(transform * fixed, fixed);
            }
        }
    }

    #[test]
    fn test_fixed_point_survives_move_sequences() {
        for anchor in AnchorPosition::ALL {
            let mut fixture = Fixture::single(10.0, -20.0, 100.0, 50.0, anchor);
            let fixed = fixture.dims(0).anchor_point(anchor.opposite());
            fixture.press(0.0, 0.0).unwrap();
            for (dx, dy) in [(5.0, 5.0), (30.0, -10.0), (-20.0, 15.0), (12.5, 7.5)] {
                fixture.drag_to(dx, dy).unwrap();
                assert_point(fixture.dims(0).anchor_point(anchor.opposite()), fixed);
            }
        }
    }

    #[test]
    fn test_edge_handles_keep_other_axis() {
        for anchor in [AnchorPosition::Top, AnchorPosition::Bot] {
            for (dx, dy) in [(40.0, 10.0), (-70.0, -80.0), (500.0, 30.0)] {
                let dims = Fixture::single(0.0, 0.0, 100.0, 50.0, anchor).resized(dx, dy);
                assert!((dims.width() - 100.0).abs() < EPS);
                assert!((dims.x()).abs() < EPS);
            }
        }
        for anchor in [AnchorPosition::Left, AnchorPosition::Right] {
            for (dx, dy) in [(10.0, 40.0), (-80.0, -70.0), (30.0, 500.0)] {
                let dims = Fixture::single(0.0, 0.0, 100.0, 50.0, anchor).resized(dx, dy);
                assert!((dims.height() - 50.0).abs() < EPS);
                assert!((dims.y()).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_moves_do_not_compound() {
        let mut repeated = Fixture::single(3.0, 7.0, 80.0, 40.0, AnchorPosition::TopLeft);
        repeated.press(0.0, 0.0).unwrap();
        repeated.drag_to(13.0, -6.0).unwrap();
        repeated.drag_to(13.0, -6.0).unwrap();

        let once = Fixture::single(3.0, 7.0, 80.0, 40.0, AnchorPosition::TopLeft).resized(13.0, -6.0);
        assert_eq!(repeated.dims(0), once);

        // A detour ends up exactly where a direct move does
        repeated.drag_to(-40.0, 25.0).unwrap();
        repeated.drag_to(31.0, 2.0).unwrap();
        let direct = Fixture::single(3.0, 7.0, 80.0, 40.0, AnchorPosition::TopLeft).resized(31.0, 2.0);
        assert_eq!(repeated.dims(0), direct);
    }

    #[test]
    fn test_zoom_converts_screen_displacement() {
        let unscaled = Fixture::single(0.0, 0.0, 100.0, 50.0, AnchorPosition::BotRight).resized(20.0, 10.0);

        let mut zoomed_in = Fixture::single(0.0, 0.0, 100.0, 50.0, AnchorPosition::BotRight);
        zoomed_in.canvas.camera.set_zoom(2.0);
        assert_eq!(zoomed_in.resized(40.0, 20.0), unscaled);

        let mut zoomed_out = Fixture::single(0.0, 0.0, 100.0, 50.0, AnchorPosition::BotRight);
        zoomed_out.canvas.camera.set_zoom(0.5);
        assert_eq!(zoomed_out.resized(10.0, 5.0), unscaled);
    }

    #[test]
    fn test_lock_held_for_gesture_and_released_on_release() {
        let mut fixture = Fixture::single(0.0, 0.0, 100.0, 50.0, AnchorPosition::Right);
        assert!(!fixture.anchor.is_locked());

        fixture.press(100.0, 25.0).unwrap();
        assert!(fixture.anchor.is_locked());
        fixture.drag_to(110.0, 25.0).unwrap();
        fixture.drag_to(130.0, 25.0).unwrap();
        assert!(fixture.anchor.is_locked());

        fixture.release();
        assert!(!fixture.anchor.is_locked());
        assert_eq!(fixture.machine.active_state(), None);
        assert_dims(fixture.dims(0), 0.0, 0.0, 130.0, 50.0);
    }

    #[test]
    fn test_lock_released_without_moves() {
        let mut fixture = Fixture::single(0.0, 0.0, 100.0, 50.0, AnchorPosition::Bot);
        fixture.press(50.0, 50.0).unwrap();
        assert!(fixture.anchor.is_locked());
        fixture.release();
        assert!(!fixture.anchor.is_locked());
        assert_dims(fixture.dims(0), 0.0, 0.0, 100.0, 50.0);
        assert!(fixture.anchor.lock().is_ok());
    }

    #[test]
    fn test_cancel_releases_lock_and_keeps_last_transform() {
        let mut fixture = Fixture::single(0.0, 0.0, 100.0, 50.0, AnchorPosition::BotRight);
        fixture.press(0.0, 0.0).unwrap();
        fixture.drag_to(50.0, 0.0).unwrap();
        assert!(fixture.machine.deactivate(&mut fixture.canvas));
        assert!(!fixture.anchor.is_locked());
        assert_dims(fixture.dims(0), 0.0, 0.0, 150.0, 50.0);
    }

    #[test]
    fn test_dropping_machine_mid_gesture_releases_lock() {
        let mut fixture = Fixture::single(0.0, 0.0, 100.0, 50.0, AnchorPosition::BotRight);
        fixture.press(0.0, 0.0).unwrap();
        let Fixture { machine, anchor, .. } = fixture;
        assert!(anchor.is_locked());
        drop(machine);
        assert!(!anchor.is_locked());
    }

    #[test]
    fn test_zero_height_refuses_vertical_anchors() {
        for anchor in [AnchorPosition::Top, AnchorPosition::Bot, AnchorPosition::TopLeft] {
            let mut fixture = Fixture::single(0.0, 0.0, 100.0, 0.0, anchor);
            let result = fixture.press(0.0, 0.0);
            assert_eq!(
                result,
                Err(GestureError::DegenerateSelection {
                    anchor,
                    width: 100.0,
                    height: 0.0
                })
            );
            assert_eq!(fixture.machine.active_state(), None);
            assert!(!fixture.anchor.is_locked());
        }
    }

    #[test]
    fn test_zero_height_allows_horizontal_resize() {
        let dims = Fixture::single(0.0, 10.0, 100.0, 0.0, AnchorPosition::Right).resized(50.0, 30.0);
        assert_dims(dims, 0.0, 10.0, 150.0, 0.0);
        assert!(dims.height().is_finite());
    }

    #[test]
    fn test_near_zero_width_scales_without_clamping() {
        let initial = Dimensions::new(0.0, 0.0, 1e-9, 50.0);
        let coeffs = resize_transform(AnchorPosition::Right, &initial, Vec2::new(50.0, 0.0)).as_coeffs();
        assert!(coeffs[0].is_finite());
        assert!(coeffs[0] > 1e10);

        let dims = Fixture::single(0.0, 0.0, 1e-9, 50.0, AnchorPosition::Right).resized(50.0, 0.0);
        assert!(dims.width().is_finite());
        assert!((dims.width() - 50.0).abs() < 1e-6);
        assert!((dims.height() - 50.0).abs() < EPS);
    }

    #[test]
    fn test_freehand_recovers_from_collapsed_axis() {
        let stroke = || Freehand::from_points(vec![Point::new(0.0, 0.0), Point::new(30.0, 10.0), Point::new(100.0, 50.0)]);

        let mut detour = Fixture::new(vec![stroke().into()], AnchorPosition::Right);
        detour.press(0.0, 0.0).unwrap();
        detour.drag_to(-100.0, 0.0).unwrap();
        for point in detour.points(0) {
            assert!(point.x.abs() < EPS);
        }
        detour.drag_to(0.0, 0.0).unwrap();

        let mut direct = Fixture::new(vec![stroke().into()], AnchorPosition::Right);
        direct.press(0.0, 0.0).unwrap();
        direct.drag_to(0.0, 0.0).unwrap();

        assert_eq!(detour.points(0), direct.points(0));
        assert_eq!(
            detour.points(0),
            vec![Point::new(0.0, 0.0), Point::new(30.0, 10.0), Point::new(100.0, 50.0)]
        );
    }

    #[test]
    fn test_freehand_flip_mirrors_points() {
        let stroke = Freehand::from_points(vec![Point::new(0.0, 0.0), Point::new(30.0, 10.0), Point::new(100.0, 50.0)]);
        let mut fixture = Fixture::new(vec![stroke.into()], AnchorPosition::Right);
        fixture.press(0.0, 0.0).unwrap();
        fixture.drag_to(-200.0, 0.0).unwrap();

        let points = fixture.points(0);
        assert_point(points[1], Point::new(-30.0, 10.0));
        assert_point(points[2], Point::new(-100.0, 50.0));
        assert_dims(fixture.dims(0), -100.0, 0.0, 100.0, 50.0);
    }

    #[test]
    fn test_resizes_every_selected_shape_from_common_bounds() {
        let mut fixture = Fixture::new(
            vec![
                Rectangle::new(Point::new(0.0, 0.0), 50.0, 50.0).into(),
                Rectangle::new(Point::new(50.0, 25.0), 50.0, 25.0).into(),
            ],
            AnchorPosition::BotRight,
        );
        fixture.press(100.0, 50.0).unwrap();
        fixture.drag_to(120.0, 60.0).unwrap();

        assert_dims(fixture.dims(0), 0.0, 0.0, 60.0, 60.0);
        assert_dims(fixture.dims(1), 60.0, 30.0, 60.0, 30.0);
    }

    #[test]
    fn test_dragging_past_anchor_flips() {
        let dims = Fixture::single(0.0, 0.0, 100.0, 50.0, AnchorPosition::BotRight).resized(-150.0, 0.0);
        assert_dims(dims, -50.0, 0.0, 50.0, 50.0);
    }

    #[test]
    fn test_missing_shape_aborts_gesture() {
        let mut fixture = Fixture::single(0.0, 0.0, 100.0, 50.0, AnchorPosition::BotRight);
        fixture.press(0.0, 0.0).unwrap();
        let id = fixture.ids[0];
        fixture.canvas.document.remove_shape(id);

        assert_eq!(fixture.drag_to(10.0, 10.0), Err(GestureError::UnknownShape(id)));
        assert_eq!(fixture.machine.active_state(), None);
        assert!(!fixture.anchor.is_locked());
    }

    #[test]
    fn test_activation_preconditions() {
        let mut canvas = Canvas::new();
        let mut machine = StateMachine::new();
        machine.register_input(MouseInput::new());
        machine.register_state(resize_state()).unwrap();
        machine
            .handle_pointer(
                PointerEvent::Down {
                    position: Point::ZERO,
                    button: MouseButton::Left,
                },
                &mut canvas,
            )
            .unwrap();

        assert_eq!(
            machine.activate(RESIZE_STATE, &mut canvas),
            Err(GestureError::MissingInput("model-anchor"))
        );

        machine.register_input(AnchorInput::new());
        assert_eq!(machine.activate(RESIZE_STATE, &mut canvas), Err(GestureError::NoAnchor));
        assert_eq!(machine.active_state(), None);
    }

    #[test]
    fn test_activation_requires_pointer_down() {
        let mut fixture = Fixture::single(0.0, 0.0, 100.0, 50.0, AnchorPosition::Top);
        assert_eq!(
            fixture.machine.activate(RESIZE_STATE, &mut fixture.canvas),
            Err(GestureError::PointerNotDown)
        );
        assert!(!fixture.anchor.is_locked());
    }

    #[test]
    fn test_locked_anchor_blocks_second_gesture() {
        let mut fixture = Fixture::single(0.0, 0.0, 100.0, 50.0, AnchorPosition::Top);
        let held = fixture.anchor.lock().unwrap();
        assert_eq!(fixture.press(50.0, 0.0), Err(GestureError::AnchorLocked));
        held.eject();
        fixture.release();
        assert!(fixture.press(50.0, 0.0).is_ok());
        assert_eq!(
            fixture.machine.select_anchor(AnchorPosition::Bot, fixture.anchor_selection()),
            Err(GestureError::AnchorLocked)
        );
    }
}
