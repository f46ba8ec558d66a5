//! Model-space geometry on top of kurbo.

use crate::input::AnchorPosition;
use kurbo::{Affine, Point, Rect};
use serde::{Deserialize, Serialize};

/// Build a matrix that scales by `(sx, sy)` around `fixed` instead of the origin.
pub fn scale_about(sx: f64, sy: f64, fixed: Point) -> Affine {
    let offset = fixed.to_vec2();
    Affine::translate(offset) * Affine::scale_non_uniform(sx, sy) * Affine::translate(-offset)
}

/// Axis-aligned dimensions of a shape or selection, in model space.
///
/// The underlying rect is always normalised (`x0 <= x1`, `y0 <= y1`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    rect: Rect,
}

impl Dimensions {
    /// Create dimensions from a top-left corner and a size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_rect(Rect::new(x, y, x + width, y + height))
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self { rect: rect.abs() }
    }

    /// Bounding box of a set of points. Returns `None` for an empty set.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let rect = rest
            .iter()
            .fold(Rect::from_points(*first, *first), |acc, p| acc.union_pt(*p));
        Some(Self::from_rect(rect))
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn x(&self) -> f64 {
        self.rect.x0
    }

    pub fn y(&self) -> f64 {
        self.rect.y0
    }

    pub fn width(&self) -> f64 {
        self.rect.width()
    }

    pub fn height(&self) -> f64 {
        self.rect.height()
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.rect.x0, self.rect.y0)
    }

    pub fn top_middle(&self) -> Point {
        Point::new(self.rect.center().x, self.rect.y0)
    }

    pub fn top_right(&self) -> Point {
        Point::new(self.rect.x1, self.rect.y0)
    }

    pub fn right_middle(&self) -> Point {
        Point::new(self.rect.x1, self.rect.center().y)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.rect.x1, self.rect.y1)
    }

    pub fn bottom_middle(&self) -> Point {
        Point::new(self.rect.center().x, self.rect.y1)
    }

    pub fn bottom_left(&self) -> Point {
        Point::new(self.rect.x0, self.rect.y1)
    }

    pub fn left_middle(&self) -> Point {
        Point::new(self.rect.x0, self.rect.center().y)
    }

    /// The handle point for a given anchor position.
    pub fn anchor_point(&self, anchor: AnchorPosition) -> Point {
        match anchor {
            AnchorPosition::TopLeft => self.top_left(),
            AnchorPosition::Top => self.top_middle(),
            AnchorPosition::TopRight => self.top_right(),
            AnchorPosition::Right => self.right_middle(),
            AnchorPosition::BotRight => self.bottom_right(),
            AnchorPosition::Bot => self.bottom_middle(),
            AnchorPosition::BotLeft => self.bottom_left(),
            AnchorPosition::Left => self.left_middle(),
        }
    }

    /// Map the four corners through `affine` and take their bounding box.
    ///
    /// A negative scale (dragging a handle past its anchor) flips the corners;
    /// the result is re-normalised so width and height stay non-negative.
    pub fn transform(&mut self, affine: Affine) {
        self.rect = affine.transform_rect_bbox(self.rect);
    }

    /// Smallest dimensions covering both.
    pub fn union(&self, other: &Dimensions) -> Dimensions {
        Self::from_rect(self.rect.union(other.rect))
    }
}

impl From<Rect> for Dimensions {
    fn from(rect: Rect) -> Self {
        Self::from_rect(rect)
    }
}
