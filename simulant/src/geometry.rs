//! Two-axis value pairs and box-edge rectangles used by every coordinate
//! computation in the crate.
//!
//! Layout measurements reach this crate in one of three equivalent
//! box-model shapes: `{x, y}`, `{left, top}` or `{right, bottom}`. All of
//! them normalize to an [`AxisValues`] pair; the constructors perform field
//! renaming only, never a coordinate-space translation.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A generic two-axis value pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisValues<T> {
    pub x: T,
    pub y: T,
}

/// Distances from a box's left/top edges. Semantically identical to `{x, y}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeftTopValues<T> {
    pub left: T,
    pub top: T,
}

/// Distances from a box's right/bottom edges. The caller owns any sign or
/// origin conversion; constructing an [`AxisValues`] from this shape only
/// renames the fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RightBottomValues<T> {
    pub right: T,
    pub bottom: T,
}

impl<T> From<LeftTopValues<T>> for AxisValues<T> {
    fn from(v: LeftTopValues<T>) -> Self {
        Self { x: v.left, y: v.top }
    }
}

impl<T> From<RightBottomValues<T>> for AxisValues<T> {
    fn from(v: RightBottomValues<T>) -> Self {
        Self { x: v.right, y: v.bottom }
    }
}

impl<T> From<(T, T)> for AxisValues<T> {
    fn from((x, y): (T, T)) -> Self {
        Self { x, y }
    }
}

impl<T> AxisValues<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Uniform construction from any of the three equivalent shapes.
    pub fn create(source: impl Into<Self>) -> Self {
        source.into()
    }
}

impl AxisValues<f64> {
    /// Reads a measurement object produced by an injected page script.
    ///
    /// Shape detection is by field presence, checked in the order
    /// left-top, then right-bottom, then x-y, so an object carrying both
    /// `left` and `x` is read as left-top. Returns `None` when none of the
    /// three field sets is present; a malformed payload is a bug in the
    /// producing script, not a condition to recover from here.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let field = |name: &str| value.get(name).and_then(serde_json::Value::as_f64);

        if let (Some(left), Some(top)) = (field("left"), field("top")) {
            return Some(Self::create(LeftTopValues { left, top }));
        }
        if let (Some(right), Some(bottom)) = (field("right"), field("bottom")) {
            return Some(Self::create(RightBottomValues { right, bottom }));
        }
        if let (Some(x), Some(y)) = (field("x"), field("y")) {
            return Some(Self::new(x, y));
        }
        None
    }
}

impl<T: AddAssign> AxisValues<T> {
    /// In-place addition, returning the mutated receiver for chaining.
    pub fn add(mut self, other: AxisValues<T>) -> Self {
        self.x += other.x;
        self.y += other.y;
        self
    }
}

impl<T: SubAssign> AxisValues<T> {
    /// In-place subtraction, returning the mutated receiver for chaining.
    pub fn sub(mut self, other: AxisValues<T>) -> Self {
        self.x -= other.x;
        self.y -= other.y;
        self
    }
}

impl<T: AddAssign> Add for AxisValues<T> {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self.x += other.x;
        self.y += other.y;
        self
    }
}

impl<T: SubAssign> Sub for AxisValues<T> {
    type Output = Self;

    fn sub(mut self, other: Self) -> Self {
        self.x -= other.x;
        self.y -= other.y;
        self
    }
}

/// Box edges in a single coordinate space, typically viewport coordinates
/// as reported by a bounding-rect measurement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundaryValues<T> {
    pub left: T,
    pub top: T,
    pub right: T,
    pub bottom: T,
}

impl<T> BoundaryValues<T> {
    pub fn new(left: T, top: T, right: T, bottom: T) -> Self {
        Self { left, top, right, bottom }
    }
}

impl BoundaryValues<f64> {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// The left-top corner as an axis pair.
    pub fn position(&self) -> AxisValues<f64> {
        AxisValues::create(LeftTopValues { left: self.left, top: self.top })
    }

    pub fn center(&self) -> AxisValues<f64> {
        AxisValues::new(self.left + self.width() / 2.0, self.top + self.height() / 2.0)
    }

    pub fn contains(&self, point: &AxisValues<f64>) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }
}

/// Per-axis minimal signed scroll delta that brings `point` to the nearest
/// visible edge of `view`. Zero on an axis where the point is already
/// within the view.
pub fn scroll_deficit(point: &AxisValues<f64>, view: &BoundaryValues<f64>) -> AxisValues<f64> {
    let axis = |value: f64, near: f64, far: f64| {
        if value < near {
            value - near
        } else if value > far {
            value - far
        } else {
            0.0
        }
    };

    AxisValues::new(
        axis(point.x, view.left, view.right),
        axis(point.y, view.top, view.bottom),
    )
}

/// Clamps a prospective scroll position into the scrollable range
/// `[0, max]` per axis. A container whose content does not overflow has a
/// zero (or negative, on degenerate layouts) range and clamps to zero.
pub fn clamp_scroll(position: AxisValues<f64>, max: AxisValues<f64>) -> AxisValues<f64> {
    AxisValues::new(
        position.x.clamp(0.0, max.x.max(0.0)),
        position.y.clamp(0.0, max.y.max(0.0)),
    )
}
