pub use kurbo::{Affine, BezPath, Point, Rect};

/// Integer box, `[x0, x1) x [y0, y1)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct BoxI {
    /// Left edge (inclusive).
    pub x0: i32,
    /// Top edge (inclusive).
    pub y0: i32,
    /// Right edge (exclusive).
    pub x1: i32,
    /// Bottom edge (exclusive).
    pub y1: i32,
}

impl BoxI {
    /// Create a box from its edges.
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Horizontal extent.
    pub fn width(self) -> i32 {
        self.x1.saturating_sub(self.x0)
    }

    /// Vertical extent.
    pub fn height(self) -> i32 {
        self.y1.saturating_sub(self.y0)
    }

    /// Return `true` when the box covers no pixel.
    pub fn is_empty(self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    /// Return `true` when pixel `(x, y)` is inside the box.
    pub fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    /// Set intersection of two boxes.
    ///
    /// Empty boxes collapse to `BoxI::default()`.
    pub fn intersect(self, other: BoxI) -> BoxI {
        let out = BoxI {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        };
        if out.is_empty() { BoxI::default() } else { out }
    }

    /// Widen to the double-precision domain.
    pub fn to_box_d(self) -> BoxD {
        BoxD::new(
            f64::from(self.x0),
            f64::from(self.y0),
            f64::from(self.x1),
            f64::from(self.y1),
        )
    }
}

/// Single-precision box.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoxF {
    /// Left edge.
    pub x0: f32,
    /// Top edge.
    pub y0: f32,
    /// Right edge.
    pub x1: f32,
    /// Bottom edge.
    pub y1: f32,
}

impl BoxF {
    /// Create a box from its edges.
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Widen to the double-precision domain.
    pub fn to_box_d(self) -> BoxD {
        BoxD::new(
            f64::from(self.x0),
            f64::from(self.y0),
            f64::from(self.x1),
            f64::from(self.y1),
        )
    }
}

/// Double-precision boxes are plain `kurbo` rectangles.
pub type BoxD = Rect;

/// Integer point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PointI {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
}

impl PointI {
    /// Create a point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Single-precision point.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointF {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl PointF {
    /// Create a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Widen to the double-precision domain.
    pub fn to_point(self) -> Point {
        Point::new(f64::from(self.x), f64::from(self.y))
    }
}

/// Integer rectangle given as origin + size (used for source-image fragments).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RectI {
    /// Origin x.
    pub x: i32,
    /// Origin y.
    pub y: i32,
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl RectI {
    /// Create a rectangle from origin and size.
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Convert to edge form. Far edges saturate at `i32::MAX`.
    pub fn to_box(self) -> BoxI {
        BoxI::new(
            self.x,
            self.y,
            self.x.saturating_add(self.w),
            self.y.saturating_add(self.h),
        )
    }
}

/// Single-precision path element.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum PathElF {
    /// Start a new subpath.
    MoveTo(PointF),
    /// Straight segment.
    LineTo(PointF),
    /// Quadratic segment (control, end).
    QuadTo(PointF, PointF),
    /// Cubic segment (control 1, control 2, end).
    CurveTo(PointF, PointF, PointF),
    /// Close the current subpath.
    ClosePath,
}

/// Single-precision path. Double-precision paths are `kurbo::BezPath`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PathF {
    elements: Vec<PathElF>,
}

impl PathF {
    /// Create an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a move-to.
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.elements.push(PathElF::MoveTo(PointF::new(x, y)));
    }

    /// Append a line-to.
    pub fn line_to(&mut self, x: f32, y: f32) {
        self.elements.push(PathElF::LineTo(PointF::new(x, y)));
    }

    /// Append a quadratic segment.
    pub fn quad_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.elements
            .push(PathElF::QuadTo(PointF::new(x1, y1), PointF::new(x2, y2)));
    }

    /// Append a cubic segment.
    pub fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) {
        self.elements.push(PathElF::CurveTo(
            PointF::new(x1, y1),
            PointF::new(x2, y2),
            PointF::new(x3, y3),
        ));
    }

    /// Close the current subpath.
    pub fn close(&mut self) {
        self.elements.push(PathElF::ClosePath);
    }

    /// Borrow the elements.
    pub fn elements(&self) -> &[PathElF] {
        &self.elements
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Return `true` when the path has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Widen to the double-precision domain.
    pub fn to_bez_path(&self) -> BezPath {
        let mut out = BezPath::new();
        for el in &self.elements {
            match *el {
                PathElF::MoveTo(p) => out.move_to(p.to_point()),
                PathElF::LineTo(p) => out.line_to(p.to_point()),
                PathElF::QuadTo(p1, p2) => out.quad_to(p1.to_point(), p2.to_point()),
                PathElF::CurveTo(p1, p2, p3) => {
                    out.curve_to(p1.to_point(), p2.to_point(), p3.to_point())
                }
                PathElF::ClosePath => out.close_path(),
            }
        }
        out
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red, premultiplied.
    pub r: u8,
    /// Green, premultiplied.
    pub g: u8,
    /// Blue, premultiplied.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self::TRANSPARENT
    }

    /// Premultiply a straight-alpha color.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        use crate::foundation::math::mul_div255_u8;

        Self {
            r: mul_div255_u8(u16::from(r), u16::from(a)),
            g: mul_div255_u8(u16::from(g), u16::from(a)),
            b: mul_div255_u8(u16::from(b), u16::from(a)),
            a,
        }
    }

    /// `[r, g, b, a]` bytes.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Return `true` when alpha is 255.
    pub fn is_opaque(self) -> bool {
        self.a == 255
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
