use std::ops;

use crate::{Angle, Point, Space, Vector};

/// A same-space 2D affine transform:
///
/// ```text
/// | a_xx a_xy t_x |
/// | a_yx a_yy t_y |
/// |  0    0    1  |
/// ```
///
/// Only the first two rows are stored; the bottom row is the constant
/// `[0, 0, 1]`. Used internally (e.g. to rotate by `-x_axis_rotation` in the
/// arc conversion); it never changes the coordinate space, since a viewport
/// or EMU remapping depends on runtime bounds rather than a fixed matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform<S: Space> {
    /// Linear x-from-x coefficient.
    pub a_xx: f64,
    /// Linear x-from-y coefficient.
    pub a_xy: f64,
    /// Translation along x.
    pub t_x: f64,
    /// Linear y-from-x coefficient.
    pub a_yx: f64,
    /// Linear y-from-y coefficient.
    pub a_yy: f64,
    /// Translation along y.
    pub t_y: f64,
    space: std::marker::PhantomData<S>,
}

impl<S: Space> Transform<S> {
    /// Creates a new affine transform from its matrix elements.
    #[allow(clippy::similar_names)]
    #[inline]
    #[must_use]
    pub const fn new(a_xx: f64, a_xy: f64, t_x: f64, a_yx: f64, a_yy: f64, t_y: f64) -> Self {
        Self {
            a_xx,
            a_xy,
            t_x,
            a_yx,
            a_yy,
            t_y,
            space: std::marker::PhantomData,
        }
    }

    /// The identity transform.
    #[inline]
    #[must_use]
    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0)
    }

    /// A pure translation.
    #[inline]
    #[must_use]
    pub const fn translation(v: Vector<S>) -> Self {
        Self::new(1.0, 0.0, v.x, 0.0, 1.0, v.y)
    }

    /// A pure scale about the origin.
    #[inline]
    #[must_use]
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, 0.0, sy, 0.0)
    }

    /// A pure rotation about the origin.
    #[inline]
    #[must_use]
    pub fn rotation(angle: Angle) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(cos, -sin, 0.0, sin, cos, 0.0)
    }

    /// Composes `self` followed by `other`: equivalent to `other * self` in
    /// matrix notation.
    #[inline]
    #[must_use]
    pub fn then(self, other: Self) -> Self {
        Self::new(
            self.a_xx * other.a_xx + self.a_yx * other.a_xy,
            self.a_xy * other.a_xx + self.a_yy * other.a_xy,
            self.t_x * other.a_xx + self.t_y * other.a_xy + other.t_x,
            self.a_xx * other.a_yx + self.a_yx * other.a_yy,
            self.a_xy * other.a_yx + self.a_yy * other.a_yy,
            self.t_x * other.a_yx + self.t_y * other.a_yy + other.t_y,
        )
    }

    /// Applies the transform to a point.
    #[inline]
    #[must_use]
    pub fn apply(self, p: Point<S>) -> Point<S> {
        Point::new(
            p.x * self.a_xx + p.y * self.a_xy + self.t_x,
            p.x * self.a_yx + p.y * self.a_yy + self.t_y,
        )
    }

    /// Applies the transform's linear part to a vector, ignoring translation.
    #[inline]
    #[must_use]
    pub fn apply_vector(self, v: Vector<S>) -> Vector<S> {
        Vector::new(
            v.x * self.a_xx + v.y * self.a_xy,
            v.x * self.a_yx + v.y * self.a_yy,
        )
    }
}

impl<S: Space> Default for Transform<S> {
    #[inline]
    fn default() -> Self {
        Self::identity()
    }
}

impl<S: Space> ops::Mul for Transform<S> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        rhs.then(self)
    }
}
