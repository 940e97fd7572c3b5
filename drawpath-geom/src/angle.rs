use std::f64::consts;
use std::ops;

use isclose::IsClose;

/// An angle in radians.
#[derive(Debug, Copy, Clone, Default, PartialEq, PartialOrd)]
pub struct Angle {
    radians: f64,
}

impl Angle {
    /// An angle of 0.0 radians.
    pub const ZERO: Self = Self::radians(0.0);
    /// An angle of π radians (180°).
    pub const PI: Self = Self::radians(consts::PI);
    /// An angle of τ (2π) radians (360°).
    pub const TAU: Self = Self::radians(consts::TAU);
    /// An angle of π/2 radians (90°).
    pub const FRAC_PI_2: Self = Self::radians(consts::FRAC_PI_2);

    /// Creates a new [`Angle`] with the given value in radians.
    #[inline]
    #[must_use]
    pub const fn radians(radians: f64) -> Self {
        Self { radians }
    }

    /// Returns the angle as an [`f64`] value measured in radians.
    #[inline]
    #[must_use]
    pub const fn to_radians(self) -> f64 {
        self.radians
    }

    /// Creates a new [`Angle`] with the given value in degrees.
    #[inline]
    #[must_use]
    pub fn degrees(degrees: f64) -> Self {
        Self {
            radians: degrees.to_radians(),
        }
    }

    /// Returns the angle as an [`f64`] value measured in degrees.
    #[inline]
    #[must_use]
    pub fn to_degrees(self) -> f64 {
        self.radians.to_degrees()
    }

    /// Normalizes the angle to the range `[0..2π)`.
    #[inline]
    #[must_use]
    pub fn positive(self) -> Self {
        Self::radians(self.radians.rem_euclid(consts::TAU))
    }

    /// Normalizes the angle to the range `(-π..π]`.
    #[inline]
    #[must_use]
    pub fn signed(self) -> Self {
        Self::radians(consts::PI - (consts::PI - self.radians).rem_euclid(consts::TAU))
    }

    /// Returns the sine of the angle.
    #[inline]
    #[must_use]
    pub fn sin(self) -> f64 {
        self.radians.sin()
    }

    /// Returns the cosine of the angle.
    #[inline]
    #[must_use]
    pub fn cos(self) -> f64 {
        self.radians.cos()
    }

    /// Returns the tangent of the angle.
    #[inline]
    #[must_use]
    pub fn tan(self) -> f64 {
        self.radians.tan()
    }

    /// Returns the sine and cosine of the angle.
    #[inline]
    #[must_use]
    pub fn sin_cos(self) -> (f64, f64) {
        self.radians.sin_cos()
    }

    /// Returns the arcsine of the value as an [`Angle`].
    #[inline]
    #[must_use]
    pub fn asin(value: f64) -> Self {
        Self::radians(value.asin())
    }

    /// Returns the arccosine of the value as an [`Angle`].
    #[inline]
    #[must_use]
    pub fn acos(value: f64) -> Self {
        Self::radians(value.acos())
    }

    /// Returns the 2-argument arctangent of the values as an [`Angle`].
    #[inline]
    #[must_use]
    pub fn atan2(y: f64, x: f64) -> Self {
        Self::radians(f64::atan2(y, x))
    }

    /// Returns the absolute value of the angle.
    #[inline]
    #[must_use]
    pub fn abs(self) -> Self {
        Self::radians(self.radians.abs())
    }
}

impl ops::Add for Angle {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::radians(self.radians + rhs.radians)
    }
}

impl ops::AddAssign for Angle {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.radians += rhs.radians;
    }
}

impl ops::Sub for Angle {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::radians(self.radians - rhs.radians)
    }
}

impl ops::SubAssign for Angle {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.radians -= rhs.radians;
    }
}

impl ops::Mul<f64> for Angle {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::radians(self.radians * rhs)
    }
}

impl ops::Mul<Angle> for f64 {
    type Output = Angle;

    #[inline]
    fn mul(self, rhs: Angle) -> Angle {
        Angle::radians(self * rhs.radians)
    }
}

impl ops::Div for Angle {
    type Output = f64;

    #[inline]
    fn div(self, rhs: Self) -> f64 {
        self.radians / rhs.radians
    }
}

impl ops::Div<f64> for Angle {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f64) -> Self {
        Self::radians(self.radians / rhs)
    }
}

impl ops::Neg for Angle {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::radians(-self.radians)
    }
}

impl IsClose for Angle {
    type Tolerance = f64;
    const ZERO_TOL: Self::Tolerance = 0.0;
    const ABS_TOL: Self::Tolerance = <Self::Tolerance as IsClose>::ABS_TOL;
    const REL_TOL: Self::Tolerance = <Self::Tolerance as IsClose>::REL_TOL;

    #[inline]
    fn is_close_tol(&self, other: &Self, rel_tol: &f64, abs_tol: &f64) -> bool {
        self.radians.is_close_tol(&other.radians, rel_tol, abs_tol)
    }
}

#[cfg(test)]
mod tests {
    use isclose::assert_is_close;

    use super::*;

    #[test]
    fn angle_degrees_roundtrip() {
        let angle = Angle::degrees(180.0);
        assert_is_close!(angle.to_radians(), consts::PI);
        assert_is_close!(angle.to_degrees(), 180.0);
    }

    #[test]
    fn angle_positive_wraps() {
        assert_is_close!(Angle::radians(-consts::FRAC_PI_2).positive().to_radians(), 3.0 * consts::FRAC_PI_2);
        assert_is_close!(Angle::radians(consts::TAU).positive().to_radians(), 0.0);
    }

    #[test]
    fn angle_signed_wraps() {
        assert_is_close!(Angle::radians(3.0 * consts::FRAC_PI_2).signed().to_radians(), -consts::FRAC_PI_2);
    }

    #[test]
    fn angle_atan2_quadrants() {
        assert_is_close!(Angle::atan2(1.0, 0.0).to_degrees(), 90.0);
        assert_is_close!(Angle::atan2(0.0, -1.0).to_degrees(), 180.0);
    }

    #[test]
    fn angle_arithmetic() {
        let a = Angle::degrees(30.0);
        let b = Angle::degrees(60.0);
        assert_is_close!((a + b).to_degrees(), 90.0);
        assert_is_close!((b - a).to_degrees(), 30.0);
        assert_is_close!((a * 2.0).to_degrees(), 60.0);
        assert_is_close!((2.0 * a).to_degrees(), 60.0);
    }
}
