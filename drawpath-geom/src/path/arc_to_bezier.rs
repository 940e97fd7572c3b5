use std::fmt;

use isclose::IsClose as _;

use crate::{Angle, Point, Space, Vector};

/// A single cubic Bezier segment, as absolute control points and endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierSegment<S: Space> {
    /// First control point.
    pub c1: Point<S>,
    /// Second control point.
    pub c2: Point<S>,
    /// Segment endpoint.
    pub end: Point<S>,
}

/// Failure modes of [`arc_to_bezier`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArcError {
    /// `max_segment_angle` was zero, negative, or non-finite.
    InvalidSegmentAngle,
    /// One of the inputs (radii, rotation, endpoints) was NaN or infinite.
    NonFiniteInput,
    /// The total sweep exceeded `max_total_sweep`; in practice this only
    /// happens when the inputs were already nonsensical, since a correctly
    /// normalized endpoint parameterization never sweeps more than one full
    /// turn plus the ambiguity adjustment.
    ArcTooBig {
        /// The computed sweep, in degrees.
        swept_degrees: f64,
    },
}

impl fmt::Display for ArcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSegmentAngle => {
                write!(f, "max segment angle must be a positive, finite angle")
            }
            Self::NonFiniteInput => write!(f, "arc parameters must be finite"),
            Self::ArcTooBig { swept_degrees } => {
                write!(f, "arc sweeps {swept_degrees:.1} degrees, which exceeds the sanity bound")
            }
        }
    }
}

impl std::error::Error for ArcError {}

/// Converts one SVG elliptical arc (endpoint parameterization) into a
/// sequence of cubic Bezier segments, per SVG's Appendix F (F.6.5, F.6.6).
///
/// `rx`/`ry` are taken as given; their sign is ignored (the SVG grammar
/// already rejects negative radii at the parser). A zero radius, or a start
/// equal to the end, degrades to the fallback the SVG spec mandates (a
/// straight line, or nothing at all) rather than an error. `max_total_sweep`
/// is the sanity bound past which the computed sweep angle is rejected as
/// `ArcTooBig` rather than segmented.
///
/// Returns the segments alongside the worst-case deviation, across all
/// segments, between the cubic and the true elliptical arc at the matching
/// parameter (each segment's midpoint, `t = 0.5`) — the quantity callers need
/// to report as a quality estimate for the approximation.
#[allow(clippy::similar_names)]
pub fn arc_to_bezier<S: Space>(
    start: Point<S>,
    rx: f64,
    ry: f64,
    x_axis_rotation: Angle,
    large_arc: bool,
    sweep: bool,
    end: Point<S>,
    max_segment_angle: Angle,
    max_total_sweep: Angle,
) -> Result<(Vec<BezierSegment<S>>, f64), ArcError> {
    if !max_segment_angle.to_radians().is_finite() || max_segment_angle.to_radians() <= 0.0 {
        return Err(ArcError::InvalidSegmentAngle);
    }
    if ![rx, ry, x_axis_rotation.to_radians(), start.x, start.y, end.x, end.y]
        .into_iter()
        .all(f64::is_finite)
    {
        return Err(ArcError::NonFiniteInput);
    }

    let d = end - start;
    if d.length().is_close(0.0) {
        return Ok((Vec::new(), 0.0));
    }

    let r = Vector::<S>::new(rx, ry).abs();
    if r.x.is_close(0.0) || r.y.is_close(0.0) {
        return Ok((
            vec![BezierSegment {
                c1: start + d / 3.0,
                c2: start + d * (2.0 / 3.0),
                end,
            }],
            0.0,
        ));
    }

    // Work in a frame rotated by -x_axis_rotation, where the ellipse's axes
    // are axis-aligned; results are rotated back at the end.
    let d_rot = d.rotate(-x_axis_rotation);

    // Radii correction (F.6.6.2): scale up, preserving the rx:ry ratio, if
    // the given radii are too small to reach from start to end.
    let lambda = d_rot.component_div(r * 2.0).length().max(1.0);
    let r = r * lambda;

    let c = center_delta(r, large_arc, sweep, d_rot);

    // Angle from center to start, and total sweep, via atan2 on the
    // center-relative, radii-normalized vectors (F.6.5.5, F.6.5.6).
    let phi_start = {
        let v = (-c).component_div(r);
        Angle::atan2(v.y, v.x)
    };
    let mut dphi = {
        let v = (d_rot - c).component_div(r);
        Angle::atan2(v.y, v.x) - phi_start
    };

    dphi = match (large_arc, sweep) {
        (true, true) if dphi < Angle::PI => dphi + Angle::TAU,
        (true, false) if dphi > -Angle::PI => dphi - Angle::TAU,
        (false, true) if dphi < Angle::ZERO => dphi + Angle::TAU,
        (false, false) if dphi > Angle::ZERO => dphi - Angle::TAU,
        _ => dphi,
    };

    if !dphi.to_radians().is_finite() || dphi.abs() > max_total_sweep {
        return Err(ArcError::ArcTooBig {
            swept_degrees: dphi.to_degrees(),
        });
    }

    let segment_count = ((dphi.abs() / max_segment_angle) - f64::EPSILON).ceil();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let segment_count = (segment_count as u32).max(1);
    let dphi_seg = dphi / f64::from(segment_count);

    // Center in the same absolute frame as `start`/`end` (reverses the
    // rotate-by-`-x_axis_rotation` done to compute `c`); used below to
    // evaluate true arc points for the error estimate.
    let center = start + c.rotate(x_axis_rotation);

    let mut segments = Vec::with_capacity(segment_count as usize);
    let mut max_error = 0.0_f64;
    let mut pen = start;
    for i in 0..segment_count {
        let phi0 = phi_start + dphi_seg * f64::from(i);
        let (rel_c1, rel_c2, rel_end) = segment_deltas(r, phi0, dphi_seg);
        let c1 = pen + rel_c1.rotate(x_axis_rotation);
        let c2 = pen + rel_c2.rotate(x_axis_rotation);
        let segment_end = pen + rel_end.rotate(x_axis_rotation);

        let phi_mid = phi0 + dphi_seg / 2.0;
        let true_mid =
            center + Vector::new(r.x * phi_mid.cos(), r.y * phi_mid.sin()).rotate(x_axis_rotation);
        let cubic_mid = de_casteljau_midpoint(pen, c1, c2, segment_end);
        max_error = max_error.max((cubic_mid - true_mid).length());

        segments.push(BezierSegment {
            c1,
            c2,
            end: segment_end,
        });
        pen = segment_end;
    }

    Ok((segments, max_error))
}

/// The point at `t = 0.5` on the cubic Bezier `start, c1, c2, end`, via De
/// Casteljau's algorithm.
fn de_casteljau_midpoint<S: Space>(
    start: Point<S>,
    c1: Point<S>,
    c2: Point<S>,
    end: Point<S>,
) -> Point<S> {
    let p01 = start.lerp(c1, 0.5);
    let p12 = c1.lerp(c2, 0.5);
    let p23 = c2.lerp(end, 0.5);
    let p012 = p01.lerp(p12, 0.5);
    let p123 = p12.lerp(p23, 0.5);
    p012.lerp(p123, 0.5)
}

/// Vector from the arc's start point to its center, in the frame where the
/// ellipse's axes are axis-aligned (F.6.5.2, F.6.5.3).
fn center_delta<S: Space>(r: Vector<S>, large_arc: bool, sweep: bool, d: Vector<S>) -> Vector<S> {
    let d_2 = d / 2.0;
    let sign = if large_arc == sweep { 1.0 } else { -1.0 };

    let num = (r.x * r.y).powi(2) - (r.x * d_2.y).powi(2) - (r.y * d_2.x).powi(2);
    let denom = (r.x * d_2.y).powi(2) + (r.y * d_2.x).powi(2);
    let co = if num.is_close(0.0) || denom.is_close(0.0) {
        0.0
    } else {
        sign * (num / denom).max(0.0).sqrt()
    };

    let c_dir = Vector::new(r.x * d_2.y / r.y, -r.y * d_2.x / r.x);
    c_dir * co + d_2
}

/// Control-point deltas, relative to the point on the ellipse at `phi0`, for
/// one segment sweeping `dphi` starting at `phi0` (F.6.3, closed-form
/// optimal single-arc approximation).
fn segment_deltas<S: Space>(
    r: Vector<S>,
    phi0: Angle,
    dphi: Angle,
) -> (Vector<S>, Vector<S>, Vector<S>) {
    let alpha = (4.0 / 3.0) * (dphi / 4.0).tan();

    let p0 = Vector::<S>::from(phi0.sin_cos()).yx();
    let p3 = Vector::<S>::from((phi0 + dphi).sin_cos()).yx();

    let p1 = Vector::new(p0.x - p0.y * alpha, p0.y + p0.x * alpha);
    let p2 = Vector::new(p3.x + p3.y * alpha, p3.y - p3.x * alpha);

    (
        (p1 - p0).component_mul(r),
        (p2 - p0).component_mul(r),
        (p3 - p0).component_mul(r),
    )
}

#[cfg(test)]
mod tests {
    use isclose::assert_is_close;

    use super::*;

    fn deg(d: f64) -> Angle {
        Angle::degrees(d)
    }

    fn sane() -> Angle {
        Angle::degrees(1000.0)
    }

    #[test]
    fn quarter_circle_single_segment() {
        let start = Point::<()>::new(1.0, 0.0);
        let end = Point::<()>::new(0.0, 1.0);
        let (segments, _max_error) =
            arc_to_bezier(start, 1.0, 1.0, deg(0.0), false, true, end, deg(90.0), sane())
                .unwrap();
        assert_eq!(segments.len(), 1);
        assert_is_close!(segments[0].end, end);
    }

    #[test]
    fn quarter_circle_max_error_is_small() {
        let start = Point::<()>::new(1.0, 0.0);
        let end = Point::<()>::new(0.0, 1.0);
        let (_segments, max_error) =
            arc_to_bezier(start, 1.0, 1.0, deg(0.0), false, true, end, deg(90.0), sane())
                .unwrap();
        // The optimal single-cubic approximation of a 90 degree arc deviates
        // from the true circle by roughly 0.0003 times the radius.
        assert!(max_error < 0.001, "max_error = {max_error}");
    }

    #[test]
    fn half_circle_splits_into_two_segments() {
        let start = Point::<()>::new(1.0, 0.0);
        let end = Point::<()>::new(-1.0, 0.0);
        let (segments, _max_error) =
            arc_to_bezier(start, 1.0, 1.0, deg(0.0), false, true, end, deg(90.0), sane())
                .unwrap();
        assert_eq!(segments.len(), 2);
        assert_is_close!(segments[1].end, end);
    }

    #[test]
    fn zero_radius_falls_back_to_line() {
        let start = Point::<()>::new(0.0, 0.0);
        let end = Point::<()>::new(4.0, 0.0);
        let (segments, _max_error) =
            arc_to_bezier(start, 0.0, 5.0, deg(0.0), false, true, end, deg(90.0), sane())
                .unwrap();
        assert_eq!(segments.len(), 1);
        assert_is_close!(segments[0].c1, Point::new(4.0 / 3.0, 0.0));
        assert_is_close!(segments[0].end, end);
    }

    #[test]
    fn coincident_endpoints_yield_no_segments() {
        let p = Point::<()>::new(3.0, 3.0);
        let (segments, _max_error) =
            arc_to_bezier(p, 1.0, 1.0, deg(0.0), false, true, p, deg(90.0), sane()).unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    fn undersized_radius_is_corrected_to_reach_endpoint() {
        let start = Point::<()>::new(0.0, 0.0);
        let end = Point::<()>::new(10.0, 0.0);
        // A radius of 1 cannot possibly span a chord of length 10; the
        // implementation must scale it up rather than erroring.
        let (segments, _max_error) =
            arc_to_bezier(start, 1.0, 1.0, deg(0.0), false, true, end, deg(90.0), sane())
                .unwrap();
        assert_is_close!(segments.last().unwrap().end, end);
    }

    #[test]
    fn invalid_segment_angle_is_rejected() {
        let start = Point::<()>::new(0.0, 0.0);
        let end = Point::<()>::new(1.0, 1.0);
        let err = arc_to_bezier(start, 1.0, 1.0, deg(0.0), false, true, end, deg(0.0), sane())
            .unwrap_err();
        assert_eq!(err, ArcError::InvalidSegmentAngle);
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let start = Point::<()>::new(0.0, 0.0);
        let end = Point::<()>::new(f64::NAN, 1.0);
        let err = arc_to_bezier(start, 1.0, 1.0, deg(0.0), false, true, end, deg(90.0), sane())
            .unwrap_err();
        assert_eq!(err, ArcError::NonFiniteInput);
    }

    #[test]
    fn large_arc_flag_picks_the_longer_sweep() {
        let start = Point::<()>::new(1.0, 0.0);
        let end = Point::<()>::new(0.0, -1.0);
        let (short, _) =
            arc_to_bezier(start, 1.0, 1.0, deg(0.0), false, true, end, deg(1.0), sane()).unwrap();
        let (long, _) =
            arc_to_bezier(start, 1.0, 1.0, deg(0.0), true, true, end, deg(1.0), sane()).unwrap();
        assert!(long.len() > short.len());
        assert_is_close!(short.last().unwrap().end, end);
        assert_is_close!(long.last().unwrap().end, end);
    }

    #[test]
    fn sweep_beyond_sanity_bound_is_rejected() {
        let start = Point::<()>::new(1.0, 0.0);
        let end = Point::<()>::new(0.0, -1.0);
        let err = arc_to_bezier(
            start,
            1.0,
            1.0,
            deg(0.0),
            true,
            true,
            end,
            deg(90.0),
            deg(10.0),
        )
        .unwrap_err();
        assert!(matches!(err, ArcError::ArcTooBig { .. }));
    }
}
