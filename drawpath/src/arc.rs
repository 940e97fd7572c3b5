//! Domain-level wrapper around [`geom::arc_to_bezier`] (C1): configurable
//! segmentation/sanity-bound angles and the per-arc error estimate §4.3's
//! "Quality stats" asks for. The endpoint-to-center math itself lives in
//! `drawpath-geom`, generic over coordinate space; this module only adds the
//! domain-specific configuration and statistics the facade and emitter need.

use geom::{Angle, BezierSegment, Point, Space};

/// Configuration knobs for the arc converter, per spec §4.3.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcQuality {
    /// Maximum angular width of a single emitted Bezier segment, in degrees.
    /// Clamped to `(10, 180]` by [`Self::with_max_segment_deg`].
    pub max_segment_deg: f64,
    /// Sanity bound on total sweep, in degrees, past which conversion fails
    /// with [`geom::ArcError::ArcTooBig`] instead of producing an unbounded
    /// segment count.
    pub max_total_sweep_deg: f64,
}

impl Default for ArcQuality {
    /// `max_segment_deg = 90`, `max_total_sweep_deg = 1000`, per spec §4.3.
    fn default() -> Self {
        Self {
            max_segment_deg: 90.0,
            max_total_sweep_deg: 1000.0,
        }
    }
}

impl ArcQuality {
    /// Returns a copy with `max_segment_deg` clamped to the documented
    /// `(10, 180]` range.
    #[must_use]
    pub fn with_max_segment_deg(mut self, max_segment_deg: f64) -> Self {
        self.max_segment_deg = max_segment_deg.clamp(10.0, 180.0);
        self
    }
}

/// One converted arc: its Bezier segments plus a quality estimate.
#[derive(Debug, Clone)]
pub struct ArcConversion<S: Space> {
    /// The cubic segments approximating the arc, in source order.
    pub segments: Vec<BezierSegment<S>>,
    /// Largest deviation across all segments (§8 invariant 4): the distance
    /// between each cubic and the true elliptical arc at the matching
    /// parameter (each segment's midpoint).
    pub max_error: f64,
}

/// Converts one SVG elliptical arc to cubic Beziers, per spec §4.3. This is a
/// thin pass-through to [`geom::arc_to_bezier`], which also computes the
/// quality statistic; callers (the emitter) decide how to react to an `Err`
/// — recovering with a linear fallback for most failure modes, per §4.3's
/// last paragraph, except non-finite input, which is a total failure per §7.
pub fn convert<S: Space>(
    start: Point<S>,
    rx: f64,
    ry: f64,
    x_axis_rotation_deg: f64,
    large_arc: bool,
    sweep: bool,
    end: Point<S>,
    quality: ArcQuality,
) -> Result<ArcConversion<S>, geom::ArcError> {
    let (segments, max_error) = geom::arc_to_bezier(
        start,
        rx,
        ry,
        Angle::degrees(x_axis_rotation_deg),
        large_arc,
        sweep,
        end,
        Angle::degrees(quality.max_segment_deg),
        Angle::degrees(quality.max_total_sweep_deg),
    )?;

    Ok(ArcConversion { segments, max_error })
}

#[cfg(test)]
mod tests {
    use geom::Svg;

    use super::*;

    #[test]
    fn max_segment_deg_defaults_to_ninety() {
        assert!((ArcQuality::default().max_segment_deg - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn max_segment_deg_clamps_to_documented_range() {
        let quality = ArcQuality::default().with_max_segment_deg(5.0);
        assert!((quality.max_segment_deg - 10.0).abs() < f64::EPSILON);
        let quality = ArcQuality::default().with_max_segment_deg(200.0);
        assert!((quality.max_segment_deg - 180.0).abs() < f64::EPSILON);
    }

    #[test]
    fn quarter_circle_error_is_small_and_bounded_by_radius() {
        let start = Point::<Svg>::new(50.0, 100.0);
        let end = Point::<Svg>::new(100.0, 50.0);
        let conversion = convert(start, 50.0, 50.0, 0.0, false, true, end, ArcQuality::default())
            .unwrap();
        // §8 invariant 4: cubic-vs-true-arc deviation <= 0.0003 * max(rx, ry).
        assert!(conversion.max_error <= 0.0003 * 50.0, "max_error = {}", conversion.max_error);
    }

    #[test]
    fn half_circle_default_quality_splits_into_two_segments() {
        let start = Point::<Svg>::new(0.0, 0.0);
        let end = Point::<Svg>::new(100.0, 0.0);
        let conversion = convert(start, 50.0, 50.0, 0.0, false, true, end, ArcQuality::default())
            .unwrap();
        assert_eq!(conversion.segments.len(), 2);
    }

    #[test]
    fn non_finite_input_is_reported_as_an_error() {
        let start = Point::<Svg>::new(0.0, 0.0);
        let end = Point::<Svg>::new(f64::NAN, 0.0);
        let err = convert(start, 50.0, 50.0, 0.0, false, true, end, ArcQuality::default())
            .unwrap_err();
        assert_eq!(err, geom::ArcError::NonFiniteInput);
    }
}
