//! Path-level geometry: the elliptical-arc-to-cubic-Bezier conversion.

mod arc_to_bezier;

pub use arc_to_bezier::{arc_to_bezier, ArcError, BezierSegment};
