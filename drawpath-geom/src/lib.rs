//! Unit-tagged 2D geometry primitives: points, vectors, angles, affine
//! transforms and rectangles, each parameterized by a zero-sized coordinate
//! space marker, plus the elliptical-arc-to-cubic-Bezier conversion that
//! underlies SVG `A` command support.
//!
//! Coordinate spaces are not convertible to each other by arithmetic alone:
//! [`Point<Svg>`] and [`Point<Emu>`] cannot be added. Crates that need to
//! move a value between spaces do so explicitly, typically with a function
//! that also carries the runtime data (a viewport, a bounding box) the
//! conversion actually depends on.

mod angle;
mod path;
mod point;
mod rect;
mod space;
mod transform;
mod vector;

pub use angle::Angle;
pub use path::{arc_to_bezier, ArcError, BezierSegment};
pub use point::Point;
pub use rect::Rect;
pub use space::{Emu, Relative, Space, Svg};
pub use transform::Transform;
pub use vector::Vector;
