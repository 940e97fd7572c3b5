//! Coordinate-space marker types.
//!
//! Every [`crate::Point`], [`crate::Vector`] and [`crate::Rect`] is tagged with a
//! zero-sized `Space` so that, for example, an SVG-space point and an EMU-space
//! point cannot be added together by accident. The tag is erased at runtime;
//! it exists purely to make cross-space arithmetic a compile error.

use std::fmt;

/// Marker trait for a coordinate space.
///
/// Implemented by zero-sized marker types. Never implemented for a type that
/// carries data: the space is a compile-time label, not a value.
pub trait Space: Copy + Clone + fmt::Debug + Default + 'static {}

/// The untagged space, used in tests and by callers who don't care to track
/// coordinate spaces.
impl Space for () {}

/// Raw SVG user-space coordinates, exactly as they appear in a `d` attribute,
/// before any viewBox, unit or EMU resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Svg;
impl Space for Svg {}

/// English Metric Units: PowerPoint's absolute length unit. 914,400 EMU = 1in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Emu;
impl Space for Emu {}

/// PowerPoint's path-local normalized space, declared by
/// `<a:path w="100000" h="100000">`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Relative;
impl Space for Relative {}
