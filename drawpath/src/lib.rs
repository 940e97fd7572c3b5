//! Converts SVG path data (the `d` attribute, plus a viewport/viewBox
//! description) into PowerPoint DrawingML `<a:pathLst>`/`<p:sp>` fragments.
//!
//! [`facade::PathSystem`] is the entry point for most callers; the
//! individual stages ([`parser`], [`coord`], [`arc`], [`emit`]) are public
//! for callers who want to drive the pipeline themselves or reuse a single
//! stage.

#![cfg_attr(coverage, expect(unstable_features))]
#![cfg_attr(coverage, feature(coverage_attribute))]

pub mod arc;
pub mod coord;
pub mod emit;
pub mod error;
pub mod facade;
pub mod parser;
pub mod style;
mod walk;

pub use self::error::PathProcessingError;
pub use self::facade::{CommandStats, PathProcessingResult, PathSpec, PathSystem};
pub use self::parser::Command;
pub use self::walk::{PrevKind, ResolvedStep, WalkerState};
