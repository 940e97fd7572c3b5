//! The pen-walking table shared by the bounds calculator (C3) and the
//! DrawingML emitter (C4), so the two components can never disagree about
//! what a command does to the current position.

use geom::{Point, Space};

use crate::parser::Command;

/// What kind of command last updated the pen, used to decide whether a
/// following smooth command reflects a control point or falls back to the
/// pen itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrevKind {
    /// `C`/`S`, or an `A` standing in for one (Open Question 4).
    Cubic,
    /// `Q`/`T`.
    Quadratic,
    /// Anything else.
    Other,
}

/// Mutable state that lives for exactly one walk over a command sequence.
#[derive(Debug, Clone, Copy)]
pub struct WalkerState<S: Space> {
    /// Current pen position.
    pub pen: Point<S>,
    /// Start of the current subpath, restored on `Z`.
    pub subpath_start: Point<S>,
    /// What kind of command produced the current pen position.
    pub prev_kind: PrevKind,
    /// The second control point of the last cubic, for `S` reflection.
    pub prev_cubic_c2: Option<Point<S>>,
    /// The control point of the last quadratic, for `T` reflection.
    pub prev_quad_c1: Option<Point<S>>,
}

impl<S: Space> WalkerState<S> {
    /// A fresh walker, pen at the origin, as specified for the start of
    /// every `generate_path_xml`/bounds-calculation call.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pen: Point::origin(),
            subpath_start: Point::origin(),
            prev_kind: PrevKind::Other,
            prev_cubic_c2: None,
            prev_quad_c1: None,
        }
    }
}

impl<S: Space> Default for WalkerState<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// One command resolved to absolute geometry in coordinate space `S`.
#[derive(Debug, Clone, Copy)]
pub enum ResolvedStep<S: Space> {
    /// `M`.
    MoveTo(Point<S>),
    /// `L`, or `H`/`V` translated to a line.
    LineTo(Point<S>),
    /// `C`, `S`, or a lifted `Q`/`T`.
    CubicTo {
        /// First control point.
        c1: Point<S>,
        /// Second control point.
        c2: Point<S>,
        /// Endpoint.
        end: Point<S>,
    },
    /// `A`, with its endpoint-parameterization resolved to absolute points
    /// but not yet expanded into Beziers.
    ArcTo {
        /// Arc start (the pen before this command).
        start: Point<S>,
        /// x radius, as given (sign not yet normalized).
        rx: f64,
        /// y radius, as given (sign not yet normalized).
        ry: f64,
        /// Ellipse x-axis rotation, in degrees.
        x_axis_rotation_deg: f64,
        /// Large-arc flag.
        large_arc: bool,
        /// Sweep flag.
        sweep: bool,
        /// Arc end.
        end: Point<S>,
    },
    /// `Z`.
    Close {
        /// The subpath start the pen returns to.
        to: Point<S>,
    },
}

/// Resolves a coordinate pair against the pen, honoring `is_relative`. Used
/// both by [`step`] and by the bounds calculator, which needs a command's
/// *original* control points rather than `step`'s cubic-lifted ones.
pub(crate) fn resolve_xy<S: Space>(pen: Point<S>, is_relative: bool, x: f64, y: f64) -> Point<S> {
    if is_relative {
        pen + geom::Vector::new(x, y)
    } else {
        Point::new(x, y)
    }
}

/// Single-axis counterpart of [`resolve_xy`], for `H`.
pub(crate) fn resolve_x<S: Space>(pen: Point<S>, is_relative: bool, x: f64) -> f64 {
    if is_relative {
        pen.x + x
    } else {
        x
    }
}

/// Single-axis counterpart of [`resolve_xy`], for `V`.
pub(crate) fn resolve_y<S: Space>(pen: Point<S>, is_relative: bool, y: f64) -> f64 {
    if is_relative {
        pen.y + y
    } else {
        y
    }
}

/// Resolves one command against the walker state, updating `state` exactly
/// as SVG §8.3 and the smooth-curve reflection rules require, and returns
/// the command's absolute geometry.
pub fn step<S: Space>(state: &mut WalkerState<S>, command: &Command) -> ResolvedStep<S> {
    let pen = state.pen;

    let resolved = match *command {
        Command::MoveTo { is_relative, x, y } => {
            let end = resolve_xy(pen, is_relative, x, y);
            state.subpath_start = end;
            ResolvedStep::MoveTo(end)
        }
        Command::LineTo { is_relative, x, y } => {
            ResolvedStep::LineTo(resolve_xy(pen, is_relative, x, y))
        }
        Command::Horizontal { is_relative, x } => {
            let x = resolve_x(pen, is_relative, x);
            ResolvedStep::LineTo(Point::new(x, pen.y))
        }
        Command::Vertical { is_relative, y } => {
            let y = resolve_y(pen, is_relative, y);
            ResolvedStep::LineTo(Point::new(pen.x, y))
        }
        Command::CubicCurve {
            is_relative,
            x1,
            y1,
            x2,
            y2,
            x,
            y,
        } => ResolvedStep::CubicTo {
            c1: resolve_xy(pen, is_relative, x1, y1),
            c2: resolve_xy(pen, is_relative, x2, y2),
            end: resolve_xy(pen, is_relative, x, y),
        },
        Command::SmoothCubic {
            is_relative,
            x2,
            y2,
            x,
            y,
        } => {
            let c1 = match (state.prev_kind, state.prev_cubic_c2) {
                (PrevKind::Cubic, Some(prev_c2)) => pen + (pen - prev_c2),
                _ => pen,
            };
            ResolvedStep::CubicTo {
                c1,
                c2: resolve_xy(pen, is_relative, x2, y2),
                end: resolve_xy(pen, is_relative, x, y),
            }
        }
        Command::Quadratic {
            is_relative,
            x1,
            y1,
            x,
            y,
        } => {
            let q1 = resolve_xy(pen, is_relative, x1, y1);
            let end = resolve_xy(pen, is_relative, x, y);
            state.prev_quad_c1 = Some(q1);
            ResolvedStep::CubicTo {
                c1: pen + (q1 - pen) * (2.0 / 3.0),
                c2: end + (q1 - end) * (2.0 / 3.0),
                end,
            }
        }
        Command::SmoothQuad { is_relative, x, y } => {
            let q1 = match (state.prev_kind, state.prev_quad_c1) {
                (PrevKind::Quadratic, Some(prev_q1)) => pen + (pen - prev_q1),
                _ => pen,
            };
            let end = resolve_xy(pen, is_relative, x, y);
            state.prev_quad_c1 = Some(q1);
            ResolvedStep::CubicTo {
                c1: pen + (q1 - pen) * (2.0 / 3.0),
                c2: end + (q1 - end) * (2.0 / 3.0),
                end,
            }
        }
        Command::Arc {
            is_relative,
            rx,
            ry,
            x_axis_rotation_deg,
            large_arc,
            sweep,
            end_x,
            end_y,
        } => ResolvedStep::ArcTo {
            start: pen,
            rx,
            ry,
            x_axis_rotation_deg,
            large_arc,
            sweep,
            end: resolve_xy(pen, is_relative, end_x, end_y),
        },
        Command::ClosePath { .. } => ResolvedStep::Close {
            to: state.subpath_start,
        },
    };

    // Pen update (SVG §8.3): everything moves the pen to its endpoint
    // except Z, which returns to the subpath origin.
    state.pen = match resolved {
        ResolvedStep::MoveTo(p) | ResolvedStep::LineTo(p) => p,
        ResolvedStep::CubicTo { end, .. } | ResolvedStep::ArcTo { end, .. } => end,
        ResolvedStep::Close { to } => to,
    };

    // Continuity discipline: a reflection control point only survives into
    // the *next* command if this command was of the matching family.
    state.prev_kind = match command {
        Command::CubicCurve { .. } | Command::SmoothCubic { .. } | Command::Arc { .. } => {
            PrevKind::Cubic
        }
        Command::Quadratic { .. } | Command::SmoothQuad { .. } => PrevKind::Quadratic,
        _ => PrevKind::Other,
    };
    if let ResolvedStep::CubicTo { c2, .. } = resolved {
        if matches!(
            command,
            Command::CubicCurve { .. } | Command::SmoothCubic { .. }
        ) {
            state.prev_cubic_c2 = Some(c2);
        } else {
            state.prev_cubic_c2 = None;
        }
    } else {
        state.prev_cubic_c2 = None;
    }
    if !matches!(command, Command::Quadratic { .. } | Command::SmoothQuad { .. }) {
        state.prev_quad_c1 = None;
    }

    resolved
}

#[cfg(test)]
mod tests {
    use isclose::assert_is_close;

    use super::*;

    #[test]
    fn horizontal_and_vertical_become_lines() {
        let mut state = WalkerState::<()>::new();
        let _ = step(&mut state, &Command::MoveTo { is_relative: false, x: 0.0, y: 0.0 });
        let h = step(&mut state, &Command::Horizontal { is_relative: false, x: 10.0 });
        assert!(matches!(h, ResolvedStep::LineTo(p) if p == Point::new(10.0, 0.0)));
        let v = step(&mut state, &Command::Vertical { is_relative: false, y: 5.0 });
        assert!(matches!(v, ResolvedStep::LineTo(p) if p == Point::new(10.0, 5.0)));
    }

    #[test]
    fn close_returns_to_subpath_start() {
        let mut state = WalkerState::<()>::new();
        let _ = step(&mut state, &Command::MoveTo { is_relative: false, x: 1.0, y: 1.0 });
        let _ = step(&mut state, &Command::LineTo { is_relative: false, x: 9.0, y: 9.0 });
        step(&mut state, &Command::ClosePath { is_relative: false });
        assert_is_close!(state.pen, Point::new(1.0, 1.0));
    }

    #[test]
    fn smooth_cubic_reflects_previous_control_point() {
        let mut state = WalkerState::<()>::new();
        let _ = step(&mut state, &Command::MoveTo { is_relative: false, x: 0.0, y: 0.0 });
        let _ = step(
            &mut state,
            &Command::CubicCurve {
                is_relative: false,
                x1: 0.0,
                y1: 50.0,
                x2: 50.0,
                y2: 50.0,
                x: 50.0,
                y: 0.0,
            },
        );
        let smooth = step(
            &mut state,
            &Command::SmoothCubic {
                is_relative: false,
                x2: 100.0,
                y2: -50.0,
                x: 100.0,
                y: 0.0,
            },
        );
        // Reflection of (50, 50) about the pen (50, 0) is (50, -50).
        assert!(matches!(smooth, ResolvedStep::CubicTo { c1, .. } if c1 == Point::new(50.0, -50.0)));
    }

    #[test]
    fn smooth_cubic_without_preceding_cubic_uses_pen() {
        let mut state = WalkerState::<()>::new();
        let _ = step(&mut state, &Command::MoveTo { is_relative: false, x: 0.0, y: 0.0 });
        let _ = step(&mut state, &Command::LineTo { is_relative: false, x: 10.0, y: 0.0 });
        let smooth = step(
            &mut state,
            &Command::SmoothCubic {
                is_relative: false,
                x2: 20.0,
                y2: 10.0,
                x: 30.0,
                y: 0.0,
            },
        );
        assert!(matches!(smooth, ResolvedStep::CubicTo { c1, .. } if c1 == Point::new(10.0, 0.0)));
    }

    #[test]
    fn arc_sets_prev_kind_cubic_like() {
        let mut state = WalkerState::<()>::new();
        let _ = step(&mut state, &Command::MoveTo { is_relative: false, x: 0.0, y: 0.0 });
        let _ = step(
            &mut state,
            &Command::Arc {
                is_relative: false,
                rx: 5.0,
                ry: 5.0,
                x_axis_rotation_deg: 0.0,
                large_arc: false,
                sweep: true,
                end_x: 10.0,
                end_y: 0.0,
            },
        );
        assert_eq!(state.prev_kind, PrevKind::Cubic);
    }
}
