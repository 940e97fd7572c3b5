//! Viewport/viewBox composition, length-unit resolution, and path-bounds
//! math: everything needed to turn raw `d`-attribute numbers into
//! PowerPoint's normalized 0–100000 path-local coordinates.

use geom::{Emu, Point, Rect, Svg};

use crate::arc::{self, ArcQuality};
use crate::error::CoordinateTransformError;
use crate::parser::Command;
use crate::walk::{self, WalkerState};

/// EMU per inch. 914,400 EMU = 1in, the one length-unit fact PowerPoint
/// itself is built on.
pub const EMU_PER_IN: f64 = 914_400.0;
/// EMU per point (1/72in).
pub const EMU_PER_PT: f64 = 12_700.0;
/// EMU per millimeter.
pub const EMU_PER_MM: f64 = 36_000.0;
/// EMU per centimeter.
pub const EMU_PER_CM: f64 = 360_000.0;
/// EMU per CSS reference pixel at 96 DPI.
pub const EMU_PER_PX_AT_96_DPI: f64 = 9_525.0;

/// Which viewport axis a percentage length resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// The viewport's width.
    Width,
    /// The viewport's height.
    Height,
}

/// A length unit accepted anywhere an SVG length can appear in a
/// [`ConversionContext`] or a style attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Unit {
    /// CSS reference pixel; SVG's default unit when no suffix is given.
    Px,
    /// Point, 1/72in.
    Pt,
    /// Millimeter.
    Mm,
    /// Inch.
    In,
    /// Centimeter.
    Cm,
    /// Font-relative `em`, resolved against [`ConversionContext::font_size_px`].
    Em,
    /// Font-relative `ex`, approximated here as half an `em` like most
    /// engines do absent real font metrics.
    Ex,
    /// Percentage of a viewport axis.
    Percent(Axis),
}

/// Viewport dimensions, DPI, optional `viewBox`, and font size: the context
/// every length resolution and bounds calculation is performed against.
/// Created once per document and immutable afterward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionContext {
    /// Viewport width, in CSS pixels.
    pub viewport_w: f64,
    /// Viewport height, in CSS pixels.
    pub viewport_h: f64,
    /// Dots per inch; SVG/CSS's reference value is 96.0.
    pub dpi: f64,
    /// The `viewBox` attribute, if the root element declared one.
    pub viewbox: Option<ViewBox>,
    /// Font size, in CSS pixels, for `em`/`ex` resolution.
    pub font_size_px: f64,
}

impl ConversionContext {
    /// Creates a context with the default DPI (96.0) and font size (16px),
    /// and no `viewBox`.
    #[must_use]
    pub fn new(viewport_w: f64, viewport_h: f64) -> Self {
        Self {
            viewport_w,
            viewport_h,
            dpi: 96.0,
            viewbox: None,
            font_size_px: 16.0,
        }
    }

    /// Returns a copy with `viewbox` set.
    #[must_use]
    pub fn with_viewbox(mut self, viewbox: ViewBox) -> Self {
        self.viewbox = Some(viewbox);
        self
    }

    /// Returns a copy with `dpi` set.
    #[must_use]
    pub fn with_dpi(mut self, dpi: f64) -> Self {
        self.dpi = dpi;
        self
    }

    /// Returns a copy with `font_size_px` set.
    #[must_use]
    pub fn with_font_size_px(mut self, font_size_px: f64) -> Self {
        self.font_size_px = font_size_px;
        self
    }
}

/// The `viewBox="min-x min-y width height"` attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    /// Left edge of the viewBox, in user units.
    pub min_x: f64,
    /// Top edge of the viewBox, in user units.
    pub min_y: f64,
    /// Width of the viewBox, in user units.
    pub width: f64,
    /// Height of the viewBox, in user units.
    pub height: f64,
}

/// One of SVG's nine `preserveAspectRatio` alignment keywords, split into an
/// x and a y component (`xMidYMax` → `{x: Mid, y: Max}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignKeyword {
    /// Align to the viewport's minimum edge; alignment factor 0.0.
    Min,
    /// Center in the viewport; alignment factor 0.5.
    Mid,
    /// Align to the viewport's maximum edge; alignment factor 1.0.
    Max,
}

impl AlignKeyword {
    /// The alignment factor this keyword contributes to `align_x`/`align_y`.
    #[must_use]
    pub fn factor(self) -> f64 {
        match self {
            Self::Min => 0.0,
            Self::Mid => 0.5,
            Self::Max => 1.0,
        }
    }
}

/// Whether the scaled viewBox is letterboxed to fit inside the viewport
/// (`meet`) or overflows it (`slice`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetOrSlice {
    /// Use `min(scale_x, scale_y)`; the whole viewBox is visible.
    Meet,
    /// Use `max(scale_x, scale_y)`; the viewBox fills the viewport, cropped.
    Slice,
}

/// Parsed `preserveAspectRatio` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreserveAspectRatio {
    /// `none`: scale_x and scale_y are independent, no alignment.
    None,
    /// One of the nine alignment keywords, with `meet` or `slice`.
    Align {
        /// Horizontal alignment.
        x: AlignKeyword,
        /// Vertical alignment.
        y: AlignKeyword,
        /// Fit behavior.
        meet_or_slice: MeetOrSlice,
    },
}

impl Default for PreserveAspectRatio {
    /// SVG's default: `xMidYMid meet`.
    fn default() -> Self {
        Self::Align {
            x: AlignKeyword::Mid,
            y: AlignKeyword::Mid,
            meet_or_slice: MeetOrSlice::Meet,
        }
    }
}

/// Parses a `preserveAspectRatio` attribute value (an optional leading
/// `defer`, an alignment keyword, and an optional `meet`/`slice`).
pub fn parse_preserve_aspect_ratio(
    value: &str,
) -> Result<PreserveAspectRatio, CoordinateTransformError> {
    let mut tokens = value.split_whitespace().filter(|t| *t != "defer");
    let Some(align) = tokens.next() else {
        return Ok(PreserveAspectRatio::default());
    };
    if align == "none" {
        return Ok(PreserveAspectRatio::None);
    }
    if align.len() != 8 || !align.starts_with('x') || !align[4..5].eq("Y") {
        return Err(CoordinateTransformError::new(format!(
            "'{align}' is not a valid preserveAspectRatio alignment"
        )));
    }
    let x = align_keyword(&align[1..4])?;
    let y = align_keyword(&align[5..8])?;
    let meet_or_slice = match tokens.next() {
        None | Some("meet") => MeetOrSlice::Meet,
        Some("slice") => MeetOrSlice::Slice,
        Some(other) => {
            return Err(CoordinateTransformError::new(format!(
                "'{other}' is not 'meet' or 'slice'"
            )))
        }
    };
    Ok(PreserveAspectRatio::Align {
        x,
        y,
        meet_or_slice,
    })
}

fn align_keyword(s: &str) -> Result<AlignKeyword, CoordinateTransformError> {
    match s {
        "XMin" | "Min" => Ok(AlignKeyword::Min),
        "XMid" | "Mid" => Ok(AlignKeyword::Mid),
        "XMax" | "Max" => Ok(AlignKeyword::Max),
        other => Err(CoordinateTransformError::new(format!(
            "'{other}' is not a recognized alignment keyword"
        ))),
    }
}

/// The composed mapping from `viewBox` user-space coordinates into viewport
/// coordinates, per SVG §7.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMapping {
    /// `viewBox`'s `min-x`, or 0 if there is no `viewBox`.
    pub viewbox_origin_x: f64,
    /// `viewBox`'s `min-y`, or 0 if there is no `viewBox`.
    pub viewbox_origin_y: f64,
    /// Horizontal scale factor applied after translating out the viewBox origin.
    pub scale_x: f64,
    /// Vertical scale factor applied after translating out the viewBox origin.
    pub scale_y: f64,
    /// Horizontal alignment factor (0.0 min, 0.5 mid, 1.0 max).
    pub align_x: f64,
    /// Vertical alignment factor (0.0 min, 0.5 mid, 1.0 max).
    pub align_y: f64,
    /// Whether the uniform scale was chosen to fit (`meet`) or fill (`slice`).
    pub meet_or_slice: MeetOrSlice,
}

/// Composes a viewport/`viewBox`/`preserveAspectRatio` triple into a
/// [`ViewportMapping`], per SVG §7.
#[must_use]
pub fn compose_viewport(
    viewport_w: f64,
    viewport_h: f64,
    viewbox: Option<ViewBox>,
    preserve_aspect_ratio: Option<PreserveAspectRatio>,
) -> ViewportMapping {
    let Some(viewbox) = viewbox else {
        return ViewportMapping {
            viewbox_origin_x: 0.0,
            viewbox_origin_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            align_x: 0.5,
            align_y: 0.5,
            meet_or_slice: MeetOrSlice::Meet,
        };
    };

    let scale_x = viewport_w / viewbox.width;
    let scale_y = viewport_h / viewbox.height;
    let par = preserve_aspect_ratio.unwrap_or_default();

    let (scale_x, scale_y, align_x, align_y, meet_or_slice) = match par {
        PreserveAspectRatio::None => (scale_x, scale_y, 0.0, 0.0, MeetOrSlice::Meet),
        PreserveAspectRatio::Align {
            x,
            y,
            meet_or_slice,
        } => {
            let uniform = match meet_or_slice {
                MeetOrSlice::Meet => scale_x.min(scale_y),
                MeetOrSlice::Slice => scale_x.max(scale_y),
            };
            (uniform, uniform, x.factor(), y.factor(), meet_or_slice)
        }
    };

    ViewportMapping {
        viewbox_origin_x: viewbox.min_x,
        viewbox_origin_y: viewbox.min_y,
        scale_x,
        scale_y,
        align_x,
        align_y,
        meet_or_slice,
    }
}

/// Resolves lengths (with or without a unit suffix) to EMU. Implementations
/// may be supplied by the caller; [`DefaultUnitConverter`] covers the
/// standard SVG/CSS unit set without any external dependency.
pub trait UnitConverter {
    /// Parses and resolves a length string (`"12px"`, `"1in"`, bare `"12"`
    /// read as pixels) to EMU.
    fn to_emu(&self, length: &str, ctx: &ConversionContext) -> Result<i64, CoordinateTransformError>;

    /// Resolves an already-parsed numeric value in a known unit to EMU.
    fn to_emu_value(&self, value: f64, unit: Unit, ctx: &ConversionContext) -> i64;
}

/// Parses a CSS/SVG length (`"12px"`, `"0.5in"`, `"50%"`, bare `"12"`).
pub fn parse_length(s: &str) -> Result<(f64, Unit), CoordinateTransformError> {
    let s = s.trim();
    let bad_length = || CoordinateTransformError::new(format!("'{s}' is not a valid length"));

    let (number, unit) = if let Some(number) = s.strip_suffix('%') {
        (number, Unit::Percent(Axis::Width))
    } else if let Some(number) = s.strip_suffix("px") {
        (number, Unit::Px)
    } else if let Some(number) = s.strip_suffix("pt") {
        (number, Unit::Pt)
    } else if let Some(number) = s.strip_suffix("mm") {
        (number, Unit::Mm)
    } else if let Some(number) = s.strip_suffix("cm") {
        (number, Unit::Cm)
    } else if let Some(number) = s.strip_suffix("in") {
        (number, Unit::In)
    } else if let Some(number) = s.strip_suffix("em") {
        (number, Unit::Em)
    } else if let Some(number) = s.strip_suffix("ex") {
        (number, Unit::Ex)
    } else {
        (s, Unit::Px)
    };

    let value = number.trim().parse::<f64>().map_err(|_| bad_length())?;
    Ok((value, unit))
}

/// [`UnitConverter`] covering the standard SVG/CSS unit set, with no
/// dependency on an external font or layout engine (`em`/`ex` resolve
/// against [`ConversionContext::font_size_px`], `%` against the relevant
/// viewport axis).
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultUnitConverter;

impl DefaultUnitConverter {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn px_to_emu(px: f64, dpi: f64) -> i64 {
        (px * EMU_PER_IN / dpi).round() as i64
    }
}

impl UnitConverter for DefaultUnitConverter {
    fn to_emu(&self, length: &str, ctx: &ConversionContext) -> Result<i64, CoordinateTransformError> {
        let (value, unit) = parse_length(length)?;
        Ok(self.to_emu_value(value, unit, ctx))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn to_emu_value(&self, value: f64, unit: Unit, ctx: &ConversionContext) -> i64 {
        match unit {
            Unit::In => (value * EMU_PER_IN).round() as i64,
            Unit::Pt => (value * EMU_PER_PT).round() as i64,
            Unit::Mm => (value * EMU_PER_MM).round() as i64,
            Unit::Cm => (value * EMU_PER_CM).round() as i64,
            Unit::Px => Self::px_to_emu(value, ctx.dpi),
            Unit::Em => Self::px_to_emu(value * ctx.font_size_px, ctx.dpi),
            Unit::Ex => Self::px_to_emu(value * ctx.font_size_px * 0.5, ctx.dpi),
            Unit::Percent(axis) => {
                let base = match axis {
                    Axis::Width => ctx.viewport_w,
                    Axis::Height => ctx.viewport_h,
                };
                Self::px_to_emu(value / 100.0 * base, ctx.dpi)
            }
        }
    }
}

/// The points a command contributes to the path's bounding box, per
/// §4.2's bounds table — a different selection than the emitter's full
/// resolved geometry (e.g. `S`'s reflected control point is excluded).
fn contributed_points(pen: Point<Svg>, command: &Command) -> Vec<Point<Svg>> {
    match *command {
        Command::MoveTo { is_relative, x, y } | Command::LineTo { is_relative, x, y } => {
            vec![walk::resolve_xy(pen, is_relative, x, y)]
        }
        Command::Horizontal { is_relative, x } => {
            vec![Point::new(walk::resolve_x(pen, is_relative, x), pen.y)]
        }
        Command::Vertical { is_relative, y } => {
            vec![Point::new(pen.x, walk::resolve_y(pen, is_relative, y))]
        }
        Command::CubicCurve {
            is_relative,
            x1,
            y1,
            x2,
            y2,
            x,
            y,
        } => vec![
            walk::resolve_xy(pen, is_relative, x1, y1),
            walk::resolve_xy(pen, is_relative, x2, y2),
            walk::resolve_xy(pen, is_relative, x, y),
        ],
        Command::SmoothCubic {
            is_relative,
            x2,
            y2,
            x,
            y,
        } => vec![
            walk::resolve_xy(pen, is_relative, x2, y2),
            walk::resolve_xy(pen, is_relative, x, y),
        ],
        Command::Quadratic {
            is_relative,
            x1,
            y1,
            x,
            y,
        } => vec![
            walk::resolve_xy(pen, is_relative, x1, y1),
            walk::resolve_xy(pen, is_relative, x, y),
        ],
        Command::SmoothQuad { is_relative, x, y } => {
            vec![walk::resolve_xy(pen, is_relative, x, y)]
        }
        Command::Arc {
            is_relative,
            end_x,
            end_y,
            ..
        } => vec![walk::resolve_xy(pen, is_relative, end_x, end_y)],
        Command::ClosePath { .. } => Vec::new(),
    }
}

/// Maps one raw `d`-attribute coordinate through the `viewBox`/
/// `preserveAspectRatio` transform (identity if the context has no
/// `viewBox`), landing in viewport pixels — still `Svg`-labeled, since no
/// unit or EMU resolution has happened yet.
#[must_use]
fn apply_viewbox(p: Point<Svg>, ctx: &ConversionContext) -> Point<Svg> {
    let Some(viewbox) = ctx.viewbox else {
        return p;
    };
    let mapping = compose_viewport(ctx.viewport_w, ctx.viewport_h, Some(viewbox), None);
    let scaled_x = (p.x - mapping.viewbox_origin_x) * mapping.scale_x;
    let scaled_y = (p.y - mapping.viewbox_origin_y) * mapping.scale_y;
    let offset_x = (ctx.viewport_w - viewbox.width * mapping.scale_x) * mapping.align_x;
    let offset_y = (ctx.viewport_h - viewbox.height * mapping.scale_y) * mapping.align_y;
    Point::new(scaled_x + offset_x, scaled_y + offset_y)
}

/// Maps a single raw SVG coordinate all the way to EMU: `viewBox`/
/// `preserveAspectRatio` composition, then unit resolution via `converter`.
/// This is the operation the emitter and [`calculate_path_bounds`] must
/// agree on so that bounds and emitted points land in the same space.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn svg_point_to_emu(
    p: Point<Svg>,
    ctx: &ConversionContext,
    converter: &dyn UnitConverter,
) -> Point<Emu> {
    let viewport_px = apply_viewbox(p, ctx);
    Point::new(
        converter.to_emu_value(viewport_px.x, Unit::Px, ctx) as f64,
        converter.to_emu_value(viewport_px.y, Unit::Px, ctx) as f64,
    )
}

/// Bounding box of a command sequence, in raw SVG user-space coordinates
/// (no unit or viewBox resolution applied). An empty sequence bounds to a
/// single point at the origin.
fn path_bounds_svg(commands: &[Command]) -> Rect<Svg> {
    let mut state = WalkerState::<Svg>::new();
    let mut bounds: Option<Rect<Svg>> = None;

    for command in commands {
        let pen_before = state.pen;
        for point in contributed_points(pen_before, command) {
            bounds = Some(match bounds {
                Some(mut rect) => {
                    rect.extend(point);
                    rect
                }
                None => Rect::from_point(point),
            });
        }
        let _ = walk::step(&mut state, command);
    }

    bounds.unwrap_or_else(|| Rect::from_point(Point::origin()))
}

/// Walks `commands`, tracking the pen per SVG §8.3, and returns their
/// bounding box converted to EMU via `converter` (which already knows the
/// context's DPI). SVG user-space coordinates are treated as CSS pixels at
/// `ctx.dpi`.
#[must_use]
pub fn calculate_path_bounds(
    commands: &[Command],
    ctx: &ConversionContext,
    converter: &dyn UnitConverter,
) -> Rect<Emu> {
    let svg_bounds = path_bounds_svg(commands);
    Rect::from_points(
        svg_point_to_emu(svg_bounds.min, ctx, converter),
        svg_point_to_emu(svg_bounds.max, ctx, converter),
    )
}

/// Bounding box of a command sequence, refining every `A`'s contribution from
/// its bare endpoint (§4.2's default table) to its true swept extent — an
/// opt-in quality improvement §9 Open Question 2 calls out as optional, not
/// wired into [`calculate_path_bounds`] itself. Arcs are expanded via
/// [`crate::arc::convert`] and each resulting cubic is sampled at five
/// points, which tracks the true ellipse extrema closely enough for bounds
/// purposes without duplicating the endpoint-to-center math a second time.
#[must_use]
pub fn calculate_path_bounds_with_tight_arcs(
    commands: &[Command],
    ctx: &ConversionContext,
    converter: &dyn UnitConverter,
    arc_quality: ArcQuality,
) -> Rect<Emu> {
    let svg_bounds = path_bounds_svg_tight(commands, arc_quality);
    Rect::from_points(
        svg_point_to_emu(svg_bounds.min, ctx, converter),
        svg_point_to_emu(svg_bounds.max, ctx, converter),
    )
}

fn extend_bounds(bounds: &mut Option<Rect<Svg>>, p: Point<Svg>) {
    *bounds = Some(match bounds.take() {
        Some(mut rect) => {
            rect.extend(p);
            rect
        }
        None => Rect::from_point(p),
    });
}

fn path_bounds_svg_tight(commands: &[Command], arc_quality: ArcQuality) -> Rect<Svg> {
    let mut state = WalkerState::<Svg>::new();
    let mut bounds: Option<Rect<Svg>> = None;

    for command in commands {
        let pen_before = state.pen;
        if let Command::Arc {
            is_relative,
            rx,
            ry,
            x_axis_rotation_deg,
            large_arc,
            sweep,
            end_x,
            end_y,
        } = *command
        {
            let end = walk::resolve_xy(pen_before, is_relative, end_x, end_y);
            match arc::convert(pen_before, rx, ry, x_axis_rotation_deg, large_arc, sweep, end, arc_quality) {
                Ok(conversion) => {
                    let mut seg_start = pen_before;
                    for segment in &conversion.segments {
                        for i in 0..=4 {
                            let t = f64::from(i) / 4.0;
                            extend_bounds(
                                &mut bounds,
                                cubic_point_at(seg_start, segment.c1, segment.c2, segment.end, t),
                            );
                        }
                        seg_start = segment.end;
                    }
                }
                Err(_) => extend_bounds(&mut bounds, end),
            }
        } else {
            for point in contributed_points(pen_before, command) {
                extend_bounds(&mut bounds, point);
            }
        }
        let _ = walk::step(&mut state, command);
    }

    bounds.unwrap_or_else(|| Rect::from_point(Point::origin()))
}

/// De Casteljau evaluation of a cubic Bezier at parameter `t`.
fn cubic_point_at(
    p0: Point<Svg>,
    p1: Point<Svg>,
    p2: Point<Svg>,
    p3: Point<Svg>,
    t: f64,
) -> Point<Svg> {
    let p01 = p0.lerp(p1, t);
    let p12 = p1.lerp(p2, t);
    let p23 = p2.lerp(p3, t);
    let p012 = p01.lerp(p12, t);
    let p123 = p12.lerp(p23, t);
    p012.lerp(p123, t)
}

/// Projects an EMU-space point into PowerPoint's normalized 0–100000
/// path-local space, given the path's EMU bounds. Degenerate axes (zero
/// width/height) map to 0 rather than dividing by zero; out-of-range
/// results (for control points outside the bounding box) are intentionally
/// not clamped.
#[must_use]
pub fn svg_to_relative(point: Point<Emu>, bounds: &Rect<Emu>) -> (i64, i64) {
    #[allow(clippy::cast_possible_truncation)]
    fn project(value: f64, min: f64, extent: f64) -> i64 {
        if extent == 0.0 {
            0
        } else {
            ((value - min) / extent * 100_000.0).round() as i64
        }
    }

    (
        project(point.x, bounds.min.x, bounds.width()),
        project(point.y, bounds.min.y, bounds.height()),
    )
}
