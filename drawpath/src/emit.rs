//! The DrawingML emitter (C4): walks a resolved command sequence, delegating
//! arcs to [`crate::arc`] and smooth-curve reflection to [`crate::walk`], and
//! builds `<a:pathLst>`/`<p:sp>` XML with an injection-safe DOM builder (the
//! `svg` crate's generic [`Element`]) instead of string concatenation.

use geom::{Emu, Point, Rect, Svg};
use svg::node::element::Element;

use crate::arc::{self, ArcConversion, ArcQuality};
use crate::coord::{self, ConversionContext, UnitConverter};
use crate::error::{ArcConversionError, PathProcessingError};
use crate::parser::Command;
use crate::style::{ColorParser, Paint, Style};
use crate::walk::{self, ResolvedStep, WalkerState};

/// Per-call statistics the facade folds into its running
/// [`crate::facade::CommandStats`], per spec §4.3's "Quality stats".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EmitStats {
    /// Number of `A`/`a` commands processed (each may expand to more than one
    /// `cubicBezTo`).
    pub arc_count: usize,
    /// Worst cubic-vs-true-arc deviation estimate (§8 invariant 4) across
    /// every arc in the path; `0.0` if the path had no arcs.
    pub max_arc_error: f64,
}

/// Fallback EMU stroke width (1px at 96 DPI) used when a [`Style`] requests a
/// stroke but gives no `stroke-width`.
const DEFAULT_STROKE_WIDTH_EMU: i64 = 9525;

/// Builds the `<a:pathLst>` element for `commands`, shared by
/// [`generate_path_xml`] and [`generate_shape_xml`] so the shape wrapper
/// never re-parses a string to embed the path.
fn build_path_list(
    commands: &[Command],
    bounds: &Rect<Emu>,
    ctx: &ConversionContext,
    converter: &dyn UnitConverter,
    arc_quality: ArcQuality,
) -> Result<(Element, EmitStats), PathProcessingError> {
    let mut path = Element::new("a:path").set("w", "100000").set("h", "100000");
    let mut state = WalkerState::<Svg>::new();
    let mut stats = EmitStats::default();

    for command in commands {
        let resolved = walk::step(&mut state, command);
        log::trace!("emitting {:?} for {:?}", resolved, command);
        match resolved {
            ResolvedStep::MoveTo(p) => {
                path = path.add(point_command("a:moveTo", project(p, ctx, converter, bounds)));
            }
            ResolvedStep::LineTo(p) => {
                path = path.add(point_command("a:lnTo", project(p, ctx, converter, bounds)));
            }
            ResolvedStep::CubicTo { c1, c2, end } => {
                path = path.add(cubic_command(
                    project(c1, ctx, converter, bounds),
                    project(c2, ctx, converter, bounds),
                    project(end, ctx, converter, bounds),
                ));
            }
            ResolvedStep::ArcTo {
                start,
                rx,
                ry,
                x_axis_rotation_deg,
                large_arc,
                sweep,
                end,
            } => {
                let conversion = resolve_arc(
                    start,
                    rx,
                    ry,
                    x_axis_rotation_deg,
                    large_arc,
                    sweep,
                    end,
                    arc_quality,
                )?;
                stats.arc_count += 1;
                stats.max_arc_error = stats.max_arc_error.max(conversion.max_error);
                for segment in &conversion.segments {
                    path = path.add(cubic_command(
                        project(segment.c1, ctx, converter, bounds),
                        project(segment.c2, ctx, converter, bounds),
                        project(segment.end, ctx, converter, bounds),
                    ));
                }
                if let Some(last) = conversion.segments.last() {
                    // Open Question 4: a following `S` reflects the last
                    // expanded segment's c2, not the arc's own endpoint.
                    state.prev_cubic_c2 = Some(last.c2);
                }
            }
            ResolvedStep::Close { .. } => {
                path = path.add(Element::new("a:close"));
            }
        }
    }

    Ok((Element::new("a:pathLst").add(path), stats))
}

/// Converts one arc, recovering with a linear fallback for every failure
/// mode except non-finite input (spec §4.3's recovery policy, §7's
/// propagation policy).
#[allow(clippy::too_many_arguments)]
fn resolve_arc(
    start: Point<Svg>,
    rx: f64,
    ry: f64,
    x_axis_rotation_deg: f64,
    large_arc: bool,
    sweep: bool,
    end: Point<Svg>,
    arc_quality: ArcQuality,
) -> Result<ArcConversion<Svg>, PathProcessingError> {
    match arc::convert(start, rx, ry, x_axis_rotation_deg, large_arc, sweep, end, arc_quality) {
        Ok(conversion) => Ok(conversion),
        Err(geom::ArcError::NonFiniteInput) => {
            Err(PathProcessingError::from(ArcConversionError::from(geom::ArcError::NonFiniteInput)))
        }
        Err(other) => {
            log::warn!("arc conversion failed ({other}), falling back to a linear segment");
            Ok(ArcConversion {
                segments: vec![geom::BezierSegment {
                    c1: start.lerp(end, 1.0 / 3.0),
                    c2: start.lerp(end, 2.0 / 3.0),
                    end,
                }],
                max_error: 0.0,
            })
        }
    }
}

fn project(
    p: Point<Svg>,
    ctx: &ConversionContext,
    converter: &dyn UnitConverter,
    bounds: &Rect<Emu>,
) -> (i64, i64) {
    let emu = coord::svg_point_to_emu(p, ctx, converter);
    coord::svg_to_relative(emu, bounds)
}

fn point_command(tag: &'static str, (x, y): (i64, i64)) -> Element {
    Element::new(tag).add(pt(x, y))
}

fn cubic_command(c1: (i64, i64), c2: (i64, i64), end: (i64, i64)) -> Element {
    Element::new("a:cubicBezTo")
        .add(pt(c1.0, c1.1))
        .add(pt(c2.0, c2.1))
        .add(pt(end.0, end.1))
}

fn pt(x: i64, y: i64) -> Element {
    Element::new("a:pt").set("x", x.to_string()).set("y", y.to_string())
}

/// DrawingML namespace URI, injected once at the root of every returned
/// fragment rather than threaded through every element (per spec §9's
/// "inject `xmlns:a` once at the root").
const DRAWINGML_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
/// PresentationML namespace URI, for the `<p:sp>` shape envelope root.
const PRESENTATIONML_NS: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

/// Generates the standalone `<a:pathLst>` DrawingML fragment for `commands`,
/// per spec §4.4.
pub fn generate_path_xml(
    commands: &[Command],
    bounds: &Rect<Emu>,
    ctx: &ConversionContext,
    converter: &dyn UnitConverter,
    arc_quality: ArcQuality,
) -> Result<(String, EmitStats), PathProcessingError> {
    let (path_list, stats) = build_path_list(commands, bounds, ctx, converter, arc_quality)?;
    let path_list = path_list.set("xmlns:a", DRAWINGML_NS);
    Ok((path_list.to_string(), stats))
}

/// Wraps a path in a `<p:sp>` shape envelope (spec §4.4's "Shape envelope"):
/// an `a:xfrm` taken from the EMU bounds, fill/stroke from `style`, and a
/// caller-assigned `shape_id`.
#[allow(clippy::too_many_arguments)]
pub fn generate_shape_xml(
    commands: &[Command],
    bounds: &Rect<Emu>,
    ctx: &ConversionContext,
    converter: &dyn UnitConverter,
    arc_quality: ArcQuality,
    style: &Style,
    color_parser: &dyn ColorParser,
    shape_id: u32,
) -> Result<(String, EmitStats), PathProcessingError> {
    let (path_list, stats) = build_path_list(commands, bounds, ctx, converter, arc_quality)?;

    let cust_geom = Element::new("a:custGeom")
        .add(Element::new("a:avLst"))
        .add(Element::new("a:gdLst"))
        .add(Element::new("a:ahLst"))
        .add(Element::new("a:cxnLst"))
        .add(
            Element::new("a:rect")
                .set("l", "0")
                .set("t", "0")
                .set("r", "0")
                .set("b", "0"),
        )
        .add(path_list);

    let xfrm = Element::new("a:xfrm")
        .add(
            Element::new("a:off")
                .set("x", round_to_i64(bounds.min.x).to_string())
                .set("y", round_to_i64(bounds.min.y).to_string()),
        )
        .add(
            Element::new("a:ext")
                .set("cx", round_to_i64(bounds.width()).to_string())
                .set("cy", round_to_i64(bounds.height()).to_string()),
        );

    let mut sp_pr = Element::new("p:spPr").add(xfrm).add(cust_geom);
    sp_pr = sp_pr.add(fill_element(style, color_parser)?);
    if let Some(line) = line_element(style, color_parser, ctx, converter)? {
        sp_pr = sp_pr.add(line);
    }

    let nv_sp_pr = Element::new("p:nvSpPr")
        .add(
            Element::new("p:cNvPr")
                .set("id", shape_id.to_string())
                .set("name", format!("Path {shape_id}")),
        )
        .add(Element::new("p:cNvSpPr"))
        .add(Element::new("p:nvPr"));

    let sp = Element::new("p:sp")
        .set("xmlns:p", PRESENTATIONML_NS)
        .set("xmlns:a", DRAWINGML_NS)
        .add(nv_sp_pr)
        .add(sp_pr);
    Ok((sp.to_string(), stats))
}

#[allow(clippy::cast_possible_truncation)]
fn round_to_i64(value: f64) -> i64 {
    value.round() as i64
}

fn fill_element(style: &Style, color_parser: &dyn ColorParser) -> Result<Element, PathProcessingError> {
    match &style.fill {
        None | Some(Paint::None) => Ok(Element::new("a:noFill")),
        Some(Paint::Color(value)) => {
            let color = color_parser.parse(value).map_err(PathProcessingError::from)?;
            Ok(Element::new("a:solidFill").add(srgb_clr(&color.hex, style.fill_alpha_percent())))
        }
    }
}

fn line_element(
    style: &Style,
    color_parser: &dyn ColorParser,
    ctx: &ConversionContext,
    converter: &dyn UnitConverter,
) -> Result<Option<Element>, PathProcessingError> {
    let Some(stroke) = &style.stroke else {
        return Ok(None);
    };
    let width_emu = match &style.stroke_width {
        Some(length) => converter.to_emu(length, ctx).map_err(PathProcessingError::from)?,
        None => DEFAULT_STROKE_WIDTH_EMU,
    };
    let ln = Element::new("a:ln").set("w", width_emu.to_string());
    let ln = match stroke {
        Paint::None => ln.add(Element::new("a:noFill")),
        Paint::Color(value) => {
            let color = color_parser.parse(value).map_err(PathProcessingError::from)?;
            ln.add(Element::new("a:solidFill").add(srgb_clr(&color.hex, style.stroke_alpha_percent())))
        }
    };
    Ok(Some(ln))
}

/// Builds an `<a:srgbClr>`, adding a child `<a:alpha>` only when the
/// resolved alpha is less than fully opaque (DrawingML expresses alpha in
/// thousandths of a percent, `0`–`100000`).
fn srgb_clr(hex: &str, alpha_percent: u32) -> Element {
    let srgb = Element::new("a:srgbClr").set("val", hex.to_owned());
    if alpha_percent < 100 {
        srgb.add(Element::new("a:alpha").set("val", (u64::from(alpha_percent) * 1000).to_string()))
    } else {
        srgb
    }
}

#[cfg(test)]
mod tests {
    use crate::coord::{ConversionContext, DefaultUnitConverter};
    use crate::style::HexColorParser;
    use crate::{coord, parser};

    use super::*;

    fn bounds_for(commands: &[Command], ctx: &ConversionContext, converter: &DefaultUnitConverter) -> Rect<Emu> {
        coord::calculate_path_bounds(commands, ctx, converter)
    }

    #[test]
    fn generate_path_xml_normalizes_to_0_100000() {
        let ctx = ConversionContext::new(800.0, 600.0);
        let converter = DefaultUnitConverter;
        let commands = parser::parse("M 100 150 L 300 150 Z").unwrap();
        let bounds = bounds_for(&commands, &ctx, &converter);
        let (xml, stats) = generate_path_xml(&commands, &bounds, &ctx, &converter, ArcQuality::default()).unwrap();
        assert!(xml.contains("a:pathLst"));
        assert!(xml.contains("a:moveTo"));
        assert!(xml.contains(r#"x="0""#));
        assert!(xml.contains(r#"x="100000""#));
        assert!(xml.contains("a:close"));
        assert_eq!(stats.arc_count, 0);
    }

    #[test]
    fn arc_command_expands_to_cubic_bez_to() {
        let ctx = ConversionContext::new(800.0, 600.0);
        let converter = DefaultUnitConverter;
        let commands = parser::parse("M 0 50 A 50 50 0 0 1 100 50").unwrap();
        let bounds = bounds_for(&commands, &ctx, &converter);
        let (xml, stats) = generate_path_xml(&commands, &bounds, &ctx, &converter, ArcQuality::default()).unwrap();
        assert!(xml.contains("a:cubicBezTo"));
        assert!(!xml.contains("a:arcTo"));
        assert_eq!(stats.arc_count, 1);
    }

    #[test]
    fn non_finite_arc_propagates_as_path_processing_error() {
        let ctx = ConversionContext::new(800.0, 600.0);
        let converter = DefaultUnitConverter;
        let commands = parser::parse("M 0 0 A 50 50 0 0 1 NaN 0").unwrap_or_else(|_| {
            vec![
                Command::MoveTo { is_relative: false, x: 0.0, y: 0.0 },
                Command::Arc {
                    is_relative: false,
                    rx: 50.0,
                    ry: 50.0,
                    x_axis_rotation_deg: 0.0,
                    large_arc: false,
                    sweep: true,
                    end_x: f64::NAN,
                    end_y: 0.0,
                },
            ]
        });
        let bounds = bounds_for(&commands, &ctx, &converter);
        let err = generate_path_xml(&commands, &bounds, &ctx, &converter, ArcQuality::default()).unwrap_err();
        assert_eq!(err.stage, crate::error::Stage::ArcConversion);
    }

    #[test]
    fn generate_shape_xml_includes_fill_and_stroke() {
        let ctx = ConversionContext::new(800.0, 600.0);
        let converter = DefaultUnitConverter;
        let color_parser = HexColorParser;
        let commands = parser::parse("M 0 0 L 10 0 L 10 10 Z").unwrap();
        let bounds = bounds_for(&commands, &ctx, &converter);
        let style = Style::new().with_fill("#ff0000").with_stroke("#0000ff", "2px");
        let (xml, _) = generate_shape_xml(
            &commands,
            &bounds,
            &ctx,
            &converter,
            ArcQuality::default(),
            &style,
            &color_parser,
            7,
        )
        .unwrap();
        assert!(xml.contains("p:sp"));
        assert!(xml.contains(r#"id="7""#));
        assert!(xml.contains("FF0000"));
        assert!(xml.contains("0000FF"));
    }

    #[test]
    fn generate_shape_xml_defaults_to_no_fill_without_style() {
        let ctx = ConversionContext::new(800.0, 600.0);
        let converter = DefaultUnitConverter;
        let color_parser = HexColorParser;
        let commands = parser::parse("M 0 0 L 10 0 L 10 10 Z").unwrap();
        let bounds = bounds_for(&commands, &ctx, &converter);
        let style = Style::new();
        let (xml, _) = generate_shape_xml(
            &commands,
            &bounds,
            &ctx,
            &converter,
            ArcQuality::default(),
            &style,
            &color_parser,
            1,
        )
        .unwrap();
        assert!(xml.contains("a:noFill"));
    }
}
