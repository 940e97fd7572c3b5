//! The style-attribute surface spec §6 lists as optional input to
//! [`crate::emit::generate_shape_xml`]: `fill`, `fill-opacity`, `opacity`,
//! `stroke`, `stroke-opacity`, `stroke-width`. Color parsing beyond bare hex
//! is delegated to a caller-supplied [`ColorParser`], per spec §6's external
//! collaborator.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::XmlGenerationError;

/// A `fill`/`stroke` value: either `none` or a color string to be resolved
/// by a [`ColorParser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Paint {
    /// `fill="none"`/`stroke="none"`: no paint at all.
    None,
    /// A color string (`"#RGB"`, `"#RRGGBB"`, or anything the configured
    /// [`ColorParser`] accepts).
    Color(String),
}

/// Parses a raw `fill`/`stroke` attribute value into a [`Paint`].
#[must_use]
pub fn parse_paint(value: &str) -> Paint {
    if value.trim().eq_ignore_ascii_case("none") {
        Paint::None
    } else {
        Paint::Color(value.trim().to_owned())
    }
}

/// The style attributes spec §6 lists, all optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    /// `fill`.
    pub fill: Option<Paint>,
    /// `fill-opacity`, `0`–`100` (percent, to stay integral like every other
    /// DrawingML alpha value).
    pub fill_opacity_percent: Option<u32>,
    /// `opacity`, `0`–`100` (percent); combines multiplicatively with
    /// `fill-opacity`/`stroke-opacity`.
    pub opacity_percent: Option<u32>,
    /// `stroke`.
    pub stroke: Option<Paint>,
    /// `stroke-opacity`, `0`–`100` (percent).
    pub stroke_opacity_percent: Option<u32>,
    /// `stroke-width`, a length string (`"2px"`, `"0.5pt"`, bare `"2"`).
    pub stroke_width: Option<String>,
}

impl Style {
    /// An empty style: no fill, no stroke, fully opaque.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `fill` set from a raw attribute value.
    #[must_use]
    pub fn with_fill(mut self, fill: &str) -> Self {
        self.fill = Some(parse_paint(fill));
        self
    }

    /// Returns a copy with `stroke` and `stroke-width` set.
    #[must_use]
    pub fn with_stroke(mut self, stroke: &str, stroke_width: impl Into<String>) -> Self {
        self.stroke = Some(parse_paint(stroke));
        self.stroke_width = Some(stroke_width.into());
        self
    }

    /// The effective alpha (0-100 percent) for the fill, combining
    /// `fill-opacity` and `opacity` multiplicatively.
    #[must_use]
    pub(crate) fn fill_alpha_percent(&self) -> u32 {
        combine_opacity(self.fill_opacity_percent, self.opacity_percent)
    }

    /// The effective alpha (0-100 percent) for the stroke.
    #[must_use]
    pub(crate) fn stroke_alpha_percent(&self) -> u32 {
        combine_opacity(self.stroke_opacity_percent, self.opacity_percent)
    }
}

fn combine_opacity(specific: Option<u32>, general: Option<u32>) -> u32 {
    let specific = specific.unwrap_or(100).min(100);
    let general = general.unwrap_or(100).min(100);
    specific * general / 100
}

/// A resolved color: a 6-digit hex string (no leading `#`) and an alpha in
/// `[0.0, 1.0]`, per spec §6's collaborator contract.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedColor {
    /// 6-digit hex, uppercase, no leading `#` (DrawingML's `srgbClr val`
    /// format).
    pub hex: String,
    /// Alpha, `0.0`-`1.0`.
    pub alpha: f32,
}

/// Resolves a [`Paint::Color`] string to an RGB hex value. Implementations
/// beyond hex (named colors, `rgb()`, CSS color functions) are an external
/// collaborator per spec §6; [`HexColorParser`] covers exactly the input
/// grammar spec §6 itself specifies (`#RGB`/`#RRGGBB`).
pub trait ColorParser {
    /// Parses `value` to a hex color and alpha.
    fn parse(&self, value: &str) -> Result<ParsedColor, XmlGenerationError>;
}

/// The built-in [`ColorParser`]: handles `#RGB` and `#RRGGBB` only, with
/// alpha always `1.0` (hex colors carry no alpha channel; combine with
/// [`Style::fill_alpha_percent`]/[`Style::stroke_alpha_percent`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct HexColorParser;

impl ColorParser for HexColorParser {
    fn parse(&self, value: &str) -> Result<ParsedColor, XmlGenerationError> {
        let Some(digits) = value.strip_prefix('#') else {
            return Err(XmlGenerationError {
                reason: format!("'{value}' is not a hex color (expected a leading '#')"),
            });
        };
        let hex = match digits.len() {
            3 => digits
                .chars()
                .flat_map(|c| [c, c])
                .collect::<String>()
                .to_ascii_uppercase(),
            6 => digits.to_ascii_uppercase(),
            _ => {
                return Err(XmlGenerationError {
                    reason: format!("'{value}' is not a 3- or 6-digit hex color"),
                })
            }
        };
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(XmlGenerationError {
                reason: format!("'{value}' contains non-hex digits"),
            });
        }
        Ok(ParsedColor { hex, alpha: 1.0 })
    }
}

/// Supplies shape ids for [`crate::emit::generate_shape_xml`]. Spec §9
/// explicitly remaps the teacher's wall-clock-seeded global counter away
/// from a process-global: implementations are caller-scoped (typically one
/// per [`crate::facade::PathSystem`]).
pub trait ShapeIdSource {
    /// Returns the next unique shape id.
    fn next_id(&self) -> u32;
}

/// A [`ShapeIdSource`] backed by an [`AtomicU32`], scoped to whatever owns
/// it (never a process-wide singleton).
#[derive(Debug)]
pub struct AtomicIdSource {
    next: AtomicU32,
}

impl AtomicIdSource {
    /// Creates a source that starts counting from `seed`.
    #[must_use]
    pub fn new(seed: u32) -> Self {
        Self {
            next: AtomicU32::new(seed),
        }
    }
}

impl Default for AtomicIdSource {
    /// Starts from `1`: `0` is reserved by PowerPoint for the slide's own
    /// group shape.
    fn default() -> Self {
        Self::new(1)
    }
}

impl ShapeIdSource for AtomicIdSource {
    fn next_id(&self) -> u32 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_paint_recognizes_none_case_insensitively() {
        assert_eq!(parse_paint("None"), Paint::None);
        assert_eq!(parse_paint("#ff0000"), Paint::Color("#ff0000".to_owned()));
    }

    #[test]
    fn hex_color_parser_expands_shorthand() {
        let parser = HexColorParser;
        let color = parser.parse("#abc").unwrap();
        assert_eq!(color.hex, "AABBCC");
        assert!((color.alpha - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn hex_color_parser_rejects_non_hex() {
        let parser = HexColorParser;
        assert!(parser.parse("#zzz").is_err());
        assert!(parser.parse("red").is_err());
    }

    #[test]
    fn atomic_id_source_increments_and_never_repeats() {
        let source = AtomicIdSource::new(5);
        assert_eq!(source.next_id(), 5);
        assert_eq!(source.next_id(), 6);
        assert_eq!(source.next_id(), 7);
    }

    #[test]
    fn opacity_combines_multiplicatively() {
        let mut style = Style::new();
        style.fill_opacity_percent = Some(50);
        style.opacity_percent = Some(50);
        assert_eq!(style.fill_alpha_percent(), 25);
    }

    #[test]
    fn opacity_defaults_to_fully_opaque() {
        assert_eq!(Style::new().fill_alpha_percent(), 100);
    }
}
