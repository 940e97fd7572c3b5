//! Tokenizes an SVG path `d` attribute into a validated [`Command`] sequence.
//!
//! Grounded on the pull-parser idiom of `RazrFalcon`'s `svgtypes`/`svgparser`
//! crates: a byte cursor over `&str` with `skip_separators`/`parse_number`
//! primitives, rather than a regex or a generic tokenizer crate.

use crate::error::ParseError;

/// One SVG path command, with parameters typed per variant rather than as a
/// flat float list — an arity mismatch is a compile error here, not a
/// runtime surprise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// `M`/`m`.
    MoveTo {
        /// Whether the coordinates are relative to the current pen.
        is_relative: bool,
        /// Target x coordinate.
        x: f64,
        /// Target y coordinate.
        y: f64,
    },
    /// `L`/`l`, including pairs implied by a run after `M`/`m`.
    LineTo {
        /// Whether the coordinates are relative to the current pen.
        is_relative: bool,
        /// Target x coordinate.
        x: f64,
        /// Target y coordinate.
        y: f64,
    },
    /// `H`/`h`.
    Horizontal {
        /// Whether the coordinate is relative to the current pen.
        is_relative: bool,
        /// Target x coordinate.
        x: f64,
    },
    /// `V`/`v`.
    Vertical {
        /// Whether the coordinate is relative to the current pen.
        is_relative: bool,
        /// Target y coordinate.
        y: f64,
    },
    /// `C`/`c`.
    CubicCurve {
        /// Whether the coordinates are relative to the current pen.
        is_relative: bool,
        /// First control point x.
        x1: f64,
        /// First control point y.
        y1: f64,
        /// Second control point x.
        x2: f64,
        /// Second control point y.
        y2: f64,
        /// Target x coordinate.
        x: f64,
        /// Target y coordinate.
        y: f64,
    },
    /// `S`/`s`.
    SmoothCubic {
        /// Whether the coordinates are relative to the current pen.
        is_relative: bool,
        /// Second control point x.
        x2: f64,
        /// Second control point y.
        y2: f64,
        /// Target x coordinate.
        x: f64,
        /// Target y coordinate.
        y: f64,
    },
    /// `Q`/`q`.
    Quadratic {
        /// Whether the coordinates are relative to the current pen.
        is_relative: bool,
        /// Control point x.
        x1: f64,
        /// Control point y.
        y1: f64,
        /// Target x coordinate.
        x: f64,
        /// Target y coordinate.
        y: f64,
    },
    /// `T`/`t`.
    SmoothQuad {
        /// Whether the coordinates are relative to the current pen.
        is_relative: bool,
        /// Target x coordinate.
        x: f64,
        /// Target y coordinate.
        y: f64,
    },
    /// `A`/`a`.
    Arc {
        /// Whether the coordinates are relative to the current pen.
        is_relative: bool,
        /// x radius.
        rx: f64,
        /// y radius.
        ry: f64,
        /// Rotation of the ellipse's x axis, in degrees.
        x_axis_rotation_deg: f64,
        /// Whether to take the longer of the two possible arcs.
        large_arc: bool,
        /// Whether to sweep in the positive-angle direction.
        sweep: bool,
        /// Target x coordinate.
        end_x: f64,
        /// Target y coordinate.
        end_y: f64,
    },
    /// `Z`/`z`.
    ClosePath {
        /// Whether the command letter was lowercase. SVG treats `Z`/`z`
        /// identically; this is kept only so diagnostics can echo the
        /// original letter.
        is_relative: bool,
    },
}

impl Command {
    /// The original SVG command letter, reconstructed from the variant and
    /// its relativity flag.
    #[must_use]
    pub fn letter(&self) -> char {
        let (upper, lower) = match self {
            Self::MoveTo { .. } => ('M', 'm'),
            Self::LineTo { .. } => ('L', 'l'),
            Self::Horizontal { .. } => ('H', 'h'),
            Self::Vertical { .. } => ('V', 'v'),
            Self::CubicCurve { .. } => ('C', 'c'),
            Self::SmoothCubic { .. } => ('S', 's'),
            Self::Quadratic { .. } => ('Q', 'q'),
            Self::SmoothQuad { .. } => ('T', 't'),
            Self::Arc { .. } => ('A', 'a'),
            Self::ClosePath { .. } => ('Z', 'z'),
        };
        if self.is_relative() {
            lower
        } else {
            upper
        }
    }

    /// Whether this command's coordinates are relative to the pen.
    #[must_use]
    pub fn is_relative(&self) -> bool {
        match *self {
            Self::MoveTo { is_relative, .. }
            | Self::LineTo { is_relative, .. }
            | Self::Horizontal { is_relative, .. }
            | Self::Vertical { is_relative, .. }
            | Self::CubicCurve { is_relative, .. }
            | Self::SmoothCubic { is_relative, .. }
            | Self::Quadratic { is_relative, .. }
            | Self::SmoothQuad { is_relative, .. }
            | Self::Arc { is_relative, .. }
            | Self::ClosePath { is_relative } => is_relative,
        }
    }
}

/// Parses a `d` attribute into a command sequence.
///
/// Empty or whitespace-only input is not an error: it produces an empty
/// vector. Any other input must begin with `M`/`m`.
pub fn parse(d: &str) -> Result<Vec<Command>, ParseError> {
    let mut cursor = Cursor::new(d);
    cursor.skip_separators();
    if cursor.at_end() {
        return Ok(Vec::new());
    }

    match cursor.peek_byte() {
        Some(b'M' | b'm') => {}
        _ => {
            return Err(ParseError::must_start_with_move_to(
                cursor.pos,
                cursor.describe_here(),
            ))
        }
    }

    let mut commands = Vec::new();
    let mut active: Option<u8> = None;

    loop {
        cursor.skip_separators();
        if cursor.at_end() {
            break;
        }

        if let Some(letter) = cursor.peek_command_letter() {
            cursor.advance();
            active = Some(letter);
        } else if active.is_none() {
            return Err(ParseError::new(
                cursor.pos,
                "a command letter",
                cursor.describe_here(),
            ));
        }

        let letter = active.expect("checked above");
        let is_relative = letter.is_ascii_lowercase();

        match letter.to_ascii_uppercase() {
            b'M' => {
                let (x, y) = cursor.parse_pair(letter)?;
                commands.push(Command::MoveTo { is_relative, x, y });
                // Subsequent pairs in the same run are implicit LineTo.
                active = Some(if is_relative { b'l' } else { b'L' });
            }
            b'L' => {
                let (x, y) = cursor.parse_pair(letter)?;
                commands.push(Command::LineTo { is_relative, x, y });
            }
            b'H' => {
                let x = cursor.parse_number(letter)?;
                commands.push(Command::Horizontal { is_relative, x });
            }
            b'V' => {
                let y = cursor.parse_number(letter)?;
                commands.push(Command::Vertical { is_relative, y });
            }
            b'C' => {
                let (x1, y1) = cursor.parse_pair(letter)?;
                let (x2, y2) = cursor.parse_pair(letter)?;
                let (x, y) = cursor.parse_pair(letter)?;
                commands.push(Command::CubicCurve {
                    is_relative,
                    x1,
                    y1,
                    x2,
                    y2,
                    x,
                    y,
                });
            }
            b'S' => {
                let (x2, y2) = cursor.parse_pair(letter)?;
                let (x, y) = cursor.parse_pair(letter)?;
                commands.push(Command::SmoothCubic {
                    is_relative,
                    x2,
                    y2,
                    x,
                    y,
                });
            }
            b'Q' => {
                let (x1, y1) = cursor.parse_pair(letter)?;
                let (x, y) = cursor.parse_pair(letter)?;
                commands.push(Command::Quadratic {
                    is_relative,
                    x1,
                    y1,
                    x,
                    y,
                });
            }
            b'T' => {
                let (x, y) = cursor.parse_pair(letter)?;
                commands.push(Command::SmoothQuad { is_relative, x, y });
            }
            b'A' => {
                let rx = cursor.parse_number(letter)?;
                let ry = cursor.parse_number(letter)?;
                let x_axis_rotation_deg = cursor.parse_number(letter)?;
                let large_arc = cursor.parse_flag(letter)?;
                let sweep = cursor.parse_flag(letter)?;
                let end_x = cursor.parse_number(letter)?;
                let end_y = cursor.parse_number(letter)?;
                commands.push(Command::Arc {
                    is_relative,
                    rx,
                    ry,
                    x_axis_rotation_deg,
                    large_arc,
                    sweep,
                    end_x,
                    end_y,
                });
            }
            b'Z' => {
                commands.push(Command::ClosePath { is_relative });
                // Z never implicitly repeats: it takes no parameters, so
                // there is nothing in the input to signal a "run".
                active = None;
            }
            _ => unreachable!("peek_command_letter only accepts known letters"),
        }
    }

    Ok(commands)
}

/// `parse` succeeded, without keeping the parsed commands.
#[must_use]
pub fn validate(d: &str) -> bool {
    parse(d).is_ok()
}

/// A byte cursor over the `d` attribute text.
struct Cursor<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn skip_separators(&mut self) {
        while matches!(self.peek_byte(), Some(b' ' | b'\t' | b'\n' | b'\r' | 0x0c | b',')) {
            self.advance();
        }
    }

    fn peek_command_letter(&self) -> Option<u8> {
        match self.peek_byte() {
            Some(b @ (b'M' | b'm' | b'L' | b'l' | b'H' | b'h' | b'V' | b'v' | b'C' | b'c'
            | b'S' | b's' | b'Q' | b'q' | b'T' | b't' | b'A' | b'a' | b'Z' | b'z')) => Some(b),
            _ => None,
        }
    }

    fn describe_here(&self) -> String {
        if self.at_end() {
            "end of input".to_owned()
        } else {
            let rest = &self.input[self.pos..];
            let snippet: String = rest.chars().take(8).collect();
            format!("'{snippet}'")
        }
    }

    /// Parses one whitespace/comma-separated numeric token per SVG's number
    /// grammar: optional sign, digits, optional fraction, optional exponent.
    fn parse_number(&mut self, command: u8) -> Result<f64, ParseError> {
        self.skip_separators();
        let start = self.pos;

        if matches!(self.peek_byte(), Some(b'+' | b'-')) {
            self.advance();
        }

        let mut saw_digit = false;
        while matches!(self.peek_byte(), Some(b'0'..=b'9')) {
            self.advance();
            saw_digit = true;
        }

        if self.peek_byte() == Some(b'.') {
            self.advance();
            while matches!(self.peek_byte(), Some(b'0'..=b'9')) {
                self.advance();
                saw_digit = true;
            }
        }

        if !saw_digit {
            return Err(ParseError::insufficient_parameters(start, command as char));
        }

        if matches!(self.peek_byte(), Some(b'e' | b'E')) {
            let exp_start = self.pos;
            self.advance();
            if matches!(self.peek_byte(), Some(b'+' | b'-')) {
                self.advance();
            }
            let mut saw_exp_digit = false;
            while matches!(self.peek_byte(), Some(b'0'..=b'9')) {
                self.advance();
                saw_exp_digit = true;
            }
            if !saw_exp_digit {
                // Not a valid exponent after all; back out so the 'e' can be
                // re-examined by whatever comes next (defensive; valid SVG
                // never hits this).
                self.pos = exp_start;
            }
        }

        self.input[start..self.pos]
            .parse::<f64>()
            .map_err(|_| ParseError::new(start, "a number", self.describe_here()))
    }

    fn parse_pair(&mut self, command: u8) -> Result<(f64, f64), ParseError> {
        let x = self.parse_number(command)?;
        let y = self.parse_number(command)?;
        Ok((x, y))
    }

    /// Parses a single `0`/`1` arc flag: exactly one digit, never a float,
    /// so `"11"` in an arc's flag position reads as two separate flags
    /// rather than the number 11.
    fn parse_flag(&mut self, command: u8) -> Result<bool, ParseError> {
        self.skip_separators();
        match self.peek_byte() {
            Some(b'0') => {
                self.advance();
                Ok(false)
            }
            Some(b'1') => {
                self.advance();
                Ok(true)
            }
            _ => Err(ParseError::new(
                self.pos,
                format!("a '0' or '1' flag for '{}'", command as char),
                self.describe_here(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_empty_command_vec() {
        assert_eq!(parse("").unwrap(), Vec::new());
        assert_eq!(parse("   \t\n").unwrap(), Vec::new());
    }

    #[test]
    fn must_start_with_move_to() {
        let err = parse("L 1 2").unwrap_err();
        assert_eq!(err.offset, 0);
    }

    #[test]
    fn abutting_commands_and_numbers() {
        let commands = parse("M10,20L30,40").unwrap();
        assert_eq!(
            commands,
            vec![
                Command::MoveTo {
                    is_relative: false,
                    x: 10.0,
                    y: 20.0
                },
                Command::LineTo {
                    is_relative: false,
                    x: 30.0,
                    y: 40.0
                },
            ]
        );
    }

    #[test]
    fn implicit_lineto_after_moveto() {
        let commands = parse("M 0 0 10 10 20 20").unwrap();
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[0], Command::MoveTo { .. }));
        assert!(matches!(commands[1], Command::LineTo { x: 10.0, y: 10.0, .. }));
        assert!(matches!(commands[2], Command::LineTo { x: 20.0, y: 20.0, .. }));
    }

    #[test]
    fn repeated_line_to_run() {
        let commands = parse("M 0 0 L 1 2 3 4").unwrap();
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[1], Command::LineTo { x: 1.0, y: 2.0, .. }));
        assert!(matches!(commands[2], Command::LineTo { x: 3.0, y: 4.0, .. }));
    }

    #[test]
    fn ambiguous_decimal_run_splits_into_two_numbers() {
        let commands = parse("M 0 0 L .5.5").unwrap();
        assert!(matches!(
            commands[1],
            Command::LineTo { x, y, .. } if (x - 0.5).abs() < 1e-9 && (y - 0.5).abs() < 1e-9
        ));
    }

    #[test]
    fn arc_flags_parsed_as_single_digits() {
        let commands = parse("M 0 0 A 5 5 0 1 1 10 0").unwrap();
        assert!(matches!(
            commands[1],
            Command::Arc {
                large_arc: true,
                sweep: true,
                ..
            }
        ));
    }

    #[test]
    fn compact_arc_flags_without_separators() {
        // The two flags written back-to-back as "11" with no separator: a
        // naive number scanner would misread this as the single value 11.
        let commands = parse("M 0 0 A 5 5 0 11 5 5").unwrap();
        assert!(matches!(
            commands[1],
            Command::Arc {
                large_arc: true,
                sweep: true,
                end_x: 5.0,
                end_y: 5.0,
                ..
            }
        ));
    }

    #[test]
    fn insufficient_parameters_is_an_error() {
        assert!(parse("M 0 0 L 1").is_err());
    }

    #[test]
    fn close_path_does_not_implicitly_repeat() {
        let commands = parse("M 0 0 L 1 1 Z").unwrap();
        assert_eq!(commands.len(), 3);
        assert!(matches!(commands[2], Command::ClosePath { .. }));
    }

    #[test]
    fn validate_matches_parse_result() {
        assert!(validate("M 0 0 L 1 1"));
        assert!(!validate("L 1 1"));
    }

    #[test]
    fn letter_reconstruction() {
        let commands = parse("m 0 0 l 1 1").unwrap();
        assert_eq!(commands[0].letter(), 'm');
        assert_eq!(commands[1].letter(), 'l');
    }
}
