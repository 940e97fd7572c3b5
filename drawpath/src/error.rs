//! The error taxonomy shared by every stage of the pipeline.

use std::fmt;

/// A syntactic error in a `d` attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// Byte offset into the input at which the error was detected.
    pub offset: usize,
    /// What the parser expected to find at `offset`.
    pub expected: String,
    /// A short description of what was actually found.
    pub found: String,
}

impl ParseError {
    pub(crate) fn new(offset: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self {
            offset,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub(crate) fn must_start_with_move_to(offset: usize, found: impl Into<String>) -> Self {
        Self::new(offset, "a path beginning with 'M' or 'm'", found)
    }

    pub(crate) fn insufficient_parameters(offset: usize, command: char) -> Self {
        Self::new(
            offset,
            format!("another numeric parameter for '{command}'"),
            "end of input",
        )
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "at byte {}: expected {}, found {}",
            self.offset, self.expected, self.found
        )
    }
}

impl std::error::Error for ParseError {}

/// A failure resolving viewport, unit, or bounds-derived coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateTransformError {
    /// What went wrong.
    pub reason: String,
}

impl CoordinateTransformError {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CoordinateTransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "coordinate transform failed: {}", self.reason)
    }
}

impl std::error::Error for CoordinateTransformError {}

/// A total failure of the arc converter (it recovers from most degenerate
/// input on its own; this surfaces only when recovery is impossible).
#[derive(Debug, Clone, PartialEq)]
pub struct ArcConversionError {
    /// What went wrong.
    pub reason: String,
}

impl ArcConversionError {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ArcConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "arc conversion failed: {}", self.reason)
    }
}

impl std::error::Error for ArcConversionError {}

impl From<geom::ArcError> for ArcConversionError {
    fn from(error: geom::ArcError) -> Self {
        Self::new(error.to_string())
    }
}

/// Reserved for resource exhaustion; should be unreachable with a DOM
/// builder, since attribute escaping makes malformed XML impossible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlGenerationError {
    /// What went wrong.
    pub reason: String,
}

impl fmt::Display for XmlGenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "XML generation failed: {}", self.reason)
    }
}

impl std::error::Error for XmlGenerationError {}

/// Configuration preconditions were not met before calling a facade method
/// that requires them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotConfigured;

impl fmt::Display for NotConfigured {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "the path system has not been configured with a viewport")
    }
}

impl std::error::Error for NotConfigured {}

/// Which pipeline stage a [`PathProcessingError`] originated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Stage {
    /// The path-data parser (C2).
    Parse,
    /// The coordinate system (C3).
    CoordinateTransform,
    /// The arc converter (C1).
    ArcConversion,
    /// The DrawingML emitter (C4).
    XmlGeneration,
    /// The facade itself, before any stage ran.
    Configuration,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Parse => "parse",
            Self::CoordinateTransform => "coordinate transform",
            Self::ArcConversion => "arc conversion",
            Self::XmlGeneration => "XML generation",
            Self::Configuration => "configuration",
        };
        write!(f, "{name}")
    }
}

/// The cause wrapped by a [`PathProcessingError`].
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Cause {
    /// See [`ParseError`].
    Parse(ParseError),
    /// See [`CoordinateTransformError`].
    CoordinateTransform(CoordinateTransformError),
    /// See [`ArcConversionError`].
    ArcConversion(ArcConversionError),
    /// See [`XmlGenerationError`].
    XmlGeneration(XmlGenerationError),
    /// See [`NotConfigured`].
    NotConfigured(NotConfigured),
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "{e}"),
            Self::CoordinateTransform(e) => write!(f, "{e}"),
            Self::ArcConversion(e) => write!(f, "{e}"),
            Self::XmlGeneration(e) => write!(f, "{e}"),
            Self::NotConfigured(e) => write!(f, "{e}"),
        }
    }
}

/// The umbrella error returned by the facade: the stage that failed plus the
/// underlying cause.
#[derive(Debug, Clone, PartialEq)]
pub struct PathProcessingError {
    /// The stage that failed.
    pub stage: Stage,
    /// The underlying cause.
    pub cause: Cause,
}

impl PathProcessingError {
    pub(crate) fn parse(error: ParseError) -> Self {
        Self {
            stage: Stage::Parse,
            cause: Cause::Parse(error),
        }
    }

    pub(crate) fn coordinate_transform(error: CoordinateTransformError) -> Self {
        Self {
            stage: Stage::CoordinateTransform,
            cause: Cause::CoordinateTransform(error),
        }
    }

    pub(crate) fn arc_conversion(error: ArcConversionError) -> Self {
        Self {
            stage: Stage::ArcConversion,
            cause: Cause::ArcConversion(error),
        }
    }

    pub(crate) fn not_configured() -> Self {
        Self {
            stage: Stage::Configuration,
            cause: Cause::NotConfigured(NotConfigured),
        }
    }

    pub(crate) fn xml_generation(error: XmlGenerationError) -> Self {
        Self {
            stage: Stage::XmlGeneration,
            cause: Cause::XmlGeneration(error),
        }
    }
}

impl fmt::Display for PathProcessingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} stage failed: {}", self.stage, self.cause)
    }
}

impl std::error::Error for PathProcessingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.cause {
            Cause::Parse(e) => Some(e),
            Cause::CoordinateTransform(e) => Some(e),
            Cause::ArcConversion(e) => Some(e),
            Cause::XmlGeneration(e) => Some(e),
            Cause::NotConfigured(e) => Some(e),
        }
    }
}

impl From<ParseError> for PathProcessingError {
    fn from(error: ParseError) -> Self {
        Self::parse(error)
    }
}

impl From<CoordinateTransformError> for PathProcessingError {
    fn from(error: CoordinateTransformError) -> Self {
        Self::coordinate_transform(error)
    }
}

impl From<ArcConversionError> for PathProcessingError {
    fn from(error: ArcConversionError) -> Self {
        Self::arc_conversion(error)
    }
}

impl From<XmlGenerationError> for PathProcessingError {
    fn from(error: XmlGenerationError) -> Self {
        Self::xml_generation(error)
    }
}
