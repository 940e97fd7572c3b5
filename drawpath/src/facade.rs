//! The Path System facade (C5): orchestrates C2 (parse) → C3 (bounds) → C4
//! (emit), holds configuration, and aggregates stats across calls. Grounded
//! on `keyset-drawing`'s `Drawing::new`, which folds a per-key drawing step
//! over a collection while keeping a side channel for per-item failures
//! rather than aborting the whole batch.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use geom::{Emu, Rect};

use crate::arc::ArcQuality;
use crate::coord::{ConversionContext, DefaultUnitConverter, UnitConverter, ViewBox};
use crate::emit;
use crate::error::PathProcessingError;
use crate::parser::{self, Command};
use crate::style::{AtomicIdSource, ColorParser, HexColorParser, ShapeIdSource, Style};

/// One input to [`PathSystem::process_multiple_paths`]: a `d` string paired
/// with its optional style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
    /// The `d` attribute value.
    pub d: String,
    /// Style attributes for a shape-wrapped result; `None` emits a bare
    /// `<a:pathLst>` fragment instead of a `<p:sp>`.
    pub style: Option<Style>,
}

impl PathSpec {
    /// A path with no style: [`PathSystem::process_path`] will emit only
    /// `path_xml`, leaving `shape_xml` as `None`.
    #[must_use]
    pub fn bare(d: impl Into<String>) -> Self {
        Self {
            d: d.into(),
            style: None,
        }
    }

    /// A path wrapped in a `<p:sp>` shape envelope built from `style`.
    #[must_use]
    pub fn styled(d: impl Into<String>, style: Style) -> Self {
        Self {
            d: d.into(),
            style: Some(style),
        }
    }
}

/// Per-call and aggregate statistics, per spec §3's `PathProcessingResult`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandStats {
    /// Number of commands in the path.
    pub command_count: usize,
    /// Number of `A`/`a` commands.
    pub arc_count: usize,
    /// Wall-clock time spent in this `process_path` call.
    pub processing_time: Duration,
    /// Largest arc approximation error (§8 invariant 4) seen while
    /// converting this path's arcs; `0.0` if the path had none.
    pub max_arc_error: f64,
}

/// The result of one [`PathSystem::process_path`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct PathProcessingResult {
    /// The bare `<a:pathLst>` DrawingML fragment.
    pub path_xml: String,
    /// A `<p:sp>` shape envelope, present only when the input carried a
    /// [`Style`].
    pub shape_xml: Option<String>,
    /// The path's bounds, in EMU.
    pub bounds: Rect<Emu>,
    /// The parsed command sequence.
    pub commands: Vec<Command>,
    /// Stats for this call.
    pub stats: CommandStats,
}

/// Running totals the facade keeps across every `process_path` call, updated
/// with atomic increments (spec §5: "a configured Path System is... shared
/// by reference and may call `process_path` concurrently").
#[derive(Debug, Default)]
pub struct AggregateStats {
    paths_processed: AtomicU64,
    paths_failed: AtomicU64,
    total_arcs: AtomicUsize,
    max_arc_error_bits: AtomicU64,
}

impl AggregateStats {
    /// Total paths successfully processed so far.
    #[must_use]
    pub fn paths_processed(&self) -> u64 {
        self.paths_processed.load(Ordering::Relaxed)
    }

    /// Total paths that failed to process.
    #[must_use]
    pub fn paths_failed(&self) -> u64 {
        self.paths_failed.load(Ordering::Relaxed)
    }

    /// Total arcs converted across every successfully processed path.
    #[must_use]
    pub fn total_arcs(&self) -> usize {
        self.total_arcs.load(Ordering::Relaxed)
    }

    /// Largest arc approximation error (§8 invariant 4) seen across every
    /// successfully processed path so far; `0.0` if none had arcs.
    #[must_use]
    pub fn max_arc_error(&self) -> f64 {
        f64::from_bits(self.max_arc_error_bits.load(Ordering::Relaxed))
    }

    /// Folds `error` into the running maximum, via a compare-and-swap loop
    /// since `f64` has no native atomic max.
    fn record_max_arc_error(&self, error: f64) {
        let mut current = self.max_arc_error_bits.load(Ordering::Relaxed);
        loop {
            if error <= f64::from_bits(current) {
                return;
            }
            match self.max_arc_error_bits.compare_exchange_weak(
                current,
                error.to_bits(),
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }
}

/// Orchestrates the pipeline end to end. `configure_viewport` must be called
/// before [`PathSystem::process_path`]/[`PathSystem::process_multiple_paths`];
/// [`PathSystem::validate_path_data`] needs no configuration at all, since it
/// only exercises the parser.
#[derive(Debug)]
pub struct PathSystem<U = DefaultUnitConverter, C = HexColorParser, I = AtomicIdSource>
where
    U: UnitConverter,
    C: ColorParser,
    I: ShapeIdSource,
{
    ctx: Option<ConversionContext>,
    arc_quality: ArcQuality,
    converter: U,
    color_parser: C,
    shape_ids: I,
    stats: AggregateStats,
}

impl PathSystem {
    /// A facade using the built-in [`DefaultUnitConverter`],
    /// [`HexColorParser`], and [`AtomicIdSource`]. Not yet configured: call
    /// [`Self::configure_viewport`] before processing.
    #[must_use]
    pub fn new() -> Self {
        Self {
            ctx: None,
            arc_quality: ArcQuality::default(),
            converter: DefaultUnitConverter,
            color_parser: HexColorParser,
            shape_ids: AtomicIdSource::default(),
            stats: AggregateStats::default(),
        }
    }
}

impl Default for PathSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl<U, C, I> PathSystem<U, C, I>
where
    U: UnitConverter,
    C: ColorParser,
    I: ShapeIdSource,
{
    /// Builds a facade from caller-supplied collaborators, per spec §6's
    /// external-interface traits.
    #[must_use]
    pub fn with_collaborators(converter: U, color_parser: C, shape_ids: I) -> Self {
        Self {
            ctx: None,
            arc_quality: ArcQuality::default(),
            converter,
            color_parser,
            shape_ids,
            stats: AggregateStats::default(),
        }
    }

    /// Configures the viewport; required before [`Self::process_path`] or
    /// [`Self::process_multiple_paths`].
    #[must_use]
    pub fn configure_viewport(mut self, w: f64, h: f64, viewbox: Option<ViewBox>, dpi: f64) -> Self {
        let mut ctx = ConversionContext::new(w, h).with_dpi(dpi);
        if let Some(viewbox) = viewbox {
            ctx = ctx.with_viewbox(viewbox);
        }
        self.ctx = Some(ctx);
        self
    }

    /// Configures arc segmentation quality; optional, defaults to
    /// [`ArcQuality::default`].
    #[must_use]
    pub fn configure_arc_quality(mut self, max_segment_deg: f64, max_total_sweep_deg: f64) -> Self {
        self.arc_quality = ArcQuality {
            max_segment_deg: max_segment_deg.clamp(10.0, 180.0),
            max_total_sweep_deg,
        };
        self
    }

    /// The running [`AggregateStats`] for this facade.
    #[must_use]
    pub fn stats(&self) -> &AggregateStats {
        &self.stats
    }

    /// Parses, computes bounds, and emits DrawingML for one `d` string,
    /// optionally wrapped in a shape envelope if `style` is given. Updates
    /// [`Self::stats`] regardless of outcome.
    pub fn process_path(
        &self,
        d: &str,
        style: Option<&Style>,
    ) -> Result<PathProcessingResult, PathProcessingError> {
        let started = Instant::now();
        let result = self.process_path_inner(d, style, started);
        match &result {
            Ok(processed) => {
                self.stats.paths_processed.fetch_add(1, Ordering::Relaxed);
                self.stats
                    .total_arcs
                    .fetch_add(processed.stats.arc_count, Ordering::Relaxed);
                self.stats.record_max_arc_error(processed.stats.max_arc_error);
            }
            Err(error) => {
                self.stats.paths_failed.fetch_add(1, Ordering::Relaxed);
                log::warn!("path processing failed: {error}");
            }
        }
        result
    }

    fn process_path_inner(
        &self,
        d: &str,
        style: Option<&Style>,
        started: Instant,
    ) -> Result<PathProcessingResult, PathProcessingError> {
        let ctx = self.ctx.as_ref().ok_or(PathProcessingError::not_configured())?;

        let commands = parser::parse(d)?;
        let bounds = crate::coord::calculate_path_bounds(&commands, ctx, &self.converter);

        let (path_xml, emit_stats) =
            emit::generate_path_xml(&commands, &bounds, ctx, &self.converter, self.arc_quality)?;

        let shape_xml = match style {
            Some(style) => {
                let shape_id = self.shape_ids.next_id();
                let (xml, _) = emit::generate_shape_xml(
                    &commands,
                    &bounds,
                    ctx,
                    &self.converter,
                    self.arc_quality,
                    style,
                    &self.color_parser,
                    shape_id,
                )?;
                Some(xml)
            }
            None => None,
        };

        Ok(PathProcessingResult {
            path_xml,
            shape_xml,
            bounds,
            stats: CommandStats {
                command_count: commands.len(),
                arc_count: emit_stats.arc_count,
                processing_time: started.elapsed(),
                max_arc_error: emit_stats.max_arc_error,
            },
            commands,
        })
    }

    /// Processes every spec in `specs`; a failure on one path is logged and
    /// recorded in [`Self::stats`] but does not abort the batch (spec §4.5).
    /// Result `i` corresponds to input `i`.
    #[must_use]
    pub fn process_multiple_paths(
        &self,
        specs: &[PathSpec],
    ) -> Vec<Result<PathProcessingResult, PathProcessingError>> {
        specs
            .iter()
            .map(|spec| self.process_path(&spec.d, spec.style.as_ref()))
            .collect()
    }

    /// Parser-only validity check: `validate_path_data(d) == parse(d).is_ok()`
    /// (spec §8). Needs no viewport configuration.
    #[must_use]
    pub fn validate_path_data(&self, d: &str) -> bool {
        parser::validate(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::ViewBox;

    #[test]
    fn process_path_requires_configuration() {
        let system = PathSystem::new();
        let err = system.process_path("M 0 0 L 10 10", None).unwrap_err();
        assert_eq!(err.stage, crate::error::Stage::Configuration);
    }

    #[test]
    fn process_path_returns_bare_xml_without_style() {
        let system = PathSystem::new().configure_viewport(800.0, 600.0, None, 96.0);
        let result = system.process_path("M 0 0 L 10 0 L 10 10 Z", None).unwrap();
        assert!(result.shape_xml.is_none());
        assert!(result.path_xml.contains("a:pathLst"));
        assert_eq!(result.stats.command_count, 4);
    }

    #[test]
    fn process_path_returns_shape_xml_with_style() {
        let system = PathSystem::new().configure_viewport(800.0, 600.0, None, 96.0);
        let style = Style::new().with_fill("#112233");
        let result = system
            .process_path("M 0 0 L 10 0 L 10 10 Z", Some(&style))
            .unwrap();
        assert!(result.shape_xml.unwrap().contains("112233"));
    }

    #[test]
    fn process_multiple_paths_keeps_index_correspondence_on_partial_failure() {
        let system = PathSystem::new().configure_viewport(800.0, 600.0, None, 96.0);
        let specs = vec![
            PathSpec::bare("M 0 0 L 10 0"),
            PathSpec::bare("L 10 0"), // invalid: must start with M
            PathSpec::bare("M 0 0 L 20 20"),
        ];
        let results = system.process_multiple_paths(&specs);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
        assert!(results[2].is_ok());
        assert_eq!(system.stats().paths_processed(), 2);
        assert_eq!(system.stats().paths_failed(), 1);
    }

    #[test]
    fn arc_error_estimate_is_recorded_per_call_and_aggregate() {
        let system = PathSystem::new().configure_viewport(800.0, 600.0, None, 96.0);
        let result = system
            .process_path("M 50 100 A 50 50 0 0 1 150 100", None)
            .unwrap();
        assert!(result.stats.max_arc_error > 0.0);
        assert!(system.stats().max_arc_error() >= result.stats.max_arc_error);
    }

    #[test]
    fn arc_error_estimate_is_zero_without_arcs() {
        let system = PathSystem::new().configure_viewport(800.0, 600.0, None, 96.0);
        let result = system.process_path("M 0 0 L 10 10", None).unwrap();
        assert_eq!(result.stats.max_arc_error, 0.0);
    }

    #[test]
    fn validate_path_data_matches_parse_is_ok() {
        let system = PathSystem::new();
        assert!(system.validate_path_data("M 0 0 L 10 10"));
        assert!(!system.validate_path_data("L 10 10"));
    }

    #[test]
    fn configure_viewport_accepts_a_viewbox() {
        let system = PathSystem::new().configure_viewport(
            800.0,
            600.0,
            Some(ViewBox {
                min_x: 0.0,
                min_y: 0.0,
                width: 400.0,
                height: 300.0,
            }),
            96.0,
        );
        let result = system.process_path("M 0 0 L 400 300", None).unwrap();
        assert!(result.path_xml.contains("a:pathLst"));
    }
}
