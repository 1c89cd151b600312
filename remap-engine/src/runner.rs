//! Running the whole remapping pipeline as one batch.
//!
//! # Quick Start
//!
//! Implement [`OutputHandler`] for wherever progress and the final value
//! should go, then call [`run_pipeline`]:
//!
//! ```
//! use std::fmt::Display;
//! use std::time::Duration;
//!
//! use remap_engine::runner::{OutputHandler, SeedMode, StageKind, run_pipeline};
//!
//! struct Collect(Vec<String>);
//!
//! impl OutputHandler for Collect {
//!     fn stage_start(&mut self, _stage: StageKind) {}
//!     fn stage_end(&mut self, _stage: StageKind, _duration_opt: Option<Duration>) {}
//!     fn minimum_value(&mut self, value: &dyn Display) {
//!         self.0.push(value.to_string());
//!     }
//! }
//!
//! # fn main() -> remap_engine::DynamicResult<()> {
//! let text = "seeds: 5 3\n\nseed-to-soil map:\n20 4 6\n";
//! let mut handler = Collect(Vec::new());
//! run_pipeline(text, "seed", "soil", SeedMode::Ranges, &mut handler, false)?;
//! assert_eq!(handler.0, vec!["21".to_string()]);
//! # Ok(())
//! # }
//! ```

use std::fmt::Display;
use std::time::Duration;

use thiserror::Error;

use crate::compose::combine_route_mappings;
use crate::document::RemapDocument;
use crate::evaluate::{minimum_over_points, minimum_over_ranges};
use crate::{DynamicResult, ParseData};

/// How the seed numbers of a document are interpreted during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedMode {
    /// Seed numbers pair up as (start, length) ranges.
    Ranges,
    /// Every seed number stands for itself.
    Points,
}

/// An enum to identify a pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Parse,
    Route,
    Compose,
    Evaluate,
}

impl Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse => write!(f, "Parsing"),
            Self::Route => write!(f, "Route discovery"),
            Self::Compose => write!(f, "Map composition"),
            Self::Evaluate => write!(f, "Evaluation"),
        }
    }
}

/// A trait for an output events handler.
///
/// As the pipeline runs, each stage and the final value lead to events to
/// output through a handler as feedback and logging.
pub trait OutputHandler {
    /// Called when a pipeline stage starts, with a [`StageKind`] to identify
    /// the stage.
    fn stage_start(&mut self, stage: StageKind);

    /// Called when a pipeline stage finishes.
    ///
    /// The duration taken by the stage is optionally passed.
    fn stage_end(&mut self, stage: StageKind, duration_opt: Option<Duration>);

    /// Called once with the minimal mapped value the pipeline found.
    fn minimum_value(&mut self, value: &dyn Display);
}

/// No route of category maps connects the queried categories.
#[derive(Error, Debug)]
#[error("no route of category maps connects {source_category:?} to {destination:?}")]
pub struct RouteNotFound {
    source_category: String,
    destination: String,
}

/// Measure the duration of an expression.
///
/// Evaluates the expression once and returns a tuple of its result and the
/// elapsed [`Duration`].
macro_rules! measure_duration {
    ($expr:expr) => {{
        let start = ::std::time::Instant::now();
        let result = $expr;
        let elapsed = start.elapsed();
        (result, elapsed)
    }};
}

/// Measure the duration of an expression when the `$timed` flag is set.
///
/// Returns a tuple of the expression's result and an optional [`Duration`]:
/// the measured duration if `$timed` evaluates to `true`, `None` otherwise.
macro_rules! measure_with_optional_duration {
    ($expr:expr, $timed:expr) => {{
        if $timed {
            let (result, duration) = measure_duration!($expr);
            (result, Some(duration))
        } else {
            ($expr, None)
        }
    }};
}

/// Run the whole pipeline over an input string: parse the document, find a
/// route from `source_category` to `destination_category`, compose the route
/// into one map, and evaluate the seeds for the minimal mapped value.
///
/// Stage progress is reported through the handler; with `timed` set, each
/// stage's elapsed duration is measured and passed along.
///
/// # Errors
///
/// Any parsing, composition, or evaluation error is propagated as a
/// dynamically dispatched error; a missing route surfaces as
/// [`RouteNotFound`]. The run has no partial-success mode.
pub fn run_pipeline(
    input: &str,
    source_category: &str,
    destination_category: &str,
    seed_mode: SeedMode,
    handler: &mut dyn OutputHandler,
    timed: bool,
) -> DynamicResult<()> {
    handler.stage_start(StageKind::Parse);
    let (document_result, duration_opt) =
        measure_with_optional_duration!(RemapDocument::parse(input), timed);
    let document = document_result?;
    handler.stage_end(StageKind::Parse, duration_opt);

    handler.stage_start(StageKind::Route);
    let (route_opt, duration_opt) = measure_with_optional_duration!(
        document
            .graph()
            .find_route(source_category, destination_category),
        timed
    );
    let route = route_opt.ok_or_else(|| RouteNotFound {
        source_category: source_category.to_owned(),
        destination: destination_category.to_owned(),
    })?;
    handler.stage_end(StageKind::Route, duration_opt);

    handler.stage_start(StageKind::Compose);
    let (combined_result, duration_opt) =
        measure_with_optional_duration!(combine_route_mappings(&route), timed);
    let combined = combined_result?;
    handler.stage_end(StageKind::Compose, duration_opt);

    handler.stage_start(StageKind::Evaluate);
    let (minimum_result, duration_opt) = measure_with_optional_duration!(
        match seed_mode {
            SeedMode::Ranges => {
                let seed_ranges = document.seed_ranges()?;
                minimum_over_ranges(&seed_ranges, &combined)?
            }
            SeedMode::Points => minimum_over_points(document.seed_values(), &combined)?,
        },
        timed
    );
    handler.stage_end(StageKind::Evaluate, duration_opt);

    handler.minimum_value(&minimum_result);
    Ok(())
}
