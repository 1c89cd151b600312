#![warn(clippy::pedantic)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::branches_sharing_code,
    clippy::collection_is_never_read,
    clippy::equatable_if_let,
    clippy::needless_collect,
    clippy::needless_pass_by_ref_mut,
    clippy::option_if_let_else,
    clippy::set_contains_or_insert,
    clippy::suboptimal_flops,
    clippy::suspicious_operation_groupings,
    clippy::trait_duplication_in_bounds,
    clippy::type_repetition_in_bounds,
    clippy::use_self,
    clippy::useless_let_if_seq
)]
#![deny(clippy::unwrap_used)]

use std::fmt::Display;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Error, Result};
use clap::{ArgAction, Parser};
use remap_engine::runner::{OutputHandler, SeedMode, StageKind, run_pipeline};

/// Piecewise range remapping pipeline solver.
///
/// Reads a pipeline description (a seeds line followed by `A-to-B map:`
/// blocks), composes the category maps connecting the two queried
/// categories, and prints the minimal mapped value.
#[derive(Parser, Debug)]
struct Cli {
    /// Input file with the pipeline description; reads standard input when
    /// omitted.
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// The category to map from.
    #[arg(long, value_name = "CATEGORY", default_value = "seed")]
    from: String,

    /// The category to map to.
    #[arg(long, value_name = "CATEGORY", default_value = "location")]
    to: String,

    /// Treat each seed number as an individual value instead of pairing
    /// them up as (start, length) ranges.
    #[arg(short, long, action = ArgAction::SetTrue)]
    points: bool,

    /// Measure and print the durations of the pipeline stages.
    #[arg(short, long, action = ArgAction::SetTrue)]
    timed: bool,

    /// Minimum duration (in milliseconds) required to print timing.
    /// 0 = always print.
    #[arg(long, value_name = "NUMBER", default_value_t)]
    min_timing_ms: u64,
}

/// Read the given input file to a string.
fn get_file_input(input_file: &PathBuf) -> Result<String> {
    fs::read_to_string(input_file)
        .with_context(|| format!("could not read input file at: {}", input_file.display()))
}

/// Read standard input to a string.
fn get_stdin_input() -> Result<String> {
    io::read_to_string(io::stdin()).context("could not read input from standard input")
}

struct CliOutputHandler {
    /// A minimum duration to filter any outputs of duration by.
    min_duration: Duration,
}

impl CliOutputHandler {
    fn new(min_duration: Duration) -> Self {
        Self { min_duration }
    }

    fn format_duration(duration: Duration) -> String {
        const ONE_SECOND: Duration = Duration::from_secs(1);
        const ONE_MILLISECOND: Duration = Duration::from_millis(1);
        const ONE_MICROSECOND: Duration = Duration::from_micros(1);
        const DECIMAL_PLACES: usize = 3;

        if duration >= ONE_SECOND {
            format!("{:.*} seconds", DECIMAL_PLACES, duration.as_secs_f32())
        } else {
            let nanos = duration.subsec_nanos();
            if duration >= ONE_MILLISECOND {
                format!("{:.*} milliseconds", DECIMAL_PLACES, f64::from(nanos) / 1e6)
            } else if duration >= ONE_MICROSECOND {
                format!("{:.*} microseconds", DECIMAL_PLACES, f64::from(nanos) / 1e3)
            } else {
                format!("{nanos} nanoseconds")
            }
        }
    }

    /// Convert an optional duration into a formatted duration, filtering out
    /// if the duration is shorter than the minimum duration.
    fn format_optional_duration_above_min(&self, duration: Option<Duration>) -> Option<String> {
        duration
            .filter(|d| *d >= self.min_duration)
            .map(Self::format_duration)
    }
}

impl OutputHandler for CliOutputHandler {
    fn stage_start(&mut self, _stage: StageKind) {
        // do nothing
    }

    fn stage_end(&mut self, stage: StageKind, duration_opt: Option<Duration>) {
        if let Some(formatted_duration) = self.format_optional_duration_above_min(duration_opt) {
            println!("{stage} finished in {formatted_duration}");
        }
    }

    fn minimum_value(&mut self, value: &dyn Display) {
        println!("{value}");
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();
    let input_str = args
        .input
        .map_or_else(get_stdin_input, |input_file| get_file_input(&input_file))?;
    let seed_mode = if args.points {
        SeedMode::Points
    } else {
        SeedMode::Ranges
    };
    let mut handler = CliOutputHandler::new(Duration::from_millis(args.min_timing_ms));
    run_pipeline(
        &input_str,
        &args.from,
        &args.to,
        seed_mode,
        &mut handler,
        args.timed,
    )
    .map_err(|dyn_error| {
        let anyhow_error = Error::from_boxed(dyn_error);
        anyhow_error.context("failed to run remapping pipeline")
    })
}
