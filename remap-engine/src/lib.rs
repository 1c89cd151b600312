//! Engine for composing chains of piecewise integer remapping maps.
//!
//! A pipeline is described by a list of seed numbers and a set of category
//! maps (`seed-to-soil map:` style blocks). Each category map is a partial
//! function given by disjoint source intervals with constant per-interval
//! offsets; values outside every interval pass through unchanged. The engine
//! builds a routing graph of the maps, discovers a route between two named
//! categories, composes the maps along that route into one equivalent
//! piecewise map, and evaluates that map over the seeds to find the minimal
//! reachable value.
//!
//! # Quick Start
//!
//! ```
//! use remap_engine::ParseData;
//! use remap_engine::compose::combine_route_mappings;
//! use remap_engine::document::RemapDocument;
//! use remap_engine::evaluate::minimum_over_ranges;
//!
//! # fn main() -> remap_engine::DynamicResult<()> {
//! let text = "seeds: 5 3\n\nseed-to-soil map:\n20 4 6\n";
//!
//! let document = RemapDocument::parse(text)?;
//! let route = document
//!     .graph()
//!     .find_route("seed", "soil")
//!     .ok_or("no route between categories")?;
//! let combined = combine_route_mappings(&route)?;
//!
//! let seed_ranges = document.seed_ranges()?;
//! assert_eq!(minimum_over_ranges(&seed_ranges, &combined)?, 21);
//! # Ok(())
//! # }
//! ```
//!
//! The [`runner`] module wires these steps together as one batch with
//! progress reporting; the [`category`], [`graph`], [`compose`] and
//! [`evaluate`] modules are usable on their own for programmatic input.

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
#![deny(
    clippy::expect_used,
    clippy::print_stderr,
    clippy::print_stdout,
    clippy::unwrap_used
)]

use std::error::Error;

pub mod category;
pub mod compose;
pub mod document;
pub mod evaluate;
pub mod graph;
pub mod parsing;
pub mod range;
pub mod runner;

/// A dynamically dispatched error, wrapped in a [`Box`].
pub type DynamicError = Box<dyn Error + Send + Sync + 'static>;
/// A result that can return a [`DynamicError`] as an error.
pub type DynamicResult<T> = Result<T, DynamicError>;

/// A trait for data structures that are created by parsing string input.
///
/// The whole-input parser ([`document::RemapDocument`]) implements this; the
/// trait keeps the parse step swappable at the pipeline seam.
pub trait ParseData {
    /// Parse an input string into an instance of self.
    ///
    /// # Errors
    ///
    /// If parsing fails, the resulting error is returned as a dynamically
    /// dispatched error.
    fn parse(input: &str) -> DynamicResult<Self>
    where
        Self: Sized;
}
