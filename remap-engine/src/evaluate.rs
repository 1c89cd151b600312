//! Evaluating a composed map over the seeds to find the minimal value.

use thiserror::Error;

use crate::compose::{ComposeError, combine_mappings};
use crate::range::{MapNumber, MapRange, map_through_sorted};

/// An error evaluating seeds against a composed map.
#[derive(Error, Debug)]
pub enum EvaluateError {
    /// The minimum over zero seed ranges is undefined.
    #[error("cannot take a minimum over zero seed ranges")]
    EmptySeedRanges,

    /// The minimum over zero seed values is undefined.
    #[error("cannot take a minimum over zero seed values")]
    EmptySeedValues,

    #[error(transparent)]
    Compose(#[from] ComposeError),
}

/// Apply the composed map to the seed ranges and return the minimum
/// destination value any seed can reach.
///
/// Working copies of both lists are sorted by source start; the seed ranges
/// are combined with the composed ranges without gap filling, since only the
/// values actually present in the seed ranges matter.
///
/// # Errors
///
/// Fails with [`EvaluateError::EmptySeedRanges`] when there are no seed
/// ranges to evaluate.
pub fn minimum_over_ranges(
    seed_ranges: &[MapRange],
    composed: &[MapRange],
) -> Result<MapNumber, EvaluateError> {
    if seed_ranges.is_empty() {
        return Err(EvaluateError::EmptySeedRanges);
    }

    let mut seeds = seed_ranges.to_vec();
    seeds.sort_unstable();
    let mut splitters = composed.to_vec();
    splitters.sort_unstable();

    let mapped = combine_mappings(&seeds, &splitters, false)?;
    mapped
        .iter()
        .map(MapRange::destination_start)
        .min()
        .ok_or(EvaluateError::EmptySeedRanges)
}

/// Map every seed value through the composed ranges and return the minimum.
///
/// # Errors
///
/// Fails with [`EvaluateError::EmptySeedValues`] when there are no seed
/// values to evaluate.
pub fn minimum_over_points(
    seed_values: &[MapNumber],
    composed: &[MapRange],
) -> Result<MapNumber, EvaluateError> {
    let mut splitters = composed.to_vec();
    splitters.sort_unstable();

    seed_values
        .iter()
        .map(|&value| map_through_sorted(&splitters, value))
        .min()
        .ok_or(EvaluateError::EmptySeedValues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DynamicResult;

    #[test]
    fn empty_seed_ranges_are_an_error() {
        assert!(matches!(
            minimum_over_ranges(&[], &[]),
            Err(EvaluateError::EmptySeedRanges)
        ));
    }

    #[test]
    fn empty_seed_values_are_an_error() {
        assert!(matches!(
            minimum_over_points(&[], &[]),
            Err(EvaluateError::EmptySeedValues)
        ));
    }

    #[test]
    fn an_empty_composed_map_leaves_seed_starts_unchanged() -> DynamicResult<()> {
        let seeds = vec![MapRange::identity(79, 14)?, MapRange::identity(55, 13)?];

        assert_eq!(minimum_over_ranges(&seeds, &[])?, 55);
        Ok(())
    }

    #[test]
    fn the_minimum_comes_from_a_remapped_sub_range() -> DynamicResult<()> {
        let seeds = vec![MapRange::identity(55, 13)?];
        // [60, 65) drops to [0, 5); the rest of the seed range passes through
        let composed = vec![MapRange::new(0, 60, 5)?];

        assert_eq!(minimum_over_ranges(&seeds, &composed)?, 0);
        Ok(())
    }

    #[test]
    fn unsorted_inputs_are_sorted_before_evaluation() -> DynamicResult<()> {
        let seeds = vec![MapRange::identity(79, 14)?, MapRange::identity(55, 13)?];
        let composed = vec![MapRange::new(500, 90, 10)?, MapRange::new(1, 56, 2)?];

        // 56 maps to 1; every other reachable value is larger
        assert_eq!(minimum_over_ranges(&seeds, &composed)?, 1);
        Ok(())
    }

    #[test]
    fn point_evaluation_maps_each_seed_individually() -> DynamicResult<()> {
        let composed = vec![MapRange::new(0, 60, 5)?, MapRange::new(900, 10, 5)?];

        assert_eq!(minimum_over_points(&[61, 12, 7], &composed)?, 1);
        assert_eq!(minimum_over_points(&[7, 8], &composed)?, 7);
        Ok(())
    }
}
