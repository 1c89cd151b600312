//! The piecewise function between two named categories.

use thiserror::Error;

use crate::range::{MapNumber, MapRange, map_through_sorted};

/// A mapping of source numbers to destination numbers between two named
/// categories.
///
/// Contains a collection of [`MapRange`] kept sorted ascending by source
/// start; source values covered by no range map to themselves. Sorting
/// happens when ranges enter the map, never during composition.
#[derive(Debug)]
pub struct CategoryMap {
    source_category: String,
    destination_category: String,
    ranges: Vec<MapRange>,
}

/// An error related to the ranges of a [`CategoryMap`].
#[derive(Error, Debug)]
pub enum CategoryMapError {
    /// Two ranges claim overlapping source intervals.
    #[error(
        "source intervals overlap: [{first_start}, {first_end}) and [{second_start}, {second_end})"
    )]
    OverlappingRanges {
        first_start: MapNumber,
        first_end: MapNumber,
        second_start: MapNumber,
        second_end: MapNumber,
    },
}

impl CategoryMap {
    /// Create an empty map between the two categories.
    pub fn new(
        source_category: impl Into<String>,
        destination_category: impl Into<String>,
    ) -> Self {
        Self {
            source_category: source_category.into(),
            destination_category: destination_category.into(),
            ranges: Vec::new(),
        }
    }

    /// Create a map from a collection of ranges, sorting them by source
    /// start.
    ///
    /// # Errors
    ///
    /// Fails with [`CategoryMapError::OverlappingRanges`] if any two ranges
    /// claim overlapping source intervals.
    pub fn from_ranges(
        source_category: impl Into<String>,
        destination_category: impl Into<String>,
        ranges: Vec<MapRange>,
    ) -> Result<Self, CategoryMapError> {
        let mut map = Self {
            source_category: source_category.into(),
            destination_category: destination_category.into(),
            ranges,
        };
        map.ranges.sort_unstable();
        map.check_disjoint()?;
        Ok(map)
    }

    /// Append a range and re-sort by source start.
    ///
    /// # Errors
    ///
    /// Fails with [`CategoryMapError::OverlappingRanges`] if the new range
    /// overlaps an existing source interval.
    pub fn insert(&mut self, range: MapRange) -> Result<(), CategoryMapError> {
        self.ranges.push(range);
        self.ranges.sort_unstable();
        self.check_disjoint()
    }

    fn check_disjoint(&self) -> Result<(), CategoryMapError> {
        for pair in self.ranges.windows(2) {
            if pair[0].source_end() > pair[1].source_start() {
                return Err(CategoryMapError::OverlappingRanges {
                    first_start: pair[0].source_start(),
                    first_end: pair[0].source_end(),
                    second_start: pair[1].source_start(),
                    second_end: pair[1].source_end(),
                });
            }
        }
        Ok(())
    }

    /// The category this map converts from.
    pub fn source_category(&self) -> &str {
        &self.source_category
    }

    /// The category this map converts to.
    pub fn destination_category(&self) -> &str {
        &self.destination_category
    }

    /// The ranges of the map, sorted ascending by source start.
    pub fn ranges(&self) -> &[MapRange] {
        &self.ranges
    }

    /// Map a source value to a destination value.
    ///
    /// Values covered by no range are returned unchanged.
    pub fn map_value(&self, value: MapNumber) -> MapNumber {
        map_through_sorted(&self.ranges, value)
    }
}
