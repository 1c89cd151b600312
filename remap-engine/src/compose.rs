//! Algebraic composition of piecewise maps.
//!
//! Two staged maps (`a -> b` and `b -> c`) are combined into one equivalent
//! `a -> c` map by splitting every range of the left map against the ranges
//! of the right map, entirely at the interval level; no individual value is
//! ever materialized. Folding [`combine_mappings`] over a whole route yields
//! the end-to-end map for the route.

use thiserror::Error;

use crate::category::CategoryMap;
use crate::range::{MapNumber, MapRange};

/// The tight bounding interval of a range list's source coverage, half-open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSpan {
    /// Smallest covered source value.
    pub min: MapNumber,
    /// One past the largest covered source value.
    pub max: MapNumber,
}

/// An error during map composition.
#[derive(Error, Debug)]
pub enum ComposeError {
    /// Gap filling was asked to cover an empty or inverted domain.
    #[error("cannot fill gaps over a degenerate domain: min = {min}, max = {max}")]
    DegenerateDomain { min: MapNumber, max: MapNumber },
}

/// The bounding interval of the list's source coverage, or `None` for an
/// empty list (no constraint).
///
/// The list must be sorted ascending by source start.
pub fn source_limits(sorted_ranges: &[MapRange]) -> Option<SourceSpan> {
    let first = sorted_ranges.first()?;
    let last = sorted_ranges.last()?;
    Some(SourceSpan {
        min: first.source_start(),
        max: last.source_end(),
    })
}

/// Return a copy of the sorted range list made total over the union of its
/// own coverage and the `required` domain, by inserting identity ranges into
/// every gap (between consecutive ranges and at both edges).
///
/// Later composition stages can then assume every value in the domain has an
/// explicit entry.
///
/// # Errors
///
/// Fails with [`ComposeError::DegenerateDomain`] if the merged domain is
/// empty or inverted.
pub fn fill_source_gaps(
    sorted_ranges: &[MapRange],
    required: SourceSpan,
) -> Result<Vec<MapRange>, ComposeError> {
    let merged = source_limits(sorted_ranges).map_or(required, |own| SourceSpan {
        min: own.min.min(required.min),
        max: own.max.max(required.max),
    });
    if merged.min >= merged.max {
        return Err(ComposeError::DegenerateDomain {
            min: merged.min,
            max: merged.max,
        });
    }

    let mut filled = Vec::with_capacity(sorted_ranges.len() * 2 + 1);
    let mut covered_to = merged.min;
    for range in sorted_ranges {
        if covered_to < range.source_start() {
            filled.push(MapRange::from_parts(
                covered_to,
                covered_to,
                range.source_start() - covered_to,
            ));
        }
        filled.push(*range);
        covered_to = range.source_end();
    }
    if covered_to < merged.max {
        filled.push(MapRange::from_parts(
            covered_to,
            covered_to,
            merged.max - covered_to,
        ));
    }

    Ok(filled)
}

/// Split one range of a left (`a -> b`) map against the sorted ranges of a
/// right (`b -> c`) map, pushing `a -> c` sub-ranges that exactly tile the
/// left range's source interval onto `combined`.
///
/// The left range's destination interval is the window the splitters
/// partition in their source space. Sub-windows covered by a splitter
/// compose both offsets; sub-windows covered by none pass through with the
/// left range's offset alone.
pub fn split_range(range: &MapRange, splitters: &[MapRange], combined: &mut Vec<MapRange>) {
    if splitters.is_empty() {
        combined.push(*range);
        return;
    }

    let window_start = range.destination_start();
    let window_end = range.destination_end();

    // first splitter at or after the window start, stepped back one when the
    // previous splitter may still reach into the window
    let mut index = splitters.partition_point(|splitter| splitter.source_start() < window_start);
    if index > 0
        && splitters
            .get(index)
            .is_none_or(|splitter| splitter.source_start() > window_start)
    {
        index -= 1;
    }

    let mut cursor = window_start;
    while let Some(splitter) = splitters.get(index) {
        if splitter.source_start() >= window_end {
            break;
        }
        if splitter.source_end() <= window_start {
            index += 1;
            continue;
        }

        if splitter.source_start() > cursor {
            // destination sub-window covered by no splitter: pass through
            combined.push(MapRange::from_parts(
                cursor,
                range.source_start() + (cursor - window_start),
                splitter.source_start() - cursor,
            ));
            cursor = splitter.source_start();
        }

        let overlap_start = cursor.max(splitter.source_start());
        let overlap_end = splitter.source_end().min(window_end);
        combined.push(MapRange::from_parts(
            splitter.destination_start() + (overlap_start - splitter.source_start()),
            range.source_start() + (overlap_start - window_start),
            overlap_end - overlap_start,
        ));
        cursor = overlap_end;
        index += 1;
    }

    if cursor < window_end {
        combined.push(MapRange::from_parts(
            cursor,
            range.source_start() + (cursor - window_start),
            window_end - cursor,
        ));
    }
}

/// Combine mappings `left` (`a -> b`) and `right` (`b -> c`) into `a -> c`
/// mappings.
///
/// An empty `right` leaves `left` unchanged. With `fill_gaps` set, `left` is
/// first extended with identity ranges so it fully covers the source domain
/// of `right`; without it, only the values `left` already covers are mapped.
///
/// The output tiles the (possibly extended) left ranges in their order and
/// is not guaranteed sorted; consumers that need sorted order must re-sort
/// explicitly.
///
/// # Errors
///
/// Propagates [`ComposeError::DegenerateDomain`] from gap filling.
pub fn combine_mappings(
    left: &[MapRange],
    right: &[MapRange],
    fill_gaps: bool,
) -> Result<Vec<MapRange>, ComposeError> {
    let Some(right_span) = source_limits(right) else {
        return Ok(left.to_vec());
    };

    let mut combined = Vec::new();
    if fill_gaps {
        for range in &fill_source_gaps(left, right_span)? {
            split_range(range, right, &mut combined);
        }
    } else {
        for range in left {
            split_range(range, right, &mut combined);
        }
    }
    Ok(combined)
}

/// Fold a route of category maps into the ranges of one equivalent
/// end-to-end map.
///
/// The fold runs right to left: each step composes a stage with the
/// already-combined suffix, with gap filling on so the final map is total
/// over the route's natural domain. The accumulator is re-sorted after every
/// step because it becomes the splitter list of the next one.
///
/// An empty route yields an empty range list, which maps every value to
/// itself.
///
/// # Errors
///
/// Propagates [`ComposeError`] from the per-step combination.
pub fn combine_route_mappings(route: &[&CategoryMap]) -> Result<Vec<MapRange>, ComposeError> {
    let mut combined: Vec<MapRange> = Vec::new();
    for map in route.iter().rev() {
        combined = combine_mappings(map.ranges(), &combined, true)?;
        combined.sort_unstable();
    }
    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DynamicResult;
    use crate::range::map_through_sorted;

    /// Assert that `pieces` exactly tile the source interval of `range`:
    /// same bounds, no gap, no overlap.
    fn assert_tiles_source_interval(range: &MapRange, pieces: &[MapRange]) {
        let mut sorted = pieces.to_vec();
        sorted.sort_unstable();

        assert!(!sorted.is_empty(), "expected at least one piece");
        assert_eq!(sorted[0].source_start(), range.source_start());
        for pair in sorted.windows(2) {
            assert_eq!(
                pair[0].source_end(),
                pair[1].source_start(),
                "pieces must be contiguous"
            );
        }
        let last = &sorted[sorted.len() - 1];
        assert_eq!(last.source_end(), range.source_end());
    }

    #[test]
    fn source_limits_of_an_empty_list_is_none() {
        assert_eq!(source_limits(&[]), None);
    }

    #[test]
    fn source_limits_spans_first_to_last() -> DynamicResult<()> {
        let ranges = vec![MapRange::new(0, 5, 3)?, MapRange::new(0, 10, 2)?];

        assert_eq!(
            source_limits(&ranges),
            Some(SourceSpan { min: 5, max: 12 })
        );
        Ok(())
    }

    #[test]
    fn fill_source_gaps_produces_total_coverage() -> DynamicResult<()> {
        let ranges = vec![MapRange::new(100, 5, 3)?, MapRange::new(200, 10, 2)?];
        let filled = fill_source_gaps(&ranges, SourceSpan { min: 0, max: 20 })?;

        // contiguous from 0 to 20 with no overlap
        assert_eq!(filled[0].source_start(), 0);
        for pair in filled.windows(2) {
            assert_eq!(pair[0].source_end(), pair[1].source_start());
        }
        assert_eq!(filled[filled.len() - 1].source_end(), 20);

        // the inserted ranges map to themselves, the input ranges are kept
        assert_eq!(map_through_sorted(&filled, 3), 3);
        assert_eq!(map_through_sorted(&filled, 6), 101);
        assert_eq!(map_through_sorted(&filled, 9), 9);
        assert_eq!(map_through_sorted(&filled, 11), 201);
        assert_eq!(map_through_sorted(&filled, 15), 15);
        Ok(())
    }

    #[test]
    fn fill_source_gaps_keeps_the_wider_own_coverage() -> DynamicResult<()> {
        let ranges = vec![MapRange::new(100, 5, 10)?];
        let filled = fill_source_gaps(&ranges, SourceSpan { min: 8, max: 9 })?;

        assert_eq!(filled.len(), 1);
        assert_eq!(filled[0], ranges[0]);
        Ok(())
    }

    #[test]
    fn fill_source_gaps_rejects_a_degenerate_domain() {
        let result = fill_source_gaps(&[], SourceSpan { min: 5, max: 5 });

        assert!(matches!(
            result,
            Err(ComposeError::DegenerateDomain { min: 5, max: 5 })
        ));
    }

    #[test]
    fn split_with_no_splitters_passes_the_range_through() -> DynamicResult<()> {
        let range = MapRange::new(20, 10, 5)?;
        let mut combined = Vec::new();
        split_range(&range, &[], &mut combined);

        assert_eq!(combined, vec![range]);
        Ok(())
    }

    #[test]
    fn split_with_no_overlapping_splitters_emits_a_passthrough() -> DynamicResult<()> {
        let range = MapRange::new(20, 10, 5)?;
        // both splitters are outside the destination window [20, 25)
        let splitters = vec![MapRange::new(0, 2, 3)?, MapRange::new(0, 40, 3)?];
        let mut combined = Vec::new();
        split_range(&range, &splitters, &mut combined);

        assert_eq!(combined, vec![range]);
        Ok(())
    }

    #[test]
    fn split_composes_offsets_over_covered_sub_windows() -> DynamicResult<()> {
        // a -> b: [10, 15) shifted to [20, 25)
        let range = MapRange::new(20, 10, 5)?;
        // b -> c: [22, 24) shifted to [100, 102)
        let splitters = vec![MapRange::new(100, 22, 2)?];
        let mut combined = Vec::new();
        split_range(&range, &splitters, &mut combined);

        assert_tiles_source_interval(&range, &combined);
        combined.sort_unstable();
        assert_eq!(map_through_sorted(&combined, 11), 21);
        assert_eq!(map_through_sorted(&combined, 12), 100);
        assert_eq!(map_through_sorted(&combined, 13), 101);
        assert_eq!(map_through_sorted(&combined, 14), 24);
        Ok(())
    }

    #[test]
    fn split_handles_partial_overlap_at_either_edge() -> DynamicResult<()> {
        let range = MapRange::new(20, 10, 5)?;
        // one splitter reaches into the window from below, one from above
        let splitters = vec![MapRange::new(50, 18, 3)?, MapRange::new(90, 24, 4)?];
        let mut combined = Vec::new();
        split_range(&range, &splitters, &mut combined);

        assert_tiles_source_interval(&range, &combined);
        combined.sort_unstable();
        // window [20, 25): [20, 21) covered by the low splitter,
        // [21, 24) uncovered, [24, 25) covered by the high splitter
        assert_eq!(map_through_sorted(&combined, 10), 52);
        assert_eq!(map_through_sorted(&combined, 11), 21);
        assert_eq!(map_through_sorted(&combined, 13), 23);
        assert_eq!(map_through_sorted(&combined, 14), 90);
        Ok(())
    }

    #[test]
    fn split_handles_multiple_splitters_inside_one_range() -> DynamicResult<()> {
        let range = MapRange::new(100, 0, 20)?;
        let splitters = vec![MapRange::new(500, 102, 3)?, MapRange::new(700, 110, 2)?];
        let mut combined = Vec::new();
        split_range(&range, &splitters, &mut combined);

        assert_tiles_source_interval(&range, &combined);
        combined.sort_unstable();
        assert_eq!(map_through_sorted(&combined, 0), 100);
        assert_eq!(map_through_sorted(&combined, 2), 500);
        assert_eq!(map_through_sorted(&combined, 4), 502);
        assert_eq!(map_through_sorted(&combined, 5), 105);
        assert_eq!(map_through_sorted(&combined, 10), 700);
        assert_eq!(map_through_sorted(&combined, 11), 701);
        assert_eq!(map_through_sorted(&combined, 12), 112);
        assert_eq!(map_through_sorted(&combined, 19), 119);
        Ok(())
    }

    #[test]
    fn split_handles_a_splitter_covering_the_whole_window() -> DynamicResult<()> {
        let range = MapRange::new(20, 10, 5)?;
        let splitters = vec![MapRange::new(1000, 15, 20)?];
        let mut combined = Vec::new();
        split_range(&range, &splitters, &mut combined);

        assert_tiles_source_interval(&range, &combined);
        assert_eq!(combined.len(), 1);
        assert_eq!(map_through_sorted(&combined, 10), 1005);
        assert_eq!(map_through_sorted(&combined, 14), 1009);
        Ok(())
    }

    #[test]
    fn combine_with_empty_right_returns_left_unchanged() -> DynamicResult<()> {
        let left = vec![MapRange::new(20, 10, 5)?];

        assert_eq!(combine_mappings(&left, &[], true)?, left);
        assert_eq!(combine_mappings(&left, &[], false)?, left);
        Ok(())
    }

    #[test]
    fn combine_without_gap_fill_only_maps_covered_values() -> DynamicResult<()> {
        let left = vec![MapRange::new(5, 0, 2)?];
        let right = vec![MapRange::new(100, 10, 5)?];

        let combined = combine_mappings(&left, &right, false)?;
        // 12 is in the right map's domain but not in the left's coverage
        assert_eq!(map_through_sorted(&combined, 12), 12);
        Ok(())
    }

    #[test]
    fn combine_with_gap_fill_covers_the_right_domain() -> DynamicResult<()> {
        let left = vec![MapRange::new(5, 0, 2)?];
        let right = vec![MapRange::new(100, 10, 5)?];

        let mut combined = combine_mappings(&left, &right, true)?;
        combined.sort_unstable();
        assert_eq!(map_through_sorted(&combined, 0), 5);
        assert_eq!(map_through_sorted(&combined, 12), 102);
        assert_eq!(map_through_sorted(&combined, 9), 9);
        Ok(())
    }

    #[test]
    fn combining_matches_applying_the_stages_in_sequence() -> DynamicResult<()> {
        let first = CategoryMap::from_ranges(
            "a",
            "b",
            vec![MapRange::new(40, 0, 10)?, MapRange::new(0, 25, 10)?],
        )?;
        let second = CategoryMap::from_ranges(
            "b",
            "c",
            vec![MapRange::new(100, 5, 10)?, MapRange::new(60, 42, 4)?],
        )?;

        let mut combined = combine_mappings(first.ranges(), second.ranges(), true)?;
        combined.sort_unstable();

        for value in 0..60 {
            let staged = second.map_value(first.map_value(value));
            assert_eq!(
                map_through_sorted(&combined, value),
                staged,
                "mismatch at value {value}"
            );
        }
        Ok(())
    }

    #[test]
    fn route_folds_are_associative() -> DynamicResult<()> {
        let first = CategoryMap::from_ranges(
            "a",
            "b",
            vec![MapRange::new(30, 0, 10)?, MapRange::new(5, 50, 20)?],
        )?;
        let second = CategoryMap::from_ranges(
            "b",
            "c",
            vec![MapRange::new(90, 20, 25)?, MapRange::new(0, 70, 5)?],
        )?;
        let third = CategoryMap::from_ranges(
            "c",
            "d",
            vec![MapRange::new(7, 95, 10)?, MapRange::new(200, 0, 4)?],
        )?;

        // right-to-left fold over the whole route
        let folded = combine_route_mappings(&[&first, &second, &third])?;

        // left-to-right: combine the first two stages, then the third
        let mut front = combine_mappings(first.ranges(), second.ranges(), true)?;
        front.sort_unstable();
        let mut alternate = combine_mappings(&front, third.ranges(), true)?;
        alternate.sort_unstable();

        for value in 0..130 {
            let staged = third.map_value(second.map_value(first.map_value(value)));
            assert_eq!(
                map_through_sorted(&folded, value),
                staged,
                "fold mismatch at value {value}"
            );
            assert_eq!(
                map_through_sorted(&alternate, value),
                staged,
                "alternate fold mismatch at value {value}"
            );
        }
        Ok(())
    }

    #[test]
    fn an_empty_route_composes_to_the_identity() -> DynamicResult<()> {
        let combined = combine_route_mappings(&[])?;

        assert!(combined.is_empty());
        for value in [0, 1, 55, 79, MapNumber::MAX] {
            assert_eq!(map_through_sorted(&combined, value), value);
        }
        Ok(())
    }
}
