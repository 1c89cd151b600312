//! Parsing the textual pipeline description into seeds and a routing graph.

use regex::Regex;
use thiserror::Error;

use crate::category::CategoryMap;
use crate::graph::RoutingGraph;
use crate::parsing::{parse_lines, parse_value};
use crate::range::{MapNumber, MapRange, MapRangeError};
use crate::{DynamicResult, ParseData};

/*
Input is a pipeline description. The first non-blank line is a `seeds: ` line
with a space-separated list of numbers.

Following are blocks of maps for converting numbers from a source category to
a destination category, e.g. `seed-to-soil map:` converts seed numbers to
soil numbers. A block's header line names its categories; the lines below it
each contain three numbers: the destination range start, the source range
start, and the range length.

Blocks are delimited by their headers; blank lines are ignored everywhere.

Any source number outside a map's ranges converts one-to-one as the
destination number.
*/

/// The parsed pipeline input: seed numbers and the graph of category maps.
#[derive(Debug)]
pub struct RemapDocument {
    /// Seed numbers as parsed, before either interpretation is applied.
    seed_numbers: Vec<MapNumber>,
    /// The category maps, keyed by their source and destination categories.
    graph: RoutingGraph,
}

/// An error in the structure of a pipeline description.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("expected a seeds line before any map block")]
    MissingSeedList,

    #[error("line {line_number}: unexpected second seeds line")]
    DuplicateSeedList { line_number: usize },

    #[error("line {line_number}: a map range appears before any map header")]
    RangeOutsideMapBlock { line_number: usize },

    /// A labeled line other than the seeds line, with the label found.
    #[error("expected the label \"seeds\", found {found:?}")]
    UnrecognizedLabel { found: String },

    /// Expected a line formatted with three numbers for a range, with the
    /// found line.
    #[error("expected three space-separated numbers as a map range, found: {0:?}")]
    ExpectedRangeTriple(String),

    /// The seed numbers cannot pair up as (start, length) ranges.
    #[error("seed numbers must pair up as start and length, found {count} of them")]
    OddSeedCount { count: usize },

    #[error(transparent)]
    Range(#[from] MapRangeError),
}

/// One input line, classified.
enum LineEvent {
    Blank,
    SeedList(Vec<MapNumber>),
    MapHeader { source: String, destination: String },
    RangeTriple(MapRange),
}

fn classify_line(header_pattern: &Regex, line: &str) -> DynamicResult<LineEvent> {
    if line.is_empty() {
        return Ok(LineEvent::Blank);
    }

    if let Some(captures) = header_pattern.captures(line) {
        return Ok(LineEvent::MapHeader {
            source: captures[1].to_owned(),
            destination: captures[2].to_owned(),
        });
    }

    if let Some((label, list)) = line.split_once(':') {
        if label.trim() != "seeds" {
            return Err(DocumentError::UnrecognizedLabel {
                found: label.trim().to_owned(),
            }
            .into());
        }
        let numbers = list
            .split_whitespace()
            .map(parse_value)
            .collect::<Result<_, _>>()?;
        return Ok(LineEvent::SeedList(numbers));
    }

    let values: Vec<_> = line.split_whitespace().collect();
    if values.len() != 3 {
        return Err(DocumentError::ExpectedRangeTriple(line.to_owned()).into());
    }
    // destination start comes first in the text, before the source start
    let destination_start = parse_value(values[0])?;
    let source_start = parse_value(values[1])?;
    let length = parse_value(values[2])?;
    Ok(LineEvent::RangeTriple(MapRange::new(
        destination_start,
        source_start,
        length,
    )?))
}

impl ParseData for RemapDocument {
    fn parse(input: &str) -> DynamicResult<Self>
    where
        Self: Sized,
    {
        let header_pattern = Regex::new(r"(\w+)-to-(\w+)\s+map\s*:")?;

        let mut seed_numbers: Option<Vec<MapNumber>> = None;
        let mut graph = RoutingGraph::new();
        // the map block currently being accumulated
        let mut open_block: Option<(String, String, Vec<MapRange>)> = None;

        let events = parse_lines(input, |line| classify_line(&header_pattern, line));
        for (index, event) in events.enumerate() {
            match event? {
                LineEvent::Blank => {}
                LineEvent::SeedList(numbers) => {
                    if seed_numbers.is_some() {
                        return Err(DocumentError::DuplicateSeedList {
                            line_number: index + 1,
                        }
                        .into());
                    }
                    seed_numbers = Some(numbers);
                }
                LineEvent::MapHeader {
                    source,
                    destination,
                } => {
                    if seed_numbers.is_none() {
                        return Err(DocumentError::MissingSeedList.into());
                    }
                    if let Some((block_source, block_destination, ranges)) = open_block.take() {
                        graph.add_edge(CategoryMap::from_ranges(
                            block_source,
                            block_destination,
                            ranges,
                        )?);
                    }
                    open_block = Some((source, destination, Vec::new()));
                }
                LineEvent::RangeTriple(range) => match open_block.as_mut() {
                    Some((_, _, ranges)) => ranges.push(range),
                    None => {
                        return Err(DocumentError::RangeOutsideMapBlock {
                            line_number: index + 1,
                        }
                        .into());
                    }
                },
            }
        }
        if let Some((source, destination, ranges)) = open_block {
            graph.add_edge(CategoryMap::from_ranges(source, destination, ranges)?);
        }

        let seed_numbers = seed_numbers.ok_or(DocumentError::MissingSeedList)?;
        Ok(Self {
            seed_numbers,
            graph,
        })
    }
}

impl RemapDocument {
    /// The seed numbers, each standing for itself.
    pub fn seed_values(&self) -> &[MapNumber] {
        &self.seed_numbers
    }

    /// The seed numbers interpreted as pairs of range start and length.
    ///
    /// Zero-length pairs describe no values and are skipped.
    ///
    /// # Errors
    ///
    /// Fails with [`DocumentError::OddSeedCount`] when the numbers cannot
    /// pair up, and propagates range construction errors for pairs whose
    /// interval end would overflow.
    pub fn seed_ranges(&self) -> Result<Vec<MapRange>, DocumentError> {
        if !self.seed_numbers.len().is_multiple_of(2) {
            return Err(DocumentError::OddSeedCount {
                count: self.seed_numbers.len(),
            });
        }

        let mut ranges = Vec::with_capacity(self.seed_numbers.len() / 2);
        for pair in self.seed_numbers.chunks_exact(2) {
            let (start, length) = (pair[0], pair[1]);
            if length == 0 {
                continue;
            }
            ranges.push(MapRange::identity(start, length)?);
        }
        Ok(ranges)
    }

    /// The graph of category maps described by the input.
    pub fn graph(&self) -> &RoutingGraph {
        &self.graph
    }
}
