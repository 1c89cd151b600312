//! The directed graph of category maps and route discovery over it.

use std::collections::HashMap;

use crate::category::CategoryMap;

/// An ordered chain of category maps connecting a source category to a
/// destination category through intermediate categories.
pub type Route<'graph> = Vec<&'graph CategoryMap>;

/// A directed graph whose nodes are category names and whose edges are
/// category maps.
///
/// Built incrementally while input is parsed; edges are never removed. Each
/// node keeps its outgoing edges in insertion order, which is the order
/// route discovery tries them in.
#[derive(Debug, Default)]
pub struct RoutingGraph {
    edges: HashMap<String, Vec<CategoryMap>>,
}

impl RoutingGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category map as an edge from its source category to its
    /// destination category.
    ///
    /// At most one map exists per ordered (source, destination) pair; adding
    /// a second map for the same pair replaces the first.
    pub fn add_edge(&mut self, map: CategoryMap) {
        let outgoing = self.edges.entry(map.source_category().to_owned()).or_default();
        let existing = outgoing
            .iter()
            .position(|edge| edge.destination_category() == map.destination_category());
        match existing {
            Some(index) => outgoing[index] = map,
            None => outgoing.push(map),
        }
    }

    /// The map registered for the ordered (source, destination) pair, if
    /// any.
    pub fn edge(&self, source: &str, destination: &str) -> Option<&CategoryMap> {
        self.edges
            .get(source)?
            .iter()
            .find(|map| map.destination_category() == destination)
    }

    /// Find an ordered chain of maps from `source` to `destination` by
    /// depth-first search, or `None` when no chain exists.
    ///
    /// At each category a direct edge to the destination wins; otherwise
    /// outgoing edges are tried in insertion order, backtracking on dead
    /// ends. The search runs on an explicit frame stack with an explicit
    /// path list rather than native recursion.
    ///
    /// The search does not guard against cycles: a directed cycle reachable
    /// from `source` before `destination` is found makes it run forever.
    pub fn find_route<'graph>(
        &'graph self,
        source: &str,
        destination: &str,
    ) -> Option<Route<'graph>> {
        // (category, index of the next outgoing edge to try)
        let mut stack: Vec<(&str, usize)> = vec![(source, 0)];
        let mut path: Route<'graph> = Vec::new();

        while let Some(&(category, edge_index)) = stack.last() {
            let Some(outgoing) = self.edges.get(category) else {
                // dead end, backtrack
                stack.pop();
                path.pop();
                continue;
            };

            if edge_index == 0 {
                if let Some(direct) = outgoing
                    .iter()
                    .find(|map| map.destination_category() == destination)
                {
                    path.push(direct);
                    return Some(path);
                }
            }

            if let Some(edge) = outgoing.get(edge_index) {
                if let Some(frame) = stack.last_mut() {
                    frame.1 += 1;
                }
                path.push(edge);
                stack.push((edge.destination_category(), 0));
            } else {
                // every outgoing edge exhausted, backtrack
                stack.pop();
                path.pop();
            }
        }

        None
    }
}
