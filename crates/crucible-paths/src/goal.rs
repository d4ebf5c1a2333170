//! Reading answers out of a [`SearchResult`].
//!
//! A destination cell is usually represented by several vertex variants
//! (one per run that ends there). The answer is the cheapest finalized one.

use crucible_core::{Direction, Point};

use crate::graph::{Distance, StateGraph, VertexId};
use crate::search::{SearchError, SearchResult};

/// Minimum distance from the search origin to any variant of `end`.
///
/// When `end` is the origin itself the synthetic start vertex counts, so the
/// answer is 0 without moving. A result from [`search_to`](crate::search_to)
/// answers for its goal and for any cell it settled on the way; other cells
/// give [`SearchError::Unsearched`].
pub fn resolve(graph: &StateGraph, result: &SearchResult, end: Point) -> Result<Distance, SearchError> {
    best_arrival(graph, result, end).map(|(d, _)| d)
}

/// The cheapest finalized variant of `end`; `None` is the synthetic start.
fn best_arrival(
    graph: &StateGraph,
    result: &SearchResult,
    end: Point,
) -> Result<(Distance, Option<VertexId>), SearchError> {
    if !graph.bounds().contains(end) {
        return Err(SearchError::OutOfBounds(end));
    }
    if end == result.origin() {
        return Ok((0, None));
    }
    let best = graph
        .arrivals(end)
        .iter()
        .filter_map(|&id| result.distance(id).map(|d| (d, Some(id))))
        .min();
    match (best, result.stopped_at()) {
        (Some(best), _) => Ok(best),
        (None, Some(goal)) => Err(SearchError::Unsearched { goal, end }),
        (None, None) => Err(SearchError::Unreachable {
            from: result.origin(),
            to: end,
        }),
    }
}

/// One straight leg of a [`Route`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Leg {
    pub from: Point,
    pub direction: Direction,
    pub length: u32,
    pub weight: Distance,
}

/// A cheapest route, reconstructed from predecessors.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub cost: Distance,
    pub legs: Vec<Leg>,
    /// Every visited cell, start and end included.
    pub cells: Vec<Point>,
}

impl SearchResult {
    /// Reconstruct a cheapest route to `end` by walking predecessors back to
    /// the start.
    pub fn route_to(&self, graph: &StateGraph, end: Point) -> Result<Route, SearchError> {
        let (cost, mut cur) = best_arrival(graph, self, end)?;

        let mut legs = Vec::new();
        while let Some(id) = cur {
            let v = graph.vertex(id);
            legs.push(Leg {
                from: v.source,
                direction: v.arrival,
                length: v.length,
                weight: v.run_weight,
            });
            cur = self.predecessor(id).flatten();
        }
        legs.reverse();

        let mut cells = vec![self.origin()];
        for leg in &legs {
            cells.extend((1..=leg.length as i32).map(|i| leg.from.step(leg.direction, i)));
        }

        Ok(Route { cost, legs, cells })
    }
}
