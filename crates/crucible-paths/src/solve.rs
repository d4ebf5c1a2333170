//! One-call entry points: build, search and resolve.

use std::fmt;

use crucible_core::{CostGrid, GridError, Point};

use crate::constraints::{ConstraintError, RunConstraints};
use crate::goal::resolve;
use crate::graph::{Distance, StateGraph};
use crate::search::{SearchError, search_to};

/// The answer to a single query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    pub cost: Distance,
    pub start: Point,
    pub end: Point,
    pub constraints: RunConstraints,
}

/// Minimum cost from `start` to `end` on `grid` under `constraints`.
///
/// Builds a fresh [`StateGraph`]; callers running several queries against
/// the same grid and constraints should build the graph once and call
/// [`search_to`] and [`resolve`] directly.
pub fn solve(
    grid: &CostGrid,
    start: Point,
    end: Point,
    constraints: RunConstraints,
) -> Result<Solution, Error> {
    let graph = StateGraph::build(grid, constraints);
    let result = search_to(&graph, start, end)?;
    let cost = resolve(&graph, &result, end)?;
    log::trace!("solved {start} -> {end} under {constraints}: {cost}");
    Ok(Solution {
        cost,
        start,
        end,
        constraints,
    })
}

/// Parse a digit grid and solve corner to corner (top-left to
/// bottom-right).
pub fn solve_text(input: &str, constraints: RunConstraints) -> Result<Solution, Error> {
    let grid = CostGrid::parse(input)?;
    solve(&grid, grid.top_left(), grid.bottom_right(), constraints)
}

/// Any failure of [`solve`] or [`solve_text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The input grid is malformed.
    Grid(GridError),
    /// The run constraints are invalid.
    Constraints(ConstraintError),
    /// The search ran but found no answer.
    Search(SearchError),
}

impl Error {
    /// Whether this is the ordinary "no path" outcome rather than bad input.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Search(SearchError::Unreachable { .. }))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(e) => fmt::Display::fmt(e, f),
            Self::Constraints(e) => fmt::Display::fmt(e, f),
            Self::Search(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            Self::Constraints(e) => Some(e),
            Self::Search(e) => Some(e),
        }
    }
}

impl From<GridError> for Error {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<ConstraintError> for Error {
    fn from(e: ConstraintError) -> Self {
        Self::Constraints(e)
    }
}

impl From<SearchError> for Error {
    fn from(e: SearchError) -> Self {
        Self::Search(e)
    }
}
