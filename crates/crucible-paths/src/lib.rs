//! Constrained-movement shortest paths on weighted grids.
//!
//! A mover crosses a [`CostGrid`](crucible_core::CostGrid) paying each
//! cell's cost on entry. It travels in straight runs whose length is bounded
//! by [`RunConstraints`], and must turn left or right between runs; it may
//! never reverse.
//!
//! The work is split into stages that each produce a new owned value:
//!
//! - [`StateGraph::build`] expands the grid into one vertex per legal run,
//!   with edges to every perpendicular run that can follow it.
//! - [`search`] / [`search_to`] run Dijkstra from a start cell over that
//!   graph, with lazy deletion of stale queue entries.
//! - [`resolve`] picks the cheapest of the vertex variants ending on the
//!   destination cell; [`SearchResult::route_to`] rebuilds the route.
//!
//! [`solve`] and [`solve_text`] chain the three for one-off queries, and
//! [`baseline::cell_costs`] gives the unconstrained answer for comparison.
//!
//! # Trait hierarchy
//!
//! | Trait | Required for |
//! |---|---|
//! | [`Pather`] | neighbor enumeration |
//! | [`WeightedPather`] : [`Pather`] | [`baseline::cell_costs`] |

pub mod baseline;
mod constraints;
mod goal;
mod graph;
mod search;
mod solve;
mod traits;

pub use constraints::{ConstraintError, RunConstraints};
pub use goal::{Leg, Route, resolve};
pub use graph::{Distance, Edge, StateGraph, Vertex, VertexId};
pub use search::{SearchError, SearchResult, SearchStats, search, search_to};
pub use solve::{Error, Solution, solve, solve_text};
pub use traits::{Pather, WeightedPather};
