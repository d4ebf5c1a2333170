//! **crucible-core** — core types for constrained grid pathfinding.
//!
//! This crate provides the foundational types shared by the *crucible*
//! workspace: geometry primitives ([`Point`], [`Range`], [`Direction`]) and
//! the immutable [`CostGrid`] that every search reads from.

pub mod geom;
pub mod grid;

pub use geom::{Direction, Point, Range, RangeIter};
pub use grid::{Cost, CostGrid, GridError};
