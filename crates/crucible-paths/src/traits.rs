use crucible_core::{CostGrid, Direction, Point};

use crate::graph::Distance;

/// Minimal pathfinding interface — provides neighbor enumeration.
pub trait Pather {
    /// Append neighbors of `p` into `buf`. The caller clears `buf` before calling.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);
}

/// Pather with weighted (non-negative) edges.
pub trait WeightedPather: Pather {
    /// Cost of moving from `from` to adjacent `to`.
    fn cost(&self, from: Point, to: Point) -> Distance;
}

/// A cost grid is a 4-connected graph where stepping onto a cell costs that
/// cell's value.
impl Pather for CostGrid {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        buf.extend(
            Direction::ALL
                .iter()
                .map(|&d| p.step(d, 1))
                .filter(|&n| self.contains(n)),
        );
    }
}

impl WeightedPather for CostGrid {
    fn cost(&self, _from: Point, to: Point) -> Distance {
        self.cost_at(to).map_or(0, Distance::from)
    }
}
