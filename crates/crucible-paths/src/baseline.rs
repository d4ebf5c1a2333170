//! Unconstrained cell-level Dijkstra.
//!
//! This ignores run lengths entirely: a mover may step to any neighbor at any
//! time. It is the reference answer the constrained search collapses to when
//! runs of any length are allowed.

use std::collections::BinaryHeap;

use crucible_core::{Point, Range};

use crate::graph::Distance;
use crate::search::{NodeRef, UNREACHED};
use crate::traits::WeightedPather;

/// Cheapest cost from the sources to every cell of a range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMap {
    bounds: Range,
    costs: Vec<Distance>,
}

impl CostMap {
    /// Cost of reaching `p`, or `None` if unreached or outside the range.
    pub fn at(&self, p: Point) -> Option<Distance> {
        self.bounds
            .index_of(p)
            .map(|i| self.costs[i])
            .filter(|&c| c != UNREACHED)
    }

    /// The range the map covers.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }
}

/// Compute a multi-source Dijkstra cost map over `bounds`.
///
/// Every source starts at cost 0; sources outside `bounds` are ignored.
pub fn cell_costs<P: WeightedPather>(pather: &P, bounds: Range, sources: &[Point]) -> CostMap {
    let mut costs = vec![UNREACHED; bounds.len()];
    let mut closed = vec![false; bounds.len()];
    let mut open: BinaryHeap<NodeRef> = BinaryHeap::new();

    // Seed sources.
    for &src in sources {
        if let Some(si) = bounds.index_of(src) {
            costs[si] = 0;
            open.push(NodeRef { idx: si, g: 0 });
        }
    }

    let mut nbuf = Vec::with_capacity(4);

    while let Some(current) = open.pop() {
        let ci = current.idx;
        if closed[ci] || current.g > costs[ci] {
            continue;
        }
        closed[ci] = true;
        let current_g = costs[ci];
        let cp = bounds.point_at(ci);

        nbuf.clear();
        pather.neighbors(cp, &mut nbuf);

        for &np in nbuf.iter() {
            let Some(ni) = bounds.index_of(np) else {
                continue;
            };
            let tentative = current_g + pather.cost(cp, np);
            if tentative >= costs[ni] {
                continue;
            }
            costs[ni] = tentative;
            open.push(NodeRef {
                idx: ni,
                g: tentative,
            });
        }
    }

    CostMap { bounds, costs }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crucible_core::CostGrid;

    #[test]
    fn costs_count_entered_cells_only() {
        let g = CostGrid::parse("19\n11").unwrap();
        let m = cell_costs(&g, g.bounds(), &[Point::ZERO]);
        assert_eq!(m.at(Point::ZERO), Some(0));
        assert_eq!(m.at(Point::new(0, 1)), Some(1));
        assert_eq!(m.at(Point::new(1, 1)), Some(2));
        assert_eq!(m.at(Point::new(1, 0)), Some(9));
        assert_eq!(m.at(Point::new(2, 0)), None);
    }

    #[test]
    fn detour_beats_expensive_cell() {
        let g = CostGrid::parse("191\n111").unwrap();
        let m = cell_costs(&g, g.bounds(), &[Point::ZERO]);
        // Straight across would pay 9 + 1.
        assert_eq!(m.at(Point::new(2, 0)), Some(4));
        assert_eq!(m.at(Point::new(2, 1)), Some(3));
    }

    #[test]
    fn multiple_sources() {
        let g = CostGrid::parse("1111\n1111").unwrap();
        let m = cell_costs(&g, g.bounds(), &[Point::new(0, 0), Point::new(3, 1)]);
        assert_eq!(m.at(Point::new(3, 0)), Some(1));
        assert_eq!(m.at(Point::new(1, 0)), Some(1));
        assert_eq!(m.at(Point::new(2, 0)), Some(2));
    }

    #[test]
    fn zero_cost_cells() {
        let g = CostGrid::from_rows(&[[0u32, 0, 5], [9, 0, 0]]).unwrap();
        let m = cell_costs(&g, g.bounds(), &[Point::ZERO]);
        assert_eq!(m.at(Point::new(2, 1)), Some(0));
        assert_eq!(m.at(Point::new(2, 0)), Some(5));
    }

    #[test]
    fn restricted_range_ignores_outside_sources() {
        let g = CostGrid::parse("111\n111").unwrap();
        let r = Range::new(0, 0, 2, 2);
        let m = cell_costs(&g, r, &[Point::new(2, 0)]);
        assert_eq!(m.bounds(), r);
        assert!(r.iter().all(|p| m.at(p).is_none()));
    }
}
