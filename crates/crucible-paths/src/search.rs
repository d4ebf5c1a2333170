use std::collections::BinaryHeap;
use std::fmt;

use crucible_core::Point;

use crate::graph::{Distance, StateGraph, VertexId};

/// Sentinel for "no tentative distance yet".
pub(crate) const UNREACHED: Distance = Distance::MAX;

// ---------------------------------------------------------------------------
// Internal node for the priority-queue search
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug)]
pub(crate) struct Node {
    pub(crate) g: Distance,
    // `None` means the run departed from the synthetic start.
    pub(crate) parent: Option<VertexId>,
    pub(crate) closed: bool,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            g: UNREACHED,
            parent: None,
            closed: false,
        }
    }
}

/// Reference into the node array, ordered by `g` for use in `BinaryHeap`.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub(crate) struct NodeRef {
    pub(crate) idx: usize,
    pub(crate) g: Distance,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest g first.
        other.g.cmp(&self.g).then_with(|| other.idx.cmp(&self.idx))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ---------------------------------------------------------------------------
// SearchResult
// ---------------------------------------------------------------------------

/// Counters collected while searching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Entries popped from the queue, stale ones included.
    pub pops: usize,
    /// Popped entries discarded because the vertex was already final.
    pub stale: usize,
    /// Successful relaxations (queue pushes).
    pub pushes: usize,
}

/// Final distances and predecessors of one search over a [`StateGraph`].
///
/// Only finalized vertices have a distance; a vertex still waiting in the
/// queue when [`search_to`] stopped early reports `None`. Such a result
/// remembers its goal in [`stopped_at`](Self::stopped_at), so cells it never
/// got to are reported as unsearched rather than unreachable.
#[derive(Debug, Clone)]
pub struct SearchResult {
    origin: Point,
    stopped_at: Option<Point>,
    nodes: Vec<Node>,
    settled: Vec<VertexId>,
    stats: SearchStats,
}

impl SearchResult {
    /// The start cell.
    #[inline]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// The goal the search stopped at before the queue ran dry, if any.
    #[inline]
    pub fn stopped_at(&self) -> Option<Point> {
        self.stopped_at
    }

    /// Shortest distance to `id`, if it was finalized.
    pub fn distance(&self, id: VertexId) -> Option<Distance> {
        self.nodes
            .get(id.index())
            .filter(|n| n.closed)
            .map(|n| n.g)
    }

    /// Predecessor of a finalized vertex on its shortest path.
    ///
    /// `Some(None)` means the vertex is a first run out of the start cell.
    pub fn predecessor(&self, id: VertexId) -> Option<Option<VertexId>> {
        self.nodes
            .get(id.index())
            .filter(|n| n.closed)
            .map(|n| n.parent)
    }

    /// Finalized vertices in the order they left the queue, which is
    /// non-decreasing in distance.
    #[inline]
    pub fn settled(&self) -> &[VertexId] {
        &self.settled
    }

    /// Queue counters.
    #[inline]
    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}

// ---------------------------------------------------------------------------
// Search entry points
// ---------------------------------------------------------------------------

/// Compute shortest distances from `start` to every reachable vertex.
///
/// The start is a synthetic vertex with no arrival direction, so the first
/// run may go any way. Runs until the queue is empty.
pub fn search(graph: &StateGraph, start: Point) -> Result<SearchResult, SearchError> {
    run(graph, start, None)
}

/// Like [`search`], but stop once the first vertex at `goal` is finalized.
///
/// Vertices leave the queue in non-decreasing distance order, so that first
/// vertex is already the cheapest variant of `goal`.
pub fn search_to(
    graph: &StateGraph,
    start: Point,
    goal: Point,
) -> Result<SearchResult, SearchError> {
    if !graph.bounds().contains(goal) {
        return Err(SearchError::OutOfBounds(goal));
    }
    run(graph, start, Some(goal))
}

fn run(graph: &StateGraph, start: Point, goal: Option<Point>) -> Result<SearchResult, SearchError> {
    if !graph.bounds().contains(start) {
        return Err(SearchError::OutOfBounds(start));
    }

    let mut nodes = vec![Node::default(); graph.len()];
    let mut settled = Vec::new();
    let mut stats = SearchStats::default();
    let mut open: BinaryHeap<NodeRef> = BinaryHeap::new();
    let mut stopped_at = None;

    // The start vertex is final at distance 0 before anything is queued.
    if goal == Some(start) {
        stopped_at = goal;
    } else {
        for id in graph.departures(start) {
            let g = graph.vertex(id).run_weight;
            let n = &mut nodes[id.index()];
            if g < n.g {
                n.g = g;
                n.parent = None;
                open.push(NodeRef { idx: id.index(), g });
                stats.pushes += 1;
            }
        }
    }

    while let Some(current) = open.pop() {
        stats.pops += 1;
        let ci = current.idx;
        let cn = &nodes[ci];
        // Skip stale entries.
        if cn.closed || current.g > cn.g {
            stats.stale += 1;
            continue;
        }
        let current_g = cn.g;
        nodes[ci].closed = true;

        let cid = VertexId(ci);
        settled.push(cid);

        if goal == Some(graph.vertex(cid).position) {
            stopped_at = goal;
            break;
        }

        for e in graph.edges(cid) {
            let ni = e.to.index();
            let tentative = current_g + e.weight;
            let n = &mut nodes[ni];
            if n.closed || tentative >= n.g {
                continue;
            }
            n.g = tentative;
            n.parent = Some(cid);
            open.push(NodeRef {
                idx: ni,
                g: tentative,
            });
            stats.pushes += 1;
        }
    }

    log::debug!(
        "search from {}: {} settled, {} pops ({} stale), {} pushes",
        start,
        settled.len(),
        stats.pops,
        stats.stale,
        stats.pushes
    );

    Ok(SearchResult {
        origin: start,
        stopped_at,
        nodes,
        settled,
        stats,
    })
}

/// Why a search could not produce an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// No legal sequence of runs leads from `from` to `to`.
    Unreachable { from: Point, to: Point },
    /// A start or end cell lies outside the grid.
    OutOfBounds(Point),
    /// The search stopped at `goal` before `end` was settled, so the cost of
    /// `end` is unknown.
    Unsearched { goal: Point, end: Point },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable { from, to } => write!(f, "no path from {from} to {to}"),
            Self::OutOfBounds(p) => write!(f, "point {p} is outside the grid"),
            Self::Unsearched { goal, end } => {
                write!(f, "search stopped at {goal} before settling {end}")
            }
        }
    }
}

impl std::error::Error for SearchError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::RunConstraints;
    use crucible_core::CostGrid;

    fn graph(s: &str, c: RunConstraints) -> StateGraph {
        StateGraph::build(&CostGrid::parse(s).unwrap(), c)
    }

    #[test]
    fn node_ref_pops_smallest_first() {
        let mut heap = BinaryHeap::new();
        for (idx, g) in [(0, 7), (1, 3), (2, 9), (3, 3)] {
            heap.push(NodeRef { idx, g });
        }
        let order: Vec<_> = std::iter::from_fn(|| heap.pop()).map(|n| n.g).collect();
        assert_eq!(order, vec![3, 3, 7, 9]);
    }

    #[test]
    fn settled_distances_are_non_decreasing() {
        let g = graph("2413\n3215\n3255\n3446", RunConstraints::CRUCIBLE);
        let res = search(&g, Point::ZERO).unwrap();
        let ds: Vec<_> = res
            .settled()
            .iter()
            .map(|&id| res.distance(id).unwrap())
            .collect();
        assert!(!ds.is_empty());
        assert!(ds.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn first_runs_have_no_predecessor() {
        let g = graph("19\n11", RunConstraints::CRUCIBLE);
        let res = search(&g, Point::ZERO).unwrap();
        for id in g.departures(Point::ZERO) {
            // The direct run is the cheapest way into each first-run state.
            assert_eq!(res.predecessor(id), Some(None));
            assert_eq!(res.distance(id), Some(g.vertex(id).run_weight));
        }
    }

    #[test]
    fn distance_equals_parent_plus_run() {
        let g = graph("2413\n3215\n3255\n3446", RunConstraints::new(1, 2).unwrap());
        let res = search(&g, Point::ZERO).unwrap();
        for &id in res.settled() {
            let d = res.distance(id).unwrap();
            let w = g.vertex(id).run_weight;
            match res.predecessor(id).unwrap() {
                None => assert_eq!(d, w),
                Some(p) => assert_eq!(d, res.distance(p).unwrap() + w),
            }
        }
    }

    #[test]
    fn search_to_stops_early() {
        let s = "2413432311\n3215453535\n3255245654\n3446585845";
        let g = graph(s, RunConstraints::CRUCIBLE);
        let full = search(&g, Point::ZERO).unwrap();
        let early = search_to(&g, Point::ZERO, Point::new(1, 0)).unwrap();
        assert!(early.settled().len() < full.settled().len());
        let last = *early.settled().last().unwrap();
        assert_eq!(g.vertex(last).position, Point::new(1, 0));
        assert_eq!(early.stopped_at(), Some(Point::new(1, 0)));
        assert_eq!(full.stopped_at(), None);
    }

    #[test]
    fn search_to_unreachable_goal_drains_the_queue() {
        let g = graph("11\n11", RunConstraints::ULTRA);
        let res = search_to(&g, Point::ZERO, Point::new(1, 1)).unwrap();
        assert_eq!(res.stopped_at(), None);
    }

    #[test]
    fn queue_entries_never_go_stale() {
        // Every edge into a vertex weighs that vertex's run, and predecessors
        // settle in distance order, so the first push is already the best.
        let g = graph(
            "2413432311\n3215453535\n3255245654\n3446585845",
            RunConstraints::CRUCIBLE,
        );
        let res = search(&g, Point::ZERO).unwrap();
        let stats = res.stats();
        assert_eq!(stats.stale, 0);
        assert_eq!(stats.pops, stats.pushes);
        assert_eq!(stats.pops, res.settled().len());

        let early = search_to(&g, Point::ZERO, Point::new(9, 3)).unwrap();
        assert!(early.stats().pops < stats.pops);
        assert!(early.stats().pushes >= early.stats().pops);
    }

    #[test]
    fn search_to_start_settles_nothing() {
        let g = graph("12\n34", RunConstraints::CRUCIBLE);
        let res = search_to(&g, Point::ZERO, Point::ZERO).unwrap();
        assert!(res.settled().is_empty());
        assert_eq!(res.origin(), Point::ZERO);
        assert_eq!(res.stopped_at(), Some(Point::ZERO));
    }

    #[test]
    fn out_of_bounds_points_are_rejected() {
        let g = graph("12\n34", RunConstraints::CRUCIBLE);
        assert_eq!(
            search(&g, Point::new(2, 0)).unwrap_err(),
            SearchError::OutOfBounds(Point::new(2, 0))
        );
        assert_eq!(
            search_to(&g, Point::ZERO, Point::new(0, -1)).unwrap_err(),
            SearchError::OutOfBounds(Point::new(0, -1))
        );
    }

    #[test]
    fn unreached_vertices_have_no_distance() {
        // Runs of exactly two on a 3x1 strip: from x=0 only x=2 is reachable,
        // and from there the only run goes back left, which needs a turn.
        let g = graph("111", RunConstraints::new(2, 2).unwrap());
        let res = search(&g, Point::ZERO).unwrap();
        assert_eq!(res.settled().len(), 1);
        let back = g.departures(Point::new(2, 0)).next().unwrap();
        assert_eq!(res.distance(back), None);
        assert_eq!(res.predecessor(back), None);
    }
}
