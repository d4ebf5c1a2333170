//! State-augmented movement graph.
//!
//! A plain cell graph cannot express "at most `max_run` cells in a straight
//! line, then turn". [`StateGraph`] expands the grid instead: every legal
//! straight run becomes one [`Vertex`] at the cell where the run ends,
//! remembering where it started, which way it went and what it cost. An
//! [`Edge`] leads from a vertex to every run that starts at its position and
//! heads off perpendicular to it, so reversing and carrying straight on are
//! both impossible by construction.
//!
//! The graph is index-based: vertices live in one flat array and adjacency
//! is stored in compressed offset/target form.

use crucible_core::{CostGrid, Direction, Point, Range};

use crate::constraints::RunConstraints;

/// Sum of cell costs along a path.
pub type Distance = u64;

/// Index of a [`Vertex`] in a [`StateGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub(crate) usize);

impl VertexId {
    /// Position in the graph's vertex array.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One straight run: the state of a mover that just stopped at `position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vertex {
    /// Cell the run ends on.
    pub position: Point,
    /// Decision point the run started from (not included in `run_weight`).
    pub source: Point,
    /// Direction of travel along the run.
    pub arrival: Direction,
    /// Number of cells covered, within the graph's constraints.
    pub length: u32,
    /// Sum of the entry costs of every covered cell.
    pub run_weight: Distance,
}

/// A directed, weighted edge to the next run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub to: VertexId,
    /// Always the target's `run_weight`.
    pub weight: Distance,
}

/// The expanded graph of legal runs over a [`CostGrid`].
///
/// Built once by [`StateGraph::build`] and read-only afterwards; it holds no
/// interior mutability and can be shared across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateGraph {
    bounds: Range,
    constraints: RunConstraints,
    vertices: Vec<Vertex>,
    // vertices whose run starts at cell `i` are `departures[i]..departures[i + 1]`
    departures: Vec<usize>,
    edge_offsets: Vec<usize>,
    edges: Vec<Edge>,
    arrival_offsets: Vec<usize>,
    arrivals: Vec<VertexId>,
}

impl StateGraph {
    /// Expand `grid` into every run allowed by `constraints`.
    ///
    /// Vertices are numbered in row-major order of their source cell, then
    /// by direction in [`Direction::ALL`] order, then by increasing length,
    /// so the result depends only on the inputs.
    pub fn build(grid: &CostGrid, constraints: RunConstraints) -> Self {
        let bounds = grid.bounds();
        let cells = bounds.len();
        let min_run = constraints.min_run();
        let max_run = constraints.max_run();

        let mut vertices = Vec::new();
        let mut departures = Vec::with_capacity(cells + 1);

        for source in bounds {
            departures.push(vertices.len());
            for dir in Direction::ALL {
                let mut run_weight: Distance = 0;
                for len in 1..=max_run {
                    // max_run may exceed the grid size; stop at the border.
                    let Some(cost) = grid.cost_at(source.step(dir, len as i32)) else {
                        break;
                    };
                    run_weight += Distance::from(cost);
                    if len < min_run {
                        continue;
                    }
                    vertices.push(Vertex {
                        position: source.step(dir, len as i32),
                        source,
                        arrival: dir,
                        length: len,
                        run_weight,
                    });
                }
            }
        }
        departures.push(vertices.len());

        // Adjacency: every perpendicular run departing from where we stopped.
        let mut edge_offsets = Vec::with_capacity(vertices.len() + 1);
        let mut edges = Vec::new();
        for v in &vertices {
            edge_offsets.push(edges.len());
            let Some(ci) = bounds.index_of(v.position) else {
                continue;
            };
            for (ni, next) in vertices
                .iter()
                .enumerate()
                .take(departures[ci + 1])
                .skip(departures[ci])
            {
                if next.arrival.is_perpendicular(v.arrival) {
                    edges.push(Edge {
                        to: VertexId(ni),
                        weight: next.run_weight,
                    });
                }
            }
        }
        edge_offsets.push(edges.len());

        // Arrivals: counting sort of vertex ids by end cell.
        let mut arrival_offsets = vec![0usize; cells + 1];
        for v in &vertices {
            if let Some(ci) = bounds.index_of(v.position) {
                arrival_offsets[ci + 1] += 1;
            }
        }
        for i in 0..cells {
            arrival_offsets[i + 1] += arrival_offsets[i];
        }
        let mut fill = arrival_offsets.clone();
        let mut arrivals = vec![VertexId(0); vertices.len()];
        for (vi, v) in vertices.iter().enumerate() {
            if let Some(ci) = bounds.index_of(v.position) {
                arrivals[fill[ci]] = VertexId(vi);
                fill[ci] += 1;
            }
        }

        log::debug!(
            "state graph: {}x{} grid, runs {}, {} vertices, {} edges",
            bounds.width(),
            bounds.height(),
            constraints,
            vertices.len(),
            edges.len()
        );

        Self {
            bounds,
            constraints,
            vertices,
            departures,
            edge_offsets,
            edges,
            arrival_offsets,
            arrivals,
        }
    }

    /// The rectangle of the grid this graph was built from.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// The constraints this graph encodes.
    #[inline]
    pub fn constraints(&self) -> RunConstraints {
        self.constraints
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the graph has no vertices (every run would leave the grid).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The vertex with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this graph.
    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }

    /// All vertices, indexed by [`VertexId::index`].
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Outgoing edges of `id`.
    #[inline]
    pub fn edges(&self, id: VertexId) -> &[Edge] {
        &self.edges[self.edge_offsets[id.0]..self.edge_offsets[id.0 + 1]]
    }

    /// Ids of the runs starting at `p`, in every direction. Empty off-grid.
    pub fn departures(&self, p: Point) -> impl Iterator<Item = VertexId> + '_ {
        let (lo, hi) = match self.bounds.index_of(p) {
            Some(ci) => (self.departures[ci], self.departures[ci + 1]),
            None => (0, 0),
        };
        (lo..hi).map(VertexId)
    }

    /// Ids of the runs ending at `p`: every variant of that cell.
    pub fn arrivals(&self, p: Point) -> &[VertexId] {
        match self.bounds.index_of(p) {
            Some(ci) => &self.arrivals[self.arrival_offsets[ci]..self.arrival_offsets[ci + 1]],
            None => &[],
        }
    }
}
