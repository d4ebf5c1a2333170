use crucible_core::{CostGrid, Point};
use crucible_paths::{
    Distance, RunConstraints, SearchError, StateGraph, baseline, resolve, search, search_to, solve,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const EXAMPLE: &str = "\
2413432311
3215453535
3255245654
3446585845
4546657867
1438598798
4457876987
4430345675
1224686774
2546548887";

fn random_grid(rng: &mut StdRng) -> CostGrid {
    let w = rng.random_range(2..=8usize);
    let h = rng.random_range(2..=8usize);
    let rows: Vec<Vec<u32>> = (0..h)
        .map(|_| (0..w).map(|_| rng.random_range(0..=9u32)).collect())
        .collect();
    CostGrid::from_rows(&rows).unwrap()
}

/// Corner-to-corner cost, with "no path" mapped to infinity.
fn cost_or_inf(grid: &CostGrid, c: RunConstraints) -> Distance {
    match solve(grid, grid.top_left(), grid.bottom_right(), c) {
        Ok(s) => s.cost,
        Err(e) if e.is_unreachable() => Distance::MAX,
        Err(e) => panic!("unexpected error: {e}"),
    }
}

#[test]
fn example_answers() {
    let grid = CostGrid::parse(EXAMPLE).unwrap();
    assert_eq!(cost_or_inf(&grid, RunConstraints::CRUCIBLE), 77);
    assert_eq!(cost_or_inf(&grid, RunConstraints::ULTRA), 74);
}

#[test]
fn long_runs_match_unconstrained_dijkstra() {
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..40 {
        let grid = random_grid(&mut rng);
        let longest = grid.width().max(grid.height()) as u32;
        let c = RunConstraints::new(1, longest).unwrap();
        let plain = baseline::cell_costs(&grid, grid.bounds(), &[grid.top_left()]);
        assert_eq!(
            plain.at(grid.bottom_right()),
            Some(cost_or_inf(&grid, c)),
            "grid:\n{grid}"
        );
    }
}

#[test]
fn single_step_runs_must_zig_zag() {
    let single = RunConstraints::new(1, 1).unwrap();

    // A straight corridor needs two steps in a row.
    let strip = CostGrid::parse("111").unwrap();
    let plain = baseline::cell_costs(&strip, strip.bounds(), &[strip.top_left()]);
    assert_eq!(plain.at(strip.bottom_right()), Some(2));
    assert_eq!(cost_or_inf(&strip, single), Distance::MAX);

    // Alternating steps are all a diagonal needs.
    for text in ["11\n11", "19\n11", "121\n212\n121"] {
        let grid = CostGrid::parse(text).unwrap();
        let plain = baseline::cell_costs(&grid, grid.bounds(), &[grid.top_left()]);
        assert_eq!(
            plain.at(grid.bottom_right()),
            Some(cost_or_inf(&grid, single)),
            "{text}"
        );
    }
}

#[test]
fn raising_max_run_never_costs_more() {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..30 {
        let grid = random_grid(&mut rng);
        for min in 1..=3 {
            let costs: Vec<_> = (min..=8)
                .map(|max| cost_or_inf(&grid, RunConstraints::new(min, max).unwrap()))
                .collect();
            assert!(
                costs.windows(2).all(|w| w[1] <= w[0]),
                "min {min}: {costs:?}\n{grid}"
            );
        }
    }
}

#[test]
fn raising_min_run_never_costs_less() {
    let mut rng = StdRng::seed_from_u64(29);
    for _ in 0..30 {
        let grid = random_grid(&mut rng);
        let costs: Vec<_> = (1..=8)
            .map(|min| cost_or_inf(&grid, RunConstraints::new(min, 8).unwrap()))
            .collect();
        assert!(costs.windows(2).all(|w| w[1] >= w[0]), "{costs:?}\n{grid}");
    }
}

#[test]
fn repeated_searches_agree() {
    let grid = CostGrid::parse(EXAMPLE).unwrap();
    let graph = StateGraph::build(&grid, RunConstraints::ULTRA);
    let first = search(&graph, grid.top_left()).unwrap();
    for _ in 0..3 {
        let again = search(&graph, grid.top_left()).unwrap();
        assert_eq!(again.settled().len(), first.settled().len());
        assert_eq!(
            resolve(&graph, &again, grid.bottom_right()),
            resolve(&graph, &first, grid.bottom_right())
        );
    }
    assert_eq!(graph, StateGraph::build(&grid, RunConstraints::ULTRA));
}

#[test]
fn transposed_grid_gives_same_answer() {
    let mut rng = StdRng::seed_from_u64(31);
    let mut grids = vec![CostGrid::parse(EXAMPLE).unwrap()];
    grids.extend((0..20).map(|_| random_grid(&mut rng)));
    for grid in grids {
        let t = grid.transpose();
        for c in [RunConstraints::CRUCIBLE, RunConstraints::ULTRA] {
            assert_eq!(cost_or_inf(&grid, c), cost_or_inf(&t, c), "{c}\n{grid}");
        }
    }
}

#[test]
fn one_graph_many_queries() {
    let grid = CostGrid::parse(EXAMPLE).unwrap();
    let graph = StateGraph::build(&grid, RunConstraints::CRUCIBLE);
    let full = search(&graph, Point::new(4, 4)).unwrap();
    for end in grid.bounds() {
        let via_full = resolve(&graph, &full, end);
        let early = search_to(&graph, Point::new(4, 4), end).unwrap();
        assert_eq!(via_full, resolve(&graph, &early, end), "end {end}");
    }
}

#[test]
fn shared_graph_across_threads() {
    let grid = CostGrid::parse(EXAMPLE).unwrap();
    let graphs = [
        StateGraph::build(&grid, RunConstraints::CRUCIBLE),
        StateGraph::build(&grid, RunConstraints::ULTRA),
    ];
    let end = grid.bottom_right();
    let answers: Vec<_> = std::thread::scope(|s| {
        let handles: Vec<_> = graphs
            .iter()
            .map(|g| {
                s.spawn(move || {
                    let res = search(g, Point::ZERO)?;
                    resolve(g, &res, end)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(answers, vec![Ok(77), Ok(74)]);
}

#[test]
fn narrow_grid_unreachable_with_long_min_run() {
    let grid = CostGrid::parse("11\n11\n11\n11\n11\n11\n11\n11").unwrap();
    let err = solve(
        &grid,
        grid.top_left(),
        grid.bottom_right(),
        RunConstraints::ULTRA,
    )
    .unwrap_err();
    assert!(err.is_unreachable());
    assert_eq!(
        err,
        crucible_paths::Error::Search(SearchError::Unreachable {
            from: Point::new(0, 0),
            to: Point::new(1, 7),
        })
    );
}
