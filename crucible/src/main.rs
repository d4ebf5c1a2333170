//! Crucible — cheapest constrained route across a digit grid.
//!
//! Reads a grid with one digit per cell, then prints the minimum total cost
//! of moving from the start cell to the end cell under each selected set of
//! run constraints. Without an explicit selection both presets are solved.

mod logging;

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use crucible_core::{CostGrid, Point};
use crucible_paths::{
    Distance, Route, RunConstraints, SearchError, StateGraph, baseline, resolve, search_to,
};
use serde::Serialize;

/// Exit status when some query has no legal route.
const EXIT_UNREACHABLE: u8 = 2;

#[derive(Parser)]
#[command(
    name = "crucible",
    version,
    about = "Cheapest constrained route across a digit grid"
)]
struct Cli {
    /// Grid file, one digit per cell. Reads stdin when absent or `-`.
    input: Option<PathBuf>,
    /// Run constraints: `crucible`, `ultra` or `MIN..=MAX`.
    #[arg(short, long)]
    runs: Option<RunConstraints>,
    /// Override the shortest legal run.
    #[arg(long)]
    min_run: Option<u32>,
    /// Override the longest legal run.
    #[arg(long)]
    max_run: Option<u32>,
    /// Start cell as `X,Y` (default: top-left).
    #[arg(long, value_parser = parse_point)]
    start: Option<Point>,
    /// End cell as `X,Y` (default: bottom-right).
    #[arg(long, value_parser = parse_point)]
    end: Option<Point>,
    /// Also print the cheapest route.
    #[arg(long)]
    route: bool,
    /// Also print the cost with no run constraints at all.
    #[arg(long)]
    baseline: bool,
    /// Emit a JSON report instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Report {
    start: Point,
    end: Point,
    #[serde(skip_serializing_if = "Option::is_none")]
    baseline: Option<Distance>,
    answers: Vec<Answer>,
}

#[derive(Debug, Serialize)]
struct Answer {
    label: String,
    constraints: RunConstraints,
    /// `None` when the end cell is unreachable.
    cost: Option<Distance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    route: Option<Route>,
}

fn main() -> ExitCode {
    logging::init();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let text = read_input(cli.input.as_ref())?;
    let report = build_report(&cli, &text)?;
    print!("{}", render(&report, cli.json)?);
    Ok(ExitCode::from(exit_status(&report)))
}

/// Solve every selected profile on the grid in `text`.
fn build_report(cli: &Cli, text: &str) -> Result<Report> {
    let grid = CostGrid::parse(text).context("parse grid")?;
    let start = cli.start.unwrap_or(grid.top_left());
    let end = cli.end.unwrap_or(grid.bottom_right());
    tracing::debug!(
        width = grid.width(),
        height = grid.height(),
        %start,
        %end,
        "grid loaded"
    );

    let mut answers = Vec::new();
    for (label, constraints) in profiles(cli)? {
        let graph = StateGraph::build(&grid, constraints);
        let result = search_to(&graph, start, end).with_context(|| format!("search {label}"))?;
        let stats = result.stats();
        tracing::debug!(
            %label,
            vertices = graph.len(),
            settled = result.settled().len(),
            pops = stats.pops,
            pushes = stats.pushes,
            "search finished"
        );
        let answer = match resolve(&graph, &result, end) {
            Ok(cost) => {
                let route = if cli.route {
                    Some(result.route_to(&graph, end)?)
                } else {
                    None
                };
                Answer {
                    label,
                    constraints,
                    cost: Some(cost),
                    route,
                }
            }
            Err(SearchError::Unreachable { .. }) => {
                tracing::info!(%label, %start, %end, "no legal route");
                Answer {
                    label,
                    constraints,
                    cost: None,
                    route: None,
                }
            }
            Err(err) => return Err(err).context("resolve goal"),
        };
        answers.push(answer);
    }

    let baseline = if cli.baseline {
        baseline::cell_costs(&grid, grid.bounds(), &[start]).at(end)
    } else {
        None
    };

    Ok(Report {
        start,
        end,
        baseline,
        answers,
    })
}

/// The report as text lines or pretty JSON, newline terminated.
fn render(report: &Report, json: bool) -> Result<String> {
    if json {
        let mut out = serde_json::to_string_pretty(report).context("serialize report")?;
        out.push('\n');
        return Ok(out);
    }
    let mut out = String::new();
    for a in &report.answers {
        match a.cost {
            Some(cost) => writeln!(out, "{}: {}", a.label, cost)?,
            None => writeln!(out, "{}: unreachable", a.label)?,
        }
        if let Some(route) = &a.route {
            for leg in &route.legs {
                writeln!(
                    out,
                    "  {} {} x{} (+{})",
                    leg.from, leg.direction, leg.length, leg.weight
                )?;
            }
        }
    }
    if let Some(b) = report.baseline {
        writeln!(out, "baseline: {b}")?;
    }
    Ok(out)
}

fn exit_status(report: &Report) -> u8 {
    if report.answers.iter().any(|a| a.cost.is_none()) {
        EXIT_UNREACHABLE
    } else {
        0
    }
}

/// The constraint sets to solve, with display labels.
fn profiles(cli: &Cli) -> Result<Vec<(String, RunConstraints)>> {
    if cli.runs.is_none() && cli.min_run.is_none() && cli.max_run.is_none() {
        return Ok(vec![
            ("crucible".to_string(), RunConstraints::CRUCIBLE),
            ("ultra".to_string(), RunConstraints::ULTRA),
        ]);
    }
    let base = cli.runs.unwrap_or_default();
    let c = RunConstraints::new(
        cli.min_run.unwrap_or(base.min_run()),
        cli.max_run.unwrap_or(base.max_run()),
    )
    .context("run constraints")?;
    Ok(vec![(label_for(c), c)])
}

fn label_for(c: RunConstraints) -> String {
    if c == RunConstraints::CRUCIBLE {
        "crucible".to_string()
    } else if c == RunConstraints::ULTRA {
        "ultra".to_string()
    } else {
        c.to_string()
    }
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(p) if p.as_os_str() != "-" => {
            fs::read_to_string(p).with_context(|| format!("read {}", p.display()))
        }
        _ => {
            let mut s = String::new();
            io::stdin().read_to_string(&mut s).context("read stdin")?;
            Ok(s)
        }
    }
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got \u{201c}{s}\u{201d}"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<i32>()
            .map_err(|e| format!("bad coordinate \u{201c}{v}\u{201d}: {e}"))
    };
    Ok(Point::new(coord(x)?, coord(y)?))
}
