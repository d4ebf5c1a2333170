//! An immutable grid of non-negative cell costs.
//!
//! [`CostGrid`] is the read-only input of every search: each cell holds the
//! cost paid when *entering* it. Grids are rectangular, dense and non-empty;
//! these invariants are checked once at construction.

use std::fmt;
use std::str::FromStr;

use crate::geom::{Point, Range};

/// Cost of entering a single cell.
pub type Cost = u32;

/// A dense, rectangular, non-empty grid of cell costs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Vec<Cost>>", into = "Vec<Vec<Cost>>")
)]
pub struct CostGrid {
    cells: Vec<Cost>,
    bounds: Range,
}

impl CostGrid {
    /// Parse a grid written as one line per row and one decimal digit per
    /// cell.
    ///
    /// Leading/trailing whitespace is trimmed from the whole string but not
    /// from individual lines; a trailing `'\r'` on a line is ignored.
    pub fn parse(s: &str) -> Result<Self, GridError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(s.len());
        let mut width: Option<usize> = None;
        let mut height = 0;

        for (y, line) in s.lines().enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let mut found = 0;
            for (x, ch) in line.chars().enumerate() {
                let Some(cost) = ch.to_digit(10) else {
                    return Err(GridError::InvalidDigit {
                        ch,
                        pos: Point::new(x as i32, y as i32),
                    });
                };
                cells.push(cost);
                found += 1;
            }
            match width {
                None if found == 0 => return Err(GridError::Empty),
                None => width = Some(found),
                Some(expected) if expected != found => {
                    return Err(GridError::Ragged {
                        row: y,
                        expected,
                        found,
                    });
                }
                Some(_) => {}
            }
            height += 1;
        }

        let width = width.unwrap_or(0);
        Ok(Self {
            cells,
            bounds: Range::new(0, 0, width as i32, height),
        })
    }

    /// Build a grid from explicit rows of costs.
    pub fn from_rows<R: AsRef<[Cost]>>(rows: &[R]) -> Result<Self, GridError> {
        let Some(first) = rows.first() else {
            return Err(GridError::Empty);
        };
        let width = first.as_ref().len();
        if width == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(GridError::Ragged {
                    row: y,
                    expected: width,
                    found: row.len(),
                });
            }
            cells.extend_from_slice(row);
        }

        Ok(Self {
            cells,
            bounds: Range::new(0, 0, width as i32, rows.len() as i32),
        })
    }

    /// The grid rectangle, always anchored at the origin.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: construction rejects empty grids.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `p` lies on the grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    /// Cost of entering `p`, or `None` if `p` is off the grid.
    #[inline]
    pub fn cost_at(&self, p: Point) -> Option<Cost> {
        self.bounds.index_of(p).map(|i| self.cells[i])
    }

    /// The conventional entry cell.
    #[inline]
    pub fn top_left(&self) -> Point {
        self.bounds.min
    }

    /// The conventional exit cell.
    #[inline]
    pub fn bottom_right(&self) -> Point {
        self.bounds.max.shift(-1, -1)
    }

    /// Iterate over `(point, cost)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Cost)> + '_ {
        self.bounds.iter().zip(self.cells.iter().copied())
    }

    /// A new grid mirrored across the main diagonal.
    pub fn transpose(&self) -> Self {
        let bounds = Range::new(0, 0, self.height(), self.width());
        let cells = bounds
            .iter()
            .filter_map(|p| self.cost_at(p.transpose()))
            .collect();
        Self { cells, bounds }
    }

    /// The grid as owned rows.
    pub fn rows(&self) -> Vec<Vec<Cost>> {
        self.cells
            .chunks(self.width() as usize)
            .map(<[Cost]>::to_vec)
            .collect()
    }
}

impl FromStr for CostGrid {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Vec<Vec<Cost>>> for CostGrid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<Cost>>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl From<CostGrid> for Vec<Vec<Cost>> {
    fn from(grid: CostGrid) -> Self {
        grid.rows()
    }
}

impl fmt::Display for CostGrid {
    /// One line per row. Costs above 9 are written in full, so such grids
    /// do not parse back.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.cells.chunks(self.width() as usize).enumerate() {
            if y > 0 {
                f.write_str("\n")?;
            }
            for c in row {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

/// Errors that can occur when building a [`CostGrid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// No rows, or a first row without cells.
    Empty,
    /// A row's width differs from the first row's.
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A cell character is not a decimal digit.
    InvalidDigit { ch: char, pos: Point },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "grid: no cells"),
            Self::Ragged {
                row,
                expected,
                found,
            } => write!(
                f,
                "grid: row {row} has {found} cells, expected {expected}"
            ),
            Self::InvalidDigit { ch, pos } => {
                write!(f, "grid: invalid cell \u{201c}{ch}\u{201d} at {pos}")
            }
        }
    }
}

impl std::error::Error for GridError {}
