//! Run-length constraints on straight-line movement.

use std::fmt;
use std::str::FromStr;

/// How far a mover must and may travel in a straight line before turning.
///
/// Every run covers between `min_run` and `max_run` cells (inclusive). The
/// fields are private so a value is always valid: `1 <= min_run <= max_run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawConstraints", into = "RawConstraints")
)]
pub struct RunConstraints {
    min_run: u32,
    max_run: u32,
}

impl RunConstraints {
    /// The ordinary crucible: runs of one to three cells.
    pub const CRUCIBLE: Self = Self {
        min_run: 1,
        max_run: 3,
    };

    /// The ultra crucible: runs of four to ten cells.
    pub const ULTRA: Self = Self {
        min_run: 4,
        max_run: 10,
    };

    /// Validate and build a constraint pair.
    pub fn new(min_run: u32, max_run: u32) -> Result<Self, ConstraintError> {
        if min_run < 1 {
            return Err(ConstraintError::ZeroMinRun);
        }
        if max_run < min_run {
            return Err(ConstraintError::MaxBelowMin { min_run, max_run });
        }
        Ok(Self { min_run, max_run })
    }

    /// Shortest legal run.
    #[inline]
    pub fn min_run(self) -> u32 {
        self.min_run
    }

    /// Longest legal run.
    #[inline]
    pub fn max_run(self) -> u32 {
        self.max_run
    }

    /// Whether a run of `len` cells is legal.
    #[inline]
    pub fn allows(self, len: u32) -> bool {
        (self.min_run..=self.max_run).contains(&len)
    }
}

impl Default for RunConstraints {
    fn default() -> Self {
        Self::CRUCIBLE
    }
}

impl fmt::Display for RunConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.min_run, self.max_run)
    }
}

impl FromStr for RunConstraints {
    type Err = ConstraintError;

    /// Accepts `crucible`, `ultra`, `MIN..=MAX`, or `MIN..MAX` (both bounds
    /// inclusive either way).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "crucible" => return Ok(Self::CRUCIBLE),
            "ultra" => return Ok(Self::ULTRA),
            _ => {}
        }
        let (lo, hi) = s
            .split_once("..=")
            .or_else(|| s.split_once(".."))
            .ok_or_else(|| ConstraintError::Syntax(s.to_string()))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|_| ConstraintError::Syntax(s.to_string()))
        };
        Self::new(parse(lo)?, parse(hi)?)
    }
}

/// Unchecked wire form of [`RunConstraints`].
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawConstraints {
    min_run: u32,
    max_run: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<RawConstraints> for RunConstraints {
    type Error = ConstraintError;

    fn try_from(raw: RawConstraints) -> Result<Self, Self::Error> {
        Self::new(raw.min_run, raw.max_run)
    }
}

#[cfg(feature = "serde")]
impl From<RunConstraints> for RawConstraints {
    fn from(c: RunConstraints) -> Self {
        Self {
            min_run: c.min_run,
            max_run: c.max_run,
        }
    }
}

/// Invalid run-length constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    /// `min_run` was zero; every run must move at least one cell.
    ZeroMinRun,
    /// `max_run` was smaller than `min_run`.
    MaxBelowMin { min_run: u32, max_run: u32 },
    /// A textual constraint could not be parsed.
    Syntax(String),
}

impl fmt::Display for ConstraintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroMinRun => write!(f, "constraints: min_run must be at least 1"),
            Self::MaxBelowMin { min_run, max_run } => write!(
                f,
                "constraints: max_run {max_run} is below min_run {min_run}"
            ),
            Self::Syntax(s) => write!(
                f,
                "constraints: cannot parse \u{201c}{s}\u{201d} (expected crucible, ultra or MIN..=MAX)"
            ),
        }
    }
}

impl std::error::Error for ConstraintError {}
