use super::HatchPattern;
use crate::errors::{HatchError, Result};
use crate::geo_types::grid::{SquareGrid, BOTTOM_LEFT, BOTTOM_RIGHT, TOP_LEFT, TOP_RIGHT};
use geo_types::{LineString, MultiLineString, Rect};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::str::FromStr;
use tracing::debug;

/// # Pattern
/// Which two corners of every grid cell get joined by a line. One segment
/// per cell; lined up across neighbouring cells they make continuous hatching.
///
/// | pattern      | corners                    | looks like |
/// |--------------|----------------------------|------------|
/// | `horizontal` | bottom-right, bottom-left  | `―`        |
/// | `vertical`   | bottom-left, top-left      | `│`        |
/// | `left2right` | bottom-right, top-left     | `╲`        |
/// | `right2left` | bottom-left, top-right     | `╱`        |
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum Pattern {
    Horizontal,
    Vertical,
    /// Falling diagonal, top-left to bottom-right.
    Left2Right,
    /// Rising diagonal, bottom-left to top-right.
    Right2Left,
}

impl Pattern {
    pub const ALL: [Pattern; 4] = [
        Pattern::Horizontal,
        Pattern::Vertical,
        Pattern::Left2Right,
        Pattern::Right2Left,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Horizontal => "horizontal",
            Pattern::Vertical => "vertical",
            Pattern::Left2Right => "left2right",
            Pattern::Right2Left => "right2left",
        }
    }

    /// Corner indices (see [`crate::geo_types::grid`]) joined in each cell.
    pub fn corners(&self) -> (usize, usize) {
        match self {
            Pattern::Horizontal => (BOTTOM_RIGHT, BOTTOM_LEFT),
            Pattern::Vertical => (BOTTOM_LEFT, TOP_LEFT),
            Pattern::Left2Right => (BOTTOM_RIGHT, TOP_LEFT),
            Pattern::Right2Left => (BOTTOM_LEFT, TOP_RIGHT),
        }
    }

    /// The pattern running at right angles to this one, for crosshatching.
    pub fn perpendicular(&self) -> Pattern {
        match self {
            Pattern::Horizontal => Pattern::Vertical,
            Pattern::Vertical => Pattern::Horizontal,
            Pattern::Left2Right => Pattern::Right2Left,
            Pattern::Right2Left => Pattern::Left2Right,
        }
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Pattern {
    type Err = HatchError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Pattern::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| HatchError::UnsupportedPattern(s.to_string()))
    }
}

impl TryFrom<String> for Pattern {
    type Error = HatchError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> String {
        pattern.name().to_string()
    }
}

impl HatchPattern for Pattern {
    fn generate(&self, bbox: &Rect<f64>, scale: f64) -> Result<MultiLineString<f64>> {
        let grid = SquareGrid::covering(bbox, scale)?;
        debug!(
            pattern = %self,
            columns = grid.columns(),
            rows = grid.rows(),
            "Generating hatch grid"
        );
        let (from, to) = self.corners();
        let lines = grid
            .cells()
            .map(|cell| LineString::new(vec![cell.corner(from), cell.corner(to)]))
            .collect();
        Ok(MultiLineString::new(lines))
    }
}
