use crate::errors::CutError;
use crate::float_types::Real;
use std::fmt;
use std::str::FromStr;

/// Order in which repeated cuts walk through a solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// First cut one spacing above the base, then upwards.
    #[default]
    BaseToTop,
    /// First cut one spacing below the top, then downwards.
    TopToBase,
    /// First cut at half height, then downwards.
    MiddleToBase,
    /// First cut at half height, then upwards.
    MiddleToTop,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::BaseToTop,
        Direction::TopToBase,
        Direction::MiddleToBase,
        Direction::MiddleToTop,
    ];

    /// The fixed label presented to users.
    pub const fn label(self) -> &'static str {
        match self {
            Direction::BaseToTop => "Base to top",
            Direction::TopToBase => "Top to base",
            Direction::MiddleToBase => "Middle to base",
            Direction::MiddleToTop => "Middle to top",
        }
    }

    /// `(first altitude, step)` for a solid `height` tall, both in the spacing's unit.
    pub fn start_and_step(self, height: Real, spacing: Real) -> (Real, Real) {
        match self {
            Direction::BaseToTop => (spacing, spacing),
            Direction::TopToBase => (height - spacing, -spacing),
            Direction::MiddleToBase => (height / 2.0, -spacing),
            Direction::MiddleToTop => (height / 2.0, spacing),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Direction {
    type Err = CutError;

    /// Labels match case-insensitively, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Direction::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CutError::InvalidArgument(format!("unknown direction '{s}'")))
    }
}
