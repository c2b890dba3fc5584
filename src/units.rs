//! Lengths expressed in a user-facing unit and mapped to the kernel's native millimetres.

use crate::float_types::{CM, FOOT, INCH, METER, MM, Real, YARD};
use std::fmt;

/// Units a caller may express altitudes and spacings in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LengthUnit {
    Millimeter,
    Centimeter,
    #[default]
    Meter,
    Inch,
    Foot,
    Yard,
}

impl LengthUnit {
    /// Native millimetres per one of this unit.
    pub const fn millimeters(self) -> Real {
        match self {
            LengthUnit::Millimeter => MM,
            LengthUnit::Centimeter => CM,
            LengthUnit::Meter => METER,
            LengthUnit::Inch => INCH,
            LengthUnit::Foot => FOOT,
            LengthUnit::Yard => YARD,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Millimeter => "mm",
            LengthUnit::Centimeter => "cm",
            LengthUnit::Meter => "m",
            LengthUnit::Inch => "in",
            LengthUnit::Foot => "ft",
            LengthUnit::Yard => "yd",
        }
    }
}

/// A scalar length tagged with its unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: Real,
    pub unit: LengthUnit,
}

impl Length {
    pub const fn new(value: Real, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    pub const fn meters(value: Real) -> Self {
        Self::new(value, LengthUnit::Meter)
    }

    pub const fn millimeters(value: Real) -> Self {
        Self::new(value, LengthUnit::Millimeter)
    }

    /// Build a length in `unit` from a native (millimetre) value.
    pub fn from_native(native: Real, unit: LengthUnit) -> Self {
        Self::new(native / unit.millimeters(), unit)
    }

    /// This length in native kernel units.
    pub fn to_native(self) -> Real {
        self.value * self.unit.millimeters()
    }

    /// The same length re-expressed in `unit`.
    pub fn in_unit(self, unit: LengthUnit) -> Self {
        Self::from_native(self.to_native(), unit)
    }

    pub fn is_finite(self) -> bool {
        self.value.is_finite()
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit.symbol())
    }
}
