//! Tunable names and tolerances shared by every cutting operation.

use crate::units::Length;

/// Settings for single and repeated cuts.
#[derive(Debug, Clone, PartialEq)]
pub struct CutSettings {
    /// Edges whose altitudes differ by less than this are treated as one level.
    pub altitude_tolerance: Length,

    /// Name of the document operation wrapping each cut.
    pub operation_name: String,

    /// Base name of the group collecting cross-section edges.
    pub cut_lines_name: String,

    /// Base name of the groups produced by band partitioning.
    pub band_name: String,
}

impl Default for CutSettings {
    fn default() -> Self {
        Self {
            altitude_tolerance: Length::millimeters(1.0),
            operation_name: "Cut By Altitude".to_string(),
            cut_lines_name: "Cut lines".to_string(),
            band_name: "Band".to_string(),
        }
    }
}

impl CutSettings {
    /// Set altitude tolerance.
    #[must_use]
    pub fn with_altitude_tolerance(mut self, tolerance: Length) -> Self {
        self.altitude_tolerance = tolerance;
        self
    }

    /// Set operation name.
    #[must_use]
    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = name.into();
        self
    }

    /// Set the cut-lines group name.
    #[must_use]
    pub fn with_cut_lines_name(mut self, name: impl Into<String>) -> Self {
        self.cut_lines_name = name.into();
        self
    }

    #[must_use]
    pub fn with_band_name(mut self, name: impl Into<String>) -> Self {
        self.band_name = name.into();
        self
    }
}
