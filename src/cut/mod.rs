//! Cutting solids by altitude.
//!
//! - [`single`]: one cross-section at one altitude.
//! - [`repeated`]: a sequence of cuts at regular spacing, walked in a [`Direction`].
//! - [`bands`]: replacing a solid by the slices between cut altitudes.

pub mod bands;
pub mod direction;
pub mod repeated;
pub mod settings;
pub mod single;

pub use bands::{partition_into_bands, partition_into_bands_with};
pub use direction::Direction;
pub use repeated::{
    CutProgress, CutState, RepeatedCut, RepeatedCutParams, RepeatedCutReport, altitude_plan,
    cut_repeatedly, whole_solid_count,
};
pub use settings::CutSettings;
pub use single::{CutResult, Cutter, cut};
