//! Cut closed solids **by altitude**: horizontal cross-section loops, repeated at a
//! regular spacing, and optional partition of the solid into bands.
//!
//! A cut grows a slab from the floor of the solid's bounding box up to the requested
//! altitude, intersects the slab with the solid, and keeps the new edges lying at
//! the lowest positive level. Cuts run inside journaled document operations, so a
//! failure part-way leaves the document exactly as it was.
//!
//! ```
//! use altcut::{Direction, Document, Mesh, cut_repeatedly, units::Length};
//!
//! let mut doc = Document::new();
//! let tower = doc.add_solid(&Mesh::cuboid(4000.0, 4000.0, 10000.0), "Tower").unwrap();
//! let report = cut_repeatedly(
//!     &mut doc,
//!     tower,
//!     Length::meters(2.0),
//!     5,
//!     Direction::BaseToTop,
//!     false,
//!     false,
//! )
//! .unwrap();
//! assert_eq!(report.cuts.len(), 5);
//! assert_eq!(report.edges.len(), 20);
//! ```
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//! - **parallel**: use rayon to intersect face pairs on multiple threads

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod bounds;
pub mod cut;
pub mod document;
pub mod errors;
pub mod float_types;
pub mod mesh;
pub mod traits;
pub mod units;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use bounds::BoundingBox;
pub use cut::{
    CutProgress, CutResult, CutSettings, CutState, Cutter, Direction, RepeatedCut,
    RepeatedCutParams, RepeatedCutReport, altitude_plan, cut, cut_repeatedly,
    partition_into_bands,
};
pub use document::{Document, EntityId, EntityKind};
pub use errors::{CutError, KernelError};
pub use mesh::Mesh;
pub use traits::GeometryKernel;
