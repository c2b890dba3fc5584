//! The single-cut primitive: one horizontal cross-section of a solid.

use crate::cut::settings::CutSettings;
use crate::document::{EntityId, EntityKind};
use crate::errors::{CutError, KernelError};
use crate::float_types::{Real, tolerance};
use crate::traits::GeometryKernel;
use crate::units::Length;
use hashbrown::HashSet;
use nalgebra::{Matrix4, Point3};
use std::collections::BTreeMap;
use tracing::{debug, error, info};

/// Cross-section edges produced by one cut.
#[derive(Debug, Clone, PartialEq)]
pub struct CutResult {
    /// Altitude of the selected level above the solid's base, in the caller's unit.
    pub altitude: Length,
    /// New edges of the solid lying at that altitude.
    pub edges: Vec<EntityId>,
}

/// Cuts solids one altitude at a time.
#[derive(Debug, Clone, Default)]
pub struct Cutter {
    settings: CutSettings,
}

/// Cut `solid` at `altitude` with default settings.
///
/// ```
/// use altcut::{Document, Mesh, cut, units::Length};
///
/// let mut doc = Document::new();
/// let solid = doc.add_solid(&Mesh::cuboid(4000.0, 3000.0, 10000.0), "Tower").unwrap();
/// let result = cut(&mut doc, solid, Length::meters(4.0)).unwrap();
/// assert_eq!(result.altitude, Length::meters(4.0));
/// assert_eq!(result.edges.len(), 4);
/// ```
pub fn cut<K: GeometryKernel + ?Sized>(
    kernel: &mut K,
    solid: EntityId,
    altitude: Length,
) -> Result<CutResult, CutError> {
    Cutter::default().cut(kernel, solid, altitude)
}

impl Cutter {
    pub const fn new(settings: CutSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &CutSettings {
        &self.settings
    }

    /// Cut `solid` at `altitude` inside one document operation.
    ///
    /// Arguments are checked before anything is touched; once the operation is open
    /// every failure rolls the document back before it is returned.
    pub fn cut<K: GeometryKernel + ?Sized>(
        &self,
        kernel: &mut K,
        solid: EntityId,
        altitude: Length,
    ) -> Result<CutResult, CutError> {
        validate_solid(kernel, solid)?;
        validate_length(altitude, "altitude")?;

        let operation = self.settings.operation_name.as_str();
        kernel.start_operation(operation)?;
        info!(%solid, %altitude, "cut by altitude");

        match self.cut_within_operation(kernel, solid, altitude) {
            Ok(result) => match kernel.commit_operation() {
                Ok(()) => {
                    info!(%solid, altitude = %result.altitude, edges = result.edges.len(), "cut committed");
                    Ok(result)
                },
                Err(e) => Err(abort(kernel, operation, e.into())),
            },
            Err(e) => Err(abort(kernel, operation, e)),
        }
    }

    /// The cut itself; the caller owns the surrounding operation.
    pub(crate) fn cut_within_operation<K: GeometryKernel + ?Sized>(
        &self,
        kernel: &mut K,
        solid: EntityId,
        altitude: Length,
    ) -> Result<CutResult, CutError> {
        let quantum = self.settings.altitude_tolerance.to_native().max(tolerance());
        let rise = altitude.to_native();

        let parent = kernel.parent(solid)?;
        let transform = kernel.transformation(solid)?;
        let inverse = transform
            .try_inverse()
            .ok_or(KernelError::SingularTransform(solid))?;
        let bounds = kernel.bounds(solid)?;
        let height = bounds.height();

        if rise < quantum {
            return Err(CutError::GeometryOperationFailed(format!(
                "altitude {altitude} leaves no cross-section above the base"
            )));
        }
        if rise > height + quantum {
            return Err(CutError::GeometryOperationFailed(format!(
                "altitude {altitude} is above the top of the solid ({})",
                Length::from_native(height, altitude.unit)
            )));
        }

        let before: HashSet<EntityId> = kernel.edges(solid)?.into_iter().collect();

        let floor = [0, 2, 3, 1].map(|i| bounds.corner(i));
        let slab = add_slab(kernel, parent, &floor, rise)?;
        kernel.intersect_with(true, &Matrix4::identity(), solid, &transform, true, slab)?;
        kernel.erase(slab)?;

        let base = inverse.transform_point(&bounds.corner(0)).z;
        let mut levels: BTreeMap<i64, Vec<EntityId>> = BTreeMap::new();
        for edge in kernel.edges(solid)? {
            if before.contains(&edge) {
                continue;
            }
            let [start, end] = kernel.edge_points(edge)?;
            // only level edges can belong to a horizontal cross-section
            if (start.z - end.z).abs() >= quantum {
                continue;
            }
            let level = ((end.z - base) / quantum).round() as i64;
            if level != 0 {
                levels.entry(level).or_default().push(edge);
            }
        }

        debug!(%solid, levels = ?levels.keys().collect::<Vec<_>>(), "intersection levels");
        let (level, edges) = levels
            .into_iter()
            .find(|(level, _)| *level > 0)
            .ok_or_else(|| {
                CutError::GeometryOperationFailed(format!(
                    "intersection at {altitude} produced no cross-section"
                ))
            })?;

        // a section on the requested level reports the caller's value unchanged
        let altitude = if level == (rise / quantum).round() as i64 {
            altitude
        } else {
            Length::from_native(level as Real * quantum, altitude.unit)
        };
        Ok(CutResult { altitude, edges })
    }
}

/// Build a prism standing on the horizontal rectangle `floor`, `rise` tall, as a
/// group under `parent`.
pub(crate) fn add_slab<K: GeometryKernel + ?Sized>(
    kernel: &mut K,
    parent: Option<EntityId>,
    floor: &[Point3<Real>; 4],
    rise: Real,
) -> Result<EntityId, KernelError> {
    let face = kernel.add_face(parent, floor)?;
    if kernel.face_normal(face)?.z < 0.0 {
        kernel.reverse_face(face)?;
    }
    let prism = kernel.pushpull(face, rise, false)?;
    kernel.add_group(parent, &prism)
}

/// `solid` must be a live group enclosing a volume.
pub(crate) fn validate_solid<K: GeometryKernel + ?Sized>(
    kernel: &K,
    solid: EntityId,
) -> Result<(), CutError> {
    match kernel.kind(solid) {
        Ok(EntityKind::Group) => {},
        Ok(kind) => {
            return Err(CutError::InvalidArgument(format!(
                "entity {solid} is a {kind}, not a group"
            )));
        },
        Err(e) => return Err(CutError::InvalidArgument(e.to_string())),
    }
    match kernel.is_closed_volume(solid) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CutError::InvalidArgument(format!(
            "group {solid} is not a closed volume"
        ))),
        Err(e) => Err(CutError::InvalidArgument(e.to_string())),
    }
}

pub(crate) fn validate_length(length: Length, what: &str) -> Result<(), CutError> {
    if length.is_finite() {
        Ok(())
    } else {
        Err(CutError::InvalidArgument(format!("{what} must be a number, got {}", length.value)))
    }
}

/// Roll back the open operation and label `err` accordingly.
pub(crate) fn abort<K: GeometryKernel + ?Sized>(
    kernel: &mut K,
    operation: &str,
    err: CutError,
) -> CutError {
    if let Err(rollback) = kernel.abort_operation() {
        error!(operation, error = %rollback, "rollback failed");
    }
    error!(operation, error = %err, "operation aborted");
    err.aborted(operation)
}
