//! Splitting a solid into horizontal bands at cut altitudes.

use crate::cut::settings::CutSettings;
use crate::cut::single::{abort, add_slab, validate_length, validate_solid};
use crate::document::EntityId;
use crate::errors::CutError;
use crate::float_types::{Real, tolerance};
use crate::traits::GeometryKernel;
use crate::units::Length;
use nalgebra::Point3;
use tracing::{debug, info};

/// Replace `solid` by one group per band between the given altitudes, with default settings.
///
/// Altitudes are measured from the base of the solid's bounding box. Those at or
/// outside the base and top are ignored; with none left the solid is kept as is.
pub fn partition_into_bands<K: GeometryKernel + ?Sized>(
    kernel: &mut K,
    solid: EntityId,
    altitudes: &[Length],
) -> Result<Vec<EntityId>, CutError> {
    partition_into_bands_with(kernel, solid, altitudes, &CutSettings::default())
}

pub fn partition_into_bands_with<K: GeometryKernel + ?Sized>(
    kernel: &mut K,
    solid: EntityId,
    altitudes: &[Length],
    settings: &CutSettings,
) -> Result<Vec<EntityId>, CutError> {
    validate_solid(kernel, solid)?;
    for &altitude in altitudes {
        validate_length(altitude, "altitude")?;
    }
    let levels: Vec<Real> = altitudes.iter().map(|a| a.to_native()).collect();

    let operation = settings.operation_name.as_str();
    kernel.start_operation(operation)?;
    let outcome = partition_within_operation(kernel, solid, &levels, settings)
        .and_then(|bands| kernel.commit_operation().map(|()| bands).map_err(CutError::from));
    outcome.map_err(|e| abort(kernel, operation, e))
}

/// Band partition inside an already open operation; `levels` are native lengths.
pub(crate) fn partition_within_operation<K: GeometryKernel + ?Sized>(
    kernel: &mut K,
    solid: EntityId,
    levels: &[Real],
    settings: &CutSettings,
) -> Result<Vec<EntityId>, CutError> {
    let bounds = kernel.bounds(solid)?;
    let parent = kernel.parent(solid)?;
    let height = bounds.height();
    let slack = settings.altitude_tolerance.to_native().max(tolerance());

    let mut cuts: Vec<Real> = levels
        .iter()
        .copied()
        .filter(|&z| z > slack && z < height - slack)
        .collect();
    cuts.sort_by(Real::total_cmp);
    cuts.dedup_by(|a, b| (*a - *b).abs() < slack);
    if cuts.is_empty() {
        debug!(%solid, "no interior level, solid left whole");
        return Ok(Vec::new());
    }

    // slabs overhang the solid so their sides never coincide with its faces
    let margin = bounds.width().max(bounds.depth()).max(height) * 0.1 + 1.0;
    let (min, max) = (bounds.min(), bounds.max());
    let floor = |z: Real| {
        [
            Point3::new(min.x - margin, min.y - margin, z),
            Point3::new(min.x - margin, max.y + margin, z),
            Point3::new(max.x + margin, max.y + margin, z),
            Point3::new(max.x + margin, min.y - margin, z),
        ]
    };

    let mut edges = Vec::with_capacity(cuts.len() + 2);
    edges.push(-margin);
    edges.extend(cuts.iter().copied());
    edges.push(height + margin);

    let mut bands = Vec::with_capacity(edges.len() - 1);
    for (n, pair) in edges.windows(2).enumerate() {
        let (low, high) = (min.z + pair[0], min.z + pair[1]);
        let slab = add_slab(kernel, parent, &floor(low), high - low)?;
        let band = kernel.intersect_solids(solid, slab)?;
        kernel.erase(slab)?;
        if let Some(band) = band {
            kernel.set_name(band, &format!("{} {}", settings.band_name, n + 1))?;
            bands.push(band);
        }
    }
    kernel.erase(solid)?;

    info!(%solid, bands = bands.len(), "partitioned into bands");
    Ok(bands)
}
