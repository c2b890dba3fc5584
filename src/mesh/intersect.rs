//! Face-against-face intersection: the segments where two polygon sets cross.

use crate::float_types::{Real, weld_distance};
use crate::mesh::polygon::Polygon;
use nalgebra::Point3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A straight segment between two points.
pub type Segment = [Point3<Real>; 2];

/// A face together with its convex pieces, so clipping only ever sees convex rings.
struct Prepared<'a> {
    polygon: &'a Polygon,
    parts: Vec<Polygon>,
}

fn prepare(polygons: &[Polygon]) -> Vec<Prepared<'_>> {
    polygons
        .iter()
        .map(|polygon| Prepared {
            polygon,
            parts: polygon.convex_parts(),
        })
        .collect()
}

/// Segments along which one cutter face crosses one target face.
///
/// Parallel and coplanar pairs contribute nothing.
fn face_pair_segments(cutter: &Prepared, target: &Prepared) -> Vec<Segment> {
    let weld = weld_distance();
    if !cutter
        .polygon
        .bounding_box()
        .intersects(&target.polygon.bounding_box(), weld)
    {
        return Vec::new();
    }
    let Some((origin, direction)) = cutter.polygon.plane.intersection_line(&target.polygon.plane)
    else {
        return Vec::new();
    };

    let mut segments = Vec::new();
    for c in &cutter.parts {
        let Some((c0, c1)) = c.line_interval(&origin, &direction) else {
            continue;
        };
        for t in &target.parts {
            let Some((t0, t1)) = t.line_interval(&origin, &direction) else {
                continue;
            };
            let (start, end) = (c0.max(t0), c1.min(t1));
            if end - start > weld {
                segments.push([origin + direction * start, origin + direction * end]);
            }
        }
    }
    segments
}

fn same_segment(a: &Segment, b: &Segment, weld: Real) -> bool {
    let close = |p: &Point3<Real>, q: &Point3<Real>| (p - q).norm() <= weld;
    (close(&a[0], &b[0]) && close(&a[1], &b[1])) || (close(&a[0], &b[1]) && close(&a[1], &b[0]))
}

/// Every segment where a `cutters` face crosses a `targets` face, both sets given
/// in the same coordinate frame.
///
/// Segments repeated by neighbouring faces are reported once.
pub fn intersection_segments(cutters: &[Polygon], targets: &[Polygon]) -> Vec<Segment> {
    let cutters = prepare(cutters);
    let targets = prepare(targets);

    #[cfg(feature = "parallel")]
    let raw: Vec<Segment> = cutters
        .par_iter()
        .flat_map_iter(|c| targets.iter().flat_map(move |t| face_pair_segments(c, t)))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let raw: Vec<Segment> = cutters
        .iter()
        .flat_map(|c| targets.iter().flat_map(move |t| face_pair_segments(c, t)))
        .collect();

    let weld = weld_distance();
    let mut unique: Vec<Segment> = Vec::with_capacity(raw.len());
    for segment in raw {
        if !unique.iter().any(|u| same_segment(u, &segment, weld)) {
            unique.push(segment);
        }
    }
    unique
}
