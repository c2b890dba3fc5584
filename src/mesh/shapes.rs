//! Closed primitive solids: boxes, prisms, cylinders and lofts between two rings.

use crate::float_types::{PI, Real, tolerance};
use crate::mesh::Mesh;
use crate::mesh::polygon::Polygon;
use nalgebra::{Point2, Point3};

/// Twice the signed area of a 2D ring; positive when counter-clockwise.
fn signed_area2(ring: &[Point2<Real>]) -> Real {
    ring.iter()
        .zip(ring.iter().cycle().skip(1))
        .map(|(a, b)| a.x * b.y - b.x * a.y)
        .sum()
}

/// A side face between two rings; split into two triangles when the quad is warped.
fn side_faces(
    b0: Point3<Real>,
    b1: Point3<Real>,
    t1: Point3<Real>,
    t0: Point3<Real>,
) -> Vec<Polygon> {
    let mut ring = vec![b0, b1, t1, t0];
    ring.dedup_by(|a, b| (*a - *b).norm() < tolerance());
    if ring.len() > 1 && (ring[0] - ring[ring.len() - 1]).norm() < tolerance() {
        ring.pop();
    }
    match Polygon::new(ring.clone()) {
        Some(quad) if quad.max_plane_deviation().1 < tolerance() => vec![quad],
        _ => [vec![b0, b1, t1], vec![b0, t1, t0]]
            .into_iter()
            .filter_map(Polygon::new)
            .collect(),
    }
}

impl Mesh {
    /// Axis-aligned box spanning `[0, width] × [0, depth] × [0, height]`.
    ///
    /// ```
    /// # use altcut::mesh::Mesh;
    /// let b = Mesh::cuboid(2.0, 3.0, 4.0);
    /// assert_eq!(b.polygons.len(), 6);
    /// ```
    pub fn cuboid(width: Real, depth: Real, height: Real) -> Mesh {
        let footprint = [
            Point2::new(0.0, 0.0),
            Point2::new(width, 0.0),
            Point2::new(width, depth),
            Point2::new(0.0, depth),
        ];
        Self::prism(&footprint, height)
    }

    /// Extrude a simple 2D footprint from `z = 0` up to `z = height`.
    ///
    /// The footprint may be concave and may be wound either way.
    pub fn prism(footprint: &[Point2<Real>], height: Real) -> Mesh {
        let mut ring = footprint.to_vec();
        if signed_area2(&ring) < 0.0 {
            ring.reverse();
        }
        let bottom: Vec<Point3<Real>> = ring.iter().map(|p| Point3::new(p.x, p.y, 0.0)).collect();
        let top: Vec<Point3<Real>> = ring.iter().map(|p| Point3::new(p.x, p.y, height)).collect();
        Self::loft(&bottom, &top)
    }

    /// Upright cylinder approximated by `segments` flat sides, centred on the Z axis.
    pub fn cylinder(radius: Real, height: Real, segments: usize) -> Mesh {
        let segments = segments.max(3);
        let footprint: Vec<Point2<Real>> = (0..segments)
            .map(|i| {
                let theta = 2.0 * PI * i as Real / segments as Real;
                Point2::new(radius * theta.cos(), radius * theta.sin())
            })
            .collect();
        Self::prism(&footprint, height)
    }

    /// Square frustum centred on the Z axis, `bottom` and `top` being side lengths.
    pub fn frustum(bottom: Real, top: Real, height: Real) -> Mesh {
        let square = |side: Real, z: Real| -> Vec<Point3<Real>> {
            let h = side / 2.0;
            vec![
                Point3::new(-h, -h, z),
                Point3::new(h, -h, z),
                Point3::new(h, h, z),
                Point3::new(-h, h, z),
            ]
        };
        Self::loft(&square(bottom, 0.0), &square(top, height))
    }

    /// Join two rings of equal length with side faces and cap both ends.
    ///
    /// `bottom` must be counter-clockwise seen from above and lie below `top`.
    /// A top ring collapsed to a point yields a pyramid without a top cap.
    pub fn loft(bottom: &[Point3<Real>], top: &[Point3<Real>]) -> Mesh {
        let n = bottom.len().min(top.len());
        let mut polygons = Vec::with_capacity(n + 2);

        let mut floor = bottom[..n].to_vec();
        floor.reverse();
        polygons.extend(Polygon::new(floor));
        polygons.extend(Polygon::new(top[..n].to_vec()));

        for i in 0..n {
            let j = (i + 1) % n;
            polygons.extend(side_faces(bottom[i], bottom[j], top[j], top[i]));
        }

        Mesh::from_polygons(&polygons)
    }
}
