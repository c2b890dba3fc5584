//! Planar polygons: the faces solids are made of.

use crate::bounds::BoundingBox;
use crate::float_types::{Real, tolerance};
use crate::mesh::plane::Plane;
use geo::{Coord, LineString, Polygon as GeoPolygon, TriangulateEarcut};
use nalgebra::{Matrix4, Point3, Vector3};
use std::sync::OnceLock;

/// A planar polygon, wound counter-clockwise around `plane.normal`.
#[derive(Debug, Clone)]
pub struct Polygon {
    pub vertices: Vec<Point3<Real>>,

    /// The plane on which this polygon lies
    pub plane: Plane,

    /// Lazily-computed bounding box
    pub bounding_box: OnceLock<BoundingBox>,
}

impl PartialEq for Polygon {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices && self.plane == other.plane
    }
}

impl Polygon {
    /// Build a polygon from a ring of points, deriving its plane with Newell's method.
    ///
    /// Returns `None` if the ring has fewer than three points or encloses no area.
    pub fn new(vertices: Vec<Point3<Real>>) -> Option<Self> {
        let plane = Plane::from_ring(&vertices)?;
        Some(Self::with_plane(vertices, plane))
    }

    /// Build a polygon on a known plane (used when splitting).
    pub fn with_plane(vertices: Vec<Point3<Real>>, plane: Plane) -> Self {
        Polygon {
            vertices,
            plane,
            bounding_box: OnceLock::new(),
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        *self.bounding_box.get_or_init(|| {
            BoundingBox::from_points(self.vertices.iter()).unwrap_or_else(|| {
                BoundingBox::new(Point3::origin(), Point3::origin())
            })
        })
    }

    /// Reverse winding order and flip the plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }

    pub fn flipped(&self) -> Polygon {
        let mut p = self.clone();
        p.flip();
        p
    }

    /// Apply a homogeneous transform; the plane is re-derived from the moved ring.
    pub fn transform(&self, matrix: &Matrix4<Real>) -> Polygon {
        let vertices: Vec<Point3<Real>> = self
            .vertices
            .iter()
            .map(|p| matrix.transform_point(p))
            .collect();
        let plane = Plane::from_ring(&vertices).unwrap_or_else(|| self.plane.clone());
        Polygon::with_plane(vertices, plane)
    }

    pub fn translate(&self, offset: Vector3<Real>) -> Polygon {
        let vertices = self.vertices.iter().map(|p| p + offset).collect();
        let w = self.plane.w + self.plane.normal.dot(&offset);
        Polygon::with_plane(vertices, Plane::from_normal(self.plane.normal, w))
    }

    /// Consecutive `(start, end)` vertex pairs, closing back to the first vertex.
    pub fn edges(&self) -> impl Iterator<Item = (Point3<Real>, Point3<Real>)> + '_ {
        self.vertices
            .iter()
            .zip(self.vertices.iter().cycle().skip(1))
            .map(|(a, b)| (*a, *b))
    }

    /// Largest distance of any vertex from the polygon plane, with its index.
    pub fn max_plane_deviation(&self) -> (usize, Real) {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (i, self.plane.signed_distance(v).abs()))
            .fold((0, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best })
    }

    /// Area via the projected Newell sum.
    pub fn area(&self) -> Real {
        let sum = self
            .edges()
            .fold(Vector3::zeros(), |acc, (a, b)| acc + a.coords.cross(&b.coords));
        0.5 * sum.dot(&self.plane.normal).abs()
    }

    /// True when every turn of the ring bends the same way around the normal.
    pub fn is_convex(&self) -> bool {
        let n = self.vertices.len();
        if n <= 3 {
            return true;
        }
        (0..n).all(|i| {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            let c = self.vertices[(i + 2) % n];
            let (e1, e2) = (b - a, c - b);
            let scale = e1.norm() * e2.norm();
            scale < tolerance() || e1.cross(&e2).dot(&self.plane.normal) / scale > -1e-9
        })
    }

    /// Orthonormal `(u, v)` spanning the plane, with `u × v = normal`.
    fn plane_basis(&self) -> (Vector3<Real>, Vector3<Real>) {
        let n = self.plane.normal;
        let helper = if n.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        let u = n.cross(&helper).normalize();
        let v = n.cross(&u);
        (u, v)
    }

    /// Split into convex pieces: the polygon itself when already convex,
    /// otherwise ear-cut triangles wound like the source ring.
    pub fn convex_parts(&self) -> Vec<Polygon> {
        if self.is_convex() {
            return vec![self.clone()];
        }

        let (u, v) = self.plane_basis();
        let coords: Vec<Coord<Real>> = self
            .vertices
            .iter()
            .map(|p| Coord {
                x: p.coords.dot(&u),
                y: p.coords.dot(&v),
            })
            .collect();
        let polygon = GeoPolygon::new(LineString::new(coords), vec![]);
        let triangulation = polygon.earcut_triangles_raw();
        let flat = triangulation.vertices;
        let origin = self.plane.normal * self.plane.w;
        let lift = |i: usize| Point3::from(origin + u * flat[2 * i] + v * flat[2 * i + 1]);

        triangulation
            .triangle_indices
            .chunks_exact(3)
            .filter_map(|tri| {
                let (a, b, c) = (lift(tri[0]), lift(tri[1]), lift(tri[2]));
                let winding = (b - a).cross(&(c - a)).dot(&self.plane.normal);
                if winding.abs() < tolerance() {
                    return None;
                }
                let ring = if winding > 0.0 { vec![a, b, c] } else { vec![a, c, b] };
                Some(Polygon::with_plane(ring, self.plane.clone()))
            })
            .collect()
    }

    /// **Cyrus–Beck clipping** of the line `point + t·direction` (lying in this
    /// polygon's plane) against a convex polygon.
    ///
    /// Each edge `vᵢ → vᵢ₊₁` contributes the half-plane
    /// ```text
    /// mᵢ · (x − vᵢ) ≥ 0,   mᵢ = normalize(n × (vᵢ₊₁ − vᵢ))
    /// ```
    /// The boundary is inclusive, so a line running along an edge yields that edge.
    /// Returns the parameter interval `(t_enter, t_exit)`, or `None` if the line misses.
    pub fn line_interval(
        &self,
        point: &Point3<Real>,
        direction: &Vector3<Real>,
    ) -> Option<(Real, Real)> {
        let eps = tolerance();
        let mut t_enter = Real::NEG_INFINITY;
        let mut t_exit = Real::INFINITY;

        for (a, b) in self.edges() {
            let inward = self.plane.normal.cross(&(b - a));
            let len = inward.norm();
            if len < eps {
                continue;
            }
            let m = inward / len;
            let num = m.dot(&(point - a));
            let den = m.dot(direction);
            if den.abs() < eps {
                if num < -eps {
                    return None;
                }
                continue;
            }
            let t = -num / den;
            if den > 0.0 {
                t_enter = t_enter.max(t);
            } else {
                t_exit = t_exit.min(t);
            }
        }

        if t_enter.is_finite() && t_exit.is_finite() && t_exit >= t_enter - eps {
            Some((t_enter, t_exit))
        } else {
            None
        }
    }
}
