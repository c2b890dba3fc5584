//! Oriented planes, point/polygon classification and plane-plane lines.

use crate::float_types::{Real, tolerance};
use crate::mesh::polygon::Polygon;
use nalgebra::{Point3, Vector3};

// Plane classification constants
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// A plane `normal · p = w` with a unit normal.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub normal: Vector3<Real>,
    pub w: Real,
}

impl Plane {
    /// Create a new plane from normal vector and distance
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Self {
        let len = normal.norm();
        if len < Real::EPSILON {
            return Plane {
                normal: Vector3::z(),
                w: 0.0,
            };
        }
        Plane {
            normal: normal / len,
            w: w / len,
        }
    }

    /// Create a plane from three points.
    /// The normal direction follows the right-hand rule: (p2-p1) × (p3-p1)
    pub fn from_points(p1: &Point3<Real>, p2: &Point3<Real>, p3: &Point3<Real>) -> Self {
        let normal = (p2 - p1).cross(&(p3 - p1));
        if normal.norm_squared() < Real::EPSILON * Real::EPSILON {
            return Plane {
                normal: Vector3::z(),
                w: 0.0,
            };
        }
        let normal = normal.normalize();
        Plane {
            normal,
            w: normal.dot(&p1.coords),
        }
    }

    /// **Newell's method**: robust normal for any simple (possibly non-convex) ring.
    ///
    /// ```text
    /// n = Σᵢ (pᵢ × pᵢ₊₁)
    /// ```
    /// Returns `None` when the ring encloses no area.
    pub fn from_ring(points: &[Point3<Real>]) -> Option<Self> {
        if points.len() < 3 {
            return None;
        }
        let normal = points
            .iter()
            .zip(points.iter().cycle().skip(1))
            .fold(Vector3::zeros(), |acc, (curr, next)| {
                acc + curr.coords.cross(&next.coords)
            });
        let len = normal.norm();
        if len < tolerance() {
            return None;
        }
        let normal = normal / len;
        let centroid = points
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords)
            / points.len() as Real;
        Some(Plane {
            normal,
            w: normal.dot(&centroid),
        })
    }

    #[inline]
    pub fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    #[inline]
    pub fn offset(&self) -> Real {
        self.w
    }

    /// Signed distance of `point` along the normal.
    #[inline]
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Classify a point as `FRONT`, `BACK` or `COPLANAR`.
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let d = self.signed_distance(point);
        if d < -tolerance() {
            BACK
        } else if d > tolerance() {
            FRONT
        } else {
            COPLANAR
        }
    }

    /// True when both planes have (anti-)parallel normals.
    pub fn is_parallel(&self, other: &Plane) -> bool {
        self.normal.cross(&other.normal).norm() < tolerance()
    }

    /// Line shared by two non-parallel planes, as `(point, unit direction)`.
    ///
    /// For planes `n₁·x = w₁`, `n₂·x = w₂` with `u = n₁ × n₂`:
    /// ```text
    /// p = (w₁ (n₂ × u) + w₂ (u × n₁)) / |u|²
    /// ```
    pub fn intersection_line(&self, other: &Plane) -> Option<(Point3<Real>, Vector3<Real>)> {
        let u = self.normal.cross(&other.normal);
        let len2 = u.norm_squared();
        if len2.sqrt() < tolerance() {
            return None;
        }
        let p = (other.normal.cross(&u) * self.w + u.cross(&self.normal) * other.w) / len2;
        Some((Point3::from(p), u / len2.sqrt()))
    }

    /// Split `polygon` by this plane.
    ///
    /// Returns `(coplanar_front, coplanar_back, front, back)`; coplanar polygons are sorted
    /// by whether their normal agrees with this plane's.
    pub fn split_polygon(
        &self,
        polygon: &Polygon,
    ) -> (Vec<Polygon>, Vec<Polygon>, Vec<Polygon>, Vec<Polygon>) {
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();

        let types: Vec<i8> = polygon
            .vertices
            .iter()
            .map(|v| self.orient_point(v))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            },
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let count = polygon.vertices.len();
                let mut f = Vec::with_capacity(count + 1);
                let mut b = Vec::with_capacity(count + 1);
                for i in 0..count {
                    let j = (i + 1) % count;
                    let (ti, tj) = (types[i], types[j]);
                    let (vi, vj) = (polygon.vertices[i], polygon.vertices[j]);

                    if ti != BACK {
                        f.push(vi);
                    }
                    if ti != FRONT {
                        b.push(vi);
                    }
                    if (ti | tj) == SPANNING {
                        let denom = self.normal.dot(&(vj - vi));
                        if denom.abs() > Real::EPSILON {
                            let t = (self.w - self.normal.dot(&vi.coords)) / denom;
                            let v = vi + (vj - vi) * t;
                            f.push(v);
                            b.push(v);
                        }
                    }
                }
                if f.len() >= 3 {
                    front.push(Polygon::with_plane(f, polygon.plane.clone()));
                }
                if b.len() >= 3 {
                    back.push(Polygon::with_plane(b, polygon.plane.clone()));
                }
            },
        }

        (coplanar_front, coplanar_back, front, back)
    }
}
