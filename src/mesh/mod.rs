//! `Mesh`: a closed polygon soup and the boolean intersection used to band solids.

use crate::bounds::BoundingBox;
use crate::float_types::Real;
use crate::mesh::{bsp::Node, polygon::Polygon};
use nalgebra::{Matrix4, Point3, Vector3};
use std::sync::OnceLock;

pub mod bsp;
pub mod intersect;
pub mod manifold;
pub mod plane;
pub mod polygon;
pub mod shapes;

#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Outward-facing polygons of the surface
    pub polygons: Vec<Polygon>,

    /// Lazily calculated box that spans `polygons`.
    pub bounding_box: OnceLock<BoundingBox>,
}

impl PartialEq for Mesh {
    fn eq(&self, other: &Self) -> bool {
        self.polygons == other.polygons
    }
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a Mesh from an existing polygon list
    pub fn from_polygons(polygons: &[Polygon]) -> Self {
        Mesh {
            polygons: polygons.to_vec(),
            bounding_box: OnceLock::new(),
        }
    }

    /// `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        if self.polygons.is_empty() {
            return None;
        }
        Some(*self.bounding_box.get_or_init(|| {
            self.polygons
                .iter()
                .map(Polygon::bounding_box)
                .reduce(|a, b| a.union(&b))
                .unwrap_or_else(|| BoundingBox::new(Point3::origin(), Point3::origin()))
        }))
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Point3<Real>> {
        self.polygons.iter().flat_map(|p| p.vertices.iter())
    }

    /// Apply a 4x4 transform to every polygon.
    pub fn transform(&self, matrix: &Matrix4<Real>) -> Mesh {
        Mesh {
            polygons: self.polygons.iter().map(|p| p.transform(matrix)).collect(),
            bounding_box: OnceLock::new(),
        }
    }

    pub fn translate(&self, offset: Vector3<Real>) -> Mesh {
        self.transform(&Matrix4::new_translation(&offset))
    }

    /// Return a new mesh representing space both this mesh and the other mesh occupy.
    ///
    /// ```text
    ///     +-------+
    ///     |       |
    ///     |   a   |
    ///     |    +--+----+   =   +--+
    ///     +----+--+    |       +--+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    pub fn intersection(&self, other: &Mesh) -> Mesh {
        let mut a = Node::from_polygons(&self.polygons);
        let mut b = Node::from_polygons(&other.polygons);

        a.invert();
        b.clip_to(&a);
        b.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        a.build(&b.all_polygons());
        a.invert();

        Mesh::from_polygons(&a.all_polygons())
    }

    /// Signed volume via the divergence theorem; positive for outward winding.
    pub fn volume(&self) -> Real {
        self.polygons
            .iter()
            .map(|p| {
                let v0 = p.vertices[0].coords;
                p.vertices
                    .windows(2)
                    .skip(1)
                    .map(|w| v0.dot(&w[0].coords.cross(&w[1].coords)))
                    .sum::<Real>()
            })
            .sum::<Real>()
            / 6.0
    }
}
