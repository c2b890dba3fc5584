use crate::float_types::Real;
use crate::mesh::Mesh;
use hashbrown::HashMap;
use nalgebra::Point3;

impl Mesh {
    /// Checks if the Mesh object is a closed two-manifold surface.
    ///
    /// ### Returns
    /// Returns `true` if every undirected edge is shared by exactly 2 polygons
    ///
    /// ### Notes:
    /// - Edges are compared after quantising their endpoints, so a vertex lying in the
    ///   middle of a neighbour's edge (a T-junction) makes the surface count as open.
    pub fn is_manifold(&self) -> bool {
        const QUANTIZATION_FACTOR: Real = 1e5;

        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        struct QuantizedPoint(i64, i64, i64);

        fn quantize_point(p: &Point3<Real>) -> QuantizedPoint {
            QuantizedPoint(
                (p.x * QUANTIZATION_FACTOR).round() as i64,
                (p.y * QUANTIZATION_FACTOR).round() as i64,
                (p.z * QUANTIZATION_FACTOR).round() as i64,
            )
        }

        if self.polygons.is_empty() {
            return false;
        }

        let mut edge_counts: HashMap<(QuantizedPoint, QuantizedPoint), u32> = HashMap::new();
        for poly in &self.polygons {
            for (a, b) in poly.edges() {
                let (p0, p1) = (quantize_point(&a), quantize_point(&b));
                if p0 == p1 {
                    continue;
                }
                let key = if p0 < p1 { (p0, p1) } else { (p1, p0) };
                *edge_counts.entry(key).or_insert(0) += 1;
            }
        }

        edge_counts.values().all(|&count| count == 2)
    }
}
