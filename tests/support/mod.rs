//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use altcut::{
    BoundingBox, Document, EntityId, EntityKind, GeometryKernel, KernelError, Mesh,
    float_types::Real,
};
use hashbrown::HashMap;
use nalgebra::{Matrix4, Point3, Vector3};

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// A document holding one axis-aligned box `[0, w] × [0, d] × [0, h]` (millimetres).
pub fn document_with_box(width: Real, depth: Real, height: Real) -> (Document, EntityId) {
    let mut doc = Document::new();
    let solid = doc
        .add_solid(&Mesh::cuboid(width, depth, height), "Solid")
        .expect("box is a valid solid");
    (doc, solid)
}

/// True when every endpoint is shared by an even number of the edges, i.e. the
/// edges form closed loops.
pub fn forms_closed_loops<K: GeometryKernel>(kernel: &K, edges: &[EntityId]) -> bool {
    let mut degree: HashMap<(i64, i64, i64), usize> = HashMap::new();
    let key = |p: &Point3<Real>| {
        (
            (p.x * 1e3).round() as i64,
            (p.y * 1e3).round() as i64,
            (p.z * 1e3).round() as i64,
        )
    };
    for &edge in edges {
        let [a, b] = kernel.edge_points(edge).expect("live edge");
        *degree.entry(key(&a)).or_default() += 1;
        *degree.entry(key(&b)).or_default() += 1;
    }
    !edges.is_empty() && degree.values().all(|d| d % 2 == 0)
}

/// Z of both endpoints of every edge, in the owning group's frame.
pub fn edge_heights<K: GeometryKernel>(kernel: &K, edges: &[EntityId]) -> Vec<Real> {
    edges
        .iter()
        .flat_map(|&e| kernel.edge_points(e).expect("live edge").map(|p| p.z))
        .collect()
}

/// Wraps a [`Document`] and fails chosen kernel calls, to exercise rollback.
#[derive(Debug, Default)]
pub struct ScriptedKernel {
    pub doc: Document,
    /// Fail the n-th (1-based) call of `intersect_with`.
    pub fail_intersect_at: Option<usize>,
    pub intersect_calls: usize,
}

impl ScriptedKernel {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            ..Default::default()
        }
    }

    pub fn failing_intersect_at(mut self, call: usize) -> Self {
        self.fail_intersect_at = Some(call);
        self
    }
}

impl GeometryKernel for ScriptedKernel {
    fn kind(&self, id: EntityId) -> Result<EntityKind, KernelError> {
        self.doc.kind(id)
    }

    fn parent(&self, id: EntityId) -> Result<Option<EntityId>, KernelError> {
        self.doc.parent(id)
    }

    fn is_closed_volume(&self, id: EntityId) -> Result<bool, KernelError> {
        self.doc.is_closed_volume(id)
    }

    fn bounds(&self, id: EntityId) -> Result<BoundingBox, KernelError> {
        self.doc.bounds(id)
    }

    fn transformation(&self, id: EntityId) -> Result<Matrix4<Real>, KernelError> {
        self.doc.transformation(id)
    }

    fn edges(&self, group: EntityId) -> Result<Vec<EntityId>, KernelError> {
        self.doc.edges(group)
    }

    fn edge_points(&self, edge: EntityId) -> Result<[Point3<Real>; 2], KernelError> {
        self.doc.edge_points(edge)
    }

    fn add_face(
        &mut self,
        parent: Option<EntityId>,
        points: &[Point3<Real>],
    ) -> Result<EntityId, KernelError> {
        self.doc.add_face(parent, points)
    }

    fn face_normal(&self, face: EntityId) -> Result<Vector3<Real>, KernelError> {
        self.doc.face_normal(face)
    }

    fn reverse_face(&mut self, face: EntityId) -> Result<(), KernelError> {
        self.doc.reverse_face(face)
    }

    fn pushpull(
        &mut self,
        face: EntityId,
        distance: Real,
        copy: bool,
    ) -> Result<Vec<EntityId>, KernelError> {
        self.doc.pushpull(face, distance, copy)
    }

    fn add_group(
        &mut self,
        parent: Option<EntityId>,
        entities: &[EntityId],
    ) -> Result<EntityId, KernelError> {
        self.doc.add_group(parent, entities)
    }

    fn intersect_with(
        &mut self,
        recurse: bool,
        transform: &Matrix4<Real>,
        target: EntityId,
        target_transform: &Matrix4<Real>,
        hidden: bool,
        cutter: EntityId,
    ) -> Result<Vec<EntityId>, KernelError> {
        self.intersect_calls += 1;
        if self.fail_intersect_at == Some(self.intersect_calls) {
            return Err(KernelError::Other(format!(
                "injected failure on intersect call {}",
                self.intersect_calls
            )));
        }
        self.doc
            .intersect_with(recurse, transform, target, target_transform, hidden, cutter)
    }

    fn intersect_solids(
        &mut self,
        solid: EntityId,
        cutter: EntityId,
    ) -> Result<Option<EntityId>, KernelError> {
        self.doc.intersect_solids(solid, cutter)
    }

    fn erase(&mut self, id: EntityId) -> Result<(), KernelError> {
        self.doc.erase(id)
    }

    fn transform_entity(
        &mut self,
        id: EntityId,
        matrix: &Matrix4<Real>,
    ) -> Result<(), KernelError> {
        self.doc.transform_entity(id, matrix)
    }

    fn set_name(&mut self, group: EntityId, name: &str) -> Result<(), KernelError> {
        self.doc.set_name(group, name)
    }

    fn set_hidden(&mut self, id: EntityId, hidden: bool) -> Result<(), KernelError> {
        self.doc.set_hidden(id, hidden)
    }

    fn start_operation(&mut self, name: &str) -> Result<(), KernelError> {
        self.doc.start_operation(name)
    }

    fn commit_operation(&mut self) -> Result<(), KernelError> {
        self.doc.commit_operation()
    }

    fn abort_operation(&mut self) -> Result<(), KernelError> {
        self.doc.abort_operation()
    }
}
