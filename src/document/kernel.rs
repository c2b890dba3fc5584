use super::{Document, Edge, Entity, EntityId, EntityKind, Face, Group, wrong_kind};
use crate::bounds::BoundingBox;
use crate::document::transaction::Transaction;
use crate::errors::KernelError;
use crate::float_types::{Real, tolerance, weld_distance};
use crate::mesh::intersect::intersection_segments;
use crate::mesh::polygon::Polygon;
use crate::traits::GeometryKernel;
use hashbrown::HashSet;
use nalgebra::{Matrix4, Point3, Vector3};
use tracing::{debug, trace};

impl Document {
    /// `(group, local-to-common matrix)` for `group` and, with `recurse`, every
    /// group nested inside it.
    fn frames(
        &self,
        group: EntityId,
        matrix: Matrix4<Real>,
        recurse: bool,
        out: &mut Vec<(EntityId, Matrix4<Real>)>,
    ) {
        out.push((group, matrix));
        if !recurse {
            return;
        }
        for (id, entity) in self.children(Some(group)) {
            if let Entity::Group(g) = entity {
                self.frames(id, matrix * g.transform, true, out);
            }
        }
    }

    /// Split every edge of `owner` (other than `keep`) that `point` lies strictly inside.
    fn split_edges_at(
        &mut self,
        owner: EntityId,
        point: Point3<Real>,
        keep: &HashSet<EntityId>,
    ) -> Result<(), KernelError> {
        let weld = weld_distance();
        let hits: Vec<(EntityId, Edge)> = self
            .children(Some(owner))
            .filter_map(|(id, e)| match e {
                Entity::Edge(edge)
                    if !keep.contains(&id) && edge.interior_parameter(&point, weld).is_some() =>
                {
                    Some((id, edge.clone()))
                },
                _ => None,
            })
            .collect();

        for (id, edge) in hits {
            self.remove(id)?;
            for (start, end) in [(edge.start, point), (point, edge.end)] {
                self.insert(Entity::Edge(Edge {
                    start,
                    end,
                    ..edge.clone()
                }));
            }
            trace!(edge = %id, "split edge at intersection point");
        }
        Ok(())
    }

    fn insert_face(
        &mut self,
        parent: Option<EntityId>,
        ring: Vec<Point3<Real>>,
    ) -> Result<EntityId, KernelError> {
        let polygon = Polygon::new(ring).ok_or(KernelError::DegenerateFace)?;
        Ok(self.insert(Entity::Face(Face {
            polygon,
            parent,
            hidden: false,
        })))
    }
}

impl GeometryKernel for Document {
    fn kind(&self, id: EntityId) -> Result<EntityKind, KernelError> {
        self.get(id).map(Entity::kind)
    }

    fn parent(&self, id: EntityId) -> Result<Option<EntityId>, KernelError> {
        self.get(id).map(Entity::parent)
    }

    fn is_closed_volume(&self, id: EntityId) -> Result<bool, KernelError> {
        if self.kind(id)? != EntityKind::Group {
            return Ok(false);
        }
        Ok(self.group_mesh(id, true)?.is_manifold())
    }

    fn bounds(&self, id: EntityId) -> Result<BoundingBox, KernelError> {
        self.bounds_of(id)
    }

    fn transformation(&self, id: EntityId) -> Result<Matrix4<Real>, KernelError> {
        Ok(match self.get(id)? {
            Entity::Group(g) => g.transform,
            _ => Matrix4::identity(),
        })
    }

    fn edges(&self, group: EntityId) -> Result<Vec<EntityId>, KernelError> {
        self.group(group)?;
        Ok(self.children_of_kind(Some(group), EntityKind::Edge))
    }

    fn edge_points(&self, edge: EntityId) -> Result<[Point3<Real>; 2], KernelError> {
        let e = self.edge(edge)?;
        Ok([e.start, e.end])
    }

    fn add_face(
        &mut self,
        parent: Option<EntityId>,
        points: &[Point3<Real>],
    ) -> Result<EntityId, KernelError> {
        self.require_container(parent)?;
        let polygon = Polygon::new(points.to_vec()).ok_or(KernelError::DegenerateFace)?;
        let (index, deviation) = polygon.max_plane_deviation();
        if deviation > weld_distance() {
            return Err(KernelError::NonPlanarFace(index, deviation));
        }
        let edges: Vec<_> = polygon.edges().collect();
        let id = self.insert(Entity::Face(Face {
            polygon,
            parent,
            hidden: false,
        }));
        for (a, b) in edges {
            self.ensure_edge(parent, a, b, false);
        }
        Ok(id)
    }

    fn face_normal(&self, face: EntityId) -> Result<Vector3<Real>, KernelError> {
        Ok(self.face(face)?.polygon.plane.normal)
    }

    fn reverse_face(&mut self, face: EntityId) -> Result<(), KernelError> {
        self.face(face)?;
        self.modify(face, |e| {
            if let Entity::Face(f) = e {
                f.polygon.flip();
            }
        })
    }

    fn pushpull(
        &mut self,
        face: EntityId,
        distance: Real,
        copy: bool,
    ) -> Result<Vec<EntityId>, KernelError> {
        if !distance.is_finite() || distance.abs() < tolerance() {
            return Err(KernelError::DegenerateExtrusion(distance));
        }
        let source = self.face(face)?.clone();
        let parent = source.parent;
        let offset = source.polygon.plane.normal * distance;
        // growing along the normal turns the source face inward
        let along_normal = distance > 0.0;

        let base: Vec<Point3<Real>> = source.polygon.vertices.clone();
        let top: Vec<Point3<Real>> = base.iter().map(|p| p + offset).collect();
        let orient = |mut ring: Vec<Point3<Real>>, flip: bool| {
            if flip {
                ring.reverse();
            }
            ring
        };

        let mut ids = Vec::with_capacity(3 * base.len() + 2);
        let base_face = if copy {
            self.insert_face(parent, orient(base.clone(), along_normal))?
        } else {
            if along_normal {
                self.reverse_face(face)?;
            }
            face
        };
        ids.push(base_face);
        ids.push(self.insert_face(parent, orient(top.clone(), !along_normal))?);

        let n = base.len();
        for i in 0..n {
            let j = (i + 1) % n;
            let quad = vec![base[i], base[j], top[j], top[i]];
            ids.push(self.insert_face(parent, orient(quad, !along_normal))?);
        }

        let mut edges = Vec::with_capacity(3 * n);
        for i in 0..n {
            let j = (i + 1) % n;
            for (a, b) in [(base[i], base[j]), (top[i], top[j]), (base[i], top[i])] {
                let id = self.ensure_edge(parent, a, b, false);
                if !edges.contains(&id) {
                    edges.push(id);
                }
            }
        }
        ids.extend(edges);
        trace!(%face, distance, entities = ids.len(), "push/pull");
        Ok(ids)
    }

    fn add_group(
        &mut self,
        parent: Option<EntityId>,
        entities: &[EntityId],
    ) -> Result<EntityId, KernelError> {
        self.require_container(parent)?;
        let mut shared = None;
        for (i, &id) in entities.iter().enumerate() {
            let owner = self.get(id)?.parent();
            match shared {
                None if i == 0 => shared = Some(owner),
                Some(p) if p == owner => {},
                _ => return Err(KernelError::MixedParents(id)),
            }
        }
        if let Some(p) = parent {
            let nested = entities
                .iter()
                .any(|&id| id == p || self.descendants(id).contains(&p));
            if nested {
                return Err(KernelError::Other(format!(
                    "cannot place a group inside its own contents ({p})"
                )));
            }
        }

        let group = self.insert(Entity::Group(Group {
            name: String::new(),
            transform: Matrix4::identity(),
            parent,
            hidden: false,
        }));
        for &id in entities {
            self.modify(id, |e| e.set_parent(Some(group)))?;
        }
        Ok(group)
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
        self.group(target)?;
        let cutters: Vec<Polygon> = match self.get(cutter)? {
            Entity::Group(g) => {
                let placement = transform * g.transform;
                self.group_mesh(cutter, true)?.transform(&placement).polygons
            },
            Entity::Face(f) => vec![f.polygon.transform(transform)],
            other => return Err(wrong_kind(cutter, EntityKind::Group, other)),
        };

        let mut frames = Vec::new();
        self.frames(target, *target_transform, recurse, &mut frames);
        let to_target = target_transform
            .try_inverse()
            .ok_or(KernelError::SingularTransform(target))?;

        let mut created = HashSet::new();
        let mut result = Vec::new();
        for (owner, matrix) in frames {
            let faces: Vec<Polygon> = self
                .children(Some(owner))
                .filter_map(|(_, e)| match e {
                    Entity::Face(f) => Some(f.polygon.transform(&matrix)),
                    _ => None,
                })
                .collect();
            if faces.is_empty() {
                continue;
            }
            let to_owner = matrix
                .try_inverse()
                .ok_or(KernelError::SingularTransform(owner))?;

            // new edges always land in `target`; only `owner`'s own edges are split
            for [a, b] in intersection_segments(&cutters, &faces) {
                self.split_edges_at(owner, to_owner.transform_point(&a), &created)?;
                self.split_edges_at(owner, to_owner.transform_point(&b), &created)?;
                let id = self.insert(Entity::Edge(Edge {
                    start: to_target.transform_point(&a),
                    end: to_target.transform_point(&b),
                    parent: Some(target),
                    hidden,
                }));
                created.insert(id);
                result.push(id);
            }
        }
        debug!(%target, %cutter, edges = result.len(), "intersect");
        Ok(result)
    }

    fn intersect_solids(
        &mut self,
        solid: EntityId,
        cutter: EntityId,
    ) -> Result<Option<EntityId>, KernelError> {
        let placed = self.group(solid)?.clone();
        let tool = self.group(cutter)?.clone();
        if placed.parent != tool.parent {
            return Err(KernelError::MixedParents(cutter));
        }
        let a = self.group_mesh(solid, true)?.transform(&placed.transform);
        let b = self.group_mesh(cutter, true)?.transform(&tool.transform);
        let common = a.intersection(&b);
        if common.polygons.is_empty() {
            return Ok(None);
        }
        let inverse = placed
            .transform
            .try_inverse()
            .ok_or(KernelError::SingularTransform(solid))?;
        let id = self.add_solid_in(placed.parent, &common.transform(&inverse), &placed.name)?;
        self.modify(id, |e| {
            if let Entity::Group(g) = e {
                g.transform = placed.transform;
            }
        })?;
        Ok(Some(id))
    }

    fn erase(&mut self, id: EntityId) -> Result<(), KernelError> {
        if self.kind(id)? == EntityKind::Group {
            for child in self.descendants(id) {
                self.remove(child)?;
            }
        }
        self.remove(id)?;
        Ok(())
    }

    fn transform_entity(
        &mut self,
        id: EntityId,
        matrix: &Matrix4<Real>,
    ) -> Result<(), KernelError> {
        self.modify(id, |e| match e {
            Entity::Group(g) => g.transform = matrix * g.transform,
            Entity::Face(f) => f.polygon = f.polygon.transform(matrix),
            Entity::Edge(edge) => {
                edge.start = matrix.transform_point(&edge.start);
                edge.end = matrix.transform_point(&edge.end);
            },
        })
    }

    fn set_name(&mut self, group: EntityId, name: &str) -> Result<(), KernelError> {
        self.group(group)?;
        self.modify(group, |e| {
            if let Entity::Group(g) = e {
                g.name = name.to_string();
            }
        })
    }

    fn set_hidden(&mut self, id: EntityId, hidden: bool) -> Result<(), KernelError> {
        if self.get(id)?.hidden() == hidden {
            return Ok(());
        }
        self.modify(id, |e| e.set_hidden(hidden))
    }

    fn start_operation(&mut self, name: &str) -> Result<(), KernelError> {
        if let Some(open) = &self.operation {
            return Err(KernelError::OperationInProgress(open.name.clone()));
        }
        self.operation = Some(Transaction::new(name));
        debug!(operation = name, "operation started");
        Ok(())
    }

    fn commit_operation(&mut self) -> Result<(), KernelError> {
        let op = self.operation.take().ok_or(KernelError::NoOperation)?;
        debug!(operation = %op.name, changes = op.len(), "operation committed");
        Ok(())
    }

    fn abort_operation(&mut self) -> Result<(), KernelError> {
        let op = self.operation.take().ok_or(KernelError::NoOperation)?;
        debug!(operation = %op.name, changes = op.len(), "operation aborted, rolling back");
        op.rollback(&mut self.entities);
        Ok(())
    }
}
