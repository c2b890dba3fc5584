//! An in-memory geometry document: groups of faces and edges with stable ids and
//! journaled, abortable operations.
//!
//! [`Document`] implements [`GeometryKernel`](crate::traits::GeometryKernel), so the
//! cutting engine can run against it directly.
//!
//! ```
//! use altcut::document::Document;
//! use altcut::mesh::Mesh;
//!
//! let mut doc = Document::new();
//! let solid = doc.add_solid(&Mesh::cuboid(1000.0, 1000.0, 1000.0), "Block").unwrap();
//! assert_eq!(doc.faces(solid).len(), 6);
//! ```

use crate::bounds::BoundingBox;
use crate::errors::KernelError;
use crate::float_types::{Real, weld_distance};
use crate::mesh::Mesh;
use nalgebra::{Matrix4, Point3};
use std::collections::BTreeMap;
use tracing::trace;

pub mod entity;
mod kernel;
mod transaction;

pub use entity::{Edge, Entity, EntityId, EntityKind, Face, Group};
use transaction::{JournalEntry, Transaction};

#[derive(Debug, Clone, Default)]
pub struct Document {
    entities: BTreeMap<EntityId, Entity>,
    next_id: u64,
    operation: Option<Transaction>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every live entity, keyed by id.
    pub fn entities(&self) -> &BTreeMap<EntityId, Entity> {
        &self.entities
    }

    pub fn get(&self, id: EntityId) -> Result<&Entity, KernelError> {
        self.entities.get(&id).ok_or(KernelError::UnknownEntity(id))
    }

    pub fn group(&self, id: EntityId) -> Result<&Group, KernelError> {
        match self.get(id)? {
            Entity::Group(g) => Ok(g),
            other => Err(wrong_kind(id, EntityKind::Group, other)),
        }
    }

    pub fn face(&self, id: EntityId) -> Result<&Face, KernelError> {
        match self.get(id)? {
            Entity::Face(f) => Ok(f),
            other => Err(wrong_kind(id, EntityKind::Face, other)),
        }
    }

    pub fn edge(&self, id: EntityId) -> Result<&Edge, KernelError> {
        match self.get(id)? {
            Entity::Edge(e) => Ok(e),
            other => Err(wrong_kind(id, EntityKind::Edge, other)),
        }
    }

    /// Direct children of `parent` (`None` is the root), in creation order.
    pub fn children(&self, parent: Option<EntityId>) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities
            .iter()
            .filter(move |(_, e)| e.parent() == parent)
            .map(|(id, e)| (*id, e))
    }

    fn children_of_kind(&self, parent: Option<EntityId>, kind: EntityKind) -> Vec<EntityId> {
        self.children(parent)
            .filter(|(_, e)| e.kind() == kind)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn faces(&self, group: EntityId) -> Vec<EntityId> {
        self.children_of_kind(Some(group), EntityKind::Face)
    }

    /// Groups directly under `parent`.
    pub fn groups(&self, parent: Option<EntityId>) -> Vec<EntityId> {
        self.children_of_kind(parent, EntityKind::Group)
    }

    pub fn group_name(&self, id: EntityId) -> Result<&str, KernelError> {
        Ok(&self.group(id)?.name)
    }

    pub fn is_hidden(&self, id: EntityId) -> Result<bool, KernelError> {
        Ok(self.get(id)?.hidden())
    }

    /// First group, in creation order, carrying `name`.
    pub fn find_group(&self, name: &str) -> Option<EntityId> {
        self.entities.iter().find_map(|(id, e)| match e {
            Entity::Group(g) if g.name == name => Some(*id),
            _ => None,
        })
    }

    /// Name of the open operation, if any.
    pub fn operation_name(&self) -> Option<&str> {
        self.operation.as_ref().map(|op| op.name.as_str())
    }

    /// Add a closed mesh as a new top-level group named `name`.
    pub fn add_solid(&mut self, mesh: &Mesh, name: &str) -> Result<EntityId, KernelError> {
        self.add_solid_in(None, mesh, name)
    }

    /// Add a mesh as a new group under `parent`: one face per polygon plus the
    /// shared boundary edges.
    pub fn add_solid_in(
        &mut self,
        parent: Option<EntityId>,
        mesh: &Mesh,
        name: &str,
    ) -> Result<EntityId, KernelError> {
        self.require_container(parent)?;
        let group = self.insert(Entity::Group(Group {
            name: name.to_string(),
            transform: Matrix4::identity(),
            parent,
            hidden: false,
        }));
        for polygon in &mesh.polygons {
            self.insert(Entity::Face(Face {
                polygon: polygon.clone(),
                parent: Some(group),
                hidden: false,
            }));
            for (a, b) in polygon.edges() {
                self.ensure_edge(Some(group), a, b, false);
            }
        }
        trace!(%group, faces = mesh.polygons.len(), "added solid");
        Ok(group)
    }

    /// All faces of `group` in its own frame; nested groups are flattened into it
    /// when `recurse` is set.
    pub fn group_mesh(&self, group: EntityId, recurse: bool) -> Result<Mesh, KernelError> {
        self.group(group)?;
        let mut polygons = Vec::new();
        for (id, entity) in self.children(Some(group)) {
            match entity {
                Entity::Face(f) => polygons.push(f.polygon.clone()),
                Entity::Group(g) if recurse => {
                    let nested = self.group_mesh(id, true)?.transform(&g.transform);
                    polygons.extend(nested.polygons);
                },
                _ => {},
            }
        }
        Ok(Mesh::from_polygons(&polygons))
    }

    /// Every face vertex and edge endpoint under `group`, in the group's frame.
    fn local_points(&self, group: EntityId) -> Vec<Point3<Real>> {
        let mut points = Vec::new();
        for (id, entity) in self.children(Some(group)) {
            match entity {
                Entity::Face(f) => points.extend(f.polygon.vertices.iter().copied()),
                Entity::Edge(e) => points.extend([e.start, e.end]),
                Entity::Group(g) => points.extend(
                    self.local_points(id)
                        .iter()
                        .map(|p| g.transform.transform_point(p)),
                ),
            }
        }
        points
    }

    pub(crate) fn bounds_of(&self, id: EntityId) -> Result<BoundingBox, KernelError> {
        let points = match self.get(id)? {
            Entity::Face(f) => f.polygon.vertices.clone(),
            Entity::Edge(e) => vec![e.start, e.end],
            Entity::Group(g) => self
                .local_points(id)
                .iter()
                .map(|p| g.transform.transform_point(p))
                .collect(),
        };
        BoundingBox::from_points(points.iter()).ok_or(KernelError::EmptyGroup(id))
    }

    /// `parent` must be the root or a live group.
    fn require_container(&self, parent: Option<EntityId>) -> Result<(), KernelError> {
        match parent {
            Some(id) => self.group(id).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Existing edge of `parent` joining `a` and `b`, or a new one.
    fn ensure_edge(
        &mut self,
        parent: Option<EntityId>,
        a: Point3<Real>,
        b: Point3<Real>,
        hidden: bool,
    ) -> EntityId {
        let weld = weld_distance();
        let existing = self.children(parent).find_map(|(id, e)| match e {
            Entity::Edge(edge) if edge.joins(&a, &b, weld) => Some(id),
            _ => None,
        });
        existing.unwrap_or_else(|| {
            self.insert(Entity::Edge(Edge {
                start: a,
                end: b,
                parent,
                hidden,
            }))
        })
    }

    /// Descendants of `group`, deepest first.
    fn descendants(&self, group: EntityId) -> Vec<EntityId> {
        let mut out = Vec::new();
        for (id, entity) in self.children(Some(group)) {
            if entity.kind() == EntityKind::Group {
                out.extend(self.descendants(id));
            }
            out.push(id);
        }
        out
    }

    // ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~
    // Journaled primitives: every mutation goes through one of these
    // ~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~~

    fn insert(&mut self, entity: Entity) -> EntityId {
        self.next_id += 1;
        let id = EntityId(self.next_id);
        self.entities.insert(id, entity);
        if let Some(op) = self.operation.as_mut() {
            op.record(JournalEntry::Inserted(id));
        }
        id
    }

    fn remove(&mut self, id: EntityId) -> Result<Entity, KernelError> {
        let entity = self
            .entities
            .remove(&id)
            .ok_or(KernelError::UnknownEntity(id))?;
        if let Some(op) = self.operation.as_mut() {
            op.record(JournalEntry::Removed(id, entity.clone()));
        }
        Ok(entity)
    }

    fn modify<F: FnOnce(&mut Entity)>(&mut self, id: EntityId, f: F) -> Result<(), KernelError> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(KernelError::UnknownEntity(id))?;
        if let Some(op) = self.operation.as_mut() {
            op.record(JournalEntry::Modified(id, entity.clone()));
        }
        f(entity);
        Ok(())
    }
}

fn wrong_kind(id: EntityId, expected: EntityKind, found: &Entity) -> KernelError {
    KernelError::WrongKind {
        id,
        expected,
        found: found.kind(),
    }
}
