//! Entities stored in a [`Document`](super::Document).

use crate::float_types::Real;
use crate::mesh::polygon::Polygon;
use nalgebra::{Matrix4, Point3};
use std::fmt;

/// Creation-order handle of a document entity. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub(crate) u64);

impl EntityId {
    pub const fn index(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Face,
    Edge,
    Group,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Face => "face",
            EntityKind::Edge => "edge",
            EntityKind::Group => "group",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub polygon: Polygon,
    pub parent: Option<EntityId>,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub start: Point3<Real>,
    pub end: Point3<Real>,
    pub parent: Option<EntityId>,
    pub hidden: bool,
}

impl Edge {
    pub fn length(&self) -> Real {
        (self.end - self.start).norm()
    }

    /// Same endpoints in either order, within `eps`.
    pub fn joins(&self, a: &Point3<Real>, b: &Point3<Real>, eps: Real) -> bool {
        let close = |p: &Point3<Real>, q: &Point3<Real>| (p - q).norm() <= eps;
        (close(&self.start, a) && close(&self.end, b)) || (close(&self.start, b) && close(&self.end, a))
    }

    /// Parameter of `p` along the edge if it lies strictly between the endpoints.
    pub fn interior_parameter(&self, p: &Point3<Real>, eps: Real) -> Option<Real> {
        let d = self.end - self.start;
        let len2 = d.norm_squared();
        if len2 <= eps * eps {
            return None;
        }
        let t = (p - self.start).dot(&d) / len2;
        let foot = self.start + d * t;
        let len = len2.sqrt();
        let inside = t * len > eps && (1.0 - t) * len > eps;
        (inside && (p - foot).norm() <= eps).then_some(t)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub name: String,
    pub transform: Matrix4<Real>,
    pub parent: Option<EntityId>,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Face(Face),
    Edge(Edge),
    Group(Group),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Face(_) => EntityKind::Face,
            Entity::Edge(_) => EntityKind::Edge,
            Entity::Group(_) => EntityKind::Group,
        }
    }

    pub fn parent(&self) -> Option<EntityId> {
        match self {
            Entity::Face(f) => f.parent,
            Entity::Edge(e) => e.parent,
            Entity::Group(g) => g.parent,
        }
    }

    pub(crate) fn set_parent(&mut self, parent: Option<EntityId>) {
        match self {
            Entity::Face(f) => f.parent = parent,
            Entity::Edge(e) => e.parent = parent,
            Entity::Group(g) => g.parent = parent,
        }
    }

    pub fn hidden(&self) -> bool {
        match self {
            Entity::Face(f) => f.hidden,
            Entity::Edge(e) => e.hidden,
            Entity::Group(g) => g.hidden,
        }
    }

    pub(crate) fn set_hidden(&mut self, hidden: bool) {
        match self {
            Entity::Face(f) => f.hidden = hidden,
            Entity::Edge(e) => e.hidden = hidden,
            Entity::Group(g) => g.hidden = hidden,
        }
    }
}
