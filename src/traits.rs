use crate::bounds::BoundingBox;
use crate::document::{EntityId, EntityKind};
use crate::errors::KernelError;
use crate::float_types::Real;
use nalgebra::{Matrix4, Point3, Vector3};

/// The geometry adapter the cutting engine drives.
///
/// Entities are addressed by [`EntityId`]s that stay stable while the owning
/// document mutates. Coordinates passed in and returned are expressed in the frame
/// of the entity's parent (for faces and edges, the group that owns them).
pub trait GeometryKernel {
    fn kind(&self, id: EntityId) -> Result<EntityKind, KernelError>;

    /// False once an entity has been erased (or never existed).
    fn is_valid(&self, id: EntityId) -> bool {
        self.kind(id).is_ok()
    }

    /// Owning group, `None` for the document root.
    fn parent(&self, id: EntityId) -> Result<Option<EntityId>, KernelError>;

    /// True for a group whose faces enclose a volume without gaps.
    fn is_closed_volume(&self, id: EntityId) -> Result<bool, KernelError>;

    /// Axis-aligned box of the entity, in its parent's frame.
    fn bounds(&self, id: EntityId) -> Result<BoundingBox, KernelError>;

    /// Local-to-parent transformation of a group (identity for other entities).
    fn transformation(&self, id: EntityId) -> Result<Matrix4<Real>, KernelError>;

    /// Edges directly owned by `group`, in creation order.
    fn edges(&self, group: EntityId) -> Result<Vec<EntityId>, KernelError>;

    /// `(start, end)` of an edge, in the owning group's frame.
    fn edge_points(&self, edge: EntityId) -> Result<[Point3<Real>; 2], KernelError>;

    /// Add a planar face under `parent`, creating or reusing its boundary edges.
    fn add_face(
        &mut self,
        parent: Option<EntityId>,
        points: &[Point3<Real>],
    ) -> Result<EntityId, KernelError>;

    fn face_normal(&self, face: EntityId) -> Result<Vector3<Real>, KernelError>;

    fn reverse_face(&mut self, face: EntityId) -> Result<(), KernelError>;

    /// Grow `face` along its normal into a closed prism and return every face and
    /// edge of that prism. With `copy == false` the face itself becomes a cap.
    fn pushpull(
        &mut self,
        face: EntityId,
        distance: Real,
        copy: bool,
    ) -> Result<Vec<EntityId>, KernelError>;

    /// Move `entities` into a new group under `parent` with an identity transform.
    fn add_group(
        &mut self,
        parent: Option<EntityId>,
        entities: &[EntityId],
    ) -> Result<EntityId, KernelError>;

    /// Intersect the faces of `cutter` (placed by `transform`) with those of
    /// `target` (placed by `target_transform`) and add the crossing lines to
    /// `target` as new edges in its own frame. With `recurse`, faces of nested
    /// groups take part too; their results still become edges of `target`.
    ///
    /// Returns the new intersection edges.
    fn intersect_with(
        &mut self,
        recurse: bool,
        transform: &Matrix4<Real>,
        target: EntityId,
        target_transform: &Matrix4<Real>,
        hidden: bool,
        cutter: EntityId,
    ) -> Result<Vec<EntityId>, KernelError>;

    /// Boolean intersection of two sibling solids as a new group beside `solid`;
    /// `None` when they do not overlap.
    fn intersect_solids(
        &mut self,
        solid: EntityId,
        cutter: EntityId,
    ) -> Result<Option<EntityId>, KernelError>;

    /// Remove an entity; groups take their contents with them.
    fn erase(&mut self, id: EntityId) -> Result<(), KernelError>;

    /// Apply `matrix` on top of the entity's current placement.
    fn transform_entity(&mut self, id: EntityId, matrix: &Matrix4<Real>)
    -> Result<(), KernelError>;

    fn set_name(&mut self, group: EntityId, name: &str) -> Result<(), KernelError>;

    fn set_hidden(&mut self, id: EntityId, hidden: bool) -> Result<(), KernelError>;

    /// Open an atomic edit. Operations do not nest.
    fn start_operation(&mut self, name: &str) -> Result<(), KernelError>;

    fn commit_operation(&mut self) -> Result<(), KernelError>;

    /// Roll back every change made since [`start_operation`](Self::start_operation).
    fn abort_operation(&mut self) -> Result<(), KernelError>;
}
