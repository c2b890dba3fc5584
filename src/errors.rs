//! Kernel and cutting errors

use crate::document::{EntityId, EntityKind};
use crate::float_types::Real;

/// Failures reported by a [`GeometryKernel`](crate::traits::GeometryKernel).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    /// (UnknownEntity) The id does not name a live entity
    #[error("(UnknownEntity) no live entity with id {0}")]
    UnknownEntity(EntityId),
    /// (WrongKind) The entity exists but is not of the expected kind
    #[error("(WrongKind) entity {id} is a {found}, expected a {expected}")]
    WrongKind {
        id: EntityId,
        expected: EntityKind,
        found: EntityKind,
    },
    /// (DegenerateFace) Fewer than three distinct points, or zero area
    #[error("(DegenerateFace) face points do not span an area")]
    DegenerateFace,
    /// (NonPlanarFace) A face point lies off the face plane
    #[error("(NonPlanarFace) point {0} lies {1} off the face plane")]
    NonPlanarFace(usize, Real),
    /// (DegenerateExtrusion) Push/pull distance is (almost) zero or not finite
    #[error("(DegenerateExtrusion) cannot push/pull a face by {0}")]
    DegenerateExtrusion(Real),
    /// (EmptyGroup) The group holds no geometry to measure
    #[error("(EmptyGroup) group {0} holds no geometry")]
    EmptyGroup(EntityId),
    /// (SingularTransform) The transformation cannot be inverted
    #[error("(SingularTransform) transformation of entity {0} is not invertible")]
    SingularTransform(EntityId),
    /// (MixedParents) Entities passed together live in different parents
    #[error("(MixedParents) entity {0} does not share a parent with the others")]
    MixedParents(EntityId),
    /// (OperationInProgress) An operation is already open
    #[error("(OperationInProgress) operation '{0}' is still open")]
    OperationInProgress(String),
    /// (NoOperation) Commit or abort without an open operation
    #[error("(NoOperation) no operation is open")]
    NoOperation,
    /// In general, anything else
    #[error("{0}")]
    Other(String),
}

/// Errors surfaced by the altitude cutting operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CutError {
    /// Wrong entity kind, open volume, or non-numeric length. Raised before any mutation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The slab intersection produced no usable cross-section.
    #[error("geometry operation failed: {0}")]
    GeometryOperationFailed(String),
    /// The kernel failed mid-operation; every change has been rolled back.
    #[error("operation '{operation}' aborted: {source}")]
    TransactionAborted {
        operation: String,
        #[source]
        source: KernelError,
    },
    /// Kernel failure outside of any open operation.
    #[error(transparent)]
    Kernel(#[from] KernelError),
}

impl CutError {
    /// Re-label an error that happened while `operation` was open and has been rolled back.
    pub(crate) fn aborted(self, operation: &str) -> Self {
        match self {
            CutError::Kernel(source) => CutError::TransactionAborted {
                operation: operation.to_string(),
                source,
            },
            other => other,
        }
    }
}
