//! Batch-scoped records of deferred cross-references.
//!
//! Phase 1 cannot resolve most type names it meets: the classifier a name
//! refers to may be defined later in the batch, in another file. Instead of
//! resolving eagerly, each site records a pending entry holding the already
//! created element plus the raw, unresolved type node from the AST. Phase 2
//! drains every queue exactly once against the finished tree; it never adds
//! new pending work.
//!
//! The queues are plain fields of the analyzer session. They are appended to
//! only during phase 1 and consumed whole by [`resolve`](super::resolve).

use smol_str::SmolStr;

use crate::ast::{FieldDecl, Import, TypeRef};
use crate::base::FileId;
use super::ids::ElementId;

/// Index of a compilation-unit context within one batch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnitId(pub u32);

impl UnitId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// What the resolver needs to know about the unit a reference came from:
/// which file it was, and its import list.
#[derive(Clone, Debug)]
pub struct UnitContext {
    pub file: FileId,
    pub imports: Vec<Import>,
}

/// A deferred `extends` clause entry.
#[derive(Clone, Debug)]
pub struct ExtendPending {
    /// The already-created subtype classifier.
    pub classifier: ElementId,
    /// The raw supertype reference from the AST.
    pub ty: TypeRef,
    /// Whether a missing supertype should be stubbed as a class or an
    /// interface.
    pub kind: ExtendKind,
    pub unit: UnitId,
}

/// Stub-synthesis kind recorded with an [`ExtendPending`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExtendKind {
    Class,
    Interface,
}

/// A deferred `implements` clause entry.
#[derive(Clone, Debug)]
pub struct ImplementPending {
    pub classifier: ElementId,
    pub ty: TypeRef,
    pub unit: UnitId,
}

/// A whole field declaration deferred for association translation.
///
/// All co-declared variables are resolved together against the same target
/// type, so one record covers the entire declaration.
#[derive(Clone, Debug)]
pub struct AssociationPending {
    pub classifier: ElementId,
    pub field: FieldDecl,
    pub unit: UnitId,
}

/// A deferred thrown-exception reference.
#[derive(Clone, Debug)]
pub struct ThrowPending {
    pub operation: ElementId,
    pub name: SmolStr,
    pub unit: UnitId,
}

/// A structural feature (attribute, parameter, or return parameter) whose
/// declared type still needs resolving.
#[derive(Clone, Debug)]
pub struct TypedFeaturePending {
    /// The namespace to resolve from (the owning classifier).
    pub namespace: ElementId,
    pub feature: ElementId,
    pub ty: TypeRef,
    pub unit: UnitId,
}

/// The five pending queues of one batch run.
#[derive(Debug, Default)]
pub struct PendingQueues {
    pub extends: Vec<ExtendPending>,
    pub implements: Vec<ImplementPending>,
    pub associations: Vec<AssociationPending>,
    pub throws: Vec<ThrowPending>,
    pub typed_features: Vec<TypedFeaturePending>,
}

impl PendingQueues {
    /// Total number of deferred records.
    pub fn len(&self) -> usize {
        self.extends.len()
            + self.implements.len()
            + self.associations.len()
            + self.throws.len()
            + self.typed_features.len()
    }

    /// Check if nothing was deferred.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
