//! The object model built from parsed compilation units.
//!
//! The model is a single arena of tagged-variant elements addressed by
//! [`ElementId`]. Ownership is a tree: every element except the shared root
//! has exactly one owner, and each namespace keeps ordered lists of the
//! elements it owns.
//!
//! Model building is a two-phase translation:
//!
//! 1. [`Analyzer`] walks each compilation unit, creating namespace, type and
//!    member elements while queueing every unresolved cross-reference as a
//!    [`pending`] record.
//! 2. [`resolve`] drains the queues once against the finished tree,
//!    synthesizing placeholder classifiers for names never defined in the
//!    input set.

pub mod arena;
pub mod ids;
pub mod pending;
pub mod resolve;
pub mod translate;

pub use arena::{
    AssociationData, AssociationEnd, AttributeData, Direction, EdgeData, Element, ElementData,
    LiteralData, Model, NamespaceData, NamespaceKind, OperationData, ParameterData, Tag, TagValue,
    TemplateParameter, TypeExpr, Visibility,
};
pub use ids::ElementId;
pub use translate::{Analyzer, AnalyzerOptions};
