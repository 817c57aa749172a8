//! # jrev-base
//!
//! Core library for reverse engineering Java source trees into a single,
//! fully cross-referenced UML-like object model (packages, types, members,
//! inheritance, associations).
//!
//! The grammar/parser is an external collaborator: this crate consumes its
//! output through the [`ast`] contract and performs the model-building and
//! symbol-resolution passes on top of it.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project → directory enumeration + two-phase batch driver
//!   ↓
//! model   → arena-based object model, first-phase translator,
//!           second-phase resolver (the algorithmic core)
//!   ↓
//! ast     → the external parser's output contract
//!   ↓
//! base    → primitives (FileId)
//! ```
//!
//! ## Two-phase translation
//!
//! Phase 1 walks each compilation unit in listing order, creating
//! namespace/type/member nodes and recording every cross-reference it cannot
//! yet resolve as a pending record. Phase 2 runs once, after *all* units are
//! in, and resolves the accumulated records against the finished namespace
//! tree, synthesizing placeholder classifiers for names never defined in the
//! input set. Resolving eagerly would break cross-file forward references,
//! so the barrier between the phases is load-bearing.

/// Foundation types: FileId
pub mod base;

/// Parser output contract: compilation units, declarations, raw type refs
pub mod ast;

/// The object model: element arena, translator, resolver
pub mod model;

/// Workspace loading: source enumeration and the batch driver
pub mod project;

pub use ast::{CompilationUnit, ParseError, SourceParser};
pub use base::FileId;
pub use model::{Analyzer, AnalyzerOptions, ElementId, Model};
pub use project::{ProjectError, ReverseEngineer};
