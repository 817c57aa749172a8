//! Second-phase resolution of deferred type references.
//!
//! Runs once, after every compilation unit has been translated, so a name
//! may resolve to a classifier contributed by any later file in the batch.
//! Each queue drains exactly once, in a fixed order: extends, implements,
//! associations, throws, typed features.
//!
//! Resolution never fails a run. A name that cannot be found in the tree is
//! backed by a synthesized public stub classifier at its dotted path, or is
//! kept as plain primitive text. Either way the batch continues.

use std::sync::LazyLock;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::debug;

use crate::ast::TypeRef;

use super::arena::{
    AssociationData, AssociationEnd, EdgeData, Element, ElementData, Model, Tag, TypeExpr,
};
use super::ids::ElementId;
use super::pending::{
    AssociationPending, ExtendKind, ExtendPending, ImplementPending, PendingQueues, ThrowPending,
    TypedFeaturePending, UnitContext, UnitId,
};
use super::translate;

// ============================================================================
// NAME SETS
// ============================================================================

/// Type names that stay as plain text and are never looked up or stubbed.
static PRIMITIVE_TYPES: LazyLock<FxHashSet<&'static str>> = LazyLock::new(|| {
    [
        "void", "byte", "short", "int", "long", "float", "double", "boolean", "char",
        "Byte", "Double", "Float", "Integer", "Long", "Short", "String", "Character",
        "java.lang.Byte", "java.lang.Double", "java.lang.Float", "java.lang.Integer",
        "java.lang.Long", "java.lang.Short", "java.lang.String", "java.lang.Character",
    ]
    .into_iter()
    .collect()
});

/// Simple names of the `java.util` collection types whose first type
/// argument stands in for the declared type.
static COLLECTION_TYPES: LazyLock<FxHashSet<&'static str>> = LazyLock::new(|| {
    [
        "Collection", "Set", "SortedSet", "NavigableSet", "HashSet", "TreeSet", "LinkedHashSet",
        "List", "ArrayList", "LinkedList", "Deque", "ArrayDeque", "Queue",
    ]
    .into_iter()
    .collect()
});

/// Drain all pending queues against the completed tree.
pub(crate) fn resolve(model: &mut Model, units: &[UnitContext], queues: PendingQueues) {
    let mut resolver = Resolver { model, units };
    resolver.drain_extends(queues.extends);
    resolver.drain_implements(queues.implements);
    resolver.drain_associations(queues.associations);
    resolver.drain_throws(queues.throws);
    resolver.drain_typed_features(queues.typed_features);
}

// ============================================================================
// RESOLVER
// ============================================================================

struct Resolver<'a> {
    model: &'a mut Model,
    units: &'a [UnitContext],
}

impl Resolver<'_> {
    // ========================================================================
    // NAME LOOKUP
    // ========================================================================

    /// Look up a (possibly dotted) type name from a context namespace.
    ///
    /// Four strategies run in order, first hit wins:
    ///
    /// 1. descend from the context namespace itself;
    /// 2. walk the owner chain outward, testing each ancestor for a child
    ///    carrying the whole name. Dotted names never match here; they fall
    ///    through to the imports or the root descent;
    /// 3. consult the unit's imports in declaration order. A wildcard
    ///    import descends to the imported package and looks the name up
    ///    there. A non-wildcard import descends its own full path; whatever
    ///    it reaches is accepted without comparing the last path segment
    ///    against `name`;
    /// 4. descend from the model root.
    fn find_type(&self, context: ElementId, name: &str, unit: UnitId) -> Option<ElementId> {
        let segments: Vec<&str> = name.split('.').collect();

        if let Some(found) = self.model.lookdown(context, &segments) {
            return Some(found);
        }

        if let Some(found) = self.model.lookup_through_owners(context, name) {
            return Some(found);
        }

        let root = self.model.root();
        for import in &self.units[unit.index()].imports {
            let import_segments: Vec<&str> = import.path.split('.').collect();
            let found = if import.wildcard {
                self.model
                    .lookdown(root, &import_segments)
                    .and_then(|package| self.model.find_by_name(package, name))
            } else {
                self.model.lookdown(root, &import_segments)
            };
            if found.is_some() {
                return found;
            }
        }

        self.model.lookdown(root, &segments)
    }

    /// If `ty` is a `java.util` collection carrying type arguments, the
    /// name of its first type argument. Short-form names only count when an
    /// import of the unit corroborates the `java.util` origin.
    fn generic_collection_item(&self, ty: &TypeRef, unit: UnitId) -> Option<SmolStr> {
        let item = ty.type_arguments.first()?;
        let name = ty.name.as_str();

        let is_collection = if let Some(short) = name.strip_prefix("java.util.") {
            COLLECTION_TYPES.contains(short)
        } else if COLLECTION_TYPES.contains(name) {
            self.units[unit.index()].imports.iter().any(|import| {
                if import.wildcard {
                    import.path == "java.util"
                } else {
                    import.path.strip_prefix("java.util.") == Some(name)
                }
            })
        } else {
            false
        };
        is_collection.then(|| item.clone())
    }

    // ========================================================================
    // QUEUE DRAINS
    // ========================================================================

    fn drain_extends(&mut self, queue: Vec<ExtendPending>) {
        for pending in queue {
            let target = match self.find_type(pending.classifier, &pending.ty.name, pending.unit) {
                Some(found) => found,
                None => {
                    debug!(name = %pending.ty.name, "stubbing unresolved supertype");
                    let segments: Vec<&str> = pending.ty.name.split('.').collect();
                    let root = self.model.root();
                    match pending.kind {
                        ExtendKind::Class => self.model.ensure_class(root, &segments),
                        ExtendKind::Interface => self.model.ensure_interface(root, &segments),
                    }
                }
            };
            self.model.add(Element {
                name: SmolStr::default(),
                owner: Some(pending.classifier),
                data: ElementData::Generalization(EdgeData {
                    source: pending.classifier,
                    target,
                }),
            });
        }
    }

    fn drain_implements(&mut self, queue: Vec<ImplementPending>) {
        for pending in queue {
            let target = match self.find_type(pending.classifier, &pending.ty.name, pending.unit) {
                Some(found) => found,
                None => {
                    debug!(name = %pending.ty.name, "stubbing unresolved interface");
                    let segments: Vec<&str> = pending.ty.name.split('.').collect();
                    let root = self.model.root();
                    self.model.ensure_interface(root, &segments)
                }
            };
            self.model.add(Element {
                name: SmolStr::default(),
                owner: Some(pending.classifier),
                data: ElementData::Realization(EdgeData {
                    source: pending.classifier,
                    target,
                }),
            });
        }
    }

    /// Each field deferred for association translation resolves its declared
    /// type and, for collections, its item type. If either is in the tree,
    /// every co-declared variable becomes one association edge; otherwise
    /// the whole declaration falls back to the plain attribute path. No
    /// stubs are synthesized for association targets.
    fn drain_associations(&mut self, queue: Vec<AssociationPending>) {
        for pending in queue {
            let container =
                self.find_type(pending.classifier, &pending.field.ty.name, pending.unit);
            let item = self
                .generic_collection_item(&pending.field.ty, pending.unit)
                .and_then(|name| self.find_type(pending.classifier, &name, pending.unit));

            let Some(target) = item.or(container) else {
                for variable in &pending.field.variables {
                    let attribute = translate::build_field_attribute(
                        self.model,
                        pending.classifier,
                        &pending.field,
                        variable,
                    );
                    self.resolve_typed_feature(
                        pending.classifier,
                        attribute,
                        &pending.field.ty,
                        pending.unit,
                    );
                }
                continue;
            };

            for variable in &pending.field.variables {
                let mut end2 = AssociationEnd {
                    reference: target,
                    name: variable.name.clone(),
                    visibility: translate::visibility_of(&pending.field.modifiers),
                    navigable: true,
                    multiplicity: SmolStr::default(),
                    is_read_only: crate::ast::has_modifier(
                        &pending.field.modifiers,
                        crate::ast::Modifier::Final,
                    ),
                    tags: Vec::new(),
                };
                if item.is_some() {
                    end2.multiplicity = SmolStr::new("*");
                    end2.tags
                        .push(Tag::string("collection", pending.field.ty.name.as_str()));
                }
                if crate::ast::has_modifier(&pending.field.modifiers, crate::ast::Modifier::Static)
                {
                    end2.tags.push(Tag::boolean("static", true));
                }
                if crate::ast::has_modifier(&pending.field.modifiers, crate::ast::Modifier::Volatile)
                {
                    end2.tags.push(Tag::boolean("volatile", true));
                }
                if crate::ast::has_modifier(
                    &pending.field.modifiers,
                    crate::ast::Modifier::Transient,
                ) {
                    end2.tags.push(Tag::boolean("transient", true));
                }

                self.model.add(Element {
                    name: SmolStr::default(),
                    owner: Some(pending.classifier),
                    data: ElementData::Association(AssociationData {
                        end1: AssociationEnd::owner_end(pending.classifier),
                        end2,
                    }),
                });
            }
        }
    }

    fn drain_throws(&mut self, queue: Vec<ThrowPending>) {
        let root = self.model.root();
        for pending in queue {
            let context = self
                .model
                .element(pending.operation)
                .owner
                .unwrap_or(root);
            let target = match self.find_type(context, &pending.name, pending.unit) {
                Some(found) => found,
                None => {
                    debug!(name = %pending.name, "stubbing unresolved exception type");
                    let segments: Vec<&str> = pending.name.split('.').collect();
                    self.model.ensure_class(root, &segments)
                }
            };
            if let ElementData::Operation(op) = &mut self.model.element_mut(pending.operation).data
            {
                op.raised_exceptions.push(target);
            }
        }
    }

    fn drain_typed_features(&mut self, queue: Vec<TypedFeaturePending>) {
        for pending in queue {
            self.resolve_typed_feature(pending.namespace, pending.feature, &pending.ty, pending.unit);
        }
    }

    // ========================================================================
    // TYPED-FEATURE RESOLUTION
    // ========================================================================

    /// Resolve a declared type onto an attribute or parameter.
    ///
    /// The declared name is looked up first. On a miss, a recognized
    /// collection substitutes its item name (recording `*` multiplicity and
    /// a `collection` tag) and the lookup runs again. A still-unresolved
    /// name that is a primitive or boxed keyword is kept as plain text;
    /// anything else is backed by a class stub. A declared array rank
    /// overwrites the multiplicity last.
    fn resolve_typed_feature(
        &mut self,
        context: ElementId,
        feature: ElementId,
        ty: &TypeRef,
        unit: UnitId,
    ) {
        let mut name = ty.name.clone();
        let mut multiplicity: Option<SmolStr> = None;
        let mut collection_tag: Option<Tag> = None;

        let mut resolved = self.find_type(context, &name, unit);
        if resolved.is_none() {
            if let Some(item) = self.generic_collection_item(ty, unit) {
                multiplicity = Some(SmolStr::new("*"));
                collection_tag = Some(Tag::string("collection", ty.name.as_str()));
                name = item;
                resolved = self.find_type(context, &name, unit);
            }
        }

        let type_expr = match resolved {
            Some(found) => TypeExpr::Ref(found),
            None if PRIMITIVE_TYPES.contains(name.as_str()) => TypeExpr::Primitive(name),
            None => {
                debug!(%name, "stubbing unresolved feature type");
                let segments: Vec<&str> = name.split('.').collect();
                let root = self.model.root();
                TypeExpr::Ref(self.model.ensure_class(root, &segments))
            }
        };

        if ty.array_dimension > 0 {
            multiplicity = Some(array_multiplicity(ty.array_dimension));
        }

        match &mut self.model.element_mut(feature).data {
            ElementData::Attribute(data) => {
                data.ty = type_expr;
                if let Some(multiplicity) = multiplicity {
                    data.multiplicity = multiplicity;
                }
                if let Some(tag) = collection_tag {
                    data.tags.push(tag);
                }
            }
            ElementData::Parameter(data) => {
                data.ty = type_expr;
                if let Some(multiplicity) = multiplicity {
                    data.multiplicity = multiplicity;
                }
                if let Some(tag) = collection_tag {
                    data.tags.push(tag);
                }
            }
            _ => {}
        }
    }
}

/// One `*` per declared array dimension, comma-joined.
fn array_multiplicity(dimension: usize) -> SmolStr {
    SmolStr::new(vec!["*"; dimension].join(","))
}
