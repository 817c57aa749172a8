//! First-phase translation of compilation units into the model tree.
//!
//! The [`Analyzer`] is the session value for one batch run: it owns the
//! shared model, the per-unit import contexts, and the five pending queues.
//! Files are fed in strictly sequentially — the lookup-or-create walks here
//! are check-then-create and mutate the single shared tree.
//!
//! Nothing in this phase resolves a type name. Package chains are the one
//! exception: they are created immediately because a package path never
//! needs a forward reference.

use smol_str::SmolStr;
use tracing::debug;

use crate::ast::{
    self, CompilationUnit, FieldDecl, Member, MethodDecl, Modifier, TypeDecl, TypeKind,
    TypeParameter, VariableDecl,
};
use crate::base::FileId;

use super::arena::{
    AttributeData, Element, ElementData, LiteralData, Model, NamespaceData, NamespaceKind,
    OperationData, ParameterData, Direction, Tag, TemplateParameter, Visibility,
};
use super::ids::ElementId;
use super::pending::{
    AssociationPending, ExtendKind, ExtendPending, ImplementPending, PendingQueues, ThrowPending,
    TypedFeaturePending, UnitContext, UnitId,
};
use super::resolve;

// ============================================================================
// OPTIONS
// ============================================================================

/// Batch configuration.
///
/// Only `association` and `public_only` affect model building. The three
/// diagram flags are carried for the downstream diagram-generation
/// collaborator and are not read by this crate.
#[derive(Clone, Debug, Default)]
pub struct AnalyzerOptions {
    /// Translate fields whose type resolves to an in-model classifier as
    /// associations instead of attributes.
    pub association: bool,
    /// Skip every member that is not `public`.
    pub public_only: bool,
    pub type_hierarchy: bool,
    pub package_overview: bool,
    pub package_structure: bool,
}

// ============================================================================
// ANALYZER SESSION
// ============================================================================

/// The two-phase model builder for one batch of compilation units.
///
/// Feed every unit through [`Analyzer::add_unit`] (phase 1), then call
/// [`Analyzer::finish`] exactly once to resolve all deferred references
/// (phase 2) and take the finished model. The barrier matters: a type
/// referenced by an early file may legitimately be defined by a later one.
#[derive(Debug)]
pub struct Analyzer {
    options: AnalyzerOptions,
    model: Model,
    units: Vec<UnitContext>,
    pending: PendingQueues,
}

impl Analyzer {
    /// Create a fresh session holding only the shared root.
    pub fn new(options: AnalyzerOptions) -> Self {
        Self {
            options,
            model: Model::new(),
            units: Vec::new(),
            pending: PendingQueues::default(),
        }
    }

    /// The batch configuration.
    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    /// The model as built so far.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The deferred work accumulated so far.
    pub fn pending(&self) -> &PendingQueues {
        &self.pending
    }

    /// Translate one compilation unit into the shared tree (phase 1).
    pub fn add_unit(&mut self, file: FileId, unit: &CompilationUnit) {
        let unit_id = UnitId(self.units.len() as u32);
        self.units.push(UnitContext {
            file,
            imports: unit.imports.clone(),
        });
        debug!(%file, package = unit.package.as_deref().unwrap_or(""), "translating unit");

        let mut namespace = self.model.root();
        if let Some(package) = &unit.package {
            let segments: Vec<&str> = package.split('.').collect();
            namespace = self.model.ensure_package(namespace, &segments);
        }
        for decl in &unit.types {
            self.translate_type(namespace, decl, unit_id);
        }
    }

    /// Resolve all deferred references (phase 2) and take the finished tree.
    pub fn finish(mut self) -> Model {
        debug!(
            units = self.units.len(),
            pending = self.pending.len(),
            "first phase complete, resolving"
        );
        resolve::resolve(&mut self.model, &self.units, self.pending);
        self.model
    }

    // ========================================================================
    // TYPE DECLARATIONS
    // ========================================================================

    fn translate_type(&mut self, namespace: ElementId, decl: &TypeDecl, unit: UnitId) {
        let kind = match decl.kind {
            TypeKind::Class => NamespaceKind::Class,
            TypeKind::Interface => NamespaceKind::Interface,
            TypeKind::Enum => NamespaceKind::Enum,
            TypeKind::AnnotationType => NamespaceKind::AnnotationType,
        };
        let mut data = NamespaceData::new(kind);
        data.visibility = visibility_of(&decl.modifiers);
        data.is_abstract = ast::has_modifier(&decl.modifiers, Modifier::Abstract);
        data.is_leaf = ast::has_modifier(&decl.modifiers, Modifier::Final);
        if decl.kind == TypeKind::AnnotationType {
            data.stereotype = Some(SmolStr::new("annotationType"));
        }
        data.documentation = decl.comment.clone();
        data.template_parameters = template_parameters(&decl.type_parameters);

        let classifier = self.model.add(Element {
            name: decl.name.clone(),
            owner: Some(namespace),
            data: ElementData::Namespace(data),
        });

        // Supertype names are recorded, never looked up here.
        let extend_kind = match decl.kind {
            TypeKind::Interface => ExtendKind::Interface,
            _ => ExtendKind::Class,
        };
        for ty in &decl.extends {
            self.pending.extends.push(ExtendPending {
                classifier,
                ty: ty.clone(),
                kind: extend_kind,
                unit,
            });
        }
        for ty in &decl.implements {
            self.pending.implements.push(ImplementPending {
                classifier,
                ty: ty.clone(),
                unit,
            });
        }

        // Nested types first, so sibling inner types exist before member
        // translation runs (same-unit forward references to inner types).
        for member in &decl.body {
            if let Member::Type(inner) = member {
                self.translate_type(classifier, inner, unit);
            }
        }
        self.translate_members(classifier, &decl.body, unit);
    }

    // ========================================================================
    // MEMBERS
    // ========================================================================

    fn translate_members(&mut self, namespace: ElementId, body: &[Member], unit: UnitId) {
        for member in body {
            match member {
                // Handled by the nested-type pass in translate_type.
                Member::Type(_) => {}
                Member::Field(field) => {
                    if self.skips(&field.modifiers) {
                        continue;
                    }
                    if self.options.association {
                        self.translate_field_as_association(namespace, field, unit);
                    } else {
                        self.translate_field_as_attribute(namespace, field, unit);
                    }
                }
                Member::Method(method) => {
                    if self.skips(&method.modifiers) {
                        continue;
                    }
                    self.translate_method(namespace, method, false, unit);
                }
                Member::Constructor(method) => {
                    if self.skips(&method.modifiers) {
                        continue;
                    }
                    self.translate_method(namespace, method, true, unit);
                }
                Member::EnumConstant(constant) => {
                    // Enum constants carry no modifiers, so they count as
                    // package-visible and a public-only run drops them.
                    if self.skips(&[]) {
                        continue;
                    }
                    self.model.add(Element {
                        name: constant.name.clone(),
                        owner: Some(namespace),
                        data: ElementData::Literal(LiteralData {
                            documentation: constant.comment.clone(),
                        }),
                    });
                }
            }
        }
    }

    /// A public-only run drops any member that is not public, before any
    /// element or pending record for it exists.
    fn skips(&self, modifiers: &[Modifier]) -> bool {
        self.options.public_only && visibility_of(modifiers) != Visibility::Public
    }

    /// Defer a whole field declaration for association translation.
    ///
    /// One record covers all co-declared variables; they resolve together
    /// against the same target type in phase 2.
    fn translate_field_as_association(
        &mut self,
        namespace: ElementId,
        field: &FieldDecl,
        unit: UnitId,
    ) {
        if field.variables.is_empty() {
            return;
        }
        self.pending.associations.push(AssociationPending {
            classifier: namespace,
            field: field.clone(),
            unit,
        });
    }

    fn translate_field_as_attribute(
        &mut self,
        namespace: ElementId,
        field: &FieldDecl,
        unit: UnitId,
    ) {
        for variable in &field.variables {
            let attribute = build_field_attribute(&mut self.model, namespace, field, variable);
            self.pending.typed_features.push(TypedFeaturePending {
                namespace,
                feature: attribute,
                ty: field.ty.clone(),
                unit,
            });
        }
    }

    fn translate_method(
        &mut self,
        namespace: ElementId,
        decl: &MethodDecl,
        is_constructor: bool,
        unit: UnitId,
    ) {
        let mut data = OperationData {
            visibility: visibility_of(&decl.modifiers),
            ..OperationData::default()
        };
        data.is_static = ast::has_modifier(&decl.modifiers, Modifier::Static);
        data.is_abstract = ast::has_modifier(&decl.modifiers, Modifier::Abstract);
        data.is_leaf = ast::has_modifier(&decl.modifiers, Modifier::Final);
        data.is_concurrent = ast::has_modifier(&decl.modifiers, Modifier::Synchronized);
        if ast::has_modifier(&decl.modifiers, Modifier::Native) {
            data.tags.push(Tag::boolean("native", true));
        }
        if ast::has_modifier(&decl.modifiers, Modifier::Strictfp) {
            data.tags.push(Tag::boolean("strictfp", true));
        }
        if is_constructor {
            data.stereotype = Some(SmolStr::new("constructor"));
        }
        data.documentation = decl.comment.clone();
        if let Some(default) = &decl.default_value {
            data.tags.push(Tag::string("default", default.clone()));
        }
        data.template_parameters = template_parameters(&decl.type_parameters);

        let operation = self.model.add(Element {
            name: decl.name.clone(),
            owner: Some(namespace),
            data: ElementData::Operation(data),
        });

        for parameter in &decl.parameters {
            let param = self.model.add(Element {
                name: parameter.name.clone(),
                owner: Some(operation),
                data: ElementData::Parameter(ParameterData::default()),
            });
            self.pending.typed_features.push(TypedFeaturePending {
                namespace,
                feature: param,
                ty: parameter.ty.clone(),
                unit,
            });
        }

        // Non-void return types become one synthetic return-direction
        // parameter, resolved like any other typed feature.
        if let Some(return_type) = &decl.return_type {
            if return_type.name != "void" {
                let param = self.model.add(Element {
                    name: SmolStr::default(),
                    owner: Some(operation),
                    data: ElementData::Parameter(ParameterData {
                        direction: Direction::Return,
                        ..ParameterData::default()
                    }),
                });
                self.pending.typed_features.push(TypedFeaturePending {
                    namespace,
                    feature: param,
                    ty: return_type.clone(),
                    unit,
                });
            }
        }

        for name in &decl.throws {
            self.pending.throws.push(ThrowPending {
                operation,
                name: name.clone(),
                unit,
            });
        }
    }
}

// ============================================================================
// HELPERS (shared with the second phase)
// ============================================================================

/// Visibility from a modifier list, first match wins:
/// public > protected > private > package-default.
pub(crate) fn visibility_of(modifiers: &[Modifier]) -> Visibility {
    if ast::has_modifier(modifiers, Modifier::Public) {
        Visibility::Public
    } else if ast::has_modifier(modifiers, Modifier::Protected) {
        Visibility::Protected
    } else if ast::has_modifier(modifiers, Modifier::Private) {
        Visibility::Private
    } else {
        Visibility::Package
    }
}

/// Create one attribute for one declared variable of a field.
///
/// Also used by the association drain when it falls back to the plain
/// attribute path for an unresolvable field type.
pub(crate) fn build_field_attribute(
    model: &mut Model,
    namespace: ElementId,
    field: &FieldDecl,
    variable: &VariableDecl,
) -> ElementId {
    let mut data = AttributeData {
        visibility: visibility_of(&field.modifiers),
        ..AttributeData::default()
    };
    data.default_value = variable.initializer.clone();
    data.is_static = ast::has_modifier(&field.modifiers, Modifier::Static);
    if ast::has_modifier(&field.modifiers, Modifier::Final) {
        data.is_leaf = true;
        data.is_read_only = true;
    }
    if ast::has_modifier(&field.modifiers, Modifier::Volatile) {
        data.tags.push(Tag::boolean("volatile", true));
    }
    if ast::has_modifier(&field.modifiers, Modifier::Transient) {
        data.tags.push(Tag::boolean("transient", true));
    }
    data.documentation = field.comment.clone();

    model.add(Element {
        name: variable.name.clone(),
        owner: Some(namespace),
        data: ElementData::Attribute(data),
    })
}

fn template_parameters(declared: &[TypeParameter]) -> Vec<TemplateParameter> {
    declared
        .iter()
        .map(|tp| TemplateParameter {
            name: tp.name.clone(),
            parameter_type: tp.bound.clone(),
        })
        .collect()
}
