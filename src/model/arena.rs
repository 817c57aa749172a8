//! The element arena and namespace-tree navigation.
//!
//! Elements live in a single `Vec` and point at each other with
//! [`ElementId`]s. The tree shape is redundant on purpose: every element
//! records its owner, and every namespace records its owned elements in
//! creation order. Phase 1 only ever appends; phase 2 mutates feature types
//! and appends relationship edges.

use smol_str::SmolStr;

use super::ids::ElementId;

// ============================================================================
// ELEMENT PAYLOADS
// ============================================================================

/// UML visibility of a model element.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    Private,
    /// Java's default (package-private) visibility.
    #[default]
    Package,
}

/// Kind of a namespace element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NamespaceKind {
    Package,
    Class,
    Interface,
    Enum,
    AnnotationType,
}

/// Direction of an operation parameter.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    In,
    /// The synthetic parameter carrying an operation's return type.
    Return,
}

/// The declared type of a structural feature.
///
/// Resolution ends in one of two shapes: a reference to a classifier in the
/// tree, or the literal text of a primitive/boxed keyword that is never
/// looked up.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum TypeExpr {
    /// Not resolved yet (phase 1 state).
    #[default]
    Unresolved,
    /// Resolved to a classifier element.
    Ref(ElementId),
    /// A primitive or boxed keyword, kept as plain text.
    Primitive(SmolStr),
}

/// A free-form key/value tag.
#[derive(Clone, Debug, PartialEq)]
pub struct Tag {
    pub name: SmolStr,
    pub value: TagValue,
}

/// The value of a [`Tag`].
#[derive(Clone, Debug, PartialEq)]
pub enum TagValue {
    Bool(bool),
    Str(String),
}

impl Tag {
    /// A boolean tag.
    pub fn boolean(name: impl Into<SmolStr>, value: bool) -> Self {
        Self {
            name: name.into(),
            value: TagValue::Bool(value),
        }
    }

    /// A string tag.
    pub fn string(name: impl Into<SmolStr>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: TagValue::Str(value.into()),
        }
    }
}

/// A declared template parameter, kept as free text.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateParameter {
    pub name: SmolStr,
    /// Bound text, e.g. `Comparable<E>`. Never resolved.
    pub parameter_type: Option<String>,
}

/// Payload of a package or classifier.
#[derive(Clone, Debug, PartialEq)]
pub struct NamespaceData {
    pub kind: NamespaceKind,
    pub visibility: Visibility,
    pub is_abstract: bool,
    /// Final classes map to leaf classifiers.
    pub is_leaf: bool,
    /// Optional stereotype, e.g. `annotationType`.
    pub stereotype: Option<SmolStr>,
    /// Leading comment of the declaration, verbatim.
    pub documentation: Option<String>,
    pub template_parameters: Vec<TemplateParameter>,
    /// Nested namespaces and relationship edges, in creation order.
    pub owned: Vec<ElementId>,
    pub attributes: Vec<ElementId>,
    pub operations: Vec<ElementId>,
    pub literals: Vec<ElementId>,
}

impl NamespaceData {
    /// An empty namespace of the given kind.
    pub fn new(kind: NamespaceKind) -> Self {
        Self {
            kind,
            visibility: Visibility::default(),
            is_abstract: false,
            is_leaf: false,
            stereotype: None,
            documentation: None,
            template_parameters: Vec::new(),
            owned: Vec::new(),
            attributes: Vec::new(),
            operations: Vec::new(),
            literals: Vec::new(),
        }
    }
}

/// Payload of an attribute.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeData {
    pub visibility: Visibility,
    pub ty: TypeExpr,
    /// `""`, `"*"`, or a comma-joined `"*"` per array dimension.
    pub multiplicity: SmolStr,
    /// Initializer text, verbatim and unevaluated.
    pub default_value: Option<String>,
    pub is_static: bool,
    pub is_leaf: bool,
    pub is_read_only: bool,
    pub tags: Vec<Tag>,
    pub documentation: Option<String>,
}

/// Payload of an operation (method or constructor).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OperationData {
    pub visibility: Visibility,
    /// `constructor` for constructors.
    pub stereotype: Option<SmolStr>,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_leaf: bool,
    /// `synchronized` methods map to concurrent operations.
    pub is_concurrent: bool,
    pub template_parameters: Vec<TemplateParameter>,
    /// Formal parameters plus at most one return-direction parameter.
    pub parameters: Vec<ElementId>,
    /// Referenced (not owned) exception classifiers, in declaration order.
    pub raised_exceptions: Vec<ElementId>,
    pub tags: Vec<Tag>,
    pub documentation: Option<String>,
}

/// Payload of an operation parameter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterData {
    pub direction: Direction,
    pub ty: TypeExpr,
    pub multiplicity: SmolStr,
    pub tags: Vec<Tag>,
}

/// Payload of an enumeration literal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LiteralData {
    pub documentation: Option<String>,
}

/// Payload of a generalization or interface-realization edge.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeData {
    pub source: ElementId,
    pub target: ElementId,
}

/// One end of an association.
#[derive(Clone, Debug, PartialEq)]
pub struct AssociationEnd {
    pub reference: ElementId,
    pub name: SmolStr,
    pub visibility: Visibility,
    pub navigable: bool,
    pub multiplicity: SmolStr,
    pub is_read_only: bool,
    pub tags: Vec<Tag>,
}

impl AssociationEnd {
    /// The fixed owner end: unnamed, package visibility, non-navigable.
    pub fn owner_end(reference: ElementId) -> Self {
        Self {
            reference,
            name: SmolStr::default(),
            visibility: Visibility::Package,
            navigable: false,
            multiplicity: SmolStr::default(),
            is_read_only: false,
            tags: Vec::new(),
        }
    }
}

/// Payload of an association edge. `end1` is always the owner end.
#[derive(Clone, Debug, PartialEq)]
pub struct AssociationData {
    pub end1: AssociationEnd,
    pub end2: AssociationEnd,
}

/// The tagged-variant payload of a model element.
#[derive(Clone, Debug, PartialEq)]
pub enum ElementData {
    Namespace(NamespaceData),
    Attribute(AttributeData),
    Operation(OperationData),
    Parameter(ParameterData),
    Literal(LiteralData),
    Generalization(EdgeData),
    Realization(EdgeData),
    Association(AssociationData),
}

/// One element in the arena.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// Simple name. Empty for relationship edges and return parameters.
    pub name: SmolStr,
    /// The owning element; `None` only for the shared root.
    pub owner: Option<ElementId>,
    pub data: ElementData,
}

// ============================================================================
// MODEL ARENA
// ============================================================================

/// The shared, mutable model tree for a whole batch run.
///
/// Construction starts from a root package-like node named `JavaReverse`
/// with no owner. All creation is lookup-or-create along dotted paths, so
/// re-requesting the same path always yields the same element.
#[derive(Clone, Debug)]
pub struct Model {
    elements: Vec<Element>,
    root: ElementId,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// Create a model containing only the shared root.
    pub fn new() -> Self {
        let root = Element {
            name: SmolStr::new("JavaReverse"),
            owner: None,
            data: ElementData::Namespace(NamespaceData::new(NamespaceKind::Package)),
        };
        Self {
            elements: vec![root],
            root: ElementId::new(0),
        }
    }

    /// The shared root element.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Total number of elements in the arena.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the model holds nothing but the root.
    pub fn is_empty(&self) -> bool {
        self.elements.len() == 1
    }

    /// Get an element by id.
    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.index() as usize]
    }

    /// Get an element by id (mutable).
    pub fn element_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.elements[id.index() as usize]
    }

    /// The namespace payload of an element, if it is one.
    pub fn namespace(&self, id: ElementId) -> Option<&NamespaceData> {
        match &self.element(id).data {
            ElementData::Namespace(ns) => Some(ns),
            _ => None,
        }
    }

    fn namespace_mut(&mut self, id: ElementId) -> Option<&mut NamespaceData> {
        match &mut self.element_mut(id).data {
            ElementData::Namespace(ns) => Some(ns),
            _ => None,
        }
    }

    /// Add an element to the arena and register it with its owner.
    ///
    /// Where the element lands in the owner depends on its payload:
    /// namespaces and relationship edges go into the owner's `owned` list,
    /// attributes/operations/literals into their dedicated lists, and
    /// parameters into the owning operation's parameter list.
    pub fn add(&mut self, element: Element) -> ElementId {
        debug_assert!(element.owner.is_some(), "only the root may lack an owner");

        let id = ElementId::new(self.elements.len() as u32);
        let owner = element.owner;
        let slot = match &element.data {
            ElementData::Namespace(_)
            | ElementData::Generalization(_)
            | ElementData::Realization(_)
            | ElementData::Association(_) => Slot::Owned,
            ElementData::Attribute(_) => Slot::Attribute,
            ElementData::Operation(_) => Slot::Operation,
            ElementData::Literal(_) => Slot::Literal,
            ElementData::Parameter(_) => Slot::Parameter,
        };
        self.elements.push(element);

        if let Some(owner) = owner {
            match slot {
                Slot::Parameter => {
                    if let ElementData::Operation(op) = &mut self.element_mut(owner).data {
                        op.parameters.push(id);
                    }
                }
                _ => {
                    if let Some(ns) = self.namespace_mut(owner) {
                        match slot {
                            Slot::Owned => ns.owned.push(id),
                            Slot::Attribute => ns.attributes.push(id),
                            Slot::Operation => ns.operations.push(id),
                            Slot::Literal => ns.literals.push(id),
                            Slot::Parameter => unreachable!(),
                        }
                    }
                }
            }
        }
        id
    }

    // ========================================================================
    // NAVIGATION
    // ========================================================================

    /// Find a directly owned namespace child by exact name.
    ///
    /// Only namespace elements participate; attributes, operations and edges
    /// are never returned.
    pub fn find_by_name(&self, namespace: ElementId, name: &str) -> Option<ElementId> {
        let ns = self.namespace(namespace)?;
        ns.owned
            .iter()
            .copied()
            .find(|&child| {
                matches!(self.element(child).data, ElementData::Namespace(_))
                    && self.element(child).name == name
            })
    }

    /// Descend child-by-child along `path` starting at `from`.
    pub fn lookdown(&self, from: ElementId, path: &[&str]) -> Option<ElementId> {
        let mut current = from;
        for segment in path {
            current = self.find_by_name(current, segment)?;
        }
        if path.is_empty() { None } else { Some(current) }
    }

    /// Iterate the owner chain from `from` (inclusive) up to the root.
    pub fn owner_chain(&self, from: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        std::iter::successors(Some(from), move |&current| self.element(current).owner)
    }

    /// Walk outward through the owner chain, testing each namespace for a
    /// visible child named `name`.
    pub fn lookup_through_owners(&self, from: ElementId, name: &str) -> Option<ElementId> {
        self.owner_chain(from)
            .find_map(|ancestor| self.find_by_name(ancestor, name))
    }

    /// Dotted path of an element from (but excluding) the root.
    ///
    /// Mostly useful in logs and tests.
    pub fn qualified_name(&self, id: ElementId) -> String {
        let mut segments: Vec<&str> = self
            .owner_chain(id)
            .filter(|&e| e != self.root)
            .map(|e| self.element(e).name.as_str())
            .collect();
        segments.reverse();
        segments.join(".")
    }

    // ========================================================================
    // LOOKUP-OR-CREATE (stub synthesis lives on top of these)
    // ========================================================================

    /// Walk/create the package chain named by `path` under `namespace`.
    ///
    /// Existing children are reused on exact-name match whatever their kind;
    /// missing segments become new packages. An empty path returns
    /// `namespace` itself.
    pub fn ensure_package(&mut self, namespace: ElementId, path: &[&str]) -> ElementId {
        let mut current = namespace;
        for segment in path {
            if segment.is_empty() {
                continue;
            }
            current = match self.find_by_name(current, segment) {
                Some(existing) => existing,
                None => self.add(Element {
                    name: SmolStr::new(segment),
                    owner: Some(current),
                    data: ElementData::Namespace(NamespaceData::new(NamespaceKind::Package)),
                }),
            };
        }
        current
    }

    /// Walk/create packages for all but the last segment of `path`, then
    /// lookup-or-create a terminal public Class with no members.
    pub fn ensure_class(&mut self, namespace: ElementId, path: &[&str]) -> ElementId {
        self.ensure_classifier(namespace, path, NamespaceKind::Class)
    }

    /// Same as [`Model::ensure_class`] but the terminal node is an Interface.
    pub fn ensure_interface(&mut self, namespace: ElementId, path: &[&str]) -> ElementId {
        self.ensure_classifier(namespace, path, NamespaceKind::Interface)
    }

    fn ensure_classifier(
        &mut self,
        namespace: ElementId,
        path: &[&str],
        kind: NamespaceKind,
    ) -> ElementId {
        let (name, packages) = match path.split_last() {
            Some(split) => split,
            None => return namespace,
        };
        let package = self.ensure_package(namespace, packages);
        match self.find_by_name(package, name) {
            Some(existing) => existing,
            None => {
                let mut data = NamespaceData::new(kind);
                data.visibility = Visibility::Public;
                self.add(Element {
                    name: SmolStr::new(name),
                    owner: Some(package),
                    data: ElementData::Namespace(data),
                })
            }
        }
    }
}

enum Slot {
    Owned,
    Attribute,
    Operation,
    Literal,
    Parameter,
}
