//! Output contract of the external Java parser.
//!
//! The grammar and parser themselves live outside this crate; anything able
//! to produce a [`CompilationUnit`] per file can drive the model builder.
//! The shapes here mirror what the `java7` grammar emits: a compilation unit
//! carries an optional package declaration, an import list, and an ordered
//! list of top-level type declarations.
//!
//! All text captured from the source (comments, initializers, default
//! values) is kept verbatim and never evaluated.

use smol_str::SmolStr;
use thiserror::Error;

// ============================================================================
// PARSER SEAM
// ============================================================================

/// Error reported by a [`SourceParser`] for malformed input.
///
/// Parse failures are recovered per file by the batch driver; they never
/// abort a run.
#[derive(Clone, Debug, Error)]
#[error("{message}")]
pub struct ParseError {
    /// Human-readable description of the failure.
    pub message: String,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The parser collaborator: raw file text in, one [`CompilationUnit`] out.
pub trait SourceParser {
    /// File extension (without the dot) this parser accepts.
    ///
    /// The directory scan compares extensions case-insensitively against
    /// this value.
    fn file_extension(&self) -> &str;

    /// Parse one file's text into a compilation unit.
    fn parse(&self, source: &str) -> Result<CompilationUnit, ParseError>;
}

// ============================================================================
// COMPILATION UNIT
// ============================================================================

/// A parsed source file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompilationUnit {
    /// Dotted package name from the package declaration, if any.
    pub package: Option<SmolStr>,
    /// Import declarations, in source order.
    pub imports: Vec<Import>,
    /// Top-level type declarations, in source order.
    pub types: Vec<TypeDecl>,
}

/// An import declaration.
///
/// For a wildcard import `import java.util.*;` the `path` is `java.util`
/// and `wildcard` is set. Static imports are parsed and preserved but play
/// no part in type resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct Import {
    /// Dotted import path (without any trailing `.*`).
    pub path: SmolStr,
    /// Whether this is a wildcard (`.*`) import.
    pub wildcard: bool,
    /// Whether this is a `static` import.
    pub is_static: bool,
}

impl Import {
    /// An exact (non-wildcard) import.
    pub fn exact(path: impl Into<SmolStr>) -> Self {
        Self {
            path: path.into(),
            wildcard: false,
            is_static: false,
        }
    }

    /// A wildcard import of everything under `path`.
    pub fn wildcard(path: impl Into<SmolStr>) -> Self {
        Self {
            path: path.into(),
            wildcard: true,
            is_static: false,
        }
    }
}

// ============================================================================
// TYPE DECLARATIONS
// ============================================================================

/// Kind tag of a type declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    AnnotationType,
}

/// A class, interface, enum, or annotation type declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeDecl {
    /// Declaration kind.
    pub kind: TypeKind,
    /// Simple (undotted) name.
    pub name: SmolStr,
    /// Modifier list, in source order.
    pub modifiers: Vec<Modifier>,
    /// Leading comment (JavaDoc), verbatim.
    pub comment: Option<String>,
    /// Declared type parameters, e.g. `<E extends Comparable<E>>`.
    pub type_parameters: Vec<TypeParameter>,
    /// Supertypes from the `extends` clause. At most one for classes;
    /// interfaces may list several.
    pub extends: Vec<TypeRef>,
    /// Interfaces from the `implements` clause.
    pub implements: Vec<TypeRef>,
    /// Body members, in source order. Nested type declarations appear here
    /// alongside fields, methods, and enum constants.
    pub body: Vec<Member>,
}

impl TypeDecl {
    /// Create a bare declaration of the given kind and name.
    pub fn new(kind: TypeKind, name: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            name: name.into(),
            modifiers: Vec::new(),
            comment: None,
            type_parameters: Vec::new(),
            extends: Vec::new(),
            implements: Vec::new(),
            body: Vec::new(),
        }
    }
}

/// A declared type parameter: free-text name plus optional bound.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeParameter {
    pub name: SmolStr,
    /// Bound text, e.g. `Comparable<E>`. Never resolved.
    pub bound: Option<String>,
}

/// A raw, unresolved reference to a type as written in the source.
///
/// This is the payload every pending record carries into the second phase:
/// a dotted name, the type-argument names (only the first is ever read), and
/// the declared array rank.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TypeRef {
    /// Possibly dotted type name, e.g. `java.util.List`.
    pub name: SmolStr,
    /// Type-argument names, e.g. `String` in `List<String>`.
    pub type_arguments: Vec<SmolStr>,
    /// Number of declared array dimensions, e.g. 2 for `int[][]`.
    pub array_dimension: usize,
}

impl TypeRef {
    /// A plain reference by name.
    pub fn named(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add type arguments.
    pub fn with_arguments<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.type_arguments = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set the declared array rank.
    pub fn with_array_dimension(mut self, dims: usize) -> Self {
        self.array_dimension = dims;
        self
    }
}

// ============================================================================
// MEMBERS
// ============================================================================

/// A member of a type declaration body.
#[derive(Clone, Debug, PartialEq)]
pub enum Member {
    /// A nested type declaration.
    Type(TypeDecl),
    /// A field declaration (possibly with several co-declared variables).
    Field(FieldDecl),
    /// A method declaration.
    Method(MethodDecl),
    /// A constructor declaration.
    Constructor(MethodDecl),
    /// An enum constant.
    EnumConstant(EnumConstantDecl),
}

/// A field declaration.
///
/// One declaration may introduce several variables (`int a, b, c;`); all of
/// them share the modifiers, declared type, and comment.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDecl {
    pub modifiers: Vec<Modifier>,
    /// Declared type, shared by every variable.
    pub ty: TypeRef,
    /// Co-declared variables, in source order.
    pub variables: Vec<VariableDecl>,
    /// Leading comment, verbatim.
    pub comment: Option<String>,
}

impl FieldDecl {
    /// A field of the given type with no variables yet.
    pub fn new(ty: TypeRef) -> Self {
        Self {
            modifiers: Vec::new(),
            ty,
            variables: Vec::new(),
            comment: None,
        }
    }

    /// Append a variable with no initializer.
    pub fn variable(mut self, name: impl Into<SmolStr>) -> Self {
        self.variables.push(VariableDecl {
            name: name.into(),
            initializer: None,
        });
        self
    }
}

/// One declared variable within a field declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableDecl {
    pub name: SmolStr,
    /// Initializer text, verbatim and unevaluated.
    pub initializer: Option<String>,
}

/// A method or constructor declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct MethodDecl {
    pub name: SmolStr,
    pub modifiers: Vec<Modifier>,
    pub type_parameters: Vec<TypeParameter>,
    /// Declared return type. `None` for constructors; `void` appears as a
    /// regular named type.
    pub return_type: Option<TypeRef>,
    /// Formal parameters, in source order.
    pub parameters: Vec<ParameterDecl>,
    /// Thrown exception type names, in declaration order.
    pub throws: Vec<SmolStr>,
    /// Leading comment, verbatim.
    pub comment: Option<String>,
    /// `default` value text of an annotation type element.
    pub default_value: Option<String>,
}

impl MethodDecl {
    /// A bare method with the given name.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            modifiers: Vec::new(),
            type_parameters: Vec::new(),
            return_type: None,
            parameters: Vec::new(),
            throws: Vec::new(),
            comment: None,
            default_value: None,
        }
    }
}

/// A formal parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterDecl {
    pub name: SmolStr,
    pub ty: TypeRef,
}

/// An enum constant.
#[derive(Clone, Debug, PartialEq)]
pub struct EnumConstantDecl {
    pub name: SmolStr,
    /// Constructor argument texts, verbatim.
    pub arguments: Vec<String>,
    /// Leading comment, verbatim.
    pub comment: Option<String>,
}

impl EnumConstantDecl {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            comment: None,
        }
    }
}

// ============================================================================
// MODIFIERS
// ============================================================================

/// A declaration modifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
    Synchronized,
    Native,
    Strictfp,
    Volatile,
    Transient,
}

/// Check for a modifier in a declaration's modifier list.
pub fn has_modifier(modifiers: &[Modifier], modifier: Modifier) -> bool {
    modifiers.contains(&modifier)
}
