//! End-to-end tests of the directory-to-model pipeline.
//!
//! A stub parser stands in for the external grammar: each registered file
//! text maps to a prebuilt compilation unit, and unknown text fails the
//! parse. Everything downstream of the parser seam (translation, the phase
//! barrier, resolution, stubbing) runs for real.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use smol_str::SmolStr;
use tempfile::TempDir;

use jrev::ast::{
    CompilationUnit, FieldDecl, Import, Member, MethodDecl, ParseError, SourceParser, TypeDecl,
    TypeKind, TypeRef,
};
use jrev::model::{ElementData, NamespaceKind, TypeExpr, Visibility};
use jrev::{AnalyzerOptions, Model, ReverseEngineer};

// ============================================================================
// STUB PARSER
// ============================================================================

#[derive(Default)]
struct StubParser {
    units: BTreeMap<String, CompilationUnit>,
}

impl StubParser {
    fn register(mut self, text: &str, unit: CompilationUnit) -> Self {
        self.units.insert(text.to_owned(), unit);
        self
    }
}

impl SourceParser for StubParser {
    fn file_extension(&self) -> &str {
        "java"
    }

    fn parse(&self, source: &str) -> Result<CompilationUnit, ParseError> {
        self.units
            .get(source)
            .cloned()
            .ok_or_else(|| ParseError::new(format!("no rule matched: {source:?}")))
    }
}

fn write_files(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, text) in files {
        fs::write(dir.path().join(name), text).unwrap();
    }
    dir
}

fn unit(package: &str, imports: Vec<Import>, types: Vec<TypeDecl>) -> CompilationUnit {
    CompilationUnit {
        package: Some(SmolStr::new(package)),
        imports,
        types,
    }
}

fn lookdown(model: &Model, dotted: &str) -> Option<jrev::ElementId> {
    let segments: Vec<&str> = dotted.split('.').collect();
    model.lookdown(model.root(), &segments)
}

// ============================================================================
// TESTS
// ============================================================================

#[test]
fn test_cross_file_forward_reference() {
    // consumer.java is discovered (and translated) before supplier.java,
    // but the supertype still resolves to the real definition.
    let mut consumer = TypeDecl::new(TypeKind::Class, "Consumer");
    consumer.extends = vec![TypeRef::named("Supplier")];

    let dir = write_files(&[("consumer.java", "consumer"), ("supplier.java", "supplier")]);
    let parser = StubParser::default()
        .register("consumer", unit("com.acme", vec![], vec![consumer]))
        .register(
            "supplier",
            unit("com.acme", vec![], vec![TypeDecl::new(TypeKind::Enum, "Supplier")]),
        );

    let model = ReverseEngineer::new(parser, AnalyzerOptions::default())
        .analyze_directory(dir.path())
        .unwrap();

    let supplier = lookdown(&model, "com.acme.Supplier").unwrap();
    // The real enum, not a stub class.
    assert_eq!(model.namespace(supplier).unwrap().kind, NamespaceKind::Enum);

    let consumer = lookdown(&model, "com.acme.Consumer").unwrap();
    let generalizations: Vec<_> = model
        .namespace(consumer)
        .unwrap()
        .owned
        .iter()
        .filter_map(|&e| match &model.element(e).data {
            ElementData::Generalization(edge) => Some(edge.target),
            _ => None,
        })
        .collect();
    assert_eq!(generalizations, vec![supplier]);
}

#[test]
fn test_undefined_supertype_becomes_public_stub() {
    let mut decl = TypeDecl::new(TypeKind::Class, "App");
    decl.extends = vec![TypeRef::named("org.framework.Base")];

    let dir = write_files(&[("app.java", "app")]);
    let parser = StubParser::default().register("app", unit("com.acme", vec![], vec![decl]));

    let model = ReverseEngineer::new(parser, AnalyzerOptions::default())
        .analyze_directory(dir.path())
        .unwrap();

    let stub = lookdown(&model, "org.framework.Base").unwrap();
    let ns = model.namespace(stub).unwrap();
    assert_eq!(ns.kind, NamespaceKind::Class);
    assert_eq!(ns.visibility, Visibility::Public);
    assert!(ns.attributes.is_empty() && ns.operations.is_empty());

    // The intermediate segments materialized as packages.
    let org = lookdown(&model, "org").unwrap();
    assert_eq!(model.namespace(org).unwrap().kind, NamespaceKind::Package);
}

#[test]
fn test_collection_attribute_of_unresolved_item() {
    // private java.util.List<String> names; -> type String, multiplicity *,
    // and a collection tag recording the declared container.
    let field = FieldDecl::new(TypeRef::named("java.util.List").with_arguments(["String"]))
        .variable("names");
    let mut decl = TypeDecl::new(TypeKind::Class, "Roster");
    decl.body = vec![Member::Field(field)];

    let dir = write_files(&[("roster.java", "roster")]);
    let parser = StubParser::default().register("roster", unit("com.acme", vec![], vec![decl]));

    let model = ReverseEngineer::new(parser, AnalyzerOptions::default())
        .analyze_directory(dir.path())
        .unwrap();

    let roster = lookdown(&model, "com.acme.Roster").unwrap();
    let attr = model.namespace(roster).unwrap().attributes[0];
    match &model.element(attr).data {
        ElementData::Attribute(data) => {
            assert_eq!(data.ty, TypeExpr::Primitive(SmolStr::new("String")));
            assert_eq!(data.multiplicity, "*");
            assert_eq!(data.tags.len(), 1);
            assert_eq!(data.tags[0].name, "collection");
        }
        other => panic!("expected attribute, got {other:?}"),
    }
    // No stub named String or java.util.List appeared anywhere.
    assert!(lookdown(&model, "String").is_none());
    assert!(lookdown(&model, "java").is_none());
}

#[test]
fn test_collection_association_to_defined_class() {
    let field =
        FieldDecl::new(TypeRef::named("List").with_arguments(["ClassTest"])).variable("tests");
    let mut suite = TypeDecl::new(TypeKind::Class, "Suite");
    suite.body = vec![Member::Field(field)];

    let dir = write_files(&[("suite.java", "suite"), ("test.java", "test")]);
    let parser = StubParser::default()
        .register(
            "suite",
            unit("com.acme", vec![Import::exact("java.util.List")], vec![suite]),
        )
        .register(
            "test",
            unit("com.acme", vec![], vec![TypeDecl::new(TypeKind::Class, "ClassTest")]),
        );

    let options = AnalyzerOptions {
        association: true,
        ..AnalyzerOptions::default()
    };
    let model = ReverseEngineer::new(parser, options)
        .analyze_directory(dir.path())
        .unwrap();

    let suite = lookdown(&model, "com.acme.Suite").unwrap();
    let target = lookdown(&model, "com.acme.ClassTest").unwrap();
    let associations: Vec<_> = model
        .namespace(suite)
        .unwrap()
        .owned
        .iter()
        .filter_map(|&e| match &model.element(e).data {
            ElementData::Association(data) => Some(data.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(associations.len(), 1);

    let assoc = &associations[0];
    assert_eq!(assoc.end1.reference, suite);
    assert!(assoc.end1.name.is_empty());
    assert!(!assoc.end1.navigable);
    assert_eq!(assoc.end2.reference, target);
    assert_eq!(assoc.end2.name, "tests");
    assert_eq!(assoc.end2.multiplicity, "*");
}

#[test]
fn test_unresolvable_association_falls_back_to_attribute() {
    let field = FieldDecl::new(TypeRef::named("vendor.Opaque")).variable("handle");
    let mut decl = TypeDecl::new(TypeKind::Class, "App");
    decl.body = vec![Member::Field(field)];

    let dir = write_files(&[("app.java", "app")]);
    let parser = StubParser::default().register("app", unit("com.acme", vec![], vec![decl]));

    let options = AnalyzerOptions {
        association: true,
        ..AnalyzerOptions::default()
    };
    let model = ReverseEngineer::new(parser, options)
        .analyze_directory(dir.path())
        .unwrap();

    let app = lookdown(&model, "com.acme.App").unwrap();
    let ns = model.namespace(app).unwrap();
    assert!(ns.owned.is_empty(), "no association edge expected");
    assert_eq!(ns.attributes.len(), 1);

    let stub = lookdown(&model, "vendor.Opaque").unwrap();
    match &model.element(ns.attributes[0]).data {
        ElementData::Attribute(data) => assert_eq!(data.ty, TypeExpr::Ref(stub)),
        other => panic!("expected attribute, got {other:?}"),
    }
}

#[test]
fn test_array_multiplicity_per_dimension() {
    let field = FieldDecl::new(TypeRef::named("int").with_array_dimension(2)).variable("grid");
    let mut decl = TypeDecl::new(TypeKind::Class, "Board");
    decl.body = vec![Member::Field(field)];

    let dir = write_files(&[("board.java", "board")]);
    let parser = StubParser::default().register("board", unit("com.acme", vec![], vec![decl]));

    let model = ReverseEngineer::new(parser, AnalyzerOptions::default())
        .analyze_directory(dir.path())
        .unwrap();

    let board = lookdown(&model, "com.acme.Board").unwrap();
    match &model.element(model.namespace(board).unwrap().attributes[0]).data {
        ElementData::Attribute(data) => {
            assert_eq!(data.ty, TypeExpr::Primitive(SmolStr::new("int")));
            assert_eq!(data.multiplicity, "*,*");
        }
        other => panic!("expected attribute, got {other:?}"),
    }
}

#[test]
fn test_shared_stub_across_files() {
    // Two files miss the same undefined type; the model holds one node.
    let mut a = TypeDecl::new(TypeKind::Class, "A");
    a.extends = vec![TypeRef::named("org.lib.Shared")];
    let mut b = TypeDecl::new(TypeKind::Class, "B");
    b.implements = vec![TypeRef::named("org.lib.Shared")];

    let dir = write_files(&[("a.java", "a"), ("b.java", "b")]);
    let parser = StubParser::default()
        .register("a", unit("com.acme", vec![], vec![a]))
        .register("b", unit("com.acme", vec![], vec![b]));

    let model = ReverseEngineer::new(parser, AnalyzerOptions::default())
        .analyze_directory(dir.path())
        .unwrap();

    let lib = lookdown(&model, "org.lib").unwrap();
    assert_eq!(model.namespace(lib).unwrap().owned.len(), 1);

    // Extends drained first, so the shared stub took its kind from the
    // class-extends miss.
    let shared = lookdown(&model, "org.lib.Shared").unwrap();
    assert_eq!(model.namespace(shared).unwrap().kind, NamespaceKind::Class);
}

#[test]
fn test_parse_failure_keeps_other_contributions() {
    let dir = write_files(&[
        ("bad.java", "int int int"),
        ("good.java", "good"),
    ]);
    let parser = StubParser::default().register(
        "good",
        unit("com.acme", vec![], vec![TypeDecl::new(TypeKind::Class, "Good")]),
    );

    let model = ReverseEngineer::new(parser, AnalyzerOptions::default())
        .analyze_directory(dir.path())
        .unwrap();

    assert!(lookdown(&model, "com.acme.Good").is_some());
}

#[test]
fn test_non_matching_extensions_ignored() {
    let dir = write_files(&[("readme.txt", "class A"), ("build.gradle", "x")]);
    let parser = StubParser::default();

    let model = ReverseEngineer::new(parser, AnalyzerOptions::default())
        .analyze_directory(dir.path())
        .unwrap();

    assert!(model.is_empty());
}

#[test]
fn test_missing_directory_is_fatal() {
    let parser = StubParser::default();
    let engine = ReverseEngineer::new(parser, AnalyzerOptions::default());

    assert!(engine.analyze_directory(Path::new("/no/such/dir")).is_err());
}

#[test]
fn test_repeated_runs_are_structurally_identical() {
    let field = FieldDecl::new(TypeRef::named("java.util.Set").with_arguments(["Person"]))
        .variable("friends");
    let mut person = TypeDecl::new(TypeKind::Class, "Person");
    person.extends = vec![TypeRef::named("org.lib.Entity")];
    person.body = vec![
        Member::Field(field),
        Member::Method(MethodDecl::new("clear")),
    ];

    let build = || {
        let dir = write_files(&[("person.java", "person")]);
        let parser = StubParser::default()
            .register("person", unit("com.acme", vec![], vec![person.clone()]));
        ReverseEngineer::new(parser, AnalyzerOptions::default())
            .analyze_directory(dir.path())
            .unwrap()
    };

    let first = build();
    let second = build();
    assert_eq!(first.len(), second.len());
    assert_eq!(structure_of(&first), structure_of(&second));
}

/// Flatten a model into (qualified name, discriminant) pairs for
/// order-insensitive structural comparison.
fn structure_of(model: &Model) -> Vec<(String, &'static str)> {
    let mut out = Vec::new();
    for index in 0..model.len() {
        let id = jrev::ElementId::new(index as u32);
        let kind = match &model.element(id).data {
            ElementData::Namespace(_) => "namespace",
            ElementData::Attribute(_) => "attribute",
            ElementData::Operation(_) => "operation",
            ElementData::Parameter(_) => "parameter",
            ElementData::Literal(_) => "literal",
            ElementData::Generalization(_) => "generalization",
            ElementData::Realization(_) => "realization",
            ElementData::Association(_) => "association",
        };
        out.push((model.qualified_name(id), kind));
    }
    out.sort();
    out
}
