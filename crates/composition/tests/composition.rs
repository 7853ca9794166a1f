#![allow(unused_crate_dependencies)]

use indoc::indoc;
use pretty_assertions::assert_eq;
use supergraph_composition::{compose, render_api_sdl, render_federated_sdl, CompositionResult, DiagnosticCode, Subgraphs};

const FEDERATION_V2: &str = r#"extend schema @link(url: "https://specs.apollo.dev/federation/v2.3", import: ["@key", "@shareable", "@external", "@inaccessible", "@override", "@provides", "@requires", "@tag"])"#;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn compose_federation_v2(subgraphs: &[(&str, &str)]) -> CompositionResult {
    init_logging();
    let mut ingested = Subgraphs::default();

    for (name, sdl) in subgraphs {
        ingested
            .ingest_str(&format!("{FEDERATION_V2}\n{sdl}"), name, None)
            .unwrap();
    }

    compose(&ingested)
}

fn codes(result: &CompositionResult) -> Vec<DiagnosticCode> {
    result.diagnostics().codes()
}

#[test]
fn shareable_value_type_nullability() {
    let result = compose_federation_v2(&[
        (
            "a",
            indoc! {"
                type Query { currentPosition: Position! }
                type Position @shareable { x: Int! y: Int! }
            "},
        ),
        ("b", "type Position @shareable { x: Int y: Int }"),
    ]);

    assert!(result.diagnostics().is_empty(), "{:?}", result.diagnostics());
    let graph = result.into_result().unwrap();

    let expected = indoc! {"
        type Position {
          x: Int
          y: Int
        }

        type Query {
          currentPosition: Position!
        }
    "};

    assert_eq!(render_api_sdl(&graph).unwrap(), expected);
    assert!(render_federated_sdl(&graph)
        .unwrap()
        .contains(r#"  x: Int @join__field(graph: A, type: "Int!", shareable: true) @join__field(graph: B, shareable: true)"#));
}

#[test]
fn incompatible_field_types() {
    let result = compose_federation_v2(&[
        (
            "a",
            "type Query { events: [Event] }\ntype Event @shareable { timestamp: Int! }",
        ),
        ("b", "type Event @shareable { timestamp: String! }"),
    ]);

    assert_eq!(codes(&result), [DiagnosticCode::FieldTypeMismatch]);
    assert!(result.into_result().is_err());
}

#[test]
fn field_only_resolvable_in_another_subgraph() {
    let result = compose_federation_v2(&[
        (
            "a",
            "type Query { currentPosition: Position! }\ntype Position @shareable { x: Int! y: Int! }",
        ),
        ("b", "type Position @shareable { x: Int! y: Int! z: Int! }"),
    ]);

    let errors = result.diagnostics().iter_errors().collect::<Vec<_>>();

    assert_eq!(
        errors,
        [
            "Subgraph \"a\" defines Query.currentPosition → Position, but Position.z is not resolvable in subgraph \"a\" \
             and no key path exists to a subgraph that resolves it"
        ]
    );
}

#[test]
fn inaccessible_fields_need_not_be_resolvable() {
    let result = compose_federation_v2(&[
        (
            "a",
            "type Query { currentPosition: Position! }\ntype Position @shareable { x: Int! y: Int! }",
        ),
        ("b", "type Position @shareable { x: Int! y: Int! z: Int! @inaccessible }"),
    ]);

    let graph = result.into_result().unwrap();
    let api_sdl = render_api_sdl(&graph).unwrap();
    let federated_sdl = render_federated_sdl(&graph).unwrap();

    assert!(!api_sdl.contains('z'), "{api_sdl}");
    assert!(
        federated_sdl.contains("  z: Int! @join__field(graph: B, shareable: true) @inaccessible\n"),
        "{federated_sdl}"
    );
}

#[test]
fn required_argument_missing_in_a_subgraph() {
    let result = compose_federation_v2(&[
        (
            "a",
            "type Query { building: Building }\ntype Building @shareable { height(units: String!): Int! }",
        ),
        ("b", "type Building @shareable { height: Int! }"),
    ]);

    assert_eq!(codes(&result), [DiagnosticCode::RequiredArgumentMissing]);
}

#[test]
fn optional_argument_missing_in_a_subgraph_is_dropped() {
    let result = compose_federation_v2(&[
        (
            "a",
            "type Query { building: Building }\ntype Building @shareable { height(units: String): Int! }",
        ),
        ("b", "type Building @shareable { height: Int! }"),
    ]);

    assert_eq!(codes(&result), [DiagnosticCode::InconsistentArgumentPresence]);

    let graph = result.into_result().unwrap();
    assert!(render_api_sdl(&graph).unwrap().contains("type Building {\n  height: Int!\n}\n"));
}

#[test]
fn argument_nullability_and_defaults() {
    let result = compose_federation_v2(&[
        (
            "a",
            "type Query { building: Building }\ntype Building @shareable { height(units: String! = \"m\"): Int! }",
        ),
        ("b", "type Building @shareable { height(units: String = \"m\"): Int! }"),
    ]);

    let graph = result.into_result().unwrap();
    assert!(render_api_sdl(&graph)
        .unwrap()
        .contains("  height(units: String = \"m\"): Int!\n"));

    let result = compose_federation_v2(&[
        (
            "a",
            "type Query { building: Building }\ntype Building @shareable { height(units: String = \"m\"): Int! }",
        ),
        ("b", "type Building @shareable { height(units: String = \"ft\"): Int! }"),
    ]);

    assert_eq!(codes(&result), [DiagnosticCode::FieldArgumentDefaultMismatch]);
}

#[test]
fn input_objects_are_intersected() {
    let result = compose_federation_v2(&[
        (
            "a",
            "type Query { search(filter: Filter): [String] }\ninput Filter { name: String tag: String }",
        ),
        ("b", "type Query { count(filter: Filter): Int }\ninput Filter { name: String }"),
    ]);

    assert_eq!(codes(&result), [DiagnosticCode::InconsistentInputObjectField]);

    let graph = result.into_result().unwrap();
    assert!(render_api_sdl(&graph).unwrap().contains("input Filter {\n  name: String\n}\n"));
}

#[test]
fn required_input_field_missing_in_a_subgraph() {
    let result = compose_federation_v2(&[
        (
            "a",
            "type Query { search(filter: Filter): [String] }\ninput Filter { name: String tag: String! }",
        ),
        ("b", "type Query { count(filter: Filter): Int }\ninput Filter { name: String }"),
    ]);

    assert_eq!(codes(&result), [DiagnosticCode::RequiredInputFieldMissingInSomeSubgraph]);
}

#[test]
fn mismatched_type_kinds() {
    let result = compose_federation_v2(&[
        ("a", "type Query { t: T }\ntype T { id: ID }"),
        ("b", "interface T { id: ID }"),
    ]);

    assert_eq!(
        result.diagnostics().iter_errors().collect::<Vec<_>>(),
        ["Type \"T\" has mismatched kind: it is defined as object in subgraph \"a\" but interface in subgraph \"b\""]
    );
}

#[test]
fn fields_resolved_in_several_subgraphs_must_be_shareable() {
    let result = compose_federation_v2(&[("a", "type Query { a: Int }"), ("b", "type Query { a: Int }")]);

    assert_eq!(
        result.diagnostics().iter_errors().collect::<Vec<_>>(),
        [
            "Non-shareable field \"Query.a\" is resolved from multiple subgraphs: it is resolved from subgraphs \"a\" \
             and \"b\" and defined as non-shareable in subgraphs \"a\" and \"b\""
        ]
    );
}

#[test]
fn federation_v1_fields_are_shareable() {
    let mut subgraphs = Subgraphs::default();
    subgraphs.ingest_str("type Query { a: Int }", "a", None).unwrap();
    subgraphs.ingest_str("type Query { a: Int! }", "b", None).unwrap();

    let graph = compose(&subgraphs).into_result().unwrap();
    assert_eq!(render_api_sdl(&graph).unwrap(), "type Query {\n  a: Int\n}\n");
}

#[test]
fn overridden_fields_are_not_shared() {
    let result = compose_federation_v2(&[
        (
            "products",
            "type Query { product: Product }\ntype Product @key(fields: \"id\") { id: ID! price: Int }",
        ),
        (
            "pricing",
            "type Product @key(fields: \"id\") { id: ID! price: Int @override(from: \"products\") }",
        ),
    ]);

    let graph = result.into_result().unwrap();
    let federated_sdl = render_federated_sdl(&graph).unwrap();

    assert!(
        federated_sdl.contains(r#"  price: Int @join__field(graph: PRICING, override: "products") @join__field(graph: PRODUCTS)"#),
        "{federated_sdl}"
    );
}

#[test]
fn directives_need_a_federation_version_defining_them() {
    let mut subgraphs = Subgraphs::default();
    subgraphs
        .ingest_str(
            indoc! {r#"
                extend schema @link(url: "https://specs.apollo.dev/federation/v2.0", import: ["@key", "@interfaceObject"])
                type Query { a: Int }
                type Media @key(fields: "id") @interfaceObject { id: ID! }
            "#},
            "a",
            None,
        )
        .unwrap();

    assert!(compose(&subgraphs)
        .diagnostics()
        .codes()
        .contains(&DiagnosticCode::UnsupportedFederationDirective));
}

#[test]
fn federation_directives_must_be_imported() {
    let mut subgraphs = Subgraphs::default();
    subgraphs
        .ingest_str(
            indoc! {r#"
                extend schema @link(url: "https://specs.apollo.dev/federation/v2.3", import: ["@key"])
                type Query { a: Int @shareable }
            "#},
            "a",
            None,
        )
        .unwrap();

    assert_eq!(compose(&subgraphs).diagnostics().codes(), [DiagnosticCode::DirectiveNotImported]);
}

#[test]
fn composition_does_not_depend_on_ingestion_order() {
    let products = indoc! {r#"
        type Query { products: [Product!]! }
        """A product"""
        type Product @key(fields: "id") { id: ID! name: String category: Category }
        enum Category { BOOKS MUSIC }
    "#};
    let reviews = indoc! {r#"
        type Query { reviews: [Review!]! }
        type Review { body: String product: Product }
        type Product @key(fields: "id") { id: ID! reviews: [Review!]! category: Category @shareable @external }
        enum Category { BOOKS GAMES }
    "#};

    let forwards = compose_federation_v2(&[("products", products), ("reviews", reviews)]);
    let backwards = compose_federation_v2(&[("reviews", reviews), ("products", products)]);

    let forwards = forwards.into_result().unwrap();
    let backwards = backwards.into_result().unwrap();

    assert_eq!(
        render_federated_sdl(&forwards).unwrap(),
        render_federated_sdl(&backwards).unwrap()
    );
    assert_eq!(render_api_sdl(&forwards).unwrap(), render_api_sdl(&backwards).unwrap());
}

#[test]
fn empty_input() {
    let result = compose(&Subgraphs::default());
    assert_eq!(codes(&result), [DiagnosticCode::NoQueries]);
}

#[test]
fn rendered_schemas() {
    let result = compose_federation_v2(&[(
        "a",
        "type Query { me: User }\ntype User { name: String secret: String @inaccessible }",
    )]);

    let schemas = result.render().unwrap().unwrap();

    assert!(
        schemas
            .supergraph_sdl
            .contains("  secret: String @join__field(graph: A) @inaccessible\n"),
        "{}",
        schemas.supergraph_sdl
    );
    assert_eq!(schemas.api_sdl, "type Query {\n  me: User\n}\n\ntype User {\n  name: String\n}\n");

    let failed = compose_federation_v2(&[("a", "type Query { a: Int }"), ("b", "type Query { a: Int }")]);
    assert!(failed.render().is_none());
}

#[test]
fn renamed_root_types_compose() {
    let mut subgraphs = Subgraphs::default();
    subgraphs
        .ingest_str("schema { query: RootQuery }\ntype RootQuery { me: Int }", "a", None)
        .unwrap();

    let result = compose(&subgraphs);
    assert!(result.diagnostics().is_empty(), "{:?}", result.diagnostics());

    let graph = result.into_result().unwrap();
    assert_eq!(render_api_sdl(&graph).unwrap(), "type Query {\n  me: Int\n}\n");
}

#[test]
fn default_root_names_cannot_be_reused_when_renamed() {
    let mut subgraphs = Subgraphs::default();
    subgraphs
        .ingest_str(
            "schema { query: RootQuery }\ntype RootQuery { me: Int }\ntype Query { other: Int }",
            "a",
            None,
        )
        .unwrap();

    assert_eq!(compose(&subgraphs).diagnostics().codes(), [DiagnosticCode::InvalidGraphql]);
}

#[test]
fn shareability_is_checked_before_field_types() {
    let result = compose_federation_v2(&[("a", "type Query { a: Int }"), ("b", "type Query { a: String }")]);

    assert_eq!(
        codes(&result),
        [DiagnosticCode::InvalidFieldSharing, DiagnosticCode::FieldTypeMismatch]
    );
}
