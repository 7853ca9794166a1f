#![allow(unused_crate_dependencies)]

use indoc::indoc;
use pretty_assertions::assert_eq;
use supergraph::{FieldOrigin, TypeKind};
use supergraph_composition::{compose, render_api_sdl, render_federated_sdl, CompositionResult, DiagnosticCode, Subgraphs};

const FEDERATION_V2_3: &str = r#"extend schema @link(url: "https://specs.apollo.dev/federation/v2.3", import: ["@key", "@interfaceObject", "@shareable"])"#;

const MEDIA: &str = indoc! {r#"
    type Query { media: [Media] }

    interface Media @key(fields: "id") {
      id: ID!
      title: String
    }

    type Book implements Media @key(fields: "id") {
      id: ID!
      title: String
      author: String
    }

    type Movie implements Media @key(fields: "id") {
      id: ID!
      title: String
    }
"#};

const REVIEWS: &str = indoc! {r#"
    type Media @key(fields: "id") @interfaceObject {
      id: ID!
      reviews: [String]
    }
"#};

fn compose_subgraphs(subgraphs: &[(&str, &str)]) -> CompositionResult {
    let mut ingested = Subgraphs::default();

    for (name, sdl) in subgraphs {
        ingested
            .ingest_str(&format!("{FEDERATION_V2_3}\n{sdl}"), name, None)
            .unwrap();
    }

    compose(&ingested)
}

#[test]
fn interface_object_fields_are_added_to_implementers() {
    let graph = compose_subgraphs(&[("media", MEDIA), ("reviews", REVIEWS)])
        .into_result()
        .unwrap();

    for implementer in ["Book", "Movie"] {
        let reviews = graph.type_definition(implementer).and_then(|definition| definition.field("reviews"));
        let origin = reviews.map(|field| &field.origin);

        assert_eq!(
            origin,
            Some(&FieldOrigin::InterfaceObject {
                interface: "Media".to_owned()
            }),
            "{implementer}"
        );
    }

    let media = graph.type_definition("Media").unwrap();
    assert!(matches!(media.kind, TypeKind::Interface(_)));
    assert_eq!(
        media.fields().unwrap().keys().collect::<Vec<_>>(),
        ["id", "reviews", "title"]
    );

    let expected_book = indoc! {"
        type Book implements Media {
          author: String
          id: ID!
          reviews: [String]
          title: String
        }
    "};

    assert!(render_api_sdl(&graph).unwrap().contains(expected_book));

    let federated_sdl = render_federated_sdl(&graph).unwrap();
    assert!(federated_sdl.contains("  reviews: [String] @join__field\n"), "{federated_sdl}");
    assert!(federated_sdl.contains(r#"  @join__type(graph: REVIEWS, key: "id", isInterfaceObject: true)"#));
}

#[test]
fn interface_objects_need_a_keyed_interface() {
    let media = indoc! {r#"
        type Query { media: [Media] }
        interface Media { id: ID! }
        type Book implements Media @key(fields: "id") { id: ID! }
    "#};

    let result = compose_subgraphs(&[("media", media), ("reviews", REVIEWS)]);
    assert_eq!(
        result.diagnostics().codes().first(),
        Some(&DiagnosticCode::InterfaceObjectUsageError)
    );
}

#[test]
fn interface_objects_without_interface() {
    let result = compose_subgraphs(&[("a", "type Query { a: Int }"), ("reviews", REVIEWS)]);
    assert_eq!(result.diagnostics().codes(), [DiagnosticCode::InterfaceObjectUsageError]);
}

#[test]
fn interface_object_keys_must_match_the_interface() {
    let reviews = indoc! {r#"
        type Media @key(fields: "title") @interfaceObject {
          title: String
          reviews: [String]
        }
    "#};

    let result = compose_subgraphs(&[("media", MEDIA), ("reviews", reviews)]);
    assert!(result
        .diagnostics()
        .codes()
        .contains(&DiagnosticCode::InterfaceObjectUsageError));
}

#[test]
fn implementers_must_carry_the_interface_keys() {
    let media = MEDIA.replace(
        "type Movie implements Media @key(fields: \"id\")",
        "type Movie implements Media @key(fields: \"title\")",
    );

    let result = compose_subgraphs(&[("media", &media), ("reviews", REVIEWS)]);
    let errors = result.diagnostics().iter_errors().collect::<Vec<_>>();

    assert_eq!(
        errors,
        [
            "[media] Key @key(fields: \"id\") on interface type \"Media\" is missing on implementation type \"Movie\" \
             in subgraph \"media\"."
        ]
    );
}

#[test]
fn owners_must_define_every_implementer() {
    let podcasts = indoc! {r#"
        interface Media @key(fields: "id") { id: ID! }
        type Podcast implements Media @key(fields: "id") { id: ID! }
    "#};

    let result = compose_subgraphs(&[("media", MEDIA), ("podcasts", podcasts), ("reviews", REVIEWS)]);
    let errors = result.diagnostics().iter_errors().collect::<Vec<_>>();

    assert!(
        errors.iter().any(|error| error.starts_with("[media] Interface type \"Media\" has a resolvable key")
            && error.ends_with("should define types \"Podcast\".")),
        "{errors:#?}"
    );
}

#[test]
fn interface_objects_cannot_be_implemented_in_their_subgraph() {
    let reviews = indoc! {r#"
        type Media @key(fields: "id") @interfaceObject { id: ID! reviews: [String] }
        type Book implements Media @key(fields: "id") { id: ID! }
    "#};

    let result = compose_subgraphs(&[("media", MEDIA), ("reviews", reviews)]);
    assert!(result
        .diagnostics()
        .codes()
        .contains(&DiagnosticCode::InterfaceObjectUsageError));
}

#[test]
fn keyed_interfaces_without_interface_objects() {
    let result = compose_subgraphs(&[("media", MEDIA)]);
    assert!(result.diagnostics().is_empty(), "{:?}", result.diagnostics());

    let media = indoc! {r#"
        type Query { media: [Media] }
        interface Media @key(fields: "id") { id: ID! }
        type Book implements Media { id: ID! }
    "#};

    let result = compose_subgraphs(&[("media", media)]);
    let errors = result.diagnostics().iter_errors().collect::<Vec<_>>();

    assert_eq!(
        errors,
        [
            "[media] Key @key(fields: \"id\") on interface type \"Media\" is missing on implementation type \"Book\" \
             in subgraph \"media\"."
        ]
    );
}

#[test]
fn entity_interfaces_are_validated_after_field_merge() {
    let media = MEDIA.replace(
        "type Movie implements Media @key(fields: \"id\")",
        "type Movie implements Media @key(fields: \"title\")",
    );

    let result = compose_subgraphs(&[
        ("a", "type Score @shareable { value: Int }"),
        ("b", "type Score @shareable { value: String }"),
        ("media", &media),
    ]);

    assert_eq!(
        result.diagnostics().codes(),
        [DiagnosticCode::FieldTypeMismatch, DiagnosticCode::InterfaceObjectUsageError]
    );
}
