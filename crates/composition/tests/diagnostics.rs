#![allow(unused_crate_dependencies)]

use supergraph_composition::{compose, Subgraphs};

#[test]
fn diagnostics_serialize_with_codes_and_locations() {
    let mut subgraphs = Subgraphs::default();
    subgraphs
        .ingest_str("type Query { t: T }\ntype T { id: ID }", "a", None)
        .unwrap();
    subgraphs.ingest_str("interface T { id: ID }", "b", None).unwrap();

    let result = compose(&subgraphs);

    insta::assert_json_snapshot!(result.diagnostics(), @r###"
    [
      {
        "severity": "error",
        "code": "TYPE_KIND_MISMATCH",
        "message": "Type \"T\" has mismatched kind: it is defined as object in subgraph \"a\" but interface in subgraph \"b\"",
        "locations": [
          {
            "subgraph": "a",
            "coordinate": "T",
            "line": 2,
            "column": 1
          },
          {
            "subgraph": "b",
            "coordinate": "T",
            "line": 1,
            "column": 1
          }
        ]
      }
    ]
    "###);
}

#[test]
fn parse_errors_name_the_subgraph() {
    let mut subgraphs = Subgraphs::default();
    let error = subgraphs.ingest_str("type Query {", "broken", None).unwrap_err();

    assert!(
        error.to_string().starts_with("could not parse the schema of subgraph `broken`"),
        "{error}"
    );
    assert!(subgraphs.is_empty());
}
