//! Composition of federated GraphQL subgraph schemas.
//!
//! Subgraphs are ingested one by one into [Subgraphs], then [compose()] merges them into a
//! [FederatedGraph], validating the cross-subgraph rules of federation along the way. The graph
//! renders to the supergraph SDL with [render_federated_sdl] and to the client-facing API SDL
//! with [render_api_sdl].
//!
//! ```
//! use supergraph_composition::{compose, render_api_sdl, Subgraphs};
//!
//! let mut subgraphs = Subgraphs::default();
//! subgraphs
//!     .ingest_str("type Query { hello: String }", "greetings", None)
//!     .unwrap();
//!
//! let graph = compose(&subgraphs).into_result().unwrap();
//! assert_eq!(render_api_sdl(&graph).unwrap(), "type Query {\n  hello: String\n}\n");
//! ```

mod compose;
mod config;
mod diagnostics;
mod emit_federated_graph;
mod federation_directives;
mod global_checks;
mod ingest_subgraph;
mod resolvability;
mod result;
mod subgraphs;
mod validate;

pub use self::{
    config::{CompositionConfig, ConfigError, EnumMergePolicy, OutputOrdering},
    diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, Location, Severity},
    federation_directives::{FederationDirective, FederationVersion, InvalidVersion},
    result::{CompositionResult, RenderedSchemas},
    subgraphs::{IngestError, Subgraphs},
};
pub use supergraph::{render_api_sdl, render_federated_sdl, FederatedGraph};

use self::compose::ComposeContext;

#[cfg(test)]
use {indoc as _, insta as _, pretty_assertions as _, rstest as _, serde_json as _, tracing_subscriber as _};

/// Compose subgraphs into a federated graph, with the default [CompositionConfig].
pub fn compose(subgraphs: &Subgraphs) -> CompositionResult {
    compose_with_config(subgraphs, &CompositionConfig::default())
}

/// Compose subgraphs into a federated graph.
///
/// Every check runs to completion: the result carries all the diagnostics, in the order the
/// phases ran. The graph is only produced when none of them is an error.
pub fn compose_with_config(subgraphs: &Subgraphs, config: &CompositionConfig) -> CompositionResult {
    let span = tracing::info_span!("compose", subgraphs = subgraphs.len());
    let _guard = span.enter();

    let mut diagnostics = Diagnostics::default();
    subgraphs.emit_ingestion_diagnostics(&mut diagnostics);

    let mut context = ComposeContext::new(subgraphs, config, &mut diagnostics);
    validate::validate(&mut context);
    compose::compose_subgraphs(&mut context);
    let graph = context.into_graph();

    if diagnostics.any_fatal() {
        tracing::debug!("skipping the resolvability check on a graph with errors");
    } else {
        resolvability::check_resolvability(subgraphs, &graph, &mut diagnostics);
    }

    global_checks::run_global_checks(subgraphs, &graph, &mut diagnostics);

    if diagnostics.any_fatal() {
        tracing::debug!(diagnostics = diagnostics.len(), "composition failed");

        return CompositionResult {
            federated_graph: None,
            diagnostics,
        };
    }

    CompositionResult {
        federated_graph: Some(emit_federated_graph::emit_federated_graph(graph, config)),
        diagnostics,
    }
}
