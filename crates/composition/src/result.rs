use crate::{Diagnostics, FederatedGraph};
use std::fmt;

/// What [`compose()`](crate::compose()) produced: the merged graph when no error was found, and
/// every diagnostic either way.
pub struct CompositionResult {
    pub(crate) federated_graph: Option<FederatedGraph>,
    pub(crate) diagnostics: Diagnostics,
}

/// The two schema documents of a successful composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSchemas {
    /// Every element, with the join metadata query planning needs.
    pub supergraph_sdl: String,
    /// What clients see.
    pub api_sdl: String,
}

impl CompositionResult {
    /// Drop the graph when there is any diagnostic, warnings included.
    #[must_use]
    pub fn warnings_are_fatal(mut self) -> Self {
        if !self.diagnostics.is_empty() {
            self.federated_graph = None;
        }

        self
    }

    /// `Ok` with the [FederatedGraph] when composition succeeded, `Err` with all the
    /// [Diagnostics] otherwise.
    pub fn into_result(self) -> Result<FederatedGraph, Diagnostics> {
        match self.federated_graph {
            Some(graph) => Ok(graph),
            None => Err(self.diagnostics),
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn federated_graph(&self) -> Option<&FederatedGraph> {
        self.federated_graph.as_ref()
    }

    /// Render the supergraph and API schemas. `None` when composition failed.
    pub fn render(&self) -> Option<Result<RenderedSchemas, fmt::Error>> {
        let graph = self.federated_graph.as_ref()?;

        Some(supergraph::render_federated_sdl(graph).and_then(|supergraph_sdl| {
            Ok(RenderedSchemas {
                supergraph_sdl,
                api_sdl: supergraph::render_api_sdl(graph)?,
            })
        }))
    }
}
