use crate::{subgraphs::Subgraphs, CompositionConfig, Diagnostic, DiagnosticCode, Diagnostics};
use supergraph::{self as federated, FederatedGraph};

/// Context for [`validate`](crate::validate::validate) and
/// [`compose_subgraphs`](crate::compose::compose_subgraphs).
pub(crate) struct ComposeContext<'a> {
    pub(crate) subgraphs: &'a Subgraphs,
    pub(crate) config: &'a CompositionConfig,
    pub(crate) diagnostics: &'a mut Diagnostics,
    /// Write-only while merging: the subgraphs are the source of truth. Subgraph ids are the
    /// ingestion ids until the graph is emitted.
    graph: FederatedGraph,
}

impl<'a> ComposeContext<'a> {
    pub(crate) fn new(subgraphs: &'a Subgraphs, config: &'a CompositionConfig, diagnostics: &'a mut Diagnostics) -> Self {
        let graph = FederatedGraph {
            subgraphs: subgraphs
                .iter_subgraphs()
                .map(|subgraph| federated::Subgraph {
                    name: subgraph.name().as_str().to_owned(),
                    url: subgraph.url().map(|url| url.as_str().to_owned()),
                })
                .collect(),
            ..Default::default()
        };

        ComposeContext {
            subgraphs,
            config,
            diagnostics,
            graph,
        }
    }

    pub(crate) fn into_graph(self) -> FederatedGraph {
        self.graph
    }

    pub(crate) fn push_error(&mut self, code: DiagnosticCode, message: String) -> &mut Diagnostic {
        self.diagnostics.push_fatal(code, message)
    }

    pub(crate) fn push_warning(&mut self, code: DiagnosticCode, message: String) -> &mut Diagnostic {
        self.diagnostics.push_warning(code, message)
    }

    pub(crate) fn insert_type(&mut self, definition: federated::TypeDefinition) {
        self.graph.types.insert(definition.name.clone(), definition);
    }

    /// A type merged earlier in the pass.
    pub(crate) fn merged_type(&self, name: &str) -> Option<&federated::TypeDefinition> {
        self.graph.types.get(name)
    }

    pub(crate) fn merged_type_mut(&mut self, name: &str) -> Option<&mut federated::TypeDefinition> {
        self.graph.types.get_mut(name)
    }

    pub(crate) fn graph(&self) -> &FederatedGraph {
        &self.graph
    }

    pub(crate) fn set_root_operation_types(&mut self, root_operation_types: federated::RootOperationTypes) {
        self.graph.root_operation_types = root_operation_types;
    }
}
