use super::*;

/// Position of a subgraph in [FederatedGraph::subgraphs], and of its value in `join__Graph`.
#[derive(Debug, Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct SubgraphId(usize);

impl From<SubgraphId> for usize {
    fn from(id: SubgraphId) -> usize {
        id.0
    }
}

impl From<usize> for SubgraphId {
    fn from(idx: usize) -> SubgraphId {
        SubgraphId(idx)
    }
}

impl std::ops::Index<SubgraphId> for FederatedGraph {
    type Output = Subgraph;

    fn index(&self, id: SubgraphId) -> &Subgraph {
        &self.subgraphs[id.0]
    }
}
