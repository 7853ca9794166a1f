use super::*;

/// A handle on a record of [Subgraphs], with access to the rest of the store.
#[derive(Clone, Copy)]
pub(crate) struct Walker<'a, Id> {
    pub(crate) id: Id,
    pub(crate) subgraphs: &'a Subgraphs,
}

impl<'a, Id> Walker<'a, Id> {
    pub(crate) fn walk<T>(self, other: T) -> Walker<'a, T> {
        self.subgraphs.walk(other)
    }
}

pub(crate) type SubgraphWalker<'a> = Walker<'a, SubgraphId>;

impl<'a> SubgraphWalker<'a> {
    fn subgraph(self) -> &'a Subgraph {
        &self.subgraphs.subgraphs[self.id.idx()]
    }

    pub(crate) fn name(self) -> StringWalker<'a> {
        self.walk(self.subgraph().name)
    }

    pub(crate) fn url(self) -> Option<StringWalker<'a>> {
        self.subgraph().url.map(|url| self.walk(url))
    }

    pub(crate) fn definition_by_name(self, name: &str) -> Option<DefinitionWalker<'a>> {
        self.subgraphs.definition_by_name(name, self.id)
    }

    pub(crate) fn query_type(self) -> Option<DefinitionWalker<'a>> {
        self.definition_by_name("Query")
    }

    /// The root types defined by the subgraph, after renamed roots were normalized.
    pub(crate) fn root_types(self) -> impl Iterator<Item = DefinitionWalker<'a>> {
        ["Query", "Mutation", "Subscription"]
            .into_iter()
            .filter_map(move |name| self.definition_by_name(name))
    }

    pub(crate) fn definitions(self) -> impl Iterator<Item = DefinitionWalker<'a>> {
        let subgraph_id = self.id;
        self.subgraphs
            .iter_definitions()
            .filter(move |definition| definition.subgraph_id() == subgraph_id)
    }
}
