mod definitions;
mod directives;
mod enums;
mod field_types;
mod fields;
mod keys;
mod strings;
mod walkers;

pub(crate) use self::{
    definitions::*, directives::*, enums::*, field_types::*, fields::*, keys::*, strings::*, walkers::*,
};

use crate::{DiagnosticCode, Diagnostics, Location};
use async_graphql_parser::Pos;
use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet};

/// A set of subgraphs to be composed.
#[derive(Default)]
pub struct Subgraphs {
    pub(crate) strings: Strings,
    subgraphs: Vec<Subgraph>,
    definitions: Definitions,
    directives: DirectiveSites,
    enums: Enums,
    fields: Fields,
    keys: Keys,

    ingestion_diagnostics: Diagnostics,

    // Secondary indexes.

    // (definition name, subgraph_id) -> definition id
    definition_names: BTreeMap<(StringId, SubgraphId), DefinitionId>,
}

/// The schema of a subgraph could not be parsed.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("could not parse the schema of subgraph `{name}`: {message}")]
    Parse { name: String, message: String },
}

impl Subgraphs {
    /// Add a subgraph to compose.
    pub fn ingest(&mut self, document: &async_graphql_parser::types::ServiceDocument, name: &str, url: Option<&str>) {
        crate::ingest_subgraph::ingest_subgraph(document, name, url, self);
    }

    /// Parse the SDL of a subgraph, then [ingest](Subgraphs::ingest) it.
    pub fn ingest_str(&mut self, sdl: &str, name: &str, url: Option<&str>) -> Result<(), IngestError> {
        let document = async_graphql_parser::parse_schema(sdl).map_err(|err| IngestError::Parse {
            name: name.to_owned(),
            message: err.to_string(),
        })?;

        self.ingest(&document, name, url);
        Ok(())
    }

    /// The number of ingested subgraphs.
    pub fn len(&self) -> usize {
        self.subgraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subgraphs.is_empty()
    }

    /// Groups of definitions with the same name, to be merged together. The groups are in the
    /// order their first definition was ingested; inside a group, definitions are sorted by
    /// subgraph name.
    pub(crate) fn definition_groups(&self) -> Vec<Vec<DefinitionWalker<'_>>> {
        let mut groups: IndexMap<StringId, Vec<DefinitionWalker<'_>>> = IndexMap::new();

        for definition in self.iter_definitions() {
            groups.entry(definition.name().id).or_default().push(definition);
        }

        groups
            .into_values()
            .map(|mut group| {
                group.sort_by_key(|definition| definition.subgraph().name().as_str());
                group
            })
            .collect()
    }

    pub(crate) fn push_ingestion_diagnostic(
        &mut self,
        subgraph_id: SubgraphId,
        code: DiagnosticCode,
        message: String,
        coordinate: String,
        pos: Option<Pos>,
    ) {
        let subgraph_name = self.walk(subgraph_id).name().as_str().to_owned();

        self.ingestion_diagnostics
            .push_fatal(code, format!("[{subgraph_name}] {message}"))
            .at(Location::new(&subgraph_name, coordinate, pos));
    }

    pub(crate) fn push_subgraph(&mut self, name: &str, url: Option<&str>) -> SubgraphId {
        let subgraph = Subgraph {
            name: self.strings.intern(name),
            url: url.map(|url| self.strings.intern(url)),
        };

        self.subgraphs.push(subgraph);
        SubgraphId(self.subgraphs.len() - 1)
    }

    pub(crate) fn walk<Id>(&self, id: Id) -> Walker<'_, Id> {
        Walker { id, subgraphs: self }
    }

    pub(crate) fn iter_subgraphs(&self) -> impl ExactSizeIterator<Item = SubgraphWalker<'_>> {
        (0..self.subgraphs.len()).map(|idx| self.walk(SubgraphId(idx)))
    }

    pub(crate) fn emit_ingestion_diagnostics(&self, diagnostics: &mut Diagnostics) {
        diagnostics.clone_all_from(&self.ingestion_diagnostics);
    }
}

pub(crate) struct Subgraph {
    /// The name of the subgraph. It is not contained in the GraphQL schema of the subgraph, it
    /// only makes sense within a project.
    name: StringId,
    url: Option<StringId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct SubgraphId(usize);

impl SubgraphId {
    pub(crate) const MIN: SubgraphId = SubgraphId(usize::MIN);
    pub(crate) const MAX: SubgraphId = SubgraphId(usize::MAX);

    pub(crate) fn idx(self) -> usize {
        self.0
    }

    /// The id of the same subgraph in the federated graph, before output ordering.
    pub(crate) fn federated(self) -> supergraph::SubgraphId {
        supergraph::SubgraphId::from(self.0)
    }
}
