use super::*;

/// The type definitions of all subgraphs. One definition per name and subgraph: the
/// declaration blocks of a type in a subgraph (`type T`, `extend type T`) share it.
#[derive(Default)]
pub(super) struct Definitions(Vec<Definition>);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct DefinitionId(usize);

pub(crate) struct Definition {
    subgraph_id: SubgraphId,
    name: StringId,
    kind: DefinitionKind,
    description: Option<StringId>,
    directives: DirectiveSiteId,
    pos: Pos,
    /// Whether one of the declaration blocks is not an `extend`.
    has_base_declaration: bool,
    implements: Vec<StringId>,
    union_members: Vec<StringId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::IntoStaticStr)]
pub(crate) enum DefinitionKind {
    #[strum(serialize = "object")]
    Object,
    #[strum(serialize = "interface")]
    Interface,
    #[strum(serialize = "union")]
    Union,
    #[strum(serialize = "input object")]
    InputObject,
    #[strum(serialize = "enum")]
    Enum,
    #[strum(serialize = "scalar")]
    Scalar,
}

impl DefinitionKind {
    pub(crate) fn describe(self) -> &'static str {
        self.into()
    }

    /// Objects and interfaces.
    pub(crate) fn is_composite(self) -> bool {
        matches!(self, DefinitionKind::Object | DefinitionKind::Interface)
    }

    pub(crate) fn is_leaf(self) -> bool {
        matches!(self, DefinitionKind::Enum | DefinitionKind::Scalar)
    }
}

impl Subgraphs {
    pub(crate) fn push_definition(
        &mut self,
        subgraph_id: SubgraphId,
        name: &str,
        kind: DefinitionKind,
        pos: Pos,
    ) -> DefinitionId {
        let name = self.strings.intern(name);
        let directives = self.new_directive_site();

        self.definitions.0.push(Definition {
            subgraph_id,
            name,
            kind,
            description: None,
            directives,
            pos,
            has_base_declaration: false,
            implements: Vec::new(),
            union_members: Vec::new(),
        });

        let id = DefinitionId(self.definitions.0.len() - 1);
        self.definition_names.insert((name, subgraph_id), id);
        id
    }

    pub(crate) fn definition_by_name(&self, name: &str, subgraph_id: SubgraphId) -> Option<DefinitionWalker<'_>> {
        let name = self.strings.lookup(name)?;
        self.definition_by_name_id(name, subgraph_id)
    }

    pub(crate) fn definition_by_name_id(&self, name: StringId, subgraph_id: SubgraphId) -> Option<DefinitionWalker<'_>> {
        self.definition_names
            .get(&(name, subgraph_id))
            .map(|id| self.walk(*id))
    }

    /// The definitions with that name, in all subgraphs.
    pub(crate) fn definitions_named(&self, name: StringId) -> impl Iterator<Item = DefinitionWalker<'_>> {
        self.definition_names
            .range((name, SubgraphId::MIN)..=(name, SubgraphId::MAX))
            .map(|(_, id)| self.walk(*id))
    }

    pub(crate) fn iter_definitions(&self) -> impl Iterator<Item = DefinitionWalker<'_>> {
        (0..self.definitions.0.len()).map(|idx| self.walk(DefinitionId(idx)))
    }

    pub(crate) fn mark_base_declaration(&mut self, id: DefinitionId) {
        self.definitions.0[id.0].has_base_declaration = true;
    }

    /// The first description found in the declaration blocks wins.
    pub(crate) fn set_description(&mut self, id: DefinitionId, description: &str) {
        if self.definitions.0[id.0].description.is_none() {
            let description = self.strings.intern(description);
            self.definitions.0[id.0].description = Some(description);
        }
    }

    pub(crate) fn push_interface_impl(&mut self, id: DefinitionId, interface: &str) {
        let interface = self.strings.intern(interface);
        let implements = &mut self.definitions.0[id.0].implements;

        if !implements.contains(&interface) {
            implements.push(interface);
        }
    }

    pub(crate) fn push_union_member(&mut self, id: DefinitionId, member: &str) {
        let member = self.strings.intern(member);
        let members = &mut self.definitions.0[id.0].union_members;

        if !members.contains(&member) {
            members.push(member);
        }
    }
}

pub(crate) type DefinitionWalker<'a> = Walker<'a, DefinitionId>;

impl<'a> DefinitionWalker<'a> {
    fn definition(self) -> &'a Definition {
        &self.subgraphs.definitions.0[self.id.0]
    }

    pub(crate) fn name(self) -> StringWalker<'a> {
        self.walk(self.definition().name)
    }

    pub(crate) fn kind(self) -> DefinitionKind {
        self.definition().kind
    }

    pub(crate) fn subgraph_id(self) -> SubgraphId {
        self.definition().subgraph_id
    }

    pub(crate) fn subgraph(self) -> SubgraphWalker<'a> {
        self.walk(self.subgraph_id())
    }

    pub(crate) fn description(self) -> Option<StringWalker<'a>> {
        self.definition().description.map(|description| self.walk(description))
    }

    pub(crate) fn directives(self) -> DirectiveSiteWalker<'a> {
        self.walk(self.definition().directives)
    }

    pub(crate) fn pos(self) -> Pos {
        self.definition().pos
    }

    /// Only declared through `extend type` blocks, or with `@extends`.
    pub(crate) fn is_extension(self) -> bool {
        !self.definition().has_base_declaration || self.directives().extends()
    }

    pub(crate) fn has_base_declaration(self) -> bool {
        self.definition().has_base_declaration
    }

    pub(crate) fn is_interface_object(self) -> bool {
        self.directives().interface_object()
    }

    pub(crate) fn implements(self) -> impl Iterator<Item = StringWalker<'a>> + 'a {
        self.definition()
            .implements
            .iter()
            .map(move |interface| self.walk(*interface))
    }

    pub(crate) fn implements_interface(self, interface: StringId) -> bool {
        self.definition().implements.contains(&interface)
    }

    pub(crate) fn union_members(self) -> impl Iterator<Item = StringWalker<'a>> + 'a {
        self.definition()
            .union_members
            .iter()
            .map(move |member| self.walk(*member))
    }

    /// The object types of the same subgraph implementing this interface.
    pub(crate) fn implementers(self) -> impl Iterator<Item = DefinitionWalker<'a>> + 'a {
        let name = self.definition().name;
        self.subgraph().definitions().filter(move |definition| {
            definition.kind() == DefinitionKind::Object && definition.implements_interface(name)
        })
    }

    pub(crate) fn location(self) -> Location {
        Location::new(
            self.subgraph().name().as_str(),
            self.name().as_str().to_owned(),
            Some(self.pos()),
        )
    }
}
