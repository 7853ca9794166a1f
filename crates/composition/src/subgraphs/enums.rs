use super::*;

#[derive(Default)]
pub(super) struct Enums {
    values: Vec<EnumValue>,
    // (enum, value) pairs, in declaration order within each enum
    definition_values: BTreeSet<(DefinitionId, EnumValueId)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct EnumValueId(usize);

impl EnumValueId {
    const MIN: EnumValueId = EnumValueId(usize::MIN);
    const MAX: EnumValueId = EnumValueId(usize::MAX);
}

pub(crate) struct EnumValue {
    definition_id: DefinitionId,
    name: StringId,
    description: Option<StringId>,
    directives: DirectiveSiteId,
    pos: Pos,
}

impl Subgraphs {
    pub(crate) fn push_enum_value(
        &mut self,
        definition_id: DefinitionId,
        name: &str,
        description: Option<&str>,
        directives: DirectiveSiteId,
        pos: Pos,
    ) -> Result<(), String> {
        let name = self.strings.intern(name);

        if self.walk(definition_id).enum_values().any(|value| value.name().id == name) {
            return Err(format!(
                "Enum value `{}.{}` is defined more than once",
                self.walk(definition_id).name().as_str(),
                self.strings.resolve(name)
            ));
        }

        let description = description.map(|description| self.strings.intern(description));

        self.enums.values.push(EnumValue {
            definition_id,
            name,
            description,
            directives,
            pos,
        });

        let id = EnumValueId(self.enums.values.len() - 1);
        self.enums.definition_values.insert((definition_id, id));
        Ok(())
    }
}

pub(crate) type EnumValueWalker<'a> = Walker<'a, EnumValueId>;

impl<'a> EnumValueWalker<'a> {
    fn value(self) -> &'a EnumValue {
        &self.subgraphs.enums.values[self.id.0]
    }

    pub(crate) fn name(self) -> StringWalker<'a> {
        self.walk(self.value().name)
    }

    pub(crate) fn description(self) -> Option<StringWalker<'a>> {
        self.value().description.map(|description| self.walk(description))
    }

    pub(crate) fn directives(self) -> DirectiveSiteWalker<'a> {
        self.walk(self.value().directives)
    }

    pub(crate) fn parent_definition(self) -> DefinitionWalker<'a> {
        self.walk(self.value().definition_id)
    }

    pub(crate) fn location(self) -> Location {
        let definition = self.parent_definition();

        Location::new(
            definition.subgraph().name().as_str(),
            format!("{}.{}", definition.name().as_str(), self.name().as_str()),
            Some(self.value().pos),
        )
    }
}

impl<'a> DefinitionWalker<'a> {
    /// The values of the enum, in declaration order.
    pub(crate) fn enum_values(self) -> impl Iterator<Item = EnumValueWalker<'a>> + 'a {
        let id = self.id;
        self.subgraphs
            .enums
            .definition_values
            .range((id, EnumValueId::MIN)..=(id, EnumValueId::MAX))
            .map(move |(_, value_id)| self.walk(*value_id))
    }
}
