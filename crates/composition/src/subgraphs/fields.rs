use super::*;

/// Fields of objects, interfaces and input objects, with their arguments.
#[derive(Default)]
pub(super) struct Fields {
    fields: Vec<Field>,
    // (parent definition, field) pairs, in declaration order within each definition
    definition_fields: BTreeSet<(DefinitionId, FieldId)>,
    // (parent definition, field name) -> field
    field_names: BTreeMap<(DefinitionId, StringId), FieldId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct FieldId(usize);

impl FieldId {
    const MIN: FieldId = FieldId(usize::MIN);
    const MAX: FieldId = FieldId(usize::MAX);
}

pub(crate) struct Field {
    parent_definition_id: DefinitionId,
    name: StringId,
    r#type: FieldType,
    description: Option<StringId>,
    directives: DirectiveSiteId,
    /// Declared `@shareable`, in a `@shareable` block, in a federation 1 subgraph, or part of a
    /// key.
    is_shareable: bool,
    /// Input object fields only.
    default: Option<StringId>,
    arguments: Vec<Argument>,
    pos: Pos,
}

/// An argument definition of a field.
pub(crate) struct Argument {
    pub(crate) name: StringId,
    pub(crate) r#type: FieldType,
    pub(crate) default: Option<StringId>,
    pub(crate) description: Option<StringId>,
    pub(crate) directives: DirectiveSiteId,
    pub(crate) pos: Pos,
}

impl Argument {
    /// Non-null without a default value.
    pub(crate) fn is_required(&self) -> bool {
        self.r#type.wrapping.is_required() && self.default.is_none()
    }
}

pub(crate) struct FieldIngest<'a> {
    pub(crate) parent_definition_id: DefinitionId,
    pub(crate) name: &'a str,
    pub(crate) r#type: FieldType,
    pub(crate) description: Option<&'a str>,
    pub(crate) directives: DirectiveSiteId,
    pub(crate) is_shareable: bool,
    pub(crate) default: Option<String>,
    pub(crate) arguments: Vec<Argument>,
    pub(crate) pos: Pos,
}

impl Subgraphs {
    /// Returns an error when the field is already defined on the parent definition.
    pub(crate) fn push_field(&mut self, field: FieldIngest<'_>) -> Result<FieldId, String> {
        let FieldIngest {
            parent_definition_id,
            name,
            r#type,
            description,
            directives,
            is_shareable,
            default,
            arguments,
            pos,
        } = field;

        let name = self.strings.intern(name);

        if self.fields.field_names.contains_key(&(parent_definition_id, name)) {
            return Err(format!(
                "Field `{}.{}` is defined more than once",
                self.walk(parent_definition_id).name().as_str(),
                self.strings.resolve(name)
            ));
        }

        let description = description.map(|description| self.strings.intern(description));
        let default = default.map(|default| self.strings.intern(&default));

        self.fields.fields.push(Field {
            parent_definition_id,
            name,
            r#type,
            description,
            directives,
            is_shareable,
            default,
            arguments,
            pos,
        });

        let id = FieldId(self.fields.fields.len() - 1);
        self.fields.definition_fields.insert((parent_definition_id, id));
        self.fields.field_names.insert((parent_definition_id, name), id);

        Ok(id)
    }

    pub(crate) fn set_field_shareable(&mut self, id: FieldId) {
        self.fields.fields[id.0].is_shareable = true;
    }

    pub(crate) fn iter_fields(&self) -> impl Iterator<Item = FieldWalker<'_>> {
        (0..self.fields.fields.len()).map(|idx| self.walk(FieldId(idx)))
    }
}

pub(crate) type FieldWalker<'a> = Walker<'a, FieldId>;

impl<'a> FieldWalker<'a> {
    fn field(self) -> &'a Field {
        &self.subgraphs.fields.fields[self.id.0]
    }

    pub(crate) fn name(self) -> StringWalker<'a> {
        self.walk(self.field().name)
    }

    pub(crate) fn parent_definition(self) -> DefinitionWalker<'a> {
        self.walk(self.field().parent_definition_id)
    }

    pub(crate) fn subgraph(self) -> SubgraphWalker<'a> {
        self.parent_definition().subgraph()
    }

    pub(crate) fn r#type(self) -> FieldType {
        self.field().r#type
    }

    /// The definition of the field's named type in the same subgraph. `None` for built-in
    /// scalars.
    pub(crate) fn type_definition(self) -> Option<DefinitionWalker<'a>> {
        self.subgraphs
            .definition_by_name_id(self.field().r#type.name, self.parent_definition().subgraph_id())
    }

    pub(crate) fn description(self) -> Option<StringWalker<'a>> {
        self.field().description.map(|description| self.walk(description))
    }

    pub(crate) fn directives(self) -> DirectiveSiteWalker<'a> {
        self.walk(self.field().directives)
    }

    pub(crate) fn is_shareable(self) -> bool {
        self.field().is_shareable
    }

    pub(crate) fn is_external(self) -> bool {
        self.directives().external()
    }

    pub(crate) fn default(self) -> Option<StringWalker<'a>> {
        self.field().default.map(|default| self.walk(default))
    }

    pub(crate) fn arguments(self) -> &'a [Argument] {
        &self.field().arguments
    }

    /// Non-null without a default value. Meaningful for input object fields.
    pub(crate) fn is_required(self) -> bool {
        self.field().r#type.wrapping.is_required() && self.field().default.is_none()
    }

    /// `Type.field`
    pub(crate) fn coordinate(self) -> String {
        format!("{}.{}", self.parent_definition().name().as_str(), self.name().as_str())
    }

    pub(crate) fn location(self) -> Location {
        Location::new(self.subgraph().name().as_str(), self.coordinate(), Some(self.field().pos))
    }

    pub(crate) fn argument_location(self, argument: &Argument) -> Location {
        Location::new(
            self.subgraph().name().as_str(),
            format!("{}({}:)", self.coordinate(), self.subgraphs.strings.resolve(argument.name)),
            Some(argument.pos),
        )
    }
}

impl<'a> DefinitionWalker<'a> {
    /// The fields of the definition, in declaration order.
    pub(crate) fn fields(self) -> impl Iterator<Item = FieldWalker<'a>> + 'a {
        let id = self.id;
        self.subgraphs
            .fields
            .definition_fields
            .range((id, FieldId::MIN)..=(id, FieldId::MAX))
            .map(move |(_, field_id)| self.walk(*field_id))
    }

    pub(crate) fn field_by_name(self, name: StringId) -> Option<FieldWalker<'a>> {
        self.subgraphs
            .fields
            .field_names
            .get(&(self.id, name))
            .map(|field_id| self.walk(*field_id))
    }

    pub(crate) fn field_by_name_str(self, name: &str) -> Option<FieldWalker<'a>> {
        self.field_by_name(self.subgraphs.strings.lookup(name)?)
    }
}
