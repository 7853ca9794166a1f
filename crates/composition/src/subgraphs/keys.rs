use super::*;
use async_graphql_parser::types as ast;

/// All the keys (`@key(...)`) in all the subgraphs in one container.
#[derive(Default)]
pub(super) struct Keys {
    keys: Vec<Key>,
    // (definition, key) pairs, for range queries
    definition_keys: BTreeSet<(DefinitionId, KeyId)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct KeyId(usize);

impl KeyId {
    const MIN: KeyId = KeyId(usize::MIN);
    const MAX: KeyId = KeyId(usize::MAX);
}

pub(crate) struct Key {
    definition_id: DefinitionId,
    fields: FieldSet,
    resolvable: bool,
}

/// A parsed `fields:` argument of `@key`, `@requires` or `@provides`.
#[derive(Debug)]
pub(crate) struct FieldSet {
    pub(crate) selection_set: Vec<Selection>,
    /// The selection set in its canonical form: `id sku`, `owner { id }`.
    pub(crate) normalized: StringId,
}

#[derive(Debug, PartialEq, Eq, Hash)]
pub(crate) struct Selection {
    pub(crate) field: StringId,
    pub(crate) subselection: Vec<Selection>,
}

/// The selection of `field_name` in a selection set, if any.
pub(crate) fn find_selection(selection_set: &[Selection], field_name: StringId) -> Option<&Selection> {
    selection_set.iter().find(|selection| selection.field == field_name)
}

impl Subgraphs {
    pub(crate) fn push_key(&mut self, definition_id: DefinitionId, fields: &str, resolvable: bool) -> Result<(), String> {
        let fields = self.field_set_from_str(fields)?;

        self.keys.keys.push(Key {
            definition_id,
            fields,
            resolvable,
        });

        let id = KeyId(self.keys.keys.len() - 1);
        self.keys.definition_keys.insert((definition_id, id));
        Ok(())
    }

    pub(crate) fn field_set_from_str(&mut self, fields: &str) -> Result<FieldSet, String> {
        let document = async_graphql_parser::parse_query(format!("{{ {fields} }}"))
            .map_err(|err| format!("could not parse the field set `{fields}`: {err}"))?;

        let ast::DocumentOperations::Single(operation) = &document.operations else {
            return Err(format!("the field set `{fields}` must be a single selection set"));
        };

        let selection_set = self.selection_set_from_ast(&operation.node.selection_set.node)?;

        if selection_set.is_empty() {
            return Err("field sets cannot be empty".to_owned());
        }

        let mut normalized = String::new();
        render_selection_set(&selection_set, self, &mut normalized);
        let normalized = self.strings.intern(&normalized);

        Ok(FieldSet {
            selection_set,
            normalized,
        })
    }

    fn selection_set_from_ast(&mut self, selection_set: &ast::SelectionSet) -> Result<Vec<Selection>, String> {
        selection_set
            .items
            .iter()
            .map(|selection| match &selection.node {
                ast::Selection::Field(field) => {
                    if !field.node.arguments.is_empty() || field.node.alias.is_some() {
                        return Err(format!(
                            "field `{}` in a field set cannot have arguments or an alias",
                            field.node.name.node
                        ));
                    }

                    Ok(Selection {
                        field: self.strings.intern(&field.node.name.node),
                        subselection: self.selection_set_from_ast(&field.node.selection_set.node)?,
                    })
                }
                ast::Selection::FragmentSpread(_) | ast::Selection::InlineFragment(_) => {
                    Err("fragments are not supported in field sets".to_owned())
                }
            })
            .collect()
    }
}

fn render_selection_set(selection_set: &[Selection], subgraphs: &Subgraphs, out: &mut String) {
    for (idx, selection) in selection_set.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }

        out.push_str(subgraphs.strings.resolve(selection.field));

        if !selection.subselection.is_empty() {
            out.push_str(" { ");
            render_selection_set(&selection.subselection, subgraphs, out);
            out.push_str(" }");
        }
    }
}

pub(crate) type KeyWalker<'a> = Walker<'a, KeyId>;

impl<'a> KeyWalker<'a> {
    fn key(self) -> &'a Key {
        &self.subgraphs.keys.keys[self.id.0]
    }

    pub(crate) fn parent_definition(self) -> DefinitionWalker<'a> {
        self.walk(self.key().definition_id)
    }

    pub(crate) fn fields(self) -> &'a FieldSet {
        &self.key().fields
    }

    pub(crate) fn normalized(self) -> StringWalker<'a> {
        self.walk(self.key().fields.normalized)
    }

    pub(crate) fn is_resolvable(self) -> bool {
        self.key().resolvable
    }
}

impl<'a> DefinitionWalker<'a> {
    pub(crate) fn keys(self) -> impl Iterator<Item = KeyWalker<'a>> + 'a {
        let id = self.id;
        self.subgraphs
            .keys
            .definition_keys
            .range((id, KeyId::MIN)..=(id, KeyId::MAX))
            .map(move |(_, key_id)| self.walk(*key_id))
    }

    pub(crate) fn is_entity(self) -> bool {
        self.keys().next().is_some()
    }

    /// Whether the field is selected at the top level of one of the keys.
    pub(crate) fn is_key_field(self, field_name: StringId) -> bool {
        self.keys()
            .any(|key| find_selection(&key.fields().selection_set, field_name).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_sets_are_normalized() {
        let mut subgraphs = Subgraphs::default();
        let field_set = subgraphs.field_set_from_str("  id\n owner {id   name } ").unwrap();

        assert_eq!(subgraphs.walk(field_set.normalized).as_str(), "id owner { id name }");
        assert_eq!(field_set.selection_set.len(), 2);
        assert_eq!(field_set.selection_set[1].subselection.len(), 2);
    }

    #[test]
    fn invalid_field_sets() {
        let mut subgraphs = Subgraphs::default();

        assert!(subgraphs.field_set_from_str("id {").is_err());
        assert!(subgraphs.field_set_from_str("... on Product { id }").is_err());
        assert!(subgraphs.field_set_from_str("product(id: 1) { id }").is_err());
    }
}
