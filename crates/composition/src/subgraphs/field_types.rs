use super::*;
use async_graphql_parser::types as ast;
use supergraph::{ListWrapping, Wrapping};

/// The type of a field or argument in a subgraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct FieldType {
    pub(crate) name: StringId,
    pub(crate) wrapping: Wrapping,
}

impl FieldType {
    /// Same named type and list depth. Nullability may differ.
    pub(crate) fn has_same_core(self, other: FieldType) -> bool {
        self.name == other.name && self.wrapping.list_depth() == other.wrapping.list_depth()
    }
}

impl Subgraphs {
    /// `rename` maps the named type of the reference, for renamed root types. `None` when the
    /// reference nests more than [supergraph::MAX_LIST_DEPTH] lists.
    pub(crate) fn intern_field_type<'b>(
        &mut self,
        ty: &'b ast::Type,
        rename: impl Fn(&'b str) -> &'b str,
    ) -> Option<FieldType> {
        fn unwrap_type(ty: &ast::Type) -> Option<(&str, Wrapping)> {
            match &ty.base {
                ast::BaseType::Named(name) => {
                    let wrapping = if ty.nullable {
                        Wrapping::default()
                    } else {
                        Wrapping::default().non_null()
                    };

                    Some((name.as_str(), wrapping))
                }
                ast::BaseType::List(inner) => {
                    let (name, wrapping) = unwrap_type(inner)?;
                    let list_wrapping = if ty.nullable {
                        ListWrapping::List
                    } else {
                        ListWrapping::ListNonNull
                    };

                    Some((name, wrapping.wrap_list(list_wrapping)?))
                }
            }
        }

        let (name, wrapping) = unwrap_type(ty)?;

        Some(FieldType {
            name: self.strings.intern(rename(name)),
            wrapping,
        })
    }

    pub(crate) fn field_type_to_federated(&self, ty: FieldType) -> supergraph::Type {
        supergraph::Type {
            name: self.strings.resolve(ty.name).to_owned(),
            wrapping: ty.wrapping,
        }
    }

    pub(crate) fn display_field_type(&self, ty: FieldType) -> String {
        ty.wrapping.type_display(self.strings.resolve(ty.name)).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_type(subgraphs: &mut Subgraphs, sdl_type: &str) -> FieldType {
        let document = async_graphql_parser::parse_schema(format!("type T {{ f: {sdl_type} }}")).unwrap();
        let async_graphql_parser::types::TypeSystemDefinition::Type(definition) = &document.definitions[0] else {
            unreachable!()
        };
        let ast::TypeKind::Object(object) = &definition.node.kind else {
            unreachable!()
        };

        subgraphs
            .intern_field_type(&object.fields[0].node.ty.node, |name| name)
            .unwrap()
    }

    #[test]
    fn wrappings_are_read_inside_out() {
        let mut subgraphs = Subgraphs::default();

        for sdl_type in ["Int", "Int!", "[Int]", "[Int!]!", "[[String]!]"] {
            let ty = field_type(&mut subgraphs, sdl_type);
            assert_eq!(subgraphs.display_field_type(ty), sdl_type);
        }
    }

    #[test]
    fn core_type_ignores_nullability() {
        let mut subgraphs = Subgraphs::default();
        let a = field_type(&mut subgraphs, "[Int!]!");
        let b = field_type(&mut subgraphs, "[Int]");
        let c = field_type(&mut subgraphs, "Int");

        assert!(a.has_same_core(b));
        assert!(!a.has_same_core(c));
    }
}
