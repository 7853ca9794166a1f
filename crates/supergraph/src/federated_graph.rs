mod directives;
mod ids;
mod root_operation_types;
mod r#type;

pub use self::{directives::*, ids::*, r#type::Type, root_operation_types::RootOperationTypes};

use indexmap::{IndexMap, IndexSet};

/// The built-in scalars of GraphQL. They are never part of [FederatedGraph::types].
pub const BUILTIN_SCALARS: [&str; 5] = ["Boolean", "Float", "ID", "Int", "String"];

/// The result of composing subgraphs: every type, field and argument that made it through
/// composition, with the subgraphs each of them comes from.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct FederatedGraph {
    pub subgraphs: Vec<Subgraph>,
    pub root_operation_types: RootOperationTypes,
    pub types: IndexMap<String, TypeDefinition>,
}

impl FederatedGraph {
    pub fn type_definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    pub fn iter_subgraphs(&self) -> impl ExactSizeIterator<Item = (SubgraphId, &Subgraph)> {
        self.subgraphs
            .iter()
            .enumerate()
            .map(|(idx, subgraph)| (SubgraphId::from(idx), subgraph))
    }

    /// Object and interface types declaring that they implement `interface_name`.
    pub fn implementers<'a>(&'a self, interface_name: &'a str) -> impl Iterator<Item = &'a TypeDefinition> + 'a {
        self.types.values().filter(move |definition| {
            definition
                .kind
                .as_composite()
                .is_some_and(|composite| composite.implements_interfaces.contains(interface_name))
        })
    }

    /// Object types implementing `interface_name`, directly or through another interface.
    pub fn concrete_implementers<'a>(
        &'a self,
        interface_name: &'a str,
    ) -> impl Iterator<Item = &'a TypeDefinition> + 'a {
        self.implementers(interface_name)
            .filter(|definition| matches!(definition.kind, TypeKind::Object(_)))
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct Subgraph {
    pub name: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct TypeDefinition {
    pub name: String,
    pub description: Option<String>,
    pub kind: TypeKind,
    pub join_types: Vec<JoinType>,
    pub directives: Directives,
}

impl TypeDefinition {
    pub fn new(name: String, kind: TypeKind) -> Self {
        TypeDefinition {
            name,
            description: None,
            kind,
            join_types: Vec::new(),
            directives: Directives::default(),
        }
    }

    pub fn is_inaccessible(&self) -> bool {
        self.directives.inaccessible
    }

    pub fn fields(&self) -> Option<&IndexMap<String, Field>> {
        self.kind.as_composite().map(|composite| &composite.fields)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields().and_then(|fields| fields.get(name))
    }

    /// Subgraphs where the type is defined.
    pub fn subgraph_ids(&self) -> impl Iterator<Item = SubgraphId> + '_ {
        let mut seen = Vec::with_capacity(self.join_types.len());
        self.join_types.iter().filter_map(move |join_type| {
            if seen.contains(&join_type.subgraph_id) {
                return None;
            }
            seen.push(join_type.subgraph_id);
            Some(join_type.subgraph_id)
        })
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub enum TypeKind {
    Object(Composite),
    Interface(Composite),
    Union(Union),
    InputObject(InputObject),
    Enum(Enum),
    Scalar,
}

impl TypeKind {
    pub fn as_composite(&self) -> Option<&Composite> {
        match self {
            TypeKind::Object(composite) | TypeKind::Interface(composite) => Some(composite),
            _ => None,
        }
    }

    pub fn as_composite_mut(&mut self) -> Option<&mut Composite> {
        match self {
            TypeKind::Object(composite) | TypeKind::Interface(composite) => Some(composite),
            _ => None,
        }
    }

    /// Enums and scalars.
    pub fn is_leaf(&self) -> bool {
        matches!(self, TypeKind::Enum(_) | TypeKind::Scalar)
    }

    pub fn is_abstract(&self) -> bool {
        matches!(self, TypeKind::Interface(_) | TypeKind::Union(_))
    }
}

/// Objects and interfaces.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct Composite {
    pub implements_interfaces: IndexSet<String>,
    pub join_implements: Vec<JoinImplements>,
    pub fields: IndexMap<String, Field>,
}

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct Union {
    /// Member name -> subgraphs where it is a member.
    pub members: IndexMap<String, Vec<SubgraphId>>,
}

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct InputObject {
    pub fields: IndexMap<String, InputValueDefinition>,
}

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct Enum {
    pub values: IndexMap<String, EnumValue>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct EnumValue {
    pub name: String,
    pub description: Option<String>,
    pub directives: Directives,
    /// The subgraphs defining the value.
    pub subgraph_ids: Vec<SubgraphId>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum FieldOrigin {
    /// Defined by the subgraphs in the join fields.
    Subgraphs,
    /// Added to an implementer of an entity interface because a subgraph contributes it with an
    /// `@interfaceObject`. It is resolved by querying that subgraph with the interface key.
    InterfaceObject { interface: String },
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct Field {
    pub name: String,
    pub description: Option<String>,
    pub r#type: Type,
    pub arguments: IndexMap<String, InputValueDefinition>,
    pub join_fields: Vec<JoinField>,
    pub origin: FieldOrigin,
    pub directives: Directives,
}

impl Field {
    pub fn is_inaccessible(&self) -> bool {
        self.directives.inaccessible
    }

    pub fn is_synthesized(&self) -> bool {
        matches!(self.origin, FieldOrigin::InterfaceObject { .. })
    }

    pub fn join_field(&self, subgraph_id: SubgraphId) -> Option<&JoinField> {
        self.join_fields
            .iter()
            .find(|join_field| join_field.subgraph_id == subgraph_id)
    }
}

/// Arguments of output fields and fields of input objects.
#[derive(Debug, Clone, serde::Serialize)]
pub struct InputValueDefinition {
    pub name: String,
    pub description: Option<String>,
    pub r#type: Type,
    /// The default value, rendered as GraphQL.
    pub default: Option<String>,
    pub directives: Directives,
    /// For input object fields: the subgraphs defining the field.
    pub subgraph_ids: Vec<SubgraphId>,
}

impl InputValueDefinition {
    /// Non-null without a default value.
    pub fn is_required(&self) -> bool {
        self.r#type.is_required() && self.default.is_none()
    }
}
