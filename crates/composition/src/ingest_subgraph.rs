//! Ingestion of a subgraph schema into [Subgraphs].
//!
//! Problems found here are recorded as ingestion diagnostics, prefixed with the subgraph name.
//! Ingestion never aborts: what can be ingested is.

mod directives;
mod enums;
mod fields;
mod schema_definitions;

use self::{
    directives::{block_is_shareable, ingest_directives, DirectiveTarget},
    schema_definitions::*,
};
use crate::{
    subgraphs::{DefinitionId, DefinitionKind, DefinitionWalker, FieldId, Selection, SubgraphId, Subgraphs},
    DiagnosticCode, FederationDirective, FederationVersion,
};
use async_graphql_parser::{types as ast, Pos, Positioned};
use async_graphql_value::Name;

pub(crate) struct IngestContext<'a> {
    pub(crate) subgraph_id: SubgraphId,
    pub(crate) subgraphs: &'a mut Subgraphs,
    pub(crate) schema: &'a SchemaDefinitions<'a>,
}

impl IngestContext<'_> {
    pub(crate) fn push_error(&mut self, code: DiagnosticCode, message: String, coordinate: String, pos: Option<Pos>) {
        self.subgraphs
            .push_ingestion_diagnostic(self.subgraph_id, code, message, coordinate, pos);
    }
}

pub(crate) fn ingest_subgraph(
    document: &ast::ServiceDocument,
    name: &str,
    url: Option<&str>,
    subgraphs: &mut Subgraphs,
) {
    let subgraph_id = subgraphs.push_subgraph(name, url);
    let schema = ingest_schema_definitions(document, subgraph_id, subgraphs);

    let mut ctx = IngestContext {
        subgraph_id,
        subgraphs,
        schema: &schema,
    };

    let blocks = ingest_top_level_definitions(&mut ctx, document);
    ingest_definition_bodies(&mut ctx, &blocks);
    mark_key_fields_shareable(&mut ctx);

    tracing::debug!(
        subgraph = name,
        federation_version = %schema.version,
        blocks = blocks.len(),
        "ingested subgraph"
    );
}

/// First pass: create the definitions, so the bodies can refer to any of them.
///
/// Returns the declaration blocks to ingest the body of, with their definition.
fn ingest_top_level_definitions<'doc>(
    ctx: &mut IngestContext<'_>,
    document: &'doc ast::ServiceDocument,
) -> Vec<(DefinitionId, &'doc Positioned<ast::TypeDefinition>)> {
    let mut blocks = Vec::new();

    for definition in &document.definitions {
        let ast::TypeSystemDefinition::Type(block) = definition else {
            continue;
        };

        let type_definition = &block.node;
        let declared_name = type_definition.name.node.as_str();

        // Checked on the declared name: renamed roots normalize to the default names.
        if let Some(root) = ctx.schema.misused_root_name(declared_name) {
            ctx.push_error(
                DiagnosticCode::InvalidGraphql,
                format!(
                    "Type `{declared_name}` uses a root type name, but the schema definition declares `{root}` as \
                     that root"
                ),
                declared_name.to_owned(),
                Some(block.pos),
            );
            continue;
        }

        let name = ctx.schema.normalize_type_name(declared_name);

        if ctx.schema.is_protocol_type(name) || supergraph::BUILTIN_SCALARS.contains(&name) {
            continue;
        }

        let kind = definition_kind(&type_definition.kind);

        let id = match ctx.subgraphs.definition_by_name(name, ctx.subgraph_id) {
            Some(existing) if existing.kind() != kind => {
                let message = format!(
                    "`{name}` is declared both as {} {} and as {} {}",
                    article(existing.kind()),
                    existing.kind().describe(),
                    article(kind),
                    kind.describe(),
                );
                ctx.push_error(DiagnosticCode::InvalidGraphql, message, name.to_owned(), Some(block.pos));
                continue;
            }
            Some(existing) if !type_definition.extend && existing.has_base_declaration() => {
                ctx.push_error(
                    DiagnosticCode::InvalidGraphql,
                    format!("Type `{name}` is defined more than once"),
                    name.to_owned(),
                    Some(block.pos),
                );
                continue;
            }
            Some(existing) => existing.id,
            None => ctx.subgraphs.push_definition(ctx.subgraph_id, name, kind, block.pos),
        };

        if !type_definition.extend {
            ctx.subgraphs.mark_base_declaration(id);
        }

        if let Some(description) = &type_definition.description {
            ctx.subgraphs.set_description(id, &description.node);
        }

        let site = ctx.subgraphs.walk(id).directives().id;
        ingest_directives(
            ctx,
            site,
            DirectiveTarget::Definition(id),
            &type_definition.directives,
            name,
        );

        blocks.push((id, block));
    }

    blocks
}

fn definition_kind(kind: &ast::TypeKind) -> DefinitionKind {
    match kind {
        ast::TypeKind::Scalar => DefinitionKind::Scalar,
        ast::TypeKind::Object(_) => DefinitionKind::Object,
        ast::TypeKind::Interface(_) => DefinitionKind::Interface,
        ast::TypeKind::Union(_) => DefinitionKind::Union,
        ast::TypeKind::Enum(_) => DefinitionKind::Enum,
        ast::TypeKind::InputObject(_) => DefinitionKind::InputObject,
    }
}

fn article(kind: DefinitionKind) -> &'static str {
    match kind {
        DefinitionKind::Object | DefinitionKind::Interface | DefinitionKind::InputObject | DefinitionKind::Enum => "an",
        DefinitionKind::Union | DefinitionKind::Scalar => "a",
    }
}

/// Second pass: fields, arguments, enum values, interface implementations and union members.
fn ingest_definition_bodies(
    ctx: &mut IngestContext<'_>,
    blocks: &[(DefinitionId, &Positioned<ast::TypeDefinition>)],
) {
    for (definition_id, block) in blocks {
        let definition_id = *definition_id;
        let type_definition = &block.node;

        match &type_definition.kind {
            ast::TypeKind::Object(ast::ObjectType {
                implements,
                fields: field_definitions,
            })
            | ast::TypeKind::Interface(ast::InterfaceType {
                implements,
                fields: field_definitions,
            }) => {
                ingest_implements(ctx, definition_id, implements);

                let is_shareable = block_is_shareable(ctx, &type_definition.directives);

                for field in field_definitions {
                    fields::ingest_field(ctx, definition_id, field, is_shareable);
                }
            }
            ast::TypeKind::Union(union) => ingest_union_members(ctx, definition_id, &union.members),
            ast::TypeKind::InputObject(input_object) => {
                for field in &input_object.fields {
                    fields::ingest_input_field(ctx, definition_id, field);
                }
            }
            ast::TypeKind::Enum(enum_type) => {
                for value in &enum_type.values {
                    enums::ingest_enum_value(ctx, definition_id, value);
                }
            }
            ast::TypeKind::Scalar => (),
        }
    }
}

fn ingest_implements(ctx: &mut IngestContext<'_>, definition_id: DefinitionId, implements: &[Positioned<Name>]) {
    let definition_name = ctx.subgraphs.walk(definition_id).name().as_str().to_owned();

    for interface in implements {
        let interface_name = ctx.schema.normalize_type_name(interface.node.as_str());
        let interface_definition = ctx
            .subgraphs
            .definition_by_name(interface_name, ctx.subgraph_id)
            .map(|definition| (definition.kind(), definition.is_interface_object()));

        match interface_definition {
            Some((DefinitionKind::Interface, _)) => ctx.subgraphs.push_interface_impl(definition_id, interface_name),
            Some((DefinitionKind::Object, true)) => ctx.push_error(
                DiagnosticCode::InterfaceObjectUsageError,
                format!(
                    "`{definition_name}` implements `{interface_name}`, which is an @interfaceObject in this \
                     subgraph: implementations of an entity interface belong in the subgraphs defining the interface"
                ),
                definition_name.clone(),
                Some(interface.pos),
            ),
            _ => ctx.push_error(
                DiagnosticCode::InvalidGraphql,
                format!(
                    "`{definition_name}` implements `{interface_name}`, which is not an interface defined in the subgraph"
                ),
                definition_name.clone(),
                Some(interface.pos),
            ),
        }
    }
}

fn ingest_union_members(ctx: &mut IngestContext<'_>, definition_id: DefinitionId, members: &[Positioned<Name>]) {
    let union_name = ctx.subgraphs.walk(definition_id).name().as_str().to_owned();

    for member in members {
        let member_name = ctx.schema.normalize_type_name(member.node.as_str());
        let is_object = ctx
            .subgraphs
            .definition_by_name(member_name, ctx.subgraph_id)
            .is_some_and(|definition| definition.kind() == DefinitionKind::Object);

        if is_object {
            ctx.subgraphs.push_union_member(definition_id, member_name);
        } else {
            ctx.push_error(
                DiagnosticCode::InvalidGraphql,
                format!("Member `{member_name}` of union `{union_name}` is not an object type defined in the subgraph"),
                union_name.clone(),
                Some(member.pos),
            );
        }
    }
}

/// Key fields are shareable, including the fields in nested selections.
fn mark_key_fields_shareable(ctx: &mut IngestContext<'_>) {
    let mut key_fields = Vec::new();

    for definition in ctx.subgraphs.walk(ctx.subgraph_id).definitions() {
        for key in definition.keys() {
            collect_selected_fields(definition, &key.fields().selection_set, &mut key_fields);
        }
    }

    for field_id in key_fields {
        ctx.subgraphs.set_field_shareable(field_id);
    }
}

fn collect_selected_fields(definition: DefinitionWalker<'_>, selection_set: &[Selection], out: &mut Vec<FieldId>) {
    for selection in selection_set {
        let Some(field) = definition.field_by_name(selection.field) else {
            continue;
        };

        out.push(field.id);

        if let Some(nested) = field.type_definition().filter(|_| !selection.subselection.is_empty()) {
            collect_selected_fields(nested, &selection.subselection, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{DiagnosticCode, Diagnostics, Subgraphs};

    fn ingest(sdl: &str) -> (Subgraphs, Diagnostics) {
        let mut subgraphs = Subgraphs::default();
        subgraphs.ingest_str(sdl, "test", None).unwrap();

        let mut diagnostics = Diagnostics::default();
        subgraphs.emit_ingestion_diagnostics(&mut diagnostics);

        (subgraphs, diagnostics)
    }

    #[test]
    fn extension_blocks_share_the_definition() {
        let (subgraphs, diagnostics) = ingest(
            r#"
            type Query { a: Int }
            extend type Query { b: Int }
            "#,
        );

        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let query = subgraphs.definition_by_name("Query", crate::subgraphs::SubgraphId::MIN).unwrap();
        let names: Vec<_> = query.fields().map(|field| field.name().as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert!(!query.is_extension());
    }

    #[test]
    fn renamed_roots_are_normalized() {
        let (subgraphs, diagnostics) = ingest(
            r#"
            schema { query: RootQuery }
            type RootQuery { me: User }
            type User { name: String }
            "#,
        );

        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let subgraph = subgraphs.walk(crate::subgraphs::SubgraphId::MIN);
        let query = subgraph.query_type().unwrap();
        assert_eq!(query.field_by_name_str("me").unwrap().type_definition().unwrap().name().as_str(), "User");
        assert!(subgraph.definition_by_name("RootQuery").is_none());
    }

    #[test]
    fn invalid_definitions() {
        let (_, diagnostics) = ingest(
            r#"
            type Query { a: Missing, b: Int }
            interface Query { c: Int }
            type Query { d: Int }
            union U = Nope
            "#,
        );

        assert_eq!(diagnostics.codes(), [DiagnosticCode::InvalidGraphql; 4]);
        assert!(diagnostics.iter_messages().all(|message| message.starts_with("[test] ")));
    }

    #[test]
    fn shareability() {
        let (subgraphs, diagnostics) = ingest(
            r#"
            extend schema @link(url: "https://specs.apollo.dev/federation/v2.3", import: ["@key", "@shareable"])

            type Query { product: Product }

            type Product @key(fields: "id owner { id }") {
                id: ID!
                owner: User
                name: String @shareable
                price: Int
            }

            type User { id: ID!, email: String }

            extend type Product @shareable { weight: Int }
            "#,
        );

        assert!(diagnostics.is_empty(), "{diagnostics:?}");

        let subgraph = subgraphs.walk(crate::subgraphs::SubgraphId::MIN);
        let shareable = |type_name: &str, field_name: &str| {
            subgraph
                .definition_by_name(type_name)
                .and_then(|definition| definition.field_by_name_str(field_name))
                .unwrap()
                .is_shareable()
        };

        assert!(shareable("Product", "id"));
        assert!(shareable("Product", "owner"));
        assert!(shareable("User", "id"));
        assert!(shareable("Product", "name"));
        assert!(shareable("Product", "weight"));
        assert!(!shareable("Product", "price"));
        assert!(!shareable("User", "email"));
    }

    #[test]
    fn federation_1_fields_are_shareable() {
        let (subgraphs, _) = ingest("type Query { a: Int }");
        let field = subgraphs
            .walk(crate::subgraphs::SubgraphId::MIN)
            .query_type()
            .and_then(|query| query.field_by_name_str("a"))
            .unwrap();

        assert!(field.is_shareable());
    }

    #[test]
    fn protocol_types_and_fields_are_skipped() {
        let (subgraphs, diagnostics) = ingest(
            r#"
            scalar _Any
            type _Service { sdl: String }
            union _Entity = Product
            type Product @key(fields: "id") { id: ID! }
            type Query {
                _entities(representations: [_Any!]!): [_Entity]!
                _service: _Service!
                product: Product
            }
            "#,
        );

        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let subgraph = subgraphs.walk(crate::subgraphs::SubgraphId::MIN);
        assert!(subgraph.definition_by_name("_Service").is_none());
        assert_eq!(subgraph.query_type().unwrap().fields().count(), 1);
    }
}
