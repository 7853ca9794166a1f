use super::*;

pub(super) fn merge_union_definitions(ctx: &mut ComposeContext<'_>, definitions: &[DefinitionWalker<'_>]) {
    let mut union = federated::Union::default();

    // Member order is first-seen, the subgraph lists follow the definitions.
    for definition in in_ingestion_order(definitions) {
        for member in definition.union_members() {
            union.members.entry(member.as_str().to_owned()).or_default();
        }
    }

    for definition in definitions {
        for member in definition.union_members() {
            if let Some(subgraph_ids) = union.members.get_mut(member.as_str()) {
                subgraph_ids.push(definition.subgraph_id().federated());
            }
        }
    }

    if let Some(definition) = new_type_definition(definitions, federated::TypeKind::Union(union)) {
        ctx.insert_type(definition);
    }
}
