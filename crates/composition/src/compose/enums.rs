use super::*;
use crate::{subgraphs::EnumValueWalker, EnumMergePolicy};

pub(super) fn merge_enum_definitions(ctx: &mut ComposeContext<'_>, definitions: &[DefinitionWalker<'_>]) {
    let Some(first) = definitions.first() else {
        return;
    };
    let enum_name = first.name().as_str();
    let policy = ctx.config.enum_merge_policy;

    let mut value_groups: IndexMap<StringId, Vec<EnumValueWalker<'_>>> = IndexMap::new();

    for definition in in_ingestion_order(definitions) {
        for value in definition.enum_values() {
            value_groups.entry(value.name().id).or_default().push(value);
        }
    }

    let mut r#enum = federated::Enum::default();

    for values in value_groups.values_mut() {
        values.sort_by_key(|value| value.parent_definition().subgraph().name().as_str());

        let Some(first_value) = values.first().copied() else {
            continue;
        };
        let value_name = first_value.name().as_str();

        if values.len() < definitions.len() {
            let missing_in = definitions
                .iter()
                .filter(|definition| !values.iter().any(|value| value.parent_definition().id == definition.id))
                .map(|definition| definition.subgraph().name().as_str());

            let outcome = match policy {
                EnumMergePolicy::Union => "will be included in the supergraph",
                EnumMergePolicy::Intersection => "will not be included in the supergraph",
            };

            let message = format!(
                "Value \"{value_name}\" of enum type \"{enum_name}\" {outcome}, but it is only defined in {} and not in {}.",
                describe_subgraphs(values.iter().map(|value| value.parent_definition().subgraph().name().as_str())),
                describe_subgraphs(missing_in),
            );

            ctx.push_warning(DiagnosticCode::InconsistentEnumValue, message)
                .at_all(values.iter().map(|value| value.location()));

            if policy == EnumMergePolicy::Intersection {
                tracing::trace!(enum_type = enum_name, value = value_name, "dropping enum value missing from some subgraphs");
                continue;
            }
        }

        r#enum.values.insert(
            value_name.to_owned(),
            federated::EnumValue {
                name: value_name.to_owned(),
                description: values
                    .iter()
                    .find_map(|value| value.description())
                    .map(|description| description.as_str().to_owned()),
                directives: merge_directives(values.iter().map(|value| value.directives())),
                subgraph_ids: values
                    .iter()
                    .map(|value| value.parent_definition().subgraph_id().federated())
                    .collect(),
            },
        );
    }

    if r#enum.values.is_empty() {
        let message = format!(
            "None of the values of enum type \"{enum_name}\" is defined in all the subgraphs defining it ({}).",
            describe_subgraphs(definitions.iter().map(|definition| definition.subgraph().name().as_str())),
        );

        ctx.push_error(DiagnosticCode::EmptyMergedEnumType, message)
            .at_all(definitions.iter().map(|definition| definition.location()));
        return;
    }

    if let Some(definition) = new_type_definition(definitions, federated::TypeKind::Enum(r#enum)) {
        ctx.insert_type(definition);
    }
}
