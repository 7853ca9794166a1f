use super::*;

/// Input objects are merged by intersection: a field is only kept when every subgraph defining
/// the input object defines it, with the exact same type.
pub(super) fn merge_input_object_definitions(ctx: &mut ComposeContext<'_>, definitions: &[DefinitionWalker<'_>]) {
    let Some(first) = definitions.first() else {
        return;
    };
    let type_name = first.name().as_str();
    let mut input_object = federated::InputObject::default();

    for fields in field_groups(definitions).into_values() {
        if let Some(field) = merge_input_field(ctx, definitions, &fields) {
            input_object.fields.insert(field.name.clone(), field);
        }
    }

    if input_object.fields.is_empty() {
        let message = format!(
            "None of the fields of input object type \"{type_name}\" are consistently defined in all the subgraphs \
             defining that type."
        );

        ctx.push_error(DiagnosticCode::EmptyMergedInputType, message)
            .at_all(definitions.iter().map(|definition| definition.location()));
        return;
    }

    if let Some(definition) = new_type_definition(definitions, federated::TypeKind::InputObject(input_object)) {
        ctx.insert_type(definition);
    }
}

fn merge_input_field(
    ctx: &mut ComposeContext<'_>,
    definitions: &[DefinitionWalker<'_>],
    fields: &[FieldWalker<'_>],
) -> Option<federated::InputValueDefinition> {
    let first = fields.first().copied()?;
    let coordinate = first.coordinate();
    let defined_in = || describe_subgraphs(fields.iter().map(|field| field.subgraph().name().as_str()));
    let missing_in = || {
        describe_subgraphs(
            definitions
                .iter()
                .filter(|definition| !fields.iter().any(|field| field.parent_definition().id == definition.id))
                .map(|definition| definition.subgraph().name().as_str()),
        )
    };

    if fields.len() < definitions.len() {
        if let Some(required) = fields.iter().find(|field| field.is_required()) {
            let message = format!(
                "Input object field \"{coordinate}\" is required in {} but does not appear in {}.",
                describe_subgraphs([required.subgraph().name().as_str()]),
                missing_in(),
            );

            ctx.push_error(DiagnosticCode::RequiredInputFieldMissingInSomeSubgraph, message)
                .at(required.location());
        } else {
            let message = format!(
                "Input object field \"{coordinate}\" will not be added to the supergraph as it does not appear in all \
                 subgraphs: it is defined in {} but not in {}.",
                defined_in(),
                missing_in(),
            );

            ctx.push_warning(DiagnosticCode::InconsistentInputObjectField, message)
                .at_all(fields.iter().map(|field| field.location()));
            tracing::trace!(field = %coordinate, "dropping input field missing from some subgraphs");
        }

        return None;
    }

    if let Some(other) = fields.iter().find(|field| field.r#type() != first.r#type()) {
        let subgraphs = ctx.subgraphs;
        let message = format!(
            "Type of input field \"{coordinate}\" is incompatible across subgraphs: it has type \"{}\" in subgraph \
             \"{}\" but type \"{}\" in subgraph \"{}\".",
            subgraphs.display_field_type(first.r#type()),
            first.subgraph().name().as_str(),
            subgraphs.display_field_type(other.r#type()),
            other.subgraph().name().as_str(),
        );

        ctx.push_error(DiagnosticCode::FieldTypeMismatch, message)
            .at(first.location())
            .at(other.location());
        return None;
    }

    let default_id = |field: &FieldWalker<'_>| field.default().map(|default| default.id);

    if let Some(other) = fields.iter().find(|field| default_id(field) != default_id(&first)) {
        let render_default = |field: FieldWalker<'_>| match field.default() {
            Some(default) => format!("default value {}", default.as_str()),
            None => String::from("no default value"),
        };

        let message = format!(
            "Input field \"{coordinate}\" has incompatible default values across subgraphs: it has {} in subgraph \
             \"{}\" but {} in subgraph \"{}\".",
            render_default(first),
            first.subgraph().name().as_str(),
            render_default(*other),
            other.subgraph().name().as_str(),
        );

        ctx.push_error(DiagnosticCode::InputFieldDefaultMismatch, message)
            .at(first.location())
            .at(other.location());
    }

    Some(federated::InputValueDefinition {
        name: first.name().as_str().to_owned(),
        description: fields
            .iter()
            .find_map(|field| field.description())
            .map(|description| description.as_str().to_owned()),
        r#type: ctx.subgraphs.field_type_to_federated(first.r#type()),
        default: first.default().map(|default| default.as_str().to_owned()),
        directives: merge_directives(fields.iter().map(|field| field.directives())),
        subgraph_ids: fields
            .iter()
            .map(|field| field.subgraph().id.federated())
            .collect(),
    })
}
