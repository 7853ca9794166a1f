use super::*;

/// Merge the fields of an object or interface type, after the type itself was merged.
pub(super) fn merge_fields(ctx: &mut ComposeContext<'_>, definitions: &[DefinitionWalker<'_>]) {
    let Some(first) = definitions.first() else {
        return;
    };

    let mut merged_fields = IndexMap::new();

    for fields in field_groups(definitions).into_values() {
        if let Some(field) = merge_field_group(ctx, &fields) {
            merged_fields.insert(field.name.clone(), field);
        }
    }

    tracing::trace!(type_name = first.name().as_str(), fields = merged_fields.len(), "merged fields");

    if let Some(composite) = ctx
        .merged_type_mut(first.name().as_str())
        .and_then(|definition| definition.kind.as_composite_mut())
    {
        composite.fields = merged_fields;
    }
}

fn merge_field_group(ctx: &mut ComposeContext<'_>, fields: &[FieldWalker<'_>]) -> Option<federated::Field> {
    let first = fields.first().copied()?;
    let subgraphs = ctx.subgraphs;
    let coordinate = first.coordinate();

    validate_shareability(ctx, fields, &coordinate);

    let type_mismatch = fields.iter().find(|field| !field.r#type().has_same_core(first.r#type()));

    if let Some(other) = type_mismatch {
        let message = format!(
            "Type of field \"{coordinate}\" is incompatible across subgraphs: it has type \"{}\" in subgraph \"{}\" \
             but type \"{}\" in subgraph \"{}\"",
            subgraphs.display_field_type(first.r#type()),
            first.subgraph().name().as_str(),
            subgraphs.display_field_type(other.r#type()),
            other.subgraph().name().as_str(),
        );

        ctx.push_error(DiagnosticCode::FieldTypeMismatch, message)
            .at_all(fields.iter().map(|field| field.location()));
    }

    // External definitions consume the field, they do not shape it.
    let shaping_fields = if fields.iter().all(|field| field.is_external()) {
        fields.to_vec()
    } else {
        fields.iter().copied().filter(|field| !field.is_external()).collect()
    };

    // On type mismatch, the first definition stands in to avoid cascading errors.
    let wrapping = match type_mismatch {
        Some(_) => first.r#type().wrapping,
        None => shaping_fields
            .iter()
            .map(|field| field.r#type().wrapping)
            .reduce(|merged, wrapping| merged.least_restrictive(wrapping).unwrap_or(merged))
            .unwrap_or(first.r#type().wrapping),
    };

    let r#type = federated::Type {
        name: subgraphs.walk(first.r#type().name).as_str().to_owned(),
        wrapping,
    };

    let arguments = arguments::merge_arguments(ctx, &coordinate, &shaping_fields);

    Some(federated::Field {
        name: first.name().as_str().to_owned(),
        description: fields
            .iter()
            .find_map(|field| field.description())
            .map(|description| description.as_str().to_owned()),
        join_fields: fields.iter().map(|field| join_field(*field, &r#type)).collect(),
        r#type,
        arguments,
        origin: federated::FieldOrigin::Subgraphs,
        directives: merge_directives(fields.iter().map(|field| field.directives())),
    })
}

/// A field resolved by more than one subgraph must be shareable in all of them. External
/// definitions and definitions overridden with `@override(from:)` do not resolve the field.
fn validate_shareability(ctx: &mut ComposeContext<'_>, fields: &[FieldWalker<'_>], coordinate: &str) {
    let overridden: Vec<&str> = fields
        .iter()
        .filter_map(|field| field.directives().r#override())
        .map(|from| from.as_str())
        .collect();

    let resolving: Vec<FieldWalker<'_>> = fields
        .iter()
        .copied()
        .filter(|field| !field.is_external() && !overridden.contains(&field.subgraph().name().as_str()))
        .collect();

    if resolving.len() < 2 || resolving.iter().all(|field| field.is_shareable()) {
        return;
    }

    let message = format!(
        "Non-shareable field \"{coordinate}\" is resolved from multiple subgraphs: it is resolved from {} and defined \
         as non-shareable in {}",
        describe_subgraphs(resolving.iter().map(|field| field.subgraph().name().as_str())),
        describe_subgraphs(
            resolving
                .iter()
                .filter(|field| !field.is_shareable())
                .map(|field| field.subgraph().name().as_str())
        ),
    );

    ctx.push_error(DiagnosticCode::InvalidFieldSharing, message)
        .at_all(resolving.iter().map(|field| field.location()));
}

fn join_field(field: FieldWalker<'_>, merged_type: &federated::Type) -> federated::JoinField {
    let subgraphs = field.subgraphs;
    let directives = field.directives();
    let field_type = subgraphs.field_type_to_federated(field.r#type());
    let normalized = |field_set: &crate::subgraphs::FieldSet| subgraphs.walk(field_set.normalized).as_str().to_owned();

    federated::JoinField {
        subgraph_id: field.subgraph().id.federated(),
        r#type: Some(field_type).filter(|field_type| field_type != merged_type),
        external: field.is_external(),
        shareable: field.is_shareable(),
        requires: directives.requires().map(normalized),
        provides: directives.provides().map(normalized),
        override_from: directives.r#override().map(|from| from.as_str().to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use supergraph::Wrapping;

    #[test]
    fn least_restrictive_wrapping_is_the_and_of_non_null_flags() {
        let required_list_of_required = Wrapping::default().non_null().list_non_null();
        let nullable_list_of_required = Wrapping::default().non_null().list();
        let required_list_of_nullable = Wrapping::default().list_non_null();

        let merged = required_list_of_required
            .least_restrictive(nullable_list_of_required)
            .and_then(|merged| merged.least_restrictive(required_list_of_nullable))
            .unwrap();

        assert_eq!(merged, Wrapping::default().list());
    }
}
