use super::*;
use crate::subgraphs::{DefinitionWalker, FieldSet, FieldWalker, KeyWalker, Selection};

pub(super) fn validate_key(ctx: &mut ValidateContext<'_>, key: KeyWalker<'_>) {
    let definition = key.parent_definition();

    if let Err(problem) = validate_selection_set(definition, &key.fields().selection_set) {
        let message = format!(
            "[{}] On type \"{}\", for @key(fields: \"{}\"): {problem}.",
            definition.subgraph().name().as_str(),
            definition.name().as_str(),
            key.normalized().as_str(),
        );

        ctx.push_error(DiagnosticCode::KeyInvalidFields, message)
            .at(definition.location());
    }
}

pub(super) fn validate_requires(ctx: &mut ValidateContext<'_>, field: FieldWalker<'_>) {
    let Some(requires) = field.directives().requires() else {
        return;
    };

    // Requirements are selected on the parent type.
    validate_field_set(
        ctx,
        field,
        field.parent_definition(),
        requires,
        "requires",
        DiagnosticCode::RequiresInvalidFields,
        DiagnosticCode::RequiresFieldsMissingExternal,
    );
}

pub(super) fn validate_provides(ctx: &mut ValidateContext<'_>, field: FieldWalker<'_>) {
    let Some(provides) = field.directives().provides() else {
        return;
    };

    let Some(target) = field.type_definition().filter(|target| !target.kind().is_leaf()) else {
        let message = format!(
            "[{}] Invalid @provides on field \"{}\": the field has type \"{}\", which is not a composite type.",
            field.subgraph().name().as_str(),
            field.coordinate(),
            field.subgraphs.display_field_type(field.r#type()),
        );

        ctx.push_error(DiagnosticCode::ProvidesInvalidFields, message)
            .at(field.location());
        return;
    };

    validate_field_set(
        ctx,
        field,
        target,
        provides,
        "provides",
        DiagnosticCode::ProvidesInvalidFields,
        DiagnosticCode::ProvidesFieldsMissingExternal,
    );
}

fn validate_field_set(
    ctx: &mut ValidateContext<'_>,
    field: FieldWalker<'_>,
    target: DefinitionWalker<'_>,
    field_set: &FieldSet,
    directive_name: &str,
    invalid_fields_code: DiagnosticCode,
    missing_external_code: DiagnosticCode,
) {
    let directive_path = || {
        format!(
            "[{}] On field \"{}\", for @{directive_name}(fields: \"{}\")",
            field.subgraph().name().as_str(),
            field.coordinate(),
            field.subgraphs.walk(field_set.normalized).as_str(),
        )
    };

    if let Err(problem) = validate_selection_set(target, &field_set.selection_set) {
        ctx.push_error(invalid_fields_code, format!("{}: {problem}.", directive_path()))
            .at(field.location());
        return;
    }

    let not_external = field_set
        .selection_set
        .iter()
        .filter_map(|selection| target.field_by_name(selection.field))
        .filter(|selected| !selected.is_external());

    for selected in not_external {
        let message = format!(
            "{}: field \"{}\" should not be part of a @{directive_name} since it is already resolved by this \
             subgraph (it is not marked @external).",
            directive_path(),
            selected.coordinate(),
        );

        ctx.push_error(missing_external_code, message).at(field.location());
    }
}

fn validate_selection_set(definition: DefinitionWalker<'_>, selection_set: &[Selection]) -> Result<(), String> {
    for selection in selection_set {
        let Some(field) = definition.field_by_name(selection.field) else {
            return Err(format!(
                "cannot query field \"{}\" on type \"{}\" (if the field is defined in another subgraph, you need to \
                 add it to this subgraph with @external)",
                definition.subgraphs.walk(selection.field).as_str(),
                definition.name().as_str(),
            ));
        };

        let composite_type = field.type_definition().filter(|nested| !nested.kind().is_leaf());

        match (composite_type, selection.subselection.is_empty()) {
            (Some(nested), false) => validate_selection_set(nested, &selection.subselection)?,
            (Some(nested), true) => {
                return Err(format!(
                    "field \"{}\" has composite type \"{}\" and needs a selection of subfields",
                    field.coordinate(),
                    nested.name().as_str(),
                ))
            }
            (None, false) => {
                return Err(format!(
                    "field \"{}\" has leaf type \"{}\" and cannot have a selection of subfields",
                    field.coordinate(),
                    definition.subgraphs.walk(field.r#type().name).as_str(),
                ))
            }
            (None, true) => (),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{compose, DiagnosticCode, Subgraphs};
    use indoc::indoc;

    fn codes(subgraph_sdls: &[(&str, &str)]) -> Vec<DiagnosticCode> {
        let mut subgraphs = Subgraphs::default();

        for (name, sdl) in subgraph_sdls {
            subgraphs.ingest_str(sdl, name, None).unwrap();
        }

        compose(&subgraphs).diagnostics().codes()
    }

    #[test]
    fn invalid_keys() {
        let sdl = indoc! {r#"
            type Query { product: Product }

            type Product @key(fields: "sku") @key(fields: "id { value }") @key(fields: "owner") {
                id: ID!
                owner: User
            }

            type User @key(fields: "id") { id: ID! }
        "#};

        assert_eq!(codes(&[("inventory", sdl)]), [DiagnosticCode::KeyInvalidFields; 3]);
    }

    #[test]
    fn requires_needs_external_fields() {
        let products = indoc! {r#"
            type Query { product: Product }

            type Product @key(fields: "id") {
                id: ID!
                weight: Int
            }
        "#};

        let shipping = indoc! {r#"
            type Product @key(fields: "id") {
                id: ID!
                weight: Int @external
                size: Int
                shippingEstimate: Int @requires(fields: "weight size")
                deliveryDate: String @requires(fields: "color")
            }
        "#};

        assert_eq!(
            codes(&[("products", products), ("shipping", shipping)]),
            [
                DiagnosticCode::RequiresFieldsMissingExternal,
                DiagnosticCode::RequiresInvalidFields,
            ]
        );
    }

    #[test]
    fn provides_targets_the_field_type() {
        let reviews = indoc! {r#"
            type Query {
                reviews: [Review] @provides(fields: "author { name }")
                topReview: Review @provides(fields: "rating")
                count: Int @provides(fields: "value")
            }

            type Review @key(fields: "id") {
                id: ID!
                author: User @external
            }

            type User @key(fields: "id") {
                id: ID!
                name: String @external
            }
        "#};

        let accounts = indoc! {r#"
            type Review @key(fields: "id") {
                id: ID!
                author: User
            }

            type User @key(fields: "id") {
                id: ID!
                name: String
            }
        "#};

        assert_eq!(
            codes(&[("accounts", accounts), ("reviews", reviews)]),
            [DiagnosticCode::ProvidesInvalidFields; 2]
        );
    }
}
