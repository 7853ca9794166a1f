use crate::DiagnosticCode;

mod selection;
mod subgraph_names;

type ValidateContext<'a> = crate::ComposeContext<'a>;

/// Pre-composition validations happen here.
pub(crate) fn validate(ctx: &mut ValidateContext<'_>) {
    subgraph_names::validate_subgraph_names(ctx);
    validate_query_nonempty(ctx);
    validate_keys(ctx);
    validate_fields(ctx);

    tracing::debug!(diagnostics = ctx.diagnostics.len(), "validated subgraphs");
}

fn validate_query_nonempty(ctx: &mut ValidateContext<'_>) {
    if ctx
        .subgraphs
        .iter_subgraphs()
        .filter_map(|subgraph| subgraph.query_type())
        .all(|query_type| query_type.fields().next().is_none())
    {
        ctx.push_error(
            DiagnosticCode::NoQueries,
            String::from("None of the subgraphs defines root query fields."),
        );
    }
}

fn validate_keys(ctx: &mut ValidateContext<'_>) {
    let subgraphs = ctx.subgraphs;

    for definition in subgraphs.iter_definitions() {
        for key in definition.keys() {
            selection::validate_key(ctx, key);
        }
    }
}

fn validate_fields(ctx: &mut ValidateContext<'_>) {
    let subgraphs = ctx.subgraphs;

    for field in subgraphs.iter_fields() {
        selection::validate_requires(ctx, field);
        selection::validate_provides(ctx, field);
    }
}

#[cfg(test)]
mod tests {
    use crate::{compose, DiagnosticCode, Subgraphs};

    fn codes(subgraph_sdls: &[(&str, &str)]) -> Vec<DiagnosticCode> {
        let mut subgraphs = Subgraphs::default();

        for (name, sdl) in subgraph_sdls {
            subgraphs.ingest_str(sdl, name, None).unwrap();
        }

        compose(&subgraphs).diagnostics().codes()
    }

    #[test]
    fn no_queries() {
        assert!(codes(&[("a", "type Query { a: Int }"), ("b", "scalar Date")]).is_empty());
        assert_eq!(codes(&[("b", "scalar Date")]), [DiagnosticCode::NoQueries]);
    }

    #[test]
    fn subgraph_names() {
        let sdl = "type Query { a: Int }";

        assert_eq!(
            codes(&[("", sdl), ("_", sdl), ("ok", sdl), ("ok", sdl)]),
            [DiagnosticCode::InvalidSubgraphName; 3]
        );
    }
}
