use super::*;
use crate::subgraphs::{DirectiveFlags, DirectiveSiteId};
use async_graphql_value::ConstValue;

/// Where the directives are applied. `@key` is only meaningful on definitions.
#[derive(Clone, Copy)]
pub(super) enum DirectiveTarget {
    Definition(DefinitionId),
    Field,
    Argument,
    EnumValue,
}

pub(super) fn ingest_directives(
    ctx: &mut IngestContext<'_>,
    site: DirectiveSiteId,
    target: DirectiveTarget,
    directives: &[Positioned<ast::ConstDirective>],
    coordinate: &str,
) {
    for directive in directives {
        let name = directive.node.name.node.as_str();

        let federation_directive = match ctx.schema.match_directive(name) {
            DirectiveMatch::Other => continue,
            DirectiveMatch::Deprecated => {
                let reason = string_argument(&directive.node, "reason");
                ctx.subgraphs.insert_deprecated(site, reason);
                continue;
            }
            DirectiveMatch::NotImported(federation_directive) => {
                let message = format!(
                    "Directive `@{name}` on `{coordinate}` is not imported: add it to the imports of the federation \
                     `@link`, or use `{}`",
                    ctx.schema.qualified_name(federation_directive)
                );
                ctx.push_error(
                    DiagnosticCode::DirectiveNotImported,
                    message,
                    coordinate.to_owned(),
                    Some(directive.pos),
                );
                continue;
            }
            DirectiveMatch::Federation(federation_directive) => federation_directive,
        };

        if !federation_directive.is_available_in(ctx.schema.version) {
            ctx.push_error(
                DiagnosticCode::UnsupportedFederationDirective,
                unsupported_message(federation_directive, ctx.schema.version, coordinate),
                coordinate.to_owned(),
                Some(directive.pos),
            );
            continue;
        }

        if let Err(message) = ingest_federation_directive(ctx, site, target, federation_directive, &directive.node) {
            ctx.push_error(
                DiagnosticCode::InvalidGraphql,
                format!("Invalid {federation_directive} on `{coordinate}`: {message}"),
                coordinate.to_owned(),
                Some(directive.pos),
            );
        }
    }
}

fn unsupported_message(directive: FederationDirective, version: FederationVersion, coordinate: &str) -> String {
    if version.is_federation_v1() {
        format!(
            "Directive {directive} on `{coordinate}` is not available in federation 1 subgraphs: link federation {} or \
             later",
            directive.min_version()
        )
    } else {
        format!(
            "Directive {directive} on `{coordinate}` requires federation {}, but the subgraph links federation {version}",
            directive.min_version()
        )
    }
}

fn ingest_federation_directive(
    ctx: &mut IngestContext<'_>,
    site: DirectiveSiteId,
    target: DirectiveTarget,
    federation_directive: FederationDirective,
    directive: &ast::ConstDirective,
) -> Result<(), String> {
    match federation_directive {
        FederationDirective::Shareable => ctx.subgraphs.set_directive_flag(site, DirectiveFlags::SHAREABLE),
        FederationDirective::External => ctx.subgraphs.set_directive_flag(site, DirectiveFlags::EXTERNAL),
        FederationDirective::Inaccessible => ctx.subgraphs.set_directive_flag(site, DirectiveFlags::INACCESSIBLE),
        FederationDirective::InterfaceObject => {
            ctx.subgraphs.set_directive_flag(site, DirectiveFlags::INTERFACE_OBJECT)
        }
        FederationDirective::Extends => ctx.subgraphs.set_directive_flag(site, DirectiveFlags::EXTENDS),
        FederationDirective::Tag => {
            let name = required_string_argument(directive, "name")?;
            ctx.subgraphs.insert_tag(site, name);
        }
        FederationDirective::Override => {
            let from = required_string_argument(directive, "from")?;
            ctx.subgraphs.insert_override(site, from);
        }
        FederationDirective::Requires => {
            let fields = required_string_argument(directive, "fields")?;
            ctx.subgraphs.insert_requires(site, fields)?;
        }
        FederationDirective::Provides => {
            let fields = required_string_argument(directive, "fields")?;
            ctx.subgraphs.insert_provides(site, fields)?;
        }
        FederationDirective::Key => {
            let DirectiveTarget::Definition(definition_id) = target else {
                return Ok(());
            };

            let fields = required_string_argument(directive, "fields")?;
            let resolvable = match directive.get_argument("resolvable").map(|value| &value.node) {
                None => true,
                Some(ConstValue::Boolean(resolvable)) => *resolvable,
                Some(other) => return Err(format!("`resolvable` must be a boolean, found `{other}`")),
            };

            ctx.subgraphs.push_key(definition_id, fields, resolvable)?;
        }
        // Not composition-relevant.
        FederationDirective::Link
        | FederationDirective::ComposeDirective
        | FederationDirective::Authenticated
        | FederationDirective::RequiresScopes
        | FederationDirective::Policy
        | FederationDirective::Context
        | FederationDirective::FromContext
        | FederationDirective::Cost
        | FederationDirective::ListSize => (),
    }

    Ok(())
}

/// Whether a declaration block carries `@shareable`, making all the fields it declares shareable.
pub(super) fn block_is_shareable(ctx: &IngestContext<'_>, directives: &[Positioned<ast::ConstDirective>]) -> bool {
    directives.iter().any(|directive| {
        ctx.schema.match_directive(directive.node.name.node.as_str())
            == DirectiveMatch::Federation(FederationDirective::Shareable)
            && FederationDirective::Shareable.is_available_in(ctx.schema.version)
    })
}

fn string_argument<'a>(directive: &'a ast::ConstDirective, name: &str) -> Option<&'a str> {
    match directive.get_argument(name).map(|value| &value.node) {
        Some(ConstValue::String(value)) => Some(value.as_str()),
        _ => None,
    }
}

fn required_string_argument<'a>(directive: &'a ast::ConstDirective, name: &str) -> Result<&'a str, String> {
    string_argument(directive, name).ok_or_else(|| format!("missing string argument `{name}`"))
}
