use super::*;
use async_graphql_value::ConstValue;
use std::{borrow::Cow, collections::HashSet};

const DEFAULT_FEDERATION_PREFIX: &str = "federation__";

/// Types that can be imported from the federation spec, besides directives.
const FEDERATION_TYPES: &[&str] = &["FieldSet", "Scope", "Policy", "ContextFieldValue"];

/// Subgraph protocol types. They are never composed.
const PROTOCOL_TYPES: &[&str] = &["_Service", "_Entity", "_Any", "_FieldSet"];

/// What the schema definitions and directive definitions of a subgraph tell us about it: the
/// federation version it links, how federation directives are named in it, and its root types.
///
/// The names of federation directives are influenced by the federation `@link` in two ways:
///
/// - Imports bring the directives in scope, with optional renaming.
///   Example: `@link(url: "...", import: [{ name: "@shareable", as: "@partageable" }])`
///   Example: `@link(url: "...", import: ["@key"])`
/// - The `as` argument sets the prefix for the directives that are not imported. It defaults to
///   `federation`, so `@federation__shareable` is always in scope unless `@shareable` is
///   imported.
///
/// A subgraph without a federation `@link` is a federation 1 subgraph: all the federation
/// directives are in scope under their bare names.
pub(crate) struct SchemaDefinitions<'doc> {
    pub(crate) version: FederationVersion,
    is_linked: bool,
    prefix: Cow<'doc, str>,
    /// (local name, directive)
    imports: Vec<(&'doc str, FederationDirective)>,
    imported_types: Vec<&'doc str>,
    /// Directives defined with `directive @name ...` in the subgraph.
    locally_defined: HashSet<&'doc str>,
    query: Option<&'doc str>,
    mutation: Option<&'doc str>,
    subscription: Option<&'doc str>,
}

impl Default for SchemaDefinitions<'_> {
    fn default() -> Self {
        SchemaDefinitions {
            version: FederationVersion::V1,
            is_linked: false,
            prefix: Cow::Borrowed(DEFAULT_FEDERATION_PREFIX),
            imports: Vec::new(),
            imported_types: Vec::new(),
            locally_defined: HashSet::new(),
            query: None,
            mutation: None,
            subscription: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DirectiveMatch {
    Federation(FederationDirective),
    /// The bare name of a federation directive that was not imported.
    NotImported(FederationDirective),
    Deprecated,
    Other,
}

pub(super) fn ingest_schema_definitions<'doc>(
    document: &'doc ast::ServiceDocument,
    subgraph_id: SubgraphId,
    subgraphs: &mut Subgraphs,
) -> SchemaDefinitions<'doc> {
    let mut schema = SchemaDefinitions::default();

    for definition in &document.definitions {
        match definition {
            ast::TypeSystemDefinition::Directive(directive) => {
                schema.locally_defined.insert(directive.node.name.node.as_str());
            }
            ast::TypeSystemDefinition::Schema(schema_definition) => {
                let schema_definition = &schema_definition.node;

                for (root, name) in [
                    (&mut schema.query, &schema_definition.query),
                    (&mut schema.mutation, &schema_definition.mutation),
                    (&mut schema.subscription, &schema_definition.subscription),
                ] {
                    if let Some(name) = name {
                        *root = Some(name.node.as_str());
                    }
                }

                for directive in &schema_definition.directives {
                    if directive.node.name.node == "link" {
                        ingest_link(&directive.node, directive.pos, &mut schema, subgraph_id, subgraphs);
                    }
                }
            }
            ast::TypeSystemDefinition::Type(_) => (),
        }
    }

    schema
}

fn ingest_link<'doc>(
    directive: &'doc ast::ConstDirective,
    pos: Pos,
    schema: &mut SchemaDefinitions<'doc>,
    subgraph_id: SubgraphId,
    subgraphs: &mut Subgraphs,
) {
    let push_error = |subgraphs: &mut Subgraphs, code, message: String| {
        subgraphs.push_ingestion_diagnostic(subgraph_id, code, message, "@link".to_owned(), Some(pos));
    };

    let url = match directive.get_argument("url").map(|url| &url.node) {
        Some(ConstValue::String(url)) => url,
        _ => {
            push_error(
                subgraphs,
                DiagnosticCode::InvalidLinkDirectiveUsage,
                "`@link` requires a string `url` argument".to_owned(),
            );
            return;
        }
    };

    // Links to other specs are not our business.
    let Some(version) = FederationVersion::from_url(url) else {
        return;
    };

    if schema.is_linked {
        push_error(
            subgraphs,
            DiagnosticCode::InvalidLinkDirectiveUsage,
            "The federation spec is linked more than once".to_owned(),
        );
        return;
    }

    schema.is_linked = true;
    schema.version = match version {
        Ok(version) if version.major == 2 && version <= FederationVersion::HIGHEST => version,
        Ok(version) => {
            push_error(
                subgraphs,
                DiagnosticCode::UnknownFederationLinkVersion,
                format!(
                    "Unknown federation version {version} in `{url}`: the highest known version is {}",
                    FederationVersion::HIGHEST
                ),
            );
            FederationVersion::HIGHEST
        }
        Err(err) => {
            push_error(
                subgraphs,
                DiagnosticCode::UnknownFederationLinkVersion,
                format!("Unknown federation version in `{url}`: {err}"),
            );
            FederationVersion::HIGHEST
        }
    };

    for (name, value) in &directive.arguments {
        match (name.node.as_str(), &value.node) {
            ("url" | "for", _) => (),
            ("as", ConstValue::String(prefix)) => schema.prefix = Cow::Owned(format!("{prefix}__")),
            ("import", ConstValue::List(imports)) => {
                for import in imports {
                    if let Err(message) = read_import(import, schema) {
                        push_error(subgraphs, DiagnosticCode::InvalidLinkDirectiveUsage, message);
                    }
                }
            }
            (name, value) => push_error(
                subgraphs,
                DiagnosticCode::InvalidLinkDirectiveUsage,
                format!("Invalid argument `{name}: {value}` in the federation `@link`"),
            ),
        }
    }
}

fn read_import<'doc>(import: &'doc ConstValue, schema: &mut SchemaDefinitions<'doc>) -> Result<(), String> {
    let (name, alias) = match import {
        ConstValue::String(name) => (name.as_str(), name.as_str()),
        ConstValue::Object(object) => {
            let Some(ConstValue::String(name)) = object.get("name") else {
                return Err(format!("Invalid import `{import}`: imports need a string `name`"));
            };

            match object.get("as") {
                None => (name.as_str(), name.as_str()),
                Some(ConstValue::String(alias)) if alias.starts_with('@') == name.starts_with('@') => {
                    (name.as_str(), alias.as_str())
                }
                Some(_) => {
                    return Err(format!(
                        "Invalid import `{import}`: a directive must be imported as a directive, and a type as a type"
                    ))
                }
            }
        }
        other => return Err(format!("Invalid import `{other}`: expected a string or an object")),
    };

    let Some(directive_name) = name.strip_prefix('@') else {
        if FEDERATION_TYPES.contains(&name) {
            schema.imported_types.push(alias);
            return Ok(());
        }

        return Err(format!("Cannot import unknown federation type `{name}`"));
    };

    let directive = directive_name
        .parse::<FederationDirective>()
        .map_err(|_| format!("Cannot import unknown federation directive `{name}`"))?;

    schema.imports.push((alias.trim_start_matches('@'), directive));
    Ok(())
}

impl SchemaDefinitions<'_> {
    pub(crate) fn is_federation_v1(&self) -> bool {
        self.version.is_federation_v1()
    }

    pub(crate) fn match_directive(&self, name: &str) -> DirectiveMatch {
        if name == "deprecated" {
            return DirectiveMatch::Deprecated;
        }

        if !self.is_linked {
            return name
                .parse()
                .map(DirectiveMatch::Federation)
                .unwrap_or(DirectiveMatch::Other);
        }

        if let Some((_, directive)) = self.imports.iter().find(|(local_name, _)| *local_name == name) {
            return DirectiveMatch::Federation(*directive);
        }

        // Imported directives are no longer available under the prefix.
        if let Some(directive) = name
            .strip_prefix(self.prefix.as_ref())
            .and_then(|unprefixed| unprefixed.parse::<FederationDirective>().ok())
        {
            if !self.imports.iter().any(|(_, imported)| *imported == directive) {
                return DirectiveMatch::Federation(directive);
            }
        }

        match name.parse::<FederationDirective>() {
            Ok(FederationDirective::Link) => DirectiveMatch::Federation(FederationDirective::Link),
            Ok(directive) if !self.locally_defined.contains(name) => DirectiveMatch::NotImported(directive),
            _ => DirectiveMatch::Other,
        }
    }

    /// The prefixed name of a federation directive, for error messages.
    pub(crate) fn qualified_name(&self, directive: FederationDirective) -> String {
        format!("@{}{}", self.prefix, directive.name())
    }

    /// Custom root type names become the default ones.
    pub(crate) fn normalize_type_name<'b>(&self, name: &'b str) -> &'b str {
        if Some(name) == self.query {
            "Query"
        } else if Some(name) == self.mutation {
            "Mutation"
        } else if Some(name) == self.subscription {
            "Subscription"
        } else {
            name
        }
    }

    /// A type using a default root type name while the schema definition renames that root.
    pub(crate) fn misused_root_name(&self, name: &str) -> Option<&str> {
        [
            ("Query", self.query),
            ("Mutation", self.mutation),
            ("Subscription", self.subscription),
        ]
        .into_iter()
        .find_map(|(default_name, root)| root.filter(|root| name == default_name && *root != default_name))
    }

    /// Federation internals that are not composed.
    pub(crate) fn is_protocol_type(&self, name: &str) -> bool {
        PROTOCOL_TYPES.contains(&name)
            || self.imported_types.contains(&name)
            || name.starts_with("link__")
            || name.starts_with(DEFAULT_FEDERATION_PREFIX)
            || (self.is_linked && name.starts_with(self.prefix.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_schema(graphql_sdl: &str, test: impl FnOnce(&SchemaDefinitions<'_>, &Subgraphs)) {
        let document = async_graphql_parser::parse_schema(graphql_sdl).unwrap();
        let mut subgraphs = Subgraphs::default();
        let subgraph_id = subgraphs.push_subgraph("test", None);
        let schema = ingest_schema_definitions(&document, subgraph_id, &mut subgraphs);
        test(&schema, &subgraphs);
    }

    fn ingestion_diagnostics(subgraphs: &Subgraphs) -> crate::Diagnostics {
        let mut diagnostics = crate::Diagnostics::default();
        subgraphs.emit_ingestion_diagnostics(&mut diagnostics);
        diagnostics
    }

    #[test]
    fn no_link_declaration() {
        with_schema("type Irrelevant { id: ID! }", |schema, _| {
            assert!(schema.is_federation_v1());
            assert_eq!(
                schema.match_directive("key"),
                DirectiveMatch::Federation(FederationDirective::Key)
            );
            assert_eq!(schema.match_directive("federation__key"), DirectiveMatch::Other);
        });
    }

    #[test]
    fn bare_link_declaration() {
        let sdl = r#"extend schema @link(url: "https://specs.apollo.dev/federation/v2.3")"#;
        with_schema(sdl, |schema, _| {
            assert_eq!(schema.version, FederationVersion::new(2, 3));
            assert_eq!(
                schema.match_directive("federation__shareable"),
                DirectiveMatch::Federation(FederationDirective::Shareable)
            );
            assert_eq!(
                schema.match_directive("shareable"),
                DirectiveMatch::NotImported(FederationDirective::Shareable)
            );
            assert_eq!(schema.match_directive("lowercase"), DirectiveMatch::Other);
        });
    }

    #[test]
    fn irrelevant_link_declaration() {
        let sdl = r#"extend schema @link(url: "https://bad.horse", as: "horse")"#;
        with_schema(sdl, |schema, subgraphs| {
            assert!(schema.is_federation_v1());
            assert_eq!(
                schema.match_directive("key"),
                DirectiveMatch::Federation(FederationDirective::Key)
            );
            assert!(ingestion_diagnostics(subgraphs).is_empty());
        });
    }

    #[test]
    fn imports_and_aliases() {
        let sdl = r#"
            extend schema @link(
                url: "https://specs.apollo.dev/federation/v2.3",
                as: "romulans"
                import: [{ name: "@shareable", as: "@partageable" }, "@key", "FieldSet"]
            )
        "#;
        with_schema(sdl, |schema, subgraphs| {
            assert!(ingestion_diagnostics(subgraphs).is_empty());
            assert_eq!(
                schema.match_directive("partageable"),
                DirectiveMatch::Federation(FederationDirective::Shareable)
            );
            assert_eq!(schema.match_directive("romulans__shareable"), DirectiveMatch::Other);
            assert_eq!(
                schema.match_directive("key"),
                DirectiveMatch::Federation(FederationDirective::Key)
            );
            assert_eq!(
                schema.match_directive("romulans__external"),
                DirectiveMatch::Federation(FederationDirective::External)
            );
            assert_eq!(schema.match_directive("federation__external"), DirectiveMatch::Other);
            assert!(schema.is_protocol_type("FieldSet"));
        });
    }

    #[test]
    fn locally_defined_directives_are_not_federation_directives() {
        let sdl = r#"
            extend schema @link(url: "https://specs.apollo.dev/federation/v2.0")
            directive @tag(name: String!) repeatable on FIELD_DEFINITION
        "#;
        with_schema(sdl, |schema, _| {
            assert_eq!(schema.match_directive("tag"), DirectiveMatch::Other);
        });
    }

    #[test]
    fn invalid_links() {
        let sdl = r#"
            extend schema @link(url: "https://specs.apollo.dev/federation/v3.1", import: ["@nope", 42])
        "#;
        with_schema(sdl, |schema, subgraphs| {
            assert_eq!(schema.version, FederationVersion::HIGHEST);

            assert_eq!(
                ingestion_diagnostics(subgraphs).codes(),
                [
                    DiagnosticCode::UnknownFederationLinkVersion,
                    DiagnosticCode::InvalidLinkDirectiveUsage,
                    DiagnosticCode::InvalidLinkDirectiveUsage,
                ]
            );
        });
    }

    #[test]
    fn renamed_roots() {
        let sdl = "schema { query: RootQuery } type RootQuery { a: Int }";
        with_schema(sdl, |schema, _| {
            assert_eq!(schema.normalize_type_name("RootQuery"), "Query");
            assert_eq!(schema.normalize_type_name("Product"), "Product");
            assert_eq!(schema.misused_root_name("Query"), Some("RootQuery"));
            assert_eq!(schema.misused_root_name("Mutation"), None);
        });
    }
}
