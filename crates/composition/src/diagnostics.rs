use async_graphql_parser::Pos;

/// Warnings and errors produced by composition, in the order they were found.
#[derive(Default, Debug, Clone, serde::Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// Is any of the diagnostics fatal, i.e. a hard error?
    pub fn any_fatal(&self) -> bool {
        self.0.iter().any(Diagnostic::is_fatal)
    }

    /// Is there any diagnostic warning or error
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Diagnostic> {
        self.0.iter()
    }

    /// Iterate non-fatal diagnostics.
    pub fn iter_warnings(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|diagnostic| !diagnostic.is_fatal())
            .map(|diagnostic| diagnostic.message.as_str())
    }

    /// Iterate fatal diagnostics.
    pub fn iter_errors(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|diagnostic| diagnostic.is_fatal())
            .map(|diagnostic| diagnostic.message.as_str())
    }

    /// Iterate over all diagnostic messages.
    pub fn iter_messages(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|diagnostic| diagnostic.message.as_str())
    }

    /// The codes of all diagnostics, in order.
    pub fn codes(&self) -> Vec<DiagnosticCode> {
        self.0.iter().map(|diagnostic| diagnostic.code).collect()
    }

    pub(crate) fn clone_all_from(&mut self, other: &Diagnostics) {
        self.0.extend(other.0.iter().cloned());
    }

    pub(crate) fn push_fatal(&mut self, code: DiagnosticCode, message: String) -> &mut Diagnostic {
        self.push(Severity::Error, code, message)
    }

    pub(crate) fn push_warning(&mut self, code: DiagnosticCode, message: String) -> &mut Diagnostic {
        self.push(Severity::Warning, code, message)
    }

    fn push(&mut self, severity: Severity, code: DiagnosticCode, message: String) -> &mut Diagnostic {
        self.0.push(Diagnostic {
            severity,
            code,
            message,
            locations: Vec::new(),
        });

        let last = self.0.len() - 1;
        &mut self.0[last]
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A composition diagnostic.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    /// The schema elements involved, in the subgraphs defining them.
    pub locations: Vec<Location>,
}

impl Diagnostic {
    /// Should this diagnostic be interpreted as a composition failure?
    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Error
    }

    pub(crate) fn at(&mut self, location: Location) -> &mut Self {
        self.locations.push(location);
        self
    }

    pub(crate) fn at_all(&mut self, locations: impl IntoIterator<Item = Location>) -> &mut Self {
        self.locations.extend(locations);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A schema element in one subgraph. `coordinate` is the schema coordinate of the element, like
/// `Product.price(currency:)`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Location {
    pub subgraph: String,
    pub coordinate: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl Location {
    pub(crate) fn new(subgraph: &str, coordinate: String, pos: Option<Pos>) -> Self {
        Location {
            subgraph: subgraph.to_owned(),
            coordinate,
            line: pos.map(|pos| pos.line),
            column: pos.map(|pos| pos.column),
        }
    }
}

/// Stable, machine-readable diagnostic codes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    // Ingestion and directive usage
    InvalidGraphql,
    InvalidLinkDirectiveUsage,
    UnknownFederationLinkVersion,
    UnsupportedFederationDirective,
    DirectiveNotImported,

    // Pre-merge validation
    InvalidSubgraphName,
    NoQueries,
    KeyInvalidFields,
    RequiresInvalidFields,
    ProvidesInvalidFields,
    RequiresFieldsMissingExternal,
    ProvidesFieldsMissingExternal,

    // Type and field merge
    TypeKindMismatch,
    InvalidFieldSharing,
    FieldTypeMismatch,
    RequiredArgumentMissing,
    FieldArgumentTypeMismatch,
    FieldArgumentDefaultMismatch,
    InconsistentArgumentPresence,
    InconsistentInputObjectField,
    RequiredInputFieldMissingInSomeSubgraph,
    InputFieldDefaultMismatch,
    EmptyMergedInputType,
    InconsistentEnumValue,
    EmptyMergedEnumType,
    InterfaceObjectUsageError,

    // Resolvability
    UnresolvableFieldError,

    // Global checks
    ExternalMissingOnBase,
    InterfaceFieldNoImplem,
    RequiredInaccessible,
    ReferencedInaccessible,
    OnlyInaccessibleChildren,
    QueryRootTypeInaccessible,
    OverrideFromSelfError,
    OverrideSourceHasOverride,
    FromSubgraphDoesNotExist,
}
