//! The federation directives, and the version of the federation spec that introduced each of
//! them.

use std::{fmt, str::FromStr};

/// A directive of the federation spec, by its unqualified name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::IntoStaticStr, strum::EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum FederationDirective {
    Key,
    Requires,
    Provides,
    External,
    Extends,
    Tag,
    Shareable,
    Inaccessible,
    Override,
    Link,
    ComposeDirective,
    InterfaceObject,
    Authenticated,
    RequiresScopes,
    Policy,
    Context,
    FromContext,
    Cost,
    ListSize,
}

/// (directive, the first federation version defining it)
const CAPABILITIES: &[(FederationDirective, FederationVersion)] = {
    use FederationDirective::*;

    &[
        (Key, FederationVersion::V1),
        (Requires, FederationVersion::V1),
        (Provides, FederationVersion::V1),
        (External, FederationVersion::V1),
        (Extends, FederationVersion::V1),
        (Tag, FederationVersion::V1),
        (Shareable, FederationVersion::new(2, 0)),
        (Inaccessible, FederationVersion::new(2, 0)),
        (Override, FederationVersion::new(2, 0)),
        (Link, FederationVersion::new(2, 0)),
        (ComposeDirective, FederationVersion::new(2, 1)),
        (InterfaceObject, FederationVersion::new(2, 3)),
        (Authenticated, FederationVersion::new(2, 5)),
        (RequiresScopes, FederationVersion::new(2, 5)),
        (Policy, FederationVersion::new(2, 6)),
        (Context, FederationVersion::new(2, 8)),
        (FromContext, FederationVersion::new(2, 8)),
        (Cost, FederationVersion::new(2, 9)),
        (ListSize, FederationVersion::new(2, 9)),
    ]
};

impl FederationDirective {
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// The first version of the federation spec defining the directive.
    pub fn min_version(self) -> FederationVersion {
        CAPABILITIES
            .iter()
            .find(|(directive, _)| *directive == self)
            .map(|(_, version)| *version)
            .unwrap_or(FederationVersion::HIGHEST)
    }

    pub fn is_available_in(self, version: FederationVersion) -> bool {
        self.min_version() <= version
    }
}

impl fmt::Display for FederationDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name())
    }
}

/// `major.minor`, as found at the end of federation `@link` urls (`.../federation/v2.3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FederationVersion {
    pub major: u16,
    pub minor: u16,
}

impl FederationVersion {
    /// Subgraphs without a federation `@link`.
    pub const V1: FederationVersion = FederationVersion::new(1, 0);
    pub const HIGHEST: FederationVersion = FederationVersion::new(2, 9);

    pub const fn new(major: u16, minor: u16) -> Self {
        FederationVersion { major, minor }
    }

    pub fn is_federation_v1(self) -> bool {
        self.major < 2
    }

    /// The version of a federation spec url, if it is one.
    pub(crate) fn from_url(url: &str) -> Option<Result<FederationVersion, InvalidVersion>> {
        let (_, version) = url.trim_end_matches('/').split_once("/federation/")?;
        Some(version.parse())
    }
}

impl fmt::Display for FederationVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a federation version")]
pub struct InvalidVersion(String);

impl FromStr for FederationVersion {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidVersion(s.to_owned());
        let (major, minor) = s.strip_prefix('v').and_then(|s| s.split_once('.')).ok_or_else(invalid)?;

        Ok(FederationVersion {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_directive_has_a_min_version() {
        for directive in FederationDirective::iter() {
            assert!(CAPABILITIES.iter().any(|(d, _)| *d == directive), "{directive}");
        }
    }

    #[test]
    fn names_are_camel_case() {
        assert_eq!(FederationDirective::InterfaceObject.name(), "interfaceObject");
        assert_eq!(
            "requiresScopes".parse::<FederationDirective>().unwrap(),
            FederationDirective::RequiresScopes
        );
        assert!("interface_object".parse::<FederationDirective>().is_err());
    }

    #[test]
    fn versions_from_urls() {
        assert_eq!(
            FederationVersion::from_url("https://specs.apollo.dev/federation/v2.3"),
            Some(Ok(FederationVersion::new(2, 3)))
        );
        assert!(matches!(
            FederationVersion::from_url("https://specs.apollo.dev/federation/latest"),
            Some(Err(_))
        ));
        assert_eq!(FederationVersion::from_url("https://specs.apollo.dev/link/v1.0"), None);
    }

    #[test]
    fn gating() {
        let v2_1 = FederationVersion::new(2, 1);
        assert!(FederationDirective::Shareable.is_available_in(v2_1));
        assert!(!FederationDirective::InterfaceObject.is_available_in(v2_1));
        assert!(!FederationDirective::Shareable.is_available_in(FederationVersion::V1));
        assert!(FederationDirective::ListSize.is_available_in(FederationVersion::HIGHEST));
    }
}
