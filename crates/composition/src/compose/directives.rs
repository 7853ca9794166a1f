use crate::subgraphs::DirectiveSiteWalker;
use supergraph as federated;

/// `@inaccessible` anywhere makes the merged element inaccessible, `@tag`s are unioned, and the
/// first `@deprecated` wins.
pub(super) fn merge_directives<'a>(sites: impl Iterator<Item = DirectiveSiteWalker<'a>>) -> federated::Directives {
    let mut directives = federated::Directives::default();

    for site in sites {
        directives.inaccessible |= site.inaccessible();
        directives
            .tags
            .extend(site.tags().map(|tag| tag.as_str().to_owned()));

        if directives.deprecated.is_none() {
            directives.deprecated = site.deprecated().map(|deprecated| federated::Deprecated {
                reason: deprecated.reason.map(|reason| site.walk(reason).as_str().to_owned()),
            });
        }
    }

    directives
}
