use super::*;
use bitflags::bitflags;

/// The composition-relevant directives applied on definitions, fields, arguments and enum
/// values. Each of those has its own site.
#[derive(Default)]
pub(super) struct DirectiveSites(Vec<DirectiveSite>);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct DirectiveSiteId(usize);

bitflags! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub(crate) struct DirectiveFlags: u8 {
        const SHAREABLE = 1;
        const EXTERNAL = 1 << 1;
        const INACCESSIBLE = 1 << 2;
        const INTERFACE_OBJECT = 1 << 3;
        const EXTENDS = 1 << 4;
    }
}

#[derive(Default)]
pub(crate) struct DirectiveSite {
    flags: DirectiveFlags,
    tags: Vec<StringId>,
    deprecated: Option<Deprecated>,
    requires: Option<FieldSet>,
    provides: Option<FieldSet>,
    /// `@override(from:)`
    r#override: Option<StringId>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Deprecated {
    pub(crate) reason: Option<StringId>,
}

impl Subgraphs {
    pub(crate) fn new_directive_site(&mut self) -> DirectiveSiteId {
        self.directives.0.push(DirectiveSite::default());
        DirectiveSiteId(self.directives.0.len() - 1)
    }

    fn site_mut(&mut self, id: DirectiveSiteId) -> &mut DirectiveSite {
        &mut self.directives.0[id.0]
    }

    pub(crate) fn set_directive_flag(&mut self, id: DirectiveSiteId, flag: DirectiveFlags) {
        self.site_mut(id).flags.insert(flag);
    }

    pub(crate) fn insert_tag(&mut self, id: DirectiveSiteId, tag: &str) {
        let tag = self.strings.intern(tag);
        let tags = &mut self.site_mut(id).tags;

        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    pub(crate) fn insert_deprecated(&mut self, id: DirectiveSiteId, reason: Option<&str>) {
        let reason = reason.map(|reason| self.strings.intern(reason));
        self.site_mut(id).deprecated = Some(Deprecated { reason });
    }

    pub(crate) fn insert_override(&mut self, id: DirectiveSiteId, from: &str) {
        let from = self.strings.intern(from);
        self.site_mut(id).r#override = Some(from);
    }

    pub(crate) fn insert_requires(&mut self, id: DirectiveSiteId, fields: &str) -> Result<(), String> {
        let field_set = self.field_set_from_str(fields)?;
        self.site_mut(id).requires = Some(field_set);
        Ok(())
    }

    pub(crate) fn insert_provides(&mut self, id: DirectiveSiteId, fields: &str) -> Result<(), String> {
        let field_set = self.field_set_from_str(fields)?;
        self.site_mut(id).provides = Some(field_set);
        Ok(())
    }
}

pub(crate) type DirectiveSiteWalker<'a> = Walker<'a, DirectiveSiteId>;

impl<'a> DirectiveSiteWalker<'a> {
    fn site(self) -> &'a DirectiveSite {
        &self.subgraphs.directives.0[self.id.0]
    }

    pub(crate) fn shareable(self) -> bool {
        self.site().flags.contains(DirectiveFlags::SHAREABLE)
    }

    pub(crate) fn external(self) -> bool {
        self.site().flags.contains(DirectiveFlags::EXTERNAL)
    }

    pub(crate) fn inaccessible(self) -> bool {
        self.site().flags.contains(DirectiveFlags::INACCESSIBLE)
    }

    pub(crate) fn interface_object(self) -> bool {
        self.site().flags.contains(DirectiveFlags::INTERFACE_OBJECT)
    }

    pub(crate) fn extends(self) -> bool {
        self.site().flags.contains(DirectiveFlags::EXTENDS)
    }

    pub(crate) fn tags(self) -> impl Iterator<Item = StringWalker<'a>> + 'a {
        self.site().tags.iter().map(move |tag| self.walk(*tag))
    }

    pub(crate) fn deprecated(self) -> Option<Deprecated> {
        self.site().deprecated
    }

    pub(crate) fn requires(self) -> Option<&'a FieldSet> {
        self.site().requires.as_ref()
    }

    pub(crate) fn provides(self) -> Option<&'a FieldSet> {
        self.site().provides.as_ref()
    }

    /// The name of the subgraph in `@override(from:)`.
    pub(crate) fn r#override(self) -> Option<StringWalker<'a>> {
        self.site().r#override.map(|from| self.walk(from))
    }
}
