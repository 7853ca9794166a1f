use super::*;
use indexmap::IndexSet;

/// Interned strings: every name, description and directive argument of the ingested subgraphs.
#[derive(Default)]
pub(crate) struct Strings {
    strings: IndexSet<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct StringId(usize);

impl Strings {
    pub(crate) fn intern(&mut self, string: &str) -> StringId {
        if let Some(idx) = self.strings.get_index_of(string) {
            return StringId(idx);
        }

        StringId(self.strings.insert_full(string.to_owned()).0)
    }

    pub(crate) fn lookup(&self, string: &str) -> Option<StringId> {
        self.strings.get_index_of(string).map(StringId)
    }

    pub(crate) fn resolve(&self, id: StringId) -> &str {
        &self.strings[id.0]
    }
}

pub(crate) type StringWalker<'a> = Walker<'a, StringId>;

impl<'a> StringWalker<'a> {
    pub(crate) fn as_str(self) -> &'a str {
        self.subgraphs.strings.resolve(self.id)
    }
}
