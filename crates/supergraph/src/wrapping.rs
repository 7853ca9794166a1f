use std::fmt;

const LIST_DEPTH_MASK: u32 = 0b1_1111;
const INNER_IS_REQUIRED: u32 = 1 << 5;
const LIST_FLAGS_SHIFT: u32 = 6;

/// The maximum number of nested lists a type reference can have.
pub const MAX_LIST_DEPTH: u32 = 26;

/// The list and non-null wrappers around a named type, packed in a `u32`.
///
/// - bits 0 to 4: the number of nested lists.
/// - bit 5: whether the named type itself is non-null.
/// - bit 6 + n: whether the n-th list, counting from the innermost, is non-null.
///
/// ```
/// # use supergraph::Wrapping;
/// // [Int!]
/// let wrapping = Wrapping::default().non_null().list();
/// assert_eq!(wrapping.type_display("Int").to_string(), "[Int!]");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, serde::Serialize)]
pub struct Wrapping(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListWrapping {
    List,
    ListNonNull,
}

impl Wrapping {
    /// Mark the named type as non-null. Only meaningful before any list wrapper is added.
    #[must_use]
    pub fn non_null(self) -> Self {
        debug_assert_eq!(self.list_depth(), 0);
        Wrapping(self.0 | INNER_IS_REQUIRED)
    }

    /// Add a list wrapper around the current type. `None` past [MAX_LIST_DEPTH] lists.
    pub fn wrap_list(self, list_wrapping: ListWrapping) -> Option<Self> {
        let depth = self.list_depth();

        if depth >= MAX_LIST_DEPTH {
            return None;
        }

        let non_null_flag = match list_wrapping {
            ListWrapping::List => 0,
            ListWrapping::ListNonNull => 1 << (LIST_FLAGS_SHIFT + depth),
        };

        Some(Wrapping((self.0 & !LIST_DEPTH_MASK) | (depth + 1) | non_null_flag))
    }

    /// Saturates at [MAX_LIST_DEPTH]: see [Wrapping::wrap_list] to detect it.
    #[must_use]
    pub fn list(self) -> Self {
        self.wrap_list(ListWrapping::List).unwrap_or(self)
    }

    #[must_use]
    pub fn list_non_null(self) -> Self {
        self.wrap_list(ListWrapping::ListNonNull).unwrap_or(self)
    }

    pub fn list_depth(self) -> u32 {
        self.0 & LIST_DEPTH_MASK
    }

    pub fn is_list(self) -> bool {
        self.list_depth() > 0
    }

    pub fn inner_is_required(self) -> bool {
        self.0 & INNER_IS_REQUIRED != 0
    }

    /// Is the outermost wrapper non-null?
    pub fn is_required(self) -> bool {
        match self.list_wrappings().next_back() {
            Some(wrapping) => wrapping == ListWrapping::ListNonNull,
            None => self.inner_is_required(),
        }
    }

    /// The list wrappers, from the innermost to the outermost.
    pub fn list_wrappings(self) -> impl DoubleEndedIterator<Item = ListWrapping> + ExactSizeIterator {
        (0..self.list_depth()).map(move |level| {
            if self.0 & (1 << (LIST_FLAGS_SHIFT + level)) != 0 {
                ListWrapping::ListNonNull
            } else {
                ListWrapping::List
            }
        })
    }

    /// Combine two wrappings with the same list depth into the least restrictive one: every
    /// level is non-null only if it is non-null in both. `None` when the list depths differ.
    pub fn least_restrictive(self, other: Wrapping) -> Option<Wrapping> {
        if self.list_depth() != other.list_depth() {
            return None;
        }

        // The depth bits are identical, so the intersection keeps them as they are.
        Some(Wrapping(self.0 & other.0))
    }

    pub fn type_display(self, name: &str) -> impl fmt::Display + '_ {
        TypeDisplay { wrapping: self, name }
    }
}

struct TypeDisplay<'a> {
    wrapping: Wrapping,
    name: &'a str,
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.wrapping.list_depth() {
            f.write_str("[")?;
        }

        f.write_str(self.name)?;

        if self.wrapping.inner_is_required() {
            f.write_str("!")?;
        }

        for wrapping in self.wrapping.list_wrappings() {
            f.write_str("]")?;

            if wrapping == ListWrapping::ListNonNull {
                f.write_str("!")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_nested_lists() {
        let wrapping = Wrapping::default().non_null().list().list_non_null();
        assert_eq!(wrapping.type_display("Int").to_string(), "[[Int!]]!");
        assert_eq!(wrapping.list_depth(), 2);
        assert!(wrapping.is_required());
        assert!(wrapping.inner_is_required());
    }

    #[test]
    fn least_restrictive_is_per_level() {
        let a = Wrapping::default().non_null().list_non_null(); // [T!]!
        let b = Wrapping::default().non_null().list(); // [T!]
        let c = Wrapping::default().list_non_null(); // [T]!

        assert_eq!(a.least_restrictive(b).unwrap().type_display("T").to_string(), "[T!]");
        assert_eq!(a.least_restrictive(c).unwrap().type_display("T").to_string(), "[T]!");
        assert_eq!(b.least_restrictive(c).unwrap().type_display("T").to_string(), "[T]");
    }

    #[test]
    fn least_restrictive_rejects_different_depths() {
        let named = Wrapping::default().non_null();
        let list = Wrapping::default().non_null().list();

        assert!(named.least_restrictive(list).is_none());
    }

    #[test]
    fn list_depth_is_bounded() {
        let mut wrapping = Wrapping::default().non_null();

        for _ in 0..MAX_LIST_DEPTH {
            wrapping = wrapping.wrap_list(ListWrapping::ListNonNull).unwrap();
        }

        assert_eq!(wrapping.list_depth(), MAX_LIST_DEPTH);
        assert!(wrapping.is_required());
        assert_eq!(wrapping.wrap_list(ListWrapping::List), None);
        assert_eq!(wrapping.list(), wrapping);
    }
}
