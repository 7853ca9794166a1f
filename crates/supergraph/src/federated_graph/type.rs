use crate::Wrapping;
use std::fmt;

/// A reference to a named type, with its list and non-null wrappers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct Type {
    pub name: String,
    pub wrapping: Wrapping,
}

impl Type {
    /// Is the outermost wrapper non-null?
    pub fn is_required(&self) -> bool {
        self.wrapping.is_required()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.wrapping.type_display(&self.name), f)
    }
}
