//! Identifiers for model elements.

use std::fmt;

/// An identifier for an element in the model arena.
///
/// Ids are assigned sequentially as elements are created and are stable for
/// the lifetime of the batch. All cross-references inside the model
/// (ownership, edge endpoints, resolved type references) are expressed as
/// `ElementId`s rather than embedded references.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ElementId(pub u32);

impl ElementId {
    /// Create a new ElementId from a raw index.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({})", self.0)
    }
}

impl From<u32> for ElementId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}
