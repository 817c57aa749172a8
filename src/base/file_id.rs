//! Source file handles.

use std::fmt;

/// Identifies one source file within a batch run.
///
/// The driver assigns ids densely in discovery order and keeps the actual
/// path in its [`SourceSet`](crate::project::SourceSet); everything below
/// the driver (unit contexts, pending records, log lines) carries only this
/// four-byte handle, so equality checks stay O(1) and per-unit state is
/// cheap to copy.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FileId(pub u32);

impl FileId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The raw index, matching the file's position in discovery order.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

/// Compact form for log lines.
impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}", self.0)
    }
}
