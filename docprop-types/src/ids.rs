use std::fmt;

use uuid::Uuid;

/// Handle for one in-memory document instance.
///
/// Nested casted values point at their enclosing document through this
/// handle, never through a reference, so the relation does not keep the
/// parent alive. It is not a persisted document id and has no textual or
/// serialized form beyond [`Display`](fmt::Display) for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// A fresh, time-ordered (UUID v7) handle.
    #[must_use]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
