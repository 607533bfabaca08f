//! Handles to declarations in a [`DeclarationTable`](crate::decl::DeclarationTable).

use serde::{Deserialize, Serialize};

/// Refers to one variable declaration (local, parameter, or field).
///
/// IDs are dense indices handed out by
/// [`DeclarationTable::declare`](crate::decl::DeclarationTable::declare); a
/// variable read carries the ID of the declaration it resolves to.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VarId(u32);

impl VarId {
    /// Creates an ID from a raw index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    pub fn as_raw(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}
