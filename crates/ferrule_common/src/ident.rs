//! Interned names of variables, methods, and classes.

use lasso::{Key, Spur, ThreadedRodeo};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A name appearing in analyzed source code.
///
/// Expression trees are cloned for every rewrite, so names are stored as
/// interner keys: copying one is a word copy and comparing two never looks at
/// the string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ident(Spur);

impl Ident {
    /// Creates an identifier from a raw interner index.
    ///
    /// Indices that do not fit a key map to index `0`. Meant for tests and
    /// hand-built trees; names from source go through [`Interner::get_or_intern`].
    pub fn from_raw(index: u32) -> Self {
        let key = usize::try_from(index)
            .ok()
            .and_then(Spur::try_from_usize)
            .unwrap_or_default();
        Self(key)
    }

    /// Returns the raw interner index.
    pub fn as_raw(self) -> u32 {
        // keys are created from u32 indices, so this never truncates
        self.0.into_usize() as u32
    }
}

impl fmt::Debug for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ident({})", self.as_raw())
    }
}

/// Interner shared by everything that builds or prints expressions.
///
/// Backed by [`lasso::ThreadedRodeo`], so lint rules on different threads can
/// intern into one instance while evaluators resolve names concurrently.
#[derive(Default)]
pub struct Interner {
    names: ThreadedRodeo,
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interner").field("len", &self.len()).finish()
    }
}

impl Interner {
    /// Creates an empty interner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the identifier of `name`, interning it on first use.
    pub fn get_or_intern(&self, name: &str) -> Ident {
        Ident(self.names.get_or_intern(name))
    }

    /// Returns the identifier of `name` if it was interned before.
    pub fn get(&self, name: &str) -> Option<Ident> {
        self.names.get(name).map(Ident)
    }

    /// Resolves an identifier to its name.
    ///
    /// # Panics
    ///
    /// Panics if `ident` was not created by this interner.
    pub fn resolve(&self, ident: Ident) -> &str {
        self.names.resolve(&ident.0)
    }

    /// Resolves an identifier, returning `None` for identifiers from another interner.
    pub fn try_resolve(&self, ident: Ident) -> Option<&str> {
        self.names.try_resolve(&ident.0)
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if nothing was interned.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
