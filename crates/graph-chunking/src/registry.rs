//! Document-scoped node name registry.
//!
//! The registry dedupes concepts across the whole document: the recursive
//! walk and the terminal phrase-extraction pass both consult it before
//! minting a node. It is owned by the single-threaded driver and passed
//! down by `&mut` reference; embedding workers never touch it.

use std::collections::HashSet;

/// Set of node names already minted for the current document.
///
/// Names are stored bare (without the abstract marker): an abstract hub
/// and a concrete concept with the same keyword are the same name.
#[derive(Debug, Default, Clone)]
pub struct NameRegistry {
    names: HashSet<String>,
}

impl NameRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a name. Returns `true` if the name was free and is now
    /// registered, `false` if it was already taken.
    pub fn claim(&mut self, name: &str) -> bool {
        self.names.insert(name.to_string())
    }

    /// Whether a name has been minted.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of minted names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no names have been minted.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
