//! Known address registry
//!
//! Static mapping from an address to the identity label of the actor believed
//! to control it. Built once from configuration and never mutated. Entries
//! keep their declaration order; attribution walks them in that order.

use std::collections::HashMap;

/// Identity label for a group of known addresses
pub type Identity = String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownAddressRegistry {
    entries: Vec<(String, Identity)>,
    index: HashMap<String, usize>,
}

impl Default for KnownAddressRegistry {
    fn default() -> Self {
        Self::from_pairs([
            ("1KtjBE8yDxoqNTSyLG2re4qtKK19KpvVLT", "KJ"),
            ("1BkE8ttBRUKVNTj3Lx1EPsw7vVbhuLZhBt", "KJ"),
            ("1GozmcsMBC7bnMVUQLTKEw5vBxbSeG4erW", "GOMEZ"),
            ("1HKywxiL4JziqXrzLKhmB6a74ma6kxbSDj", "GOMEZ"),
        ])
    }
}

impl KnownAddressRegistry {
    /// A repeated address keeps its first position and takes the later identity
    pub fn new(pairs: impl IntoIterator<Item = (String, Identity)>) -> Self {
        let mut entries: Vec<(String, Identity)> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for (address, identity) in pairs {
            match index.get(&address) {
                Some(&pos) => entries[pos].1 = identity,
                None => {
                    index.insert(address.clone(), entries.len());
                    entries.push((address, identity));
                }
            }
        }
        Self { entries, index }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(address, identity)| (address.to_string(), identity.to_string())),
        )
    }

    pub fn identity_of(&self, address: &str) -> Option<&str> {
        self.index
            .get(address)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    pub fn contains(&self, address: &str) -> bool {
        self.index.contains_key(address)
    }

    /// Entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(address, identity)| (address.as_str(), identity.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
