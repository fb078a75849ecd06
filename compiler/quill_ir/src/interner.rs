//! Identifier interning.
//!
//! The lexer resolves every symbol and operator through an [`Interner`],
//! passing the case-folded text together with a rolling hash it computed
//! while scanning. The returned [`Ident`] carries a stable integer id; ids in
//! the reserved keyword and operator blocks are turned into dedicated token
//! kinds by a range check.
//!
//! [`IdentCache`] is the default single-owner implementation.
//! [`SharedIdentCache`] wraps one behind a mutex so that lexers running on
//! different threads can share an identifier table.

use crate::token::{KEYWORDS, PUNCT_OPERATORS};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// First id of the keyword block (`addr`).
pub const KEYWORD_ID_LOW: u32 = 1;
/// Last id of the keyword block (`yield`).
#[allow(
    clippy::cast_possible_truncation,
    reason = "keyword table has 66 entries"
)]
pub const KEYWORD_ID_HIGH: u32 = KEYWORDS.len() as u32;
/// First id of the builtin punctuation operator block (`:`).
pub const OPERATOR_ID_LOW: u32 = KEYWORD_ID_HIGH + 1;
/// Last id of the builtin punctuation operator block (`..`).
#[allow(
    clippy::cast_possible_truncation,
    reason = "operator table has 5 entries"
)]
pub const OPERATOR_ID_HIGH: u32 = KEYWORD_ID_HIGH + PUNCT_OPERATORS.len() as u32;

/// An interned identifier: stable id plus the text it was interned from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Ident {
    id: u32,
    name: &'static str,
}

impl Ident {
    #[inline]
    pub const fn new(id: u32, name: &'static str) -> Self {
        Ident { id, name }
    }

    #[inline]
    pub const fn id(self) -> u32 {
        self.id
    }

    #[inline]
    pub const fn as_str(self) -> &'static str {
        self.name
    }

    /// Whether the id lies in the reserved keyword block.
    #[inline]
    pub const fn is_keyword(self) -> bool {
        self.id >= KEYWORD_ID_LOW && self.id <= KEYWORD_ID_HIGH
    }

    /// Whether the id lies in the reserved punctuation operator block.
    #[inline]
    pub const fn is_punct_operator(self) -> bool {
        self.id >= OPERATOR_ID_LOW && self.id <= OPERATOR_ID_HIGH
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Jenkins one-at-a-time hash, fed one byte at a time by the scanner.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct IdentHasher(u32);

impl IdentHasher {
    #[inline]
    pub const fn new() -> Self {
        IdentHasher(0)
    }

    #[inline]
    pub fn push(&mut self, byte: u8) {
        let mut h = self.0.wrapping_add(u32::from(byte));
        h = h.wrapping_add(h << 10);
        h ^= h >> 6;
        self.0 = h;
    }

    #[inline]
    pub fn finish(self) -> u32 {
        let mut h = self.0;
        h = h.wrapping_add(h << 3);
        h ^= h >> 11;
        h.wrapping_add(h << 15)
    }
}

/// Hash of an identifier's text, skipping underscores the way the symbol
/// scanner does.
pub fn ident_hash(text: &str) -> u32 {
    let mut hasher = IdentHasher::new();
    for byte in text.bytes().filter(|&b| b != b'_') {
        hasher.push(byte);
    }
    hasher.finish()
}

/// Resolves identifier text to a stable [`Ident`].
///
/// Implementations must hand out the same id for the same text for the
/// lifetime of the process and must keep the reserved keyword and operator
/// id blocks (see the crate docs).
pub trait Interner {
    fn intern(&mut self, text: &str, hash: u32) -> Ident;
}

/// Hash-bucketed identifier table.
///
/// Strings are leaked to obtain `&'static str`; identifiers live for the
/// whole compilation anyway.
pub struct IdentCache {
    /// Hash to the ids sharing it. Collisions are rare, so two inline slots.
    buckets: FxHashMap<u32, SmallVec<[u32; 2]>>,
    names: Vec<&'static str>,
}

impl IdentCache {
    /// Create a cache with the empty string, keywords and punctuation
    /// operators pre-interned at their reserved ids.
    pub fn new() -> Self {
        let mut cache = IdentCache {
            buckets: FxHashMap::default(),
            names: Vec::with_capacity(256),
        };
        cache.insert("", ident_hash(""));
        for &(_, text) in KEYWORDS.iter().chain(PUNCT_OPERATORS.iter()) {
            cache.insert(text, ident_hash(text));
        }
        debug_assert_eq!(cache.names.len(), OPERATOR_ID_HIGH as usize + 1);
        cache
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "more than u32::MAX distinct identifiers cannot fit in memory"
    )]
    fn insert(&mut self, name: &'static str, hash: u32) -> Ident {
        let id = self.names.len() as u32;
        self.names.push(name);
        self.buckets.entry(hash).or_default().push(id);
        Ident::new(id, name)
    }

    /// Find an already interned identifier without inserting.
    pub fn lookup(&self, text: &str, hash: u32) -> Option<Ident> {
        let bucket = self.buckets.get(&hash)?;
        bucket.iter().find_map(|&id| {
            let name = self.names[id as usize];
            (name == text).then_some(Ident::new(id, name))
        })
    }

    /// Identifier for an id handed out earlier.
    pub fn get(&self, id: u32) -> Option<Ident> {
        self.names
            .get(id as usize)
            .map(|&name| Ident::new(id, name))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for IdentCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner for IdentCache {
    fn intern(&mut self, text: &str, hash: u32) -> Ident {
        if let Some(ident) = self.lookup(text, hash) {
            return ident;
        }
        let leaked: &'static str = Box::leak(text.to_owned().into_boxed_str());
        self.insert(leaked, hash)
    }
}

impl fmt::Debug for IdentCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentCache")
            .field("len", &self.names.len())
            .finish_non_exhaustive()
    }
}

/// Thread-safe handle to one [`IdentCache`].
///
/// Cloning is cheap and every clone interns into the same table.
#[derive(Clone, Debug, Default)]
pub struct SharedIdentCache(Arc<Mutex<IdentCache>>);

impl SharedIdentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: u32) -> Option<Ident> {
        self.0.lock().get(id)
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }
}

impl Interner for SharedIdentCache {
    fn intern(&mut self, text: &str, hash: u32) -> Ident {
        self.0.lock().intern(text, hash)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
