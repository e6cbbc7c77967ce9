//! Value-based interning of household and housing archetypes.
//!
//! Many real households (or dwellings) share every modelled attribute. The
//! registry collapses them into one archetype carrying a multiplicity count, so
//! per-archetype work is done once and scaled by the count.
//!
//! ```
//! use abode::domain::registry::{Interned, KeyBuilder, Registry, StructuralKey};
//!
//! #[derive(Debug)]
//! struct Plot(f64);
//!
//! impl Interned for Plot {
//!     fn structural_key(&self) -> StructuralKey {
//!         KeyBuilder::new("plot").float(self.0).finish()
//!     }
//! }
//!
//! let mut registry = Registry::new();
//! let a = registry.intern(Plot(1.5));
//! let b = registry.intern(Plot(1.5));
//! assert_eq!(a, b);
//! assert_eq!(registry.count(a), 2);
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::metric::MetricBundle;

/// Opaque handle to an interned archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArchetypeId(usize);

impl ArchetypeId {
    /// Position of the archetype in registration order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ArchetypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyPart {
    Tag(&'static str),
    Int(u64),
    Float(u64),
    Text(String),
}

/// Equality key covering every structural field of a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructuralKey(Vec<KeyPart>);

/// Incremental builder for a [`StructuralKey`].
#[derive(Debug)]
pub struct KeyBuilder(Vec<KeyPart>);

impl KeyBuilder {
    /// Start a key; `kind` keeps keys of different value types apart.
    #[must_use]
    pub fn new(kind: &'static str) -> Self {
        Self(vec![KeyPart::Tag(kind)])
    }

    #[must_use]
    pub fn tag(mut self, tag: &'static str) -> Self {
        self.0.push(KeyPart::Tag(tag));
        self
    }

    #[must_use]
    pub fn int(mut self, value: u64) -> Self {
        self.0.push(KeyPart::Int(value));
        self
    }

    /// Add a float by bit pattern; `-0.0` keys the same as `0.0`.
    #[must_use]
    pub fn float(mut self, value: f64) -> Self {
        let value = if value == 0.0 { 0.0 } else { value };
        self.0.push(KeyPart::Float(value.to_bits()));
        self
    }

    #[must_use]
    pub fn text(mut self, value: impl Into<String>) -> Self {
        self.0.push(KeyPart::Text(value.into()));
        self
    }

    /// Add a metric bundle in name order.
    #[must_use]
    pub fn bundle(mut self, bundle: &MetricBundle) -> Self {
        self.0.push(KeyPart::Int(bundle.len() as u64));
        for (name, value) in bundle.iter() {
            self = self.text(name).float(value);
        }
        self
    }

    #[must_use]
    pub fn finish(self) -> StructuralKey {
        StructuralKey(self.0)
    }
}

/// A value that can be deduplicated by its structure.
pub trait Interned {
    /// Key over every field that defines the archetype.
    fn structural_key(&self) -> StructuralKey;
}

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    count: u64,
}

/// Keyed store of archetypes with multiplicity counts.
///
/// Handles are indices in registration order and stay valid for the
/// registry's lifetime.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    index: HashMap<StructuralKey, ArchetypeId>,
    entries: Vec<Entry<T>>,
}

impl<T: Interned> Registry<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Register one instance of `value`.
    ///
    /// Returns the existing archetype (with its count incremented) when an
    /// identical value is already registered.
    pub fn intern(&mut self, value: T) -> ArchetypeId {
        self.insert(value, 1)
    }

    /// Register `count` identical instances of `value` at once.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyArchetype`] when `count` is zero.
    pub fn intern_many(&mut self, value: T, count: u64) -> Result<ArchetypeId, DomainError> {
        if count == 0 {
            return Err(DomainError::EmptyArchetype);
        }
        Ok(self.insert(value, count))
    }

    fn insert(&mut self, value: T, count: u64) -> ArchetypeId {
        let key = value.structural_key();
        if let Some(&id) = self.index.get(&key) {
            self.entries[id.0].count += count;
            return id;
        }
        let id = ArchetypeId(self.entries.len());
        self.entries.push(Entry { value, count });
        self.index.insert(key, id);
        id
    }

    /// Multiplicity of an archetype; zero for a foreign handle.
    #[must_use]
    pub fn count(&self, id: ArchetypeId) -> u64 {
        self.entries.get(id.0).map_or(0, |e| e.count)
    }

    #[must_use]
    pub fn get(&self, id: ArchetypeId) -> Option<&T> {
        self.entries.get(id.0).map(|e| &e.value)
    }

    /// Mutable access for market-state fields that are not part of the key.
    pub fn get_mut(&mut self, id: ArchetypeId) -> Option<&mut T> {
        self.entries.get_mut(id.0).map(|e| &mut e.value)
    }

    /// Look up an archetype without registering it.
    #[must_use]
    pub fn find(&self, value: &T) -> Option<ArchetypeId> {
        self.index.get(&value.structural_key()).copied()
    }

    /// Archetypes in registration order with their counts.
    pub fn iter(&self) -> impl Iterator<Item = (ArchetypeId, &T, u64)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (ArchetypeId(i), &e.value, e.count))
    }

    /// Number of distinct archetypes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of represented instances across all archetypes.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }
}

impl<T: Interned> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}
