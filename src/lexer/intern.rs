//! Append-only, deduplicating value tables
//!
//! Each distinct value gets a stable index on first insertion. Lookup by
//! value is hash-indexed and enumeration follows insertion order.

use std::hash::{BuildHasherDefault, Hash};

use indexmap::IndexSet;
use rustc_hash::FxHasher;

use crate::error::{LexError, LexResult};

/// Ordered value table handing out stable indices
#[derive(Debug, Clone)]
pub struct InternTable<T> {
    name: &'static str,
    values: IndexSet<T, BuildHasherDefault<FxHasher>>,
}

impl<T: Hash + Eq> InternTable<T> {
    /// Create an empty table; `name` identifies it in errors
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            values: IndexSet::default(),
        }
    }

    /// Insert `value`, returning the index of the equal value already
    /// present or of the newly appended one
    pub fn insert(&mut self, value: T) -> usize {
        let (index, _) = self.values.insert_full(value);
        index
    }

    /// Value at `index`
    pub fn get(&self, index: usize) -> LexResult<&T> {
        self.values.get_index(index).ok_or(LexError::IndexOutOfRange {
            table: self.name,
            index,
            len: self.values.len(),
        })
    }

    /// Index of `value`, if it has been inserted
    pub fn get_index_of(&self, value: &T) -> Option<usize> {
        self.values.get_index_of(value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }
}
