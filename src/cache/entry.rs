//! Cache Entry Module
//!
//! Defines the byte-cost contract for stored values and the resident entry.

use std::rc::Rc;
use std::sync::Arc;

// == Value Trait ==
/// A payload that can be stored in the cache.
///
/// `size` reports the logical byte cost used for budget accounting. It must
/// be deterministic: the cache assumes a value reports the same size for as
/// long as it is resident.
pub trait Value {
    /// Returns the number of bytes this value counts against the budget.
    fn size(&self) -> usize;
}

impl Value for String {
    fn size(&self) -> usize {
        self.len()
    }
}

impl Value for str {
    fn size(&self) -> usize {
        self.len()
    }
}

impl Value for Box<str> {
    fn size(&self) -> usize {
        self.len()
    }
}

impl Value for Vec<u8> {
    fn size(&self) -> usize {
        self.len()
    }
}

impl Value for [u8] {
    fn size(&self) -> usize {
        self.len()
    }
}

impl Value for Box<[u8]> {
    fn size(&self) -> usize {
        self.len()
    }
}

impl<T: Value + ?Sized> Value for Arc<T> {
    fn size(&self) -> usize {
        (**self).size()
    }
}

impl<T: Value + ?Sized> Value for Rc<T> {
    fn size(&self) -> usize {
        (**self).size()
    }
}

// == Entry ==
/// A resident key-value pair, stored inside a recency list node.
///
/// The key is shared with the cache's index.
#[derive(Debug)]
pub(crate) struct Entry<V> {
    pub key: Arc<str>,
    pub value: V,
}

impl<V: Value> Entry<V> {
    pub fn new(key: Arc<str>, value: V) -> Self {
        Self { key, value }
    }

    // == Cost ==
    /// Bytes this entry counts against the budget: key length plus value size.
    ///
    /// Widened to `u128` so the sum of two `usize` values always fits.
    pub fn cost(&self) -> u128 {
        self.key.len() as u128 + self.value.size() as u128
    }
}
