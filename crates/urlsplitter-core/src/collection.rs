// SPDX-FileCopyrightText: 2026 urlsplitter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered, owning collection with all-or-nothing deep copy.
//!
//! A [`Collection`] owns every item it holds. Items move in on [`Collection::add`]
//! and are dropped on removal, unless taken back out with [`Collection::take`].
//! Deep copies go through the per-item [`CollectionItem::clone_item`] hook; a
//! single item that cannot be copied fails the whole copy, so callers never
//! receive a partially cloned collection.

use tracing::debug;

use crate::error::SplitterError;

/// Capability required of items that live in a [`Collection`].
pub trait CollectionItem: Sized {
    /// Produces an independent copy of this item.
    ///
    /// Returns `None` when the item cannot be copied safely, for example
    /// because it owns a live handle.
    fn clone_item(&self) -> Option<Self>;
}

/// Ordered collection of exclusively owned items.
#[derive(Debug, PartialEq, Eq)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Collection<T> {
    /// Create a new empty collection.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Create an empty collection with room for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Take ownership of `item` and append it. Returns its index.
    pub fn add(&mut self, item: T) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    /// Insert `item` at `index`, shifting later items right.
    ///
    /// Returns false (and drops `item`) when `index` is past the end.
    pub fn insert(&mut self, index: usize, item: T) -> bool {
        if index > self.items.len() {
            return false;
        }
        self.items.insert(index, item);
        true
    }

    /// Remove and drop the item at `index`. Returns false when out of range.
    pub fn remove(&mut self, index: usize) -> bool {
        self.take(index).is_some()
    }

    /// Transfer ownership of the item at `index` back to the caller.
    pub fn take(&mut self, index: usize) -> Option<T> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Borrow the item at `index`.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Mutably borrow the item at `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Find the first item matching `predicate`, with its index.
    pub fn find<P>(&self, mut predicate: P) -> Option<(usize, &T)>
    where
        P: FnMut(&T) -> bool,
    {
        self.items.iter().enumerate().find(|(_, item)| predicate(item))
    }

    /// Index of the first item matching `predicate`.
    pub fn position<P>(&self, predicate: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.items.iter().position(predicate)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the collection holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    /// Move every item of `items` into the collection, in order.
    pub fn extend_owned<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.items.extend(items);
    }
}

impl<T: CollectionItem> Collection<T> {
    /// Deep-copy the collection through each item's clone hook.
    ///
    /// Fails with [`SplitterError::CloneUnsupported`] on the first item that
    /// cannot be copied; no partial collection is returned.
    pub fn try_clone(&self) -> Result<Self, SplitterError> {
        let mut cloned = Self::with_capacity(self.items.len());
        for (index, item) in self.items.iter().enumerate() {
            match item.clone_item() {
                Some(copy) => cloned.items.push(copy),
                None => {
                    let item_type = std::any::type_name::<T>();
                    debug!(index, item_type, "collection clone aborted");
                    return Err(SplitterError::CloneUnsupported { index, item_type });
                }
            }
        }
        Ok(cloned)
    }

    /// Deep-copy every item of `other` onto the end of this collection.
    ///
    /// Nothing is appended unless every item of `other` can be copied.
    pub fn append(&mut self, other: &Self) -> Result<(), SplitterError> {
        let copies = other.try_clone()?;
        self.items.extend(copies.items);
        Ok(())
    }
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
