use std::hash::Hash;

use fnv::FnvHashMap;

/// Deduplicating set that remembers insertion order.
///
/// Elements are addressable by position, which gives stable indices for
/// anything that is numbered by "the i-th element inserted". Removal uses
/// `swap_remove`, so it moves the last element into the hole. Callers that
/// rely on stable positions must not remove.
#[derive(Clone, Debug)]
pub struct OrderedSet<T> {
    items: Vec<T>,
    index: FnvHashMap<T, usize>,
}

impl<T: Eq + Hash + Clone> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash + Clone> OrderedSet<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: FnvHashMap::default(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            index: FnvHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Inserts `item` unless an equal element is already present.
    /// Returns `true` if the set grew.
    pub fn insert(&mut self, item: T) -> bool {
        if self.index.contains_key(&item) {
            return false;
        }
        self.index.insert(item.clone(), self.items.len());
        self.items.push(item);
        true
    }

    /// Removes `item` if present. Returns `true` if it was present.
    pub fn remove(&mut self, item: &T) -> bool {
        let Some(pos) = self.index.remove(item) else {
            return false;
        };
        self.items.swap_remove(pos);
        if pos < self.items.len() {
            self.index.insert(self.items[pos].clone(), pos);
        }
        true
    }

    /// Symmetric-difference insert: removes `item` if present, inserts it
    /// otherwise. Returns `true` if `item` is present afterwards.
    pub fn toggle(&mut self, item: T) -> bool {
        if self.remove(&item) {
            false
        } else {
            self.insert(item)
        }
    }

    pub fn contains(&self, item: &T) -> bool {
        self.index.contains_key(item)
    }

    pub fn index_of(&self, item: &T) -> Option<usize> {
        self.index.get(item).copied()
    }

    pub fn get(&self, i: usize) -> Option<&T> {
        self.items.get(i)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Eq + Hash + Clone> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        iter.into_iter().for_each(|item| {
            set.insert(item);
        });
        set
    }
}

impl<'a, T> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
