// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Process-wide keyed cache with per-key single initialization.

Each key owns a `OnceCell`. Concurrent first requests for the same key block
on that cell, so the loader runs at most once per key while loads of other
keys proceed in parallel. A failed load leaves the cell empty and the error
is returned to every waiter that attempted it.
*/

use std::hash::Hash;
use std::sync::Arc;

use ahash::AHashMap;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;

pub struct KeyedCache<K, V> {
    cells: RwLock<AHashMap<K, Arc<OnceCell<Arc<V>>>>>,
}

impl<K, V> KeyedCache<K, V>
where
    K: Eq + Hash + Copy,
{
    pub fn new() -> Self {
        Self {
            cells: RwLock::new(AHashMap::new()),
        }
    }

    /// Cached value for `key`, running `init` if no value is cached yet
    pub fn get_or_try_init<E, F>(&self, key: K, init: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let cell = self.cell(key);
        cell.get_or_try_init(|| init().map(Arc::new)).cloned()
    }

    /// Cached value for `key` without loading
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.cells.read().get(key).and_then(|cell| cell.get().cloned())
    }

    /// Number of keys with a loaded value
    pub fn len(&self) -> usize {
        self.cells.read().values().filter(|cell| cell.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cell(&self, key: K) -> Arc<OnceCell<Arc<V>>> {
        if let Some(cell) = self.cells.read().get(&key) {
            return Arc::clone(cell);
        }
        Arc::clone(self.cells.write().entry(key).or_default())
    }
}

impl<K, V> Default for KeyedCache<K, V>
where
    K: Eq + Hash + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}
