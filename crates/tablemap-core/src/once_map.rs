// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Append-only memo map with a single initialisation per key.

use std::{
    collections::HashMap,
    hash::Hash,
    sync::{Arc, OnceLock, PoisonError, RwLock}
};

/// Concurrent memo map.
///
/// The map lock only guards cell lookup/insertion; values are initialised
/// inside their own [`OnceLock`] after the map lock is released, so unrelated
/// keys initialise in parallel and concurrent callers for the same key block
/// until the first one finishes. Entries are never removed.
pub(crate) struct OnceMap<K, V> {
    cells: RwLock<HashMap<K, Arc<OnceLock<V>>>>
}

impl<K, V> Default for OnceMap<K, V> {
    fn default() -> Self {
        Self {
            cells: RwLock::new(HashMap::new())
        }
    }
}

impl<K: Eq + Hash + Clone, V: Clone> OnceMap<K, V> {
    /// Return the value for `key`, running `init` if this is the first call.
    ///
    /// `init` must not request the same key again.
    pub(crate) fn get_or_init(&self, key: &K, init: impl FnOnce() -> V) -> V {
        self.cell(key).get_or_init(init).clone()
    }

    /// Value for `key` if already initialised.
    pub(crate) fn get(&self, key: &K) -> Option<V> {
        let cells = self.cells.read().unwrap_or_else(PoisonError::into_inner);
        cells.get(key).and_then(|cell| cell.get().cloned())
    }

    /// Number of initialised entries.
    pub(crate) fn len(&self) -> usize {
        let cells = self.cells.read().unwrap_or_else(PoisonError::into_inner);
        cells.values().filter(|cell| cell.get().is_some()).count()
    }

    fn cell(&self, key: &K) -> Arc<OnceLock<V>> {
        {
            let cells = self.cells.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(cell) = cells.get(key) {
                return Arc::clone(cell);
            }
        }
        let mut cells = self.cells.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(cells.entry(key.clone()).or_default())
    }
}
