//! Localized label cache.
//!
//! Labels come from the server either one at a time or as a whole table.
//! Each is fetched at most once: a caller that finds a fetch already in
//! flight waits for it instead of starting another.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

/// Localized strings keyed by label name.
pub type LabelTable = HashMap<String, String>;

/// Observable state of the full label table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Loading,
    Ready,
}

#[derive(Debug, Default)]
enum Table {
    #[default]
    Empty,
    Loading,
    Ready(Arc<LabelTable>),
}

#[derive(Debug, Default)]
struct Inner {
    table: Table,
    labels: HashMap<String, String>,
    pending: HashSet<String>,
}

/// Cache for localized labels with single-flight loading.
#[derive(Debug, Default)]
pub struct LabelCache {
    inner: Mutex<Inner>,
    changed: Condvar,
}

impl LabelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// State of the full table.
    pub fn state(&self) -> CacheState {
        match self.lock().table {
            Table::Empty => CacheState::Empty,
            Table::Loading => CacheState::Loading,
            Table::Ready(_) => CacheState::Ready,
        }
    }

    /// Return the full table, running `fetch` if nobody has loaded it yet.
    ///
    /// While another caller's fetch is in flight this blocks until it
    /// finishes. A failed fetch leaves the cache empty and the error goes to
    /// the caller that ran it; waiting callers then try again themselves.
    pub fn all<F, E>(&self, fetch: F) -> Result<Arc<LabelTable>, E>
    where
        F: FnOnce() -> Result<LabelTable, E>,
    {
        let mut guard = self.lock();
        loop {
            let loading = match &guard.table {
                Table::Ready(table) => return Ok(Arc::clone(table)),
                Table::Loading => true,
                Table::Empty => false,
            };
            if !loading {
                break;
            }
            guard = self.wait(guard);
        }
        guard.table = Table::Loading;
        drop(guard);
        tracing::debug!("loading label table");

        let mut flight = Flight {
            cache: self,
            key: None,
            done: false,
        };
        let result = fetch();
        flight.finish();

        let mut guard = self.lock();
        let outcome = match result {
            Ok(table) => {
                let table = Arc::new(table);
                guard.table = Table::Ready(Arc::clone(&table));
                Ok(table)
            }
            Err(err) => {
                guard.table = Table::Empty;
                Err(err)
            }
        };
        drop(guard);
        self.changed.notify_all();
        outcome
    }

    /// Return one label, running `fetch` for it if it is not cached.
    ///
    /// A loaded full table answers without fetching.
    pub fn label<F, E>(&self, key: &str, fetch: F) -> Result<String, E>
    where
        F: FnOnce(&str) -> Result<String, E>,
    {
        let mut guard = self.lock();
        loop {
            if let Some(label) = cached(&guard, key) {
                return Ok(label);
            }
            if guard.pending.contains(key) {
                guard = self.wait(guard);
            } else {
                break;
            }
        }
        guard.pending.insert(key.to_string());
        drop(guard);
        tracing::debug!(key, "loading label");

        let mut flight = Flight {
            cache: self,
            key: Some(key),
            done: false,
        };
        let result = fetch(key);
        flight.finish();

        let mut guard = self.lock();
        guard.pending.remove(key);
        if let Ok(label) = &result {
            guard.labels.insert(key.to_string(), label.clone());
        }
        drop(guard);
        self.changed.notify_all();
        result
    }

    /// Look up a label without fetching.
    pub fn get(&self, key: &str) -> Option<String> {
        cached(&self.lock(), key)
    }

    /// Forget everything, e.g. after a language switch.
    pub fn clear(&self) {
        let mut guard = self.lock();
        if !matches!(guard.table, Table::Loading) {
            guard.table = Table::Empty;
        }
        guard.labels.clear();
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, Inner>) -> MutexGuard<'a, Inner> {
        match self.changed.wait(guard) {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn cached(inner: &Inner, key: &str) -> Option<String> {
    if let Some(label) = inner.labels.get(key) {
        return Some(label.clone());
    }
    match &inner.table {
        Table::Ready(table) => table.get(key).cloned(),
        _ => None,
    }
}

/// Releases an in-flight marker if the fetch unwinds.
struct Flight<'a> {
    cache: &'a LabelCache,
    key: Option<&'a str>,
    done: bool,
}

impl Flight<'_> {
    const fn finish(&mut self) {
        self.done = true;
    }
}

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        let mut guard = self.cache.lock();
        match self.key {
            Some(key) => {
                guard.pending.remove(key);
            }
            None => guard.table = Table::Empty,
        }
        drop(guard);
        self.cache.changed.notify_all();
    }
}
