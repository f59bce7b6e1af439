// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The local plugin queue: schedulable plugin instances awaiting dispatch
//! to the resource manager. Grounded on the original `datatype.Queue`'s
//! `Push`/`Pop`/`PopFirst`/`GetGoalIDs` contract, with its iterator
//! off-by-one fixed per spec.md §9 (`index > len` let `Next()` return past
//! the last valid entry instead of stopping at it).

use std::collections::HashSet;

use parking_lot::Mutex;

use sg_core::Plugin;

#[derive(Default)]
struct Inner {
    entries: Vec<Plugin>,
    index: usize,
}

/// FIFO queue of plugins the rule evaluator has marked runnable. A single
/// mutex guards the whole queue, per spec.md §5's shared-resource list.
#[derive(Default)]
pub struct PluginQueue {
    inner: Mutex<Inner>,
}

impl PluginQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `plugin`, replacing any existing entry with the same name.
    pub fn push(&self, plugin: Plugin) {
        let mut inner = self.inner.lock();
        inner.entries.retain(|p| p.name != plugin.name);
        inner.entries.push(plugin);
    }

    /// Removes and returns the first entry named `name`, if present.
    pub fn pop(&self, name: &str) -> Option<Plugin> {
        let mut inner = self.inner.lock();
        let position = inner.entries.iter().position(|p| p.name == name)?;
        Some(inner.entries.remove(position))
    }

    /// Removes and returns the queue's first entry.
    pub fn pop_first(&self) -> Option<Plugin> {
        let mut inner = self.inner.lock();
        if inner.entries.is_empty() {
            None
        } else {
            Some(inner.entries.remove(0))
        }
    }

    pub fn length(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// The distinct set of goal IDs owning a queued plugin.
    pub fn goal_ids(&self) -> HashSet<String> {
        self.inner
            .lock()
            .entries
            .iter()
            .map(|p| p.goal_id.clone())
            .collect()
    }

    /// A point-in-time copy of every queued entry, in FIFO order.
    pub fn snapshot(&self) -> Vec<Plugin> {
        self.inner.lock().entries.clone()
    }

    /// Resets the manual cursor used by [`PluginQueue::more`]/[`PluginQueue::next`].
    pub fn reset_iter(&self) {
        self.inner.lock().index = 0;
    }

    /// Whether the manual cursor has entries left. Strictly less-than: the
    /// original's `index > len` check let a stale cursor read one entry
    /// past the end once every queued plugin had already been visited.
    pub fn more(&self) -> bool {
        let inner = self.inner.lock();
        inner.index < inner.entries.len()
    }

    /// Advances the manual cursor, returning the entry it pointed at.
    pub fn next(&self) -> Option<Plugin> {
        let mut inner = self.inner.lock();
        if inner.index >= inner.entries.len() {
            return None;
        }
        let plugin = inner.entries[inner.index].clone();
        inner.index += 1;
        Some(plugin)
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
