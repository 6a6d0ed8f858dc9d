use crate::invoke::Invoke;
use crate::receiver::ReceiverId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

/// Per-receiver wrappers of one attachment site.
///
/// Entries are added lazily and never evicted. The map is only borrowed for the duration of a
/// lookup or an insert, never while user code runs.
pub struct MemoCache<Args, Out> {
    entries: RefCell<HashMap<ReceiverId, Invoke<Args, Out>>>,
}

impl<Args, Out> MemoCache<Args, Out> {
    pub fn new() -> Self {
        Self { entries: RefCell::new(HashMap::new()) }
    }

    pub fn get(&self, id: ReceiverId) -> Option<Invoke<Args, Out>> {
        self.entries.borrow().get(&id).cloned()
    }

    /// Stores `invoke` unless an entry already exists, returning the entry that is kept.
    pub fn insert_if_absent(&self, id: ReceiverId, invoke: Invoke<Args, Out>) -> Invoke<Args, Out> {
        self.entries.borrow_mut().entry(id).or_insert(invoke).clone()
    }

    pub fn contains(&self, id: ReceiverId) -> bool {
        self.entries.borrow().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn receivers(&self) -> Vec<ReceiverId> {
        let mut ids: Vec<_> = self.entries.borrow().keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl<Args, Out> Default for MemoCache<Args, Out> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args, Out> fmt::Debug for MemoCache<Args, Out> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoCache").field("receivers", &self.receivers()).finish()
    }
}
