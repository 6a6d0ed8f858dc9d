//! Receiver identity.
//!
//! A decorated method memoizes one wrapper per receiver. Receivers do not register themselves up
//! front: each one embeds a [`ReceiverMarker`] which is assigned a [`ReceiverId`] the first time a
//! decorated method is called on it.
//!
//! Ids come from a process-wide, strictly increasing counter, so two live objects never share one.
//! Once assigned, a marker never changes.
//!
//! # Example
//!
//! ```
//! use micro_decorator::receiver::{Receiver, ReceiverMarker};
//!
//! #[derive(Default)]
//! struct Account {
//!     marker: ReceiverMarker,
//! }
//!
//! impl Receiver for Account {
//!     fn marker(&self) -> &ReceiverMarker {
//!         &self.marker
//!     }
//! }
//!
//! let account = Account::default();
//! assert!(!account.marker().is_assigned());
//!
//! let id = account.marker().id();
//! assert_eq!(account.marker().id(), id);
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_RECEIVER_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of one receiver, used as the memoization key of an attachment site.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReceiverId(u64);

impl ReceiverId {
    fn next() -> Self {
        ReceiverId(NEXT_RECEIVER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ReceiverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The lazily assigned identity tag embedded in a receiver.
///
/// Cloning a marker yields an unassigned one: a cloned object is a distinct receiver.
#[derive(Default)]
pub struct ReceiverMarker {
    id: Cell<Option<ReceiverId>>,
}

impl ReceiverMarker {
    pub const fn new() -> Self {
        Self { id: Cell::new(None) }
    }

    /// Returns the id, assigning a fresh one on first use.
    pub fn id(&self) -> ReceiverId {
        match self.id.get() {
            Some(id) => id,
            None => {
                let id = ReceiverId::next();
                self.id.set(Some(id));
                id
            }
        }
    }

    /// Returns the id without assigning one.
    pub fn peek(&self) -> Option<ReceiverId> {
        self.id.get()
    }

    pub fn is_assigned(&self) -> bool {
        self.id.get().is_some()
    }
}

impl Clone for ReceiverMarker {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl fmt::Debug for ReceiverMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id.get() {
            Some(id) => write!(f, "ReceiverMarker({id})"),
            None => f.write_str("ReceiverMarker(unassigned)"),
        }
    }
}

/// An object decorated methods can be called on.
///
/// Decorated methods are called through a shared handle, `Rc<T>`, so a memoized wrapper always
/// reaches the very object it was built for.
pub trait Receiver {
    fn marker(&self) -> &ReceiverMarker;
}

impl<T: Receiver + ?Sized> Receiver for Rc<T> {
    #[inline]
    fn marker(&self) -> &ReceiverMarker {
        (**self).marker()
    }
}

impl Receiver for ReceiverMarker {
    #[inline]
    fn marker(&self) -> &ReceiverMarker {
        self
    }
}
