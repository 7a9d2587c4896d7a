//! Observer registration and broadcast.
//!
//! [`Observers`] is a generic ordered publish/subscribe registry; it knows
//! nothing about the simulation. Handles are `Rc<RefCell<_>>` and the
//! registry keeps only `Weak` references: registration is non-owning, the
//! publisher never destroys its observers, and an observer dropped by its
//! owner is silently skipped at the next broadcast.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use petri_field::BitField;

/// Consumer of simulation state changes.
///
/// `current` and `previous` are the engine's live buffers, reused and
/// overwritten on the next tick; treat them as read-only and do not retain
/// them past the call. On edit broadcasts (toggle, resize, reset, the
/// immediate broadcast of `start`) both arguments are the same reference;
/// on a tick broadcast `previous` is the generation `current` was computed
/// from.
pub trait Observer {
    fn notify(&mut self, current: &BitField, previous: &BitField);
}

/// Shared handle to a registered observer.
pub type SharedObserver = Rc<RefCell<dyn Observer>>;

/// Ordered set of observer handles.
///
/// Insertion order is significant and preserved across removals.
/// Duplicate registrations are permitted (and discouraged); removal takes
/// the first entry with the same identity.
pub struct Observers<T: ?Sized> {
    entries: Vec<Weak<RefCell<T>>>,
}

impl<T: ?Sized> Observers<T> {
    /// Append an observer to the registry.
    ///
    /// Entries whose observer has been dropped are pruned here, so the
    /// registry does not grow under register/drop churn. Order of the
    /// remaining entries is preserved.
    pub fn register(&mut self, observer: &Rc<RefCell<T>>) {
        self.entries.retain(|entry| entry.strong_count() > 0);
        self.entries.push(Rc::downgrade(observer));
    }

    /// Remove an observer by identity.
    ///
    /// Returns false, with no side effects, when the handle was never
    /// registered.
    pub fn remove(&mut self, observer: &Rc<RefCell<T>>) -> bool {
        let target = Rc::downgrade(observer);
        match self.entries.iter().position(|entry| entry.ptr_eq(&target)) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Visit every live observer in registration order, synchronously.
    pub fn notify_each(&self, mut notify: impl FnMut(&mut T)) {
        for entry in &self.entries {
            if let Some(observer) = entry.upgrade() {
                notify(&mut *observer.borrow_mut());
            }
        }
    }

    /// Number of registered observers still alive.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.strong_count() > 0)
            .count()
    }

    /// True when no live observer is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: ?Sized> Default for Observers<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}
