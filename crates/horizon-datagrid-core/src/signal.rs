//! Signal/slot notifications for grid state changes.
//!
//! A deliberately small signal/slot mechanism: slots are plain closures
//! invoked directly on the emitting thread, in connection order. The grid and
//! its automation layer share the grid's owning thread, so there is no
//! queued or cross-thread delivery here — a signal emission is an ordinary
//! nested call.
//!
//! # Example
//!
//! ```
//! use horizon_datagrid_core::Signal;
//!
//! let changed = Signal::<u32>::new();
//! let id = changed.connect(|value| {
//!     assert_eq!(*value, 7);
//! });
//! changed.emit(7);
//! changed.disconnect(id);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Returned by [`Signal::connect`]; pass it to [`Signal::disconnect`] to
    /// remove the connection. The ID remains valid until disconnected or the
    /// signal is dropped.
    pub struct ConnectionId;
}

type SlotFn<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A signal with directly invoked slots.
///
/// Slots receive the emitted value by reference. Slots connected during an
/// emission are not invoked for that emission; slots disconnected during an
/// emission may still be invoked once.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, SlotFn<Args>>>,
}

impl<Args> Signal<Args> {
    /// Creates a signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Connects a slot to this signal.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Disconnects a slot by its connection ID.
    ///
    /// Returns `true` if the connection existed.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Removes all connections.
    pub fn clear(&self) {
        self.connections.lock().clear();
    }

    /// Returns the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Emits the signal, invoking every connected slot.
    ///
    /// The connection table is snapshotted before invocation so that slots
    /// may connect or disconnect without deadlocking the emitting thread.
    pub fn emit(&self, args: Args) {
        let slots: Vec<SlotFn<Args>> = self.connections.lock().values().cloned().collect();
        for slot in slots {
            slot(&args);
        }
    }
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connection_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_connect_and_emit() {
        let signal = Signal::<i32>::new();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = count.clone();
        signal.connect(move |value| {
            count_clone.fetch_add(*value as usize, Ordering::SeqCst);
        });

        signal.emit(2);
        signal.emit(3);
        assert_eq!(count.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_disconnect() {
        let signal = Signal::<()>::new();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = count.clone();
        let id = signal.connect(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        signal.emit(());
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        signal.emit(());

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reentrant_connect_does_not_deadlock() {
        let signal = Arc::new(Signal::<()>::new());

        let signal_clone = signal.clone();
        signal.connect(move |_| {
            // Connecting from within a slot must not deadlock.
            signal_clone.connect(|_| {});
        });

        signal.emit(());
        assert_eq!(signal.connection_count(), 2);
    }
}
