//! Synchronous publish/subscribe for store change notification.
//!
//! Every store owns a `Subscribers<C>` registry, where `C` describes what
//! changed. Callbacks run on the caller's thread, after the mutation has
//! completed, in registration order. Subscribing returns a `Subscription`
//! handle; dropping the handle (or calling `unsubscribe`) removes the
//! callback.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

type Callback<C> = Arc<dyn Fn(&C) + Send + Sync>;

struct Registry<C> {
    next_id: u64,
    callbacks: Vec<(u64, Callback<C>)>,
}

/// Registry of change callbacks for one store.
pub struct Subscribers<C> {
    registry: Arc<Mutex<Registry<C>>>,
}

impl<C> Default for Subscribers<C> {
    fn default() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                callbacks: Vec::new(),
            })),
        }
    }
}

impl<C> fmt::Debug for Subscribers<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.len())
            .finish()
    }
}

impl<C: 'static> Subscribers<C> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback`, returning the handle that keeps it registered.
    #[must_use = "dropping the Subscription unregisters the callback"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&C) + Send + Sync + 'static,
    {
        let mut registry = self
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.callbacks.push((id, Arc::new(callback)));

        let weak: Weak<Mutex<Registry<C>>> = Arc::downgrade(&self.registry);
        Subscription {
            unregister: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    registry
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .callbacks
                        .retain(|(entry, _)| *entry != id);
                }
            })),
        }
    }

    /// Invokes every registered callback with `change`.
    ///
    /// The registry lock is released before callbacks run, so a callback may
    /// subscribe or drop its own handle.
    pub fn notify(&self, change: &C) {
        let callbacks: Vec<Callback<C>> = self
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .callbacks
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in callbacks {
            callback(change);
        }
    }
}

impl<C> Subscribers<C> {
    /// Number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .callbacks
            .len()
    }

    /// Returns `true` if no callbacks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle returned by `Subscribers::subscribe`. Unregisters on drop.
pub struct Subscription {
    unregister: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Unregisters the callback now.
    pub fn unsubscribe(mut self) {
        if let Some(unregister) = self.unregister.take() {
            unregister();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unregister) = self.unregister.take() {
            unregister();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unregister.is_some())
            .finish()
    }
}
