//! Change notification.
//!
//! Observers register closures that run synchronously, in registration
//! order, after a mutation has been fully committed. They receive the
//! subject by shared reference and re-fetch whatever state they need.

use std::fmt;

/// Handle returned by [`Callbacks::add`], used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

type Listener<T> = Box<dyn Fn(&T) + Send + Sync>;

/// Ordered list of listeners for one event.
pub struct Callbacks<T: ?Sized> {
    next_id: u64,
    listeners: Vec<(CallbackId, Listener<T>)>,
}

impl<T: ?Sized> Default for Callbacks<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for Callbacks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<T: ?Sized> Callbacks<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener.
    pub fn add(&mut self, listener: impl Fn(&T) + Send + Sync + 'static) -> CallbackId {
        let id = CallbackId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Unregisters a listener. Returns `false` if `id` was not registered.
    pub fn remove(&mut self, id: CallbackId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns `true` if nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Invokes every listener with `subject`.
    pub fn fire(&self, subject: &T) {
        for (_, listener) in &self.listeners {
            listener(subject);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_fire_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut cbs: Callbacks<str> = Callbacks::new();
        for tag in ["a", "b", "c"] {
            let log = Arc::clone(&log);
            cbs.add(move |s: &str| log.lock().unwrap().push(format!("{tag}:{s}")));
        }
        cbs.fire("x");
        assert_eq!(*log.lock().unwrap(), ["a:x", "b:x", "c:x"]);
    }

    #[test]
    fn test_remove() {
        let mut cbs: Callbacks<u32> = Callbacks::new();
        let first = cbs.add(|_| {});
        let second = cbs.add(|_| {});
        assert_ne!(first, second);
        assert!(cbs.remove(first));
        assert!(!cbs.remove(first));
        assert_eq!(cbs.len(), 1);
    }
}
