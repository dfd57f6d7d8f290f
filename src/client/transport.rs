//! Side-effect seam for session-expiry recovery.
//!
//! Navigation and the session-scoped destination store belong to whatever
//! environment hosts the client (a scanner device shell, a CLI, a test
//! harness). The client only needs these three operations, so recovery stays
//! testable without any of that environment present.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

pub trait SessionTransport: Send + Sync {
    /// Current path plus query string.
    fn current_location(&self) -> String;

    /// Hard navigation. The session is being torn down at the transport
    /// layer, so this is a full reload, not an in-app route change.
    fn navigate(&self, path: &str);

    /// Session-scoped key/value store.
    fn persist(&self, key: &str, value: &str);
}

impl<T: SessionTransport + ?Sized> SessionTransport for Arc<T> {
    fn current_location(&self) -> String {
        (**self).current_location()
    }

    fn navigate(&self, path: &str) {
        (**self).navigate(path);
    }

    fn persist(&self, key: &str, value: &str) {
        (**self).persist(key, value);
    }
}

/// In-process transport for headless shells and tests.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    location: Mutex<String>,
    navigations: Mutex<Vec<String>>,
    store: Mutex<HashMap<String, String>>,
}

impl MemoryTransport {
    #[must_use]
    pub fn new(location: &str) -> Self {
        Self {
            location: Mutex::new(location.to_string()),
            navigations: Mutex::new(Vec::new()),
            store: Mutex::new(HashMap::new()),
        }
    }

    pub fn stored(&self, key: &str) -> Option<String> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
    }

    /// Every navigation target seen so far, oldest first.
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl SessionTransport for MemoryTransport {
    fn current_location(&self) -> String {
        self.location.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn navigate(&self, path: &str) {
        self.navigations.lock().unwrap_or_else(PoisonError::into_inner).push(path.to_string());
        *self.location.lock().unwrap_or_else(PoisonError::into_inner) = path.to_string();
    }

    fn persist(&self, key: &str, value: &str) {
        self.store.lock().unwrap_or_else(PoisonError::into_inner).insert(key.to_string(), value.to_string());
    }
}
