//! Persistent consent store.
//!
//! The gate only ever touches one key. Stores are origin-scoped key-value
//! maps that survive page loads; in the browser that is `localStorage`
//! (see `web::LocalStorageStore`).

use crate::error::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Origin-scoped key-value store holding the consent record.
pub trait ConsentStore {
    /// Read a value. `Ok(None)` means the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value. Rewriting the same value must be harmless.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store.
///
/// Clones share the same map, so a clone handed to a second gate behaves
/// like the same origin after a page reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Drop every entry, as a user clearing site data would.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl ConsentStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
