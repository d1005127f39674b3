use std::cell::{Cell, RefCell};

use crate::{
    models::store::Store,
    storage::{Storage, StorageError},
};

/// Keeps the last saved snapshot in memory. Saves can be made to fail to
/// exercise the save-failure path.
#[derive(Default)]
pub struct MemoryStorage {
    snapshot: RefCell<Option<Store>>,
    fail_saves: Cell<bool>,
    save_count: Cell<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.save_count.get()
    }

    pub fn snapshot(&self) -> Option<Store> {
        self.snapshot.borrow().clone()
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Store, StorageError> {
        Ok(self.snapshot.borrow().clone().unwrap_or_default())
    }

    fn save(&self, store: &Store) -> Result<(), StorageError> {
        if self.fail_saves.get() {
            return Err(StorageError::Rejected);
        }
        *self.snapshot.borrow_mut() = Some(store.clone());
        self.save_count.set(self.save_count.get() + 1);
        Ok(())
    }
}
