use crate::{
    models::store::Store,
    storage::{Storage, StorageError},
};

pub mod lists;
pub mod lookup;
pub mod tasks;
pub mod undo;

/// Saves after a logical mutation. On failure the in-memory change is kept
/// and the error goes back to the caller.
fn commit(store: &Store, storage: &impl Storage) -> Result<(), StorageError> {
    storage.save(store).inspect_err(|e| {
        tracing::warn!(error = %e, "failed to save store, in-memory change kept");
    })
}
