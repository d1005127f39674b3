use jiff::{SignedDuration, Timestamp};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::store::{CompletionRecord, Store},
    services::commit,
    storage::{Storage, StorageError},
};

/// How long the "undo completion" affordance stays available by default
pub const DEFAULT_UNDO_WINDOW: SignedDuration = SignedDuration::from_secs(3);

#[derive(Debug, Error)]
pub enum UndoCompletionError {
    #[error("There is no completion to undo")]
    NothingToUndo,

    #[error("The last completion can no longer be undone ({0} ago)")]
    Expired(SignedDuration),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// The undoable completion, if it is still within `window`
pub fn pending_undo(store: &Store, window: SignedDuration, now: Timestamp) -> Option<&CompletionRecord> {
    store
        .last_completion
        .as_ref()
        .filter(|record| now.duration_since(record.completed_at) <= window)
}

/// Puts back every task the last completion flipped and empties the slot.
/// Tasks deleted since then are skipped. Returns the ids restored.
pub fn undo_last_completion(
    store: &mut Store,
    storage: &impl Storage,
    window: SignedDuration,
    now: Timestamp,
) -> Result<Vec<Uuid>, UndoCompletionError> {
    let record = store
        .last_completion
        .as_ref()
        .ok_or(UndoCompletionError::NothingToUndo)?;

    let elapsed = now.duration_since(record.completed_at);
    if elapsed > window {
        return Err(UndoCompletionError::Expired(elapsed));
    }

    let Some(record) = store.last_completion.take() else {
        return Err(UndoCompletionError::NothingToUndo);
    };

    let mut restored = Vec::new();
    for id in record.flipped {
        if let Some(task) = store.get_task_mut(id)
            && task.is_completed
        {
            task.is_completed = false;
            task.touch();
            restored.push(id);
        }
    }
    tracing::debug!(task_id = %record.task_id, restored = restored.len(), "undid completion");

    commit(store, storage)?;

    Ok(restored)
}
