use std::collections::HashSet;

use jiff::{ToSpan, civil::Date};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::{
        store::{CompletionRecord, Store},
        task::{Priority, Task},
    },
    services::commit,
    storage::{Storage, StorageError},
};

#[derive(Debug, Error)]
pub enum CreateTaskError {
    #[error("Parent task '{0}' not found")]
    ParentNotFound(Uuid),

    #[error("List '{0}' not found")]
    ListNotFound(Uuid),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Default)]
pub struct CreateTaskParameters {
    pub title: String,
    pub details: Option<String>,
    pub priority: Priority,
    pub list_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
    pub due_date: Option<Date>,
    pub is_matrix_task: bool,
    pub image_data: Option<Vec<u8>>,
}

impl CreateTaskParameters {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Creates a task. The parent and list, when given, must already exist, which
/// keeps the parent chain acyclic.
pub fn create_task(
    store: &mut Store,
    storage: &impl Storage,
    parameters: CreateTaskParameters,
) -> Result<Task, CreateTaskError> {
    if let Some(parent_id) = parameters.parent_id
        && store.get_task(parent_id).is_none()
    {
        return Err(CreateTaskError::ParentNotFound(parent_id));
    }

    if let Some(list_id) = parameters.list_id
        && store.get_list(list_id).is_none()
    {
        return Err(CreateTaskError::ListNotFound(list_id));
    }

    let task = Task {
        title: parameters.title,
        details: parameters.details.unwrap_or_default(),
        priority: parameters.priority,
        list_id: parameters.list_id,
        parent_id: parameters.parent_id,
        due_date: parameters.due_date,
        is_matrix_task: parameters.is_matrix_task,
        image_data: parameters.image_data,
        ..Task::default()
    };

    let created = store.add_task(task).clone();
    tracing::debug!(task_id = %created.id, parent = ?created.parent_id, "created task");

    commit(store, storage)?;

    Ok(created)
}

#[derive(Debug, Error)]
pub enum CompleteTaskError {
    #[error("Task '{0}' not found")]
    TaskNotFound(Uuid),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct SetCompletedParameters {
    pub task_id: Uuid,
    pub completed: bool,
}

/// Ids whose completion flag actually changed
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompletionChange {
    pub changed: Vec<Uuid>,
}

impl CompletionChange {
    /// Changed tasks other than the one the operation targeted
    pub fn cascaded_count(&self, task_id: Uuid) -> usize {
        self.changed.iter().filter(|id| **id != task_id).count()
    }
}

/// Completing a task completes its whole subtree. Uncompleting a completed
/// task also uncompletes its ancestors, walking up until the first one that
/// is not completed.
///
/// A completion that flipped at least one task replaces the undo slot.
pub fn set_completed(
    store: &mut Store,
    storage: &impl Storage,
    parameters: SetCompletedParameters,
) -> Result<CompletionChange, CompleteTaskError> {
    let task_id = parameters.task_id;
    if store.get_task(task_id).is_none() {
        return Err(CompleteTaskError::TaskNotFound(task_id));
    }

    let changed = if parameters.completed {
        let mut targets = vec![task_id];
        targets.extend(store.descendants(task_id));
        let changed = set_flag(store, &targets, true);

        if !changed.is_empty() {
            store.last_completion = Some(CompletionRecord {
                task_id,
                flipped: changed.clone(),
                completed_at: jiff::Timestamp::now(),
            });
        }
        changed
    } else {
        let mut targets = vec![task_id];
        targets.extend(store.ancestors(task_id));
        let completed_prefix: Vec<Uuid> = targets
            .into_iter()
            .take_while(|id| store.get_task(*id).is_some_and(|t| t.is_completed))
            .collect();
        set_flag(store, &completed_prefix, false)
    };

    tracing::debug!(
        %task_id,
        completed = parameters.completed,
        changed = changed.len(),
        "set completion"
    );

    commit(store, storage)?;

    Ok(CompletionChange { changed })
}

fn set_flag(store: &mut Store, ids: &[Uuid], completed: bool) -> Vec<Uuid> {
    let mut changed = Vec::new();
    for id in ids {
        if let Some(task) = store.get_task_mut(*id)
            && task.is_completed != completed
        {
            task.is_completed = completed;
            task.touch();
            changed.push(*id);
        }
    }
    changed
}

#[derive(Debug, Error)]
pub enum UpdateTaskError {
    #[error("Task '{0}' not found")]
    TaskNotFound(Uuid),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

fn update_task(
    store: &mut Store,
    storage: &impl Storage,
    task_id: Uuid,
    update: impl FnOnce(&mut Task),
) -> Result<Task, UpdateTaskError> {
    let task = store
        .get_task_mut(task_id)
        .ok_or(UpdateTaskError::TaskNotFound(task_id))?;
    update(task);
    task.touch();
    let updated = task.clone();

    commit(store, storage)?;

    Ok(updated)
}

pub fn toggle_pinned(
    store: &mut Store,
    storage: &impl Storage,
    task_id: Uuid,
) -> Result<Task, UpdateTaskError> {
    update_task(store, storage, task_id, |task| task.is_pinned = !task.is_pinned)
}

/// Marks the task as abandoned ("won't do") or brings it back
pub fn set_not_done(
    store: &mut Store,
    storage: &impl Storage,
    task_id: Uuid,
    not_done: bool,
) -> Result<Task, UpdateTaskError> {
    update_task(store, storage, task_id, |task| task.is_not_done = not_done)
}

/// Fields left as `None` are not touched
#[derive(Default)]
pub struct EditTaskParameters {
    pub title: Option<String>,
    pub details: Option<String>,
    pub priority: Option<Priority>,
    /// `Some(None)` removes the attached image
    pub image_data: Option<Option<Vec<u8>>>,
}

pub fn edit_task(
    store: &mut Store,
    storage: &impl Storage,
    task_id: Uuid,
    parameters: EditTaskParameters,
) -> Result<Task, UpdateTaskError> {
    update_task(store, storage, task_id, |task| {
        if let Some(title) = parameters.title {
            task.title = title;
        }
        if let Some(details) = parameters.details {
            task.details = details;
        }
        if let Some(priority) = parameters.priority {
            task.priority = priority;
        }
        if let Some(image_data) = parameters.image_data {
            task.image_data = image_data;
        }
    })
}

/// Target of the reschedule flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reschedule {
    Today,
    Tomorrow,
    On(Date),
    Clear,
}

impl Reschedule {
    pub fn resolve(self, today: Date) -> Option<Date> {
        match self {
            Reschedule::Today => Some(today),
            Reschedule::Tomorrow => today.checked_add(1.day()).ok(),
            Reschedule::On(date) => Some(date),
            Reschedule::Clear => None,
        }
    }
}

pub fn reassign_due_date(
    store: &mut Store,
    storage: &impl Storage,
    task_id: Uuid,
    due_date: Option<Date>,
) -> Result<Task, UpdateTaskError> {
    tracing::debug!(%task_id, ?due_date, "reassigning due date");
    update_task(store, storage, task_id, |task| task.due_date = due_date)
}

#[derive(Debug, Error)]
pub enum DeleteTaskError {
    #[error("Task '{0}' not found")]
    TaskNotFound(Uuid),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct DeleteTaskResult {
    pub task: Task,
    pub cascaded_subtasks_count: usize,
}

/// Deletes the task and every task below it
pub fn delete_task(
    store: &mut Store,
    storage: &impl Storage,
    task_id: Uuid,
) -> Result<DeleteTaskResult, DeleteTaskError> {
    let task = store
        .get_task(task_id)
        .cloned()
        .ok_or(DeleteTaskError::TaskNotFound(task_id))?;

    let mut doomed: HashSet<Uuid> = store.descendants(task_id).into_iter().collect();
    let cascaded_subtasks_count = doomed.len();
    doomed.insert(task_id);

    store.remove_tasks(&doomed);
    tracing::debug!(%task_id, cascaded = cascaded_subtasks_count, "deleted task");

    commit(store, storage)?;

    Ok(DeleteTaskResult {
        task,
        cascaded_subtasks_count,
    })
}
