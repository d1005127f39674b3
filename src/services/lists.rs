use std::collections::HashSet;

use slug::slugify;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    models::{store::Store, task_list::TaskList},
    services::commit,
    storage::{Storage, StorageError},
};

#[derive(Debug, Error)]
pub enum CreateListError {
    #[error("List with name '{}' already exists", .0)]
    ListAlreadyExists(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct CreateListParameters {
    pub title: String,
}

pub fn create_list(
    store: &mut Store,
    storage: &impl Storage,
    parameters: CreateListParameters,
) -> Result<TaskList, CreateListError> {
    let list_slug = slugify(&parameters.title);
    if store.get_list_by_slug(&list_slug).is_some() {
        return Err(CreateListError::ListAlreadyExists(parameters.title));
    }

    let list = TaskList {
        title: parameters.title,
        slug: list_slug,
        ..TaskList::default()
    };
    let created = list.clone();

    store.add_list(list);
    tracing::debug!(list_id = %created.id, slug = %created.slug, "created list");

    commit(store, storage)?;

    Ok(created)
}

#[derive(Debug, Error)]
pub enum RenameListError {
    #[error("List '{0}' not found")]
    ListNotFound(Uuid),

    #[error("List with name '{}' already exists", .0)]
    ListAlreadyExists(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub fn rename_list(
    store: &mut Store,
    storage: &impl Storage,
    list_id: Uuid,
    title: String,
) -> Result<TaskList, RenameListError> {
    let list_slug = slugify(&title);
    if store
        .get_list_by_slug(&list_slug)
        .is_some_and(|other| other.id != list_id)
    {
        return Err(RenameListError::ListAlreadyExists(title));
    }

    let list = store
        .get_list_mut(list_id)
        .ok_or(RenameListError::ListNotFound(list_id))?;
    list.title = title;
    list.slug = list_slug;
    let renamed = list.clone();

    commit(store, storage)?;

    Ok(renamed)
}

#[derive(Debug, Error)]
pub enum DeleteListError {
    #[error("List '{0}' not found")]
    ListNotFound(Uuid),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub struct DeleteListResult {
    pub list: TaskList,
    pub cascaded_tasks_count: usize,
}

/// Deletes every task of the list, together with their subtasks, then the list
pub fn delete_list(
    store: &mut Store,
    storage: &impl Storage,
    list_id: Uuid,
) -> Result<DeleteListResult, DeleteListError> {
    if store.get_list(list_id).is_none() {
        return Err(DeleteListError::ListNotFound(list_id));
    }

    let members: Vec<Uuid> = store.tasks_in_list(list_id).map(|t| t.id).collect();
    let mut doomed: HashSet<Uuid> = HashSet::new();
    for member in members {
        doomed.insert(member);
        doomed.extend(store.descendants(member));
    }

    let cascaded_tasks_count = store.remove_tasks(&doomed);
    let list = store
        .remove_list(list_id)
        .ok_or(DeleteListError::ListNotFound(list_id))?;
    tracing::debug!(%list_id, cascaded = cascaded_tasks_count, "deleted list");

    commit(store, storage)?;

    Ok(DeleteListResult {
        list,
        cascaded_tasks_count,
    })
}
