use thiserror::Error;

use crate::models::{store::Store, task::Task, task_list::TaskList};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Task '{0}' not found")]
    TaskNotFound(String),

    #[error("Task name is ambiguous. Multiple tasks found: {}", .0.join(", "))]
    AmbiguousTaskName(Vec<String>),

    #[error("List '{0}' not found")]
    ListNotFound(String),

    #[error("List name is ambiguous. Multiple lists found: {}", .0.join(", "))]
    AmbiguousListName(Vec<String>),
}

/// Finds a task by its number, or by a case-insensitive title fragment that
/// matches exactly one task
pub fn resolve_task<'a>(store: &'a Store, task_number_or_fuzzy_name: &str) -> Result<&'a Task, LookupError> {
    if let Ok(task_number) = task_number_or_fuzzy_name.parse::<u64>() {
        return store
            .get_task_by_number(task_number)
            .ok_or_else(|| LookupError::TaskNotFound(task_number_or_fuzzy_name.to_string()));
    }

    let needle = task_number_or_fuzzy_name.to_lowercase();
    let matching_tasks: Vec<&Task> = store
        .tasks
        .iter()
        .filter(|t| t.title.to_lowercase().contains(&needle))
        .collect();

    match matching_tasks.as_slice() {
        [] => Err(LookupError::TaskNotFound(task_number_or_fuzzy_name.to_string())),
        [task] => Ok(*task),
        many => {
            // An exact title wins over fragments
            let exact: Vec<&Task> = many
                .iter()
                .copied()
                .filter(|t| t.title.to_lowercase() == needle)
                .collect();
            match exact.as_slice() {
                [task] => Ok(*task),
                _ => Err(LookupError::AmbiguousTaskName(
                    many.iter()
                        .map(|t| format!("#{} {}", t.task_number, t.title))
                        .collect(),
                )),
            }
        }
    }
}

/// Finds a list by slug, or by a case-insensitive title fragment
pub fn resolve_list<'a>(store: &'a Store, slug_or_fuzzy_name: &str) -> Result<&'a TaskList, LookupError> {
    if let Some(list) = store.get_list_by_slug(slug_or_fuzzy_name) {
        return Ok(list);
    }

    let needle = slug_or_fuzzy_name.to_lowercase();
    let matching_lists: Vec<&TaskList> = store
        .lists
        .iter()
        .filter(|l| l.title.to_lowercase().contains(&needle))
        .collect();

    match matching_lists.as_slice() {
        [] => Err(LookupError::ListNotFound(slug_or_fuzzy_name.to_string())),
        [list] => Ok(*list),
        many => Err(LookupError::AmbiguousListName(
            many.iter().map(|l| l.title.clone()).collect(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(titles: &[&str]) -> Store {
        let mut store = Store::default();
        for title in titles {
            store.add_task(Task::new(*title));
        }
        store
    }

    #[test]
    fn test_resolve_task_by_number() {
        let store = store_with(&["Buy milk", "Call mom"]);
        assert_eq!(resolve_task(&store, "2").unwrap().title, "Call mom");
        assert!(matches!(
            resolve_task(&store, "7"),
            Err(LookupError::TaskNotFound(_))
        ));
    }

    #[test]
    fn test_resolve_task_by_fuzzy_title() {
        let store = store_with(&["Buy milk", "Call mom"]);
        assert_eq!(resolve_task(&store, "MILK").unwrap().title, "Buy milk");
        assert!(matches!(
            resolve_task(&store, "taxes"),
            Err(LookupError::TaskNotFound(_))
        ));
    }

    #[test]
    fn test_resolve_task_ambiguous() {
        let store = store_with(&["Pay rent", "Pay taxes"]);
        match resolve_task(&store, "pay") {
            Err(LookupError::AmbiguousTaskName(names)) => {
                assert_eq!(names, vec!["#1 Pay rent", "#2 Pay taxes"]);
            }
            _ => panic!("Expected AmbiguousTaskName"),
        }
    }

    #[test]
    fn test_resolve_task_exact_title_wins() {
        let store = store_with(&["Pay", "Pay taxes"]);
        assert_eq!(resolve_task(&store, "pay").unwrap().title, "Pay");
    }

    #[test]
    fn test_resolve_list() {
        let mut store = Store::default();
        store.add_list(TaskList {
            title: String::from("Weekend Chores"),
            slug: String::from("weekend-chores"),
            ..TaskList::default()
        });
        store.add_list(TaskList {
            title: String::from("Work"),
            slug: String::from("work"),
            ..TaskList::default()
        });

        assert_eq!(resolve_list(&store, "work").unwrap().title, "Work");
        assert_eq!(resolve_list(&store, "chores").unwrap().title, "Weekend Chores");
        assert!(matches!(
            resolve_list(&store, "w"),
            Err(LookupError::AmbiguousListName(_))
        ));
        assert!(matches!(
            resolve_list(&store, "gym"),
            Err(LookupError::ListNotFound(_))
        ));
    }
}
