use std::collections::{HashMap, HashSet};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{task::Task, task_list::TaskList};

/// Current schema version
pub const CURRENT_VERSION: u32 = 2;

/// Arena holding every task and list, keyed by id.
///
/// The parent and list relationships are stored only on the task side
/// (`parent_id`, `list_id`); subtasks and list members are always computed
/// from them. Tasks keep their insertion order, which is the order children
/// are visited in.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Store {
    pub version: u32,
    pub tasks: Vec<Task>,
    pub lists: Vec<TaskList>,
    /// The last completion that can still be undone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completion: Option<CompletionRecord>,
}

/// Which tasks a single completion flipped from pending to completed
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CompletionRecord {
    pub task_id: Uuid,
    pub flipped: Vec<Uuid>,
    pub completed_at: Timestamp,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            tasks: vec![],
            lists: vec![],
            last_completion: None,
        }
    }
}

impl Store {
    /// Adds the task and assigns it the next task number
    pub fn add_task(&mut self, mut task: Task) -> &Task {
        task.task_number = self.next_task_number();
        self.tasks.push(task);
        &self.tasks[self.tasks.len() - 1]
    }

    pub fn next_task_number(&self) -> u64 {
        self.tasks.iter().map(|t| t.task_number).max().unwrap_or(0) + 1
    }

    pub fn get_task(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn get_task_mut(&mut self, id: Uuid) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn get_task_by_number(&self, task_number: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.task_number == task_number)
    }

    /// Direct children of a task, in store order
    pub fn subtasks(&self, id: Uuid) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| t.parent_id == Some(id))
    }

    /// Parent id -> child ids, in store order
    pub fn children_index(&self) -> HashMap<Uuid, Vec<Uuid>> {
        let mut index: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for task in &self.tasks {
            if let Some(parent_id) = task.parent_id {
                index.entry(parent_id).or_default().push(task.id);
            }
        }
        index
    }

    /// Every task below `id`, in depth-first pre-order, not including `id` itself
    pub fn descendants(&self, id: Uuid) -> Vec<Uuid> {
        let index = self.children_index();
        let mut visited = HashSet::from([id]);
        let mut out = Vec::new();
        let mut stack: Vec<Uuid> = index
            .get(&id)
            .map(|children| children.iter().rev().copied().collect())
            .unwrap_or_default();

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            out.push(current);
            if let Some(children) = index.get(&current) {
                stack.extend(children.iter().rev().copied());
            }
        }

        out
    }

    /// Parent chain of `id`, nearest first. Stops at a missing parent or a repeated id.
    pub fn ancestors(&self, id: Uuid) -> Vec<Uuid> {
        let mut visited = HashSet::from([id]);
        let mut out = Vec::new();
        let mut current = self.get_task(id).and_then(|t| t.parent_id);

        while let Some(parent_id) = current {
            if !visited.insert(parent_id) {
                break;
            }
            let Some(parent) = self.get_task(parent_id) else {
                break;
            };
            out.push(parent_id);
            current = parent.parent_id;
        }

        out
    }

    /// Number of ancestors of the task, 0 for a root. None if the task does not exist.
    pub fn depth(&self, id: Uuid) -> Option<usize> {
        self.get_task(id).map(|_| self.ancestors(id).len())
    }

    pub fn tasks_in_list(&self, list_id: Uuid) -> impl Iterator<Item = &Task> {
        self.tasks
            .iter()
            .filter(move |t| t.list_id == Some(list_id))
    }

    /// Removes every task in `ids`, returning how many were removed
    pub fn remove_tasks(&mut self, ids: &HashSet<Uuid>) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !ids.contains(&t.id));
        before - self.tasks.len()
    }

    pub fn add_list(&mut self, list: TaskList) -> Uuid {
        let id = list.id;
        self.lists.push(list);
        id
    }

    pub fn get_list(&self, id: Uuid) -> Option<&TaskList> {
        self.lists.iter().find(|l| l.id == id)
    }

    pub fn get_list_mut(&mut self, id: Uuid) -> Option<&mut TaskList> {
        self.lists.iter_mut().find(|l| l.id == id)
    }

    pub fn get_list_by_slug(&self, slug: &str) -> Option<&TaskList> {
        self.lists.iter().find(|l| l.slug == slug)
    }

    pub fn remove_list(&mut self, id: Uuid) -> Option<TaskList> {
        let position = self.lists.iter().position(|l| l.id == id)?;
        Some(self.lists.remove(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn child_of(store: &mut Store, parent: Uuid, title: &str) -> Uuid {
        store
            .add_task(Task {
                title: title.to_string(),
                parent_id: Some(parent),
                ..Task::default()
            })
            .id
    }

    #[test]
    fn test_add_task_assigns_incrementing_numbers() {
        let mut store = Store::default();
        let a = store.add_task(Task::new("a")).id;
        let b = store.add_task(Task::new("b")).id;
        assert_eq!(store.get_task(a).unwrap().task_number, 1);
        assert_eq!(store.get_task(b).unwrap().task_number, 2);
        assert_eq!(store.get_task_by_number(2).unwrap().id, b);
    }

    #[test]
    fn test_subtasks_are_the_inverse_of_parent() {
        let mut store = Store::default();
        let root = store.add_task(Task::new("root")).id;
        let first = child_of(&mut store, root, "first");
        let second = child_of(&mut store, root, "second");
        child_of(&mut store, first, "grandchild");

        let children: Vec<Uuid> = store.subtasks(root).map(|t| t.id).collect();
        assert_eq!(children, vec![first, second]);
    }

    #[test]
    fn test_descendants_pre_order() {
        let mut store = Store::default();
        let root = store.add_task(Task::new("root")).id;
        let a = child_of(&mut store, root, "a");
        let b = child_of(&mut store, root, "b");
        let a1 = child_of(&mut store, a, "a1");
        let b1 = child_of(&mut store, b, "b1");
        let unrelated = store.add_task(Task::new("unrelated")).id;

        let descendants = store.descendants(root);
        assert_eq!(descendants, vec![a, a1, b, b1]);
        assert!(!descendants.contains(&unrelated));
        assert!(store.descendants(a1).is_empty());
    }

    #[test]
    fn test_depth_and_ancestors() {
        let mut store = Store::default();
        let root = store.add_task(Task::new("root")).id;
        let child = child_of(&mut store, root, "child");
        let grandchild = child_of(&mut store, child, "grandchild");

        assert_eq!(store.depth(root), Some(0));
        assert_eq!(store.depth(child), Some(1));
        assert_eq!(store.depth(grandchild), Some(2));
        assert_eq!(store.ancestors(grandchild), vec![child, root]);
        assert_eq!(store.depth(Uuid::new_v4()), None);
    }

    #[test]
    fn test_traversals_terminate_on_cycles() {
        let mut store = Store::default();
        let a = store.add_task(Task::new("a")).id;
        let b = child_of(&mut store, a, "b");
        store.get_task_mut(a).unwrap().parent_id = Some(b);

        assert_eq!(store.ancestors(b), vec![a]);
        assert_eq!(store.depth(a), Some(1));
        assert_eq!(store.descendants(a), vec![b]);
    }

    #[test]
    fn test_list_lookup_and_removal() {
        let mut store = Store::default();
        let list = TaskList {
            title: String::from("Groceries"),
            slug: String::from("groceries"),
            ..TaskList::default()
        };
        let list_id = store.add_list(list);
        store.add_task(Task {
            list_id: Some(list_id),
            ..Task::new("Milk")
        });

        assert_eq!(store.get_list_by_slug("groceries").unwrap().id, list_id);
        assert_eq!(store.tasks_in_list(list_id).count(), 1);
        assert!(store.remove_list(list_id).is_some());
        assert!(store.get_list(list_id).is_none());
    }
}
