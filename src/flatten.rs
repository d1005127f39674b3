//! Turns a forest of tasks into indented display rows.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::models::{store::Store, task::Task};

/// Deepest level whose children are still visited. Rows go from level 0 to 5.
pub const MAX_DEPTH: usize = 5;

/// Tasks the user expanded on one screen. Everything else is collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedSet(HashSet<Uuid>);

impl ExpandedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: Uuid) -> bool {
        self.0.contains(&id)
    }

    pub fn expand(&mut self, id: Uuid) {
        self.0.insert(id);
    }

    pub fn collapse(&mut self, id: Uuid) {
        self.0.remove(&id);
    }

    /// Returns whether the task is expanded afterwards
    pub fn toggle(&mut self, id: Uuid) -> bool {
        if !self.0.remove(&id) {
            self.0.insert(id);
            return true;
        }
        false
    }

    /// Every task of the store, for an "expand all" switch
    pub fn all(store: &Store) -> Self {
        store.tasks.iter().map(|t| t.id).collect()
    }
}

impl FromIterator<Uuid> for ExpandedSet {
    fn from_iter<I: IntoIterator<Item = Uuid>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One display line: a task and its nesting level below the screen root
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Row<'a> {
    pub task: &'a Task,
    pub level: usize,
}

struct TreeIndex<'a> {
    children: HashMap<Uuid, Vec<&'a Task>>,
}

impl<'a> TreeIndex<'a> {
    fn new(store: &'a Store) -> Self {
        let mut children: HashMap<Uuid, Vec<&'a Task>> = HashMap::new();
        for task in &store.tasks {
            if let Some(parent_id) = task.parent_id {
                children.entry(parent_id).or_default().push(task);
            }
        }
        Self { children }
    }

    fn children_of(&self, id: Uuid) -> &[&'a Task] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Depth-first, pre-order rows for `roots`, in the given order.
///
/// A task's children are visited only if it is expanded and its level is
/// below `max_depth`; children failing `include_child` are skipped along
/// with their subtrees. Children keep store order.
pub fn flatten<'a>(
    store: &'a Store,
    roots: &[&'a Task],
    expanded: &ExpandedSet,
    max_depth: usize,
    include_child: impl Fn(&Task) -> bool,
) -> Vec<Row<'a>> {
    let index = TreeIndex::new(store);
    let mut rows = Vec::new();

    for root in roots {
        let mut visited: HashSet<Uuid> = HashSet::new();
        let mut stack: Vec<Row<'a>> = vec![Row {
            task: *root,
            level: 0,
        }];

        while let Some(row) = stack.pop() {
            if !visited.insert(row.task.id) {
                continue;
            }
            rows.push(row);

            if row.level >= max_depth || !expanded.is_expanded(row.task.id) {
                continue;
            }

            stack.extend(
                index
                    .children_of(row.task.id)
                    .iter()
                    .rev()
                    .filter(|child| include_child(**child))
                    .map(|child| Row {
                        task: *child,
                        level: row.level + 1,
                    }),
            );
        }
    }

    rows
}

/// Every completed, not abandoned task under `roots` (roots included), in
/// pre-order with its level, ignoring expansion state
pub fn collect_completed<'a>(store: &'a Store, roots: &[&'a Task]) -> Vec<Row<'a>> {
    let index = TreeIndex::new(store);
    let mut rows = Vec::new();

    for root in roots {
        let mut visited: HashSet<Uuid> = HashSet::new();
        let mut stack: Vec<Row<'a>> = vec![Row {
            task: *root,
            level: 0,
        }];

        while let Some(row) = stack.pop() {
            if !visited.insert(row.task.id) {
                continue;
            }
            if row.task.is_completed && !row.task.is_not_done {
                rows.push(row);
            }
            stack.extend(index.children_of(row.task.id).iter().rev().map(|child| Row {
                task: *child,
                level: row.level + 1,
            }));
        }
    }

    rows
}
