//! Read-only predicates deciding which tasks each screen shows.
//!
//! Every function takes the whole store plus the screen's selector and
//! returns references into the store. Nothing here mutates.

use std::collections::HashSet;

use jiff::{ToSpan, civil::Date};
use uuid::Uuid;

use crate::models::{
    store::Store,
    task::{Priority, Task},
};

/// Home screen roots: undated, pending, non-matrix root tasks of the selected
/// list (or of no list), sorted by title
pub fn home_roots(store: &Store, selected_list: Option<Uuid>) -> Vec<&Task> {
    let mut roots: Vec<&Task> = store
        .tasks
        .iter()
        .filter(|t| is_home_root(t, selected_list))
        .collect();
    roots.sort_by(|a, b| a.title.cmp(&b.title));
    roots
}

pub fn is_home_root(task: &Task, selected_list: Option<Uuid>) -> bool {
    task.is_root()
        && !task.is_completed
        && !task.is_not_done
        && task.due_date.is_none()
        && !task.is_matrix_task
        && task.list_id == selected_list
}

/// Tasks of one calendar day, split by completion
#[derive(Debug, Default)]
pub struct DayBuckets<'a> {
    pub pending: Vec<&'a Task>,
    pub done: Vec<&'a Task>,
}

impl DayBuckets<'_> {
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.done.is_empty()
    }
}

pub fn is_on_calendar_day(task: &Task, day: Date) -> bool {
    task.is_due_on(day) && !task.is_not_done && !task.is_matrix_task
}

pub fn calendar_day(store: &Store, day: Date) -> DayBuckets<'_> {
    let (done, pending): (Vec<&Task>, Vec<&Task>) = store
        .tasks
        .iter()
        .filter(|t| is_on_calendar_day(t, day))
        .partition(|t| t.is_completed);
    DayBuckets { pending, done }
}

/// The four Eisenhower quadrants. Each maps to exactly one priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    UrgentImportant,
    NotUrgentImportant,
    UrgentNotImportant,
    NotUrgentNotImportant,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::UrgentImportant,
        Quadrant::NotUrgentImportant,
        Quadrant::UrgentNotImportant,
        Quadrant::NotUrgentNotImportant,
    ];

    pub fn priority(self) -> Priority {
        match self {
            Quadrant::UrgentImportant => Priority::High,
            Quadrant::NotUrgentImportant => Priority::Medium,
            Quadrant::UrgentNotImportant => Priority::Low,
            Quadrant::NotUrgentNotImportant => Priority::None,
        }
    }

    pub fn from_priority(priority: Priority) -> Self {
        match priority {
            Priority::High => Quadrant::UrgentImportant,
            Priority::Medium => Quadrant::NotUrgentImportant,
            Priority::Low => Quadrant::UrgentNotImportant,
            Priority::None => Quadrant::NotUrgentNotImportant,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Quadrant::UrgentImportant => "Urgent and important",
            Quadrant::NotUrgentImportant => "Not urgent, but important",
            Quadrant::UrgentNotImportant => "Urgent, but not important",
            Quadrant::NotUrgentNotImportant => "Not urgent and not important",
        }
    }

    /// Due date given to a new matrix task created without one
    pub fn default_due_date(self, today: Date) -> Option<Date> {
        let days: i64 = match self {
            Quadrant::UrgentImportant => 1,
            Quadrant::UrgentNotImportant => 2,
            Quadrant::NotUrgentImportant => 7,
            Quadrant::NotUrgentNotImportant => 14,
        };
        today.checked_add(days.days()).ok()
    }
}

pub fn is_in_quadrant(task: &Task, quadrant: Quadrant) -> bool {
    task.is_matrix_task
        && !task.is_not_done
        && task.due_date.is_some()
        && task.priority == quadrant.priority()
}

/// Matrix tasks of one quadrant, sorted by title
pub fn matrix_quadrant(store: &Store, quadrant: Quadrant) -> Vec<&Task> {
    let mut tasks: Vec<&Task> = store
        .tasks
        .iter()
        .filter(|t| is_in_quadrant(t, quadrant))
        .collect();
    tasks.sort_by(|a, b| a.title.cmp(&b.title));
    tasks
}

pub fn not_done(store: &Store) -> Vec<&Task> {
    store.tasks.iter().filter(|t| t.is_not_done).collect()
}

/// Tasks of a filter result whose parent is not part of the same result.
/// Subtasks whose parent is shown are reached through flattening instead.
pub fn display_roots<'a>(tasks: &[&'a Task]) -> Vec<&'a Task> {
    let ids: HashSet<Uuid> = tasks.iter().map(|t| t.id).collect();
    tasks
        .iter()
        .copied()
        .filter(|t| t.parent_id.is_none_or(|parent| !ids.contains(&parent)))
        .collect()
}

#[derive(Debug, Default)]
pub struct PinnedSplit<'a> {
    pub pinned: Vec<&'a Task>,
    pub normal: Vec<&'a Task>,
}

/// Splits tasks into pinned and normal groups, keeping their order
pub fn split_pinned<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> PinnedSplit<'a> {
    let (pinned, normal): (Vec<&Task>, Vec<&Task>) = tasks.into_iter().partition(|t| t.is_pinned);
    PinnedSplit { pinned, normal }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use pretty_assertions::assert_eq;

    fn titles(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.title.clone()).collect()
    }

    fn matrix_task(title: &str, priority: Priority, due: Date) -> Task {
        Task {
            priority,
            due_date: Some(due),
            is_matrix_task: true,
            ..Task::new(title)
        }
    }

    #[test]
    fn test_home_roots_predicate() {
        let mut store = Store::default();
        let list = Uuid::new_v4();
        let parent = store.add_task(Task::new("Parent")).id;
        store.add_task(Task::new("Zebra"));
        store.add_task(Task::new("Apple"));
        store.add_task(Task {
            parent_id: Some(parent),
            ..Task::new("Child")
        });
        store.add_task(Task {
            is_completed: true,
            ..Task::new("Completed")
        });
        store.add_task(Task {
            is_not_done: true,
            ..Task::new("Abandoned")
        });
        store.add_task(Task {
            due_date: Some(date(2025, 6, 1)),
            ..Task::new("Dated")
        });
        store.add_task(Task {
            is_matrix_task: true,
            ..Task::new("Matrix")
        });
        store.add_task(Task {
            list_id: Some(list),
            ..Task::new("Listed")
        });

        assert_eq!(titles(&home_roots(&store, None)), vec!["Apple", "Parent", "Zebra"]);
        assert_eq!(titles(&home_roots(&store, Some(list))), vec!["Listed"]);
    }

    #[test]
    fn test_matrix_task_never_on_home() {
        let mut store = Store::default();
        store.add_task(Task {
            is_matrix_task: true,
            ..Task::new("Matrix only")
        });

        assert!(home_roots(&store, None).is_empty());
    }

    #[test]
    fn test_calendar_day_buckets() {
        let mut store = Store::default();
        let day = date(2025, 6, 1);
        store.add_task(Task {
            due_date: Some(day),
            ..Task::new("Pending")
        });
        store.add_task(Task {
            due_date: Some(day),
            is_completed: true,
            ..Task::new("Done")
        });
        store.add_task(Task {
            due_date: Some(day),
            is_completed: true,
            is_not_done: true,
            ..Task::new("Done and abandoned")
        });
        store.add_task(Task {
            due_date: Some(day),
            is_matrix_task: true,
            ..Task::new("Matrix")
        });
        store.add_task(Task {
            due_date: Some(date(2025, 6, 2)),
            ..Task::new("Next day")
        });
        store.add_task(Task::new("Undated"));

        let buckets = calendar_day(&store, day);
        assert_eq!(titles(&buckets.pending), vec!["Pending"]);
        assert_eq!(titles(&buckets.done), vec!["Done"]);
    }

    #[test]
    fn test_matrix_quadrant_mapping() {
        let mut store = Store::default();
        let today = date(2025, 6, 1);
        for priority in Priority::ALL {
            store.add_task(matrix_task(&priority.to_string(), priority, today));
        }
        store.add_task(Task {
            due_date: None,
            ..matrix_task("Undated", Priority::High, today)
        });
        store.add_task(Task {
            is_not_done: true,
            ..matrix_task("Abandoned", Priority::High, today)
        });
        store.add_task(Task {
            is_matrix_task: false,
            ..matrix_task("Plain", Priority::High, today)
        });

        for quadrant in Quadrant::ALL {
            let result = matrix_quadrant(&store, quadrant);
            assert_eq!(titles(&result), vec![quadrant.priority().to_string()]);
            assert_eq!(Quadrant::from_priority(quadrant.priority()), quadrant);
        }
    }

    #[test]
    fn test_quadrant_default_due_dates() {
        let today = date(2025, 6, 1);
        assert_eq!(
            Quadrant::UrgentImportant.default_due_date(today),
            Some(date(2025, 6, 2))
        );
        assert_eq!(
            Quadrant::UrgentNotImportant.default_due_date(today),
            Some(date(2025, 6, 3))
        );
        assert_eq!(
            Quadrant::NotUrgentImportant.default_due_date(today),
            Some(date(2025, 6, 8))
        );
        assert_eq!(
            Quadrant::NotUrgentNotImportant.default_due_date(today),
            Some(date(2025, 6, 15))
        );
    }

    #[test]
    fn test_undated_tasks_never_on_calendar_or_matrix() {
        let mut store = Store::default();
        store.add_task(Task {
            is_matrix_task: true,
            priority: Priority::High,
            ..Task::new("Matrix without date")
        });
        store.add_task(Task::new("Plain without date"));

        for quadrant in Quadrant::ALL {
            assert!(matrix_quadrant(&store, quadrant).is_empty());
        }
        assert!(calendar_day(&store, date(2025, 6, 1)).is_empty());
    }

    #[test]
    fn test_not_done_has_no_other_constraints() {
        let mut store = Store::default();
        let parent = store.add_task(Task::new("Parent")).id;
        store.add_task(Task {
            is_not_done: true,
            is_completed: true,
            is_matrix_task: true,
            parent_id: Some(parent),
            due_date: Some(date(2025, 6, 1)),
            ..Task::new("Everything")
        });
        store.add_task(Task {
            is_not_done: true,
            ..Task::new("Plain")
        });

        assert_eq!(titles(&not_done(&store)), vec!["Everything", "Plain"]);
    }

    #[test]
    fn test_display_roots_skip_children_of_shown_parents() {
        let mut store = Store::default();
        let day = date(2025, 6, 1);
        let undated_parent = store.add_task(Task::new("Undated parent")).id;
        let dated_parent = store
            .add_task(Task {
                due_date: Some(day),
                ..Task::new("Dated parent")
            })
            .id;
        store.add_task(Task {
            due_date: Some(day),
            parent_id: Some(dated_parent),
            ..Task::new("Under dated")
        });
        store.add_task(Task {
            due_date: Some(day),
            parent_id: Some(undated_parent),
            ..Task::new("Under undated")
        });

        let buckets = calendar_day(&store, day);
        assert_eq!(
            titles(&display_roots(&buckets.pending)),
            vec!["Dated parent", "Under undated"]
        );
    }

    #[test]
    fn test_split_pinned_keeps_order() {
        let tasks = [
            Task {
                is_pinned: true,
                ..Task::new("b")
            },
            Task::new("a"),
            Task {
                is_pinned: true,
                ..Task::new("c")
            },
        ];

        let split = split_pinned(tasks.iter());

        assert_eq!(titles(&split.pinned), vec!["b", "c"]);
        assert_eq!(titles(&split.normal), vec!["a"]);
    }
}
