//! Screen contents: filter, take display roots, split pinned from normal and
//! flatten each group.

use jiff::civil::Date;
use uuid::Uuid;

use crate::{
    filters::{self, Quadrant},
    flatten::{ExpandedSet, Row, collect_completed, flatten},
    models::{store::Store, task::Task},
};

/// Pinned rows first, then normal rows
#[derive(Debug, Default)]
pub struct Section<'a> {
    pub pinned: Vec<Row<'a>>,
    pub normal: Vec<Row<'a>>,
}

impl<'a> Section<'a> {
    fn build(
        store: &'a Store,
        roots: Vec<&'a Task>,
        expanded: &ExpandedSet,
        max_depth: usize,
        include_child: impl Fn(&Task) -> bool,
    ) -> Self {
        let split = filters::split_pinned(roots);
        Self {
            pinned: flatten(store, &split.pinned, expanded, max_depth, &include_child),
            normal: flatten(store, &split.normal, expanded, max_depth, &include_child),
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row<'a>> {
        self.pinned.iter().chain(self.normal.iter())
    }

    pub fn len(&self) -> usize {
        self.pinned.len() + self.normal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pinned.is_empty() && self.normal.is_empty()
    }
}

/// Root list of the home screen for the selected list (or no list)
pub fn home_view<'a>(
    store: &'a Store,
    selected_list: Option<Uuid>,
    expanded: &ExpandedSet,
    max_depth: usize,
) -> Section<'a> {
    let roots = filters::home_roots(store, selected_list);
    Section::build(store, roots, expanded, max_depth, Task::is_pending)
}

#[derive(Debug, Default)]
pub struct CalendarView<'a> {
    pub pending: Section<'a>,
    pub done: Section<'a>,
}

/// Tasks of one day. Subtasks shown under a day's task are undated or due the
/// same day, and stay in the section matching their own completion state.
pub fn calendar_view<'a>(
    store: &'a Store,
    day: Date,
    expanded: &ExpandedSet,
    max_depth: usize,
) -> CalendarView<'a> {
    let buckets = filters::calendar_day(store, day);
    let same_day = move |task: &Task| task.due_date.is_none_or(|due| due == day);

    CalendarView {
        pending: Section::build(
            store,
            filters::display_roots(&buckets.pending),
            expanded,
            max_depth,
            move |task: &Task| same_day(task) && task.is_pending(),
        ),
        done: Section::build(
            store,
            filters::display_roots(&buckets.done),
            expanded,
            max_depth,
            move |task: &Task| same_day(task) && task.is_completed && !task.is_not_done,
        ),
    }
}

#[derive(Debug, Default)]
pub struct MatrixView<'a> {
    pub pending: Section<'a>,
    /// Completed tasks at any depth under the quadrant's roots
    pub done: Vec<Row<'a>>,
}

pub fn matrix_view<'a>(
    store: &'a Store,
    quadrant: Quadrant,
    expanded: &ExpandedSet,
    max_depth: usize,
) -> MatrixView<'a> {
    let tasks = filters::matrix_quadrant(store, quadrant);
    let roots = filters::display_roots(&tasks);
    let pending_roots: Vec<&Task> = roots.iter().copied().filter(|t| t.is_pending()).collect();

    MatrixView {
        pending: Section::build(store, pending_roots, expanded, max_depth, Task::is_pending),
        done: collect_completed(store, &roots),
    }
}

/// Number of pending tasks per quadrant, for the four-cell overview
pub fn matrix_counts(store: &Store) -> [(Quadrant, usize); 4] {
    Quadrant::ALL.map(|quadrant| {
        let count = filters::matrix_quadrant(store, quadrant)
            .into_iter()
            .filter(|t| t.is_pending())
            .count();
        (quadrant, count)
    })
}

/// Abandoned tasks as a flat list
pub fn not_done_view(store: &Store) -> Section<'_> {
    Section::build(store, filters::not_done(store), &ExpandedSet::new(), 0, |_| false)
}
