use colored::*;
use jiff::civil::Date;

use organazr::{
    flatten::Row,
    models::{
        store::Store,
        task::{Priority, Task},
    },
    views::Section,
};

/// Get the terminal width, defaulting to 80 if unavailable
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Get the appropriate status glyph for a task
pub fn get_status_glyph(task: &Task, is_overdue: bool) -> ColoredString {
    if task.is_not_done {
        "✗".dimmed()
    } else if task.is_completed {
        "✓".dimmed()
    } else if is_overdue {
        "●".red()
    } else {
        "○".normal()
    }
}

fn priority_flag(priority: Priority) -> ColoredString {
    match priority {
        Priority::High => "⚑".red(),
        Priority::Medium => "⚑".yellow(),
        Priority::Low => "⚑".blue(),
        Priority::None => " ".normal(),
    }
}

/// Right-hand context of a row: list title and due date
fn get_task_context(task: &Task, store: &Store) -> Option<String> {
    let list = task
        .list_id
        .and_then(|id| store.get_list(id))
        .map(|list| list.title.clone());
    let due = task.due_date.map(format_date_header);

    match (list, due) {
        (Some(list), Some(due)) => Some(format!("{} · {}", list, due)),
        (Some(list), None) => Some(list),
        (None, Some(due)) => Some(due),
        (None, None) => None,
    }
}

/// Render one flattened row, indented by its level
pub fn render_row(row: &Row, store: &Store, today: Date) {
    let task = row.task;
    let terminal_width = get_terminal_width();
    let is_overdue = is_overdue(task, today);

    let indent = "  ".repeat(row.level);
    let id_str = format!("{:>3}", task.task_number);
    let pin = if task.is_pinned { "📌 " } else { "" };
    let has_subtasks = store.subtasks(task.id).next().is_some();
    let branch = if has_subtasks { "▸ " } else { "" };

    let left_section = format!(
        "  {}  {}{} {} {}{}{}",
        id_str,
        indent,
        get_status_glyph(task, is_overdue),
        priority_flag(task.priority),
        branch,
        pin,
        task.title
    );

    let styled_left = if task.is_pending() {
        left_section.bold()
    } else {
        left_section.dimmed()
    };

    let Some(context) = get_task_context(task, store) else {
        println!("{}", styled_left);
        return;
    };

    let left_visible_len =
        format!("  {}  {}  x {}{}{}", id_str, indent, branch, pin, task.title)
            .chars()
            .count();
    let right_visible_len = context.chars().count();
    let total_content = left_visible_len + right_visible_len;

    if total_content + 4 < terminal_width {
        let padding = terminal_width - total_content - 2;
        println!("{}{}{}", styled_left, " ".repeat(padding), context.dimmed());
    } else {
        // Not enough space for right alignment, just print normally
        println!("{}", styled_left);
    }
}

/// Render a section: pinned rows under their own header, then the rest
pub fn render_section(section: &Section, store: &Store, today: Date) {
    if !section.pinned.is_empty() {
        render_section_header("Pinned");
        for row in &section.pinned {
            render_row(row, store, today);
        }
        if !section.normal.is_empty() {
            render_section_separator();
        }
    }
    for row in &section.normal {
        render_row(row, store, today);
    }
}

/// Render every field of a task
pub fn render_task_detail(task: &Task, store: &Store) {
    println!("\n  {} {}", format!("#{}", task.task_number).dimmed(), task.title.bold());
    if !task.details.is_empty() {
        println!("\n    {}", task.details);
    }
    println!();

    let status = match (task.is_completed, task.is_not_done) {
        (_, true) => "won't do",
        (true, false) => "completed",
        (false, false) => "open",
    };
    println!("    {:<10}{}", "Status".dimmed(), status);
    println!("    {:<10}{}", "Priority".dimmed(), task.priority.label());
    if let Some(due) = task.due_date {
        println!("    {:<10}{}", "Due".dimmed(), format_date_header(due));
    }
    if let Some(list) = task.list_id.and_then(|id| store.get_list(id)) {
        println!("    {:<10}{}", "List".dimmed(), list.title);
    }
    if let Some(parent) = task.parent_id.and_then(|id| store.get_task(id)) {
        println!(
            "    {:<10}#{} {}",
            "Parent".dimmed(),
            parent.task_number,
            parent.title
        );
    }
    let subtask_count = store.subtasks(task.id).count();
    if subtask_count > 0 {
        println!("    {:<10}{}", "Subtasks".dimmed(), subtask_count);
    }
    if let Some(image) = &task.image_data {
        println!("    {:<10}{} bytes", "Image".dimmed(), image.len());
    }
    if task.is_pinned {
        println!("    {:<10}yes", "Pinned".dimmed());
    }
    if task.is_matrix_task {
        println!("    {:<10}yes", "Matrix".dimmed());
    }
    println!();
}

/// Render a view header with title and count
pub fn render_view_header(title: &str, count: usize) {
    let task_word = if count == 1 { "task" } else { "tasks" };
    println!("\n  {} ({} {})\n", title.cyan().bold(), count, task_word);
}

/// Render a section header (e.g., "Pinned", "Done")
pub fn render_section_header(title: &str) {
    println!("\n  ─── {} ───\n", title.bold());
}

/// Render a section separator
pub fn render_section_separator() {
    println!();
}

/// A pending task whose due date has passed
pub fn is_overdue(task: &Task, today: Date) -> bool {
    task.is_pending() && task.due_date.is_some_and(|due| due < today)
}

/// Format a date as a human-readable header (e.g., "Tomorrow", "Monday, Feb 17")
pub fn format_date_header(date: Date) -> String {
    let today = jiff::Zoned::now().date();

    if date == today {
        "Today".to_string()
    } else if today.tomorrow().is_ok_and(|tomorrow| tomorrow == date) {
        "Tomorrow".to_string()
    } else if today.yesterday().is_ok_and(|yesterday| yesterday == date) {
        "Yesterday".to_string()
    } else {
        date.strftime("%A, %b %d").to_string()
    }
}
