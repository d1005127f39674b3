use std::fmt::Display;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use jiff::civil::Date;
use tracing_subscriber::EnvFilter;

use organazr::{
    config::Config,
    filters::Quadrant,
    flatten::ExpandedSet,
    models::{store::Store, task::Priority},
    services::{
        lists::{CreateListParameters, create_list, delete_list, rename_list},
        lookup::{resolve_list, resolve_task},
        tasks::{
            CreateTaskParameters, EditTaskParameters, Reschedule, SetCompletedParameters,
            create_task, delete_task, edit_task, reassign_due_date, set_completed, set_not_done,
            toggle_pinned,
        },
        undo::undo_last_completion,
    },
    storage::{Storage, json::JsonFileStorage},
    views::{calendar_view, home_view, matrix_counts, matrix_view, not_done_view},
};

mod ui;

#[derive(Parser)]
#[command(
    name = "orgz",
    about = "Tasks, subtasks, lists, a calendar and an Eisenhower matrix in your terminal"
)]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Args, Default)]
struct ExpandArgs {
    /// Expand a task's subtasks (can be used multiple times)
    #[arg(short, long, action = clap::ArgAction::Append)]
    expand: Vec<String>,

    /// Expand every task
    #[arg(long)]
    expand_all: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show undated tasks, optionally of one list
    Home {
        /// Show the tasks of this list instead of the unlisted ones
        #[arg(short, long)]
        list: Option<String>,

        #[command(flatten)]
        expand: ExpandArgs,
    },

    /// Show the tasks of one day
    Calendar {
        /// Day to show (e.g., "2025-03-01", "tomorrow"), defaults to today
        #[arg(short, long)]
        date: Option<String>,

        #[command(flatten)]
        expand: ExpandArgs,
    },

    /// Show the Eisenhower matrix, or one quadrant in detail
    Matrix {
        quadrant: Option<QuadrantArg>,

        #[command(flatten)]
        expand: ExpandArgs,
    },

    /// Show tasks marked as won't do
    NotDone,

    /// Add a new task
    Add {
        /// Task title
        title: String,

        /// Add details
        #[arg(long)]
        details: Option<String>,

        /// Priority: high, medium, low or none
        #[arg(short, long)]
        priority: Option<Priority>,

        /// Assign to a list
        #[arg(short, long)]
        list: Option<String>,

        /// Make it a subtask of another task
        #[arg(long)]
        parent: Option<String>,

        /// Due date (e.g., "2025-03-01", "today", "tomorrow")
        #[arg(short, long)]
        due: Option<String>,

        /// Put it in a matrix quadrant (sets priority, and a due date if none given)
        #[arg(short, long)]
        quadrant: Option<QuadrantArg>,

        /// Attach an image file
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Show a task
    Show { task: String },

    /// Print a task as shareable text
    Share { task: String },

    /// Complete a task and all its subtasks
    Done { task_number_or_fuzzy_name: String },

    /// Reopen a task and its completed ancestors
    Undone { task_number_or_fuzzy_name: String },

    /// Undo the last completion
    Undo,

    /// Pin or unpin a task
    Pin { task: String },

    /// Mark a task as won't do
    WontDo {
        task: String,

        /// Bring the task back instead
        #[arg(long)]
        revert: bool,
    },

    /// Edit a task
    Edit {
        task: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        details: Option<String>,

        #[arg(short, long)]
        priority: Option<Priority>,

        /// Attach an image file
        #[arg(long, conflicts_with = "remove_image")]
        image: Option<PathBuf>,

        /// Remove the attached image
        #[arg(long)]
        remove_image: bool,
    },

    /// Change a task's due date
    Reschedule {
        task: String,

        #[arg(long, group = "target")]
        today: bool,

        #[arg(long, group = "target")]
        tomorrow: bool,

        #[arg(short, long, group = "target")]
        date: Option<String>,

        #[arg(long, group = "target")]
        clear: bool,
    },

    /// Delete a task and all its subtasks
    Delete { task: String },

    /// Manage lists
    #[command(subcommand)]
    List(ListCommands),
}

#[derive(Debug, Subcommand)]
enum ListCommands {
    /// Create a new list
    New { title: String },
    /// Rename a list
    Rename { list: String, title: String },
    /// Delete a list and all its tasks
    Delete { list: String },
    /// Show all lists
    All,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum QuadrantArg {
    /// Urgent and important
    UrgentImportant,
    /// Not urgent, but important
    Important,
    /// Urgent, but not important
    Urgent,
    /// Not urgent and not important
    Neither,
}

impl From<QuadrantArg> for Quadrant {
    fn from(value: QuadrantArg) -> Self {
        match value {
            QuadrantArg::UrgentImportant => Quadrant::UrgentImportant,
            QuadrantArg::Important => Quadrant::NotUrgentImportant,
            QuadrantArg::Urgent => Quadrant::UrgentNotImportant,
            QuadrantArg::Neither => Quadrant::NotUrgentNotImportant,
        }
    }
}

fn fail(message: impl Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn parse_date(input: &str, today: Date) -> Date {
    match input.trim().to_lowercase().as_str() {
        "today" => today,
        "tomorrow" => Reschedule::Tomorrow
            .resolve(today)
            .unwrap_or_else(|| fail("Tomorrow is out of range")),
        other => other
            .parse()
            .unwrap_or_else(|e| fail(format!("Invalid date '{}': {}", input, e))),
    }
}

fn read_image(path: &Path) -> Vec<u8> {
    std::fs::read(path)
        .unwrap_or_else(|e| fail(format!("Failed to read image '{}': {}", path.display(), e)))
}

fn expanded_set(store: &Store, args: &ExpandArgs) -> ExpandedSet {
    if args.expand_all {
        return ExpandedSet::all(store);
    }
    args.expand
        .iter()
        .map(|query| resolve_task(store, query).unwrap_or_else(|e| fail(e)).id)
        .collect()
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load_from(&config_path).unwrap_or_else(|e| fail(e));
    init_logging(&config);

    let storage_path = config.store_path();

    // Create parent directory if it doesn't exist
    if let Some(parent) = storage_path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| fail(format!("Failed to create data directory: {}", e)));
    }

    let storage = JsonFileStorage::new(storage_path);

    let mut store = storage
        .load()
        .unwrap_or_else(|e| fail(format!("Failed to load store: {}", e)));

    let today = jiff::Zoned::now().date();
    let max_depth = config.max_depth;

    match cli.command {
        None => {
            let expanded = ExpandedSet::new();
            let section = home_view(&store, None, &expanded, max_depth);
            show_home(&store, "Home", &section, today);
        }
        Some(Commands::Home { list, expand }) => {
            let (title, list_id) = match list {
                Some(query) => {
                    let list = resolve_list(&store, &query).unwrap_or_else(|e| fail(e));
                    (list.title.clone(), Some(list.id))
                }
                None => (String::from("Home"), None),
            };
            let expanded = expanded_set(&store, &expand);
            let section = home_view(&store, list_id, &expanded, max_depth);
            show_home(&store, &title, &section, today);
        }
        Some(Commands::Calendar { date, expand }) => {
            let day = date.map_or(today, |d| parse_date(&d, today));
            let expanded = expanded_set(&store, &expand);
            let view = calendar_view(&store, day, &expanded, max_depth);

            if view.pending.is_empty() && view.done.is_empty() {
                println!("You have a free day on {}. Relax!", ui::format_date_header(day));
            } else {
                ui::render_view_header(&ui::format_date_header(day), view.pending.len());
                ui::render_section(&view.pending, &store, today);
                if !view.done.is_empty() {
                    ui::render_section_header("Done");
                    ui::render_section(&view.done, &store, today);
                }
            }
        }
        Some(Commands::Matrix {
            quadrant: None,
            expand: _,
        }) => {
            println!("\n  {}\n", "MATRIX".cyan().bold());
            for (quadrant, count) in matrix_counts(&store) {
                let label = match quadrant {
                    Quadrant::UrgentImportant => quadrant.label().red(),
                    Quadrant::NotUrgentImportant => quadrant.label().yellow(),
                    Quadrant::UrgentNotImportant => quadrant.label().blue(),
                    Quadrant::NotUrgentNotImportant => quadrant.label().normal(),
                };
                println!(
                    "  {} {}",
                    label.bold(),
                    format!("({} {})", count, if count == 1 { "task" } else { "tasks" }).dimmed()
                );
            }
            println!();
        }
        Some(Commands::Matrix {
            quadrant: Some(quadrant),
            expand,
        }) => {
            let quadrant = Quadrant::from(quadrant);
            let expanded = expanded_set(&store, &expand);
            let view = matrix_view(&store, quadrant, &expanded, max_depth);

            ui::render_view_header(quadrant.label(), view.pending.len());
            if view.pending.is_empty() {
                println!("  Nothing left here");
            } else {
                ui::render_section(&view.pending, &store, today);
            }
            if !view.done.is_empty() {
                ui::render_section_header("Done");
                for row in &view.done {
                    ui::render_row(row, &store, today);
                }
            }
        }
        Some(Commands::NotDone) => {
            let section = not_done_view(&store);
            if section.is_empty() {
                println!("No abandoned tasks");
            } else {
                ui::render_view_header("Won't do", section.len());
                ui::render_section(&section, &store, today);
            }
        }
        Some(Commands::Add {
            title,
            details,
            priority,
            list,
            parent,
            due,
            quadrant,
            image,
        }) => {
            let list_id = list.map(|query| {
                resolve_list(&store, &query)
                    .unwrap_or_else(|e| fail(e))
                    .id
            });
            let parent_id = parent.map(|query| {
                resolve_task(&store, &query)
                    .unwrap_or_else(|e| fail(e))
                    .id
            });
            let mut due_date = due.map(|d| parse_date(&d, today));
            let quadrant = quadrant.map(Quadrant::from);
            if let Some(quadrant) = quadrant
                && due_date.is_none()
            {
                due_date = quadrant.default_due_date(today);
            }

            let params = CreateTaskParameters {
                title,
                details,
                priority: quadrant
                    .map(Quadrant::priority)
                    .or(priority)
                    .unwrap_or_default(),
                list_id,
                parent_id,
                due_date,
                is_matrix_task: quadrant.is_some(),
                image_data: image.as_deref().map(read_image),
            };

            match create_task(&mut store, &storage, params) {
                Ok(task) => {
                    println!("✓ Task #{} created: {}", task.task_number, task.title.bold());
                }
                Err(e) => fail(format!("Failed to create task: {}", e)),
            }
        }
        Some(Commands::Show { task }) => {
            let task = resolve_task(&store, &task).unwrap_or_else(|e| fail(e));
            ui::render_task_detail(task, &store);
        }
        Some(Commands::Share { task }) => {
            let task = resolve_task(&store, &task).unwrap_or_else(|e| fail(e));
            println!("{}", task.share_text());
        }
        Some(Commands::Done {
            task_number_or_fuzzy_name,
        }) => {
            let task = resolve_task(&store, &task_number_or_fuzzy_name)
                .unwrap_or_else(|e| fail(e))
                .clone();
            let params = SetCompletedParameters {
                task_id: task.id,
                completed: true,
            };
            match set_completed(&mut store, &storage, params) {
                Ok(change) => {
                    println!("✓ Task completed: {}", task.title);
                    let cascaded = change.cascaded_count(task.id);
                    if cascaded > 0 {
                        println!("  └─ {} subtask(s) also completed", cascaded);
                    }
                    if !change.changed.is_empty() {
                        println!(
                            "  {}",
                            format!(
                                "Run `orgz undo` within {}s to revert",
                                config.undo_window_secs
                            )
                            .dimmed()
                        );
                    }
                }
                Err(e) => fail(format!("Failed to complete task: {}", e)),
            }
        }
        Some(Commands::Undone {
            task_number_or_fuzzy_name,
        }) => {
            let task = resolve_task(&store, &task_number_or_fuzzy_name)
                .unwrap_or_else(|e| fail(e))
                .clone();
            let params = SetCompletedParameters {
                task_id: task.id,
                completed: false,
            };
            match set_completed(&mut store, &storage, params) {
                Ok(change) if change.changed.is_empty() => {
                    println!("Task is not completed: {}", task.title);
                }
                Ok(change) => {
                    println!("✓ Task reopened: {}", task.title);
                    let cascaded = change.cascaded_count(task.id);
                    if cascaded > 0 {
                        println!("  └─ {} parent task(s) also reopened", cascaded);
                    }
                }
                Err(e) => fail(format!("Failed to reopen task: {}", e)),
            }
        }
        Some(Commands::Undo) => {
            match undo_last_completion(
                &mut store,
                &storage,
                config.undo_window(),
                jiff::Timestamp::now(),
            ) {
                Ok(restored) => println!("✓ Completion undone ({} task(s) reopened)", restored.len()),
                Err(e) => fail(e),
            }
        }
        Some(Commands::Pin { task }) => {
            let task_id = resolve_task(&store, &task).unwrap_or_else(|e| fail(e)).id;
            match toggle_pinned(&mut store, &storage, task_id) {
                Ok(task) if task.is_pinned => println!("✓ Pinned: {}", task.title),
                Ok(task) => println!("✓ Unpinned: {}", task.title),
                Err(e) => fail(format!("Failed to pin task: {}", e)),
            }
        }
        Some(Commands::WontDo { task, revert }) => {
            let task_id = resolve_task(&store, &task).unwrap_or_else(|e| fail(e)).id;
            match set_not_done(&mut store, &storage, task_id, !revert) {
                Ok(task) if task.is_not_done => println!("✓ Won't do: {}", task.title),
                Ok(task) => println!("✓ Back on the list: {}", task.title),
                Err(e) => fail(format!("Failed to update task: {}", e)),
            }
        }
        Some(Commands::Edit {
            task,
            title,
            details,
            priority,
            image,
            remove_image,
        }) => {
            let task_id = resolve_task(&store, &task).unwrap_or_else(|e| fail(e)).id;
            let image_data = match (image, remove_image) {
                (Some(path), _) => Some(Some(read_image(&path))),
                (None, true) => Some(None),
                (None, false) => None,
            };
            let params = EditTaskParameters {
                title,
                details,
                priority,
                image_data,
            };
            match edit_task(&mut store, &storage, task_id, params) {
                Ok(task) => println!("✓ Task updated: {}", task.title),
                Err(e) => fail(format!("Failed to edit task: {}", e)),
            }
        }
        Some(Commands::Reschedule {
            task,
            today: to_today,
            tomorrow,
            date,
            clear,
        }) => {
            let task_id = resolve_task(&store, &task).unwrap_or_else(|e| fail(e)).id;
            let target = if to_today {
                Reschedule::Today
            } else if tomorrow {
                Reschedule::Tomorrow
            } else if let Some(date) = date {
                Reschedule::On(parse_date(&date, today))
            } else if clear {
                Reschedule::Clear
            } else {
                fail("Pick one of --today, --tomorrow, --date or --clear")
            };

            match reassign_due_date(&mut store, &storage, task_id, target.resolve(today)) {
                Ok(task) => match task.due_date {
                    Some(due) => println!(
                        "✓ {} moved to {}",
                        task.title,
                        ui::format_date_header(due)
                    ),
                    None => println!("✓ {} no longer has a date", task.title),
                },
                Err(e) => fail(format!("Failed to reschedule task: {}", e)),
            }
        }
        Some(Commands::Delete { task }) => {
            let task_id = resolve_task(&store, &task).unwrap_or_else(|e| fail(e)).id;
            match delete_task(&mut store, &storage, task_id) {
                Ok(result) => {
                    println!("✓ Task deleted: {}", result.task.title);
                    if result.cascaded_subtasks_count > 0 {
                        println!(
                            "  └─ {} subtask(s) also deleted",
                            result.cascaded_subtasks_count
                        );
                    }
                }
                Err(e) => fail(format!("Failed to delete task: {}", e)),
            }
        }
        Some(Commands::List(ListCommands::New { title })) => {
            match create_list(&mut store, &storage, CreateListParameters { title }) {
                Ok(list) => println!("✓ List {} created with slug {}", list.title, list.slug),
                Err(e) => fail(e),
            }
        }
        Some(Commands::List(ListCommands::Rename { list, title })) => {
            let list_id = resolve_list(&store, &list).unwrap_or_else(|e| fail(e)).id;
            match rename_list(&mut store, &storage, list_id, title) {
                Ok(list) => println!("✓ List renamed to {} ({})", list.title, list.slug),
                Err(e) => fail(e),
            }
        }
        Some(Commands::List(ListCommands::Delete { list })) => {
            let list_id = resolve_list(&store, &list).unwrap_or_else(|e| fail(e)).id;
            match delete_list(&mut store, &storage, list_id) {
                Ok(result) => {
                    println!("✓ List deleted: {}", result.list.title);
                    if result.cascaded_tasks_count > 0 {
                        println!("  └─ {} task(s) also deleted", result.cascaded_tasks_count);
                    }
                }
                Err(e) => fail(format!("Failed to delete list: {}", e)),
            }
        }
        Some(Commands::List(ListCommands::All)) => {
            let mut lists: Vec<_> = store.lists.iter().collect();

            if lists.is_empty() {
                println!("No lists found");
            } else {
                // Sort alphabetically by title (case-insensitive)
                lists.sort_by_key(|l| l.title.to_lowercase());

                println!(
                    "{} ({} {})\n",
                    "LISTS".cyan(),
                    lists.len(),
                    if lists.len() == 1 { "list" } else { "lists" }
                );

                for list in lists {
                    let open_count = store
                        .tasks_in_list(list.id)
                        .filter(|t| t.is_pending())
                        .count();
                    println!(
                        "{} {} {}",
                        "•".green(),
                        list.title.bold(),
                        format!(
                            "({} open {}, slug {})",
                            open_count,
                            if open_count == 1 { "task" } else { "tasks" },
                            list.slug
                        )
                        .dimmed()
                    );
                }
            }
        }
    }
}

fn show_home(store: &Store, title: &str, section: &organazr::views::Section, today: Date) {
    if section.is_empty() {
        println!("Nothing to do in {}", title);
    } else {
        ui::render_view_header(title, section.len());
        ui::render_section(section, store, today);
    }
}
