use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    /// UUID to identify the task
    pub id: Uuid,
    /// User-facing auto-incremental task number
    #[serde(default)]
    pub task_number: u64,
    /// Title of the task
    pub title: String,
    /// Free-text details of the task
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub is_completed: bool,
    /// Abandoned, the user won't do it
    #[serde(default)]
    pub is_not_done: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub is_pinned: bool,
    /// Attached photo or scan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<Vec<u8>>,
    /// Day the task is planned for, None keeps it in the undated home list
    #[serde(default)]
    pub due_date: Option<Date>,
    /// The task belongs to the Eisenhower matrix instead of the plain lists
    #[serde(default)]
    pub is_matrix_task: bool,
    /// The list of this task if it belongs to any
    #[serde(default)]
    pub list_id: Option<Uuid>,
    /// Parent of this task, None for a root task
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    /// Changes whenever the task is mutated so dependent views can recompute
    #[serde(default = "Uuid::new_v4")]
    pub refresh_id: Uuid,
    /// When the task was created
    pub created_at: Timestamp,
}

impl Default for Task {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            task_number: 0,
            title: String::new(),
            details: String::new(),
            is_completed: false,
            is_not_done: false,
            priority: Priority::None,
            is_pinned: false,
            image_data: None,
            due_date: None,
            is_matrix_task: false,
            list_id: None,
            parent_id: None,
            refresh_id: Uuid::new_v4(),
            created_at: Timestamp::now(),
        }
    }
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Task::default()
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Neither completed nor abandoned
    pub fn is_pending(&self) -> bool {
        !self.is_completed && !self.is_not_done
    }

    pub fn is_due_on(&self, day: Date) -> bool {
        self.due_date == Some(day)
    }

    pub fn touch(&mut self) {
        self.refresh_id = Uuid::new_v4();
    }

    pub fn share_text(&self) -> String {
        let mut text = format!("Task: {}", self.title);
        if !self.details.is_empty() {
            text.push_str("\nDescription: ");
            text.push_str(&self.details);
        }
        text
    }
}

/// Priority of a task, ordered `None < Low < Medium < High`
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::High,
        Priority::Medium,
        Priority::Low,
        Priority::None,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "High priority",
            Priority::Medium => "Medium priority",
            Priority::Low => "Low priority",
            Priority::None => "No priority",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
            Priority::None => write!(f, "none"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid priority '{0}', expected one of: high, medium, low, none")]
pub struct ParsePriorityError(String);

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "h" => Ok(Priority::High),
            "medium" | "m" => Ok(Priority::Medium),
            "low" | "l" => Ok(Priority::Low),
            "none" | "n" => Ok(Priority::None),
            _ => Err(ParsePriorityError(s.to_string())),
        }
    }
}
