use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-defined named grouping of root tasks. Membership lives on the task side.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TaskList {
    /// UUID of the list
    pub id: Uuid,
    /// Title of the list
    pub title: String,
    /// Slug of the list
    pub slug: String,
    /// Created at timestamp of the list
    pub created_at: Timestamp,
}

impl Default for TaskList {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            title: String::new(),
            slug: String::new(),
            created_at: Timestamp::now(),
        }
    }
}
