pub mod store;
pub mod task;
pub mod task_list;
